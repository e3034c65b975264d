//! In-memory contract store
//!
//! Holds the decrypted contracts of the open vault in insertion order.
//! Reads take the shared lock, every mutation the exclusive one; allocating
//! an id and inserting the contract happen under a single write guard.

use std::collections::HashSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{VaultError, VaultResult};
use crate::models::{Contract, ContractDraft, ContractField, ContractId, ContractValidationError};

/// Largest number of contracts a store accepts by default
pub const DEFAULT_CAPACITY: usize = u32::MAX as usize;

/// Thread-safe, ordered collection of contracts
#[derive(Debug)]
pub struct ContractStore {
    data: RwLock<Vec<Contract>>,
    capacity: usize,
}

impl Default for ContractStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::with_capacity_limit(DEFAULT_CAPACITY)
    }

    /// Create an empty store that holds at most `capacity` contracts
    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            data: RwLock::new(Vec::new()),
            capacity,
        }
    }

    fn read(&self) -> VaultResult<RwLockReadGuard<'_, Vec<Contract>>> {
        self.data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> VaultResult<RwLockWriteGuard<'_, Vec<Contract>>> {
        self.data
            .write()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Append a contract
    ///
    /// Returns `false` only when the store is full. A contract without an id,
    /// or with one that is already taken, is renumbered to the smallest free id.
    pub fn add(&self, contract: Contract) -> VaultResult<bool> {
        let mut data = self.write()?;
        Ok(self.insert_locked(&mut data, contract).is_some())
    }

    /// Validate a draft, assign the smallest free id and store it
    pub fn create(&self, draft: ContractDraft) -> VaultResult<Contract> {
        let candidate = draft.into_contract(ContractId::UNASSIGNED);
        candidate
            .validate()
            .map_err(|e| VaultError::Validation(e.to_string()))?;

        let mut data = self.write()?;
        let stored = self
            .insert_locked(&mut data, candidate)
            .ok_or(VaultError::CapacityExceeded(self.capacity))?;

        tracing::debug!(id = %stored.id, "contract created");
        Ok(stored)
    }

    /// Insert while holding the write guard; returns the stored copy
    fn insert_locked(&self, data: &mut Vec<Contract>, mut contract: Contract) -> Option<Contract> {
        if data.len() >= self.capacity {
            tracing::warn!(capacity = self.capacity, "contract store is full");
            return None;
        }

        if !contract.id.is_assigned() || data.iter().any(|c| c.id == contract.id) {
            contract.id = smallest_unused_id(data);
        }

        data.push(contract.clone());
        Some(contract)
    }

    /// Get a contract by ID
    pub fn get(&self, id: ContractId) -> VaultResult<Option<Contract>> {
        let data = self.read()?;
        Ok(data.iter().find(|c| c.id == id).cloned())
    }

    /// All contracts in insertion order
    pub fn all(&self) -> VaultResult<Vec<Contract>> {
        Ok(self.read()?.clone())
    }

    /// Remove a contract by ID
    pub fn remove(&self, id: ContractId) -> VaultResult<bool> {
        let mut data = self.write()?;
        match data.iter().position(|c| c.id == id) {
            Some(index) => {
                data.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a contract by value
    ///
    /// Matches on id first and falls back to comparing every other field, for
    /// callers that hold a copy whose id no longer lines up with the store.
    pub fn remove_contract(&self, contract: &Contract) -> VaultResult<bool> {
        let mut data = self.write()?;
        let position = data
            .iter()
            .position(|c| c.id == contract.id)
            .or_else(|| data.iter().position(|c| same_content(c, contract)));

        match position {
            Some(index) => {
                data.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Change a single named field of a contract
    ///
    /// The change is applied to a copy and validated before it replaces the
    /// stored contract, so on any error the store is unchanged.
    pub fn update(&self, id: ContractId, field_name: &str, value: &str) -> VaultResult<Contract> {
        let field: ContractField = field_name.parse().map_err(|e: ContractValidationError| {
            VaultError::InvalidField(e.to_string())
        })?;

        let mut data = self.write()?;
        let stored = data
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| VaultError::contract_not_found(id))?;

        let mut updated = stored.clone();
        updated
            .set_field(field, value)
            .and_then(|()| updated.validate())
            .map_err(|e| VaultError::Validation(e.to_string()))?;

        *stored = updated.clone();
        tracing::debug!(id = %id, field = %field, "contract updated");
        Ok(updated)
    }

    /// Remove every contract
    pub fn clear(&self) -> VaultResult<()> {
        self.write()?.clear();
        Ok(())
    }

    /// Swap in a fully decoded set of contracts, or merge them in
    ///
    /// Used by the session after a successful load; the caller has already
    /// decoded everything, so this either applies completely or not at all.
    /// Incoming contracts keep their id when it is positive and still free;
    /// the rest are numbered into the remaining gaps. Returns the store
    /// contents afterwards.
    pub fn absorb(&self, mut incoming: Vec<Contract>, overwrite: bool) -> VaultResult<Vec<Contract>> {
        let mut data = self.write()?;

        let mut next = if overwrite { Vec::new() } else { data.clone() };
        if next.len() + incoming.len() > self.capacity {
            return Err(VaultError::CapacityExceeded(self.capacity));
        }

        let mut taken: HashSet<u32> = next.iter().map(|c| c.id.value()).collect();
        for contract in incoming.iter_mut() {
            if !contract.id.is_assigned() || !taken.insert(contract.id.value()) {
                contract.id = ContractId::UNASSIGNED;
            }
        }
        for contract in incoming.iter_mut().filter(|c| !c.id.is_assigned()) {
            let id = first_gap(taken.iter().copied());
            taken.insert(id.value());
            tracing::debug!(id = %id, name = %contract.name, "renumbered incoming contract");
            contract.id = id;
        }

        next.extend(incoming);
        *data = next;
        Ok(data.clone())
    }

    /// The id the next created contract would get
    pub fn next_id(&self) -> VaultResult<ContractId> {
        Ok(smallest_unused_id(&self.read()?))
    }

    /// Count contracts
    pub fn len(&self) -> VaultResult<usize> {
        Ok(self.read()?.len())
    }

    /// Whether the store holds no contracts
    pub fn is_empty(&self) -> VaultResult<bool> {
        Ok(self.read()?.is_empty())
    }
}

fn same_content(a: &Contract, b: &Contract) -> bool {
    Contract { id: b.id, ..a.clone() } == *b
}

/// Smallest positive integer not used as an id in `contracts`
///
/// Sorts the ids first, so the result does not depend on stored order.
pub fn smallest_unused_id(contracts: &[Contract]) -> ContractId {
    first_gap(contracts.iter().map(|c| c.id.value()))
}

fn first_gap(ids: impl Iterator<Item = u32>) -> ContractId {
    let mut ids: Vec<u32> = ids.filter(|&id| id > 0).collect();
    ids.sort_unstable();
    ids.dedup();

    let mut candidate = 1u32;
    for id in ids {
        if id != candidate {
            break;
        }
        candidate += 1;
    }
    ContractId::new(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn draft(name: &str) -> ContractDraft {
        ContractDraft::new("insurance", name, 10.0, 12)
    }

    fn with_id(id: u32, name: &str) -> Contract {
        draft(name).into_contract(ContractId::new(id))
    }

    #[test]
    fn test_empty_store() {
        let store = ContractStore::new();
        assert!(store.is_empty().unwrap());
        assert_eq!(store.next_id().unwrap(), ContractId::new(1));
    }

    #[test]
    fn test_create_and_get() {
        let store = ContractStore::new();

        let created = store.create(draft("health")).unwrap();
        assert_eq!(created.id, ContractId::new(1));

        let retrieved = store.get(created.id).unwrap().unwrap();
        assert_eq!(retrieved.name, "health");
    }

    #[test]
    fn test_create_rejects_invalid_draft() {
        let store = ContractStore::new();
        let mut bad = draft("broken");
        bad.cycle = 0;

        let err = store.create(bad).unwrap_err();
        assert!(err.is_validation());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_smallest_unused_fills_gap() {
        let store = ContractStore::new();
        for name in ["a", "b", "c"] {
            store.create(draft(name)).unwrap();
        }
        store.remove(ContractId::new(2)).unwrap();

        let created = store.create(draft("d")).unwrap();
        assert_eq!(created.id, ContractId::new(2));
    }

    #[test]
    fn test_allocation_ignores_stored_order() {
        // Descending order defeats a scan that only bumps on exact matches
        let contracts = vec![with_id(2, "b"), with_id(1, "a")];
        assert_eq!(smallest_unused_id(&contracts), ContractId::new(3));

        let contracts = vec![with_id(3, "c"), with_id(1, "a"), with_id(2, "b")];
        assert_eq!(smallest_unused_id(&contracts), ContractId::new(4));

        let contracts = vec![with_id(5, "e"), with_id(1, "a")];
        assert_eq!(smallest_unused_id(&contracts), ContractId::new(2));
    }

    #[test]
    fn test_ids_unique_under_interleaving() {
        let store = ContractStore::new();
        let mut removed = 0;

        for round in 0..20u32 {
            store.create(draft(&format!("c{}", round))).unwrap();
            if round % 3 == 0 && store.remove(ContractId::new(round / 2 + 1)).unwrap() {
                removed += 1;
            }
        }

        let all = store.all().unwrap();
        assert_eq!(all.len(), 20 - removed);
        let ids: HashSet<_> = all.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), all.len());
        assert!(all.iter().all(|c| c.id.is_assigned()));
    }

    #[test]
    fn test_add_renumbers_duplicates() {
        let store = ContractStore::new();
        assert!(store.add(with_id(1, "a")).unwrap());
        assert!(store.add(with_id(1, "b")).unwrap());
        assert!(store.add(with_id(0, "c")).unwrap());

        let ids: Vec<u32> = store.all().unwrap().iter().map(|c| c.id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_add_returns_false_when_full() {
        let store = ContractStore::with_capacity_limit(1);
        assert!(store.add(with_id(1, "a")).unwrap());
        assert!(!store.add(with_id(2, "b")).unwrap());

        let err = store.create(draft("c")).unwrap_err();
        assert!(matches!(err, VaultError::CapacityExceeded(1)));
    }

    #[test]
    fn test_remove_then_get() {
        let store = ContractStore::new();
        let created = store.create(draft("health")).unwrap();

        assert!(store.remove(created.id).unwrap());
        assert!(store.get(created.id).unwrap().is_none());
        assert!(!store.remove(created.id).unwrap());
    }

    #[test]
    fn test_remove_by_value() {
        let store = ContractStore::new();
        let created = store.create(draft("health")).unwrap();
        store.create(draft("car")).unwrap();

        assert!(store.remove_contract(&created).unwrap());
        assert_eq!(store.len().unwrap(), 1);
        assert!(!store.remove_contract(&created).unwrap());
    }

    #[test]
    fn test_remove_by_value_falls_back_to_content() {
        let store = ContractStore::new();
        let created = store.create(draft("health")).unwrap();

        let mut stale = created.clone();
        stale.id = ContractId::new(99);
        stale.name = "someone else".into();
        assert!(!store.remove_contract(&stale).unwrap());

        stale.name = created.name.clone();
        assert!(store.remove_contract(&stale).unwrap());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_update_field() {
        let store = ContractStore::new();
        let created = store.create(draft("health")).unwrap();

        let updated = store.update(created.id, "category", "x").unwrap();
        assert_eq!(updated.category, "x");
        assert_eq!(store.get(created.id).unwrap().unwrap().category, "x");
    }

    #[test]
    fn test_update_unknown_field() {
        let store = ContractStore::new();
        let created = store.create(draft("health")).unwrap();

        let err = store.update(created.id, "colour", "red").unwrap_err();
        assert!(matches!(err, VaultError::InvalidField(_)));
        assert_eq!(store.get(created.id).unwrap().unwrap(), created);
    }

    #[test]
    fn test_update_invalid_value_leaves_contract() {
        let store = ContractStore::new();
        let created = store.create(draft("health")).unwrap();

        assert!(store.update(created.id, "cycle", "0").unwrap_err().is_validation());
        assert!(store.update(created.id, "expenses", "lots").unwrap_err().is_validation());
        assert_eq!(store.get(created.id).unwrap().unwrap(), created);
    }

    #[test]
    fn test_update_missing_contract() {
        let store = ContractStore::new();
        let err = store.update(ContractId::new(4), "name", "x").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_clear() {
        let store = ContractStore::new();
        store.create(draft("a")).unwrap();
        store.clear().unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_absorb_overwrite_keeps_ids() {
        let store = ContractStore::new();
        store.create(draft("old")).unwrap();

        let result = store
            .absorb(vec![with_id(4, "x"), with_id(2, "y")], true)
            .unwrap();

        let ids: Vec<u32> = result.iter().map(|c| c.id.value()).collect();
        assert_eq!(ids, vec![4, 2]);
    }

    #[test]
    fn test_absorb_merge_renumbers_collisions() {
        let store = ContractStore::new();
        store.create(draft("old")).unwrap();

        let result = store
            .absorb(vec![with_id(1, "x"), with_id(0, "y"), with_id(7, "z")], false)
            .unwrap();

        let ids: Vec<u32> = result.iter().map(|c| c.id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3, 7]);
    }

    #[test]
    fn test_absorb_reserves_stored_ids_before_numbering() {
        let store = ContractStore::new();

        let result = store
            .absorb(vec![with_id(0, "new"), with_id(1, "kept")], true)
            .unwrap();

        assert_eq!(result[0].id, ContractId::new(2));
        assert_eq!(result[1].id, ContractId::new(1));
    }

    #[test]
    fn test_absorb_over_capacity_changes_nothing() {
        let store = ContractStore::with_capacity_limit(2);
        store.create(draft("old")).unwrap();

        let err = store
            .absorb(vec![with_id(1, "x"), with_id(2, "y")], false)
            .unwrap_err();

        assert!(matches!(err, VaultError::CapacityExceeded(2)));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_concurrent_creates_get_distinct_ids() {
        let store = Arc::new(ContractStore::new());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..25 {
                        store.create(draft(&format!("t{}-{}", t, i))).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let all = store.all().unwrap();
        let ids: HashSet<_> = all.iter().map(|c| c.id.value()).collect();
        assert_eq!(all.len(), 200);
        assert_eq!(ids, (1..=200).collect::<HashSet<u32>>());
    }
}
