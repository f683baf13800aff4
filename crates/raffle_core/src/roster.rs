//! Authoritative employee roster with best-effort persistence.

use std::collections::HashSet;

use anyhow::{Context, Result};
use serde::Deserialize;
use shared::{
    domain::{sort_by_name, Category, Employee, EmployeeId},
    error::RaffleError,
};
use storage::KeyValueStore;
use tracing::{debug, error, info, warn};

use crate::{defaults::default_roster, ids::generate_id};

/// Storage key for the serialized roster. A schema change must pick a new key.
pub const DEFAULT_STORAGE_KEY: &str = "raffleEmployeesV2";
pub const UNKNOWN_EMPLOYEE_NAME: &str = "Unknown Employee";

const ADDED_ID_PREFIX: &str = "emp";
const MIGRATED_ID_PREFIX: &str = "migrated";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(Employee),
    NotFound(EmployeeId),
}

/// Lenient shape of a persisted entry; every field may be missing.
#[derive(Debug, Deserialize)]
struct StoredEmployee {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

pub struct RosterStore<S> {
    store: S,
    key: String,
    employees: Vec<Employee>,
    loaded: bool,
}

impl<S: KeyValueStore> RosterStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            employees: Vec::new(),
            loaded: false,
        }
    }

    /// Loads the persisted roster, falling back to the seed list when nothing
    /// usable is stored. Runs once; later calls return the current roster.
    pub fn initialize(&mut self) -> &[Employee] {
        if self.loaded {
            return &self.employees;
        }

        self.employees = match self.load_persisted() {
            Some(employees) => employees,
            None => {
                info!(key = %self.key, "no usable stored roster; using default employees");
                default_roster()
            }
        };
        self.loaded = true;
        info!(key = %self.key, employees = self.employees.len(), "roster loaded");
        self.persist();
        &self.employees
    }

    fn load_persisted(&mut self) -> Option<Vec<Employee>> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                error!(key = %self.key, "failed to read stored roster: {err:#}");
                return None;
            }
        };

        match decode_roster(&raw) {
            Ok(employees) => Some(employees),
            Err(err) => {
                error!(key = %self.key, "stored roster is unreadable; discarding it: {err:#}");
                if let Err(err) = self.store.remove(&self.key) {
                    warn!(key = %self.key, "failed to discard unreadable roster: {err:#}");
                }
                None
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn get(&self, id: &EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|employee| &employee.id == id)
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn add(&mut self, name: &str, category: Option<Category>) -> Result<Employee, RaffleError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RaffleError::EmptyName);
        }
        if self.employees.iter().any(|employee| employee.has_name(name)) {
            return Err(RaffleError::DuplicateName(name.to_string()));
        }

        let id = self.fresh_id(ADDED_ID_PREFIX, self.employees.len());
        let employee = Employee::new(id, name, category.unwrap_or_default());
        self.employees.push(employee.clone());
        sort_by_name(&mut self.employees);
        info!(employee_id = %employee.id, name = %employee.name, "employee added");
        self.persist();
        Ok(employee)
    }

    pub fn remove(&mut self, id: &EmployeeId) -> RemoveOutcome {
        let Some(position) = self.employees.iter().position(|employee| &employee.id == id) else {
            warn!(employee_id = %id, "employee to remove was not found");
            return RemoveOutcome::NotFound(id.clone());
        };

        let removed = self.employees.remove(position);
        info!(employee_id = %removed.id, name = %removed.name, "employee removed");
        self.persist();
        RemoveOutcome::Removed(removed)
    }

    /// Empties the roster and returns how many entries were dropped.
    pub fn remove_all(&mut self) -> usize {
        let removed = self.employees.len();
        self.employees.clear();
        info!(removed, "all employees removed");
        self.persist();
        removed
    }

    pub fn restore_defaults(&mut self) {
        self.employees = default_roster();
        info!(employees = self.employees.len(), "default employees restored");
        self.persist();
    }

    pub fn serialize(&self) -> Result<String> {
        serde_json::to_string(&self.employees).context("failed to encode roster")
    }

    /// Writes the roster, but never before the initial load has finished.
    /// Failures are logged; the in-memory roster stays authoritative.
    fn persist(&mut self) {
        if !self.loaded {
            debug!(key = %self.key, "skipping roster save before initial load");
            return;
        }

        let serialized = match self.serialize() {
            Ok(serialized) => serialized,
            Err(err) => {
                warn!(key = %self.key, "failed to encode roster: {err:#}");
                return;
            }
        };

        match self.store.set(&self.key, &serialized) {
            Ok(()) => debug!(key = %self.key, employees = self.employees.len(), "roster saved"),
            Err(err) => warn!(key = %self.key, "failed to save roster: {err:#}"),
        }
    }

    fn fresh_id(&self, prefix: &str, index: usize) -> EmployeeId {
        let mut rng = rand::rng();
        loop {
            let id = EmployeeId(generate_id(prefix, index, &mut rng));
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

/// Parses a stored roster, filling gaps left by older or hand-edited data.
/// Empty strings count as missing and duplicate ids are re-issued.
fn decode_roster(raw: &str) -> Result<Vec<Employee>> {
    let stored: Vec<StoredEmployee> =
        serde_json::from_str(raw).context("stored roster is not a JSON array of employees")?;

    let mut rng = rand::rng();
    let mut seen = HashSet::new();
    let mut employees = Vec::with_capacity(stored.len());
    for (index, entry) in stored.into_iter().enumerate() {
        let id = match non_empty(entry.id) {
            Some(id) if !seen.contains(&id) => id,
            _ => loop {
                let id = generate_id(MIGRATED_ID_PREFIX, index, &mut rng);
                if !seen.contains(&id) {
                    break id;
                }
            },
        };
        seen.insert(id.clone());

        let name = non_empty(entry.name).unwrap_or_else(|| UNKNOWN_EMPLOYEE_NAME.to_string());
        let category = entry
            .category
            .as_deref()
            .map(Category::from_stored)
            .unwrap_or_default();
        employees.push(Employee::new(id, name, category));
    }

    sort_by_name(&mut employees);
    Ok(employees)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
#[path = "tests/roster_tests.rs"]
mod tests;
