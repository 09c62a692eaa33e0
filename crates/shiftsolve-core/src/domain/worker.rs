//! Worker records.

use std::collections::BTreeSet;

use crate::error::{Result, ShiftSolverError};

/// A worker that can be assigned to shifts.
///
/// `restricted` and `preferred` are disjoint by construction: a shift type
/// id cannot name both a hard prohibition and a soft preference.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Worker {
    pub id: String,
    pub name: String,
    pub worker_type: Option<String>,
    restricted: BTreeSet<String>,
    preferred: BTreeSet<String>,
    /// Free-form attributes used by downstream constraint matching outside
    /// the enumerated constraint set. Excluded from equality and hashing.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: std::collections::BTreeMap<String, String>,
}

impl Worker {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        worker_type: Option<String>,
        restricted: impl IntoIterator<Item = String>,
        preferred: impl IntoIterator<Item = String>,
    ) -> Result<Self> {
        let id = id.into();
        let name = name.into();
        if id.is_empty() {
            return Err(ShiftSolverError::invariant("Worker", "id", "id cannot be empty"));
        }
        if name.is_empty() {
            return Err(ShiftSolverError::invariant("Worker", "name", "name cannot be empty"));
        }
        let restricted: BTreeSet<String> = restricted.into_iter().collect();
        let preferred: BTreeSet<String> = preferred.into_iter().collect();
        let conflicting: Vec<&String> = restricted.intersection(&preferred).collect();
        if !conflicting.is_empty() {
            let joined = conflicting
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ShiftSolverError::invariant(
                "Worker",
                "restricted",
                format!("shifts cannot be both restricted and preferred: {joined}"),
            ));
        }
        Ok(Worker {
            id,
            name,
            worker_type,
            restricted,
            preferred,
            attributes: Default::default(),
        })
    }

    pub fn restricted(&self) -> &BTreeSet<String> {
        &self.restricted
    }

    pub fn preferred(&self) -> &BTreeSet<String> {
        &self.preferred
    }

    pub fn can_work_shift(&self, shift_type_id: &str) -> bool {
        !self.restricted.contains(shift_type_id)
    }

    pub fn prefers_shift(&self, shift_type_id: &str) -> bool {
        self.preferred.contains(shift_type_id)
    }
}

impl PartialEq for Worker {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.worker_type == other.worker_type
            && self.restricted == other.restricted
            && self.preferred == other.preferred
    }
}
impl Eq for Worker {}

impl std::hash::Hash for Worker {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.name.hash(state);
        self.worker_type.hash(state);
        for r in &self.restricted {
            r.hash(state);
        }
        for p in &self.preferred {
            p.hash(state);
        }
    }
}
