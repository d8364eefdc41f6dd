use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum GroupError {
    #[error("Group '{group}' contains no atoms")]
    Empty { group: String },

    #[error("Group '{group}' lists atom {index} more than once")]
    DuplicateIndex { group: String, index: usize },

    #[error("Group '{group}' references atom {index}, but the system has only {n_atoms} atoms")]
    IndexOutOfRange {
        group: String,
        index: usize,
        n_atoms: usize,
    },

    #[error("Group '{group}' has total mass {mass}; a positive mass is required")]
    NonPositiveMass { group: String, mass: f64 },
}

/// A named, ordered selection of particle indices.
///
/// Order matters: per-atom state such as unwrapped coordinates is stored by rank
/// within the group, and dynamic groups record atoms in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexGroup {
    pub name: String,
    pub indices: Vec<usize>,
}

impl IndexGroup {
    pub fn new(name: &str, indices: Vec<usize>) -> Self {
        Self {
            name: name.to_string(),
            indices,
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Checks the parts of the group that do not depend on the system it is applied to.
    pub fn check_structure(&self) -> Result<(), GroupError> {
        if self.is_empty() {
            return Err(GroupError::Empty {
                group: self.name.clone(),
            });
        }
        let mut seen = HashSet::with_capacity(self.len());
        for &index in &self.indices {
            if !seen.insert(index) {
                return Err(GroupError::DuplicateIndex {
                    group: self.name.clone(),
                    index,
                });
            }
        }
        Ok(())
    }

    /// Checks the group against a mass table and returns its total mass.
    pub fn check_against(&self, masses: &[f64]) -> Result<f64, GroupError> {
        self.check_structure()?;
        let mut total = 0.0;
        for &index in &self.indices {
            let mass = masses.get(index).ok_or_else(|| GroupError::IndexOutOfRange {
                group: self.name.clone(),
                index,
                n_atoms: masses.len(),
            })?;
            total += mass;
        }
        if !(total > 0.0 && total.is_finite()) {
            return Err(GroupError::NonPositiveMass {
                group: self.name.clone(),
                mass: total,
            });
        }
        Ok(total)
    }
}
