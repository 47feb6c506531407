// SPDX-License-Identifier: PMPL-1.0-or-later
//! CRUD operations that a grant or ACL entry may authorize.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// An operation on a case, a field, an event or a state.
///
/// Ordering is the declaration order; it only matters for deterministic
/// iteration of operation sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    /// All four operations in canonical order.
    pub const ALL: [Operation; 4] = [
        Operation::Create,
        Operation::Read,
        Operation::Update,
        Operation::Delete,
    ];
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Read => write!(f, "READ"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

impl FromStr for Operation {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CREATE" | "C" => Ok(Operation::Create),
            "READ" | "R" => Ok(Operation::Read),
            "UPDATE" | "U" => Ok(Operation::Update),
            "DELETE" | "D" => Ok(Operation::Delete),
            _ => Err(ModelError::UnknownOperation(s.to_string())),
        }
    }
}
