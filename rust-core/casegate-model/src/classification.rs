// SPDX-License-Identifier: PMPL-1.0-or-later
//! Security classifications of cases, fields and audit events.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// Security classification, ordered from least to most sensitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SecurityClassification {
    #[default]
    Public,
    Private,
    Restricted,
}

impl SecurityClassification {
    /// Numeric rank; a user may see anything ranked at or below their own.
    pub fn rank(self) -> u8 {
        match self {
            SecurityClassification::Public => 1,
            SecurityClassification::Private => 2,
            SecurityClassification::Restricted => 3,
        }
    }

    pub fn higher_or_equal_to(self, other: SecurityClassification) -> bool {
        self.rank() >= other.rank()
    }
}

impl fmt::Display for SecurityClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityClassification::Public => write!(f, "PUBLIC"),
            SecurityClassification::Private => write!(f, "PRIVATE"),
            SecurityClassification::Restricted => write!(f, "RESTRICTED"),
        }
    }
}

impl FromStr for SecurityClassification {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PUBLIC" => Ok(SecurityClassification::Public),
            "PRIVATE" => Ok(SecurityClassification::Private),
            "RESTRICTED" => Ok(SecurityClassification::Restricted),
            _ => Err(ModelError::UnknownClassification(s.to_string())),
        }
    }
}
