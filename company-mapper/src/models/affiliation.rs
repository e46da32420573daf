//! Company affiliation model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One company membership of a user, as embedded in the token claim.
///
/// `label` links the company to the identity store and is passed through
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affiliation {
    pub name: String,
    pub label: String,
}

impl Affiliation {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}

/// Raw `companies` row. NULL columns decode as `None`.
#[derive(Debug, Clone, FromRow)]
pub struct AffiliationRow {
    pub name: Option<String>,
    pub label: Option<String>,
}

impl From<AffiliationRow> for Affiliation {
    fn from(row: AffiliationRow) -> Self {
        Self {
            name: row.name.unwrap_or_default(),
            label: row.label.unwrap_or_default(),
        }
    }
}
