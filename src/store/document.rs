//! The generic document model and the collection registry.
//!
//! Documents are schemaless: an optional identifier plus an open payload.
//! The backup engine never interprets the payload beyond separating the
//! identifier from the rest of the record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The bookkeeping collections, in their fixed restore order.
///
/// The declaration order is load-bearing: restores iterate [`Collection::ALL`]
/// so that repeated runs against the same file touch collections in the same
/// sequence, and the `Ord` derive keeps maps keyed by collection in that
/// sequence too.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    Customers,
    Vendors,
    Categories,
    Products,
    Sales,
    Purchases,
    Checks,
    Workers,
    Banks,
    Currencies,
    SalaryPayments,
    WorkerExpenses,
    WorkerAttendance,
}

impl Collection {
    /// Every collection, in restore order.
    pub const ALL: [Collection; 13] = [
        Collection::Customers,
        Collection::Vendors,
        Collection::Categories,
        Collection::Products,
        Collection::Sales,
        Collection::Purchases,
        Collection::Checks,
        Collection::Workers,
        Collection::Banks,
        Collection::Currencies,
        Collection::SalaryPayments,
        Collection::WorkerExpenses,
        Collection::WorkerAttendance,
    ];

    /// Wire name of the collection, as used in backup files and store data.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Customers => "customers",
            Collection::Vendors => "vendors",
            Collection::Categories => "categories",
            Collection::Products => "products",
            Collection::Sales => "sales",
            Collection::Purchases => "purchases",
            Collection::Checks => "checks",
            Collection::Workers => "workers",
            Collection::Banks => "banks",
            Collection::Currencies => "currencies",
            Collection::SalaryPayments => "salaryPayments",
            Collection::WorkerExpenses => "workerExpenses",
            Collection::WorkerAttendance => "workerAttendance",
        }
    }

    /// Look up a collection by its wire name.
    pub fn from_name(name: &str) -> Option<Collection> {
        Collection::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generic store document: an optional identifier plus arbitrary fields.
///
/// A `None` identifier on write means "let the store assign one". Documents
/// read back from a store always carry an identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Create a document without an identifier.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { id: None, fields }
    }

    /// Create a document under a known identifier.
    pub fn with_id(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: Some(id.into()),
            fields,
        }
    }
}
