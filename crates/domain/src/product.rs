//! Product catalog types.

use chrono::{DateTime, Utc};
use common::{Money, ProductId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Catalog category a product is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductCategory {
    Seeds,
    Fertilizers,
    Pesticides,
}

impl ProductCategory {
    /// Returns the canonical string form stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Seeds => "Seeds",
            ProductCategory::Fertilizers => "Fertilizers",
            ProductCategory::Pesticides => "Pesticides",
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized category string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown product category: {0}")]
pub struct UnknownProductCategory(pub String);

impl std::str::FromStr for ProductCategory {
    type Err = UnknownProductCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Seeds" => Ok(ProductCategory::Seeds),
            "Fertilizers" => Ok(ProductCategory::Fertilizers),
            "Pesticides" => Ok(ProductCategory::Pesticides),
            other => Err(UnknownProductCategory(other.to_string())),
        }
    }
}

/// A product as read from the catalog.
///
/// Created and edited by the catalog management side; the reservation path
/// only ever reads `price` and `stock` under a row lock and decrements
/// `stock`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: ProductCategory,
    pub description: String,
    pub price: Money,
    /// Units currently available. Never negative.
    pub stock: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
