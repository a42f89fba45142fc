//! Library statistics model

use serde::{Serialize, Serializer};
use utoipa::ToSchema;

/// Share of the inventory currently borrowed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UtilizationRate {
    /// No books at all; serialized as the number `0`
    NoBooks,
    /// Percentage with two decimals, e.g. `"37.50"`
    Percent(String),
}

impl UtilizationRate {
    pub fn from_counts(borrowed: usize, total: usize) -> Self {
        if total == 0 {
            return UtilizationRate::NoBooks;
        }
        let rate = borrowed as f64 / total as f64 * 100.0;
        UtilizationRate::Percent(two_decimals(rate))
    }
}

/// Two decimals, exact ties rounded up (`format!` alone rounds them to even)
fn two_decimals(value: f64) -> String {
    let cents = value * 100.0;
    // An exact tie at the third decimal is a multiple of 1/8, so `cents` is exact too
    if (value * 8.0).fract() == 0.0 && cents.fract() == 0.5 {
        return format!("{:.2}", cents.ceil() / 100.0);
    }
    format!("{:.2}", value)
}

impl Serialize for UtilizationRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            UtilizationRate::NoBooks => serializer.serialize_u8(0),
            UtilizationRate::Percent(rate) => serializer.serialize_str(rate),
        }
    }
}

/// Counts over the whole inventory and profile collection
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStats {
    pub total_books: usize,
    pub total_users: usize,
    pub available_books: usize,
    pub borrowed_books: usize,
    /// Two-decimal percentage string, or `0` when there are no books
    #[schema(value_type = String, example = "37.50")]
    pub utilization_rate: UtilizationRate,
}
