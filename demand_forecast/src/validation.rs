//! Ledger schema validation

use crate::error::{ForecastError, Result};
use crate::ledger::SalesLedger;
use std::collections::BTreeSet;

/// Calendar date of the sale
pub const DATE: &str = "date";
/// Store key column
pub const STORE_ID: &str = "store_id";
/// Item key column
pub const ITEM_ID: &str = "item_id";
/// Units sold column
pub const SALES: &str = "sales";

/// Columns every ledger must carry
pub const REQUIRED_COLUMNS: [&str; 4] = [DATE, STORE_ID, ITEM_ID, SALES];

/// Check that the ledger has every required column.
///
/// Only presence is checked; value types are left to feature construction.
pub fn validate(ledger: &SalesLedger) -> Result<()> {
    let present: BTreeSet<String> = ledger.column_names().into_iter().collect();
    let missing = missing_columns(&present);

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ForecastError::missing_columns(missing))
    }
}

/// Required columns absent from `present`
pub fn missing_columns(present: &BTreeSet<String>) -> BTreeSet<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|name| !present.contains(**name))
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_ignores_extras() {
        let present: BTreeSet<String> = ["date", "sales", "promo"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let missing = missing_columns(&present);
        assert_eq!(
            missing.into_iter().collect::<Vec<_>>(),
            vec!["item_id".to_string(), "store_id".to_string()]
        );
    }

    #[test]
    fn test_column_names_are_case_sensitive() {
        let present: BTreeSet<String> = ["Date", "store_id", "item_id", "sales"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert!(missing_columns(&present).contains("date"));
    }
}
