//! Price-history parsing and appending.
//!
//! The history lives in a JSONB column rather than its own table, so the
//! database enforces no shape on it. Stored values may be NULL, non-array
//! JSON, or arrays holding legacy elements with string prices
//! (`"305.00"`) or missing fields. Every read re-validates element by
//! element instead of trusting the column.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// One observation in a catalog item's price time series.
///
/// Ordering within a history is insertion order, not date order, and
/// duplicate dates are allowed: each refresh appends, it never replaces a
/// same-day entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PricePoint {
    /// Calendar day of the observation, `YYYY-MM-DD`.
    pub date: String,
    /// Estimated price on that day.
    pub price: f64,
}

/// Parses a stored history value into clean [`PricePoint`]s.
///
/// `None`, JSON null, and any non-array value all yield an empty history.
/// Array elements survive only when they are objects with a string `date`
/// and a `price` coercible to a finite number, either a native number or
/// a numeric string such as `"305.00"`. Everything else is dropped.
#[must_use]
pub fn parse_price_history(stored: Option<&Value>) -> Vec<PricePoint> {
    let Some(Value::Array(items)) = stored else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let date = item.get("date")?.as_str()?;
            let price = coerce_price(item.get("price")?)?;
            Some(PricePoint {
                date: date.to_string(),
                price,
            })
        })
        .collect()
}

/// Parses the stored history and appends one new point for the current
/// UTC calendar day.
///
/// The returned vector is a full replacement for the stored column value,
/// not a patch.
#[must_use]
pub fn merge_price_point(stored: Option<&Value>, price: f64) -> Vec<PricePoint> {
    let mut history = parse_price_history(stored);
    history.push(PricePoint {
        date: today(),
        price,
    });
    history
}

/// Current UTC calendar day as `YYYY-MM-DD`.
#[must_use]
pub fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Coerces a JSON price value to a finite `f64`, accepting native numbers
/// and numeric strings.
fn coerce_price(value: &Value) -> Option<f64> {
    let price = value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))?;
    price.is_finite().then_some(price)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_history_yields_only_the_new_point() {
        let merged = merge_price_point(None, 305.0);
        assert_eq!(merged.len(), 1);
        let Some(point) = merged.first() else {
            panic!("expected one point");
        };
        assert_eq!(point.price, 305.0);
        assert_eq!(point.date, today());
    }

    #[test]
    fn null_history_yields_only_the_new_point() {
        let merged = merge_price_point(Some(&Value::Null), 305.0);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn non_array_history_is_rejected_wholesale() {
        assert!(parse_price_history(Some(&json!(305.0))).is_empty());
        assert!(parse_price_history(Some(&json!({"date": "2024-01-01", "price": 305.0}))).is_empty());
        assert!(parse_price_history(Some(&json!("corrupt"))).is_empty());
    }

    #[test]
    fn malformed_elements_are_dropped_valid_ones_kept() {
        let stored = json!([
            {"date": "2024-01-01", "price": "305.00"},
            {"date": "x", "price": "bad"},
            42
        ]);
        let merged = merge_price_point(Some(&stored), 310.0);

        assert_eq!(merged.len(), 2);
        let Some(first) = merged.first() else {
            panic!("expected kept point");
        };
        assert_eq!(first.date, "2024-01-01");
        assert_eq!(first.price, 305.0);
        let Some(last) = merged.last() else {
            panic!("expected appended point");
        };
        assert_eq!(last.price, 310.0);
    }

    #[test]
    fn numeric_strings_and_native_numbers_both_coerce() {
        let stored = json!([
            {"date": "2024-01-01", "price": 299.0},
            {"date": "2024-01-02", "price": "301.50"}
        ]);
        let history = parse_price_history(Some(&stored));
        assert_eq!(history.len(), 2);
        assert_eq!(history.iter().map(|p| p.price).sum::<f64>(), 600.5);
    }

    #[test]
    fn missing_date_or_price_fields_drop_the_element() {
        let stored = json!([
            {"price": 299.0},
            {"date": "2024-01-02"},
            {"date": 20240103, "price": 300.0}
        ]);
        assert!(parse_price_history(Some(&stored)).is_empty());
    }

    #[test]
    fn insertion_order_is_preserved_and_duplicate_dates_allowed() {
        let stored = json!([
            {"date": "2024-02-01", "price": 310.0},
            {"date": "2024-01-01", "price": 305.0},
            {"date": "2024-01-01", "price": 306.0}
        ]);
        let history = parse_price_history(Some(&stored));
        let dates: Vec<&str> = history.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-02-01", "2024-01-01", "2024-01-01"]);
    }
}
