//! Marketplace response-shape normalization.
//!
//! The gateway has shipped several response envelopes over time: the
//! search result list is nested two levels deep under a method-named key,
//! the item-info results have appeared both as a direct array and wrapped
//! in an `n_tbk_item` sub-field, and item records alias the same logical
//! field under multiple names. Each known shape is probed in priority
//! order here, once, so the client never chains optionals ad hoc.

use std::fmt;

use serde_json::Value;

/// Structured upstream error extracted from an `error_response` envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamError {
    /// Error code; the sub-code is preferred when present, as the
    /// top-level code is usually just a category.
    pub code: String,
    /// Human-readable message.
    pub msg: String,
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.msg)
    }
}

/// Normalized outcome of a material-search response.
#[derive(Debug)]
pub enum SearchOutcome {
    /// Top-level error envelope.
    Error(UpstreamError),
    /// Parsed successfully but no usable result items.
    Empty,
    /// At least one item with a usable identifier.
    Items(Vec<SearchItem>),
}

/// One item from the search stage; carries the fields the detail stage
/// may need as fallbacks.
#[derive(Debug, Clone)]
pub struct SearchItem {
    /// Item identifier (`item_id`, or legacy `num_iid`).
    pub item_id: String,
    /// Listing title, cached as a shop-name fallback.
    pub title: Option<String>,
    /// Click-tracking URL, cached as an affiliate-link fallback.
    pub click_url: Option<String>,
}

/// Normalized outcome of an item-info response.
#[derive(Debug)]
pub enum DetailOutcome {
    /// Top-level error envelope.
    Error(UpstreamError),
    /// Parsed successfully but no item records.
    Empty,
    /// Raw item records for field extraction.
    Items(Vec<Value>),
}

/// Probes a search response body.
#[must_use]
pub fn normalize_search(body: &Value) -> SearchOutcome {
    if let Some(err) = upstream_error(body) {
        return SearchOutcome::Error(err);
    }

    let list = body
        .get("tbk_dg_material_optional_response")
        .and_then(|r| r.get("result_list"))
        .and_then(|r| r.get("map_data"))
        .or_else(|| body.get("result_list").and_then(|r| r.get("map_data")))
        .and_then(Value::as_array);

    let items: Vec<SearchItem> = list
        .map(|values| values.iter().filter_map(parse_search_item).collect())
        .unwrap_or_default();

    if items.is_empty() {
        SearchOutcome::Empty
    } else {
        SearchOutcome::Items(items)
    }
}

/// Probes an item-info response body.
#[must_use]
pub fn normalize_detail(body: &Value) -> DetailOutcome {
    if let Some(err) = upstream_error(body) {
        return DetailOutcome::Error(err);
    }

    let results = body
        .get("tbk_item_info_get_response")
        .and_then(|r| r.get("results"))
        .or_else(|| body.get("results"));

    let items = match results {
        Some(Value::Array(values)) => Some(values),
        Some(other) => other.get("n_tbk_item").and_then(Value::as_array),
        None => None,
    };

    match items {
        Some(values) if !values.is_empty() => DetailOutcome::Items(values.clone()),
        _ => DetailOutcome::Empty,
    }
}

/// Item identifier from a detail record, matching the id scheme the
/// search stage produced.
#[must_use]
pub fn record_id(record: &Value) -> Option<String> {
    id_string(record.get("item_id")).or_else(|| id_string(record.get("num_iid")))
}

/// Price from a detail record: discounted final price first, then the
/// reserve (listed) price, then a generic price field. Accepts numbers
/// and numeric strings.
#[must_use]
pub fn extract_price(record: &Value) -> Option<f64> {
    ["zk_final_price", "reserve_price", "price"]
        .iter()
        .find_map(|field| record.get(*field).and_then(coerce_number))
}

/// Shop name from a detail record, trying each known alias.
#[must_use]
pub fn extract_shop_name(record: &Value) -> Option<&str> {
    ["shop_title", "nick", "title"]
        .iter()
        .find_map(|field| record.get(*field).and_then(Value::as_str))
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Clickable link from a detail record: coupon share URL first, then the
/// generic promotional URL.
#[must_use]
pub fn extract_link(record: &Value) -> Option<String> {
    ["coupon_share_url", "url"]
        .iter()
        .find_map(|field| record.get(*field).and_then(Value::as_str))
        .filter(|link| !link.trim().is_empty())
        .map(normalize_link)
}

/// Prefixes protocol-relative links (`//uland.taobao.com/...`) with
/// `https:`; the gateway returns these verbatim.
#[must_use]
pub fn normalize_link(raw: &str) -> String {
    if raw.starts_with("//") {
        format!("https:{raw}")
    } else {
        raw.to_string()
    }
}

fn upstream_error(body: &Value) -> Option<UpstreamError> {
    let err = body.get("error_response")?;
    let code = err
        .get("sub_code")
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .or_else(|| err.get("code").map(compact))
        .unwrap_or_else(|| "unknown".to_string());
    let msg = err
        .get("sub_msg")
        .or_else(|| err.get("msg"))
        .and_then(Value::as_str)
        .unwrap_or("unspecified upstream error")
        .to_string();
    Some(UpstreamError { code, msg })
}

fn parse_search_item(value: &Value) -> Option<SearchItem> {
    let item_id = record_id(value)?;
    Some(SearchItem {
        item_id,
        title: value
            .get("title")
            .and_then(Value::as_str)
            .map(ToString::to_string),
        click_url: value
            .get("click_url")
            .and_then(Value::as_str)
            .map(ToString::to_string),
    })
}

/// Identifier as a string; numbers stringified, blank strings rejected.
fn id_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Numeric coercion accepting native numbers and numeric strings.
fn coerce_number(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .filter(|n| n.is_finite())
}

fn compact(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
