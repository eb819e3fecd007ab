//! Two-stage marketplace price lookup.
//!
//! Stage 1 runs a keyword material search to collect candidate item ids;
//! stage 2 batch-fetches item details for those ids and extracts prices,
//! shop names, and affiliate links. Both stages are signed POST calls to
//! the open-platform gateway. The public entry point never fails: every
//! error path falls over to [`fallback::synthetic_result`] with a reason
//! string that operators can read to diagnose onboarding problems
//! (missing permissions, expired sessions, unapproved adzones).

use std::collections::{BTreeMap, HashMap, HashSet};

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::MarketplaceConfig;
use crate::domain::{FetchResult, SetNumber, StoreListing};
use crate::marketplace::envelope::{self, DetailOutcome, SearchItem, SearchOutcome};
use crate::marketplace::{fallback, sign};

/// Gateway method name for the keyword material search.
const SEARCH_METHOD: &str = "taobao.tbk.dg.material.optional";
/// Gateway method name for the batch item-info lookup.
const DETAIL_METHOD: &str = "taobao.tbk.item.info.get";
/// Search page size; the material search caps at 20 per page.
const SEARCH_PAGE_SIZE: u32 = 20;
/// Category prefix prepended to every search keyword.
const KEYWORD_PREFIX: &str = "乐高";
/// Public marketplace search page, used as the last-resort listing link.
const SEARCH_PAGE_URL: &str = "https://s.taobao.com/search";
/// Shop-name placeholder when no alias field is present.
const UNKNOWN_SHOP: &str = "unknown shop";

/// Signed client for the affiliate open-platform gateway.
///
/// Cheap to clone; holds one pooled [`reqwest::Client`] shared across all
/// refresh requests.
#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    http: reqwest::Client,
    config: MarketplaceConfig,
}

impl MarketplaceClient {
    /// Builds a client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`reqwest::Error`] if the HTTP client cannot
    /// be constructed (TLS backend initialization).
    pub fn new(config: MarketplaceConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    /// Fetches current market prices and listings for a catalog item.
    ///
    /// Infallible by design: configuration gaps, upstream errors, empty
    /// results, parse failures, and network errors all degrade to a
    /// synthetic result tagged with a reason. The fast path for missing
    /// credentials performs no network call at all.
    pub async fn fetch(&self, number: &SetNumber, name_hint: Option<&str>) -> FetchResult {
        let keyword = build_keyword(number, name_hint);
        let search_url = search_page_url(&keyword);

        if !self.config.is_configured() {
            let reason = "marketplace credentials not configured \
                          (TAOBAO_APP_KEY / TAOBAO_APP_SECRET / TAOBAO_ADZONE_ID)"
                .to_string();
            debug!(set_number = %number, "price fetch skipped: {reason}");
            return fallback::synthetic_result(&search_url, reason);
        }

        match self.fetch_live(&keyword, &search_url).await {
            Ok(result) => {
                debug!(
                    set_number = %number,
                    prices = result.prices.len(),
                    listings = result.listings.len(),
                    "live price fetch succeeded"
                );
                result
            }
            Err(reason) => {
                warn!(set_number = %number, %reason, "price fetch fell back to synthetic data");
                fallback::synthetic_result(&search_url, reason)
            }
        }
    }

    /// Runs the two-stage lookup against the live gateway.
    ///
    /// Returns `Err(reason)` for every failure mode; the reason becomes
    /// the synthetic result's `fallback_reason`.
    async fn fetch_live(&self, keyword: &str, search_url: &str) -> Result<FetchResult, String> {
        // Stage 1: keyword search for candidate item ids.
        let search_body = self
            .invoke(
                SEARCH_METHOD,
                [
                    ("q", keyword.to_string()),
                    (
                        "adzone_id",
                        self.config.effective_adzone_id().to_string(),
                    ),
                    ("page_size", SEARCH_PAGE_SIZE.to_string()),
                    ("page_no", "1".to_string()),
                ],
            )
            .await
            .map_err(|e| format!("search request failed: {e}"))?;

        let items = match envelope::normalize_search(&search_body) {
            SearchOutcome::Error(err) => {
                return Err(format!("search rejected upstream: {err}"));
            }
            SearchOutcome::Empty => {
                return Err(format!("search returned no items for keyword \"{keyword}\""));
            }
            SearchOutcome::Items(items) => items,
        };

        // Dedupe ids preserving search order; cap at the detail batch limit.
        let mut seen: HashSet<String> = HashSet::new();
        let mut ids: Vec<String> = Vec::new();
        let mut cached: HashMap<String, SearchItem> = HashMap::new();
        for item in items {
            if ids.len() >= self.config.detail_batch_cap {
                break;
            }
            if seen.insert(item.item_id.clone()) {
                ids.push(item.item_id.clone());
                cached.insert(item.item_id.clone(), item);
            }
        }

        // Stage 2: batch item-info lookup.
        let detail_body = self
            .invoke(DETAIL_METHOD, [("num_iids", ids.join(","))])
            .await
            .map_err(|e| format!("item lookup request failed: {e}"))?;

        let records = match envelope::normalize_detail(&detail_body) {
            DetailOutcome::Error(err) => {
                return Err(format!("item lookup rejected upstream: {err}"));
            }
            DetailOutcome::Empty => {
                return Err("item lookup returned no records".to_string());
            }
            DetailOutcome::Items(records) => records,
        };

        let mut prices: Vec<f64> = Vec::with_capacity(records.len());
        let mut listings: Vec<StoreListing> = Vec::with_capacity(records.len());
        for record in &records {
            let from_search = envelope::record_id(record).and_then(|id| cached.get(&id));

            let price = envelope::extract_price(record);
            if let Some(p) = price {
                if p > 0.0 {
                    prices.push(p);
                }
            }

            let shop_name = envelope::extract_shop_name(record)
                .or_else(|| from_search.and_then(|item| item.title.as_deref()))
                .unwrap_or(UNKNOWN_SHOP);

            let link = envelope::extract_link(record)
                .or_else(|| {
                    from_search
                        .and_then(|item| item.click_url.as_deref())
                        .map(envelope::normalize_link)
                })
                .unwrap_or_else(|| search_url.to_string());

            listings.push(StoreListing::new(shop_name, price.unwrap_or(0.0), link));
        }

        if prices.is_empty() && listings.is_empty() {
            return Err("no price parsed from marketplace response".to_string());
        }

        Ok(FetchResult::live(prices, listings))
    }

    /// Issues one signed POST to the gateway and decodes the JSON body.
    async fn invoke<P>(&self, method: &str, params: P) -> Result<Value, reqwest::Error>
    where
        P: IntoIterator<Item = (&'static str, String)>,
    {
        let mut form: BTreeMap<String, String> = BTreeMap::new();
        form.insert("method".to_string(), method.to_string());
        form.insert("app_key".to_string(), self.config.app_key.clone());
        form.insert("timestamp".to_string(), sign::request_timestamp());
        form.insert("format".to_string(), "json".to_string());
        form.insert("v".to_string(), "2.0".to_string());
        form.insert("sign_method".to_string(), "md5".to_string());
        for (name, value) in params {
            form.insert(name.to_string(), value);
        }

        let signature = sign::sign(&form, &self.config.app_secret);
        form.insert("sign".to_string(), signature);

        self.http
            .post(&self.config.gateway_url)
            .form(&form)
            .send()
            .await?
            .json::<Value>()
            .await
    }
}

/// Builds the search keyword: category prefix, set number with the
/// variant suffix stripped, and the optional display-name hint.
#[must_use]
pub fn build_keyword(number: &SetNumber, name_hint: Option<&str>) -> String {
    let base = format!("{KEYWORD_PREFIX} {}", number.search_base());
    let full = match name_hint {
        Some(name) => format!("{base} {}", name.trim()),
        None => base.clone(),
    };
    let trimmed = full.trim();
    if trimmed.is_empty() {
        base
    } else {
        trimmed.to_string()
    }
}

/// Public marketplace search URL for a keyword; the fallback link target.
#[must_use]
pub fn search_page_url(keyword: &str) -> String {
    url::Url::parse_with_params(SEARCH_PAGE_URL, &[("q", keyword)])
        .map(String::from)
        .unwrap_or_else(|_| SEARCH_PAGE_URL.to_string())
}
