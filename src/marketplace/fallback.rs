//! Synthetic fallback dataset.
//!
//! Whenever the live marketplace cannot be used, the client hands back a
//! dataset with the same shape a real fetch would produce: a fixed-size
//! listing set and a price list the estimator can chew on. Downstream
//! code never branches on "no data"; it only sees the provenance tag.

use rand::Rng;

use crate::domain::{FetchResult, Provenance, StoreListing};

/// Number of synthetic listings produced per fallback.
pub const SYNTHETIC_LISTING_COUNT: usize = 15;

/// Fixed illustrative price list used for the synthetic estimate.
/// Its trimmed median is exactly 305.00.
pub const SYNTHETIC_PRICES: [f64; SYNTHETIC_LISTING_COUNT] = [
    299.0, 305.0, 310.0, 295.0, 320.0, 298.0, 315.0, 302.0, 308.0, 300.0, 312.0, 304.0, 307.0,
    301.0, 309.0,
];

/// Lower bound (inclusive) of random synthetic listing prices.
const PRICE_FLOOR: f64 = 300.0;
/// Upper bound (exclusive) of random synthetic listing prices.
const PRICE_CEIL: f64 = 320.0;

/// Builds a synthetic [`FetchResult`] for the given search URL.
///
/// Listing prices are uniform in `[300, 320)`; shop names are visibly
/// placeholders; every affiliate link points at the marketplace search
/// page so the listings stay clickable. `reason` records why the live
/// fetch was skipped and is surfaced verbatim to operators.
#[must_use]
pub fn synthetic_result(search_url: &str, reason: String) -> FetchResult {
    let mut rng = rand::thread_rng();
    let listings = (1..=SYNTHETIC_LISTING_COUNT)
        .map(|n| {
            StoreListing::new(
                &format!("Mock Shop {n}"),
                rng.gen_range(PRICE_FLOOR..PRICE_CEIL),
                search_url.to_string(),
            )
        })
        .collect();

    FetchResult {
        prices: SYNTHETIC_PRICES.to_vec(),
        listings,
        provenance: Provenance::Mock,
        fallback_reason: Some(reason),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::estimator::trimmed_median;

    #[test]
    fn produces_exactly_fifteen_listings() {
        let result = synthetic_result("https://s.taobao.com/search?q=x", "unconfigured".to_string());
        assert_eq!(result.listings.len(), SYNTHETIC_LISTING_COUNT);
        assert_eq!(result.prices.len(), SYNTHETIC_LISTING_COUNT);
    }

    #[test]
    fn listing_prices_stay_in_range() {
        let result = synthetic_result("https://s.taobao.com/search?q=x", "unconfigured".to_string());
        for listing in &result.listings {
            assert!(listing.price >= PRICE_FLOOR && listing.price < PRICE_CEIL);
        }
    }

    #[test]
    fn all_links_point_at_the_search_url() {
        let url = "https://s.taobao.com/search?q=%E4%B9%90%E9%AB%98+10246";
        let result = synthetic_result(url, "unconfigured".to_string());
        assert!(result.listings.iter().all(|l| l.affiliate_link == url));
    }

    #[test]
    fn result_is_tagged_synthetic_with_the_reason() {
        let result = synthetic_result("https://s.taobao.com/search?q=x", "timed out".to_string());
        assert_eq!(result.provenance, Provenance::Mock);
        assert_eq!(result.fallback_reason.as_deref(), Some("timed out"));
    }

    #[test]
    fn fixed_price_list_trims_to_305() {
        assert_eq!(trimmed_median(&SYNTHETIC_PRICES), 305.0);
    }

    #[test]
    fn shop_names_are_visibly_placeholders() {
        let result = synthetic_result("https://s.taobao.com/search?q=x", "unconfigured".to_string());
        assert!(result.listings.iter().all(|l| l.shop_name.starts_with("Mock Shop ")));
    }
}
