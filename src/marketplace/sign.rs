//! Open-platform request signing.
//!
//! The gateway authenticates calls with an MD5 digest over the request
//! parameters: names sorted ascending (byte order), each name concatenated
//! directly with its value, the whole wrapped in the shared secret on both
//! sides, digested, and rendered as uppercase hex. The digest must be
//! bit-exact or the gateway rejects the call with a signature error.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::Utc;
use md5::{Digest, Md5};

/// Timestamp format the gateway expects, rendered in UTC+8 (China
/// Standard Time) regardless of the host timezone.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Computes the `sign` parameter for a request.
///
/// `params` must hold every parameter that will be transmitted except
/// `sign` itself. A [`BTreeMap`] is used so iteration is already in the
/// ascending byte order the protocol requires.
#[must_use]
pub fn sign(params: &BTreeMap<String, String>, secret: &str) -> String {
    let mut payload = String::with_capacity(
        secret.len() * 2
            + params
                .iter()
                .map(|(name, value)| name.len() + value.len())
                .sum::<usize>(),
    );
    payload.push_str(secret);
    for (name, value) in params {
        payload.push_str(name);
        payload.push_str(value);
    }
    payload.push_str(secret);

    let digest = Md5::digest(payload.as_bytes());
    let mut hex = String::with_capacity(32);
    for byte in digest {
        let _ = write!(hex, "{byte:02X}");
    }
    hex
}

/// Current time as the gateway's `timestamp` parameter value.
#[must_use]
pub fn request_timestamp() -> String {
    (Utc::now() + chrono::Duration::hours(8))
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn empty_input_matches_the_known_md5_vector() {
        // secret + "" + secret with an empty secret digests the empty string.
        assert_eq!(
            sign(&BTreeMap::new(), ""),
            "D41D8CD98F00B204E9800998ECF8427E"
        );
    }

    #[test]
    fn signature_is_32_uppercase_hex_chars() {
        let signature = sign(&params(&[("method", "a.b.c"), ("v", "2.0")]), "secret");
        assert_eq!(signature.len(), 32);
        assert!(signature
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn signing_is_deterministic() {
        let map = params(&[("app_key", "12345"), ("q", "乐高 10246")]);
        assert_eq!(sign(&map, "secret"), sign(&map, "secret"));
    }

    #[test]
    fn insertion_order_does_not_affect_the_signature() {
        let mut forward = BTreeMap::new();
        forward.insert("a".to_string(), "1".to_string());
        forward.insert("b".to_string(), "2".to_string());
        forward.insert("c".to_string(), "3".to_string());

        let mut reverse = BTreeMap::new();
        reverse.insert("c".to_string(), "3".to_string());
        reverse.insert("b".to_string(), "2".to_string());
        reverse.insert("a".to_string(), "1".to_string());

        assert_eq!(sign(&forward, "s"), sign(&reverse, "s"));
    }

    #[test]
    fn changing_any_value_changes_the_signature() {
        let base = params(&[("app_key", "12345"), ("q", "乐高 10246")]);
        let changed_value = params(&[("app_key", "12345"), ("q", "乐高 10247")]);
        let changed_secret = sign(&base, "other");

        assert_ne!(sign(&base, "secret"), sign(&changed_value, "secret"));
        assert_ne!(sign(&base, "secret"), changed_secret);
    }

    #[test]
    fn timestamp_has_the_gateway_format() {
        let ts = request_timestamp();
        // yyyy-MM-dd HH:mm:ss
        assert_eq!(ts.len(), 19);
        assert_eq!(ts.as_bytes().get(4), Some(&b'-'));
        assert_eq!(ts.as_bytes().get(10), Some(&b' '));
        assert_eq!(ts.as_bytes().get(13), Some(&b':'));
    }
}
