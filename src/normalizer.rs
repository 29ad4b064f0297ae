//! Line tokenization and IP address canonicalization.
//!
//! The Synology auto-block table stores two representations of each address:
//! the raw text as supplied (`IP`, the primary key) and a fixed-width
//! "standard form" (`IPStd`) used for stable comparison. The standard form is
//! the fully-exploded uppercase IPv6 notation; IPv4 addresses are rendered as
//! the low 32 bits of an IPv4-mapped IPv6 address.

use std::net::IpAddr;

/// An address entry ready to be written to the deny store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEntry {
    /// Textual address exactly as supplied by the source.
    pub address: String,
    /// Fixed-width uppercase standard form.
    pub canonical: String,
    /// Absolute expiration as epoch seconds, 0 for never.
    pub expire_at: i64,
}

/// Split fetched source texts into one flat ordered sequence of candidate
/// tokens.
///
/// Texts must be supplied in source order (local files first, then URLs, each
/// in argument order): a later duplicate address overwrites the metadata an
/// earlier one wrote to the store, so the sequence order is part of the
/// contract.
pub fn tokenize<'a>(texts: &[&'a str]) -> Vec<&'a str> {
    texts.iter().flat_map(|text| text.split('\n')).collect()
}

/// Partition candidate tokens into normalized entries and invalid tokens.
///
/// Empty tokens are dropped without being counted. Non-empty tokens that
/// parse as neither IPv4 nor IPv6 land in the invalid list. Both output
/// lists preserve input order.
pub fn normalize(tokens: &[&str], expire_at: i64) -> (Vec<NormalizedEntry>, Vec<String>) {
    let mut entries = Vec::new();
    let mut invalid = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }
        match token.parse::<IpAddr>() {
            Ok(ip) => entries.push(NormalizedEntry {
                address: (*token).to_string(),
                canonical: canonical_form(ip),
                expire_at,
            }),
            Err(_) => invalid.push((*token).to_string()),
        }
    }

    (entries, invalid)
}

/// Standard form of an address: 8 uppercase hextets, no `::` compression.
///
/// Deterministic in the address alone; two runs over the same input always
/// produce the same form.
pub fn canonical_form(ip: IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => {
            let [a, b, c, d] = v4.octets();
            format!("0000:0000:0000:0000:0000:FFFF:{a:02X}{b:02X}:{c:02X}{d:02X}")
        }
        IpAddr::V6(v6) => {
            let groups: Vec<String> = v6.segments().iter().map(|s| format!("{s:04X}")).collect();
            groups.join(":")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_preserves_order() {
        let tokens = tokenize(&["1.1.1.1\n2.2.2.2", "3.3.3.3\n"]);
        assert_eq!(tokens, vec!["1.1.1.1", "2.2.2.2", "3.3.3.3", ""]);
    }

    #[test]
    fn test_tokenize_empty_text() {
        let tokens = tokenize(&[""]);
        assert_eq!(tokens, vec![""]);
    }

    #[test]
    fn test_canonical_form_ipv4() {
        let ip: IpAddr = "1.2.3.4".parse().unwrap();
        assert_eq!(
            canonical_form(ip),
            "0000:0000:0000:0000:0000:FFFF:0102:0304"
        );
    }

    #[test]
    fn test_canonical_form_ipv4_extremes() {
        let zero: IpAddr = "0.0.0.0".parse().unwrap();
        assert_eq!(
            canonical_form(zero),
            "0000:0000:0000:0000:0000:FFFF:0000:0000"
        );
        let broadcast: IpAddr = "255.255.255.255".parse().unwrap();
        assert_eq!(
            canonical_form(broadcast),
            "0000:0000:0000:0000:0000:FFFF:FFFF:FFFF"
        );
    }

    #[test]
    fn test_canonical_form_ipv6_loopback() {
        let ip: IpAddr = "::1".parse().unwrap();
        assert_eq!(
            canonical_form(ip),
            "0000:0000:0000:0000:0000:0000:0000:0001"
        );
    }

    #[test]
    fn test_canonical_form_ipv6_compressed() {
        let ip: IpAddr = "2001:db8::8a2e:370:7334".parse().unwrap();
        assert_eq!(
            canonical_form(ip),
            "2001:0DB8:0000:0000:0000:8A2E:0370:7334"
        );
    }

    #[test]
    fn test_canonical_form_ipv6_idempotent() {
        let exploded = "2001:0DB8:0000:0000:0000:8A2E:0370:7334";
        let ip: IpAddr = exploded.parse().unwrap();
        assert_eq!(canonical_form(ip), exploded);
    }

    #[test]
    fn test_normalize_mixed_source_lines() {
        let tokens = tokenize(&["1.2.3.4\n::1\nbogus\n"]);
        let (entries, invalid) = normalize(&tokens, 0);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].address, "1.2.3.4");
        assert_eq!(
            entries[0].canonical,
            "0000:0000:0000:0000:0000:FFFF:0102:0304"
        );
        assert_eq!(entries[0].expire_at, 0);
        assert_eq!(entries[1].address, "::1");
        assert_eq!(
            entries[1].canonical,
            "0000:0000:0000:0000:0000:0000:0000:0001"
        );
        assert_eq!(invalid, vec!["bogus".to_string()]);
    }

    #[test]
    fn test_normalize_empty_tokens_dropped_silently() {
        let (entries, invalid) = normalize(&["", "", ""], 0);
        assert!(entries.is_empty());
        assert!(invalid.is_empty());
    }

    #[test]
    fn test_normalize_out_of_range_octet_is_invalid() {
        let (entries, invalid) = normalize(&["999.999.999.999"], 0);
        assert!(entries.is_empty());
        assert_eq!(invalid, vec!["999.999.999.999".to_string()]);
    }

    #[test]
    fn test_normalize_whitespace_not_trimmed() {
        // A padded address is not a valid token; sources are expected to be
        // one bare address per line.
        let (entries, invalid) = normalize(&[" 1.2.3.4"], 0);
        assert!(entries.is_empty());
        assert_eq!(invalid.len(), 1);
    }

    #[test]
    fn test_normalize_stable_partition() {
        let tokens = ["1.1.1.1", "junk", "2.2.2.2", "more-junk", "::2"];
        let (entries, invalid) = normalize(&tokens, 0);
        let addresses: Vec<&str> = entries.iter().map(|e| e.address.as_str()).collect();
        assert_eq!(addresses, vec!["1.1.1.1", "2.2.2.2", "::2"]);
        assert_eq!(invalid, vec!["junk".to_string(), "more-junk".to_string()]);
    }

    #[test]
    fn test_normalize_applies_expiry_uniformly() {
        let (entries, _) = normalize(&["1.1.1.1", "8.8.8.8", "::1"], 1_700_086_400);
        assert!(entries.iter().all(|e| e.expire_at == 1_700_086_400));
    }
}
