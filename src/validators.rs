//! Syntactic validation of network address ranges
//!
//! The policy compiler only ever checks the *shape* of a CIDR string before
//! handing it to ufw. Octet values and prefix lengths are not range-checked:
//! `999.999.999.999/99` passes, and ufw itself rejects it at apply time.
//! Tightening this would change which inputs are accepted versus passed
//! through, so the permissive contract is kept on purpose.

/// Address family reported for a syntactically valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    V4,
    V6,
}

/// Classifies a candidate network range string.
///
/// Accepted forms:
/// - IPv4: four dot-separated groups of 1-3 decimal digits, `/`, 1-2 digit
///   prefix length.
/// - IPv6: one or more hexadecimal digits and colons, `/`, 1-3 digit prefix
///   length. Deliberately loose; some invalid addresses pass.
///
/// Returns `None` for anything else. Callers skip invalid ranges with a
/// warning and continue the run.
///
/// # Examples
///
/// ```
/// use rufw::validators::{validate_range, AddressKind};
///
/// assert_eq!(validate_range("192.168.1.0/24"), Some(AddressKind::V4));
/// assert_eq!(validate_range("fd00::/8"), Some(AddressKind::V6));
/// assert_eq!(validate_range("192.168.1/24"), None);
/// ```
pub fn validate_range(range: &str) -> Option<AddressKind> {
    let (addr, prefix) = range.split_once('/')?;

    if is_ipv4_address(addr) && is_decimal_run(prefix, 1, 2) {
        return Some(AddressKind::V4);
    }

    if !addr.is_empty()
        && addr.chars().all(|c| c.is_ascii_hexdigit() || c == ':')
        && is_decimal_run(prefix, 1, 3)
    {
        return Some(AddressKind::V6);
    }

    None
}

/// Four dot-separated groups of 1-3 decimal digits. No value range check.
fn is_ipv4_address(addr: &str) -> bool {
    let mut groups = 0;
    for group in addr.split('.') {
        if !is_decimal_run(group, 1, 3) {
            return false;
        }
        groups += 1;
    }
    groups == 4
}

fn is_decimal_run(s: &str, min_len: usize, max_len: usize) -> bool {
    (min_len..=max_len).contains(&s.len()) && s.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ipv4_ranges() {
        assert_eq!(validate_range("192.168.1.0/24"), Some(AddressKind::V4));
        assert_eq!(validate_range("10.0.0.0/8"), Some(AddressKind::V4));
        assert_eq!(validate_range("172.16.0.0/12"), Some(AddressKind::V4));
        assert_eq!(validate_range("1.2.3.4/32"), Some(AddressKind::V4));
    }

    #[test]
    fn test_ipv4_no_numeric_range_check() {
        // Documented permissiveness: shape-only validation, ufw rejects
        // out-of-range values itself.
        assert_eq!(validate_range("999.999.999.999/99"), Some(AddressKind::V4));
        assert_eq!(validate_range("256.0.0.1/33"), Some(AddressKind::V4));
    }

    #[test]
    fn test_valid_ipv6_ranges() {
        assert_eq!(validate_range("fd00::/8"), Some(AddressKind::V6));
        assert_eq!(validate_range("2001:db8::/32"), Some(AddressKind::V6));
        assert_eq!(validate_range("fe80::1/128"), Some(AddressKind::V6));
        assert_eq!(validate_range("::/0"), Some(AddressKind::V6));
    }

    #[test]
    fn test_ipv6_prefix_length_digits() {
        assert_eq!(validate_range("fd00::/128"), Some(AddressKind::V6));
        assert_eq!(validate_range("fd00::/1234"), None);
    }

    #[test]
    fn test_missing_octet_is_invalid() {
        assert_eq!(validate_range("192.168.1/24"), None);
        assert_eq!(validate_range("192.168.1.0.5/24"), None);
    }

    #[test]
    fn test_missing_prefix_is_invalid() {
        assert_eq!(validate_range("192.168.1.0"), None);
        assert_eq!(validate_range("192.168.1.0/"), None);
        assert_eq!(validate_range("fd00::"), None);
    }

    #[test]
    fn test_ipv4_three_digit_prefix_is_invalid() {
        // The dots disqualify it from the IPv6 form too.
        assert_eq!(validate_range("10.0.0.0/128"), None);
    }

    #[test]
    fn test_garbage_is_invalid() {
        assert_eq!(validate_range(""), None);
        assert_eq!(validate_range("/24"), None);
        assert_eq!(validate_range("not a network"), None);
        assert_eq!(validate_range("10.0.0.0/2x"), None);
        assert_eq!(validate_range("fd0g::/8"), None);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_ipv4_shape_always_valid(
            a in "[0-9]{1,3}",
            b in "[0-9]{1,3}",
            c in "[0-9]{1,3}",
            d in "[0-9]{1,3}",
            prefix in "[0-9]{1,2}",
        ) {
            let range = format!("{a}.{b}.{c}.{d}/{prefix}");
            prop_assert_eq!(validate_range(&range), Some(AddressKind::V4));
        }

        #[test]
        fn test_ipv6_shape_always_valid(
            addr in "[0-9a-fA-F:]{1,40}",
            prefix in "[0-9]{1,3}",
        ) {
            let range = format!("{addr}/{prefix}");
            // No dots can appear here, so the IPv4 branch never claims it.
            prop_assert!(validate_range(&range).is_some());
        }

        #[test]
        fn test_no_slash_never_validates(addr in "[0-9a-fA-F:.]{0,40}") {
            prop_assert_eq!(validate_range(&addr), None);
        }
    }
}
