use alloy::primitives::{Address, B256, U256};
use sea_orm::prelude::BigDecimal;
use std::str::FromStr;

pub fn u256_to_decimal(n: U256) -> BigDecimal {
    BigDecimal::from_str(&n.to_string()).unwrap()
}

/// `bigint` form of a block number, timestamp or index. Explorer values are range-checked
/// when decoded, anything larger is clamped.
pub fn u64_to_db(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

pub fn decimal_to_u256(n: &BigDecimal) -> U256 {
    U256::from_str(&n.with_scale(0).to_string()).unwrap_or_default()
}

pub fn address_from_db(b: &[u8]) -> Address {
    if b.len() == 20 {
        Address::from_slice(b)
    } else {
        Address::ZERO
    }
}

pub fn b256_from_db(b: &[u8]) -> B256 {
    if b.len() == 32 {
        B256::from_slice(b)
    } else {
        B256::ZERO
    }
}

/// Stored form of the operation outcome: `"1"` for success, `"0"` for failure.
pub fn success_marker(success: bool) -> String {
    if success { "1" } else { "0" }.to_string()
}

pub fn is_success_marker(marker: &str) -> bool {
    marker != "0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_u256_to_decimal() {
        assert_eq!(u256_to_decimal(U256::from(0)), BigDecimal::from(0));
        assert_eq!(u256_to_decimal(U256::from(1000)), BigDecimal::from(1000));
        assert_eq!(
            u256_to_decimal(U256::MAX).to_string(),
            "115792089237316195423570985008687907853269984665640564039457584007913129639935"
        );
    }

    #[test]
    fn test_decimal_to_u256() {
        assert_eq!(decimal_to_u256(&BigDecimal::from(0)), U256::ZERO);
        assert_eq!(decimal_to_u256(&u256_to_decimal(U256::MAX)), U256::MAX);
        assert_eq!(
            decimal_to_u256(&BigDecimal::from_str("12345.000").unwrap()),
            U256::from(12345)
        );
    }

    #[test]
    fn test_u64_to_db() {
        assert_eq!(u64_to_db(100), 100);
        assert_eq!(u64_to_db(i64::MAX as u64), i64::MAX);
        assert_eq!(u64_to_db(u64::MAX), i64::MAX);
    }

    #[test]
    fn test_success_marker() {
        assert_eq!(success_marker(true), "1");
        assert_eq!(success_marker(false), "0");
        assert!(is_success_marker("1"));
        assert!(!is_success_marker("0"));
    }

    #[test]
    fn malformed_db_bytes_map_to_zero() {
        assert_eq!(address_from_db(&[1, 2, 3]), Address::ZERO);
        assert_eq!(b256_from_db(&[0xff; 32]), B256::repeat_byte(0xff));
    }
}
