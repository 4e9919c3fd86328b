//! Order-preserving text encoding for `bigint` columns.
//!
//! SQLite has no integer type wider than 64 bits, so big integers are stored
//! as fixed-width strings whose byte order matches numeric order. Every
//! encoded value is 79 characters long: a sign character followed by 78
//! decimal digits. Non-negative values use `'0'` and their zero-padded value.
//! Negative values use `'-'` and the zero-padded value of `value + 2^255`;
//! since `'-'` sorts before `'0'`, every negative value sorts first.

use indexql_core::{BigInt, Error, Result};

const DIGITS: usize = 78;

/// Length of an encoded value.
pub const ENCODED_LEN: usize = DIGITS + 1;

fn offset() -> BigInt {
    BigInt::from(1) << 255
}

fn max() -> BigInt {
    (BigInt::from(1) << 256) - 1
}

/// Encodes `value`, which must lie in `[-2^255, 2^256 - 1]`.
pub fn encode(value: &BigInt) -> Result<String> {
    if *value >= BigInt::from(0) {
        if *value > max() {
            return Err(Error::type_conversion(
                format!("BigInt({value})"),
                "BIGNUM_TEXT",
            ));
        }

        return Ok(format!("0{:0>width$}", value.to_string(), width = DIGITS));
    }

    let shifted = value + offset();

    if shifted < BigInt::from(0) {
        return Err(Error::type_conversion(
            format!("BigInt({value})"),
            "BIGNUM_TEXT",
        ));
    }

    Ok(format!("-{:0>width$}", shifted.to_string(), width = DIGITS))
}

pub fn decode(encoded: &str) -> Result<BigInt> {
    let invalid = || Error::type_conversion(format!("BIGNUM_TEXT({encoded:?})"), "BigInt");

    if encoded.len() != ENCODED_LEN || !encoded.is_ascii() {
        return Err(invalid());
    }

    let (sign, digits) = encoded.split_at(1);

    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let magnitude: BigInt = digits.parse().map_err(|_| invalid())?;

    match sign {
        "0" => Ok(magnitude),
        "-" => Ok(magnitude - offset()),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(s: &str) -> BigInt {
        s.parse().unwrap()
    }

    #[test]
    fn encodes_fixed_width() {
        assert_eq!(encode(&BigInt::from(0)).unwrap(), format!("0{}", "0".repeat(78)));
        assert_eq!(
            encode(&BigInt::from(42)).unwrap(),
            format!("0{}42", "0".repeat(76))
        );
        assert_eq!(encode(&max()).unwrap().len(), ENCODED_LEN);
        assert_eq!(encode(&-offset()).unwrap(), format!("-{}", "0".repeat(78)));
    }

    #[test]
    fn round_trips_bounds() {
        for value in [
            max(),
            -offset(),
            BigInt::from(-1),
            BigInt::from(0),
            BigInt::from(1),
            big("115792089237316195423570985008687907853269984665640564039457584007913129639935"),
        ] {
            assert_eq!(decode(&encode(&value).unwrap()).unwrap(), value);
        }
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(encode(&(max() + 1)).unwrap_err().is_type_conversion());
        assert!(encode(&(-offset() - 1)).unwrap_err().is_type_conversion());
    }

    #[test]
    fn preserves_order() {
        let values = [
            -offset(),
            big("-1000000000000000000000"),
            BigInt::from(-2),
            BigInt::from(-1),
            BigInt::from(0),
            BigInt::from(1),
            BigInt::from(9),
            BigInt::from(10),
            big("1000000000000000000000"),
            max(),
        ];

        let encoded: Vec<_> = values.iter().map(|v| encode(v).unwrap()).collect();

        for pair in encoded.windows(2) {
            assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn rejects_malformed() {
        assert!(decode("42").unwrap_err().is_type_conversion());
        assert!(decode(&format!("+{}", "0".repeat(78))).is_err());
        assert!(decode(&format!("0{}x", "0".repeat(77))).is_err());
    }
}
