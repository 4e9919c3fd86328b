//! Binary wire format of PostgreSQL `NUMERIC` values, restricted to
//! integers.
//!
//! The format is a header of four 16-bit fields (digit count, weight, sign,
//! display scale) followed by base-10000 digits, most significant first. The
//! value is `sum(digit[i] * 10000^(weight - i))`.

use indexql_core::{BigInt, Error};
use std::error::Error as StdError;
use tokio_postgres::types::{accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type};

const SIGN_POS: u16 = 0x0000;
const SIGN_NEG: u16 = 0x4000;

/// An integral `NUMERIC` value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Numeric(pub(crate) BigInt);

impl Numeric {
    fn to_base_10000(&self) -> (bool, Vec<i16>, i16) {
        let zero = BigInt::from(0);
        let negative = self.0 < zero;
        let decimal = if negative {
            (-self.0.clone()).to_string()
        } else {
            self.0.to_string()
        };

        if self.0 == zero {
            return (false, vec![], 0);
        }

        let pad = (4 - decimal.len() % 4) % 4;
        let padded = format!("{}{decimal}", "0".repeat(pad));

        let mut digits: Vec<i16> = padded
            .as_bytes()
            .chunks(4)
            .map(|chunk| {
                chunk
                    .iter()
                    .fold(0i16, |acc, b| acc * 10 + i16::from(b - b'0'))
            })
            .collect();

        let weight = digits.len() as i16 - 1;

        while digits.last() == Some(&0) {
            digits.pop();
        }

        (negative, digits, weight)
    }
}

impl ToSql for Numeric {
    fn to_sql(&self, _ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        let (negative, digits, weight) = self.to_base_10000();

        out.extend_from_slice(&(digits.len() as i16).to_be_bytes());
        out.extend_from_slice(&weight.to_be_bytes());
        out.extend_from_slice(&if negative { SIGN_NEG } else { SIGN_POS }.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());

        for digit in digits {
            out.extend_from_slice(&digit.to_be_bytes());
        }

        Ok(IsNull::No)
    }

    accepts!(NUMERIC);
    to_sql_checked!();
}

impl<'a> FromSql<'a> for Numeric {
    fn from_sql(_ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        let invalid = || -> Box<dyn StdError + Sync + Send> {
            Box::new(Error::type_conversion("NUMERIC", "BigInt"))
        };

        let field = |i: usize| -> Option<[u8; 2]> { raw.get(i * 2..i * 2 + 2)?.try_into().ok() };

        let (Some(ndigits), Some(weight), Some(sign)) = (field(0), field(1), field(2)) else {
            return Err(invalid());
        };

        let ndigits = i16::from_be_bytes(ndigits);
        let weight = i16::from_be_bytes(weight);
        let sign = u16::from_be_bytes(sign);

        if ndigits < 0 || (sign != SIGN_POS && sign != SIGN_NEG) {
            return Err(invalid());
        }

        let mut decimal = String::with_capacity(ndigits as usize * 4 + 1);

        for i in 0..ndigits {
            let digit = field(4 + i as usize).map(i16::from_be_bytes).ok_or_else(invalid)?;

            if !(0..10000).contains(&digit) {
                return Err(invalid());
            }

            if weight - i < 0 {
                // Integral values have no digits after the decimal point.
                if digit != 0 {
                    return Err(invalid());
                }
                continue;
            }

            decimal.push_str(&format!("{digit:04}"));
        }

        let trailing = i32::from(weight) + 1 - i32::from(ndigits);
        if trailing > 0 {
            decimal.push_str(&"0000".repeat(trailing as usize));
        }

        if decimal.is_empty() {
            return Ok(Numeric(BigInt::from(0)));
        }

        let magnitude: BigInt = decimal.parse().map_err(|_| invalid())?;

        Ok(Numeric(if sign == SIGN_NEG {
            -magnitude
        } else {
            magnitude
        }))
    }

    accepts!(NUMERIC);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: &str) -> Vec<u8> {
        let mut out = BytesMut::new();
        Numeric(value.parse().unwrap())
            .to_sql(&Type::NUMERIC, &mut out)
            .unwrap();
        out.to_vec()
    }

    fn decode(raw: &[u8]) -> String {
        Numeric::from_sql(&Type::NUMERIC, raw).unwrap().0.to_string()
    }

    #[test]
    fn encodes_base_10000() {
        // 12345678 = 1234 * 10000 + 5678
        assert_eq!(
            encode("12345678"),
            [0, 2, 0, 1, 0, 0, 0, 0, 0x04, 0xd2, 0x16, 0x2e]
        );
        // trailing zero groups are dropped, the weight keeps the magnitude
        assert_eq!(encode("-100000000"), [0, 1, 0, 2, 0x40, 0, 0, 0, 0, 1]);
        assert_eq!(encode("0"), [0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn round_trips() {
        for value in [
            "0",
            "1",
            "-1",
            "10000",
            "-100000000",
            "115792089237316195423570985008687907853269984665640564039457584007913129639935",
            "-57896044618658097711785492504343953926634992332820282019728792003956564819968",
        ] {
            assert_eq!(decode(&encode(value)), value);
        }
    }

    #[test]
    fn rejects_fractions_and_nan() {
        // 1.5: ndigits 2, weight 0, dscale 1, digits [1, 5000]
        let fraction = [0, 2, 0, 0, 0, 0, 0, 1, 0, 1, 0x13, 0x88];
        assert!(Numeric::from_sql(&Type::NUMERIC, &fraction).is_err());

        let nan = [0, 0, 0, 0, 0xc0, 0, 0, 0];
        assert!(Numeric::from_sql(&Type::NUMERIC, &nan).is_err());
    }

    #[test]
    fn decodes_scaled_integer() {
        // 2.0 with dscale 1: digits [2, 0]
        let scaled = [0, 2, 0, 0, 0, 0, 0, 1, 0, 2, 0, 0];
        assert_eq!(decode(&scaled), "2");
    }
}
