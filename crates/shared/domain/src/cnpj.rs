//! CNPJ value object - Brazilian company tax identifier.
//!
//! A `Cnpj` can only be obtained through parsing, so every instance holds
//! exactly 14 ASCII digits that pass the two-stage mod-11 checksum.
//! Equality and hashing use the normalized digits; punctuation is cosmetic.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{CNPJ_BASE_LENGTH, CNPJ_LENGTH};

const FIRST_CHECK_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const SECOND_CHECK_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Reasons a raw string is not a valid CNPJ.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CnpjError {
    /// Input is empty, has the wrong number of digits, or repeats one digit
    #[error("{0}")]
    InvalidFormat(String),

    /// Check digits do not match the first twelve digits
    #[error("check digits do not match")]
    InvalidChecksum,
}

/// Validated CNPJ, stored as its 14 normalized digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cnpj {
    digits: String,
}

impl Cnpj {
    /// Parse a CNPJ, ignoring every non-digit character.
    ///
    /// Both `"01775634000189"` and `"01.775.634/0001-89"` yield the same value.
    ///
    /// # Errors
    /// Returns `InvalidFormat` for blank input, a digit count other than 14 or
    /// fourteen identical digits, and `InvalidChecksum` when either check digit
    /// is wrong.
    pub fn parse(raw: &str) -> Result<Self, CnpjError> {
        if raw.trim().is_empty() {
            return Err(CnpjError::InvalidFormat(
                "CNPJ must not be empty".to_string(),
            ));
        }

        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

        if digits.len() != CNPJ_LENGTH {
            return Err(CnpjError::InvalidFormat(format!(
                "CNPJ must have {} digits, got {}",
                CNPJ_LENGTH,
                digits.len()
            )));
        }

        let values: Vec<u8> = digits.bytes().map(|b| b - b'0').collect();

        if values.iter().all(|&d| d == values[0]) {
            return Err(CnpjError::InvalidFormat(
                "CNPJ digits must not all be identical".to_string(),
            ));
        }

        let mut base = [0u8; CNPJ_BASE_LENGTH];
        base.copy_from_slice(&values[..CNPJ_BASE_LENGTH]);
        let (first, second) = Self::check_digits(&base);

        if values[12] != first || values[13] != second {
            return Err(CnpjError::InvalidChecksum);
        }

        Ok(Self { digits })
    }

    /// Non-failing variant of [`Cnpj::parse`].
    pub fn try_parse(raw: &str) -> Option<Self> {
        Self::parse(raw).ok()
    }

    /// Compute both check digits for the first twelve digit values (0-9).
    pub fn check_digits(base: &[u8; CNPJ_BASE_LENGTH]) -> (u8, u8) {
        let first = check_digit(base, &FIRST_CHECK_WEIGHTS);

        let mut extended = [0u8; CNPJ_BASE_LENGTH + 1];
        extended[..CNPJ_BASE_LENGTH].copy_from_slice(base);
        extended[CNPJ_BASE_LENGTH] = first;
        let second = check_digit(&extended, &SECOND_CHECK_WEIGHTS);

        (first, second)
    }

    /// Raw 14-digit form, e.g. `01775634000189`.
    pub fn as_str(&self) -> &str {
        &self.digits
    }

    /// Canonical display form, e.g. `01.775.634/0001-89`.
    pub fn formatted(&self) -> String {
        let d = &self.digits;
        format!(
            "{}.{}.{}/{}-{}",
            &d[0..2],
            &d[2..5],
            &d[5..8],
            &d[8..12],
            &d[12..14]
        )
    }
}

fn check_digit(digits: &[u8], weights: &[u32]) -> u8 {
    let sum: u32 = digits
        .iter()
        .zip(weights)
        .map(|(&d, &w)| u32::from(d) * w)
        .sum();

    let remainder = sum % 11;
    if remainder < 2 {
        0
    } else {
        (11 - remainder) as u8
    }
}

impl fmt::Display for Cnpj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl FromStr for Cnpj {
    type Err = CnpjError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Cnpj {
    type Error = CnpjError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Cnpj {
    type Error = CnpjError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Cnpj> for String {
    fn from(cnpj: Cnpj) -> Self {
        cnpj.digits
    }
}

impl AsRef<str> for Cnpj {
    fn as_ref(&self) -> &str {
        &self.digits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    const VALID: [(&str, &str); 4] = [
        ("01775634000189", "01.775.634/0001-89"),
        ("90942116000132", "90.942.116/0001-32"),
        ("24477676000139", "24.477.676/0001-39"),
        ("41674881000103", "41.674.881/0001-03"),
    ];

    fn digits_to_string(digits: &[u8]) -> String {
        digits.iter().map(|d| char::from(b'0' + d)).collect()
    }

    fn is_repeated(s: &str) -> bool {
        let first = s.as_bytes()[0];
        s.bytes().all(|b| b == first)
    }

    #[test]
    fn test_parse_valid_raw_and_formatted() {
        for (raw, formatted) in VALID {
            let from_raw = Cnpj::parse(raw).unwrap();
            let from_formatted = Cnpj::parse(formatted).unwrap();

            assert_eq!(from_raw.as_str(), raw);
            assert_eq!(from_raw.formatted(), formatted);
            assert_eq!(from_raw.to_string(), formatted);
            assert_eq!(from_raw, from_formatted);
        }
    }

    #[test]
    fn test_equal_values_hash_the_same() {
        let mut set = HashSet::new();
        set.insert(Cnpj::parse("01775634000189").unwrap());
        set.insert(Cnpj::parse("01.775.634/0001-89").unwrap());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_parse_rejects_blank_input() {
        for raw in ["", "   ", "\t\n"] {
            assert!(matches!(
                Cnpj::parse(raw),
                Err(CnpjError::InvalidFormat(_))
            ));
        }
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        for raw in ["123", "1234567890123", "123456789012345", "ABCDEFGHIJKLMN"] {
            assert!(matches!(
                Cnpj::parse(raw),
                Err(CnpjError::InvalidFormat(_))
            ));
        }
    }

    #[test]
    fn test_parse_rejects_repeated_digits() {
        for raw in ["00000000000000", "11111111111111", "99999999999999"] {
            assert!(matches!(
                Cnpj::parse(raw),
                Err(CnpjError::InvalidFormat(_))
            ));
        }
    }

    #[test]
    fn test_parse_rejects_bad_checksum() {
        for raw in ["12345678901234", "98765432109876", "12.345.678/9012-34"] {
            assert_eq!(Cnpj::parse(raw), Err(CnpjError::InvalidChecksum));
        }
    }

    #[test]
    fn test_try_parse() {
        assert!(Cnpj::try_parse("01.775.634/0001-89").is_some());
        assert!(Cnpj::try_parse("").is_none());
        assert!(Cnpj::try_parse("12345678901234").is_none());
    }

    #[test]
    fn test_check_digits_known_value() {
        assert_eq!(
            Cnpj::check_digits(&[0, 1, 7, 7, 5, 6, 3, 4, 0, 0, 0, 1]),
            (8, 9)
        );
    }

    #[test]
    fn test_from_str_and_string_conversion() {
        let cnpj: Cnpj = "90.942.116/0001-32".parse().unwrap();
        let raw: String = cnpj.into();
        assert_eq!(raw, "90942116000132");
    }

    #[test]
    fn test_serde_uses_normalized_digits() {
        let cnpj = Cnpj::parse("01.775.634/0001-89").unwrap();
        let json = serde_json::to_string(&cnpj).unwrap();
        assert_eq!(json, "\"01775634000189\"");

        let back: Cnpj = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cnpj);

        assert!(serde_json::from_str::<Cnpj>("\"12345678901234\"").is_err());
    }

    proptest! {
        #[test]
        fn generated_check_digits_always_parse(base in prop::array::uniform12(0u8..10)) {
            let (first, second) = Cnpj::check_digits(&base);
            let raw = format!("{}{}{}", digits_to_string(&base), first, second);
            prop_assume!(!is_repeated(&raw));

            let cnpj = Cnpj::parse(&raw).unwrap();
            prop_assert_eq!(cnpj.as_str(), raw.as_str());

            let reparsed = Cnpj::parse(&cnpj.formatted()).unwrap();
            prop_assert_eq!(reparsed, cnpj);
        }

        #[test]
        fn flipped_check_digit_fails_checksum(
            base in prop::array::uniform12(0u8..10),
            flip_second in any::<bool>(),
            delta in 1u8..10,
        ) {
            let (mut first, mut second) = Cnpj::check_digits(&base);
            if flip_second {
                second = (second + delta) % 10;
            } else {
                first = (first + delta) % 10;
            }
            let raw = format!("{}{}{}", digits_to_string(&base), first, second);
            prop_assume!(!is_repeated(&raw));

            prop_assert_eq!(Cnpj::parse(&raw), Err(CnpjError::InvalidChecksum));
        }
    }
}
