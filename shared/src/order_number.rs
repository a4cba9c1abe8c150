//! Human-readable order numbers of the form `YY-NNNNN`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Parsed order number: two-digit year suffix plus a per-year sequence
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderNumber {
    pub year_suffix: u8,
    pub sequence: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderNumberError {
    #[error("malformed order number: {0}")]
    Malformed(String),
    #[error("no order numbers left for year {0:02}")]
    Exhausted(u8),
}

impl OrderNumber {
    pub fn new(year: i32, sequence: u32) -> Self {
        Self {
            year_suffix: year_suffix(year),
            sequence,
        }
    }

    /// Following number in the same year
    pub fn next(&self) -> Result<Self, OrderNumberError> {
        let sequence = self
            .sequence
            .checked_add(1)
            .ok_or(OrderNumberError::Exhausted(self.year_suffix))?;
        Ok(Self {
            year_suffix: self.year_suffix,
            sequence,
        })
    }
}

/// Last two digits of the calendar year
pub fn year_suffix(year: i32) -> u8 {
    year.rem_euclid(100) as u8
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:05}", self.year_suffix, self.sequence)
    }
}

impl FromStr for OrderNumber {
    type Err = OrderNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || OrderNumberError::Malformed(s.to_string());
        let (year, seq) = s.split_once('-').ok_or_else(malformed)?;
        if year.len() != 2 || seq.len() < 5 {
            return Err(malformed());
        }
        if !year.bytes().chain(seq.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        Ok(Self {
            year_suffix: year.parse().map_err(|_| malformed())?,
            sequence: seq.parse().map_err(|_| malformed())?,
        })
    }
}

/// Largest sequence already used for `year`, ignoring malformed numbers
pub fn max_sequence<'a>(existing: impl IntoIterator<Item = &'a str>, year: i32) -> u32 {
    let suffix = year_suffix(year);
    existing
        .into_iter()
        .filter_map(|n| n.parse::<OrderNumber>().ok())
        .filter(|n| n.year_suffix == suffix)
        .map(|n| n.sequence)
        .max()
        .unwrap_or(0)
}

/// Next number for `year`: one past the highest existing sequence with that prefix
pub fn next_order_number<'a>(
    existing: impl IntoIterator<Item = &'a str>,
    year: i32,
) -> Result<OrderNumber, OrderNumberError> {
    OrderNumber::new(year, max_sequence(existing, year)).next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads() {
        assert_eq!(OrderNumber::new(2024, 7).to_string(), "24-00007");
        assert_eq!(OrderNumber::new(2105, 123456).to_string(), "05-123456");
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "24-00012".parse::<OrderNumber>(),
            Ok(OrderNumber {
                year_suffix: 24,
                sequence: 12
            })
        );
        assert!("24-12".parse::<OrderNumber>().is_err());
        assert!("2024-00012".parse::<OrderNumber>().is_err());
        assert!("24-0001a".parse::<OrderNumber>().is_err());
        assert!("ORD-00001".parse::<OrderNumber>().is_err());
    }

    #[test]
    fn test_next_order_number() {
        let existing = ["24-00001", "24-00005"];
        assert_eq!(
            next_order_number(existing.iter().copied(), 2024)
                .unwrap()
                .to_string(),
            "24-00006"
        );
    }

    #[test]
    fn test_next_order_number_new_year() {
        let existing = ["23-00412"];
        assert_eq!(
            next_order_number(existing.iter().copied(), 2024)
                .unwrap()
                .to_string(),
            "24-00001"
        );
    }

    #[test]
    fn test_malformed_numbers_ignored() {
        let existing = ["24-00003", "24-garbage", "", "24-99"];
        assert_eq!(max_sequence(existing.iter().copied(), 2024), 3);
    }

    #[test]
    fn test_exhausted_year_is_an_error() {
        let existing = ["24-4294967295"];
        assert_eq!(
            next_order_number(existing.iter().copied(), 2024),
            Err(OrderNumberError::Exhausted(24))
        );
        // other years are unaffected
        assert_eq!(
            next_order_number(existing.iter().copied(), 2025)
                .unwrap()
                .to_string(),
            "25-00001"
        );
    }
}
