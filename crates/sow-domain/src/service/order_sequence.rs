//! Year-scoped order number sequence
//!
//! Order numbers read `NNN/YYYY`. The sequence restarts at 1 every calendar
//! year and only advances when a number is committed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sow_types::{Error, Result};

/// Last committed sequence value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSequenceState {
    pub year: i32,
    pub sequence: u32,
}

/// Human-readable order number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderNumber {
    pub sequence: u32,
    pub year: i32,
}

impl OrderNumber {
    pub fn new(sequence: u32, year: i32) -> Self {
        Self { sequence, year }
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Past 999 the natural width is kept ("1000/2025")
        write!(f, "{:03}/{}", self.sequence, self.year)
    }
}

impl FromStr for OrderNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::Validation(format!("Número de pedido inválido: {}", s));

        let (seq, year) = s.trim().split_once('/').ok_or_else(invalid)?;
        if seq.is_empty() || !seq.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let sequence: u32 = seq.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        Ok(Self { sequence, year })
    }
}

impl From<OrderNumber> for OrderSequenceState {
    fn from(number: OrderNumber) -> Self {
        Self {
            year: number.year,
            sequence: number.sequence,
        }
    }
}

/// Next number given the last committed state
pub fn next_order_number(prior: Option<OrderSequenceState>, current_year: i32) -> OrderNumber {
    let sequence = match prior {
        Some(state) if state.year == current_year => state.sequence.saturating_add(1),
        _ => 1,
    };
    OrderNumber::new(sequence, current_year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_number_of_the_year() {
        assert_eq!(next_order_number(None, 2025).to_string(), "001/2025");
    }

    #[test]
    fn test_same_year_increments() {
        let prior = OrderSequenceState { year: 2025, sequence: 6 };
        assert_eq!(next_order_number(Some(prior), 2025).to_string(), "007/2025");
    }

    #[test]
    fn test_new_year_resets() {
        let prior = OrderSequenceState { year: 2024, sequence: 87 };
        assert_eq!(next_order_number(Some(prior), 2025), OrderNumber::new(1, 2025));
    }

    #[test]
    fn test_wide_sequence() {
        let prior = OrderSequenceState { year: 2025, sequence: 999 };
        assert_eq!(next_order_number(Some(prior), 2025).to_string(), "1000/2025");
    }

    #[test]
    fn test_parse() {
        let number: OrderNumber = "042/2026".parse().unwrap();
        assert_eq!(number, OrderNumber::new(42, 2026));
        assert_eq!(OrderSequenceState::from(number), OrderSequenceState { year: 2026, sequence: 42 });

        assert!("---/----".parse::<OrderNumber>().is_err());
        assert!("42".parse::<OrderNumber>().is_err());
        assert!("042/26".parse::<OrderNumber>().is_err());
        assert!("-1/2025".parse::<OrderNumber>().is_err());
    }
}
