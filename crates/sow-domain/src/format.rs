//! pt-BR display formatting

use chrono::NaiveDate;
use rust_decimal::prelude::*;

/// Format as Brazilian reais: `R$ 1.234,56` with a non-breaking space
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let cents = (rounded.abs() * Decimal::ONE_HUNDRED).to_u128().unwrap_or(0);
    let integer = group_thousands(&(cents / 100).to_string());
    let fraction = cents % 100;

    format!(
        "{}R$\u{a0}{},{:02}",
        if negative { "-" } else { "" },
        integer,
        fraction
    )
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// `dd/mm/yyyy`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Parse the `YYYY-MM-DD` form used by tech pack dates and show it as `dd/mm/yyyy`.
/// Anything else is returned as typed.
pub fn format_iso_date(value: &str) -> String {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(format_date)
        .unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency() {
        assert_eq!(format_currency(Decimal::new(2500, 2)), "R$\u{a0}25,00");
        assert_eq!(format_currency(Decimal::new(123456, 2)), "R$\u{a0}1.234,56");
        assert_eq!(format_currency(Decimal::new(100000000, 2)), "R$\u{a0}1.000.000,00");
        assert_eq!(format_currency(Decimal::ZERO), "R$\u{a0}0,00");
        assert_eq!(format_currency(Decimal::new(-1050, 2)), "-R$\u{a0}10,50");
    }

    #[test]
    fn test_currency_rounds_half_up() {
        assert_eq!(format_currency(Decimal::new(1005, 3)), "R$\u{a0}1,01");
        assert_eq!(format_currency(Decimal::new(-4, 3)), "R$\u{a0}0,00");
    }

    #[test]
    fn test_dates() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        assert_eq!(format_date(date), "09/01/2025");
        assert_eq!(format_iso_date("2025-01-09"), "09/01/2025");
        assert_eq!(format_iso_date("amanhã"), "amanhã");
    }
}
