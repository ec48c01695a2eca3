use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::BudgetError;

/// Locale-aware number formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    /// Put a space between the currency symbol and the digits.
    pub symbol_spacing: bool,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "en-US".into(),
            decimal_separator: '.',
            grouping_separator: ',',
            symbol_spacing: false,
        }
    }
}

impl LocaleConfig {
    /// Separators for a BCP 47 tag. Unknown tags use the `en-US` rules.
    pub fn for_tag(tag: &str) -> Self {
        let language = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let (decimal_separator, grouping_separator, symbol_spacing) = match language.as_str() {
            "pt" | "de" | "es" | "it" | "nl" => (',', '.', true),
            "fr" => (',', ' ', true),
            _ => ('.', ',', false),
        };
        Self {
            language_tag: tag.to_string(),
            decimal_separator,
            grouping_separator,
            symbol_spacing,
        }
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "BRL" => "R$".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u32 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Renders `value` rounded half away from zero to `precision` places, with
/// the locale's separators. The sign is kept.
pub fn format_number(locale: &LocaleConfig, value: Decimal, precision: u32) -> String {
    let rounded = value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    let body = format!("{:.*}", precision as usize, rounded);
    let (sign, unsigned) = match body.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", body.as_str()),
    };
    let (int_part, fraction) = match unsigned.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (unsigned, None),
    };
    let mut rendered = format!("{}{}", sign, group_digits(int_part, locale.grouping_separator));
    if let Some(fraction) = fraction {
        rendered.push(locale.decimal_separator);
        rendered.push_str(fraction);
    }
    rendered
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

/// `R$ 1.234,56`, `$1,234.56`, `-R$ 10,00`.
pub fn format_currency(value: Decimal, code: &str, locale: &LocaleConfig) -> String {
    let code = code.trim().to_ascii_uppercase();
    let body = format_number(locale, value.abs(), minor_units_for(&code));
    let symbol = symbol_for(&code);
    let spacer = if locale.symbol_spacing { " " } else { "" };
    let sign = if value < Decimal::ZERO { "-" } else { "" };
    format!("{}{}{}{}", sign, symbol, spacer, body)
}

/// Formats with the currency and locale from `config`.
pub fn format_amount(value: Decimal, config: &Config) -> String {
    format_currency(value, &config.currency, &LocaleConfig::for_tag(&config.locale))
}

/// Parses user input such as `1234.56`, `1234,56` or `1.234,56`. When both
/// separators appear, the last one is the decimal mark.
pub fn parse_amount(input: &str) -> Result<Decimal, BudgetError> {
    let cleaned: String = input
        .trim()
        .trim_start_matches(|c: char| c.is_alphabetic() || c == '$')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Err(BudgetError::InvalidInput("amount is required".into()));
    }
    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(_)) => cleaned.replace(',', "."),
        _ => cleaned,
    };
    normalized
        .parse::<Decimal>()
        .map_err(|_| BudgetError::InvalidInput(format!("`{}` is not a valid amount", input.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brl() -> Config {
        Config::default()
    }

    #[test]
    fn formats_brazilian_real() {
        assert_eq!(format_amount(Decimal::new(166034, 2), &brl()), "R$ 1.660,34");
        assert_eq!(format_amount(Decimal::from(5000), &brl()), "R$ 5.000,00");
        assert_eq!(format_amount(Decimal::ZERO, &brl()), "R$ 0,00");
    }

    #[test]
    fn formats_negative_with_leading_sign() {
        assert_eq!(format_amount(Decimal::from(-3660), &brl()), "-R$ 3.660,00");
    }

    #[test]
    fn formats_us_dollar() {
        let config = Config {
            locale: "en-US".into(),
            currency: "USD".into(),
            ..Config::default()
        };
        assert_eq!(format_amount(Decimal::new(123456789, 2), &config), "$1,234,567.89");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        let locale = LocaleConfig::default();
        assert_eq!(format_number(&locale, Decimal::new(1005, 3), 2), "1.01");
        assert_eq!(format_number(&locale, Decimal::new(-1005, 3), 2), "-1.01");
        assert_eq!(format_number(&locale, Decimal::from(1234), 0), "1,234");
    }

    #[test]
    fn parses_common_spellings() {
        assert_eq!(parse_amount("1234.56").unwrap(), Decimal::new(123456, 2));
        assert_eq!(parse_amount("1234,56").unwrap(), Decimal::new(123456, 2));
        assert_eq!(parse_amount("1.234,56").unwrap(), Decimal::new(123456, 2));
        assert_eq!(parse_amount("1,234.56").unwrap(), Decimal::new(123456, 2));
        assert_eq!(parse_amount("R$ 380").unwrap(), Decimal::from(380));
        assert_eq!(parse_amount("-5").unwrap(), Decimal::from(-5));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_amount("").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("12x").is_err());
    }
}
