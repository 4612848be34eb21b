//! Locale-aware number formatting.
//!
//! Numbers go through ICU4X's decimal formatter so that grouping separators
//! and decimal marks follow the locale. Formatters are cached per thread per
//! parsed locale, in a cache of bounded size.

use std::cell::RefCell;

use fixed_decimal::Decimal;
use icu_decimal::DecimalFormatter;
use icu_locale_core::Locale;
use icu_decimal::options::DecimalFormatterOptions;
use log::debug;

use super::plural::{cached_index, parse_locale};

thread_local! {
    static DECIMAL_FORMATTER_CACHE: RefCell<Vec<(Locale, Option<DecimalFormatter>)>> =
        const { RefCell::new(Vec::new()) };
}

fn build_formatter(locale: &Locale) -> Option<DecimalFormatter> {
    DecimalFormatter::try_new(locale.clone().into(), DecimalFormatterOptions::default())
        .inspect_err(|err| debug!("no decimal formatter for '{locale}': {err}"))
        .ok()
}

/// Format a number for a locale, or `None` if the locale has no formatter.
pub(crate) fn try_format_number(locale: &str, number: &Decimal) -> Option<String> {
    let locale = parse_locale(locale);
    DECIMAL_FORMATTER_CACHE.with_borrow_mut(|cache| {
        let index = cached_index(cache, locale, build_formatter);
        cache[index]
            .1
            .as_ref()
            .map(|formatter| formatter.format(number).to_string())
    })
}

/// Format a number for a locale.
///
/// The number's visible fraction digits are kept, so `1.50` stays `1.50`.
/// Falls back to the plain decimal text when the locale cannot be served.
///
/// # Examples
///
/// ```
/// use fixed_decimal::Decimal;
/// use fluent::resolver::format_number;
///
/// assert_eq!(format_number("en", &Decimal::from(1234567)), "1,234,567");
/// assert_eq!(format_number("en", &"1.50".parse().unwrap()), "1.50");
/// ```
pub fn format_number(locale: &str, number: &Decimal) -> String {
    try_format_number(locale, number).unwrap_or_else(|| number.to_string())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn grouping_follows_locale() {
        let number = Decimal::from_str("1234.5").expect("decimal");
        assert_eq!(format_number("en", &number), "1,234.5");
        assert_eq!(format_number("de", &number), "1.234,5");
    }

    #[test]
    fn negative_numbers_keep_sign() {
        assert_eq!(format_number("en", &Decimal::from(-5)), "-5");
    }
}
