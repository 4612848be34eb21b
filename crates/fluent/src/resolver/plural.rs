//! CLDR plural category resolution.
//!
//! Different languages split numbers into different categories: English has
//! "one" and "other", Russian adds "few" and "many", and Arabic uses all six
//! of "zero", "one", "two", "few", "many" and "other".
//!
//! Plural rules are cached per thread per parsed locale so that repeated
//! selections do not rebuild `PluralRules`. Each cache holds at most
//! [`MAX_CACHED_LOCALES`] locales and evicts the oldest one first.

use std::cell::RefCell;

use fixed_decimal::Decimal;
use icu_locale_core::{Locale, locale};
use icu_plurals::{PluralCategory, PluralRuleType, PluralRules};
use log::debug;

/// Locales kept in each per-thread formatting cache.
pub(crate) const MAX_CACHED_LOCALES: usize = 16;

thread_local! {
    /// Per-thread cache of `PluralRules` keyed by locale. `None` records a
    /// locale for which no rules could be built.
    static PLURAL_RULES_CACHE: RefCell<Vec<(Locale, Option<PluralRules>)>> =
        const { RefCell::new(Vec::new()) };
}

/// Find `locale` in a bounded cache, building and inserting it if missing.
pub(crate) fn cached_index<T>(
    cache: &mut Vec<(Locale, T)>,
    locale: Locale,
    build: impl FnOnce(&Locale) -> T,
) -> usize {
    if let Some(index) = cache.iter().position(|(cached, _)| *cached == locale) {
        return index;
    }
    if cache.len() >= MAX_CACHED_LOCALES {
        cache.remove(0);
    }
    let value = build(&locale);
    cache.push((locale, value));
    cache.len() - 1
}

/// Parse a locale tag, accepting `_` as a separator.
///
/// Tags that do not parse fall back to English.
pub(crate) fn parse_locale(tag: &str) -> Locale {
    Locale::try_from_str(&tag.replace('_', "-")).unwrap_or_else(|_| {
        debug!("invalid locale tag '{tag}', using 'en'");
        locale!("en")
    })
}

fn build_rules(locale: &Locale) -> Option<PluralRules> {
    PluralRules::try_new(locale.clone().into(), PluralRuleType::Cardinal.into())
        .inspect_err(|err| debug!("no plural rules for '{locale}': {err}"))
        .ok()
}

/// Translate a `PluralCategory` to its CLDR keyword.
fn category_str(category: PluralCategory) -> &'static str {
    match category {
        PluralCategory::Zero => "zero",
        PluralCategory::One => "one",
        PluralCategory::Two => "two",
        PluralCategory::Few => "few",
        PluralCategory::Many => "many",
        PluralCategory::Other => "other",
    }
}

/// Get the CLDR plural category of a number in a locale.
///
/// Returns one of "zero", "one", "two", "few", "many" or "other". Visible
/// fraction digits matter: in English `1` is "one" but `1.0` is "other".
///
/// # Examples
///
/// ```
/// use fixed_decimal::Decimal;
/// use fluent::resolver::plural_category;
///
/// assert_eq!(plural_category("en", &Decimal::from(1)), "one");
/// assert_eq!(plural_category("en", &Decimal::from(2)), "other");
///
/// assert_eq!(plural_category("ru", &Decimal::from(2)), "few");
/// assert_eq!(plural_category("ru", &Decimal::from(5)), "many");
/// ```
pub fn plural_category(locale: &str, number: &Decimal) -> &'static str {
    let locale = parse_locale(locale);
    PLURAL_RULES_CACHE.with_borrow_mut(|cache| {
        let index = cached_index(cache, locale, build_rules);
        cache[index]
            .1
            .as_ref()
            .map_or("other", |rules| category_str(rules.category_for(number)))
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn fraction_digits_affect_category() {
        let one = Decimal::from_str("1").expect("decimal");
        let one_point_zero = Decimal::from_str("1.0").expect("decimal");
        assert_eq!(plural_category("en", &one), "one");
        assert_eq!(plural_category("en", &one_point_zero), "other");
    }

    #[test]
    fn region_subtags_and_underscores_are_accepted() {
        assert_eq!(plural_category("en-US", &Decimal::from(1)), "one");
        assert_eq!(plural_category("pl_PL", &Decimal::from(3)), "few");
    }

    #[test]
    fn invalid_tag_falls_back_to_english() {
        assert_eq!(plural_category("not a locale", &Decimal::from(1)), "one");
    }

    #[test]
    fn cache_is_keyed_by_parsed_locale() {
        for tag in ["en", "en_US", "en-US", "bogus tag", "another bogus tag"] {
            plural_category(tag, &Decimal::from(1));
        }
        let cached = PLURAL_RULES_CACHE.with_borrow(|cache| {
            cache
                .iter()
                .map(|(locale, _)| locale.to_string())
                .collect::<Vec<_>>()
        });
        assert_eq!(cached, vec!["en", "en-US"]);
    }

    #[test]
    fn cache_evicts_oldest_locale() {
        let mut cache: Vec<(Locale, usize)> = Vec::new();
        for region in 0..=MAX_CACHED_LOCALES {
            let locale = parse_locale(&format!("en-{:03}", region + 1));
            cached_index(&mut cache, locale, |_| region);
        }
        assert_eq!(cache.len(), MAX_CACHED_LOCALES);
        assert_eq!(cache[0].1, 1);

        let index = cached_index(&mut cache, parse_locale("en-002"), |_| usize::MAX);
        assert_eq!(cache[index].1, 1);
    }
}
