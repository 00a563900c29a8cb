use std::{collections::HashMap, sync::LazyLock};

type Bundle = HashMap<String, HashMap<String, String>>;

static STRINGS: LazyLock<Bundle> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../resources/strings.json")).unwrap_or_else(|e| {
        tracing::error!(err = ?e, "an error occurred when parsing the string bundle");
        Bundle::new()
    })
});

/// looks `key` up for `locale` (e.g. `en-US`), then for its language (`en`),
/// then falls back to `default`.
pub fn localized_string(locale: &str, key: &str, default: &str) -> String {
    let language = locale.split(['-', '_']).next().unwrap_or(locale);

    [locale, language]
        .into_iter()
        .find_map(|code| STRINGS.get(code).and_then(|strings| strings.get(key)))
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_falls_back_to_language() {
        assert_eq!(localized_string("en-US", "unknown", "?"), "Unknown");
        assert_eq!(localized_string("vi", "unknown", "?"), "Không rõ");
        assert_eq!(localized_string("ja", "no_quotes", "?"), "引用がまだありません...");
    }

    #[test]
    fn missing_entries_use_default() {
        assert_eq!(localized_string("fr", "unknown", "Inconnu"), "Inconnu");
        assert_eq!(localized_string("en-GB", "nonexistent", "fallback"), "fallback");
    }

    #[test]
    fn every_language_has_the_same_keys() {
        let english = &STRINGS["en"];

        for (code, strings) in STRINGS.iter() {
            for key in english.keys() {
                assert!(strings.contains_key(key), "{code} is missing {key}");
            }
        }
    }
}
