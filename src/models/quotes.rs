pub type QuoteId = i64;
pub type LocaleId = i64;

#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct Quote {
    pub id: QuoteId,
    pub locale_id: LocaleId,
    pub text: String,
    pub author: Option<String>,
    pub origin: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct Locale {
    pub id: LocaleId,
    pub code: String,
}

/// the mutable part of a quote, as entered by an editor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuoteFields {
    pub text: String,
    pub author: Option<String>,
    pub origin: Option<String>,
}

impl QuoteFields {
    pub fn new(text: impl Into<String>, author: Option<String>, origin: Option<String>) -> Self {
        Self {
            text: text.into(),
            author,
            origin,
        }
        .normalized()
    }

    /// blank author / origin are stored as NULL.
    pub fn normalized(self) -> Self {
        fn non_blank(value: Option<String>) -> Option<String> {
            value
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        }

        Self {
            text: self.text.trim().to_string(),
            author: non_blank(self.author),
            origin: non_blank(self.origin),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewQuote {
    pub locale_id: LocaleId,
    pub fields: QuoteFields,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_author_and_origin_become_none() {
        let fields = QuoteFields::new("  to be  ", Some("   ".into()), Some(String::new()));

        assert_eq!(fields.text, "to be");
        assert_eq!(fields.author, None);
        assert_eq!(fields.origin, None);
    }

    #[test]
    fn present_fields_are_trimmed() {
        let fields = QuoteFields::new("text", Some(" Hamlet ".into()), Some(" Act III ".into()));

        assert_eq!(fields.author.as_deref(), Some("Hamlet"));
        assert_eq!(fields.origin.as_deref(), Some("Act III"));
    }
}
