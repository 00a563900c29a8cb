//! Turns a picked quote into what the bot shows.

use crate::{config::DisplayOptions, i18n::localized_string, models::quotes::Quote};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuoteCard {
    Quote {
        id: i64,
        origin: Option<String>,
        text: String,
        author: Option<String>,
    },
    Empty {
        message: String,
    },
}

impl QuoteCard {
    pub fn render(quote: Option<&Quote>, display: &DisplayOptions, locale: &str) -> Self {
        let Some(quote) = quote else {
            return QuoteCard::Empty {
                message: localized_string(locale, "no_quotes", "No quotes in database..."),
            };
        };

        let origin = quote
            .origin
            .as_deref()
            .filter(|origin| display.show_origin && !origin.is_empty())
            .map(|origin| format!("{origin}:"));

        let text = format_text(&quote.text);
        let text = if display.show_quotes {
            format!("\"{text}\"")
        } else {
            text
        };

        let author = display.show_author.then(|| {
            let author = quote
                .author
                .as_deref()
                .filter(|author| !author.is_empty())
                .map(String::from)
                .unwrap_or_else(|| localized_string(locale, "unknown", "Unknown"));

            format!("-\u{a0}{author}")
        });

        QuoteCard::Quote {
            id: quote.id,
            origin,
            text,
            author,
        }
    }

    /// the reply body, one line per part. never empty, since discord
    /// rejects an embed with a blank description.
    pub fn body(&self) -> String {
        let body = match self {
            QuoteCard::Quote {
                origin,
                text,
                author,
                ..
            } => [origin.as_deref(), Some(text.as_str()), author.as_deref()]
                .into_iter()
                .flatten()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
            QuoteCard::Empty { message } => message.clone(),
        };

        if body.trim().is_empty() {
            String::from("\u{a0}")
        } else {
            body
        }
    }

    /// create / edit / delete hints for users allowed to manage quotes.
    pub fn admin_hints(&self, prefix: &str, locale: &str) -> Vec<String> {
        let mut hints = vec![format!(
            "{}: `{prefix}quote add <text> | <author> | <origin>`",
            localized_string(locale, "new_quote", "New Quote"),
        )];

        if let QuoteCard::Quote { id, .. } = self {
            hints.push(format!(
                "{}: `{prefix}quote edit {id} <text> | <author> | <origin>`",
                localized_string(locale, "edit_quote", "Edit Quote"),
            ));
            hints.push(format!(
                "{}: `{prefix}quote delete {id}`",
                localized_string(locale, "delete_quote", "Delete Quote"),
            ));
        }

        hints
    }
}

fn format_text(text: &str) -> String {
    text.replace("\r\n", "\n").trim().to_string()
}
