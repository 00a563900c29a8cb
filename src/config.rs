use std::ffi::OsString;

use crate::selector::PickStrategy;

/// styling options from the old page-builder format. they have no effect.
const LEGACY_KEYS: &[&str] = &[
    "QUOTE_WIDTH",
    "QUOTE_HEIGHT",
    "QUOTE_ALIGNMENT",
    "QUOTE_TEXT_STYLE",
    "QUOTE_TEXT_SIZE",
    "QUOTE_TEXT_COLOR",
    "QUOTE_TEXT_FACE",
    "QUOTE_AUTHOR_STYLE",
    "QUOTE_AUTHOR_SIZE",
    "QUOTE_AUTHOR_COLOR",
    "QUOTE_AUTHOR_FACE",
    "QUOTE_ORIGIN_STYLE",
    "QUOTE_ORIGIN_SIZE",
    "QUOTE_ORIGIN_COLOR",
    "QUOTE_ORIGIN_FACE",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing {0}")]
    Missing(&'static str),

    #[error("invalid value \"{value}\" for {key}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayOptions {
    pub show_author: bool,
    pub show_origin: bool,
    pub show_quotes: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_author: true,
            show_origin: true,
            show_quotes: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub discord_token: String,
    pub database_url: String,
    pub prefix: String,
    pub default_locale: String,
    pub display: DisplayOptions,
    pub pick_strategy: PickStrategy,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(utf8_vars(std::env::vars_os()))
    }

    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut discord_token = None;
        let mut database_url = None;
        let mut prefix = String::from("s>");
        let mut default_locale = String::from("en-US");
        let mut display = DisplayOptions::default();
        let mut pick_strategy = PickStrategy::default();

        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref());

            match key {
                "DISCORD_TOKEN" => discord_token = Some(value.to_string()),
                "DATABASE_URL" => database_url = Some(value.to_string()),
                "BOT_PREFIX" => prefix = value.to_string(),
                "DEFAULT_LOCALE" => default_locale = value.trim().to_string(),
                "QUOTE_SHOW_AUTHOR" => display.show_author = parse_bool(key, value)?,
                "QUOTE_SHOW_ORIGIN" => display.show_origin = parse_bool(key, value)?,
                "QUOTE_SHOW_QUOTES" => display.show_quotes = parse_bool(key, value)?,
                "QUOTE_PICK" => {
                    pick_strategy = value.parse().map_err(|reason| ConfigError::Invalid {
                        key: key.to_string(),
                        value: value.to_string(),
                        reason,
                    })?
                }
                _ if LEGACY_KEYS.contains(&key) => {
                    tracing::debug!(key, "ignoring legacy styling option");
                }
                _ if key.starts_with("QUOTE_") => {
                    tracing::warn!(key, "ignoring unrecognized quote option");
                }
                _ => {}
            }
        }

        Ok(Self {
            discord_token: discord_token.ok_or(ConfigError::Missing("DISCORD_TOKEN"))?,
            database_url: database_url.ok_or(ConfigError::Missing("DATABASE_URL"))?,
            prefix,
            default_locale,
            display,
            pick_strategy,
        })
    }
}

/// drops variables whose key or value is not valid unicode.
fn utf8_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter().filter_map(|(key, value)| {
        match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (Ok(key), Err(_)) => {
                tracing::warn!(key = %key, "skipping environment variable with a non-unicode value");
                None
            }
            (Err(_), _) => None,
        }
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}
