use std::sync::LazyLock;

use semver::Version;

pub static POISE_VERSION: &str = "0.6.1";
pub static STARTUP_TIME: LazyLock<std::time::SystemTime> =
    LazyLock::new(std::time::SystemTime::now);

/// vergen writes this placeholder when git is not available at build time.
const NO_SHA: &str = "VERGEN_IDEMPOTENT_OUTPUT";

fn format_version(version: &str, sha: &str) -> String {
    match version.parse::<Version>() {
        Ok(semver) if sha == NO_SHA || sha.is_empty() => semver.to_string(),
        Ok(semver) => {
            let short = &sha[..sha.len().min(7)];
            format!("{semver} (`{short}`)")
        }
        Err(_) => {
            tracing::warn!("couldn't parse a semver out of Cargo.toml? defaulting to 0.0.0-unknown.");
            String::from("0.0.0-unknown")
        }
    }
}

pub fn get_version() -> String {
    format_version(env!("CARGO_PKG_VERSION"), env!("VERGEN_GIT_SHA"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_sha_is_appended_when_known() {
        assert_eq!(
            format_version("2025.7.1", "0123456789abcdef"),
            "2025.7.1 (`0123456`)"
        );
    }

    #[test]
    fn placeholder_sha_is_dropped() {
        assert_eq!(format_version("1.2.3", NO_SHA), "1.2.3");
    }

    #[test]
    fn bad_version_falls_back() {
        assert_eq!(format_version("not-a-version", NO_SHA), "0.0.0-unknown");
    }
}
