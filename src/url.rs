//! Builds the absolute URLs that end up in page metadata (social-preview
//! images, canonical links). See [`resolve`] for the exact contract.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Where the site is being served from. In [`Mode::Development`] relative
/// paths are left as they are since the local server resolves them itself,
/// while prefixing them would point at the (possibly not yet deployed)
/// public host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Production,
    Development,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Production
    }
}

impl FromStr for Mode {
    type Err = UnknownModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Mode::Production),
            "development" | "dev" => Ok(Mode::Development),
            _ => Err(UnknownModeError(s.to_owned())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Mode::Production => "production",
            Mode::Development => "development",
        })
    }
}

/// Returned when parsing a [`Mode`] from an unrecognized string.
#[derive(Debug, PartialEq)]
pub struct UnknownModeError(String);

impl fmt::Display for UnknownModeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "unknown mode `{}` (expected `production` or `development`)",
            self.0
        )
    }
}

impl std::error::Error for UnknownModeError {}

/// Resolves `path` against `base_url`.
///
/// * If either `base_url` or `path` is missing or empty, the result is
///   `None`. Nothing is ever made up to stand in for a missing input.
/// * In [`Mode::Development`], `path` is returned unchanged.
/// * Otherwise the result is `base_url` immediately followed by `path`. No
///   separator is inserted and nothing is normalized, so `path` must already
///   start with whatever `base_url` expects (usually `/`).
pub fn resolve(
    base_url: Option<&str>,
    path: Option<&str>,
    mode: Mode,
) -> Option<String> {
    let path = path.filter(|p| !p.is_empty())?;
    let base_url = base_url.filter(|b| !b.is_empty())?;
    Some(match mode {
        Mode::Development => path.to_owned(),
        Mode::Production => format!("{}{}", base_url, path),
    })
}

/// Returns whether `s` is already an absolute URL (it has a scheme), in
/// which case it must not be passed through [`resolve`].
pub fn is_absolute(s: &str) -> bool {
    ::url::Url::parse(s).is_ok()
}

/// A [`resolve`] with the base URL and [`Mode`] bound once per render
/// context.
#[derive(Clone, Copy, Debug)]
pub struct Resolver<'a> {
    base_url: Option<&'a str>,
    mode: Mode,
}

impl<'a> Resolver<'a> {
    /// Constructs a production-mode `Resolver` for `base_url`.
    pub fn new(base_url: Option<&'a str>) -> Resolver<'a> {
        Resolver {
            base_url,
            mode: Mode::default(),
        }
    }

    pub fn with_mode(self, mode: Mode) -> Resolver<'a> {
        Resolver { mode, ..self }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn resolve(&self, path: Option<&str>) -> Option<String> {
        resolve(self.base_url, path, self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestCase {
        base_url: Option<&'static str>,
        path: Option<&'static str>,
        mode: Mode,
        wanted: Option<&'static str>,
    }

    fn resolve_test(test_case: &TestCase) {
        let result =
            resolve(test_case.base_url, test_case.path, test_case.mode);
        assert_eq!(
            test_case.wanted,
            result.as_deref(),
            "base_url={:?} path={:?} mode={}",
            test_case.base_url,
            test_case.path,
            test_case.mode,
        );
    }

    #[test]
    fn test_resolve_production_concatenates() {
        resolve_test(&TestCase {
            base_url: Some("https://example.com"),
            path: Some("/icon.png"),
            mode: Mode::Production,
            wanted: Some("https://example.com/icon.png"),
        })
    }

    #[test]
    fn test_resolve_missing_path() {
        resolve_test(&TestCase {
            base_url: Some("https://example.com"),
            path: None,
            mode: Mode::Production,
            wanted: None,
        })
    }

    #[test]
    fn test_resolve_missing_base_url() {
        resolve_test(&TestCase {
            base_url: None,
            path: Some("/icon.png"),
            mode: Mode::Production,
            wanted: None,
        })
    }

    #[test]
    fn test_resolve_development_leaves_path_relative() {
        resolve_test(&TestCase {
            base_url: Some("https://example.com"),
            path: Some("/icon.png"),
            mode: Mode::Development,
            wanted: Some("/icon.png"),
        })
    }

    #[test]
    fn test_resolve_empty_base_url() {
        resolve_test(&TestCase {
            base_url: Some(""),
            path: Some("/icon.png"),
            mode: Mode::Production,
            wanted: None,
        })
    }

    #[test]
    fn test_resolve_empty_path_in_development() {
        resolve_test(&TestCase {
            base_url: Some("https://example.com"),
            path: Some(""),
            mode: Mode::Development,
            wanted: None,
        })
    }

    #[test]
    fn test_resolve_missing_base_url_in_development() {
        resolve_test(&TestCase {
            base_url: None,
            path: Some("/icon.png"),
            mode: Mode::Development,
            wanted: None,
        })
    }

    #[test]
    fn test_resolve_does_not_insert_separator() {
        resolve_test(&TestCase {
            base_url: Some("https://example.com"),
            path: Some("icon.png"),
            mode: Mode::Production,
            wanted: Some("https://example.comicon.png"),
        })
    }

    #[test]
    fn test_resolve_does_not_normalize() {
        resolve_test(&TestCase {
            base_url: Some("https://example.com/"),
            path: Some("/./static/../icon.png"),
            mode: Mode::Production,
            wanted: Some("https://example.com//./static/../icon.png"),
        })
    }

    #[test]
    fn test_resolve_concatenates_for_many_inputs() {
        let bases = ["https://a.org", "http://localhost:8000", "x"];
        let paths = ["/", "/static/a.png", "?q=1", "https://b.org/c.png"];
        for &base in bases.iter() {
            for &path in paths.iter() {
                assert_eq!(
                    Some(format!("{}{}", base, path)),
                    resolve(Some(base), Some(path), Mode::Production),
                );
                assert_eq!(
                    Some(path.to_string()),
                    resolve(Some(base), Some(path), Mode::Development),
                );
                for &mode in [Mode::Production, Mode::Development].iter() {
                    assert_eq!(None, resolve(Some(base), Some(""), mode));
                    assert_eq!(None, resolve(Some(base), None, mode));
                    assert_eq!(None, resolve(Some(""), Some(path), mode));
                    assert_eq!(None, resolve(None, Some(path), mode));
                }
            }
        }
    }

    #[test]
    fn test_resolver_defaults_to_production() {
        let resolver = Resolver::new(Some("https://example.com"));
        assert_eq!(Mode::Production, resolver.mode());
        assert_eq!(
            Some("https://example.com/icon.png".to_owned()),
            resolver.resolve(Some("/icon.png"))
        );
    }

    #[test]
    fn test_resolver_with_development_mode() {
        let resolver = Resolver::new(Some("https://example.com"))
            .with_mode(Mode::Development);
        assert_eq!(
            Some("/icon.png".to_owned()),
            resolver.resolve(Some("/icon.png"))
        );
        assert_eq!(None, resolver.resolve(None));
    }

    #[test]
    fn test_is_absolute() {
        assert!(is_absolute("https://cdn.example.org/cover.png"));
        assert!(is_absolute("mailto:someone@example.org"));
        assert!(!is_absolute("/static/icon.png"));
        assert!(!is_absolute("./cover.png"));
        assert!(!is_absolute("cover.png"));
        assert!(!is_absolute(""));
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(Ok(Mode::Production), "production".parse::<Mode>());
        assert_eq!(Ok(Mode::Production), "PROD".parse::<Mode>());
        assert_eq!(Ok(Mode::Development), "Development".parse::<Mode>());
        assert_eq!(Ok(Mode::Development), "dev".parse::<Mode>());
        assert_eq!(
            Err(UnknownModeError("staging".to_owned())),
            "staging".parse::<Mode>()
        );
    }

    #[test]
    fn test_deserialize_mode() -> Result<(), serde_yaml::Error> {
        assert_eq!(
            Mode::Development,
            serde_yaml::from_str::<Mode>("development")?
        );
        assert_eq!(
            Mode::Production,
            serde_yaml::from_str::<Mode>("production")?
        );
        Ok(())
    }
}
