//! Defines the [`Config`] type, which is loaded from a `sitemeta.yaml`
//! project file.

use crate::url::{Mode, Resolver, UnknownModeError};
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The name of the project file that [`Config::from_directory`] looks for.
pub const PROJECT_FILE_NAME: &str = "sitemeta.yaml";

const DEFAULT_POSTS_DIRECTORY: &str = "content/blog";

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Social {
    #[serde(default)]
    pub twitter: Option<String>,
}

/// Site-wide metadata. This is the fallback source for anything a page
/// doesn't provide for itself.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct SiteMetadata {
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// The site's origin, e.g., `https://example.org`. Kept verbatim; see
    /// [`crate::url::resolve`].
    #[serde(default)]
    pub site_url: Option<String>,

    #[serde(default)]
    pub social: Social,
}

#[derive(Deserialize)]
struct Lang(String);
impl Default for Lang {
    fn default() -> Self {
        Lang(String::from("en"))
    }
}

#[derive(Deserialize)]
struct Project {
    site_metadata: SiteMetadata,

    #[serde(default)]
    lang: Lang,

    #[serde(default)]
    default_image: Option<String>,

    #[serde(default)]
    default_image_alt: Option<String>,

    #[serde(default)]
    posts_directory: Option<PathBuf>,

    #[serde(default)]
    mode: Mode,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub site_metadata: SiteMetadata,

    /// The document language used when a page doesn't set one.
    pub lang: String,

    /// The path (relative to `site_url`) of the social-preview image used
    /// when a page doesn't have one of its own.
    pub default_image: Option<String>,

    pub default_image_alt: String,

    pub posts_directory: PathBuf,

    pub mode: Mode,
}

impl Config {
    /// Looks for a `sitemeta.yaml` in `dir` and then in each of its parents
    /// and loads the first one found.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let mut current = Some(dir);
        while let Some(dir) = current {
            let path = dir.join(PROJECT_FILE_NAME);
            if path.is_file() {
                return Config::from_project_file(&path);
            }
            current = dir.parent();
        }
        Err(Error::NotFound(dir.to_owned()))
    }

    /// Loads a project file. Relative paths inside it are relative to the
    /// directory containing it.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path).map_err(|err| Error::Open {
            path: path.to_owned(),
            err,
        })?;
        let project: Project =
            serde_yaml::from_reader(file).map_err(|err| Error::Parse {
                path: path.to_owned(),
                err,
            })?;
        log::debug!("loaded project file `{}`", path.display());
        let project_root = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(Config::from_project(project, project_root))
    }

    /// Parses project YAML directly; used when the text isn't in a file.
    pub fn from_yaml(yaml: &str, project_root: &Path) -> Result<Config> {
        let project: Project =
            serde_yaml::from_str(yaml).map_err(|err| Error::Parse {
                path: project_root.join(PROJECT_FILE_NAME),
                err,
            })?;
        Ok(Config::from_project(project, project_root))
    }

    fn from_project(project: Project, project_root: &Path) -> Config {
        if let Some(site_url) = &project.site_metadata.site_url {
            if let Err(e) = url::Url::parse(site_url) {
                log::warn!(
                    "`site_url` `{}` is not an absolute URL: {}",
                    site_url,
                    e
                );
            }
        }

        Config {
            default_image_alt: match project.default_image_alt {
                Some(alt) => alt,
                None => format!("{} logo", project.site_metadata.title),
            },
            site_metadata: project.site_metadata,
            lang: project.lang.0,
            default_image: project.default_image,
            posts_directory: project_root.join(
                project
                    .posts_directory
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_POSTS_DIRECTORY)),
            ),
            mode: project.mode,
        }
    }

    /// Replaces the mode from the project file with `mode`, if one is given
    /// (e.g., from the command line).
    pub fn override_mode(
        &mut self,
        mode: Option<&str>,
    ) -> std::result::Result<(), UnknownModeError> {
        if let Some(mode) = mode {
            self.mode = mode.parse()?;
            log::debug!("mode overridden to {}", self.mode);
        }
        Ok(())
    }

    /// Builds a [`Resolver`] over the configured `site_url` and mode.
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self.site_metadata.site_url.as_deref())
            .with_mode(self.mode)
    }
}

/// The result of loading a [`Config`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading a [`Config`].
#[derive(Debug)]
pub enum Error {
    /// Returned when no project file exists in the starting directory or any
    /// of its parents.
    NotFound(PathBuf),

    /// Returned when the project file couldn't be opened.
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when the project file isn't valid.
    Parse { path: PathBuf, err: serde_yaml::Error },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NotFound(dir) => write!(
                f,
                "Could not find `{}` in `{}` or any parent directory",
                PROJECT_FILE_NAME,
                dir.display()
            ),
            Error::Open { path, err } => {
                write!(f, "Opening project file '{}': {}", path.display(), err)
            }
            Error::Parse { path, err } => {
                write!(f, "Loading project file '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::NotFound(_) => None,
            Error::Open { path: _, err } => Some(err),
            Error::Parse { path: _, err } => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PROJECT: &str = "
site_metadata:
  title: Example Blog
  description: Notes on software
  site_url: https://example.com
  social:
    twitter: example
default_image: /static/icon.png
mode: development
";

    #[test]
    fn test_from_yaml() -> Result<()> {
        let config = Config::from_yaml(PROJECT, Path::new("/blog"))?;
        assert_eq!("Example Blog", config.site_metadata.title);
        assert_eq!("Notes on software", config.site_metadata.description);
        assert_eq!(
            Some("https://example.com"),
            config.site_metadata.site_url.as_deref()
        );
        assert_eq!(
            Some("example"),
            config.site_metadata.social.twitter.as_deref()
        );
        assert_eq!(Some("/static/icon.png"), config.default_image.as_deref());
        assert_eq!(Mode::Development, config.mode);
        Ok(())
    }

    #[test]
    fn test_from_yaml_defaults() -> Result<()> {
        let config = Config::from_yaml(
            "site_metadata:\n  title: Example Blog\n",
            Path::new("/blog"),
        )?;
        assert_eq!("en", config.lang);
        assert_eq!("", config.site_metadata.description);
        assert_eq!(None, config.site_metadata.site_url);
        assert_eq!(None, config.site_metadata.social.twitter);
        assert_eq!(None, config.default_image);
        assert_eq!("Example Blog logo", config.default_image_alt);
        assert_eq!(PathBuf::from("/blog/content/blog"), config.posts_directory);
        assert_eq!(Mode::Production, config.mode);
        Ok(())
    }

    #[test]
    fn test_from_yaml_missing_title() {
        match Config::from_yaml("lang: fr\n", Path::new("/blog")) {
            Err(Error::Parse { .. }) => {}
            other => panic!("wanted a parse error; found {:?}", other),
        }
    }

    #[test]
    fn test_resolver_uses_site_url_and_mode() -> Result<()> {
        let config = Config::from_yaml(PROJECT, Path::new("/blog"))?;
        assert_eq!(
            Some("/static/icon.png".to_owned()),
            config.resolver().resolve(config.default_image.as_deref())
        );

        let mut config = config;
        config.mode = Mode::Production;
        assert_eq!(
            Some("https://example.com/static/icon.png".to_owned()),
            config.resolver().resolve(config.default_image.as_deref())
        );
        Ok(())
    }

    #[test]
    fn test_site_url_kept_verbatim_when_not_absolute() -> Result<()> {
        let config = Config::from_yaml(
            "site_metadata:\n  title: Example\n  site_url: example.com\n",
            Path::new("/blog"),
        )?;
        assert_eq!(
            Some("example.com"),
            config.site_metadata.site_url.as_deref()
        );
        assert_eq!(
            Some("example.com/x".to_owned()),
            config.resolver().resolve(Some("/x"))
        );
        Ok(())
    }

    #[test]
    fn test_from_project_file_missing() {
        let path = Path::new("/nonexistent/sitemeta/sitemeta.yaml");
        match Config::from_project_file(path) {
            Err(Error::Open { path: found, err }) => {
                assert_eq!(path, found);
                assert_eq!(std::io::ErrorKind::NotFound, err.kind());
            }
            other => panic!("wanted an open error; found {:?}", other),
        }
    }

    #[test]
    fn test_override_mode() -> Result<()> {
        let mut config = Config::from_yaml(PROJECT, Path::new("/blog"))?;
        assert_eq!(Mode::Development, config.mode);

        config.override_mode(None).unwrap();
        assert_eq!(Mode::Development, config.mode);
        assert_eq!(
            Some("/hello/".to_owned()),
            config.resolver().resolve(Some("/hello/"))
        );

        config.override_mode(Some("production")).unwrap();
        assert_eq!(Mode::Production, config.mode);
        assert_eq!(
            Some("https://example.com/hello/".to_owned()),
            config.resolver().resolve(Some("/hello/"))
        );

        assert!(config.override_mode(Some("staging")).is_err());
        assert_eq!(Mode::Production, config.mode);
        Ok(())
    }

    #[test]
    fn test_from_directory_searches_parents(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let root = tempfile::tempdir()?;
        File::create(root.path().join(PROJECT_FILE_NAME))?
            .write_all(PROJECT.as_bytes())?;
        let nested = root.path().join("content").join("blog");
        std::fs::create_dir_all(&nested)?;

        let config = Config::from_directory(&nested)?;
        assert_eq!("Example Blog", config.site_metadata.title);
        assert_eq!(root.path().join("content/blog"), config.posts_directory);
        Ok(())
    }

    #[test]
    fn test_from_directory_not_found(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let root = tempfile::tempdir()?;
        // Parents of the temp dir might legitimately contain a project file,
        // so only the error shape matters when one isn't found.
        match Config::from_directory(root.path()) {
            Err(Error::NotFound(dir)) => assert_eq!(root.path(), dir),
            Ok(_) => {}
            Err(e) => return Err(Box::new(e)),
        }
        Ok(())
    }
}
