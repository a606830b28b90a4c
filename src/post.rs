//! Defines the [`Post`] and [`Error`] types and the logic for loading posts
//! from the posts directory. Only the parts of a post that feed page metadata
//! are kept: the frontmatter, a URL slug, and a plain-text excerpt of the
//! body.

use crate::config::Config;
use crate::url::is_absolute;
use pulldown_cmark::{Event, Parser, Tag};
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::path::{Component, Path, PathBuf};

const MARKDOWN_EXTENSION: &str = "md";

/// Excerpts are pruned to at most this many characters (not counting the
/// trailing ellipsis).
pub const EXCERPT_LENGTH: usize = 160;

#[derive(Deserialize)]
struct Frontmatter {
    title: String,

    date: String,

    #[serde(default)]
    description: Option<String>,

    #[serde(default)]
    image: Option<String>,

    #[serde(default, rename = "imageAlt")]
    image_alt: Option<String>,

    #[serde(default, rename = "isExternal")]
    is_external: bool,

    #[serde(default, rename = "externalUrl")]
    external_url: Option<String>,
}

/// A blog post, as far as page metadata is concerned.
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    /// The post's path on the site, e.g., `/hello-world/`.
    pub slug: String,

    pub title: String,

    pub date: String,

    pub description: Option<String>,

    /// The preview image as written in the frontmatter. See
    /// [`Post::image_path`] for the site path.
    pub image: Option<String>,

    pub image_alt: Option<String>,

    /// Set for posts that only link to an article hosted elsewhere.
    pub is_external: bool,

    pub external_url: Option<String>,

    /// Plain text from the start of the body. See [`EXCERPT_LENGTH`].
    pub excerpt: String,
}

impl Post {
    /// Parses a post from its source text. `relative_path` is the path of the
    /// source file relative to the posts directory and determines the slug.
    ///
    /// The source must be structured as follows:
    ///
    /// ```md
    /// ---
    /// title: Hello, world!
    /// date: 2021-04-16
    /// description: An optional summary
    /// image: ./cover.png
    /// imageAlt: A description of the cover
    /// ---
    /// # Hello
    ///
    /// World
    /// ```
    pub fn parse(relative_path: &Path, input: &str) -> Result<Post> {
        fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
            const FENCE: &str = "---";
            if !input.starts_with(FENCE) {
                return Err(Error::FrontmatterMissingStartFence);
            }
            match input[FENCE.len()..].find(FENCE) {
                None => Err(Error::FrontmatterMissingEndFence),
                Some(offset) => Ok((
                    FENCE.len(),                        // yaml_start
                    FENCE.len() + offset,               // yaml_stop
                    FENCE.len() + offset + FENCE.len(), // body_start
                )),
            }
        }

        let (yaml_start, yaml_stop, body_start) = frontmatter_indices(input)?;
        let frontmatter: Frontmatter =
            serde_yaml::from_str(&input[yaml_start..yaml_stop])?;

        Ok(Post {
            slug: slug(relative_path),
            title: frontmatter.title,
            date: frontmatter.date,
            description: frontmatter.description,
            image: frontmatter.image,
            image_alt: frontmatter.image_alt,
            is_external: frontmatter.is_external,
            external_url: frontmatter.external_url,
            excerpt: excerpt(&input[body_start..], EXCERPT_LENGTH),
        })
    }

    /// The description if there is a non-empty one, otherwise the excerpt.
    pub fn description_or_excerpt(&self) -> &str {
        match self.description.as_deref() {
            Some(description) if !description.is_empty() => description,
            _ => &self.excerpt,
        }
    }

    /// Where the post canonically lives: the external article for posts that
    /// only link elsewhere, otherwise the post's own slug.
    pub fn canonical_path(&self) -> &str {
        match self.external_url.as_deref() {
            Some(url) if self.is_external && is_absolute(url) => url,
            _ => &self.slug,
        }
    }

    /// The site path of the post's preview image. Images are usually stored
    /// beside the post, so a relative image (`cover.png`, `./cover.png`) is
    /// taken to live under the post's slug. Root-relative paths and absolute
    /// URLs are returned as they are.
    pub fn image_path(&self) -> Option<String> {
        let image = self.image.as_deref().filter(|i| !i.is_empty())?;
        if image.starts_with('/') || is_absolute(image) {
            return Some(image.to_owned());
        }
        Some(format!("{}{}", self.slug, image.trim_start_matches("./")))
    }
}

/// Derives the site path for a post from its path relative to the posts
/// directory: `hello.md` and `hello/index.md` both become `/hello/`.
pub fn slug(relative_path: &Path) -> String {
    let without_extension = relative_path.with_extension("");
    let dir: &Path = match without_extension.file_name() {
        Some(name) if name == "index" => {
            without_extension.parent().unwrap_or_else(|| Path::new(""))
        }
        _ => &without_extension,
    };

    let mut slug = String::from("/");
    for component in dir.components() {
        if let Component::Normal(name) = component {
            slug.push_str(&name.to_string_lossy());
            slug.push('/');
        }
    }
    slug
}

/// Renders `markdown` to plain text and prunes it to at most `length`
/// characters, cutting on a word boundary and appending `…` when anything
/// was cut.
pub fn excerpt(markdown: &str, length: usize) -> String {
    let mut text = String::new();
    for event in Parser::new(markdown) {
        match event {
            Event::Text(s) | Event::Code(s) => text.push_str(&s),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::End(Tag::Paragraph)
            | Event::End(Tag::Heading(_))
            | Event::End(Tag::Item) => text.push(' '),
            _ => {}
        }
    }

    let mut out = String::new();
    let mut out_len = 0;
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let sep_len = if out.is_empty() { 0 } else { 1 };
        if out_len + sep_len + word_len > length {
            if out.is_empty() {
                // A single word longer than the limit gets cut mid-word.
                out.extend(word.chars().take(length));
            }
            out.push('…');
            return out;
        }
        if sep_len > 0 {
            out.push(' ');
        }
        out.push_str(word);
        out_len += sep_len + word_len;
    }
    out
}

/// Walks `dir` and parses every markdown file in it. Returns the posts
/// ordered by date, most recent first.
pub fn parse_posts(dir: &Path) -> Result<Vec<Post>> {
    use walkdir::WalkDir;

    let mut posts = Vec::new();
    for result in WalkDir::new(dir) {
        let entry = result?;
        let is_markdown = entry
            .path()
            .extension()
            .map_or(false, |ext| ext == MARKDOWN_EXTENSION);
        if !entry.file_type().is_file() || !is_markdown {
            continue;
        }

        // strip_prefix() should never fail since `dir` is the walk root
        let relative_path = entry.path().strip_prefix(dir).unwrap();
        posts.push(parse_post(entry.path(), relative_path)?);
    }

    log::info!("parsed {} posts from `{}`", posts.len(), dir.display());
    posts.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(posts)
}

/// Reads and parses the post at `path`. Errors are annotated with the
/// relative path.
pub fn parse_post(path: &Path, relative_path: &Path) -> Result<Post> {
    fn read(path: &Path, relative_path: &Path) -> Result<Post> {
        use std::io::Read;
        let mut contents = String::new();
        File::open(path)?.read_to_string(&mut contents)?;
        Post::parse(relative_path, &contents)
    }

    log::debug!("parsing post `{}`", path.display());
    read(path, relative_path).map_err(|e| {
        Error::Annotated(
            format!("parsing post `{}`", relative_path.display()),
            Box::new(e),
        )
    })
}

/// Reads and parses a single post given by a path anywhere on disk (e.g.,
/// one named on the command line). The slug comes from the post's location
/// within the configured posts directory, so a file outside of it is an
/// error.
pub fn parse_post_in(config: &Config, path: &Path) -> Result<Post> {
    let posts_directory = std::fs::canonicalize(&config.posts_directory)?;
    let absolute = std::fs::canonicalize(path)?;
    let relative_path = absolute.strip_prefix(&posts_directory).map_err(|_| {
        Error::OutsidePostsDirectory {
            path: path.to_owned(),
            posts_directory: config.posts_directory.clone(),
        }
    })?;
    parse_post(&absolute, relative_path)
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Post`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post source file is missing its starting frontmatter
    /// fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when the starting fence was found but the ending one was
    /// missing.
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the frontmatter as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// Returned for WalkDir I/O errors.
    WalkDir(walkdir::Error),

    /// Returned when a post is requested by a path that isn't inside the
    /// posts directory.
    OutsidePostsDirectory {
        path: PathBuf,
        posts_directory: PathBuf,
    },

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "Post must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::OutsidePostsDirectory {
                path,
                posts_directory,
            } => write!(
                f,
                "`{}` is not inside the posts directory `{}`",
                path.display(),
                posts_directory.display()
            ),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::OutsidePostsDirectory { .. } => None,
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
