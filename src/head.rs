//! Renders a [`Head`] either as a block of HTML ([`Head::write_html`]) or
//! through a user-provided [`gtmpl`] template ([`render_template`]).

use crate::seo::{Head, MetaTag};
use gtmpl::Value;
use pulldown_cmark::escape::escape_html;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

impl Head {
    /// Writes the `<title>`, one `<meta>` per tag, and the canonical
    /// `<link>` (if any), one element per line. All values are escaped.
    pub fn write_html(&self, out: &mut String) -> io::Result<()> {
        out.push_str("<title>");
        escape_html(&mut *out, &self.title)?;
        out.push_str("</title>\n");

        for tag in &self.meta {
            out.push_str("<meta ");
            out.push_str(tag.key.attribute());
            out.push_str("=\"");
            escape_html(&mut *out, tag.key.value())?;
            out.push_str("\" content=\"");
            escape_html(&mut *out, &tag.content)?;
            out.push_str("\">\n");
        }

        if let Some(canonical) = &self.canonical {
            out.push_str("<link rel=\"canonical\" href=\"");
            escape_html(&mut *out, canonical)?;
            out.push_str("\">\n");
        }
        Ok(())
    }

    pub fn to_html(&self) -> io::Result<String> {
        let mut out = String::new();
        self.write_html(&mut out)?;
        Ok(out)
    }
}

// gtmpl doesn't escape anything, so templates get an `_html` copy of every
// free-text field for use inside markup.
fn escaped(s: &str) -> Value {
    let mut out = String::with_capacity(s.len());
    // Writing into a `String` can't fail.
    let _ = escape_html(&mut out, s);
    Value::String(out)
}

impl From<&MetaTag> for Value {
    /// Converts a [`MetaTag`] into an object with fields `key` (`name` or
    /// `property`), `name`, and `content`. `name_html` and `content_html`
    /// hold the same values escaped for HTML attributes.
    fn from(tag: &MetaTag) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("key".to_owned(), tag.key.attribute().into());
        m.insert("name".to_owned(), tag.key.value().into());
        m.insert("name_html".to_owned(), escaped(tag.key.value()));
        m.insert("content".to_owned(), (&tag.content).into());
        m.insert("content_html".to_owned(), escaped(&tag.content));
        Value::Object(m)
    }
}

impl From<&Head> for Value {
    /// Converts a [`Head`] into an object with fields `lang`, `title`,
    /// `canonical` (nil when absent), and `meta` (an array of tag objects).
    /// Values are raw; `title_html` and `canonical_html` are escaped.
    fn from(head: &Head) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("lang".to_owned(), (&head.lang).into());
        m.insert("title".to_owned(), (&head.title).into());
        m.insert("title_html".to_owned(), escaped(&head.title));
        let (canonical, canonical_html) = match &head.canonical {
            Some(canonical) => (canonical.into(), escaped(canonical)),
            None => (Value::Nil, Value::Nil),
        };
        m.insert("canonical".to_owned(), canonical);
        m.insert("canonical_html".to_owned(), canonical_html);
        m.insert(
            "meta".to_owned(),
            Value::Array(head.meta.iter().map(Value::from).collect()),
        );
        Value::Object(m)
    }
}

/// Renders `head` with the template text `template`.
pub fn render_template(template: &str, head: &Head) -> Result<String> {
    gtmpl::template(template, Value::from(head))
        .map_err(|e| Error::Template(e.to_string()))
}

/// Loads a template file for [`render_template`].
pub fn read_template(path: &Path) -> Result<String> {
    use std::io::Read;
    let mut contents = String::new();
    File::open(path)
        .and_then(|mut file| file.read_to_string(&mut contents))
        .map_err(|err| Error::OpenTemplateFile {
            path: path.to_owned(),
            err,
        })?;
    Ok(contents)
}

/// The result of a fallible rendering operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error rendering a [`Head`].
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// Returned for I/O problems while reading a template file.
    OpenTemplateFile { path: PathBuf, err: io::Error },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::OpenTemplateFile { path: _, err } => Some(err),
        }
    }
}
