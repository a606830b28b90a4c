//! Assembles the metadata for a page's `<head>`: the title, the description
//! and social-preview (Open Graph and Twitter card) tags, and the canonical
//! link. Missing page values fall back to the site's values; nothing here
//! fails.

use crate::config::Config;
use crate::post::Post;
use crate::url::{is_absolute, Resolver};

/// How a tag is keyed: `<meta name="...">` or `<meta property="...">`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MetaKey {
    Name(String),
    Property(String),
}

impl MetaKey {
    /// The attribute the key goes in, i.e., `name` or `property`.
    pub fn attribute(&self) -> &'static str {
        match self {
            MetaKey::Name(_) => "name",
            MetaKey::Property(_) => "property",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            MetaKey::Name(value) | MetaKey::Property(value) => value,
        }
    }
}

/// A single `<meta>` tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetaTag {
    pub key: MetaKey,
    pub content: String,
}

impl MetaTag {
    pub fn name(name: &str, content: &str) -> MetaTag {
        MetaTag {
            key: MetaKey::Name(name.to_owned()),
            content: content.to_owned(),
        }
    }

    pub fn property(property: &str, content: &str) -> MetaTag {
        MetaTag {
            key: MetaKey::Property(property.to_owned()),
            content: content.to_owned(),
        }
    }
}

/// The Twitter card variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TwitterCard {
    Summary,
    SummaryLargeImage,
}

impl TwitterCard {
    pub fn as_str(&self) -> &'static str {
        match self {
            TwitterCard::Summary => "summary",
            TwitterCard::SummaryLargeImage => "summary_large_image",
        }
    }
}

/// The assembled metadata for one page. See [`crate::head`] for rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct Head {
    pub lang: String,
    pub title: String,
    pub canonical: Option<String>,
    pub meta: Vec<MetaTag>,
}

impl Head {
    /// Returns the content of the first tag keyed by `key` (a `name` or a
    /// `property`), if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.meta
            .iter()
            .find(|tag| tag.key.value() == key)
            .map(|tag| tag.content.as_str())
    }
}

/// The page-level inputs for a [`Head`]. Only `title` is required;
/// everything else falls back to the site configuration.
#[derive(Clone, Debug, Default)]
pub struct Seo<'a> {
    title: &'a str,
    description: Option<&'a str>,
    lang: Option<&'a str>,
    meta: Vec<MetaTag>,
    image_src: Option<String>,
    image_alt: Option<&'a str>,
    canonical_path: Option<String>,
}

impl<'a> Seo<'a> {
    pub fn new(title: &'a str) -> Seo<'a> {
        Seo {
            title,
            ..Seo::default()
        }
    }

    /// Fills in everything a blog post page provides: its title, its
    /// description (or excerpt), its preview image and alt text, and its
    /// canonical path (see [`Post::canonical_path`]).
    pub fn for_post(post: &'a Post) -> Seo<'a> {
        Seo {
            title: &post.title,
            description: Some(post.description_or_excerpt()),
            image_src: post.image_path(),
            image_alt: post.image_alt.as_deref(),
            canonical_path: Some(post.canonical_path().to_owned()),
            ..Seo::default()
        }
    }

    pub fn description(mut self, description: &'a str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn lang(mut self, lang: &'a str) -> Self {
        self.lang = Some(lang);
        self
    }

    /// Appends a tag after the standard ones.
    pub fn meta(mut self, tag: MetaTag) -> Self {
        self.meta.push(tag);
        self
    }

    /// Sets the social-preview image. Relative paths are resolved against
    /// the site URL; absolute URLs are used as is.
    pub fn image(mut self, src: &str) -> Self {
        self.image_src = Some(src.to_owned());
        self
    }

    pub fn image_alt(mut self, alt: &'a str) -> Self {
        self.image_alt = Some(alt);
        self
    }

    /// Sets the canonical link. Relative paths are resolved against the
    /// site URL; absolute URLs are used as is.
    pub fn canonical_path(mut self, path: &str) -> Self {
        self.canonical_path = Some(path.to_owned());
        self
    }

    /// Builds the [`Head`]. A page image makes the Twitter card
    /// `summary_large_image`; without one the site's default image (usually
    /// a small icon) is used with a `summary` card. The three image tags are
    /// left out entirely when no image URL can be resolved, and
    /// `twitter:creator` is left out when the site has no Twitter handle.
    pub fn assemble(&self, site: &Config, resolver: &Resolver) -> Head {
        let description: &str = match non_empty(self.description) {
            Some(description) => description,
            None => {
                log::debug!(
                    "`{}` has no description; using the site's",
                    self.title
                );
                site.site_metadata.description.as_str()
            }
        };

        let page_image = non_empty(self.image_src.as_deref());
        let image = match page_image {
            Some(src) if is_absolute(src) => Some(src.to_owned()),
            Some(src) => resolver.resolve(Some(src)),
            None => {
                log::debug!(
                    "`{}` has no image; using the site default",
                    self.title
                );
                resolver.resolve(site.default_image.as_deref())
            }
        };
        let card = match page_image {
            Some(_) => TwitterCard::SummaryLargeImage,
            None => TwitterCard::Summary,
        };
        let image_alt: &str = match non_empty(self.image_alt) {
            Some(alt) => alt,
            None => site.default_image_alt.as_str(),
        };

        let mut meta = vec![
            MetaTag::name("description", description),
            MetaTag::property("og:title", self.title),
            MetaTag::property("og:description", description),
            MetaTag::property("og:type", "website"),
        ];
        if let Some(image) = &image {
            meta.push(MetaTag::property("og:image", image));
        }
        meta.push(MetaTag::name("twitter:card", card.as_str()));
        let twitter = site.site_metadata.social.twitter.as_deref();
        if let Some(twitter) = non_empty(twitter) {
            meta.push(MetaTag::name("twitter:creator", twitter));
        }
        meta.push(MetaTag::name("twitter:title", self.title));
        meta.push(MetaTag::name("twitter:description", description));
        if let Some(image) = &image {
            meta.push(MetaTag::name("twitter:image", image));
            meta.push(MetaTag::name("twitter:image:alt", image_alt));
        }
        meta.extend(self.meta.iter().cloned());

        Head {
            lang: non_empty(self.lang).unwrap_or(&site.lang).to_owned(),
            title: format!("{} | {}", self.title, site.site_metadata.title),
            canonical: match non_empty(self.canonical_path.as_deref()) {
                Some(url) if is_absolute(url) => Some(url.to_owned()),
                path => resolver.resolve(path),
            },
            meta,
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
