//! Reports posts whose metadata silently falls back to site-wide values.
//! None of these are errors (the head is still complete) but they usually
//! mean a post is missing something in its frontmatter.

use crate::config::Config;
use crate::post::Post;
use crate::seo::Seo;
use crate::url::Resolver;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Issue {
    /// The post has neither a description nor any body text to excerpt.
    NoDescription,

    /// The post has no image, so the site's default image is shown. Not
    /// reported for external posts, which rarely carry their own image.
    DefaultImage,

    /// The post names an image but no URL could be built for it.
    UnresolvedImage,

    /// No canonical URL could be built for the post.
    NoCanonical,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Issue::NoDescription => "no description or excerpt",
            Issue::DefaultImage => "no image; using the site default",
            Issue::UnresolvedImage => "image URL could not be resolved",
            Issue::NoCanonical => "canonical URL could not be resolved",
        })
    }
}

/// An [`Issue`] found in a particular post.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Finding {
    pub slug: String,
    pub issue: Issue,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.slug, self.issue)
    }
}

/// Assembles the head of every post and collects the fallbacks taken along
/// the way, in post order.
pub fn check_posts(
    posts: &[Post],
    site: &Config,
    resolver: &Resolver,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    for post in posts {
        let head = Seo::for_post(post).assemble(site, resolver);
        let mut found = |issue| {
            findings.push(Finding {
                slug: post.slug.clone(),
                issue,
            })
        };

        if post.description_or_excerpt().is_empty() {
            found(Issue::NoDescription);
        }
        match post.image_path() {
            None if post.is_external => {}
            None => found(Issue::DefaultImage),
            Some(_) if head.get("og:image").is_none() => {
                found(Issue::UnresolvedImage)
            }
            Some(_) => {}
        }
        if head.canonical.is_none() {
            found(Issue::NoCanonical);
        }
    }
    findings
}
