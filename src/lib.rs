//! The library code for `sitemeta`, which builds the `<head>` metadata (title,
//! description, Open Graph and Twitter card tags, canonical link) for the
//! pages of a personal blog. The pieces fit together as follows:
//!
//! 1. The site configuration is loaded from a project file
//!    ([`crate::config`]).
//! 2. Posts are parsed from the posts directory ([`crate::post`]); only the
//!    frontmatter, a slug, and a plain-text excerpt are kept.
//! 3. Each page's inputs are assembled into a [`seo::Head`] ([`crate::seo`]),
//!    falling back to site-wide values for anything the page doesn't
//!    provide. Image and canonical URLs go through [`crate::url::resolve`],
//!    which is where the development/production distinction lives.
//! 4. The head is rendered as HTML or through a template ([`crate::head`]).
//!
//! [`crate::check`] runs step 3 over every post and reports the fallbacks.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod check;
pub mod config;
pub mod head;
pub mod post;
pub mod seo;
pub mod url;
