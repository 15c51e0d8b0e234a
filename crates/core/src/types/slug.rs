//! URL-safe slugs for categories and products.
//!
//! A slug is the lowercase, hyphen-delimited form of a display name:
//! `"Rose & Tulip Bouquet"` becomes `"rose-tulip-bouquet"`.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The input string is empty.
    #[error("slug cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("slug must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input is not already in slug form.
    #[error("slug may only contain lowercase letters, digits and single hyphens")]
    NotCanonical,
}

/// Derive a slug from a display name.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single `-`, and trims leading and trailing hyphens. Applying it to its own
/// output returns the same string.
///
/// ```
/// use piko_pearl_core::slugify;
///
/// assert_eq!(slugify("Handmade Crochet Bags"), "handmade-crochet-bags");
/// assert_eq!(slugify("  Sunflower -- Keychain! "), "sunflower-keychain");
/// assert_eq!(slugify("handmade-crochet-bags"), "handmade-crochet-bags");
/// ```
#[must_use]
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for c in input.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// A validated slug.
///
/// Unlike [`slugify`], parsing does not rewrite its input: it only accepts
/// strings that are already canonical. Use it where a client submits a slug
/// directly (e.g. admin category forms).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Maximum length of a slug.
    pub const MAX_LENGTH: usize = 100;

    /// Parse a canonical slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than
    /// [`Slug::MAX_LENGTH`], or differs from `slugify(input)`.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }
        if s.chars().count() > Self::MAX_LENGTH {
            return Err(SlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if slugify(s) != s {
            return Err(SlugError::NotCanonical);
        }
        Ok(Self(s.to_owned()))
    }

    /// Derive a slug from a display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name contains no alphanumeric characters or
    /// produces a slug longer than [`Slug::MAX_LENGTH`].
    pub fn from_name(name: &str) -> Result<Self, SlugError> {
        Self::parse(&slugify(name))
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
