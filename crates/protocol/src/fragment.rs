use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The fragment part of an in-page link (`#about` → `about`).
///
/// Cheap to clone: navigation links and sections share the same name, so
/// the text lives behind an `Arc<str>`.
///
/// Implements `PartialEq<&str>` so a fragment compares directly against a
/// section's `id` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fragment(Arc<str>);

impl Fragment {
    /// Build a fragment from a section id (no leading `#`).
    pub fn new(id: &str) -> Self {
        Fragment(Arc::from(id))
    }

    /// Parse an `href` attribute.
    ///
    /// Returns `None` for anything that is not an in-page link, and for the
    /// placeholder hrefs `#` and `#!`.
    pub fn from_href(href: &str) -> Option<Self> {
        let id = href.strip_prefix('#')?;
        if id.is_empty() || id == "!" {
            return None;
        }
        Some(Fragment::new(id))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `href` this fragment came from.
    pub fn href(&self) -> String {
        format!("#{}", self.0)
    }
}

impl PartialEq<str> for Fragment {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Fragment {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl std::borrow::Borrow<str> for Fragment {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// Serialized as the href form so config files read like the markup.

impl Serialize for Fragment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.href())
    }
}

impl<'de> Deserialize<'de> for Fragment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Fragment::from_href(&s)
            .or_else(|| (!s.is_empty() && !s.starts_with('#')).then(|| Fragment::new(&s)))
            .ok_or_else(|| serde::de::Error::custom(format!("not a link fragment: {s:?}")))
    }
}
