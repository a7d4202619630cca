#![forbid(unsafe_code)]

//! Shortcut items shown in the dock and the picker.

use std::fmt;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::collection::CollectionError;

/// Stable, unique, immutable identifier of an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What an item's icon field refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconRef<'a> {
    /// Remote image (`http://` or `https://`).
    Url(&'a str),
    /// Inline image (`data:` URI).
    DataUri(&'a str),
    /// Name of a bundled glyph.
    Keyword(&'a str),
    Empty,
}

impl<'a> IconRef<'a> {
    #[must_use]
    pub fn classify(raw: &'a str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed)
        } else if lower.starts_with("data:") {
            Self::DataUri(trimmed)
        } else {
            Self::Keyword(trimmed)
        }
    }

    /// Whether the icon renders as an image rather than a glyph or letter.
    #[must_use]
    pub const fn is_image(&self) -> bool {
        matches!(self, Self::Url(_) | Self::DataUri(_))
    }
}

/// One shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub icon: String,
}

impl Item {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.into(),
            url: url.into(),
            icon: icon.into(),
        }
    }

    #[must_use]
    pub fn icon(&self) -> IconRef<'_> {
        IconRef::classify(&self.icon)
    }

    /// Navigation target with a scheme.
    #[must_use]
    pub fn href(&self) -> String {
        normalize_url(&self.url)
    }

    /// Fallback glyph when no image icon is available.
    ///
    /// First letter of the name; otherwise the first letter of the host
    /// (without `www.`); otherwise the first letter of the icon keyword;
    /// otherwise `'A'`. Always upper-cased.
    #[must_use]
    pub fn display_letter(&self) -> char {
        let from_name = self.name.trim().chars().next();
        let from_host = || host_of(&self.url).and_then(|host| host.chars().next());
        let from_icon = || match self.icon() {
            IconRef::Keyword(word) => word.chars().next(),
            _ => None,
        };
        let letter = from_name.or_else(from_host).or_else(from_icon).unwrap_or('A');
        letter.to_uppercase().next().unwrap_or(letter)
    }
}

/// Host of `url` without a leading `www.`, if one can be found.
fn host_of(url: &str) -> Option<&str> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }
    let rest = match trimmed.find("://") {
        Some(pos) => &trimmed[pos + 3..],
        None => trimmed.trim_start_matches('/'),
    };
    let host = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .rsplit('@')
        .next()
        .unwrap_or_default()
        .split(':')
        .next()
        .unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);
    (!host.is_empty()).then_some(host)
}

/// Give a user-entered URL a scheme.
///
/// Empty input stays empty, `//host` becomes `https://host`, and input
/// without an `http(s)://` scheme gets `https://` prepended.
#[must_use]
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return trimmed.to_owned();
    }
    if let Some(rest) = trimmed.strip_prefix("//") {
        return format!("https://{rest}");
    }
    format!("https://{trimmed}")
}

/// Returns the first identifier that appears more than once.
#[must_use]
pub fn first_duplicate_id(items: &[Item]) -> Option<&ItemId> {
    let mut seen: AHashSet<&ItemId> = AHashSet::with_capacity(items.len());
    items.iter().map(|item| &item.id).find(|id| !seen.insert(*id))
}

/// Reject collections whose identifiers are not unique.
pub fn validate_unique_ids(items: &[Item]) -> Result<(), CollectionError> {
    match first_duplicate_id(items) {
        Some(id) => Err(CollectionError::DuplicateId(id.clone())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, url: &str, icon: &str) -> Item {
        Item::new("id", name, url, icon)
    }

    #[test]
    fn normalize_adds_https() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("  //cdn.example.com/x "), "https://cdn.example.com/x");
        assert_eq!(normalize_url("HTTP://Example.com"), "HTTP://Example.com");
        assert_eq!(normalize_url("https://a.b"), "https://a.b");
        assert_eq!(normalize_url("   "), "");
    }

    #[test]
    fn letter_prefers_name() {
        assert_eq!(item("  github", "https://x.com", "").display_letter(), 'G');
    }

    #[test]
    fn letter_falls_back_to_host_without_www() {
        assert_eq!(item("", "https://www.youtube.com/feed", "").display_letter(), 'Y');
        assert_eq!(item(" ", "mail.example.org", "").display_letter(), 'M');
        assert_eq!(item("", "https://user@host.io:8080/", "").display_letter(), 'H');
    }

    #[test]
    fn letter_falls_back_to_icon_keyword_then_a() {
        assert_eq!(item("", "", "rocket").display_letter(), 'R');
        assert_eq!(item("", "", "https://img/x.png").display_letter(), 'A');
        assert_eq!(item("", "", "").display_letter(), 'A');
    }

    #[test]
    fn icon_classification() {
        assert_eq!(IconRef::classify("HTTPS://a/b.png"), IconRef::Url("HTTPS://a/b.png"));
        assert!(IconRef::classify("data:image/png;base64,AAA").is_image());
        assert_eq!(IconRef::classify(" mail "), IconRef::Keyword("mail"));
        assert_eq!(IconRef::classify(""), IconRef::Empty);
    }

    #[test]
    fn duplicate_ids_are_reported() {
        let items = vec![
            Item::new("a", "A", "a.com", ""),
            Item::new("b", "B", "b.com", ""),
            Item::new("a", "A2", "a2.com", ""),
        ];
        assert_eq!(first_duplicate_id(&items), Some(&ItemId::new("a")));
        assert_eq!(first_duplicate_id(&items[..2]), None);
        assert!(matches!(
            validate_unique_ids(&items),
            Err(CollectionError::DuplicateId(id)) if id.as_str() == "a"
        ));
        assert!(validate_unique_ids(&items[1..]).is_ok());
    }

    #[test]
    fn item_round_trips_with_missing_icon() {
        let parsed: Item =
            serde_json::from_str(r#"{"id":"x","name":"X","url":"x.com"}"#).unwrap();
        assert_eq!(parsed.icon, "");
        assert_eq!(parsed.href(), "https://x.com");
    }
}
