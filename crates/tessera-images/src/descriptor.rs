//! Image descriptors read from `data-bg-object` attributes.

use serde::Deserialize;

/// The named image variants a descriptor may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeName {
    Thumbnail,
    Medium,
    MediumLarge,
    Large,
    Full,
}

impl SizeName {
    /// All size names in descriptor order.
    pub const ALL: [SizeName; 5] = [
        SizeName::Thumbnail,
        SizeName::Medium,
        SizeName::MediumLarge,
        SizeName::Large,
        SizeName::Full,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeName::Thumbnail => "thumbnail",
            SizeName::Medium => "medium",
            SizeName::MediumLarge => "medium_large",
            SizeName::Large => "large",
            SizeName::Full => "full",
        }
    }

    /// Approximate pixel width for entries given as bare URL strings.
    pub fn approx_width(&self) -> u32 {
        match self {
            SizeName::Thumbnail => 150,
            SizeName::Medium => 300,
            SizeName::MediumLarge => 768,
            SizeName::Large => 1024,
            SizeName::Full => 2048,
        }
    }
}

/// A single size entry: either a bare URL or a URL with a pixel width.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SizeEntry {
    Detailed {
        url: String,
        #[serde(default)]
        width: Option<u32>,
    },
    Url(String),
}

impl SizeEntry {
    pub fn url(&self) -> &str {
        match self {
            SizeEntry::Detailed { url, .. } => url,
            SizeEntry::Url(url) => url,
        }
    }

    /// The explicit pixel width, if the entry carries one.
    pub fn width(&self) -> Option<u32> {
        match self {
            SizeEntry::Detailed { width, .. } => *width,
            SizeEntry::Url(_) => None,
        }
    }
}

/// The size map of a descriptor.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Sizes {
    #[serde(default)]
    pub thumbnail: Option<SizeEntry>,
    #[serde(default)]
    pub medium: Option<SizeEntry>,
    #[serde(default)]
    pub medium_large: Option<SizeEntry>,
    #[serde(default)]
    pub large: Option<SizeEntry>,
    #[serde(default)]
    pub full: Option<SizeEntry>,
}

impl Sizes {
    pub fn get(&self, name: SizeName) -> Option<&SizeEntry> {
        match name {
            SizeName::Thumbnail => self.thumbnail.as_ref(),
            SizeName::Medium => self.medium.as_ref(),
            SizeName::MediumLarge => self.medium_large.as_ref(),
            SizeName::Large => self.large.as_ref(),
            SizeName::Full => self.full.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        SizeName::ALL.iter().all(|n| self.get(*n).is_none())
    }

    /// Present entries in descriptor order.
    pub fn entries(&self) -> impl Iterator<Item = (SizeName, &SizeEntry)> {
        SizeName::ALL
            .iter()
            .filter_map(|n| self.get(*n).map(|e| (*n, e)))
    }
}

/// An image descriptor parsed from a `data-bg-object` attribute.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ImageDescriptor {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub sizes: Option<Sizes>,
}

impl ImageDescriptor {
    /// Parse a descriptor from its JSON attribute value.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Fallback URL: top-level `url`, else the `full` size, else `large`.
    pub fn fallback_url(&self) -> Option<&str> {
        if let Some(url) = self.url.as_deref() {
            return Some(url);
        }
        let sizes = self.sizes.as_ref()?;
        sizes
            .full
            .as_ref()
            .or(sizes.large.as_ref())
            .map(|e| e.url())
    }

    /// Whether the descriptor carries at least one named size.
    pub fn has_sizes(&self) -> bool {
        self.sizes.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// Width-annotated candidates for a `srcset` list.
    ///
    /// Entries with an explicit width use it; bare URL strings fall back to
    /// the approximate per-name width table. Object entries without a width
    /// are excluded.
    pub fn width_annotated(&self) -> Vec<(&str, u32)> {
        let Some(sizes) = self.sizes.as_ref() else {
            return Vec::new();
        };
        sizes
            .entries()
            .filter_map(|(name, entry)| match entry {
                SizeEntry::Detailed { url, width: Some(w) } => Some((url.as_str(), *w)),
                SizeEntry::Detailed { width: None, .. } => None,
                SizeEntry::Url(url) => Some((url.as_str(), name.approx_width())),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_mixed_entry_forms() {
        let desc = ImageDescriptor::parse(
            r#"{"url":"img.jpg","sizes":{"thumbnail":"thumb.jpg","large":{"url":"large.jpg","width":1000}}}"#,
        )
        .unwrap();

        assert_eq!(desc.url.as_deref(), Some("img.jpg"));
        let sizes = desc.sizes.as_ref().unwrap();
        assert_eq!(sizes.thumbnail, Some(SizeEntry::Url("thumb.jpg".into())));
        assert_eq!(
            sizes.large.as_ref().map(|e| (e.url(), e.width())),
            Some(("large.jpg", Some(1000)))
        );
    }

    #[test]
    fn fallback_prefers_top_level_url() {
        let desc = ImageDescriptor::parse(
            r#"{"url":"top.jpg","sizes":{"full":"full.jpg","large":"large.jpg"}}"#,
        )
        .unwrap();
        assert_eq!(desc.fallback_url(), Some("top.jpg"));
    }

    #[test]
    fn fallback_resolves_full_before_large() {
        let desc =
            ImageDescriptor::parse(r#"{"sizes":{"full":"full.jpg","large":"large.jpg"}}"#).unwrap();
        assert_eq!(desc.fallback_url(), Some("full.jpg"));

        let desc = ImageDescriptor::parse(r#"{"sizes":{"large":"large.jpg"}}"#).unwrap();
        assert_eq!(desc.fallback_url(), Some("large.jpg"));
    }

    #[test]
    fn no_fallback_without_any_url() {
        let desc = ImageDescriptor::parse(r#"{"sizes":{"thumbnail":"t.jpg"}}"#).unwrap();
        assert_eq!(desc.fallback_url(), None);
    }

    #[test]
    fn width_annotation_uses_table_for_bare_strings() {
        let desc = ImageDescriptor::parse(
            r#"{"sizes":{"thumbnail":"t.jpg","medium":{"url":"m.jpg","width":320},"large":{"url":"l.jpg"}}}"#,
        )
        .unwrap();

        // Bare string gets the table width, explicit width is kept, and the
        // object without a width is excluded.
        assert_eq!(
            desc.width_annotated(),
            vec![("t.jpg", 150), ("m.jpg", 320)]
        );
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(ImageDescriptor::parse("{not json").is_err());
    }
}
