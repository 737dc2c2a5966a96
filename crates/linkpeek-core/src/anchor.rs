//! Link anchors and title recognition.

/// Embedder-assigned identity of a link element. Stable for the lifetime of
/// the element; two dwells on the same element must carry the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorId(pub u64);

/// A previewable link: stable identity plus the page title its href points
/// at. Geometry is not part of the anchor: it is captured per dwell in a
/// [`crate::geometry::DwellSample`], since the layout can change between
/// dwells.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Anchor {
    pub id: AnchorId,
    /// Title key as it appears in the href, still percent-encoded.
    pub title: String,
}

impl Anchor {
    /// Recognize a link by its href.
    ///
    /// Returns `None` when the href does not start with the configured
    /// prefix or carries no title; unrecognized links are ignored, not
    /// errors.
    pub fn from_href(id: AnchorId, href: &str, href_prefix: &str) -> Option<Self> {
        let title = href.strip_prefix(href_prefix)?;
        if title.is_empty() {
            return None;
        }
        Some(Self {
            id,
            title: title.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "https://en.wikipedia.org/wiki/";

    #[test]
    fn recognizes_prefixed_href() {
        let anchor = Anchor::from_href(AnchorId(1), &format!("{PREFIX}Rust_(programming_language)"), PREFIX)
            .expect("recognized");
        assert_eq!(anchor.title, "Rust_(programming_language)");
    }

    #[test]
    fn ignores_foreign_href() {
        assert!(Anchor::from_href(AnchorId(1), "https://example.org/wiki/Rust", PREFIX).is_none());
    }

    #[test]
    fn ignores_bare_prefix() {
        assert!(Anchor::from_href(AnchorId(1), PREFIX, PREFIX).is_none());
    }

    #[test]
    fn identity_is_part_of_equality() {
        let a = Anchor::from_href(AnchorId(1), &format!("{PREFIX}Ada"), PREFIX).expect("a");
        let b = Anchor::from_href(AnchorId(2), &format!("{PREFIX}Ada"), PREFIX).expect("b");
        assert_ne!(a, b);
    }
}
