//! Preview content model.
//!
//! Normalizes the raw summary payload into the model a session renders
//! from. Normalization happens once, at fetch completion; the model is
//! owned by the session until hide.

use serde::Deserialize;

use crate::geometry::TextDirection;

/// Raw summary payload as served by the REST endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSummary {
    pub title: String,
    pub content_urls: ContentUrls,
    /// Language code of the summarized page.
    pub lang: String,
    /// Text direction of the summarized page ("ltr"/"rtl").
    pub dir: String,
    /// Extract as an HTML fragment; may be absent or empty.
    #[serde(default)]
    pub extract_html: Option<String>,
    /// Upstream kind hint; free-form, validated during normalization.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<RawThumbnail>,
    pub pageid: u64,
}

/// Canonical page URLs per form factor.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentUrls {
    pub desktop: DesktopUrls,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DesktopUrls {
    pub page: String,
}

/// Thumbnail descriptor as served: source plus natural dimensions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawThumbnail {
    pub source: String,
    pub width: f64,
    pub height: f64,
}

/// Closed set of preview kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    /// No usable extract; rendered as a bare "no preview" card.
    Generic,
    /// Standard article summary.
    Page,
    /// Disambiguation page listing. Recognized but not renderable yet.
    Disambiguation,
    /// Footnote/reference preview. Recognized but not renderable yet.
    Reference,
}

impl PreviewKind {
    /// Derive the kind from the upstream hint and the processed extract.
    ///
    /// An absent extract forces [`PreviewKind::Generic`]. Otherwise known
    /// hints pass through and anything else defaults to
    /// [`PreviewKind::Page`].
    fn derive(hint: Option<&str>, extract: Option<&str>) -> Self {
        if extract.is_none() {
            return Self::Generic;
        }
        match hint {
            Some("generic") => Self::Generic,
            Some("disambiguation") => Self::Disambiguation,
            Some("page") => Self::Page,
            _ => Self::Page,
        }
    }
}

/// Normalized preview content.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewModel {
    pub title: String,
    /// Canonical desktop URL of the page.
    pub url: String,
    pub language_code: String,
    /// Direction of the extract text, independent of the hosting document.
    pub language_direction: TextDirection,
    /// Sanitized extract; `None` when the page has none.
    pub extract: Option<String>,
    pub kind: PreviewKind,
    pub thumbnail: Option<RawThumbnail>,
    pub page_id: u64,
}

impl PreviewModel {
    /// Normalize a raw summary into the render model.
    pub fn from_summary(raw: RawSummary) -> Self {
        let extract = raw.extract_html.filter(|extract| !extract.is_empty());
        let kind = PreviewKind::derive(raw.kind.as_deref(), extract.as_deref());
        Self {
            title: raw.title,
            url: raw.content_urls.desktop.page,
            language_code: raw.lang,
            language_direction: TextDirection::from_attr(&raw.dir),
            extract,
            kind,
            thumbnail: raw.thumbnail,
            page_id: raw.pageid,
        }
    }
}
