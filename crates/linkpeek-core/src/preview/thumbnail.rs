//! Thumbnail display geometry.
//!
//! Decides whether a raw thumbnail is usable and how to fit it into the
//! portrait or landscape display box. All decisions are pure; the embedder
//! builds the actual image element from the returned geometry.

use crate::geometry::TextDirection;
use crate::preview::model::RawThumbnail;

/// Display box for portrait (tall) thumbnails: exact height, max width.
pub const PORTRAIT_IMAGE: ImageBox = ImageBox {
    width: 203.0,
    height: 250.0,
};

/// Display box for landscape thumbnails: exact width, max height.
pub const LANDSCAPE_IMAGE: ImageBox = ImageBox {
    width: 320.0,
    height: 200.0,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageBox {
    pub width: f64,
    pub height: f64,
}

/// Bracket a device pixel ratio into the supported set {1, 1.5, 2}.
pub fn bracketed_pixel_ratio(dpr: f64) -> f64 {
    if dpr.is_nan() || dpr <= 0.0 {
        return 1.0;
    }
    if dpr > 1.5 {
        2.0
    } else if dpr > 1.0 {
        1.5
    } else {
        1.0
    }
}

/// A thumbnail accepted for display, with its fit geometry resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub source: String,
    /// Portrait orientation: natural width smaller than natural height.
    pub is_tall: bool,
    /// Tall but narrower than the portrait box; the extract column widens
    /// by [`Thumbnail::offset`] to compensate.
    pub is_narrow: bool,
    /// Extract width adjustment for narrow thumbnails, zero otherwise.
    pub offset: f64,
    /// Density-corrected width of the image.
    pub width: f64,
    /// Density-corrected height of the image.
    pub height: f64,
    /// Placement of the image inside its display box.
    pub crop: CropRect,
}

/// Where the image sits inside the clip box. Negative x/y center an
/// oversized image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Mirror transform positioning a clip mask over the thumbnail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipTransform {
    pub scale_x: f64,
    pub translate_x: f64,
}

impl Thumbnail {
    /// Accept and measure a raw thumbnail, or reject it.
    ///
    /// Rejected: images too small for their display box, and source URLs
    /// containing characters that could escape a CSS `url()` context.
    pub fn from_raw(raw: &RawThumbnail, device_pixel_ratio: f64) -> Option<Self> {
        let dpr = bracketed_pixel_ratio(device_pixel_ratio);
        let tall = raw.width < raw.height;
        let thumb_width = raw.width / dpr;
        let thumb_height = raw.height / dpr;

        if !tall && thumb_width < LANDSCAPE_IMAGE.width {
            return None;
        }
        if tall && thumb_height < PORTRAIT_IMAGE.height {
            return None;
        }
        if raw.source.contains('\\') || raw.source.contains('\'') || raw.source.contains('"') {
            return None;
        }

        let crop = if tall {
            let mut x = if thumb_width > PORTRAIT_IMAGE.width {
                (thumb_width - PORTRAIT_IMAGE.width) / -2.0
            } else {
                PORTRAIT_IMAGE.width - thumb_width
            };
            let y = if thumb_height > PORTRAIT_IMAGE.height {
                (thumb_height - PORTRAIT_IMAGE.height) / -2.0
            } else {
                0.0
            };
            let mut width = PORTRAIT_IMAGE.width;
            // Thin tall images are pinned to the box edge, not centered.
            if thumb_width < width {
                x = 0.0;
                width = thumb_width;
            }
            CropRect {
                x,
                y,
                width,
                height: PORTRAIT_IMAGE.height,
            }
        } else {
            let y = if thumb_height > LANDSCAPE_IMAGE.height {
                (thumb_height - LANDSCAPE_IMAGE.height) / -2.0
            } else {
                0.0
            };
            let height = if thumb_height > LANDSCAPE_IMAGE.height {
                LANDSCAPE_IMAGE.height
            } else {
                thumb_height
            };
            CropRect {
                x: 0.0,
                y,
                width: LANDSCAPE_IMAGE.width,
                height,
            }
        };

        let is_narrow = tall && thumb_width < PORTRAIT_IMAGE.width;
        Some(Self {
            source: raw.source.clone(),
            is_tall: tall,
            is_narrow,
            offset: if is_narrow {
                PORTRAIT_IMAGE.width - thumb_width
            } else {
                0.0
            },
            width: thumb_width,
            height: thumb_height,
            crop,
        })
    }

    /// Transform positioning a clip mask over this thumbnail. RTL documents
    /// mirror the mask horizontally.
    pub fn clip_transform(&self, direction: TextDirection) -> ClipTransform {
        if direction.is_rtl() {
            ClipTransform {
                scale_x: -1.0,
                translate_x: if self.is_tall {
                    PORTRAIT_IMAGE.width
                } else {
                    LANDSCAPE_IMAGE.width
                },
            }
        } else {
            ClipTransform {
                scale_x: 1.0,
                translate_x: if self.is_tall {
                    (self.width - PORTRAIT_IMAGE.width).min(0.0)
                } else {
                    0.0
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(width: f64, height: f64) -> RawThumbnail {
        RawThumbnail {
            source: "https://upload.example/thumb.jpg".to_string(),
            width,
            height,
        }
    }

    #[test]
    fn pixel_ratio_brackets() {
        assert_eq!(bracketed_pixel_ratio(0.0), 1.0);
        assert_eq!(bracketed_pixel_ratio(f64::NAN), 1.0);
        assert_eq!(bracketed_pixel_ratio(1.0), 1.0);
        assert_eq!(bracketed_pixel_ratio(1.25), 1.5);
        assert_eq!(bracketed_pixel_ratio(1.5), 1.5);
        assert_eq!(bracketed_pixel_ratio(2.0), 2.0);
        assert_eq!(bracketed_pixel_ratio(3.0), 2.0);
    }

    #[test]
    fn landscape_exactly_box_width_is_accepted() {
        let thumb = Thumbnail::from_raw(&raw(320.0, 180.0), 1.0).expect("accepted");
        assert!(!thumb.is_tall);
        assert_eq!(thumb.crop.width, 320.0);
        assert_eq!(thumb.crop.height, 180.0);
        assert_eq!(thumb.crop.y, 0.0);
    }

    #[test]
    fn undersized_images_are_rejected() {
        assert!(Thumbnail::from_raw(&raw(319.0, 180.0), 1.0).is_none());
        assert!(Thumbnail::from_raw(&raw(100.0, 249.0), 1.0).is_none());
        // High density halves the effective size.
        assert!(Thumbnail::from_raw(&raw(500.0, 240.0), 2.0).is_none());
    }

    #[test]
    fn suspicious_source_urls_are_rejected() {
        for source in [
            "https://upload.example/a\\b.jpg",
            "https://upload.example/a'b.jpg",
            "https://upload.example/a\"b.jpg",
        ] {
            let thumb = RawThumbnail {
                source: source.to_string(),
                width: 320.0,
                height: 180.0,
            };
            assert!(Thumbnail::from_raw(&thumb, 1.0).is_none());
        }
    }

    #[test]
    fn oversized_landscape_is_centered_and_clamped() {
        let thumb = Thumbnail::from_raw(&raw(400.0, 300.0), 1.0).expect("accepted");
        assert_eq!(thumb.crop.y, -50.0);
        assert_eq!(thumb.crop.height, 200.0);
        assert_eq!(thumb.crop.width, 320.0);
    }

    #[test]
    fn wide_tall_image_is_centered_horizontally() {
        let thumb = Thumbnail::from_raw(&raw(300.0, 400.0), 1.0).expect("accepted");
        assert!(thumb.is_tall);
        assert!(!thumb.is_narrow);
        assert_eq!(thumb.crop.x, (300.0 - 203.0) / -2.0);
        assert_eq!(thumb.crop.y, (400.0 - 250.0) / -2.0);
        assert_eq!(thumb.crop.width, 203.0);
        assert_eq!(thumb.crop.height, 250.0);
    }

    #[test]
    fn thin_tall_image_pins_to_the_edge() {
        let thumb = Thumbnail::from_raw(&raw(150.0, 300.0), 1.0).expect("accepted");
        assert!(thumb.is_tall);
        assert!(thumb.is_narrow);
        assert_eq!(thumb.crop.x, 0.0);
        assert_eq!(thumb.crop.width, 150.0);
        assert_eq!(thumb.offset, 203.0 - 150.0);
    }

    #[test]
    fn clip_transform_mirrors_for_rtl() {
        let tall = Thumbnail::from_raw(&raw(150.0, 300.0), 1.0).expect("tall");
        let ltr = tall.clip_transform(TextDirection::Ltr);
        assert_eq!(ltr.scale_x, 1.0);
        assert_eq!(ltr.translate_x, 150.0 - 203.0);

        let rtl = tall.clip_transform(TextDirection::Rtl);
        assert_eq!(rtl.scale_x, -1.0);
        assert_eq!(rtl.translate_x, 203.0);

        let landscape = Thumbnail::from_raw(&raw(320.0, 180.0), 1.0).expect("landscape");
        assert_eq!(landscape.clip_transform(TextDirection::Ltr).translate_x, 0.0);
        assert_eq!(
            landscape.clip_transform(TextDirection::Rtl).translate_x,
            320.0
        );
    }
}
