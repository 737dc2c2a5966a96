//! Viewport-aware preview placement.
//!
//! Pure geometry: identical inputs always produce identical placements, so
//! everything here is tested without a rendering surface. The calculator
//! decides the popup's offsets and flip variant; the derived helpers turn a
//! [`Placement`] into the style decisions a surface consumes (fade
//! direction, pointer style, clip-mask selection, vertical attachment).

use crate::constants::{
    LANDSCAPE_POPUP_WIDTH, MAX_LINK_WIDTH_FOR_CENTERED_POINTER, POINTER_NUDGE,
    PORTRAIT_POPUP_WIDTH,
};
use crate::geometry::{DwellSample, LineRect, TextDirection};

/// Where to draw a preview and which flip variant to use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Document-relative top of the popup (or of its bottom edge when
    /// `flipped_y` is set; see [`vertical_attachment`]).
    pub top: f64,
    /// Document-relative left of the popup.
    pub left: f64,
    /// Mirrored horizontally to stay inside the viewport.
    pub flipped_x: bool,
    /// Bottom-anchored because the pointer sits in the lower half of the
    /// viewport.
    pub flipped_y: bool,
    /// Document text direction the flip flags were resolved against.
    pub direction: TextDirection,
}

/// Compute where a preview for the sampled anchor should be drawn.
///
/// The vertical base prefers the line the pointer actually rests on:
/// anchors can wrap across lines, and the popup should hang off that line's
/// edge, not the anchor's bounding box. The horizontal base follows the
/// pointer for wide links and centers on narrow ones so the arrow still
/// points at the text.
pub fn compute_placement(
    sample: &DwellSample,
    is_preview_tall: bool,
    pointer_gutter: f64,
    direction: TextDirection,
) -> Placement {
    let mut flipped_x = false;
    let mut flipped_y = false;

    let mut offset_top = match sample.page_y {
        Some(page_y) => {
            match closest_line_edge(page_y - sample.scroll_top, &sample.client_rects, Edge::Bottom)
            {
                Some(edge) => edge + sample.scroll_top + pointer_gutter,
                None => sample.offset.top + sample.height + pointer_gutter,
            }
        }
        None => sample.offset.top + sample.height + pointer_gutter,
    };

    // Viewport-relative Y driving the vertical flip decision.
    let client_top = sample.client_y.unwrap_or(offset_top);

    let mut offset_left = match sample.page_x {
        Some(page_x) if sample.width > MAX_LINK_WIDTH_FOR_CENTERED_POINTER => page_x,
        Some(_) => sample.offset.left + sample.width / 2.0,
        None => sample.offset.left,
    };

    if offset_left > sample.window_width / 2.0 {
        if sample.page_x.is_none() {
            offset_left += sample.width;
        }
        offset_left -= popup_width(is_preview_tall);
        flipped_x = true;
    }

    if sample.page_x.is_some() {
        offset_left += if flipped_x {
            POINTER_NUDGE
        } else {
            -POINTER_NUDGE
        };
    }

    if client_top > sample.window_height / 2.0 {
        flipped_y = true;
        offset_top = match sample.page_y {
            Some(page_y) => {
                match closest_line_edge(page_y - sample.scroll_top, &sample.client_rects, Edge::Top)
                {
                    Some(edge) => edge + sample.scroll_top,
                    None => sample.offset.top,
                }
            }
            None => sample.offset.top,
        };
        offset_top -= pointer_gutter;
    }

    Placement {
        top: offset_top,
        left: offset_left,
        flipped_x: if direction.is_rtl() {
            !flipped_x
        } else {
            flipped_x
        },
        flipped_y,
        direction,
    }
}

/// Width of the popup for the given thumbnail orientation. Tall (portrait)
/// thumbnails sit beside the extract, widening the popup.
pub fn popup_width(is_preview_tall: bool) -> f64 {
    if is_preview_tall {
        LANDSCAPE_POPUP_WIDTH
    } else {
        PORTRAIT_POPUP_WIDTH
    }
}

#[derive(Debug, Clone, Copy)]
enum Edge {
    Top,
    Bottom,
}

/// Pick the requested edge of the line rect closest to `y` (viewport
/// coordinates). Closeness is the combined distance to a rect's top and
/// bottom; on a tie the first rect wins.
fn closest_line_edge(y: f64, rects: &[LineRect], edge: Edge) -> Option<f64> {
    let mut best: Option<(f64, f64)> = None;
    for rect in rects {
        let delta = ((y - rect.top) + (y - rect.bottom)).abs();
        let position = match edge {
            Edge::Top => rect.top.floor(),
            Edge::Bottom => rect.bottom.ceil(),
        };
        match best {
            Some((best_delta, _)) if best_delta <= delta => {}
            _ => best = Some((delta, position)),
        }
    }
    best.map(|(_, position)| position)
}

/// Fade-in direction; the popup animates toward its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    Up,
    Down,
}

impl FadeDirection {
    pub fn for_placement(placement: &Placement) -> Self {
        if placement.flipped_y {
            Self::Down
        } else {
            Self::Up
        }
    }

    /// Direction the hide animation moves: the reverse of the fade-in.
    pub fn reverse(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

/// Orientation marker applied alongside the offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Normal,
    FlippedX,
    FlippedY,
    FlippedXY,
}

impl Orientation {
    pub fn for_placement(placement: &Placement) -> Self {
        match (placement.flipped_x, placement.flipped_y) {
            (true, true) => Self::FlippedXY,
            (false, true) => Self::FlippedY,
            (true, false) => Self::FlippedX,
            (false, false) => Self::Normal,
        }
    }
}

/// How the pointer arrow is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerStyle {
    /// Arrow over plain card background.
    Plain,
    /// Arrow cut into the thumbnail image.
    Image,
    /// No arrow for this orientation.
    None,
}

/// Pointer style for a preview with the given thumbnail situation.
pub fn pointer_style(has_thumbnail: bool, is_tall: bool, placement: &Placement) -> PointerStyle {
    if placement.flipped_y {
        return PointerStyle::None;
    }
    if has_thumbnail && !is_tall {
        return PointerStyle::Image;
    }
    if !has_thumbnail || !placement.flipped_x {
        return PointerStyle::Plain;
    }
    PointerStyle::None
}

/// The four predefined thumbnail clip masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipMask {
    /// Landscape thumbnail on top, pointer notch near the left edge.
    LandscapeThumb,
    /// Landscape thumbnail on top, pointer notch near the right edge.
    LandscapeThumbFlipped,
    /// Portrait thumbnail beside the extract, notch on the top edge.
    PortraitThumb,
    /// Portrait thumbnail beside the extract, notch on the bottom edge.
    PortraitThumbFlipped,
}

/// Select a clip mask for the `(is_tall, flipped_x, flipped_y)` triple.
///
/// `None` when the orientation has no defined mask; the thumbnail then
/// keeps its plain rectangle.
pub fn thumbnail_clip_mask(is_tall: bool, placement: &Placement) -> Option<ClipMask> {
    if !is_tall && !placement.flipped_y {
        return Some(if placement.flipped_x {
            ClipMask::LandscapeThumbFlipped
        } else {
            ClipMask::LandscapeThumb
        });
    }
    if is_tall && placement.flipped_x {
        return Some(if placement.flipped_y {
            ClipMask::PortraitThumbFlipped
        } else {
            ClipMask::PortraitThumb
        });
    }
    None
}

/// How the vertical offset is applied to the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VerticalAttachment {
    /// Distance from the document top.
    Top(f64),
    /// Distance from the viewport bottom; bottom-anchored popups grow
    /// upward as content changes.
    Bottom(f64),
}

pub fn vertical_attachment(placement: &Placement, window_height: f64) -> VerticalAttachment {
    if placement.flipped_y {
        VerticalAttachment::Bottom(window_height - placement.top)
    } else {
        VerticalAttachment::Top(placement.top)
    }
}
