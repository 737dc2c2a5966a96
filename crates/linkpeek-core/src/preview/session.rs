//! Preview session lifecycle.
//!
//! A session is created once a fetch succeeded and a placement was
//! computed, and destroyed when hidden, either by the abandon timeout or
//! by being pre-empted by a dwell on a different anchor. The session owns
//! the render surface and translates placements into layout instructions;
//! actual drawing happens on the embedder's side of [`PreviewSurface`].

use thiserror::Error;
use tracing::debug;

use crate::anchor::Anchor;
use crate::constants::{DEFAULT_EXTRACT_WIDTH, HIDE_ANIMATION_DELAY, POINTER_SIZE};
use crate::controller::InteractionHooks;
use crate::geometry::TextDirection;
use crate::placement::{
    pointer_style, thumbnail_clip_mask, vertical_attachment, ClipMask, FadeDirection, Orientation,
    Placement, PointerStyle, VerticalAttachment,
};
use crate::preview::model::{PreviewKind, PreviewModel};
use crate::preview::thumbnail::{ClipTransform, Thumbnail, LANDSCAPE_IMAGE};

/// Builds render surfaces for preview models. Implemented by the embedder.
pub trait PreviewRenderer: Send + Sync {
    /// Materialize a surface for a page or generic preview.
    fn render(&self, model: &PreviewModel, thumbnail: Option<&Thumbnail>)
        -> Box<dyn PreviewSurface>;

    /// Text direction of the hosting document, for placement mirroring.
    fn text_direction(&self) -> TextDirection {
        TextDirection::Ltr
    }

    /// Device pixel ratio of the hosting display, for thumbnail density
    /// bracketing.
    fn device_pixel_ratio(&self) -> f64 {
        1.0
    }
}

/// One rendered preview surface. Methods are decision sinks: the engine
/// never waits on them.
pub trait PreviewSurface: Send {
    /// Insert the surface into the page.
    fn attach(&mut self);
    /// Apply computed layout and style decisions.
    fn apply_layout(&mut self, layout: &SessionLayout);
    /// Start the hide animation.
    fn begin_fade_out(&mut self, direction: FadeDirection);
    /// Remove the surface from the page.
    fn remove(&mut self);
    /// Register pointer forwarding from the surface to the controller.
    fn bind_interactions(&mut self, hooks: InteractionHooks);
}

/// Everything the surface needs to position and style itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionLayout {
    /// Document-relative left of the popup.
    pub left: f64,
    pub vertical: VerticalAttachment,
    pub fade: FadeDirection,
    pub orientation: Orientation,
    pub pointer: PointerStyle,
    /// Wide landscape layout with the thumbnail beside the extract.
    pub is_tall: bool,
    /// Clip mask and mirror transform for the thumbnail, when one applies.
    pub clip: Option<(ClipMask, ClipTransform)>,
    /// Explicit extract column width; narrow tall thumbnails widen it.
    pub extract_width: Option<f64>,
    /// Extract pushed below a short landscape thumbnail so the pointer
    /// notch stays on the image.
    pub extract_margin_top: Option<f64>,
}

/// Why a fetched preview could not become a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Kind recognized but rendering is not implemented.
    #[error("{0:?} previews are not supported yet")]
    Unsupported(PreviewKind),
}

/// The single currently-displayed preview, tied to the anchor it was
/// opened for.
pub struct PreviewSession {
    anchor: Anchor,
    thumbnail: Option<Thumbnail>,
    fade: FadeDirection,
    surface: Box<dyn PreviewSurface>,
}

impl PreviewSession {
    /// Build a session for a model, or report why the kind cannot render.
    pub fn build(
        anchor: Anchor,
        model: &PreviewModel,
        renderer: &dyn PreviewRenderer,
    ) -> Result<Self, SessionError> {
        match model.kind {
            PreviewKind::Disambiguation | PreviewKind::Reference => {
                return Err(SessionError::Unsupported(model.kind));
            }
            PreviewKind::Page | PreviewKind::Generic => {}
        }
        let thumbnail = model
            .thumbnail
            .as_ref()
            .and_then(|raw| Thumbnail::from_raw(raw, renderer.device_pixel_ratio()));
        let surface = renderer.render(model, thumbnail.as_ref());
        Ok(Self {
            anchor,
            thumbnail,
            fade: FadeDirection::Up,
            surface,
        })
    }

    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    /// Whether this session uses the wide landscape popup layout.
    pub fn is_tall(&self) -> bool {
        self.thumbnail.as_ref().is_some_and(|thumb| thumb.is_tall)
    }

    /// Attach the surface and lay it out according to the placement.
    pub fn show(&mut self, placement: &Placement, window_height: f64) {
        let layout = self.layout_for(placement, window_height);
        self.fade = layout.fade;
        debug!(title = %self.anchor.title, "showing preview");
        self.surface.attach();
        self.surface.apply_layout(&layout);
    }

    fn layout_for(&self, placement: &Placement, window_height: f64) -> SessionLayout {
        let has_thumbnail = self.thumbnail.is_some();
        let is_tall = self.is_tall();
        let clip = thumbnail_clip_mask(is_tall, placement).and_then(|mask| {
            self.thumbnail
                .as_ref()
                .map(|thumb| (mask, thumb.clip_transform(placement.direction)))
        });
        let extract_margin_top = match &self.thumbnail {
            Some(thumb)
                if !placement.flipped_y && !is_tall && thumb.height < LANDSCAPE_IMAGE.height =>
            {
                Some(thumb.height - POINTER_SIZE)
            }
            _ => None,
        };
        SessionLayout {
            left: placement.left,
            vertical: vertical_attachment(placement, window_height),
            fade: FadeDirection::for_placement(placement),
            orientation: Orientation::for_placement(placement),
            pointer: pointer_style(has_thumbnail, is_tall, placement),
            is_tall,
            clip,
            extract_width: self
                .thumbnail
                .as_ref()
                .filter(|thumb| thumb.is_narrow)
                .map(|thumb| DEFAULT_EXTRACT_WIDTH + thumb.offset),
            extract_margin_top,
        }
    }

    /// Register pointer forwarding from the surface to the controller.
    pub fn bind_interactions(&mut self, hooks: InteractionHooks) {
        self.surface.bind_interactions(hooks);
    }

    /// Fade out now; the surface is detached once the animation elapses.
    pub fn hide(self) {
        debug!(title = %self.anchor.title, "hiding preview");
        let mut surface = self.surface;
        surface.begin_fade_out(self.fade.reverse());
        tokio::spawn(async move {
            tokio::time::sleep(HIDE_ANIMATION_DELAY).await;
            surface.remove();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::anchor::AnchorId;
    use crate::geometry::{DwellSample, LineRect, Offset};
    use crate::placement::compute_placement;
    use crate::preview::model::{ContentUrls, DesktopUrls, RawSummary, RawThumbnail};

    #[derive(Debug, PartialEq)]
    enum SurfaceEvent {
        Attach,
        Layout(SessionLayout),
        FadeOut(FadeDirection),
        Remove,
        Bind,
    }

    type Log = Arc<Mutex<Vec<SurfaceEvent>>>;

    struct StubSurface {
        log: Log,
    }

    impl PreviewSurface for StubSurface {
        fn attach(&mut self) {
            self.log.lock().expect("log").push(SurfaceEvent::Attach);
        }
        fn apply_layout(&mut self, layout: &SessionLayout) {
            self.log
                .lock()
                .expect("log")
                .push(SurfaceEvent::Layout(layout.clone()));
        }
        fn begin_fade_out(&mut self, direction: FadeDirection) {
            self.log
                .lock()
                .expect("log")
                .push(SurfaceEvent::FadeOut(direction));
        }
        fn remove(&mut self) {
            self.log.lock().expect("log").push(SurfaceEvent::Remove);
        }
        fn bind_interactions(&mut self, _hooks: InteractionHooks) {
            self.log.lock().expect("log").push(SurfaceEvent::Bind);
        }
    }

    struct StubRenderer {
        log: Log,
    }

    impl PreviewRenderer for StubRenderer {
        fn render(
            &self,
            _model: &PreviewModel,
            _thumbnail: Option<&Thumbnail>,
        ) -> Box<dyn PreviewSurface> {
            Box::new(StubSurface {
                log: self.log.clone(),
            })
        }
    }

    fn anchor() -> Anchor {
        Anchor {
            id: AnchorId(7),
            title: "Ada_Lovelace".to_string(),
        }
    }

    fn model(kind_hint: Option<&str>, thumbnail: Option<RawThumbnail>) -> PreviewModel {
        PreviewModel::from_summary(RawSummary {
            title: "Ada Lovelace".to_string(),
            content_urls: ContentUrls {
                desktop: DesktopUrls {
                    page: "https://en.wikipedia.org/wiki/Ada_Lovelace".to_string(),
                },
            },
            lang: "en".to_string(),
            dir: "ltr".to_string(),
            extract_html: Some("<p>Mathematician.</p>".to_string()),
            kind: kind_hint.map(str::to_string),
            thumbnail,
            pageid: 171_988,
        })
    }

    fn sample() -> DwellSample {
        DwellSample {
            page_x: Some(200.0),
            page_y: Some(300.0),
            client_y: Some(300.0),
            width: 120.0,
            height: 20.0,
            offset: Offset {
                top: 290.0,
                left: 140.0,
            },
            client_rects: vec![LineRect {
                top: 290.0,
                bottom: 310.0,
            }],
            window_width: 1000.0,
            window_height: 800.0,
            scroll_top: 0.0,
        }
    }

    #[test]
    fn unsupported_kinds_do_not_build() {
        let log: Log = Log::default();
        let renderer = StubRenderer { log };
        let result = PreviewSession::build(anchor(), &model(Some("disambiguation"), None), &renderer);
        assert!(matches!(
            result,
            Err(SessionError::Unsupported(PreviewKind::Disambiguation))
        ));
    }

    #[test]
    fn show_attaches_then_lays_out() {
        let log: Log = Log::default();
        let renderer = StubRenderer { log: log.clone() };
        let mut session =
            PreviewSession::build(anchor(), &model(Some("page"), None), &renderer).expect("session");
        let placement = compute_placement(&sample(), false, POINTER_SIZE, TextDirection::Ltr);
        session.show(&placement, 800.0);

        let events = log.lock().expect("log");
        assert_eq!(events[0], SurfaceEvent::Attach);
        let SurfaceEvent::Layout(layout) = &events[1] else {
            panic!("expected layout event, got {:?}", events[1]);
        };
        assert_eq!(layout.vertical, VerticalAttachment::Top(placement.top));
        assert_eq!(layout.fade, FadeDirection::Up);
        assert_eq!(layout.pointer, PointerStyle::Plain);
        assert!(!layout.is_tall);
        assert_eq!(layout.clip, None);
        assert_eq!(layout.extract_width, None);
        assert_eq!(layout.extract_margin_top, None);
    }

    #[test]
    fn short_landscape_thumbnail_pushes_the_extract_down() {
        let log: Log = Log::default();
        let renderer = StubRenderer { log: log.clone() };
        let thumb = RawThumbnail {
            source: "https://upload.example/t.jpg".to_string(),
            width: 320.0,
            height: 150.0,
        };
        let mut session = PreviewSession::build(anchor(), &model(Some("page"), Some(thumb)), &renderer)
            .expect("session");
        assert!(!session.is_tall());
        let placement = compute_placement(&sample(), false, POINTER_SIZE, TextDirection::Ltr);
        session.show(&placement, 800.0);

        let events = log.lock().expect("log");
        let SurfaceEvent::Layout(layout) = &events[1] else {
            panic!("expected layout event, got {:?}", events[1]);
        };
        assert_eq!(layout.extract_margin_top, Some(150.0 - POINTER_SIZE));
        assert_eq!(layout.pointer, PointerStyle::Image);
        assert_eq!(
            layout.clip.map(|(mask, _)| mask),
            Some(ClipMask::LandscapeThumb)
        );
    }

    #[test]
    fn narrow_tall_thumbnail_widens_the_extract() {
        let log: Log = Log::default();
        let renderer = StubRenderer { log: log.clone() };
        let thumb = RawThumbnail {
            source: "https://upload.example/t.jpg".to_string(),
            width: 150.0,
            height: 300.0,
        };
        let mut session = PreviewSession::build(anchor(), &model(Some("page"), Some(thumb)), &renderer)
            .expect("session");
        assert!(session.is_tall());
        let placement = compute_placement(&sample(), true, POINTER_SIZE, TextDirection::Ltr);
        session.show(&placement, 800.0);

        let events = log.lock().expect("log");
        let SurfaceEvent::Layout(layout) = &events[1] else {
            panic!("expected layout event, got {:?}", events[1]);
        };
        assert_eq!(layout.extract_width, Some(DEFAULT_EXTRACT_WIDTH + 53.0));
        assert_eq!(layout.extract_margin_top, None);
        assert!(layout.is_tall);
    }

    #[test]
    fn rejected_thumbnail_falls_back_to_plain_card() {
        let log: Log = Log::default();
        let renderer = StubRenderer { log: log.clone() };
        let thumb = RawThumbnail {
            source: "https://upload.example/t.jpg".to_string(),
            width: 100.0,
            height: 80.0,
        };
        let session = PreviewSession::build(anchor(), &model(Some("page"), Some(thumb)), &renderer)
            .expect("session");
        assert!(!session.is_tall());
        assert!(session.thumbnail.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn hide_fades_then_detaches() {
        let log: Log = Log::default();
        let renderer = StubRenderer { log: log.clone() };
        let mut session =
            PreviewSession::build(anchor(), &model(Some("page"), None), &renderer).expect("session");
        let placement = compute_placement(&sample(), false, POINTER_SIZE, TextDirection::Ltr);
        session.show(&placement, 800.0);
        session.hide();

        // Fade-out reverses the fade-in direction immediately.
        assert_eq!(
            log.lock().expect("log").last(),
            Some(&SurfaceEvent::FadeOut(FadeDirection::Down))
        );

        tokio::time::sleep(HIDE_ANIMATION_DELAY).await;
        tokio::task::yield_now().await;
        assert_eq!(log.lock().expect("log").last(), Some(&SurfaceEvent::Remove));
    }
}
