//! linkpeek core
//!
//! Hover-preview engine: decides *when* a dwelled-upon link fetches its
//! summary, *where* the preview is placed relative to the viewport, and
//! *when* it hides again. Rendering and event wiring stay outside the
//! crate; the engine emits decisions through the [`PreviewRenderer`] and
//! [`PreviewSurface`] seams, and the embedder feeds pointer activity into
//! a [`PreviewController`].

pub mod anchor;
pub mod config;
pub mod constants;
pub mod controller;
pub mod gateway;
pub mod geometry;
pub mod placement;
pub mod preview;

pub use anchor::{Anchor, AnchorId};
pub use config::PreviewConfig;
pub use controller::{InteractionHooks, InteractionState, InteractionToken, PreviewController};
pub use gateway::{rest::RestGateway, GatewayError, SummaryGateway};
pub use geometry::{DwellSample, LineRect, Offset, TextDirection};
pub use placement::{
    compute_placement, ClipMask, FadeDirection, Orientation, Placement, PointerStyle,
    VerticalAttachment,
};
pub use preview::model::{PreviewKind, PreviewModel, RawSummary};
pub use preview::session::{PreviewRenderer, PreviewSession, PreviewSurface, SessionLayout};
pub use preview::thumbnail::Thumbnail;
