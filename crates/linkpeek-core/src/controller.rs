//! Dwell/abandon interaction state machine.
//!
//! The only stateful, timer-driving component. One controller exists per
//! page instance; pointer events, timer expiries, and fetch completions all
//! funnel through its mutex, so no two transitions ever interleave. Timers
//! are spawned tasks holding their slot as an `Option<JoinHandle>` (no
//! handle means no timer is running) and cancellation is an `abort()`.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::anchor::Anchor;
use crate::constants::{
    ABANDON_END_DELAY, OPEN_DELAY, POINTER_SIZE, PREVIEW_SEEN_DURATION, SETTLE_DELAY,
};
use crate::gateway::SummaryGateway;
use crate::geometry::DwellSample;
use crate::placement::compute_placement;
use crate::preview::model::PreviewModel;
use crate::preview::session::{PreviewRenderer, PreviewSession};

/// States of the interaction machine. `Boot` is initial; there is no
/// terminal state; the machine cycles per anchor interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Boot,
    LinkDwell,
    FetchStart,
    FetchComplete,
    FetchFailed,
    PreviewShow,
    PreviewDwell,
    PreviewSeen,
    LinkClick,
    AbandonStart,
    AbandonEnd,
}

/// Opaque token correlating deferred callbacks with the interaction that
/// requested them; a stale, superseded callback carries a token that no
/// longer matches and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionToken(Uuid);

impl InteractionToken {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

struct ControllerInner {
    state: InteractionState,
    token: Option<InteractionToken>,
    open_timer: Option<JoinHandle<()>>,
    close_timer: Option<JoinHandle<()>>,
    seen_timer: Option<JoinHandle<()>>,
    session: Option<PreviewSession>,
}

/// The dwell/abandon state machine. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct PreviewController {
    inner: Arc<Mutex<ControllerInner>>,
    renderer: Arc<dyn PreviewRenderer>,
}

impl PreviewController {
    /// Create a controller in the boot state.
    pub fn new(renderer: Arc<dyn PreviewRenderer>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ControllerInner {
                state: InteractionState::Boot,
                token: None,
                open_timer: None,
                close_timer: None,
                seen_timer: None,
                session: None,
            })),
            renderer,
        }
    }

    /// Current machine state.
    pub async fn state(&self) -> InteractionState {
        self.inner.lock().await.state
    }

    /// Pointer settled over `anchor`.
    ///
    /// Starts the open timer unless another open timer is already pending
    /// (dwells are single-flight regardless of anchor) or this anchor's
    /// session is already shown. A session for a different anchor is hidden
    /// before the new open timer starts.
    pub async fn on_dwell(
        &self,
        anchor: Anchor,
        sample: DwellSample,
        gateway: Arc<dyn SummaryGateway>,
    ) {
        let mut inner = self.inner.lock().await;
        inner.state = InteractionState::LinkDwell;
        let token = InteractionToken::new();

        // Re-dwelling after a near-abandon keeps the preview alive.
        if let Some(timer) = inner.close_timer.take() {
            timer.abort();
        }
        if inner.open_timer.is_some() {
            return;
        }
        if let Some(session) = &inner.session {
            if session.anchor().id == anchor.id {
                return;
            }
        }
        if let Some(session) = inner.session.take() {
            if let Some(timer) = inner.seen_timer.take() {
                timer.abort();
            }
            session.hide();
        }

        inner.token = Some(token);
        let controller = self.clone();
        inner.open_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(OPEN_DELAY).await;
            controller.open_timer_fired(anchor, sample, gateway, token).await;
        }));
    }

    /// Pointer left the anchor or the preview without re-entering either.
    ///
    /// Cancelling a pending open timer is free: the fetch never happens.
    /// Otherwise a close timer starts (idempotently) and hides the session
    /// when it expires.
    pub async fn on_abandon(&self) {
        let mut inner = self.inner.lock().await;
        inner.state = InteractionState::AbandonStart;
        if let Some(timer) = inner.open_timer.take() {
            timer.abort();
            inner.state = InteractionState::AbandonEnd;
            return;
        }
        if inner.close_timer.is_some() {
            return;
        }
        let controller = self.clone();
        inner.close_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(ABANDON_END_DELAY).await;
            controller.close_timer_fired().await;
        }));
    }

    /// Pointer entered the shown preview surface; keep it open.
    pub async fn on_preview_reenter(&self) {
        let mut inner = self.inner.lock().await;
        inner.state = InteractionState::PreviewDwell;
        if let Some(timer) = inner.close_timer.take() {
            timer.abort();
        }
    }

    /// Click on the anchor or the preview. Navigation is the embedder's
    /// concern; the machine only records the transition.
    pub async fn on_click(&self, _anchor: &Anchor) {
        let mut inner = self.inner.lock().await;
        inner.state = InteractionState::LinkClick;
    }

    /// The preview finished settling; begin counting toward "seen".
    pub async fn on_preview_shown(&self, token: InteractionToken) {
        let mut inner = self.inner.lock().await;
        if inner.token != Some(token) {
            debug!("ignoring preview-shown for a superseded interaction");
            return;
        }
        inner.state = InteractionState::PreviewShow;
        if let Some(timer) = inner.seen_timer.take() {
            timer.abort();
        }
        let controller = self.clone();
        inner.seen_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(PREVIEW_SEEN_DURATION).await;
            controller.seen_timer_fired(token).await;
        }));
    }

    async fn open_timer_fired(
        &self,
        anchor: Anchor,
        sample: DwellSample,
        gateway: Arc<dyn SummaryGateway>,
        token: InteractionToken,
    ) {
        {
            let mut inner = self.inner.lock().await;
            inner.open_timer = None;
            inner.state = InteractionState::FetchStart;
        }

        // The fetch runs outside the lock and cannot be cancelled once
        // started; abandonment during flight is resolved by the token and
        // state re-check below.
        let result = gateway.fetch_summary(&anchor.title).await;

        let mut inner = self.inner.lock().await;
        let summary = match result {
            Ok(summary) => summary,
            Err(error) => {
                warn!(title = %anchor.title, "summary fetch failed: {}", error);
                inner.state = InteractionState::FetchFailed;
                return;
            }
        };
        if inner.token != Some(token)
            || matches!(
                inner.state,
                InteractionState::AbandonStart | InteractionState::AbandonEnd
            )
        {
            debug!(title = %anchor.title, "discarding stale summary fetch");
            return;
        }
        inner.state = InteractionState::FetchComplete;

        let model = PreviewModel::from_summary(summary);
        let mut session = match PreviewSession::build(anchor, &model, self.renderer.as_ref()) {
            Ok(session) => session,
            Err(error) => {
                debug!("not showing preview: {}", error);
                return;
            }
        };
        let placement = compute_placement(
            &sample,
            session.is_tall(),
            POINTER_SIZE,
            self.renderer.text_direction(),
        );
        session.show(&placement, sample.window_height);
        inner.session = Some(session);

        let controller = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(SETTLE_DELAY).await;
            controller.settle_timer_fired(token).await;
        });
    }

    async fn settle_timer_fired(&self, token: InteractionToken) {
        {
            let mut inner = self.inner.lock().await;
            if inner.token != Some(token) {
                return;
            }
            let Some(session) = inner.session.as_mut() else {
                return;
            };
            let hooks = InteractionHooks {
                controller: self.clone(),
                anchor: session.anchor().clone(),
            };
            session.bind_interactions(hooks);
        }
        self.on_preview_shown(token).await;
    }

    async fn close_timer_fired(&self) {
        let mut inner = self.inner.lock().await;
        inner.close_timer = None;
        if let Some(timer) = inner.seen_timer.take() {
            timer.abort();
        }
        if let Some(session) = inner.session.take() {
            session.hide();
        }
        inner.state = InteractionState::AbandonEnd;
    }

    async fn seen_timer_fired(&self, token: InteractionToken) {
        let mut inner = self.inner.lock().await;
        inner.seen_timer = None;
        if inner.token != Some(token) {
            return;
        }
        if inner.state == InteractionState::AbandonStart {
            // Long enough to count as seen, but the user already signalled
            // abandonment: finish hiding.
            inner.state = InteractionState::PreviewSeen;
            drop(inner);
            self.on_abandon().await;
            return;
        }
        inner.state = InteractionState::PreviewSeen;
    }
}

/// Handle a render surface uses to forward pointer activity back into the
/// controller. Surface callbacks are synchronous; each hook spawns the
/// corresponding controller operation onto the runtime.
#[derive(Clone)]
pub struct InteractionHooks {
    controller: PreviewController,
    anchor: Anchor,
}

impl InteractionHooks {
    /// Pointer entered the preview surface.
    pub fn preview_dwell(&self) {
        let controller = self.controller.clone();
        tokio::spawn(async move { controller.on_preview_reenter().await });
    }

    /// Pointer left the preview surface.
    pub fn abandon(&self) {
        let controller = self.controller.clone();
        tokio::spawn(async move { controller.on_abandon().await });
    }

    /// Click on the preview surface.
    pub fn click(&self) {
        let controller = self.controller.clone();
        let anchor = self.anchor.clone();
        tokio::spawn(async move { controller.on_click(&anchor).await });
    }
}

#[cfg(test)]
impl PreviewController {
    async fn timer_slots(&self) -> (bool, bool) {
        let inner = self.inner.lock().await;
        (inner.open_timer.is_some(), inner.close_timer.is_some())
    }
}
