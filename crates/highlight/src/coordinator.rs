//! Highlight coordination policy.
//!
//! Every input (find request, shake, remote transition, tracking tick)
//! funnels through [`HighlightCoordinator`], which owns the only
//! [`HighlightSession`]. Calls run to completion; the coordinator is
//! driven from a single loop and needs no locking.

use std::fmt;
use std::time::Instant;

use cursorhome_common::config::{AppConfig, HighlightSettings, RemoteFallback};
use cursorhome_model::{CursorTransition, Point, TransitionKind};
use cursorhome_platform_core::{DisplayId, DisplaySnapshot, DisplayTopology, PointerDevice};

use crate::session::HighlightSession;
use crate::surface::{SurfaceError, SurfaceRenderer};

/// Live settings, replaced wholesale by `apply_settings`.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorSettings {
    pub highlight: HighlightSettings,
    pub shake_enabled: bool,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for CoordinatorSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            highlight: config.highlight.clone(),
            shake_enabled: config.shake.enabled,
        }
    }
}

/// Coarse state of the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    NoSession,
    Active,
}

/// Why a request did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The engine is switched off.
    Disabled,
    /// Shake-to-find is switched off.
    ShakeDisabled,
    /// The cursor is on a remote machine and the fallback is `Ignore`.
    CursorRemote,
    /// The topology has no displays.
    NoDisplays,
    /// No session to act on.
    NoSession,
    /// Input only updated internal state.
    Informational,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IgnoreReason::Disabled => "disabled",
            IgnoreReason::ShakeDisabled => "shake disabled",
            IgnoreReason::CursorRemote => "cursor is remote",
            IgnoreReason::NoDisplays => "no displays",
            IgnoreReason::NoSession => "no session",
            IgnoreReason::Informational => "informational",
        };
        f.write_str(text)
    }
}

/// Result of one coordinator call.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinatorOutcome {
    Created { display: DisplayId, center: Point },
    Recentered { display: DisplayId },
    Transferred { from: DisplayId, to: DisplayId },
    Tracked,
    Expired,
    Cancelled,
    Ignored(IgnoreReason),
    Failed { display: DisplayId, error: SurfaceError },
}

/// Owns the single highlight session and applies the find/shake/transition
/// policy to it.
pub struct HighlightCoordinator<R, P> {
    settings: CoordinatorSettings,
    topology: DisplayTopology,
    renderer: R,
    pointer: P,
    session: Option<HighlightSession>,
    cursor_remote: bool,
}

impl<R: SurfaceRenderer, P: PointerDevice> HighlightCoordinator<R, P> {
    pub fn new(
        settings: CoordinatorSettings,
        topology: DisplayTopology,
        renderer: R,
        pointer: P,
    ) -> Self {
        tracing::debug!(
            renderer = renderer.name(),
            pointer = pointer.name(),
            displays = topology.displays().len(),
            "Highlight coordinator created"
        );
        Self {
            settings,
            topology,
            renderer,
            pointer,
            session: None,
            cursor_remote: false,
        }
    }

    /// Explicit "find my cursor" request.
    pub fn find(&mut self, now: Instant) -> CoordinatorOutcome {
        if !self.settings.highlight.enabled {
            return CoordinatorOutcome::Ignored(IgnoreReason::Disabled);
        }
        if self.session.is_some() {
            return self.recenter(now);
        }

        let pointer = self.pointer.current_pointer_location();
        let containing = if self.cursor_remote {
            None
        } else {
            self.topology.display_containing(pointer)
        };

        match containing {
            Some(id) => self.create_session(id, pointer, false, now),
            None => self.remote_fallback(now),
        }
    }

    /// A detected shake. Same as [`Self::find`] when shaking is enabled.
    pub fn on_shake(&mut self, now: Instant) -> CoordinatorOutcome {
        if !self.settings.shake_enabled {
            return CoordinatorOutcome::Ignored(IgnoreReason::ShakeDisabled);
        }
        self.find(now)
    }

    /// A cursor hand-off reported by the remote log.
    pub fn on_transition(&mut self, transition: &CursorTransition, now: Instant) -> CoordinatorOutcome {
        match transition.kind {
            TransitionKind::Left => {
                self.cursor_remote = true;
                tracing::info!(remote = %transition.remote_name, "Cursor left for remote machine");
                CoordinatorOutcome::Ignored(IgnoreReason::Informational)
            }
            TransitionKind::Returned => {
                self.cursor_remote = false;
                tracing::info!(remote = %transition.remote_name, "Cursor returned from remote machine");
                if self.settings.highlight.find_on_return {
                    self.find(now)
                } else {
                    CoordinatorOutcome::Ignored(IgnoreReason::Informational)
                }
            }
        }
    }

    /// Tracking tick: expiry, pointer following, and display transfer.
    pub fn tick(&mut self, now: Instant) -> CoordinatorOutcome {
        let Some(session) = self.session.as_ref() else {
            return CoordinatorOutcome::Ignored(IgnoreReason::NoSession);
        };

        if session.is_expired(now) {
            self.teardown();
            tracing::debug!("Highlight expired");
            return CoordinatorOutcome::Expired;
        }

        if !session.pinned {
            let pointer = self.pointer.current_pointer_location();
            match self.topology.display_containing(pointer) {
                Some(id) if id != session.display => {
                    let Some(target) = self.topology.get(id).cloned() else {
                        return CoordinatorOutcome::Ignored(IgnoreReason::NoDisplays);
                    };
                    return self.transfer(&target, pointer, now);
                }
                Some(_) => {
                    if let Some(session) = self.session.as_mut() {
                        session.center = pointer;
                    }
                }
                // Between displays or off-screen: stay where we are.
                None => {}
            }
        }

        self.push_frame(now)
    }

    /// Tear down any session immediately.
    pub fn hide_all(&mut self) -> CoordinatorOutcome {
        if self.teardown() {
            tracing::debug!("Highlight hidden");
            CoordinatorOutcome::Cancelled
        } else {
            CoordinatorOutcome::Ignored(IgnoreReason::NoSession)
        }
    }

    /// Replace the live settings. Disabling tears down the session; a live
    /// session otherwise keeps the style it was created with.
    pub fn apply_settings(&mut self, settings: CoordinatorSettings) -> CoordinatorOutcome {
        let disabled = !settings.highlight.enabled;
        self.settings = settings;
        if disabled && self.teardown() {
            tracing::info!("Highlighting disabled, session cancelled");
            return CoordinatorOutcome::Cancelled;
        }
        CoordinatorOutcome::Ignored(IgnoreReason::Informational)
    }

    /// Replace the display snapshot. A session whose display vanished is
    /// torn down.
    pub fn refresh_topology(&mut self, topology: DisplayTopology) -> CoordinatorOutcome {
        self.topology = topology;
        let vanished = self
            .session
            .as_ref()
            .is_some_and(|s| self.topology.get(s.display).is_none());
        if vanished && self.teardown() {
            tracing::info!("Display of the active highlight disappeared");
            return CoordinatorOutcome::Cancelled;
        }
        CoordinatorOutcome::Ignored(IgnoreReason::Informational)
    }

    pub fn state(&self) -> CoordinatorState {
        if self.session.is_some() {
            CoordinatorState::Active
        } else {
            CoordinatorState::NoSession
        }
    }

    pub fn session(&self) -> Option<&HighlightSession> {
        self.session.as_ref()
    }

    pub fn is_cursor_remote(&self) -> bool {
        self.cursor_remote
    }

    pub fn settings(&self) -> &CoordinatorSettings {
        &self.settings
    }

    pub fn topology(&self) -> &DisplayTopology {
        &self.topology
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn pointer(&self) -> &P {
        &self.pointer
    }

    pub fn pointer_mut(&mut self) -> &mut P {
        &mut self.pointer
    }

    fn remote_fallback(&mut self, now: Instant) -> CoordinatorOutcome {
        match self.settings.highlight.remote_fallback {
            RemoteFallback::Ignore => {
                tracing::debug!("Cursor is off the local displays, ignoring find");
                CoordinatorOutcome::Ignored(IgnoreReason::CursorRemote)
            }
            RemoteFallback::RecenterOnPrimary => {
                let Some(primary) = self.topology.primary().cloned() else {
                    return CoordinatorOutcome::Ignored(IgnoreReason::NoDisplays);
                };
                let center = primary.center();
                let pinned = !self.warp(center);
                self.cursor_remote = false;
                self.create_session(primary.id, center, pinned, now)
            }
        }
    }

    /// Find while active: pull the pointer to the primary center and
    /// restart the session there.
    fn recenter(&mut self, now: Instant) -> CoordinatorOutcome {
        let Some(primary) = self.topology.primary().cloned() else {
            return CoordinatorOutcome::Ignored(IgnoreReason::NoDisplays);
        };
        let center = primary.center();
        let pinned = !self.warp(center);
        self.cursor_remote = false;

        let on_primary = self.session.as_ref().is_some_and(|s| s.display == primary.id);
        if !on_primary {
            return match self.transfer(&primary, center, now) {
                CoordinatorOutcome::Transferred { to, .. } => {
                    if let Some(session) = self.session.as_mut() {
                        session.pinned = pinned;
                    }
                    CoordinatorOutcome::Recentered { display: to }
                }
                other => other,
            };
        }

        let duration = self.settings.highlight.duration();
        if let Some(session) = self.session.as_mut() {
            session.center = center;
            session.pinned = pinned;
            session.restart(now, duration);
        }
        match self.push_frame(now) {
            CoordinatorOutcome::Tracked => CoordinatorOutcome::Recentered {
                display: primary.id,
            },
            other => other,
        }
    }

    fn create_session(
        &mut self,
        display: DisplayId,
        center: Point,
        pinned: bool,
        now: Instant,
    ) -> CoordinatorOutcome {
        let Some(snapshot) = self.topology.get(display).cloned() else {
            return CoordinatorOutcome::Ignored(IgnoreReason::NoDisplays);
        };
        let style = self.settings.highlight.style.clone();
        let animation = self.settings.highlight.animation.clone();

        match self.renderer.create_surface(&snapshot) {
            Ok(surface) => {
                let mut session = HighlightSession {
                    display,
                    surface,
                    center,
                    style,
                    animation,
                    started_at: now,
                    expires_at: now,
                    pinned,
                };
                session.restart(now, self.settings.highlight.duration());
                self.session = Some(session);
                tracing::info!(display = %snapshot.id, x = center.x, y = center.y, "Highlight shown");
                match self.push_frame(now) {
                    CoordinatorOutcome::Tracked => CoordinatorOutcome::Created { display, center },
                    other => other,
                }
            }
            Err(error) => {
                tracing::warn!(display = %snapshot.id, error = %error, "Failed to create highlight surface");
                CoordinatorOutcome::Failed { display, error }
            }
        }
    }

    /// Move the session to `target`: destroy first, then create, so two
    /// surfaces never coexist. Style and animation carry over; expiry
    /// restarts.
    fn transfer(&mut self, target: &DisplaySnapshot, center: Point, now: Instant) -> CoordinatorOutcome {
        let Some(old) = self.session.take() else {
            tracing::debug!("Transfer requested without a session");
            return CoordinatorOutcome::Ignored(IgnoreReason::NoSession);
        };
        self.renderer.destroy(old.surface);

        match self.renderer.create_surface(target) {
            Ok(surface) => {
                let mut session = HighlightSession {
                    display: target.id,
                    surface,
                    center,
                    ..old.clone()
                };
                session.restart(now, self.settings.highlight.duration());
                self.session = Some(session);
                tracing::debug!(from = %old.display, to = %target.id, "Highlight transferred");
                match self.push_frame(now) {
                    CoordinatorOutcome::Tracked => CoordinatorOutcome::Transferred {
                        from: old.display,
                        to: target.id,
                    },
                    other => other,
                }
            }
            Err(error) => {
                tracing::warn!(
                    from = %old.display,
                    to = %target.id,
                    error = %error,
                    "Failed to transfer highlight"
                );
                CoordinatorOutcome::Failed {
                    display: target.id,
                    error,
                }
            }
        }
    }

    /// Push the current frame. A renderer that lost the surface ends the
    /// session.
    fn push_frame(&mut self, now: Instant) -> CoordinatorOutcome {
        let Some(session) = self.session.as_ref() else {
            return CoordinatorOutcome::Ignored(IgnoreReason::NoSession);
        };
        let frame = session.frame(now);
        let (surface, display) = (session.surface, session.display);

        match self.renderer.update(surface, &frame) {
            Ok(()) => CoordinatorOutcome::Tracked,
            Err(error) => {
                tracing::warn!(surface = %surface, error = %error, "Highlight surface update failed");
                self.teardown();
                CoordinatorOutcome::Failed { display, error }
            }
        }
    }

    /// Returns whether a pointer warp succeeded.
    fn warp(&mut self, point: Point) -> bool {
        match self.pointer.warp_pointer(point) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Pointer warp refused, highlight pinned at center");
                false
            }
        }
    }

    fn teardown(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                self.renderer.destroy(session.surface);
                true
            }
            None => false,
        }
    }
}
