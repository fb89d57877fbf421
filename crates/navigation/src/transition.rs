//! Time-sliced hand-off of the window from the outgoing root to the incoming one.
//!
//! A transition walks `Idle -> Outgoing -> Swapping -> Incoming -> Idle`. The
//! engine never reads a clock itself: the event loop passes `now` into
//! [`TransitionEngine::tick`] once per frame, which keeps frame sequences
//! reproducible in tests.

use std::time::{Duration, Instant};

use crate::{
    descriptor::{TransitionKind, TransitionSpec, ViewId},
    error::NavigationError,
    loader::StyleHandle,
    window::{Presentation, ViewRoot, WindowController},
};

pub const DEFAULT_MAX_TRANSITION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    Idle,
    Outgoing,
    Swapping,
    Incoming,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionEvent {
    Swapped { view_id: ViewId },
    Completed { view_id: ViewId },
    Aborted { view_id: ViewId, reason: String },
}

/// The incoming root plus the window state that goes with it.
pub struct SceneChange<C: ?Sized> {
    pub root: ViewRoot<C>,
    pub stylesheets: Vec<StyleHandle>,
    pub width: f32,
    pub height: f32,
    pub title: String,
}

struct InFlight<C: ?Sized> {
    view_id: ViewId,
    spec: TransitionSpec,
    phase: TransitionPhase,
    started_at: Instant,
    phase_started_at: Instant,
    delta: (f32, f32),
    incoming: Option<SceneChange<C>>,
}

impl<C: ?Sized> InFlight<C> {
    fn outgoing_frame(&self, t: f32) -> Presentation {
        match self.spec.kind {
            TransitionKind::Fade => Presentation {
                opacity: 1.0 - t,
                offset: (0.0, 0.0),
            },
            _ => Presentation {
                opacity: 1.0,
                offset: (self.delta.0 * t, self.delta.1 * t),
            },
        }
    }

    fn incoming_frame(&self, t: f32) -> Presentation {
        if t >= 1.0 {
            return Presentation::RESTING;
        }
        match self.spec.kind {
            TransitionKind::Fade => Presentation {
                opacity: t,
                offset: (0.0, 0.0),
            },
            _ => {
                let remaining = 1.0 - t;
                Presentation {
                    opacity: 1.0,
                    offset: (-self.delta.0 * remaining, -self.delta.1 * remaining),
                }
            }
        }
    }
}

pub struct TransitionEngine<C: ?Sized> {
    in_flight: Option<InFlight<C>>,
    /// Added to twice the spec duration to get the stall deadline.
    max_transition: Duration,
}

impl<C: ?Sized> Default for TransitionEngine<C> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TRANSITION)
    }
}

impl<C: ?Sized> TransitionEngine<C> {
    pub fn new(max_transition: Duration) -> Self {
        Self {
            in_flight: None,
            max_transition,
        }
    }

    pub fn phase(&self) -> TransitionPhase {
        self.in_flight
            .as_ref()
            .map_or(TransitionPhase::Idle, |flight| flight.phase)
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_none()
    }

    pub fn in_flight_view(&self) -> Option<&ViewId> {
        self.in_flight.as_ref().map(|flight| &flight.view_id)
    }

    /// Start handing the window over to `change`. Immediate transitions (and
    /// the very first view, which has nothing to animate out) swap before
    /// this returns.
    pub fn begin(
        &mut self,
        change: SceneChange<C>,
        spec: TransitionSpec,
        window: &mut WindowController<C>,
        now: Instant,
    ) -> Result<Vec<TransitionEvent>, NavigationError> {
        if self.in_flight.is_some() {
            return Err(NavigationError::Busy);
        }
        if !window.is_initialized() {
            return Err(NavigationError::NotInitialized);
        }

        let mut events = Vec::new();
        let view_id = change.root.view_id().clone();

        if spec.is_immediate() {
            swap(window, change, Presentation::RESTING, true)?;
            events.push(TransitionEvent::Swapped {
                view_id: view_id.clone(),
            });
            events.push(TransitionEvent::Completed { view_id });
            return Ok(events);
        }

        let mut flight = InFlight {
            view_id,
            spec,
            phase: TransitionPhase::Outgoing,
            started_at: now,
            phase_started_at: now,
            delta: spec.kind.slide_delta(window.size()).unwrap_or((0.0, 0.0)),
            incoming: Some(change),
        };

        if window.content().is_none() {
            self.swap_in_flight(&mut flight, window, now, &mut events)?;
        } else if let Some(root) = window.content_mut() {
            root.set_presentation(flight.outgoing_frame(0.0));
            root.set_interactive(false);
        }

        self.in_flight = Some(flight);
        Ok(events)
    }

    /// Advance the in-flight transition to `now`.
    pub fn tick(&mut self, window: &mut WindowController<C>, now: Instant) -> Vec<TransitionEvent> {
        let mut events = Vec::new();
        let Some(mut flight) = self.in_flight.take() else {
            return events;
        };

        if !window.is_open() {
            tracing::warn!(view_id = %flight.view_id, phase = ?flight.phase, "window closed mid-transition");
            release(window);
            events.push(TransitionEvent::Aborted {
                view_id: flight.view_id,
                reason: "window closed".into(),
            });
            return events;
        }

        let deadline = flight.spec.duration * 2 + self.max_transition;
        if now.saturating_duration_since(flight.started_at) > deadline {
            tracing::warn!(
                view_id = %flight.view_id,
                deadline_ms = deadline.as_millis() as u64,
                "transition overran its deadline; forcing completion"
            );
            self.complete(flight, window, now, &mut events);
            return events;
        }

        let t = progress(flight.phase_started_at, now, flight.spec.duration);
        match flight.phase {
            TransitionPhase::Outgoing => {
                if let Some(root) = window.content_mut() {
                    root.set_presentation(flight.outgoing_frame(t));
                }
                if t >= 1.0 {
                    if let Err(err) = self.swap_in_flight(&mut flight, window, now, &mut events) {
                        release(window);
                        events.push(TransitionEvent::Aborted {
                            view_id: flight.view_id,
                            reason: err.to_string(),
                        });
                        return events;
                    }
                }
            }
            TransitionPhase::Incoming => {
                if let Some(root) = window.content_mut() {
                    root.set_presentation(flight.incoming_frame(t));
                }
                if t >= 1.0 {
                    release(window);
                    events.push(TransitionEvent::Completed {
                        view_id: flight.view_id,
                    });
                    return events;
                }
            }
            TransitionPhase::Idle | TransitionPhase::Swapping => {
                self.complete(flight, window, now, &mut events);
                return events;
            }
        }

        self.in_flight = Some(flight);
        events
    }

    /// Jump the in-flight transition to its end state.
    pub fn finish_now(&mut self, window: &mut WindowController<C>, now: Instant) -> Vec<TransitionEvent> {
        let mut events = Vec::new();
        if let Some(flight) = self.in_flight.take() {
            self.complete(flight, window, now, &mut events);
        }
        events
    }

    fn complete(
        &mut self,
        mut flight: InFlight<C>,
        window: &mut WindowController<C>,
        now: Instant,
        events: &mut Vec<TransitionEvent>,
    ) {
        if flight.incoming.is_some() {
            if let Some(root) = window.content_mut() {
                root.set_presentation(flight.outgoing_frame(1.0));
            }
            if let Err(err) = self.swap_in_flight(&mut flight, window, now, events) {
                release(window);
                events.push(TransitionEvent::Aborted {
                    view_id: flight.view_id,
                    reason: err.to_string(),
                });
                return;
            }
        }
        release(window);
        events.push(TransitionEvent::Completed {
            view_id: flight.view_id,
        });
    }

    fn swap_in_flight(
        &mut self,
        flight: &mut InFlight<C>,
        window: &mut WindowController<C>,
        now: Instant,
        events: &mut Vec<TransitionEvent>,
    ) -> Result<(), NavigationError> {
        let Some(change) = flight.incoming.take() else {
            return Ok(());
        };
        flight.phase = TransitionPhase::Swapping;
        swap(window, change, flight.incoming_frame(0.0), false)?;
        events.push(TransitionEvent::Swapped {
            view_id: flight.view_id.clone(),
        });
        flight.phase = TransitionPhase::Incoming;
        flight.phase_started_at = now;
        Ok(())
    }
}

fn swap<C: ?Sized>(
    window: &mut WindowController<C>,
    change: SceneChange<C>,
    initial: Presentation,
    interactive: bool,
) -> Result<(), NavigationError> {
    let SceneChange {
        mut root,
        stylesheets,
        width,
        height,
        title,
    } = change;
    root.set_presentation(initial);
    root.set_interactive(interactive);
    window.apply_view(root, stylesheets, width, height, &title)
}

/// Put whatever root the window shows back at rest and hand input back to it.
fn release<C: ?Sized>(window: &mut WindowController<C>) {
    if let Some(root) = window.content_mut() {
        root.set_presentation(Presentation::RESTING);
        root.set_interactive(true);
    }
}

fn progress(start: Instant, now: Instant, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start).as_secs_f32();
    (elapsed / duration.as_secs_f32()).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "tests/transition_tests.rs"]
mod tests;
