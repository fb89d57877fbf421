//! Entry point used by views: load the target, run the transition, and hand
//! the new controller back to the caller.

use std::{
    cell::Cell,
    mem,
    rc::Rc,
    time::{Duration, Instant},
};

use crate::{
    controller::{Controller, ControllerHandle},
    descriptor::{BackTarget, StylesheetId, TransitionSpec, ViewDescriptor, ViewId},
    error::NavigationError,
    loader::ResourceLoader,
    session::{NavigationSession, DEFAULT_HISTORY_LIMIT},
    transition::{SceneChange, TransitionEngine, TransitionEvent, TransitionPhase, DEFAULT_MAX_TRANSITION},
    window::{WindowController, WindowSurface},
};

#[derive(Debug, Clone)]
pub struct NavigationConfig {
    /// Slack allowed past both animated phases before a transition is forced
    /// to completion.
    pub max_transition: Duration,
    pub history_limit: usize,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            max_transition: DEFAULT_MAX_TRANSITION,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NavigationRequest {
    descriptor: ViewDescriptor,
    transition: TransitionSpec,
    back_to: Option<BackTarget>,
    record_history: bool,
}

impl NavigationRequest {
    pub fn to(descriptor: ViewDescriptor) -> Self {
        Self {
            descriptor,
            transition: TransitionSpec::default(),
            back_to: None,
            record_history: true,
        }
    }

    pub fn transition(mut self, spec: TransitionSpec) -> Self {
        self.transition = spec;
        self
    }

    pub fn back_to(mut self, target: BackTarget) -> Self {
        self.back_to = Some(target);
        self
    }

    /// Do not push the view being left onto the history stack.
    pub fn without_history(mut self) -> Self {
        self.record_history = false;
        self
    }

    pub fn descriptor(&self) -> &ViewDescriptor {
        &self.descriptor
    }
}

/// Withdraws a deferred navigation that has not started yet.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Rc<Cell<bool>>);

impl CancellationToken {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

struct Deferred {
    request: NavigationRequest,
    token: CancellationToken,
}

struct Incoming {
    descriptor: ViewDescriptor,
    record_history: bool,
}

pub struct Navigator<C: ?Sized> {
    loader: ResourceLoader<C>,
    window: WindowController<C>,
    session: NavigationSession,
    engine: TransitionEngine<C>,
    current: Option<ViewDescriptor>,
    incoming: Option<Incoming>,
    deferred: Option<Deferred>,
    outbox: Vec<TransitionEvent>,
}

impl<C: ?Sized + Controller> Navigator<C> {
    pub fn new(loader: ResourceLoader<C>, config: NavigationConfig) -> Self {
        Self {
            loader,
            window: WindowController::new(),
            session: NavigationSession::new(config.history_limit),
            engine: TransitionEngine::new(config.max_transition),
            current: None,
            incoming: None,
            deferred: None,
            outbox: Vec::new(),
        }
    }

    pub fn set_primary_window(&mut self, surface: Box<dyn WindowSurface>) {
        self.window.set_primary_window(surface);
    }

    pub fn window(&self) -> &WindowController<C> {
        &self.window
    }

    pub fn session(&self) -> &NavigationSession {
        &self.session
    }

    pub fn loader_mut(&mut self) -> &mut ResourceLoader<C> {
        &mut self.loader
    }

    pub fn phase(&self) -> TransitionPhase {
        self.engine.phase()
    }

    pub fn is_busy(&self) -> bool {
        !self.engine.is_idle()
    }

    /// The descriptor of the view the window currently shows.
    pub fn current(&self) -> Option<&ViewDescriptor> {
        self.current.as_ref()
    }

    pub fn has_deferred(&self) -> bool {
        self.deferred
            .as_ref()
            .is_some_and(|deferred| !deferred.token.is_cancelled())
    }

    pub fn set_back_target(&mut self, view_id: impl Into<ViewId>, stylesheet_id: Option<StylesheetId>) {
        self.session.set_back_target(view_id, stylesheet_id);
    }

    pub fn reset_session(&mut self) {
        self.session.clear();
    }

    /// Start navigating to `request`. The returned controller belongs to the
    /// view that becomes active for this call; the caller may configure it
    /// before the incoming animation finishes.
    pub fn navigate(
        &mut self,
        request: NavigationRequest,
        now: Instant,
    ) -> Result<ControllerHandle<C>, NavigationError> {
        let NavigationRequest {
            descriptor,
            transition,
            back_to,
            record_history,
        } = request;

        if let Some(view_id) = self.engine.in_flight_view() {
            tracing::debug!(
                requested = %descriptor.view_id(),
                in_flight = %view_id,
                "navigation rejected while a transition is in flight"
            );
            return Err(NavigationError::Busy);
        }
        if !self.window.is_initialized() {
            return Err(NavigationError::NotInitialized);
        }

        let loaded = self.loader.load(descriptor.view_id()).map_err(|err| {
            tracing::error!(view_id = %descriptor.view_id(), error = %err, "failed to load view");
            err
        })?;

        let stylesheets = match descriptor.stylesheet_id() {
            Some(stylesheet_id) => match self.loader.load_stylesheet(stylesheet_id) {
                Ok(handle) => vec![handle],
                Err(err) => {
                    tracing::warn!(
                        view_id = %descriptor.view_id(),
                        stylesheet = %stylesheet_id,
                        error = %err,
                        "stylesheet unavailable; showing view unstyled"
                    );
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        if let Some(target) = back_to {
            if let Some(capability) = loaded.controller.borrow_mut().as_back_target() {
                capability.set_previous_page(target.clone());
            }
            self.session.replace_back_target(target);
        }

        let change = SceneChange {
            root: loaded.root,
            stylesheets,
            width: descriptor.width(),
            height: descriptor.height(),
            title: descriptor.title().to_string(),
        };
        tracing::debug!(view_id = %descriptor.view_id(), kind = ?transition.kind, "starting transition");
        self.incoming = Some(Incoming {
            descriptor,
            record_history,
        });

        match self.engine.begin(change, transition, &mut self.window, now) {
            Ok(events) => {
                self.process_events(&events);
                self.outbox.extend(events);
                Ok(loaded.controller)
            }
            Err(err) => {
                self.incoming = None;
                Err(err)
            }
        }
    }

    /// Queue a navigation to run on the first tick that finds the engine
    /// idle. Only the newest queued request is kept.
    pub fn defer(&mut self, request: NavigationRequest) -> CancellationToken {
        let token = CancellationToken::default();
        if let Some(stale) = self.deferred.take() {
            tracing::debug!(
                dropped = %stale.request.descriptor.view_id(),
                replacement = %request.descriptor.view_id(),
                "dropping stale deferred navigation"
            );
        }
        self.deferred = Some(Deferred {
            request,
            token: token.clone(),
        });
        token
    }

    /// Navigate to the most recent history entry. `Ok(None)` when there is
    /// nothing to go back to.
    pub fn back(
        &mut self,
        spec: TransitionSpec,
        now: Instant,
    ) -> Result<Option<ControllerHandle<C>>, NavigationError> {
        if self.is_busy() {
            return Err(NavigationError::Busy);
        }
        let Some(previous) = self.session.pop_history() else {
            return Ok(None);
        };
        let request = NavigationRequest::to(previous.clone())
            .transition(spec)
            .without_history();
        match self.navigate(request, now) {
            Ok(controller) => Ok(Some(controller)),
            Err(err) => {
                self.session.push_history(previous);
                Err(err)
            }
        }
    }

    /// Advance the running transition and start any deferred navigation once
    /// the engine is idle. Returns every event produced since the last tick.
    pub fn tick(&mut self, now: Instant) -> Vec<TransitionEvent> {
        let events = self.engine.tick(&mut self.window, now);
        self.process_events(&events);
        self.outbox.extend(events);

        if self.engine.is_idle() {
            if let Some(Deferred { request, token }) = self.deferred.take() {
                if token.is_cancelled() {
                    tracing::debug!(view_id = %request.descriptor.view_id(), "deferred navigation cancelled");
                } else {
                    let view_id = request.descriptor.view_id().clone();
                    if let Err(err) = self.navigate(request, now) {
                        tracing::warn!(view_id = %view_id, error = %err, "deferred navigation failed");
                        self.outbox.push(TransitionEvent::Aborted {
                            view_id,
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }

        mem::take(&mut self.outbox)
    }

    /// Force the running transition to its end state.
    pub fn finish_now(&mut self, now: Instant) -> Vec<TransitionEvent> {
        let events = self.engine.finish_now(&mut self.window, now);
        self.process_events(&events);
        self.outbox.extend(events);
        mem::take(&mut self.outbox)
    }

    fn process_events(&mut self, events: &[TransitionEvent]) {
        for event in events {
            match event {
                TransitionEvent::Swapped { view_id } => self.on_swapped(view_id),
                TransitionEvent::Completed { view_id } => {
                    if let Some(root) = self.window.content() {
                        match root.controller().try_borrow_mut() {
                            Some(mut controller) => controller.on_activated(&self.session),
                            None => tracing::warn!(view_id = %view_id, "controller busy; skipped activation hook"),
                        }
                    }
                    tracing::info!(view_id = %view_id, title = %self.window.title(), "navigation complete");
                }
                TransitionEvent::Aborted { view_id, reason } => {
                    self.incoming = None;
                    tracing::warn!(view_id = %view_id, reason = %reason, "navigation aborted");
                }
            }
        }
    }

    fn on_swapped(&mut self, view_id: &ViewId) {
        if let Some(Incoming {
            descriptor,
            record_history,
        }) = self.incoming.take()
        {
            let previous = mem::replace(&mut self.current, Some(descriptor));
            if let (true, Some(previous)) = (record_history, previous) {
                self.session.push_history(previous);
            }
        }

        let Some(root) = self.window.content() else {
            return;
        };
        let controller = root.controller().clone();
        self.session.record_active(view_id.clone(), &controller);
        match controller.try_borrow_mut() {
            Some(mut controller) => controller.on_attached(&self.session),
            None => tracing::warn!(view_id = %view_id, "controller busy; skipped attach hook"),
        };
    }
}

#[cfg(test)]
#[path = "tests/navigator_tests.rs"]
mod tests;
