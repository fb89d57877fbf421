//! Cross-view navigation state, threaded explicitly through the navigator
//! and lent read-only to controllers.

use std::{any::Any, cell::RefCell, collections::VecDeque, rc::Weak};

use crate::{
    controller::ControllerHandle,
    descriptor::{BackTarget, StylesheetId, ViewDescriptor, ViewId},
};

pub const DEFAULT_HISTORY_LIMIT: usize = 32;

pub struct NavigationSession {
    active_view: Option<ViewId>,
    // Weak<RefCell<C>>, erased so controllers can see the session without
    // knowing the navigator's controller type.
    active_controller: Option<Box<dyn Any>>,
    back_target: Option<BackTarget>,
    history: VecDeque<ViewDescriptor>,
    history_limit: usize,
}

impl Default for NavigationSession {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl NavigationSession {
    pub fn new(history_limit: usize) -> Self {
        Self {
            active_view: None,
            active_controller: None,
            back_target: None,
            history: VecDeque::new(),
            history_limit,
        }
    }

    pub(crate) fn record_active<C: ?Sized + 'static>(
        &mut self,
        view_id: ViewId,
        controller: &ControllerHandle<C>,
    ) {
        self.active_view = Some(view_id);
        self.active_controller = Some(Box::new(controller.downgrade()));
    }

    pub fn active_view_id(&self) -> Option<&ViewId> {
        self.active_view.as_ref()
    }

    /// The active view and its controller, if the window still holds it.
    pub fn active<C: ?Sized + 'static>(&self) -> Option<(ViewId, ControllerHandle<C>)> {
        let view_id = self.active_view.clone()?;
        let weak = self
            .active_controller
            .as_ref()?
            .downcast_ref::<Weak<RefCell<C>>>()?;
        ControllerHandle::from_weak(weak).map(|handle| (view_id, handle))
    }

    pub fn set_back_target(
        &mut self,
        view_id: impl Into<ViewId>,
        stylesheet_id: Option<StylesheetId>,
    ) {
        self.back_target = Some(BackTarget::new(view_id, stylesheet_id));
    }

    pub(crate) fn replace_back_target(&mut self, target: BackTarget) {
        self.back_target = Some(target);
    }

    pub fn back_target(&self) -> Option<&BackTarget> {
        self.back_target.as_ref()
    }

    pub fn take_back_target(&mut self) -> Option<BackTarget> {
        self.back_target.take()
    }

    pub(crate) fn push_history(&mut self, descriptor: ViewDescriptor) {
        if self.history_limit == 0 {
            return;
        }
        while self.history.len() >= self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(descriptor);
    }

    pub(crate) fn pop_history(&mut self) -> Option<ViewDescriptor> {
        self.history.pop_back()
    }

    pub fn peek_history(&self) -> Option<&ViewDescriptor> {
        self.history.back()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn clear(&mut self) {
        self.back_target = None;
        self.history.clear();
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
