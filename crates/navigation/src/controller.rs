//! Controller objects bound to views, and the capability interfaces callers
//! use to configure them after navigation.

use std::{
    any::{type_name, Any},
    cell::{Ref, RefCell, RefMut},
    fmt,
    rc::{Rc, Weak},
};

use crate::{descriptor::BackTarget, error::NavigationError, session::NavigationSession};

/// Type-erasure hook so handles can be narrowed to a concrete controller.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Capability: the controller can be told which view its Back action returns to.
pub trait SupportsBackTarget {
    fn set_previous_page(&mut self, target: BackTarget);
}

pub trait Controller: AsAny {
    fn as_back_target(&mut self) -> Option<&mut dyn SupportsBackTarget> {
        None
    }

    /// Called right after the view becomes the window's content.
    fn on_attached(&mut self, _session: &NavigationSession) {}

    /// Called once the incoming animation has finished and the view is interactive.
    fn on_activated(&mut self, _session: &NavigationSession) {}
}

/// Shared handle to a loaded controller. The window's root keeps one strong
/// handle; the session only ever holds a weak one.
pub struct ControllerHandle<C: ?Sized>(Rc<RefCell<C>>);

impl<C: ?Sized> Clone for ControllerHandle<C> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<C: ?Sized> fmt::Debug for ControllerHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerHandle")
            .field("strong", &Rc::strong_count(&self.0))
            .finish()
    }
}

impl<C: ?Sized> ControllerHandle<C> {
    pub fn new(controller: Rc<RefCell<C>>) -> Self {
        Self(controller)
    }

    pub fn borrow(&self) -> Ref<'_, C> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, C> {
        self.0.borrow_mut()
    }

    pub fn try_borrow_mut(&self) -> Option<RefMut<'_, C>> {
        self.0.try_borrow_mut().ok()
    }

    pub fn downgrade(&self) -> Weak<RefCell<C>> {
        Rc::downgrade(&self.0)
    }

    pub fn from_weak(weak: &Weak<RefCell<C>>) -> Option<Self> {
        weak.upgrade().map(Self)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<C: ?Sized + Controller> ControllerHandle<C> {
    /// False while the controller is borrowed elsewhere.
    pub fn supports_back_target(&self) -> bool {
        self.0
            .try_borrow_mut()
            .is_ok_and(|mut controller| controller.as_back_target().is_some())
    }

    pub fn set_back_target(&self, target: BackTarget) -> Result<(), NavigationError> {
        let mut controller = self.lock()?;
        let capability =
            controller
                .as_back_target()
                .ok_or(NavigationError::ControllerMismatch {
                    capability: "SupportsBackTarget",
                })?;
        capability.set_previous_page(target);
        Ok(())
    }

    /// Narrow to a concrete controller type and run `f` on it.
    pub fn with<T: Controller, R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R, NavigationError> {
        let mut guard = self.lock()?;
        let any = <C as AsAny>::as_any_mut(&mut *guard);
        any.downcast_mut::<T>()
            .map(f)
            .ok_or(NavigationError::ControllerMismatch {
                capability: type_name::<T>(),
            })
    }

    /// False while the controller is mutably borrowed elsewhere.
    pub fn is<T: Controller>(&self) -> bool {
        self.0
            .try_borrow()
            .is_ok_and(|guard| <C as AsAny>::as_any(&*guard).is::<T>())
    }

    fn lock(&self) -> Result<RefMut<'_, C>, NavigationError> {
        self.0
            .try_borrow_mut()
            .map_err(|_| NavigationError::ControllerBusy)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
