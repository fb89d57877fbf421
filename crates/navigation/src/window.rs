//! The single top-level window and the view root it displays.

use crate::{
    controller::ControllerHandle, descriptor::ViewId, error::NavigationError, loader::StyleHandle,
};

/// Toolkit side of the window. The GUI backend implements this; the core
/// only ever resizes, retitles and asks whether the window is still open.
pub trait WindowSurface {
    fn set_title(&mut self, title: &str);
    fn set_size(&mut self, width: f32, height: f32);
    fn size(&self) -> (f32, f32);

    fn is_open(&self) -> bool {
        true
    }
}

/// Animated properties of a root. The toolkit reads these when drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presentation {
    pub opacity: f32,
    pub offset: (f32, f32),
}

impl Presentation {
    pub const RESTING: Presentation = Presentation {
        opacity: 1.0,
        offset: (0.0, 0.0),
    };
}

impl Default for Presentation {
    fn default() -> Self {
        Self::RESTING
    }
}

pub struct ViewRoot<C: ?Sized> {
    view_id: ViewId,
    controller: ControllerHandle<C>,
    presentation: Presentation,
    interactive: bool,
}

impl<C: ?Sized> ViewRoot<C> {
    pub fn new(view_id: ViewId, controller: ControllerHandle<C>) -> Self {
        Self {
            view_id,
            controller,
            presentation: Presentation::RESTING,
            interactive: true,
        }
    }

    pub fn view_id(&self) -> &ViewId {
        &self.view_id
    }

    pub fn controller(&self) -> &ControllerHandle<C> {
        &self.controller
    }

    pub fn presentation(&self) -> Presentation {
        self.presentation
    }

    /// False while a transition animates this root.
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub(crate) fn set_presentation(&mut self, presentation: Presentation) {
        self.presentation = presentation;
    }

    pub(crate) fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }
}

pub struct WindowController<C: ?Sized> {
    surface: Option<Box<dyn WindowSurface>>,
    content: Option<ViewRoot<C>>,
    stylesheets: Vec<StyleHandle>,
    title: String,
}

impl<C: ?Sized> Default for WindowController<C> {
    fn default() -> Self {
        Self {
            surface: None,
            content: None,
            stylesheets: Vec::new(),
            title: String::new(),
        }
    }
}

impl<C: ?Sized> WindowController<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_primary_window(&mut self, surface: Box<dyn WindowSurface>) {
        if self.surface.is_some() {
            tracing::warn!("primary window replaced; previous content dropped");
            self.content = None;
            self.stylesheets.clear();
        }
        self.surface = Some(surface);
    }

    pub fn primary_window(&self) -> Option<&dyn WindowSurface> {
        self.surface.as_deref()
    }

    pub fn primary_window_mut(&mut self) -> Option<&mut (dyn WindowSurface + 'static)> {
        self.surface.as_deref_mut()
    }

    pub fn is_initialized(&self) -> bool {
        self.surface.is_some()
    }

    pub fn is_open(&self) -> bool {
        self.surface.as_ref().is_some_and(|surface| surface.is_open())
    }

    pub fn size(&self) -> (f32, f32) {
        self.surface
            .as_ref()
            .map(|surface| surface.size())
            .unwrap_or((0.0, 0.0))
    }

    /// Replace the displayed root, its stylesheets, the size and the title in
    /// one step.
    pub fn apply_view(
        &mut self,
        root: ViewRoot<C>,
        stylesheets: Vec<StyleHandle>,
        width: f32,
        height: f32,
        title: &str,
    ) -> Result<(), NavigationError> {
        let surface = self
            .surface
            .as_mut()
            .ok_or(NavigationError::NotInitialized)?;
        surface.set_size(width, height);
        surface.set_title(title);
        self.title = title.to_string();
        self.stylesheets = stylesheets;
        self.content = Some(root);
        Ok(())
    }

    pub fn content(&self) -> Option<&ViewRoot<C>> {
        self.content.as_ref()
    }

    pub(crate) fn content_mut(&mut self) -> Option<&mut ViewRoot<C>> {
        self.content.as_mut()
    }

    pub fn stylesheets(&self) -> &[StyleHandle] {
        &self.stylesheets
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

#[cfg(test)]
#[path = "tests/window_tests.rs"]
mod tests;
