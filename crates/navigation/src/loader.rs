//! Resolves view and stylesheet identifiers to fresh in-memory objects.

use std::{collections::HashMap, fs, io, path::PathBuf, sync::Arc};

use crate::{
    controller::ControllerHandle,
    descriptor::{StylesheetId, ViewId},
    error::{ResourceError, ResourceKind},
    window::ViewRoot,
};

type ViewFactory<C> = Box<dyn Fn() -> ControllerHandle<C>>;

pub struct LoadedView<C: ?Sized> {
    pub root: ViewRoot<C>,
    pub controller: ControllerHandle<C>,
}

/// Loaded stylesheet. The content is opaque to the navigation core; the
/// toolkit interprets it when the root is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleHandle {
    id: StylesheetId,
    content: Arc<str>,
}

impl StyleHandle {
    pub fn id(&self) -> &StylesheetId {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

pub struct ResourceLoader<C: ?Sized> {
    views: HashMap<ViewId, ViewFactory<C>>,
    stylesheets: HashMap<StylesheetId, Arc<str>>,
    stylesheet_dir: Option<PathBuf>,
}

impl<C: ?Sized> Default for ResourceLoader<C> {
    fn default() -> Self {
        Self {
            views: HashMap::new(),
            stylesheets: HashMap::new(),
            stylesheet_dir: None,
        }
    }
}

impl<C: ?Sized + 'static> ResourceLoader<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stylesheets not registered in memory are read from `<dir>/<id>` on
    /// every load.
    pub fn with_stylesheet_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.stylesheet_dir = Some(dir.into());
        self
    }

    pub fn register<F>(&mut self, view_id: impl Into<ViewId>, factory: F) -> &mut Self
    where
        F: Fn() -> ControllerHandle<C> + 'static,
    {
        self.views.insert(view_id.into(), Box::new(factory));
        self
    }

    pub fn register_stylesheet(
        &mut self,
        stylesheet_id: impl Into<StylesheetId>,
        content: impl Into<Arc<str>>,
    ) -> &mut Self {
        self.stylesheets
            .insert(stylesheet_id.into(), content.into());
        self
    }

    pub fn contains_view(&self, view_id: &ViewId) -> bool {
        self.views.contains_key(view_id)
    }

    pub fn load(&self, view_id: &ViewId) -> Result<LoadedView<C>, ResourceError> {
        let factory = self
            .views
            .get(view_id)
            .ok_or_else(|| ResourceError::not_found(ResourceKind::View, view_id.as_str()))?;
        let controller = factory();
        Ok(LoadedView {
            root: ViewRoot::new(view_id.clone(), controller.clone()),
            controller,
        })
    }

    pub fn load_stylesheet(&self, stylesheet_id: &StylesheetId) -> Result<StyleHandle, ResourceError> {
        let not_found = || ResourceError::not_found(ResourceKind::Stylesheet, stylesheet_id.as_str());
        let relative = stylesheet_id.as_str().trim().trim_start_matches('/');
        if relative.is_empty() {
            return Err(not_found());
        }

        if let Some(content) = self.stylesheets.get(stylesheet_id) {
            return Ok(StyleHandle {
                id: stylesheet_id.clone(),
                content: Arc::clone(content),
            });
        }

        let dir = self.stylesheet_dir.as_ref().ok_or_else(not_found)?;
        match fs::read_to_string(dir.join(relative)) {
            Ok(content) => Ok(StyleHandle {
                id: stylesheet_id.clone(),
                content: content.into(),
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(not_found()),
            Err(source) => Err(ResourceError::Io {
                kind: ResourceKind::Stylesheet,
                id: stylesheet_id.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
#[path = "tests/loader_tests.rs"]
mod tests;
