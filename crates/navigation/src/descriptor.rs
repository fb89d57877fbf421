//! Identifiers and immutable request descriptors passed to the navigator.

use std::{fmt, time::Duration};

macro_rules! resource_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

resource_id!(ViewId);
resource_id!(StylesheetId);

/// Everything the window needs to show a view: which template, how it is
/// styled, and the window geometry/title that go with it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewDescriptor {
    view_id: ViewId,
    stylesheet_id: Option<StylesheetId>,
    width: f32,
    height: f32,
    title: String,
}

impl ViewDescriptor {
    pub fn new(
        view_id: impl Into<ViewId>,
        width: f32,
        height: f32,
        title: impl Into<String>,
    ) -> Self {
        Self {
            view_id: view_id.into(),
            stylesheet_id: None,
            width,
            height,
            title: title.into(),
        }
    }

    pub fn with_stylesheet(mut self, stylesheet_id: impl Into<StylesheetId>) -> Self {
        self.stylesheet_id = Some(stylesheet_id.into());
        self
    }

    pub fn view_id(&self) -> &ViewId {
        &self.view_id
    }

    pub fn stylesheet_id(&self) -> Option<&StylesheetId> {
        self.stylesheet_id.as_ref()
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn back_target(&self) -> BackTarget {
        BackTarget {
            view_id: self.view_id.clone(),
            stylesheet_id: self.stylesheet_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    None,
    Fade,
    SlideLeft,
    SlideRight,
    SlideUp,
    SlideDown,
}

impl TransitionKind {
    pub fn default_duration(self) -> Duration {
        match self {
            TransitionKind::None => Duration::ZERO,
            TransitionKind::Fade => Duration::from_millis(300),
            TransitionKind::SlideLeft
            | TransitionKind::SlideRight
            | TransitionKind::SlideUp
            | TransitionKind::SlideDown => Duration::from_millis(400),
        }
    }

    /// Offset the outgoing root travels to, for a window of `size`.
    /// The incoming root starts at the negation of this.
    pub fn slide_delta(self, size: (f32, f32)) -> Option<(f32, f32)> {
        let (width, height) = size;
        match self {
            TransitionKind::SlideLeft => Some((-width, 0.0)),
            TransitionKind::SlideRight => Some((width, 0.0)),
            TransitionKind::SlideUp => Some((0.0, -height)),
            TransitionKind::SlideDown => Some((0.0, height)),
            TransitionKind::None | TransitionKind::Fade => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionSpec {
    pub kind: TransitionKind,
    pub duration: Duration,
}

impl TransitionSpec {
    pub fn of(kind: TransitionKind) -> Self {
        Self {
            kind,
            duration: kind.default_duration(),
        }
    }

    pub fn none() -> Self {
        Self::of(TransitionKind::None)
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// A zero-length fade or slide behaves like `None`.
    pub fn is_immediate(&self) -> bool {
        self.kind == TransitionKind::None || self.duration.is_zero()
    }
}

impl Default for TransitionSpec {
    fn default() -> Self {
        Self::of(TransitionKind::Fade)
    }
}

/// Where a freshly shown view should return to when its own Back action fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackTarget {
    pub view_id: ViewId,
    pub stylesheet_id: Option<StylesheetId>,
}

impl BackTarget {
    pub fn new(view_id: impl Into<ViewId>, stylesheet_id: Option<StylesheetId>) -> Self {
        Self {
            view_id: view_id.into(),
            stylesheet_id,
        }
    }
}
