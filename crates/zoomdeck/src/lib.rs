//! A zoomable markdown presentation canvas.
//!
//! A document is split on `---` lines into slides that sit on a 3-column
//! grid in content space, next to a heading outline. A [`Presenter`] drives
//! a pan/zoom camera between them with eased, cancellable transitions and
//! dispatches pointer and keyboard input.

pub mod animator;
pub mod app;
pub mod camera;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod host;
pub mod input;
pub mod layout;
pub mod parser;
pub mod presenter;
pub mod render;
pub mod theme;
pub mod watch;

pub use camera::{Camera, CameraPose};
pub use error::{DeckError, RenderError, Result};
pub use host::{HostUi, Layer, NavigationStatus};
pub use input::{EventOutcome, Gesture, InputEvent};
pub use parser::{OutlineItem, ParsedDeck, Slide};
pub use presenter::{Presenter, PresenterBuilder, ViewMode};
