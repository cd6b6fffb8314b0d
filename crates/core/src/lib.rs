//! Paperview Core Library
//!
//! Viewer session and state model: document lifecycle, continuous-scroll
//! layout, snapshot-based undo, and thumbnail synchronization.

pub mod command;
pub mod config;
pub mod error;
pub mod session;
pub mod thumbnail;
pub mod undo;

pub use command::{Command, CommandOutcome};
pub use config::ViewerConfig;
pub use error::{ViewerError, ViewerResult};
pub use session::{LayoutUpdate, PagePlacement, ViewerSession, WheelOutcome};
pub use thumbnail::ThumbnailStrip;
pub use undo::UndoStack;
