//! User-facing commands, mapped 1:1 onto session operations.
//!
//! Hosts translate toolbar buttons, keybindings, and wheel events into
//! [`Command`] values and apply them through [`ViewerSession::apply`]. The
//! returned [`CommandOutcome`] tells the host what changed; the
//! user-rejectable last-page deletion surfaces as a warning rather than an
//! error.

use crate::error::{ViewerError, ViewerResult};
use crate::session::{LayoutUpdate, ViewerSession, WheelOutcome};
use pdf_engine::PdfEngine;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Open(PathBuf),
    DeletePage,
    Undo,
    ZoomIn,
    ZoomOut,
    ToggleThumbnails,
    SaveAs(PathBuf),
    NextPage,
    PreviousPage,
    WheelScroll { delta: f32, over_content: bool },
    CtrlWheelZoom { delta: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Layout changed; apply the contained instructions to the surface.
    Layout(LayoutUpdate),
    /// Scroll position changed without relayout; the new scroll fraction.
    Scrolled(f32),
    /// Thumbnail strip visibility after a toggle.
    ThumbnailsVisible(bool),
    /// Document written to the given path.
    Saved(PathBuf),
    /// Operation rejected; show this message to the user.
    Warning(String),
    /// Nothing changed.
    NoOp,
}

impl<E: PdfEngine> ViewerSession<E> {
    pub fn apply(&mut self, command: Command) -> ViewerResult<CommandOutcome> {
        match command {
            Command::Open(path) => Ok(CommandOutcome::Layout(self.open_path(&path)?)),
            Command::DeletePage => match self.delete_current_page() {
                Ok(update) => Ok(CommandOutcome::Layout(update)),
                Err(ViewerError::LastPage) => {
                    Ok(CommandOutcome::Warning("Cannot delete page.".to_owned()))
                }
                Err(other) => Err(other),
            },
            Command::Undo => Ok(self
                .undo()?
                .map(CommandOutcome::Layout)
                .unwrap_or(CommandOutcome::NoOp)),
            Command::ZoomIn => Ok(CommandOutcome::Layout(self.zoom_in()?)),
            Command::ZoomOut => Ok(CommandOutcome::Layout(self.zoom_out()?)),
            Command::ToggleThumbnails => {
                Ok(CommandOutcome::ThumbnailsVisible(self.toggle_thumbnails()))
            }
            Command::SaveAs(path) => {
                self.save_as(&path)?;
                Ok(CommandOutcome::Saved(path))
            }
            Command::NextPage => Ok(CommandOutcome::Layout(self.next_page()?)),
            Command::PreviousPage => Ok(CommandOutcome::Layout(self.previous_page()?)),
            Command::WheelScroll { delta, over_content } => {
                Ok(match self.handle_wheel(delta, over_content)? {
                    WheelOutcome::Scrolled(fraction) => CommandOutcome::Scrolled(fraction),
                    WheelOutcome::PageFlipped(update) => CommandOutcome::Layout(update),
                    WheelOutcome::Ignored => CommandOutcome::NoOp,
                })
            }
            Command::CtrlWheelZoom { delta } => {
                Ok(CommandOutcome::Layout(self.ctrl_wheel_zoom(delta)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdf_engine::{fixtures, LopdfEngine};

    fn loaded_session(pages: usize) -> ViewerSession<LopdfEngine> {
        let mut session = ViewerSession::new(LopdfEngine::new());
        session.set_viewport(800.0, 600.0).expect("viewport");
        session
            .open_bytes(fixtures::sample_pdf(&vec![(600.0, 800.0); pages]))
            .expect("open");
        session
    }

    #[test]
    fn delete_on_single_page_document_warns_instead_of_failing() {
        let mut session = loaded_session(1);

        let outcome = session.apply(Command::DeletePage).expect("apply");
        assert_eq!(outcome, CommandOutcome::Warning("Cannot delete page.".to_owned()));
        assert_eq!(session.page_count().expect("count"), 1);
    }

    #[test]
    fn undo_command_reports_noop_when_stack_is_empty() {
        let mut session = loaded_session(3);

        let outcome = session.apply(Command::Undo).expect("apply");
        assert_eq!(outcome, CommandOutcome::NoOp);
    }

    #[test]
    fn delete_then_undo_round_trips_page_count() {
        let mut session = loaded_session(3);

        let outcome = session.apply(Command::DeletePage).expect("delete");
        assert!(matches!(outcome, CommandOutcome::Layout(_)));
        assert_eq!(session.page_count().expect("count"), 2);

        let outcome = session.apply(Command::Undo).expect("undo");
        assert!(matches!(outcome, CommandOutcome::Layout(_)));
        assert_eq!(session.page_count().expect("count"), 3);
    }

    #[test]
    fn navigation_commands_move_the_current_page() {
        let mut session = loaded_session(3);

        session.apply(Command::NextPage).expect("next");
        session.apply(Command::NextPage).expect("next");
        assert_eq!(session.current_page(), 2);

        session.apply(Command::PreviousPage).expect("prev");
        assert_eq!(session.current_page(), 1);
    }

    #[test]
    fn toggle_thumbnails_reports_new_visibility() {
        let mut session = loaded_session(2);

        assert_eq!(
            session.apply(Command::ToggleThumbnails).expect("toggle"),
            CommandOutcome::ThumbnailsVisible(false)
        );
        assert_eq!(
            session.apply(Command::ToggleThumbnails).expect("toggle"),
            CommandOutcome::ThumbnailsVisible(true)
        );
    }

    #[test]
    fn wheel_scroll_command_distinguishes_scroll_from_flip() {
        let mut session = loaded_session(5);

        let outcome = session
            .apply(Command::WheelScroll { delta: 100.0, over_content: true })
            .expect("wheel");
        assert!(matches!(outcome, CommandOutcome::Scrolled(_)));

        let outcome = session
            .apply(Command::WheelScroll { delta: 100.0, over_content: false })
            .expect("wheel");
        assert!(matches!(outcome, CommandOutcome::Layout(_)));
    }
}
