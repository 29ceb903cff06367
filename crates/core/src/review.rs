//! Review state machine for post-before-publish confirmation.
//!
//! A [`ReviewSession`] holds the text under review and walks an explicit
//! state machine: `Reviewing -> Editing -> Reviewing` for edit cycles, with
//! `Approved` and `Aborted` as the terminal states. Invalid transitions are
//! rejected rather than silently ignored, so a driver loop that confuses
//! its own state fails loudly.

use crate::{NewsdeskError, Result};

/// Where a review session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    /// Content is shown and awaiting a decision.
    Reviewing,
    /// An edit was requested and its result is pending.
    Editing,
    /// The reviewer accepted the content.
    Approved,
    /// The reviewer discarded the content.
    Aborted,
}

/// One interactive review of a piece of text.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    content: String,
    state: ReviewState,
}

impl ReviewSession {
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: content.into(), state: ReviewState::Reviewing }
    }

    /// The text as it currently stands, including any applied edits.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn state(&self) -> ReviewState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, ReviewState::Approved | ReviewState::Aborted)
    }

    /// Accepts the content. Only valid while reviewing.
    pub fn approve(&mut self) -> Result<()> {
        self.transition_from_reviewing(ReviewState::Approved, "approve")
    }

    /// Requests an edit. Only valid while reviewing.
    pub fn request_edit(&mut self) -> Result<()> {
        self.transition_from_reviewing(ReviewState::Editing, "edit")
    }

    /// Submits an edit result. An empty edit aborts the session; a non-empty
    /// one replaces the content and returns to reviewing.
    pub fn submit_edit(&mut self, edited: &str) -> Result<()> {
        if self.state != ReviewState::Editing {
            return Err(NewsdeskError::validation(format!(
                "Cannot submit an edit while {:?}",
                self.state
            )));
        }

        let trimmed = edited.trim();
        if trimmed.is_empty() {
            self.state = ReviewState::Aborted;
        } else {
            self.content = trimmed.to_string();
            self.state = ReviewState::Reviewing;
        }
        Ok(())
    }

    /// Discards the content. Valid from any non-terminal state.
    pub fn abort(&mut self) -> Result<()> {
        if self.is_terminal() {
            return Err(NewsdeskError::validation(format!("Cannot abort a session that is {:?}", self.state)));
        }
        self.state = ReviewState::Aborted;
        Ok(())
    }

    fn transition_from_reviewing(&mut self, next: ReviewState, action: &str) -> Result<()> {
        if self.state != ReviewState::Reviewing {
            return Err(NewsdeskError::validation(format!(
                "Cannot {} while {:?}",
                action, self.state
            )));
        }
        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approve_path() {
        let mut session = ReviewSession::new("A post");
        session.approve().unwrap();
        assert_eq!(session.state(), ReviewState::Approved);
        assert!(session.is_terminal());
        assert_eq!(session.content(), "A post");
    }

    #[test]
    fn test_edit_cycle_updates_content() {
        let mut session = ReviewSession::new("Draft one");
        session.request_edit().unwrap();
        assert_eq!(session.state(), ReviewState::Editing);

        session.submit_edit("  Draft two  ").unwrap();
        assert_eq!(session.state(), ReviewState::Reviewing);
        assert_eq!(session.content(), "Draft two");

        session.approve().unwrap();
        assert_eq!(session.state(), ReviewState::Approved);
    }

    #[test]
    fn test_empty_edit_aborts() {
        let mut session = ReviewSession::new("Draft");
        session.request_edit().unwrap();
        session.submit_edit("   \n").unwrap();
        assert_eq!(session.state(), ReviewState::Aborted);
        // Content is left as it was before the edit.
        assert_eq!(session.content(), "Draft");
    }

    #[test]
    fn test_abort_from_editing() {
        let mut session = ReviewSession::new("Draft");
        session.request_edit().unwrap();
        session.abort().unwrap();
        assert_eq!(session.state(), ReviewState::Aborted);
    }

    #[test]
    fn test_invalid_transitions_rejected() {
        let mut session = ReviewSession::new("Draft");
        assert!(session.submit_edit("text").is_err());

        session.approve().unwrap();
        assert!(session.approve().is_err());
        assert!(session.request_edit().is_err());
        assert!(session.abort().is_err());
    }
}
