//! Narrow interfaces to the environment that actually draws panes.
//!
//! The controller never looks inside a capture; it only hands captures back
//! to the same host that produced them.

pub mod sim;

use std::fmt::Debug;
use std::hash::Hash;

use thiserror::Error;

use crate::common::collections::HashSet;
use crate::common::config::DefaultContent;

/// The host refused to restore a capture (stale, or from another frame).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid layout capture: {reason}")]
pub struct InvalidCapture {
    pub reason: String,
}

impl InvalidCapture {
    pub fn new(reason: impl Into<String>) -> Self { Self { reason: reason.into() } }
}

pub trait Host {
    /// Identifies one independent display surface.
    type FrameId: Clone + Eq + Hash + Debug;
    /// Opaque, restorable arrangement of views.
    type Capture;

    /// The frame the user is working in. Every operation acts on it.
    fn selected_frame(&self) -> Self::FrameId;

    fn capture_layout(&mut self) -> Self::Capture;

    /// Replaces the live arrangement. Must leave the arrangement untouched on
    /// error.
    fn restore_layout(&mut self, capture: &Self::Capture) -> Result<(), InvalidCapture>;

    fn cursor_position(&self) -> usize;

    fn set_cursor_position(&mut self, position: usize);

    /// Collapses the live arrangement to a single view.
    fn reset_to_default_view(&mut self, content: &DefaultContent);

    fn notify_name_changed(&mut self, name: &str);
}

/// Result of asking the user to pick an existing layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The live layout was picked.
    Current,
    Name(String),
}

/// Asks the user for layout names. An empty answer means "pick one for me".
pub trait Prompt {
    fn prompt_for_name(&mut self, prompt: &str, disallowed: &HashSet<String>) -> String;

    fn prompt_for_existing_name(
        &mut self,
        prompt: &str,
        choices: &[String],
        allow_current: bool,
    ) -> Selection;
}
