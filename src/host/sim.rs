//! In-memory host: each frame shows a list of text panes and a cursor.

use tracing::trace;

use super::{Host, InvalidCapture};
use crate::common::collections::HashMap;
use crate::common::config::DefaultContent;

pub type SimFrameId = u32;

const INITIAL_PANE: &str = "*scratch*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimCapture {
    frame: SimFrameId,
    epoch: u64,
    panes: Vec<String>,
}

impl SimCapture {
    pub fn panes(&self) -> &[String] { &self.panes }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Screen {
    panes: Vec<String>,
    cursor: usize,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            panes: vec![INITIAL_PANE.to_string()],
            cursor: 0,
        }
    }
}

#[derive(Debug, Default)]
pub struct SimHost {
    selected: SimFrameId,
    screens: HashMap<SimFrameId, Screen>,
    epoch: u64,
    announced: Vec<String>,
}

impl SimHost {
    pub fn new() -> Self {
        let mut host = Self::default();
        host.select_frame(0);
        host
    }

    pub fn select_frame(&mut self, frame: SimFrameId) {
        self.selected = frame;
        self.screens.entry(frame).or_default();
    }

    /// Splits the live layout of the selected frame with a new pane.
    pub fn open(&mut self, pane: impl Into<String>) { self.screen_mut().panes.push(pane.into()); }

    pub fn panes(&self) -> &[String] {
        self.screen().map(|screen| screen.panes.as_slice()).unwrap_or_default()
    }

    /// Names passed to `notify_name_changed`, oldest first.
    pub fn announced(&self) -> &[String] { &self.announced }

    /// Makes every capture taken so far stale.
    pub fn invalidate_captures(&mut self) { self.epoch += 1; }

    fn screen(&self) -> Option<&Screen> { self.screens.get(&self.selected) }

    fn screen_mut(&mut self) -> &mut Screen { self.screens.entry(self.selected).or_default() }
}

impl Host for SimHost {
    type FrameId = SimFrameId;
    type Capture = SimCapture;

    fn selected_frame(&self) -> SimFrameId { self.selected }

    fn capture_layout(&mut self) -> SimCapture {
        let (frame, epoch) = (self.selected, self.epoch);
        let panes = self.screen_mut().panes.clone();
        trace!(frame, epoch, ?panes, "capture");
        SimCapture { frame, epoch, panes }
    }

    fn restore_layout(&mut self, capture: &SimCapture) -> Result<(), InvalidCapture> {
        if capture.frame != self.selected {
            return Err(InvalidCapture::new(format!(
                "captured in frame {} but frame {} is selected",
                capture.frame, self.selected
            )));
        }
        if capture.epoch != self.epoch {
            return Err(InvalidCapture::new(format!(
                "capture from epoch {} is stale (now {})",
                capture.epoch, self.epoch
            )));
        }
        trace!(frame = capture.frame, panes = ?capture.panes, "restore");
        self.screen_mut().panes = capture.panes.clone();
        Ok(())
    }

    fn cursor_position(&self) -> usize { self.screen().map_or(0, |screen| screen.cursor) }

    fn set_cursor_position(&mut self, position: usize) { self.screen_mut().cursor = position; }

    fn reset_to_default_view(&mut self, content: &DefaultContent) {
        let screen = self.screen_mut();
        match content {
            DefaultContent::Buffer(name) => {
                screen.panes = vec![name.clone()];
                screen.cursor = 0;
            }
            DefaultContent::CurrentlyShown => screen.panes.truncate(1),
        }
    }

    fn notify_name_changed(&mut self, name: &str) { self.announced.push(name.to_string()); }
}
