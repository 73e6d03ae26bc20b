//! The seven layout operations, expressed as transitions over a frame's ring
//! and its live ("current") layout.
//!
//! The live layout is never stored in the ring. Saving it pushes a snapshot
//! into the ring; restoring a snapshot takes it out again. Rotations restore
//! the incoming snapshot before the ring is touched, so a host that rejects a
//! capture leaves the frame exactly as it was.

pub mod command;

use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::common::collections::HashSet;
use crate::common::config::Settings;
use crate::error::RingError;
use crate::host::Host;
use crate::model::naming::{self, Resolved};
use crate::model::{FrameRegistry, NameGenerator, Snapshot};

/// Which end of the ring the outgoing layout is saved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deposit {
    Front,
    Back,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FrameSummary {
    pub current: String,
    /// Front (most recent) to back (oldest).
    pub saved: Vec<String>,
    pub capacity: usize,
}

pub struct SnapshotController<H: Host> {
    host: H,
    frames: FrameRegistry<H::FrameId, H::Capture>,
    settings: Settings,
}

impl<H: Host> SnapshotController<H> {
    pub fn new(host: H, settings: Settings) -> Self {
        Self::with_names(host, settings, NameGenerator::new())
    }

    pub fn with_names(host: H, settings: Settings, names: NameGenerator) -> Self {
        Self {
            frames: FrameRegistry::new(settings.capacity(), names),
            host,
            settings,
        }
    }

    pub fn host(&self) -> &H { &self.host }

    pub fn host_mut(&mut self) -> &mut H { &mut self.host }

    pub fn settings(&self) -> &Settings { &self.settings }

    /// Saves the live layout and starts a fresh one showing the configured
    /// default content.
    #[instrument(name = "controller::create", skip(self))]
    pub fn create(&mut self, name: Option<&str>) -> Result<(), RingError> {
        self.push_current(name, true)
    }

    /// Saves the live layout and keeps showing it under a new name.
    #[instrument(name = "controller::duplicate", skip(self))]
    pub fn duplicate(&mut self, name: Option<&str>) -> Result<(), RingError> {
        self.push_current(name, false)
    }

    /// Restores the most recently saved layout; the live one goes to the back.
    #[instrument(name = "controller::next", skip(self))]
    pub fn next(&mut self) -> Result<(), RingError> {
        let frame = self.host.selected_frame();
        if self.frames.ring(&frame).is_empty() {
            return Err(RingError::RingEmpty);
        }
        let outgoing = self.save_current(&frame);
        self.rotate_in(&frame, 0, Some((outgoing, Deposit::Back)))
    }

    /// Restores the oldest saved layout; the live one goes to the front.
    /// Undoes [`Self::next`] exactly, and vice versa.
    #[instrument(name = "controller::previous", skip(self))]
    pub fn previous(&mut self) -> Result<(), RingError> {
        let frame = self.host.selected_frame();
        let len = self.frames.ring(&frame).len();
        if len == 0 {
            return Err(RingError::RingEmpty);
        }
        let outgoing = self.save_current(&frame);
        self.rotate_in(&frame, len - 1, Some((outgoing, Deposit::Front)))
    }

    /// Switches to the layout called `name`. An unknown name is created as a
    /// duplicate of the live layout.
    #[instrument(name = "controller::jump_to", skip(self))]
    pub fn jump_to(&mut self, name: &str) -> Result<(), RingError> {
        match self.resolve(name) {
            Err(RingError::NotFound(_)) => self.duplicate(Some(name)),
            resolved => self.jump_to_resolved(resolved?),
        }
    }

    /// Like [`Self::jump_to`] but fails with `NotFound` instead of creating.
    #[instrument(name = "controller::jump_to_existing", skip(self))]
    pub fn jump_to_existing(&mut self, name: &str) -> Result<(), RingError> {
        let resolved = self.resolve(name)?;
        self.jump_to_resolved(resolved)
    }

    /// Deletes the layout called `name`. Deleting the live layout brings in
    /// the most recently saved one; the last layout of a frame is kept.
    #[instrument(name = "controller::delete", skip(self))]
    pub fn delete(&mut self, name: &str) -> Result<(), RingError> {
        let frame = self.host.selected_frame();
        match self.resolve(name)? {
            Resolved::Current => self.delete_current(),
            Resolved::Offset(offset) => {
                let removed = self.frames.ring(&frame).remove_at(offset)?;
                debug!(name = %removed.name, offset, "deleted saved layout");
                Ok(())
            }
        }
    }

    #[instrument(name = "controller::delete_current", skip(self))]
    pub fn delete_current(&mut self) -> Result<(), RingError> {
        let frame = self.host.selected_frame();
        if self.frames.ring(&frame).is_empty() {
            return Err(RingError::RingEmpty);
        }
        let dropped = self.frames.get(&frame).current_name.clone();
        self.rotate_in(&frame, 0, None)?;
        debug!(name = %dropped, "deleted live layout");
        Ok(())
    }

    /// Renames the live layout. Only names saved in the ring collide.
    #[instrument(name = "controller::rename", skip(self))]
    pub fn rename(&mut self, new_name: &str) -> Result<(), RingError> {
        let frame = self.host.selected_frame();
        let name = self.claim_name(&frame, Some(new_name), false)?;
        self.set_current_name(&frame, name);
        Ok(())
    }

    pub fn current_name(&mut self) -> &str {
        let frame = self.host.selected_frame();
        &self.frames.get(&frame).current_name
    }

    /// All names in the selected frame, current first.
    pub fn names(&mut self) -> Vec<String> {
        let frame = self.host.selected_frame();
        self.frames.get(&frame).names().map(str::to_string).collect()
    }

    pub fn saved_names(&mut self) -> Vec<String> {
        let frame = self.host.selected_frame();
        self.frames.get(&frame).saved_names().map(str::to_string).collect()
    }

    pub fn ring_len(&mut self) -> usize {
        let frame = self.host.selected_frame();
        self.frames.ring(&frame).len()
    }

    pub fn status_label(&mut self) -> Option<String> {
        if !self.settings.show_names_in_status {
            return None;
        }
        Some(format!("<{}>", self.current_name()))
    }

    pub fn summary(&mut self) -> FrameSummary {
        let frame = self.host.selected_frame();
        let state = self.frames.get(&frame);
        FrameSummary {
            current: state.current_name.clone(),
            saved: state.saved_names().map(str::to_string).collect(),
            capacity: state.ring.capacity(),
        }
    }

    fn taken_names(&mut self, include_current: bool) -> HashSet<String> {
        let names = if include_current { self.names() } else { self.saved_names() };
        names.into_iter().collect()
    }

    fn resolve(&mut self, name: &str) -> Result<Resolved, RingError> {
        let frame = self.host.selected_frame();
        let state = self.frames.get(&frame);
        naming::resolve(name, &state.ring, &state.current_name)
    }

    fn jump_to_resolved(&mut self, resolved: Resolved) -> Result<(), RingError> {
        let frame = self.host.selected_frame();
        match resolved {
            Resolved::Current => {
                trace!("already on the requested layout");
                Ok(())
            }
            Resolved::Offset(offset) => {
                let outgoing = self.save_current(&frame);
                self.rotate_in(&frame, offset, Some((outgoing, Deposit::Front)))
            }
        }
    }

    fn push_current(&mut self, name: Option<&str>, reset: bool) -> Result<(), RingError> {
        let frame = self.host.selected_frame();
        let name = self.claim_name(&frame, name, true)?;

        let outgoing = self.save_current(&frame);
        if reset {
            self.host.reset_to_default_view(&self.settings.default_content);
        }
        if let Some(evicted) = self.frames.ring(&frame).insert_front(outgoing) {
            debug!(name = %evicted.name, "ring full, dropped oldest layout");
        }
        self.set_current_name(&frame, name);
        Ok(())
    }

    /// Validates `name` against the frame, or generates one when it is
    /// missing or empty.
    fn claim_name(
        &mut self,
        frame: &H::FrameId,
        name: Option<&str>,
        include_current: bool,
    ) -> Result<String, RingError> {
        match name.filter(|name| !name.is_empty()) {
            Some(name) => {
                let state = self.frames.get(frame);
                if include_current {
                    naming::validate_unique(name, state.names())?;
                } else {
                    naming::validate_unique(name, state.saved_names())?;
                }
                Ok(name.to_string())
            }
            None => Ok(self.frames.unused_name(frame)),
        }
    }

    fn save_current(&mut self, frame: &H::FrameId) -> Snapshot<H::Capture> {
        let capture = self.host.capture_layout();
        let cursor = self.host.cursor_position();
        let name = self.frames.get(frame).current_name.clone();
        Snapshot::new(name, capture, cursor)
    }

    /// Makes the snapshot at `offset` live, saving `outgoing` (if any) at the
    /// given end.
    fn rotate_in(
        &mut self,
        frame: &H::FrameId,
        offset: usize,
        outgoing: Option<(Snapshot<H::Capture>, Deposit)>,
    ) -> Result<(), RingError> {
        let state = self.frames.get(frame);
        self.host.restore_layout(&state.ring.peek_at(offset)?.capture)?;

        let incoming = state.ring.remove_at(offset)?;
        if let Some((snapshot, deposit)) = outgoing {
            // One slot was just freed, so nothing is evicted here.
            let evicted = match deposit {
                Deposit::Front => state.ring.insert_front(snapshot),
                Deposit::Back => state.ring.insert_back(snapshot),
            };
            debug_assert!(evicted.is_none());
        }
        debug!(from = %state.current_name, to = %incoming.name, offset, "rotated");

        self.host.set_cursor_position(incoming.cursor);
        self.set_current_name(frame, incoming.name);
        Ok(())
    }

    fn set_current_name(&mut self, frame: &H::FrameId, name: String) {
        if self.settings.show_names_in_status {
            self.host.notify_name_changed(&name);
        }
        self.frames.get(frame).current_name = name;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;
    use crate::common::config::DefaultContent;
    use crate::host::sim::SimHost;

    fn controller(capacity: usize) -> SnapshotController<SimHost> {
        let settings = Settings {
            ring_capacity: capacity,
            ..Settings::default()
        };
        SnapshotController::new(SimHost::new(), settings)
    }

    /// Live layout named `current`, saved layouts front to back. Each layout
    /// shows a pane named after it.
    fn with_layouts(capacity: usize, current: &str, saved: &[&str]) -> SnapshotController<SimHost> {
        let mut oldest_first: Vec<&str> = saved.iter().rev().copied().collect();
        oldest_first.push(current);

        let mut c = controller(capacity);
        c.rename(oldest_first[0]).unwrap();
        c.host_mut().open(format!("{}.rs", oldest_first[0]));
        for name in &oldest_first[1..] {
            c.create(Some(name)).unwrap();
            c.host_mut().open(format!("{name}.rs"));
        }
        c
    }

    fn state(c: &mut SnapshotController<SimHost>) -> (String, Vec<String>) {
        let summary = c.summary();
        (summary.current, summary.saved)
    }

    fn strings(names: &[&str]) -> Vec<String> { names.iter().map(|n| n.to_string()).collect() }

    #[test]
    fn layout_builder_matches_request() {
        let mut c = with_layouts(5, "d", &["c", "b", "a"]);
        assert_eq!(state(&mut c), ("d".to_string(), strings(&["c", "b", "a"])));
        assert_eq!(c.host().panes(), ["*scratch*", "d.rs"]);

        let mut c = with_layouts(5, "solo", &[]);
        assert_eq!(state(&mut c), ("solo".to_string(), vec![]));
    }

    #[test]
    fn fresh_frame_starts_with_default_name() {
        let mut c = controller(7);
        assert_eq!(c.current_name(), "default");
        assert_eq!(c.ring_len(), 0);
        assert_eq!(c.summary().capacity, 7);
    }

    #[test]
    fn create_evicts_oldest_at_capacity() {
        let mut c = controller(2);
        c.rename("A").unwrap();

        c.create(Some("B")).unwrap();
        assert_eq!(state(&mut c), ("B".to_string(), strings(&["A"])));

        c.create(Some("C")).unwrap();
        assert_eq!(state(&mut c), ("C".to_string(), strings(&["B", "A"])));

        c.create(Some("D")).unwrap();
        assert_eq!(state(&mut c), ("D".to_string(), strings(&["C", "B"])));

        for _ in 0..5 {
            c.create(None).unwrap();
            assert!(c.ring_len() <= 2);
        }
    }

    #[test]
    fn create_resets_view_and_duplicate_keeps_it() {
        let mut c = controller(3);
        c.host_mut().open("main.rs");

        c.duplicate(Some("copy")).unwrap();
        assert_eq!(c.host().panes(), ["*scratch*", "main.rs"]);

        c.create(Some("fresh")).unwrap();
        assert_eq!(c.host().panes(), ["*scratch*"]);
        assert_eq!(state(&mut c), ("fresh".to_string(), strings(&["copy", "default"])));

        c.next().unwrap();
        assert_eq!(c.current_name(), "copy");
        assert_eq!(c.host().panes(), ["*scratch*", "main.rs"]);
    }

    #[test]
    fn create_honours_currently_shown_default() {
        let settings = Settings {
            default_content: DefaultContent::CurrentlyShown,
            ..Settings::default()
        };
        let mut c = SnapshotController::new(SimHost::new(), settings);
        c.host_mut().open("main.rs");
        c.create(None).unwrap();
        assert_eq!(c.host().panes(), ["*scratch*"]);

        let settings = Settings {
            default_content: DefaultContent::Buffer("notes.md".into()),
            ..Settings::default()
        };
        let mut c = SnapshotController::new(SimHost::new(), settings);
        c.create(None).unwrap();
        assert_eq!(c.host().panes(), ["notes.md"]);
    }

    #[test]
    fn generated_names_follow_counter() {
        let mut c = controller(7);
        c.create(None).unwrap();
        c.duplicate(Some("")).unwrap();
        assert_eq!(state(&mut c), ("002".to_string(), strings(&["001", "default"])));
    }

    #[test]
    fn generated_names_skip_user_names() {
        let mut c = controller(7);
        c.create(Some("001")).unwrap();
        c.create(None).unwrap();
        assert_eq!(state(&mut c), ("002".to_string(), strings(&["001", "default"])));
    }

    #[test]
    fn next_then_previous_is_identity() {
        let mut c = with_layouts(5, "d", &["c", "b", "a"]);
        let before = state(&mut c);
        let panes = c.host().panes().to_vec();

        c.next().unwrap();
        assert_eq!(state(&mut c), ("c".to_string(), strings(&["b", "a", "d"])));
        assert_eq!(c.host().panes(), ["*scratch*", "c.rs"]);
        c.previous().unwrap();
        assert_eq!(state(&mut c), before);
        assert_eq!(c.host().panes(), panes);

        c.previous().unwrap();
        assert_eq!(state(&mut c), ("a".to_string(), strings(&["d", "c", "b"])));
        c.next().unwrap();
        assert_eq!(state(&mut c), before);
    }

    #[test]
    fn next_cycles_through_every_layout() {
        let mut c = with_layouts(5, "d", &["c", "b", "a"]);
        let mut seen = vec![];
        for _ in 0..4 {
            c.next().unwrap();
            seen.push(c.current_name().to_string());
        }
        assert_eq!(seen, strings(&["c", "b", "a", "d"]));
        assert_eq!(state(&mut c), ("d".to_string(), strings(&["c", "b", "a"])));
    }

    #[test]
    fn rotation_restores_cursor() {
        let mut c = controller(3);
        c.host_mut().set_cursor_position(42);
        c.duplicate(Some("other")).unwrap();
        c.host_mut().set_cursor_position(7);

        c.next().unwrap();
        assert_eq!(c.host().cursor_position(), 42);
        c.previous().unwrap();
        assert_eq!(c.host().cursor_position(), 7);
    }

    #[test]
    fn rotating_empty_ring_fails() {
        let mut c = controller(3);
        assert_eq!(c.next(), Err(RingError::RingEmpty));
        assert_eq!(c.previous(), Err(RingError::RingEmpty));
        assert_eq!(state(&mut c), ("default".to_string(), vec![]));
    }

    #[test]
    fn duplicate_names_are_rejected_without_side_effects() {
        let mut c = with_layouts(3, "c", &["b", "a"]);
        let before = state(&mut c);
        let panes = c.host().panes().to_vec();

        for name in ["a", "b", "c"] {
            assert_eq!(c.create(Some(name)), Err(RingError::NameCollision(name.to_string())));
            assert_eq!(c.duplicate(Some(name)), Err(RingError::NameCollision(name.to_string())));
        }
        assert_eq!(c.rename("a"), Err(RingError::NameCollision("a".to_string())));

        assert_eq!(state(&mut c), before);
        assert_eq!(c.host().panes(), panes);
    }

    #[test]
    fn rename_only_changes_current_name() {
        let mut c = with_layouts(3, "c", &["b", "a"]);
        c.rename("c").unwrap();
        c.rename("z").unwrap();
        assert_eq!(state(&mut c), ("z".to_string(), strings(&["b", "a"])));
        assert_eq!(c.host().panes(), ["*scratch*", "c.rs"]);
    }

    #[test]
    fn deleting_current_rotates_in_most_recent() {
        let mut c = with_layouts(3, "Y", &["X"]);

        c.delete("Y").unwrap();
        assert_eq!(state(&mut c), ("X".to_string(), vec![]));
        assert_eq!(c.host().panes(), ["*scratch*", "X.rs"]);

        assert_eq!(c.delete("X"), Err(RingError::RingEmpty));
        assert_eq!(state(&mut c), ("X".to_string(), vec![]));
    }

    #[test]
    fn deleting_saved_layout_leaves_current_alone() {
        let mut c = with_layouts(3, "Y", &["X"]);
        c.delete("X").unwrap();
        assert_eq!(state(&mut c), ("Y".to_string(), vec![]));
        assert_eq!(c.host().panes(), ["*scratch*", "Y.rs"]);

        let mut c = with_layouts(4, "d", &["c", "b", "a"]);
        c.delete("b").unwrap();
        assert_eq!(state(&mut c), ("d".to_string(), strings(&["c", "a"])));

        assert_eq!(c.delete("zzz"), Err(RingError::NotFound("zzz".to_string())));
    }

    #[test]
    fn jump_to_unknown_name_duplicates() {
        let mut c = with_layouts(3, "Y", &["X"]);
        c.jump_to("Z").unwrap();
        assert_eq!(state(&mut c), ("Z".to_string(), strings(&["Y", "X"])));
        assert_eq!(c.host().panes(), ["*scratch*", "Y.rs"]);
    }

    #[test]
    fn jump_to_saved_layout() {
        let mut c = with_layouts(4, "d", &["c", "b", "a"]);
        c.jump_to("b").unwrap();
        assert_eq!(state(&mut c), ("b".to_string(), strings(&["d", "c", "a"])));
        assert_eq!(c.host().panes(), ["*scratch*", "b.rs"]);

        c.jump_to("b").unwrap();
        assert_eq!(state(&mut c), ("b".to_string(), strings(&["d", "c", "a"])));
    }

    #[test]
    fn jump_to_existing_does_not_create() {
        let mut c = with_layouts(3, "Y", &["X"]);
        assert_eq!(c.jump_to_existing("Z"), Err(RingError::NotFound("Z".to_string())));
        c.jump_to_existing("X").unwrap();
        assert_eq!(state(&mut c), ("X".to_string(), strings(&["Y"])));
    }

    #[test]
    fn rejected_restore_leaves_frame_untouched() {
        let mut c = with_layouts(4, "c", &["b", "a"]);
        let before = state(&mut c);
        c.host_mut().invalidate_captures();

        assert!(matches!(c.next(), Err(RingError::InvalidCapture(_))));
        assert!(matches!(c.previous(), Err(RingError::InvalidCapture(_))));
        assert!(matches!(c.jump_to("a"), Err(RingError::InvalidCapture(_))));
        assert!(matches!(c.delete("c"), Err(RingError::InvalidCapture(_))));

        assert_eq!(state(&mut c), before);
        assert_eq!(c.host().panes(), ["*scratch*", "c.rs"]);
    }

    #[test]
    fn frames_are_independent() {
        let mut c = with_layouts(3, "Y", &["X"]);

        c.host_mut().select_frame(1);
        assert_eq!(c.ring_len(), 0);
        c.rename("X").unwrap();
        c.create(Some("Y")).unwrap();
        c.create(Some("W")).unwrap();
        assert_eq!(state(&mut c), ("W".to_string(), strings(&["Y", "X"])));

        c.host_mut().select_frame(0);
        assert_eq!(state(&mut c), ("Y".to_string(), strings(&["X"])));
        c.next().unwrap();
        assert_eq!(c.host().panes(), ["*scratch*", "X.rs"]);
    }

    #[test]
    fn status_names_follow_setting() {
        let mut c = controller(3);
        c.create(Some("one")).unwrap();
        c.next().unwrap();
        assert_eq!(c.host().announced(), strings(&["one", "default"]));
        assert_eq!(c.status_label(), Some("<default>".to_string()));

        let settings = Settings {
            show_names_in_status: false,
            ..Settings::default()
        };
        let mut c = SnapshotController::new(SimHost::new(), settings);
        c.create(Some("one")).unwrap();
        assert!(c.host().announced().is_empty());
        assert_eq!(c.status_label(), None);
    }

    #[test]
    fn names_never_repeat_within_frame() {
        let mut c = controller(3);
        let script: &[(&str, Option<&str>)] = &[
            ("create", Some("a")),
            ("create", None),
            ("duplicate", Some("a")),
            ("rename", Some("default")),
            ("duplicate", None),
            ("create", Some("b")),
            ("rename", Some("b")),
            ("next", None),
            ("create", Some("a")),
            ("jump", Some("c")),
            ("previous", None),
            ("rename", Some("")),
        ];
        for (op, name) in script {
            let _ = match *op {
                "create" => c.create(*name),
                "duplicate" => c.duplicate(*name),
                "rename" => c.rename(name.unwrap_or_default()),
                "jump" => c.jump_to(name.unwrap_or_default()),
                "next" => c.next(),
                _ => c.previous(),
            };
            let names = c.names();
            let unique: HashSet<_> = names.iter().collect();
            assert_eq!(unique.len(), names.len(), "duplicate name after {op}: {names:?}");
            assert!(c.ring_len() <= 3);
        }
    }
}
