use std::collections::vec_deque;
use std::fmt::Debug;
use std::hash::Hash;
use std::iter::{Chain, Map, Once};
use std::num::NonZeroUsize;

use tracing::debug;

use crate::common::collections::{HashMap, hash_map};
use crate::model::{NameGenerator, Ring, Snapshot};

type NameIter<'a, C> =
    Chain<Once<&'a str>, Map<vec_deque::Iter<'a, Snapshot<C>>, fn(&Snapshot<C>) -> &str>>;

/// Per-frame state: the saved snapshots and the name of the live layout.
#[derive(Debug)]
pub struct Frame<C> {
    pub ring: Ring<Snapshot<C>>,
    pub current_name: String,
}

impl<C> Frame<C> {
    fn new(capacity: NonZeroUsize, current_name: String) -> Self {
        Self {
            ring: Ring::new(capacity),
            current_name,
        }
    }

    /// Every name in use in this frame: the current one, then the ring front
    /// to back.
    pub fn names(&self) -> NameIter<'_, C> {
        let saved: fn(&Snapshot<C>) -> &str = |snapshot| snapshot.name.as_str();
        std::iter::once(self.current_name.as_str()).chain(self.ring.iter().map(saved))
    }

    pub fn saved_names(&self) -> impl Iterator<Item = &str> + Clone + '_ { self.names().skip(1) }
}

/// Owns one [`Frame`] per display context, created on first access.
///
/// The name generator lives here too: it is shared by every frame so a
/// generated name is never reused anywhere in the process.
#[derive(Debug)]
pub struct FrameRegistry<F, C> {
    frames: HashMap<F, Frame<C>>,
    names: NameGenerator,
    capacity: NonZeroUsize,
}

impl<F: Eq + Hash + Clone + Debug, C> FrameRegistry<F, C> {
    pub fn new(capacity: NonZeroUsize, names: NameGenerator) -> Self {
        Self {
            frames: HashMap::default(),
            names,
            capacity,
        }
    }

    pub fn get(&mut self, frame: &F) -> &mut Frame<C> {
        match self.frames.entry(frame.clone()) {
            hash_map::Entry::Occupied(entry) => entry.into_mut(),
            hash_map::Entry::Vacant(entry) => {
                let name = self.names.generate();
                debug!(?frame, %name, capacity = self.capacity.get(), "creating ring for frame");
                entry.insert(Frame::new(self.capacity, name))
            }
        }
    }

    pub fn ring(&mut self, frame: &F) -> &mut Ring<Snapshot<C>> { &mut self.get(frame).ring }

    pub fn contains(&self, frame: &F) -> bool { self.frames.contains_key(frame) }

    /// A generated name that is not in use in `frame`.
    pub fn unused_name(&mut self, frame: &F) -> String {
        self.get(frame);
        let Self { frames, names, .. } = self;
        match frames.get(frame) {
            Some(state) => names.generate_unused(state.names()),
            None => names.generate(),
        }
    }
}
