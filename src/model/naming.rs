use crate::error::RingError;
use crate::model::{Ring, Snapshot};

const FIRST_NAME: &str = "default";
const NUMBER_WIDTH: usize = 3;

/// Where a name points within one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    /// The live layout, which is not stored in the ring.
    Current,
    Offset(usize),
}

/// Hands out default names: `"default"` first, then `"001"`, `"002"`, ...
/// Numbers are never handed out twice.
#[derive(Debug, Default)]
pub struct NameGenerator {
    issued: u64,
}

impl NameGenerator {
    pub fn new() -> Self { Self::default() }

    pub fn generate(&mut self) -> String {
        let n = self.issued;
        self.issued += 1;
        if n == 0 {
            return FIRST_NAME.to_string();
        }
        format!("{n:0width$}", width = NUMBER_WIDTH)
    }

    /// Draws names until one is not in `taken`.
    pub fn generate_unused<'a>(&mut self, taken: impl Iterator<Item = &'a str> + Clone) -> String {
        loop {
            let name = self.generate();
            if !taken.clone().any(|existing| existing == name) {
                return name;
            }
        }
    }
}

pub fn validate_unique<'a>(
    name: &str,
    mut existing: impl Iterator<Item = &'a str>,
) -> Result<(), RingError> {
    if existing.any(|existing| existing == name) {
        Err(RingError::NameCollision(name.to_string()))
    } else {
        Ok(())
    }
}

pub fn resolve<C>(
    name: &str,
    ring: &Ring<Snapshot<C>>,
    current_name: &str,
) -> Result<Resolved, RingError> {
    if name == current_name {
        return Ok(Resolved::Current);
    }
    ring.position(|snapshot| snapshot.name == name)
        .map(Resolved::Offset)
        .ok_or_else(|| RingError::NotFound(name.to_string()))
}
