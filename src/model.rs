pub mod naming;
pub mod registry;
pub mod ring;
pub mod snapshot;

pub use naming::{NameGenerator, Resolved};
pub use registry::{Frame, FrameRegistry};
pub use ring::Ring;
pub use snapshot::Snapshot;
