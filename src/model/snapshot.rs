/// A saved, restorable layout. `capture` is whatever the host handed back
/// from `capture_layout`; the cursor is kept separately because captures do
/// not carry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<C> {
    pub name: String,
    pub capture: C,
    pub cursor: usize,
}

impl<C> Snapshot<C> {
    pub fn new(name: String, capture: C, cursor: usize) -> Self { Self { name, capture, cursor } }
}
