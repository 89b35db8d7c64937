//! Host-supplied viewport size
//!
//! Constraints without an anchor resolve against the viewport rectangle
//! `(0, 0, size)`. The size is read on every layout pass and never written
//! by the engine; after a resize the host re-runs layout.

use std::cell::Cell;
use std::rc::Rc;

use super::types::Vec2;

/// Source of the current viewport size
pub trait Viewport {
    fn size(&self) -> Vec2;
}

impl Viewport for Vec2 {
    fn size(&self) -> Vec2 {
        *self
    }
}

/// A viewport whose size the host can change after handing it to a tree
#[derive(Debug, Clone, Default)]
pub struct SharedViewport(Rc<Cell<Vec2>>);

impl SharedViewport {
    pub fn new(size: Vec2) -> Self {
        Self(Rc::new(Cell::new(size)))
    }

    pub fn set(&self, size: Vec2) {
        self.0.set(size);
    }
}

impl Viewport for SharedViewport {
    fn size(&self) -> Vec2 {
        self.0.get()
    }
}
