//! Layout of process graphs.
//!
//! The only engine is the one-sided force simulation in [`force`]. Callers
//! describe which nodes must not move, and which nodes sit on a fixed
//! horizontal coordinate, through [`Constraints`].

pub mod force;

use std::collections::{HashMap, HashSet};

use valnet_core::identifier::Id;

pub use force::{Engine, LayoutError};

/// Per-node restrictions honored by the force engine.
///
/// Entries naming nodes that are not part of a layout run are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    pinned: HashSet<Id>,
    fixed_x: HashMap<Id, f32>,
}

impl Constraints {
    /// Excludes `id` from every force update. A pinned node still pushes
    /// and pulls the others.
    pub fn pin(&mut self, id: Id) -> &mut Self {
        self.pinned.insert(id);
        self
    }

    /// Forces the horizontal coordinate of `id` to `x` after every pass.
    pub fn fix_x(&mut self, id: Id, x: f32) -> &mut Self {
        self.fixed_x.insert(id, x);
        self
    }

    pub fn is_pinned(&self, id: Id) -> bool {
        self.pinned.contains(&id)
    }

    pub fn fixed_x(&self, id: Id) -> Option<f32> {
        self.fixed_x.get(&id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.pinned.is_empty() && self.fixed_x.is_empty()
    }
}
