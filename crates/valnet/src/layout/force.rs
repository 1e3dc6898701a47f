//! One-sided force-directed layout
//!
//! Each iteration runs two passes over an insertion-ordered position table:
//!
//! 1. **Repulsion**: for every ordered pair `(i, j)` with `i != j`, node `j`
//!    is pushed away from node `i` by a step of length `repulsion_constant`.
//! 2. **Attraction**: for every edge `(a, b)`, node `b` is pulled toward
//!    node `a` by a step of length `attraction_constant`.
//!
//! Both passes update positions in place, so later pairs observe the moves
//! made by earlier ones. Distances are measured on the enabled axes only.
//! Coincident pairs (zero distance on the enabled axes) are skipped.
//!
//! After both passes every fixed-X node has its horizontal coordinate forced
//! back to its fixed value. Pinned nodes never move but still act on others.

use indexmap::IndexMap;
use log::{debug, trace};
use thiserror::Error;

use valnet_core::{
    geometry::{Axes, Point},
    identifier::Id,
};

use crate::{layout::Constraints, shell::NodePositions};

/// Default step length of the repulsion pass.
pub const DEFAULT_REPULSION: f32 = 0.5;
/// Default step length of the attraction pass.
pub const DEFAULT_ATTRACTION: f32 = 0.5;

/// Errors that stop a layout run before any position is written.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("edge #{edge} ({from} -> {to}) references unknown node `{missing}`")]
    UnknownNode {
        edge: usize,
        from: Id,
        to: Id,
        missing: Id,
    },
}

/// Force layout engine for process graphs.
#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    repulsion_constant: f32,
    attraction_constant: f32,
}

impl Engine {
    /// Create a new engine with the default constants.
    pub fn new() -> Self {
        Self {
            repulsion_constant: DEFAULT_REPULSION,
            attraction_constant: DEFAULT_ATTRACTION,
        }
    }

    /// Set the step length used when pushing nodes apart
    pub fn set_repulsion_constant(&mut self, constant: f32) -> &mut Self {
        self.repulsion_constant = constant;
        self
    }

    /// Set the step length used when pulling an edge target toward its source
    pub fn set_attraction_constant(&mut self, constant: f32) -> &mut Self {
        self.attraction_constant = constant;
        self
    }

    pub fn repulsion_constant(&self) -> f32 {
        self.repulsion_constant
    }

    pub fn attraction_constant(&self) -> f32 {
        self.attraction_constant
    }

    /// Lays out `nodes` without constraints and returns the new positions.
    ///
    /// The input table is left untouched. The returned map has the same keys
    /// in the same order.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexmap::IndexMap;
    /// use valnet::layout::Engine;
    /// use valnet_core::{geometry::{Axes, Point}, identifier::Id};
    ///
    /// let (a, b) = (Id::new("A"), Id::new("B"));
    /// let mut nodes = IndexMap::new();
    /// nodes.insert(a, Point::new(0.0, 0.0));
    /// nodes.insert(b, Point::new(10.0, 0.0));
    ///
    /// let result = Engine::new().layout(&nodes, &[(a, b)], Axes::X, 1).unwrap();
    /// assert!((result[&a].x() + 0.5).abs() < 1e-4);
    /// assert!((result[&b].x() - 10.0).abs() < 1e-4);
    /// assert_eq!(result[&b].y(), 0.0);
    /// ```
    pub fn layout(
        &self,
        nodes: &IndexMap<Id, Point>,
        edges: &[(Id, Id)],
        axes: Axes,
        iterations: usize,
    ) -> Result<IndexMap<Id, Point>, LayoutError> {
        self.layout_constrained(nodes, edges, axes, iterations, &Constraints::default())
    }

    /// Lays out `nodes` honoring pinned and fixed-X constraints.
    ///
    /// Edges are validated before any computation. With zero iterations or an
    /// empty axis mask the input positions are returned unchanged.
    pub fn layout_constrained(
        &self,
        nodes: &IndexMap<Id, Point>,
        edges: &[(Id, Id)],
        axes: Axes,
        iterations: usize,
        constraints: &Constraints,
    ) -> Result<IndexMap<Id, Point>, LayoutError> {
        let resolved = resolve_edges(nodes, edges)?;

        if iterations == 0 || axes.is_none() || nodes.is_empty() {
            debug!(
                node_count = nodes.len(),
                iterations,
                axes_none = axes.is_none();
                "Force layout has nothing to do"
            );
            return Ok(nodes.clone());
        }

        debug!(
            node_count = nodes.len(),
            edge_count = edges.len(),
            iterations,
            affect_x = axes.affects_x(),
            affect_y = axes.affects_y();
            "Running force layout"
        );

        let mut positions: Vec<Point> = nodes.values().copied().collect();
        let pinned: Vec<bool> = nodes.keys().map(|id| constraints.is_pinned(*id)).collect();
        let fixed_x: Vec<(usize, f32)> = nodes
            .keys()
            .enumerate()
            .filter_map(|(idx, id)| constraints.fixed_x(*id).map(|x| (idx, x)))
            .collect();

        for iteration in 0..iterations {
            self.repulsion_pass(&mut positions, &pinned, axes);
            self.attraction_pass(&mut positions, &resolved, &pinned, axes);
            for &(idx, x) in &fixed_x {
                positions[idx] = positions[idx].with_x(x);
            }
            trace!(iteration; "Force layout iteration complete");
        }

        Ok(nodes.keys().copied().zip(positions).collect())
    }

    /// Lays out a caller-owned position table in place.
    ///
    /// Positions are written back only when the whole run succeeds. On error
    /// the target is untouched.
    pub fn apply<P>(
        &self,
        target: &mut P,
        edges: &[(Id, Id)],
        axes: Axes,
        iterations: usize,
        constraints: &Constraints,
    ) -> Result<(), LayoutError>
    where
        P: NodePositions + ?Sized,
    {
        let snapshot: IndexMap<Id, Point> = target
            .node_ids()
            .into_iter()
            .filter_map(|id| target.position(id).map(|position| (id, position)))
            .collect();

        let result = self.layout_constrained(&snapshot, edges, axes, iterations, constraints)?;
        for (id, position) in result {
            target.set_position(id, position);
        }
        Ok(())
    }

    fn repulsion_pass(&self, positions: &mut [Point], pinned: &[bool], axes: Axes) {
        let len = positions.len();
        for i in 0..len {
            for j in 0..len {
                if i == j || pinned[j] {
                    continue;
                }
                let delta = axes.restrict(positions[i].sub_point(positions[j]));
                let distance = delta.hypot();
                if distance == 0.0 {
                    continue;
                }
                let step = delta.scale(self.repulsion_constant / distance);
                positions[j] = positions[j].sub_point(step);
            }
        }
    }

    fn attraction_pass(
        &self,
        positions: &mut [Point],
        edges: &[(usize, usize)],
        pinned: &[bool],
        axes: Axes,
    ) {
        for &(source, target) in edges {
            if pinned[target] {
                continue;
            }
            let delta = axes.restrict(positions[source].sub_point(positions[target]));
            let distance = delta.hypot();
            if distance == 0.0 {
                continue;
            }
            let step = delta.scale(self.attraction_constant / distance);
            positions[target] = positions[target].add_point(step);
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps edge endpoints to indices of `nodes`.
fn resolve_edges(
    nodes: &IndexMap<Id, Point>,
    edges: &[(Id, Id)],
) -> Result<Vec<(usize, usize)>, LayoutError> {
    edges
        .iter()
        .enumerate()
        .map(|(edge, &(from, to))| {
            let index_of = |id: Id| {
                nodes.get_index_of(&id).ok_or(LayoutError::UnknownNode {
                    edge,
                    from,
                    to,
                    missing: id,
                })
            };
            Ok((index_of(from)?, index_of(to)?))
        })
        .collect()
}
