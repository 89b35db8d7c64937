//! Edge constraints and per-control constraint sets
//!
//! Every layout declaration passes through [`ConstraintSet::add`], which
//! splits composite edges and validates the result before anything is
//! stored. Constraints keep their registration order: the resolver applies
//! them in that order and trailing-edge stretches read the position written
//! by the leading edge earlier in the same pass.

use super::control::ControlId;
use super::edge::{ConstraintCategory, Edge};
use super::error::ConstraintError;

/// A rule binding one atomic control edge to one atomic anchor edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    control_edge: Edge,
    anchor: Option<ControlId>,
    anchor_edge: Edge,
    distance: f64,
    category: ConstraintCategory,
}

impl Constraint {
    fn new(
        control_edge: Edge,
        anchor: Option<ControlId>,
        anchor_edge: Edge,
        distance: f64,
        category: ConstraintCategory,
    ) -> Self {
        Self {
            control_edge,
            anchor,
            anchor_edge,
            distance,
            category,
        }
    }

    pub fn control_edge(&self) -> Edge {
        self.control_edge
    }

    /// Anchoring control; `None` anchors to the viewport
    pub fn anchor(&self) -> Option<ControlId> {
        self.anchor
    }

    pub fn anchor_edge(&self) -> Edge {
        self.anchor_edge
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn category(&self) -> ConstraintCategory {
        self.category
    }
}

/// The ordered constraints owned by one control
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constraint for the control `owner`.
    ///
    /// Composite edges are decomposed and paired index by index, so
    /// `BOTTOM_RIGHT` bound to `BOTTOM_RIGHT` adds a Right and a Bottom
    /// constraint sharing the anchor, distance and category. Returns the
    /// number of atomic constraints added.
    pub fn add(
        &mut self,
        owner: ControlId,
        control_edge: Edge,
        anchor: Option<ControlId>,
        anchor_edge: Edge,
        distance: f64,
        category: ConstraintCategory,
    ) -> Result<usize, ConstraintError> {
        if anchor == Some(owner) {
            return Err(ConstraintError::SelfAnchor { control: owner });
        }

        let control_edges = control_edge.decompose();
        let anchor_edges = anchor_edge.decompose();
        if control_edges.len() != anchor_edges.len() {
            return Err(ConstraintError::EdgeCountMismatch {
                control_edge,
                anchor_edge,
                control_count: control_edges.len(),
                anchor_count: anchor_edges.len(),
            });
        }
        if control_edges.is_empty() {
            return Err(ConstraintError::EmptyEdge);
        }

        let mut pending: Vec<Constraint> = Vec::with_capacity(control_edges.len());
        for (&c_edge, &a_edge) in control_edges.iter().zip(&anchor_edges) {
            if !c_edge.on_same_axis(a_edge) {
                return Err(ConstraintError::AxisMismatch {
                    control_edge: c_edge,
                    anchor_edge: a_edge,
                });
            }

            let bound = self
                .constraints
                .iter()
                .chain(&pending)
                .map(|c| c.control_edge);
            check_binding(bound, c_edge)?;

            pending.push(Constraint::new(c_edge, anchor, a_edge, distance, category));
        }

        let added = pending.len();
        self.constraints.extend(pending);
        Ok(added)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Constraint> {
        self.constraints.iter()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Constraint> {
        self.constraints.get(index)
    }

    pub fn clear(&mut self) {
        self.constraints.clear();
    }

    /// Whether an atomic control edge is bound
    pub fn contains_edge(&self, edge: Edge) -> bool {
        self.constraints.iter().any(|c| c.control_edge == edge)
    }

    /// Whether the directional edge opposite `edge` is bound as well.
    ///
    /// A control bound on both Left and Right (or Top and Bottom) is stretched
    /// along that axis. Center edges have no opposite and never stretch.
    pub fn anchored_opposite(&self, edge: Edge) -> bool {
        edge.opposite()
            .map(|opposite| self.contains_edge(opposite))
            .unwrap_or(false)
    }

    /// Sum of the distances of constraints on `edge`, used as content margins
    pub fn edge_distance(&self, edge: Edge) -> f64 {
        self.constraints
            .iter()
            .filter(|c| c.control_edge.intersects(edge))
            .map(|c| c.distance)
            .sum()
    }

    /// Distinct anchoring controls, in registration order
    pub fn anchors(&self) -> Vec<ControlId> {
        let mut anchors = Vec::new();
        for id in self.constraints.iter().filter_map(|c| c.anchor) {
            if !anchors.contains(&id) {
                anchors.push(id);
            }
        }
        anchors
    }
}

impl<'a> IntoIterator for &'a ConstraintSet {
    type Item = &'a Constraint;
    type IntoIter = std::slice::Iter<'a, Constraint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Reject `edge` if it is already bound, or if its axis already carries the
/// complementary center/directional edge (e.g. Top together with CenterY).
fn check_binding(
    bound: impl Iterator<Item = Edge>,
    edge: Edge,
) -> Result<(), ConstraintError> {
    for existing in bound {
        if existing == edge {
            return Err(ConstraintError::DuplicateEdge { edge });
        }
        if edge.on_same_axis(existing) && edge.is_center() != existing.is_center() {
            return Err(ConstraintError::AxisConflict { edge, existing });
        }
    }
    Ok(())
}
