//! Single-pass constraint resolution for one control
//!
//! Constraints are applied in registration order. Each one computes a
//! candidate coordinate from its anchor (or the viewport) and either moves
//! the control or, when the opposite directional edge is bound too, stretches
//! it. Resolution never fails: missing anchors are skipped and cyclic anchors
//! simply read whatever geometry they had.

use log::{trace, warn};

use super::constraint::Constraint;
use super::control::{Control, ControlId};
use super::edge::{ConstraintCategory, Edge};
use super::error::LayoutError;
use super::tree::ControlTree;
use super::types::{Axis, Vec2};

/// The anchor rectangle a constraint measures from
#[derive(Debug, Clone, Copy, PartialEq)]
struct Pivot {
    base: Vec2,
    extent: Vec2,
    /// Unscaled anchor size, added back when stretching to a hidden anchor
    raw_size: Vec2,
    visible: bool,
}

impl Pivot {
    fn viewport(size: Vec2) -> Self {
        Self {
            base: Vec2::ZERO,
            extent: size,
            raw_size: size,
            visible: true,
        }
    }

    fn anchor(anchor: &Control, parent: Option<ControlId>) -> Self {
        let extent = if anchor.visible {
            anchor.scaled_size().max(anchor.minimum_size.mul_elem(anchor.scale))
        } else {
            Vec2::ZERO
        };
        // Siblings (and pairs of roots) measure from the anchor's position;
        // anything else is taken relative to the control's own origin space.
        let mut base = if anchor.parent() == parent {
            anchor.position
        } else {
            Vec2::ZERO
        };
        base -= anchor.normalized_origin.mul_elem(anchor.scaled_size() - anchor.size);

        Self {
            base,
            extent,
            raw_size: anchor.size,
            visible: anchor.visible,
        }
    }

    /// Coordinate of `edge` on this pivot, offset by `distance`
    fn candidate(&self, edge: Edge, distance: f64) -> Option<(Axis, f64)> {
        let axis = edge.axis()?;
        let base = self.base.get(axis);
        let extent = self.extent.get(axis);
        let value = match edge {
            Edge::LEFT | Edge::TOP => base + distance,
            Edge::RIGHT | Edge::BOTTOM => base + extent - distance,
            _ => base + extent / 2.0 + distance,
        };
        Some((axis, value))
    }
}

impl ControlTree {
    /// Apply the control's constraints admitted by `category`.
    ///
    /// Does nothing while the control is suspended. Afterwards the size is
    /// clamped to the minimum size and the control's own draw position is
    /// recomputed.
    pub fn enforce(&mut self, id: ControlId, category: ConstraintCategory) -> Result<(), LayoutError> {
        let control = self.get(id)?;
        if control.suspended {
            return Ok(());
        }
        let parent = control.parent();
        let admitted: Vec<Constraint> = control
            .constraints
            .iter()
            .filter(|c| category.admits(c.category()))
            .copied()
            .collect();

        for constraint in &admitted {
            let pivot = match constraint.anchor() {
                None => Pivot::viewport(self.viewport_size()),
                Some(anchor_id) => match self.control(anchor_id) {
                    Some(anchor) => Pivot::anchor(anchor, parent),
                    None => {
                        warn!(
                            "'{}': skipping {} constraint on destroyed anchor {}",
                            self.name(id),
                            constraint.control_edge(),
                            anchor_id
                        );
                        continue;
                    }
                },
            };
            let control = self.get_mut(id)?;
            apply(control, constraint, &pivot);
            trace!(
                "'{}' {} -> position {} size {}",
                control.name,
                constraint.control_edge(),
                control.position,
                control.size
            );
        }

        let control = self.get_mut(id)?;
        if !control.minimum_size.is_zero() {
            control.size = control.size.max(control.minimum_size);
            control.invalidate();
        }
        self.update_draw_position(id)
    }

    /// Length a stretched axis gets from its leading and trailing
    /// constraints, before the minimum size is applied. `None` when the axis
    /// is not stretched or an anchor is gone.
    pub fn stretched_span(&self, id: ControlId, axis: Axis) -> Option<f64> {
        let control = self.control(id)?;
        let parent = control.parent();
        let (leading, trailing) = match axis {
            Axis::Horizontal => (Edge::LEFT, Edge::RIGHT),
            Axis::Vertical => (Edge::TOP, Edge::BOTTOM),
        };

        let candidate_for = |edge: Edge| -> Option<(f64, Pivot)> {
            let constraint = control.constraints.iter().find(|c| c.control_edge() == edge)?;
            let pivot = match constraint.anchor() {
                None => Pivot::viewport(self.viewport_size()),
                Some(anchor) => Pivot::anchor(self.control(anchor)?, parent),
            };
            let (_, value) = pivot.candidate(constraint.anchor_edge(), constraint.distance())?;
            Some((value, pivot))
        };

        let (start, _) = candidate_for(leading)?;
        let (end, pivot) = candidate_for(trailing)?;
        let mut span = end - start;
        if !pivot.visible {
            span += pivot.raw_size.get(axis);
        }
        Some(span)
    }
}

fn apply(control: &mut Control, constraint: &Constraint, pivot: &Pivot) {
    let edge = constraint.control_edge();
    let Some((axis, candidate)) = pivot.candidate(constraint.anchor_edge(), constraint.distance()) else {
        return;
    };

    let size = control.size.get(axis);
    let minimum = control.minimum_size.get(axis);

    if !control.constraints.anchored_opposite(edge) {
        let position = match edge {
            Edge::LEFT | Edge::TOP => candidate,
            Edge::RIGHT | Edge::BOTTOM => candidate - size.max(minimum),
            _ => candidate - (size / 2.0).max(minimum / 2.0),
        };
        *control.position.get_mut(axis) = position;
    } else {
        let position = control.position.get(axis);
        match edge {
            Edge::LEFT | Edge::TOP => {
                *control.size.get_mut(axis) += position - candidate;
                *control.position.get_mut(axis) = candidate;
            }
            _ => {
                let mut stretched = candidate - position;
                if !pivot.visible {
                    stretched += pivot.raw_size.get(axis);
                }
                *control.size.get_mut(axis) = stretched;
            }
        }
    }
    control.invalidate();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::control::KindTag;

    const TOLERANCE: f64 = 0.001;

    fn assert_approx(actual: Vec2, expected: Vec2) {
        assert!(
            (actual.x - expected.x).abs() < TOLERANCE && (actual.y - expected.y).abs() < TOLERANCE,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    fn setup() -> (ControlTree, ControlId) {
        let mut tree = ControlTree::new(Vec2::new(800.0, 600.0));
        let control = tree.create("c", KindTag::Control);
        tree.get_mut(control).unwrap().size = Vec2::new(100.0, 50.0);
        (tree, control)
    }

    fn bind(tree: &mut ControlTree, id: ControlId, edge: Edge, anchor: Option<ControlId>, anchor_edge: Edge, distance: f64) {
        tree.add_constraint(id, edge, anchor, anchor_edge, distance, ConstraintCategory::ALL)
            .unwrap();
    }

    #[test]
    fn test_viewport_corners() {
        let (mut tree, c) = setup();
        bind(&mut tree, c, Edge::BOTTOM_RIGHT, None, Edge::BOTTOM_RIGHT, 10.0);
        tree.enforce(c, ConstraintCategory::ALL).unwrap();
        assert_approx(tree.get(c).unwrap().position(), Vec2::new(690.0, 540.0));
    }

    #[test]
    fn test_center_on_viewport() {
        let (mut tree, c) = setup();
        bind(&mut tree, c, Edge::CENTER_XY, None, Edge::CENTER_XY, 0.0);
        tree.enforce(c, ConstraintCategory::ALL).unwrap();
        assert_approx(tree.get(c).unwrap().position(), Vec2::new(350.0, 275.0));
    }

    #[test]
    fn test_minimum_size_in_trailing_edge() {
        let (mut tree, c) = setup();
        tree.get_mut(c).unwrap().minimum_size = Vec2::new(150.0, 0.0);
        bind(&mut tree, c, Edge::RIGHT, None, Edge::RIGHT, 0.0);
        tree.enforce(c, ConstraintCategory::ALL).unwrap();
        let control = tree.get(c).unwrap();
        assert_approx(control.position(), Vec2::new(650.0, 0.0));
        // Size is clamped up to the minimum afterwards
        assert_approx(control.size(), Vec2::new(150.0, 50.0));
    }

    #[test]
    fn test_sibling_anchor_uses_position() {
        let (mut tree, c) = setup();
        let sibling = tree.create("s", KindTag::Control);
        {
            let s = tree.get_mut(sibling).unwrap();
            s.position = Vec2::new(200.0, 100.0);
            s.size = Vec2::new(40.0, 40.0);
        }
        bind(&mut tree, c, Edge::LEFT, Some(sibling), Edge::RIGHT, -5.0);
        tree.enforce(c, ConstraintCategory::ALL).unwrap();
        assert_approx(tree.get(c).unwrap().position(), Vec2::new(245.0, 0.0));
    }

    #[test]
    fn test_scaled_anchor_extent() {
        let (mut tree, c) = setup();
        let anchor = tree.create("a", KindTag::Control);
        {
            let a = tree.get_mut(anchor).unwrap();
            a.size = Vec2::new(100.0, 100.0);
            a.scale = Vec2::splat(2.0);
        }
        bind(&mut tree, c, Edge::LEFT, Some(anchor), Edge::RIGHT, 0.0);
        tree.enforce(c, ConstraintCategory::ALL).unwrap();
        // Scaled around the center: base shifts by -50, extent is 200
        assert_approx(tree.get(c).unwrap().position(), Vec2::new(150.0, 0.0));
    }

    #[test]
    fn test_hidden_anchor_has_no_extent() {
        let (mut tree, c) = setup();
        let anchor = tree.create("a", KindTag::Control);
        {
            let a = tree.get_mut(anchor).unwrap();
            a.position = Vec2::new(300.0, 0.0);
            a.visible = false;
        }
        bind(&mut tree, c, Edge::LEFT, Some(anchor), Edge::RIGHT, 0.0);
        tree.enforce(c, ConstraintCategory::ALL).unwrap();
        assert_approx(tree.get(c).unwrap().position(), Vec2::new(300.0, 0.0));
    }

    #[test]
    fn test_destroyed_anchor_is_skipped() {
        let (mut tree, c) = setup();
        let anchor = tree.create("a", KindTag::Control);
        bind(&mut tree, c, Edge::LEFT, Some(anchor), Edge::LEFT, 10.0);
        bind(&mut tree, c, Edge::TOP, None, Edge::TOP, 7.0);
        tree.destroy(anchor).unwrap();

        tree.enforce(c, ConstraintCategory::ALL).unwrap();
        assert_approx(tree.get(c).unwrap().position(), Vec2::new(0.0, 7.0));
    }

    #[test]
    fn test_stretched_span() {
        let (mut tree, c) = setup();
        bind(&mut tree, c, Edge::LEFT, None, Edge::LEFT, 10.0);
        assert_eq!(tree.stretched_span(c, Axis::Horizontal), None);
        bind(&mut tree, c, Edge::RIGHT, None, Edge::RIGHT, 30.0);
        assert_eq!(tree.stretched_span(c, Axis::Horizontal), Some(760.0));
        assert_eq!(tree.stretched_span(c, Axis::Vertical), None);
    }

    #[test]
    fn test_suspended_is_noop() {
        let (mut tree, c) = setup();
        bind(&mut tree, c, Edge::LEFT, None, Edge::LEFT, 10.0);
        tree.get_mut(c).unwrap().suspended = true;
        tree.enforce(c, ConstraintCategory::ALL).unwrap();
        assert_approx(tree.get(c).unwrap().position(), Vec2::ZERO);
    }
}
