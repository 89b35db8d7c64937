//! Lint engine for detecting layout defects in control trees.
//!
//! Runs after layout to check for problems the resolver tolerates silently:
//! circular anchors, anchors that were destroyed, anchors outside the
//! sibling/parent relationship, collapsed stretches, and children that
//! escape their container.

use std::fmt;

use super::control::{ControlId, ControlKind, Relation};
use super::engine::ConstraintGraph;
use super::tree::ControlTree;
use super::types::{Axis, Rect};

/// Slack allowed before a child counts as escaping its parent
const CONTAINMENT_TOLERANCE: f64 = 0.5;

/// A lint warning about a layout defect
#[derive(Debug)]
pub struct LintWarning {
    pub category: LintCategory,
    pub message: String,
}

/// Category of lint defect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintCategory {
    Cycle,
    DanglingAnchor,
    DistantAnchor,
    Stretch,
    Containment,
}

impl fmt::Display for LintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintCategory::Cycle => write!(f, "cycle"),
            LintCategory::DanglingAnchor => write!(f, "dangling-anchor"),
            LintCategory::DistantAnchor => write!(f, "distant-anchor"),
            LintCategory::Stretch => write!(f, "stretch"),
            LintCategory::Containment => write!(f, "containment"),
        }
    }
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

/// Run all lint checks on a laid-out tree.
pub fn check(tree: &ControlTree) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    check_cycles(tree, &mut warnings);
    check_anchors(tree, &mut warnings);
    check_stretches(tree, &mut warnings);
    check_containment(tree, &mut warnings);
    warnings
}

fn display_name(tree: &ControlTree, id: ControlId) -> String {
    format!("\"{}\"", tree.name(id))
}

// ── Circular anchors ─────────────────────────────────────────────

fn check_cycles(tree: &ControlTree, warnings: &mut Vec<LintWarning>) {
    if let Some(cycle) = ConstraintGraph::from_tree(tree).find_cycle() {
        let path: Vec<String> = cycle.iter().map(|id| tree.name(*id)).collect();
        warnings.push(LintWarning {
            category: LintCategory::Cycle,
            message: format!("circular constraint dependency: {}", path.join(" -> ")),
        });
    }
}

// ── Anchor relationships ─────────────────────────────────────────

fn check_anchors(tree: &ControlTree, warnings: &mut Vec<LintWarning>) {
    for id in tree.ids() {
        let Some(control) = tree.control(id) else {
            continue;
        };
        for constraint in control.constraints() {
            let Some(anchor_id) = constraint.anchor() else {
                continue;
            };
            let Some(anchor) = tree.control(anchor_id) else {
                warnings.push(LintWarning {
                    category: LintCategory::DanglingAnchor,
                    message: format!(
                        "{} edge {} is bound to destroyed control {}",
                        display_name(tree, id),
                        constraint.control_edge(),
                        anchor_id
                    ),
                });
                continue;
            };
            let is_parent = control.parent() == Some(anchor_id);
            let is_sibling = anchor.parent() == control.parent();
            if !is_parent && !is_sibling {
                warnings.push(LintWarning {
                    category: LintCategory::DistantAnchor,
                    message: format!(
                        "{} edge {} is bound to {}, which is neither its parent nor a sibling; \
                         the anchor is measured from the origin",
                        display_name(tree, id),
                        constraint.control_edge(),
                        display_name(tree, anchor_id)
                    ),
                });
            }
        }
    }
}

// ── Stretched extents ────────────────────────────────────────────

fn check_stretches(tree: &ControlTree, warnings: &mut Vec<LintWarning>) {
    for id in tree.ids() {
        let Some(control) = tree.control(id) else {
            continue;
        };
        if !control.is_enabled() {
            continue;
        }
        for (axis, extent) in [(Axis::Horizontal, "width"), (Axis::Vertical, "height")] {
            let Some(span) = tree.stretched_span(id, axis) else {
                continue;
            };
            let minimum = control.minimum_size().get(axis);
            if span < 0.0 {
                warnings.push(LintWarning {
                    category: LintCategory::Stretch,
                    message: format!(
                        "{} is stretched to a negative {} ({:.1})",
                        display_name(tree, id),
                        extent,
                        span
                    ),
                });
            } else if span < minimum {
                warnings.push(LintWarning {
                    category: LintCategory::Stretch,
                    message: format!(
                        "{} is stretched to {} {:.1}, below its minimum {:.1}",
                        display_name(tree, id),
                        extent,
                        span,
                        minimum
                    ),
                });
            }
        }
    }
}

// ── Containment ──────────────────────────────────────────────────

fn escapes(child: &Rect, parent: &Rect) -> bool {
    child.left() < parent.left() - CONTAINMENT_TOLERANCE
        || child.top() < parent.top() - CONTAINMENT_TOLERANCE
        || child.right() > parent.right() + CONTAINMENT_TOLERANCE
        || child.bottom() > parent.bottom() + CONTAINMENT_TOLERANCE
}

fn check_containment(tree: &ControlTree, warnings: &mut Vec<LintWarning>) {
    for id in tree.ids() {
        let Some(control) = tree.control(id) else {
            continue;
        };
        if !control.is_visible() {
            continue;
        }
        let Some(owner) = control.owner() else {
            continue;
        };
        if owner.relation != Relation::Child {
            continue;
        }
        let Some(parent) = tree.control(owner.id) else {
            continue;
        };
        // Scroll content is meant to overflow its panel
        if !parent.is_visible() || matches!(parent.kind(), ControlKind::ScrollPanel(_)) {
            continue;
        }
        let bounds = control.bounds();
        let parent_bounds = parent.bounds();
        if escapes(&bounds, &parent_bounds) {
            warnings.push(LintWarning {
                category: LintCategory::Containment,
                message: format!(
                    "{} {} extends outside its parent {} {}",
                    display_name(tree, id),
                    bounds,
                    display_name(tree, owner.id),
                    parent_bounds
                ),
            });
        }
    }
}
