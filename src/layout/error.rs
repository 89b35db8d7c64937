//! Error types for the layout engine

use thiserror::Error;

use super::control::ControlId;
use super::edge::Edge;

/// Errors raised when a constraint is registered
///
/// A rejected registration leaves the control's constraint set unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstraintError {
    /// The constraint names its own control as anchor
    #[error("control {control} cannot be anchored to itself")]
    SelfAnchor { control: ControlId },

    /// Control and anchor edges decompose into different numbers of atomic edges
    #[error(
        "edge count mismatch: control edge {control_edge} has {control_count} atomic edges, anchor edge {anchor_edge} has {anchor_count}"
    )]
    EdgeCountMismatch {
        control_edge: Edge,
        anchor_edge: Edge,
        control_count: usize,
        anchor_count: usize,
    },

    /// A decomposed control/anchor edge pair lies on different axes
    #[error("control edge {control_edge} and anchor edge {anchor_edge} are not on the same axis")]
    AxisMismatch {
        control_edge: Edge,
        anchor_edge: Edge,
    },

    /// The atomic control edge is already bound
    #[error("control edge {edge} is already bound")]
    DuplicateEdge { edge: Edge },

    /// The axis already carries the complementary center or directional edge
    #[error("control axis already bound: {edge} conflicts with {existing}")]
    AxisConflict { edge: Edge, existing: Edge },

    /// The control edge names no edge at all
    #[error("constraint names no control edge")]
    EmptyEdge,
}

/// Errors that can occur while building or validating a control tree
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// The id does not refer to a live control
    #[error("unknown control {0}")]
    UnknownControl(ControlId),

    /// Children can only be added to containers
    #[error("control '{0}' is not a container")]
    NotAContainer(String),

    /// The operation needs a capability the control's kind lacks
    #[error("control '{control}' is not {capability}")]
    MissingCapability {
        control: String,
        capability: &'static str,
    },

    /// The control already has an owner
    #[error("control '{control}' is already attached to '{owner}'")]
    AlreadyAttached { control: String, owner: String },

    /// Attaching would make a control its own ancestor
    #[error("attaching '{control}' under '{owner}' would create a hierarchy cycle")]
    HierarchyCycle { control: String, owner: String },

    /// Controls whose constraints anchor on each other in a loop
    #[error("circular constraint dependency: {}", cycle.join(" -> "))]
    CircularConstraint { cycle: Vec<String> },

    /// Constraint registration failed
    #[error(transparent)]
    Constraint(#[from] ConstraintError),
}

impl LayoutError {
    /// Create a circular constraint error
    pub fn circular(cycle: Vec<String>) -> Self {
        Self::CircularConstraint { cycle }
    }

    /// The registration error, if this is one
    pub fn as_constraint(&self) -> Option<&ConstraintError> {
        match self {
            Self::Constraint(e) => Some(e),
            _ => None,
        }
    }
}
