//! Edge and constraint-category flag types
//!
//! [`Edge`] names one or more sides (or centers) of a control's rectangle.
//! Composite edges such as [`Edge::TOP_LEFT`] are bitwise unions of the six
//! atomic edges and are split with [`Edge::decompose`] before a constraint is
//! registered.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use super::types::Axis;

/// A set of rectangle edges
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Edge(u8);

impl Edge {
    pub const NONE: Edge = Edge(0);
    pub const LEFT: Edge = Edge(1);
    pub const RIGHT: Edge = Edge(2);
    pub const TOP: Edge = Edge(4);
    pub const BOTTOM: Edge = Edge(8);
    pub const CENTER_X: Edge = Edge(16);
    pub const CENTER_Y: Edge = Edge(32);

    pub const TOP_LEFT: Edge = Edge(Self::TOP.0 | Self::LEFT.0);
    pub const TOP_CENTER: Edge = Edge(Self::TOP.0 | Self::CENTER_X.0);
    pub const TOP_RIGHT: Edge = Edge(Self::TOP.0 | Self::RIGHT.0);
    pub const BOTTOM_LEFT: Edge = Edge(Self::BOTTOM.0 | Self::LEFT.0);
    pub const BOTTOM_CENTER: Edge = Edge(Self::BOTTOM.0 | Self::CENTER_X.0);
    pub const BOTTOM_RIGHT: Edge = Edge(Self::BOTTOM.0 | Self::RIGHT.0);
    pub const LEFT_CENTER: Edge = Edge(Self::LEFT.0 | Self::CENTER_Y.0);
    pub const RIGHT_CENTER: Edge = Edge(Self::RIGHT.0 | Self::CENTER_Y.0);
    pub const CENTER_XY: Edge = Edge(Self::CENTER_X.0 | Self::CENTER_Y.0);
    pub const HORIZONTAL: Edge = Edge(Self::LEFT.0 | Self::RIGHT.0);
    pub const VERTICAL: Edge = Edge(Self::TOP.0 | Self::BOTTOM.0);
    pub const DOCK: Edge = Edge(Self::HORIZONTAL.0 | Self::VERTICAL.0);

    /// The atomic edges, in decomposition order
    pub const ATOMIC: [Edge; 6] = [
        Self::LEFT,
        Self::RIGHT,
        Self::TOP,
        Self::BOTTOM,
        Self::CENTER_X,
        Self::CENTER_Y,
    ];

    const ALL_BITS: u8 = 0b11_1111;

    /// Build an edge set from raw bits, dropping unknown bits
    pub const fn from_bits_truncate(bits: u8) -> Edge {
        Edge(bits & Self::ALL_BITS)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every edge in `other` is also in `self`
    pub const fn contains(self, other: Edge) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if `self` and `other` share at least one edge
    pub const fn intersects(self, other: Edge) -> bool {
        self.0 & other.0 != 0
    }

    /// True for exactly one of the six atomic edges
    pub const fn is_atomic(self) -> bool {
        self.0 != 0 && self.0 & (self.0 - 1) == 0
    }

    /// True for `CENTER_X` or `CENTER_Y`
    pub const fn is_center(self) -> bool {
        self.0 == Self::CENTER_X.0 || self.0 == Self::CENTER_Y.0
    }

    /// Split into atomic edges, in the order of [`Edge::ATOMIC`]
    ///
    /// `BOTTOM_RIGHT` yields `[RIGHT, BOTTOM]`, so binding `BOTTOM_RIGHT` to
    /// `TOP_LEFT` pairs right with left and bottom with top.
    pub fn decompose(self) -> Vec<Edge> {
        Self::ATOMIC
            .iter()
            .copied()
            .filter(|edge| self.contains(*edge))
            .collect()
    }

    /// The opposite directional edge; `None` for center edges and composites
    pub const fn opposite(self) -> Option<Edge> {
        match self.0 {
            1 => Some(Self::RIGHT),
            2 => Some(Self::LEFT),
            4 => Some(Self::BOTTOM),
            8 => Some(Self::TOP),
            _ => None,
        }
    }

    /// The axis an atomic edge lies on
    pub const fn axis(self) -> Option<Axis> {
        match self.0 {
            1 | 2 | 16 => Some(Axis::Horizontal),
            4 | 8 | 32 => Some(Axis::Vertical),
            _ => None,
        }
    }

    /// The center edge of an axis
    pub const fn center_of(axis: Axis) -> Edge {
        match axis {
            Axis::Horizontal => Self::CENTER_X,
            Axis::Vertical => Self::CENTER_Y,
        }
    }

    /// Whether two atomic edges lie on the same axis
    pub fn on_same_axis(self, other: Edge) -> bool {
        if self == other || self.opposite() == Some(other) {
            return true;
        }
        match (self.axis(), other.axis()) {
            // Exactly one of the pair must be the center edge; two distinct
            // directional edges on one axis are already opposites.
            (Some(a), Some(b)) if a == b => self.is_center() != other.is_center(),
            _ => false,
        }
    }

    /// Look up an edge by its scene-file name (`top_left`, `center_x`, ...)
    pub fn from_name(name: &str) -> Option<Edge> {
        let edge = match name {
            "left" => Self::LEFT,
            "right" => Self::RIGHT,
            "top" => Self::TOP,
            "bottom" => Self::BOTTOM,
            "center_x" => Self::CENTER_X,
            "center_y" => Self::CENTER_Y,
            "top_left" => Self::TOP_LEFT,
            "top_center" => Self::TOP_CENTER,
            "top_right" => Self::TOP_RIGHT,
            "bottom_left" => Self::BOTTOM_LEFT,
            "bottom_center" => Self::BOTTOM_CENTER,
            "bottom_right" => Self::BOTTOM_RIGHT,
            "left_center" => Self::LEFT_CENTER,
            "right_center" => Self::RIGHT_CENTER,
            "center" | "center_xy" => Self::CENTER_XY,
            "horizontal" => Self::HORIZONTAL,
            "vertical" => Self::VERTICAL,
            "dock" => Self::DOCK,
            _ => return None,
        };
        Some(edge)
    }

    /// Names accepted by [`Edge::from_name`]
    pub const NAMES: &'static [&'static str] = &[
        "left",
        "right",
        "top",
        "bottom",
        "center_x",
        "center_y",
        "top_left",
        "top_center",
        "top_right",
        "bottom_left",
        "bottom_center",
        "bottom_right",
        "left_center",
        "right_center",
        "center",
        "horizontal",
        "vertical",
        "dock",
    ];

    fn atomic_name(self) -> &'static str {
        match self.0 {
            1 => "Left",
            2 => "Right",
            4 => "Top",
            8 => "Bottom",
            16 => "CenterX",
            32 => "CenterY",
            _ => "?",
        }
    }
}

impl BitOr for Edge {
    type Output = Edge;

    fn bitor(self, rhs: Edge) -> Edge {
        Edge(self.0 | rhs.0)
    }
}

impl BitOrAssign for Edge {
    fn bitor_assign(&mut self, rhs: Edge) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Edge {
    type Output = Edge;

    fn bitand(self, rhs: Edge) -> Edge {
        Edge(self.0 & rhs.0)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "None");
        }
        let names: Vec<&str> = self.decompose().iter().map(|e| e.atomic_name()).collect();
        write!(f, "{}", names.join("|"))
    }
}

impl fmt::Debug for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Edge({})", self)
    }
}

/// Which layout passes a constraint takes part in
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintCategory(u8);

impl ConstraintCategory {
    /// Enforced on every layout update
    pub const UPDATE: ConstraintCategory = ConstraintCategory(1);
    /// Enforced when a layout is initialized
    pub const INITIALIZATION: ConstraintCategory = ConstraintCategory(2);
    /// Enforced on all layout events
    pub const ALL: ConstraintCategory = ConstraintCategory(3);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn intersects(self, other: ConstraintCategory) -> bool {
        self.0 & other.0 != 0
    }

    /// Whether a pass requested with `self` enforces a constraint tagged `constraint`
    pub const fn admits(self, constraint: ConstraintCategory) -> bool {
        self.0 == Self::ALL.0 || self.intersects(constraint)
    }

    /// Look up a category by its scene-file name
    pub fn from_name(name: &str) -> Option<ConstraintCategory> {
        match name {
            "update" => Some(Self::UPDATE),
            "init" | "initialization" => Some(Self::INITIALIZATION),
            "all" => Some(Self::ALL),
            _ => None,
        }
    }
}

impl Default for ConstraintCategory {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for ConstraintCategory {
    type Output = ConstraintCategory;

    fn bitor(self, rhs: ConstraintCategory) -> ConstraintCategory {
        ConstraintCategory(self.0 | rhs.0)
    }
}

impl fmt::Display for ConstraintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            1 => write!(f, "Update"),
            2 => write!(f, "Initialization"),
            3 => write!(f, "All"),
            _ => write!(f, "None"),
        }
    }
}

impl fmt::Debug for ConstraintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConstraintCategory({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompose_composite() {
        assert_eq!(Edge::BOTTOM_RIGHT.decompose(), vec![Edge::RIGHT, Edge::BOTTOM]);
        assert_eq!(
            Edge::DOCK.decompose(),
            vec![Edge::LEFT, Edge::RIGHT, Edge::TOP, Edge::BOTTOM]
        );
        assert_eq!(Edge::LEFT.decompose(), vec![Edge::LEFT]);
        assert!(Edge::NONE.decompose().is_empty());
    }

    #[test]
    fn test_opposite() {
        assert_eq!(Edge::LEFT.opposite(), Some(Edge::RIGHT));
        assert_eq!(Edge::BOTTOM.opposite(), Some(Edge::TOP));
        assert_eq!(Edge::CENTER_X.opposite(), None);
        assert_eq!(Edge::TOP_LEFT.opposite(), None);
    }

    #[test]
    fn test_same_axis() {
        assert!(Edge::LEFT.on_same_axis(Edge::LEFT));
        assert!(Edge::LEFT.on_same_axis(Edge::RIGHT));
        assert!(Edge::RIGHT.on_same_axis(Edge::CENTER_X));
        assert!(Edge::CENTER_Y.on_same_axis(Edge::TOP));
        assert!(Edge::CENTER_X.on_same_axis(Edge::CENTER_X));
        assert!(!Edge::LEFT.on_same_axis(Edge::TOP));
        assert!(!Edge::CENTER_X.on_same_axis(Edge::CENTER_Y));
        assert!(!Edge::BOTTOM.on_same_axis(Edge::CENTER_X));
    }

    #[test]
    fn test_atomic_and_center() {
        assert!(Edge::TOP.is_atomic());
        assert!(!Edge::TOP_LEFT.is_atomic());
        assert!(!Edge::NONE.is_atomic());
        assert!(Edge::CENTER_Y.is_center());
        assert!(!Edge::CENTER_XY.is_center());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Edge::from_name("top_left"), Some(Edge::TOP_LEFT));
        assert_eq!(Edge::from_name("center"), Some(Edge::CENTER_XY));
        assert_eq!(Edge::from_name("sideways"), None);
        for name in Edge::NAMES {
            assert!(Edge::from_name(name).is_some(), "{} should resolve", name);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Edge::TOP_RIGHT.to_string(), "Right|Top");
        assert_eq!(Edge::NONE.to_string(), "None");
    }

    #[test]
    fn test_category_admits() {
        let init = ConstraintCategory::INITIALIZATION;
        let update = ConstraintCategory::UPDATE;
        assert!(ConstraintCategory::ALL.admits(init));
        assert!(init.admits(init));
        assert!(!update.admits(init));
        assert!(update.admits(ConstraintCategory::ALL));
        assert_eq!(update | init, ConstraintCategory::ALL);
    }
}
