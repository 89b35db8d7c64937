//! Controls, control kinds and their capabilities

use std::fmt;

use super::constraint::ConstraintSet;
use super::transform::TransformCache;
use super::types::{Rect, Vec2};

/// Generational handle to a control in a [`ControlTree`](super::tree::ControlTree)
///
/// The generation changes each time a slot is reused, so ids of destroyed
/// controls never resolve to a newer control.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId {
    index: u32,
    generation: u32,
}

impl ControlId {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub(crate) fn index(self) -> usize {
        self.index as usize
    }

    pub(crate) fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

impl fmt::Debug for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ControlId({})", self)
    }
}

/// How a control is attached to its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Member of a container's child list
    Child,
    /// Attached to a decorated control
    Decoration,
}

/// Back-reference to the owning control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner {
    pub id: ControlId,
    pub relation: Relation,
}

/// Axes along which a scroll panel's content may move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollRestriction {
    Horizontal,
    Vertical,
    #[default]
    Unrestricted,
}

impl ScrollRestriction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "horizontal" => Some(Self::Horizontal),
            "vertical" => Some(Self::Vertical),
            "unrestricted" | "none" => Some(Self::Unrestricted),
            _ => None,
        }
    }
}

/// Containers that can size themselves to their content
pub trait Measurable {
    fn auto_size(&self) -> bool;
    fn set_auto_size(&mut self, auto_size: bool);
}

/// Containers whose children live in a movable content panel
pub trait Scrollable {
    /// The internal content panel holding the scrolled children
    fn content(&self) -> ControlId;
    fn restriction(&self) -> ScrollRestriction;
    fn clamps_content(&self) -> bool;
    fn allows_inside_scrolling(&self) -> bool;

    /// Restrict a requested content location to the permitted axes.
    ///
    /// Without inside scrolling, an axis on which the content fits inside
    /// the panel keeps its current value.
    fn restrict(&self, current: Vec2, requested: Vec2, content_size: Vec2, panel_size: Vec2) -> Vec2 {
        let mut target = match self.restriction() {
            ScrollRestriction::Horizontal => Vec2::new(requested.x, current.y),
            ScrollRestriction::Vertical => Vec2::new(current.x, requested.y),
            ScrollRestriction::Unrestricted => requested,
        };
        if !self.allows_inside_scrolling() {
            if content_size.x <= panel_size.x {
                target.x = current.x;
            }
            if content_size.y <= panel_size.y {
                target.y = current.y;
            }
        }
        target
    }
}

/// Panel state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelState {
    pub auto_size: bool,
}

impl Default for PanelState {
    fn default() -> Self {
        Self { auto_size: true }
    }
}

impl Measurable for PanelState {
    fn auto_size(&self) -> bool {
        self.auto_size
    }

    fn set_auto_size(&mut self, auto_size: bool) {
        self.auto_size = auto_size;
    }
}

/// Scroll panel state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    pub content: ControlId,
    pub clamp: bool,
    pub restriction: ScrollRestriction,
    pub allow_inside_scrolling: bool,
}

impl ScrollState {
    pub fn new(content: ControlId) -> Self {
        Self {
            content,
            clamp: true,
            restriction: ScrollRestriction::Unrestricted,
            allow_inside_scrolling: true,
        }
    }
}

impl Scrollable for ScrollState {
    fn content(&self) -> ControlId {
        self.content
    }

    fn restriction(&self) -> ScrollRestriction {
        self.restriction
    }

    fn clamps_content(&self) -> bool {
        self.clamp
    }

    fn allows_inside_scrolling(&self) -> bool {
        self.allow_inside_scrolling
    }
}

/// Requested kind of a new control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindTag {
    Control,
    Label,
    Image,
    Button,
    Panel,
    ScrollPanel,
}

impl KindTag {
    pub fn name(self) -> &'static str {
        match self {
            KindTag::Control => "control",
            KindTag::Label => "label",
            KindTag::Image => "image",
            KindTag::Button => "button",
            KindTag::Panel => "panel",
            KindTag::ScrollPanel => "scroll",
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, KindTag::Panel | KindTag::ScrollPanel)
    }
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What a control is, with per-kind state
#[derive(Debug, Clone, PartialEq)]
pub enum ControlKind {
    Control,
    Label,
    Image,
    Button,
    Panel(PanelState),
    ScrollPanel(ScrollState),
}

impl ControlKind {
    pub fn tag(&self) -> KindTag {
        match self {
            ControlKind::Control => KindTag::Control,
            ControlKind::Label => KindTag::Label,
            ControlKind::Image => KindTag::Image,
            ControlKind::Button => KindTag::Button,
            ControlKind::Panel(_) => KindTag::Panel,
            ControlKind::ScrollPanel(_) => KindTag::ScrollPanel,
        }
    }

    pub fn is_container(&self) -> bool {
        self.tag().is_container()
    }

    pub fn measurable(&self) -> Option<&dyn Measurable> {
        match self {
            ControlKind::Panel(state) => Some(state),
            _ => None,
        }
    }

    pub fn measurable_mut(&mut self) -> Option<&mut dyn Measurable> {
        match self {
            ControlKind::Panel(state) => Some(state),
            _ => None,
        }
    }

    pub fn scrollable(&self) -> Option<&dyn Scrollable> {
        match self {
            ControlKind::ScrollPanel(state) => Some(state),
            _ => None,
        }
    }

    pub(crate) fn scroll_state_mut(&mut self) -> Option<&mut ScrollState> {
        match self {
            ControlKind::ScrollPanel(state) => Some(state),
            _ => None,
        }
    }

    /// Whether this control sizes itself to its children
    pub fn auto_sizes(&self) -> bool {
        self.measurable().map(|m| m.auto_size()).unwrap_or(false)
    }
}

/// A node of the control tree
///
/// Geometry is read through the accessors here; writes go through
/// [`ControlTree`](super::tree::ControlTree) so that relayout and draw
/// position cascades happen.
#[derive(Debug, Clone)]
pub struct Control {
    pub(crate) name: String,
    pub(crate) kind: ControlKind,
    pub(crate) position: Vec2,
    pub(crate) size: Vec2,
    pub(crate) scale: Vec2,
    pub(crate) normalized_origin: Vec2,
    pub(crate) minimum_size: Vec2,
    pub(crate) draw_position: Vec2,
    pub(crate) visible: bool,
    pub(crate) enabled: bool,
    pub(crate) suspended: bool,
    pub(crate) constraints: ConstraintSet,
    pub(crate) owner: Option<Owner>,
    pub(crate) children: Vec<ControlId>,
    pub(crate) decorations: Vec<ControlId>,
    pub(crate) transform: TransformCache,
}

impl Control {
    pub(crate) fn new(name: impl Into<String>, kind: ControlKind, size: Vec2, normalized_origin: Vec2) -> Self {
        Self {
            name: name.into(),
            kind,
            position: Vec2::ZERO,
            size,
            scale: Vec2::ONE,
            normalized_origin,
            minimum_size: Vec2::ZERO,
            draw_position: Vec2::ZERO,
            visible: true,
            enabled: true,
            suspended: false,
            constraints: ConstraintSet::new(),
            owner: None,
            children: Vec::new(),
            decorations: Vec::new(),
            transform: TransformCache::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ControlKind {
        &self.kind
    }

    /// Position relative to the owner, or to the viewport for roots
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn scaled_size(&self) -> Vec2 {
        self.size.mul_elem(self.scale)
    }

    pub fn normalized_origin(&self) -> Vec2 {
        self.normalized_origin
    }

    pub fn minimum_size(&self) -> Vec2 {
        self.minimum_size
    }

    /// Absolute screen position
    pub fn draw_position(&self) -> Vec2 {
        self.draw_position
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn owner(&self) -> Option<Owner> {
        self.owner
    }

    /// Owning control, whether container parent or decorated control
    pub fn parent(&self) -> Option<ControlId> {
        self.owner.map(|o| o.id)
    }

    pub fn children(&self) -> &[ControlId] {
        &self.children
    }

    pub fn decorations(&self) -> &[ControlId] {
        &self.decorations
    }

    /// Local rectangle `(position, size)` in owner space
    pub fn local_rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Screen-space bounding rectangle after scaling around the origin
    pub fn bounds(&self) -> Rect {
        self.transform
            .bounds(self.draw_position, self.size, self.scale, self.normalized_origin)
    }

    /// Number of times [`Control::bounds`] had to be recomputed
    pub fn bounds_recomputations(&self) -> u64 {
        self.transform.recomputations()
    }

    pub(crate) fn invalidate(&self) {
        self.transform.invalidate();
    }
}
