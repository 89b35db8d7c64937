//! Layout propagation over the control tree
//!
//! [`ControlTree::layout`] enforces a control's constraints, recomputes its
//! draw position and then walks its decorations and children in order.
//! Capabilities hook in here:
//!
//! - **Measurable** panels lay out their children, measure them (including
//!   constraint margins), resize, and lay the children out again.
//! - **Scrollable** panels keep their content offset across layout and clamp
//!   it into range.
//!
//! Geometry writes that affect extents (size, scale, minimum size) re-run
//! `layout(control, Update)` unless the control is suspended. Position writes
//! only cascade draw positions down the subtree.
//!
//! ## Cycle Detection
//!
//! Resolution tolerates cycles (they read stale geometry), but
//! [`ControlTree::check_cycles`] can reject them up front. It builds the
//! subject → anchor dependency graph and runs Kahn's algorithm; whatever is
//! left over contains at least one cycle, which is extracted for the error.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use super::control::{Control, ControlId, ControlKind, ScrollRestriction, ScrollState, Scrollable};
use super::edge::{ConstraintCategory, Edge};
use super::error::LayoutError;
use super::tree::ControlTree;
use super::types::{Rect, Vec2};

impl ControlTree {
    /// Register a constraint on `id`; `anchor = None` binds to the viewport
    pub fn add_constraint(
        &mut self,
        id: ControlId,
        control_edge: Edge,
        anchor: Option<ControlId>,
        anchor_edge: Edge,
        distance: f64,
        category: ConstraintCategory,
    ) -> Result<usize, LayoutError> {
        if let Some(anchor) = anchor {
            self.get(anchor)?;
        }
        let control = self.get_mut(id)?;
        let added = control
            .constraints
            .add(id, control_edge, anchor, anchor_edge, distance, category)?;
        debug!(
            "'{}': bound {} to {}.{} ({:+})",
            control.name,
            control_edge,
            anchor.map(|a| a.to_string()).unwrap_or_else(|| "viewport".to_string()),
            anchor_edge,
            distance
        );
        Ok(added)
    }

    /// Lay out a control and everything it owns
    pub fn layout(&mut self, id: ControlId, category: ConstraintCategory) -> Result<(), LayoutError> {
        let control = self.get(id)?;
        if control.suspended || !control.enabled {
            return Ok(());
        }
        debug!("layout '{}' ({})", control.name, category);

        let scroll_content = control.kind.scrollable().map(|s| s.content());
        let auto_size = control.kind.auto_sizes();

        if let Some(content) = scroll_content {
            let offset = self.get(content)?.position;
            self.layout_subtree(id, category)?;
            self.place_content(id, content, offset)
        } else if auto_size {
            self.layout_subtree(id, category)?;
            self.resize_to_content(id, category)
        } else {
            self.layout_subtree(id, category)
        }
    }

    /// Lay out every root control in order
    ///
    /// With `check_cycles` set in the configuration, circular constraint
    /// dependencies are reported before anything moves.
    pub fn layout_all(&mut self, category: ConstraintCategory) -> Result<(), LayoutError> {
        if self.config().check_cycles {
            self.check_cycles()?;
        }
        for root in self.roots().to_vec() {
            self.layout(root, category)?;
        }
        Ok(())
    }

    fn layout_subtree(&mut self, id: ControlId, category: ConstraintCategory) -> Result<(), LayoutError> {
        self.enforce(id, category)?;
        let control = self.get(id)?;
        let owned: Vec<ControlId> = control
            .decorations
            .iter()
            .chain(&control.children)
            .copied()
            .collect();
        for child in owned {
            self.layout(child, category)?;
        }
        Ok(())
    }

    /// Size a measurable panel to its content and lay it out again
    pub fn resize_to_content(&mut self, id: ControlId, category: ConstraintCategory) -> Result<(), LayoutError> {
        let control = self.get(id)?;
        if control.kind.measurable().is_none() {
            return Err(LayoutError::MissingCapability {
                control: control.name.clone(),
                capability: "measurable",
            });
        }
        let content = self.content_bounds(id, true)?;
        let control = self.get_mut(id)?;
        control.size = content.size();
        control.invalidate();
        debug!("'{}' sized to content {}", control.name, control.size);
        self.layout_subtree(id, category)
    }

    /// Combined local rectangle of the visible children of a container.
    ///
    /// With `include_margins`, each child's rectangle grows by the distances
    /// of its edge constraints, so that `left = parent.left + 5` leaves 5
    /// units of room. Empty or hidden containers measure as a zero rectangle.
    /// A nested container counts with its own size, not with its content.
    pub fn content_bounds(&self, id: ControlId, include_margins: bool) -> Result<Rect, LayoutError> {
        let host = self.get(self.child_host(id)?)?;
        if !host.visible {
            return Ok(Rect::zero());
        }

        let mut extent: Option<(Vec2, Vec2)> = None;
        for child in &host.children {
            let child = self.get(*child)?;
            if !child.visible {
                continue;
            }
            let mut min = child.position;
            let mut max = child.position + child.size;
            if include_margins {
                let margins = &child.constraints;
                min.x -= margins.edge_distance(Edge::LEFT);
                min.y -= margins.edge_distance(Edge::TOP);
                max.x += margins.edge_distance(Edge::RIGHT);
                max.y += margins.edge_distance(Edge::BOTTOM);
            }
            extent = Some(match extent {
                Some((lo, hi)) => (lo.min(min), hi.max(max)),
                None => (min, max),
            });
        }

        Ok(extent
            .map(|(min, max)| Rect::from_corners(min, max))
            .unwrap_or_else(Rect::zero))
    }

    /// Recompute a control's own draw position from its owner
    pub(crate) fn update_draw_position(&mut self, id: ControlId) -> Result<(), LayoutError> {
        let base = self
            .get(id)?
            .parent()
            .and_then(|owner| self.control(owner))
            .map(|owner| owner.draw_position)
            .unwrap_or(Vec2::ZERO);
        let control = self.get_mut(id)?;
        let draw_position = base + control.position;
        if control.draw_position != draw_position {
            control.draw_position = draw_position;
            control.invalidate();
        }
        Ok(())
    }

    /// Recompute draw positions of a control and its whole subtree
    pub(crate) fn refresh_draw_positions(&mut self, id: ControlId) -> Result<(), LayoutError> {
        self.update_draw_position(id)?;
        for owned in self.owned(id)? {
            self.refresh_draw_positions(owned)?;
        }
        Ok(())
    }

    fn owned(&self, id: ControlId) -> Result<Vec<ControlId>, LayoutError> {
        let control = self.get(id)?;
        Ok(control
            .children
            .iter()
            .chain(&control.decorations)
            .copied()
            .collect())
    }

    /// Move a control within its owner; draw positions below it follow
    pub fn set_position(&mut self, id: ControlId, position: Vec2) -> Result<(), LayoutError> {
        let control = self.get_mut(id)?;
        if control.position == position {
            return Ok(());
        }
        control.position = position;
        control.invalidate();
        self.refresh_draw_positions(id)
    }

    pub fn set_size(&mut self, id: ControlId, size: Vec2) -> Result<(), LayoutError> {
        self.write_extent(id, |control| {
            let changed = control.size != size;
            control.size = size;
            changed
        })
    }

    pub fn set_scale(&mut self, id: ControlId, scale: Vec2) -> Result<(), LayoutError> {
        self.write_extent(id, |control| {
            let changed = control.scale != scale;
            control.scale = scale;
            changed
        })
    }

    pub fn set_minimum_size(&mut self, id: ControlId, minimum_size: Vec2) -> Result<(), LayoutError> {
        self.write_extent(id, |control| {
            control.minimum_size = minimum_size;
            true
        })
    }

    fn write_extent(&mut self, id: ControlId, write: impl FnOnce(&mut Control) -> bool) -> Result<(), LayoutError> {
        let control = self.get_mut(id)?;
        if !write(control) {
            return Ok(());
        }
        control.invalidate();
        if !control.suspended {
            self.layout(id, ConstraintCategory::UPDATE)?;
        }
        Ok(())
    }

    /// Set the normalized origin of a control, its decorations and children
    pub fn set_normalized_origin(&mut self, id: ControlId, origin: Vec2) -> Result<(), LayoutError> {
        let control = self.get_mut(id)?;
        if control.normalized_origin != origin {
            control.normalized_origin = origin;
            control.invalidate();
        }
        for owned in self.owned(id)? {
            self.set_normalized_origin(owned, origin)?;
        }
        Ok(())
    }

    /// Suspend or resume layout of a control and everything it owns
    pub fn set_suspended(&mut self, id: ControlId, suspended: bool) -> Result<(), LayoutError> {
        self.get_mut(id)?.suspended = suspended;
        for owned in self.owned(id)? {
            self.set_suspended(owned, suspended)?;
        }
        Ok(())
    }

    /// Switch auto-sizing on a measurable panel
    pub fn set_auto_size(&mut self, id: ControlId, auto_size: bool) -> Result<(), LayoutError> {
        let control = self.get_mut(id)?;
        match control.kind.measurable_mut() {
            Some(measurable) => {
                measurable.set_auto_size(auto_size);
                Ok(())
            }
            None => Err(LayoutError::MissingCapability {
                control: control.name.clone(),
                capability: "measurable",
            }),
        }
    }

    pub fn bounds(&self, id: ControlId) -> Result<Rect, LayoutError> {
        Ok(self.get(id)?.bounds())
    }

    fn scroll_state(&self, id: ControlId) -> Result<ScrollState, LayoutError> {
        let control = self.get(id)?;
        match &control.kind {
            ControlKind::ScrollPanel(state) => Ok(*state),
            _ => Err(LayoutError::MissingCapability {
                control: control.name.clone(),
                capability: "scrollable",
            }),
        }
    }

    fn scroll_state_mut(&mut self, id: ControlId) -> Result<&mut ScrollState, LayoutError> {
        let control = self.get_mut(id)?;
        let name = control.name.clone();
        control
            .kind
            .scroll_state_mut()
            .ok_or(LayoutError::MissingCapability {
                control: name,
                capability: "scrollable",
            })
    }

    pub fn set_scroll_clamp(&mut self, id: ControlId, clamp: bool) -> Result<(), LayoutError> {
        self.scroll_state_mut(id)?.clamp = clamp;
        Ok(())
    }

    pub fn set_scroll_restriction(&mut self, id: ControlId, restriction: ScrollRestriction) -> Result<(), LayoutError> {
        self.scroll_state_mut(id)?.restriction = restriction;
        Ok(())
    }

    /// Allow scrolling along axes where the content fits inside the panel
    pub fn set_inside_scrolling(&mut self, id: ControlId, allow: bool) -> Result<(), LayoutError> {
        self.scroll_state_mut(id)?.allow_inside_scrolling = allow;
        Ok(())
    }

    /// Current content offset of a scroll panel
    pub fn scroll_position(&self, id: ControlId) -> Result<Vec2, LayoutError> {
        let state = self.scroll_state(id)?;
        Ok(self.get(state.content)?.position)
    }

    /// Move a scroll panel's content to `location`, returning where it ended up
    pub fn scroll_to(&mut self, id: ControlId, location: Vec2) -> Result<Vec2, LayoutError> {
        let state = self.scroll_state(id)?;
        let panel_size = self.get(id)?.size;
        let content = self.get(state.content)?;
        let target = state.restrict(content.position, location, content.size, panel_size);
        self.place_content(id, state.content, target)?;
        self.scroll_position(id)
    }

    /// Move a scroll panel's content by `delta`
    pub fn scroll_by(&mut self, id: ControlId, delta: Vec2) -> Result<Vec2, LayoutError> {
        let current = self.scroll_position(id)?;
        self.scroll_to(id, current + delta)
    }

    fn place_content(&mut self, id: ControlId, content: ControlId, offset: Vec2) -> Result<(), LayoutError> {
        let state = self.scroll_state(id)?;
        let panel_size = self.get(id)?.size;
        let content_size = self.get(content)?.size;
        let offset = if state.clamps_content() {
            Vec2::new(
                clamp_offset(offset.x, content_size.x, panel_size.x),
                clamp_offset(offset.y, content_size.y, panel_size.y),
            )
        } else {
            offset
        };
        self.set_position(content, offset)
    }

    /// Fail with the first circular constraint dependency, if any
    pub fn check_cycles(&self) -> Result<(), LayoutError> {
        match ConstraintGraph::from_tree(self).find_cycle() {
            Some(cycle) => Err(LayoutError::circular(
                cycle.iter().map(|id| self.name(*id)).collect(),
            )),
            None => Ok(()),
        }
    }
}

/// Keep content inside the panel when it is smaller, and covering the panel
/// when it is larger
fn clamp_offset(offset: f64, content: f64, panel: f64) -> f64 {
    let slack = panel - content;
    if slack > 0.0 {
        offset.clamp(0.0, slack)
    } else {
        offset.clamp(slack, 0.0)
    }
}

/// Dependencies between controls: each subject depends on its live anchors
pub(crate) struct ConstraintGraph {
    dependencies: BTreeMap<ControlId, BTreeSet<ControlId>>,
}

impl ConstraintGraph {
    pub(crate) fn from_tree(tree: &ControlTree) -> Self {
        let mut dependencies: BTreeMap<ControlId, BTreeSet<ControlId>> = BTreeMap::new();
        for id in tree.ids() {
            let Some(control) = tree.control(id) else {
                continue;
            };
            let anchors = control
                .constraints
                .anchors()
                .into_iter()
                .filter(|anchor| tree.contains(*anchor));
            for anchor in anchors {
                dependencies.entry(id).or_default().insert(anchor);
                dependencies.entry(anchor).or_default();
            }
        }
        Self { dependencies }
    }

    /// Order in which anchors come before the controls bound to them
    pub(crate) fn topological_order(&self) -> Result<Vec<ControlId>, Vec<ControlId>> {
        let mut in_degree: BTreeMap<ControlId, usize> = BTreeMap::new();
        let mut dependents: BTreeMap<ControlId, Vec<ControlId>> = BTreeMap::new();

        for (subject, anchors) in &self.dependencies {
            in_degree.insert(*subject, anchors.len());
            for anchor in anchors {
                dependents.entry(*anchor).or_default().push(*subject);
            }
        }

        // Kahn's algorithm
        let mut queue: Vec<ControlId> = in_degree
            .iter()
            .filter(|(_, &deg)| deg == 0)
            .map(|(id, _)| *id)
            .collect();
        let mut result = Vec::with_capacity(in_degree.len());

        while let Some(node) = queue.pop() {
            result.push(node);
            if let Some(deps) = dependents.get(&node) {
                for dep in deps {
                    if let Some(deg) = in_degree.get_mut(dep) {
                        *deg -= 1;
                        if *deg == 0 {
                            queue.push(*dep);
                        }
                    }
                }
            }
        }

        if result.len() < in_degree.len() {
            let remaining: Vec<ControlId> = in_degree
                .iter()
                .filter(|(_, &deg)| deg > 0)
                .map(|(id, _)| *id)
                .collect();
            return Err(remaining);
        }
        Ok(result)
    }

    /// One cycle as a closed path `a -> b -> a`
    pub(crate) fn find_cycle(&self) -> Option<Vec<ControlId>> {
        let remaining: BTreeSet<ControlId> = self.topological_order().err()?.into_iter().collect();

        // Every leftover node still waits on a leftover anchor, so following
        // those anchors must revisit a node.
        let mut path: Vec<ControlId> = Vec::new();
        let mut current = *remaining.iter().next()?;
        loop {
            if let Some(start) = path.iter().position(|id| *id == current) {
                let mut cycle = path.split_off(start);
                cycle.push(current);
                return Some(cycle);
            }
            path.push(current);
            current = *self
                .dependencies
                .get(&current)?
                .iter()
                .find(|anchor| remaining.contains(anchor))?;
        }
    }
}
