//! Control tree arena and hierarchy operations
//!
//! All controls live in a generational arena owned by [`ControlTree`].
//! Ownership follows the hierarchy: destroying a control destroys its
//! children and decorations. Anchors are plain ids, so a constraint may
//! outlive the control it names; such constraints are skipped at layout time.

use log::debug;

use super::config::LayoutConfig;
use super::control::{Control, ControlId, ControlKind, KindTag, Owner, PanelState, Relation, ScrollState};
use super::edge::{ConstraintCategory, Edge};
use super::error::LayoutError;
use super::types::Vec2;
use super::viewport::Viewport;

#[derive(Debug)]
struct Slot {
    generation: u32,
    control: Option<Control>,
}

/// An arena of controls plus the viewport they are laid out in
pub struct ControlTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    /// Unowned controls in creation order, bottom-most first
    roots: Vec<ControlId>,
    viewport: Box<dyn Viewport>,
    config: LayoutConfig,
}

impl std::fmt::Debug for ControlTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlTree")
            .field("controls", &self.len())
            .field("roots", &self.roots)
            .field("viewport", &self.viewport.size())
            .finish()
    }
}

impl ControlTree {
    /// Create an empty tree laid out against `viewport`
    pub fn new(viewport: impl Viewport + 'static) -> Self {
        Self::with_config(viewport, LayoutConfig::default())
    }

    /// Create an empty tree using `config` for new-control defaults
    pub fn with_config(viewport: impl Viewport + 'static, config: LayoutConfig) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            roots: Vec::new(),
            viewport: Box::new(viewport),
            config,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Current viewport size, read fresh on every call
    pub fn viewport_size(&self) -> Vec2 {
        self.viewport.size()
    }

    /// Replace the viewport; callers re-run layout afterwards
    pub fn set_viewport(&mut self, viewport: impl Viewport + 'static) {
        self.viewport = Box::new(viewport);
    }

    /// Number of live controls
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.control.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `id` refers to a live control
    pub fn contains(&self, id: ControlId) -> bool {
        self.control(id).is_some()
    }

    pub fn control(&self, id: ControlId) -> Option<&Control> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.control.as_ref())
    }

    pub fn get(&self, id: ControlId) -> Result<&Control, LayoutError> {
        self.control(id).ok_or(LayoutError::UnknownControl(id))
    }

    pub(crate) fn get_mut(&mut self, id: ControlId) -> Result<&mut Control, LayoutError> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.control.as_mut())
            .ok_or(LayoutError::UnknownControl(id))
    }

    /// Name of a control for diagnostics; destroyed ids render as the id
    pub fn name(&self, id: ControlId) -> String {
        match self.control(id) {
            Some(control) => control.name.clone(),
            None => id.to_string(),
        }
    }

    /// First live control with the given name
    pub fn find(&self, name: &str) -> Option<ControlId> {
        self.ids().into_iter().find(|id| self.name(*id) == name)
    }

    /// Ids of all live controls in slot order
    pub fn ids(&self) -> Vec<ControlId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.control.is_some())
            .map(|(index, slot)| ControlId::new(index as u32, slot.generation))
            .collect()
    }

    /// Controls without an owner, bottom-most first
    pub fn roots(&self) -> &[ControlId] {
        &self.roots
    }

    /// Create a control of the given kind with the configured default size.
    ///
    /// A scroll panel also gets its content panel: an auto-sized panel
    /// bound TopLeft to the scroll panel's TopLeft.
    pub fn create(&mut self, name: impl Into<String>, kind: KindTag) -> ControlId {
        let name = name.into();
        let size = self.config.sizes.for_kind(kind);
        match kind {
            KindTag::Control => self.insert(Control::new(name, ControlKind::Control, size, self.config.origin())),
            KindTag::Label => self.insert(Control::new(name, ControlKind::Label, size, self.config.origin())),
            KindTag::Image => self.insert(Control::new(name, ControlKind::Image, size, self.config.origin())),
            KindTag::Button => self.insert(Control::new(name, ControlKind::Button, size, self.config.origin())),
            KindTag::Panel => self.create_panel(name, size, PanelState::default()),
            KindTag::ScrollPanel => self.create_scroll_panel(name, size),
        }
    }

    fn create_panel(&mut self, name: String, size: Vec2, state: PanelState) -> ControlId {
        let origin = self.config.origin();
        self.insert(Control::new(name, ControlKind::Panel(state), size, origin))
    }

    fn create_scroll_panel(&mut self, name: String, size: Vec2) -> ControlId {
        let origin = self.config.origin();
        let content = self.create_panel(format!("{}.content", name), Vec2::ZERO, PanelState { auto_size: true });
        let scroll = self.insert(Control::new(
            name,
            ControlKind::ScrollPanel(ScrollState::new(content)),
            size,
            origin,
        ));

        self.attach(scroll, content, Relation::Child);
        if let Ok(control) = self.get_mut(content) {
            let bound = control.constraints.add(
                content,
                Edge::TOP_LEFT,
                Some(scroll),
                Edge::TOP_LEFT,
                0.0,
                ConstraintCategory::ALL,
            );
            debug_assert!(bound.is_ok(), "content of a fresh scroll panel rejected its anchor: {:?}", bound);
        }
        scroll
    }

    fn insert(&mut self, control: Control) -> ControlId {
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.control = Some(control);
                ControlId::new(index, slot.generation)
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    control: Some(control),
                });
                ControlId::new((self.slots.len() - 1) as u32, 0)
            }
        };
        self.roots.push(id);
        id
    }

    /// Destroy a control together with everything it owns.
    ///
    /// The control is detached from its owner first. Constraints elsewhere
    /// that anchor on a destroyed control are left in place and skipped.
    pub fn destroy(&mut self, id: ControlId) -> Result<(), LayoutError> {
        let owner = self.get(id)?.owner;
        if let Some(owner) = owner {
            match owner.relation {
                Relation::Child => {
                    self.detach_child(owner.id, id)?;
                }
                Relation::Decoration => {
                    self.remove_decoration(owner.id, id)?;
                }
            }
        }
        self.destroy_owned(id);
        Ok(())
    }

    fn destroy_owned(&mut self, id: ControlId) {
        let Some(slot) = self
            .slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
        else {
            return;
        };
        let Some(control) = slot.control.take() else {
            return;
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index() as u32);
        self.roots.retain(|root| *root != id);
        debug!("destroyed control '{}' ({})", control.name, id);

        for owned in control.children.iter().chain(&control.decorations) {
            self.destroy_owned(*owned);
        }
    }

    /// The control that actually holds children added to `parent`
    ///
    /// Children of a scroll panel live in its content panel.
    pub fn child_host(&self, parent: ControlId) -> Result<ControlId, LayoutError> {
        let control = self.get(parent)?;
        match &control.kind {
            ControlKind::ScrollPanel(state) => Ok(state.content),
            kind if kind.is_container() => Ok(parent),
            _ => Err(LayoutError::NotAContainer(control.name.clone())),
        }
    }

    /// Children as seen by callers: a scroll panel reports its content's children
    pub fn children_of(&self, parent: ControlId) -> Result<&[ControlId], LayoutError> {
        let host = self.child_host(parent)?;
        Ok(self.get(host)?.children())
    }

    /// Append `child` to a container.
    ///
    /// Adding to an unsuspended auto-sizing container re-runs its layout.
    pub fn add_child(&mut self, parent: ControlId, child: ControlId) -> Result<(), LayoutError> {
        let host = self.child_host(parent)?;
        self.check_attachable(host, child)?;
        self.attach(host, child, Relation::Child);
        self.refresh_draw_positions(child)?;
        self.relayout_after_membership_change(parent, host)
    }

    /// Remove `child` from a container; returns false if it was not a child
    pub fn remove_child(&mut self, parent: ControlId, child: ControlId) -> Result<bool, LayoutError> {
        let host = self.child_host(parent)?;
        if !self.detach_child(host, child)? {
            return Ok(false);
        }
        self.relayout_after_membership_change(parent, host)?;
        Ok(true)
    }

    /// Remove every child of a container
    pub fn clear_children(&mut self, parent: ControlId) -> Result<(), LayoutError> {
        let host = self.child_host(parent)?;
        let children = self.get(host)?.children.clone();
        for child in children {
            self.detach_child(host, child)?;
        }
        self.relayout_after_membership_change(parent, host)
    }

    fn detach_child(&mut self, host: ControlId, child: ControlId) -> Result<bool, LayoutError> {
        let parent = self.get_mut(host)?;
        let Some(index) = parent.children.iter().position(|c| *c == child) else {
            return Ok(false);
        };
        parent.children.remove(index);
        self.detach(child)?;
        Ok(true)
    }

    fn relayout_after_membership_change(&mut self, parent: ControlId, host: ControlId) -> Result<(), LayoutError> {
        let control = self.get(host)?;
        if control.kind.auto_sizes() && !control.suspended {
            // A scroll panel lays out its content itself, keeping the scroll offset
            self.layout(parent, ConstraintCategory::ALL)?;
        }
        Ok(())
    }

    /// Move a child to `index` in its container's child list
    pub fn reorder_child(&mut self, parent: ControlId, child: ControlId, index: usize) -> Result<bool, LayoutError> {
        self.with_child_list(parent, child, |children, position| {
            let item = children.remove(position);
            let index = index.min(children.len());
            children.insert(index, item);
        })
    }

    /// Move a child to the end of the list, making it top-most
    pub fn move_child_to_front(&mut self, parent: ControlId, child: ControlId) -> Result<bool, LayoutError> {
        self.with_child_list(parent, child, |children, position| {
            let item = children.remove(position);
            children.push(item);
        })
    }

    /// Move a child to the start of the list, making it bottom-most
    pub fn move_child_to_back(&mut self, parent: ControlId, child: ControlId) -> Result<bool, LayoutError> {
        self.with_child_list(parent, child, |children, position| {
            let item = children.remove(position);
            children.insert(0, item);
        })
    }

    /// Move a child directly below `relative`
    pub fn move_child_before(
        &mut self,
        parent: ControlId,
        child: ControlId,
        relative: ControlId,
    ) -> Result<bool, LayoutError> {
        self.move_relative(parent, child, relative, 0)
    }

    /// Move a child directly above `relative`
    pub fn move_child_after(
        &mut self,
        parent: ControlId,
        child: ControlId,
        relative: ControlId,
    ) -> Result<bool, LayoutError> {
        self.move_relative(parent, child, relative, 1)
    }

    fn move_relative(
        &mut self,
        parent: ControlId,
        child: ControlId,
        relative: ControlId,
        offset: usize,
    ) -> Result<bool, LayoutError> {
        let host = self.child_host(parent)?;
        if child == relative || !self.get(host)?.children.contains(&relative) {
            return Ok(false);
        }
        self.with_child_list(parent, child, |children, position| {
            let item = children.remove(position);
            if let Some(anchor) = children.iter().position(|c| *c == relative) {
                children.insert(anchor + offset, item);
            }
        })
    }

    fn with_child_list(
        &mut self,
        parent: ControlId,
        child: ControlId,
        edit: impl FnOnce(&mut Vec<ControlId>, usize),
    ) -> Result<bool, LayoutError> {
        let host = self.child_host(parent)?;
        let control = self.get_mut(host)?;
        match control.children.iter().position(|c| *c == child) {
            Some(position) => {
                edit(&mut control.children, position);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Attach `decoration` to any control
    pub fn add_decoration(&mut self, control: ControlId, decoration: ControlId) -> Result<(), LayoutError> {
        self.check_attachable(control, decoration)?;
        self.attach(control, decoration, Relation::Decoration);
        self.refresh_draw_positions(decoration)
    }

    /// Detach a decoration; returns false if it was not attached to `control`
    pub fn remove_decoration(&mut self, control: ControlId, decoration: ControlId) -> Result<bool, LayoutError> {
        let owner = self.get_mut(control)?;
        let Some(index) = owner.decorations.iter().position(|d| *d == decoration) else {
            return Ok(false);
        };
        owner.decorations.remove(index);
        self.detach(decoration)?;
        Ok(true)
    }

    pub fn clear_decorations(&mut self, control: ControlId) -> Result<(), LayoutError> {
        let decorations = std::mem::take(&mut self.get_mut(control)?.decorations);
        for decoration in decorations {
            self.detach(decoration)?;
        }
        Ok(())
    }

    /// Decoration at `index`, if any
    pub fn decoration(&self, control: ControlId, index: usize) -> Option<ControlId> {
        self.control(control)
            .and_then(|c| c.decorations.get(index))
            .copied()
    }

    fn check_attachable(&self, owner: ControlId, control: ControlId) -> Result<(), LayoutError> {
        let attached = self.get(control)?;
        if let Some(existing) = attached.owner {
            return Err(LayoutError::AlreadyAttached {
                control: attached.name.clone(),
                owner: self.name(existing.id),
            });
        }
        // The new owner must not already sit below the control
        let mut cursor = Some(owner);
        while let Some(current) = cursor {
            if current == control {
                return Err(LayoutError::HierarchyCycle {
                    control: self.name(control),
                    owner: self.name(owner),
                });
            }
            cursor = self.get(current)?.parent();
        }
        Ok(())
    }

    fn attach(&mut self, owner: ControlId, control: ControlId, relation: Relation) {
        if let Ok(owner_control) = self.get_mut(owner) {
            match relation {
                Relation::Child => owner_control.children.push(control),
                Relation::Decoration => owner_control.decorations.push(control),
            }
        }
        if let Ok(attached) = self.get_mut(control) {
            attached.owner = Some(Owner { id: owner, relation });
        }
        self.roots.retain(|root| *root != control);
    }

    fn detach(&mut self, control: ControlId) -> Result<(), LayoutError> {
        self.get_mut(control)?.owner = None;
        self.roots.push(control);
        self.refresh_draw_positions(control)
    }

    pub fn set_visible(&mut self, id: ControlId, visible: bool) -> Result<(), LayoutError> {
        self.get_mut(id)?.visible = visible;
        Ok(())
    }

    /// Disabled controls are skipped by layout and hit testing
    pub fn set_enabled(&mut self, id: ControlId, enabled: bool) -> Result<(), LayoutError> {
        self.get_mut(id)?.enabled = enabled;
        Ok(())
    }

    pub fn set_name(&mut self, id: ControlId, name: impl Into<String>) -> Result<(), LayoutError> {
        self.get_mut(id)?.name = name.into();
        Ok(())
    }

    /// Whether `point` lies inside the control's bounds, edges inclusive
    pub fn bounds_contains(&self, id: ControlId, point: Vec2) -> Result<bool, LayoutError> {
        Ok(self.get(id)?.bounds().contains(point))
    }

    /// Convert a screen point into the control's local space
    pub fn point_to_client(&self, id: ControlId, point: Vec2) -> Result<Vec2, LayoutError> {
        Ok(point - self.get(id)?.draw_position)
    }

    /// The top-most visible, enabled control whose bounds contain `point`
    ///
    /// Later roots, later children and decorations are drawn above earlier
    /// ones and win.
    pub fn hit_test(&self, point: Vec2) -> Option<ControlId> {
        self.roots
            .iter()
            .rev()
            .find_map(|root| self.hit_test_from(*root, point))
    }

    fn hit_test_from(&self, id: ControlId, point: Vec2) -> Option<ControlId> {
        let control = self.control(id)?;
        if !control.visible || !control.enabled {
            return None;
        }
        let above = control.children.iter().rev().chain(control.decorations.iter().rev());
        for owned in above {
            if let Some(hit) = self.hit_test_from(*owned, point) {
                return Some(hit);
            }
        }
        control.bounds().contains(point).then_some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tree() -> ControlTree {
        ControlTree::new(Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_create_uses_kind_defaults() {
        let mut tree = tree();
        let button = tree.create("ok", KindTag::Button);
        let control = tree.get(button).unwrap();
        assert_eq!(control.size(), Vec2::new(80.0, 24.0));
        assert_eq!(control.normalized_origin(), Vec2::splat(0.5));
        assert_eq!(control.scale(), Vec2::ONE);
        assert_eq!(tree.roots(), &[button]);
    }

    #[test]
    fn test_destroyed_id_is_stale() {
        let mut tree = tree();
        let a = tree.create("a", KindTag::Label);
        tree.destroy(a).unwrap();
        let b = tree.create("b", KindTag::Label);
        assert!(!tree.contains(a));
        assert!(tree.contains(b));
        assert!(matches!(tree.get(a), Err(LayoutError::UnknownControl(_))));
    }

    #[test]
    fn test_destroy_is_recursive() {
        let mut tree = tree();
        let panel = tree.create("panel", KindTag::Panel);
        let child = tree.create("child", KindTag::Label);
        let icon = tree.create("icon", KindTag::Image);
        tree.add_child(panel, child).unwrap();
        tree.add_decoration(child, icon).unwrap();

        tree.destroy(panel).unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_add_child_requires_container() {
        let mut tree = tree();
        let label = tree.create("label", KindTag::Label);
        let other = tree.create("other", KindTag::Label);
        assert_eq!(
            tree.add_child(label, other),
            Err(LayoutError::NotAContainer("label".to_string()))
        );
    }

    #[test]
    fn test_single_owner() {
        let mut tree = tree();
        let a = tree.create("a", KindTag::Panel);
        let b = tree.create("b", KindTag::Panel);
        let child = tree.create("child", KindTag::Label);
        tree.add_child(a, child).unwrap();
        assert!(matches!(
            tree.add_child(b, child),
            Err(LayoutError::AlreadyAttached { .. })
        ));
        assert!(matches!(
            tree.add_decoration(b, child),
            Err(LayoutError::AlreadyAttached { .. })
        ));
    }

    #[test]
    fn test_hierarchy_cycle_rejected() {
        let mut tree = tree();
        let outer = tree.create("outer", KindTag::Panel);
        let inner = tree.create("inner", KindTag::Panel);
        tree.add_child(outer, inner).unwrap();
        assert!(matches!(
            tree.add_child(inner, outer),
            Err(LayoutError::HierarchyCycle { .. })
        ));
        assert!(matches!(
            tree.add_child(outer, outer),
            Err(LayoutError::HierarchyCycle { .. })
        ));
    }

    #[test]
    fn test_child_ordering() {
        let mut tree = tree();
        let panel = tree.create("panel", KindTag::Panel);
        let [a, b, c] = ["a", "b", "c"].map(|n| tree.create(n, KindTag::Label));
        for child in [a, b, c] {
            tree.add_child(panel, child).unwrap();
        }

        tree.move_child_to_front(panel, a).unwrap();
        assert_eq!(tree.children_of(panel).unwrap(), &[b, c, a]);

        tree.move_child_to_back(panel, c).unwrap();
        assert_eq!(tree.children_of(panel).unwrap(), &[c, b, a]);

        tree.move_child_before(panel, a, b).unwrap();
        assert_eq!(tree.children_of(panel).unwrap(), &[c, a, b]);

        tree.move_child_after(panel, c, b).unwrap();
        assert_eq!(tree.children_of(panel).unwrap(), &[a, b, c]);

        tree.reorder_child(panel, c, 0).unwrap();
        assert_eq!(tree.children_of(panel).unwrap(), &[c, a, b]);

        assert_eq!(tree.move_child_to_front(panel, panel), Ok(false));
    }

    #[test]
    fn test_remove_child_returns_to_roots() {
        let mut tree = tree();
        let panel = tree.create("panel", KindTag::Panel);
        let child = tree.create("child", KindTag::Label);
        tree.add_child(panel, child).unwrap();
        assert_eq!(tree.roots(), &[panel]);

        assert_eq!(tree.remove_child(panel, child), Ok(true));
        assert_eq!(tree.remove_child(panel, child), Ok(false));
        assert_eq!(tree.get(child).unwrap().parent(), None);
        assert_eq!(tree.roots(), &[panel, child]);
    }

    #[test]
    fn test_scroll_panel_redirects_children() {
        let mut tree = tree();
        let scroll = tree.create("list", KindTag::ScrollPanel);
        let item = tree.create("item", KindTag::Label);
        tree.add_child(scroll, item).unwrap();

        let content = tree.child_host(scroll).unwrap();
        assert_ne!(content, scroll);
        assert_eq!(tree.name(content), "list.content");
        assert_eq!(tree.children_of(scroll).unwrap(), &[item]);
        assert_eq!(tree.get(item).unwrap().parent(), Some(content));
    }

    #[test]
    fn test_scroll_content_pinned_top_left() {
        let mut tree = tree();
        let scroll = tree.create("list", KindTag::ScrollPanel);
        let content = tree.child_host(scroll).unwrap();

        let constraints = tree.get(content).unwrap().constraints();
        assert_eq!(constraints.len(), 2);
        for (constraint, edge) in constraints.iter().zip([Edge::LEFT, Edge::TOP]) {
            assert_eq!(constraint.control_edge(), edge);
            assert_eq!(constraint.anchor(), Some(scroll));
            assert_eq!(constraint.anchor_edge(), edge);
        }
    }

    #[test]
    fn test_decorations() {
        let mut tree = tree();
        let button = tree.create("button", KindTag::Button);
        let icon = tree.create("icon", KindTag::Image);
        tree.add_decoration(button, icon).unwrap();
        assert_eq!(tree.decoration(button, 0), Some(icon));
        assert_eq!(tree.decoration(button, 1), None);

        tree.clear_decorations(button).unwrap();
        assert_eq!(tree.decoration(button, 0), None);
        assert_eq!(tree.get(icon).unwrap().parent(), None);
    }

    #[test]
    fn test_find_by_name() {
        let mut tree = tree();
        let a = tree.create("alpha", KindTag::Label);
        assert_eq!(tree.find("alpha"), Some(a));
        assert_eq!(tree.find("beta"), None);
    }
}
