//! Plain-text dump of a laid-out control tree
//!
//! One line per control, indented by depth. Decorations are listed before
//! children and marked with `+`.

use std::fmt::Write;

use crate::layout::{ControlId, ControlTree, Relation};

/// Dump every control reachable from the tree's roots
pub fn dump(tree: &ControlTree) -> String {
    let mut out = String::new();
    for root in tree.roots() {
        dump_control(tree, *root, 0, &mut out);
    }
    out
}

fn dump_control(tree: &ControlTree, id: ControlId, depth: usize, out: &mut String) {
    let Some(control) = tree.control(id) else {
        return;
    };

    let marker = match control.owner().map(|o| o.relation) {
        Some(Relation::Decoration) => "+ ",
        _ => "",
    };
    let position = control.position();
    let size = control.size();
    let draw = control.draw_position();

    let _ = write!(
        out,
        "{}{}{} {} pos=({:.1}, {:.1}) size=({:.1}, {:.1}) draw=({:.1}, {:.1})",
        "  ".repeat(depth),
        marker,
        control.name(),
        control.kind().tag(),
        position.x,
        position.y,
        size.x,
        size.y,
        draw.x,
        draw.y
    );
    if !control.is_visible() {
        out.push_str(" hidden");
    }
    if !control.is_enabled() {
        out.push_str(" disabled");
    }
    out.push('\n');

    for owned in control.decorations().iter().chain(control.children()) {
        dump_control(tree, *owned, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{ConstraintCategory, Edge, KindTag, LayoutConfig, Vec2};

    #[test]
    fn test_dump_layout() {
        let config = LayoutConfig::default().with_default_origin(0.0, 0.0);
        let mut tree = ControlTree::with_config(Vec2::new(200.0, 100.0), config);
        let root = tree.create("root", KindTag::Panel);
        tree.set_auto_size(root, false).unwrap();
        tree.set_size(root, Vec2::new(100.0, 50.0)).unwrap();
        tree.set_position(root, Vec2::new(10.0, 10.0)).unwrap();
        let ok = tree.create("ok", KindTag::Button);
        tree.set_size(ok, Vec2::new(20.0, 10.0)).unwrap();
        tree.add_child(root, ok).unwrap();
        let icon = tree.create("icon", KindTag::Image);
        tree.set_size(icon, Vec2::new(4.0, 4.0)).unwrap();
        tree.add_decoration(ok, icon).unwrap();
        tree.set_visible(icon, false).unwrap();
        tree.add_constraint(ok, Edge::LEFT, Some(root), Edge::LEFT, 5.5, ConstraintCategory::ALL)
            .unwrap();
        tree.layout_all(ConstraintCategory::ALL).unwrap();

        assert_eq!(
            dump(&tree),
            "root panel pos=(10.0, 10.0) size=(100.0, 50.0) draw=(10.0, 10.0)\n\
             \x20\x20ok button pos=(5.5, 0.0) size=(20.0, 10.0) draw=(15.5, 10.0)\n\
             \x20\x20\x20\x20+ icon image pos=(0.0, 0.0) size=(4.0, 4.0) draw=(15.5, 10.0) hidden\n"
        );
    }
}
