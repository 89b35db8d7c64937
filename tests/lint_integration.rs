//! Integration tests for layout diagnostics

use control_layout::layout::lint;
use control_layout::{build_scene, ConstraintCategory, ControlTree, Edge, KindTag, LayoutConfig, LintCategory, Vec2};

fn categories(warnings: &[control_layout::LintWarning]) -> Vec<String> {
    warnings.iter().map(|w| w.category.to_string()).collect()
}

#[test]
fn test_true_positives_all_categories() {
    let source = include_str!("fixtures/lint-positives.ui");
    // Cycles are tolerated unless the cycle check is switched on
    let scene = build_scene(source, &LayoutConfig::default()).expect("Should build");
    let warnings = lint::check(scene.tree());

    let categories = categories(&warnings);
    for expected in ["cycle", "distant-anchor", "stretch", "containment"] {
        assert!(
            categories.contains(&expected.to_string()),
            "Expected {} warning, got: {:?}",
            expected,
            categories
        );
    }

    let cycle = warnings
        .iter()
        .find(|w| w.category == LintCategory::Cycle)
        .expect("cycle warning");
    assert!(cycle.message.contains("a -> b -> a") || cycle.message.contains("b -> a -> b"));
}

#[test]
fn test_true_negatives_clean() {
    for source in [
        include_str!("fixtures/dialog.ui"),
        include_str!("fixtures/scroll-list.ui"),
    ] {
        let scene = build_scene(source, &LayoutConfig::default()).expect("Should build");
        let warnings = lint::check(scene.tree());
        assert!(
            warnings.is_empty(),
            "Expected no warnings, got: {:?}",
            warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>()
        );
    }
}

#[test]
fn test_strict_mode_rejects_cycles() {
    let source = include_str!("fixtures/lint-positives.ui");
    let config = LayoutConfig::default().with_cycle_check(true);
    let err = build_scene(source, &config).unwrap_err();
    assert!(err.to_string().contains("circular constraint dependency"), "{}", err);
}

#[test]
fn test_destroyed_anchor_reported_and_skipped() {
    let mut tree = ControlTree::with_config(
        Vec2::new(400.0, 300.0),
        LayoutConfig::default().with_default_origin(0.0, 0.0),
    );
    let a = tree.create("a", KindTag::Label);
    let b = tree.create("b", KindTag::Label);
    tree.add_constraint(b, Edge::LEFT, Some(a), Edge::RIGHT, 10.0, ConstraintCategory::ALL)
        .unwrap();
    tree.add_constraint(b, Edge::TOP, None, Edge::TOP, 5.0, ConstraintCategory::ALL)
        .unwrap();
    tree.layout_all(ConstraintCategory::ALL).unwrap();
    assert_eq!(tree.control(b).unwrap().position(), Vec2::new(90.0, 5.0));

    tree.destroy(a).unwrap();
    tree.set_position(b, Vec2::ZERO).unwrap();
    tree.layout_all(ConstraintCategory::ALL).unwrap();
    // The dangling constraint is skipped; the viewport one still applies
    assert_eq!(tree.control(b).unwrap().position(), Vec2::new(0.0, 5.0));

    let warnings = lint::check(&tree);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].category, LintCategory::DanglingAnchor);
}
