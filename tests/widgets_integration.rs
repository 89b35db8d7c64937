//! Composite widgets nested inside each other

use control_layout::{
    ConstraintCategory, ControlTree, Edge, KindTag, LayoutConfig, Rect, ScrollBars, ScrollWindow, Vec2, Window,
};

fn tree() -> ControlTree {
    let config = LayoutConfig::default().with_default_origin(0.0, 0.0);
    ControlTree::with_config(Vec2::new(800.0, 600.0), config)
}

fn local_rect(tree: &ControlTree, id: control_layout::ControlId) -> Rect {
    tree.control(id).unwrap().local_rect()
}

fn scroll_window_in_window(tree: &mut ControlTree) -> (Window, ScrollWindow) {
    let window = Window::build(tree, "main").unwrap();
    let files = ScrollWindow::build(tree, "files", ScrollBars::Both).unwrap();
    tree.add_child(window.body, files.root).unwrap();
    tree.add_constraint(files.root, Edge::DOCK, Some(window.body), Edge::DOCK, 0.0, ConstraintCategory::ALL)
        .unwrap();
    tree.layout(window.root, ConstraintCategory::ALL).unwrap();
    (window, files)
}

#[test]
fn test_scroll_window_docked_in_body() {
    let mut tree = tree();
    let (window, files) = scroll_window_in_window(&mut tree);

    assert_eq!(local_rect(&tree, window.body), Rect::new(0.0, 20.0, 350.0, 210.0));
    assert_eq!(local_rect(&tree, files.root), Rect::new(0.0, 0.0, 350.0, 210.0));
    assert_eq!(
        tree.control(files.root).unwrap().draw_position(),
        Vec2::new(0.0, 20.0)
    );
}

#[test]
fn test_small_content_keeps_bars_hidden() {
    let mut tree = tree();
    let (_, files) = scroll_window_in_window(&mut tree);
    let item = tree.create("item", KindTag::Image);
    tree.add_child(files.scroll, item).unwrap();
    files.refresh_scroll_bars(&mut tree).unwrap();

    for bar in [files.vertical_bar, files.horizontal_bar, files.filler] {
        assert!(!tree.control(bar.unwrap()).unwrap().is_visible());
    }
    assert_eq!(local_rect(&tree, files.scroll), Rect::new(1.0, 1.0, 348.0, 208.0));
    assert_eq!(files.scroll_bar_values(&tree).unwrap(), Vec2::ZERO);
}

#[test]
fn test_wide_content_shows_horizontal_bar() {
    let mut tree = tree();
    let (_, files) = scroll_window_in_window(&mut tree);
    let item = tree.create("item", KindTag::Control);
    tree.set_size(item, Vec2::new(500.0, 100.0)).unwrap();
    tree.add_child(files.scroll, item).unwrap();
    files.refresh_scroll_bars(&mut tree).unwrap();

    assert!(tree.control(files.horizontal_bar.unwrap()).unwrap().is_visible());
    assert!(!tree.control(files.vertical_bar.unwrap()).unwrap().is_visible());
    assert!(!tree.control(files.filler.unwrap()).unwrap().is_visible());

    // Scroll half way across the overflow
    let content = tree.child_host(files.scroll).unwrap();
    let overflow = tree.control(content).unwrap().size().x - tree.control(files.scroll).unwrap().size().x;
    assert!(overflow > 0.0);
    tree.scroll_to(files.scroll, Vec2::new(-overflow / 2.0, 0.0)).unwrap();
    assert_eq!(files.scroll_bar_values(&tree).unwrap(), Vec2::new(0.5, 0.0));
}

#[test]
fn test_resizing_window_reflows_nested_widgets() {
    let mut tree = tree();
    let (window, files) = scroll_window_in_window(&mut tree);

    tree.set_size(window.root, Vec2::new(500.0, 400.0)).unwrap();
    tree.layout(window.root, ConstraintCategory::ALL).unwrap();

    assert_eq!(local_rect(&tree, window.footer), Rect::new(0.0, 380.0, 500.0, 20.0));
    assert_eq!(local_rect(&tree, files.root), Rect::new(0.0, 0.0, 500.0, 360.0));
}
