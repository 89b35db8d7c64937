//! Composite widgets assembled from plain controls and edge constraints
//!
//! Nothing here has layout logic of its own. A [`Window`] is a fixed-size
//! panel whose title, body and footer are pinned with Top/Horizontal/Bottom
//! constraints; a [`ScrollWindow`] wraps a scroll panel with scroll bars that
//! hide themselves when the content fits. Hidden bars keep their position, so
//! the constraints that reference them still resolve to the window edge.

use log::debug;

use crate::layout::{ConstraintCategory, ControlId, ControlTree, Edge, KindTag, LayoutError, Vec2};

/// A window panel with title, body and footer areas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub root: ControlId,
    pub title: ControlId,
    pub body: ControlId,
    pub footer: ControlId,
}

impl Window {
    /// Build a window named `name` sized from the tree's window configuration
    pub fn build(tree: &mut ControlTree, name: &str) -> Result<Self, LayoutError> {
        let config = tree.config().window.clone();

        let root = fixed_panel(tree, name.to_string(), config.size.to_vec2())?;
        tree.set_minimum_size(root, config.minimum_size.to_vec2())?;

        let title = fixed_panel(tree, format!("{}.title", name), Vec2::new(0.0, config.title_height))?;
        let footer = fixed_panel(tree, format!("{}.footer", name), Vec2::new(0.0, config.footer_height))?;
        let body = fixed_panel(tree, format!("{}.body", name), Vec2::ZERO)?;

        // Body is laid out last so title and footer are already in place
        for area in [title, footer, body] {
            tree.add_child(root, area)?;
        }

        bind(tree, title, Edge::TOP, Some(root), Edge::TOP, 0.0)?;
        bind(tree, title, Edge::HORIZONTAL, Some(root), Edge::HORIZONTAL, 0.0)?;

        bind(tree, footer, Edge::BOTTOM, Some(root), Edge::BOTTOM, 0.0)?;
        bind(tree, footer, Edge::HORIZONTAL, Some(root), Edge::HORIZONTAL, 0.0)?;

        bind(tree, body, Edge::TOP, Some(title), Edge::BOTTOM, 0.0)?;
        bind(tree, body, Edge::HORIZONTAL, Some(root), Edge::HORIZONTAL, 0.0)?;
        bind(tree, body, Edge::BOTTOM, Some(footer), Edge::TOP, 0.0)?;

        debug!("built window '{}'", name);
        tree.layout(root, ConstraintCategory::ALL)?;
        Ok(Self {
            root,
            title,
            body,
            footer,
        })
    }
}

/// Which scroll bars a [`ScrollWindow`] carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBars {
    Vertical,
    Horizontal,
    #[default]
    Both,
}

impl ScrollBars {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "vertical" => Some(Self::Vertical),
            "horizontal" => Some(Self::Horizontal),
            "both" => Some(Self::Both),
            _ => None,
        }
    }

    fn vertical(self) -> bool {
        matches!(self, Self::Vertical | Self::Both)
    }

    fn horizontal(self) -> bool {
        matches!(self, Self::Horizontal | Self::Both)
    }
}

/// A scroll panel framed by scroll bars and a corner filler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollWindow {
    pub root: ControlId,
    pub scroll: ControlId,
    pub vertical_bar: Option<ControlId>,
    pub horizontal_bar: Option<ControlId>,
    /// Corner between the two bars, only present with both
    pub filler: Option<ControlId>,
}

impl ScrollWindow {
    /// Build a scroll window named `name`; children go into [`ScrollWindow::scroll`]
    pub fn build(tree: &mut ControlTree, name: &str, bars: ScrollBars) -> Result<Self, LayoutError> {
        let thickness = tree.config().scroll_bar_thickness;
        let size = tree.config().sizes.for_kind(KindTag::ScrollPanel);
        let bar = Vec2::splat(thickness);

        let root = fixed_panel(tree, name.to_string(), size)?;

        let filler = match bars {
            ScrollBars::Both => Some(leaf(tree, format!("{}.filler", name), bar)?),
            _ => None,
        };
        let vertical_bar = if bars.vertical() {
            Some(leaf(tree, format!("{}.vbar", name), bar)?)
        } else {
            None
        };
        let horizontal_bar = if bars.horizontal() {
            Some(leaf(tree, format!("{}.hbar", name), bar)?)
        } else {
            None
        };
        let scroll = tree.create(format!("{}.scroll", name), KindTag::ScrollPanel);

        for child in [filler, vertical_bar, horizontal_bar, Some(scroll)].into_iter().flatten() {
            tree.add_child(root, child)?;
        }

        if let Some(filler) = filler {
            bind(tree, filler, Edge::BOTTOM_RIGHT, Some(root), Edge::BOTTOM_RIGHT, 0.0)?;
        }

        if let Some(vbar) = vertical_bar {
            bind(tree, vbar, Edge::TOP_RIGHT, Some(root), Edge::TOP_RIGHT, 0.0)?;
            match filler {
                Some(filler) => bind(tree, vbar, Edge::BOTTOM, Some(filler), Edge::TOP, 0.0)?,
                None => bind(tree, vbar, Edge::BOTTOM, Some(root), Edge::BOTTOM, 0.0)?,
            }
        }

        if let Some(hbar) = horizontal_bar {
            bind(tree, hbar, Edge::BOTTOM_LEFT, Some(root), Edge::BOTTOM_LEFT, 0.0)?;
            match filler {
                Some(filler) => bind(tree, hbar, Edge::RIGHT, Some(filler), Edge::LEFT, 0.0)?,
                None => bind(tree, hbar, Edge::RIGHT, Some(root), Edge::RIGHT, 0.0)?,
            }
        }

        // One unit of inset on every side
        bind(tree, scroll, Edge::LEFT, Some(root), Edge::LEFT, 1.0)?;
        bind(tree, scroll, Edge::TOP, Some(root), Edge::TOP, 1.0)?;
        match vertical_bar {
            Some(vbar) => bind(tree, scroll, Edge::RIGHT, Some(vbar), Edge::LEFT, -1.0)?,
            None => bind(tree, scroll, Edge::RIGHT, Some(root), Edge::RIGHT, 1.0)?,
        }
        match horizontal_bar {
            Some(hbar) => bind(tree, scroll, Edge::BOTTOM, Some(hbar), Edge::TOP, -1.0)?,
            None => bind(tree, scroll, Edge::BOTTOM, Some(root), Edge::BOTTOM, 1.0)?,
        }

        debug!("built scroll window '{}' ({:?})", name, bars);
        let window = Self {
            root,
            scroll,
            vertical_bar,
            horizontal_bar,
            filler,
        };
        window.refresh_scroll_bars(tree)?;
        Ok(window)
    }

    /// Show each bar only while the content overflows the window on its axis
    pub fn refresh_scroll_bars(&self, tree: &mut ControlTree) -> Result<(), LayoutError> {
        tree.layout(self.root, ConstraintCategory::ALL)?;

        let content = tree.get(tree.child_host(self.scroll)?)?.size();
        let window = tree.get(self.root)?.size();
        let show_vertical = self.vertical_bar.is_some() && content.y > window.y;
        let show_horizontal = self.horizontal_bar.is_some() && content.x > window.x;

        if let Some(vbar) = self.vertical_bar {
            tree.set_visible(vbar, show_vertical)?;
        }
        if let Some(hbar) = self.horizontal_bar {
            tree.set_visible(hbar, show_horizontal)?;
        }
        if let Some(filler) = self.filler {
            tree.set_visible(filler, show_vertical && show_horizontal)?;
        }
        debug!(
            "'{}' scroll bars: vertical {}, horizontal {}",
            tree.name(self.root),
            show_vertical,
            show_horizontal
        );

        tree.layout(self.root, ConstraintCategory::ALL)
    }

    /// Normalized bar positions in `0..=1`; an axis that cannot scroll reads 0
    pub fn scroll_bar_values(&self, tree: &ControlTree) -> Result<Vec2, LayoutError> {
        let content = tree.get(tree.child_host(self.scroll)?)?;
        let panel = tree.get(self.scroll)?;
        let overflow = content.size() - panel.size();
        let value = |offset: f64, overflow: f64| {
            if overflow <= 0.0 {
                0.0
            } else {
                offset / -overflow
            }
        };
        Ok(Vec2::new(
            value(content.position().x, overflow.x),
            value(content.position().y, overflow.y),
        ))
    }
}

fn fixed_panel(tree: &mut ControlTree, name: String, size: Vec2) -> Result<ControlId, LayoutError> {
    let panel = tree.create(name, KindTag::Panel);
    tree.set_auto_size(panel, false)?;
    tree.set_size(panel, size)?;
    Ok(panel)
}

fn leaf(tree: &mut ControlTree, name: String, size: Vec2) -> Result<ControlId, LayoutError> {
    let control = tree.create(name, KindTag::Control);
    tree.set_size(control, size)?;
    Ok(control)
}

fn bind(
    tree: &mut ControlTree,
    id: ControlId,
    edge: Edge,
    anchor: Option<ControlId>,
    anchor_edge: Edge,
    distance: f64,
) -> Result<(), LayoutError> {
    tree.add_constraint(id, edge, anchor, anchor_edge, distance, ConstraintCategory::ALL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Rect;
    use pretty_assertions::assert_eq;

    fn tree() -> ControlTree {
        ControlTree::new(Vec2::new(800.0, 600.0))
    }

    fn rect(tree: &ControlTree, id: ControlId) -> Rect {
        tree.get(id).unwrap().local_rect()
    }

    #[test]
    fn test_window_areas() {
        let mut tree = tree();
        let window = Window::build(&mut tree, "win").unwrap();

        assert_eq!(rect(&tree, window.title), Rect::new(0.0, 0.0, 350.0, 20.0));
        assert_eq!(rect(&tree, window.footer), Rect::new(0.0, 230.0, 350.0, 20.0));
        assert_eq!(rect(&tree, window.body), Rect::new(0.0, 20.0, 350.0, 210.0));
    }

    #[test]
    fn test_window_respects_minimum_size() {
        let mut tree = tree();
        let window = Window::build(&mut tree, "win").unwrap();
        tree.set_size(window.root, Vec2::new(150.0, 150.0)).unwrap();

        assert_eq!(tree.get(window.root).unwrap().size(), Vec2::new(200.0, 200.0));
        assert_eq!(rect(&tree, window.body), Rect::new(0.0, 20.0, 200.0, 160.0));
    }

    #[test]
    fn test_scroll_window_without_overflow_hides_bars() {
        let mut tree = tree();
        let window = ScrollWindow::build(&mut tree, "list", ScrollBars::Both).unwrap();
        let item = tree.create("item", KindTag::Image);
        tree.add_child(window.scroll, item).unwrap();
        window.refresh_scroll_bars(&mut tree).unwrap();

        for bar in [window.vertical_bar, window.horizontal_bar, window.filler] {
            assert!(!tree.get(bar.unwrap()).unwrap().is_visible());
        }
        // Hidden bars add their size back, so the panel reaches the far edge
        assert_eq!(rect(&tree, window.scroll), Rect::new(1.0, 1.0, 198.0, 148.0));
    }

    #[test]
    fn test_scroll_window_with_overflow_shows_bars() {
        let mut tree = tree();
        let window = ScrollWindow::build(&mut tree, "list", ScrollBars::Both).unwrap();
        let item = tree.create("item", KindTag::Control);
        tree.set_size(item, Vec2::new(300.0, 400.0)).unwrap();
        tree.add_child(window.scroll, item).unwrap();
        window.refresh_scroll_bars(&mut tree).unwrap();

        let filler = window.filler.unwrap();
        assert!(tree.get(filler).unwrap().is_visible());
        assert_eq!(rect(&tree, filler), Rect::new(184.0, 134.0, 16.0, 16.0));
        assert_eq!(rect(&tree, window.vertical_bar.unwrap()), Rect::new(184.0, 0.0, 16.0, 134.0));
        assert_eq!(rect(&tree, window.horizontal_bar.unwrap()), Rect::new(0.0, 134.0, 184.0, 16.0));
        assert_eq!(rect(&tree, window.scroll), Rect::new(1.0, 1.0, 182.0, 132.0));
    }

    #[test]
    fn test_vertical_overflow_only() {
        let mut tree = tree();
        let window = ScrollWindow::build(&mut tree, "list", ScrollBars::Both).unwrap();
        let item = tree.create("item", KindTag::Control);
        tree.set_size(item, Vec2::new(100.0, 400.0)).unwrap();
        tree.add_child(window.scroll, item).unwrap();
        window.refresh_scroll_bars(&mut tree).unwrap();

        assert!(tree.get(window.vertical_bar.unwrap()).unwrap().is_visible());
        assert!(!tree.get(window.horizontal_bar.unwrap()).unwrap().is_visible());
        // The vertical bar runs past the hidden filler to the bottom edge
        assert_eq!(rect(&tree, window.vertical_bar.unwrap()), Rect::new(184.0, 0.0, 16.0, 150.0));
        assert_eq!(rect(&tree, window.scroll), Rect::new(1.0, 1.0, 182.0, 148.0));
    }

    #[test]
    fn test_scroll_bar_values() {
        let mut tree = tree();
        let window = ScrollWindow::build(&mut tree, "list", ScrollBars::Both).unwrap();
        let item = tree.create("item", KindTag::Control);
        tree.set_size(item, Vec2::new(300.0, 400.0)).unwrap();
        tree.add_child(window.scroll, item).unwrap();
        window.refresh_scroll_bars(&mut tree).unwrap();
        assert_eq!(window.scroll_bar_values(&tree).unwrap(), Vec2::ZERO);

        tree.scroll_to(window.scroll, Vec2::new(-59.0, -134.0)).unwrap();
        assert_eq!(window.scroll_bar_values(&tree).unwrap(), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_single_bar_has_no_filler() {
        let mut tree = tree();
        let window = ScrollWindow::build(&mut tree, "list", ScrollBars::Vertical).unwrap();
        assert!(window.filler.is_none());
        assert!(window.horizontal_bar.is_none());
        assert_eq!(tree.children_of(window.root).unwrap().len(), 2);
    }
}
