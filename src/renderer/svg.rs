//! Wireframe SVG generation from a laid-out control tree

use crate::layout::{ControlId, ControlTree, Rect};

use super::SvgConfig;

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    elements: Vec<String>,
    captions: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            elements: vec![],
            captions: vec![],
            indent: 1,
        }
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    /// Add one control's bounds as a rectangle
    pub fn add_rect(&mut self, name: &str, bounds: &Rect, classes: &[String]) {
        let prefix = self.prefix();
        let class_list = std::iter::once(format!("{}control", prefix))
            .chain(classes.iter().map(|c| format!("{}{}", prefix, c)))
            .collect::<Vec<_>>()
            .join(" ");
        let name_attr = if name.is_empty() {
            String::new()
        } else {
            format!(r#" data-name="{}""#, escape_xml(name))
        };

        self.elements.push(format!(
            r#"{}<rect{} class="{}" x="{}" y="{}" width="{}" height="{}"/>"#,
            self.indent_str(),
            name_attr,
            class_list,
            bounds.x,
            bounds.y,
            bounds.width,
            bounds.height
        ));
    }

    /// Caption a rectangle with a name at its top-left corner
    pub fn add_caption(&mut self, text: &str, bounds: &Rect) {
        let prefix = self.prefix();
        self.captions.push(format!(
            r#"{}<text class="{}caption" x="{}" y="{}">{}</text>"#,
            self.indent_str(),
            prefix,
            bounds.x + 2.0,
            bounds.y + 10.0,
            escape_xml(text)
        ));
    }

    fn stylesheet(&self) -> String {
        let p = self.prefix();
        format!(
            ".{p}control {{ fill: none; stroke: #4a5568; stroke-width: 1; }} \
             .{p}panel, .{p}scroll {{ stroke-dasharray: 4 2; }} \
             .{p}button {{ fill: #edf2f7; }} \
             .{p}disabled {{ opacity: 0.4; }} \
             .{p}caption {{ font: 8px sans-serif; fill: #2d3748; }}"
        )
    }

    /// Build the final SVG string around `viewbox`
    pub fn build(self, viewbox: Rect) -> String {
        let padding = self.config.viewbox_padding;
        let vb_x = viewbox.x - padding;
        let vb_y = viewbox.y - padding;
        let vb_w = viewbox.width + 2.0 * padding;
        let vb_h = viewbox.height + 2.0 * padding;

        let nl = self.newline();

        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
            vb_x, vb_y, vb_w, vb_h
        ));
        svg.push_str(nl);

        svg.push_str(&format!("{}<style>{}</style>", self.indent_str(), self.stylesheet()));
        svg.push_str(nl);

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        // Captions go last so outlines never cover them
        for caption in &self.captions {
            svg.push_str(caption);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");
        svg.push_str(nl);
        svg
    }
}

/// Render every visible control of a laid-out tree as a wireframe SVG.
///
/// Controls are drawn in layout order: each control, then its decorations,
/// then its children. Hidden controls are skipped together with everything
/// they own. The viewBox covers the viewport and any bounds outside it.
pub fn render_svg(tree: &ControlTree, config: &SvgConfig) -> String {
    let mut builder = SvgBuilder::new(config.clone());
    let viewport = tree.viewport_size();
    let mut viewbox = Rect::new(0.0, 0.0, viewport.x, viewport.y);

    for root in tree.roots() {
        render_control(tree, *root, &mut builder, &mut viewbox);
    }

    builder.build(viewbox)
}

fn render_control(tree: &ControlTree, id: ControlId, builder: &mut SvgBuilder, viewbox: &mut Rect) {
    let Some(control) = tree.control(id) else {
        return;
    };
    if !control.is_visible() {
        return;
    }

    let bounds = control.bounds();
    let mut classes = vec![control.kind().tag().name().to_string()];
    if !control.is_enabled() {
        classes.push("disabled".to_string());
    }
    builder.add_rect(control.name(), &bounds, &classes);
    if builder.config.show_names && !control.name().is_empty() {
        builder.add_caption(control.name(), &bounds);
    }
    *viewbox = viewbox.union(&bounds);

    for owned in control.decorations().iter().chain(control.children()) {
        render_control(tree, *owned, builder, viewbox);
    }
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{ConstraintCategory, Edge, KindTag, LayoutConfig, Vec2};

    fn sample_tree() -> ControlTree {
        let config = LayoutConfig::default().with_default_origin(0.0, 0.0);
        let mut tree = ControlTree::with_config(Vec2::new(200.0, 100.0), config);
        let root = tree.create("root", KindTag::Panel);
        tree.set_auto_size(root, false).unwrap();
        tree.set_size(root, Vec2::new(100.0, 50.0)).unwrap();
        let ok = tree.create("ok", KindTag::Button);
        tree.set_size(ok, Vec2::new(20.0, 10.0)).unwrap();
        tree.add_child(root, ok).unwrap();
        tree.add_constraint(ok, Edge::BOTTOM_RIGHT, Some(root), Edge::BOTTOM_RIGHT, 5.0, ConstraintCategory::ALL)
            .unwrap();
        tree.layout_all(ConstraintCategory::ALL).unwrap();
        tree
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b"), "a &lt; b");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
    }

    #[test]
    fn test_render_wireframe() {
        let svg = render_svg(&sample_tree(), &SvgConfig::default());
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"viewBox="-10 -10 220 120""#));
        assert!(svg.contains(
            r#"<rect data-name="root" class="cl-control cl-panel" x="0" y="0" width="100" height="50"/>"#
        ));
        assert!(svg.contains(
            r#"<rect data-name="ok" class="cl-control cl-button" x="75" y="35" width="20" height="10"/>"#
        ));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_hidden_subtree_skipped() {
        let mut tree = sample_tree();
        let root = tree.find("root").unwrap();
        tree.set_visible(root, false).unwrap();
        let svg = render_svg(&tree, &SvgConfig::default());
        assert!(!svg.contains("<rect"));
    }

    #[test]
    fn test_names_and_prefix() {
        let config = SvgConfig::default().without_class_prefix().with_names(true).with_standalone(false);
        let svg = render_svg(&sample_tree(), &config);
        assert!(!svg.starts_with("<?xml"));
        assert!(svg.contains(r#"class="control button""#));
        assert!(svg.contains(r#"<text class="caption" x="77" y="45">ok</text>"#));
    }

    #[test]
    fn test_viewbox_grows_past_viewport() {
        let mut tree = sample_tree();
        let root = tree.find("root").unwrap();
        tree.set_position(root, Vec2::new(150.0, 0.0)).unwrap();
        let svg = render_svg(&tree, &SvgConfig::default().with_viewbox_padding(0.0));
        assert!(svg.contains(r#"viewBox="0 0 250 100""#));
    }
}
