//! Control Layout - edge-constraint layout for retained-mode UI controls
//!
//! This library provides a control tree whose edges are bound to edges of
//! other controls or of the viewport, a single-pass layout engine resolving
//! those bindings, and a small scene language to describe trees as text.
//!
//! # Example
//!
//! ```rust
//! use control_layout::render;
//!
//! let svg = render("panel root [autosize: false, width: 100, height: 50]").unwrap();
//! assert!(svg.contains("<svg"));
//! ```

pub mod error;
pub mod layout;
pub mod parser;
pub mod renderer;
pub mod scene;
pub mod widgets;

pub use error::ParseError;
pub use layout::lint::{LintCategory, LintWarning};
pub use layout::{
    ConstraintCategory, ConstraintError, ControlId, ControlTree, Edge, KindTag, LayoutConfig, LayoutError, Rect, Vec2,
};
pub use parser::{parse, Document};
pub use renderer::{dump, render_svg, SvgConfig};
pub use scene::{Scene, SceneError};
pub use widgets::{ScrollBars, ScrollWindow, Window};

use thiserror::Error;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error during parsing
    #[error("parse errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    /// Error while building the control tree
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),

    /// Error during layout
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
}

impl From<Vec<ParseError>> for RenderError {
    fn from(errors: Vec<ParseError>) -> Self {
        RenderError::Parse(errors)
    }
}

impl RenderError {
    /// Format the error with source context where a span is known
    pub fn format(&self, source: &str, filename: &str) -> String {
        match self {
            RenderError::Parse(errors) => errors
                .iter()
                .map(|e| e.format(source, filename))
                .collect::<Vec<_>>()
                .join("\n"),
            RenderError::Scene(err) => err.format(source, filename),
            RenderError::Layout(err) => format!("Error: {}\n", err),
        }
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// What the render pipeline produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Wireframe SVG of the laid-out bounds
    #[default]
    Svg,
    /// Indented text dump of positions and sizes
    Tree,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "svg" => Some(Self::Svg),
            "tree" => Some(Self::Tree),
            _ => None,
        }
    }
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Layout configuration
    pub layout: LayoutConfig,
    /// SVG output configuration
    pub svg: SvgConfig,
    pub format: OutputFormat,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Set the output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}

/// Parse scene source, build its control tree and lay it out
pub fn build_scene(source: &str, config: &LayoutConfig) -> Result<Scene, RenderError> {
    let doc = parse(source)?;
    let mut scene = Scene::build(&doc, config.clone())?;
    scene.layout()?;
    Ok(scene)
}

/// Render scene source to SVG with default configuration
///
/// This is the main entry point for the library. It parses the source,
/// builds and lays out the control tree, and draws the result.
///
/// # Example
///
/// ```rust
/// use control_layout::render;
///
/// let svg = render(r#"
///     panel root [autosize: false, width: 200, height: 100] {
///         button ok [width: 80, height: 24]
///         constrain ok.bottom_right = root.bottom_right + 8
///     }
/// "#).unwrap();
///
/// assert!(svg.contains(r#"data-name="ok""#));
/// ```
pub fn render(source: &str) -> Result<String, RenderError> {
    render_with_config(source, RenderConfig::default())
}

/// Render scene source with custom configuration
///
/// # Example
///
/// ```rust
/// use control_layout::{render_with_config, LayoutConfig, OutputFormat, RenderConfig};
///
/// let config = RenderConfig::new()
///     .with_layout(LayoutConfig::default().with_viewport(320.0, 240.0))
///     .with_format(OutputFormat::Tree);
///
/// let dump = render_with_config("label hello", config).unwrap();
/// assert!(dump.starts_with("hello label"));
/// ```
pub fn render_with_config(source: &str, config: RenderConfig) -> Result<String, RenderError> {
    let scene = build_scene(source, &config.layout)?;
    Ok(match config.format {
        OutputFormat::Svg => render_svg(scene.tree(), &config.svg),
        OutputFormat::Tree => dump(scene.tree()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_simple_control() {
        let svg = render("label hello").unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
        assert!(svg.contains(r#"data-name="hello""#));
    }

    #[test]
    fn test_render_tree_format() {
        let config = RenderConfig::new()
            .with_layout(LayoutConfig::default().with_default_origin(0.0, 0.0))
            .with_format(OutputFormat::Tree);
        let out = render_with_config(
            "panel root [autosize: false, width: 100, height: 100] { label a [width: 10, height: 10] constrain a.right = root.right }",
            config,
        )
        .unwrap();
        assert!(out.contains("  a label pos=(90.0, 0.0)"), "{}", out);
    }

    #[test]
    fn test_render_parse_error() {
        let err = render("panel {").unwrap_err();
        assert!(matches!(err, RenderError::Parse(_)));
        assert!(err.format("panel {", "scene.ui").contains("scene.ui"));
    }

    #[test]
    fn test_render_scene_error() {
        let err = render("constrain missing.left = viewport.left").unwrap_err();
        assert!(matches!(err, RenderError::Scene(SceneError::UndefinedControl { .. })));
    }

    #[test]
    fn test_strict_config_rejects_cycles() {
        let source = r#"
            label a
            label b
            constrain a.left = b.left
            constrain b.left = a.left
        "#;
        assert!(render(source).is_ok());

        let config = RenderConfig::new().with_layout(LayoutConfig::default().with_cycle_check(true));
        let err = render_with_config(source, config).unwrap_err();
        assert!(matches!(err, RenderError::Layout(LayoutError::CircularConstraint { .. })));
    }

    #[test]
    fn test_output_format_names() {
        assert_eq!(OutputFormat::from_name("svg"), Some(OutputFormat::Svg));
        assert_eq!(OutputFormat::from_name("tree"), Some(OutputFormat::Tree));
        assert_eq!(OutputFormat::from_name("png"), None);
    }
}
