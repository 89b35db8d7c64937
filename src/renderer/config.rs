//! Options for the wireframe SVG output

/// How [`render_svg`](super::render_svg) draws a laid-out tree
#[derive(Debug, Clone)]
pub struct SvgConfig {
    /// Space added around the union of viewport and drawn bounds
    pub viewbox_padding: f64,

    /// Emit the `<?xml ...?>` declaration
    pub standalone: bool,

    /// One element per line, indented
    pub pretty_print: bool,

    /// Prepended to every class name, `cl-` gives `cl-button`
    pub class_prefix: Option<String>,

    /// Write each control's name as a caption inside its rectangle
    pub show_names: bool,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            viewbox_padding: 10.0,
            standalone: true,
            pretty_print: true,
            class_prefix: Some("cl-".to_string()),
            show_names: false,
        }
    }
}

impl SvgConfig {
    pub fn with_viewbox_padding(mut self, padding: f64) -> Self {
        self.viewbox_padding = padding;
        self
    }

    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    /// Plain class names (`control`, `button`)
    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    pub fn with_names(mut self, show: bool) -> Self {
        self.show_names = show;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_draw_prefixed_pretty_svg() {
        let config = SvgConfig::default();
        assert_eq!(config.viewbox_padding, 10.0);
        assert!(config.standalone && config.pretty_print);
        assert_eq!(config.class_prefix.as_deref(), Some("cl-"));
        assert!(!config.show_names);
    }

    #[test]
    fn test_captioned_fragment() {
        let config = SvgConfig::default()
            .without_class_prefix()
            .with_standalone(false)
            .with_names(true);
        assert!(config.class_prefix.is_none());
        assert!(!config.standalone);
        assert!(config.show_names);
    }
}
