//! Configuration for the layout engine
//!
//! Every field has a default, so a TOML file only needs the keys it changes:
//!
//! ```toml
//! check_cycles = true
//!
//! [viewport]
//! width = 1024
//! height = 768
//!
//! [sizes.button]
//! width = 96
//! height = 28
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::control::KindTag;
use super::types::Vec2;

/// Errors that can occur when loading a layout configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read layout config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse layout config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A width/height pair as written in TOML
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Default size of each control kind
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DefaultSizes {
    pub control: Extent,
    pub label: Extent,
    pub image: Extent,
    pub button: Extent,
    pub panel: Extent,
    pub scroll: Extent,
}

impl Default for DefaultSizes {
    fn default() -> Self {
        Self {
            control: Extent::new(100.0, 30.0),
            label: Extent::new(100.0, 20.0),
            image: Extent::new(32.0, 32.0),
            button: Extent::new(80.0, 24.0),
            panel: Extent::new(0.0, 0.0),
            scroll: Extent::new(200.0, 150.0),
        }
    }
}

impl DefaultSizes {
    pub fn for_kind(&self, kind: KindTag) -> Vec2 {
        let extent = match kind {
            KindTag::Control => self.control,
            KindTag::Label => self.label,
            KindTag::Image => self.image,
            KindTag::Button => self.button,
            KindTag::Panel => self.panel,
            KindTag::ScrollPanel => self.scroll,
        };
        extent.to_vec2()
    }
}

/// Window widget geometry
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub size: Extent,
    pub minimum_size: Extent,
    pub title_height: f64,
    pub footer_height: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            size: Extent::new(350.0, 250.0),
            minimum_size: Extent::new(200.0, 200.0),
            title_height: 20.0,
            footer_height: 20.0,
        }
    }
}

/// Configuration options for building and laying out control trees
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Viewport size used when the host supplies none
    pub viewport: Extent,

    /// Normalized origin given to new controls
    pub default_origin: (f64, f64),

    /// Size given to new controls of each kind
    pub sizes: DefaultSizes,

    /// Thickness of scroll window bars and the corner filler
    pub scroll_bar_thickness: f64,

    pub window: WindowConfig,

    /// Refuse to lay out trees with circular constraint dependencies
    pub check_cycles: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            viewport: Extent::new(800.0, 600.0),
            default_origin: (0.5, 0.5),
            sizes: DefaultSizes::default(),
            scroll_bar_thickness: 16.0,
            window: WindowConfig::default(),
            check_cycles: false,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Set the viewport size
    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport = Extent::new(width, height);
        self
    }

    /// Set the normalized origin of new controls
    pub fn with_default_origin(mut self, x: f64, y: f64) -> Self {
        self.default_origin = (x, y);
        self
    }

    /// Set the scroll bar thickness
    pub fn with_scroll_bar_thickness(mut self, thickness: f64) -> Self {
        self.scroll_bar_thickness = thickness;
        self
    }

    /// Enable or disable the cycle check before layout
    pub fn with_cycle_check(mut self, enabled: bool) -> Self {
        self.check_cycles = enabled;
        self
    }

    pub fn viewport_size(&self) -> Vec2 {
        self.viewport.to_vec2()
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.default_origin.0, self.default_origin.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LayoutConfig::default();
        assert_eq!(config.viewport_size(), Vec2::new(800.0, 600.0));
        assert_eq!(config.origin(), Vec2::splat(0.5));
        assert_eq!(config.scroll_bar_thickness, 16.0);
        assert_eq!(config.window.minimum_size, Extent::new(200.0, 200.0));
        assert!(!config.check_cycles);
    }

    #[test]
    fn test_builder_pattern() {
        let config = LayoutConfig::new()
            .with_viewport(1024.0, 768.0)
            .with_default_origin(0.0, 0.0)
            .with_cycle_check(true);

        assert_eq!(config.viewport_size(), Vec2::new(1024.0, 768.0));
        assert_eq!(config.origin(), Vec2::ZERO);
        assert!(config.check_cycles);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = LayoutConfig::from_toml(
            r#"
            check_cycles = true

            [viewport]
            width = 1280
            height = 720

            [sizes.button]
            width = 96
            height = 28
            "#,
        )
        .expect("Should parse");

        assert!(config.check_cycles);
        assert_eq!(config.viewport_size(), Vec2::new(1280.0, 720.0));
        assert_eq!(config.sizes.for_kind(KindTag::Button), Vec2::new(96.0, 28.0));
        assert_eq!(config.sizes.for_kind(KindTag::Label), Vec2::new(100.0, 20.0));
        assert_eq!(config.scroll_bar_thickness, 16.0);
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = LayoutConfig::from_toml("viewport = {{{");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
