//! Output for laid-out control trees
//!
//! [`render_svg`] draws a wireframe of the resolved bounds; [`dump`] lists
//! positions and sizes as indented text.

pub mod config;
pub mod svg;
pub mod text;

pub use config::SvgConfig;
pub use svg::render_svg;
pub use text::dump;
