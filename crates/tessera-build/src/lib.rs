//! Build pipeline for tessera theme assets.
//!
//! Renders templates, copies scripts, compiles SCSS, activates responsive
//! image markup and copies static assets into the configured build
//! directories.

pub mod assets;
pub mod error;
pub mod pipeline;
pub mod scripts;
pub mod settings;
pub mod styles;
pub mod templates;

pub use error::BuildError;
pub use pipeline::{build_site, reset_dir, BuildReport};
pub use settings::{DirPair, SettingsError, SiteSettings};
