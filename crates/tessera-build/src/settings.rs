//! Site settings loading.
//!
//! Settings are an explicit immutable value passed by argument into every
//! builder; nothing reads configuration from shared process state.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// A source/build directory pair.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DirPair {
    pub src_dir: PathBuf,
    pub build_dir: PathBuf,
}

/// Site configuration (`site.toml`).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SiteSettings {
    /// Source tree root, used to resolve `site_thumb`.
    #[serde(default = "default_src_dir")]
    pub src_dir: PathBuf,

    /// Directories pre-created before building.
    #[serde(default)]
    pub directories: Vec<PathBuf>,

    #[serde(default = "default_templates")]
    pub templates: Vec<DirPair>,

    #[serde(default = "default_scripts")]
    pub scripts: Vec<DirPair>,

    #[serde(default = "default_stylesheets")]
    pub stylesheets: Vec<DirPair>,

    #[serde(default = "default_assets")]
    pub assets: Vec<DirPair>,

    /// Site thumbnail, relative to `src_dir`.
    #[serde(default)]
    pub site_thumb: Option<PathBuf>,

    /// URL prefix for bare `data-bg` image paths.
    #[serde(default = "default_image_path")]
    pub image_path: String,

    /// Named viewport breakpoints, exposed to templates.
    #[serde(default = "default_breakpoints")]
    pub breakpoints: BTreeMap<String, u32>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            src_dir: default_src_dir(),
            directories: Vec::new(),
            templates: default_templates(),
            scripts: default_scripts(),
            stylesheets: default_stylesheets(),
            assets: default_assets(),
            site_thumb: None,
            image_path: default_image_path(),
            breakpoints: default_breakpoints(),
        }
    }
}

fn default_src_dir() -> PathBuf {
    PathBuf::from("src")
}

fn default_templates() -> Vec<DirPair> {
    vec![DirPair {
        src_dir: PathBuf::from("src/templates"),
        build_dir: PathBuf::from("build"),
    }]
}

fn default_scripts() -> Vec<DirPair> {
    vec![DirPair {
        src_dir: PathBuf::from("src/js"),
        build_dir: PathBuf::from("build/js"),
    }]
}

fn default_stylesheets() -> Vec<DirPair> {
    vec![DirPair {
        src_dir: PathBuf::from("src/scss"),
        build_dir: PathBuf::from("build/css"),
    }]
}

fn default_assets() -> Vec<DirPair> {
    vec![DirPair {
        src_dir: PathBuf::from("src/images"),
        build_dir: PathBuf::from("build/images"),
    }]
}

fn default_image_path() -> String {
    "/images/".to_string()
}

fn default_breakpoints() -> BTreeMap<String, u32> {
    BTreeMap::from([
        ("xs".to_string(), 0),
        ("s".to_string(), 641),
        ("m".to_string(), 1025),
        ("l".to_string(), 1321),
        ("xl".to_string(), 1921),
    ])
}

/// Errors that can occur loading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

impl SiteSettings {
    /// Load settings from a TOML file, falling back to defaults when the
    /// file does not exist. A present but malformed file is an error.
    pub fn load(path: &Path) -> Result<SiteSettings, SettingsError> {
        if !path.exists() {
            tracing::info!("No {} found, using default settings", path.display());
            return Ok(SiteSettings::default());
        }

        let content = fs::read_to_string(path).map_err(|e| SettingsError::Read {
            path: path.display().to_string(),
            source: e,
        })?;

        let settings: SiteSettings =
            toml::from_str(&content).map_err(|e| SettingsError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        tracing::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}
