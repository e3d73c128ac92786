//! Build orchestration.

use std::fs;
use std::path::Path;
use std::time::Instant;

use tessera_images::Activator;

use crate::error::BuildError;
use crate::settings::SiteSettings;
use crate::{assets, scripts, styles, templates};

/// Counts from a completed build.
#[derive(Debug)]
pub struct BuildReport {
    /// Rendered template pages
    pub templates: usize,

    /// Copied script files
    pub scripts: usize,

    /// Compiled stylesheets
    pub styles: usize,

    /// Activated image elements
    pub images: usize,

    /// Copied asset files
    pub assets: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,
}

/// Run the full build: reset template output, pre-create configured
/// directories, then templates → scripts → styles → image activation →
/// assets. Stage order is significant; later stages may read earlier
/// outputs. The first stage error aborts the run.
pub fn build_site(settings: &SiteSettings) -> Result<BuildReport, BuildError> {
    let start = Instant::now();

    for pair in &settings.templates {
        reset_dir(&pair.build_dir)?;
    }

    for dir in &settings.directories {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| BuildError::directory(dir, e))?;
            tracing::debug!("Directory created: {}", dir.display());
        }
    }

    let templates = templates::build_templates(settings)?;
    tracing::info!("Templates built successfully.");

    let scripts = scripts::build_scripts(settings)?;
    tracing::info!("Scripts built successfully.");

    let styles = styles::build_styles(settings)?;
    tracing::info!("Styles built successfully.");

    let images = activate_images(settings)?;

    let assets = assets::copy_assets(settings)?;

    Ok(BuildReport {
        templates,
        scripts,
        styles,
        images,
        assets,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Rewrite responsive image markup in the built template output.
pub fn activate_images(settings: &SiteSettings) -> Result<usize, BuildError> {
    let activator = Activator::new(settings.image_path.clone());
    let mut activated = 0;
    for pair in &settings.templates {
        activated += activator.activate_dir(&pair.build_dir)?;
    }
    if activated > 0 {
        tracing::info!("Activated {} image elements.", activated);
    }
    Ok(activated)
}

/// Delete and recreate a build directory.
pub fn reset_dir(dir: &Path) -> Result<(), BuildError> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|e| BuildError::directory(dir, e))?;
        tracing::debug!("Directory cleared: {}", dir.display());
    }
    fs::create_dir_all(dir).map_err(|e| BuildError::directory(dir, e))?;
    tracing::debug!("Directory created: {}", dir.display());
    Ok(())
}
