//! One-shot build command.

use anyhow::Result;
use tessera_build::{build_site, SiteSettings};

/// Run a full build and report the result.
pub fn run(settings: &SiteSettings) -> Result<()> {
    tracing::info!("Building site...");

    let report = build_site(settings)?;

    tracing::info!(
        "Built {} templates, {} scripts, {} stylesheets; activated {} images, copied {} assets in {}ms",
        report.templates,
        report.scripts,
        report.styles,
        report.images,
        report.assets,
        report.duration_ms
    );
    tracing::info!("Build process completed successfully.");

    Ok(())
}
