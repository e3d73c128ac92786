//! Build-and-watch command.

use std::time::Duration;

use anyhow::Result;
use tessera_build::{pipeline, scripts, styles, templates, SiteSettings};
use tessera_watch::{Category, Debouncer, FileWatcher};

/// How long to wait after the last change before rebuilding a category.
const REBUILD_DELAY: Duration = Duration::from_millis(250);

/// Build once, then stay resident rebuilding categories as their sources
/// change. A failed build is logged; the process keeps watching.
pub async fn run(settings: SiteSettings) -> Result<()> {
    if let Err(e) = super::build::run(&settings) {
        tracing::error!("Error during build process: {:#}", e);
    }

    tracing::info!("Setting up file watchers for development...");

    let mut roots = Vec::new();
    for pair in &settings.templates {
        roots.push((Category::Templates, pair.src_dir.clone()));
    }
    for pair in &settings.scripts {
        roots.push((Category::Scripts, pair.src_dir.clone()));
    }
    for pair in &settings.stylesheets {
        roots.push((Category::Styles, pair.src_dir.clone()));
    }

    let (_watcher, mut rx) = FileWatcher::new(&roots)?;

    // One debouncer per category: a burst of change events inside the delay
    // window produces a single rebuild of that category.
    let mut template_rebuilds = Debouncer::new(REBUILD_DELAY);
    let mut script_rebuilds = Debouncer::new(REBUILD_DELAY);
    let mut style_rebuilds = Debouncer::new(REBUILD_DELAY);

    tracing::info!("File watchers active. Press Ctrl+C to stop.");

    while let Some(event) = rx.recv().await {
        tracing::info!(
            "Change detected in {}: {}",
            event.category.as_str(),
            event.path.display()
        );

        let debouncer = match event.category {
            Category::Templates => &mut template_rebuilds,
            Category::Scripts => &mut script_rebuilds,
            Category::Styles => &mut style_rebuilds,
        };

        let category = event.category;
        let settings = settings.clone();
        debouncer.trigger(async move {
            rebuild(category, &settings);
        });
    }

    Ok(())
}

/// Rebuild a single category. Template rebuilds re-run the image activation
/// pass, since the rendered output was just replaced.
fn rebuild(category: Category, settings: &SiteSettings) {
    let result = match category {
        Category::Templates => templates::build_templates(settings)
            .and_then(|count| pipeline::activate_images(settings).map(|_| count)),
        Category::Scripts => scripts::build_scripts(settings),
        Category::Styles => styles::build_styles(settings),
    };

    match result {
        Ok(count) => tracing::info!("Rebuilt {} ({} files)", category.as_str(), count),
        Err(e) => tracing::error!("Error rebuilding {}: {}", category.as_str(), e),
    }
}
