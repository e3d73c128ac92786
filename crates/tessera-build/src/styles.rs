//! Stylesheet building.
//!
//! Compiles every standalone `.scss` file in the configured source
//! directories with compressed output. Files named with a leading underscore
//! are partials and never compile standalone. Each file's compile and write
//! are isolated: a failure is logged and does not abort sibling files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::BuildError;
use crate::settings::{DirPair, SiteSettings};

/// Build every configured stylesheet pair. Returns the number of compiled
/// files.
pub fn build_styles(settings: &SiteSettings) -> Result<usize, BuildError> {
    let mut compiled = 0;
    for pair in &settings.stylesheets {
        compiled += build_pair(pair)?;
    }
    Ok(compiled)
}

fn build_pair(pair: &DirPair) -> Result<usize, BuildError> {
    let entries = match fs::read_dir(&pair.src_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(
                "Cannot read stylesheet directory {}: {}",
                pair.src_dir.display(),
                e
            );
            return Ok(0);
        }
    };

    let mut sources: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_standalone_scss(p))
        .collect();
    sources.sort();

    if sources.is_empty() {
        tracing::debug!("No SCSS files to compile in {}", pair.src_dir.display());
        return Ok(0);
    }

    fs::create_dir_all(&pair.build_dir)
        .map_err(|e| BuildError::directory(&pair.build_dir, e))?;

    let options = grass::Options::default()
        .style(grass::OutputStyle::Compressed)
        .quiet(true);

    let mut compiled = 0;
    for source in &sources {
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("style");
        let output = pair.build_dir.join(format!("{}.css", stem));
        tracing::info!(
            "Compiling {} -> {}.css",
            source.display(),
            stem
        );

        match grass::from_path(source, &options) {
            Ok(css) => match fs::write(&output, css) {
                Ok(()) => compiled += 1,
                Err(e) => tracing::error!("Error writing {}: {}", output.display(), e),
            },
            Err(e) => tracing::error!("Error compiling {}: {}", source.display(), e),
        }
    }

    Ok(compiled)
}

/// Standalone SCSS sources end in `.scss` and do not start with `_`.
fn is_standalone_scss(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".scss") && !n.starts_with('_'))
}
