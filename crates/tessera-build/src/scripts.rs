//! Script building.
//!
//! Copies `.js` sources into the build directory preserving relative paths.
//! All-or-nothing: the first copy failure aborts the stage.

use std::fs;

use walkdir::WalkDir;

use crate::error::BuildError;
use crate::settings::SiteSettings;

/// Build every configured script pair. Returns the number of copied files.
pub fn build_scripts(settings: &SiteSettings) -> Result<usize, BuildError> {
    let mut copied = 0;

    for pair in &settings.scripts {
        if !pair.src_dir.exists() {
            tracing::warn!(
                "Script source directory not found: {}",
                pair.src_dir.display()
            );
            continue;
        }

        for entry in WalkDir::new(&pair.src_dir).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("js") {
                continue;
            }

            let relative = path.strip_prefix(&pair.src_dir).unwrap_or(path);
            let out = pair.build_dir.join(relative);
            if let Some(parent) = out.parent() {
                fs::create_dir_all(parent).map_err(|e| BuildError::directory(parent, e))?;
            }
            fs::copy(path, &out).map_err(|e| BuildError::write(&out, e))?;
            tracing::debug!("Copied {} -> {}", path.display(), out.display());
            copied += 1;
        }
    }

    Ok(copied)
}
