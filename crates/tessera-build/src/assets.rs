//! Static asset copying.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::BuildError;
use crate::settings::SiteSettings;

/// Copy every configured asset directory and the optional site thumbnail.
/// Missing sources log a warning and are skipped; the build continues.
/// Returns the number of copied files.
pub fn copy_assets(settings: &SiteSettings) -> Result<usize, BuildError> {
    let mut copied = 0;

    for pair in &settings.assets {
        if !pair.src_dir.exists() {
            tracing::warn!(
                "Asset source directory not found: {}",
                pair.src_dir.display()
            );
            continue;
        }

        copied += copy_dir(&pair.src_dir, &pair.build_dir)?;
        tracing::info!(
            "Assets copied from {} to {}",
            pair.src_dir.display(),
            pair.build_dir.display()
        );
    }

    if let Some(thumb) = &settings.site_thumb {
        let source = settings.src_dir.join(thumb);
        if let (true, Some(first)) = (source.exists(), settings.assets.first()) {
            let dest = first.build_dir.join(thumb);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(|e| BuildError::directory(parent, e))?;
            }
            fs::copy(&source, &dest).map_err(|e| BuildError::write(&dest, e))?;
            tracing::info!("Site thumbnail copied to {}", dest.display());
            copied += 1;
        } else {
            tracing::warn!("Site thumbnail not found: {}", source.display());
        }
    }

    Ok(copied)
}

/// Recursive overwrite copy.
fn copy_dir(src: &Path, dest: &Path) -> Result<usize, BuildError> {
    let mut copied = 0;

    for entry in WalkDir::new(src).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        let relative = path.strip_prefix(src).unwrap_or(path);
        let target = dest.join(relative);

        if path.is_dir() {
            fs::create_dir_all(&target).map_err(|e| BuildError::directory(&target, e))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| BuildError::directory(parent, e))?;
            }
            fs::copy(path, &target).map_err(|e| BuildError::write(&target, e))?;
            copied += 1;
        }
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DirPair;
    use tempfile::tempdir;

    #[test]
    fn copies_directories_recursively_with_overwrite() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("images");
        let build = temp.path().join("build/images");
        fs::create_dir_all(src.join("icons")).unwrap();
        fs::write(src.join("hero.jpg"), "new").unwrap();
        fs::write(src.join("icons/x.svg"), "<svg/>").unwrap();

        // Pre-existing stale file gets overwritten.
        fs::create_dir_all(&build).unwrap();
        fs::write(build.join("hero.jpg"), "old").unwrap();

        let settings = SiteSettings {
            assets: vec![DirPair {
                src_dir: src.clone(),
                build_dir: build.clone(),
            }],
            ..SiteSettings::default()
        };

        let copied = copy_assets(&settings).unwrap();
        assert_eq!(copied, 2);
        assert_eq!(fs::read_to_string(build.join("hero.jpg")).unwrap(), "new");
        assert!(build.join("icons/x.svg").exists());
    }

    #[test]
    fn missing_asset_source_warns_and_continues() {
        let temp = tempdir().unwrap();
        let present = temp.path().join("present");
        fs::create_dir_all(&present).unwrap();
        fs::write(present.join("a.png"), "a").unwrap();

        let settings = SiteSettings {
            assets: vec![
                DirPair {
                    src_dir: temp.path().join("absent"),
                    build_dir: temp.path().join("build/absent"),
                },
                DirPair {
                    src_dir: present,
                    build_dir: temp.path().join("build/present"),
                },
            ],
            ..SiteSettings::default()
        };

        // Not an error; the remaining pair still copies.
        let copied = copy_assets(&settings).unwrap();
        assert_eq!(copied, 1);
    }

    #[test]
    fn thumbnail_lands_beside_first_asset_output() {
        let temp = tempdir().unwrap();
        let src_root = temp.path().join("src");
        let images = src_root.join("images");
        fs::create_dir_all(&images).unwrap();
        fs::write(src_root.join("screenshot.png"), "thumb").unwrap();

        let build = temp.path().join("build/images");
        let settings = SiteSettings {
            src_dir: src_root,
            site_thumb: Some("screenshot.png".into()),
            assets: vec![DirPair {
                src_dir: images,
                build_dir: build.clone(),
            }],
            ..SiteSettings::default()
        };

        copy_assets(&settings).unwrap();
        assert_eq!(
            fs::read_to_string(build.join("screenshot.png")).unwrap(),
            "thumb"
        );
    }

    #[test]
    fn missing_thumbnail_warns_and_continues() {
        let temp = tempdir().unwrap();
        let settings = SiteSettings {
            src_dir: temp.path().to_path_buf(),
            site_thumb: Some("screenshot.png".into()),
            assets: vec![],
            ..SiteSettings::default()
        };

        assert_eq!(copy_assets(&settings).unwrap(), 0);
    }
}
