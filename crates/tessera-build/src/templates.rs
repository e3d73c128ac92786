//! Template building.
//!
//! Source templates render through a minijinja environment. Files named with
//! a leading underscore are loadable partials (mirroring the SCSS partial
//! convention) and never produce standalone output; every other `.html` file
//! renders to the build directory under its relative path. Non-template
//! files are copied through unchanged.

use std::fs;
use std::path::{Path, PathBuf};

use minijinja::{context, Environment, Value};
use walkdir::WalkDir;

use crate::error::BuildError;
use crate::settings::{DirPair, SiteSettings};

/// Build every configured template pair. Returns the number of rendered
/// pages. The first render or write failure aborts the stage.
pub fn build_templates(settings: &SiteSettings) -> Result<usize, BuildError> {
    let mut rendered = 0;
    for pair in &settings.templates {
        rendered += build_pair(pair, settings)?;
    }
    Ok(rendered)
}

fn build_pair(pair: &DirPair, settings: &SiteSettings) -> Result<usize, BuildError> {
    if !pair.src_dir.exists() {
        tracing::warn!(
            "Template source directory not found: {}",
            pair.src_dir.display()
        );
        return Ok(0);
    }

    let mut env = Environment::new();
    env.add_global("image_path", Value::from(settings.image_path.clone()));
    env.add_global("breakpoints", Value::from_serialize(&settings.breakpoints));

    let mut pages: Vec<String> = Vec::new();
    let mut passthrough: Vec<(PathBuf, PathBuf)> = Vec::new();

    for entry in WalkDir::new(&pair.src_dir).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let relative = path.strip_prefix(&pair.src_dir).unwrap_or(path);

        if path.extension().and_then(|e| e.to_str()) != Some("html") {
            passthrough.push((path.to_path_buf(), relative.to_path_buf()));
            continue;
        }

        let name = template_name(relative);
        let content = fs::read_to_string(path).map_err(|e| BuildError::read(path, e))?;
        env.add_template_owned(name.clone(), content)
            .map_err(|e| BuildError::Template {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        if !is_partial(relative) {
            pages.push(name);
        }
    }

    for name in &pages {
        let tmpl = env
            .get_template(name)
            .map_err(|e| BuildError::Template {
                path: name.clone(),
                message: e.to_string(),
            })?;

        let html = tmpl.render(context! {}).map_err(|e| BuildError::Template {
            path: name.clone(),
            message: e.to_string(),
        })?;

        let out = pair.build_dir.join(name);
        write_output(&out, html.as_bytes())?;
        tracing::debug!("Rendered {} -> {}", name, out.display());
    }

    for (source, relative) in &passthrough {
        let out = pair.build_dir.join(relative);
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::directory(parent, e))?;
        }
        fs::copy(source, &out).map_err(|e| BuildError::write(&out, e))?;
    }

    Ok(pages.len())
}

/// A template whose file name starts with `_` is a partial.
fn is_partial(relative: &Path) -> bool {
    relative
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('_'))
}

fn template_name(relative: &Path) -> String {
    relative.to_string_lossy().replace('\\', "/")
}

fn write_output(path: &Path, content: &[u8]) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::directory(parent, e))?;
    }
    fs::write(path, content).map_err(|e| BuildError::write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn settings_for(src: &Path, build: &Path) -> SiteSettings {
        SiteSettings {
            templates: vec![DirPair {
                src_dir: src.to_path_buf(),
                build_dir: build.to_path_buf(),
            }],
            image_path: "/theme/images/".to_string(),
            ..SiteSettings::default()
        }
    }

    #[test]
    fn renders_pages_with_partials_and_globals() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("templates");
        let build = temp.path().join("build");
        fs::create_dir_all(&src).unwrap();

        fs::write(src.join("_header.html"), "<header>{{ image_path }}</header>").unwrap();
        fs::write(
            src.join("index.html"),
            r#"{% include "_header.html" %}<main>home</main>"#,
        )
        .unwrap();

        let settings = settings_for(&src, &build);
        let rendered = build_templates(&settings).unwrap();

        assert_eq!(rendered, 1);
        let html = fs::read_to_string(build.join("index.html")).unwrap();
        assert_eq!(
            html,
            "<header>/theme/images/</header><main>home</main>"
        );
    }

    #[test]
    fn partials_never_render_standalone() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("templates");
        let build = temp.path().join("build");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("_nav.html"), "<nav></nav>").unwrap();
        fs::write(src.join("page.html"), "<p>page</p>").unwrap();

        build_templates(&settings_for(&src, &build)).unwrap();

        assert!(build.join("page.html").exists());
        assert!(!build.join("_nav.html").exists());
    }

    #[test]
    fn non_template_files_copy_through() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("templates");
        let build = temp.path().join("build");
        fs::create_dir_all(src.join("meta")).unwrap();
        fs::write(src.join("meta/site.webmanifest"), "{}").unwrap();

        build_templates(&settings_for(&src, &build)).unwrap();

        assert_eq!(
            fs::read_to_string(build.join("meta/site.webmanifest")).unwrap(),
            "{}"
        );
    }

    #[test]
    fn preserves_nested_relative_paths() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("templates");
        let build = temp.path().join("build");
        fs::create_dir_all(src.join("blog")).unwrap();
        fs::write(src.join("blog/post.html"), "<article></article>").unwrap();

        build_templates(&settings_for(&src, &build)).unwrap();

        assert!(build.join("blog/post.html").exists());
    }

    #[test]
    fn broken_template_aborts_the_stage() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("templates");
        let build = temp.path().join("build");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("bad.html"), "{% include \"_missing.html\" %}").unwrap();

        let err = build_templates(&settings_for(&src, &build)).unwrap_err();
        assert!(matches!(err, BuildError::Template { .. }));
    }

    #[test]
    fn missing_source_directory_is_skipped() {
        let temp = tempdir().unwrap();
        let settings = settings_for(&temp.path().join("nope"), &temp.path().join("build"));
        assert_eq!(build_templates(&settings).unwrap(), 0);
    }
}
