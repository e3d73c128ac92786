//! Document rewriting for the `data-bg-object` / `data-bg` conventions.
//!
//! The pass is idempotent by construction: every rewrite consumes the marker
//! attributes it matched on, so running it again over its own output finds
//! nothing to do.

use std::fs;
use std::path::Path;

use regex::Regex;
use walkdir::WalkDir;

use crate::breakpoints::TIERS;
use crate::descriptor::ImageDescriptor;
use crate::markup::{escape_attr, responsive_image};

/// Errors that can occur while activating files on disk.
#[derive(Debug, thiserror::Error)]
pub enum ActivateError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Result of activating one document.
#[derive(Debug)]
pub struct ActivationOutcome {
    /// The rewritten document.
    pub html: String,
    /// Number of elements rewritten.
    pub activated: usize,
}

/// Rewrites image data attributes in rendered HTML.
pub struct Activator {
    image_path: String,
    bg_object_tag: Regex,
    bg_tag: Regex,
    alt_attr: Regex,
    marker_attrs: Regex,
    style_attr: Regex,
    class_attr: Regex,
}

impl Activator {
    /// Create an activator. `image_path` is the URL prefix for bare
    /// `data-bg` values that are not already absolute.
    pub fn new(image_path: impl Into<String>) -> Self {
        Self {
            image_path: image_path.into(),
            bg_object_tag: Regex::new(
                r#"<([a-zA-Z][a-zA-Z0-9-]*)((?:[^>'"]|'[^']*'|"[^"]*")*?)\sdata-bg-object\s*=\s*(?:'([^']*)'|"([^"]*)")((?:[^>'"]|'[^']*'|"[^"]*")*)>"#,
            )
            .expect("bg-object pattern"),
            bg_tag: Regex::new(
                r#"<([a-zA-Z][a-zA-Z0-9-]*)((?:[^>'"]|'[^']*'|"[^"]*")*?)\sdata-bg\s*=\s*(?:'([^']*)'|"([^"]*)")((?:[^>'"]|'[^']*'|"[^"]*")*)>"#,
            )
            .expect("bg pattern"),
            alt_attr: Regex::new(r#"data-alt\s*=\s*(?:'([^']*)'|"([^"]*)")"#)
                .expect("alt pattern"),
            marker_attrs: Regex::new(
                r#"\s+data-(?:bg-object|replace-with-img|insert-img|alt|bg)\b(?:\s*=\s*(?:'[^']*'|"[^"]*"|[^\s>]+))?"#,
            )
            .expect("marker pattern"),
            style_attr: Regex::new(r#"style\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
                .expect("style pattern"),
            class_attr: Regex::new(r#"class\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
                .expect("class pattern"),
        }
    }

    /// Rewrite a whole document.
    pub fn activate(&self, html: &str) -> ActivationOutcome {
        let mut activated = 0;
        let mut bg_rules: Vec<String> = Vec::new();
        let mut class_seq = 0;

        let html = self.activate_descriptors(html, &mut bg_rules, &mut class_seq, &mut activated);
        let html = self.activate_plain_backgrounds(&html, &mut activated);
        let html = inject_style_block(&html, &bg_rules);

        ActivationOutcome { html, activated }
    }

    /// Activate every `.html` file under `dir`, rewriting files in place.
    pub fn activate_dir(&self, dir: &Path) -> Result<usize, ActivateError> {
        if !dir.exists() {
            return Ok(0);
        }

        let mut total = 0;
        for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("html") {
                continue;
            }

            let content = fs::read_to_string(path).map_err(|e| ActivateError::Read {
                path: path.display().to_string(),
                source: e,
            })?;

            let outcome = self.activate(&content);
            if outcome.activated > 0 {
                fs::write(path, outcome.html).map_err(|e| ActivateError::Write {
                    path: path.display().to_string(),
                    source: e,
                })?;
                tracing::debug!(
                    "Activated {} images in {}",
                    outcome.activated,
                    path.display()
                );
                total += outcome.activated;
            }
        }

        Ok(total)
    }

    /// First pass: elements carrying a JSON image descriptor.
    fn activate_descriptors(
        &self,
        html: &str,
        bg_rules: &mut Vec<String>,
        class_seq: &mut usize,
        activated: &mut usize,
    ) -> String {
        let mut out = String::with_capacity(html.len());
        let mut rest = html;

        while let Some(caps) = self.bg_object_tag.captures(rest) {
            let whole = caps.get(0).expect("match has group 0");
            let open_tag = whole.as_str();
            let tag_name = &caps[1];
            let raw = caps.get(3).or_else(|| caps.get(4)).map_or("", |m| m.as_str());

            out.push_str(&rest[..whole.start()]);
            let after_open = &rest[whole.end()..];

            let descriptor = match ImageDescriptor::parse(&decode_entities(raw)) {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!("Skipping <{}>: invalid image descriptor: {}", tag_name, e);
                    out.push_str(open_tag);
                    rest = after_open;
                    continue;
                }
            };

            let alt = self.alt_text(open_tag);
            let replace = open_tag.contains("data-replace-with-img");
            let insert = open_tag.contains("data-insert-img");

            if replace || insert {
                let Some(markup) = responsive_image(&descriptor, &alt) else {
                    tracing::warn!("Skipping <{}>: descriptor has no usable URL", tag_name);
                    out.push_str(open_tag);
                    rest = after_open;
                    continue;
                };
                let Some((_, element_end)) = find_element_end(after_open, tag_name) else {
                    tracing::warn!("Skipping <{}>: no matching closing tag", tag_name);
                    out.push_str(open_tag);
                    rest = after_open;
                    continue;
                };

                if replace {
                    out.push_str(&markup);
                } else {
                    out.push_str(&self.strip_markers(open_tag));
                    out.push_str(&markup);
                    out.push_str(&format!("</{}>", tag_name));
                }
                rest = &after_open[element_end..];
                *activated += 1;
                continue;
            }

            // Default: keep the element, drive its background by breakpoint.
            let Some(fallback) = descriptor.fallback_url().map(str::to_owned) else {
                tracing::warn!("Skipping <{}>: descriptor has no usable URL", tag_name);
                out.push_str(open_tag);
                rest = after_open;
                continue;
            };

            let class = format!("tessera-bg-{}", *class_seq);
            *class_seq += 1;

            if let Some(sizes) = descriptor.sizes.as_ref() {
                for tier in TIERS {
                    if let Some(entry) = sizes.get(tier.size) {
                        bg_rules.push(format!(
                            "@media {} {{ .{} {{ background-image: url('{}'); }} }}",
                            tier.media,
                            class,
                            css_url(entry.url())
                        ));
                    }
                }
            }

            let tag = self.strip_markers(open_tag);
            let tag = self.add_class(&tag, &class);
            let tag = self.set_background(&tag, &fallback);
            out.push_str(&tag);
            rest = after_open;
            *activated += 1;
        }

        out.push_str(rest);
        out
    }

    /// Second pass: elements carrying a plain URL or path fragment.
    fn activate_plain_backgrounds(&self, html: &str, activated: &mut usize) -> String {
        let mut out = String::with_capacity(html.len());
        let mut rest = html;

        while let Some(caps) = self.bg_tag.captures(rest) {
            let whole = caps.get(0).expect("match has group 0");
            let raw = caps.get(3).or_else(|| caps.get(4)).map_or("", |m| m.as_str());

            let url = if raw.contains("http") {
                raw.to_string()
            } else {
                format!("{}{}", self.image_path, raw)
            };

            out.push_str(&rest[..whole.start()]);
            let tag = self.strip_markers(whole.as_str());
            out.push_str(&self.set_background(&tag, &url));
            rest = &rest[whole.end()..];
            *activated += 1;
        }

        out.push_str(rest);
        out
    }

    fn alt_text(&self, open_tag: &str) -> String {
        self.alt_attr
            .captures(open_tag)
            .and_then(|c| c.get(1).or_else(|| c.get(2)))
            .map(|m| decode_entities(m.as_str()))
            .unwrap_or_default()
    }

    /// Drop every consumed `data-*` marker attribute from an opening tag.
    fn strip_markers(&self, open_tag: &str) -> String {
        self.marker_attrs.replace_all(open_tag, "").into_owned()
    }

    fn add_class(&self, open_tag: &str, class: &str) -> String {
        if let Some(caps) = self.class_attr.captures(open_tag) {
            let existing = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            let replacement = format!(r#"class="{} {}""#, existing, class);
            return self
                .class_attr
                .replace(open_tag, regex::NoExpand(&replacement))
                .into_owned();
        }
        insert_attr(open_tag, &format!(r#"class="{}""#, class))
    }

    fn set_background(&self, open_tag: &str, url: &str) -> String {
        let declaration = format!("background-image: url('{}');", css_url(url));
        if let Some(caps) = self.style_attr.captures(open_tag) {
            let existing = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            let replacement = format!(r#"style="{} {}""#, declaration, existing.trim());
            return self
                .style_attr
                .replace(open_tag, regex::NoExpand(&replacement))
                .into_owned();
        }
        insert_attr(open_tag, &format!(r#"style="{}""#, escape_attr(&declaration)))
    }
}

/// Insert an attribute just before the closing `>` of an opening tag.
fn insert_attr(open_tag: &str, attr: &str) -> String {
    if let Some(stripped) = open_tag.strip_suffix("/>") {
        format!("{} {}/>", stripped.trim_end(), attr)
    } else if let Some(stripped) = open_tag.strip_suffix('>') {
        format!("{} {}>", stripped.trim_end(), attr)
    } else {
        open_tag.to_string()
    }
}

/// Find the end of the element whose opening tag was just consumed.
///
/// `s` starts immediately after the opening tag. Returns the byte offsets of
/// the element's inner end and of the end of its closing tag, tracking
/// nested elements of the same name.
fn find_element_end(s: &str, tag: &str) -> Option<(usize, usize)> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);
    let mut depth = 1usize;
    let mut pos = 0usize;

    loop {
        let next_close = s[pos..].find(&close).map(|i| i + pos)?;
        let next_open = s[pos..]
            .find(&open)
            .map(|i| i + pos)
            .filter(|&i| i < next_close && is_name_boundary(s, i + open.len()));

        match next_open {
            Some(o) => {
                depth += 1;
                pos = o + open.len();
            }
            None => {
                depth -= 1;
                if depth == 0 {
                    return Some((next_close, next_close + close.len()));
                }
                pos = next_close + close.len();
            }
        }
    }
}

/// True if the character at `idx` terminates a tag name.
fn is_name_boundary(s: &str, idx: usize) -> bool {
    match s[idx..].chars().next() {
        Some(c) => c.is_whitespace() || c == '>' || c == '/',
        None => false,
    }
}

/// Decode the entities an attribute value may carry after templating.
fn decode_entities(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Escape a URL for a single-quoted CSS `url()`.
fn css_url(url: &str) -> String {
    url.replace('\'', "%27")
}

/// Append the generated breakpoint rules, preferably before `</body>`.
fn inject_style_block(html: &str, rules: &[String]) -> String {
    if rules.is_empty() {
        return html.to_string();
    }

    let block = format!("<style>\n{}\n</style>", rules.join("\n"));
    if let Some(idx) = html.rfind("</body>") {
        let mut out = String::with_capacity(html.len() + block.len());
        out.push_str(&html[..idx]);
        out.push_str(&block);
        out.push('\n');
        out.push_str(&html[idx..]);
        out
    } else {
        format!("{}\n{}", html, block)
    }
}
