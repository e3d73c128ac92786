//! Responsive image markup generation.

use crate::breakpoints::TIERS;
use crate::descriptor::ImageDescriptor;

/// The `sizes` attribute matching the breakpoint tiers.
const SIZES_ATTR: &str =
    "(max-width: 480px) 480px, (max-width: 768px) 768px, (max-width: 1024px) 1024px, 100vw";

/// Build responsive image markup for a descriptor.
///
/// Without a size map this is a plain `<img>` bound to the fallback URL.
/// With sizes it is a `<picture>` carrying one `<source>` per breakpoint
/// tier whose size exists, then a default `<img>` with a width-annotated
/// `srcset`. Returns `None` when no URL can be resolved at all.
pub fn responsive_image(desc: &ImageDescriptor, alt: &str) -> Option<String> {
    let fallback = desc.fallback_url()?;

    if !desc.has_sizes() {
        return Some(format!(
            r#"<img src="{}" alt="{}">"#,
            escape_attr(fallback),
            escape_attr(alt)
        ));
    }

    let sizes = desc.sizes.as_ref()?;
    let mut out = String::from("<picture>");

    for tier in TIERS {
        if let Some(entry) = sizes.get(tier.size) {
            out.push_str(&format!(
                r#"<source media="{}" srcset="{}">"#,
                tier.media,
                escape_attr(entry.url())
            ));
        }
    }

    let candidates = desc.width_annotated();
    if candidates.is_empty() {
        out.push_str(&format!(
            r#"<img src="{}" alt="{}">"#,
            escape_attr(fallback),
            escape_attr(alt)
        ));
    } else {
        let srcset = candidates
            .iter()
            .map(|(url, w)| format!("{} {}w", url, w))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            r#"<img src="{}" alt="{}" srcset="{}" sizes="{}">"#,
            escape_attr(fallback),
            escape_attr(alt),
            escape_attr(&srcset),
            SIZES_ATTR
        ));
    }

    out.push_str("</picture>");
    Some(out)
}

/// Escape a string for use inside a double-quoted HTML attribute.
pub(crate) fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
