//! Viewport breakpoint tiers and size selection.

use crate::descriptor::SizeName;

/// A breakpoint tier: a media query and the size it selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    pub media: &'static str,
    pub size: SizeName,
}

/// Breakpoint tiers in source order: smallest viewport first, with the
/// final tier covering everything above 1024px.
pub const TIERS: [Tier; 4] = [
    Tier {
        media: "(max-width: 480px)",
        size: SizeName::Thumbnail,
    },
    Tier {
        media: "(max-width: 768px)",
        size: SizeName::Medium,
    },
    Tier {
        media: "(max-width: 1024px)",
        size: SizeName::MediumLarge,
    },
    Tier {
        media: "(min-width: 1025px)",
        size: SizeName::Large,
    },
];

/// Select the size a given viewport width maps to.
///
/// This is the computation a viewport-driven background performs whenever it
/// is (re)evaluated; it observes the width at call time.
pub fn select_size(viewport_width: u32) -> SizeName {
    if viewport_width <= 480 {
        SizeName::Thumbnail
    } else if viewport_width <= 768 {
        SizeName::Medium
    } else if viewport_width <= 1024 {
        SizeName::MediumLarge
    } else {
        SizeName::Large
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_viewport_widths_to_tiers() {
        assert_eq!(select_size(320), SizeName::Thumbnail);
        assert_eq!(select_size(480), SizeName::Thumbnail);
        assert_eq!(select_size(481), SizeName::Medium);
        assert_eq!(select_size(768), SizeName::Medium);
        assert_eq!(select_size(1024), SizeName::MediumLarge);
        assert_eq!(select_size(1025), SizeName::Large);
        assert_eq!(select_size(2560), SizeName::Large);
    }

    #[test]
    fn tiers_cover_all_sizes_in_ascending_order() {
        let sizes: Vec<_> = TIERS.iter().map(|t| t.size).collect();
        assert_eq!(
            sizes,
            vec![
                SizeName::Thumbnail,
                SizeName::Medium,
                SizeName::MediumLarge,
                SizeName::Large
            ]
        );
    }
}
