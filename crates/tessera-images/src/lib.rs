//! Responsive image activation for tessera-built pages.
//!
//! Rewrites `data-bg-object` and `data-bg` attribute conventions in rendered
//! HTML into responsive `<picture>` markup or breakpoint-driven background
//! styling.

pub mod activate;
pub mod breakpoints;
pub mod descriptor;
pub mod markup;

pub use activate::{ActivateError, ActivationOutcome, Activator};
pub use breakpoints::{select_size, Tier, TIERS};
pub use descriptor::{ImageDescriptor, SizeEntry, SizeName, Sizes};
pub use markup::responsive_image;
