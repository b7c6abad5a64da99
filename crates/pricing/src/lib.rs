//! # Stickernest Pricing
//!
//! Derives a price from the geometric measurements of a design.
//!
//! The evaluator is a pure function over a validated [`PricingConfig`]:
//! square-inch base price from the cutline bounds, material and resolution
//! multipliers, a perimeter-driven complexity tier, and quantity discounts.
//! Identical inputs always produce identical quotes, so pricing can run
//! concurrently and repeatedly (every keystroke in a quantity field)
//! without coordination.
//!
//! Degenerate inputs (zero quantity, empty bounds, unknown resolution)
//! yield a zero quote rather than an error; they are routine states while
//! a design is still being edited.
//!
//! ## Quick Start
//!
//! ```
//! use stickernest_pricing::{quote, PricingConfig};
//! use stickernest_core::{Bounds, PolygonSet};
//!
//! let config = PricingConfig::default();
//! config.validate().unwrap();
//!
//! // A 3x3 in design at 96 ppi; its 12 in cut perimeter reaches the
//! // second complexity tier.
//! let cutline = PolygonSet::rectangle(0.0, 0.0, 288.0, 288.0);
//! let bounds: Bounds = cutline.bounds();
//!
//! let q = quote(&config, 10, "pp_standard", &bounds, &cutline, "dpi_96");
//! assert_eq!(q.total_cents, 1485); // 9 sq in x 15 c x 10 x 1.1
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: serialize/deserialize the config in the remote document's
//!   JSON shape (including its `"Infinity"` tier threshold)

pub mod config;
pub mod quote;

pub use config::{ComplexityTier, Material, PricingConfig, QuantityDiscount, Resolution};
pub use quote::{quote, Quote};
