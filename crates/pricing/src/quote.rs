//! Quote evaluation.

use stickernest_core::{Bounds, PolygonSet};

use crate::config::PricingConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A priced order: total in integer cents plus the complexity factor that
/// went into it (surfaced in the storefront price breakdown).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Quote {
    pub total_cents: u64,
    pub complexity_multiplier: f64,
}

impl Quote {
    /// The neutral zero quote returned for degenerate inputs.
    pub fn zero() -> Self {
        Self {
            total_cents: 0,
            complexity_multiplier: 1.0,
        }
    }
}

/// Prices an order from its geometric measurements.
///
/// `bounds` is the cutline bounding box and `cutline` the cut path whose
/// perimeter drives the complexity tier; both are in pixels at the chosen
/// resolution's ppi. In order:
///
/// 1. zero quantity, degenerate bounds, or an unknown resolution yield
///    [`Quote::zero`];
/// 2. base price is square inches times the per-square-inch rate;
/// 3. an unknown material falls back to a neutral 1.0 multiplier;
/// 4. the complexity tier is chosen by strict comparison against the cut
///    perimeter in inches;
/// 5. the highest met quantity-discount step is applied;
/// 6. the total is rounded half-up to whole cents.
///
/// Pure: no state, no side effects, identical output for identical input.
pub fn quote(
    config: &PricingConfig,
    quantity: u32,
    material_id: &str,
    bounds: &Bounds,
    cutline: &PolygonSet,
    resolution_id: &str,
) -> Quote {
    if quantity == 0 || bounds.is_degenerate() {
        return Quote::zero();
    }
    let Some(resolution) = config.resolution(resolution_id) else {
        return Quote::zero();
    };

    let ppi = resolution.ppi;
    let square_inches = (bounds.width / ppi) * (bounds.height / ppi);
    let base_cents = square_inches * config.price_per_square_inch_cents;

    let material_multiplier = match config.material(material_id) {
        Some(m) => m.cost_multiplier,
        None => {
            log::debug!("unknown material '{material_id}', pricing at 1.0");
            1.0
        }
    };

    let perimeter_inches = cutline.perimeter() / ppi;
    let complexity_multiplier = config.complexity_multiplier(perimeter_inches);

    let discount = config.discount_for(quantity);

    let total = base_cents
        * quantity as f64
        * material_multiplier
        * complexity_multiplier
        * resolution.cost_multiplier
        * (1.0 - discount);

    Quote {
        // Round half-up; the total is never negative.
        total_cents: total.round().max(0.0) as u64,
        complexity_multiplier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const PPI: f64 = 96.0;

    fn config() -> PricingConfig {
        PricingConfig::default()
    }

    /// Rectangle cutline in pixels at 96 ppi, from inch dimensions.
    fn rect_cutline(width_in: f64, height_in: f64) -> (Bounds, PolygonSet) {
        let w = width_in * PPI;
        let h = height_in * PPI;
        (Bounds::new(0.0, 0.0, w, h), PolygonSet::rectangle(0.0, 0.0, w, h))
    }

    /// 3x3 in bounds with a cut perimeter just under the 12 in tier edge.
    fn three_inch_square() -> (Bounds, PolygonSet) {
        let side = 3.0 * PPI;
        (
            Bounds::new(0.0, 0.0, side, side),
            PolygonSet::rectangle(0.0, 0.0, side - 1.0, side - 1.0),
        )
    }

    #[test]
    fn test_base_price() {
        // 9 sq.in x 15 cents x 10 = 1350
        let (bounds, cutline) = three_inch_square();
        let q = quote(&config(), 10, "pp_standard", &bounds, &cutline, "dpi_96");
        assert_eq!(q.total_cents, 1350);
        assert_relative_eq!(q.complexity_multiplier, 1.0);
    }

    #[test]
    fn test_material_multiplier() {
        let (bounds, cutline) = three_inch_square();
        let q = quote(&config(), 10, "pvc_laminated", &bounds, &cutline, "dpi_96");
        assert_eq!(q.total_cents, 2025);
    }

    #[test]
    fn test_unknown_material_prices_neutral() {
        let (bounds, cutline) = three_inch_square();
        let q = quote(&config(), 10, "vibranium", &bounds, &cutline, "dpi_96");
        assert_eq!(q.total_cents, 1350);
    }

    #[test]
    fn test_complexity_tier_and_half_up_rounding() {
        // 25 sq.in, 25 in perimeter -> 1.25 tier;
        // 25 * 15 * 10 * 1.25 = 4687.5, rounded half-up to 4688.
        let (bounds, cutline) = rect_cutline(10.0, 2.5);
        let q = quote(&config(), 10, "pp_standard", &bounds, &cutline, "dpi_96");
        assert_relative_eq!(q.complexity_multiplier, 1.25);
        assert_eq!(q.total_cents, 4688);
    }

    #[test]
    fn test_perimeter_on_tier_boundary_takes_next_tier() {
        // Exactly 12 in of perimeter is NOT "< 12": the 1.1 tier applies.
        let (bounds, cutline) = rect_cutline(3.0, 3.0);
        let q = quote(&config(), 1, "pp_standard", &bounds, &cutline, "dpi_96");
        assert_relative_eq!(q.complexity_multiplier, 1.1);
        // 9 * 15 * 1.1 = 148.5 -> 149
        assert_eq!(q.total_cents, 149);
    }

    #[test]
    fn test_quantity_discounts() {
        let (bounds, cutline) = three_inch_square();

        let q250 = quote(&config(), 250, "pp_standard", &bounds, &cutline, "dpi_96");
        // 9 * 15 * 250 = 33750, minus 10% = 30375
        assert_eq!(q250.total_cents, 30375);

        let q600 = quote(&config(), 600, "pp_standard", &bounds, &cutline, "dpi_96");
        // 9 * 15 * 600 = 81000, minus 15% = 68850
        assert_eq!(q600.total_cents, 68850);
    }

    #[test]
    fn test_resolution_multiplier_and_ppi() {
        // Same pixel size at 300 ppi is physically smaller but costs 1.2x.
        let side = 300.0;
        let bounds = Bounds::new(0.0, 0.0, side, side);
        let cutline = PolygonSet::rectangle(0.0, 0.0, side, side);

        let q = quote(&config(), 10, "pp_standard", &bounds, &cutline, "dpi_300");
        // 1 sq.in * 15 * 10 * 1.2 = 180
        assert_eq!(q.total_cents, 180);
    }

    #[test]
    fn test_degenerate_inputs_quote_zero() {
        let (bounds, cutline) = rect_cutline(3.0, 3.0);

        assert_eq!(
            quote(&config(), 0, "pp_standard", &bounds, &cutline, "dpi_96"),
            Quote::zero()
        );
        assert_eq!(
            quote(
                &config(),
                10,
                "pp_standard",
                &Bounds::default(),
                &cutline,
                "dpi_96"
            ),
            Quote::zero()
        );
        assert_eq!(
            quote(&config(), 10, "pp_standard", &bounds, &cutline, "dpi_1200"),
            Quote::zero()
        );
    }

    #[test]
    fn test_total_monotone_in_quantity_within_tier() {
        let (bounds, cutline) = rect_cutline(3.0, 3.0);
        let mut previous = 0;
        for quantity in [1, 2, 10, 50, 199] {
            let q = quote(&config(), quantity, "pp_standard", &bounds, &cutline, "dpi_96");
            assert!(q.total_cents >= previous);
            previous = q.total_cents;
        }
    }

    #[test]
    fn test_idempotent() {
        let (bounds, cutline) = rect_cutline(5.0, 4.0);
        let a = quote(&config(), 42, "pvc_laminated", &bounds, &cutline, "dpi_300");
        let b = quote(&config(), 42, "pvc_laminated", &bounds, &cutline, "dpi_300");
        assert_eq!(a, b);
    }
}
