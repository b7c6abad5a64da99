//! Pricing configuration.
//!
//! Mirrors the shape of the remote pricing document. The config is
//! validated once when loaded ([`PricingConfig::validate`]); quote
//! evaluation assumes a valid config and never re-checks it.

use stickernest_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A sticker substrate material and its cost factor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Material {
    pub id: String,
    /// Display name for the storefront dropdown.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub cost_multiplier: f64,
}

/// A print resolution: the pixel-to-inch conversion plus its cost factor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Resolution {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Pixels per inch; converts raster measurements to physical size.
    pub ppi: f64,
    pub cost_multiplier: f64,
}

/// One complexity tier: cut perimeters strictly below `threshold_inches`
/// (the catch-all tier uses `f64::INFINITY`) take `multiplier`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ComplexityTier {
    #[cfg_attr(feature = "serde", serde(with = "infinity"))]
    pub threshold_inches: f64,
    pub multiplier: f64,
}

/// A quantity discount step: orders of at least `quantity` units take
/// `discount` off (as a fraction of the total).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct QuantityDiscount {
    pub quantity: u32,
    pub discount: f64,
}

/// Perimeter-complexity section of the config document.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Complexity {
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub tiers: Vec<ComplexityTier>,
}

/// Immutable pricing configuration, loaded once per pricing session.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PricingConfig {
    pub price_per_square_inch_cents: f64,
    pub materials: Vec<Material>,
    pub resolutions: Vec<Resolution>,
    pub complexity: Complexity,
    pub quantity_discounts: Vec<QuantityDiscount>,
}

impl Default for PricingConfig {
    /// The canonical storefront configuration.
    fn default() -> Self {
        Self {
            price_per_square_inch_cents: 15.0,
            materials: vec![
                Material {
                    id: "pp_standard".into(),
                    name: "Standard Polypropylene".into(),
                    cost_multiplier: 1.0,
                },
                Material {
                    id: "pvc_laminated".into(),
                    name: "Laminated PVC".into(),
                    cost_multiplier: 1.5,
                },
            ],
            resolutions: vec![
                Resolution {
                    id: "dpi_96".into(),
                    name: "Draft (96 ppi)".into(),
                    ppi: 96.0,
                    cost_multiplier: 1.0,
                },
                Resolution {
                    id: "dpi_300".into(),
                    name: "Production (300 ppi)".into(),
                    ppi: 300.0,
                    cost_multiplier: 1.2,
                },
            ],
            complexity: Complexity {
                description: "Multiplier based on the perimeter of the cut path.".into(),
                tiers: vec![
                    ComplexityTier {
                        threshold_inches: 12.0,
                        multiplier: 1.0,
                    },
                    ComplexityTier {
                        threshold_inches: 24.0,
                        multiplier: 1.1,
                    },
                    ComplexityTier {
                        threshold_inches: f64::INFINITY,
                        multiplier: 1.25,
                    },
                ],
            },
            quantity_discounts: vec![
                QuantityDiscount {
                    quantity: 1,
                    discount: 0.0,
                },
                QuantityDiscount {
                    quantity: 200,
                    discount: 0.10,
                },
                QuantityDiscount {
                    quantity: 500,
                    discount: 0.15,
                },
            ],
        }
    }
}

impl PricingConfig {
    /// Structural validation, run once at load time.
    ///
    /// Checks positive base price, unique ids, positive multipliers and
    /// ppi values, strictly ascending tier thresholds, and discount
    /// fractions inside `[0, 1)` with ascending quantities.
    pub fn validate(&self) -> Result<()> {
        if !(self.price_per_square_inch_cents > 0.0) || !self.price_per_square_inch_cents.is_finite()
        {
            return Err(Error::InvalidConfig(
                "pricePerSquareInchCents must be positive and finite".into(),
            ));
        }

        check_unique_ids(self.materials.iter().map(|m| m.id.as_str()), "material")?;
        for m in &self.materials {
            if !(m.cost_multiplier > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "material '{}' has non-positive multiplier",
                    m.id
                )));
            }
        }

        if self.resolutions.is_empty() {
            return Err(Error::InvalidConfig("no resolutions configured".into()));
        }
        check_unique_ids(self.resolutions.iter().map(|r| r.id.as_str()), "resolution")?;
        for r in &self.resolutions {
            if !(r.ppi > 0.0) || !(r.cost_multiplier > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "resolution '{}' has non-positive ppi or multiplier",
                    r.id
                )));
            }
        }

        if self.complexity.tiers.is_empty() {
            return Err(Error::InvalidConfig("no complexity tiers configured".into()));
        }
        let mut previous = f64::NEG_INFINITY;
        for tier in &self.complexity.tiers {
            if !(tier.multiplier > 0.0) {
                return Err(Error::InvalidConfig(
                    "complexity multiplier must be positive".into(),
                ));
            }
            if tier.threshold_inches <= previous {
                return Err(Error::InvalidConfig(
                    "complexity tiers must ascend strictly by threshold".into(),
                ));
            }
            previous = tier.threshold_inches;
        }
        if previous.is_finite() {
            log::warn!("complexity tiers carry no Infinity catch-all; long perimeters price at 1.0");
        }

        let mut previous_quantity = 0u32;
        for d in &self.quantity_discounts {
            if d.quantity <= previous_quantity {
                return Err(Error::InvalidConfig(
                    "discount quantities must ascend strictly from 1".into(),
                ));
            }
            if !(0.0..1.0).contains(&d.discount) {
                return Err(Error::InvalidConfig(format!(
                    "discount for quantity {} must lie in [0, 1)",
                    d.quantity
                )));
            }
            previous_quantity = d.quantity;
        }

        Ok(())
    }

    /// Looks up a material by id.
    pub fn material(&self, id: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == id)
    }

    /// Looks up a resolution by id.
    pub fn resolution(&self, id: &str) -> Option<&Resolution> {
        self.resolutions.iter().find(|r| r.id == id)
    }

    /// Multiplier for a cut perimeter, in inches.
    ///
    /// The tier with the smallest threshold *strictly greater* than the
    /// perimeter wins; a perimeter equal to a finite threshold falls
    /// through to the next tier. With no matching tier the multiplier is a
    /// neutral 1.0.
    pub fn complexity_multiplier(&self, perimeter_inches: f64) -> f64 {
        self.complexity
            .tiers
            .iter()
            .filter(|t| perimeter_inches < t.threshold_inches)
            .min_by(|a, b| {
                a.threshold_inches
                    .partial_cmp(&b.threshold_inches)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|t| t.multiplier)
            .unwrap_or(1.0)
    }

    /// Discount fraction for an order quantity: the highest step the
    /// quantity meets, 0.0 when none match.
    pub fn discount_for(&self, quantity: u32) -> f64 {
        self.quantity_discounts
            .iter()
            .filter(|d| quantity >= d.quantity)
            .max_by_key(|d| d.quantity)
            .map(|d| d.discount)
            .unwrap_or(0.0)
    }
}

fn check_unique_ids<'a>(ids: impl Iterator<Item = &'a str>, kind: &str) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for id in ids {
        if id.is_empty() {
            return Err(Error::InvalidConfig(format!("{kind} with empty id")));
        }
        if !seen.insert(id) {
            return Err(Error::InvalidConfig(format!("duplicate {kind} id '{id}'")));
        }
    }
    Ok(())
}

/// Serde adapter for the document's `"Infinity"` threshold literal.
#[cfg(feature = "serde")]
mod infinity {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(v),
            Raw::Text(s) if s == "Infinity" => Ok(f64::INFINITY),
            Raw::Text(s) => Err(serde::de::Error::custom(format!(
                "invalid tier threshold '{s}'"
            ))),
        }
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_infinite() {
            serializer.serialize_str("Infinity")
        } else {
            serializer.serialize_f64(*value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        PricingConfig::default().validate().unwrap();
    }

    #[test]
    fn test_duplicate_material_id_rejected() {
        let mut config = PricingConfig::default();
        config.materials.push(config.materials[0].clone());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsorted_tiers_rejected() {
        let mut config = PricingConfig::default();
        config.complexity.tiers.swap(0, 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_discount_out_of_range_rejected() {
        let mut config = PricingConfig::default();
        config.quantity_discounts[1].discount = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_complexity_lookup_is_strict() {
        let config = PricingConfig::default();
        assert_eq!(config.complexity_multiplier(11.9), 1.0);
        // A perimeter equal to a finite threshold takes the next tier.
        assert_eq!(config.complexity_multiplier(12.0), 1.1);
        assert_eq!(config.complexity_multiplier(24.0), 1.25);
        assert_eq!(config.complexity_multiplier(250.0), 1.25);
    }

    #[test]
    fn test_complexity_lookup_without_catch_all() {
        let mut config = PricingConfig::default();
        config.complexity.tiers.pop();
        assert_eq!(config.complexity_multiplier(100.0), 1.0);
    }

    #[test]
    fn test_discount_lookup_picks_highest_met_step() {
        let config = PricingConfig::default();
        assert_eq!(config.discount_for(1), 0.0);
        assert_eq!(config.discount_for(199), 0.0);
        assert_eq!(config.discount_for(200), 0.10);
        assert_eq!(config.discount_for(499), 0.10);
        assert_eq!(config.discount_for(500), 0.15);
        assert_eq!(config.discount_for(10_000), 0.15);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_parses_remote_document_shape() {
        let doc = r#"{
            "pricePerSquareInchCents": 15,
            "materials": [
                { "id": "pp_standard", "name": "Standard Polypropylene", "costMultiplier": 1.0 }
            ],
            "resolutions": [
                { "id": "dpi_96", "name": "Draft", "ppi": 96, "costMultiplier": 1.0 }
            ],
            "complexity": {
                "description": "Multiplier based on the perimeter of the cut path.",
                "tiers": [
                    { "thresholdInches": 12, "multiplier": 1.0 },
                    { "thresholdInches": "Infinity", "multiplier": 1.25 }
                ]
            },
            "quantityDiscounts": [
                { "quantity": 1, "discount": 0.0 },
                { "quantity": 200, "discount": 0.1 }
            ]
        }"#;

        let config: PricingConfig = serde_json::from_str(doc).unwrap();
        config.validate().unwrap();
        assert!(config.complexity.tiers[1].threshold_inches.is_infinite());
    }
}
