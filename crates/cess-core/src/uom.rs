//! # Units of Measure
//!
//! The fixed set of units a quantity can be declared in, and the pure
//! conversion between them.
//!
//! ## Conversion Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Dimension   Unit     Base factor   UQC codes accepted                  │
//! │  ─────────   ──────   ───────────   ──────────────────                  │
//! │  Mass        g        1             GMS                                 │
//! │              kg       1,000         KGS                                 │
//! │              qtl      100,000       QTL                                 │
//! │              tonne    1,000,000     TON, MTS                            │
//! │  Volume      ml       1             MLT                                 │
//! │              litre    1,000         LTR                                 │
//! │              kl       1,000,000     KLR                                 │
//! │  Count       piece    1             PCS, NOS                            │
//! │                                                                         │
//! │  Converting across dimensions is UnsupportedConversion.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every factor is a power of ten, so `convert` is exact in `Decimal`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult, ValidationError};

/// Physical dimension of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Mass,
    Volume,
    Count,
}

/// A unit of measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Uom {
    Gram,
    Kilogram,
    Quintal,
    Tonne,
    Millilitre,
    Litre,
    Kilolitre,
    Piece,
}

impl Uom {
    /// Every supported unit, in table order.
    pub const ALL: [Uom; 8] = [
        Uom::Gram,
        Uom::Kilogram,
        Uom::Quintal,
        Uom::Tonne,
        Uom::Millilitre,
        Uom::Litre,
        Uom::Kilolitre,
        Uom::Piece,
    ];

    /// Returns the dimension this unit measures.
    pub const fn dimension(&self) -> Dimension {
        match self {
            Uom::Gram | Uom::Kilogram | Uom::Quintal | Uom::Tonne => Dimension::Mass,
            Uom::Millilitre | Uom::Litre | Uom::Kilolitre => Dimension::Volume,
            Uom::Piece => Dimension::Count,
        }
    }

    /// How many base units (g, ml, piece) one of this unit holds.
    const fn base_factor(&self) -> i64 {
        match self {
            Uom::Gram | Uom::Millilitre | Uom::Piece => 1,
            Uom::Kilogram | Uom::Litre => 1_000,
            Uom::Quintal => 100_000,
            Uom::Tonne | Uom::Kilolitre => 1_000_000,
        }
    }

    /// Canonical short name, used in rule files, responses and logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Uom::Gram => "g",
            Uom::Kilogram => "kg",
            Uom::Quintal => "qtl",
            Uom::Tonne => "tonne",
            Uom::Millilitre => "ml",
            Uom::Litre => "litre",
            Uom::Kilolitre => "kl",
            Uom::Piece => "piece",
        }
    }

    /// Returns true when `convert(_, self, to)` would succeed.
    pub fn converts_to(&self, to: Uom) -> bool {
        self.dimension() == to.dimension()
    }
}

impl fmt::Display for Uom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Uom {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "g" | "gm" | "gms" | "gram" | "grams" => Ok(Uom::Gram),
            "kg" | "kgs" | "kilogram" | "kilograms" => Ok(Uom::Kilogram),
            "qtl" | "quintal" | "quintals" => Ok(Uom::Quintal),
            "t" | "ton" | "tons" | "tonne" | "tonnes" | "mt" | "mts" => Ok(Uom::Tonne),
            "ml" | "mlt" | "millilitre" | "milliliter" => Ok(Uom::Millilitre),
            "l" | "ltr" | "litre" | "liter" | "litres" | "liters" => Ok(Uom::Litre),
            "kl" | "klr" | "kilolitre" | "kiloliter" => Ok(Uom::Kilolitre),
            "pc" | "pcs" | "piece" | "pieces" | "nos" | "unit" | "units" => Ok(Uom::Piece),
            "" => Err(ValidationError::Required {
                field: "unit_of_measure".to_string(),
            }),
            other => Err(ValidationError::invalid_format(
                "unit_of_measure",
                format!("unknown unit '{}'", other),
            )),
        }
    }
}

impl TryFrom<String> for Uom {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Uom> for String {
    fn from(uom: Uom) -> Self {
        uom.as_str().to_string()
    }
}

// =============================================================================
// Conversion
// =============================================================================

/// Converts `quantity` from one unit to another of the same dimension.
///
/// Pure and deterministic. Ratios are powers of ten so there is no
/// intermediate rounding. `Decimal` holds at most 28 fractional digits:
/// scaling down by 10ⁿ a quantity that already uses more than 28 − n of
/// them cannot be exact, and is rejected rather than rounded.
///
/// ## Example
/// ```rust
/// use cess_core::uom::{convert, Uom};
/// use rust_decimal::Decimal;
///
/// let tonnes = convert(Decimal::from(2_500), Uom::Kilogram, Uom::Tonne).unwrap();
/// assert_eq!(tonnes, Decimal::new(25, 1)); // 2.5
///
/// assert!(convert(Decimal::ONE, Uom::Kilogram, Uom::Litre).is_err());
/// ```
pub fn convert(quantity: Decimal, from: Uom, to: Uom) -> CoreResult<Decimal> {
    if !from.converts_to(to) {
        return Err(CoreError::UnsupportedConversion { from, to });
    }
    if from == to {
        return Ok(quantity);
    }

    let from_factor = from.base_factor();
    let to_factor = to.base_factor();
    if from_factor >= to_factor {
        return quantity
            .checked_mul(Decimal::from(from_factor / to_factor))
            .ok_or_else(|| {
                CoreError::InvalidInput(ValidationError::OutOfRange {
                    field: "quantity".to_string(),
                    min: "0".to_string(),
                    max: Decimal::MAX.to_string(),
                })
            });
    }

    let divisor = Decimal::from(to_factor / from_factor);
    match quantity.checked_div(divisor) {
        Some(converted) if converted.checked_mul(divisor) == Some(quantity) => Ok(converted),
        _ => Err(ValidationError::invalid_format(
            "quantity",
            format!("{} {} has too many decimal places to express exactly in {}", quantity, from, to),
        )
        .into()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
