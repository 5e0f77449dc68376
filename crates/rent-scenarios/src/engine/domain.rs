use serde::{Deserialize, Serialize};

/// One unit-type configuration within a property. Monetary fields are
/// per-unit monthly dollars; `square_footage` is per unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floorplan {
    pub name: String,
    pub unit_type: String,
    pub unit_count: u32,
    pub square_footage: f64,
    pub base_rent: f64,
    pub amenity_rent: f64,
}

impl Floorplan {
    /// Rejects shapes the engine refuses to price: non-positive area or
    /// negative/non-finite rents. Everything else is accepted as-is.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.square_footage > 0.0) || !self.square_footage.is_finite() {
            return Err(EngineError::InvalidInput {
                field: "square_footage",
                requirement: "a positive, finite number",
                value: self.square_footage,
            });
        }
        if !(self.base_rent >= 0.0) || !self.base_rent.is_finite() {
            return Err(EngineError::InvalidInput {
                field: "base_rent",
                requirement: "a non-negative, finite amount",
                value: self.base_rent,
            });
        }
        if !(self.amenity_rent >= 0.0) || !self.amenity_rent.is_finite() {
            return Err(EngineError::InvalidInput {
                field: "amenity_rent",
                requirement: "a non-negative, finite amount",
                value: self.amenity_rent,
            });
        }
        Ok(())
    }
}

/// Rent discount mechanism applied to gross rent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcessionType {
    #[default]
    None,
    Percentage,
    Dollar,
    FreeMonths,
}

impl ConcessionType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Percentage => "Percentage Off",
            Self::Dollar => "Dollar Off",
            Self::FreeMonths => "Free Months",
        }
    }
}

/// Adjustment parameters a scenario applies uniformly to every floorplan.
///
/// Percentage adjustments are fractional multipliers (0.05 = +5%); dollar
/// adjustments are flat monthly deltas added on top of the
/// percentage-adjusted amount. The order is fixed:
/// `adjusted = base * (1 + pct) + dollar`. `concession_value` is percent
/// points, dollars, or months depending on `concession_type`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioAdjustments {
    pub base_rent_pct_adj: f64,
    pub base_rent_dollar_adj: f64,
    pub amenity_rent_pct_adj: f64,
    pub amenity_rent_dollar_adj: f64,
    pub concession_type: ConcessionType,
    pub concession_value: f64,
}

impl ScenarioAdjustments {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.concession_value >= 0.0) || !self.concession_value.is_finite() {
            return Err(EngineError::InvalidInput {
                field: "concession_value",
                requirement: "a non-negative, finite number",
                value: self.concession_value,
            });
        }
        Ok(())
    }
}

/// Per-floorplan monthly figures produced by the rent adjustment calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FloorplanFigures {
    pub adjusted_base: f64,
    pub adjusted_amenity: f64,
    pub gross_rent: f64,
    pub concession_amount: f64,
    pub net_effective_rent: f64,
}

/// Portfolio-level aggregates for one scenario. Derived values only:
/// recomputed from the current floorplan inventory on every calculation
/// request, never hand-edited.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResults {
    pub total_annual_revenue: f64,
    pub avg_rent_per_unit: f64,
    pub revenue_per_sqft: f64,
    pub weighted_avg_rent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterfallStepKind {
    Base,
    Delta,
    Final,
}

/// One labeled step in the revenue bridge between two scenarios.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterfallStep {
    pub label: &'static str,
    pub value: f64,
    #[serde(rename = "type")]
    pub kind: WaterfallStepKind,
}

/// Failures the engine reports to its immediate caller. Deterministic: the
/// same inputs always fail the same way, so there is nothing to retry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("{field} must be {requirement}, got {value}")]
    InvalidInput {
        field: &'static str,
        requirement: &'static str,
        value: f64,
    },
    #[error("baseline and target scenarios reference different floorplan inventories")]
    MismatchedInventory,
}
