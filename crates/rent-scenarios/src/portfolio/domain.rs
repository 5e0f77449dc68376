use crate::engine::{Floorplan, ScenarioAdjustments, ScenarioResults};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for stored properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropertyId(pub String);

/// Identifier wrapper for stored floorplans.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FloorplanId(pub String);

/// Identifier wrapper for stored analyses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnalysisId(pub String);

/// Identifier wrapper for stored scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScenarioId(pub String);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub id: PropertyId,
    pub name: String,
    pub address: String,
    pub total_units: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDraft {
    pub name: String,
    pub address: String,
    pub total_units: u32,
}

/// Presentation metadata that rides along with a floorplan but plays no part
/// in any calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorplanDetails {
    #[serde(flatten)]
    pub floorplan: Floorplan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorplanRecord {
    pub id: FloorplanId,
    pub property_id: PropertyId,
    #[serde(flatten)]
    pub details: FloorplanDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorplanDraft {
    pub property_id: PropertyId,
    #[serde(flatten)]
    pub details: FloorplanDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: AnalysisId,
    pub property_id: PropertyId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_analysis_id: Option<AnalysisId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisDraft {
    pub property_id: PropertyId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub id: ScenarioId,
    pub analysis_id: AnalysisId,
    pub name: String,
    #[serde(flatten)]
    pub adjustments: ScenarioAdjustments,
    /// Absent until the first calculation; overwritten on every subsequent
    /// calculation request, never hand-edited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<ScenarioResults>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDraft {
    pub analysis_id: AnalysisId,
    pub name: String,
    #[serde(flatten)]
    pub adjustments: ScenarioAdjustments,
}

/// A property together with its floorplan inventory, as exposed by the API.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyView {
    #[serde(flatten)]
    pub property: PropertyRecord,
    pub floorplans: Vec<FloorplanRecord>,
}

/// An analysis together with its scenarios, as exposed by the API.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisView {
    #[serde(flatten)]
    pub analysis: AnalysisRecord,
    pub scenarios: Vec<ScenarioRecord>,
}
