//! Domain model for bias analyses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use std::fmt;

/// The fixed set of cognitive bias categories the service recognizes.
///
/// The set is closed: model output naming any other category is rejected
/// during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasCategory {
    Confirmation,
    Anchoring,
    Availability,
    Survivorship,
    Bandwagon,
    DunningKruger,
    Negativity,
    SunkCost,
}

impl BiasCategory {
    pub const ALL: [BiasCategory; 8] = [
        BiasCategory::Confirmation,
        BiasCategory::Anchoring,
        BiasCategory::Availability,
        BiasCategory::Survivorship,
        BiasCategory::Bandwagon,
        BiasCategory::DunningKruger,
        BiasCategory::Negativity,
        BiasCategory::SunkCost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BiasCategory::Confirmation => "confirmation",
            BiasCategory::Anchoring => "anchoring",
            BiasCategory::Availability => "availability",
            BiasCategory::Survivorship => "survivorship",
            BiasCategory::Bandwagon => "bandwagon",
            BiasCategory::DunningKruger => "dunning_kruger",
            BiasCategory::Negativity => "negativity",
            BiasCategory::SunkCost => "sunk_cost",
        }
    }
}

impl fmt::Display for BiasCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding: which bias is present and how strongly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, validator::Validate)]
pub struct BiasFinding {
    pub id: BiasCategory,

    /// How strongly the bias is present, 0 to 100.
    #[validate(range(min = 0.0, max = 100.0, message = "percentage must be between 0 and 100"))]
    pub percentage: f64,
}

/// A persisted bias analysis row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BiasAnalysis {
    pub id: String,

    /// The original scenario text submitted by the caller.
    pub text: String,

    /// Findings, stored as a JSON column.
    pub results: Json<Vec<BiasFinding>>,

    /// Model-produced narrative summary.
    pub summary: String,

    /// Assigned by the store layer at insert time.
    pub timestamp: DateTime<Utc>,
}

/// Input for persisting a new analysis; the timestamp is assigned at insert.
#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub id: String,
    pub text: String,
    pub results: Vec<BiasFinding>,
    pub summary: String,
}
