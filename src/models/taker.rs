use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Taker {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: TakerStatus,
}

/// Persisted status. `BOOKED` only exists as an [`EffectiveStatus`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TakerStatus {
    Available,
    UnderMaintenance,
}

impl TakerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TakerStatus::Available => "AVAILABLE",
            TakerStatus::UnderMaintenance => "UNDER_MAINTENANCE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "AVAILABLE" => Some(TakerStatus::Available),
            "UNDER_MAINTENANCE" => Some(TakerStatus::UnderMaintenance),
            _ => None,
        }
    }
}

/// Status of a taker as seen for one particular day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectiveStatus {
    Available,
    UnderMaintenance,
    Booked,
}

/// A taker annotated with its status for a given day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TakerAvailability {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: EffectiveStatus,
}
