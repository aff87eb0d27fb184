use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Taker;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    /// Calendar day in IST. Stored without a time component.
    pub date: NaiveDate,
    #[serde(flatten)]
    pub assignment: TakerAssignment,
    pub mobile_no: String,
    pub delivery_address: String,
    pub booking_by: Option<String>,
}

/// Serialized flat into the booking as `assignment` plus `takerId`, with
/// `takerId` always present (`null` when unassigned).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "AssignmentRepr", into = "AssignmentRepr")]
pub enum TakerAssignment {
    Assigned { taker_id: String },
    Unassigned,
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum AssignmentKind {
    Assigned,
    Unassigned,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignmentRepr {
    #[serde(default, skip_deserializing)]
    assignment: Option<AssignmentKind>,
    #[serde(default)]
    taker_id: Option<String>,
}

impl From<AssignmentRepr> for TakerAssignment {
    fn from(repr: AssignmentRepr) -> Self {
        TakerAssignment::from_taker_id(repr.taker_id)
    }
}

impl From<TakerAssignment> for AssignmentRepr {
    fn from(assignment: TakerAssignment) -> Self {
        match assignment {
            TakerAssignment::Assigned { taker_id } => AssignmentRepr {
                assignment: Some(AssignmentKind::Assigned),
                taker_id: Some(taker_id),
            },
            TakerAssignment::Unassigned => AssignmentRepr {
                assignment: Some(AssignmentKind::Unassigned),
                taker_id: None,
            },
        }
    }
}

impl TakerAssignment {
    pub fn from_taker_id(taker_id: Option<String>) -> Self {
        match taker_id {
            Some(taker_id) => TakerAssignment::Assigned { taker_id },
            None => TakerAssignment::Unassigned,
        }
    }

    pub fn taker_id(&self) -> Option<&str> {
        match self {
            TakerAssignment::Assigned { taker_id } => Some(taker_id),
            TakerAssignment::Unassigned => None,
        }
    }

    pub fn is_assigned_to(&self, id: &str) -> bool {
        self.taker_id() == Some(id)
    }
}

/// A booking with its taker embedded, as shown in delivery lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingWithTaker {
    #[serde(flatten)]
    pub booking: Booking,
    pub taker: Option<Taker>,
}
