use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A planned treatment phase for a case.
///
/// Phases are authored by the treatment-plan feature; this subsystem only
/// reads them to join plan against actual notes by `session_index`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreatmentPhase {
    pub id: String,
    pub case_id: String,
    pub label: String,
    pub planned_on: Option<NaiveDate>,
    pub session_index: i32,
    pub created_at: DateTime<Utc>,
}
