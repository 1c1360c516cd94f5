//! PhaseStore implementation for PgStorage.

use super::*;

use crate::traits::PhaseStore;
use async_trait::async_trait;

#[async_trait]
impl PhaseStore for PgStorage {
    async fn phases_for_case(&self, case_id: &str) -> Result<Vec<TreatmentPhase>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {PHASE_COLUMNS} FROM treatment_phases
             WHERE case_id = $1 ORDER BY session_index ASC"
        ))
        .bind(case_id)
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(row_to_phase).collect()
    }

    async fn save_phase(&self, phase: &TreatmentPhase) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO treatment_phases (id, case_id, label, planned_on, session_index, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (id) DO UPDATE SET
               label = EXCLUDED.label, planned_on = EXCLUDED.planned_on,
               session_index = EXCLUDED.session_index",
        )
        .bind(&phase.id)
        .bind(&phase.case_id)
        .bind(&phase.label)
        .bind(phase.planned_on)
        .bind(phase.session_index)
        .bind(phase.created_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }
}
