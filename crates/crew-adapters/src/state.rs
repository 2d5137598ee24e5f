use crew_core::{UnitReport, WorkflowState};
use serde::Serialize;
use serde_json::Value;

/// Estado de los flujos de informes: el resumen producido por el crew.
///
/// Vacío mientras la unidad no termine; se rellena al hacer `settle`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewState {
    pub overview: String,
}

impl WorkflowState for OverviewState {
    fn absorb(&mut self, report: &UnitReport) {
        if !report.crew_succeeded() {
            return;
        }
        if let Some(Value::String(overview)) = report.result.get("overview") {
            self.overview = overview.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crew_core::{JobResult, JobStatus, UnitId};
    use serde_json::json;

    fn report(status: JobStatus, key: &str, value: Value) -> UnitReport {
        let mut result = JobResult::new();
        result.insert(key.into(), value);
        UnitReport { unit_id: UnitId::new(),
                     job_id: "J1".into(),
                     crew: "company_overview".into(),
                     status,
                     result,
                     persisted: Ok(()) }
    }

    #[test]
    fn successful_overview_is_absorbed() {
        let mut state = OverviewState::default();
        state.absorb(&report(JobStatus::Completed, "overview", json!("Acme makes anvils")));
        assert_eq!(state.overview, "Acme makes anvils");
    }

    #[test]
    fn failures_and_other_shapes_are_ignored() {
        let mut state = OverviewState::default();
        state.absorb(&report(JobStatus::Failed, "overview", json!("nope")));
        state.absorb(&report(JobStatus::Completed, "overview", json!({"nested": true})));
        state.absorb(&report(JobStatus::Completed, "summary", json!("elsewhere")));
        assert_eq!(state.overview, "");
    }
}
