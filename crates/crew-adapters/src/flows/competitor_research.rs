//! load_job_document -> call_company_overview_crew -> report_overview

use crew_core::{GraphConfigError, Trigger, TriggerGraph};

use super::FlowSettings;
use crate::state::OverviewState;
use crate::steps::{CallCrew, LoadJobDocument, ReportOverview};

pub const LOAD_JOB_DOCUMENT: &str = "load_job_document";
pub const CALL_COMPANY_OVERVIEW_CREW: &str = "call_company_overview_crew";
pub const REPORT_OVERVIEW: &str = "report_overview";

pub(super) fn graph(settings: FlowSettings) -> Result<TriggerGraph<OverviewState>, GraphConfigError> {
    let mut b = TriggerGraph::builder();
    b.register_start(LOAD_JOB_DOCUMENT, LoadJobDocument)?
     .register_listener(CALL_COMPANY_OVERVIEW_CREW,
                        Trigger::on(LOAD_JOB_DOCUMENT),
                        CallCrew::with_payload(settings.crew, settings.success_status))?
     .register_listener(REPORT_OVERVIEW, Trigger::on(CALL_COMPANY_OVERVIEW_CREW), ReportOverview)?;
    b.build()
}
