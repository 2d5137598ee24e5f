//! load_job_document -> acknowledge_job -> call_welcomer_crew -> finish

use crew_core::{GraphConfigError, Trigger, TriggerGraph};

use super::FlowSettings;
use crate::state::OverviewState;
use crate::steps::{CallCrew, LoadJobDocument, Note};

pub(super) fn graph(settings: FlowSettings) -> Result<TriggerGraph<OverviewState>, GraphConfigError> {
    let mut b = TriggerGraph::builder();
    b.register_start("load_job_document", LoadJobDocument)?
     .register_listener("acknowledge_job", Trigger::on("load_job_document"), Note("job:acknowledged"))?
     .register_listener("call_welcomer_crew",
                        Trigger::on("acknowledge_job"),
                        CallCrew::without_input(settings.crew, settings.success_status))?
     .register_listener("finish", Trigger::on("call_welcomer_crew"), Note("flow:done"))?;
    b.build()
}
