//! Cuerpos de step reutilizados por los flujos de informes.

use async_trait::async_trait;
use crew_core::{BackgroundUnit, Crew, JobStatus, StepBody, StepContext, StepError};
use log::info;
use std::sync::Arc;

use crate::state::OverviewState;

/// Start de los flujos: el job ya viene cargado por el motor, aquí sólo se
/// deja constancia.
pub struct LoadJobDocument;

#[async_trait]
impl StepBody<OverviewState> for LoadJobDocument {
    async fn run(&self, ctx: &mut StepContext<'_, OverviewState>) -> Result<(), StepError> {
        let job = ctx.job();
        info!("job:loaded job_id={} status={} payload_len={}",
              job.id,
              job.status,
              job.input_payload.as_deref().map(str::len).unwrap_or(0));
        Ok(())
    }
}

/// Qué recibe el crew como input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrewInput {
    /// El payload del job; obligatorio y no vacío.
    Payload,
    None,
}

/// Lanza el crew en segundo plano y retorna sin esperarlo.
pub struct CallCrew {
    pub crew: Arc<dyn Crew>,
    pub input: CrewInput,
    pub success_status: JobStatus,
}

impl CallCrew {
    pub fn with_payload(crew: Arc<dyn Crew>, success_status: JobStatus) -> Self {
        Self { crew,
               input: CrewInput::Payload,
               success_status }
    }

    pub fn without_input(crew: Arc<dyn Crew>, success_status: JobStatus) -> Self {
        Self { crew,
               input: CrewInput::None,
               success_status }
    }
}

#[async_trait]
impl StepBody<OverviewState> for CallCrew {
    async fn run(&self, ctx: &mut StepContext<'_, OverviewState>) -> Result<(), StepError> {
        let input = match self.input {
            CrewInput::Payload => {
                let payload = ctx.job()
                                 .input()
                                 .ok_or_else(|| StepError::MissingInput(ctx.job_id().to_string()))?;
                Some(payload.to_string())
            }
            CrewInput::None => None,
        };
        let unit = BackgroundUnit::new(ctx.job_id(), input, Arc::clone(&self.crew))
            .with_success_status(self.success_status);
        let handle = ctx.spawn(unit);
        info!("crew:launched step={} crew={} unit_id={}",
              ctx.step_name(),
              self.crew.name(),
              handle.id());
        Ok(())
    }
}

/// Informa el resumen disponible. Corre en cuanto el step del crew retorna,
/// así que normalmente lo ve vacío.
pub struct ReportOverview;

#[async_trait]
impl StepBody<OverviewState> for ReportOverview {
    async fn run(&self, ctx: &mut StepContext<'_, OverviewState>) -> Result<(), StepError> {
        let overview = &ctx.state().overview;
        if overview.is_empty() {
            info!("overview:pending job_id={}", ctx.job_id());
        } else {
            info!("overview:ready job_id={} overview={overview}", ctx.job_id());
        }
        Ok(())
    }
}

/// Step que sólo registra un mensaje.
pub struct Note(pub &'static str);

#[async_trait]
impl StepBody<OverviewState> for Note {
    async fn run(&self, ctx: &mut StepContext<'_, OverviewState>) -> Result<(), StepError> {
        info!("{} step={} job_id={}", self.0, ctx.step_name(), ctx.job_id());
        Ok(())
    }
}
