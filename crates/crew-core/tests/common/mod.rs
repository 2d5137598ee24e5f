#![allow(dead_code)]

use async_trait::async_trait;
use crew_core::{BackgroundUnit, Crew, CrewError, CrewOutput, JobResult, JobStatus, StepBody,
                StepContext, StepError, UnitReport, WorkflowState};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
pub struct Trace {
    pub visited: Vec<String>,
    pub branch: String,
    pub overview: String,
}

impl WorkflowState for Trace {
    fn absorb(&mut self, report: &UnitReport) {
        if let Some(overview) = report.result.get("overview").and_then(|v| v.as_str()) {
            self.overview = overview.to_string();
        }
    }
}

/// Anota su nombre en `visited`.
pub struct Visit;

#[async_trait]
impl StepBody<Trace> for Visit {
    async fn run(&self, ctx: &mut StepContext<'_, Trace>) -> Result<(), StepError> {
        let name = ctx.step_name().to_string();
        ctx.state_mut().visited.push(name);
        Ok(())
    }
}

/// Fija la rama que leerá el router.
pub struct Choose(pub &'static str);

#[async_trait]
impl StepBody<Trace> for Choose {
    async fn run(&self, ctx: &mut StepContext<'_, Trace>) -> Result<(), StepError> {
        let name = ctx.step_name().to_string();
        let state = ctx.state_mut();
        state.visited.push(name);
        state.branch = self.0.to_string();
        Ok(())
    }
}

pub struct Fail;

#[async_trait]
impl StepBody<Trace> for Fail {
    async fn run(&self, _ctx: &mut StepContext<'_, Trace>) -> Result<(), StepError> {
        Err(StepError::Failed("boom".into()))
    }
}

/// Lanza `crew` con el payload del job y sigue sin esperar.
pub struct SpawnCrew {
    pub crew: Arc<dyn Crew>,
    pub success_status: JobStatus,
}

impl SpawnCrew {
    pub fn new(crew: Arc<dyn Crew>) -> Self {
        Self { crew,
               success_status: JobStatus::Completed }
    }
}

#[async_trait]
impl StepBody<Trace> for SpawnCrew {
    async fn run(&self, ctx: &mut StepContext<'_, Trace>) -> Result<(), StepError> {
        let input = ctx.job().input().map(str::to_string);
        let unit = BackgroundUnit::new(ctx.job_id(), input, Arc::clone(&self.crew))
            .with_success_status(self.success_status);
        ctx.spawn(unit);
        let name = ctx.step_name().to_string();
        ctx.state_mut().visited.push(name);
        Ok(())
    }
}

/// Devuelve `{"overview": "<input> overview"}` como salida estructurada.
pub struct OverviewCrew;

#[async_trait]
impl Crew for OverviewCrew {
    fn name(&self) -> &str {
        "company_overview"
    }

    async fn kickoff(&self, input: Option<String>) -> Result<CrewOutput, CrewError> {
        let mut structured = JobResult::new();
        let text = format!("{} overview", input.unwrap_or_default());
        structured.insert("overview".into(), json!(text));
        Ok(CrewOutput::structured(structured, text))
    }
}

pub struct FailingCrew(pub CrewError);

#[async_trait]
impl Crew for FailingCrew {
    async fn kickoff(&self, _input: Option<String>) -> Result<CrewOutput, CrewError> {
        Err(self.0.clone())
    }
}

/// No termina hasta que alguien llama a `gate.notify_one()`.
pub struct GatedCrew {
    pub gate: Arc<Notify>,
}

#[async_trait]
impl Crew for GatedCrew {
    async fn kickoff(&self, input: Option<String>) -> Result<CrewOutput, CrewError> {
        self.gate.notified().await;
        Ok(CrewOutput::raw(format!("{} overview", input.unwrap_or_default())))
    }
}
