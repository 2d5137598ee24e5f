//! Cableado de un job: store, crew y grafo; y su ejecución hasta el final
//! de la propagación o hasta que terminan las unidades.

use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crew_adapters::{build_graph, CommandCrew, FlowKind, FlowSettings, OverviewState};
use crew_core::{Crew, FlowEngine, FlowError, GraphConfigError, JobStatus, JobStore, UnitReport};
use crew_persistence::{build_pool_from_config, PersistenceError, PgJobStore, PoolProvider};

use crate::config::{ConfigError, CrewConfig, DbConfig};
use crate::errors::AppError;

/// Crew de proceso externo para `kind` según la configuración.
pub fn crew_for(kind: FlowKind, config: &CrewConfig) -> Result<Arc<dyn Crew>, ConfigError> {
    let line = config.command.as_deref().unwrap_or_default();
    let mut crew = CommandCrew::from_command_line(kind.crew_name(), line).ok_or(ConfigError::Missing("CREW_COMMAND"))?;
    if let Some(limit) = config.timeout {
        crew = crew.with_timeout(limit);
    }
    Ok(Arc::new(crew))
}

/// Bloqueante: construye el pool y aplica migraciones.
pub fn pg_store(db: &DbConfig) -> Result<PgJobStore<PoolProvider>, PersistenceError> {
    let pool = build_pool_from_config(db)?;
    Ok(PgJobStore::new(PoolProvider { pool }))
}

pub fn engine(kind: FlowKind,
              settings: FlowSettings,
              store: Arc<dyn JobStore>)
              -> Result<FlowEngine<OverviewState>, GraphConfigError> {
    Ok(FlowEngine::new(build_graph(kind, settings)?, store))
}

/// Crew desde la configuración más grafo de `kind`, listos para correr.
pub fn prepare(kind: FlowKind,
               crew: &CrewConfig,
               success_status: JobStatus,
               store: Arc<dyn JobStore>)
               -> Result<FlowEngine<OverviewState>, AppError> {
    let crew = crew_for(kind, crew)?;
    let settings = FlowSettings::new(crew).with_success_status(success_status);
    Ok(engine(kind, settings, store)?)
}

/// Qué hacer con las unidades cuando termina la propagación.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Esperarlas y aplicar sus reports al estado.
    Settle,
    /// Devolver en cuanto termina el grafo; las unidades siguen solas.
    Detach,
}

#[derive(Debug)]
pub struct JobRun {
    pub flow_id: Uuid,
    pub job_id: String,
    pub executed: Vec<String>,
    pub unreached: Vec<String>,
    pub state: OverviewState,
    /// Vacío con `Completion::Detach`.
    pub reports: Vec<UnitReport>,
    /// Unidades que seguían corriendo al devolver (sólo `Detach`).
    pub detached_units: usize,
}

pub async fn run_job(engine: &FlowEngine<OverviewState>,
                     job_id: &str,
                     completion: Completion)
                     -> Result<JobRun, FlowError> {
    let outcome = engine.run(job_id).await?;
    let flow_id = outcome.flow_id();
    let unreached = outcome.unreached().to_vec();

    match completion {
        Completion::Detach => {
            let detached_units = outcome.pending_units();
            info!("job:detached flow_id={flow_id} job_id={job_id} units={detached_units}");
            Ok(JobRun { flow_id,
                        job_id: outcome.job_id().to_string(),
                        executed: outcome.executed().to_vec(),
                        unreached,
                        state: outcome.state().clone(),
                        reports: Vec::new(),
                        detached_units })
        }
        Completion::Settle => {
            let settled = outcome.settle().await;
            info!("job:settled flow_id={flow_id} job_id={job_id} units={}", settled.reports.len());
            Ok(JobRun { flow_id,
                        job_id: settled.job_id,
                        executed: settled.executed,
                        unreached,
                        state: settled.state,
                        reports: settled.reports,
                        detached_units: 0 })
        }
    }
}
