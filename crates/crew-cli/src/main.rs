//! `crewflow`: ejecuta flujos contra la tabla `reports` de Postgres.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use crew_adapters::{build_graph, FlowKind, FlowSettings, UnconfiguredCrew};
use crew_core::{JobRecord, JobStatus, JobStore};
use crewflow::logging::init_logging;
use crewflow::runner::{self, Completion};
use crewflow::AppConfig;

#[derive(Parser)]
#[command(name = "crewflow", version, about = "Job-driven crew workflows")]
struct Cli {
    /// Fuerza nivel de log `debug`
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Corre un flujo para un job existente
    Run {
        #[arg(long)]
        job_id: String,
        #[arg(long, default_value = "competitor-research")]
        flow: FlowKind,
        /// Sobrescribe CREW_COMMAND
        #[arg(long)]
        crew_command: Option<String>,
        /// Sobrescribe CREW_TIMEOUT_SECS
        #[arg(long)]
        crew_timeout_secs: Option<u64>,
        /// El crew deja el job en `In Progress` en vez de `Completed`
        #[arg(long)]
        in_progress: bool,
    },
    /// Da de alta un job `Pending`
    Submit {
        #[arg(long)]
        job_id: String,
        #[arg(long)]
        payload: Option<String>,
    },
    /// Imprime el grafo de un flujo en Mermaid
    Graph {
        #[arg(long, default_value = "competitor-research")]
        flow: FlowKind,
    },
    /// Lista los flujos registrados
    Flows,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = AppConfig::from_env().context("loading configuration")?;
    init_logging(&config.logging, cli.debug).context("initializing logging")?;

    match cli.command {
        Command::Flows => {
            for kind in FlowKind::ALL {
                println!("{:<22} {}", kind.name(), kind.description());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Graph { flow } => {
            let settings = FlowSettings::new(Arc::new(UnconfiguredCrew::new(flow.crew_name())));
            let graph = build_graph(flow, settings)?;
            println!("%% {} definition_hash={}", flow, graph.definition_hash());
            print!("{}", graph.to_mermaid());
            Ok(ExitCode::SUCCESS)
        }
        Command::Submit { job_id, payload } => {
            let store = open_store(&config).await?;
            store.insert_job(JobRecord::new(&job_id, payload))
                 .await
                 .with_context(|| format!("submitting job {job_id}"))?;
            println!("job {job_id} submitted ({})", JobStatus::Pending);
            Ok(ExitCode::SUCCESS)
        }
        Command::Run { job_id,
                       flow,
                       crew_command,
                       crew_timeout_secs,
                       in_progress, } => {
            if crew_command.is_some() {
                config.crew.command = crew_command;
            }
            if let Some(secs) = crew_timeout_secs {
                config.crew.timeout = (secs > 0).then(|| Duration::from_secs(secs));
            }
            let status = if in_progress { JobStatus::InProgress } else { JobStatus::Completed };
            let store: Arc<dyn JobStore> = Arc::new(open_store(&config).await?);
            let engine = runner::prepare(flow, &config.crew, status, store)?;
            // el proceso termina al volver: las unidades se esperan siempre
            let job_run = runner::run_job(&engine, &job_id, Completion::Settle).await?;

            println!("flow {} job {} flow_id={}", flow, job_run.job_id, job_run.flow_id);
            println!("executed: {}", job_run.executed.join(" -> "));
            if !job_run.unreached.is_empty() {
                println!("unreached: {}", job_run.unreached.join(", "));
            }
            for report in &job_run.reports {
                let written = if report.persisted.is_ok() { "written" } else { "NOT written" };
                println!("unit {} crew={} status={} ({written})", report.unit_id, report.crew, report.status);
            }
            let all_ok = job_run.reports.iter().all(|r| r.crew_succeeded() && r.persisted.is_ok());
            Ok(if all_ok { ExitCode::SUCCESS } else { ExitCode::from(2) })
        }
    }
}

async fn open_store(config: &AppConfig) -> Result<crew_persistence::PgJobStore<crew_persistence::PoolProvider>> {
    let db = config.require_database()?.clone();
    let store = tokio::task::spawn_blocking(move || runner::pg_store(&db)).await
                                                                          .context("opening job store")??;
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_has_no_detach_flag() {
        let parsed = Cli::try_parse_from(["crewflow", "run", "--job-id", "J1", "--detach"]);
        assert!(parsed.is_err());
        let parsed = Cli::try_parse_from(["crewflow", "run", "--job-id", "J1", "--in-progress"]);
        assert!(matches!(parsed.map(|c| c.command),
                         Ok(Command::Run { in_progress: true, .. })));
    }
}
