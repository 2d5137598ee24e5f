//! crew-core: motor de flujos dirigido por jobs.
//!
//! Un flujo es un grafo pequeño de steps con nombre, conectados por triggers
//! declarativos (start, listen, any-of, router). El `FlowEngine` lo recorre en
//! anchura para un job concreto; cada step puede mutar el estado tipado del
//! flujo y lanzar unidades de trabajo en segundo plano (crews) que escriben el
//! estado terminal del job a través de un `JobStore`.

pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod graph;
pub mod hashing;
pub mod job;
pub mod state;
pub mod step;
pub mod supervisor;

pub use engine::{FlowEngine, FlowOutcome, SettledFlow};
pub use errors::{CrewError, FlowError, GraphConfigError, StepError, StoreError};
pub use event::{FlowEvent, FlowEventKind, FlowLog};
pub use graph::{TriggerGraph, TriggerGraphBuilder};
pub use job::{InMemoryJobStore, JobRecord, JobResult, JobStatus, JobStore, StatusWrite};
pub use state::WorkflowState;
pub use step::{sync_step, FnStep, StepBody, StepContext, StepKind, Trigger};
pub use supervisor::{BackgroundSupervisor, BackgroundUnit, Crew, CrewOutput, UnitHandle, UnitId, UnitReport};
