//! Log de eventos append-only de una instancia de flujo.

pub mod flow_log;
pub mod types;

pub use flow_log::FlowLog;
pub use types::{FlowEvent, FlowEventKind};
