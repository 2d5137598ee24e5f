//! Motor de flujos: carga el job, recorre el grafo en anchura y entrega un
//! `FlowOutcome` en cuanto no quedan steps elegibles (sin esperar a las
//! unidades en segundo plano).

mod core;
mod outcome;

pub use self::core::FlowEngine;
pub use outcome::{FlowOutcome, SettledFlow};
