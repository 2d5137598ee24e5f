//! Tipos de evento del flujo.
//!
//! El `FlowEngine` emite uno por cada transición observable de una
//! instancia: arranque, inicio/fin de cada step, decisión de router y cierre.
//! Las unidades en segundo plano no emiten eventos aquí (terminan después
//! de que el log se cierra); su rastro es el `UnitReport`.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::supervisor::UnitId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FlowEventKind {
    /// Primer evento de todo `flow_id`.
    FlowInitialized {
        job_id: String,
        definition_hash: String,
        step_count: usize,
    },
    StepStarted { step: String },
    /// El cuerpo retornó. `signal` es lo que se propaga a los listeners.
    StepFinished {
        step: String,
        signal: String,
        spawned: Vec<UnitId>,
    },
    /// Error terminal: la instancia no continúa.
    StepFailed { step: String, error: String },
    RouteSelected { router: String, label: String },
    FlowCompleted { executed: usize, unreached: usize },
}

impl FlowEventKind {
    /// Letra compacta para asserts de secuencia en tests.
    pub fn code(&self) -> char {
        match self {
            FlowEventKind::FlowInitialized { .. } => 'I',
            FlowEventKind::StepStarted { .. } => 'S',
            FlowEventKind::StepFinished { .. } => 'F',
            FlowEventKind::StepFailed { .. } => 'X',
            FlowEventKind::RouteSelected { .. } => 'R',
            FlowEventKind::FlowCompleted { .. } => 'C',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEvent {
    pub seq: u64, // orden de append dentro del flow
    pub flow_id: Uuid,
    pub kind: FlowEventKind,
    pub ts: DateTime<Utc>,
}
