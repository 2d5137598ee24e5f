//! Steps: trigger, cuerpo y contexto de ejecución.

pub mod context;
pub mod definition;
pub mod trigger;

pub use context::StepContext;
pub use definition::{sync_step, FnStep, StepBody};
pub(crate) use definition::{StepAction, StepSpec};
pub use trigger::{StepKind, Trigger};
