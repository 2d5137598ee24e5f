//! Estado tipado de una instancia de flujo.

use std::fmt::Debug;

use crate::supervisor::UnitReport;

/// Registro mutable compartido por todos los steps de una instancia.
///
/// Se construye con `Default` al empezar cada `run` y sólo lo tocan los
/// cuerpos de los steps. Las unidades en segundo plano nunca lo mutan: sus
/// reports se aplican con `absorb` cuando el caller hace `settle`.
pub trait WorkflowState: Default + Debug + Send + Sync + 'static {
    fn absorb(&mut self, _report: &UnitReport) {}
}

impl WorkflowState for () {}
