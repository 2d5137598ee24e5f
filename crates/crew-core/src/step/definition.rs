use async_trait::async_trait;

use super::context::StepContext;
use super::trigger::{StepKind, Trigger};
use crate::errors::StepError;
use crate::state::WorkflowState;

/// Cuerpo de un step start/listener.
///
/// Puede mutar el estado, lanzar unidades en segundo plano vía
/// `ctx.spawn` y esperar I/O. Un `Err` aborta la instancia de flujo.
#[async_trait]
pub trait StepBody<S>: Send + Sync {
    async fn run(&self, ctx: &mut StepContext<'_, S>) -> Result<(), StepError>;
}

/// Adaptador para cuerpos síncronos escritos como closure.
pub struct FnStep<F>(F);

/// Envuelve una closure síncrona como `StepBody`.
pub fn sync_step<S, F>(f: F) -> FnStep<F>
    where S: WorkflowState,
          F: Fn(&mut StepContext<'_, S>) -> Result<(), StepError> + Send + Sync
{
    FnStep(f)
}

#[async_trait]
impl<S, F> StepBody<S> for FnStep<F>
    where S: WorkflowState,
          F: Fn(&mut StepContext<'_, S>) -> Result<(), StepError> + Send + Sync
{
    async fn run(&self, ctx: &mut StepContext<'_, S>) -> Result<(), StepError> {
        (self.0)(ctx)
    }
}

pub(crate) type RouteFn<S> = Box<dyn Fn(&S) -> String + Send + Sync>;

pub(crate) enum StepAction<S> {
    Body(Box<dyn StepBody<S>>),
    Route { routes: Vec<String>, route_fn: RouteFn<S> },
}

/// Step registrado en el grafo.
pub(crate) struct StepSpec<S> {
    pub(crate) name: String,
    pub(crate) kind: StepKind,
    pub(crate) trigger: Trigger,
    pub(crate) action: StepAction<S>,
}

impl<S> StepSpec<S> {
    /// Etiquetas declaradas si es un router.
    pub(crate) fn routes(&self) -> &[String] {
        match &self.action {
            StepAction::Route { routes, .. } => routes,
            StepAction::Body(_) => &[],
        }
    }
}
