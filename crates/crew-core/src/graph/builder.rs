use indexmap::IndexMap;
use log::debug;

use super::TriggerGraph;
use crate::errors::GraphConfigError;
use crate::step::{StepAction, StepBody, StepKind, StepSpec, Trigger};
use crate::state::WorkflowState;

/// Registro incremental de steps.
///
/// Los nombres duplicados y un segundo start se rechazan al registrar; los
/// upstreams se validan en `build()` porque pueden registrarse después de
/// sus listeners.
pub struct TriggerGraphBuilder<S> {
    steps: IndexMap<String, StepSpec<S>>,
    start: Option<String>,
}

impl<S> std::fmt::Debug for TriggerGraphBuilder<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerGraphBuilder")
         .field("steps", &self.steps.keys().collect::<Vec<_>>())
         .field("start", &self.start)
         .finish()
    }
}

impl<S: WorkflowState> Default for TriggerGraphBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: WorkflowState> TriggerGraph<S> {
    pub fn builder() -> TriggerGraphBuilder<S> {
        TriggerGraphBuilder::new()
    }
}

impl<S: WorkflowState> TriggerGraphBuilder<S> {
    pub fn new() -> Self {
        Self { steps: IndexMap::new(),
               start: None }
    }

    pub fn register_start<B>(&mut self, name: impl Into<String>, body: B) -> Result<&mut Self, GraphConfigError>
        where B: StepBody<S> + 'static
    {
        let name = name.into();
        if let Some(existing) = &self.start {
            return Err(GraphConfigError::DuplicateStart { existing: existing.clone(),
                                                          attempted: name });
        }
        self.insert(StepSpec { name: name.clone(),
                               kind: StepKind::Start,
                               trigger: Trigger::Start,
                               action: StepAction::Body(Box::new(body)) })?;
        self.start = Some(name);
        Ok(self)
    }

    /// Listener con semántica ANY-of sobre `upstream`.
    pub fn register_listener<B>(&mut self,
                                name: impl Into<String>,
                                upstream: Trigger,
                                body: B)
                                -> Result<&mut Self, GraphConfigError>
        where B: StepBody<S> + 'static
    {
        let name = name.into();
        check_trigger(&name, &upstream)?;
        self.insert(StepSpec { name,
                               kind: StepKind::Listener,
                               trigger: upstream,
                               action: StepAction::Body(Box::new(body)) })?;
        Ok(self)
    }

    /// Router: al activarse llama a `route_fn` con el estado y emite la
    /// etiqueta devuelta, que debe estar entre `routes`.
    pub fn register_router<I, L, F>(&mut self,
                                    name: impl Into<String>,
                                    upstream: Trigger,
                                    routes: I,
                                    route_fn: F)
                                    -> Result<&mut Self, GraphConfigError>
        where I: IntoIterator<Item = L>,
              L: Into<String>,
              F: Fn(&S) -> String + Send + Sync + 'static
    {
        let name = name.into();
        check_trigger(&name, &upstream)?;
        let mut labels: Vec<String> = Vec::new();
        for label in routes.into_iter().map(Into::into) {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        if labels.is_empty() {
            return Err(GraphConfigError::EmptyRoutes(name));
        }
        self.insert(StepSpec { name,
                               kind: StepKind::Router,
                               trigger: upstream,
                               action: StepAction::Route { routes: labels,
                                                           route_fn: Box::new(route_fn) } })?;
        Ok(self)
    }

    /// Valida el grafo completo.
    pub fn build(self) -> Result<TriggerGraph<S>, GraphConfigError> {
        let start = self.start.ok_or(GraphConfigError::MissingStart)?;

        for router in self.steps.values().filter(|s| s.kind == StepKind::Router) {
            if let Some(label) = router.routes().iter().find(|l| self.steps.contains_key(l.as_str())) {
                return Err(GraphConfigError::RouteCollision { router: router.name.clone(),
                                                              label: label.clone() });
            }
        }

        for spec in self.steps.values() {
            for upstream in spec.trigger.upstream() {
                // un router sólo emite sus etiquetas, nunca su nombre
                if let Some(up) = self.steps.get(upstream).filter(|up| up.kind == StepKind::Router) {
                    return Err(GraphConfigError::ListensOnRouter { step: spec.name.clone(),
                                                                   router: up.name.clone() });
                }
                let is_step = self.steps.contains_key(upstream);
                let is_label = self.steps.values().any(|s| s.routes().iter().any(|l| l == upstream));
                if !is_step && !is_label {
                    return Err(GraphConfigError::UnknownUpstream { step: spec.name.clone(),
                                                                   upstream: upstream.to_string() });
                }
            }
        }

        debug!("graph:build start={start} steps={}", self.steps.len());
        Ok(TriggerGraph { steps: self.steps,
                          start })
    }

    fn insert(&mut self, spec: StepSpec<S>) -> Result<(), GraphConfigError> {
        if self.steps.contains_key(&spec.name) {
            return Err(GraphConfigError::DuplicateStep(spec.name));
        }
        self.steps.insert(spec.name.clone(), spec);
        Ok(())
    }
}

fn check_trigger(name: &str, trigger: &Trigger) -> Result<(), GraphConfigError> {
    match trigger {
        Trigger::AnyOf(set) if !set.is_empty() => Ok(()),
        _ => Err(GraphConfigError::EmptyTrigger(name.to_string())),
    }
}
