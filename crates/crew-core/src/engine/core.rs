use log::{debug, error, info};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use uuid::Uuid;

use super::outcome::FlowOutcome;
use crate::errors::FlowError;
use crate::event::{FlowEventKind, FlowLog};
use crate::graph::TriggerGraph;
use crate::job::JobStore;
use crate::state::WorkflowState;
use crate::step::{StepAction, StepContext};
use crate::supervisor::BackgroundSupervisor;

/// Ejecuta instancias de un grafo contra un job store.
///
/// Cada `run` es independiente: estado nuevo, supervisor nuevo, log nuevo.
/// Varios `run` pueden convivir sobre el mismo engine.
pub struct FlowEngine<S> {
    graph: Arc<TriggerGraph<S>>,
    store: Arc<dyn JobStore>,
}

impl<S> Clone for FlowEngine<S> {
    fn clone(&self) -> Self {
        Self { graph: Arc::clone(&self.graph),
               store: Arc::clone(&self.store) }
    }
}

impl<S: WorkflowState> FlowEngine<S> {
    pub fn new(graph: TriggerGraph<S>, store: Arc<dyn JobStore>) -> Self {
        Self { graph: Arc::new(graph),
               store }
    }

    pub fn graph(&self) -> &TriggerGraph<S> {
        &self.graph
    }

    pub fn store(&self) -> &Arc<dyn JobStore> {
        &self.store
    }

    /// Corre una instancia para `job_id`.
    ///
    /// Devuelve cuando la propagación termina; las unidades lanzadas pueden
    /// seguir corriendo (ver `FlowOutcome::settle`). Un step que falla aborta
    /// el resto de la instancia sin deshacer lo ya hecho.
    pub async fn run(&self, job_id: &str) -> Result<FlowOutcome<S>, FlowError> {
        let job = match self.store.fetch(job_id).await {
            Ok(Some(job)) => job,
            Ok(None) => {
                error!("flow:job_not_found job_id={job_id}");
                return Err(FlowError::JobNotFound(job_id.to_string()));
            }
            Err(source) => {
                error!("flow:job_fetch_failed job_id={job_id} err={source}");
                return Err(FlowError::Store { job_id: job_id.to_string(),
                                              source });
            }
        };

        let graph = self.graph.as_ref();
        let supervisor = BackgroundSupervisor::new(Arc::clone(&self.store));
        let mut state = S::default();
        let mut log = FlowLog::new(Uuid::new_v4());
        log.append(FlowEventKind::FlowInitialized { job_id: job.id.clone(),
                                                    definition_hash: graph.definition_hash(),
                                                    step_count: graph.len() });
        info!("flow:start flow_id={} job_id={} status={}", log.flow_id(), job.id, job.status);

        let mut executed: Vec<String> = Vec::new();
        let mut queued: HashSet<&str> = HashSet::from([graph.start_step()]);
        let mut queue: VecDeque<&str> = VecDeque::from([graph.start_step()]);

        while let Some(name) = queue.pop_front() {
            let Some(spec) = graph.step(name) else { continue };
            log.append(FlowEventKind::StepStarted { step: name.to_string() });
            debug!("step:start flow_id={} step={name}", log.flow_id());

            let (signal, spawned) = match &spec.action {
                StepAction::Body(body) => {
                    let mut ctx = StepContext::new(name, &job, &mut state, &supervisor);
                    if let Err(source) = body.run(&mut ctx).await {
                        error!("step:failed flow_id={} step={name} err={source}", log.flow_id());
                        log.append(FlowEventKind::StepFailed { step: name.to_string(),
                                                               error: source.to_string() });
                        return Err(FlowError::StepFailed { step: name.to_string(),
                                                           source });
                    }
                    (name.to_string(), ctx.into_spawned())
                }
                StepAction::Route { routes, route_fn } => {
                    let label = route_fn(&state);
                    if !routes.contains(&label) {
                        error!("router:unknown_route flow_id={} router={name} label={label}",
                               log.flow_id());
                        log.append(FlowEventKind::StepFailed { step: name.to_string(),
                                                               error: format!("undeclared route '{label}'") });
                        return Err(FlowError::UnknownRoute { router: name.to_string(),
                                                             label });
                    }
                    debug!("router:selected flow_id={} router={name} label={label}", log.flow_id());
                    log.append(FlowEventKind::RouteSelected { router: name.to_string(),
                                                              label: label.clone() });
                    (label, Vec::new())
                }
            };

            executed.push(name.to_string());
            for next in graph.listeners_of(&signal) {
                if queued.insert(next) {
                    queue.push_back(next);
                }
            }
            log.append(FlowEventKind::StepFinished { step: name.to_string(),
                                                     signal,
                                                     spawned });
        }

        let unreached: Vec<String> = graph.step_names()
                                          .filter(|n| !queued.contains(n))
                                          .map(str::to_string)
                                          .collect();
        log.append(FlowEventKind::FlowCompleted { executed: executed.len(),
                                                  unreached: unreached.len() });
        info!("flow:finished flow_id={} job_id={} executed={} units_in_flight={}",
              log.flow_id(),
              job.id,
              executed.len(),
              supervisor.pending());

        Ok(FlowOutcome { job,
                         executed,
                         unreached,
                         state,
                         log,
                         supervisor })
    }
}
