use std::sync::Arc;

use crate::job::{JobRecord, JobStore};
use crate::supervisor::{BackgroundSupervisor, BackgroundUnit, UnitHandle, UnitId};

/// Lo que ve un cuerpo de step mientras se ejecuta: el job cargado, el
/// estado de la instancia y el supervisor de unidades en segundo plano.
pub struct StepContext<'a, S> {
    step: &'a str,
    job: &'a JobRecord,
    state: &'a mut S,
    supervisor: &'a BackgroundSupervisor,
    spawned: Vec<UnitId>,
}

impl<'a, S> StepContext<'a, S> {
    pub(crate) fn new(step: &'a str,
                      job: &'a JobRecord,
                      state: &'a mut S,
                      supervisor: &'a BackgroundSupervisor)
                      -> Self {
        Self { step,
               job,
               state,
               supervisor,
               spawned: Vec::new() }
    }

    pub fn step_name(&self) -> &str {
        self.step
    }

    pub fn job(&self) -> &JobRecord {
        self.job
    }

    pub fn job_id(&self) -> &str {
        &self.job.id
    }

    pub fn state(&self) -> &S {
        self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        self.state
    }

    /// Store del flujo, para steps que escriben un estado intermedio de
    /// forma síncrona.
    pub fn store(&self) -> &Arc<dyn JobStore> {
        self.supervisor.store()
    }

    /// Lanza una unidad y vuelve de inmediato. El handle puede ignorarse:
    /// la unidad sigue viva y `FlowOutcome::settle` la espera igualmente.
    pub fn spawn(&mut self, unit: BackgroundUnit) -> UnitHandle {
        let handle = self.supervisor.spawn(unit);
        self.spawned.push(handle.id());
        handle
    }

    pub(crate) fn into_spawned(self) -> Vec<UnitId> {
        self.spawned
    }
}
