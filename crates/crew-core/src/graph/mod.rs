//! Grafo de triggers: steps con nombre y la relación "quién despierta a
//! quién". Se construye con `TriggerGraphBuilder` y es inmutable después.

mod builder;
mod render;

pub use builder::TriggerGraphBuilder;

use indexmap::IndexMap;
use serde_json::{json, Value};
use std::collections::{HashSet, VecDeque};

use crate::constants::ENGINE_VERSION;
use crate::hashing::hash_value;
use crate::step::{StepKind, StepSpec, Trigger};

pub struct TriggerGraph<S> {
    // IndexMap: el orden de registro decide el orden de encolado.
    steps: IndexMap<String, StepSpec<S>>,
    start: String,
}

impl<S> TriggerGraph<S> {
    pub fn start_step(&self) -> &str {
        &self.start
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Nombres en orden de registro.
    pub fn step_names(&self) -> impl Iterator<Item = &str> {
        self.steps.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.steps.contains_key(name)
    }

    pub fn kind_of(&self, name: &str) -> Option<StepKind> {
        self.steps.get(name).map(|s| s.kind)
    }

    pub fn trigger_of(&self, name: &str) -> Option<&Trigger> {
        self.steps.get(name).map(|s| &s.trigger)
    }

    /// Etiquetas declaradas por un router; vacío para cualquier otro step.
    pub fn routes_of(&self, name: &str) -> &[String] {
        self.steps.get(name).map(|s| s.routes()).unwrap_or(&[])
    }

    pub(crate) fn step(&self, name: &str) -> Option<&StepSpec<S>> {
        self.steps.get(name)
    }

    /// Steps cuyo trigger se satisface con `signal`, en orden de registro.
    pub fn listeners_of(&self, signal: &str) -> Vec<&str> {
        self.steps
            .values()
            .filter(|s| s.trigger.fires_on(signal))
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Steps alcanzables desde el start suponiendo que cada router puede
    /// emitir cualquiera de sus etiquetas. Sin routers coincide exactamente
    /// con lo que ejecuta una instancia.
    pub fn reachable_from_start(&self) -> Vec<&str> {
        let mut seen: HashSet<&str> = HashSet::from([self.start.as_str()]);
        let mut order = vec![self.start.as_str()];
        let mut queue = VecDeque::from([self.start.as_str()]);
        while let Some(name) = queue.pop_front() {
            let Some(spec) = self.steps.get(name) else { continue };
            let signals: Vec<&str> = match spec.kind {
                StepKind::Router => spec.routes().iter().map(String::as_str).collect(),
                _ => vec![spec.name.as_str()],
            };
            for signal in signals {
                for next in self.listeners_of(signal) {
                    if seen.insert(next) {
                        order.push(next);
                        queue.push_back(next);
                    }
                }
            }
        }
        order
    }

    /// Forma del grafo como JSON (sin cuerpos). Base del `definition_hash`.
    pub fn shape(&self) -> Value {
        let steps: Vec<Value> = self.steps
                                    .values()
                                    .map(|s| {
                                        json!({
                                            "name": s.name,
                                            "kind": s.kind,
                                            "upstream": s.trigger.upstream(),
                                            "routes": s.routes(),
                                        })
                                    })
                                    .collect();
        json!({ "engine": ENGINE_VERSION, "start": self.start, "steps": steps })
    }

    /// Hash blake3 estable de `shape()`.
    pub fn definition_hash(&self) -> String {
        hash_value(&self.shape())
    }

    /// Render Mermaid (`flowchart TD`) del grafo.
    pub fn to_mermaid(&self) -> String {
        render::mermaid(self)
    }
}
