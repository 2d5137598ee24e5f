use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Start,
    Listener,
    Router,
}

/// Condición de activación de un step.
///
/// `AnyOf` es semántica OR: basta con que se emita una de las señales del
/// conjunto. No existe AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Start,
    AnyOf(BTreeSet<String>),
}

impl Trigger {
    /// Escucha un único upstream (nombre de step o etiqueta de router).
    pub fn on(upstream: impl Into<String>) -> Self {
        Trigger::AnyOf(BTreeSet::from([upstream.into()]))
    }

    pub fn any_of<I, N>(upstream: I) -> Self
        where I: IntoIterator<Item = N>,
              N: Into<String>
    {
        Trigger::AnyOf(upstream.into_iter().map(Into::into).collect())
    }

    pub fn fires_on(&self, signal: &str) -> bool {
        match self {
            Trigger::Start => false,
            Trigger::AnyOf(set) => set.contains(signal),
        }
    }

    /// Upstreams en orden alfabético; vacío para `Start`.
    pub fn upstream(&self) -> Vec<&str> {
        match self {
            Trigger::Start => Vec::new(),
            Trigger::AnyOf(set) => set.iter().map(String::as_str).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_of_fires_on_each_member() {
        let t = Trigger::any_of(["a", "b"]);
        assert!(t.fires_on("a"));
        assert!(t.fires_on("b"));
        assert!(!t.fires_on("c"));
        assert_eq!(t.upstream(), vec!["a", "b"]);
    }

    #[test]
    fn start_never_fires_on_a_signal() {
        assert!(!Trigger::Start.fires_on("anything"));
        assert!(Trigger::Start.upstream().is_empty());
    }
}
