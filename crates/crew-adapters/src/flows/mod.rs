//! Flujos registrados por nombre.

pub mod competitor_research;
pub mod welcome_message;

use crew_core::{Crew, GraphConfigError, JobStatus, TriggerGraph};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::state::OverviewState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    CompetitorResearch,
    WelcomeMessage,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown flow '{0}' (known: competitor-research, welcome-message)")]
pub struct UnknownFlow(pub String);

impl FlowKind {
    pub const ALL: [FlowKind; 2] = [FlowKind::CompetitorResearch, FlowKind::WelcomeMessage];

    pub fn name(&self) -> &'static str {
        match self {
            FlowKind::CompetitorResearch => "competitor-research",
            FlowKind::WelcomeMessage => "welcome-message",
        }
    }

    /// Nombre del crew que lanza el flujo.
    pub fn crew_name(&self) -> &'static str {
        match self {
            FlowKind::CompetitorResearch => "company_overview",
            FlowKind::WelcomeMessage => "welcomer",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FlowKind::CompetitorResearch => "company overview from the job payload",
            FlowKind::WelcomeMessage => "welcome message, no input",
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FlowKind {
    type Err = UnknownFlow;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FlowKind::ALL.into_iter()
                     .find(|k| k.name() == s)
                     .ok_or_else(|| UnknownFlow(s.to_string()))
    }
}

/// Parámetros de construcción de un flujo.
pub struct FlowSettings {
    pub crew: Arc<dyn Crew>,
    /// Estado que escribe el crew al terminar bien (`Completed` salvo en
    /// pipelines de varias fases).
    pub success_status: JobStatus,
}

impl FlowSettings {
    pub fn new(crew: Arc<dyn Crew>) -> Self {
        Self { crew,
               success_status: JobStatus::Completed }
    }

    pub fn with_success_status(mut self, status: JobStatus) -> Self {
        self.success_status = status;
        self
    }
}

pub fn build_graph(kind: FlowKind, settings: FlowSettings) -> Result<TriggerGraph<OverviewState>, GraphConfigError> {
    match kind {
        FlowKind::CompetitorResearch => competitor_research::graph(settings),
        FlowKind::WelcomeMessage => welcome_message::graph(settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_names_round_trip() {
        for kind in FlowKind::ALL {
            assert_eq!(kind.name().parse::<FlowKind>(), Ok(kind));
        }
        assert_eq!("nope".parse::<FlowKind>(), Err(UnknownFlow("nope".into())));
    }
}
