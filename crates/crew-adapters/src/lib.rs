//! crew-adapters
//!
//! Piezas concretas sobre crew-core: el crew que invoca un proceso externo,
//! el estado compartido de los flujos de informes y los flujos registrados
//! (`competitor-research`, `welcome-message`).

pub mod crews;
pub mod flows;
pub mod state;
pub mod steps;

pub use crews::{parse_crew_stdout, CommandCrew, UnconfiguredCrew};
pub use flows::{build_graph, FlowKind, FlowSettings, UnknownFlow};
pub use state::OverviewState;
