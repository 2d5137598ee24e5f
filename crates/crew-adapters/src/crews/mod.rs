//! Implementaciones de `Crew`.

mod command;

pub use command::{parse_crew_stdout, CommandCrew};

use async_trait::async_trait;
use crew_core::{Crew, CrewError, CrewOutput};

/// Placeholder para construir grafos sin crew real (p.ej. para renderizar).
/// Cualquier invocación falla.
pub struct UnconfiguredCrew {
    name: String,
}

impl UnconfiguredCrew {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Crew for UnconfiguredCrew {
    fn name(&self) -> &str {
        &self.name
    }

    async fn kickoff(&self, _input: Option<String>) -> Result<CrewOutput, CrewError> {
        Err(CrewError::Failed(format!("no command configured for crew '{}'", self.name)))
    }
}
