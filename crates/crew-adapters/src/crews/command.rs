//! Crew como proceso externo.
//!
//! El payload del job va por stdin; stdout se interpreta como JSON objeto
//! (salida estructurada) o, si no lo es, como texto crudo. Los crews suelen
//! imprimir trazas antes del resultado, así que también se prueba la última
//! línea no vacía.

use async_trait::async_trait;
use crew_core::{Crew, CrewError, CrewOutput};
use log::{debug, warn};
use serde_json::Value;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct CommandCrew {
    name: String,
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandCrew {
    pub fn new(name: impl Into<String>, program: impl Into<String>) -> Self {
        Self { name: name.into(),
               program: program.into(),
               args: Vec::new(),
               timeout: None }
    }

    /// Parte `line` por espacios (sin comillas de shell). `None` si está
    /// vacía. Para argumentos con espacios usar `new` + `with_args`.
    pub fn from_command_line(name: impl Into<String>, line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(name, program).with_args(parts))
    }

    pub fn with_args<I, A>(mut self, args: I) -> Self
        where I: IntoIterator<Item = A>,
              A: Into<String>
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Vencido el plazo el proceso se mata y el crew falla con `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    async fn execute(&self, input: Option<String>) -> Result<std::process::Output, CrewError> {
        let mut child = Command::new(&self.program).args(&self.args)
                                                   .stdin(Stdio::piped())
                                                   .stdout(Stdio::piped())
                                                   .stderr(Stdio::piped())
                                                   .kill_on_drop(true)
                                                   .spawn()
                                                   .map_err(|e| {
                                                       CrewError::Failed(format!("could not start crew '{}': {e}",
                                                                                 self.name))
                                                   })?;
        // stdin se escribe a la par que se leen stdout/stderr: un crew que
        // responde mientras lee llenaría los pipes y ambos lados se bloquean
        let stdin = child.stdin.take();
        let feed = async move {
            if let (Some(mut stdin), Some(payload)) = (stdin, input) {
                stdin.write_all(payload.as_bytes()).await?;
            }
            // al soltar stdin el proceso recibe EOF
            Ok::<(), std::io::Error>(())
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        match fed {
            // el crew puede terminar sin leer toda la entrada
            Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => {
                return Err(CrewError::Failed(format!("could not send input to crew '{}': {e}", self.name)));
            }
            _ => {}
        }
        output.map_err(|e| CrewError::Failed(format!("crew '{}' did not finish: {e}", self.name)))
    }
}

#[async_trait]
impl Crew for CommandCrew {
    fn name(&self) -> &str {
        &self.name
    }

    async fn kickoff(&self, input: Option<String>) -> Result<CrewOutput, CrewError> {
        debug!("crew:kickoff name={} program={} has_input={}",
               self.name,
               self.program,
               input.is_some());
        let run = self.execute(input);
        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, run).await {
                Ok(finished) => finished?,
                Err(_) => {
                    warn!("crew:timeout name={} after={limit:?}", self.name);
                    return Err(CrewError::Timeout);
                }
            },
            None => run.await?,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CrewError::Failed(format!("crew '{}' exited with {}: {}",
                                                 self.name,
                                                 output.status,
                                                 stderr.trim())));
        }
        Ok(parse_crew_stdout(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Interpreta stdout de un crew.
pub fn parse_crew_stdout(stdout: &str) -> CrewOutput {
    let trimmed = stdout.trim();
    let last_line = trimmed.lines().rev().map(str::trim).find(|l| !l.is_empty());
    for candidate in [Some(trimmed), last_line].into_iter().flatten() {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(candidate) {
            return CrewOutput::structured(map, trimmed);
        }
    }
    CrewOutput::raw(trimmed)
}
