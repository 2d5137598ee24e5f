use async_trait::async_trait;
use serde_json::Value;

use crate::errors::CrewError;
use crate::job::JobResult;

/// Salida de un crew: la parte estructurada si la hay, y siempre la cruda.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrewOutput {
    pub structured: Option<JobResult>,
    pub raw: String,
}

impl CrewOutput {
    pub fn raw(raw: impl Into<String>) -> Self {
        Self { structured: None,
               raw: raw.into() }
    }

    pub fn structured(structured: JobResult, raw: impl Into<String>) -> Self {
        Self { structured: Some(structured),
               raw: raw.into() }
    }

    /// Resultado a persistir: la salida estructurada, o
    /// `{fallback_key: raw}` si no la hay.
    pub fn into_result(self, fallback_key: &str) -> JobResult {
        match self.structured {
            Some(structured) => structured,
            None => {
                let mut result = JobResult::new();
                result.insert(fallback_key.to_string(), Value::String(self.raw));
                result
            }
        }
    }
}

/// Computación multi-agente externa. Caja negra: recibe el payload del job
/// (o nada) y devuelve una salida o un error.
#[async_trait]
pub trait Crew: Send + Sync + 'static {
    fn name(&self) -> &str {
        "crew"
    }

    async fn kickoff(&self, input: Option<String>) -> Result<CrewOutput, CrewError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structured_output_wins_over_raw() {
        let mut structured = JobResult::new();
        structured.insert("overview".into(), json!("structured"));
        let out = CrewOutput::structured(structured.clone(), "raw text");
        assert_eq!(out.into_result("overview"), structured);
    }

    #[test]
    fn raw_output_is_wrapped_under_the_fallback_key() {
        let result = CrewOutput::raw("Acme makes anvils").into_result("summary");
        assert_eq!(result.get("summary"), Some(&json!("Acme makes anvils")));
        assert_eq!(result.len(), 1);
    }
}
