use chrono::Utc;
use uuid::Uuid;

use super::types::{FlowEvent, FlowEventKind};

/// Log de una sola instancia; `seq` empieza en 0.
#[derive(Debug, Clone)]
pub struct FlowLog {
    flow_id: Uuid,
    events: Vec<FlowEvent>,
}

impl FlowLog {
    pub fn new(flow_id: Uuid) -> Self {
        Self { flow_id,
               events: Vec::new() }
    }

    pub fn flow_id(&self) -> Uuid {
        self.flow_id
    }

    pub fn append(&mut self, kind: FlowEventKind) -> &FlowEvent {
        let seq = self.events.len() as u64;
        self.events.push(FlowEvent { seq,
                                     flow_id: self.flow_id,
                                     kind,
                                     ts: Utc::now() });
        &self.events[self.events.len() - 1]
    }

    pub fn events(&self) -> &[FlowEvent] {
        &self.events
    }

    /// Secuencia compacta de códigos, p.ej. `"ISFSFC"`.
    pub fn codes(&self) -> String {
        self.events.iter().map(|e| e.kind.code()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_dense_and_flow_id_is_stamped() {
        let id = Uuid::new_v4();
        let mut log = FlowLog::new(id);
        log.append(FlowEventKind::StepStarted { step: "a".into() });
        let ev = log.append(FlowEventKind::FlowCompleted { executed: 1, unreached: 0 });
        assert_eq!(ev.seq, 1);
        assert_eq!(ev.flow_id, id);
        assert_eq!(log.codes(), "SC");
    }
}
