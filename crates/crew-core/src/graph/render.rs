use std::fmt::Write as _;

use super::TriggerGraph;
use crate::step::StepKind;

/// `flowchart TD`; los nodos usan ids posicionales (`s0`, `s1`, ...) para no
/// depender de qué caracteres lleven los nombres.
pub(super) fn mermaid<S>(graph: &TriggerGraph<S>) -> String {
    let ids: Vec<(&str, String)> = graph.step_names()
                                        .enumerate()
                                        .map(|(i, name)| (name, format!("s{i}")))
                                        .collect();
    let id_of = |name: &str| ids.iter().find(|(n, _)| *n == name).map(|(_, id)| id.as_str());

    let mut out = String::from("flowchart TD\n");
    for (name, id) in &ids {
        let label = name.replace('"', "'");
        let node = match graph.kind_of(name) {
            Some(StepKind::Start) => format!("{id}([\"{label}\"])"),
            Some(StepKind::Router) => format!("{id}{{\"{label}\"}}"),
            _ => format!("{id}[\"{label}\"]"),
        };
        let _ = writeln!(out, "    {node}");
    }

    for (name, id) in &ids {
        let Some(trigger) = graph.trigger_of(name) else { continue };
        for upstream in trigger.upstream() {
            if let Some(from) = id_of(upstream) {
                let _ = writeln!(out, "    {from} --> {id}");
                continue;
            }
            for (router, router_id) in &ids {
                if graph.routes_of(router).iter().any(|l| l == upstream) {
                    let _ = writeln!(out, "    {router_id} -->|{upstream}| {id}");
                }
            }
        }
    }
    out
}
