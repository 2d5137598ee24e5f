mod common;

use common::{Trace, Visit};
use crew_core::{GraphConfigError, TriggerGraph, Trigger};

#[test]
fn duplicate_step_names_are_rejected() {
    let mut b = TriggerGraph::<Trace>::builder();
    b.register_start("load", Visit).unwrap();
    b.register_listener("crew", Trigger::on("load"), Visit).unwrap();
    let err = b.register_listener("crew", Trigger::on("load"), Visit).err();
    assert_eq!(err, Some(GraphConfigError::DuplicateStep("crew".into())));
}

#[test]
fn listener_on_unknown_upstream_fails_at_build() {
    let mut b = TriggerGraph::<Trace>::builder();
    b.register_start("load", Visit).unwrap();
    b.register_listener("report", Trigger::on("crew"), Visit).unwrap();
    let err = b.build().err();
    assert_eq!(err,
               Some(GraphConfigError::UnknownUpstream { step: "report".into(),
                                                        upstream: "crew".into() }));
}

#[test]
fn graph_without_start_fails() {
    let mut b = TriggerGraph::<Trace>::builder();
    b.register_listener("a", Trigger::on("b"), Visit).unwrap();
    b.register_listener("b", Trigger::on("a"), Visit).unwrap();
    assert_eq!(b.build().err(), Some(GraphConfigError::MissingStart));
}

#[test]
fn listeners_may_be_registered_before_their_upstream() {
    let mut b = TriggerGraph::<Trace>::builder();
    b.register_listener("report", Trigger::on("load"), Visit).unwrap();
    b.register_start("load", Visit).unwrap();
    let graph = b.build().unwrap();
    assert_eq!(graph.start_step(), "load");
    assert_eq!(graph.step_names().collect::<Vec<_>>(), vec!["report", "load"]);
}

#[test]
fn router_labels_are_valid_upstreams() {
    let mut b = TriggerGraph::<Trace>::builder();
    b.register_start("start", Visit)
     .unwrap()
     .register_router("route", Trigger::on("start"), ["A", "B"], |s: &Trace| s.branch.clone())
     .unwrap()
     .register_listener("on_a", Trigger::on("A"), Visit)
     .unwrap()
     .register_listener("on_b", Trigger::on("B"), Visit)
     .unwrap();
    let graph = b.build().unwrap();
    assert_eq!(graph.routes_of("route"), ["A".to_string(), "B".to_string()]);
    assert_eq!(graph.listeners_of("A"), vec!["on_a"]);
    assert!(graph.listeners_of("route").is_empty());
}

#[test]
fn listener_on_a_router_name_fails_at_build() {
    let mut b = TriggerGraph::<Trace>::builder();
    b.register_start("start", Visit)
     .unwrap()
     .register_router("route", Trigger::on("start"), ["A"], |_: &Trace| "A".into())
     .unwrap()
     .register_listener("after_route", Trigger::on("route"), Visit)
     .unwrap();
    assert_eq!(b.build().err(),
               Some(GraphConfigError::ListensOnRouter { step: "after_route".into(),
                                                        router: "route".into() }));
}

#[test]
fn definition_hash_tracks_shape_only() {
    let build = |extra: bool| {
        let mut b = TriggerGraph::<Trace>::builder();
        b.register_start("load", Visit).unwrap();
        b.register_listener("crew", Trigger::on("load"), Visit).unwrap();
        if extra {
            b.register_listener("report", Trigger::on("crew"), Visit).unwrap();
        }
        b.build().unwrap()
    };
    assert_eq!(build(false).definition_hash(), build(false).definition_hash());
    assert_ne!(build(false).definition_hash(), build(true).definition_hash());
}

#[test]
fn mermaid_renders_nodes_and_edges() {
    let mut b = TriggerGraph::<Trace>::builder();
    b.register_start("load", Visit).unwrap();
    b.register_router("route", Trigger::on("load"), ["A"], |_: &Trace| "A".into())
     .unwrap();
    b.register_listener("done", Trigger::any_of(["A", "load"]), Visit).unwrap();
    let text = b.build().unwrap().to_mermaid();

    assert!(text.starts_with("flowchart TD\n"));
    assert!(text.contains("s0([\"load\"])"));
    assert!(text.contains("s1{\"route\"}"));
    assert!(text.contains("s2[\"done\"]"));
    assert!(text.contains("s0 --> s1"));
    assert!(text.contains("s1 -->|A| s2"));
    assert!(text.contains("s0 --> s2"));
}
