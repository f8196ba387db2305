//! End-to-end scenarios for building and driving machines.

use statewalk::{edges, ConfigurationError, Machine, MachineDefinition, StateId, TransitionError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn id(name: &str) -> StateId {
    StateId::new(name).unwrap()
}

#[test]
fn construction_rejects_malformed_definitions() {
    let cases = [
        r#"{}"#,
        r#"{ "initial": "A" }"#,
        r#"{ "edges": [{ "from": 7, "to": "B" }] }"#,
        r#"{ "edges": [{ "from": "A", "to": { "B": true } }] }"#,
        r#"{ "edges": [{ "from": "A", "to": "B", "weight": 1 }] }"#,
    ];
    for text in cases {
        let result = Machine::<()>::from_json(text);
        assert!(
            matches!(result, Err(ConfigurationError::Malformed(_))),
            "accepted {text}"
        );
    }

    let cases = [
        r#"{ "edges": [] }"#,
        r#"{ "edges": [{ "from": "", "to": "B" }] }"#,
        r#"{ "edges": [{ "from": "A", "to": [] }] }"#,
        r#"{ "edges": [{ "from": "A", "to": ["B", ""] }] }"#,
    ];
    for text in cases {
        let result = Machine::<()>::from_json(text);
        assert!(
            matches!(result, Err(ConfigurationError::Invalid { .. })),
            "accepted {text}"
        );
    }
}

#[test]
fn bootstrap_transition_enters_without_history() {
    let entered = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&entered);

    let mut machine: Machine<()> = Machine::builder()
        .edges(edges!["X" => "Y"])
        .on_enter("X", move |_: &mut Machine<()>, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();

    machine.transition("X", &()).unwrap();

    assert_eq!(entered.load(Ordering::SeqCst), 1);
    assert_eq!(machine.current().unwrap(), "X");
    assert!(machine.history().is_empty());
    assert!(machine.last(0).is_none());
}

#[test]
fn exit_runs_before_enter() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let exit_log = Arc::clone(&order);
    let enter_log = Arc::clone(&order);

    let mut machine: Machine<()> = Machine::builder()
        .edges(edges!["A" => ["B", "C"]])
        .initial("A")
        .on_exit("A", move |_: &mut Machine<()>, _| exit_log.lock().unwrap().push("exit A"))
        .on_enter("B", move |_: &mut Machine<()>, _| enter_log.lock().unwrap().push("enter B"))
        .build()
        .unwrap();

    machine.transition("B", &()).unwrap();

    assert_eq!(*order.lock().unwrap(), vec!["exit A", "enter B"]);
    assert_eq!(machine.last(0).unwrap(), "A");
    assert_eq!(machine.current().unwrap(), "B");
}

#[test]
fn invalid_transition_is_a_no_op() {
    let calls = Arc::new(AtomicUsize::new(0));
    let exits = Arc::clone(&calls);
    let enters = Arc::clone(&calls);

    let mut machine: Machine<()> = Machine::builder()
        .edges(edges!["A" => ["B", "C"]])
        .initial("A")
        .on_exit("A", move |_: &mut Machine<()>, _| {
            exits.fetch_add(1, Ordering::SeqCst);
        })
        .on_enter("B", move |_: &mut Machine<()>, _| {
            enters.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();

    let result = machine.transition("Z", &());

    assert_eq!(
        result,
        Err(TransitionError::InvalidTransition {
            from: id("A"),
            to: id("Z"),
        })
    );
    assert_eq!(machine.current().unwrap(), "A");
    assert!(machine.history().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn next_follows_single_edges() {
    let mut machine: Machine<()> = Machine::builder()
        .edges(edges!["A" => "B", "B" => "C"])
        .initial("A")
        .build()
        .unwrap();

    machine.next(&()).unwrap();
    assert_eq!(machine.current().unwrap(), "B");

    machine.next(&()).unwrap();
    assert_eq!(machine.current().unwrap(), "C");

    assert_eq!(machine.last(0).unwrap(), "B");
    assert_eq!(machine.last(1).unwrap(), "A");

    // C has no outgoing edge.
    assert!(matches!(
        machine.next(&()),
        Err(TransitionError::AmbiguousNext { .. })
    ));
    assert_eq!(machine.current().unwrap(), "C");
}

#[test]
fn ambiguous_next_is_a_no_op() {
    let mut machine: Machine<()> = Machine::builder()
        .edges(edges!["A" => ["B", "C"]])
        .initial("A")
        .build()
        .unwrap();

    let result = machine.next(&());

    assert!(matches!(result, Err(TransitionError::AmbiguousNext { .. })));
    assert_eq!(machine.current().unwrap(), "A");
    assert!(machine.history().is_empty());
}

#[test]
fn history_depth_tracks_every_departure() {
    let mut machine: Machine<()> = Machine::builder()
        .edges(edges!["S0" => "S1", "S1" => "S2", "S2" => "S3", "S3" => "S4"])
        .initial("S0")
        .build()
        .unwrap();

    for _ in 0..4 {
        machine.next(&()).unwrap();
    }

    for k in 0..4 {
        assert_eq!(machine.last(k).unwrap().as_str(), format!("S{}", 3 - k));
    }
    assert!(machine.last(4).is_none());
    assert!(machine.last(100).is_none());
}

#[test]
fn going_back_requires_an_edge() {
    let mut with_back_edge: Machine<()> = Machine::builder()
        .edges(edges!["A" => "B", "B" => "C", "C" => "B"])
        .initial("A")
        .build()
        .unwrap();
    with_back_edge.next(&()).unwrap();
    with_back_edge.next(&()).unwrap();

    let back = with_back_edge.last(0).cloned().unwrap();
    with_back_edge.transition_to(back, &()).unwrap();
    assert_eq!(with_back_edge.current().unwrap(), "B");

    let mut without_back_edge: Machine<()> = Machine::builder()
        .edges(edges!["A" => "B", "B" => "C"])
        .initial("A")
        .build()
        .unwrap();
    without_back_edge.next(&()).unwrap();
    without_back_edge.next(&()).unwrap();

    let back = without_back_edge.last(0).cloned().unwrap();
    assert_eq!(
        without_back_edge.transition_to(back, &()),
        Err(TransitionError::InvalidTransition {
            from: id("C"),
            to: id("B"),
        })
    );
    assert_eq!(without_back_edge.current().unwrap(), "C");
}

#[test]
fn json_definition_drives_a_scene_manager() {
    let definition = MachineDefinition::from_json(
        r#"{
            "edges": [
                { "from": "boot", "to": "title" },
                { "from": "title", "to": ["level", "credits"] },
                { "from": "level", "to": ["title", "game-over"] },
                { "from": "credits", "to": "title" },
                { "from": "game-over", "to": "title" }
            ],
            "initial": "boot"
        }"#,
    )
    .unwrap();

    let scenes = Arc::new(Mutex::new(Vec::new()));
    let mut builder = Machine::<u32>::builder().definition(definition);
    for scene in ["title", "level", "credits", "game-over"] {
        let scenes = Arc::clone(&scenes);
        builder = builder.on_enter(scene, move |m: &mut Machine<u32>, score: &u32| {
            scenes
                .lock()
                .unwrap()
                .push(format!("{}:{score}", m.to().unwrap()));
        });
    }
    let mut machine = builder.build().unwrap();

    machine.next(&0).unwrap();
    machine.transition("level", &0).unwrap();
    machine.transition("game-over", &1200).unwrap();
    machine.next(&1200).unwrap();

    assert_eq!(
        *scenes.lock().unwrap(),
        vec!["title:0", "level:0", "game-over:1200", "title:1200"]
    );
    let path: Vec<&str> = machine
        .history()
        .path()
        .into_iter()
        .map(StateId::as_str)
        .collect();
    assert_eq!(path, vec!["boot", "title", "level", "game-over", "title"]);
}

#[test]
fn bounded_history_forgets_old_states() {
    let mut machine: Machine<()> = Machine::builder()
        .edges(edges!["A" => "B", "B" => "A"])
        .initial("A")
        .history_limit(3)
        .build()
        .unwrap();

    for _ in 0..10 {
        machine.next(&()).unwrap();
    }

    assert_eq!(machine.history().len(), 3);
    assert!(machine.last(2).is_some());
    assert!(machine.last(3).is_none());
}
