//! Traffic Light State Machine
//!
//! This example demonstrates a simple cyclic state machine.
//!
//! Key concepts:
//! - Cyclic state transitions (states repeat)
//! - `next()` following the only outgoing edge
//! - Enter callbacks receiving a payload
//!
//! Run with: cargo run --example traffic_light

use statewalk::{edges, Machine};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Traffic Light State Machine ===\n");

    let mut light: Machine<u32> = Machine::builder()
        .edges(edges!["red" => "green", "green" => "yellow", "yellow" => "red"])
        .initial("red")
        .on_enter("green", |_: &mut Machine<u32>, tick: &u32| {
            println!("  [tick {tick:>2}] green: go");
        })
        .on_enter("yellow", |_: &mut Machine<u32>, tick: &u32| {
            println!("  [tick {tick:>2}] yellow: caution");
        })
        .on_enter("red", |_: &mut Machine<u32>, tick: &u32| {
            println!("  [tick {tick:>2}] red: stop");
        })
        .build()
        .expect("traffic light definition is valid");

    println!("Initial state: {}\n", light.current().expect("initial state set"));

    for tick in 1..=7 {
        if let Err(err) = light.next(&tick) {
            println!("  unexpected: {err}");
        }
    }

    println!("\nLast three states left:");
    for k in 0..3 {
        if let Some(state) = light.last(k) {
            println!("  last({k}) = {state}");
        }
    }

    println!("\nSkipping yellow is not allowed:");
    if let Err(err) = light.transition("red", &0) {
        println!("  {err}");
    }

    println!("\n=== Example Complete ===");
}
