//! Game Scene Manager
//!
//! This example drives a game's scenes from a JSON definition.
//!
//! Key concepts:
//! - Loading a machine definition from JSON
//! - Exit/enter callbacks observing `from()` and `to()`
//! - Bound transitions for menu buttons
//! - Going back with `last()`
//! - Callbacks rewriting their own slot
//!
//! Run with: RUST_LOG=statewalk=trace cargo run --example scene_manager

use statewalk::{Machine, MachineDefinition};

const SCENES: &str = r#"{
    "edges": [
        { "from": "splash", "to": "title" },
        { "from": "title", "to": ["level", "options"] },
        { "from": "options", "to": "title" },
        { "from": "level", "to": ["paused", "title"] },
        { "from": "paused", "to": ["level", "title"] }
    ],
    "initial": "splash",
    "history_limit": 16
}"#;

#[derive(Debug)]
struct Input {
    button: &'static str,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Scene Manager Example ===\n");

    let definition = MachineDefinition::from_json(SCENES)?;
    let mut game: Machine<Input> = Machine::builder()
        .definition(definition)
        .on_exit("level", |m: &mut Machine<Input>, input: &Input| {
            println!(
                "  saving level progress ({} -> {}, button {:?})",
                m.from().map(|s| s.as_str()).unwrap_or("?"),
                m.to().map(|s| s.as_str()).unwrap_or("?"),
                input.button
            );
        })
        .on_enter("title", |m: &mut Machine<Input>, _: &Input| {
            println!("  title screen (came from {})", m.from().map(|s| s.as_str()).unwrap_or("?"));
            // Play the intro jingle once; later visits are silent.
            if let Some(title) = m.state_mut("title") {
                title.set_on_enter(|_, _| println!("  title screen"));
            }
            println!("  intro jingle");
        })
        .build()?;

    println!("Start: {}", game.current().map(|s| s.as_str()).unwrap_or("-"));

    game.next(&Input { button: "any" })?;

    let start_button = game.bound("level").ok_or("no level scene")?;
    start_button.transition(&mut game, &Input { button: "start" })?;
    game.transition("paused", &Input { button: "esc" })?;

    // Resume: go back to whatever was left last.
    let previous = game.last(0).cloned().ok_or("no history")?;
    game.transition_to(previous, &Input { button: "esc" })?;

    game.transition("title", &Input { button: "quit" })?;

    println!("\nFrom title, next() is ambiguous:");
    if let Err(err) = game.next(&Input { button: "any" }) {
        println!("  {err}");
    }

    println!("\nScene path:");
    for scene in game.history().path() {
        println!("  {scene}");
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
