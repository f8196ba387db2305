//! Checkpoint and Resume
//!
//! This example demonstrates saving a machine's position and resuming it
//! in a freshly built machine.
//!
//! Key concepts:
//! - Snapshots capture current state and history, not the definition
//! - Serialization formats (JSON for readability, binary for compactness)
//! - Atomic writes to prevent corruption
//! - Resume from interruption
//!
//! Run with: cargo run --example checkpoint_resume

use statewalk::{edges, Machine, Snapshot};
use std::fs;
use std::path::{Path, PathBuf};

fn pipeline() -> Machine<usize> {
    Machine::builder()
        .edges(edges![
            "queued" => "fetching",
            "fetching" => "parsing",
            "parsing" => "indexing",
            "indexing" => "done",
        ])
        .initial("queued")
        .on_enter("fetching", |_: &mut Machine<usize>, batch: &usize| {
            println!("  fetching batch {batch}");
        })
        .on_enter("done", |_: &mut Machine<usize>, batch: &usize| {
            println!("  batch {batch} complete");
        })
        .build()
        .expect("pipeline definition is valid")
}

fn save(dir: &Path, snapshot: &Snapshot) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = dir.join(format!("snapshot-{}.json", snapshot.id));
    let temp_path = path.with_extension("json.tmp");

    // Atomic write: write to temp file, then rename
    fs::write(&temp_path, snapshot.to_json()?)?;
    fs::rename(&temp_path, &path)?;

    println!("  [Snapshot] saved to {}", path.display());
    Ok(path)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Checkpoint and Resume Example ===\n");

    let dir = std::env::temp_dir().join("statewalk-snapshots");
    fs::create_dir_all(&dir)?;

    println!("Run 1: starting pipeline (interrupted after parsing)");
    let mut first = pipeline();
    first.next(&7)?;
    first.next(&7)?;
    let saved = save(&dir, &first.snapshot())?;
    drop(first);

    println!("\nRun 2: resuming");
    let snapshot = Snapshot::from_json(&fs::read_to_string(&saved)?)?;
    let mut second = pipeline();
    second.restore(snapshot.clone())?;
    println!(
        "  resumed at {} (previously {})",
        second.current().map(|s| s.as_str()).unwrap_or("-"),
        second.last(0).map(|s| s.as_str()).unwrap_or("-")
    );
    while second.next_candidate().is_some() {
        second.next(&7)?;
    }

    let bytes = snapshot.to_bytes()?;
    let json_len = snapshot.to_json()?.len();
    println!("\nSnapshot size: {json_len} bytes as JSON, {} bytes as binary", bytes.len());

    fs::remove_dir_all(&dir).ok();

    println!("\n=== Example Complete ===");
    Ok(())
}
