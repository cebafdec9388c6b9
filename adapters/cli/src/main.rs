#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Gridbot movement scripts.
//!
//! Loads a bundled or custom level, parses the script surface into engine
//! commands, renders one ASCII frame per applied state, and reports the
//! outcome either as text or as JSON.

mod render;
mod script;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use gridbot_arena::{levels, query, Arena};
use gridbot_core::{FnSink, RobotState, RunError};
use serde::Serialize;

/// Arguments accepted by the gridbot binary.
#[derive(Debug, Parser)]
#[command(name = "gridbot", about = "Run a movement script against a grid level")]
struct Args {
    /// Name of a bundled level.
    #[arg(long, default_value = "level1", conflicts_with = "layout")]
    level: String,

    /// Path to a custom layout file used instead of a bundled level.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Movement script, e.g. "right*2 down display:done".
    #[arg(long, default_value = "")]
    script: String,

    /// Emit the outcome and history as JSON instead of frames.
    #[arg(long)]
    json: bool,

    /// Suppress per-state frames.
    #[arg(long)]
    quiet: bool,
}

/// Entry point for the gridbot command-line interface.
fn main() -> ExitCode {
    env_logger::init();
    match run(&Args::parse()) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<ExitCode> {
    let layout = load_layout(args)?;
    let arena = Arena::parse(&layout).context("invalid arena layout")?;
    let commands = script::parse(&args.script)?;
    log::info!("running {} commands", commands.len());

    let animate = !args.quiet && !args.json;
    let mutations = arena.mutations();
    let mut applied = Vec::new();
    let mut sink = FnSink::new(|state: &RobotState| {
        if animate {
            println!("{}", render::frame(&arena, state));
        }
        applied.push(state.clone());
    });
    let outcome = gridbot_engine::execute_commands(
        query::spawn_state(&arena),
        &arena,
        &mutations,
        &mut sink,
        &commands,
    );

    report(args.json, &outcome, &applied)
}

fn load_layout(args: &Args) -> anyhow::Result<String> {
    if let Some(path) = &args.layout {
        return fs::read_to_string(path)
            .with_context(|| format!("could not read layout file {}", path.display()));
    }
    match levels::by_name(&args.level) {
        Some(layout) => Ok(layout.to_owned()),
        None => bail!(
            "unknown level '{}', bundled levels: {}",
            args.level,
            levels::NAMES.join(", ")
        ),
    }
}

/// Outcome payload emitted in JSON mode.
#[derive(Debug, Serialize)]
struct Report<'a> {
    outcome: &'static str,
    state: &'a RobotState,
    history: &'a [RobotState],
}

fn report(
    json: bool,
    outcome: &Result<(), RunError>,
    applied: &[RobotState],
) -> anyhow::Result<ExitCode> {
    let final_state = applied.last().context("run applied no states")?;
    let (label, code) = match outcome {
        Ok(()) => ("won", ExitCode::SUCCESS),
        Err(RunError::Destroyed { .. }) => ("destroyed", ExitCode::FAILURE),
        Err(RunError::NotComplete { .. }) => ("not_complete", ExitCode::FAILURE),
    };

    if json {
        let payload = Report {
            outcome: label,
            state: final_state,
            history: applied,
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        match outcome {
            Ok(()) => println!("level complete: {final_state}"),
            Err(error) => println!("{error}"),
        }
    }
    Ok(code)
}
