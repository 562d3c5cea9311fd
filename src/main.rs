//! MazeMind - a maze that rewires itself around how well you obey it
//!
//! This binary runs a headless session: a scripted player walks a generated
//! maze while the AI asks, judges, and reshapes. A JSON report of the run is
//! printed at the end.

mod script;
mod settings;

use anyhow::{Context, Result};
use mazemind_core::{GameRng, TickClock};
use mazemind_game::{
    AlignmentState, DialogueLines, GameSession, HeadlessChannel, SessionConfig, SessionStatus,
};
use mazemind_maze::EffectLog;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use script::ScriptedPlayer;
use settings::GameSettings;

/// Summary of one headless run
#[derive(Debug, Serialize)]
struct SessionReport {
    seed: u64,
    width: u32,
    height: u32,
    ticks: u64,
    interchanges: u32,
    compliant: u32,
    defiant: u32,
    infraction_count: i32,
    alignment: AlignmentState,
    shortcuts: u32,
    longcuts: u32,
    exit_reached: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    info!("Starting MazeMind...");

    let settings = GameSettings::load();
    let lines = match &settings.simulation.lines_dir {
        Some(dir) => DialogueLines::load_dir(dir)
            .with_context(|| format!("Failed to load dialogue lines from {}", dir.display()))?,
        None => DialogueLines::default(),
    };

    let seed = settings.simulation.seed.unwrap_or_else(GameRng::entropy_seed);
    info!("Seed: {}", seed);

    let config = SessionConfig {
        layout: settings.maze.layout(),
        thresholds: settings.ai.thresholds(),
        timings: settings.ai.timings(),
        lines: lines.clone(),
        ..Default::default()
    };
    let mut session = GameSession::begin(config, GameRng::seeded(seed)).context("Failed to build the maze")?;

    // The script gets its own streams so its choices never shift the maze's
    let compliance = settings.simulation.compliance;
    let mut channel = HeadlessChannel::new(script::responder(
        lines,
        compliance,
        GameRng::seeded(seed.wrapping_add(1)),
    ));
    let mut player = ScriptedPlayer::new(&session, compliance, GameRng::seeded(seed.wrapping_add(2)));
    let mut effects = EffectLog::new();
    let mut clock = TickClock::new(settings.simulation.time_config());

    let mut status = SessionStatus::Running;
    while status == SessionStatus::Running && session.ticks() < settings.simulation.max_ticks {
        clock.update(settings.simulation.tick_seconds);
        let snapshot = player.step(&session, channel.current_request(), &effects);
        status = session
            .tick(&snapshot, clock.delta_time, &mut channel, &mut effects)
            .context("Session tick failed")?;
    }

    if status == SessionStatus::Running {
        info!("Gave up after {} ticks", session.ticks());
    }

    let stats = session.ai().stats();
    let report = SessionReport {
        seed,
        width: session.layout().width,
        height: session.layout().height,
        ticks: session.ticks(),
        interchanges: stats.interchanges,
        compliant: stats.compliant,
        defiant: stats.defiant,
        infraction_count: session.ai().alignment().infraction_count(),
        alignment: session.ai().state(),
        shortcuts: stats.shortcuts,
        longcuts: stats.longcuts,
        exit_reached: session.exit_reached(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
