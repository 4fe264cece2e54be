//! Headless simulation runner.
//!
//! Loads a content directory, runs a fixed number of frames and prints a
//! summary of the world and the events it produced.
mod config;
mod report;

use anyhow::{Context, Result};
use config::CliConfig;
use droid_content::ContentFactory;
use droid_core::{
    CombatState, Env, PcgRng, SameSideFactions, SimEngine, TileGridPathfinder, World,
};
use report::Report;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env();
    let _guard = setup_logging(&config)?;

    let content = ContentFactory::new(&config.content_dir)
        .load()
        .with_context(|| format!("loading {}", config.content_dir.display()))?;
    let sim_config = content.config.clone();
    let obstacles = content.obstacles.clone();
    let droids = content.droids.clone();
    let mut world = content.into_world(PcgRng::new(config.seed))?;

    let pathfinder = TileGridPathfinder::default();
    let env = Env::with_all(&obstacles, &droids, &pathfinder, &SameSideFactions);

    let start = world.player.pos.z;
    SimEngine::new(&mut world).shuffle_level(start);
    let mut report = Report::default();
    for frame in 0..config.frames {
        SimEngine::new(&mut world)
            .step(env, &sim_config, config.frame_time, &mut report)
            .with_context(|| format!("frame {frame}"))?;
        tracing::trace!(frame, alive = world.bots.alive_ids().len(), "frame done");
    }

    tracing::info!(
        deaths = report.count("death"),
        bullets = report.count("bullet"),
        messages = report.messages().len(),
        "run finished"
    );
    print_summary(&world, &config, &report);
    Ok(())
}

fn print_summary(world: &World, config: &CliConfig, report: &Report) {
    println!(
        "{} frames of {:.3}s, seed {}",
        config.frames, config.frame_time, config.seed
    );
    let alive = world.bots.alive_ids();
    println!(
        "bots: {} alive, {} dead",
        alive.len(),
        world.bots.dead_ids().len()
    );
    for id in alive {
        let Some(bot) = world.bots.get(id) else {
            continue;
        };
        let marker = if bot.state == CombatState::Attack { "!" } else { " " };
        println!(
            "{marker} {id:>4} {:>26} {} ({:.2}, {:.2}) energy {:.1}",
            bot.state.to_string(),
            bot.pos.z,
            bot.pos.x,
            bot.pos.y,
            bot.energy
        );
    }
    println!("events:");
    print!("{report}");
}

/// Logs to stderr, and additionally to `DROID_SIM_LOG_DIR/droid-sim.log`
/// when configured. The returned guard flushes the file writer on drop.
fn setup_logging(
    config: &CliConfig,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let Some(log_dir) = &config.log_dir else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    };

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;
    let file_appender = tracing_appender::rolling::never(log_dir, "droid-sim.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    tracing::info!("Log file: {}/droid-sim.log", log_dir.display());
    Ok(Some(guard))
}
