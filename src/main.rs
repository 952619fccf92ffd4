//! Bumper Duel headless runner
//!
//! Usage: `bumper-duel [settings.json]`
//!
//! Runs the configured match without rendering and prints the final
//! scoreboard as JSON. Set `RUST_LOG=info` to follow episodes.

fn main() {
    env_logger::init();
    log::info!("Bumper Duel (headless) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), bumper_duel::SettingsError> {
    use bumper_duel::{Arena, MatchSettings};

    let settings = match std::env::args().nth(1) {
        Some(path) => MatchSettings::load(path)?,
        None => {
            log::info!("No settings file given, using defaults");
            MatchSettings::default()
        }
    };

    let mut arena = Arena::new(&settings);
    let start = std::time::Instant::now();
    let scoreboard = arena.run(settings.frames);
    log::info!(
        "Ran {} frames in {:.2?} ({} episodes)",
        settings.frames,
        start.elapsed(),
        scoreboard.episodes
    );

    println!("{}", serde_json::to_string_pretty(scoreboard)?);
    Ok(())
}
