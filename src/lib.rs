//! No-Limit Texas Hold'em hand-lifecycle engine: deal one hand, drive it
//! from blinds through showdown via pluggable agents, and settle payouts.
//!
//! `gameplay::Hand` is the single entry point for running a hand; the
//! other top-level modules (`cards`, `money`, `action_log`, `config`,
//! `script`, `players`) are the types it's built from.

pub mod action_log;
pub mod cards;
pub mod config;
pub mod error;
pub mod gameplay;
pub mod money;
pub mod players;
pub mod script;

#[cfg(feature = "cli")]
pub mod batch;

/// Initialize terminal + rolling file logging, mirroring the corpus's
/// `simplelog` combined-logger setup. Call once at process start.
#[cfg(feature = "cli")]
pub fn init_logging() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves forward")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
