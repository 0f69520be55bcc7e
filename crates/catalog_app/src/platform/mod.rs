mod app;
mod config;
mod input;
mod render;

use catalog_logging::LogDestination;
use log::LevelFilter;

use crate::cli::LogTarget;

pub use app::run_app;

pub fn init_logging(target: LogTarget, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let destination = match target {
        LogTarget::Off => return,
        LogTarget::File => LogDestination::default_file(),
        LogTarget::Terminal => LogDestination::Terminal,
        LogTarget::Both => LogDestination::Both(catalog_logging::DEFAULT_LOG_FILE.into()),
    };
    catalog_logging::initialize(destination, level);
}
