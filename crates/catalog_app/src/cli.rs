use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "catalog", version, about = "Browse the AI tool catalog from the terminal")]
pub struct Cli {
    /// RON config file; missing files fall back to defaults.
    #[arg(long, global = true, default_value = "catalog.ron")]
    pub config: PathBuf,

    /// API root, e.g. http://localhost:8000/api
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[arg(long, global = true)]
    pub page_size: Option<u32>,

    #[arg(long, global = true, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the listing, following "load more" for up to `pages` pages.
    Browse {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "All")]
        category: String,
        #[arg(long, default_value = "All")]
        price_type: String,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Line-driven listing: edit filters and load more pages from stdin.
    Interactive,
    /// Show one tool's detail page.
    Show { id: String },
    /// List the categories offered by the filter dropdown.
    Categories,
    /// List the price types offered by the filter dropdown.
    PriceTypes,
    /// List the featured tools.
    Featured,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Off,
    File,
    Terminal,
    Both,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_subcommands_parse() {
        let cli = Cli::parse_from(["catalog", "price-types"]);
        assert_eq!(cli.command, Command::PriceTypes);

        let cli = Cli::parse_from(["catalog", "--log", "off", "categories"]);
        assert_eq!(cli.command, Command::Categories);
        assert_eq!(cli.log, LogTarget::Off);
    }
}
