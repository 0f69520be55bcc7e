use std::io::{self, BufRead};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context};
use catalog_core::{Filters, ListingPhase};
use catalog_engine::{
    BearerToken, CredentialProvider, ListingController, NoCredentials, ReqwestFetcher,
};
use catalog_logging::{catalog_info, catalog_warn};

use super::config::AppConfig;
use super::input::{edit_filters, parse_command, InputCommand, HELP};
use super::render;
use crate::cli::{Cli, Command};

/// Poll interval for the interactive loop.
const TICK: Duration = Duration::from_millis(75);

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load(&cli.config)?.with_overrides(&cli);
    catalog_info!("Using catalog API at {}", config.base_url);

    let credentials: Arc<dyn CredentialProvider> = match &config.token {
        Some(token) => Arc::new(BearerToken::new(token.clone())),
        None => Arc::new(NoCredentials),
    };
    let fetcher = Arc::new(ReqwestFetcher::with_credentials(
        config.fetch_settings(),
        credentials,
    )?);

    match cli.command {
        Command::Browse {
            search,
            category,
            price_type,
            pages,
        } => browse(
            fetcher,
            &config,
            Filters::new(search, category, price_type),
            pages,
        ),
        Command::Interactive => interactive(fetcher, &config),
        Command::Show { id } => {
            let detail = block_on(fetcher.fetch_tool(&id))??;
            print!("{}", render::tool_detail(&detail));
            Ok(())
        }
        Command::Categories => {
            for category in block_on(fetcher.fetch_categories())?? {
                println!("{category}");
            }
            Ok(())
        }
        Command::PriceTypes => {
            for price_type in block_on(fetcher.fetch_price_types())?? {
                println!("{price_type}");
            }
            Ok(())
        }
        Command::Featured => {
            let featured = block_on(fetcher.fetch_featured())??;
            print!("{}", render::featured(&featured));
            Ok(())
        }
    }
}

fn browse(
    fetcher: Arc<ReqwestFetcher>,
    config: &AppConfig,
    filters: Filters,
    pages: u32,
) -> anyhow::Result<()> {
    let mut listing = ListingController::new(fetcher, config.listing_config())
        .context("starting listing engine")?;

    listing.initialize(filters);
    settle(&mut listing, config)?;
    if listing.state().phase() == ListingPhase::Errored {
        let error = listing.view().error.unwrap_or_default();
        return Err(anyhow!("failed to load tools: {error}"));
    }

    for _ in 1..pages.max(1) {
        if !listing.has_more() {
            break;
        }
        listing.load_more();
        settle(&mut listing, config)?;
        if let Some(error) = listing.state().last_error() {
            catalog_warn!("Stopping after failed page: {}", error);
            break;
        }
    }

    print!("{}", render::listing(&listing.view()));
    Ok(())
}

fn settle(listing: &mut ListingController, config: &AppConfig) -> anyhow::Result<()> {
    if listing.wait_until_settled(config.settle_timeout()) {
        Ok(())
    } else {
        listing.cancel();
        Err(anyhow!("timed out waiting for the catalog API"))
    }
}

fn interactive(fetcher: Arc<ReqwestFetcher>, config: &AppConfig) -> anyhow::Result<()> {
    let mut listing = ListingController::new(fetcher, config.listing_config())
        .context("starting listing engine")?;
    let input_rx = spawn_stdin_reader();
    let mut draft = Filters::default();

    println!("{HELP}");
    listing.initialize(draft.clone());

    let mut stdin_open = true;
    loop {
        while stdin_open {
            let line = match input_rx.try_recv() {
                Ok(line) => line,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    stdin_open = false;
                    break;
                }
            };
            let Some(command) = parse_command(&line) else {
                println!("unknown command; type help");
                continue;
            };
            if let Some(next) = edit_filters(&draft, &command) {
                draft = next;
                listing.apply_filters(draft.clone());
                continue;
            }
            match command {
                InputCommand::LoadMore => {
                    if !listing.has_more() {
                        println!("no more tools");
                    }
                    listing.load_more();
                }
                InputCommand::Reload => listing.initialize(draft.clone()),
                InputCommand::Cancel => listing.cancel(),
                InputCommand::Help => println!("{HELP}"),
                InputCommand::Quit => return Ok(()),
                InputCommand::Search(_)
                | InputCommand::Category(_)
                | InputCommand::PriceType(_)
                | InputCommand::ClearFilters => {}
            }
        }

        if !stdin_open {
            // stdin closed: finish what is in flight, print, and leave.
            let _ = listing.wait_until_settled(config.settle_timeout());
            print!("{}", render::listing(&listing.view()));
            return Ok(());
        }

        listing.wait_for_event(TICK);
        if listing.consume_dirty() {
            let view = listing.view();
            if view.phase == ListingPhase::Loading || view.is_loading_more {
                println!("{}", render::status_line(&view));
            } else {
                print!("{}", render::listing(&view));
            }
        }
    }
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    catalog_warn!("Failed to read stdin: {}", err);
                    break;
                }
            }
        }
    });
    rx
}

fn block_on<F: std::future::Future>(future: F) -> anyhow::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting tokio runtime")?;
    Ok(runtime.block_on(future))
}
