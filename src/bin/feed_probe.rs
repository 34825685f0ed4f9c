//! Headless probe for a live events backend.
//!
//! Stands in for a hosting view: it builds a feed controller on top of the
//! real HTTP client, applies the requested filters, prints each batch as it
//! lands, and pages forward on demand. Configuration comes from the
//! environment (`GATHERLY_API_URL`, `GATHERLY_API_TOKEN`), optionally via a
//! local `.env` file.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use gatherly::api::HttpEventsApi;
use gatherly::bus::SignalKind;
use gatherly::config::ClientConfig;
use gatherly::feed::{FeedController, FeedOptions, SortOrder};

const BATCH_WAIT: Duration = Duration::from_secs(15);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatherly=info".parse().expect("valid env filter")),
        )
        .init();

    if let Err(error) = run().await {
        eprintln!("feed probe failed: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let mut search: Option<String> = None;
    let mut order = SortOrder::Distance;
    let mut pages = 1usize;
    let mut creator: Option<i64> = None;
    let mut attending: Option<i64> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            print_help();
            return Ok(());
        }
        if let Some(value) = arg.strip_prefix("--search=") {
            search = Some(value.to_string());
            continue;
        }
        if arg == "--search" {
            search = Some(next_value(&mut args, "--search")?);
            continue;
        }
        if let Some(value) = arg.strip_prefix("--order=") {
            order = SortOrder::from_str(value)?;
            continue;
        }
        if arg == "--order" {
            order = SortOrder::from_str(&next_value(&mut args, "--order")?)?;
            continue;
        }
        if let Some(value) = arg.strip_prefix("--pages=") {
            pages = parse_count("--pages", value)?;
            continue;
        }
        if arg == "--pages" {
            pages = parse_count("--pages", &next_value(&mut args, "--pages")?)?;
            continue;
        }
        if let Some(value) = arg.strip_prefix("--creator=") {
            creator = Some(parse_id("--creator", value)?);
            continue;
        }
        if let Some(value) = arg.strip_prefix("--attending=") {
            attending = Some(parse_id("--attending", value)?);
            continue;
        }
        return Err(format!("unknown argument '{arg}'. Use --help."));
    }

    let config = ClientConfig::from_env().map_err(|e| e.to_string())?;
    let api = Arc::new(HttpEventsApi::new(config));
    let controller = FeedController::new(
        api,
        FeedOptions {
            creator_filter: creator,
            attending_filter: attending,
            ..FeedOptions::default()
        },
    );
    let mut rx = controller.subscribe();

    if let Some(text) = search {
        controller.search(text);
    }
    if order != SortOrder::Distance {
        controller.set_order(order);
    }
    println!("filters: {}", controller.filter_summary());

    // Print batches as they land, the way a view would re-render, until
    // the requested number of pages has been shown.
    let mut batches = 0usize;
    while batches < pages {
        let signal = match tokio::time::timeout(BATCH_WAIT, rx.recv()).await {
            Ok(Ok(signal)) => signal,
            Ok(Err(_)) => return Err("signal bus closed unexpectedly".to_string()),
            Err(_) => return Err("timed out waiting for the next batch".to_string()),
        };
        tracing::debug!(
            signal = %serde_json::to_string(&signal).unwrap_or_default(),
            "signal received"
        );

        match signal.kind {
            SignalKind::ListReplaced { len } => {
                batches += 1;
                println!("\n== page 1 ({len} events) ==");
                print_events(&controller);
            }
            SignalKind::ListAppended { added } => {
                batches += 1;
                println!("\n== next page (+{added} events) ==");
                print_events(&controller);
            }
            SignalKind::SummaryChanged => {
                println!("filters: {}", controller.filter_summary());
            }
            SignalKind::FetchFailed { message } => {
                return Err(format!("fetch failed: {message}"));
            }
            SignalKind::EventRemoved { .. } | SignalKind::EventPatched { .. } => {}
        }

        if batches > 0 && batches < pages {
            if !controller.has_more() {
                println!("\n(no further pages)");
                break;
            }
            controller.load_more();
        }
    }

    controller.close().await;
    Ok(())
}

fn print_events(controller: &FeedController) {
    for event in controller.events() {
        println!(
            "  #{:<5} {}  {}  {:.2}  ({} attending)",
            event.id, event.date, event.title, event.price, event.num_attend
        );
    }
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next().ok_or_else(|| format!("{flag} requires a value"))
}

fn parse_count(flag: &str, value: &str) -> Result<usize, String> {
    let count: usize = value
        .parse()
        .map_err(|_| format!("{flag} expects a positive number, got '{value}'"))?;
    if count == 0 {
        return Err(format!("{flag} must be at least 1"));
    }
    Ok(count)
}

fn parse_id(flag: &str, value: &str) -> Result<i64, String> {
    value
        .parse()
        .map_err(|_| format!("{flag} expects a numeric id, got '{value}'"))
}

fn print_help() {
    println!(
        r#"feed_probe - browse a Gatherly events backend from the terminal

USAGE:
  feed_probe [--search <text>] [--order distance|date|price]
             [--pages <n>] [--creator=<id>] [--attending=<id>]

ENVIRONMENT:
  GATHERLY_API_URL          base URL of the backend (required)
  GATHERLY_API_TOKEN        bearer token, if the backend needs one
  GATHERLY_HTTP_TIMEOUT_MS  per-request timeout (default 10000)

A .env file in the working directory is loaded first."#
    );
}
