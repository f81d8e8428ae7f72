mod engine;
mod models;
mod service;
mod storage;
mod types;

use std::io::{stderr, stdout};
use std::num::ParseIntError;
use std::process::exit;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Result};
use csv::WriterBuilder;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::engine::CommandEngine;
use crate::service::TransactionService;
use crate::storage::{Storage, TransactionStorage};
use crate::types::{PageRequest, MAX_PAGE_SIZE};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: transaction-store [commands].csv [log_level:optional] [setting=value:optional ...] > [output].csv");
        eprintln!("Available log levels: error, warn, info, debug, trace (default: error)");
        eprintln!("Available settings: cache_capacity (0 disables the cache), cache_ttl_ms, lock_stripes, backpressure");
        exit(1);
    }

    let path = &args[1];
    let (settings, log_level) = args[2..].iter()
        .partition::<Vec<&String>, _>(|arg| arg.contains('='));
    let log_level = log_level.first()
        .map(|s| parse_log_level(s)).unwrap_or(LevelFilter::ERROR);
    let settings = Settings::parse(&settings)?;

    setup_logging(log_level);

    let storage = Arc::new(TransactionStorage::new());
    let service = Arc::new(settings.configure_service(TransactionService::new(storage.clone())));
    let engine = settings.configure_engine(CommandEngine::new(service.clone()));

    let timer = Instant::now();
    let report = engine.run(path).await?;
    let duration = timer.elapsed();

    info!("Processed [{}] commands in: {duration:?}", report.applied + report.rejected);
    info!("Store holds [{}] transactions across [{}] lock stripes", storage.len(), service.lock_stripes());

    write_results_to_stdout(&service)?;

    Ok(())
}

/// Optional `key=value` tuning passed after the input path.
#[derive(Debug, Default)]
struct Settings {
    cache_capacity: Option<u64>,
    cache_timeout: Option<Duration>,
    lock_stripes: Option<usize>,
    backpressure: Option<usize>
}

impl Settings {
    fn parse(args: &[&String]) -> Result<Self> {
        let mut settings = Settings::default();

        for arg in args {
            let (key, value) = arg.split_once('=')
                .ok_or_else(|| anyhow!("Setting '{arg}' is not of the form key=value"))?;
            let invalid = |error: ParseIntError| anyhow!("Invalid value '{value}' for setting '{key}': {error}");

            match key.trim() {
                "cache_capacity" => settings.cache_capacity = Some(value.trim().parse().map_err(invalid)?),
                "cache_ttl_ms" => settings.cache_timeout = Some(Duration::from_millis(value.trim().parse().map_err(invalid)?)),
                "lock_stripes" => settings.lock_stripes = Some(value.trim().parse().map_err(invalid)?),
                "backpressure" => settings.backpressure = Some(value.trim().parse().map_err(invalid)?),
                _ => bail!("Unknown setting '{key}'")
            }
        }

        Ok(settings)
    }

    fn configure_service(&self, mut service: TransactionService) -> TransactionService {
        if let Some(stripes) = self.lock_stripes {
            service = service.with_lock_stripes(stripes);
        }

        match self.cache_capacity {
            Some(0) => service = service.without_cache(),
            Some(capacity) => service = service.with_cache_capacity(capacity),
            None => {}
        }

        if let Some(timeout) = self.cache_timeout {
            service = service.with_cache_timeout(timeout);
        }

        service
    }

    fn configure_engine(&self, engine: CommandEngine) -> CommandEngine {
        match self.backpressure {
            Some(backpressure) => engine.with_backpressure(backpressure),
            None => engine
        }
    }
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout carries the CSV output, so logs go to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

/// Writes every stored record, most recent first, fetching one full page at a time.
fn write_results_to_stdout(service: &TransactionService) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(stdout().lock());

    writer.write_record(["id", "amount", "type", "description", "category", "timestamp"])?;

    let mut page = PageRequest::new(0, MAX_PAGE_SIZE);

    loop {
        let transactions = service.list(page.page, page.size)?;

        for transaction in &transactions {
            writer.serialize(transaction)?;
        }

        if transactions.len() < page.limit() {
            break;
        }

        page = page.next();
    }

    writer.flush()?;

    Ok(())
}
