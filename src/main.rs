//! loggable demo
//!
//! Runs a handful of monitored calls through an [`Interceptor`] so the log
//! lines can be seen with a real subscriber.
//!
//! ```text
//! loggable [--config loggable.toml] [--print-config] [--watch]
//! ```
//!
//! With `--watch` the process stays up and applies level changes from the
//! config file until interrupted.

use std::num::ParseIntError;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use loggable::config::watcher::LevelsWatcher;
use loggable::config::{load_config, LoggerConfig};
use loggable::observability::logging;
use loggable::{args, Interceptor, JoinPoint, Located, Loggable, Registry, TracingSink, Visibility};

#[derive(Parser)]
#[command(name = "loggable")]
#[command(about = "Method-level execution logging demo", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    print_config: bool,

    /// Keep running and reload levels when the config file changes.
    #[arg(short, long)]
    watch: bool,
}

struct Inventory;

impl Inventory {
    fn restock(&self, sku: &str, quantity: u32) -> u32 {
        let extra = u32::try_from(sku.len()).unwrap_or(u32::MAX);
        quantity.saturating_add(extra)
    }

    fn parse_sku(&self, raw: &str) -> Result<u64, Located<ParseIntError>> {
        Ok(raw.parse::<u64>()?)
    }

    fn report(&self) -> Vec<u32> {
        std::thread::sleep(Duration::from_millis(1_500));
        vec![1, 2, 3]
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => LoggerConfig::default(),
    };

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    logging::init(&config.observability);
    tracing::info!(
        composer = ?config.composer,
        declarations = config.declarations.len(),
        watchdog_period_ms = config.watchdog.period_ms,
        "loggable v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let sink = Arc::new(TracingSink::new(config.levels.clone()));
    let interceptor = Interceptor::builder()
        .sink(sink.clone())
        .config(&config)
        .build()?;

    let mut registry = Registry::from_config(&config.declarations);
    if registry.is_empty() {
        registry
            .declare_type(
                std::any::type_name::<Inventory>(),
                Loggable::new().warn_over_millis(1_000),
            )
            .declare_method(
                std::any::type_name::<Inventory>(),
                "parse_sku",
                Loggable {
                    entered: true,
                    ..Loggable::new()
                },
            );
    }

    run_demo(&interceptor, &registry).await;

    if cli.watch {
        if let Some(path) = &cli.config {
            let (watcher, mut updates) = LevelsWatcher::new(path, config.levels.clone());
            let _watcher = watcher.run()?;
            tracing::info!("Watching for level changes, Ctrl-C to exit");
            loop {
                tokio::select! {
                    Some(levels) = updates.recv() => sink.reload(levels),
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
        } else {
            tracing::warn!("--watch needs --config; nothing to watch");
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn run_demo(interceptor: &Interceptor, registry: &Registry) {
    let inventory = Inventory;

    let restock = JoinPoint::of::<Inventory>("restock");
    interceptor.dispatch(
        registry,
        &restock,
        Visibility::Public,
        || args!["widget", 4u32],
        || inventory.restock("widget", 4),
    );

    let parse_sku = JoinPoint::of::<Inventory>("parse_sku");
    for raw in ["1024", "12ab"] {
        let parsed = interceptor.try_dispatch(
            registry,
            &parse_sku,
            Visibility::Public,
            || args![raw],
            || inventory.parse_sku(raw),
        );
        if let Err(e) = parsed {
            tracing::debug!(error = %e, "parse_sku failed as expected");
        }
    }

    let report = JoinPoint::of::<Inventory>("report");
    interceptor.dispatch(
        registry,
        &report,
        Visibility::Public,
        Vec::new,
        || inventory.report(),
    );

    let lookup = JoinPoint::of::<Inventory>("lookup");
    let declaration = Loggable::new().warn_over_millis(100);
    interceptor
        .invoke_async(&lookup, &declaration, args![7u64], async {
            tokio::time::sleep(Duration::from_millis(250)).await;
            Some("widget")
        })
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restock_saturates() {
        assert_eq!(Inventory.restock("widget", 4), 10);
        assert_eq!(Inventory.restock("widget", u32::MAX), u32::MAX);
    }
}
