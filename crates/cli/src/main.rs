//! Banda cart CLI - drive the cart widget from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add a product
//! bcart add --sku tshirt --title "Футболка" --price 2000 --image img/tshirt.jpg
//!
//! # Show the drawer as a table, or as its HTML fragment
//! bcart show
//! bcart show --html
//!
//! # Change quantities
//! bcart inc tshirt
//! bcart set tshirt 3
//!
//! # Re-render whenever another process changes the store
//! bcart watch
//! ```
//!
//! # Commands
//!
//! - `show` / `badge` / `render` - Print views of the current cart
//! - `add` / `remove` / `inc` / `dec` / `set` / `clear` - Change the cart
//! - `watch` - Follow changes made by other processes until Ctrl-C

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::process::ExitCode;

use banda_storefront::WidgetConfig;
use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{CliError, RenderTarget};

#[derive(Parser)]
#[command(name = "bcart")]
#[command(author, version, about = "Banda cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart as the drawer lists it
    Show {
        /// Print the drawer HTML fragment instead of a table
        #[arg(long)]
        html: bool,
    },
    /// Print the item count shown on the badge
    Badge,
    /// Add a product, merging with an existing line
    Add {
        /// Product SKU
        #[arg(long)]
        sku: String,

        /// Product title
        #[arg(long, default_value = "")]
        title: String,

        /// Unit price in rubles
        #[arg(long)]
        price: String,

        /// Product image URL
        #[arg(long, default_value = "")]
        image: String,

        /// Quantity to add
        #[arg(long, default_value_t = 1)]
        qty: u32,
    },
    /// Remove a line
    Remove {
        /// Product SKU
        sku: String,
    },
    /// Increase a line's quantity by one
    Inc {
        /// Product SKU
        sku: String,
    },
    /// Decrease a line's quantity by one (never below one)
    Dec {
        /// Product SKU
        sku: String,
    },
    /// Set a line's quantity
    Set {
        /// Product SKU
        sku: String,

        /// New quantity (values below one become one)
        qty: String,
    },
    /// Print one rendered region
    Render {
        #[arg(value_enum)]
        target: RenderTarget,
    },
    /// Empty the cart
    Clear,
    /// Re-render on every external change until Ctrl-C
    Watch,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &WidgetConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = WidgetConfig::from_env();

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Logs go to stderr; stdout carries command output.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "banda_storefront=info,banda_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    let result = match config {
        Ok(config) => run(cli, &config).await,
        Err(e) => Err(CliError::from(e)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: &WidgetConfig) -> Result<(), CliError> {
    let mut widget = commands::open_widget(config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Show { html } => commands::cart::show(&widget, html, &mut out)?,
        Commands::Badge => commands::cart::badge(&widget, &mut out)?,
        Commands::Add {
            sku,
            title,
            price,
            image,
            qty,
        } => {
            let product = commands::cart::NewItem {
                sku: &sku,
                title: &title,
                price: &price,
                image: &image,
                qty,
            };
            commands::cart::add(&mut widget, &product, &mut out)?;
        }
        Commands::Remove { sku } => commands::cart::remove(&mut widget, &sku, &mut out)?,
        Commands::Inc { sku } => commands::cart::step(&mut widget, &sku, 1, &mut out)?,
        Commands::Dec { sku } => commands::cart::step(&mut widget, &sku, -1, &mut out)?,
        Commands::Set { sku, qty } => commands::cart::set(&mut widget, &sku, &qty, &mut out)?,
        Commands::Render { target } => commands::render::render(&widget, target, &mut out)?,
        Commands::Clear => commands::cart::clear(&mut widget, &mut out)?,
        Commands::Watch => {
            commands::watch::watch(&mut widget, config.watch_interval, &mut out).await?;
        }
    }

    out.flush()?;
    Ok(())
}
