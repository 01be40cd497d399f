//! # Lineage - Profile Inheritance Explorer
//!
//! The main binary for exploring OrcaSlicer profile inheritance.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  apps/lineage (THE BINARY)                  │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌────────────────┐  │
//! │  │   CLI       │    │   Loader    │    │   Renderers    │  │
//! │  │  (clap)     │    │  (walkdir)  │    │ (md/dot/json)  │  │
//! │  └──────┬──────┘    └──────┬──────┘    └───────┬────────┘  │
//! │         │                  │                   │           │
//! │         └──────────────────┼───────────────────┘           │
//! │                            ▼                               │
//! │                    ┌───────────────┐                       │
//! │                    │ lineage-core  │                       │
//! │                    │ (THE ENGINE)  │                       │
//! │                    └───────────────┘                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! lineage -i ~/OrcaSlicer status
//! lineage chain "Bambu PLA Basic @BBL X1C"
//! lineage compare "My PLA"
//! lineage effective "PLA A" "PLA B"
//! lineage graph --user -o user_profiles
//! ```

use clap::Parser;
use lineage::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // LINEAGE_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("LINEAGE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lineage=info".into());

    // Logs go to stderr so reports on stdout stay clean.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Lineage startup banner (stderr, like the logs).
fn print_banner() {
    eprintln!(
        r#"
  Lineage v{}
  OrcaSlicer profile inheritance explorer
"#,
        env!("CARGO_PKG_VERSION")
    );
}
