//! # Prospector CLI (`prospector`)
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `prospector serve` | Start the HTTP tool server |
//! | `prospector query` | Filter contacts |
//! | `prospector stats` | Summary statistics |
//! | `prospector search "<text>"` | Keyword-relevance search |
//! | `prospector tools list` | List the built-in tools |
//!
//! ## Examples
//!
//! ```bash
//! prospector query --executive --min-quality 60 --where keywords:contains:fintech
//! prospector stats --group-by industry --json
//! prospector serve --config ./config/prospector.toml
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use prospector::config::{self, Config};
use prospector::traits::ToolRegistry;
use prospector::{logging, query, search, server, stats};
use prospector_core::filter::{TypedFilters, WhereClause};
use prospector_core::search::RankFilters;
use std::path::{Path, PathBuf};

/// Prospector: contact filtering, scoring, and ranking over a CRM export.
///
/// All commands accept `--config` pointing to a TOML file. Without one,
/// built-in defaults are used.
#[derive(Parser)]
#[command(name = "prospector", version, about = "Contact filtering, scoring, and ranking")]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/prospector.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP tool server on `[server].bind`.
    Serve,

    /// Filter contacts with typed filters and field clauses.
    Query {
        /// Minimum quality score (0-100).
        #[arg(long)]
        min_quality: Option<i64>,

        #[command(flatten)]
        executive: ExecutiveArgs,

        /// Exact country match.
        #[arg(long)]
        country: Option<String>,

        /// Exact industry match.
        #[arg(long)]
        industry: Option<String>,

        /// Contact state, e.g. NOT_CONTACTED or REPLIED.
        #[arg(long)]
        state: Option<String>,

        /// Field clause `field:operator:value`. Repeatable; all must match.
        #[arg(long = "where", value_parser = query::parse_where)]
        clauses: Vec<WhereClause>,

        /// Maximum number of contacts to return.
        #[arg(long)]
        limit: Option<usize>,

        /// Print the raw JSON response.
        #[arg(long)]
        json: bool,
    },

    /// Summary statistics over all contacts.
    Stats {
        /// Field to break counts down by (e.g. industry, country).
        #[arg(long)]
        group_by: Option<String>,

        /// Print the raw JSON response.
        #[arg(long)]
        json: bool,
    },

    /// Rank contacts by keyword relevance to a query.
    Search {
        /// Natural-language query.
        query: String,

        /// Number of contacts to return.
        #[arg(long)]
        top_k: Option<usize>,

        /// Minimum quality score.
        #[arg(long)]
        min_quality: Option<i64>,

        #[command(flatten)]
        executive: ExecutiveArgs,

        /// Exact country match.
        #[arg(long)]
        country: Option<String>,

        /// Print the raw JSON response.
        #[arg(long)]
        json: bool,
    },

    /// Inspect the tool registry.
    Tools {
        #[command(subcommand)]
        action: ToolAction,
    },
}

#[derive(clap::Args)]
struct ExecutiveArgs {
    /// Only executives.
    #[arg(long, conflicts_with = "non_executive")]
    executive: bool,

    /// Only non-executives.
    #[arg(long)]
    non_executive: bool,
}

impl ExecutiveArgs {
    fn filter(&self) -> Option<bool> {
        match (self.executive, self.non_executive) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Subcommand)]
enum ToolAction {
    /// List built-in tools with their parameters.
    List,
}

fn list_tools() {
    let registry = ToolRegistry::with_builtins();
    println!("{:<26} {:<8} DESCRIPTION", "TOOL", "TYPE");
    for info in registry.infos() {
        let kind = if info.builtin { "builtin" } else { "custom" };
        println!("{:<26} {:<8} {}", info.name, kind, info.description);
        if let Some(props) = info.parameters.get("properties").and_then(|p| p.as_object()) {
            let names: Vec<&str> = props.keys().map(String::as_str).collect();
            if !names.is_empty() {
                println!("{:<26} {:<8} params: {}", "", "", names.join(", "));
            }
        }
    }
}

fn load_or_minimal(path: &Path) -> Result<Config> {
    if path.exists() {
        config::load_config(path)
    } else {
        Ok(Config::minimal())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = load_or_minimal(&cli.config)?;
    logging::init(&cfg.logging.level);

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Query {
            min_quality,
            executive,
            country,
            industry,
            state,
            clauses,
            limit,
            json,
        } => {
            let filters = TypedFilters {
                min_quality_score: min_quality,
                is_executive: executive.filter(),
                country,
                industry,
                contact_state: state,
            };
            query::run_query(&cfg, filters, clauses, limit, json).await?;
        }
        Commands::Stats { group_by, json } => {
            stats::run_stats(&cfg, group_by.as_deref(), json).await?;
        }
        Commands::Search {
            query,
            top_k,
            min_quality,
            executive,
            country,
            json,
        } => {
            let filters = RankFilters {
                min_quality_score: min_quality,
                is_executive: executive.filter(),
                country,
            };
            search::run_search(&cfg, &query, top_k, filters, json).await?;
        }
        Commands::Tools {
            action: ToolAction::List,
        } => {
            list_tools();
        }
    }

    Ok(())
}
