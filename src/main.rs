use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vc_portfolio_search::{
    config::Config,
    health::HealthChecker,
    models::{Collections, EntityType},
    search::{extract_facets_ordered, QueryState, RecentQueries, SavedSearch, SearchService},
    state::create_store,
};

#[derive(Parser)]
#[command(name = "portfolio-search")]
#[command(about = "Search and health checks over exported portfolio data", long_about = None)]
struct Cli {
    /// JSON export with companies, notes, meetings and deals
    #[arg(short, long, env = "PORTFOLIO_DATA", default_value = "data/collections.json")]
    data: PathBuf,

    /// Configuration file (overrides PORTFOLIO_CONFIG)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a ranked search
    Search {
        #[arg(value_name = "QUERY")]
        query: String,

        /// Restrict to entity types (company, deal, meeting, note)
        #[arg(short = 't', long = "type", value_parser = parse_entity_type)]
        types: Vec<EntityType>,

        #[arg(long)]
        sector: Vec<String>,

        #[arg(long)]
        stage: Vec<String>,

        #[arg(long)]
        risk: Vec<String>,

        /// Start from the filters of a saved search
        #[arg(long, value_name = "NAME")]
        from: Option<String>,

        /// Save the resulting query state under a name
        #[arg(long, value_name = "NAME")]
        save: Option<String>,

        /// Maximum results printed
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Typeahead suggestions for a prefix
    Suggest {
        #[arg(value_name = "PREFIX")]
        prefix: String,
    },

    /// Facet counts for a field over all records
    Facets {
        #[arg(value_name = "FIELD", default_value = "sector")]
        field: String,
    },

    /// Manage saved searches
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },

    /// Show recent queries
    Recent,

    /// Portfolio update freshness
    Health,
}

#[derive(Subcommand)]
enum SavedAction {
    List,
    Show { name: String },
    Delete { name: String },
}

fn parse_entity_type(value: &str) -> Result<EntityType, String> {
    EntityType::from_str(value).map_err(|_| format!("unknown entity type '{}'", value))
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("vc_portfolio_search={}", config.observability.log_level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.observability.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });

    init_tracing(&config);
    config.validate()?;

    let store = create_store(&config.state).await?;
    let service = SearchService::new(config.search.clone())?;

    match cli.command {
        Commands::Search {
            query,
            types,
            sector,
            stage,
            risk,
            from,
            save,
            limit,
        } => {
            let collections = Collections::load_json(&cli.data)
                .with_context(|| format!("loading {}", cli.data.display()))?;
            let records = collections.records();

            let mut state = match from {
                Some(name) => store
                    .load_search(&name)
                    .await?
                    .with_context(|| format!("no saved search named '{}'", name))?
                    .state,
                None => QueryState::default(),
            };
            state.query = query;
            if !types.is_empty() {
                state.entity_types = types.into_iter().collect();
            }
            state.sectors.extend(sector);
            state.stages.extend(stage);
            state.risk_levels.extend(risk);

            let response = service.search(&records, &state);
            store
                .push_recent(&state.query, config.history.recent_cap)
                .await?;

            if let Some(name) = save {
                store.save_search(&SavedSearch::new(name, state.clone())).await?;
            }

            let mut shown = (*response).clone();
            shown.results.truncate(limit);
            print_json(&shown)?;
        }

        Commands::Suggest { prefix } => {
            let collections = Collections::load_json(&cli.data)?;
            let recent = RecentQueries::from_entries(
                store.recent_queries().await?,
                config.history.recent_cap,
            );
            print_json(&service.suggest(&prefix, &recent, &collections.records()))?;
        }

        Commands::Facets { field } => {
            let collections = Collections::load_json(&cli.data)?;
            let records = collections.records();
            let filtered = service.filtered_records(&records, &QueryState::default());
            print_json(&extract_facets_ordered(
                filtered.into_iter(),
                &field,
                config.search.facet_order,
            ))?;
        }

        Commands::Saved { action } => match action {
            SavedAction::List => print_json(&store.list_searches().await?)?,
            SavedAction::Show { name } => {
                let saved = store
                    .load_search(&name)
                    .await?
                    .with_context(|| format!("no saved search named '{}'", name))?;
                print_json(&saved)?;
            }
            SavedAction::Delete { name } => {
                store.delete_search(&name).await?;
                tracing::info!(name = %name, "Deleted saved search");
            }
        },

        Commands::Recent => print_json(&store.recent_queries().await?)?,

        Commands::Health => {
            let collections = Collections::load_json(&cli.data)?;
            let checker = HealthChecker::new(&config.health)?;
            print_json(&checker.summarize(&collections.companies, Utc::now()))?;
        }
    }

    Ok(())
}
