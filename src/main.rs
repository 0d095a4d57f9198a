mod prompt;

use anyhow::Context;
use clap::{Parser, Subcommand};
use prompt::Prompt;
use record_search::{
    config::{Config, FailurePolicy},
    ingestion::{IndexBuilder, JsonFileSource},
    models::Dataset,
    search::{SearchConfigBuilder, SearchService},
    validation::parse_dataset,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "record-search")]
#[command(about = "Search users, organizations and tickets by exact field value", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding users.json, organizations.json and tickets.json
    #[arg(short, long, env = "RECORD_SEARCH_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Keep the datasets that loaded when another one fails
    #[arg(long)]
    partial: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single query
    Search {
        #[arg(short, long)]
        dataset: String,

        #[arg(short, long)]
        field: String,

        /// Value to match; JSON scalars are decoded, anything else is taken as text
        #[arg(short, long, default_value = "", allow_hyphen_values = true)]
        value: String,

        /// Print the response as JSON
        #[arg(long)]
        json: bool,

        /// Maximum results to print (0 = all)
        #[arg(short, long, default_value = "0")]
        max_results: usize,
    },

    /// Prompt for queries until end of input or `quit`
    Interactive,

    /// List searchable fields
    Fields {
        #[arg(value_name = "DATASET")]
        dataset: Option<String>,
    },

    /// Build the index and print its statistics
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });
    if let Some(dir) = cli.data_dir {
        config.data.dir = dir;
    }
    if cli.partial {
        config.build.failure_policy = FailurePolicy::Partial;
    }

    init_tracing(&config);

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shutdown.cancel();
        }
    });

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Search {
            dataset,
            field,
            value,
            json,
            max_results,
        } => {
            let service = build_service(config, cancel, max_results).await?;
            let response = service.search_raw(&dataset, &field, &value)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("{}", response.to_text());
            }
        }

        Commands::Interactive => {
            // Build in the background while the first prompt is shown
            let build = tokio::spawn(build_service(config, cancel.clone(), 0));
            run_interactive(build, cancel).await?;
        }

        Commands::Fields { dataset } => {
            let datasets = match dataset {
                Some(name) => vec![parse_dataset(&name)?],
                None => Dataset::ALL.to_vec(),
            };
            for dataset in datasets {
                println!("{}:", dataset);
                for field in dataset.fields() {
                    println!("  {}", field);
                }
            }
        }

        Commands::Stats => {
            let service = build_service(config, cancel, 0).await?;
            println!("{}", serde_json::to_string_pretty(&service.stats())?);
        }
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("record_search={}", config.observability.log_level))
    });
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr; stdout carries results
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

async fn build_service(
    config: Config,
    cancel: CancellationToken,
    max_results: usize,
) -> anyhow::Result<SearchService> {
    let source = Arc::new(JsonFileSource::new(config.data.clone()));

    let output = IndexBuilder::new(source)
        .failure_policy(config.build.failure_policy)
        .cancellation(cancel)
        .build()
        .await
        .map_err(|e| {
            tracing::error!(code = e.error_code(), "Index build failed: {}", e);
            e
        })
        .with_context(|| format!("failed to index data in {}", config.data.dir.display()))?;

    for failure in &output.report.failures {
        eprintln!("warning: {}", failure.message);
    }

    let search_config = SearchConfigBuilder::new().max_results(max_results).build();
    Ok(SearchService::new(Arc::new(output.index), search_config))
}

async fn run_interactive(
    build: JoinHandle<anyhow::Result<SearchService>>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut prompt = Prompt::new(cancel)?;
    let dataset_names: Vec<String> = Dataset::ALL.iter().map(|d| d.to_string()).collect();
    let dataset_choices: Vec<&str> = dataset_names.iter().map(String::as_str).collect();

    let mut pending = Some(build);
    let mut service: Option<SearchService> = None;

    loop {
        let Some(dataset) = prompt.select("Select dataset", &dataset_choices)? else {
            break;
        };
        let dataset = parse_dataset(dataset)?;

        let Some(field) = prompt.select("Select field", dataset.fields())? else {
            break;
        };

        let Some(value) = prompt.text("Search value")? else {
            break;
        };

        if let Some(build) = pending.take() {
            service = Some(build.await??);
        }
        let Some(service) = service.as_ref() else {
            break;
        };

        match service.search_raw(&dataset.to_string(), field, &value) {
            Ok(response) => println!("{}\n", response.to_text()),
            Err(e) if !e.is_build_failure() => println!("{}", e),
            Err(e) => return Err(e.into()),
        }
    }

    println!("Goodbye");
    Ok(())
}
