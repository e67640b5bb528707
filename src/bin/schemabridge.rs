//! schemabridge CLI
//!
//! Compiles a model catalog and prints the engine-ready schema definitions.
//! With `--bootstrap`, also reconciles every model against the storage
//! client selected by `STORAGE_CLIENT_BACKEND`.

use schemabridge::config::{ComponentFactory, RegistryConfig};
use schemabridge::model::ModelCatalog;
use schemabridge::registry::MetadataRegistry;
use schemabridge::telemetry;

use clap::Parser;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{error, info};

/// schemabridge
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON model catalog
    #[arg(long, env = "MODEL_CATALOG")]
    models: PathBuf,

    /// Create missing groups and schemas on the storage engine
    #[arg(long)]
    bootstrap: bool,

    /// Only compile the named model
    #[arg(long)]
    model: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    telemetry::init_logging("schemabridge", &args.log_level)?;

    let catalog = ModelCatalog::from_json_file(&args.models).await?;
    let models = match &args.model {
        Some(name) => vec![catalog
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("model {} not found in catalog", name))?],
        None => catalog.models().to_vec(),
    };
    info!("Loaded {} models from {}", models.len(), args.models.display());

    let registry = MetadataRegistry::with_config(RegistryConfig::from_env());

    let definitions = if args.bootstrap {
        let client = ComponentFactory::create_storage_client()?;
        let definitions = registry.bootstrap_all(&models, client.as_ref()).await?;
        let groups: BTreeSet<&str> = definitions.iter().map(|d| d.group()).collect();
        info!(
            "Bootstrapped {} groups: {}",
            groups.len(),
            groups.into_iter().collect::<Vec<_>>().join(", ")
        );
        definitions
    } else {
        let mut definitions = Vec::with_capacity(models.len());
        for model in &models {
            match registry.register(model).await {
                Ok(definition) => definitions.push(definition),
                Err(e) => {
                    error!("Failed to compile model {}: {}", model.name, e);
                    return Err(e.into());
                }
            }
        }
        definitions
    };

    let output = if args.pretty {
        serde_json::to_string_pretty(&definitions)?
    } else {
        serde_json::to_string(&definitions)?
    };
    println!("{}", output);

    info!("Registered {} schemas", registry.len());
    Ok(())
}
