//! mimir — inspect provider configuration and model resolutions.
//!
//! Loads providers from the config file (API keys from secrets or the
//! environment) and answers resolution queries the same way request
//! handlers do.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mimir::config::{Config, Secrets};
use mimir::{Mimir, ModelCategory, ProviderService, Resolution};

/// Mimir provider/model resolution tool
#[derive(Parser)]
#[command(name = "mimir")]
#[command(version = mimir::PKG_VERSION)]
#[command(about = "Provider/model resolution cache")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "MIMIR_CONFIG")]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a provider/model selection
    Resolve {
        /// Provider name
        provider: String,
        /// Model id
        model: String,
        /// Usage category: chat, vision, audio or agent
        #[arg(short, long, default_value = "chat")]
        category: ModelCategory,
    },

    /// List configured providers
    Providers,

    /// List usable models for a category
    Models {
        /// Usage category: chat, vision, audio or agent
        #[arg(short, long, default_value = "chat")]
        category: ModelCategory,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mimir=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::load()?;
    let service = build_service(&config, &secrets)?;

    info!(version = mimir::version_string(), "mimir starting");

    match args.command {
        Command::Resolve {
            provider,
            model,
            category,
        } => {
            match service.resolve(&provider, &model, category).await? {
                Resolution::Found(resolved) => {
                    println!(
                        "{}:{} ({}) -> {}",
                        resolved.provider.name,
                        resolved.model.id,
                        resolved.model.category,
                        resolved.provider.base_url
                    );
                    if let Some(limit) = resolved.model.context_limit {
                        println!("  context limit: {limit} tokens");
                    }
                    println!(
                        "  function calling: {}, image input: {}",
                        resolved.model.supports_function_calling,
                        resolved.model.supports_image_input
                    );
                }
                Resolution::NotFound(reason) => {
                    println!("{provider}:{model} not usable: {reason}");
                    std::process::exit(1);
                }
            }
        }

        Command::Providers => {
            for provider in service.list_providers().await? {
                let enabled = provider.models.iter().filter(|m| m.enabled).count();
                println!(
                    "{:<20} {:<40} key: {:<3} models: {}/{}",
                    provider.display_name(),
                    provider.base_url,
                    if provider.has_api_key() { "yes" } else { "no" },
                    enabled,
                    provider.models.len()
                );
            }
        }

        Command::Models { category } => {
            for resolved in service.available_models(category).await? {
                println!("{}:{}", resolved.provider.name, resolved.model.id);
            }
        }
    }

    Ok(())
}

/// Build a [`ProviderService`] over an in-memory store seeded from config.
fn build_service(config: &Config, secrets: &Secrets) -> mimir::Result<ProviderService> {
    let store = config.build_store(secrets)?;
    Mimir::builder()
        .store(Arc::new(store))
        .cache(config.cache_config())
        .build()
}
