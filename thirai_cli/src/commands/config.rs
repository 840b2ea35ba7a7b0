use crate::cli::{Cli, ConfigAction};
use crate::commands::{CommandError, Result};
use crate::output::{format_output, OutputData};
use owo_colors::OwoColorize;
use serde_json::{json, Value};
use std::io::{self, Write};
use thirai_core::auth_store::{AuthStore, FileAuthStore};
use thirai_core::ProviderRegistry;

pub async fn run(cli: &Cli, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Set { provider, value } => {
            set_config(cli, &provider, value.as_deref()).await
        }
        ConfigAction::Remove { provider } => remove_config(cli, &provider).await,
        ConfigAction::Test { provider } => test_config(cli, &provider).await,
    }
}

/// Accept either a provider name ("youtube") or a connector name ("videos")
/// and return the canonical provider used as the store key.
async fn resolve_provider(registry: &ProviderRegistry, name: &str) -> Result<String> {
    for provider in registry.providers.values() {
        let c = provider.lock().await;
        if c.credential_provider() == name || c.name() == name {
            return Ok(c.credential_provider().to_string());
        }
    }
    Err(CommandError::ConnectorNotFound(name.to_string()))
}

async fn show_config(cli: &Cli) -> Result<()> {
    let store = FileAuthStore::new_default();
    let providers = store.list_providers();

    let output_data = OutputData::ConfigInfo(get_config_json(&store, &providers));

    match cli.output {
        crate::cli::OutputFormat::Pretty => {
            println!();
            println!("{}", "Configured Providers".bold().cyan());
            println!("{}", "====================".cyan());
            println!();

            if providers.is_empty() {
                println!("{}", "No providers configured yet.".yellow());
                println!();
                println!(
                    "Run {} to save a YouTube Data API key.",
                    "thirai config set youtube --value <key>".cyan()
                );
            } else {
                println!("Config file: {}", store.config_path().dimmed());
                println!();

                for provider in &providers {
                    let auth = store.load(provider);
                    let field_count = auth.as_ref().map(|a| a.len()).unwrap_or(0);

                    let has_key = auth
                        .as_ref()
                        .map(|a| a.contains_key("api_key") || a.contains_key("token"))
                        .unwrap_or(false);

                    let status = if has_key {
                        "configured".green().to_string()
                    } else {
                        "partial".yellow().to_string()
                    };

                    println!(
                        "  {} - {} ({} fields)",
                        provider.cyan().bold(),
                        status,
                        field_count
                    );
                }
                println!();
                println!(
                    "Test a provider: {}",
                    "thirai config test <provider>".cyan()
                );
                println!(
                    "Remove a provider: {}",
                    "thirai config remove <provider>".cyan()
                );
            }
            println!();
        }
        _ => {
            format_output(&output_data, &cli.output)?;
        }
    }

    Ok(())
}

fn get_config_json(store: &FileAuthStore, providers: &[String]) -> Value {
    let mut config = json!({});

    for provider in providers {
        if let Some(auth) = store.load(provider) {
            let mut provider_config = json!({});

            // Show field names but mask values
            for key in auth.keys() {
                provider_config[key] = json!("***");
            }

            provider_config["field_count"] = json!(auth.len());
            config[provider] = provider_config;
        }
    }

    config
}

async fn set_config(_cli: &Cli, name: &str, value: Option<&str>) -> Result<()> {
    let registry = crate::commands::list::create_registry().await?;
    let provider = resolve_provider(&registry, name).await?;

    let key = value.ok_or_else(|| {
        CommandError::InvalidConfig("Specify --value <api key>".to_string())
    })?;

    // The config schema names the field the credential is stored under.
    let mut field_name = "api_key".to_string();
    for connector in registry.providers.values() {
        let c = connector.lock().await;
        if c.credential_provider() == provider {
            if let Some(field) = c.config_schema().fields.first() {
                field_name = field.name.clone();
            }
            break;
        }
    }

    let store = FileAuthStore::new_default();
    let mut auth = store.load(&provider).unwrap_or_default();
    auth.insert(field_name, key.to_string());
    store
        .save(&provider, &auth)
        .map_err(|e| CommandError::InvalidConfig(format!("Failed to save: {}", e)))?;

    println!(
        "{} API key saved for {}",
        "Success!".green().bold(),
        provider.cyan()
    );

    // Suggest testing
    println!();
    println!(
        "Test with: {}",
        format!("thirai config test {}", provider).cyan()
    );

    Ok(())
}

async fn remove_config(_cli: &Cli, name: &str) -> Result<()> {
    // Resolve connector aliases, but let stale store entries through so they
    // can still be cleaned up.
    let registry = crate::commands::list::create_registry().await?;
    let provider = resolve_provider(&registry, name)
        .await
        .unwrap_or_else(|_| name.to_string());

    let store = FileAuthStore::new_default();

    // Check if the provider has config
    if store.load(&provider).is_none() {
        println!(
            "{} No configuration found for {}",
            "Note:".yellow().bold(),
            provider.cyan()
        );
        return Ok(());
    }

    // Confirm removal
    print!(
        "Remove all credentials for {}? [y/N] ",
        provider.cyan().bold()
    );
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    if input.trim().to_lowercase() != "y" {
        println!("Cancelled.");
        return Ok(());
    }

    // Remove
    match store.remove(&provider) {
        Ok(true) => {
            println!(
                "{} Removed configuration for {}",
                "Success!".green().bold(),
                provider.cyan()
            );
        }
        Ok(false) => {
            println!(
                "{} No configuration found for {}",
                "Note:".yellow().bold(),
                provider.cyan()
            );
        }
        Err(e) => {
            return Err(CommandError::InvalidConfig(format!(
                "Failed to remove: {}",
                e
            )));
        }
    }

    Ok(())
}

async fn test_config(_cli: &Cli, name: &str) -> Result<()> {
    let registry = crate::commands::list::create_registry().await?;
    let provider = resolve_provider(&registry, name).await?;

    println!();
    print!("{} {} ... ", "Testing".bold().cyan(), provider.cyan());
    io::stdout().flush()?;

    // Any connector riding this provider can probe the credential.
    let mut target = None;
    for connector in registry.providers.values() {
        let c = connector.lock().await;
        if c.credential_provider() == provider {
            target = Some(connector.clone());
            break;
        }
    }
    let target = target.ok_or_else(|| CommandError::ConnectorNotFound(provider.clone()))?;
    let mut c = target.lock().await;

    // Load saved credentials and set them on the connector
    let store = FileAuthStore::new_default();
    if let Some(auth) = store.load(&provider) {
        if let Err(e) = c.set_auth_details(auth).await {
            println!("{}", "Failed".red().bold());
            println!();
            println!(
                "{} {}",
                "Error:".red().bold(),
                format!("Failed to set credentials: {}", e).red()
            );
            return Ok(());
        }
    }

    match c.test_auth().await {
        Ok(_) => {
            println!("{}", "Success!".green().bold());
            println!();
            println!("{}", "Authentication is working. Try:".bold());
            println!("  {}", "thirai videos search_videos --query \"test\"".cyan());
        }
        Err(e) => {
            println!("{}", "Failed".red().bold());
            println!();
            println!("{} {}", "Error:".red().bold(), e.to_string().red());
            println!();
            println!("You can:");
            println!(
                "  - Re-configure with {}",
                format!("thirai config set {} --value <key>", provider).cyan()
            );
            println!(
                "  - Check credentials in {}",
                FileAuthStore::new_default().config_path().dimmed()
            );
        }
    }
    println!();

    Ok(())
}
