use crate::cli::Cli;
use crate::commands::{CommandError, Result};
use crate::output::{format_output, OutputData};
use owo_colors::OwoColorize;
use serde_json::json;
use std::io::{self, Write};
use thirai_core::resolver::{PatternInfo, ResolvedAction, SmartResolver};
use thirai_core::CallToolRequestParam;

/// Run the get command - auto-detect input type and fetch content
pub async fn run(cli: &Cli, input: &str) -> Result<()> {
    let resolver = SmartResolver::new();

    // Get all possible matches
    let actions = resolver.resolve_all(input);

    if actions.is_empty() {
        println!();
        println!(
            "{} Could not detect the type of input: {}",
            "Error:".red().bold(),
            input.yellow()
        );
        println!();
        println!("Run {} to see supported formats.", "thirai formats".cyan());
        println!();
        return Ok(());
    }

    // If only one match, use it directly
    let action = if actions.len() == 1 {
        actions.into_iter().next().unwrap()
    } else {
        // Multiple matches - let user choose
        select_action(cli, input, actions)?
    };

    // Show what was detected
    if cli.output == crate::cli::OutputFormat::Pretty {
        println!();
        println!(
            "{} {}",
            "Detected:".bold().cyan(),
            action.description.dimmed()
        );
        println!(
            "  {} {} → {}",
            "Routing to:".dimmed(),
            action.connector.cyan().bold(),
            action.tool.green()
        );
        println!();
    }

    // Execute the action
    execute_action(cli, &action).await
}

/// Let user select from multiple matching actions
fn select_action(cli: &Cli, input: &str, actions: Vec<ResolvedAction>) -> Result<ResolvedAction> {
    match cli.output {
        crate::cli::OutputFormat::Pretty => {
            println!();
            println!(
                "{} Input '{}' matches multiple patterns:",
                "Ambiguous:".yellow().bold(),
                input.cyan()
            );
            println!();

            for (i, action) in actions.iter().enumerate() {
                println!(
                    "  [{}] {} → {} ({})",
                    (i + 1).to_string().green().bold(),
                    action.connector.cyan(),
                    action.tool.green(),
                    action.description.dimmed()
                );
            }
            println!();

            print!("Select option [1-{}]: ", actions.len());
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            let selection: usize = input
                .trim()
                .parse()
                .map_err(|_| CommandError::InvalidConfig("Invalid selection".to_string()))?;

            if selection < 1 || selection > actions.len() {
                return Err(CommandError::InvalidConfig(format!(
                    "Selection must be between 1 and {}",
                    actions.len()
                )));
            }

            Ok(actions.into_iter().nth(selection - 1).unwrap())
        }
        // For non-interactive output, just use the first (highest priority) match
        _ => Ok(actions.into_iter().next().unwrap()),
    }
}

/// Execute a resolved action against the registry
async fn execute_action(cli: &Cli, action: &ResolvedAction) -> Result<()> {
    let registry = crate::commands::list::create_registry().await?;

    // Check if connector exists
    let provider = registry.get_provider(&action.connector).ok_or_else(|| {
        CommandError::ConnectorNotFound(format!(
            "Connector '{}' not available. You may need to enable the feature flag.",
            action.connector
        ))
    })?;

    let connector = provider.lock().await;

    // Resolver captures are id strings; pass them through untouched.
    let arguments = if action.arguments.is_empty() {
        None
    } else {
        Some(
            action
                .arguments
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    };

    let request = CallToolRequestParam {
        name: action.tool.clone().into(),
        arguments,
    };

    // Call the tool
    match connector.call_tool(request).await {
        Ok(result) => {
            let payload = if let Some(sc) = result.structured_content {
                sc
            } else {
                // Fall back to the text content blocks
                let text_content: Vec<String> = result
                    .content
                    .iter()
                    .filter_map(|c| {
                        if let thirai_core::RawContent::Text(t) = &c.raw {
                            Some(t.text.clone())
                        } else {
                            None
                        }
                    })
                    .collect();

                let combined = text_content.join("\n");
                serde_json::from_str(&combined).unwrap_or_else(|_| json!({ "content": combined }))
            };

            format_output(&OutputData::ToolResult(payload), &cli.output)?;
        }
        Err(thirai_core::error::ConnectorError::Authentication(msg)) => {
            println!();
            println!(
                "{} Authentication required for {}: {}",
                "Error:".red().bold(),
                action.connector.cyan(),
                msg
            );
            println!();
            println!(
                "Run {} to configure authentication, or set {}.",
                format!(
                    "thirai config set {} --value <key>",
                    connector.credential_provider()
                )
                .cyan(),
                "YOUTUBE_API_KEY".yellow()
            );
            println!();
        }
        Err(e) => {
            return Err(CommandError::ToolError(e.to_string()));
        }
    }

    Ok(())
}

/// Show all supported formats/patterns
pub async fn show_formats(cli: &Cli) -> Result<()> {
    let resolver = SmartResolver::new();
    let patterns = resolver.list_patterns();

    match cli.output {
        crate::cli::OutputFormat::Pretty => {
            println!();
            println!("{}", "Supported Input Formats".bold().cyan());
            println!("{}", "=======================".cyan());
            println!();
            println!(
                "Use {} to auto-detect and fetch content from these patterns:",
                "thirai get <input>".cyan()
            );
            println!();

            // Group by connector
            let mut by_connector: std::collections::HashMap<String, Vec<&PatternInfo>> =
                std::collections::HashMap::new();
            for pattern in &patterns {
                by_connector
                    .entry(pattern.connector.clone())
                    .or_default()
                    .push(pattern);
            }

            // Sort connectors alphabetically
            let mut connectors: Vec<_> = by_connector.keys().collect();
            connectors.sort();

            for connector in connectors {
                let connector_patterns = &by_connector[connector];
                println!("{}", connector.cyan().bold());

                for pattern in connector_patterns {
                    println!("  {} → {}", pattern.example.yellow(), pattern.tool.dimmed());
                }
                println!();
            }

            // Add note about ambiguous patterns
            println!("{}", "Note:".bold());
            println!("  Some inputs (like bare IDs) may match multiple patterns.");
            println!("  In interactive mode, you'll be prompted to choose.");
            println!();
        }
        crate::cli::OutputFormat::Json => {
            let output = OutputData::Patterns(patterns);
            format_output(&output, &cli.output)?;
        }
        _ => {
            for pattern in patterns {
                println!(
                    "{}\t{}\t{}\t{}",
                    pattern.connector, pattern.tool, pattern.example, pattern.description
                );
            }
        }
    }

    Ok(())
}
