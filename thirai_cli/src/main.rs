use clap::Parser;
use owo_colors::OwoColorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use commands::*;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "thirai_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Pre-process arguments to support shorthand syntax:
    // "thirai <connector> <tool> ..." -> "thirai call <connector> <tool> ..."
    let mut args: Vec<String> = std::env::args().collect();
    let built_in_commands = [
        "list", "ls", "tools", "call", "get", "fetch", "formats", "patterns", "config", "help",
        "--help", "-h",
    ];

    // Find the index of the subcommand (first non-flag argument)
    // We skip index 0 (the binary name)
    let subcommand_idx = args.iter().skip(1).position(|arg| !arg.starts_with('-'));

    if let Some(idx) = subcommand_idx {
        // adjust index because we skipped 1
        let real_idx = idx + 1;
        let potential_command = &args[real_idx];

        // If it's not a built-in command, assume it's a connector name
        if !built_in_commands.contains(&potential_command.as_str()) {
            // Check if there is a second positional argument (the tool name)
            // We scan from the argument *after* the connector
            let has_tool_arg = args
                .iter()
                .skip(real_idx + 1)
                .any(|arg| !arg.starts_with('-'));

            if has_tool_arg {
                // Case: `thirai videos search_videos` -> `thirai call videos search_videos`
                args.insert(real_idx, "call".to_string());
            } else {
                // Case: `thirai videos` -> `thirai tools videos`
                args.insert(real_idx, "tools".to_string());
            }
        }
    }

    let cli = Cli::parse_from(args);

    let result = match &cli.command {
        None => {
            // No command provided - show quick overview
            show_overview().await
        }
        Some(Commands::List) => list::run(&cli).await,
        Some(Commands::Tools { connector }) => tools::run(&cli, connector.as_deref()).await,
        Some(Commands::Call {
            connector,
            tool,
            args,
            params,
        }) => call::run(&cli, connector, tool, args.as_deref(), params).await,
        Some(Commands::Get { input }) => get::run(&cli, input).await,
        Some(Commands::Formats) => get::show_formats(&cli).await,
        Some(Commands::Config { action }) => config::run(&cli, action.clone()).await,
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(1);
    }
}

async fn show_overview() -> commands::Result<()> {
    println!();
    println!(
        "{}  {}",
        "Thirai".bold().cyan(),
        "- YouTube Data & Playlist CLI".dimmed()
    );
    println!();

    // Show quick stats
    let registry = list::create_registry().await?;
    let providers = registry.list_providers();

    let mut total_tools = 0;
    let mut ready = Vec::new();
    let mut need_auth = Vec::new();

    for provider_info in &providers {
        if let Some(provider) = registry.get_provider(&provider_info.name) {
            let c = provider.lock().await;
            if let Ok(tools) = c
                .list_tools(Some(thirai_core::PaginatedRequestParam { cursor: None }))
                .await
            {
                total_tools += tools.tools.len();
            }
            if c.config_schema().fields.is_empty() {
                ready.push(provider_info.name.clone());
            } else {
                need_auth.push(provider_info.name.clone());
            }
        }
    }

    println!(
        "  {} connectors available ({} ready to use, {} need auth)",
        providers.len().to_string().green().bold(),
        ready.len().to_string().green(),
        need_auth.len().to_string().yellow()
    );
    println!(
        "  {} tools across all connectors",
        total_tools.to_string().green().bold()
    );
    println!();

    // Quick start section
    println!("{}", "Quick Start:".bold().cyan());
    println!(
        "  {}   {}",
        "thirai tools".cyan(),
        "Show all tools with auth requirements".dimmed()
    );
    println!(
        "  {}   {}",
        "thirai videos search_videos --query \"rust\"".cyan(),
        "Search YouTube videos".dimmed()
    );
    println!(
        "  {}   {}",
        "thirai get <video or playlist url>".cyan(),
        "Fetch anything by URL or ID".dimmed()
    );
    println!();

    if !ready.is_empty() {
        println!("{}", "Ready to use (no auth required):".bold().green());
        let names: Vec<_> = ready.iter().map(|n| n.cyan().to_string()).collect();
        println!("  {}", names.join(", "));
        println!();
    }

    if !need_auth.is_empty() {
        println!(
            "{}",
            "Need an API key (run 'thirai config set youtube --value <key>'):"
                .bold()
                .yellow()
        );
        let names: Vec<_> = need_auth.iter().map(|n| n.yellow().to_string()).collect();
        println!("  {}", names.join(", "));
        println!();
    }

    println!(
        "{} Use {} for full help",
        "Tip:".dimmed(),
        "thirai --help".cyan()
    );
    println!();

    Ok(())
}
