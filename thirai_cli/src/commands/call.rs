use crate::cli::Cli;
use crate::commands::{CommandError, Result};
use crate::output::{format_output, format_pretty, OutputData};
use owo_colors::OwoColorize;
use serde_json::{json, Map, Value};
use thirai_core::{CallToolRequestParam, PaginatedRequestParam};

pub async fn run(
    cli: &Cli,
    connector: &str,
    tool: &str,
    args_json: Option<&str>,
    params: &[String],
) -> Result<()> {
    let registry = crate::commands::list::create_registry().await?;
    let provider = registry
        .get_provider(connector)
        .ok_or_else(|| CommandError::ConnectorNotFound(connector.to_string()))?;

    // Lock the provider once
    let c = provider.lock().await;

    let mut args_map: Map<String, Value> = Map::new();

    // 1. Handle JSON args if present
    if let Some(s) = args_json {
        if !s.trim().is_empty() {
            let v: Value = serde_json::from_str(s)?;
            match v {
                Value::Object(m) => args_map = m,
                _ => {
                    return Err(CommandError::InvalidConfig(
                        "--args must be a JSON object".to_string(),
                    ))
                }
            }
        }
    }

    // 2. Handle positional params if present (smart mapping)
    if !params.is_empty() {
        // We need to know the parameter names to map positional args.
        // Fetch the tool definition.
        let tools_response = c
            .list_tools(Some(PaginatedRequestParam { cursor: None }))
            .await?;

        let tool_def = tools_response
            .tools
            .iter()
            .find(|t| t.name == tool)
            .ok_or_else(|| CommandError::ToolNotFound(tool.to_string(), connector.to_string()))?;

        // Extract property names from the JSON schema, required params first so
        // positional values land on them.
        let mut param_names: Vec<String> = Vec::new();

        {
            let schema = &tool_def.input_schema;
            if let Some(properties) = schema.get("properties").and_then(|v| v.as_object()) {
                let mut required: Vec<String> = schema
                    .get("required")
                    .and_then(|v| v.as_array())
                    .map(|arr| {
                        arr.iter()
                            .filter_map(|v| v.as_str().map(|s| s.to_string()))
                            .collect()
                    })
                    .unwrap_or_default();

                // Add any other properties that aren't in required
                for key in properties.keys() {
                    if !required.contains(key) {
                        required.push(key.clone());
                    }
                }
                param_names = required;
            }
        }

        let properties = tool_def
            .input_schema
            .get("properties")
            .and_then(|v| v.as_object());

        // Parse arguments - support both styles:
        // 1. Named args: --name value or -n value (anywhere in the args)
        // 2. Positional args: values without flags
        // The -- separator can be used to force remaining args as positional
        let mut positional_args: Vec<&String> = Vec::new();
        let mut named_args: Vec<(String, String)> = Vec::new();
        let mut force_positional = false;
        let mut i = 0;

        while i < params.len() {
            let param = &params[i];

            // The -- separator forces remaining args to be positional
            if param == "--" {
                force_positional = true;
                i += 1;
                continue;
            }

            if !force_positional {
                // Check for --name value or --name=value style
                if let Some(flag_part) = param.strip_prefix("--") {
                    // Handle --name=value style
                    if let Some(eq_pos) = flag_part.find('=') {
                        let name = to_camel_case(&flag_part[..eq_pos]);
                        let value = flag_part[eq_pos + 1..].to_string();
                        named_args.push((name, value));
                        i += 1;
                        continue;
                    }

                    // Handle --name value style
                    if i + 1 < params.len() && !params[i + 1].starts_with('-') {
                        let name = to_camel_case(flag_part);
                        named_args.push((name, params[i + 1].clone()));
                        i += 2;
                        continue;
                    }

                    // Boolean flag (--flag without value)
                    let name = to_camel_case(flag_part);
                    named_args.push((name, "true".to_string()));
                    i += 1;
                    continue;
                }

                // Check for -n value style (single char flags)
                if param.starts_with('-') && param.len() == 2 && i + 1 < params.len() {
                    let name = param[1..].to_string();
                    named_args.push((name, params[i + 1].clone()));
                    i += 2;
                    continue;
                }
            }

            // Everything else is a positional argument
            positional_args.push(param);
            i += 1;
        }

        // Check positional arg count
        if positional_args.len() > param_names.len() {
            return Err(CommandError::InvalidConfig(format!(
                "Too many arguments provided. Tool '{}' accepts at most {} positional arguments ({}), but got {}.",
                tool,
                param_names.len(),
                param_names.join(", "),
                positional_args.len()
            )));
        }

        // Map positional args to names, coercing by the declared schema type so
        // numeric-looking ids stay strings.
        for (i, param_value) in positional_args.iter().enumerate() {
            let param_name = &param_names[i];
            let declared = properties
                .and_then(|p| p.get(param_name))
                .and_then(declared_type);
            args_map.insert(param_name.clone(), coerce_arg(declared, param_value));
        }

        // Map named args (flag names are normalized to camelCase during parsing)
        for (name, value) in named_args {
            let declared = properties.and_then(|p| p.get(&name)).and_then(declared_type);
            args_map.insert(name, coerce_arg(declared, &value));
        }
    }

    let request = CallToolRequestParam {
        name: tool.to_string().into(),
        arguments: Some(args_map.into_iter().collect()),
    };

    let result = match c.call_tool(request).await {
        Ok(r) => r,
        Err(e) => {
            if matches!(&e, thirai_core::error::ConnectorError::ToolNotFound) {
                eprintln!(
                    "{} Tool '{}' not found for connector '{}'.",
                    "Error:".red().bold(),
                    tool,
                    connector
                );
                eprintln!(
                    "{} Run {} to see available tools.",
                    "Hint:".dimmed(),
                    format!("thirai tools {}", connector).cyan()
                );
            }
            return Err(e.into());
        }
    };

    // Prefer structured_content if present
    let payload = if let Some(sc) = result.structured_content {
        sc
    } else {
        serde_json::to_value(&result).unwrap_or_else(|_| json!({"ok": true}))
    };

    match cli.output {
        crate::cli::OutputFormat::Pretty => {
            println!(
                "{} {}.{}",
                "Call".bold().cyan(),
                connector.yellow(),
                tool.cyan()
            );
            println!();
            println!("{}", format_pretty(&payload));
        }
        _ => {
            let data = OutputData::CallResult {
                connector: connector.to_string(),
                tool: tool.to_string(),
                result: payload.clone(),
            };
            format_output(&data, &cli.output)?;
        }
    }

    Ok(())
}

/// Normalize a flag name to the camelCase parameter names the tools use.
/// "playlist-id" and "playlist_id" both become "playlistId".
fn to_camel_case(flag: &str) -> String {
    let mut out = String::with_capacity(flag.len());
    let mut upper_next = false;
    for ch in flag.chars() {
        if ch == '-' || ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Pull the declared type out of a property schema. Optional fields come
/// through as a ["type", "null"] array.
fn declared_type(prop: &Value) -> Option<&str> {
    match prop.get("type")? {
        Value::String(s) => Some(s.as_str()),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|p| p.as_str())
            .find(|s| *s != "null"),
        _ => None,
    }
}

/// Convert a raw CLI string into the JSON value the schema expects.
/// Comma-separated values fill array parameters.
fn coerce_arg(declared: Option<&str>, raw: &str) -> Value {
    match declared {
        Some("integer") | Some("number") => raw
            .parse::<i64>()
            .map(|n| json!(n))
            .unwrap_or_else(|_| json!(raw)),
        Some("boolean") => raw
            .parse::<bool>()
            .map(|b| json!(b))
            .unwrap_or_else(|_| json!(raw)),
        Some("array") => json!(raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()),
        Some("string") => json!(raw),
        _ => {
            if let Ok(num) = raw.parse::<i64>() {
                json!(num)
            } else if let Ok(b) = raw.parse::<bool>() {
                json!(b)
            } else {
                json!(raw)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_normalization() {
        assert_eq!(to_camel_case("playlist-id"), "playlistId");
        assert_eq!(to_camel_case("max_results"), "maxResults");
        assert_eq!(to_camel_case("query"), "query");
    }

    #[test]
    fn test_coerce_respects_declared_string() {
        // An all-digit id must survive as a string when the schema says string.
        assert_eq!(coerce_arg(Some("string"), "12345678901"), json!("12345678901"));
        assert_eq!(coerce_arg(Some("integer"), "10"), json!(10));
        assert_eq!(
            coerce_arg(Some("array"), "PLa, PLb"),
            json!(["PLa", "PLb"])
        );
    }
}
