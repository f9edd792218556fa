use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use std::collections::BTreeMap;
use std::fs;
use std::io::Read;

use crate::conditions::{
    self, Condition, ConditionReferences, GroupOperator, LinkPosition, NodeType, ParseError,
};
use crate::config::{self, Config};
use crate::resolver::{DisplayInfoResolver, HttpDisplayInfoSource, LoadOutcome};

use super::exit_codes;
use super::output::{self, CheckData, LinkKeyData, OutputMode, ResolveData, ShowData};

#[derive(Parser)]
#[command(name = "condctl")]
#[command(about = "Inspect, validate and build card filter conditions")]
#[command(version)]
pub struct Cli {
    /// Path to config file (overrides CONDCTL_CONFIG env var and default location)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Output in JSON format (auto-enabled when stdout is piped)
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Force text output even when stdout is piped
    #[arg(long, global = true, conflicts_with = "json")]
    pub no_json: bool,

    /// Suppress all output on success (errors still go to stderr)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether a condition is complete enough to save
    Check {
        /// Condition file, or "-" for stdin
        #[arg(default_value = "-")]
        input: String,

        /// Maximum group nesting (overrides editor.max_group_depth)
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Print a condition as a one-line expression
    Show {
        /// Condition file, or "-" for stdin
        #[arg(default_value = "-")]
        input: String,

        /// Print the normalized condition JSON instead
        #[arg(long)]
        pretty: bool,
    },

    /// Print an empty condition (a root group with no children)
    New {
        /// Root group operator: AND or OR (defaults to editor.default_group_operator)
        #[arg(long)]
        operator: Option<String>,
    },

    /// Print the default item for a node kind or a field kind
    Item {
        /// Node kind (TEXT, NUMBER, DATE, LINK, ...)
        #[arg(required_unless_present = "field_kind", conflicts_with = "field_kind")]
        kind: Option<String>,

        /// Kind of a user-defined field (TEXT_FIELD, NUMBER_FIELD, LINK_FIELD, ...)
        #[arg(long)]
        field_kind: Option<String>,

        /// Id of the field to filter on (requires --field-kind)
        #[arg(long, requires = "field_kind")]
        field_id: Option<String>,
    },

    /// Build or parse composite link-field keys
    LinkKey {
        #[command(subcommand)]
        command: LinkKeyCommands,
    },

    /// List every id a condition references
    Refs {
        /// Condition file, or "-" for stdin
        #[arg(default_value = "-")]
        input: String,
    },

    /// Fetch display names for every id a condition references
    Resolve {
        /// Condition file, or "-" for stdin
        #[arg(default_value = "-")]
        input: String,

        /// Backend base URL (overrides resolver.base_url)
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum LinkKeyCommands {
    /// Build the key for one end of a link type
    Build {
        /// Link type id
        link_type_id: String,
        /// SOURCE or TARGET
        position: String,
    },
    /// Split a key into link type id and position
    Parse {
        /// Composite key, e.g. "lt-42:SOURCE"
        key: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Show configuration file path
    Path,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "editor.max_group_depth")
        key: String,
        /// Value to set
        value: String,
    },
    /// Reset configuration to defaults
    Reset,
    /// Verify configuration file for errors
    Verify,
}

#[derive(Serialize)]
struct VerifyData {
    valid: bool,
    path: String,
    errors: Vec<String>,
}

/// read condition text from a file, or stdin when `input` is "-"
fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read condition from stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(input).with_context(|| format!("failed to read condition file: {}", input))
    }
}

/// parse a condition, exiting with PARSE_ERROR when it is malformed
fn load_condition(input: &str, mode: OutputMode) -> Result<Condition> {
    let text = read_input(input)?;
    match conditions::parse_condition(&text) {
        Ok(condition) => Ok(condition),
        Err(e) => {
            if mode.is_json() {
                match &e {
                    ParseError::Shape { message, path } => output::print_json_error_with_details(
                        exit_codes::PARSE_ERROR,
                        message,
                        path,
                    ),
                    ParseError::Syntax(_) => {
                        output::print_json_error(exit_codes::PARSE_ERROR, &e.to_string())
                    }
                }
            } else {
                eprintln!("error: {}", e);
            }
            std::process::exit(exit_codes::PARSE_ERROR);
        }
    }
}

/// load config, exiting with CONFIG_ERROR when it cannot be read
fn load_config(config_path: Option<&str>, mode: OutputMode) -> Config {
    let loaded =
        config::get_config_path_with_override(config_path).and_then(|path| config::load(&path));
    match loaded {
        Ok(config) => config,
        Err(e) => output::exit_with_error(mode, exit_codes::CONFIG_ERROR, &format!("{:#}", e), vec![]),
    }
}

fn parse_group_operator(value: &str, mode: OutputMode) -> GroupOperator {
    GroupOperator::parse(value).unwrap_or_else(|| {
        output::exit_with_error(
            mode,
            exit_codes::INVALID_ARGS,
            &format!("invalid group operator '{}'", value),
            vec!["AND".to_string(), "OR".to_string()],
        )
    })
}

/// pretty JSON in text mode, a JSON-RPC envelope in JSON mode
fn print_value<T: Serialize>(value: &T, mode: OutputMode) -> Result<()> {
    match mode {
        OutputMode::Json => output::print_json(value),
        OutputMode::Text => {
            let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
            println!("{}", json);
        }
        OutputMode::Quiet => {}
    }
    Ok(())
}

fn print_check(data: &CheckData) {
    if data.empty {
        println!("✓ No filter (matches every card)");
    } else if data.complete {
        println!("✓ Condition is complete");
    } else {
        println!(
            "✗ Condition has {} incomplete node(s)",
            data.incomplete_count
        );
    }

    if data.depth_exceeded {
        println!(
            "✗ Groups nest {} deep, the limit is {}",
            data.depth, data.max_depth
        );
    }
}

fn print_id_list<I, T>(label: &str, ids: I)
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let ids: Vec<String> = ids.into_iter().map(|id| id.as_ref().to_string()).collect();
    if !ids.is_empty() {
        println!("{:<12} {}", label, ids.join(", "));
    }
}

fn print_references(refs: &ConditionReferences) {
    if refs.is_empty() {
        println!("No references");
        return;
    }

    print_id_list("fields:", &refs.field_ids);
    print_id_list("links:", &refs.link_field_ids);
    for (field_id, option_ids) in &refs.enum_option_ids {
        print_id_list(&format!("options({}):", field_id), option_ids);
    }
    print_id_list("cards:", &refs.card_ids);
    print_id_list("statuses:", &refs.status_ids);
    print_id_list("streams:", &refs.stream_ids);
    print_id_list("users:", &refs.user_ids);
}

/// label every resolvable id; enum options are keyed `field/option`
fn resolve_labels<S>(
    resolver: &DisplayInfoResolver<S>,
    refs: &ConditionReferences,
) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();

    for id in &refs.field_ids {
        labels.insert(id.clone(), resolver.get_field_name(id));
    }
    for id in &refs.link_field_ids {
        labels.insert(id.clone(), resolver.get_link_field_name(id));
    }
    for (field_id, option_ids) in &refs.enum_option_ids {
        for option_id in option_ids {
            labels.insert(
                format!("{}/{}", field_id, option_id),
                resolver.get_enum_option_name(field_id, option_id),
            );
        }
    }
    for id in &refs.card_ids {
        labels.insert(id.clone(), resolver.get_card_label(id));
    }
    for id in &refs.status_ids {
        labels.insert(id.clone(), resolver.get_status_name(id));
    }

    labels
}

pub fn execute(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    let output_mode = OutputMode::from_flags(cli.json, cli.no_json, cli.quiet);

    match cli.command {
        Commands::Check { input, max_depth } => {
            let config = load_config(config_path, output_mode);
            let condition = load_condition(&input, output_mode)?;
            let max_depth = max_depth.unwrap_or(config.editor.max_group_depth);

            let data = CheckData {
                complete: conditions::is_condition_complete(&condition),
                empty: conditions::is_condition_empty(&condition),
                submittable: conditions::is_condition_submittable(&condition),
                incomplete_count: conditions::get_incomplete_condition_count(&condition),
                depth: conditions::condition_depth(&condition),
                max_depth,
                depth_exceeded: conditions::exceeds_max_depth(&condition, max_depth),
            };

            match output_mode {
                OutputMode::Json => output::print_json(&data),
                OutputMode::Text => print_check(&data),
                OutputMode::Quiet => {}
            }

            if !data.submittable || data.depth_exceeded {
                std::process::exit(exit_codes::INCOMPLETE);
            }
            Ok(())
        }

        Commands::Show { input, pretty } => {
            let condition = load_condition(&input, output_mode)?;

            match output_mode {
                OutputMode::Json => output::print_json(&ShowData {
                    text: condition.to_string(),
                    condition: &condition,
                }),
                OutputMode::Text if pretty => {
                    let json = serde_json::to_string_pretty(&condition)
                        .context("Failed to serialize condition")?;
                    println!("{}", json);
                }
                OutputMode::Text => println!("{}", condition),
                OutputMode::Quiet => {}
            }
            Ok(())
        }

        Commands::New { operator } => {
            let config = load_config(config_path, output_mode);
            let operator = match operator {
                Some(op) => parse_group_operator(&op, output_mode),
                None => config.editor.default_group_operator,
            };

            let condition = Condition::new(conditions::create_empty_condition_group(operator));
            print_value(&condition, output_mode)
        }

        Commands::Item {
            kind,
            field_kind,
            field_id,
        } => {
            let item = match (kind, field_kind) {
                (_, Some(field_kind)) => conditions::create_condition_item_for_field(
                    &field_kind,
                    field_id.as_deref().unwrap_or(""),
                ),
                (Some(kind), None) => match NodeType::parse(&kind) {
                    Some(node_type) => conditions::create_default_condition_item(node_type),
                    None => {
                        let suggestions = NodeType::suggest(&kind, 2)
                            .into_iter()
                            .map(String::from)
                            .collect();
                        output::exit_with_error(
                            output_mode,
                            exit_codes::INVALID_ARGS,
                            &format!("unknown node type '{}'", kind),
                            suggestions,
                        )
                    }
                },
                (None, None) => return Err(anyhow!("a node kind or --field-kind is required")),
            };

            print_value(&item, output_mode)
        }

        Commands::LinkKey { command } => {
            let data = match command {
                LinkKeyCommands::Build {
                    link_type_id,
                    position,
                } => {
                    let Some(position) = LinkPosition::parse(&position.to_ascii_uppercase()) else {
                        output::exit_with_error(
                            output_mode,
                            exit_codes::INVALID_ARGS,
                            &format!("invalid position '{}'", position),
                            vec!["SOURCE".to_string(), "TARGET".to_string()],
                        )
                    };
                    if link_type_id.trim().is_empty() {
                        output::exit_with_error(
                            output_mode,
                            exit_codes::INVALID_ARGS,
                            "link type id must not be empty",
                            vec![],
                        )
                    }

                    LinkKeyData {
                        key: conditions::build_link_field_id(&link_type_id, position),
                        link_type_id,
                        position: position.as_str(),
                    }
                }
                LinkKeyCommands::Parse { key } => match conditions::parse_link_field_id(&key) {
                    Ok(parsed) => LinkKeyData {
                        key,
                        link_type_id: parsed.link_type_id,
                        position: parsed.position.as_str(),
                    },
                    Err(e) => output::exit_with_error(
                        output_mode,
                        exit_codes::INVALID_ARGS,
                        &e.to_string(),
                        vec![],
                    ),
                },
            };

            match output_mode {
                OutputMode::Json => output::print_json(&data),
                OutputMode::Text => {
                    println!("key:          {}", data.key);
                    println!("link type id: {}", data.link_type_id);
                    println!("position:     {}", data.position);
                }
                OutputMode::Quiet => {}
            }
            Ok(())
        }

        Commands::Refs { input } => {
            let condition = load_condition(&input, output_mode)?;
            let refs = conditions::collect_references(&condition);

            match output_mode {
                OutputMode::Json => output::print_json(&refs),
                OutputMode::Text => print_references(&refs),
                OutputMode::Quiet => {}
            }
            Ok(())
        }

        Commands::Resolve { input, base_url } => {
            let mut config = load_config(config_path, output_mode);
            if let Some(url) = base_url {
                config.resolver.base_url = url;
            }
            let condition = load_condition(&input, output_mode)?;

            let source = HttpDisplayInfoSource::from_settings(&config.resolver)
                .context("Failed to build HTTP client")?;
            let resolver = DisplayInfoResolver::new(source);

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to start async runtime")?;
            let outcome = runtime.block_on(resolver.load_display_info(&condition));
            log::info!("display info load finished: {:?}", outcome);

            if outcome == LoadOutcome::Failed {
                let message = resolver
                    .error()
                    .unwrap_or_else(|| "display info request failed".to_string());
                output::exit_with_error(output_mode, exit_codes::RESOLVE_FAILED, &message, vec![]);
            }

            let references = conditions::collect_references(&condition);
            let labels = resolve_labels(&resolver, &references);

            match output_mode {
                OutputMode::Json => output::print_json(&ResolveData {
                    references,
                    display_info: resolver.snapshot(),
                    labels,
                }),
                OutputMode::Text if labels.is_empty() => println!("No ids to resolve"),
                OutputMode::Text => {
                    for (id, label) in &labels {
                        println!("{}\t{}", id, label);
                    }
                }
                OutputMode::Quiet => {}
            }
            Ok(())
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let config = load_config(config_path, output_mode);
                let json =
                    serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
                println!("{}", json);
                Ok(())
            }
            ConfigCommands::Path => {
                let path = config::get_config_path_with_override(config_path)?;
                println!("{}", path.display());
                Ok(())
            }
            ConfigCommands::Set { key, value } => {
                let path = config::get_config_path_with_override(config_path)?;
                let mut config = load_config(config_path, output_mode);
                if let Err(e) = config::set_value(&mut config, &key, &value) {
                    output::exit_with_error(
                        output_mode,
                        exit_codes::INVALID_ARGS,
                        &format!("{:#}", e),
                        vec![],
                    );
                }
                config::save(&config, &path)?;
                if !output_mode.is_quiet() {
                    println!("Set {} = {}", key, value);
                }
                Ok(())
            }
            ConfigCommands::Reset => {
                let path = config::get_config_path_with_override(config_path)?;
                config::reset(&path)?;
                if !output_mode.is_quiet() {
                    println!("Configuration reset to defaults");
                }
                Ok(())
            }
            ConfigCommands::Verify => {
                let path = config::get_config_path_with_override(config_path)?;
                let errors = match config::verify(&path) {
                    Ok(errors) => errors,
                    Err(e) => output::exit_with_error(
                        output_mode,
                        exit_codes::CONFIG_ERROR,
                        &format!("{:#}", e),
                        vec![],
                    ),
                };

                match output_mode {
                    OutputMode::Json => output::print_json(&VerifyData {
                        valid: errors.is_empty(),
                        path: path.display().to_string(),
                        errors: errors.clone(),
                    }),
                    OutputMode::Text if errors.is_empty() => {
                        println!("✓ Configuration is valid: {}", path.display());
                    }
                    OutputMode::Text => {
                        println!(
                            "✗ Configuration has {} error(s): {}",
                            errors.len(),
                            path.display()
                        );
                        println!();
                        for error in &errors {
                            println!("  - {}", error);
                        }
                    }
                    OutputMode::Quiet => {}
                }

                if !errors.is_empty() {
                    std::process::exit(exit_codes::CONFIG_ERROR);
                }
                Ok(())
            }
        },
    }
}
