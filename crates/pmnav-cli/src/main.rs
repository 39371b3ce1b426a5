use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, Command};
use pmnav_cli::commands::{self, OpenOptions};
use pmnav_cli::init_tracing;
use pmnav_core::LoadOutcome;
use pmnav_routing::ShortcutMap;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Command::new("pmnav")
        .version(env!("CARGO_PKG_VERSION"))
        .about("PM Dashboard view navigator")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Navigator config file (TOML)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging (RUST_LOG takes precedence)"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve a location to a view and parameters")
                .arg(
                    Arg::new("location")
                        .required(true)
                        .help("Path and query, e.g. /projects?status=%22Active%22"),
                ),
        )
        .subcommand(
            Command::new("url")
                .about("Build the URL for a view")
                .arg(Arg::new("view").required(true).help("View id, e.g. project-detail"))
                .arg(
                    Arg::new("param")
                        .short('p')
                        .long("param")
                        .action(ArgAction::Append)
                        .help("Parameter as key=value (repeatable)"),
                ),
        )
        .subcommand(Command::new("shortcuts").about("List keyboard shortcuts"))
        .subcommand(
            Command::new("open")
                .about("Load a view from a running dashboard server")
                .arg(
                    Arg::new("location")
                        .default_value("/")
                        .help("Initial location"),
                )
                .arg(
                    Arg::new("base-url")
                        .long("base-url")
                        .default_value("http://localhost:8000")
                        .help("Dashboard server"),
                )
                .arg(
                    Arg::new("session")
                        .long("session")
                        .value_parser(value_parser!(PathBuf))
                        .help("Session file keeping navigation context between runs"),
                ),
        );

    let matches = cli.get_matches();

    let level = if matches.get_flag("verbose") { "debug" } else { "info" };
    init_tracing(level, matches.get_flag("json-logs"));

    let config = commands::load_config(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    let routes = commands::route_table(&config);

    match matches.subcommand() {
        Some(("resolve", args)) => {
            let location = args.get_one::<String>("location").map_or("/", String::as_str);
            println!("{}", commands::resolve(&routes, location)?);
        }
        Some(("url", args)) => {
            let view = args.get_one::<String>("view").map_or("", String::as_str);
            let params: Vec<String> = args
                .get_many::<String>("param")
                .map(|values| values.cloned().collect())
                .unwrap_or_default();
            println!("{}", commands::url(&routes, view, &params)?);
        }
        Some(("shortcuts", _)) => {
            println!("{}", commands::shortcuts(&ShortcutMap::with_defaults()));
        }
        Some(("open", args)) => {
            let options = OpenOptions {
                base_url: args
                    .get_one::<String>("base-url")
                    .map_or("http://localhost:8000", String::as_str),
                location: args.get_one::<String>("location").map_or("/", String::as_str),
                session: args.get_one::<PathBuf>("session").map(PathBuf::as_path),
            };

            let report = commands::open(config, options).await?;
            if let Some(content) = &report.content {
                println!("{content}");
            }
            if let LoadOutcome::Failed(error) = &report.outcome {
                eprintln!(
                    "Could not load {}: {} ({} transient failure(s))",
                    error.view, error.error, error.retry_count
                );
            }
            std::process::exit(report.exit_code());
        }
        _ => {}
    }

    Ok(())
}
