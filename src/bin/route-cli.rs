use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;

use path_router::config::load_config;
use path_router::routing::{BoxError, Dispatcher, RouteOutcome};

#[derive(Parser)]
#[command(name = "route-cli")]
#[command(about = "Inspect and test a path router configuration", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the route table as JSON
    Table,
    /// Print the route table as an OpenAPI-style YAML stub
    Yaml,
    /// Resolve a request against the configured routes
    Check {
        method: String,
        path: String,
        /// Retry without a trailing slash on a miss
        #[arg(long)]
        trim: bool,
    },
}

fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let dispatcher: Dispatcher<(), String> =
        Dispatcher::builder().with_config(&config.routing).build();
    for route in &config.routes {
        let pattern = route.pattern.clone();
        dispatcher.add_with_ref(&route.method, &route.pattern, &route.reference, move |_, _| {
            Ok(pattern.clone())
        })?;
    }

    match cli.command {
        Commands::Table => println!("{}", dispatcher.table().to_json()?),
        Commands::Yaml => print!("{}", dispatcher.table().to_yaml()),
        Commands::Check { method, path, trim } => {
            let trim = trim || dispatcher.trim_trailing_slash();
            let outcome = dispatcher.resolve_with(&method, &path, trim);

            let (exists, method_allowed) = outcome.capability();
            let (pattern, params) = match outcome {
                RouteOutcome::Matched { params, .. } => {
                    // Matched handlers return their own pattern.
                    let pattern = dispatcher.route_with(&method, &path, (), trim)?;
                    (pattern, Some(params))
                }
                _ => (None, None),
            };

            let report = json!({
                "exists": exists,
                "method_allowed": method_allowed,
                "pattern": pattern,
                "params": params,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
