use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use yard_inventory::{service, Config, QueryInput, Worker};

/// Pull and Save yard inventory: scrape both yards, then search the cached data
#[derive(Parser, Debug)]
#[command(name = "yard_inventory")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding the cached inventory files
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Base URL of the NHTSA vehicles API
    #[arg(long, global = true)]
    vin_api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Refresh the cache from both yard sites
    Scrape,
    /// Search both yards; engine filters need --make
    Search(SearchArgs),
    /// Count the vehicles an engine search would decode
    Count(SearchArgs),
    /// Show what is cached and when it was refreshed
    Status,
}

#[derive(Args, Debug, Clone)]
struct SearchArgs {
    #[arg(long)]
    year: Option<String>,
    #[arg(long)]
    make: Option<String>,
    #[arg(long)]
    model: Option<String>,
    /// Engine displacement in liters, e.g. 3.0
    #[arg(long)]
    displacement: Option<String>,
    #[arg(long)]
    cylinders: Option<String>,
}

impl From<SearchArgs> for QueryInput {
    fn from(args: SearchArgs) -> Self {
        QueryInput {
            year: args.year,
            make: args.make,
            model: args.model,
            displacement: args.displacement,
            cylinders: args.cylinders,
        }
    }
}

fn build_config(cli: &Cli) -> Config {
    let mut config = Config::default();
    if let Some(dir) = &cli.cache_dir {
        config = config.with_cache_dir(dir);
    }
    if let Some(url) = &cli.vin_api_url {
        config.vin_api_base_url = url.clone();
    }
    config
}

/// Run a job on the background worker and wait for its text
fn run(worker: &mut Worker, label: &str, job: impl FnOnce() -> String + Send + 'static) -> String {
    if !worker.submit(label, job) {
        return format!("{label} not started: another action is running");
    }
    worker
        .wait()
        .map(|done| done.output)
        .unwrap_or_else(|| format!("{label} produced no output"))
}

fn main() {
    // Initialize logger. Set RUST_LOG environment variable to control log level.
    // Examples: RUST_LOG=info, RUST_LOG=debug, RUST_LOG=yard_inventory=trace
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = build_config(&cli);
    log::info!("Cache directory: {}", config.cache_dir.display());

    let mut worker = match Worker::new() {
        Ok(worker) => worker,
        Err(e) => {
            log::error!("Failed to start background worker: {e}");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let output = match cli.command {
        Command::Scrape => run(&mut worker, "Scrape", move || {
            match service::scrape_all_locations(&config) {
                Ok(results) => service::format_scrape_results(&results),
                Err(e) => format!("Scrape failed: {e}"),
            }
        }),
        Command::Search(args) => {
            let input = QueryInput::from(args);
            match input.parse() {
                Err(rejection) => rejection.to_string(),
                Ok(params) => {
                    if params.needs_engine() {
                        let count_config = config.clone();
                        let count_input = input.clone();
                        // Errors surface from the search itself
                        let notice = run(&mut worker, "Count", move || {
                            service::count_for_engine_query(&count_config, &count_input)
                                .map(|n| format!(
                                    "Sending {n} items to the NHTSA API\nThis may take a few moments...\n---------------"
                                ))
                                .unwrap_or_default()
                        });
                        if !notice.is_empty() {
                            println!("{notice}");
                        }
                    }
                    run(&mut worker, "Search", move || service::query(&config, &input))
                }
            }
        }
        Command::Count(args) => {
            let input = QueryInput::from(args);
            run(&mut worker, "Count", move || {
                match service::count_for_engine_query(&config, &input) {
                    Ok(n) => format!("{n} vehicles match"),
                    Err(message) => message,
                }
            })
        }
        Command::Status => run(&mut worker, "Status", move || service::cache_status(&config)),
    };

    println!("{output}");
}
