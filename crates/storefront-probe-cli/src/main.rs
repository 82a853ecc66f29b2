//! Storefront Probe CLI
//!
//! ## Usage
//!
//! ```bash
//! storefront-probe run                         # Run every scenario in a browser
//! storefront-probe run --mock --tag pricing    # Pricing checks, in-memory storefront
//! storefront-probe run --report out.xml --format junit
//! storefront-probe list                        # Show the scenario catalog
//! storefront-probe config --data fixture.json  # Print effective settings
//! ```

use clap::Parser;
use std::process::ExitCode;
use storefront_probe::scenario;
use storefront_probe_cli::{
    init_tracing, listing_line, Cli, CliConfig, CliError, CliResult, ColorChoice, Commands,
    ConfigArgs, ListArgs, RunArgs, Settings, SuiteRunner, Verbosity,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    init_tracing(verbosity);
    let color: ColorChoice = cli.color.clone().into();
    let config = CliConfig::new().with_verbosity(verbosity).with_color(color);

    match cli.command {
        Commands::Run(args) => run_suite(config, &args),
        Commands::List(args) => {
            run_list(&args);
            Ok(())
        }
        Commands::Config(args) => run_config(&args),
    }
}

fn run_suite(config: CliConfig, args: &RunArgs) -> CliResult<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let mut runner = SuiteRunner::new(config);
    let results = runtime.block_on(runner.run(args))?;

    if results.all_passed() {
        Ok(())
    } else {
        Err(CliError::ScenariosFailed {
            failed: results.total() - results.passed_count(),
            total: results.total(),
        })
    }
}

fn run_list(args: &ListArgs) {
    for scenario in scenario::select(None, &args.tags) {
        println!("{}", listing_line(scenario));
    }
}

fn run_config(args: &ConfigArgs) -> CliResult<()> {
    let settings = Settings::resolve(&args.source, &args.overrides)?.redacted();
    if args.json {
        let json = serde_json::to_string_pretty(&settings)
            .map_err(|e| CliError::config(e.to_string()))?;
        println!("{json}");
    } else {
        print!("{}", serde_yaml_ng::to_string(&settings)?);
    }
    Ok(())
}
