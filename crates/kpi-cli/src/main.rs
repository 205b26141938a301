use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, Command};
use kpi_cli::commands::{self, CalculateOptions};
use kpi_cli::telemetry;
use std::path::PathBuf;

fn cli() -> Command {
    Command::new("kpi-calc")
        .version(kpi_engine::VERSION)
        .about("Weighted KPI hierarchy calculator")
        .subcommand_required(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON on stderr"),
        )
        .subcommand(
            Command::new("calculate")
                .about("Bind raw values to a hierarchy and evaluate it")
                .arg(
                    Arg::new("hierarchy")
                        .long("hierarchy")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Hierarchy definition (JSON)"),
                )
                .arg(
                    Arg::new("values")
                        .long("values")
                        .value_parser(value_parser!(PathBuf))
                        .help("Raw values (JSON array)"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("Calculation config (TOML)"),
                )
                .arg(
                    Arg::new("relaxed")
                        .long("relaxed")
                        .action(ArgAction::SetTrue)
                        .help("Do not enforce structural edge counts"),
                )
                .arg(
                    Arg::new("redistribute")
                        .long("redistribute")
                        .action(ArgAction::SetTrue)
                        .help("Spread weight of missing children over the others"),
                )
                .arg(
                    Arg::new("no-validate")
                        .long("no-validate")
                        .action(ArgAction::SetTrue)
                        .help("Skip pre-flight validation"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the result hierarchy here instead of stdout"),
                )
                .arg(
                    Arg::new("compact")
                        .long("compact")
                        .action(ArgAction::SetTrue)
                        .help("Single line JSON output"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Check a hierarchy definition")
                .arg(
                    Arg::new("hierarchy")
                        .long("hierarchy")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Hierarchy definition (JSON)"),
                )
                .arg(
                    Arg::new("relaxed")
                        .long("relaxed")
                        .action(ArgAction::SetTrue)
                        .help("Validate in relaxed mode"),
                ),
        )
        .subcommand(Command::new("types").about("List well-known KPI types"))
}

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    telemetry::init(matches.get_flag("log-json"))?;

    match matches.subcommand() {
        Some(("calculate", args)) => {
            let options = CalculateOptions {
                hierarchy: args
                    .get_one::<PathBuf>("hierarchy")
                    .cloned()
                    .context("missing --hierarchy")?,
                values: args.get_one::<PathBuf>("values").cloned(),
                config: args.get_one::<PathBuf>("config").cloned(),
                relaxed: args.get_flag("relaxed"),
                redistribute: args.get_flag("redistribute"),
                skip_validation: args.get_flag("no-validate"),
            };

            let (outcome, _) = commands::calculate(&options)?;
            let json = if args.get_flag("compact") {
                serde_json::to_string(&outcome.result)?
            } else {
                outcome.result.to_json()?
            };

            match args.get_one::<PathBuf>("output") {
                Some(path) => std::fs::write(path, json)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => println!("{json}"),
            }
        }
        Some(("validate", args)) => {
            let path = args
                .get_one::<PathBuf>("hierarchy")
                .context("missing --hierarchy")?;
            let report = commands::validate(path, !args.get_flag("relaxed"))?;
            println!("{report}");
            if !report.is_valid() {
                std::process::exit(1);
            }
        }
        Some(("types", _)) => println!("{}", commands::list_types()),
        _ => unreachable!("subcommand_required"),
    }

    Ok(())
}
