//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs logging
//! - loads the CPI series (remote or cache)
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing::info;

use crate::cli::{Command, DashboardArgs, ExportArgs, ReportArgs, SampleArgs};
use crate::data::{SampleConfig, generate_sample};
use crate::error::AppError;
use crate::io::{RunSummary, write_observations_csv, write_summary_json, write_table_csv};
use crate::logging::{LogTarget, init as init_logging};

pub mod pipeline;

/// Entry point for the `heat` binary.
pub fn run() -> Result<(), AppError> {
    // Missing .env is fine; real environment variables still apply.
    dotenvy::dotenv().ok();

    // We want `heat` and `heat --yoy 4` to behave like `heat tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let target = match cli.command {
        Command::Tui(_) => LogTarget::File,
        _ => LogTarget::Stderr,
    };
    let _guard = init_logging(target);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Report(args) => handle_report(args),
        Command::Alerts(args) => handle_alerts(args),
        Command::Export(args) => handle_export(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let session = args.session.session()?;
    let load = args.source.load_config();
    let run = pipeline::run(&load, &session.thresholds)?;

    println!(
        "{}",
        crate::report::format_run_summary(&run.table, &run.latest, &run.series.origin, &session)
    );

    if !args.no_plot {
        let plot = crate::plot::render_trend_plot(&run.table.rows, args.width, args.height);
        println!("{plot}");
    }

    println!("{}", crate::report::format_alerts(&run.table, session.language));
    Ok(())
}

fn handle_alerts(args: DashboardArgs) -> Result<(), AppError> {
    let session = args.session.session()?;
    let run = pipeline::run(&args.source.load_config(), &session.thresholds)?;
    println!("{}", crate::report::format_alerts(&run.table, session.language));
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    if args.csv.is_none() && args.json.is_none() {
        return Err(AppError::input("Nothing to export: pass --csv and/or --json."));
    }

    let session = args.session.session()?;
    let run = pipeline::run(&args.source.load_config(), &session.thresholds)?;

    if let Some(path) = &args.csv {
        write_table_csv(path, &run.table)?;
    }
    if let Some(path) = &args.json {
        let summary = RunSummary::new(&run.table, run.latest, run.series.origin.to_string());
        write_summary_json(path, &summary)?;
    }
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        area: args.area,
        start: args.start,
        months: args.months,
        seed: args.seed,
    };
    let observations = generate_sample(&config)?;
    write_observations_csv(&args.out, &observations)?;

    info!(path = %args.out.display(), rows = observations.len(), "wrote sample cache");
    println!("Wrote {} observations to {}", observations.len(), args.out.display());
    Ok(())
}

fn handle_tui(args: DashboardArgs) -> Result<(), AppError> {
    crate::tui::run(args)
}

/// Rewrite argv so `heat` defaults to `heat tui`.
///
/// Rules:
/// - `heat`                       -> `heat tui`
/// - `heat --yoy 4 ...`           -> `heat tui --yoy 4 ...`
/// - `heat --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_dashboard() {
        assert_eq!(rewrite_args(argv(&["heat"])), argv(&["heat", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["heat", "--lang", "ar"])),
            argv(&["heat", "tui", "--lang", "ar"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        assert_eq!(rewrite_args(argv(&["heat", "report"])), argv(&["heat", "report"]));
        assert_eq!(rewrite_args(argv(&["heat", "--help"])), argv(&["heat", "--help"]));
    }
}
