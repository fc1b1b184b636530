use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod classify;
mod cli;
mod fetch;
mod merge;
mod notify;
mod novelty;
mod schema;
mod sources;
mod state;
mod util;
mod versioning;
mod workflow;

use cli::RootArgs;
use workflow::RunReport;

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.verbose);

    let report = workflow::run(&args)?;
    print_summary(&report);
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_summary(report: &RunReport) {
    if report.new_releases.is_empty() {
        println!("no new releases");
    } else {
        for item in &report.new_releases {
            let build = if item.build.is_empty() {
                "unknown build"
            } else {
                item.build.as_str()
            };
            println!(
                "{} ({build}) [{}]",
                item.display_title(),
                item.status.display_name()
            );
        }
    }
    let verb = if report.persisted { "tracked" } else { "seen (dry run)" };
    println!(
        "{} new release(s), {} {verb}",
        report.new_releases.len(),
        report.tracked
    );
    if report.failed_sources > 0 {
        println!("{} source(s) failed; see log", report.failed_sources);
    }
}
