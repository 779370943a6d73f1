//! mytodo CLI entry point.

use clap::Parser;
use mytodo::cli::commands;
use mytodo::cli::{Cli, Commands};
use mytodo::context::AppContext;
use mytodo::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Set up tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                eprintln!("{}", e.to_structured_json());
            } else if let Some(hint) = e.hint() {
                eprintln!("Error: {e}\n  Hint: {hint}");
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,reqwest=info,hyper=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli) -> Result<(), Error> {
    // Completions need no context
    if let Commands::Completions { shell } = &cli.command {
        return commands::completions::execute(*shell);
    }

    let ctx = AppContext::from_env(cli.file.as_deref(), cli.json, cli.quiet)?;

    match &cli.command {
        // Task list
        Commands::Add { text, plain, yes } => commands::task::execute_add(&ctx, text, *plain, *yes),
        Commands::List { summary } => commands::task::execute_list(&ctx, *summary),
        Commands::Remove { index } => commands::task::execute_remove(&ctx, *index),
        Commands::Done { index } => commands::task::execute_set_done(&ctx, *index, true),
        Commands::Undone { index } => commands::task::execute_set_done(&ctx, *index, false),
        Commands::Edit { index, content } => commands::task::execute_edit(&ctx, *index, content),
        Commands::Cm { index, comment } => commands::task::execute_comment(&ctx, *index, comment),

        // Jira
        Commands::JiraEpicTracker {
            epic,
            format,
            output,
            quip,
        } => commands::jira::execute_tracker(&ctx, epic, *format, output.as_deref(), quip.as_deref()),
        Commands::JiraSummary { yes } => commands::jira::execute_summary(&ctx, *yes),
        Commands::JiraCreate {
            summary,
            description,
            labels,
            issue_type,
            yes,
        } => commands::jira::execute_create(
            &ctx,
            summary,
            description.as_deref(),
            labels,
            issue_type,
            *yes,
        ),

        Commands::Completions { shell } => commands::completions::execute(*shell),
    }
}
