use chrono::{Local, NaiveDate};
use clap::Parser;
use indicatif::MultiProgress;
use sprint_report::model::{Issue, Result, RunContext, Sprint};
use sprint_report::report::{JsonReport, MarkdownReport};
use sprint_report::utils::{finish_stage, MultiProgressNew};
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(name = "sprint-report")]
#[command(about = "Builds a sprint report model from a tracker issue export")]
struct Args {
    /// Issue rows exported from the tracker, as a JSON array of column-keyed objects
    #[arg(long = "issues", default_value = "issues.json")]
    issues_path: String,
    /// Sprint details (number, start, totalDays or end, release dates, ...)
    #[arg(long = "sprint", default_value = "sprint.json")]
    sprint_path: String,
    /// Where the report model is written as JSON
    #[arg(long = "output", default_value = "report.json")]
    output_path: String,
    /// Optional Markdown preview of the report
    #[arg(long = "markdown")]
    markdown_path: Option<String>,
    /// Reference date for days left (defaults to today)
    #[arg(long = "today")]
    today: Option<NaiveDate>,
    /// Base URL for issue links, e.g. https://example.atlassian.net/browse
    #[arg(long = "browse-url")]
    browse_url: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        error!("{err}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let multi_progress = MultiProgress::new();

    let pb = multi_progress.add_stage(format!("Read sprint config `{}` ...", args.sprint_path));
    let sprint = Sprint::from_config(&args.sprint_path)?;
    finish_stage(
        &pb,
        format!(
            "Sprint #{} ({} days from {})",
            sprint.number, sprint.total_days, sprint.start
        ),
    );

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let browse_url = args.browse_url.clone().or_else(|| sprint.browse_url.clone());
    let mut ctx = RunContext::new(today).with_browse_url(browse_url);

    let pb = multi_progress.add_stage(format!("Read issue export `{}` ...", args.issues_path));
    let issues = Issue::from_export(&args.issues_path, &mut ctx)?;
    finish_stage(
        &pb,
        format!("Completed parsing export (found {} issues)", issues.len()),
    );

    let pb = multi_progress.add_stage("Build report ...");
    let model = sprint_report::generate_from_issues(&issues, &sprint, ctx);
    finish_stage(
        &pb,
        format!(
            "Built report ({} rows, {} diagnostics)",
            model.rows.len(),
            model.diagnostics.len()
        ),
    );

    model.write_json(&args.output_path)?;
    info!("Report model written to `{}`", args.output_path);
    if let Some(path) = &args.markdown_path {
        model.report_create(path)?;
        info!("Markdown preview written to `{}`", path);
    }
    Ok(())
}
