use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod config;
mod errors;
mod models;
mod notes;
mod output;
mod query;

use api::jira::JiraClient;
use config::settings::{parse_input, parse_mode, RawJira, RawOutput, RawQuery, RawSettings, Settings};
use errors::ReleaseNotesError;
use models::site::JiraSite;
use output::ActionOutput;

/// Every input doubles as a GitHub Actions `INPUT_*` variable. Actions sets
/// unset inputs to "", so typed inputs are taken as strings and parsed after
/// blanks are dropped.
#[derive(Parser)]
#[command(name = "jira-release-notes")]
#[command(version, disable_version_flag = true)]
#[command(about = "Generate Markdown release notes from a Jira search", long_about = None)]
struct Cli {
    /// for debugging purposes
    #[arg(short, long)]
    verbose: bool,

    /// TOML file with [jira], [query] and [output] sections
    #[arg(long, env = "INPUT_CONFIG")]
    config: Option<String>,

    /// Jira Cloud site name (the `acme` in acme.atlassian.net)
    #[arg(long, env = "INPUT_DOMAIN")]
    domain: Option<String>,

    /// Comma-separated project keys (e.g., "NA, CX, GROW")
    #[arg(long, env = "INPUT_PROJECTS")]
    projects: Option<String>,

    /// Component or label name to filter on
    #[arg(long, env = "INPUT_VERSION")]
    version: Option<String>,

    /// Creation date order: ASC or DESC (default)
    #[arg(long, env = "INPUT_ORDER")]
    order: Option<String>,

    /// Filter on component (default) or on label
    #[arg(long, env = "INPUT_MODE")]
    mode: Option<String>,

    /// Base64 `email:token`, or the raw API token when --email is set
    #[arg(long = "auth-token", env = "INPUT_AUTH-TOKEN", hide_env_values = true)]
    auth_token: Option<String>,

    /// Atlassian account email for API token authentication
    #[arg(long, env = "INPUT_EMAIL")]
    email: Option<String>,

    /// Results to request, at most 100
    #[arg(long = "max-results", env = "INPUT_MAX-RESULTS")]
    max_results: Option<String>,

    /// HTTP timeout for the search request
    #[arg(long = "timeout-secs", env = "INPUT_TIMEOUT-SECS")]
    timeout_secs: Option<String>,

    /// Step output name (default: release_notes)
    #[arg(long = "output-key", env = "INPUT_OUTPUT-KEY")]
    output_key: Option<String>,

    /// Also write the notes to this file
    #[arg(long = "output-file", env = "INPUT_OUTPUT-FILE")]
    output_file: Option<String>,
}

impl Cli {
    fn raw_settings(&self) -> errors::Result<RawSettings> {
        Ok(RawSettings {
            jira: RawJira {
                domain: self.domain.clone(),
                email: self.email.clone(),
                auth_token: self.auth_token.clone(),
                max_results: parse_input("max-results", self.max_results.as_deref())?,
                timeout_secs: parse_input("timeout-secs", self.timeout_secs.as_deref())?,
            },
            query: RawQuery {
                projects: self.projects.clone(),
                version: self.version.clone(),
                order: self.order.clone(),
                mode: parse_mode(self.mode.as_deref())?,
            },
            output: RawOutput {
                key: self.output_key.clone(),
                file: parse_input("output-file", self.output_file.as_deref())?,
            },
        })
    }
}

#[tokio::main]
async fn main() {
    let publisher = ActionOutput::from_env();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if e.use_stderr() {
                let message = e.to_string();
                publisher.set_failed(message.lines().next().unwrap_or("Invalid arguments"));
            }
            e.exit()
        }
    };
    init_logging(cli.verbose);

    eprintln!(
        "{}",
        format!("Jira Release Notes v{}", env!("CARGO_PKG_VERSION")).bright_cyan().bold()
    );

    if let Err(e) = run(&cli, &publisher).await {
        match e.downcast_ref::<ReleaseNotesError>() {
            Some(err) => {
                error!(kind = ?err.kind(), "release notes generation failed");
                eprintln!("\n{}", err);
                publisher.set_failed(&err.headline());
            }
            None => {
                eprintln!("\n{} {:#}", "Error".red().bold(), e);
                publisher.set_failed(&format!("{:#}", e));
            }
        }
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn resolve_settings(cli: &Cli) -> errors::Result<Settings> {
    let config_path: Option<PathBuf> = parse_input("config", cli.config.as_deref())?;
    let file_settings = match &config_path {
        Some(path) => {
            debug!(path = %path.display(), "loading config file");
            RawSettings::load(path)?
        }
        None => RawSettings::default(),
    };

    file_settings.merge(cli.raw_settings()?).resolve()
}

async fn run(cli: &Cli, publisher: &ActionOutput) -> anyhow::Result<()> {
    let settings = resolve_settings(cli)?;

    info!(
        domain = %settings.jira.domain,
        projects = %settings.query.projects,
        filter = %settings.query.version,
        mode = ?settings.query.mode,
        auth = ?settings.jira.auth,
        "resolved inputs"
    );

    let site = JiraSite::new(&settings.jira.domain);
    let jira = JiraClient::new(
        site.base_url(),
        settings.jira.auth.clone(),
        settings.jira.timeout_secs.map(Duration::from_secs),
    )?;

    let notes = generate_release_notes(&settings, &jira).await?;
    debug!("release notes:\n{}", notes);

    publish(&settings, publisher, &notes)?;

    eprintln!("{}", "✓ Release notes generated".green().bold());
    Ok(())
}

// The step output goes first so a failed publish leaves no notes file behind.
fn publish(settings: &Settings, publisher: &ActionOutput, notes: &str) -> anyhow::Result<()> {
    publisher.set_output(&settings.output.key, notes)?;

    if let Some(path) = &settings.output.file {
        output::write_notes_file(path, notes)?;
        info!(path = %path.display(), "wrote release notes file");
    }
    Ok(())
}

/// Query → fetch → group → render. Any failure aborts before output is produced.
async fn generate_release_notes(settings: &Settings, jira: &JiraClient) -> errors::Result<String> {
    let query = query::build_filter_query(
        &settings.query.projects,
        &settings.query.version,
        settings.query.order.as_deref(),
        settings.query.mode,
    );
    let title = query::build_query_title(
        &settings.jira.domain,
        &settings.query.projects,
        &query,
        &settings.query.version,
    )?;
    info!(
        jql = %query.to_jql(),
        filter = %query.predicate.value(),
        "built Jira filter"
    );

    let issues = jira.search(&query, settings.jira.max_results).await?;
    let groups = notes::group_by_project(issues)?;
    info!(
        groups = groups.len(),
        issues = groups.issue_count(),
        "grouped issues by project"
    );

    let site = JiraSite::new(&settings.jira.domain);
    Ok(notes::render_markdown(&groups, &title, &site))
}
