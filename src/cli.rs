//! `jtl` command line: configure the connection, inspect issues and log time.

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::debug;
use std::path::PathBuf;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use crate::app::AppContext;
use crate::config::{Config, ConfigManager};
use crate::error::{AppError, Result};
use crate::issue_key::IssueKey;
use crate::phrase::format_duration;
use crate::tracker::{TrackerApi, TypeFilter};
use crate::workflow::{LogForm, LogOutcome};

/// Log time against JIRA issues.
#[derive(Debug, Parser)]
#[command(name = "jtl", version, about, long_about = None)]
pub struct Cli {
    /// Use this config file instead of the one in the platform config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Update and save connection settings.
    Configure(ConfigureArgs),
    /// Verify the settings against the server.
    Check,
    /// List issue types.
    Types {
        #[arg(long, value_enum, default_value_t = TypeKind::Subtasks)]
        kind: TypeKind,
    },
    /// Show an issue's summary.
    Summary { issue: String },
    /// Log a duration phrase such as `1h 30m` against an issue.
    Log {
        issue: String,
        time: String,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Run the clock for an issue. Enter logs the time, `r` resets it, `q` discards it.
    Track {
        issue: String,
        #[command(flatten)]
        target: TargetArgs,
    },
}

#[derive(Debug, Args)]
struct ConfigureArgs {
    #[arg(long)]
    url: Option<String>,
    #[arg(long)]
    api_path: Option<String>,
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    password: Option<String>,
    /// Transition used to close main issues.
    #[arg(long)]
    main_close: Option<String>,
    /// Transition used to close subtasks.
    #[arg(long)]
    sub_close: Option<String>,
    /// Subtask type to hide; repeat for several. Replaces the saved list.
    #[arg(long = "exclude")]
    exclusions: Vec<String>,
    #[arg(long)]
    max_logs: Option<usize>,
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[derive(Debug, Args)]
struct TargetArgs {
    /// Log against a subtask of this type, creating it when missing.
    #[arg(long)]
    subtask: Option<String>,
    /// Resolve or close the issue afterwards.
    #[arg(long)]
    close: bool,
    #[arg(short, long)]
    description: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TypeKind {
    Standard,
    Subtasks,
    All,
}

impl From<TypeKind> for TypeFilter {
    fn from(kind: TypeKind) -> Self {
        match kind {
            TypeKind::Standard => TypeFilter::NoSubtasks,
            TypeKind::Subtasks => TypeFilter::SubtasksOnly,
            TypeKind::All => TypeFilter::All,
        }
    }
}

impl Cli {
    fn config_manager(&self) -> Result<ConfigManager> {
        match &self.config {
            Some(path) => Ok(ConfigManager::at(path)),
            None => ConfigManager::new(),
        }
    }
}

pub async fn execute(cli: Cli) -> Result<()> {
    let manager = cli.config_manager()?;
    let config = manager.load();
    debug!("Using config at {}", manager.path().display());

    match cli.command {
        Command::Configure(args) => configure(&manager, config, args),
        Command::Check => {
            let context = AppContext::from_config(config)?;
            context.check_config().await?;
            println!("Connected to {}", context.config().jira.url_base);
            Ok(())
        }
        Command::Types { kind } => {
            let context = ready_context(config)?;
            let types = match kind {
                TypeKind::Subtasks => context.load_subtask_types().await?,
                other => context
                    .logger()
                    .tracker()
                    .fetch_issue_types(other.into())
                    .await
                    .ok_or_else(|| AppError::Submission("Could not load issue types from JIRA!".into()))?,
            };
            for (id, name) in types {
                println!("{id:>6}  {name}");
            }
            Ok(())
        }
        Command::Summary { issue } => {
            let context = ready_context(config)?;
            let issue = IssueKey::parse(&issue)?;
            match context.logger().tracker().get_issue_summary(&issue).await {
                Some(found) => println!("{}: {}", found.key, found.summary.unwrap_or_default()),
                None => println!("{issue} not found"),
            }
            Ok(())
        }
        Command::Log { issue, time, target } => {
            let mut context = ready_context(config)?;
            let form = form_for(&context, issue, Some(time), target).await;
            let outcome = context.logger_mut().submit(&form).await?;
            print_outcome(&context, &outcome);
            Ok(())
        }
        Command::Track { issue, target } => {
            let mut context = ready_context(config)?;
            let form = form_for(&context, issue, None, target).await;
            track(&mut context, form).await
        }
    }
}

fn ready_context(config: Config) -> Result<AppContext> {
    if !config.ready() {
        return Err(AppError::ConfigNotReady);
    }
    AppContext::from_config(config)
}

fn configure(manager: &ConfigManager, mut config: Config, args: ConfigureArgs) -> Result<()> {
    let jira = &mut config.jira;
    if let Some(url) = args.url {
        jira.url_base = url;
    }
    if let Some(api_path) = args.api_path {
        jira.url_api = api_path;
    }
    if let Some(username) = args.username {
        jira.username = username;
    }
    if let Some(password) = args.password {
        jira.set_password(&password);
    }
    if let Some(transition) = args.main_close {
        jira.main_task_close_transition = transition;
    }
    if let Some(transition) = args.sub_close {
        jira.sub_task_close_transition = transition;
    }
    if !args.exclusions.is_empty() {
        jira.sub_task_type_exclusions = args.exclusions;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        jira.timeout_ms = timeout_ms;
    }
    if let Some(max_logs) = args.max_logs {
        config.jtl.max_logs = max_logs;
    }

    config.validate()?;
    manager.save(&config)?;
    println!("Saved settings to {}", manager.path().display());
    Ok(())
}

/// Builds the submission form, looking up the issue summary for the success message.
async fn form_for(
    context: &AppContext,
    issue: String,
    manual_time: Option<String>,
    target: TargetArgs,
) -> LogForm {
    let summary = match IssueKey::parse(&issue) {
        Ok(key) => context
            .logger()
            .tracker()
            .get_issue_summary(&key)
            .await
            .and_then(|found| found.summary),
        Err(_) => None,
    };
    LogForm {
        issue,
        manual_time,
        subtask: target.subtask,
        close: target.close,
        description: target.description,
        summary,
    }
}

fn print_outcome(context: &AppContext, outcome: &LogOutcome) {
    let logger = context.logger();
    println!(
        "Logged {} against {} (work log {})",
        format_duration(&outcome.logged),
        outcome.target,
        outcome.worklog_id
    );
    println!(
        "Logged today: {}  Day total: {}",
        format_duration(&logger.logged_total()),
        format_duration(&logger.day_grand_total())
    );
}

async fn track(context: &mut AppContext, form: LogForm) -> Result<()> {
    let clock = context.logger().clock();
    clock.on_minute(|time| println!("{} elapsed", format_duration(&time)));
    clock.start();
    println!("Tracking {}. Enter logs the time, r resets, q discards.", form.issue);

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => match context.logger_mut().submit(&form).await {
                Ok(outcome) => {
                    context.logger().clock().stop(true);
                    print_outcome(context, &outcome);
                    return Ok(());
                }
                // reported through the activity log; keep tracking
                Err(AppError::Validation(_)) | Err(AppError::Submission(_)) => {}
                Err(err) => return Err(err),
            },
            "r" => {
                let report = context.logger().reset_time();
                if report.looks_like_new_day
                    && confirm(
                        &mut lines,
                        "It looks like this is a new day, reset the logged total as well? [y/N]",
                    )
                    .await?
                {
                    context.logger_mut().reset_logged_total();
                }
            }
            "q" => break,
            other => println!("Unknown input '{other}'"),
        }
    }

    let dropped = context.logger().clock().get_time(None);
    context.logger().clock().stop(true);
    println!("Discarded {}", format_duration(&dropped));
    Ok(())
}

/// Asks a yes/no question on the next input line; anything but `y`/`yes` is a no.
async fn confirm<R>(lines: &mut Lines<R>, question: &str) -> Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    println!("{question}");
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_log_with_subtask_and_close() {
        let cli = Cli::try_parse_from([
            "jtl", "log", "abc-1", "1h 30m", "--subtask", "Triaging", "--close", "-d", "notes",
        ])
        .unwrap();
        match cli.command {
            Command::Log { issue, time, target } => {
                assert_eq!(issue, "abc-1");
                assert_eq!(time, "1h 30m");
                assert_eq!(target.subtask.as_deref(), Some("Triaging"));
                assert!(target.close);
                assert_eq!(target.description.as_deref(), Some("notes"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn configure_updates_only_given_fields() {
        let dir = tempfile::TempDir::new().unwrap();
        let manager = ConfigManager::at(dir.path().join("config.json"));
        let mut config = Config::default();
        config.jira.username = "aaron".into();
        config.jira.set_password("secret");

        let cli = Cli::try_parse_from([
            "jtl", "configure", "--url", "https://jira.example.com", "--exclude", "Sub-task",
        ])
        .unwrap();
        let Command::Configure(args) = cli.command else {
            panic!("expected configure");
        };
        configure(&manager, config, args).unwrap();

        let saved = manager.load();
        assert_eq!(saved.jira.url_base, "https://jira.example.com");
        assert_eq!(saved.jira.username, "aaron");
        assert_eq!(saved.jira.sub_task_type_exclusions, vec!["Sub-task"]);
        assert!(saved.ready());
    }

    #[tokio::test]
    async fn confirm_accepts_only_yes() {
        let mut lines = BufReader::new(&b"Y\nno\n\n"[..]).lines();
        assert!(confirm(&mut lines, "Reset?").await.unwrap());
        assert!(!confirm(&mut lines, "Reset?").await.unwrap());
        assert!(!confirm(&mut lines, "Reset?").await.unwrap());
        // end of input counts as a no
        assert!(!confirm(&mut lines, "Reset?").await.unwrap());
    }

    #[test]
    fn configure_refuses_invalid_settings() {
        let dir = tempfile::TempDir::new().unwrap();
        let manager = ConfigManager::at(dir.path().join("config.json"));
        let cli = Cli::try_parse_from(["jtl", "configure", "--url", "jira.example.com"]).unwrap();
        let Command::Configure(args) = cli.command else {
            panic!("expected configure");
        };

        assert!(matches!(configure(&manager, Config::default(), args), Err(AppError::Config(_))));
        assert!(!manager.path().exists());
    }
}
