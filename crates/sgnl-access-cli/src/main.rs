// crates/sgnl-access-cli/src/main.rs
// ============================================================================
// Module: SGNL Access CLI Entry Point
// Description: Command dispatcher for access checks, searches, and diagnostics.
// Purpose: Drive the decision client and sudo adapter from a shell.
// Dependencies: clap, serde_json, sgnl-access-client, sgnl-access-host, thiserror
// ============================================================================

//! ## Overview
//! `sgnl-access` loads the same configuration a host plugin would, then runs
//! one operation: a sudo-style command check, a raw evaluation, an asset
//! search, a list request, a configuration check, or a version report.
//! Decisions are printed as JSON on stdout and folded into the exit status:
//! `0` accept, `1` reject, `2` error.
//!
//! Security posture: every failure to load configuration or reach a decision
//! exits with the error status; nothing here turns an error into an accept.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use serde_json::Value;
use sgnl_access_client::AccessDecision;
use sgnl_access_client::DecisionClient;
use sgnl_access_config::ConfigResolver;
use sgnl_access_core::AccessResult;
use sgnl_access_core::FileLogSink;
use sgnl_access_core::HostVerdict;
use sgnl_access_core::LogSink;
use sgnl_access_core::StderrLogSink;
use sgnl_access_host::HostContext;
use sgnl_access_host::PolicyPlugin;
use sgnl_access_host::SudoPolicyAdapter;
use sgnl_access_host::combined_result;
use sgnl_access_host::version_banner;
use thiserror::Error;

// ============================================================================
// SECTION: Exit Codes
// ============================================================================

/// Exit status for a rejected request.
const EXIT_REJECT: u8 = 1;
/// Exit status for any error outcome.
const EXIT_ERROR: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "sgnl-access", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Config file path (overrides `SGNL_CONFIG_PATH`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Append JSON log lines to this file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Check whether a user may run a command through sudo.
    Check(CheckCommand),
    /// Evaluate one or more assets for a principal.
    Evaluate(EvaluateCommand),
    /// Search for assets a principal may act on.
    Search(SearchCommand),
    /// List allowed commands, or check a single command.
    List(ListCommand),
    /// Validate the configuration.
    Validate,
    /// Print version information.
    Version(VersionCommand),
}

/// Host identity arguments shared by `check` and `list`.
#[derive(Args, Debug)]
struct UserArgs {
    /// User to check (takes precedence over `--user-info`).
    #[arg(long, value_name = "NAME")]
    user: Option<String>,
    /// Host user-info entry in `key=value` form (repeatable).
    #[arg(long = "user-info", value_name = "KEY=VALUE")]
    user_info: Vec<String>,
}

impl UserArgs {
    /// Builds the host context, placing `--user` ahead of user-info entries.
    fn context(&self) -> HostContext {
        let user = self.user.iter().map(|user| format!("user={user}"));
        HostContext::from_user_info(user.chain(self.user_info.iter().cloned()))
    }
}

/// Arguments for the `check` command.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Identity of the invoking user.
    #[command(flatten)]
    user: UserArgs,
    /// Program followed by its arguments.
    #[arg(
        value_name = "COMMAND",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    command: Vec<String>,
}

/// Arguments for the `evaluate` command.
#[derive(Args, Debug)]
struct EvaluateCommand {
    /// Principal identifier.
    #[arg(long, value_name = "ID")]
    principal: String,
    /// Asset identifier (repeat for a batch request).
    #[arg(long = "asset", value_name = "ID", required = true)]
    assets: Vec<String>,
    /// Action to evaluate (defaults to `execute`).
    #[arg(long, value_name = "ACTION", default_value = "")]
    action: String,
}

/// Arguments for the `search` command.
#[derive(Args, Debug)]
struct SearchCommand {
    /// Principal identifier.
    #[arg(long, value_name = "ID")]
    principal: String,
    /// Action to search for (defaults to `execute`).
    #[arg(long, value_name = "ACTION", default_value = "")]
    action: String,
    /// Pagination token from a previous page.
    #[arg(long = "page-token", value_name = "TOKEN")]
    page_token: Option<String>,
    /// Page size (0 selects the service default).
    #[arg(long = "page-size", value_name = "N", default_value_t = 0)]
    page_size: u32,
}

/// Arguments for the `list` command.
#[derive(Args, Debug)]
struct ListCommand {
    /// Identity of the invoking user.
    #[command(flatten)]
    user: UserArgs,
    /// Single command to check instead of listing everything.
    #[arg(value_name = "COMMAND")]
    command: Option<String>,
}

/// Arguments for the `version` command.
#[derive(Args, Debug)]
struct VersionCommand {
    /// Include connection details from the loaded configuration.
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error carrying a user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Session
// ============================================================================

/// Settings shared by every command.
struct Session {
    /// Explicit config path, when given.
    config_path: Option<PathBuf>,
    /// Destination for diagnostics.
    sink: Arc<dyn LogSink>,
}

impl Session {
    /// Builds a resolver honoring `--config`.
    fn resolver(&self) -> ConfigResolver {
        let resolver = ConfigResolver::new().with_sink(Arc::clone(&self.sink));
        match &self.config_path {
            Some(path) => resolver.with_path(path.clone()),
            None => resolver,
        }
    }

    /// Loads configuration and builds a decision client.
    fn client(&self) -> CliResult<DecisionClient> {
        let mut resolver = self.resolver();
        if !resolver.load() {
            return Err(load_error(resolver.path()));
        }
        Ok(DecisionClient::new(resolver.into_config()).with_sink(Arc::clone(&self.sink)))
    }

    /// Loads configuration and builds the sudo adapter.
    fn adapter(&self) -> CliResult<SudoPolicyAdapter> {
        let mut resolver = self.resolver();
        SudoPolicyAdapter::load(&mut resolver, Arc::clone(&self.sink))
            .map_err(|err| CliError::new(err.to_string()))
    }
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run(cli: Cli) -> CliResult<ExitCode> {
    let Cli {
        config,
        log_file,
        command,
    } = cli;
    let session = Session {
        config_path: config,
        sink: log_sink(log_file.as_deref())?,
    };
    match command {
        Commands::Check(command) => command_check(&session, &command),
        Commands::Evaluate(command) => command_evaluate(&session, &command),
        Commands::Search(command) => command_search(&session, &command),
        Commands::List(command) => command_list(&session, &command),
        Commands::Validate => command_validate(&session),
        Commands::Version(command) => command_version(&session, &command),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Runs a sudo-style command check.
fn command_check(session: &Session, command: &CheckCommand) -> CliResult<ExitCode> {
    let adapter = session.adapter()?;
    let check = adapter.check_policy(&command.command, &command.user.context());
    write_json(&serde_json::to_value(&check).map_err(json_error)?)?;
    Ok(verdict_exit(check.verdict))
}

/// Evaluates one asset, or several as a single batch.
fn command_evaluate(session: &Session, command: &EvaluateCommand) -> CliResult<ExitCode> {
    let client = session.client()?;
    let decisions: Vec<AccessDecision> = match command.assets.as_slice() {
        [asset] => vec![client.evaluate_access(&command.principal, asset, &command.action)],
        assets => {
            let queries: Vec<(&str, &str)> = assets
                .iter()
                .map(|asset| (asset.as_str(), command.action.as_str()))
                .collect();
            client.evaluate_access_batch(&command.principal, &queries)
        }
    };
    let verdict = HostVerdict::from_result(combined_result(&decisions));
    let output = match decisions.as_slice() {
        [decision] => serde_json::to_value(decision),
        _ => serde_json::to_value(&decisions),
    }
    .map_err(json_error)?;
    write_json(&output)?;
    Ok(verdict_exit(verdict))
}

/// Searches one page of permitted assets.
fn command_search(session: &Session, command: &SearchCommand) -> CliResult<ExitCode> {
    let client = session.client()?;
    let result = client.search_assets_detailed(
        &command.principal,
        &command.action,
        command.page_token.as_deref(),
        command.page_size,
    );
    write_json(&serde_json::to_value(&result).map_err(json_error)?)?;
    Ok(result_exit(result.result))
}

/// Lists allowed commands, or answers for one command.
fn command_list(session: &Session, command: &ListCommand) -> CliResult<ExitCode> {
    let adapter = session.adapter()?;
    for line in adapter.list(command.command.as_deref(), &command.user.context()) {
        write_stdout_line(&line)?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Reports whether the configuration can serve requests.
fn command_validate(session: &Session) -> CliResult<ExitCode> {
    let mut resolver = session.resolver();
    let result = if resolver.load() {
        DecisionClient::new(resolver.into_config()).validate()
    } else {
        AccessResult::ConfigError
    };
    write_stdout_line(&format!("{}: {}", result.as_str(), result.description()))?;
    Ok(result_exit(result))
}

/// Prints the version banner, with connection details when verbose.
fn command_version(session: &Session, command: &VersionCommand) -> CliResult<ExitCode> {
    if !command.verbose {
        write_stdout_line(&version_banner())?;
        return Ok(ExitCode::SUCCESS);
    }
    for line in session.adapter()?.version_lines(true) {
        write_stdout_line(&line)?;
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Opens the log sink selected by `--log-file`.
fn log_sink(path: Option<&Path>) -> CliResult<Arc<dyn LogSink>> {
    let Some(path) = path else {
        return Ok(Arc::new(StderrLogSink));
    };
    let sink = FileLogSink::new(path).map_err(|err| {
        CliError::new(format!("failed to open log file {}: {err}", path.display()))
    })?;
    Ok(Arc::new(sink))
}

/// Maps a host verdict to a process exit status.
const fn verdict_code(verdict: HostVerdict) -> u8 {
    match verdict {
        HostVerdict::Accept => 0,
        HostVerdict::Reject => EXIT_REJECT,
        HostVerdict::Error => EXIT_ERROR,
    }
}

/// Maps a host verdict to a process exit code.
fn verdict_exit(verdict: HostVerdict) -> ExitCode {
    ExitCode::from(verdict_code(verdict))
}

/// Maps a non-decision result to a process exit code.
fn result_exit(result: AccessResult) -> ExitCode {
    if result == AccessResult::Ok { ExitCode::SUCCESS } else { ExitCode::from(EXIT_ERROR) }
}

/// Formats a configuration load failure.
fn load_error(path: &Path) -> CliError {
    CliError::new(format!("failed to load configuration from {}", path.display()))
}

/// Formats a JSON rendering failure.
fn json_error(err: serde_json::Error) -> CliError {
    CliError::new(format!("failed to render JSON output: {err}"))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes pretty-printed JSON to stdout.
fn write_json(value: &Value) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value).map_err(json_error)?;
    write_stdout_line(&rendered)
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
        .map_err(|err| CliError::new(format!("failed to write to stdout: {err}")))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message to stderr and returns the error exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::from(EXIT_ERROR)
}
