use audit_portal::adapters::outbound::console::StderrProgressReporter;
use audit_portal::adapters::outbound::filesystem::{
    read_evidence_file, LocalStore, SpreadsheetFileReader, TomlCollaboratorDirectory,
};
use audit_portal::adapters::outbound::network::{
    AuthProfileRepository, BackendClient, BackendSettings, FunctionAccountProvisioner,
    RestIncidentRepository, StorageEvidenceStore, DEFAULT_EVIDENCE_BUCKET,
    DEFAULT_INCIDENTS_TABLE,
};
use audit_portal::application::dto::{AccountRequest, AuditRequest, ImportRequest, OutputFormat};
use audit_portal::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use audit_portal::application::use_cases::{
    AuditIncidentUseCase, BuildDashboardUseCase, BuildOffenderReportUseCase,
    ImportIncidentsUseCase, ListIncidentsUseCase, MarkFeedbackSentUseCase,
    ProvisionAccountUseCase,
};
use audit_portal::cli::{Args, Command};
use audit_portal::config::{resolve_config, ConfigFile, EnvOverrides, ENV_BACKEND_URL};
use audit_portal::ports::outbound::{
    AccountProvisioner, EvidenceStore, IncidentRepository, ProfileRepository, ProgressReporter,
};
use audit_portal::shared::error::AuditError;
use audit_portal::shared::Result;
use clap::Parser;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit status when `import --strict` finished with status warnings
const EXIT_WARNINGS: u8 = 1;
/// Exit status for invalid command-line arguments
const EXIT_USAGE: u8 = 2;
/// Exit status for any other failure
const EXIT_FAILURE: u8 = 3;

/// How a successful command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Clean,
    Warnings,
}

/// Adapters behind the ports, remote or local
struct Backend<IR, ES, PRF, AP> {
    incidents: IR,
    evidence: ES,
    profiles: PRF,
    provisioner: AP,
}

/// Settings shared by every command
struct RunContext {
    config: ConfigFile,
    format: OutputFormat,
    output: Option<PathBuf>,
    collaborators: TomlCollaboratorDirectory,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                // --help / --version
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(args.verbose);

    match run(args).await {
        Ok(Outcome::Clean) => ExitCode::SUCCESS,
        Ok(Outcome::Warnings) => ExitCode::from(EXIT_WARNINGS),
        Err(e) => {
            print_error(&e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn print_error(e: &anyhow::Error) {
    eprintln!("\n{}\n", "❌ An error occurred:".red().bold());
    eprintln!("{}", e);

    // Display error chain
    for cause in e.chain().skip(1) {
        eprintln!("\n{} {}", "Caused by:".yellow(), cause);
    }

    eprintln!();
}

async fn run(args: Args) -> Result<Outcome> {
    let cwd = std::env::current_dir()?;
    let config = resolve_config(args.config.as_deref(), &cwd, EnvOverrides::from_env())?;

    let format = match args.format {
        Some(format) => format,
        None => config.output_format()?.unwrap_or_default(),
    };
    let collaborators = match &config.collaborators_file {
        Some(path) => TomlCollaboratorDirectory::load(path)?,
        None => TomlCollaboratorDirectory::empty(),
    };

    let store_path = args.store_path();
    let command = args.command;
    let context = RunContext {
        config,
        format,
        output: args.output,
        collaborators,
    };

    match store_path {
        Some(path) => {
            tracing::debug!(store = %path.display(), "running offline");
            let store = LocalStore::open(&path)?;
            let backend = Backend {
                incidents: store.incidents(),
                evidence: store.evidence(),
                profiles: store.accounts(),
                provisioner: store.accounts(),
            };

            let mutates = command.mutates();
            let outcome = dispatch(command, backend, &context).await?;
            if mutates {
                store.save()?;
            }
            Ok(outcome)
        }
        None => {
            let client = BackendClient::new(backend_settings(&context.config)?)?;
            let table = context
                .config
                .incidents_table
                .clone()
                .unwrap_or_else(|| DEFAULT_INCIDENTS_TABLE.to_string());
            let bucket = context
                .config
                .evidence_bucket
                .clone()
                .unwrap_or_else(|| DEFAULT_EVIDENCE_BUCKET.to_string());

            let backend = Backend {
                incidents: RestIncidentRepository::new(client.clone(), table),
                evidence: StorageEvidenceStore::new(client.clone(), bucket),
                profiles: AuthProfileRepository::new(client.clone()),
                provisioner: FunctionAccountProvisioner::new(client),
            };
            dispatch(command, backend, &context).await
        }
    }
}

fn backend_settings(config: &ConfigFile) -> Result<BackendSettings> {
    let missing = |key: &str| AuditError::Validation {
        message: format!(
            "No {} configured.\n\n💡 Hint: Set it in the config file or the environment, or run with --offline to use a local store",
            key
        ),
    };

    Ok(BackendSettings {
        base_url: config
            .backend_url
            .clone()
            .ok_or_else(|| missing(&format!("backend_url ({})", ENV_BACKEND_URL)))?,
        api_key: config.api_key.clone().ok_or_else(|| missing("api_key"))?,
        access_token: config.access_token.clone(),
    })
}

async fn dispatch<IR, ES, PRF, AP>(
    command: Command,
    backend: Backend<IR, ES, PRF, AP>,
    context: &RunContext,
) -> Result<Outcome>
where
    IR: IncidentRepository,
    ES: EvidenceStore,
    PRF: ProfileRepository,
    AP: AccountProvisioner,
{
    let reporter = StderrProgressReporter::new();
    let formatter = FormatterFactory::create(context.format);

    let rendered = match command {
        Command::Import {
            path,
            chunk_size,
            dry_run,
            strict,
        } => {
            let request = ImportRequest::new(path)
                .with_chunk_size(chunk_size.unwrap_or_else(|| context.config.chunk_size()))
                .with_dry_run(dry_run);
            let use_case =
                ImportIncidentsUseCase::new(SpreadsheetFileReader::new(), backend.incidents, reporter);
            let response = use_case.execute(request).await?;

            present(context, &formatter.format_import_summary(&response)?)?;
            return Ok(if strict && response.has_warnings() {
                Outcome::Warnings
            } else {
                Outcome::Clean
            });
        }
        Command::List {
            status,
            search,
            limit,
        } => {
            let limit = limit.unwrap_or_else(|| context.config.worklist_limit());
            let view = ListIncidentsUseCase::new(backend.incidents, limit)
                .execute(status, search)
                .await?;
            formatter.format_worklist(&view)?
        }
        Command::Audit {
            id,
            corrected,
            reason,
            offender,
            evidence,
        } => {
            let mut request = AuditRequest::new(id, corrected, reason);
            if let Some(login) = offender {
                request = request.with_offender(login);
            }
            if let Some(path) = evidence {
                request = request.with_evidence(read_evidence_file(&path)?);
            }

            let use_case = AuditIncidentUseCase::new(
                backend.incidents,
                backend.evidence,
                backend.profiles,
                reporter,
            );
            use_case.execute(request).await?;
            return Ok(Outcome::Clean);
        }
        Command::Dashboard => {
            let offset = context.config.utc_offset()?;
            let model = BuildDashboardUseCase::new(backend.incidents, offset)
                .execute()
                .await?;
            reporter.report(FormatterFactory::progress_message(context.format));
            formatter.format_dashboard(&model)?
        }
        Command::Report => {
            let report =
                BuildOffenderReportUseCase::new(backend.incidents, context.collaborators.clone())
                    .execute()
                    .await?;
            reporter.report(FormatterFactory::progress_message(context.format));
            formatter.format_offender_report(&report)?
        }
        Command::Feedback { login, undo } => {
            MarkFeedbackSentUseCase::new(backend.incidents, reporter)
                .execute(&login, !undo)
                .await?;
            return Ok(Outcome::Clean);
        }
        Command::CreateUser {
            login,
            password,
            role,
        } => {
            let message = ProvisionAccountUseCase::new(backend.profiles, backend.provisioner)
                .execute(AccountRequest::new(login, password, role))
                .await?;
            reporter.report_completion(&format!("✅ {}", message));
            return Ok(Outcome::Clean);
        }
    };

    present(context, &rendered)?;
    Ok(Outcome::Clean)
}

fn present(context: &RunContext, content: &str) -> Result<()> {
    let presenter = PresenterFactory::create(PresenterType::from_output(context.output.clone()));
    presenter.present(content)
}
