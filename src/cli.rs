use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::application::dto::OutputFormat;
use crate::application::worklist::WorklistFilter;
use crate::audit::domain::Role;

/// Offline store file used when `--offline` is given without `--store`
pub const DEFAULT_STORE_FILE: &str = "audit-portal.store.json";

/// Import incident spreadsheets, audit corrections and build offender reports
#[derive(Parser, Debug)]
#[command(name = "audit-portal")]
#[command(version)]
#[command(about = "Quality-audit portal: import incident spreadsheets, audit corrections and build offender reports", long_about = None)]
pub struct Args {
    /// Path to the config file (defaults to ./audit-portal.config.yml when present)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show debug diagnostics on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Work against a local store file instead of the hosted backend
    #[arg(long, global = true)]
    pub offline: bool,

    /// Local store file (implies --offline)
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Output format: markdown or json
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Import a .csv/.xlsx/.xls/.ods spreadsheet, upserting incidents by ID_MOSTRA
    Import {
        /// Spreadsheet to import
        path: PathBuf,

        /// Incidents per upsert call
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Parse and preview without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Exit with status 1 when rows have a status other than NÃO ADERENTE
        #[arg(long)]
        strict: bool,
    },

    /// List the audit worklist (most recent non-compliant incidents)
    List {
        /// Audit status filter: all, pending or treated
        #[arg(long, default_value = "all")]
        status: WorklistFilter,

        /// Case-insensitive search on sample id or indicator
        #[arg(short, long)]
        search: Option<String>,

        /// How many incidents to load
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Save the audit of one incident and mark it treated
    Audit {
        /// Incident id (see `list`)
        id: String,

        /// Whether the incident was corrected: true or false
        #[arg(long, action = ArgAction::Set)]
        corrected: Option<bool>,

        /// Reason for the verdict
        #[arg(long, default_value = "")]
        reason: String,

        /// Login of the operator responsible
        #[arg(long)]
        offender: Option<String>,

        /// Evidence image to attach
        #[arg(long, value_name = "IMAGE")]
        evidence: Option<PathBuf>,
    },

    /// Show KPIs and chart data over all incidents
    Dashboard,

    /// Show the offender ranking and feedback KPIs
    Report,

    /// Mark feedback as sent for every treated incident of an offender
    Feedback {
        /// Offender login
        login: String,

        /// Clear the flag instead of setting it
        #[arg(long)]
        undo: bool,
    },

    /// Create an account (admin only)
    CreateUser {
        /// Login of the new account
        login: String,

        /// Initial password
        #[arg(long)]
        password: String,

        /// Role: analyst (default) or admin
        #[arg(long)]
        role: Option<Role>,
    },
}

impl Command {
    /// Whether the command writes to the store
    pub fn mutates(&self) -> bool {
        match self {
            Command::Import { dry_run, .. } => !dry_run,
            Command::Audit { .. } | Command::Feedback { .. } | Command::CreateUser { .. } => true,
            Command::List { .. } | Command::Dashboard | Command::Report => false,
        }
    }
}

impl Args {
    /// Offline when asked explicitly or when a store file is given
    pub fn store_path(&self) -> Option<PathBuf> {
        match (&self.store, self.offline) {
            (Some(path), _) => Some(path.clone()),
            (None, true) => Some(PathBuf::from(DEFAULT_STORE_FILE)),
            (None, false) => None,
        }
    }
}
