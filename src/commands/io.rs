//! Check, import and export command handlers.

use std::path::{Path, PathBuf};

use intake::config::IntakeConfig;
use intake::io::kinds::{ImportKind, MemberKind, RecordKind, TaskKind};
use intake::io::services::export::{export_format, export_records};
use intake::io::validation::format_error_list;
use intake::io::{Confirmation, Decision, ImportInput, ImportOptions, ImportService};
use intake::models::Collection;
use intake::{Error, Result};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};

/// How a partially valid import is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmMode {
    /// Ask on stdin.
    Ask,
    /// Answer yes without asking.
    Yes,
    /// Answer no without asking.
    No,
}

impl ConfirmMode {
    /// Builds the mode from the `--yes`/`--no` flags.
    pub const fn from_flags(yes: bool, no: bool) -> Self {
        match (yes, no) {
            (true, _) => Self::Yes,
            (false, true) => Self::No,
            (false, false) => Self::Ask,
        }
    }
}

/// Executes the check command: analyze and report, never merge.
pub async fn cmd_check(config: &IntakeConfig, kind: ImportKind, file: Option<PathBuf>) -> Result<()> {
    match kind {
        ImportKind::Members => check::<MemberKind>(config, file).await,
        ImportKind::Tasks => check::<TaskKind>(config, file).await,
    }
}

/// Executes the import command.
pub async fn cmd_import(
    config: &IntakeConfig,
    kind: ImportKind,
    file: Option<PathBuf>,
    into: PathBuf,
    confirm: ConfirmMode,
) -> Result<()> {
    match kind {
        ImportKind::Members => import::<MemberKind>(config, file, &into, confirm).await,
        ImportKind::Tasks => import::<TaskKind>(config, file, &into, confirm).await,
    }
}

/// Executes the export command.
pub fn cmd_export(kind: ImportKind, from: &Path, output: &Path) -> Result<()> {
    match kind {
        ImportKind::Members => export::<MemberKind>(from, output),
        ImportKind::Tasks => export::<TaskKind>(from, output),
    }
}

async fn check<K: RecordKind>(config: &IntakeConfig, file: Option<PathBuf>) -> Result<()> {
    let service = ImportService::new(ImportOptions::from(config));
    let outcome = service.analyze::<K>(read_input(file).await?)?;

    println!("{outcome} ({})", outcome.format());
    match outcome.decision() {
        Decision::Ready => {
            println!("All rows are valid.");
            Ok(())
        },
        Decision::NeedsConfirmation { .. } => {
            println!(
                "{}",
                format_error_list(outcome.errors(), config.error_display_limit)
            );
            Ok(())
        },
        Decision::Rejected => Err(Error::NoValidRecords {
            report: outcome.failure_report(config.error_display_limit),
        }),
    }
}

async fn import<K: RecordKind>(
    config: &IntakeConfig,
    file: Option<PathBuf>,
    into: &Path,
    confirm: ConfirmMode,
) -> Result<()> {
    let service = ImportService::new(ImportOptions::from(config));
    let mut collection = Collection::<K::Record>::load(into)?;
    let outcome = service.analyze::<K>(read_input(file).await?)?;

    let confirmation = match (outcome.decision(), confirm) {
        (Decision::NeedsConfirmation { .. }, ConfirmMode::Ask) => {
            ask(&outcome.confirmation_prompt(config.confirm_preview_limit)).await?
        },
        (_, ConfirmMode::No) => Confirmation::Declined,
        _ => Confirmation::Approved,
    };

    let summary = outcome.summary();
    match service.commit(outcome, &mut collection, confirmation) {
        Ok(_) => {
            collection.save(into)?;
            println!("{summary}");
            Ok(())
        },
        Err(e) if !e.is_fatal() => {
            println!("{e}. Nothing was changed.");
            Ok(())
        },
        Err(e) => Err(e),
    }
}

fn export<K: RecordKind>(from: &Path, output: &Path) -> Result<()> {
    let format = export_format(output)?;
    let collection = Collection::<K::Record>::load(from)?;

    let file = std::fs::File::create(output).map_err(|e| Error::OperationFailed {
        operation: "create_export_file".to_string(),
        cause: format!("{}: {e}", output.display()),
    })?;
    let written = export_records(
        collection.records(),
        format,
        std::io::BufWriter::new(file),
    )?;

    println!(
        "Exported {written} {}(s) to {}",
        K::NOUN,
        output.display()
    );
    Ok(())
}

/// Reads the payload from a file, or from stdin when no file is given.
async fn read_input(file: Option<PathBuf>) -> Result<ImportInput> {
    if let Some(path) = file {
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| Error::OperationFailed {
                operation: "read_import_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Ok(ImportInput::file(name, bytes));
    }

    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .map_err(|e| Error::OperationFailed {
            operation: "read_stdin".to_string(),
            cause: e.to_string(),
        })?;
    Ok(ImportInput::text(text))
}

/// Prints the prompt and reads a `y/N` answer from stdin.
///
/// End of input counts as no.
async fn ask(prompt: &str) -> Result<Confirmation> {
    println!("{prompt} [y/N]");

    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await
        .map_err(|e| Error::OperationFailed {
            operation: "read_confirmation".to_string(),
            cause: e.to_string(),
        })?;

    let approved = matches!(answer.trim().to_lowercase().as_str(), "y" | "yes");
    Ok(Confirmation::from(approved))
}
