//! File sinks for generated artifacts.
//!
//! Structured artifacts (voice-of-customer analysis, FAQ) go to CSV, text
//! artifacts and the session report to Word-compatible `.doc` files. All
//! writes are synchronous.

mod csv;
mod doc;

use std::path::{Path, PathBuf};

pub use csv::to_csv;
pub use doc::{artifact_html, session_report_html, wrap_word, WORD_FOOTER, WORD_HEADER};

use crate::ai::Record;
use crate::wizard::{ArtifactRef, Session, StepId};

/// Export error types.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Step {0} has nothing to export")]
    NothingToExport(StepId),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Write records as CSV to `dir/filename`.
pub fn write_csv<R: Record>(
    dir: &Path,
    filename: &str,
    records: &[R],
) -> Result<PathBuf, ExportError> {
    write_file(dir, filename, &to_csv(records))
}

/// Wrap `fragment` as a Word document and write it to `dir/filename`.
///
/// A `.doc` suffix is appended when `filename` lacks one.
pub fn write_doc(dir: &Path, filename: &str, fragment: &str) -> Result<PathBuf, ExportError> {
    let filename = if filename.ends_with(".doc") {
        filename.to_string()
    } else {
        format!("{filename}.doc")
    };
    write_file(dir, &filename, &wrap_word(fragment))
}

/// Export the artifact of one step.
///
/// Record lists become CSV, text becomes a Word document.
pub fn export_step(
    session: &Session,
    step: StepId,
    dir: &Path,
    stamp: &str,
) -> Result<PathBuf, ExportError> {
    let artifact = session
        .artifact(step)
        .filter(|a| !a.is_empty())
        .ok_or(ExportError::NothingToExport(step))?;

    let base = format!("front-{}-{}", step.key(), stamp);
    match artifact {
        ArtifactRef::Text(_) => write_doc(dir, &base, &artifact_html(artifact)),
        ArtifactRef::Voc(items) => write_csv(dir, &format!("{base}.csv"), items),
        ArtifactRef::Faq(items) => write_csv(dir, &format!("{base}.csv"), items),
    }
}

/// Export every stored artifact plus a full session report.
pub fn export_session(session: &Session, dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
    let stamp = timestamp();
    let mut written = Vec::new();

    for step in StepId::ALL {
        if session.has_artifact(step) {
            written.push(export_step(session, step, dir, &stamp)?);
        }
    }
    written.push(write_doc(dir, &format!("front-report-{stamp}"), &session_report_html(session))?);

    tracing::info!(count = written.len(), dir = %dir.display(), "Session exported");
    Ok(written)
}

/// Timestamp used in export filenames.
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y%m%d-%H%M%S").to_string()
}

fn write_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf, ExportError> {
    let io_err = |source| ExportError::Io { path: dir.to_path_buf(), source };
    std::fs::create_dir_all(dir).map_err(io_err)?;

    let path = dir.join(filename);
    std::fs::write(&path, content)
        .map_err(|source| ExportError::Io { path: path.clone(), source })?;

    tracing::debug!(path = %path.display(), "Wrote export");
    Ok(path)
}
