use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{RedactionReport, Redactor};

/// Failures of the file-based redaction tool. Both are fatal: callers must
/// treat the outputs as untrustworthy.
#[derive(Debug, Error)]
pub enum RedactError {
    #[error("Could not read input file {}", .path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not write output file {}", .path.display())]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Sidecar path for a redacted output: the full output path plus `.meta`.
pub fn meta_path(output: &Path) -> PathBuf {
    let mut path: OsString = output.as_os_str().to_owned();
    path.push(".meta");
    PathBuf::from(path)
}

/// Redact `input` into `output` and write the count to `<output>.meta`.
///
/// The input is read completely before anything is written, so an unreadable
/// input leaves no output files behind.
pub fn redact_file(
    redactor: &Redactor,
    input: &Path,
    output: &Path,
) -> Result<RedactionReport, RedactError> {
    let content = fs::read_to_string(input).map_err(|source| RedactError::InputUnreadable {
        path: input.to_path_buf(),
        source,
    })?;

    let redaction = redactor.redact(&content);

    fs::write(output, &redaction.text).map_err(|source| RedactError::OutputUnwritable {
        path: output.to_path_buf(),
        source,
    })?;

    let meta = meta_path(output);
    fs::write(&meta, redaction.report.to_meta()).map_err(|source| {
        RedactError::OutputUnwritable {
            path: meta.clone(),
            source,
        }
    })?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        redactions = redaction.report.redaction_count,
        "Redacted plan"
    );

    Ok(redaction.report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_meta_path_appends_suffix() {
        assert_eq!(
            meta_path(Path::new("/tmp/plan.redacted.md")),
            PathBuf::from("/tmp/plan.redacted.md.meta")
        );
        assert_eq!(meta_path(Path::new("out")), PathBuf::from("out.meta"));
    }

    #[test]
    fn test_redact_file_writes_output_and_meta() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("plan.md");
        let output = dir.path().join("plan.redacted.md");
        fs::write(&input, "deploy with DB_API_KEY=hunter2\nthen Bearer abc\n").unwrap();

        let report = redact_file(&Redactor::new(), &input, &output).unwrap();

        assert_eq!(report.redaction_count, 2);
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "[REDACTED: API KEY LINE]\nthen Bearer [REDACTED]\n"
        );
        assert_eq!(
            fs::read_to_string(meta_path(&output)).unwrap(),
            "redaction_count=2\n"
        );
    }

    #[test]
    fn test_missing_input_writes_nothing() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("missing.md");
        let output = dir.path().join("out.md");

        let err = redact_file(&Redactor::new(), &input, &output).unwrap_err();

        assert!(matches!(err, RedactError::InputUnreadable { .. }));
        assert!(!output.exists());
        assert!(!meta_path(&output).exists());
    }

    #[test]
    fn test_unwritable_output_reported() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("plan.md");
        fs::write(&input, "nothing secret").unwrap();
        let output = dir.path().join("no-such-dir").join("out.md");

        let err = redact_file(&Redactor::new(), &input, &output).unwrap_err();

        match err {
            RedactError::OutputUnwritable { path, .. } => assert_eq!(path, output),
            other => panic!("unexpected error: {other}"),
        }
    }
}
