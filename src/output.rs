use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Publishes step outputs the way GitHub Actions expects them.
pub struct ActionOutput {
    output_file: Option<PathBuf>,
}

impl ActionOutput {
    pub fn from_env() -> Self {
        Self::new(std::env::var_os("GITHUB_OUTPUT").map(PathBuf::from))
    }

    pub fn new(output_file: Option<PathBuf>) -> Self {
        Self { output_file }
    }

    /// Appends `key<<DELIM ... DELIM` to `$GITHUB_OUTPUT`, or prints the value
    /// when running outside Actions.
    pub fn set_output(&self, key: &str, value: &str) -> Result<()> {
        let Some(path) = &self.output_file else {
            println!("{}", value);
            return Ok(());
        };

        let record = output_record(key, value, &delimiter())?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        file.write_all(record.as_bytes())
            .context("Failed to write step output")?;

        Ok(())
    }

    pub fn set_failed(&self, message: &str) {
        println!("::error::{}", escape_command_data(message));
    }
}

pub fn write_notes_file(path: &Path, notes: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, notes)
        .with_context(|| format!("Failed to write release notes to {}", path.display()))
}

fn delimiter() -> String {
    format!("ghadelimiter_{}", Uuid::new_v4())
}

fn output_record(key: &str, value: &str, delimiter: &str) -> Result<String> {
    if key.contains(delimiter) {
        anyhow::bail!("Output name '{}' contains the delimiter", key);
    }
    if value.contains(delimiter) {
        anyhow::bail!("Output value for '{}' contains the delimiter", key);
    }
    Ok(format!("{key}<<{delimiter}\n{value}\n{delimiter}\n"))
}

// Workflow command data escaping.
fn escape_command_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_record_format() {
        let record = output_record("release_notes", "# Title\n\n## NA", "EOF_1").unwrap();
        assert_eq!(record, "release_notes<<EOF_1\n# Title\n\n## NA\nEOF_1\n");
    }

    #[test]
    fn test_output_record_rejects_delimiter_in_value() {
        assert!(output_record("release_notes", "a\nEOF_1\nb", "EOF_1").is_err());
    }

    #[test]
    fn test_set_output_appends_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("github_output");
        std::fs::write(&path, "previous=1\n").unwrap();

        let output = ActionOutput::new(Some(path.clone()));
        output.set_output("release_notes", "# Notes\n\nline").unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("previous=1\nrelease_notes<<ghadelimiter_"));
        assert!(written.contains("\n# Notes\n\nline\nghadelimiter_"));
        assert!(written.ends_with('\n'));
    }

    #[test]
    fn test_delimiters_are_unique() {
        let first = delimiter();
        let second = delimiter();
        assert!(first.starts_with("ghadelimiter_"));
        assert_eq!(first.len(), "ghadelimiter_".len() + 36);
        assert_ne!(first, second);
    }

    #[test]
    fn test_escape_command_data() {
        assert_eq!(
            escape_command_data("50% failed\r\nsecond line"),
            "50%25 failed%0D%0Asecond line"
        );
    }

    #[test]
    fn test_write_notes_file_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("RELEASE_NOTES.md");
        write_notes_file(&path, "# Notes\n\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Notes\n\n");
    }
}
