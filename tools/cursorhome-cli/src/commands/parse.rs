//! Show the transitions found in a log file.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use cursorhome_model::CursorTransition;
use cursorhome_remote_monitor::parse_at;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let found = scan_file(&path)?;
    println!("{}: {} transitions", path.display(), found.len());
    for (line_number, transition) in &found {
        println!(
            "  line {:>5}  {:<8} {}",
            line_number,
            transition.kind.to_string(),
            transition.remote_name
        );
    }
    Ok(())
}

/// Every transition in the file with its 1-based line number.
pub fn scan_file(path: &Path) -> anyhow::Result<Vec<(usize, CursorTransition)>> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    // Sharing tools occasionally log raw bytes; keep going past them.
    let text = String::from_utf8_lossy(&bytes);
    let now = Instant::now();
    Ok(text
        .lines()
        .enumerate()
        .filter_map(|(index, line)| parse_at(line, now).map(|t| (index + 1, t)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cursorhome_model::TransitionKind;

    #[test]
    fn test_scan_fixture() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/synergy.log");
        let found = scan_file(&path).unwrap();

        assert_eq!(found.len(), 7);
        let (line, first) = &found[0];
        assert_eq!(*line, 5);
        assert_eq!(first.kind, TransitionKind::Left);
        assert_eq!(first.remote_name, "linux-desktop");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(scan_file(Path::new("/nonexistent/synergy.log")).is_err());
    }
}
