//! Where mouse-sharing tools keep their logs.

use std::path::PathBuf;

use cursorhome_common::config::RemoteLogSettings;

/// Well-known Synergy log locations, most specific first.
pub fn default_candidate_paths() -> Vec<PathBuf> {
    let home = dirs::home_dir();
    let data = dirs::data_local_dir();

    [
        // Flatpak (Synergy 3)
        home.as_ref()
            .map(|d| d.join(".var/app/com.symless.synergy/.local/state/Synergy/synergy.log")),
        data.as_ref().map(|d| d.join("synergy/synergy.log")),
        data.as_ref().map(|d| d.join("Synergy/synergy.log")),
        home.as_ref().map(|d| d.join(".synergy/synergy.log")),
        home.as_ref().map(|d| d.join(".local/share/synergy/synergy.log")),
        home.as_ref().map(|d| d.join(".local/state/Synergy/synergy.log")),
        Some(PathBuf::from("/var/log/synergy.log")),
        // Snap
        home.as_ref().map(|d| d.join("snap/synergy/current/.synergy/synergy.log")),
    ]
    .into_iter()
    .flatten()
    .fold(Vec::new(), |mut acc, path| {
        if !acc.contains(&path) {
            acc.push(path);
        }
        acc
    })
}

/// Candidates for the configured settings: user paths first, then the
/// well-known ones when enabled. Duplicates keep their first position.
pub fn candidate_paths(settings: &RemoteLogSettings) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = Vec::new();
    let defaults = if settings.include_default_paths {
        default_candidate_paths()
    } else {
        Vec::new()
    };

    for path in settings.log_paths.iter().cloned().chain(defaults) {
        if !paths.contains(&path) {
            paths.push(path);
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_paths_come_first() {
        let settings = RemoteLogSettings {
            log_paths: vec![PathBuf::from("/tmp/custom.log")],
            ..RemoteLogSettings::default()
        };
        let paths = candidate_paths(&settings);
        assert_eq!(paths[0], PathBuf::from("/tmp/custom.log"));
        assert!(paths.contains(&PathBuf::from("/var/log/synergy.log")));
    }

    #[test]
    fn test_defaults_can_be_excluded() {
        let settings = RemoteLogSettings {
            log_paths: vec![PathBuf::from("/a.log"), PathBuf::from("/a.log")],
            include_default_paths: false,
            ..RemoteLogSettings::default()
        };
        assert_eq!(candidate_paths(&settings), vec![PathBuf::from("/a.log")]);
    }

    #[test]
    fn test_defaults_are_unique() {
        let paths = default_candidate_paths();
        for (i, path) in paths.iter().enumerate() {
            assert!(!paths[i + 1..].contains(path));
        }
    }
}
