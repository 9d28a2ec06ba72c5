//! Application configuration.
//!
//! Every section deserializes with defaults for missing fields so older or
//! hand-written config files keep working. Values are clamped into their
//! valid ranges by [`AppConfig::sanitized`]; an out-of-range value is never
//! an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use cursorhome_model::{AnimationSpec, CursorStyle};
use serde::{Deserialize, Serialize};

use crate::error::{CursorHomeError, CursorHomeResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Highlight appearance and coordination policy.
    pub highlight: HighlightSettings,

    /// Shake-to-find gesture detection.
    pub shake: ShakeSettings,

    /// Remote transition log monitoring.
    pub remote: RemoteLogSettings,

    /// Tracking loop cadence.
    pub tracking: TrackingSettings,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// What a find request does while the cursor is on a remote machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RemoteFallback {
    /// Pull the cursor back to the primary display's center and highlight it there.
    #[default]
    RecenterOnPrimary,
    /// Do nothing.
    Ignore,
}

/// How shakes are detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShakeStrategy {
    /// Geometric analysis of recent pointer samples.
    #[default]
    Heuristic,
    /// Rising edge of a platform-provided "pointer is shaking" signal.
    Native,
}

/// Highlight appearance and coordination policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightSettings {
    /// Master switch for the whole engine.
    pub enabled: bool,

    /// How long a highlight stays visible (seconds).
    pub duration_secs: f64,

    /// Shape descriptor handed to the renderer.
    pub style: CursorStyle,

    /// Animation played while visible.
    pub animation: AnimationSpec,

    /// Behavior of a find request while the cursor is remote.
    pub remote_fallback: RemoteFallback,

    /// Highlight automatically when the cursor returns from a remote machine.
    pub find_on_return: bool,
}

/// Shake-to-find gesture detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeSettings {
    /// Whether a shake triggers a find.
    pub enabled: bool,

    /// Detection sensitivity from 0.0 (least) to 1.0 (most).
    pub sensitivity: f64,

    /// Detection strategy.
    pub strategy: ShakeStrategy,

    /// Length of the sliding sample window (ms).
    pub window_ms: u64,

    /// Horizontal direction reversals needed within the window.
    pub min_direction_changes: usize,

    /// Single-step distance treated as a synthetic warp (px).
    pub jump_threshold_px: f64,

    /// Distance from a display edge treated as a seam crossing (px).
    pub edge_margin_px: f64,

    /// Suppression period after a warp or edge contact (ms).
    pub cooldown_ms: u64,
}

/// Remote transition log monitoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteLogSettings {
    /// Whether to follow the sharing tool's log at all.
    pub enabled: bool,

    /// Extra log locations, tried before the well-known ones.
    pub log_paths: Vec<PathBuf>,

    /// Also try the well-known per-platform locations.
    pub include_default_paths: bool,

    /// How long the log may stay idle before rediscovery (seconds).
    pub rediscovery_interval_secs: u64,
}

/// Tracking loop cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingSettings {
    /// Rate of the session tracking timer (Hz).
    pub tick_hz: u32,

    /// Sample the pointer on every tick instead of waiting for pushed motion.
    pub poll_pointer: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "cursorhome=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_secs: 5.0,
            style: CursorStyle::default(),
            animation: AnimationSpec::default(),
            remote_fallback: RemoteFallback::default(),
            find_on_return: true,
        }
    }
}

impl Default for ShakeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            sensitivity: 0.5,
            strategy: ShakeStrategy::default(),
            window_ms: 400,
            min_direction_changes: 4,
            jump_threshold_px: 200.0,
            edge_margin_px: 50.0,
            cooldown_ms: 500,
        }
    }
}

impl Default for RemoteLogSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            log_paths: Vec::new(),
            include_default_paths: true,
            rediscovery_interval_secs: 10,
        }
    }
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            tick_hz: 60,
            poll_pointer: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl HighlightSettings {
    pub fn duration(&self) -> Duration {
        secs_to_duration(self.duration_secs)
    }
}

impl ShakeSettings {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

impl RemoteLogSettings {
    pub fn rediscovery_interval(&self) -> Duration {
        Duration::from_secs(self.rediscovery_interval_secs)
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from `path`, falling back to defaults on any problem.
    pub fn load_from(path: &Path) -> Self {
        let (config, problem) = Self::read_from(path);
        if let Some(problem) = problem {
            tracing::warn!(error = %problem, "Using default config");
        }
        config.sanitized()
    }

    /// Read config from `path` without clamping or logging.
    ///
    /// A missing file is not a problem. An unreadable or malformed one
    /// yields the defaults together with the error, so a caller that has
    /// not installed logging yet can report it later.
    pub fn read_from(path: &Path) -> (Self, Option<CursorHomeError>) {
        if !path.exists() {
            return (Self::default(), None);
        }
        let problem = match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
                Ok(config) => return (config, None),
                Err(e) => CursorHomeError::config(format!(
                    "failed to parse {}: {e}",
                    path.display()
                )),
            },
            Err(e) => CursorHomeError::config(format!("failed to read {}: {e}", path.display())),
        };
        (Self::default(), Some(problem))
    }

    /// Save config to the standard location.
    pub fn save(&self) -> CursorHomeResult<()> {
        self.save_to(&config_file_path())
    }

    /// Save config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> CursorHomeResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Clamp every value into its valid range.
    pub fn sanitized(mut self) -> Self {
        let shake = &mut self.shake;
        let sensitivity = if shake.sensitivity.is_finite() {
            shake.sensitivity.clamp(0.0, 1.0)
        } else {
            ShakeSettings::default().sensitivity
        };
        if sensitivity != shake.sensitivity {
            tracing::warn!(
                configured = shake.sensitivity,
                applied = sensitivity,
                "Shake sensitivity out of range, clamped"
            );
            shake.sensitivity = sensitivity;
        }
        shake.window_ms = shake.window_ms.clamp(50, 5_000);
        shake.min_direction_changes = shake.min_direction_changes.max(1);
        shake.jump_threshold_px = finite_or(shake.jump_threshold_px, 200.0).max(1.0);
        shake.edge_margin_px = finite_or(shake.edge_margin_px, 50.0).max(0.0);
        shake.cooldown_ms = shake.cooldown_ms.min(10_000);

        let highlight = &mut self.highlight;
        let duration = finite_or(highlight.duration_secs, 5.0).clamp(0.1, 600.0);
        if duration != highlight.duration_secs {
            tracing::warn!(
                configured = highlight.duration_secs,
                applied = duration,
                "Highlight duration out of range, clamped"
            );
            highlight.duration_secs = duration;
        }
        highlight.animation.cycle_secs = finite_or(highlight.animation.cycle_secs, 0.8).max(0.0);
        highlight.style.size = finite_or(highlight.style.size, 60.0).max(1.0);

        self.tracking.tick_hz = self.tracking.tick_hz.clamp(1, 240);
        self.remote.rediscovery_interval_secs = self.remote.rediscovery_interval_secs.max(1);

        self
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("cursorhome").join("config.json")
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

fn secs_to_duration(secs: f64) -> Duration {
    Duration::from_secs_f64(finite_or(secs, 0.0).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.highlight.duration(), Duration::from_secs(5));
        assert_eq!(config.shake.window(), Duration::from_millis(400));
        assert_eq!(config.shake.cooldown(), Duration::from_millis(500));
        assert_eq!(config.shake.jump_threshold_px, 200.0);
        assert_eq!(config.shake.edge_margin_px, 50.0);
        assert_eq!(config.remote.rediscovery_interval(), Duration::from_secs(10));
        assert_eq!(config.tracking.tick_hz, 60);
    }

    #[test]
    fn test_sanitized_clamps_sensitivity() {
        let mut config = AppConfig::default();
        config.shake.sensitivity = 3.0;
        assert_eq!(config.clone().sanitized().shake.sensitivity, 1.0);

        config.shake.sensitivity = -0.5;
        assert_eq!(config.clone().sanitized().shake.sensitivity, 0.0);

        config.shake.sensitivity = f64::NAN;
        assert_eq!(config.sanitized().shake.sensitivity, 0.5);
    }

    #[test]
    fn test_sanitized_clamps_durations() {
        let mut config = AppConfig::default();
        config.highlight.duration_secs = -1.0;
        config.tracking.tick_hz = 0;
        let config = config.sanitized();
        assert_eq!(config.highlight.duration_secs, 0.1);
        assert_eq!(config.tracking.tick_hz, 1);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"shake":{"sensitivity":0.8},"highlight":{"find_on_return":false}}"#)
                .unwrap();
        assert_eq!(config.shake.sensitivity, 0.8);
        assert_eq!(config.shake.window_ms, 400);
        assert!(!config.highlight.find_on_return);
        assert!(config.highlight.enabled);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.highlight.remote_fallback = RemoteFallback::Ignore;
        config.remote.log_paths = vec![PathBuf::from("/tmp/synergy.log")];
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_garbage_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
    }

    #[test]
    fn test_read_reports_problem_without_logging() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let (config, problem) = AppConfig::read_from(&path);
        assert_eq!(config, AppConfig::default());
        assert!(problem.is_none());

        std::fs::write(&path, "{\"shake\": ").unwrap();
        let (config, problem) = AppConfig::read_from(&path);
        assert_eq!(config, AppConfig::default());
        let problem = problem.unwrap();
        assert!(matches!(problem, CursorHomeError::Config { .. }));
        assert!(problem.to_string().contains("failed to parse"));
    }

    #[test]
    fn test_read_leaves_clamping_to_caller() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"shake": {"sensitivity": 3.0}}"#).unwrap();

        let (config, problem) = AppConfig::read_from(&path);
        assert!(problem.is_none());
        assert_eq!(config.shake.sensitivity, 3.0);
        assert_eq!(config.sanitized().shake.sensitivity, 1.0);
    }
}
