//! Show the configuration and environment the engine would use.

use std::path::Path;

use cursorhome_common::config::{AppConfig, ShakeStrategy};
use cursorhome_remote_monitor::candidate_paths;

use crate::displays::topology_from_args;

pub fn run(config: &AppConfig, config_path: &Path, displays: Vec<String>) -> anyhow::Result<()> {
    println!("CursorHome Check");
    println!("{}", "=".repeat(50));

    if config_path.exists() {
        println!("[OK] Config: {}", config_path.display());
    } else {
        println!("[--] Config: {} (not found, using defaults)", config_path.display());
    }

    println!();
    println!("Highlight:");
    println!(
        "     {} for {:.1}s, fallback when remote: {:?}",
        if config.highlight.enabled { "enabled" } else { "disabled" },
        config.highlight.duration_secs,
        config.highlight.remote_fallback
    );

    println!();
    let strategy = match config.shake.strategy {
        ShakeStrategy::Heuristic => "heuristic",
        // No platform signal is wired into the CLI.
        ShakeStrategy::Native => "native (unavailable here, heuristic will be used)",
    };
    println!("Shake detection: {}", if config.shake.enabled { strategy } else { "disabled" });
    println!(
        "     sensitivity {:.2}, window {} ms, {} direction changes",
        config.shake.sensitivity, config.shake.window_ms, config.shake.min_direction_changes
    );

    println!();
    if config.remote.enabled {
        let candidates = candidate_paths(&config.remote);
        println!("Remote log candidates ({}):", candidates.len());
        for path in &candidates {
            let mark = if path.is_file() { "[OK]" } else { "[--]" };
            println!("{mark} {}", path.display());
        }
        if !candidates.iter().any(|path| path.is_file()) {
            println!("     No log found yet; the engine will keep looking.");
        }
    } else {
        println!("Remote log monitoring: disabled");
    }

    println!();
    let topology = topology_from_args(&displays)?;
    println!("[OK] Displays: {}", topology.displays().len());
    for display in topology.displays() {
        let b = display.bounds;
        println!(
            "     {} {}x{}+{}+{} {}",
            display.name,
            b.width,
            b.height,
            b.x,
            b.y,
            if display.primary { "(primary)" } else { "" }
        );
    }

    Ok(())
}
