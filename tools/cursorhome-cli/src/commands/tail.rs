//! Follow the remote log and print transitions as they arrive.

use std::path::PathBuf;
use std::time::Instant;

use chrono::Local;
use cursorhome_common::config::AppConfig;
use cursorhome_remote_monitor::{candidate_paths, parse_batch, LogTailer, LogWatcher, TailerState};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

pub async fn run(config: AppConfig, path: Option<PathBuf>) -> anyhow::Result<()> {
    let candidates = match path {
        Some(path) => vec![path],
        None => candidate_paths(&config.remote),
    };
    if candidates.is_empty() {
        anyhow::bail!("no log locations configured");
    }

    let mut tailer = LogTailer::from_settings(&config.remote);
    match tailer.start(candidates.clone(), Instant::now()) {
        Some(found) => println!("Following {}", found.display()),
        None => {
            println!("No log found yet, watching:");
            for candidate in &candidates {
                println!("  {}", candidate.display());
            }
        }
    }

    let mut watch = match LogWatcher::watch(&candidates) {
        Ok(watch) => Some(watch),
        Err(e) => {
            tracing::warn!(error = %e, "File watching unavailable, polling only");
            None
        }
    };
    let mut rediscovery = tokio::time::interval(config.remote.rediscovery_interval());
    rediscovery.set_missed_tick_behavior(MissedTickBehavior::Delay);

    println!("Press Ctrl+C to stop.");
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut following = tailer.path().map(PathBuf::from);
    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                result?;
                break;
            }
            Some(()) = next_wake(&mut watch) => {}
            _ = rediscovery.tick() => {}
        }

        let lines = tailer.poll(Instant::now());

        let current = tailer.path().map(PathBuf::from);
        if current != following {
            match (&current, tailer.state()) {
                (Some(path), _) => println!("Following {}", path.display()),
                (None, TailerState::Searching) => println!("Log went away, searching..."),
                (None, _) => {}
            }
            following = current;
        }

        for transition in parse_batch(&lines, Instant::now()) {
            println!(
                "{}  {:<8} {}",
                Local::now().format("%H:%M:%S%.3f"),
                transition.kind.to_string(),
                transition.remote_name
            );
        }
    }

    tailer.stop();
    println!("Stopped.");
    Ok(())
}

async fn next_wake(watch: &mut Option<(LogWatcher, mpsc::UnboundedReceiver<()>)>) -> Option<()> {
    match watch {
        Some((_, rx)) => rx.recv().await,
        None => std::future::pending().await,
    }
}
