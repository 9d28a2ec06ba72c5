//! Run the engine interactively.
//!
//! Reads one command per line from stdin:
//!   find          Find the cursor
//!   hide          Hide the highlight
//!   move X Y      Move the pointer (feeds shake detection)
//!   quit          Stop

use cursorhome_common::config::AppConfig;
use cursorhome_engine::{Engine, EngineHandle};
use cursorhome_model::Point;
use cursorhome_platform_core::VirtualPointer;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::displays::topology_from_args;
use crate::renderer::LoggingRenderer;

/// A parsed stdin line.
#[derive(Debug, PartialEq)]
enum Input {
    Find,
    Hide,
    Move(Point),
    Quit,
}

pub async fn run(config: AppConfig, displays: Vec<String>, no_warp: bool) -> anyhow::Result<()> {
    let topology = topology_from_args(&displays)?;
    let start = topology
        .primary()
        .map(|display| display.center())
        .unwrap_or_default();
    let pointer = if no_warp {
        VirtualPointer::without_warp(start)
    } else {
        VirtualPointer::new(start)
    };

    let engine = Engine::new(config, topology, LoggingRenderer::new(), pointer.clone());
    println!("CursorHome engine running (shake: {})", engine.shake_strategy());
    println!("Commands: find | hide | move X Y | quit. Press Ctrl+C to stop.");

    let (handle, commands) = EngineHandle::channel();

    let ctrl_c = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = ctrl_c.shutdown();
        }
    });

    let stdin = handle.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) | Err(_) => break,
            };
            let sent = match parse_input(&line) {
                Some(Input::Find) => stdin.find_cursor(),
                Some(Input::Hide) => stdin.hide_all(),
                Some(Input::Move(point)) => {
                    pointer.move_to(point);
                    stdin.pointer_moved(point)
                }
                Some(Input::Quit) => break,
                None => {
                    if !line.trim().is_empty() {
                        eprintln!("unrecognized command: {}", line.trim());
                    }
                    Ok(())
                }
            };
            if sent.is_err() {
                return;
            }
        }
        let _ = stdin.shutdown();
    });

    engine.run(commands).await?;
    println!("Stopped.");
    Ok(())
}

fn parse_input(line: &str) -> Option<Input> {
    let mut words = line.split_whitespace();
    let input = match words.next()? {
        "find" => Input::Find,
        "hide" => Input::Hide,
        "quit" | "exit" => Input::Quit,
        "move" => {
            let x = words.next()?.parse().ok()?;
            let y = words.next()?.parse().ok()?;
            Input::Move(Point::new(x, y))
        }
        _ => return None,
    };
    Some(input)
}
