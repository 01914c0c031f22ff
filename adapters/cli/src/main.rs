#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the maze chase in a terminal.

mod app;
mod assets;

use std::{path::PathBuf, sync::mpsc};

use anyhow::{Context, Result};
use clap::Parser;
use maze_chase_rendering::{FrameControl, FrameInput, InputAction, Presentation, RenderingBackend};
use maze_chase_rendering_crossterm::CrosstermBackend;

use crate::app::App;

#[derive(Debug, Parser)]
#[command(name = "maze-chase", about = "Turn-based maze chase for the terminal")]
struct Args {
    /// Directory holding the JSON asset pack.
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
    /// Skip the start menu and jump straight into this maze.
    #[arg(long)]
    maze: Option<usize>,
    /// Draw into the regular screen buffer instead of the alternate one.
    #[arg(long)]
    no_alternate_screen: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let assets = assets::load(&args.assets)
        .with_context(|| format!("failed to load assets from {}", args.assets.display()))?;

    let mut app = App::new(assets);
    let mut scene = app.initial_scene();
    if let Some(maze) = args.maze {
        anyhow::ensure!(
            maze < app.maze_count(),
            "maze {maze} does not exist, the pack holds {}",
            app.maze_count()
        );
        let jump = FrameInput {
            action: Some(InputAction::SelectMaze { index: maze }),
        };
        if app.update(jump, &mut scene) == FrameControl::Exit {
            let _ = app
                .report()
                .context("the preselected maze failed to assemble")?;
            return Ok(());
        }
    }

    let presentation = Presentation::new(
        "maze-chase",
        app.palette().clone(),
        app.backdrop(),
        scene,
    );
    let backend = CrosstermBackend::new().with_alternate_screen(!args.no_alternate_screen);

    // The backend owns the update callback, so the closing report comes
    // back over a channel.
    let (report_sender, report_receiver) = mpsc::channel();
    backend.run(presentation, move |input, scene| {
        let control = app.update(input, scene);
        if control == FrameControl::Exit {
            let _ = report_sender.send(app.report());
        }
        control
    })?;

    if let Ok(report) = report_receiver.try_recv() {
        let summary = report.context("a maze failed to assemble")?;
        if summary.attempts > 0 {
            println!("{summary}");
        }
    }
    Ok(())
}
