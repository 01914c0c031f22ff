#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure session system that steers menus, attempts, and bookkeeping.
//!
//! Adapters distill raw key events into [`SessionInput`] values and feed
//! them through [`Session::handle`], which answers with [`Directive`]
//! values describing what to do next. World events flow back in through
//! [`Session::observe`] so settled attempts flip the screen and file an
//! [`AttemptRecord`].

mod records;

pub use records::{summarize, AttemptRecord, SessionSummary};

use maze_chase_core::{AttemptStatus, Event, Step};
use maze_chase_world::query::PlayerSnapshot;

/// Screen the player is currently looking at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    /// Maze selection menu shown before any attempt.
    Start,
    /// A live attempt at the identified maze.
    Playing {
        /// Zero-based index of the maze being attempted.
        maze: usize,
    },
    /// Terminal menu shown after an attempt settles.
    Ended {
        /// Zero-based index of the maze that was attempted.
        maze: usize,
        /// How the attempt settled.
        status: AttemptStatus,
    },
}

/// Input distilled from raw key events by the presentation adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionInput {
    /// Attempt the identified maze from the start menu.
    SelectMaze {
        /// Zero-based maze index.
        index: usize,
    },
    /// Move the player one step.
    Move {
        /// Direction of the requested step.
        step: Step,
    },
    /// Replay the current maze from scratch.
    Restart,
    /// Advance from a won attempt to the next maze.
    Proceed,
    /// Leave the session.
    Quit,
}

/// Instructions the session hands back for the adapter to execute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive {
    /// Assemble a fresh world for the identified maze.
    BeginAttempt {
        /// Zero-based maze index.
        maze: usize,
    },
    /// Submit a player step to the live world.
    MovePlayer {
        /// Direction of the step.
        step: Step,
    },
    /// Tear the session down.
    Quit,
}

/// Session state machine spanning menus, live attempts, and records.
#[derive(Debug)]
pub struct Session {
    screen: Screen,
    maze_count: usize,
    records: Vec<AttemptRecord>,
}

impl Session {
    /// Creates a session over `maze_count` playable mazes.
    #[must_use]
    pub fn new(maze_count: usize) -> Self {
        Self {
            screen: Screen::Start,
            maze_count,
            records: Vec::new(),
        }
    }

    /// Screen currently shown to the player.
    #[must_use]
    pub const fn screen(&self) -> Screen {
        self.screen
    }

    /// Every settled attempt so far, in play order.
    #[must_use]
    pub fn records(&self) -> &[AttemptRecord] {
        &self.records
    }

    /// Totals across every settled attempt.
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        records::summarize(&self.records)
    }

    /// Translates one input into directives for the adapter to execute.
    ///
    /// Inputs that make no sense on the current screen are dropped, the
    /// same way an unknown key press is.
    pub fn handle(&mut self, input: SessionInput, out: &mut Vec<Directive>) {
        match (self.screen, input) {
            (_, SessionInput::Quit) => out.push(Directive::Quit),
            (Screen::Start, SessionInput::SelectMaze { index }) => {
                if index < self.maze_count {
                    self.screen = Screen::Playing { maze: index };
                    out.push(Directive::BeginAttempt { maze: index });
                }
            }
            (Screen::Playing { .. }, SessionInput::Move { step }) => {
                out.push(Directive::MovePlayer { step });
            }
            (Screen::Playing { maze }, SessionInput::Restart) => {
                out.push(Directive::BeginAttempt { maze });
            }
            (Screen::Ended { maze, .. }, SessionInput::Restart) => {
                self.screen = Screen::Playing { maze };
                out.push(Directive::BeginAttempt { maze });
            }
            (
                Screen::Ended {
                    maze,
                    status: AttemptStatus::Won,
                },
                SessionInput::Proceed,
            ) => {
                let next = maze + 1;
                if next < self.maze_count {
                    self.screen = Screen::Playing { maze: next };
                    out.push(Directive::BeginAttempt { maze: next });
                } else {
                    out.push(Directive::Quit);
                }
            }
            _ => {}
        }
    }

    /// Consumes the events one command produced, filing a record and
    /// switching to the end screen when the attempt settled.
    pub fn observe(&mut self, events: &[Event], player: PlayerSnapshot) {
        let Screen::Playing { maze } = self.screen else {
            return;
        };
        for event in events {
            if let Event::AttemptEnded { status } = event {
                self.records.push(AttemptRecord {
                    maze,
                    status: *status,
                    steps: player.steps,
                    score: player.score,
                });
                self.screen = Screen::Ended {
                    maze,
                    status: *status,
                };
            }
        }
    }
}
