#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Crossterm-backed terminal renderer for maze-chase.
//!
//! The backend enables raw mode and, by default, the alternate screen. It
//! blocks on key input and repaints the active scene after every callback
//! return. Terminal state is restored before `run` returns, including on
//! error paths, so a failed draw never leaves the shell in raw mode.

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    queue,
    style::{Color as CrosstermColor, Colors, Print, SetColors},
    terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use maze_chase_core::Step;
use maze_chase_rendering::{
    BoardView, Color, FrameControl, FrameInput, InputAction, MenuView, Palette, Presentation,
    RenderingBackend, Scene, TextLine,
};
use std::io::{self, Write};

/// Rendering backend implemented on top of crossterm.
#[derive(Clone, Copy, Debug)]
pub struct CrosstermBackend {
    alternate_screen: bool,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self {
            alternate_screen: true,
        }
    }
}

impl CrosstermBackend {
    /// Returns a backend that draws on the alternate screen.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures whether the backend switches to the alternate screen.
    ///
    /// Drawing on the primary screen keeps the final frame visible in the
    /// scrollback after exit, which helps when inspecting a session.
    #[must_use]
    pub fn with_alternate_screen(mut self, enabled: bool) -> Self {
        self.alternate_screen = enabled;
        self
    }
}

impl RenderingBackend for CrosstermBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut Scene) -> FrameControl + 'static,
    {
        let Self { alternate_screen } = self;
        let Presentation {
            window_title,
            palette,
            backdrop,
            scene,
        } = presentation;
        let mut scene = scene;

        let mut stdout = io::stdout();
        terminal::enable_raw_mode().context("failed to enable raw terminal mode")?;
        let outcome = event_loop(
            &mut stdout,
            &window_title,
            alternate_screen,
            &palette,
            backdrop,
            &mut scene,
            &mut update_scene,
        );
        let cleanup = restore_terminal(&mut stdout, alternate_screen);
        outcome.and(cleanup)
    }
}

fn event_loop<F>(
    stdout: &mut io::Stdout,
    window_title: &str,
    alternate_screen: bool,
    palette: &Palette,
    backdrop: u8,
    scene: &mut Scene,
    update_scene: &mut F,
) -> Result<()>
where
    F: FnMut(FrameInput, &mut Scene) -> FrameControl,
{
    if alternate_screen {
        queue!(stdout, EnterAlternateScreen).context("failed to enter the alternate screen")?;
    }
    queue!(stdout, SetTitle(window_title), cursor::Hide)
        .context("failed to prepare the terminal")?;
    draw_scene(stdout, palette, backdrop, scene)?;

    loop {
        match event::read().context("failed to read terminal input")? {
            Event::Key(key) => {
                let input = FrameInput {
                    action: decode_key(key),
                };
                match update_scene(input, scene) {
                    FrameControl::Continue => draw_scene(stdout, palette, backdrop, scene)?,
                    FrameControl::Exit => return Ok(()),
                }
            }
            Event::Resize(_, _) => draw_scene(stdout, palette, backdrop, scene)?,
            _ => {}
        }
    }
}

fn restore_terminal(stdout: &mut io::Stdout, alternate_screen: bool) -> Result<()> {
    queue!(stdout, cursor::Show).context("failed to restore the cursor")?;
    if alternate_screen {
        queue!(stdout, LeaveAlternateScreen).context("failed to leave the alternate screen")?;
    }
    stdout.flush().context("failed to flush terminal output")?;
    terminal::disable_raw_mode().context("failed to disable raw terminal mode")
}

/// Maps a key event to the action bound to it.
///
/// Movement accepts both `wasd` and the arrow keys. Digits pick the maze with
/// the matching index while `t` picks maze zero. Repeat and release events
/// decode to nothing so held keys fire once per press.
fn decode_key(key: KeyEvent) -> Option<InputAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(InputAction::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(InputAction::Quit),
        KeyCode::Char('w') | KeyCode::Up => Some(InputAction::Move { step: Step::UP }),
        KeyCode::Char('s') | KeyCode::Down => Some(InputAction::Move { step: Step::DOWN }),
        KeyCode::Char('a') | KeyCode::Left => Some(InputAction::Move { step: Step::LEFT }),
        KeyCode::Char('d') | KeyCode::Right => Some(InputAction::Move { step: Step::RIGHT }),
        KeyCode::Char('t') => Some(InputAction::SelectMaze { index: 0 }),
        KeyCode::Char('r') => Some(InputAction::Retry),
        KeyCode::Char('c') => Some(InputAction::Proceed),
        KeyCode::Char(digit @ '1'..='9') => digit.to_digit(10).map(|index| InputAction::SelectMaze {
            index: index as usize,
        }),
        _ => None,
    }
}

fn draw_scene(
    stdout: &mut io::Stdout,
    palette: &Palette,
    backdrop: u8,
    scene: &Scene,
) -> Result<()> {
    let screen = terminal::size().context("failed to query the terminal size")?;
    let fill = to_crossterm_colors(palette, backdrop);
    queue!(stdout, SetColors(fill), terminal::Clear(ClearType::All))
        .context("failed to clear the terminal")?;

    match scene {
        Scene::Menu(menu) => draw_menu(stdout, palette, menu, screen)?,
        Scene::Board(board) => draw_board(stdout, palette, board, screen)?,
    }

    stdout.flush().context("failed to flush terminal output")
}

fn draw_menu(
    stdout: &mut io::Stdout,
    palette: &Palette,
    menu: &MenuView,
    screen: (u16, u16),
) -> Result<()> {
    let origin = centered_origin(screen, (menu.width as u16, menu.height as u16));
    for line in &menu.lines {
        draw_text_line(stdout, palette, line, origin, menu.width)?;
    }
    Ok(())
}

fn draw_board(
    stdout: &mut io::Stdout,
    palette: &Palette,
    board: &BoardView,
    screen: (u16, u16),
) -> Result<()> {
    let window = board_window(board);
    let (origin_column, origin_row) = centered_origin(screen, window);

    for (row, cells) in board.cells().chunks(board.width() as usize).enumerate() {
        queue!(stdout, cursor::MoveTo(origin_column, origin_row + row as u16))?;
        for cell in cells {
            queue!(
                stdout,
                SetColors(to_crossterm_colors(palette, cell.color)),
                Print(cell.glyph)
            )?;
        }
    }

    // The status strip starts one row past the board's bottom edge.
    let strip = (origin_column, origin_row + board.height() as u16 + 1);
    for line in board.hud() {
        draw_text_line(stdout, palette, line, strip, board.width())?;
    }
    Ok(())
}

fn draw_text_line(
    stdout: &mut io::Stdout,
    palette: &Palette,
    line: &TextLine,
    origin: (u16, u16),
    window_width: u32,
) -> Result<()> {
    let content_width = line.content.chars().count() as u32;
    let offset = line_offset(window_width, content_width, line.centered, line.indent);
    let column = (i32::from(origin.0) + offset).max(0) as u16;
    let row = origin.1 + line.row as u16;
    queue!(
        stdout,
        cursor::MoveTo(column, row),
        SetColors(to_crossterm_colors(palette, line.color)),
        Print(&line.content)
    )?;
    Ok(())
}

/// Top-left corner that centers a window on the screen.
///
/// Windows larger than the screen pin to the top-left corner instead of
/// rendering at negative coordinates.
fn centered_origin(screen: (u16, u16), window: (u16, u16)) -> (u16, u16) {
    (
        screen.0.saturating_sub(window.0) / 2,
        screen.1.saturating_sub(window.1) / 2,
    )
}

/// Footprint of a board plus its status strip, in terminal cells.
fn board_window(board: &BoardView) -> (u16, u16) {
    let strip_rows = board
        .hud()
        .iter()
        .map(|line| line.row + 1)
        .max()
        .map_or(0, |rows| rows + 1);
    (
        board.width() as u16,
        (board.height() + strip_rows) as u16,
    )
}

/// Horizontal offset of a text line within its window.
fn line_offset(window_width: u32, content_width: u32, centered: bool, indent: i32) -> i32 {
    let aligned = if centered {
        (window_width as i32 - content_width as i32) / 2
    } else {
        0
    };
    aligned + indent
}

fn to_crossterm_colors(palette: &Palette, index: u8) -> Colors {
    let pair = palette.pair(index);
    Colors::new(
        to_crossterm_color(pair.foreground),
        to_crossterm_color(pair.background),
    )
}

fn to_crossterm_color(color: Color) -> CrosstermColor {
    match color {
        Color::Black => CrosstermColor::Black,
        Color::Red => CrosstermColor::DarkRed,
        Color::Green => CrosstermColor::DarkGreen,
        Color::Yellow => CrosstermColor::DarkYellow,
        Color::Blue => CrosstermColor::DarkBlue,
        Color::Magenta => CrosstermColor::DarkMagenta,
        Color::Cyan => CrosstermColor::DarkCyan,
        Color::White => CrosstermColor::White,
        Color::Reset => CrosstermColor::Reset,
    }
}
