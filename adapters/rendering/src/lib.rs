#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Rendering contracts that decouple the simulation from terminal backends.
//!
//! Adapters translate world snapshots into [`Scene`] values and hand them to
//! a [`RenderingBackend`] together with an update callback. The backend owns
//! the terminal, decodes key presses into [`FrameInput`] values, and redraws
//! the scene after every callback invocation until the callback asks to exit.

use anyhow::Result as AnyResult;
use maze_chase_core::Step;
use std::{error::Error, fmt};

/// Color a scene element can be drawn with.
///
/// Palette pairs stick to the eight standard terminal colors so scenes render
/// identically on terminals without true-color support. [`Color::Reset`]
/// stands apart: it keeps whatever the terminal itself is configured with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// ANSI black.
    Black,
    /// ANSI red.
    Red,
    /// ANSI green.
    Green,
    /// ANSI yellow.
    Yellow,
    /// ANSI blue.
    Blue,
    /// ANSI magenta.
    Magenta,
    /// ANSI cyan.
    Cyan,
    /// ANSI white.
    White,
    /// The terminal's own configured default.
    Reset,
}

impl Color {
    /// Resolves a color from its lowercase ANSI name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "black" => Some(Self::Black),
            "red" => Some(Self::Red),
            "green" => Some(Self::Green),
            "yellow" => Some(Self::Yellow),
            "blue" => Some(Self::Blue),
            "magenta" => Some(Self::Magenta),
            "cyan" => Some(Self::Cyan),
            "white" => Some(Self::White),
            _ => None,
        }
    }
}

/// Foreground and background colors drawn together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColorPair {
    /// Color applied to the glyph itself.
    pub foreground: Color,
    /// Color filling the cell behind the glyph.
    pub background: Color,
}

impl ColorPair {
    /// Creates a new color pair.
    #[must_use]
    pub const fn new(foreground: Color, background: Color) -> Self {
        Self {
            foreground,
            background,
        }
    }
}

/// Ordered collection of color pairs shared by every scene element.
///
/// Pair index `0` is reserved for the terminal default; authored pairs occupy
/// indexes `1..=len`. Out-of-range indexes resolve to the default pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pairs: Vec<ColorPair>,
}

impl Palette {
    /// Pair rendered for index `0` and for indexes past the authored range.
    pub const DEFAULT_PAIR: ColorPair = ColorPair::new(Color::Reset, Color::Reset);

    /// Builds a palette from authored color pairs.
    #[must_use]
    pub fn new(pairs: Vec<ColorPair>) -> Self {
        Self { pairs }
    }

    /// Number of authored pairs, excluding the reserved default.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Reports whether the palette holds no authored pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Resolves a pair index to concrete colors.
    #[must_use]
    pub fn pair(&self, index: u8) -> ColorPair {
        if index == 0 {
            return Self::DEFAULT_PAIR;
        }
        self.pairs
            .get(usize::from(index) - 1)
            .copied()
            .unwrap_or(Self::DEFAULT_PAIR)
    }
}

/// Glyph plus the palette pair it is colored with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphCell {
    /// Character drawn into the cell.
    pub glyph: char,
    /// Palette pair index of the cell.
    pub color: u8,
}

impl GlyphCell {
    /// Creates a new glyph cell.
    #[must_use]
    pub const fn new(glyph: char, color: u8) -> Self {
        Self { glyph, color }
    }
}

/// One line of menu or status text with its placement rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextLine {
    /// Text content after any variable substitution.
    pub content: String,
    /// Zero-based row the line is drawn on, relative to its window.
    pub row: u32,
    /// Whether the line is centered horizontally before indentation.
    pub centered: bool,
    /// Column shift applied after alignment. Negative values pull left.
    pub indent: i32,
    /// Palette pair index the text is colored with.
    pub color: u8,
}

impl TextLine {
    /// Creates a new text line.
    #[must_use]
    pub fn new<T: Into<String>>(content: T, row: u32, centered: bool, indent: i32, color: u8) -> Self {
        Self {
            content: content.into(),
            row,
            centered,
            indent,
            color,
        }
    }
}

/// Full-window text screen shown outside of play.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuView {
    /// Height of the menu window in rows.
    pub height: u32,
    /// Width of the menu window in columns.
    pub width: u32,
    /// Text lines in authoring order.
    pub lines: Vec<TextLine>,
}

impl MenuView {
    /// Creates a new menu view.
    #[must_use]
    pub fn new(height: u32, width: u32, lines: Vec<TextLine>) -> Self {
        Self {
            height,
            width,
            lines,
        }
    }
}

/// Board snapshot plus the status text drawn beneath it.
///
/// The glyph buffer is row-major and already composited: floor, boxes, the
/// player, and chasers all arrive as plain cells, so backends never consult
/// simulation state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardView {
    height: u32,
    width: u32,
    cells: Vec<GlyphCell>,
    hud: Vec<TextLine>,
}

impl BoardView {
    /// Builds a board view from a row-major glyph buffer.
    ///
    /// # Errors
    ///
    /// Returns [`RenderingError::CellCountMismatch`] when the buffer length
    /// disagrees with `height * width`.
    pub fn new(
        height: u32,
        width: u32,
        cells: Vec<GlyphCell>,
        hud: Vec<TextLine>,
    ) -> Result<Self, RenderingError> {
        let expected = height as usize * width as usize;
        if cells.len() != expected {
            return Err(RenderingError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            height,
            width,
            cells,
            hud,
        })
    }

    /// Height of the board in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Width of the board in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Row-major glyph buffer covering the whole board.
    #[must_use]
    pub fn cells(&self) -> &[GlyphCell] {
        &self.cells
    }

    /// Status lines drawn beneath the board.
    #[must_use]
    pub fn hud(&self) -> &[TextLine] {
        &self.hud
    }

    /// Glyph at the given cell, when it lies on the board.
    #[must_use]
    pub fn cell(&self, row: u32, column: u32) -> Option<GlyphCell> {
        if row >= self.height || column >= self.width {
            return None;
        }
        self.cells
            .get(row as usize * self.width as usize + column as usize)
            .copied()
    }
}

/// What the backend should currently present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scene {
    /// A text menu fills the window.
    Menu(MenuView),
    /// The live board fills the window.
    Board(BoardView),
}

/// Everything a backend needs before taking over the terminal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    /// Title reported to the hosting terminal.
    pub window_title: String,
    /// Color pairs every scene element indexes into.
    pub palette: Palette,
    /// Palette pair index used to clear window interiors.
    pub backdrop: u8,
    /// Scene presented before the first input arrives.
    pub scene: Scene,
}

impl Presentation {
    /// Creates a new presentation.
    #[must_use]
    pub fn new<T: Into<String>>(window_title: T, palette: Palette, backdrop: u8, scene: Scene) -> Self {
        Self {
            window_title: window_title.into(),
            palette,
            backdrop,
            scene,
        }
    }
}

/// Player intent decoded from a single key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputAction {
    /// Move the player one cell in the given direction.
    Move {
        /// Direction vector of the requested move.
        step: Step,
    },
    /// Pick the maze at the given index from the start menu.
    SelectMaze {
        /// Zero-based maze index.
        index: usize,
    },
    /// Restart the current maze from its initial layout.
    Retry,
    /// Advance to the next maze after a win.
    Proceed,
    /// Leave the session.
    Quit,
}

/// Input delivered to the update callback, one key press at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Action decoded from the key press, when one is bound.
    pub action: Option<InputAction>,
}

/// Tells the backend whether to keep its event loop running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    /// Redraw the scene and wait for the next key press.
    Continue,
    /// Tear the terminal down and return from [`RenderingBackend::run`].
    Exit,
}

/// Terminal facade the composition root drives the session through.
///
/// Implementations own the terminal for the whole call, decoding key presses
/// into [`FrameInput`] values and redrawing the scene after each callback
/// return.
pub trait RenderingBackend {
    /// Runs the event loop until the callback returns [`FrameControl::Exit`].
    ///
    /// The callback receives every decoded input and may rebuild the scene in
    /// place before it is drawn again.
    ///
    /// # Errors
    ///
    /// Returns an error when the terminal cannot be prepared or drawn to.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) -> FrameControl + 'static;
}

/// Errors surfaced while assembling presentation data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// A board view's glyph buffer disagrees with its dimensions.
    CellCountMismatch {
        /// Cell count implied by the view dimensions.
        expected: usize,
        /// Cell count actually supplied.
        actual: usize,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CellCountMismatch { expected, actual } => write!(
                f,
                "board view expects {expected} glyph cells but received {actual}"
            ),
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::{
        BoardView, Color, ColorPair, FrameInput, GlyphCell, MenuView, Palette, RenderingError,
        TextLine,
    };

    #[test]
    fn color_names_resolve_to_ansi_colors() {
        assert_eq!(Color::from_name("magenta"), Some(Color::Magenta));
        assert_eq!(Color::from_name("white"), Some(Color::White));
        assert_eq!(Color::from_name("chartreuse"), None);
    }

    #[test]
    fn pair_zero_stays_reserved_for_the_terminal_default() {
        let palette = Palette::new(vec![ColorPair::new(Color::Red, Color::Blue)]);
        assert_eq!(palette.pair(0), Palette::DEFAULT_PAIR);
        assert_eq!(
            Palette::DEFAULT_PAIR,
            ColorPair::new(Color::Reset, Color::Reset)
        );
    }

    #[test]
    fn authored_pairs_start_at_index_one() {
        let pairs = vec![
            ColorPair::new(Color::Red, Color::Black),
            ColorPair::new(Color::Green, Color::Black),
        ];
        let palette = Palette::new(pairs);
        assert_eq!(palette.pair(1), ColorPair::new(Color::Red, Color::Black));
        assert_eq!(palette.pair(2), ColorPair::new(Color::Green, Color::Black));
    }

    #[test]
    fn out_of_range_pairs_fall_back_to_the_default() {
        let palette = Palette::new(vec![ColorPair::new(Color::Red, Color::Black)]);
        assert_eq!(palette.pair(9), Palette::DEFAULT_PAIR);
    }

    #[test]
    fn board_views_expose_cells_by_coordinate() {
        let mut cells = vec![GlyphCell::new(' ', 0); 6];
        cells[5] = GlyphCell::new('@', 3);
        let view = BoardView::new(2, 3, cells, Vec::new()).expect("view builds");
        assert_eq!(view.cell(1, 2), Some(GlyphCell::new('@', 3)));
        assert_eq!(view.cell(0, 0), Some(GlyphCell::new(' ', 0)));
        assert_eq!(view.cell(2, 0), None);
    }

    #[test]
    fn short_glyph_buffers_are_rejected() {
        let cells = vec![GlyphCell::new(' ', 0); 5];
        let error = BoardView::new(2, 3, cells, Vec::new()).expect_err("buffer too short");
        assert_eq!(
            error,
            RenderingError::CellCountMismatch {
                expected: 6,
                actual: 5
            }
        );
        assert_eq!(
            error.to_string(),
            "board view expects 6 glyph cells but received 5"
        );
    }

    #[test]
    fn menu_lines_keep_their_authoring_order() {
        let lines = vec![
            TextLine::new("MAZE CHASE", 1, true, 0, 2),
            TextLine::new("press t to start", 3, true, 0, 0),
        ];
        let menu = MenuView::new(7, 30, lines.clone());
        assert_eq!(menu.lines, lines);
    }

    #[test]
    fn frame_input_defaults_to_idle() {
        assert_eq!(FrameInput::default(), FrameInput { action: None });
    }
}
