//! Drives the session loop and projects world snapshots into scenes.

use maze_chase_core::{AttemptStatus, ChaserOccupancy, Command, Event, GridPos, Step};
use maze_chase_rendering::{
    BoardView, FrameControl, FrameInput, GlyphCell, InputAction, Palette, Scene, TextLine,
};
use maze_chase_system_bootstrap::{assemble, AssembleError};
use maze_chase_system_session::{Directive, Screen, Session, SessionInput, SessionSummary};
use maze_chase_world::{apply, query, World};

use crate::assets::Assets;

/// Application state threaded through the backend's update callback.
pub(crate) struct App {
    assets: Assets,
    session: Session,
    world: Option<World>,
    events: Vec<Event>,
    directives: Vec<Directive>,
    failure: Option<AssembleError>,
}

impl App {
    pub(crate) fn new(assets: Assets) -> Self {
        let session = Session::new(assets.mazes.len());
        Self {
            assets,
            session,
            world: None,
            events: Vec::new(),
            directives: Vec::new(),
            failure: None,
        }
    }

    /// Scene shown before any input arrives.
    pub(crate) fn initial_scene(&self) -> Scene {
        Scene::Menu(self.assets.menus.start.render(&[]))
    }

    pub(crate) fn maze_count(&self) -> usize {
        self.assets.mazes.len()
    }

    pub(crate) fn palette(&self) -> &Palette {
        &self.assets.palette
    }

    /// Palette pair the backend clears the window with.
    pub(crate) fn backdrop(&self) -> u8 {
        let catalog = &self.assets.catalog;
        catalog
            .block(catalog.air())
            .map_or(0, |block| block.color())
    }

    /// Feeds one key press through the session and refreshes the scene.
    pub(crate) fn update(&mut self, input: FrameInput, scene: &mut Scene) -> FrameControl {
        let Some(action) = input.action else {
            return FrameControl::Continue;
        };
        let session_input = match action {
            InputAction::Move { step } => SessionInput::Move { step },
            InputAction::SelectMaze { index } => SessionInput::SelectMaze { index },
            InputAction::Retry => SessionInput::Restart,
            InputAction::Proceed => SessionInput::Proceed,
            InputAction::Quit => SessionInput::Quit,
        };

        let mut directives = std::mem::take(&mut self.directives);
        self.session.handle(session_input, &mut directives);
        let mut control = FrameControl::Continue;
        for directive in directives.drain(..) {
            match directive {
                Directive::BeginAttempt { maze } => {
                    if let Err(error) = self.begin_attempt(maze) {
                        self.failure = Some(error);
                        control = FrameControl::Exit;
                    }
                }
                Directive::MovePlayer { step } => self.move_player(step),
                Directive::Quit => control = FrameControl::Exit,
            }
        }
        self.directives = directives;

        if control == FrameControl::Continue {
            *scene = self.project_scene();
        }
        control
    }

    /// Session totals, or the error that stopped an attempt from starting.
    pub(crate) fn report(&mut self) -> Result<SessionSummary, AssembleError> {
        match self.failure.take() {
            Some(error) => Err(error),
            None => Ok(self.session.summary()),
        }
    }

    fn begin_attempt(&mut self, maze: usize) -> Result<(), AssembleError> {
        let descriptor = &self.assets.mazes[maze].descriptor;
        self.world = Some(assemble(&self.assets.catalog, descriptor)?);
        Ok(())
    }

    fn move_player(&mut self, step: Step) {
        let Some(world) = self.world.as_mut() else {
            return;
        };
        self.events.clear();
        apply(world, Command::MovePlayer { step }, &mut self.events);
        self.session.observe(&self.events, query::player(world));
    }

    fn project_scene(&self) -> Scene {
        match self.session.screen() {
            Screen::Start => Scene::Menu(self.assets.menus.start.render(&[])),
            Screen::Playing { maze } => self.board_scene(maze),
            Screen::Ended { status, .. } => {
                let template = match status {
                    AttemptStatus::Won => &self.assets.menus.win,
                    _ => &self.assets.menus.lose,
                };
                let (steps, score) = self
                    .session
                    .records()
                    .last()
                    .map_or((0, 0), |record| (record.steps, record.score));
                Scene::Menu(template.render(&[steps.to_string(), score.to_string()]))
            }
        }
    }

    fn board_scene(&self, maze: usize) -> Scene {
        let Some(world) = self.world.as_ref() else {
            return Scene::Menu(self.assets.menus.start.render(&[]));
        };
        let grid = query::grid(world);
        let player = query::player(world);
        let catalog = &self.assets.catalog;

        let mut cells = Vec::with_capacity((grid.height() * grid.width()) as usize);
        for row in 0..grid.height() {
            for column in 0..grid.width() {
                let glyph = grid
                    .block_at(GridPos::new(row, column))
                    .and_then(|id| catalog.block(id))
                    .map_or(GlyphCell::new(' ', 0), |block| {
                        GlyphCell::new(block.glyph(), block.color())
                    });
                cells.push(glyph);
            }
        }

        let sprites = &self.assets.sprites;
        let chasers = query::chasers(world);
        let held: Vec<GridPos> = chasers.iter().map(|chaser| chaser.position).collect();
        for chaser in &chasers {
            let Some(target) = chaser.patrol_target else {
                continue;
            };
            // Blocked targets keep their own glyph.
            if grid.is_route(target, ChaserOccupancy::new(&held)) && target != player.position {
                paint(&mut cells, grid.width(), target, sprites.marker);
            }
        }
        for chaser in &chasers {
            paint(&mut cells, grid.width(), chaser.position, sprites.chaser);
        }
        paint(&mut cells, grid.width(), player.position, sprites.player);

        let hud = vec![TextLine::new(
            format!(
                "{}  steps: {}  score: {}",
                self.assets.mazes[maze].name, player.steps, player.score
            ),
            0,
            false,
            0,
            0,
        )];
        let board = BoardView::new(grid.height(), grid.width(), cells, hud)
            .expect("the buffer covers the whole board");
        Scene::Board(board)
    }
}

fn paint(cells: &mut [GlyphCell], width: u32, cell: GridPos, glyph: GlyphCell) {
    let index = (cell.row() * width + cell.column()) as usize;
    if let Some(slot) = cells.get_mut(index) {
        *slot = glyph;
    }
}
