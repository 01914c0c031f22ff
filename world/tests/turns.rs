use maze_chase_core::{
    AttemptStatus, Block, BlockCatalog, BlockId, BlockKind, ChaserId, ChaserKind, Command, Event,
    GridPos, MoveRejection, Step,
};
use maze_chase_world::{self as world, query, ChaserSpec, Grid, World};

#[test]
fn patrol_chasers_cycle_their_route_with_wraparound() {
    let mut world = assemble(
        &["-  ", "   ", "   ", "  +"],
        vec![patrol(&[(2, 0), (2, 1), (2, 2)])],
    );

    let expected = [(2, 1), (2, 2), (2, 0), (2, 1)];
    let shuffle = [Step::RIGHT, Step::LEFT, Step::RIGHT, Step::LEFT];
    for (turn, step) in shuffle.into_iter().enumerate() {
        let events = play(&mut world, step);
        assert!(
            events.iter().any(|event| matches!(event, Event::PlayerMoved { .. })),
            "turn {turn} should commit the player move"
        );
        let (row, column) = expected[turn];
        assert_eq!(
            query::chasers(&world)[0].position,
            GridPos::new(row, column),
            "turn {turn} patrol position"
        );
    }
}

#[test]
fn blocked_patrols_wait_for_the_player_to_leave() {
    let mut world = assemble(&["  - ", "    ", "   +"], vec![patrol(&[(1, 1), (1, 2)])]);

    // The player parks on the patrol's next cell; the chaser waits and
    // keeps aiming for it.
    let _ = play(&mut world, Step::DOWN);
    let chaser = &query::chasers(&world)[0];
    assert_eq!(chaser.position, GridPos::new(1, 1));
    assert_eq!(chaser.patrol_target, Some(GridPos::new(1, 2)));

    // The player steps off; the patrol resumes on the freed cell.
    let _ = play(&mut world, Step::DOWN);
    assert_eq!(query::chasers(&world)[0].position, GridPos::new(1, 2));
}

#[test]
fn pursuit_chasers_recompute_toward_the_moving_player() {
    let mut world = assemble(
        &["-   ", "    ", "    ", "   +"],
        vec![pursuit((0, 3))],
    );

    let _ = play(&mut world, Step::DOWN);
    assert_eq!(query::chasers(&world)[0].position, GridPos::new(1, 3));

    let _ = play(&mut world, Step::DOWN);
    assert_eq!(query::chasers(&world)[0].position, GridPos::new(2, 3));
}

#[test]
fn pursuit_catches_the_player_head_on() {
    let mut world = assemble(&["-    +"], vec![pursuit((0, 4))]);

    let _ = play(&mut world, Step::RIGHT);
    assert_eq!(query::chasers(&world)[0].position, GridPos::new(0, 3));
    assert_eq!(query::attempt_status(&world), AttemptStatus::Ongoing);

    let events = play(&mut world, Step::RIGHT);
    assert!(events.contains(&Event::ChaserMoved {
        chaser: ChaserId::new(0),
        from: GridPos::new(0, 3),
        to: GridPos::new(0, 2),
    }));
    assert!(events.contains(&Event::AttemptEnded {
        status: AttemptStatus::Lost,
    }));
    assert_eq!(query::attempt_status(&world), AttemptStatus::Lost);

    let events = play(&mut world, Step::RIGHT);
    assert_eq!(
        events,
        vec![Event::PlayerMoveRejected {
            reason: MoveRejection::AttemptOver
        }]
    );
}

#[test]
fn sealed_off_pursuers_hold_while_the_game_continues() {
    let mut world = assemble(&["- #  ", "  #  ", "  #  "], vec![pursuit((0, 4))]);

    let _ = play(&mut world, Step::DOWN);
    assert_eq!(query::chasers(&world)[0].position, GridPos::new(0, 4));
    assert_eq!(query::attempt_status(&world), AttemptStatus::Ongoing);

    let _ = play(&mut world, Step::DOWN);
    assert_eq!(query::chasers(&world)[0].position, GridPos::new(0, 4));
    assert_eq!(query::player(&world).position, GridPos::new(2, 0));
}

#[test]
fn the_score_tallies_steps_and_the_bonus() {
    let mut world = assemble(&["-  $  +"], Vec::new());

    for _ in 0..6 {
        let _ = play(&mut world, Step::RIGHT);
    }

    let player = query::player(&world);
    assert_eq!(player.steps, 6);
    assert_eq!(
        player.score,
        world::STARTING_SCORE - 6 * world::STEP_COST + world::BONUS_REWARD
    );
    assert_eq!(query::attempt_status(&world), AttemptStatus::Won);
}

#[test]
fn chasers_step_in_spawn_order() {
    let mut world = assemble(
        &["-    ", "     ", "    +"],
        vec![patrol(&[(1, 0), (1, 1)]), patrol(&[(2, 0), (2, 1)])],
    );

    let events = play(&mut world, Step::RIGHT);
    assert_eq!(
        events,
        vec![
            Event::PlayerMoved {
                from: GridPos::new(0, 0),
                to: GridPos::new(0, 1),
            },
            Event::ChaserMoved {
                chaser: ChaserId::new(0),
                from: GridPos::new(1, 0),
                to: GridPos::new(1, 1),
            },
            Event::ChaserMoved {
                chaser: ChaserId::new(1),
                from: GridPos::new(2, 0),
                to: GridPos::new(2, 1),
            },
        ]
    );
}

#[test]
fn chasers_block_each_other_within_a_turn() {
    let mut world = assemble(
        &["-   ", "    ", "   +"],
        vec![patrol(&[(1, 0), (1, 1)]), patrol(&[(1, 1), (1, 2)])],
    );

    // The first patrol plans against the second one still holding its
    // target cell, so only the second one moves this turn.
    let events = play(&mut world, Step::RIGHT);
    let moved: Vec<ChaserId> = events
        .iter()
        .filter_map(|event| match event {
            Event::ChaserMoved { chaser, .. } => Some(*chaser),
            _ => None,
        })
        .collect();
    assert_eq!(moved, vec![ChaserId::new(1)]);

    // The vacated cell unblocks the first patrol on the next turn.
    let _ = play(&mut world, Step::RIGHT);
    let chasers = query::chasers(&world);
    assert_eq!(chasers[0].position, GridPos::new(1, 1));
    assert_eq!(chasers[1].position, GridPos::new(1, 2));
}

fn catalog() -> BlockCatalog {
    let blocks = vec![
        Block::new(BlockKind::Air, ' ', 0, false),
        Block::new(BlockKind::Wall, '#', 1, true),
        Block::new(BlockKind::Box, 'X', 2, true),
        Block::new(BlockKind::Bonus, '$', 3, false),
        Block::new(BlockKind::Start, '-', 4, false),
        Block::new(BlockKind::End, '+', 5, false),
    ];
    BlockCatalog::new(blocks).expect("catalog builds")
}

fn assemble(rows: &[&str], chasers: Vec<ChaserSpec>) -> World {
    let height = rows.len() as u32;
    let width = rows[0].len() as u32;
    let mut start = GridPos::new(0, 0);
    let mut end = GridPos::new(height - 1, width - 1);
    let mut cells = Vec::with_capacity((height as usize) * (width as usize));
    for (row, line) in rows.iter().enumerate() {
        for (column, glyph) in line.chars().enumerate() {
            let cell = GridPos::new(row as u32, column as u32);
            let id = match glyph {
                '#' => BlockId::new(1),
                'X' => BlockId::new(2),
                '$' => BlockId::new(3),
                '-' => {
                    start = cell;
                    BlockId::new(4)
                }
                '+' => {
                    end = cell;
                    BlockId::new(5)
                }
                _ => BlockId::new(0),
            };
            cells.push(id);
        }
    }
    let grid = Grid::new(height, width, cells, catalog(), start, end);
    World::new(grid, chasers).expect("world assembles")
}

fn play(world: &mut World, step: Step) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::MovePlayer { step }, &mut events);
    events
}

fn patrol(route: &[(u32, u32)]) -> ChaserSpec {
    let cells = route
        .iter()
        .map(|(row, column)| GridPos::new(*row, *column))
        .collect();
    ChaserSpec::new(ChaserKind::Patrol, cells)
}

fn pursuit(spawn: (u32, u32)) -> ChaserSpec {
    ChaserSpec::new(ChaserKind::Pursuit, vec![GridPos::new(spawn.0, spawn.1)])
}
