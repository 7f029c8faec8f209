use pillfall::{
    Arena, Cell, Color, GameConfig, GameMode, GameState, Intent, Orientation, Pill, Position,
    StepOutcome, apply_cluster_gravity, parse_script,
};

use rand::SeedableRng;
use rand::rngs::StdRng;

fn small_config(mode: GameMode) -> GameConfig {
    GameConfig {
        width: 8,
        height: 12,
        virus_count: 4,
        mode,
        ..GameConfig::default()
    }
}

fn board(arena: &Arena) -> Vec<Option<Cell>> {
    (0..arena.height() as i32)
        .flat_map(|y| (0..arena.width() as i32).map(move |x| Position::new(x, y)))
        .map(|p| arena.get(p))
        .collect()
}

fn run(game: &mut GameState, script: &str) -> Vec<StepOutcome> {
    parse_script(script)
        .unwrap()
        .into_iter()
        .map(|intent| game.apply(intent))
        .collect()
}

// ── determinism ──────────────────────────────────────────────────────────────

#[test]
fn same_seed_and_script_replay_identically() {
    let script = "..a.w.dd....s.ssss".repeat(20);
    let mut a = GameState::new(small_config(GameMode::Levels), 1234).unwrap();
    let mut b = GameState::new(small_config(GameMode::Levels), 1234).unwrap();

    let out_a = run(&mut a, &script);
    let out_b = run(&mut b, &script);
    assert_eq!(out_a, out_b);
    assert_eq!(board(&a.arena), board(&b.arena));
    assert_eq!(a.score, b.score);
    assert_eq!(a.arena.current_pill, b.arena.current_pill);
    assert_eq!(a.arena.next_pill, b.arena.next_pill);
}

// ── invariants over a long random game ───────────────────────────────────────

#[test]
fn long_game_keeps_walls_and_settles_to_fixed_point() {
    let mut game = GameState::new(small_config(GameMode::Levels), 77).unwrap();
    let mut viruses = game.arena.virus_count();
    let intents = [
        Intent::MoveLeft,
        Intent::GravityTick,
        Intent::RotateCw,
        Intent::MoveRight,
        Intent::GravityTick,
        Intent::MoveRight,
        Intent::SoftDrop,
        Intent::GravityTick,
    ];

    for intent in intents.iter().cycle().take(4000) {
        let outcome = game.apply(*intent);

        for &p in game.arena.walls() {
            assert_eq!(game.arena.get(p), Some(Cell::Wall));
        }
        let now = game.arena.virus_count();
        assert!(now <= viruses, "viruses never multiply");
        viruses = now;

        if let StepOutcome::Settled(report) = outcome {
            if report.chain > 0 {
                let mut probe = game.arena.clone();
                assert_eq!(apply_cluster_gravity(&mut probe).clusters_moved, 0);
            }
        }
        if let Some(pill) = game.arena.current_pill {
            if game.is_running() {
                assert!(game.arena.can_move(&pill));
            }
        }
        if !game.is_running() {
            break;
        }
    }
}

#[test]
fn endless_stacking_ends_in_game_over() {
    let mut game = GameState::new(small_config(GameMode::Endless), 5).unwrap();
    assert_eq!(game.arena.virus_count(), 0);
    for _ in 0..10_000 {
        if game.game_over {
            break;
        }
        game.apply(Intent::SoftDrop);
    }
    assert!(game.game_over);
    assert!(!game.victory);
    // State stays readable and frozen.
    let frozen = board(&game.arena);
    assert_eq!(game.apply(Intent::SoftDrop), StepOutcome::Idle);
    assert_eq!(board(&game.arena), frozen);
}

// ── spawn blocked ────────────────────────────────────────────────────────────

#[test]
fn blocked_spawn_only_adds_the_settled_pill() {
    let mut arena = Arena::empty(8, 12, 1).unwrap();
    let spawn = arena.spawn_position();
    let filler = Cell::Block { color: Color::Yellow, texture: 4 };
    arena.set_cell(spawn, filler).unwrap();
    arena.set_cell(spawn.offset(1, 0), filler).unwrap();
    arena.current_pill = Some(Pill::new(1, 8, Color::Red, Color::Blue));
    let before = board(&arena);

    let mut game = GameState::with_arena(
        small_config(GameMode::Endless),
        arena,
        StdRng::seed_from_u64(1),
    );
    let outcomes = run(&mut game, "...");
    assert!(matches!(outcomes.last(), Some(StepOutcome::Settled(_))));
    assert!(game.game_over);

    let after = board(&game.arena);
    let changed: Vec<usize> = before
        .iter()
        .zip(&after)
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(i, _)| i)
        .collect();
    let w = game.arena.width();
    assert_eq!(changed, vec![10 * w + 1, 10 * w + 2]);
}

// ── victory ──────────────────────────────────────────────────────────────────

#[test]
fn scripted_clear_of_last_virus_wins_exactly_once() {
    let mut arena = Arena::empty(8, 12, 1).unwrap();
    arena
        .set_cell(Position::new(1, 10), Cell::Virus { color: Color::Red })
        .unwrap();
    arena
        .set_cell(Position::new(1, 9), Cell::Block { color: Color::Red, texture: 0 })
        .unwrap();
    arena.current_pill = Some(Pill::new(4, 1, Color::Red, Color::Red));
    let mut game = GameState::with_arena(
        small_config(GameMode::Levels),
        arena,
        StdRng::seed_from_u64(2),
    );

    // Rotating on the spawn row would poke the top wall.
    assert_eq!(game.apply(Intent::RotateCw), StepOutcome::Rejected);
    assert_eq!(game.arena.current_pill.unwrap().orientation, Orientation::Right);

    let outcomes = run(&mut game, ".waaa........");
    let wins: Vec<_> = outcomes
        .iter()
        .filter(|o| matches!(o, StepOutcome::Settled(r) if r.viruses_removed == 1))
        .collect();
    assert_eq!(wins.len(), 1);
    assert!(game.victory);
    assert_eq!(game.arena.virus_count(), 0);
    assert!(outcomes.ends_with(&[StepOutcome::Idle]));
    assert_eq!(game.score, 4 * game.config().difficulty.score_multiplier());
}

#[test]
fn endless_game_never_declares_victory() {
    let mut game = GameState::new(small_config(GameMode::Endless), 11).unwrap();
    for _ in 0..200 {
        game.apply(Intent::GravityTick);
        assert!(!game.victory);
    }
}
