//! Integration tests for the Clobber engine
//!
//! Tests the full stack: boards, move generation, heuristics, both search
//! algorithms, agents, the game runner and configuration

use clobber_core::{
    alpha_beta, minimax, Adjacency, Agent, AgentConfig, Algorithm, Board, Cell, Coord, GameConfig,
    GameRunner, Heuristic, HeuristicChoice, Move, PhasePolicy, Player,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn board(text: &str) -> Board {
    Board::parse(text, Adjacency::Orthogonal).unwrap()
}

/// Hand-built positions with a mix of captures and dead ends
fn sample_boards() -> Vec<Board> {
    vec![
        board("B W\nW B"),
        board("W B W B W"),
        board("W B W B"),
        board("B W B\nW _ W\nB W B"),
        board("B B W\nW W B\n_ B W"),
        board("B W _ W\n_ B W B\nW _ B W"),
        Board::parse("B W B\nW B W\nB W B", Adjacency::Diagonal).unwrap(),
        Board::parse("B _ W\n_ W _\nB _ B", Adjacency::Diagonal).unwrap(),
        Board::starting(3, 4, Adjacency::Orthogonal),
    ]
}

/// Random board up to 5x5 with each cell B, W or empty
fn random_board(rng: &mut ChaCha8Rng, adjacency: Adjacency) -> Board {
    let rows = rng.gen_range(1..=5);
    let cols = rng.gen_range(1..=5);
    let mut tokens = Vec::with_capacity(rows);
    for _ in 0..rows {
        let mut row = Vec::with_capacity(cols);
        for _ in 0..cols {
            row.push(["B", "W", "_"][rng.gen_range(0..3)]);
        }
        tokens.push(row);
    }
    Board::from_tokens(rows, cols, &tokens, adjacency).unwrap()
}

fn agent(player: Player, algorithm: Algorithm, heuristic: HeuristicChoice, depth: u32) -> Agent {
    Agent::new(AgentConfig::new(player, algorithm, heuristic, depth)).unwrap()
}

// ============================================================================
// BOARD AND MOVE INVARIANTS
// ============================================================================

#[test]
fn test_moves_always_capture_opponent() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for i in 0..200 {
        let adjacency = if i % 2 == 0 { Adjacency::Orthogonal } else { Adjacency::Diagonal };
        let b = random_board(&mut rng, adjacency);

        for player in [Player::Black, Player::White] {
            let moves = b.legal_moves(player);
            assert_eq!(moves.len(), b.mobility(player));

            for mv in moves {
                assert_eq!(b.get(mv.from), Ok(Cell::Piece(player)));
                assert_eq!(b.get(mv.to), Ok(Cell::Piece(player.opponent())));
                let dr = mv.to.row as i8 - mv.from.row as i8;
                let dc = mv.to.col as i8 - mv.from.col as i8;
                assert!(adjacency.offsets().contains(&(dr, dc)));
            }
        }
    }
}

#[test]
fn test_apply_removes_exactly_one_opponent_piece() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for _ in 0..200 {
        let b = random_board(&mut rng, Adjacency::Orthogonal);
        let snapshot = b.clone();

        for player in [Player::Black, Player::White] {
            for mv in b.legal_moves(player) {
                let next = b.apply(mv).unwrap();
                assert_eq!(next.count_pieces(player), b.count_pieces(player));
                assert_eq!(
                    next.count_pieces(player.opponent()),
                    b.count_pieces(player.opponent()) - 1
                );
                assert_eq!(next.get(mv.from), Ok(Cell::Empty));
                assert_eq!(next.get(mv.to), Ok(Cell::Piece(player)));
            }
        }

        assert_eq!(b, snapshot, "apply must not modify the source board");
    }
}

#[test]
fn test_move_order_is_deterministic() {
    let b = Board::starting(6, 5, Adjacency::Orthogonal);
    assert_eq!(b.legal_moves(Player::Black), b.clone().legal_moves(Player::Black));

    // Row-major sources, then scan order per source
    let moves = b.legal_moves(Player::Black);
    assert_eq!(moves[0], Move::new(Coord::new(0, 0), Coord::new(1, 0)));
    assert_eq!(moves[1], Move::new(Coord::new(0, 0), Coord::new(0, 1)));
    assert_eq!(moves[2], Move::new(Coord::new(0, 2), Coord::new(1, 2)));
}

#[test]
fn test_render_round_trip() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for _ in 0..50 {
        let b = random_board(&mut rng, Adjacency::Diagonal);
        let parsed = Board::parse(&b.to_string(), Adjacency::Diagonal).unwrap();
        assert_eq!(parsed, b);
    }
}

// ============================================================================
// SEARCH TESTS
// ============================================================================

#[test]
fn test_alpha_beta_matches_minimax_on_samples() {
    for b in sample_boards() {
        for depth in 1..=3 {
            for heuristic in Heuristic::ALL {
                for root in [Player::Black, Player::White] {
                    let mm = minimax(&b, depth, root, &heuristic);
                    let ab = alpha_beta(&b, depth, root, &heuristic);

                    assert_eq!(ab.score, mm.score, "{} depth {} {}\n{}", heuristic, depth, root, b);
                    assert_eq!(ab.best_move, mm.best_move, "{} depth {} {}\n{}", heuristic, depth, root, b);
                    assert!(ab.nodes <= mm.nodes);
                    if depth == 1 {
                        assert_eq!(ab.nodes, mm.nodes);
                    }
                }
            }
        }
    }
}

#[test]
fn test_alpha_beta_matches_minimax_on_random_boards() {
    let mut rng = ChaCha8Rng::seed_from_u64(1234);

    for i in 0..60 {
        let adjacency = if i % 3 == 0 { Adjacency::Diagonal } else { Adjacency::Orthogonal };
        let b = random_board(&mut rng, adjacency);
        let heuristic = Heuristic::ALL[i % Heuristic::ALL.len()];
        let depth = 1 + (i as u32 % 3);

        let mm = minimax(&b, depth, Player::Black, &heuristic);
        let ab = alpha_beta(&b, depth, Player::Black, &heuristic);
        assert_eq!((ab.score, ab.best_move), (mm.score, mm.best_move));
        assert!(ab.nodes <= mm.nodes);
        assert!(mm.nodes >= 1);
    }
}

#[test]
fn test_node_counts_are_reproducible() {
    let b = Board::starting(4, 4, Adjacency::Orthogonal);
    let first = alpha_beta(&b, 3, Player::Black, &Heuristic::MobilityDifference);
    let second = alpha_beta(&b, 3, Player::Black, &Heuristic::MobilityDifference);
    assert_eq!(first, second);
}

#[test]
fn test_starting_layout_depth_three() {
    let b = Board::starting(6, 5, Adjacency::Orthogonal);
    let material = Heuristic::MaterialDifference;

    let ab = alpha_beta(&b, 3, Player::Black, &material);
    let mm = minimax(&b, 3, Player::Black, &material);

    // Three plies from a full board: Black captures twice, White once
    assert_eq!(ab.score, 1);
    assert_eq!(mm.score, 1);

    let legal = b.legal_moves(Player::Black);
    let mv = ab.best_move.expect("Black has moves on a full board");
    assert!(legal.contains(&mv));
    // Every line scores the same, so the first generated move wins the tie
    assert_eq!(mv, legal[0]);
    assert_eq!(mm.best_move, Some(legal[0]));

    assert!(ab.nodes < mm.nodes, "ab={} mm={}", ab.nodes, mm.nodes);
}

#[test]
fn test_hand_computed_row() {
    let b = board("W B W B W");
    let material = Heuristic::MaterialDifference;

    let mm = minimax(&b, 2, Player::Black, &material);
    let ab = alpha_beta(&b, 2, Player::Black, &material);
    let expected = Some(Move::new(Coord::new(0, 1), Coord::new(0, 2)));

    assert_eq!((mm.score, mm.best_move, mm.nodes), (-1, expected, 11));
    assert_eq!((ab.score, ab.best_move, ab.nodes), (-1, expected, 9));
}

// ============================================================================
// AGENT AND GAME TESTS
// ============================================================================

#[test]
fn test_stuck_black_loses() {
    let b = board("B _ B\n_ _ _\nW _ W");
    let black = agent(Player::Black, Algorithm::AlphaBeta, HeuristicChoice::Adaptive, 3);
    assert_eq!(black.produce_move(&b).best_move, None);

    let white = agent(Player::White, Algorithm::AlphaBeta, HeuristicChoice::Adaptive, 3);
    let outcome = GameRunner::new(black, white).unwrap().play(b);
    assert_eq!(outcome.winner, Some(Player::White));
    assert_eq!(outcome.moves, 0);
}

#[test]
fn test_default_game_runs_to_completion() {
    let mut config = GameConfig::default();
    config.black.depth = 2;
    config.white.depth = 2;

    let initial = config.starting_board();
    let outcome = config.runner().unwrap().play(initial.clone());

    let winner = outcome.winner.expect("uncapped games always have a winner");
    let loser = outcome.stalled.expect("loser is recorded");
    assert_eq!(winner, loser.opponent());
    assert!(outcome.final_board.legal_moves(loser).is_empty());
    assert!(outcome.total_nodes >= outcome.moves as u64);
    assert_eq!(outcome.rounds, outcome.moves.div_ceil(2));

    // Replaying the history reproduces the final board
    let mut replay = initial;
    for mv in &outcome.history {
        replay = replay.apply(*mv).unwrap();
    }
    assert_eq!(replay, outcome.final_board);
}

#[test]
fn test_diagonal_minimax_game() {
    let mut config = GameConfig {
        rows: 4,
        cols: 4,
        adjacency: Adjacency::Diagonal,
        ..GameConfig::default()
    };
    config.black.algorithm = Algorithm::Minimax;
    config.white.algorithm = Algorithm::Minimax;
    config.black.depth = 2;
    config.white.depth = 2;
    config.white.policy = PhasePolicy::Fractional;

    // Diagonal neighbours on the alternating layout share a color
    let start = config.starting_board();
    assert!(start.legal_moves(Player::Black).is_empty());
    let outcome = config.runner().unwrap().play(start);
    assert_eq!(outcome.winner, Some(Player::White));

    let b = config.parse_board("B W _ _\nW _ B _\n_ B _ W\n_ _ W B").unwrap();
    let outcome = config.runner().unwrap().play(b);
    assert!(outcome.winner.is_some());
    assert!(outcome.moves > 0);
}

#[test]
fn test_config_file_round_trip() {
    let mut config = GameConfig::default();
    config.black.heuristic = "mobility".to_string();
    config.black.depth = 2;
    config.white.depth = 2;
    config.white.policy = PhasePolicy::Fractional;
    config.max_moves = Some(6);

    let path = std::env::temp_dir().join(format!("clobber-config-{}.json", std::process::id()));
    std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    let loaded = GameConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, config);

    let outcome = loaded.runner().unwrap().play(loaded.starting_board());
    assert!(outcome.is_draw());
    assert_eq!(outcome.moves, 6);
}

#[test]
fn test_adaptive_agents_change_heuristic_over_a_game() {
    let black = agent(Player::Black, Algorithm::AlphaBeta, HeuristicChoice::Adaptive, 1);
    let white = agent(Player::White, Algorithm::AlphaBeta, HeuristicChoice::Adaptive, 1);
    let outcome = GameRunner::new(black, white)
        .unwrap()
        .play(Board::starting(6, 5, Adjacency::Orthogonal));

    // 30 pieces: the first searches are early-phase
    assert_eq!(outcome.heuristics[0], Heuristic::MaterialDifference);
    assert_eq!(outcome.heuristics[1], Heuristic::SafePieces);
    // Each move removes a piece, so mid phase starts once 20 remain
    if outcome.heuristics.len() > 10 {
        assert_eq!(outcome.heuristics[10], Heuristic::MobilityDifference);
    }
    assert_eq!(outcome.degraded_selections, 0);
}
