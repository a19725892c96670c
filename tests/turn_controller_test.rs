//! Tests for the turn controller state machine.

mod common;

use common::{id, standard_board};
use strictly_codenames::{
    Clue, Delivery, Dispatch, IgnoreReason, LossCause, Outcome, PlayerAction, RequestKind,
    RequestTicket, RevealCause, Team, TurnController, TurnPhase, apply_reveal,
    invariants::{BoardInvariants, InvariantSet},
};

fn clue(word: &str, size: u8) -> Clue {
    Clue::new(word.to_string(), size, Vec::new())
}

fn choose(controller: &mut TurnController, size: u8) -> RequestTicket {
    match controller.dispatch(PlayerAction::ChooseClueSize(size)) {
        Dispatch::ClueRequested(ticket) => ticket,
        other => panic!("clue size {} rejected: {:?}", size, other),
    }
}

fn start_guessing(size: u8) -> TurnController {
    let mut controller = TurnController::new(standard_board());
    let ticket = choose(&mut controller, size);
    assert_eq!(controller.accept_clue(ticket, clue("fruit", size)), Delivery::Applied);
    controller
}

fn end_turn(controller: &mut TurnController) -> RequestTicket {
    match controller.dispatch(PlayerAction::EndTurn) {
        Dispatch::TurnEnded(ticket) => ticket,
        other => panic!("end turn rejected: {:?}", other),
    }
}

#[test]
fn test_guessing_round_from_fresh_board() {
    let mut controller = start_guessing(2);
    assert_eq!(controller.phase(), TurnPhase::Guessing);
    assert_eq!(controller.board().remaining_guesses(), 3);

    controller.dispatch(PlayerAction::RevealCard(id(1)));
    assert_eq!(controller.board().remaining().get(Team::Blue), 8);
    assert_eq!(controller.phase(), TurnPhase::Guessing);
    assert_eq!(controller.board().remaining_guesses(), 2);

    controller.dispatch(PlayerAction::RevealCard(id(10)));
    assert_eq!(controller.board().remaining().get(Team::Red), 7);
    assert_eq!(controller.phase(), TurnPhase::OpponentTurn);
    assert_eq!(controller.awaiting(), Some(RequestKind::OpponentMoves));
}

#[test]
fn test_assassin_locks_the_board() {
    let mut controller = start_guessing(3);
    let result = controller.dispatch(PlayerAction::RevealCard(id(25)));

    let Dispatch::Revealed(outcome) = result else {
        panic!("reveal should apply");
    };
    assert_eq!(outcome.game_over(), Some(Outcome::Loss(LossCause::Assassin)));
    assert_eq!(
        controller.phase(),
        TurnPhase::GameOver(Outcome::Loss(LossCause::Assassin))
    );
    assert!(controller.board().cards().iter().all(|c| c.is_revealed()));
    assert!(!controller.controls().any());
    assert_eq!(controller.pending_request(), None);
    assert_eq!(controller.replay_next(), None);
}

#[test]
fn test_terminal_phase_ignores_everything() {
    let mut controller = start_guessing(3);
    controller.dispatch(PlayerAction::RevealCard(id(25)));
    let before = controller.board().clone();

    for action in [
        PlayerAction::RevealCard(id(1)),
        PlayerAction::ChooseClueSize(1),
        PlayerAction::EndTurn,
        PlayerAction::SetDifficulty(strictly_codenames::Difficulty::Hard),
    ] {
        assert!(matches!(
            controller.dispatch(action),
            Dispatch::Ignored(IgnoreReason::ControlDisabled { .. })
        ));
    }
    assert_eq!(controller.board(), &before);
}

#[test]
fn test_multi_round_game_ends_in_win() {
    let mut controller = TurnController::new(standard_board());
    for round in 0..3u8 {
        let ticket = choose(&mut controller, 3);
        controller.accept_clue(ticket, clue(&format!("clue{}", round), 3));
        for offset in 1..=3 {
            controller.dispatch(PlayerAction::RevealCard(id(round * 3 + offset)));
        }
        if round < 2 {
            // One guess left; hand the turn over and let the opponent pass.
            let ticket = end_turn(&mut controller);
            controller.accept_opponent_moves(ticket, Vec::new());
        }
    }
    assert_eq!(controller.phase(), TurnPhase::GameOver(Outcome::Win));
}

#[test]
fn test_last_guess_on_last_blue_card_wins() {
    let mut controller = TurnController::new(standard_board());
    for first in [1u8, 3, 5] {
        let ticket = choose(&mut controller, 1);
        controller.accept_clue(ticket, clue(&format!("clue{}", first), 1));
        controller.dispatch(PlayerAction::RevealCard(id(first)));
        controller.dispatch(PlayerAction::RevealCard(id(first + 1)));
        let ticket = controller.pending_request().expect("opponent request");
        controller.accept_opponent_moves(ticket, Vec::new());
    }
    let ticket = choose(&mut controller, 1);
    controller.accept_clue(ticket, clue("seven", 1));
    controller.dispatch(PlayerAction::RevealCard(id(7)));
    let ticket = end_turn(&mut controller);
    controller.accept_opponent_moves(ticket, Vec::new());

    // Two blue cards left, two guesses: the final guess both exhausts the
    // budget and clears the blue team.
    let ticket = choose(&mut controller, 1);
    controller.accept_clue(ticket, clue("last", 1));
    controller.dispatch(PlayerAction::RevealCard(id(8)));
    assert_eq!(controller.board().remaining_guesses(), 1);
    controller.dispatch(PlayerAction::RevealCard(id(9)));
    assert_eq!(controller.phase(), TurnPhase::GameOver(Outcome::Win));
    assert_eq!(controller.pending_request(), None);
}

#[test]
fn test_clue_sizes_capped_by_human_remaining() {
    let mut controller = TurnController::new(standard_board());
    for round in 0..4u8 {
        let ticket = choose(&mut controller, 2);
        controller.accept_clue(ticket, clue(&format!("clue{}", round), 2));
        controller.dispatch(PlayerAction::RevealCard(id(round * 2 + 1)));
        controller.dispatch(PlayerAction::RevealCard(id(round * 2 + 2)));
        let ticket = end_turn(&mut controller);
        controller.accept_opponent_moves(ticket, Vec::new());
    }

    assert_eq!(controller.board().remaining().get(Team::Blue), 1);
    assert_eq!(controller.controls().clue_sizes, [true, false, false]);
    assert!(matches!(
        controller.dispatch(PlayerAction::ChooseClueSize(2)),
        Dispatch::Ignored(_)
    ));
}

#[test]
fn test_opponent_replay_halts_on_game_over() {
    let mut controller = start_guessing(1);
    let ticket = end_turn(&mut controller);
    controller.accept_opponent_moves(ticket, (10..=16).map(id).collect());
    while controller.replay_pending() {
        controller.replay_next();
    }
    assert_eq!(controller.phase(), TurnPhase::ChoosingClueSize);
    assert_eq!(controller.board().remaining().get(Team::Red), 1);

    // Next opponent turn: red 17 ends the game, blue 1 must never be replayed.
    let ticket = choose(&mut controller, 1);
    controller.accept_clue(ticket, clue("again", 1));
    let ticket = end_turn(&mut controller);
    controller.accept_opponent_moves(ticket, vec![id(20), id(17), id(1)]);

    assert!(controller.replay_next().is_some());
    let fatal = controller.replay_next().expect("second reveal");
    assert_eq!(
        fatal.game_over(),
        Some(Outcome::Loss(LossCause::OpponentCleared))
    );
    assert_eq!(controller.replay_next(), None);
    assert_eq!(
        controller.board().card(id(1)).revealed_by(),
        Some(RevealCause::Endgame)
    );
    assert!(controller.board().opponent_queue().is_empty());
}

#[test]
fn test_replay_returns_turn_to_human() {
    let mut controller = start_guessing(1);
    let ticket = end_turn(&mut controller);
    controller.accept_opponent_moves(ticket, vec![id(10), id(18)]);

    assert_eq!(controller.phase(), TurnPhase::OpponentTurn);
    assert!(!controller.controls().any());
    controller.replay_next();
    assert_eq!(controller.phase(), TurnPhase::OpponentTurn);
    controller.replay_next();
    assert_eq!(controller.phase(), TurnPhase::ChoosingClueSize);
    assert_eq!(controller.board().clue(), None);
    assert_eq!(controller.board().clue_size(), None);
}

#[test]
fn test_stale_and_mismatched_tickets_are_dropped() {
    let mut controller = TurnController::new(standard_board());
    let clue_ticket = choose(&mut controller, 2);
    assert_eq!(
        controller.accept_opponent_moves(clue_ticket, vec![id(10)]),
        Delivery::Stale
    );
    controller.accept_clue(clue_ticket, clue("first", 2));

    let moves_ticket = end_turn(&mut controller);
    assert_eq!(
        controller.accept_clue(clue_ticket, clue("late", 2)),
        Delivery::Stale
    );
    assert_eq!(controller.board().issued_clues(), ["first".to_string()]);
    assert_eq!(
        controller.accept_opponent_moves(moves_ticket, Vec::new()),
        Delivery::Applied
    );
    assert_eq!(
        controller.accept_opponent_moves(moves_ticket, vec![id(10)]),
        Delivery::Stale
    );
    assert!(!controller.board().card(id(10)).is_revealed());
}

#[test]
fn test_failure_leaves_board_untouched() {
    let mut controller = start_guessing(1);
    let ticket = end_turn(&mut controller);
    let before = controller.board().clone();

    assert_eq!(controller.report_failure(ticket), Delivery::Applied);
    assert_eq!(controller.report_failure(ticket), Delivery::Stale);
    assert!(controller.is_stalled());
    assert_eq!(controller.board(), &before);
    assert_eq!(controller.view().stalled, Some(RequestKind::OpponentMoves));
    assert_eq!(
        controller.dispatch(PlayerAction::EndTurn),
        Dispatch::Ignored(IgnoreReason::AwaitingRemote)
    );

    let retry = controller.resume_stalled().expect("stalled");
    assert_eq!(retry.kind(), RequestKind::OpponentMoves);
    assert!(retry.epoch() > ticket.epoch());
    assert_eq!(controller.awaiting(), Some(RequestKind::OpponentMoves));
}

#[test]
fn test_issued_clues_accumulate() {
    let mut controller = TurnController::new(standard_board());
    for word in ["alpha", "beta", "gamma"] {
        let ticket = choose(&mut controller, 1);
        controller.accept_clue(ticket, clue(word, 1));
        let ticket = end_turn(&mut controller);
        controller.accept_opponent_moves(ticket, Vec::new());
    }
    assert_eq!(
        controller.board().issued_clues(),
        ["alpha".to_string(), "beta".to_string(), "gamma".to_string()]
    );
}

#[test]
fn test_reveal_engine_is_idempotent() {
    let mut board = standard_board();
    let first = apply_reveal(&mut board, id(5), RevealCause::Guess);
    let second = apply_reveal(&mut board, id(5), RevealCause::Opponent);
    assert!(first.changed());
    assert!(!second.changed());
    assert_eq!(board.card(id(5)).revealed_by(), Some(RevealCause::Guess));
    assert_eq!(board.remaining().get(Team::Blue), 8);
}

/// Small xorshift generator so the random walk is reproducible.
struct Rng(u64);

impl Rng {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

#[test]
fn test_random_games_keep_invariants() {
    for seed in 1..=200u64 {
        let mut rng = Rng(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        let mut controller = TurnController::new(standard_board());
        let mut outcomes = 0;

        for _ in 0..400 {
            if let Some(ticket) = controller.pending_request() {
                match ticket.kind() {
                    RequestKind::Clue => {
                        controller.accept_clue(ticket, clue(&format!("c{}", rng.next()), 1));
                    }
                    RequestKind::OpponentMoves => {
                        let count = rng.below(4);
                        let moves = (0..count)
                            .map(|_| id(u8::try_from(rng.below(24) + 1).expect("fits")))
                            .collect();
                        controller.accept_opponent_moves(ticket, moves);
                    }
                }
            } else if controller.replay_pending() {
                if let Some(outcome) = controller.replay_next()
                    && outcome.is_game_over()
                {
                    outcomes += 1;
                }
            } else {
                let action = match rng.below(3) {
                    0 => PlayerAction::RevealCard(id(u8::try_from(rng.below(25) + 1).expect("fits"))),
                    1 => PlayerAction::ChooseClueSize(u8::try_from(rng.below(4)).expect("fits")),
                    _ => PlayerAction::EndTurn,
                };
                if let Dispatch::Revealed(outcome) = controller.dispatch(action)
                    && outcome.is_game_over()
                {
                    outcomes += 1;
                }
            }

            let board = controller.board();
            assert!(
                BoardInvariants::check_all(board).is_ok(),
                "seed {} broke an invariant",
                seed
            );
            let revealed = board.cards().iter().filter(|c| c.is_revealed()).count();
            assert_eq!(
                usize::from(board.remaining().total()) + revealed,
                usize::from(board.initial().total())
            );

            if let TurnPhase::GameOver(outcome) = controller.phase() {
                let unpicked = board.unpicked();
                let picked_out = |team| {
                    board
                        .cards()
                        .iter()
                        .filter(|c| c.team() == team)
                        .all(|c| matches!(c.revealed_by(), Some(RevealCause::Guess | RevealCause::Opponent)))
                };
                match outcome {
                    Outcome::Win => assert!(picked_out(Team::Blue)),
                    Outcome::Loss(LossCause::Assassin) => assert!(picked_out(Team::Assassin)),
                    Outcome::Loss(LossCause::OpponentCleared) => {
                        assert!(picked_out(Team::Red));
                        assert_eq!(unpicked.get(Team::Red), 0);
                    }
                }
                break;
            }
        }
        assert!(outcomes <= 1, "seed {} ended the game twice", seed);
    }
}
