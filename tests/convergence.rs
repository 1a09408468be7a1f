//! Integration tests: training converges to the known equilibria.

use imperfect_info_games::cfr::tree::reachable_histories;
use imperfect_info_games::cfr::{CfrTrainer, Game, TrainerConfig, Traversal};
use imperfect_info_games::games::bar_crowding::BarCrowding;
use imperfect_info_games::games::kuhn::KuhnPoker;
use imperfect_info_games::games::prisoners_dilemma::PrisonersDilemma;
use imperfect_info_games::games::rps::RockPaperScissors;

fn trained<G: Game>(game: G, iterations: u64, seed: u64) -> CfrTrainer<G> {
    let mut trainer =
        CfrTrainer::with_default_players(game, TrainerConfig::seeded(iterations, seed)).unwrap();
    trainer.train().unwrap();
    trainer
}

fn assert_near(actual: &[f64], expected: &[f64], tolerance: f64, what: &str) {
    for (a, e) in actual.iter().zip(expected) {
        assert!(
            (a - e).abs() < tolerance,
            "{what}: got {actual:?}, expected {expected:?} within {tolerance}"
        );
    }
}

#[test]
fn rps_converges_to_uniform() {
    let trainer = trained(RockPaperScissors::new(), 10_000, 0);
    let third = 1.0 / 3.0;
    for (id, key) in [(0, "P0"), (1, "P1")] {
        let strategy = trainer.player(id).unwrap().average_strategy(key, 3);
        let l1: f64 = strategy.iter().map(|p| (p - third).abs()).sum();
        assert!(l1 < 0.05, "{key}: {strategy:?} is {l1:.4} from uniform");
    }
}

#[test]
fn asymmetric_rps_converges_to_known_mix() {
    let trainer = trained(RockPaperScissors::asymmetric(), 50_000, 0);
    for (id, key) in [(0, "P0"), (1, "P1")] {
        let strategy = trainer.player(id).unwrap().average_strategy(key, 3);
        assert_near(&strategy, &[0.4, 0.4, 0.2], 0.05, key);
    }
}

#[test]
fn prisoners_converge_to_defection() {
    let trainer = trained(PrisonersDilemma::new(), 1_000, 0);
    for (id, key) in [(0, "P0"), (1, "P1")] {
        let strategy = trainer.player(id).unwrap().average_strategy(key, 2);
        assert!(strategy[1] > 0.95, "{key} defects with {:.4}", strategy[1]);
    }
    assert_near(&trainer.expected_payoffs().unwrap(), &[-2.0, -2.0], 0.1, "payoffs");
}

#[test]
fn kuhn_value_approaches_minus_one_eighteenth() {
    let trainer = trained(KuhnPoker::new(), 200_000, 1);
    let value = trainer.expected_payoffs().unwrap();
    assert!(
        (value[0] + 1.0 / 18.0).abs() < 0.01,
        "player 0 value {:.5}, expected {:.5}",
        value[0],
        -1.0 / 18.0
    );
    assert!((value[0] + value[1]).abs() < 1e-9);
}

/// Dominated choices in Kuhn Poker are abandoned:
/// - With a King, always call a bet
/// - With a Jack facing a bet, always fold
#[test]
fn kuhn_nash_strategy_properties() {
    let trainer = trained(KuhnPoker::new(), 100_000, 2);
    let p0 = trainer.player(0).unwrap();
    let p1 = trainer.player(1).unwrap();

    let cases = [
        (p1.average_strategy("K:b", 2), 1, "P1 king calls a bet"),
        (p0.average_strategy("K:pb", 2), 1, "P0 king calls after check-bet"),
        (p1.average_strategy("J:b", 2), 0, "P1 jack folds to a bet"),
        (p0.average_strategy("J:pb", 2), 0, "P0 jack folds after check-bet"),
        (p1.average_strategy("K:p", 2), 1, "P1 king bets after a check"),
    ];
    for (strategy, action, what) in cases {
        assert!(
            strategy[action] > 0.95,
            "{what}: pass={:.4}, bet={:.4}",
            strategy[0],
            strategy[1]
        );
    }

    // P0 with a queen never opens with a bet in any equilibrium
    let queen = p0.average_strategy("Q:", 2);
    assert!(queen[1] < 0.1, "P0 queen bets with {:.4}", queen[1]);
}

#[test]
fn zero_sum_games_pay_zero_sum() {
    fn check<G: Game>(game: G) {
        assert!(game.is_zero_sum());
        for history in reachable_histories(&game).unwrap() {
            if game.is_terminal(&history) {
                let total: f64 = game.payoffs(&history).unwrap().iter().sum();
                assert_eq!(total, 0.0, "{} at [{history}]", game.name());
            }
        }
    }
    check(KuhnPoker::new());
    check(RockPaperScissors::new());
    check(RockPaperScissors::asymmetric());
}

#[test]
fn bar_crowding_trains_three_players() {
    let trainer = trained(BarCrowding::new(), 5_000, 3);
    assert_eq!(trainer.num_info_sets(), 3);
    for (id, player) in trainer.players().iter().enumerate() {
        let strategy = player.average_strategy(&format!("P{id}"), 2);
        assert!((strategy.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(strategy.iter().all(|&p| p >= 0.0));
    }
    let value = trainer.expected_payoffs().unwrap();
    assert_eq!(value.len(), 3);
    assert!(value.iter().all(|v| (-1.0..=1.0).contains(v)));
}

#[test]
fn traversal_engines_agree_on_three_players() {
    let run = |traversal| {
        let config = TrainerConfig::seeded(500, 9).with_traversal(traversal);
        let mut trainer = CfrTrainer::with_default_players(BarCrowding::new(), config).unwrap();
        trainer.train().unwrap();
        trainer.export()
    };
    let recursive = run(Traversal::Recursive);
    let work_list = run(Traversal::WorkList);
    assert_eq!(recursive.players, work_list.players);
    assert_eq!(recursive.payoff_sums, work_list.payoff_sums);
}
