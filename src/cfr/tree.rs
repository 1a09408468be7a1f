//! Exhaustive walks over a game tree.
//!
//! Training never enumerates chance; these helpers do, using
//! [`Game::chance_outcomes`]. They serve evaluation (exact expected payoffs of
//! the average strategy profile), table pre-sizing, and checks on a game's
//! information-set structure.

use std::collections::BTreeMap;

use crate::cfr::error::{CfrError, Result};
use crate::cfr::game::{Game, GameHistory, Payoffs, Turn};
use crate::cfr::player::CfrPlayer;

fn chance_distribution<G: Game>(game: &G) -> Result<Vec<(G::Chance, f64)>> {
    let outcomes = game.chance_outcomes();
    if outcomes.is_empty() {
        return Err(CfrError::configuration(format!(
            "{} does not expose its chance outcomes",
            game.name()
        )));
    }
    Ok(outcomes)
}

/// Payoffs at a terminal history, one per seat.
///
/// # Errors
/// Propagates [`Game::payoffs`] errors; [`CfrError::Configuration`] if the
/// vector length differs from [`Game::num_players`].
pub fn terminal_payoffs<G: Game>(game: &G, history: &GameHistory<G>) -> Result<Payoffs> {
    let payoffs = game.payoffs(history)?;
    if payoffs.len() != game.num_players() {
        return Err(CfrError::configuration(format!(
            "{} returned {} payoffs for {} players at [{}]",
            game.name(),
            payoffs.len(),
            game.num_players(),
            history
        )));
    }
    Ok(payoffs)
}

/// Every history reachable from the root, in depth-first pre-order.
///
/// # Errors
/// Propagates game errors; [`CfrError::Configuration`] if a chance node is
/// reached and the game exposes no chance outcomes.
pub fn reachable_histories<G: Game>(game: &G) -> Result<Vec<GameHistory<G>>> {
    let mut histories = Vec::new();
    let mut stack = vec![GameHistory::<G>::root()];

    while let Some(history) = stack.pop() {
        if !game.is_terminal(&history) {
            match game.active_player(&history)? {
                Turn::Chance => {
                    for (outcome, _) in chance_distribution(game)?.into_iter().rev() {
                        stack.push(history.with_chance(outcome));
                    }
                }
                Turn::Player(_) => {
                    for action in game.legal_actions(&history)?.into_iter().rev() {
                        stack.push(history.with_play(action));
                    }
                }
            }
        }
        histories.push(history);
    }

    Ok(histories)
}

/// Player-node histories grouped by `(player, info set key)`.
pub fn infoset_histories<G: Game>(
    game: &G,
) -> Result<BTreeMap<(usize, String), Vec<GameHistory<G>>>> {
    let mut groups: BTreeMap<(usize, String), Vec<GameHistory<G>>> = BTreeMap::new();
    for history in reachable_histories(game)? {
        if game.is_terminal(&history) {
            continue;
        }
        if let Turn::Player(player) = game.active_player(&history)? {
            let key = game.info_key(&history)?;
            groups.entry((player, key)).or_default().push(history);
        }
    }
    Ok(groups)
}

/// Exact expected payoff vector when each player follows its average
/// strategy and chance follows [`Game::chance_outcomes`].
///
/// # Errors
/// Propagates game errors; [`CfrError::Configuration`] if a player id has no
/// matching entry in `players` or chance outcomes are missing.
pub fn expected_payoffs<G: Game>(game: &G, players: &[CfrPlayer]) -> Result<Payoffs> {
    expected_value(game, players, &GameHistory::<G>::root())
}

fn expected_value<G: Game>(
    game: &G,
    players: &[CfrPlayer],
    history: &GameHistory<G>,
) -> Result<Payoffs> {
    if game.is_terminal(history) {
        return terminal_payoffs(game, history);
    }

    let mut value = vec![0.0; game.num_players()];
    match game.active_player(history)? {
        Turn::Chance => {
            for (outcome, prob) in chance_distribution(game)? {
                let child = expected_value(game, players, &history.with_chance(outcome))?;
                add_scaled(&mut value, prob, &child);
            }
        }
        Turn::Player(actor) => {
            let player = players.get(actor).ok_or_else(|| {
                CfrError::configuration(format!("no player for seat {actor}"))
            })?;
            let actions = game.legal_actions(history)?;
            let key = game.info_key(history)?;
            let strategy = player.average_strategy(&key, actions.len());
            for (action, prob) in actions.into_iter().zip(strategy) {
                let child = expected_value(game, players, &history.with_play(action))?;
                add_scaled(&mut value, prob, &child);
            }
        }
    }
    Ok(value)
}

fn add_scaled(acc: &mut [f64], weight: f64, values: &[f64]) {
    for (a, &v) in acc.iter_mut().zip(values) {
        *a += weight * v;
    }
}
