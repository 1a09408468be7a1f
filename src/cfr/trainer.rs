//! Chance-sampled Counterfactual Regret Minimization trainer.
//!
//! Each iteration walks the game tree once, depth first, from the empty
//! history. Player nodes expand every legal action; chance nodes draw a single
//! outcome from the trainer's random source. Values are propagated as full
//! payoff vectors, and the acting player's table is updated on the way back up.
//!
//! The trainer is generic over any game that implements the `Game` trait.

use std::path::Path;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::cfr::config::{TrainerConfig, TrainingStats, Traversal};
use crate::cfr::error::{CfrError, Result};
use crate::cfr::game::{Game, GameHistory, Payoffs, Turn};
use crate::cfr::player::{CfrPlayer, InfosetReport, PlayerExport};
use crate::cfr::tree;

/// The CFR trainer.
///
/// Owns the game, one [`CfrPlayer`] per seat and the random source used for
/// chance nodes.
///
/// # Example
/// ```
/// use imperfect_info_games::cfr::{CfrTrainer, TrainerConfig};
/// use imperfect_info_games::games::rps::RockPaperScissors;
///
/// let config = TrainerConfig::seeded(1_000, 0);
/// let mut trainer = CfrTrainer::with_default_players(RockPaperScissors::new(), config).unwrap();
/// trainer.train().unwrap();
///
/// let strategy = trainer.player(0).unwrap().average_strategy("P0", 3);
/// assert_eq!(strategy.len(), 3);
/// ```
pub struct CfrTrainer<G: Game> {
    /// The game being solved.
    game: G,

    /// Decision makers, indexed by player id.
    players: Vec<CfrPlayer>,

    /// Configuration for the trainer.
    config: TrainerConfig,

    /// Random source for chance nodes.
    rng: StdRng,

    /// Iterations completed.
    iteration: u64,

    /// Sum of root values per player, for the running average.
    payoff_sums: Vec<f64>,

    /// Statistics tracking.
    stats: TrainingStats,
}

/// A player node whose strategy has been fixed for this visit.
struct Decision<A> {
    actor: usize,
    info_key: String,
    actions: Vec<A>,
    strategy: Vec<f64>,
}

/// Work-list frame: a player node with some children still to expand.
struct Frame<G: Game> {
    decision: Decision<G::Action>,
    history: GameHistory<G>,
    reach: Vec<f64>,
    next: usize,
    values: Vec<Payoffs>,
}

impl<G: Game> CfrTrainer<G> {
    /// Create a trainer for `game` driven by `players`.
    ///
    /// The random source is seeded from `config.seed`, or from entropy.
    ///
    /// # Errors
    /// [`CfrError::Configuration`] if the configuration is invalid or the
    /// players do not match the game's seats.
    pub fn new(game: G, players: Vec<CfrPlayer>, config: TrainerConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(game, players, config, rng)
    }

    /// Create a trainer with players `cfr0`, `cfr1`, ...
    ///
    /// # Errors
    /// [`CfrError::Configuration`] if the configuration is invalid.
    pub fn with_default_players(game: G, config: TrainerConfig) -> Result<Self> {
        let players = CfrPlayer::team(game.num_players());
        Self::new(game, players, config)
    }

    /// Create a trainer with an explicit random source.
    ///
    /// # Errors
    /// Same as [`CfrTrainer::new`].
    pub fn with_rng(
        game: G,
        players: Vec<CfrPlayer>,
        config: TrainerConfig,
        rng: StdRng,
    ) -> Result<Self> {
        config.validate()?;
        check_players(&game, &players)?;

        let num_players = players.len();
        Ok(Self {
            game,
            players,
            config,
            rng,
            iteration: 0,
            payoff_sums: vec![0.0; num_players],
            stats: TrainingStats::new(),
        })
    }

    /// Run a single iteration: one traversal from the empty history with
    /// every reach probability at 1.
    ///
    /// # Returns
    /// The root value vector under this iteration's strategy profile.
    pub fn run_iteration(&mut self) -> Result<Payoffs> {
        let root = GameHistory::<G>::root();
        let reach = vec![1.0; self.players.len()];
        let values = match self.config.traversal {
            Traversal::Recursive => self.traverse(&root, &reach)?,
            Traversal::WorkList => self.traverse_work_list(root, reach)?,
        };

        for (sum, value) in self.payoff_sums.iter_mut().zip(&values) {
            *sum += value;
        }
        self.iteration += 1;

        Ok(values)
    }

    /// Train for the configured number of iterations.
    ///
    /// # Returns
    /// Statistics from the training run.
    pub fn train(&mut self) -> Result<&TrainingStats> {
        let iterations = self.config.iterations;
        self.train_with_callback(iterations, 0, |_| {})
    }

    /// Train for `iterations` iterations, calling `callback` every
    /// `callback_interval` iterations (0 never calls it).
    pub fn train_with_callback<F>(
        &mut self,
        iterations: u64,
        callback_interval: u64,
        mut callback: F,
    ) -> Result<&TrainingStats>
    where
        F: FnMut(&TrainingStats),
    {
        let start_time = Instant::now();
        let report_interval = self.config.report_interval;
        log::info!(
            "training {} for {} iterations ({:?} traversal)",
            self.game.name(),
            iterations,
            self.config.traversal
        );

        for i in 1..=iterations {
            self.run_iteration()?;

            let report = report_interval > 0 && i % report_interval == 0;
            let call = callback_interval > 0 && i % callback_interval == 0;
            if report || call {
                self.refresh_stats(start_time);
            }
            if report {
                log::debug!(
                    "iteration {:>8} | info sets {:>6} | avg payoffs {:?}",
                    self.iteration,
                    self.stats.info_sets,
                    self.stats.average_payoffs
                );
            }
            if call {
                callback(&self.stats);
            }
        }

        self.refresh_stats(start_time);
        log::info!(
            "finished {} iterations in {:.2}s ({:.0} it/s), {} info sets",
            self.stats.iterations,
            self.stats.elapsed_seconds,
            self.stats.iterations_per_second,
            self.stats.info_sets
        );

        Ok(&self.stats)
    }

    fn refresh_stats(&mut self, start_time: Instant) {
        self.stats.iterations = self.iteration;
        self.stats.info_sets = self.num_info_sets();
        self.stats.elapsed_seconds = start_time.elapsed().as_secs_f64();
        self.stats.average_payoffs = self.average_payoffs();
        self.stats.update_rate();
    }

    /// Core recursive traversal.
    ///
    /// `reach[p]` is player `p`'s own contribution to the probability of
    /// reaching `history`. Returns the expected payoff vector of the subtree
    /// under the current strategy profile.
    fn traverse(&mut self, history: &GameHistory<G>, reach: &[f64]) -> Result<Payoffs> {
        // Terminal node: return payoff
        if self.game.is_terminal(history) {
            return tree::terminal_payoffs(&self.game, history);
        }

        match self.game.active_player(history)? {
            // Chance node: sample one outcome, reach unchanged
            Turn::Chance => {
                let outcome = self.game.chance_action(&mut self.rng)?;
                self.traverse(&history.with_chance(outcome), reach)
            }
            Turn::Player(actor) => {
                let decision = self.open_decision(history, actor)?;

                let mut action_values = Vec::with_capacity(decision.actions.len());
                for (action, &prob) in decision.actions.iter().zip(&decision.strategy) {
                    let mut child_reach = reach.to_vec();
                    child_reach[actor] *= prob;
                    action_values.push(self.traverse(&history.with_play(action.clone()), &child_reach)?);
                }

                self.close_decision(decision, reach, &action_values)
            }
        }
    }

    /// Same traversal as [`Self::traverse`], driven by an explicit stack.
    fn traverse_work_list(&mut self, root: GameHistory<G>, reach: Vec<f64>) -> Result<Payoffs> {
        let mut stack: Vec<Frame<G>> = Vec::new();
        let mut resolved = self.descend(root, reach, &mut stack)?;

        while let Some(frame) = stack.last_mut() {
            if let Some(value) = resolved.take() {
                frame.values.push(value);
            }

            if frame.next < frame.decision.actions.len() {
                let i = frame.next;
                frame.next += 1;
                let mut child_reach = frame.reach.clone();
                child_reach[frame.decision.actor] *= frame.decision.strategy[i];
                let child = frame.history.with_play(frame.decision.actions[i].clone());
                resolved = self.descend(child, child_reach, &mut stack)?;
            } else if let Some(done) = stack.pop() {
                resolved = Some(self.close_decision(done.decision, &done.reach, &done.values)?);
            }
        }

        resolved.ok_or_else(|| CfrError::configuration("traversal ended without a root value"))
    }

    /// Walk down from `history` through chance nodes. Returns the payoffs if a
    /// terminal is reached; otherwise pushes a frame for the player node.
    fn descend(
        &mut self,
        mut history: GameHistory<G>,
        reach: Vec<f64>,
        stack: &mut Vec<Frame<G>>,
    ) -> Result<Option<Payoffs>> {
        loop {
            if self.game.is_terminal(&history) {
                return tree::terminal_payoffs(&self.game, &history).map(Some);
            }
            match self.game.active_player(&history)? {
                Turn::Chance => {
                    let outcome = self.game.chance_action(&mut self.rng)?;
                    history = history.with_chance(outcome);
                }
                Turn::Player(actor) => {
                    let decision = self.open_decision(&history, actor)?;
                    let values = Vec::with_capacity(decision.actions.len());
                    stack.push(Frame {
                        decision,
                        history,
                        reach,
                        next: 0,
                        values,
                    });
                    return Ok(None);
                }
            }
        }
    }

    /// Resolve the actor, info set and current strategy at a player node.
    fn open_decision(&self, history: &GameHistory<G>, actor: usize) -> Result<Decision<G::Action>> {
        let player = self.players.get(actor).ok_or_else(|| {
            CfrError::configuration(format!(
                "{} moved player {} but only {} players exist",
                self.game.name(),
                actor,
                self.players.len()
            ))
        })?;

        let actions = self.game.legal_actions(history)?;
        if actions.is_empty() {
            return Err(CfrError::invalid_history(
                history,
                "player node without legal actions",
            ));
        }

        let info_key = self.game.info_key(history)?;
        let strategy = player.strategy(&info_key, actions.len());

        Ok(Decision {
            actor,
            info_key,
            actions,
            strategy,
        })
    }

    /// Combine child values, update the actor's table, return the node value.
    fn close_decision(
        &mut self,
        decision: Decision<G::Action>,
        reach: &[f64],
        action_values: &[Payoffs],
    ) -> Result<Payoffs> {
        let Decision {
            actor,
            info_key,
            actions,
            strategy,
        } = decision;

        // Expected value for every player under the current strategy
        let mut node_value = vec![0.0; self.players.len()];
        for (values, &prob) in action_values.iter().zip(&strategy) {
            for (total, &value) in node_value.iter_mut().zip(values) {
                *total += prob * value;
            }
        }

        // Gain of switching to each action, for the actor only
        let regrets: Vec<f64> = action_values
            .iter()
            .map(|values| values[actor] - node_value[actor])
            .collect();

        // Everyone but the actor
        let counterfactual_reach: f64 = reach
            .iter()
            .enumerate()
            .filter(|&(p, _)| p != actor)
            .map(|(_, &r)| r)
            .product();

        let player = &mut self.players[actor];
        player.accumulate(
            &info_key,
            &regrets,
            counterfactual_reach,
            &strategy,
            reach[actor],
        )?;
        if player.table().get(&info_key).is_some_and(|e| e.actions.is_empty()) {
            player.label_actions(&info_key, actions.iter().map(|a| a.to_string()).collect());
        }

        Ok(node_value)
    }

    /// Exact expected payoffs when every player follows its average strategy.
    pub fn expected_payoffs(&self) -> Result<Payoffs> {
        tree::expected_payoffs(&self.game, &self.players)
    }

    /// Reserve table space for every info set of the game.
    ///
    /// Needs the full chance distribution for games with chance.
    ///
    /// # Returns
    /// The number of info sets found.
    pub fn presize(&mut self) -> Result<usize> {
        let infosets = tree::infoset_histories(&self.game)?;
        let mut per_player = vec![0usize; self.players.len()];
        for (player, _) in infosets.keys() {
            if let Some(count) = per_player.get_mut(*player) {
                *count += 1;
            }
        }
        for (player, count) in self.players.iter_mut().zip(&per_player) {
            player.reserve(*count);
        }
        Ok(infosets.len())
    }

    /// Mean root value per player over all iterations so far.
    pub fn average_payoffs(&self) -> Vec<f64> {
        if self.iteration == 0 {
            return vec![0.0; self.payoff_sums.len()];
        }
        self.payoff_sums
            .iter()
            .map(|&sum| sum / self.iteration as f64)
            .collect()
    }

    /// Reports of every player, indexed by player id.
    pub fn reports(&self) -> Vec<Vec<InfosetReport>> {
        self.players.iter().map(CfrPlayer::report).collect()
    }

    /// Get the current iteration count.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Get the number of information sets discovered, over all players.
    pub fn num_info_sets(&self) -> usize {
        self.players.iter().map(CfrPlayer::num_info_sets).sum()
    }

    /// Get current statistics.
    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    /// All players, indexed by id.
    pub fn players(&self) -> &[CfrPlayer] {
        &self.players
    }

    /// One player by id.
    pub fn player(&self, id: usize) -> Option<&CfrPlayer> {
        self.players.get(id)
    }

    /// Get reference to the game.
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Export trainer state for checkpointing.
    pub fn export(&self) -> TrainerSnapshot {
        TrainerSnapshot {
            game: self.game.name().to_string(),
            iteration: self.iteration,
            payoff_sums: self.payoff_sums.clone(),
            players: self.players.iter().map(CfrPlayer::export).collect(),
        }
    }

    /// Restore trainer state from a checkpoint of the same game.
    ///
    /// The random source is not part of the snapshot.
    pub fn import(&mut self, snapshot: TrainerSnapshot) -> Result<()> {
        if snapshot.game != self.game.name() {
            return Err(CfrError::configuration(format!(
                "snapshot is for {}, trainer plays {}",
                snapshot.game,
                self.game.name()
            )));
        }
        if snapshot.payoff_sums.len() != self.players.len() {
            return Err(CfrError::configuration(format!(
                "snapshot has {} payoff sums for {} players",
                snapshot.payoff_sums.len(),
                self.players.len()
            )));
        }
        let players = snapshot
            .players
            .into_iter()
            .map(CfrPlayer::import)
            .collect::<Result<Vec<_>>>()?;
        check_players(&self.game, &players)?;

        self.players = players;
        self.iteration = snapshot.iteration;
        self.payoff_sums = snapshot.payoff_sums;
        self.stats = TrainingStats::new();
        Ok(())
    }

    /// Reset the trainer to initial state. The random source keeps its position.
    pub fn reset(&mut self) {
        for player in &mut self.players {
            player.reset();
        }
        self.iteration = 0;
        self.payoff_sums.iter_mut().for_each(|s| *s = 0.0);
        self.stats = TrainingStats::new();
    }
}

/// Players must fill the game's seats in id order.
fn check_players<G: Game>(game: &G, players: &[CfrPlayer]) -> Result<()> {
    if players.len() != game.num_players() {
        return Err(CfrError::configuration(format!(
            "{} needs {} players, got {}",
            game.name(),
            game.num_players(),
            players.len()
        )));
    }
    if let Some((seat, player)) = players.iter().enumerate().find(|(i, p)| p.id() != *i) {
        return Err(CfrError::configuration(format!(
            "player {} has id {} but sits in seat {}",
            player.name(),
            player.id(),
            seat
        )));
    }
    Ok(())
}

/// Serializable trainer state for checkpointing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerSnapshot {
    /// Name of the game the tables belong to.
    pub game: String,
    /// Iterations completed.
    pub iteration: u64,
    /// Sum of root values per player.
    pub payoff_sums: Vec<f64>,
    /// Players with their tables.
    pub players: Vec<PlayerExport>,
}

impl TrainerSnapshot {
    /// Write the snapshot as pretty JSON.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read a snapshot written by [`TrainerSnapshot::save_json`].
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
