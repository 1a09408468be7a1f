//! Regret-matching decision maker.
//!
//! Every non-chance player is driven by one [`CfrPlayer`]. It owns the
//! player's [`RegretTable`], turns accumulated regret into the strategy used
//! on the current iteration, and exposes the average strategy once training
//! is done.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cfr::error::Result;
use crate::cfr::storage::{RegretTable, TableExport};

/// A player whose decisions come from counterfactual regret minimization.
#[derive(Debug, Clone)]
pub struct CfrPlayer {
    name: String,
    id: usize,
    table: RegretTable,
}

/// Average strategy of one information set, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfosetReport {
    /// Information set key.
    pub info_key: String,
    /// Action labels, aligned with `strategy`.
    pub actions: Vec<String>,
    /// Average strategy.
    pub strategy: Vec<f64>,
}

/// Serializable snapshot of a player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerExport {
    /// Player name.
    pub name: String,
    /// Player id.
    pub id: usize,
    /// Regret and strategy tables.
    pub table: TableExport,
}

impl CfrPlayer {
    /// Create a player with an empty table.
    pub fn new(name: impl Into<String>, id: usize) -> Self {
        Self {
            name: name.into(),
            id,
            table: RegretTable::new(),
        }
    }

    /// Create a player whose table is pre-sized for `capacity` info sets.
    pub fn with_capacity(name: impl Into<String>, id: usize, capacity: usize) -> Self {
        Self {
            name: name.into(),
            id,
            table: RegretTable::with_capacity(capacity),
        }
    }

    /// Default players `cfr0`, `cfr1`, ... for an `n`-player game.
    pub fn team(n: usize) -> Vec<Self> {
        (0..n).map(|id| Self::new(format!("cfr{id}"), id)).collect()
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 0-based player id, matching [`Turn::Player`](crate::cfr::Turn::Player).
    pub fn id(&self) -> usize {
        self.id
    }

    /// Strategy for the current iteration by regret matching.
    ///
    /// Pure function of the table: unseen info sets and info sets without
    /// positive regret get the uniform distribution over `num_actions`.
    pub fn strategy(&self, info_key: &str, num_actions: usize) -> Vec<f64> {
        self.table.current_strategy(info_key, num_actions)
    }

    /// Record one visit to an info set. This is the only mutator of the
    /// regret and strategy sums.
    ///
    /// # Errors
    /// [`CfrError::Configuration`](crate::cfr::CfrError::Configuration) on an
    /// action count mismatch.
    pub fn accumulate(
        &mut self,
        info_key: &str,
        action_regrets: &[f64],
        counterfactual_reach: f64,
        strategy: &[f64],
        own_reach: f64,
    ) -> Result<()> {
        self.table.accumulate(
            info_key,
            action_regrets,
            counterfactual_reach,
            strategy,
            own_reach,
        )?;
        log::trace!(
            "{} {:<12} cf_reach={:.4} own_reach={:.4} regrets={:?}",
            self.name,
            info_key,
            counterfactual_reach,
            own_reach,
            action_regrets
        );
        Ok(())
    }

    /// Remember the labels of an info set's actions for reporting.
    pub fn label_actions(&mut self, info_key: &str, labels: Vec<String>) {
        self.table.set_action_labels(info_key, labels);
    }

    /// Average strategy for one info set; the equilibrium approximation.
    pub fn average_strategy(&self, info_key: &str, num_actions: usize) -> Vec<f64> {
        self.table.average_strategy(info_key, num_actions)
    }

    /// Average strategies of every visited info set.
    pub fn average_strategies(&self) -> BTreeMap<String, Vec<f64>> {
        self.table
            .iter()
            .map(|(key, entry)| (key.clone(), entry.average_strategy()))
            .collect()
    }

    /// Reports for every visited info set, sorted by key.
    pub fn report(&self) -> Vec<InfosetReport> {
        let mut reports: Vec<InfosetReport> = self
            .table
            .iter()
            .map(|(key, entry)| InfosetReport {
                info_key: key.clone(),
                actions: entry.actions.clone(),
                strategy: entry.average_strategy(),
            })
            .collect();
        reports.sort_by(|a, b| a.info_key.cmp(&b.info_key));
        reports
    }

    /// Number of info sets visited so far.
    pub fn num_info_sets(&self) -> usize {
        self.table.num_info_sets()
    }

    /// Read access to the underlying table.
    pub fn table(&self) -> &RegretTable {
        &self.table
    }

    /// Reserve room for `additional` info sets.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Forget everything learned.
    pub fn reset(&mut self) {
        self.table.clear();
    }

    /// Export the player for checkpointing.
    pub fn export(&self) -> PlayerExport {
        PlayerExport {
            name: self.name.clone(),
            id: self.id,
            table: self.table.export(),
        }
    }

    /// Rebuild a player from an export.
    ///
    /// # Errors
    /// [`CfrError::Configuration`](crate::cfr::CfrError::Configuration) for
    /// malformed tables.
    pub fn import(data: PlayerExport) -> Result<Self> {
        let mut table = RegretTable::new();
        table.import(data.table)?;
        Ok(Self {
            name: data.name,
            id: data.id,
            table,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_identities() {
        let team = CfrPlayer::team(3);
        let names: Vec<&str> = team.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["cfr0", "cfr1", "cfr2"]);
        assert!(team.iter().enumerate().all(|(i, p)| p.id() == i));
    }

    #[test]
    fn test_strategy_follows_regret() {
        let mut player = CfrPlayer::new("hero", 0);
        assert_eq!(player.strategy("K:", 2), vec![0.5, 0.5]);

        player.accumulate("K:", &[-1.0, 1.0], 1.0, &[0.5, 0.5], 1.0).unwrap();
        assert_eq!(player.strategy("K:", 2), vec![0.0, 1.0]);
        // strategy lookups never create entries
        assert_eq!(player.strategy("Q:", 2), vec![0.5, 0.5]);
        assert_eq!(player.num_info_sets(), 1);
    }

    #[test]
    fn test_report_is_sorted_and_labelled() {
        let mut player = CfrPlayer::new("hero", 1);
        player.accumulate("b", &[0.0, 0.0], 1.0, &[1.0, 0.0], 1.0).unwrap();
        player.accumulate("a", &[0.0, 0.0], 1.0, &[0.0, 1.0], 1.0).unwrap();
        player.label_actions("a", vec!["PASS".into(), "BET".into()]);

        let report = player.report();
        assert_eq!(report[0].info_key, "a");
        assert_eq!(report[0].actions, vec!["PASS", "BET"]);
        assert_eq!(report[0].strategy, vec![0.0, 1.0]);
        assert_eq!(report[1].info_key, "b");
        assert!(report[1].actions.is_empty());

        let averages = player.average_strategies();
        assert_eq!(averages["b"], vec![1.0, 0.0]);
    }

    #[test]
    fn test_export_round_trip_keeps_identity() {
        let mut player = CfrPlayer::with_capacity("villain", 1, 8);
        player.accumulate("x", &[1.0, 2.0], 0.5, &[0.5, 0.5], 1.0).unwrap();

        let restored = CfrPlayer::import(player.export()).unwrap();
        assert_eq!(restored.name(), "villain");
        assert_eq!(restored.id(), 1);
        assert_eq!(restored.strategy("x", 2), player.strategy("x", 2));
    }
}
