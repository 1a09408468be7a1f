//! Storage for CFR regrets and strategies.
//!
//! A [`RegretTable`] maps information set keys to cumulative regret and
//! cumulative strategy weight. Entries are created on first update and never
//! removed. Each table belongs to exactly one player and is only written by
//! the trainer currently driving that player, so no locking is involved.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cfr::error::{CfrError, Result};

/// Accumulated data for one information set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegretEntry {
    /// Cumulative counterfactual regret per action. Signed, unbounded.
    pub regret_sum: Vec<f64>,
    /// Cumulative reach-weighted strategy per action. Non-negative.
    pub strategy_sum: Vec<f64>,
    /// Display labels of the legal actions, in action order.
    #[serde(default)]
    pub actions: Vec<String>,
}

impl RegretEntry {
    /// Zero-initialised entry for `num_actions` actions.
    pub fn new(num_actions: usize) -> Self {
        Self {
            regret_sum: vec![0.0; num_actions],
            strategy_sum: vec![0.0; num_actions],
            actions: Vec::new(),
        }
    }

    /// Number of actions tracked by this entry.
    pub fn num_actions(&self) -> usize {
        self.regret_sum.len()
    }

    /// Current strategy by regret matching.
    pub fn current_strategy(&self) -> Vec<f64> {
        regret_matching(&self.regret_sum)
    }

    /// Normalised cumulative strategy, uniform if nothing was accumulated.
    pub fn average_strategy(&self) -> Vec<f64> {
        normalize_or_uniform(&self.strategy_sum)
    }
}

/// Uniform distribution over `num_actions` actions.
pub fn uniform(num_actions: usize) -> Vec<f64> {
    if num_actions == 0 {
        return Vec::new();
    }
    vec![1.0 / num_actions as f64; num_actions]
}

/// Regret matching: probabilities proportional to positive regret.
///
/// Falls back to uniform when no action has positive regret.
pub fn regret_matching(regrets: &[f64]) -> Vec<f64> {
    let positive: Vec<f64> = regrets.iter().map(|&r| r.max(0.0)).collect();
    normalize_or_uniform(&positive)
}

fn normalize_or_uniform(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        weights.iter().map(|&w| w / total).collect()
    } else {
        uniform(weights.len())
    }
}

/// Regret and strategy tables of one player.
#[derive(Debug, Clone, Default)]
pub struct RegretTable {
    entries: FxHashMap<String, RegretEntry>,
}

impl RegretTable {
    /// Create new empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage with pre-allocated capacity.
    ///
    /// Useful when the game's infosets can be enumerated ahead of training.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Reserve room for `additional` more information sets.
    pub fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
    }

    /// Entry for an info set, if it has been visited.
    pub fn get(&self, info_key: &str) -> Option<&RegretEntry> {
        self.entries.get(info_key)
    }

    /// Get current strategy for an info set using regret matching.
    ///
    /// Unseen info sets get the uniform strategy over `num_actions`.
    pub fn current_strategy(&self, info_key: &str, num_actions: usize) -> Vec<f64> {
        match self.entries.get(info_key) {
            Some(entry) if entry.num_actions() == num_actions => entry.current_strategy(),
            _ => uniform(num_actions),
        }
    }

    /// Get average strategy for an info set (Nash equilibrium approximation).
    pub fn average_strategy(&self, info_key: &str, num_actions: usize) -> Vec<f64> {
        match self.entries.get(info_key) {
            Some(entry) if entry.num_actions() == num_actions => entry.average_strategy(),
            _ => uniform(num_actions),
        }
    }

    /// Add one visit's contribution to an info set.
    ///
    /// `regret[a] += counterfactual_reach * action_regrets[a]` and
    /// `strategy_sum[a] += own_reach * strategy[a]`.
    ///
    /// # Errors
    /// [`CfrError::Configuration`] if the vectors disagree in length with
    /// each other or with the action count already stored for `info_key`.
    pub fn accumulate(
        &mut self,
        info_key: &str,
        action_regrets: &[f64],
        counterfactual_reach: f64,
        strategy: &[f64],
        own_reach: f64,
    ) -> Result<()> {
        let num_actions = action_regrets.len();
        if strategy.len() != num_actions {
            return Err(CfrError::configuration(format!(
                "info set {info_key}: {num_actions} regrets but {} strategy entries",
                strategy.len()
            )));
        }

        let entry = self
            .entries
            .entry(info_key.to_string())
            .or_insert_with(|| RegretEntry::new(num_actions));

        if entry.num_actions() != num_actions {
            return Err(CfrError::configuration(format!(
                "info set {info_key}: stored {} actions, update has {num_actions}",
                entry.num_actions()
            )));
        }

        for (sum, &regret) in entry.regret_sum.iter_mut().zip(action_regrets) {
            *sum += counterfactual_reach * regret;
        }
        for (sum, &prob) in entry.strategy_sum.iter_mut().zip(strategy) {
            *sum += own_reach * prob;
        }

        Ok(())
    }

    /// Store action labels for an info set (only stores if not already present).
    pub fn set_action_labels(&mut self, info_key: &str, labels: Vec<String>) {
        if let Some(entry) = self.entries.get_mut(info_key) {
            if entry.actions.is_empty() {
                entry.actions = labels;
            }
        }
    }

    /// Get the number of information sets stored.
    pub fn num_info_sets(&self) -> usize {
        self.entries.len()
    }

    /// Check if an info set exists in storage.
    pub fn contains(&self, info_key: &str) -> bool {
        self.entries.contains_key(info_key)
    }

    /// Visited info set keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Iterate over all entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &RegretEntry)> + '_ {
        self.entries.iter()
    }

    /// Clear all stored data.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Export storage to serializable format.
    pub fn export(&self) -> TableExport {
        TableExport {
            entries: self
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Replace the contents with a previously exported table.
    ///
    /// # Errors
    /// [`CfrError::Configuration`] if an entry's vectors differ in length.
    pub fn import(&mut self, data: TableExport) -> Result<()> {
        if let Some((key, _)) = data
            .entries
            .iter()
            .find(|(_, e)| e.regret_sum.len() != e.strategy_sum.len())
        {
            return Err(CfrError::configuration(format!(
                "info set {key}: regret and strategy sums differ in length"
            )));
        }
        self.entries = data.entries.into_iter().collect();
        Ok(())
    }
}

/// Serializable export format for storage, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableExport {
    /// Entries keyed by info set.
    pub entries: BTreeMap<String, RegretEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_distribution(probs: &[f64], len: usize) {
        assert_eq!(probs.len(), len);
        assert!(probs.iter().all(|&p| p >= 0.0));
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unseen_info_set_is_uniform() {
        let table = RegretTable::new();
        assert_eq!(table.current_strategy("x", 4), vec![0.25; 4]);
        assert_eq!(table.average_strategy("x", 4), vec![0.25; 4]);
        assert_eq!(table.num_info_sets(), 0);
    }

    #[test]
    fn test_zero_regret_is_exactly_uniform() {
        let mut table = RegretTable::new();
        table
            .accumulate("x", &[0.0, 0.0, 0.0], 1.0, &[0.2, 0.3, 0.5], 0.0)
            .unwrap();
        assert_eq!(table.current_strategy("x", 3), vec![1.0 / 3.0; 3]);
        // no own-reach weight yet either
        assert_eq!(table.average_strategy("x", 3), vec![1.0 / 3.0; 3]);
    }

    #[test]
    fn test_regret_matching_uses_positive_part() {
        let probs = regret_matching(&[3.0, -5.0, 1.0]);
        assert_eq!(probs, vec![0.75, 0.0, 0.25]);
        assert_distribution(&probs, 3);

        assert_eq!(regret_matching(&[-1.0, -2.0]), vec![0.5, 0.5]);
    }

    #[test]
    fn test_accumulate_weights_by_reach() {
        let mut table = RegretTable::new();
        table
            .accumulate("k", &[1.0, -1.0], 0.5, &[0.25, 0.75], 2.0)
            .unwrap();
        table
            .accumulate("k", &[2.0, 0.0], 1.0, &[1.0, 0.0], 1.0)
            .unwrap();

        let entry = table.get("k").unwrap();
        assert_eq!(entry.regret_sum, vec![2.5, -0.5]);
        assert_eq!(entry.strategy_sum, vec![1.5, 1.5]);
        assert_eq!(table.current_strategy("k", 2), vec![1.0, 0.0]);
        assert_eq!(table.average_strategy("k", 2), vec![0.5, 0.5]);
    }

    #[test]
    fn test_accumulate_rejects_action_count_mismatch() {
        let mut table = RegretTable::new();
        table.accumulate("k", &[1.0, 1.0], 1.0, &[0.5, 0.5], 1.0).unwrap();

        let err = table
            .accumulate("k", &[1.0, 1.0, 1.0], 1.0, &[0.3, 0.3, 0.4], 1.0)
            .unwrap_err();
        assert!(matches!(err, CfrError::Configuration(_)));

        let err = table.accumulate("j", &[1.0], 1.0, &[0.5, 0.5], 1.0).unwrap_err();
        assert!(matches!(err, CfrError::Configuration(_)));
        assert!(!table.contains("j"));
    }

    #[test]
    fn test_action_labels_are_kept_once() {
        let mut table = RegretTable::new();
        table.accumulate("k", &[0.0, 0.0], 1.0, &[0.5, 0.5], 1.0).unwrap();
        table.set_action_labels("k", vec!["PASS".into(), "BET".into()]);
        table.set_action_labels("k", vec!["X".into(), "Y".into()]);
        assert_eq!(table.get("k").unwrap().actions, vec!["PASS", "BET"]);
    }

    #[test]
    fn test_export_import() {
        let mut table = RegretTable::with_capacity(4);
        table.accumulate("b", &[1.0, 0.0], 1.0, &[0.5, 0.5], 1.0).unwrap();
        table.accumulate("a", &[0.0, 2.0], 1.0, &[0.5, 0.5], 1.0).unwrap();

        let export = table.export();
        assert_eq!(
            export.entries.keys().cloned().collect::<Vec<_>>(),
            vec!["a".to_string(), "b".to_string()]
        );

        let mut restored = RegretTable::new();
        restored.import(export.clone()).unwrap();
        assert_eq!(restored.export(), export);
        assert_eq!(restored.keys(), vec!["a", "b"]);

        let mut broken = export;
        broken.entries.get_mut("a").unwrap().strategy_sum.push(0.0);
        assert!(RegretTable::new().import(broken).is_err());
    }
}
