//! Kuhn Poker implementation for CFR validation.
//!
//! Kuhn Poker is a simplified poker game used to validate CFR implementations
//! because it has a known, mathematically proven Nash equilibrium.
//!
//! ## Game Rules
//!
//! - 3 cards: Jack, Queen, King
//! - 2 players, each antes 1 chip
//! - Chance deals one card to each player (6 equally likely deals)
//! - Player 1 acts first: Pass or Bet (1 chip)
//! - The game ends after two passes or two bets, not necessarily consecutive
//! - Higher card wins at showdown
//!
//! ## Game Tree
//!
//! ```text
//! Deal (chance)
//! └── P1
//!     ├── Pass
//!     │   └── P2
//!     │       ├── Pass → Showdown (±1)
//!     │       └── Bet
//!     │           └── P1
//!     │               ├── Pass → P2 wins (+1)
//!     │               └── Bet → Showdown (±2)
//!     └── Bet
//!         └── P2
//!             ├── Pass → P1 wins (+1)
//!             └── Bet → Showdown (±2)
//! ```
//!
//! ## Information sets
//!
//! A player sees their own card and the public actions. With four decision
//! points and three cards there are 12 information sets, each holding the two
//! deals that differ only in the opponent's card. Keys are the card followed
//! by the public actions, e.g. `"Q:pb"`.
//!
//! ## Known Nash Equilibrium
//!
//! - **Player 1 with Jack**: Bet with probability α ∈ [0, 1/3]
//! - **Player 1 with Queen**: Always Pass; call a bet with probability α + 1/3
//! - **Player 1 with King**: Bet with probability 3α
//! - **Player 2 facing Bet with Jack**: Always Fold
//! - **Player 2 facing Bet with Queen**: Call with probability 1/3
//! - **Player 2 facing Bet with King**: Always Call
//!
//! **Expected Value**: Player 1 EV = -1/18 ≈ -0.0556

use std::fmt;

use rand::Rng;

use crate::cfr::error::{CfrError, Result};
use crate::cfr::game::{Game, GameHistory, Move, Payoffs, Turn};
use crate::impl_action;

/// Cards, ordered by rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Card {
    /// Lowest card.
    Jack,
    /// Middle card.
    Queen,
    /// Highest card.
    King,
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Jack => write!(f, "J"),
            Card::Queen => write!(f, "Q"),
            Card::King => write!(f, "K"),
        }
    }
}

/// Chance outcome: player 1's card, then player 2's card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Deal {
    /// P1 Jack, P2 Queen.
    JQ,
    /// P1 Jack, P2 King.
    JK,
    /// P1 Queen, P2 Jack.
    QJ,
    /// P1 Queen, P2 King.
    QK,
    /// P1 King, P2 Jack.
    KJ,
    /// P1 King, P2 Queen.
    KQ,
}

impl Deal {
    /// Every deal, each with probability 1/6.
    pub const ALL: [Deal; 6] = [Deal::JQ, Deal::JK, Deal::QJ, Deal::QK, Deal::KJ, Deal::KQ];

    /// Cards of player 1 and player 2.
    pub fn cards(self) -> [Card; 2] {
        use Card::*;
        match self {
            Deal::JQ => [Jack, Queen],
            Deal::JK => [Jack, King],
            Deal::QJ => [Queen, Jack],
            Deal::QK => [Queen, King],
            Deal::KJ => [King, Jack],
            Deal::KQ => [King, Queen],
        }
    }

    /// Payoffs of a showdown for `stake` chips.
    fn showdown(self, stake: f64) -> Payoffs {
        let [first, second] = self.cards();
        if first > second {
            vec![stake, -stake]
        } else {
            vec![-stake, stake]
        }
    }
}

impl fmt::Display for Deal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [first, second] = self.cards();
        write!(f, "{first}{second}")
    }
}

/// Actions in Kuhn Poker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KuhnAction {
    /// Pass (check if no bet, fold if facing bet)
    Pass,
    /// Bet (or call if facing bet)
    Bet,
}

impl KuhnAction {
    /// Both actions, in action order.
    pub const ALL: [KuhnAction; 2] = [KuhnAction::Pass, KuhnAction::Bet];

    fn code(self) -> char {
        match self {
            KuhnAction::Pass => 'p',
            KuhnAction::Bet => 'b',
        }
    }
}

impl fmt::Display for KuhnAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KuhnAction::Pass => write!(f, "PASS"),
            KuhnAction::Bet => write!(f, "BET"),
        }
    }
}

impl_action!(Card, Deal, KuhnAction);

/// How a hand ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// Both checked; showdown for the antes.
    PassPass,
    /// Bet and call; showdown for 2.
    BetBet,
    /// Player 2 folded to a bet.
    BetPass,
    /// Player 1 folded to a bet after checking.
    PassBetPass,
    /// Check, bet, call; showdown for 2.
    PassBetBet,
}

/// Position in the game tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Deal,
    Open(Deal),
    Passed(Deal),
    Bet(Deal),
    PassBet(Deal),
    Over(Deal, Ending),
}

impl Node {
    fn step(self, m: &Move<KuhnAction, Deal>) -> Option<Node> {
        use KuhnAction::{Bet, Pass};
        let next = match (self, m) {
            (Node::Deal, Move::Chance(deal)) => Node::Open(*deal),
            (Node::Open(d), Move::Play(Pass)) => Node::Passed(d),
            (Node::Open(d), Move::Play(Bet)) => Node::Bet(d),
            (Node::Passed(d), Move::Play(Pass)) => Node::Over(d, Ending::PassPass),
            (Node::Passed(d), Move::Play(Bet)) => Node::PassBet(d),
            (Node::Bet(d), Move::Play(Pass)) => Node::Over(d, Ending::BetPass),
            (Node::Bet(d), Move::Play(Bet)) => Node::Over(d, Ending::BetBet),
            (Node::PassBet(d), Move::Play(Pass)) => Node::Over(d, Ending::PassBetPass),
            (Node::PassBet(d), Move::Play(Bet)) => Node::Over(d, Ending::PassBetBet),
            _ => return None,
        };
        Some(next)
    }

    fn actor(self) -> Option<Turn> {
        match self {
            Node::Deal => Some(Turn::Chance),
            Node::Open(_) | Node::PassBet(_) => Some(Turn::Player(0)),
            Node::Passed(_) | Node::Bet(_) => Some(Turn::Player(1)),
            Node::Over(..) => None,
        }
    }

    fn deal(self) -> Option<Deal> {
        match self {
            Node::Deal => None,
            Node::Open(d) | Node::Passed(d) | Node::Bet(d) | Node::PassBet(d) | Node::Over(d, _) => {
                Some(d)
            }
        }
    }
}

/// Kuhn Poker game.
#[derive(Debug, Clone, Copy, Default)]
pub struct KuhnPoker;

impl KuhnPoker {
    /// Create a new Kuhn Poker game.
    pub fn new() -> Self {
        Self
    }

    fn walk(&self, history: &GameHistory<Self>) -> Result<Node> {
        history.moves().iter().try_fold(Node::Deal, |node, m| {
            node.step(m)
                .ok_or_else(|| CfrError::invalid_history(history, format!("{m} not allowed here")))
        })
    }

    /// How the hand ended, if it has.
    pub fn ending(&self, history: &GameHistory<Self>) -> Option<Ending> {
        match self.walk(history) {
            Ok(Node::Over(_, ending)) => Some(ending),
            _ => None,
        }
    }
}

impl Game for KuhnPoker {
    type Action = KuhnAction;
    type Chance = Deal;

    fn name(&self) -> &'static str {
        "kuhn-poker"
    }

    fn num_players(&self) -> usize {
        2
    }

    fn has_chance_player(&self) -> bool {
        true
    }

    fn is_zero_sum(&self) -> bool {
        true
    }

    fn is_terminal(&self, history: &GameHistory<Self>) -> bool {
        self.ending(history).is_some()
    }

    fn active_player(&self, history: &GameHistory<Self>) -> Result<Turn> {
        self.walk(history)?
            .actor()
            .ok_or_else(|| CfrError::invalid_history(history, "hand is over"))
    }

    fn legal_actions(&self, history: &GameHistory<Self>) -> Result<Vec<KuhnAction>> {
        match self.active_player(history)? {
            Turn::Player(_) => Ok(KuhnAction::ALL.to_vec()),
            Turn::Chance => Err(CfrError::invalid_history(history, "cards not dealt yet")),
        }
    }

    fn payoffs(&self, history: &GameHistory<Self>) -> Result<Payoffs> {
        let Ok(Node::Over(deal, ending)) = self.walk(history) else {
            return Err(CfrError::unrecognized_terminal(history));
        };
        Ok(match ending {
            Ending::PassPass => deal.showdown(1.0),
            Ending::BetBet | Ending::PassBetBet => deal.showdown(2.0),
            Ending::BetPass => vec![1.0, -1.0],
            Ending::PassBetPass => vec![-1.0, 1.0],
        })
    }

    fn info_key(&self, history: &GameHistory<Self>) -> Result<String> {
        let node = self.walk(history)?;
        let (Some(Turn::Player(player)), Some(deal)) = (node.actor(), node.deal()) else {
            return Err(CfrError::invalid_history(history, "not a player decision"));
        };
        let public: String = history.plays().map(|a| a.code()).collect();
        Ok(format!("{}:{}", deal.cards()[player], public))
    }

    fn chance_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Deal> {
        Ok(Deal::ALL[rng.gen_range(0..Deal::ALL.len())])
    }

    fn chance_outcomes(&self) -> Vec<(Deal, f64)> {
        let prob = 1.0 / Deal::ALL.len() as f64;
        Deal::ALL.iter().map(|&d| (d, prob)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfr::tree::{infoset_histories, reachable_histories};
    use crate::cfr::History;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hand(deal: Deal, actions: &[KuhnAction]) -> GameHistory<KuhnPoker> {
        let mut history = History::root().with_chance(deal);
        for &a in actions {
            history = history.with_play(a);
        }
        history
    }

    use KuhnAction::{Bet, Pass};

    #[test]
    fn test_kuhn_game_tree() {
        let game = KuhnPoker::new();

        let root = History::root();
        assert!(!game.is_terminal(&root));
        assert_eq!(game.active_player(&root).unwrap(), Turn::Chance);
        assert!(game.legal_actions(&root).is_err());

        let dealt = hand(Deal::KJ, &[]);
        assert!(!game.is_terminal(&dealt));
        assert_eq!(game.active_player(&dealt).unwrap(), Turn::Player(0));
        assert_eq!(game.legal_actions(&dealt).unwrap(), vec![Pass, Bet]);

        assert_eq!(game.active_player(&hand(Deal::KJ, &[Pass])).unwrap(), Turn::Player(1));
        assert_eq!(game.active_player(&hand(Deal::KJ, &[Bet])).unwrap(), Turn::Player(1));
        assert_eq!(game.active_player(&hand(Deal::KJ, &[Pass, Bet])).unwrap(), Turn::Player(0));
    }

    #[test]
    fn test_terminal_sequences() {
        let game = KuhnPoker::new();
        let terminal: Vec<Vec<KuhnAction>> = vec![
            vec![Pass, Pass],
            vec![Bet, Bet],
            vec![Bet, Pass],
            vec![Pass, Bet, Pass],
            vec![Pass, Bet, Bet],
        ];

        for history in reachable_histories(&game).unwrap() {
            let actions: Vec<KuhnAction> = history.plays().copied().collect();
            assert_eq!(
                game.is_terminal(&history),
                terminal.contains(&actions),
                "wrong terminal classification for [{history}]"
            );
        }
    }

    #[test]
    fn test_kuhn_terminal_payoffs() {
        let game = KuhnPoker::new();

        // both pass, higher card wins the antes
        assert_eq!(game.payoffs(&hand(Deal::KJ, &[Pass, Pass])).unwrap(), vec![1.0, -1.0]);
        assert_eq!(game.payoffs(&hand(Deal::JQ, &[Pass, Pass])).unwrap(), vec![-1.0, 1.0]);

        // bet, fold
        assert_eq!(game.payoffs(&hand(Deal::JK, &[Bet, Pass])).unwrap(), vec![1.0, -1.0]);
        assert_eq!(game.payoffs(&hand(Deal::KJ, &[Pass, Bet, Pass])).unwrap(), vec![-1.0, 1.0]);

        // bet, call
        assert_eq!(game.payoffs(&hand(Deal::JK, &[Bet, Bet])).unwrap(), vec![-2.0, 2.0]);
        assert_eq!(game.payoffs(&hand(Deal::QJ, &[Pass, Bet, Bet])).unwrap(), vec![2.0, -2.0]);
    }

    #[test]
    fn test_zero_sum_everywhere() {
        let game = KuhnPoker::new();
        for history in reachable_histories(&game).unwrap() {
            if game.is_terminal(&history) {
                let payoffs = game.payoffs(&history).unwrap();
                assert_eq!(payoffs[0] + payoffs[1], 0.0, "[{history}]");
            }
        }
    }

    #[test]
    fn test_kuhn_info_states() {
        let game = KuhnPoker::new();

        // Player 2 holds the king and sees a pass
        assert_eq!(game.info_key(&hand(Deal::QK, &[Pass])).unwrap(), "K:p");
        assert_eq!(game.info_key(&hand(Deal::JK, &[Pass])).unwrap(), "K:p");
        assert_eq!(game.info_key(&hand(Deal::QK, &[])).unwrap(), "Q:");
        assert_eq!(game.info_key(&hand(Deal::QJ, &[Pass, Bet])).unwrap(), "Q:pb");

        assert!(game.info_key(&History::root()).is_err());
        assert!(game.info_key(&hand(Deal::QJ, &[Bet, Bet])).is_err());
    }

    #[test]
    fn test_twelve_infosets_of_two_histories() {
        let groups = infoset_histories(&KuhnPoker::new()).unwrap();
        assert_eq!(groups.len(), 12);

        for ((player, key), histories) in &groups {
            assert_eq!(histories.len(), 2, "{key} has {} histories", histories.len());
            // the two histories differ only in the opponent's card
            let opponent = 1 - player;
            let [a, b] = [&histories[0], &histories[1]];
            assert_eq!(a.plays().collect::<Vec<_>>(), b.plays().collect::<Vec<_>>());
            let deal = |h: &GameHistory<KuhnPoker>| *h.chances().next().unwrap();
            assert_eq!(deal(a).cards()[*player], deal(b).cards()[*player]);
            assert_ne!(deal(a).cards()[opponent], deal(b).cards()[opponent]);
        }

        let keys: Vec<&str> = groups.keys().map(|(_, k)| k.as_str()).collect();
        for card in ["J", "Q", "K"] {
            for public in ["", "p", "b", "pb"] {
                assert!(keys.contains(&format!("{card}:{public}").as_str()));
            }
        }
    }

    #[test]
    fn test_invalid_histories() {
        let game = KuhnPoker::new();

        let acting_before_deal: GameHistory<KuhnPoker> = History::root().with_play(Bet);
        assert!(!game.is_terminal(&acting_before_deal));
        assert!(matches!(
            game.active_player(&acting_before_deal),
            Err(CfrError::InvalidHistory { .. })
        ));

        let over = hand(Deal::KQ, &[Bet, Bet]);
        assert!(matches!(game.active_player(&over), Err(CfrError::InvalidHistory { .. })));
        assert!(!game.is_terminal(&over.with_play(Pass)));

        assert!(matches!(
            game.payoffs(&hand(Deal::KQ, &[Pass, Bet])),
            Err(CfrError::UnrecognizedTerminalHistory { .. })
        ));
    }

    #[test]
    fn test_chance_draws_every_deal() {
        let game = KuhnPoker::new();
        let mut rng = StdRng::seed_from_u64(0);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(game.chance_action(&mut rng).unwrap());
        }
        assert_eq!(seen.len(), 6);

        let total: f64 = game.chance_outcomes().iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_history_display() {
        assert_eq!(hand(Deal::KJ, &[Pass, Bet]).to_string(), "KJ-PASS-BET");
    }
}
