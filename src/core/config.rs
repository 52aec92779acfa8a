//! Game configuration.
//!
//! Every rule constant the engine uses lives in `GameConfig`: starting money,
//! square rewards, project fees, the estate level count, snapshot depth and
//! the safety limits. The defaults are the standard rule set; tests and the
//! command line tweak individual values through the builder methods.

use serde::{Deserialize, Serialize};

/// Number of fee levels on a standard estate.
pub const DEFAULT_ESTATE_LEVELS: usize = 4;

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Money every player starts with.
    pub initial_money: i64,

    /// Seed for the dice.
    pub seed: u64,

    /// Bonus for each lap past the start line.
    pub start_bonus: i64,

    /// Reward for landing on the park.
    pub park_reward: i64,

    /// Tax charged per owned estate.
    pub tax_per_estate: i64,

    /// Stock exchange: base payout, plus this much again per owned project.
    pub stock_unit: i64,

    /// Nuclear plant: base fee, plus this much per visitor estate level.
    pub nuclear_unit: i64,

    /// Sewerage: base fee, plus this much per three visitor estates.
    pub sewerage_unit: i64,

    /// Transportation fees indexed by (carriers owned - 1).
    pub transportation_fees: Vec<i64>,

    /// Fee for jumping with somebody else's carrier.
    pub transit_fee: i64,

    /// Builder owner's reward whenever any estate is upgraded.
    pub builder_reward: i64,

    /// Tv station owner's reward whenever news or luck is drawn.
    pub tv_reward: i64,

    /// Number of fee levels an estate has.
    pub estate_levels: usize,

    /// Turns a player is held in prison.
    pub prison_stay: u32,

    /// Number of round snapshots kept for rollback.
    pub rollback_depth: usize,

    /// Deep snapshots also rewind the dice.
    pub deep_snapshots: bool,

    /// Rounds after which the game is stopped as a draw. `None` = unlimited.
    pub max_rounds: Option<u32>,

    /// Maximum nesting of event dispatches before the engine gives up.
    pub max_dispatch_depth: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_money: 20_000,
            seed: 42,
            start_bonus: 4000,
            park_reward: 300,
            tax_per_estate: 300,
            stock_unit: 500,
            nuclear_unit: 500,
            sewerage_unit: 500,
            transportation_fees: vec![500, 1000, 2000],
            transit_fee: 500,
            builder_reward: 300,
            tv_reward: 300,
            estate_levels: DEFAULT_ESTATE_LEVELS,
            prison_stay: 1,
            rollback_depth: 5,
            deep_snapshots: true,
            max_rounds: Some(1000),
            max_dispatch_depth: 64,
        }
    }
}

impl GameConfig {
    /// Create the standard configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the starting money.
    #[must_use]
    pub fn with_initial_money(mut self, money: i64) -> Self {
        assert!(money > 0, "Initial money must be positive");
        self.initial_money = money;
        self
    }

    /// Set the dice seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the start line bonus.
    #[must_use]
    pub fn with_start_bonus(mut self, bonus: i64) -> Self {
        self.start_bonus = bonus;
        self
    }

    /// Set the number of snapshots kept for rollback.
    #[must_use]
    pub fn with_rollback_depth(mut self, depth: usize) -> Self {
        assert!(depth > 0, "Rollback depth must be at least 1");
        self.rollback_depth = depth;
        self
    }

    /// Choose whether snapshots also capture the dice.
    #[must_use]
    pub fn with_deep_snapshots(mut self, deep: bool) -> Self {
        self.deep_snapshots = deep;
        self
    }

    /// Set the round cap.
    #[must_use]
    pub fn with_max_rounds(mut self, rounds: Option<u32>) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Set the builder reward.
    #[must_use]
    pub fn with_builder_reward(mut self, reward: i64) -> Self {
        self.builder_reward = reward;
        self
    }

    /// Set the tv station reward.
    #[must_use]
    pub fn with_tv_reward(mut self, reward: i64) -> Self {
        self.tv_reward = reward;
        self
    }

    /// Set the transportation fee table, indexed by carriers owned minus one.
    #[must_use]
    pub fn with_transportation_fees(mut self, fees: Vec<i64>) -> Self {
        assert!(!fees.is_empty(), "Transportation fee table must not be empty");
        self.transportation_fees = fees;
        self
    }

    /// Transportation fee for an owner holding `owned` carriers.
    ///
    /// Counts past the end of the table use the last entry.
    #[must_use]
    pub fn transportation_fee(&self, owned: usize) -> i64 {
        assert!(owned > 0, "Transportation fee needs at least one carrier");
        assert!(
            !self.transportation_fees.is_empty(),
            "Transportation fee table must not be empty"
        );
        let index = (owned - 1).min(self.transportation_fees.len() - 1);
        self.transportation_fees[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.initial_money, 20_000);
        assert_eq!(config.start_bonus, 4000);
        assert_eq!(config.estate_levels, 4);
        assert_eq!(config.prison_stay, 1);
        assert_eq!(config.rollback_depth, 5);
        assert!(config.deep_snapshots);
    }

    #[test]
    fn test_builder() {
        let config = GameConfig::new()
            .with_initial_money(5000)
            .with_seed(7)
            .with_rollback_depth(3)
            .with_deep_snapshots(false)
            .with_max_rounds(None);

        assert_eq!(config.initial_money, 5000);
        assert_eq!(config.seed, 7);
        assert_eq!(config.rollback_depth, 3);
        assert!(!config.deep_snapshots);
        assert_eq!(config.max_rounds, None);
    }

    #[test]
    fn test_transportation_fee_table() {
        let config = GameConfig::default();
        assert_eq!(config.transportation_fee(1), 500);
        assert_eq!(config.transportation_fee(2), 1000);
        assert_eq!(config.transportation_fee(3), 2000);
        assert_eq!(config.transportation_fee(4), 2000);
    }

    #[test]
    fn test_custom_transportation_fees() {
        let config = GameConfig::new().with_transportation_fees(vec![700]);
        assert_eq!(config.transportation_fee(1), 700);
        assert_eq!(config.transportation_fee(3), 700);
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn test_empty_transportation_fees() {
        let _ = GameConfig::new().with_transportation_fees(Vec::new());
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn test_fee_lookup_on_emptied_table() {
        let mut config = GameConfig::new();
        config.transportation_fees.clear();
        let _ = config.transportation_fee(1);
    }

    #[test]
    #[should_panic(expected = "Initial money must be positive")]
    fn test_zero_initial_money() {
        let _ = GameConfig::new().with_initial_money(0);
    }

    #[test]
    fn test_config_serialization() {
        let config = GameConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
