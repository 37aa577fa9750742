//! # Tactics Configuration
//!
//! Every tunable threshold used by the decision pass lives here so the
//! evaluators carry no magic numbers of their own.
//!
//! ## Presets
//! - `starter` (default): the stock starter team behavior
//! - `aggressive`: earlier tackles, longer dribbles, more forward passing
//! - `conservative`: stricter tackle gate, clears sooner, saves stamina
//!
//! ## Usage
//! ```rust
//! use ss2d_core::engine::config::TacticsConfig;
//!
//! let config = TacticsConfig::default();
//! let aggressive = TacticsConfig::aggressive();
//! assert!(aggressive.tackle.min_probability < config.tackle.min_probability);
//! ```
//!
//! ## Environment Variables
//!
//! - `SS2D_TACTICS_PROFILE`: Select preset (aggressive, conservative, starter)

mod behavior_config;
mod movement_config;

pub use behavior_config::{
    BlockConfig, ClearConfig, DribbleConfig, InterceptConfig, KickPlannerConfig, PassConfig,
    ShootConfig, TackleConfig,
};
pub use movement_config::{MovementConfig, ReachConfig, SetPlayConfig};

use serde::{Deserialize, Serialize};
use std::env;

/// Full tactics configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TacticsConfig {
    pub reach: ReachConfig,
    pub intercept: InterceptConfig,
    pub tackle: TackleConfig,
    pub block: BlockConfig,
    pub pass: PassConfig,
    pub dribble: DribbleConfig,
    pub shoot: ShootConfig,
    pub clear: ClearConfig,
    pub kick_planner: KickPlannerConfig,
    pub movement: MovementConfig,
    pub setplay: SetPlayConfig,
}

impl TacticsConfig {
    pub fn starter() -> Self {
        Self::default()
    }

    /// Press higher and keep the ball on the ground longer.
    pub fn aggressive() -> Self {
        let mut cfg = Self::default();
        cfg.tackle.min_probability = 0.7;
        cfg.tackle.opponent_lead = 2;
        cfg.intercept.near_reach = 4;
        cfg.kick_planner.pass_when_opponent_within = 4.0;
        cfg.dribble.radius = 4.0;
        cfg.shoot.max_dist = 16.0;
        cfg
    }

    /// Tackle only when certain and get rid of the ball early.
    pub fn conservative() -> Self {
        let mut cfg = Self::default();
        cfg.tackle.min_probability = 0.9;
        cfg.kick_planner.pass_when_opponent_within = 7.0;
        cfg.kick_planner.hold_when_opponent_beyond = 4.0;
        cfg.movement.recover_on_ratio = 0.6;
        cfg.movement.recover_off_ratio = 0.8;
        cfg
    }

    pub fn from_env_or_default() -> Self {
        match env::var("SS2D_TACTICS_PROFILE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "aggressive" => Self::aggressive(),
            "conservative" => Self::conservative(),
            _ => Self::default(),
        }
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = TacticsConfig::default();
        assert!((cfg.tackle.min_probability - 0.8).abs() < 1e-9);
        assert!((cfg.pass.max_dist - 30.0).abs() < 1e-9);
        assert_eq!(cfg.block.horizon, 40);
        assert_eq!(cfg.reach.unreachable, 1000);
    }

    #[test]
    fn test_presets_differ() {
        let starter = TacticsConfig::starter();
        let aggressive = TacticsConfig::aggressive();
        let conservative = TacticsConfig::conservative();
        assert!(aggressive.tackle.min_probability < starter.tackle.min_probability);
        assert!(conservative.tackle.min_probability > starter.tackle.min_probability);
        assert!(
            conservative.movement.recover_on_ratio > starter.movement.recover_on_ratio,
            "conservative enters recovery earlier"
        );
    }

    #[test]
    fn test_partial_json_override() {
        let cfg: TacticsConfig = serde_json::from_str(r#"{"pass": {"max_dist": 25.0}}"#).unwrap();
        assert!((cfg.pass.max_dist - 25.0).abs() < 1e-9);
        assert!((cfg.pass.sector_half_angle - 15.0).abs() < 1e-9, "other fields keep defaults");
        assert_eq!(cfg.shoot, ShootConfig::default());
    }
}
