//! Reach search, off-ball movement and restart placement parameters

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReachConfig {
    /// Last cycle examined by the reach search.
    pub max_cycle: u32,
    /// Sentinel reported when nobody gets there inside the horizon.
    pub unreachable: u32,
    pub control_area_buf: f64,
    /// Extra cycles a tackling actor needs before it can move again.
    pub tackle_penalty: u32,
    /// Body direction older than this is ignored by the turn model.
    pub stale_body_count: u32,
}

impl Default for ReachConfig {
    fn default() -> Self {
        Self {
            max_cycle: 100,
            unreachable: 1000,
            control_area_buf: 0.15,
            tackle_penalty: 5,
            stale_body_count: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Enter recovery below this share of max stamina.
    pub recover_on_ratio: f64,
    /// Leave recovery above this share of max stamina.
    pub recover_off_ratio: f64,
    /// Opponent-in-control distance that locks the gaze on the ball.
    pub attention_opponent_dist: f64,
    pub dist_thr_ratio: f64,
    pub min_dist_thr: f64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            recover_on_ratio: 0.5,
            recover_off_ratio: 0.7,
            attention_opponent_dist: 18.0,
            dist_thr_ratio: 0.1,
            min_dist_thr: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetPlayConfig {
    /// Slots considered for the kicker role.
    pub kicker_slots: u8,
    /// Cycle window for the hold / left / right evasion rotation.
    pub evade_window: u32,
    pub evade_length: f64,
    /// Keep-away radius from the ball during their restarts.
    pub their_keep_away: f64,
    pub dir_margin: f64,
}

impl Default for SetPlayConfig {
    fn default() -> Self {
        Self {
            kicker_slots: 3,
            evade_window: 60,
            evade_length: 3.0,
            their_keep_away: 11.0,
            dir_margin: 15.0,
        }
    }
}
