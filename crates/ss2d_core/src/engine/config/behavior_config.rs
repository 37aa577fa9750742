//! Thresholds for the individual evaluators

use serde::{Deserialize, Serialize};

/// Intercept gate for the no-ball cascade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterceptConfig {
    /// Always chase when self reaches within this many cycles (default: 3)
    pub near_reach: u32,
    /// Chase while the first opponent is at most this many cycles faster (default: 3)
    pub opponent_margin: u32,
}

impl Default for InterceptConfig {
    fn default() -> Self {
        Self {
            near_reach: 3,
            opponent_margin: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TackleConfig {
    pub min_probability: f64,
    /// Max |body| for a forward tackle; back tackles use `180 - body_threshold`.
    pub body_threshold: f64,
    /// An opponent at most this many cycles from the ball is about to play it.
    pub urgent_opponent_reach: u32,
    /// Opponent must beat self and teammates by this many cycles.
    pub opponent_lead: u32,
    /// Distance past our penalty area beyond which foul tackles are allowed.
    pub foul_line_buffer: f64,
    pub goal_guard_self_min: u32,
    pub goal_guard_dist: f64,
    pub goal_guard_facing: f64,
}

impl Default for TackleConfig {
    fn default() -> Self {
        Self {
            min_probability: 0.8,
            body_threshold: 80.0,
            urgent_opponent_reach: 2,
            opponent_lead: 3,
            foul_line_buffer: 0.5,
            goal_guard_self_min: 5,
            goal_guard_dist: 10.0,
            goal_guard_facing: 45.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    /// Cycles walked past the opponent's reach cycle.
    pub horizon: u32,
    /// Assumed dribble speed of the ball carrier.
    pub dribble_speed: f64,
    /// Uniform numbers up to this hold the defensive line.
    pub defender_max_unum: u8,
    /// Defenders ignore points this far beyond the offside line.
    pub defender_offside_buffer: f64,
    pub dist_thr: f64,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            horizon: 40,
            dribble_speed: 0.7,
            defender_max_unum: 5,
            defender_offside_buffer: 10.0,
            dist_thr: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassConfig {
    pub max_dist: f64,
    pub sector_min_r: f64,
    pub sector_extra_r: f64,
    pub sector_half_angle: f64,
    pub play_on_speed: f64,
    pub play_on_threshold: f64,
    pub play_on_steps: u32,
    pub restart_speed: f64,
    pub restart_threshold: f64,
    pub restart_steps: u32,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            max_dist: 30.0,
            sector_min_r: 1.0,
            sector_extra_r: 3.0,
            sector_half_angle: 15.0,
            play_on_speed: 2.5,
            play_on_threshold: 2.5,
            play_on_steps: 3,
            restart_speed: 2.7,
            restart_threshold: 0.0,
            restart_steps: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DribbleConfig {
    pub radius: f64,
    /// Candidate headings at bearing and ±spread.
    pub heading_spread: f64,
    pub sector_half_angle: f64,
    pub first_speed: f64,
    pub first_speed_threshold: f64,
    pub max_steps: u32,
}

impl Default for DribbleConfig {
    fn default() -> Self {
        Self {
            radius: 3.0,
            heading_spread: 30.0,
            sector_half_angle: 15.0,
            first_speed: 0.8,
            first_speed_threshold: 0.7,
            max_steps: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShootConfig {
    /// Max ball distance from the goal centre.
    pub max_dist: f64,
    /// Aim this far inside the far post.
    pub post_inset: f64,
    /// Minimum angular width of the goal mouth seen from the ball.
    pub min_goal_angle: f64,
    pub first_speed_threshold: f64,
    pub max_steps: u32,
}

impl Default for ShootConfig {
    fn default() -> Self {
        Self {
            max_dist: 12.0,
            post_inset: 0.2,
            min_goal_angle: 8.0,
            first_speed_threshold: 0.1,
            max_steps: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearConfig {
    pub first_speed: f64,
    pub first_speed_threshold: f64,
    pub max_steps: u32,
}

impl Default for ClearConfig {
    fn default() -> Self {
        Self {
            first_speed: 2.7,
            first_speed_threshold: 2.7,
            max_steps: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KickPlannerConfig {
    /// Pass is considered only with an opponent at least this close.
    pub pass_when_opponent_within: f64,
    /// Hold is considered only when every opponent is farther than this.
    pub hold_when_opponent_beyond: f64,
}

impl Default for KickPlannerConfig {
    fn default() -> Self {
        Self {
            pass_when_opponent_within: 5.0,
            hold_when_opponent_beyond: 2.5,
        }
    }
}
