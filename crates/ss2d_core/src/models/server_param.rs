//! Simulator physical constants
//!
//! Defaults mirror the stock simulator configuration. Updates arrive as whole
//! replacement structs between cycles.

use crate::engine::geom::{Rect2, Vec2};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Process-wide stock parameters, used before the first update arrives.
pub static STOCK_SERVER_PARAM: Lazy<ServerParam> = Lazy::new(ServerParam::default);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerParam {
    // === Field ===
    pub pitch_half_length: f64,
    pub pitch_half_width: f64,
    pub pitch_margin: f64,
    pub goal_width: f64,
    pub penalty_area_length: f64,
    pub penalty_area_half_width: f64,
    pub goal_area_length: f64,
    pub goal_area_width: f64,
    pub center_circle_r: f64,

    // === Ball ===
    pub ball_size: f64,
    pub ball_decay: f64,
    pub ball_speed_max: f64,
    pub ball_accel_max: f64,

    // === Player ===
    pub player_size: f64,
    pub kickable_margin: f64,
    pub catch_area_l: f64,
    pub catch_area_w: f64,
    pub max_power: f64,
    pub min_dash_power: f64,
    pub max_dash_power: f64,
    pub max_moment: f64,
    pub max_tackle_power: f64,
    pub max_back_tackle_power: f64,

    // === Stamina ===
    pub stamina_max: f64,
    pub recover_dec_thr: f64,

    // === Rules ===
    pub drop_ball_time: u32,
    pub pen_dist_x: f64,
    pub pen_max_goalie_dist_x: f64,
    pub pen_allow_mult_kicks: bool,
    pub pen_ready_wait: u32,
    pub pen_taken_wait: u32,
    pub use_offside: bool,
    pub kickoff_offside: bool,
    /// Length of one half in seconds (ten cycles each).
    pub half_time: u32,
    pub nr_normal_halfs: u32,
}

impl Default for ServerParam {
    fn default() -> Self {
        Self {
            pitch_half_length: 52.5,
            pitch_half_width: 34.0,
            pitch_margin: 5.0,
            goal_width: 14.02,
            penalty_area_length: 16.5,
            penalty_area_half_width: 20.16,
            goal_area_length: 5.5,
            goal_area_width: 18.32,
            center_circle_r: 9.15,

            ball_size: 0.085,
            ball_decay: 0.94,
            ball_speed_max: 3.0,
            ball_accel_max: 2.7,

            player_size: 0.3,
            kickable_margin: 0.7,
            catch_area_l: 1.2,
            catch_area_w: 1.0,
            max_power: 100.0,
            min_dash_power: -100.0,
            max_dash_power: 100.0,
            max_moment: 180.0,
            max_tackle_power: 100.0,
            max_back_tackle_power: 0.0,

            stamina_max: 8000.0,
            recover_dec_thr: 0.3,

            drop_ball_time: 100,
            pen_dist_x: 11.0,
            pen_max_goalie_dist_x: 14.0,
            pen_allow_mult_kicks: true,
            pen_ready_wait: 10,
            pen_taken_wait: 150,
            use_offside: true,
            kickoff_offside: true,
            half_time: 300,
            nr_normal_halfs: 2,
        }
    }
}

impl ServerParam {
    /// Radius within which a goalkeeper can catch the ball.
    pub fn catchable_area(&self) -> f64 {
        (self.catch_area_l.powi(2) + (self.catch_area_w * 0.5).powi(2)).sqrt()
    }

    /// Stamina level below which recovery starts to decay.
    pub fn recover_dec_thr_value(&self) -> f64 {
        self.recover_dec_thr * self.stamina_max
    }

    pub fn our_penalty_area_line_x(&self) -> f64 {
        -self.pitch_half_length + self.penalty_area_length
    }

    pub fn their_penalty_area_line_x(&self) -> f64 {
        self.pitch_half_length - self.penalty_area_length
    }

    pub fn our_goal(&self) -> Vec2 {
        Vec2::new(-self.pitch_half_length, 0.0)
    }

    pub fn their_goal(&self) -> Vec2 {
        Vec2::new(self.pitch_half_length, 0.0)
    }

    pub fn our_penalty_area(&self) -> Rect2 {
        Rect2::from_corners(
            Vec2::new(-self.pitch_half_length, -self.penalty_area_half_width),
            Vec2::new(self.our_penalty_area_line_x(), self.penalty_area_half_width),
        )
    }

    pub fn their_penalty_area(&self) -> Rect2 {
        Rect2::from_corners(
            Vec2::new(self.their_penalty_area_line_x(), -self.penalty_area_half_width),
            Vec2::new(self.pitch_half_length, self.penalty_area_half_width),
        )
    }

    /// Cycle count of regular time.
    pub fn normal_time_cycles(&self) -> u32 {
        self.nr_normal_halfs * self.half_time * 10
    }

    /// Playing field without the outer margin.
    pub fn pitch(&self) -> Rect2 {
        Rect2::from_corners(
            Vec2::new(-self.pitch_half_length, -self.pitch_half_width),
            Vec2::new(self.pitch_half_length, self.pitch_half_width),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_values() {
        let sp = ServerParam::default();
        assert!((sp.catchable_area() - 1.3).abs() < 1e-9);
        assert!((sp.our_penalty_area_line_x() + 36.0).abs() < 1e-9);
        assert!((sp.recover_dec_thr_value() - 2400.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let sp: ServerParam = serde_json::from_str(r#"{"ball_decay": 0.96}"#).unwrap();
        assert!((sp.ball_decay - 0.96).abs() < 1e-12);
        assert!((sp.pitch_half_length - 52.5).abs() < 1e-12, "untouched fields keep defaults");
    }

    #[test]
    fn test_penalty_area_contains() {
        let sp = ServerParam::default();
        assert!(sp.our_penalty_area().contains(Vec2::new(-45.0, 5.0)));
        assert!(!sp.our_penalty_area().contains(Vec2::new(-30.0, 5.0)));
        assert!(sp.their_penalty_area().contains(Vec2::new(45.0, -5.0)));
    }
}
