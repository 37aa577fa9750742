//! Read-only bundle handed to every evaluator for one decision pass

use super::config::TacticsConfig;
use super::geom::{Sector2, Vec2};
use super::kinematics::final_point;
use super::reach::InterceptTable;
use super::strategy::PositionStrategy;
use crate::models::player_type::{PlayerTypeEntry, PlayerTypeTable};
use crate::models::server_param::ServerParam;
use crate::models::world::{PlayerObject, WorldSnapshot};

/// Everything an evaluator may look at. Nothing here is mutable.
pub struct DecisionContext<'a> {
    pub wm: &'a WorldSnapshot,
    pub sp: &'a ServerParam,
    pub types: &'a PlayerTypeTable,
    pub intercept: &'a InterceptTable,
    pub strategy: &'a dyn PositionStrategy,
    pub config: &'a TacticsConfig,
}

impl<'a> DecisionContext<'a> {
    pub fn self_type(&self) -> &'a PlayerTypeEntry {
        self.types.get(self.wm.me.player_type_id)
    }

    pub fn ball(&self) -> Vec2 {
        self.wm.ball.position
    }

    pub fn ball_vel(&self) -> Vec2 {
        self.wm.ball.velocity
    }

    pub fn self_pos(&self) -> Vec2 {
        self.wm.me.position
    }

    pub fn home_position(&self) -> Vec2 {
        self.strategy.position(self.wm.me.unum)
    }

    pub fn exists_opponent_in(&self, sector: &Sector2) -> bool {
        self.wm.valid_opponents().any(|o| sector.contains(o.position))
    }

    /// Where `p` comes to rest if it stops dashing now.
    pub fn player_final_point(&self, p: &PlayerObject) -> Vec2 {
        let decay = self.types.get(p.player_type_id).player_type.player_decay;
        final_point(p.position, p.velocity, decay)
    }

    pub fn self_final_point(&self) -> Vec2 {
        final_point(self.wm.me.position, self.wm.me.velocity, self.self_type().player_type.player_decay)
    }

    /// Largest dash not dipping below the recovery-decay threshold.
    pub fn safety_dash_power(&self, dash_power: f64) -> f64 {
        let required = if dash_power > 0.0 { dash_power } else { dash_power * -2.0 };
        let available = (self.wm.me.stamina - self.sp.recover_dec_thr_value() - 1.0).max(0.0);
        let mut result = required.min(available);
        if dash_power < 0.0 {
            result *= -0.5;
        }
        if result.abs() > dash_power.abs() {
            dash_power
        } else {
            result
        }
    }

    /// Cycles elapsed since the current restart was awarded.
    pub fn real_set_play_count(&self) -> u32 {
        self.wm.cycle.saturating_sub(self.wm.last_set_play_start_time)
    }

    pub fn our_goalie_unum(&self) -> Option<i32> {
        if self.wm.me.is_goalie {
            return Some(self.wm.me.unum as i32);
        }
        self.wm
            .valid_teammates()
            .find(|p| p.is_goalie && p.has_unum())
            .map(|p| p.unum)
    }

    /// Teammates ordered by distance to the ball.
    pub fn teammates_from_ball(&self) -> Vec<(&'a PlayerObject, f64)> {
        let ball = self.ball();
        let mut mates: Vec<_> = self.wm.valid_teammates().map(|p| (p, p.position.dist(ball))).collect();
        mates.sort_by(|a, b| a.1.total_cmp(&b.1));
        mates
    }

    pub fn teammate_nearest_to(&self, point: Vec2) -> Option<(&'a PlayerObject, f64)> {
        self.wm
            .valid_teammates()
            .map(|p| (p, p.position.dist(point)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Distance threshold growing with the ball distance.
    pub fn ball_dist_threshold(&self, ratio: f64, floor: f64) -> f64 {
        (self.wm.ball_dist_from_self() * ratio).max(floor)
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::test_fixtures::{Fixture, SnapshotBuilder};
    use crate::engine::geom::Vec2;

    #[test]
    fn test_safety_dash_power_limits_by_stamina() {
        let wm = SnapshotBuilder::new().stamina(2500.0).build();
        let fx = Fixture::new(wm);
        let ctx = fx.ctx();
        assert!((ctx.safety_dash_power(100.0) - 99.0).abs() < 1e-9);
        let fresh = Fixture::new(SnapshotBuilder::new().build());
        assert!((fresh.ctx().safety_dash_power(100.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_teammates_from_ball_sorted() {
        let wm = SnapshotBuilder::new()
            .ball_at(Vec2::new(10.0, 0.0))
            .teammate(2, Vec2::new(-10.0, 0.0))
            .teammate(3, Vec2::new(8.0, 0.0))
            .build();
        let fx = Fixture::new(wm);
        let order: Vec<i32> = fx.ctx().teammates_from_ball().iter().map(|(p, _)| p.unum).collect();
        assert_eq!(order, vec![3, 2]);
    }

    #[test]
    fn test_goalie_lookup() {
        let wm = SnapshotBuilder::new().goalie_teammate(1, Vec2::new(-50.0, 0.0)).build();
        assert_eq!(Fixture::new(wm).ctx().our_goalie_unum(), Some(1));
    }
}
