//! Clearance toward the touchline or away from our goal mouth

use super::Behavior;
use crate::engine::action_queue::Action;
use crate::engine::context::DecisionContext;
use crate::engine::geom::Vec2;
use crate::models::server_param::ServerParam;

/// Where a clearance from `ball` should go.
pub fn clear_target(sp: &ServerParam, ball: Vec2) -> Vec2 {
    let side = if ball.y > 0.0 { 1.0 } else { -1.0 };
    if ball.x > -25.0 {
        Vec2::new(0.0, side * sp.pitch_half_width)
    } else if ball.abs_y() < 10.0 && ball.x < -10.0 {
        Vec2::new(-sp.pitch_half_length, side * 20.0)
    } else {
        Vec2::new(ball.x, side * sp.pitch_half_width)
    }
}

pub struct ClearBehavior;

impl Behavior for ClearBehavior {
    fn name(&self) -> &'static str {
        "clear"
    }

    fn evaluate(&self, ctx: &DecisionContext) -> Option<Vec<Action>> {
        let cfg = &ctx.config.clear;
        let target = clear_target(ctx.sp, ctx.ball());
        log::debug!("clear: to ({:.2}, {:.2})", target.x, target.y);
        Some(vec![Action::SmartKick {
            target,
            first_speed: cfg.first_speed,
            first_speed_threshold: cfg.first_speed_threshold,
            max_steps: cfg.max_steps,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_targets_by_zone() {
        let sp = ServerParam::default();
        assert_eq!(clear_target(&sp, Vec2::new(10.0, 3.0)), Vec2::new(0.0, 34.0));
        assert_eq!(clear_target(&sp, Vec2::new(-20.0, -3.0)), Vec2::new(0.0, -34.0));
        assert_eq!(clear_target(&sp, Vec2::new(-40.0, 4.0)), Vec2::new(-52.5, 20.0));
        assert_eq!(clear_target(&sp, Vec2::new(-40.0, -15.0)), Vec2::new(-40.0, -34.0));
    }

    #[test]
    fn test_clear_always_applies() {
        use crate::engine::test_fixtures::{Fixture, SnapshotBuilder};
        let fx = Fixture::new(SnapshotBuilder::new().kickable().build());
        let actions = ClearBehavior.evaluate(&fx.ctx()).unwrap();
        assert!(actions[0].is_kick());
    }
}
