//! Shot at the far post from close range

use super::Behavior;
use crate::engine::action_queue::Action;
use crate::engine::context::DecisionContext;
use crate::engine::geom::Vec2;

pub struct ShootBehavior;

impl ShootBehavior {
    /// Aim point just inside the post farther from the ball.
    pub fn target(ctx: &DecisionContext) -> Vec2 {
        let sp = ctx.sp;
        let post_y = sp.goal_width / 2.0 - ctx.config.shoot.post_inset;
        // ball nearer the +y post shoots at the -y one
        let y = if ctx.ball().y > 0.0 { -post_y } else { post_y };
        Vec2::new(sp.pitch_half_length, y)
    }

    /// Angle the goal mouth spans seen from the ball.
    pub fn goal_angle(ctx: &DecisionContext) -> f64 {
        let sp = ctx.sp;
        let ball = ctx.ball();
        let half = sp.goal_width / 2.0;
        let left = (Vec2::new(sp.pitch_half_length, -half) - ball).th();
        let right = (Vec2::new(sp.pitch_half_length, half) - ball).th();
        (right - left).abs()
    }
}

impl Behavior for ShootBehavior {
    fn name(&self) -> &'static str {
        "shoot"
    }

    fn evaluate(&self, ctx: &DecisionContext) -> Option<Vec<Action>> {
        let cfg = &ctx.config.shoot;
        let dist = ctx.ball().dist(ctx.sp.their_goal());
        if dist > cfg.max_dist {
            return None;
        }
        let angle = Self::goal_angle(ctx);
        if angle < cfg.min_goal_angle {
            log::debug!("shoot: goal angle {:.1} too narrow", angle);
            return None;
        }
        let target = Self::target(ctx);
        log::debug!("shoot: dist {:.2}, aiming at ({:.2}, {:.2})", dist, target.x, target.y);
        Some(vec![Action::SmartKick {
            target,
            first_speed: ctx.sp.ball_speed_max,
            first_speed_threshold: cfg.first_speed_threshold,
            max_steps: cfg.max_steps,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_fixtures::{Fixture, SnapshotBuilder};

    fn with_ball(ball: Vec2) -> Fixture {
        let wm = SnapshotBuilder::new().me_at(ball - Vec2::new(0.5, 0.0)).ball_at(ball).kickable().build();
        Fixture::new(wm)
    }

    #[test]
    fn test_far_post_from_positive_side() {
        let fx = with_ball(Vec2::new(44.0, 5.0));
        match ShootBehavior.evaluate(&fx.ctx()).unwrap()[0] {
            Action::SmartKick { target, first_speed, max_steps, .. } => {
                assert!((target.y + 6.81).abs() < 1e-9, "target y {}", target.y);
                assert!((first_speed - 3.0).abs() < 1e-9);
                assert_eq!(max_steps, 3);
            }
            ref other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range() {
        let fx = with_ball(Vec2::new(30.0, 0.0));
        assert!(ShootBehavior.evaluate(&fx.ctx()).is_none());
    }

    #[test]
    fn test_narrow_angle_from_goal_line() {
        let fx = with_ball(Vec2::new(52.0, 11.0));
        assert!(ShootBehavior::goal_angle(&fx.ctx()) < 8.0);
        assert!(ShootBehavior.evaluate(&fx.ctx()).is_none());
    }
}
