//! Direct pass to the most advanced open teammate
//!
//! A teammate is open when no opponent stands inside the wedge from the ball
//! toward it. Among open teammates the one furthest up the pitch is chosen.

use super::Behavior;
use crate::engine::action_queue::Action;
use crate::engine::context::DecisionContext;
use crate::engine::geom::{Sector2, Vec2};
use crate::models::world::GameModeType;

/// Teammate positions reachable by a pass along an unobstructed lane.
pub fn pass_candidates(ctx: &DecisionContext) -> Vec<Vec2> {
    let cfg = &ctx.config.pass;
    let ball = ctx.ball();
    ctx.wm
        .valid_teammates()
        .filter(|p| p.has_unum())
        .map(|p| p.position)
        .filter(|&target| {
            let dist = target.dist(ball);
            if dist > cfg.max_dist {
                return false;
            }
            let lane = Sector2::around(
                ball,
                cfg.sector_min_r,
                dist + cfg.sector_extra_r,
                (target - ball).th(),
                cfg.sector_half_angle,
            );
            !ctx.exists_opponent_in(&lane)
        })
        .collect()
}

fn best_candidate(candidates: &[Vec2]) -> Option<Vec2> {
    candidates.iter().copied().max_by(|a, b| a.x.total_cmp(&b.x))
}

pub struct PassBehavior;

impl Behavior for PassBehavior {
    fn name(&self) -> &'static str {
        "pass"
    }

    fn evaluate(&self, ctx: &DecisionContext) -> Option<Vec<Action>> {
        let target = best_candidate(&pass_candidates(ctx))?;
        let cfg = &ctx.config.pass;
        let (first_speed, first_speed_threshold, max_steps) = if ctx.wm.game_mode.kind == GameModeType::PlayOn {
            (cfg.play_on_speed, cfg.play_on_threshold, cfg.play_on_steps)
        } else {
            (cfg.restart_speed, cfg.restart_threshold, cfg.restart_steps)
        };
        log::debug!("pass: to ({:.2}, {:.2})", target.x, target.y);
        Some(vec![Action::SmartKick {
            target,
            first_speed,
            first_speed_threshold,
            max_steps,
        }])
    }
}
