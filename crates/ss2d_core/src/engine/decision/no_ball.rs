//! Open play without the ball: tackle, chase, block or hold shape

use super::AgentMemory;
use crate::engine::action_queue::Action;
use crate::engine::behaviors::{first_applicable, Behavior, BlockBehavior, InterceptBehavior, TackleBehavior};
use crate::engine::context::DecisionContext;
use crate::models::server_param::ServerParam;
use crate::models::world::SelfState;

/// Flip the recovery flag with hysteresis between the on and off ratios.
pub fn update_recover_mode(memory: &mut AgentMemory, me: &SelfState, sp: &ServerParam, on: f64, off: f64) {
    if me.stamina_capacity < 0.01 {
        memory.recover_mode = false;
    } else if me.stamina < sp.stamina_max * on {
        memory.recover_mode = true;
    } else if me.stamina > sp.stamina_max * off {
        memory.recover_mode = false;
    }
}

/// Dash power for repositioning in open play.
pub fn normal_dash_power(ctx: &DecisionContext, memory: &mut AgentMemory) -> f64 {
    let wm = ctx.wm;
    let sp = ctx.sp;
    let me = &wm.me;
    let pt = &ctx.self_type().player_type;
    let max = sp.max_dash_power;

    if me.stamina_capacity < 0.01 {
        return max.min(me.stamina + pt.extra_stamina);
    }
    let cfg = &ctx.config.movement;
    update_recover_mode(memory, me, sp, cfg.recover_on_ratio, cfg.recover_off_ratio);

    let self_min = ctx.intercept.self_reach_steps();
    let mate_min = ctx.intercept.first_teammate_reach_steps();
    let opp_min = ctx.intercept.first_opponent_reach_steps();
    let inc = pt.stamina_inc_max * me.recovery;
    let ball = ctx.ball();
    let pos = ctx.self_pos();

    if wm.our_defense_line_x > pos.x && ball.x < wm.our_defense_line_x + 20.0 {
        log::debug!("move: behind defense line, max power");
        max
    } else if memory.recover_mode {
        log::debug!("move: recovering");
        (inc - 25.0).max(0.0)
    } else if wm.kickable_teammate_exists() && wm.ball_dist_from_self() < 20.0 {
        (inc * 1.1).min(max)
    } else if pos.x > wm.offside_line_x {
        max
    } else if ball.x > 25.0
        && ball.x > pos.x + 10.0
        && (self_min as i64) < opp_min as i64 - 6
        && (mate_min as i64) < opp_min as i64 - 6
    {
        (inc * 0.5).clamp(max * 0.1, max)
    } else {
        (inc * 1.7).min(max)
    }
}

/// Gaze while repositioning: lock on the ball when a nearby opponent has it.
pub fn attention(ctx: &DecisionContext) -> Action {
    let near = ctx.config.movement.attention_opponent_dist;
    if ctx.wm.kickable_opponent_exists() && ctx.wm.ball_dist_from_self() < near {
        Action::NeckTurnToBall
    } else {
        Action::NeckTurnToBallOrScan { count_threshold: 0 }
    }
}

/// Walk back to the strategic position facing the ball.
pub fn move_to_position(ctx: &DecisionContext, memory: &mut AgentMemory) -> Vec<Action> {
    let cfg = &ctx.config.movement;
    let target = ctx.home_position();
    let dash_power = normal_dash_power(ctx, memory);
    let dist_thr = ctx.ball_dist_threshold(cfg.dist_thr_ratio, cfg.min_dist_thr);
    log::debug!(
        "move: home ({:.2}, {:.2}) power {:.1} thr {:.2}",
        target.x,
        target.y,
        dash_power,
        dist_thr
    );
    vec![
        Action::GoToPoint { target, distance_threshold: dist_thr, max_dash_power: dash_power },
        Action::TurnToBall { cycle: 1 },
        attention(ctx),
    ]
}

/// Tackle, then intercept, then block; otherwise keep the formation.
pub fn decide(ctx: &DecisionContext, memory: &mut AgentMemory) -> Vec<Action> {
    let cascade: [&dyn Behavior; 3] = [&TackleBehavior, &InterceptBehavior, &BlockBehavior];
    match first_applicable(&cascade, ctx) {
        Some((_, actions)) => actions,
        None => move_to_position(ctx, memory),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::geom::Vec2;
    use crate::engine::test_fixtures::{Fixture, SnapshotBuilder};
    use crate::models::world::PlayerObject;

    fn far_from_ball() -> SnapshotBuilder {
        SnapshotBuilder::new()
            .me_at(Vec2::new(-20.0, 0.0))
            .ball_at(Vec2::new(10.0, 0.0))
            .teammate(9, Vec2::new(9.0, 0.0))
    }

    #[test]
    fn test_recover_mode_hysteresis() {
        let sp = ServerParam::default();
        let mut memory = AgentMemory::default();
        let mut me = SelfState { stamina: 3900.0, ..SelfState::default() };
        update_recover_mode(&mut memory, &me, &sp, 0.5, 0.7);
        assert!(memory.recover_mode, "enters below half stamina");

        me.stamina = 5000.0;
        update_recover_mode(&mut memory, &me, &sp, 0.5, 0.7);
        assert!(memory.recover_mode, "stays on between the thresholds");

        me.stamina = 5700.0;
        update_recover_mode(&mut memory, &me, &sp, 0.5, 0.7);
        assert!(!memory.recover_mode, "leaves above seventy percent");
    }

    #[test]
    fn test_normal_dash_power_levels() {
        let fx = Fixture::new(far_from_ball().build());
        let mut memory = AgentMemory::default();
        assert!((normal_dash_power(&fx.ctx(), &mut memory) - 76.5).abs() < 1e-9);

        memory.recover_mode = true;
        let tired = Fixture::new(far_from_ball().stamina(5000.0).build());
        assert!((normal_dash_power(&tired.ctx(), &mut memory) - 20.0).abs() < 1e-9);

        let behind = Fixture::new(
            SnapshotBuilder::new()
                .me_at(Vec2::new(-45.0, 0.0))
                .ball_at(Vec2::new(-30.0, 0.0))
                .teammate(4, Vec2::new(-29.0, 0.0))
                .build(),
        );
        let mut fresh = AgentMemory::default();
        assert!((normal_dash_power(&behind.ctx(), &mut fresh) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_capacity_uses_remaining_stamina() {
        let wm = far_from_ball()
            .stamina(40.0)
            .with(|wm| wm.me.stamina_capacity = 0.0)
            .build();
        let fx = Fixture::new(wm);
        let mut memory = AgentMemory { recover_mode: true, ..AgentMemory::default() };
        assert!((normal_dash_power(&fx.ctx(), &mut memory) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_moves_home_when_teammate_has_it_covered() {
        let fx = Fixture::new(far_from_ball().build());
        let ctx = fx.ctx();
        let mut memory = AgentMemory::default();
        let actions = decide(&ctx, &mut memory);
        match actions[0] {
            Action::GoToPoint { target, distance_threshold, max_dash_power } => {
                assert_eq!(target, ctx.home_position());
                assert!((distance_threshold - 3.0).abs() < 1e-9);
                assert!((max_dash_power - 76.5).abs() < 1e-9);
            }
            ref other => panic!("unexpected {:?}", other),
        }
        assert_eq!(actions[1], Action::TurnToBall { cycle: 1 });
        assert_eq!(actions[2], Action::NeckTurnToBallOrScan { count_threshold: 0 });
    }

    #[test]
    fn test_loose_ball_is_chased() {
        let fx = Fixture::new(SnapshotBuilder::new().ball_at(Vec2::new(2.0, 0.0)).build());
        let actions = decide(&fx.ctx(), &mut AgentMemory::default());
        assert_eq!(actions[0], Action::Intercept { save_recovery: true });
    }

    #[test]
    fn test_attention_locks_on_close_carrier() {
        let wm = far_from_ball()
            .me_at(Vec2::new(0.0, 0.0))
            .with(|wm| {
                wm.opponents.push(PlayerObject {
                    unum: 10,
                    position: Vec2::new(10.5, 0.0),
                    is_kickable: true,
                    ..PlayerObject::default()
                })
            })
            .build();
        let fx = Fixture::new(wm);
        assert_eq!(attention(&fx.ctx()), Action::NeckTurnToBall);

        let far = Fixture::new(far_from_ball().me_at(Vec2::new(-30.0, 0.0)).build());
        assert_eq!(attention(&far.ctx()), Action::NeckTurnToBallOrScan { count_threshold: 0 });
    }
}
