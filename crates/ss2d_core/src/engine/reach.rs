//! Reach estimation and the per-cycle intercept table
//!
//! For a moving ball, finds the first cycle at which an actor can have the
//! ball inside its control radius. The table built from it is the most
//! consumed input of the decision pass.

use super::config::ReachConfig;
use super::geom::{Rect2, Vec2};
use super::kinematics::{
    back_dash_angle, estimate_min_reach_cycle, step_point, virtual_dash_distance, TurnModel,
};
use crate::models::player_type::{PlayerTypeEntry, PlayerTypeTable};
use crate::models::server_param::ServerParam;
use crate::models::world::{PlayerObject, WorldSnapshot};
use serde::Serialize;

/// How much the observation of an actor can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Certainty {
    /// The agent itself.
    Exact,
    /// Teammate: use the observation with its age as slack.
    Observed,
    /// Opponent: also grant the drift it may have made while unseen.
    Pessimistic,
}

/// Everything the reach search needs to know about one actor.
#[derive(Debug, Clone)]
pub struct ReachActor<'a> {
    pub position: Vec2,
    pub velocity: Vec2,
    pub body_direction: f64,
    pub pos_count: u32,
    pub seen_pos_count: u32,
    pub body_count: u32,
    pub is_tackling: bool,
    /// Penalty area in which the actor may catch the ball, if it is a goalkeeper.
    pub catch_area: Option<Rect2>,
    pub certainty: Certainty,
    pub profile: &'a PlayerTypeEntry,
}

impl<'a> ReachActor<'a> {
    pub fn from_self(wm: &WorldSnapshot, sp: &ServerParam, profile: &'a PlayerTypeEntry) -> Self {
        Self {
            position: wm.me.position,
            velocity: wm.me.velocity,
            body_direction: wm.me.body_direction.degree(),
            pos_count: 0,
            seen_pos_count: 0,
            body_count: 0,
            is_tackling: false,
            catch_area: wm.me.is_goalie.then(|| sp.our_penalty_area()),
            certainty: Certainty::Exact,
            profile,
        }
    }

    pub fn from_player(
        p: &PlayerObject,
        catch_area: Option<Rect2>,
        certainty: Certainty,
        profile: &'a PlayerTypeEntry,
    ) -> Self {
        Self {
            position: p.position,
            velocity: p.velocity,
            body_direction: p.body_direction.degree(),
            pos_count: p.pos_count,
            seen_pos_count: p.seen_pos_count,
            body_count: p.body_direction_count,
            is_tackling: p.is_tackling,
            catch_area,
            certainty,
            profile,
        }
    }
}

/// Reach-cycle search over a fixed horizon.
pub struct ReachEstimator<'a> {
    sp: &'a ServerParam,
    cfg: &'a ReachConfig,
}

impl<'a> ReachEstimator<'a> {
    pub fn new(sp: &'a ServerParam, cfg: &'a ReachConfig) -> Self {
        Self { sp, cfg }
    }

    fn control_area(&self, actor: &ReachActor, ball: Vec2) -> f64 {
        match actor.catch_area {
            Some(area) if area.contains(ball) => self.sp.catchable_area(),
            _ => actor.profile.kickable_area,
        }
    }

    /// First cycle at which `actor` controls a ball starting at `ball_pos` with `ball_vel`.
    ///
    /// Returns `cfg.unreachable` when no cycle inside the horizon works.
    pub fn reach_cycle(&self, actor: &ReachActor, ball_pos: Vec2, ball_vel: Vec2) -> u32 {
        let cfg = self.cfg;
        let profile = actor.profile;
        let pt = &profile.player_type;
        let speed_max = profile.real_speed_max;

        if actor.position.dist(ball_pos) <= self.control_area(actor, ball_pos) {
            return 0;
        }

        // a ball outrunning the actor cannot be caught from behind
        let start = match estimate_min_reach_cycle(actor.position, speed_max, ball_pos, ball_vel.th()) {
            Some(c) => c,
            None if ball_vel.r() > speed_max => return cfg.unreachable,
            None => 1,
        };

        let (pos_count, drift) = match actor.certainty {
            Certainty::Exact => (0, 0.0),
            Certainty::Observed => (actor.pos_count, 0.0),
            Certainty::Pessimistic => (
                actor.pos_count,
                virtual_dash_distance(actor.pos_count, actor.seen_pos_count, speed_max),
            ),
        };
        let turn_model = TurnModel {
            max_moment: self.sp.max_moment,
            inertia_moment: pt.inertia_moment,
            decay: pt.player_decay,
        };
        let body_known = actor.certainty == Certainty::Exact || actor.body_count <= cfg.stale_body_count;
        let penalty = if actor.is_tackling { cfg.tackle_penalty } else { 0 };

        for cycle in start.max(1)..=cfg.max_cycle {
            let ball = step_point(ball_pos, ball_vel, self.sp.ball_decay, cycle);
            let control = self.control_area(actor, ball);
            let inertia = step_point(actor.position, actor.velocity, pt.player_decay, cycle);
            let target_dist = inertia.dist(ball);

            let mut dash_dist = target_dist - drift;
            if dash_dist - control - cfg.control_area_buf < 0.001 {
                return cycle;
            }
            dash_dist -= control + cfg.control_area_buf;

            if dash_dist > speed_max * (cycle + pos_count.min(5)) as f64 {
                continue;
            }
            let n_dash = profile.dash_table.cycles_to_reach(dash_dist);
            if n_dash > cycle.saturating_add(pos_count) {
                continue;
            }

            let n_turn = if body_known {
                let angle = ((ball - inertia).th().degree() - actor.body_direction).abs();
                let angle = if angle > 180.0 { 360.0 - angle } else { angle };
                let angle = back_dash_angle(angle, target_dist, self.sp.min_dash_power, self.sp.max_dash_power);
                turn_model.turn_cycles(actor.velocity.r(), angle, control, target_dist)
            } else {
                0
            };
            let settle = if n_turn > 0 { 1 } else { 0 };
            let n_step = n_turn.saturating_add(n_dash).saturating_add(settle);
            if n_step.saturating_add(penalty) <= cycle {
                return cycle;
            }
        }
        cfg.unreachable
    }
}

/// Which actor an intercept entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "unum", rename_all = "snake_case")]
pub enum ActorId {
    SelfAgent,
    Teammate(i32),
    Opponent(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InterceptEntry {
    pub actor: ActorId,
    pub min_cycles: u32,
}

/// Reach cycles of every known actor for the current ball trajectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterceptTable {
    entries: Vec<InterceptEntry>,
    self_reach: u32,
    first_teammate: Option<InterceptEntry>,
    first_opponent: Option<InterceptEntry>,
    unreachable: u32,
}

impl InterceptTable {
    pub fn build(wm: &WorldSnapshot, sp: &ServerParam, types: &PlayerTypeTable, cfg: &ReachConfig) -> Self {
        let estimator = ReachEstimator::new(sp, cfg);
        let (ball_pos, ball_vel) = (wm.ball.position, wm.ball.velocity);
        let mut entries = Vec::with_capacity(1 + wm.teammates.len() + wm.opponents.len());

        let me = ReachActor::from_self(wm, sp, types.get(wm.me.player_type_id));
        let self_reach = estimator.reach_cycle(&me, ball_pos, ball_vel);
        entries.push(InterceptEntry { actor: ActorId::SelfAgent, min_cycles: self_reach });

        for p in wm.valid_teammates() {
            let area = p.is_goalie.then(|| sp.our_penalty_area());
            let actor = ReachActor::from_player(p, area, Certainty::Observed, types.get(p.player_type_id));
            entries.push(InterceptEntry {
                actor: ActorId::Teammate(p.unum),
                min_cycles: estimator.reach_cycle(&actor, ball_pos, ball_vel),
            });
        }
        for p in wm.valid_opponents() {
            let area = p.is_goalie.then(|| sp.their_penalty_area());
            let actor = ReachActor::from_player(p, area, Certainty::Pessimistic, types.get(p.player_type_id));
            entries.push(InterceptEntry {
                actor: ActorId::Opponent(p.unum),
                min_cycles: estimator.reach_cycle(&actor, ball_pos, ball_vel),
            });
        }

        let first_teammate = entries
            .iter()
            .filter(|e| matches!(e.actor, ActorId::Teammate(_)))
            .min_by_key(|e| e.min_cycles)
            .copied();
        let first_opponent = entries
            .iter()
            .filter(|e| matches!(e.actor, ActorId::Opponent(_)))
            .min_by_key(|e| e.min_cycles)
            .copied();

        log::debug!(
            "intercept table cycle {}: self={} mate={:?} opp={:?}",
            wm.cycle,
            self_reach,
            first_teammate.map(|e| e.min_cycles),
            first_opponent.map(|e| e.min_cycles)
        );

        Self {
            entries,
            self_reach,
            first_teammate,
            first_opponent,
            unreachable: cfg.unreachable,
        }
    }

    pub fn self_reach_steps(&self) -> u32 {
        self.self_reach
    }

    /// Fastest teammate, or the sentinel when there is none.
    pub fn first_teammate_reach_steps(&self) -> u32 {
        self.first_teammate.map_or(self.unreachable, |e| e.min_cycles)
    }

    pub fn first_opponent_reach_steps(&self) -> u32 {
        self.first_opponent.map_or(self.unreachable, |e| e.min_cycles)
    }

    pub fn first_opponent(&self) -> Option<ActorId> {
        self.first_opponent.map(|e| e.actor)
    }

    pub fn first_teammate(&self) -> Option<ActorId> {
        self.first_teammate.map(|e| e.actor)
    }

    pub fn entries(&self) -> &[InterceptEntry] {
        &self.entries
    }

    pub fn is_unreachable(&self, cycles: u32) -> bool {
        cycles >= self.unreachable
    }
}
