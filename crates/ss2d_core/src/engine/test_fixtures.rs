//! Snapshot builders shared by the unit tests

use super::config::TacticsConfig;
use super::context::DecisionContext;
use super::geom::{AngleDeg, Vec2};
use super::reach::InterceptTable;
use super::strategy::{PositionStrategy, StarterStrategy};
use crate::models::player_type::PlayerTypeTable;
use crate::models::server_param::ServerParam;
use crate::models::world::{GameMode, GameModeType, PlayerObject, Side, WorldSnapshot};

/// Fluent builder over [`WorldSnapshot`]. Starts in play-on with self as
/// unum 7 on the centre spot and a stationary ball at its feet.
pub struct SnapshotBuilder {
    wm: WorldSnapshot,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        let mut wm = WorldSnapshot::default();
        wm.me.unum = 7;
        wm.offside_line_x = 30.0;
        wm.our_defense_line_x = -40.0;
        wm.see_time = wm.cycle;
        Self { wm }
    }

    pub fn cycle(mut self, cycle: u32) -> Self {
        self.wm.cycle = cycle;
        self.wm.see_time = cycle;
        self
    }

    pub fn our_mode(mut self, kind: GameModeType) -> Self {
        self.wm.game_mode = GameMode::new(kind, self.wm.our_side);
        self
    }

    pub fn their_mode(mut self, kind: GameModeType) -> Self {
        self.wm.game_mode = GameMode::new(kind, Side::Right);
        self
    }

    pub fn me_at(mut self, pos: Vec2) -> Self {
        self.wm.me.position = pos;
        self
    }

    pub fn me_unum(mut self, unum: u8) -> Self {
        self.wm.me.unum = unum;
        self
    }

    pub fn body(mut self, deg: f64) -> Self {
        self.wm.me.body_direction = AngleDeg::new(deg);
        self
    }

    pub fn stamina(mut self, stamina: f64) -> Self {
        self.wm.me.stamina = stamina;
        self
    }

    pub fn kickable(mut self) -> Self {
        self.wm.me.is_kickable = true;
        self
    }

    pub fn goalie(mut self) -> Self {
        self.wm.me.is_goalie = true;
        self.wm.me.unum = 1;
        self
    }

    pub fn ball_at(mut self, pos: Vec2) -> Self {
        self.wm.ball.position = pos;
        self
    }

    pub fn ball_vel(mut self, vel: Vec2) -> Self {
        self.wm.ball.velocity = vel;
        self
    }

    pub fn teammate(mut self, unum: i32, pos: Vec2) -> Self {
        self.wm.teammates.push(PlayerObject { unum, position: pos, ..PlayerObject::default() });
        self
    }

    pub fn goalie_teammate(mut self, unum: i32, pos: Vec2) -> Self {
        self.wm.teammates.push(PlayerObject {
            unum,
            position: pos,
            is_goalie: true,
            ..PlayerObject::default()
        });
        self
    }

    pub fn opponent(mut self, unum: i32, pos: Vec2) -> Self {
        self.wm.opponents.push(PlayerObject { unum, position: pos, ..PlayerObject::default() });
        self
    }

    pub fn opponent_goalie(mut self, pos: Vec2) -> Self {
        self.wm.opponents.push(PlayerObject {
            unum: 1,
            position: pos,
            is_goalie: true,
            ..PlayerObject::default()
        });
        self
    }

    pub fn with(mut self, f: impl FnOnce(&mut WorldSnapshot)) -> Self {
        f(&mut self.wm);
        self
    }

    pub fn build(self) -> WorldSnapshot {
        self.wm
    }
}

/// Owns everything a [`DecisionContext`] borrows.
pub struct Fixture {
    pub wm: WorldSnapshot,
    pub sp: ServerParam,
    pub types: PlayerTypeTable,
    pub config: TacticsConfig,
    pub intercept: InterceptTable,
    pub strategy: StarterStrategy,
}

impl Fixture {
    pub fn new(wm: WorldSnapshot) -> Self {
        Self::with_server_param(wm, ServerParam::default())
    }

    pub fn with_server_param(wm: WorldSnapshot, sp: ServerParam) -> Self {
        let types = PlayerTypeTable::new(&sp);
        let config = TacticsConfig::default();
        let intercept = InterceptTable::build(&wm, &sp, &types, &config.reach);
        let mut strategy = StarterStrategy::new();
        strategy.update(&wm, &sp, &intercept);
        Self { wm, sp, types, config, intercept, strategy }
    }

    pub fn ctx(&self) -> DecisionContext<'_> {
        DecisionContext {
            wm: &self.wm,
            sp: &self.sp,
            types: &self.types,
            intercept: &self.intercept,
            strategy: &self.strategy,
            config: &self.config,
        }
    }
}
