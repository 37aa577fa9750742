//! Per-agent boundary around the tactical core
//!
//! Each registered agent owns its parameters, formation and
//! [`AgentMemory`]. Agents live behind their own `Mutex` so two cycles of
//! the same agent never overlap while different agents proceed in parallel.
//! Parameter updates are queued and applied right before the next pass.

use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::engine::action_queue::{fallback_actions, Action};
use crate::engine::config::TacticsConfig;
use crate::engine::decision::{run_cycle, AgentMemory, Decision};
use crate::engine::strategy::StarterStrategy;
use crate::error::{DecisionError, Result};
use crate::models::player_type::{PlayerType, PlayerTypeTable};
use crate::models::server_param::{ServerParam, STOCK_SERVER_PARAM};
use crate::models::world::WorldSnapshot;

/// Role given to an agent at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Player,
    Goalkeeper,
    Coach,
    Trainer,
}

impl AgentRole {
    pub fn acts_on_pitch(self) -> bool {
        matches!(self, AgentRole::Player | AgentRole::Goalkeeper)
    }

    pub fn label(self) -> &'static str {
        match self {
            AgentRole::Player => "player",
            AgentRole::Goalkeeper => "goalkeeper",
            AgentRole::Coach => "coach",
            AgentRole::Trainer => "trainer",
        }
    }
}

/// Parameter change delivered between cycles.
#[derive(Debug, Clone)]
pub enum ParamUpdate {
    Server(Box<ServerParam>),
    PlayerType(PlayerType),
}

struct AgentState {
    role: AgentRole,
    unum: Option<u8>,
    sp: ServerParam,
    types: PlayerTypeTable,
    config: TacticsConfig,
    strategy: StarterStrategy,
    memory: AgentMemory,
    pending: Vec<ParamUpdate>,
}

impl AgentState {
    fn apply_pending(&mut self) {
        for update in self.pending.drain(..) {
            match update {
                ParamUpdate::Server(sp) => {
                    self.sp = *sp;
                    self.types.rebuild(&self.sp);
                }
                ParamUpdate::PlayerType(pt) => self.types.insert(pt, &self.sp),
            }
        }
    }
}

/// Registry of live agents.
pub struct AgentService {
    agents: RwLock<FxHashMap<u32, Arc<Mutex<AgentState>>>>,
    next_id: AtomicU32,
    config: TacticsConfig,
}

impl Default for AgentService {
    fn default() -> Self {
        Self::new(TacticsConfig::from_env_or_default())
    }
}

impl AgentService {
    pub fn new(config: TacticsConfig) -> Self {
        Self { agents: RwLock::new(FxHashMap::default()), next_id: AtomicU32::new(1), config }
    }

    /// Register an agent and return its client id. `unum` is only meaningful
    /// for players and keepers.
    pub fn register(&self, role: AgentRole, unum: Option<u8>) -> u32 {
        let client_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let state = AgentState {
            role,
            unum: if role.acts_on_pitch() { unum } else { None },
            sp: STOCK_SERVER_PARAM.clone(),
            types: PlayerTypeTable::new(&STOCK_SERVER_PARAM),
            config: self.config.clone(),
            strategy: StarterStrategy::new(),
            memory: AgentMemory::default(),
            pending: Vec::new(),
        };
        self.write_agents().insert(client_id, Arc::new(Mutex::new(state)));
        info!(client_id, role = role.label(), ?unum, "agent registered");
        client_id
    }

    pub fn unregister(&self, client_id: u32) -> Result<()> {
        match self.write_agents().remove(&client_id) {
            Some(_) => {
                debug!(client_id, "agent removed");
                Ok(())
            }
            None => Err(DecisionError::UnknownAgent { client_id }),
        }
    }

    pub fn len(&self) -> usize {
        self.read_agents().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn role(&self, client_id: u32) -> Result<AgentRole> {
        let agent = self.agent(client_id)?;
        let role = lock(&agent).role;
        Ok(role)
    }

    /// Queue new server parameters for the next pass.
    pub fn queue_server_param(&self, client_id: u32, sp: ServerParam) -> Result<()> {
        self.queue(client_id, ParamUpdate::Server(Box::new(sp)))
    }

    /// Queue a player type profile for the next pass.
    pub fn queue_player_type(&self, client_id: u32, pt: PlayerType) -> Result<()> {
        self.queue(client_id, ParamUpdate::PlayerType(pt))
    }

    pub fn queue(&self, client_id: u32, update: ParamUpdate) -> Result<()> {
        let agent = self.agent(client_id)?;
        let mut state = lock(&agent);
        debug!(client_id, pending = state.pending.len() + 1, "parameter update queued");
        state.pending.push(update);
        Ok(())
    }

    /// Snapshot of the agent's persisted flags.
    pub fn memory(&self, client_id: u32) -> Result<AgentMemory> {
        let agent = self.agent(client_id)?;
        let memory = lock(&agent).memory.clone();
        Ok(memory)
    }

    /// One decision pass. Errors are returned as-is; see
    /// [`AgentService::player_actions`] for the forgiving variant.
    pub fn decide(&self, client_id: u32, snapshot: &WorldSnapshot) -> Result<Decision> {
        let agent = self.agent(client_id)?;
        let mut state = lock(&agent);
        if !state.role.acts_on_pitch() {
            return Err(DecisionError::NotAPlayer { client_id, role: state.role.label().to_string() });
        }
        state.apply_pending();
        snapshot.validate()?;

        let wm = Self::with_registration(&state, snapshot);
        let AgentState { sp, types, config, strategy, memory, .. } = &mut *state;
        let result = panic::catch_unwind(AssertUnwindSafe(|| run_cycle(&wm, sp, types, config, strategy, memory)));
        result.map_err(|payload| DecisionError::Panicked {
            cycle: snapshot.cycle,
            message: panic_message(payload.as_ref()),
        })
    }

    /// Actions for this cycle, never failing for a known agent: coaches and
    /// trainers get nothing, a bad snapshot or crashed pass gets the
    /// fallback set.
    pub fn player_actions(&self, client_id: u32, snapshot: &WorldSnapshot) -> Result<Vec<Action>> {
        match self.decide(client_id, snapshot) {
            Ok(decision) => Ok(decision.actions),
            Err(DecisionError::NotAPlayer { .. }) => Ok(Vec::new()),
            Err(e) if e.is_recoverable() => {
                error!(client_id, cycle = snapshot.cycle, error = %e, "decision pass failed, sending fallback");
                Ok(fallback_actions())
            }
            Err(e) => Err(e),
        }
    }

    /// Registered role and unum take precedence over the snapshot's.
    fn with_registration<'a>(state: &AgentState, snapshot: &'a WorldSnapshot) -> Cow<'a, WorldSnapshot> {
        let goalie = state.role == AgentRole::Goalkeeper;
        let unum = state.unum.unwrap_or(snapshot.me.unum);
        if snapshot.me.is_goalie == goalie && snapshot.me.unum == unum {
            return Cow::Borrowed(snapshot);
        }
        warn!(
            snapshot_unum = snapshot.me.unum,
            unum,
            goalie,
            "snapshot disagrees with registration, overriding"
        );
        let mut wm = snapshot.clone();
        wm.me.is_goalie = goalie;
        wm.me.unum = unum;
        Cow::Owned(wm)
    }

    fn agent(&self, client_id: u32) -> Result<Arc<Mutex<AgentState>>> {
        self.read_agents()
            .get(&client_id)
            .cloned()
            .ok_or(DecisionError::UnknownAgent { client_id })
    }

    fn read_agents(&self) -> std::sync::RwLockReadGuard<'_, FxHashMap<u32, Arc<Mutex<AgentState>>>> {
        self.agents.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_agents(&self) -> std::sync::RwLockWriteGuard<'_, FxHashMap<u32, Arc<Mutex<AgentState>>>> {
        self.agents.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn lock(agent: &Mutex<AgentState>) -> std::sync::MutexGuard<'_, AgentState> {
    agent.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::geom::Vec2;
    use crate::models::world::GameModeType;
    use crate::models::world::GameMode;

    fn snapshot() -> WorldSnapshot {
        let mut wm = WorldSnapshot::default();
        wm.me.unum = 7;
        wm.me.position = Vec2::new(-20.0, 0.0);
        wm.ball.position = Vec2::new(10.0, 0.0);
        wm
    }

    #[test]
    fn test_register_assigns_distinct_ids() {
        let service = AgentService::new(TacticsConfig::default());
        let a = service.register(AgentRole::Player, Some(7));
        let b = service.register(AgentRole::Coach, None);
        assert_ne!(a, b);
        assert_eq!(service.len(), 2);
        assert_eq!(service.role(b).unwrap(), AgentRole::Coach);
        service.unregister(a).unwrap();
        assert!(matches!(service.role(a), Err(DecisionError::UnknownAgent { .. })));
    }

    #[test]
    fn test_coach_gets_no_actions() {
        let service = AgentService::new(TacticsConfig::default());
        let coach = service.register(AgentRole::Coach, None);
        assert!(service.player_actions(coach, &snapshot()).unwrap().is_empty());
        assert!(matches!(service.decide(coach, &snapshot()), Err(DecisionError::NotAPlayer { .. })));
    }

    #[test]
    fn test_unknown_agent_is_an_error() {
        let service = AgentService::new(TacticsConfig::default());
        assert!(matches!(
            service.player_actions(42, &snapshot()),
            Err(DecisionError::UnknownAgent { client_id: 42 })
        ));
    }

    #[test]
    fn test_invalid_snapshot_gets_fallback() {
        let service = AgentService::new(TacticsConfig::default());
        let id = service.register(AgentRole::Player, Some(7));
        let mut wm = snapshot();
        wm.ball.position = Vec2::new(f64::NAN, 0.0);
        assert_eq!(service.player_actions(id, &wm).unwrap(), fallback_actions());
    }

    #[test]
    fn test_registered_goalkeeper_overrides_snapshot() {
        let service = AgentService::new(TacticsConfig::default());
        let id = service.register(AgentRole::Goalkeeper, Some(1));
        let mut wm = snapshot();
        wm.me.position = Vec2::new(-50.0, 0.0);
        let decision = service.decide(id, &wm).unwrap();
        assert_eq!(decision.family, crate::engine::decision::TacticFamily::Goalkeeper);
    }

    #[test]
    fn test_server_param_update_refreshes_default_profile() {
        let service = AgentService::new(TacticsConfig::default());
        let id = service.register(AgentRole::Player, Some(7));
        let sp = ServerParam { max_dash_power: 50.0, ..ServerParam::default() };
        service.queue_server_param(id, sp.clone()).unwrap();
        service.decide(id, &snapshot()).unwrap();

        let agent = service.agent(id).unwrap();
        let state = lock(&agent);
        let fresh = crate::models::player_type::PlayerTypeEntry::new(PlayerType::default(), &sp);
        let got = state.types.get(0).dash_table.distance_after(10);
        assert!((got - fresh.dash_table.distance_after(10)).abs() < 1e-9, "got {}", got);
    }

    #[test]
    fn test_queued_params_apply_before_pass() {
        let service = AgentService::new(TacticsConfig::default());
        let id = service.register(AgentRole::Player, Some(7));
        let sp = ServerParam { max_dash_power: 50.0, ..ServerParam::default() };
        service.queue_server_param(id, sp).unwrap();
        service.queue_player_type(id, PlayerType { id: 2, ..PlayerType::default() }).unwrap();

        let mut wm = snapshot();
        wm.game_mode = GameMode::new(GameModeType::PlayOn, wm.our_side);
        wm.teammates.push(crate::models::world::PlayerObject {
            unum: 9,
            position: Vec2::new(9.0, 0.0),
            ..Default::default()
        });
        let decision = service.decide(id, &wm).unwrap();
        match decision.actions[0] {
            Action::GoToPoint { max_dash_power, .. } => assert!((max_dash_power - 50.0).abs() < 1e-9),
            ref other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_memory_persists_between_cycles() {
        let service = AgentService::new(TacticsConfig::default());
        let id = service.register(AgentRole::Player, Some(7));
        let mut wm = snapshot();
        wm.me.stamina = 3000.0;
        wm.teammates.push(crate::models::world::PlayerObject {
            unum: 9,
            position: Vec2::new(9.0, 0.0),
            ..Default::default()
        });
        service.player_actions(id, &wm).unwrap();
        assert!(service.memory(id).unwrap().recover_mode);
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
    }
}
