//! Heterogeneous player profiles and their derived dash tables

use crate::engine::kinematics::DashDistanceTable;
use crate::models::server_param::{ServerParam, STOCK_SERVER_PARAM};
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Physical profile of one player type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerType {
    pub id: i32,
    pub player_speed_max: f64,
    pub stamina_inc_max: f64,
    pub player_decay: f64,
    pub inertia_moment: f64,
    pub dash_power_rate: f64,
    pub player_size: f64,
    pub kickable_margin: f64,
    pub kick_rand: f64,
    pub extra_stamina: f64,
    pub effort_max: f64,
    pub effort_min: f64,
    pub kick_power_rate: f64,
    pub catchable_area_l_stretch: f64,
}

impl Default for PlayerType {
    fn default() -> Self {
        Self {
            id: 0,
            player_speed_max: 1.05,
            stamina_inc_max: 45.0,
            player_decay: 0.4,
            inertia_moment: 5.0,
            dash_power_rate: 0.006,
            player_size: 0.3,
            kickable_margin: 0.7,
            kick_rand: 0.1,
            extra_stamina: 0.0,
            effort_max: 1.0,
            effort_min: 0.6,
            kick_power_rate: 0.027,
            catchable_area_l_stretch: 1.0,
        }
    }
}

impl PlayerType {
    pub fn kickable_area(&self, sp: &ServerParam) -> f64 {
        self.player_size + self.kickable_margin + sp.ball_size
    }

    /// Top speed reachable by dashing, capped by the type's speed limit.
    pub fn real_speed_max(&self, sp: &ServerParam) -> f64 {
        let terminal = sp.max_dash_power * self.dash_power_rate * self.effort_max / (1.0 - self.player_decay);
        self.player_speed_max.min(terminal)
    }
}

/// Player type plus the caches derived from it.
#[derive(Debug, Clone)]
pub struct PlayerTypeEntry {
    pub player_type: PlayerType,
    pub dash_table: DashDistanceTable,
    pub real_speed_max: f64,
    pub kickable_area: f64,
}

impl PlayerTypeEntry {
    pub fn new(player_type: PlayerType, sp: &ServerParam) -> Self {
        let real_speed_max = player_type.real_speed_max(sp);
        let dash_table = DashDistanceTable::build(
            sp.max_dash_power * player_type.dash_power_rate * player_type.effort_max,
            player_type.player_speed_max,
            player_type.player_decay,
            real_speed_max,
        );
        let kickable_area = player_type.kickable_area(sp);
        Self {
            player_type,
            dash_table,
            real_speed_max,
            kickable_area,
        }
    }
}

/// Read-only lookup from type id to profile.
///
/// Unknown ids resolve to the default type, derived from the same server
/// parameters as the registered types.
#[derive(Debug, Clone)]
pub struct PlayerTypeTable {
    entries: FxHashMap<i32, PlayerTypeEntry>,
    fallback: PlayerTypeEntry,
}

impl Default for PlayerTypeTable {
    fn default() -> Self {
        Self::new(&STOCK_SERVER_PARAM)
    }
}

impl PlayerTypeTable {
    pub fn new(sp: &ServerParam) -> Self {
        Self {
            entries: FxHashMap::default(),
            fallback: PlayerTypeEntry::new(PlayerType::default(), sp),
        }
    }

    /// Insert or replace a type, rebuilding its derived tables.
    pub fn insert(&mut self, player_type: PlayerType, sp: &ServerParam) {
        let id = player_type.id;
        self.entries.insert(id, PlayerTypeEntry::new(player_type, sp));
    }

    /// Rebuild every cached table after a server parameter change.
    pub fn rebuild(&mut self, sp: &ServerParam) {
        self.fallback = PlayerTypeEntry::new(PlayerType::default(), sp);
        for entry in self.entries.values_mut() {
            *entry = PlayerTypeEntry::new(entry.player_type.clone(), sp);
        }
    }

    /// Profile for `id`, falling back to the default type when unknown.
    pub fn get(&self, id: i32) -> &PlayerTypeEntry {
        match self.entries.get(&id) {
            Some(entry) => entry,
            None => {
                if id >= 0 && !self.entries.is_empty() {
                    log::warn!("unknown player type {}; using default profile", id);
                }
                &self.fallback
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_derived_values() {
        let sp = ServerParam::default();
        let pt = PlayerType::default();
        assert!((pt.kickable_area(&sp) - 1.085).abs() < 1e-9);
        assert!((pt.real_speed_max(&sp) - 1.0).abs() < 1e-9, "terminal speed caps at 1.0");
    }

    #[test]
    fn test_unknown_type_falls_back() {
        let sp = ServerParam::default();
        let mut table = PlayerTypeTable::new(&sp);
        table.insert(PlayerType { id: 3, player_speed_max: 1.2, ..PlayerType::default() }, &sp);
        assert_eq!(table.get(3).player_type.id, 3);
        assert_eq!(table.get(17).player_type.id, 0, "missing type uses default profile");
    }

    #[test]
    fn test_rebuild_after_param_change() {
        let mut sp = ServerParam::default();
        let mut table = PlayerTypeTable::new(&sp);
        table.insert(PlayerType::default(), &sp);
        let before = table.get(0).dash_table.distance_after(10);
        sp.max_dash_power = 50.0;
        table.rebuild(&sp);
        assert!(table.get(0).dash_table.distance_after(10) < before);
    }

    fn assert_same_profile(a: &PlayerTypeEntry, b: &PlayerTypeEntry) {
        assert!((a.real_speed_max - b.real_speed_max).abs() < 1e-9);
        assert!((a.kickable_area - b.kickable_area).abs() < 1e-9);
        for n in [1, 5, 10, 30] {
            assert!(
                (a.dash_table.distance_after(n) - b.dash_table.distance_after(n)).abs() < 1e-9,
                "dash distance after {} differs",
                n
            );
        }
    }

    #[test]
    fn test_fallback_follows_server_param_update() {
        let mut sp = ServerParam::default();
        let mut table = PlayerTypeTable::new(&sp);
        sp.max_dash_power = 50.0;
        sp.ball_size = 0.2;
        table.rebuild(&sp);
        let fresh = PlayerTypeEntry::new(PlayerType::default(), &sp);
        assert_same_profile(table.get(0), &fresh);
        assert_same_profile(table.get(17), &fresh);
    }

    #[test]
    fn test_fallback_built_from_construction_params() {
        let sp = ServerParam { max_dash_power: 60.0, ..ServerParam::default() };
        let table = PlayerTypeTable::new(&sp);
        assert_same_profile(table.get(0), &PlayerTypeEntry::new(PlayerType::default(), &sp));
        assert!(table.is_empty());
    }
}
