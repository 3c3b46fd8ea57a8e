//! A tiny combat round wired through the event bus.
//!
//! A free function and a player method both subscribe to [`AttackEvent`].
//! The free function runs first and guarantees a minimum of one damage; the
//! player then adds its bonus.

use herald_event_bus::{LocalEventBus, Priority, make_func, make_method};
use herald_logger::LogSettings;
use serde::Deserialize;
use std::rc::Rc;
use tracing::{debug, info};

/// Default config file looked up next to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "arena.toml";

/// Settings of the arena binary.
///
/// ```toml
/// bonus_damage = 150
/// opening_damage = 0
/// base_attack_priority = "high"
/// player_priority = "default"
///
/// [log]
/// level = "debug"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub log: LogSettings,
    pub bonus_damage: i32,
    pub opening_damage: i32,
    pub base_attack_priority: Priority,
    pub player_priority: Priority,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            log: LogSettings::default(),
            bonus_damage: 150,
            opening_damage: 0,
            base_attack_priority: Priority::High,
            player_priority: Priority::Default,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackEvent {
    pub damage: i32,
}

/// Attacks never deal less than one damage.
pub fn base_attack(event: &mut AttackEvent) {
    if event.damage <= 0 {
        event.damage = 1;
    }
}

#[derive(Debug)]
pub struct Player {
    bonus: i32,
}

impl Player {
    #[must_use]
    pub const fn new(bonus: i32) -> Self {
        Self { bonus }
    }

    pub fn attack(&self, event: &mut AttackEvent) {
        event.damage += self.bonus;
    }
}

/// Outcome of [`run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// Damage after every subscriber handled the opening attack.
    pub with_player: i32,
    /// Damage of a second attack published after the player left.
    pub without_player: i32,
}

/// Plays one round, then a second one after the player unsubscribed.
#[must_use]
pub fn run(config: &ArenaConfig) -> Report {
    let bus = LocalEventBus::new();
    let player = Rc::new(Player::new(config.bonus_damage));

    bus.subscribe_with_priority(make_func(base_attack), config.base_attack_priority);
    bus.subscribe_with_priority(make_method(&player, Player::attack), config.player_priority);
    debug!(subscribers = bus.subscriber_count::<AttackEvent>(), "Arena ready");

    let mut event = AttackEvent { damage: config.opening_damage };
    bus.publish(&mut event);
    let with_player = event.damage;
    info!("result damage: {with_player}");

    bus.unsubscribe(&make_method(&player, Player::attack));
    let mut event = AttackEvent { damage: config.opening_damage };
    bus.publish(&mut event);
    info!(damage = event.damage, "Player left the arena");

    Report { with_player, without_player: event.damage }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round() {
        let report = run(&ArenaConfig::default());
        assert_eq!(report, Report { with_player: 151, without_player: 1 });
    }

    #[test]
    fn test_player_first_skips_the_floor() {
        let config = ArenaConfig {
            base_attack_priority: Priority::Low,
            player_priority: Priority::VeryHigh,
            ..ArenaConfig::default()
        };
        assert_eq!(run(&config).with_player, 150);
    }

    #[test]
    fn test_config_reads_priority_names() {
        let raw = serde_json::json!({
            "bonus_damage": 7,
            "player_priority": "very_high",
            "log": { "level": "debug" }
        });
        let config: ArenaConfig = serde_json::from_value(raw).unwrap();
        assert_eq!(config.bonus_damage, 7);
        assert_eq!(config.player_priority, Priority::VeryHigh);
        assert_eq!(config.base_attack_priority, Priority::High);
        assert_eq!(config.log.level, "debug");
    }
}
