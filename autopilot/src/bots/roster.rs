use super::*;
use crate::util::fnv1a32;

pub(super) fn pilot_configs() -> &'static [PilotConfig] {
    &[
        PilotConfig {
            id: "hunter",
            description: "Turns onto the nearest rock and shoots once lined up.",
            aim_tolerance: 0.08,
            fire_distance: 260.0,
            approach_distance: 320.0,
            evade_distance: 45.0,
            cruise_speed: 2.0,
            alien_priority: 1.5,
            jitter: 0.0,
        },
        PilotConfig {
            id: "sniper",
            description: "Holds position near the centre and fires at long range.",
            aim_tolerance: 0.05,
            fire_distance: 420.0,
            approach_distance: 10_000.0,
            evade_distance: 70.0,
            cruise_speed: 0.0,
            alien_priority: 2.5,
            jitter: 0.0,
        },
        PilotConfig {
            id: "skirmisher",
            description: "Aggressive chaser with random turn jitter.",
            aim_tolerance: 0.12,
            fire_distance: 300.0,
            approach_distance: 180.0,
            evade_distance: 35.0,
            cruise_speed: 3.5,
            alien_priority: 1.0,
            jitter: 0.05,
        },
    ]
}

pub(super) fn random_configs() -> &'static [RandomConfig] {
    &[
        RandomConfig {
            id: "idle",
            description: "Never touches the controls. Baseline for survival time.",
            turn_chance: 0.0,
            thrust_chance: 0.0,
            fire_chance: 0.0,
        },
        RandomConfig {
            id: "random",
            description: "Seeded random key mashing.",
            turn_chance: 0.4,
            thrust_chance: 0.2,
            fire_chance: 0.3,
        },
    ]
}

pub fn bot_ids() -> Vec<&'static str> {
    let mut ids: Vec<&'static str> = pilot_configs().iter().map(|cfg| cfg.id).collect();
    ids.extend(random_configs().iter().map(|cfg| cfg.id));
    ids
}

pub fn describe_bots() -> Vec<(&'static str, &'static str)> {
    let mut out: Vec<(&'static str, &'static str)> = pilot_configs()
        .iter()
        .map(|cfg| (cfg.id, cfg.description))
        .collect();
    out.extend(random_configs().iter().map(|cfg| (cfg.id, cfg.description)));
    out
}

pub fn create_bot(id: &str) -> Option<Box<dyn AutopilotBot>> {
    if let Some(cfg) = pilot_configs().iter().find(|cfg| cfg.id == id) {
        return Some(Box::new(PilotBot::new(*cfg)));
    }
    if let Some(cfg) = random_configs().iter().find(|cfg| cfg.id == id) {
        return Some(Box::new(RandomBot::new(*cfg)));
    }
    None
}

fn hash_json(value: &serde_json::Value) -> String {
    let encoded = serde_json::to_vec(value).unwrap_or_default();
    let digest = fnv1a32(&encoded);
    format!("fnv1a:{digest:08x}:len:{}", encoded.len())
}

fn manifest_entry<T: Serialize>(id: &str, family: &str, description: &str, cfg: &T) -> BotManifestEntry {
    let config = serde_json::to_value(cfg).unwrap_or(serde_json::Value::Null);
    BotManifestEntry {
        id: id.to_string(),
        family: family.to_string(),
        description: description.to_string(),
        config_hash: hash_json(&config),
        config,
    }
}

pub fn bot_manifest_entries() -> Vec<BotManifestEntry> {
    let mut out: Vec<BotManifestEntry> = pilot_configs()
        .iter()
        .map(|cfg| manifest_entry(cfg.id, "pilot", cfg.description, cfg))
        .collect();
    out.extend(
        random_configs()
            .iter()
            .map(|cfg| manifest_entry(cfg.id, "random", cfg.description, cfg)),
    );
    out
}

pub fn bot_fingerprint(id: &str) -> Option<String> {
    bot_manifest_entries()
        .into_iter()
        .find(|entry| entry.id == id)
        .map(|entry| entry.config_hash)
}
