//! Presenting complaints per triage level for generated arrivals.

use rand::seq::SliceRandom;
use rand::Rng;

const LEVEL_1: &[&str] = &[
    "Cardiac arrest",
    "Severe trauma",
    "Respiratory failure",
    "Unconscious",
    "Massive bleeding",
    "Anaphylactic shock",
];

const LEVEL_2: &[&str] = &[
    "Chest pain",
    "Severe burns",
    "Stroke symptoms",
    "Major fractures",
    "Severe allergic reaction",
    "Severe infection",
];

const LEVEL_3: &[&str] = &[
    "Moderate pain",
    "Mild fractures",
    "Dehydration",
    "Persistent vomiting",
    "Moderate bleeding",
    "Moderate infection",
];

const LEVEL_4: &[&str] = &[
    "Minor trauma",
    "Fever",
    "Earache",
    "Mild pain",
    "Cough",
    "Sore throat",
];

const LEVEL_5: &[&str] = &[
    "Cold symptoms",
    "Minor rash",
    "Medication refill",
    "Minor cuts",
    "Insect bites",
    "General advice",
];

/// Catalogue for a triage level; out-of-range levels fall back to the least urgent
pub fn catalogue(level: i64) -> &'static [&'static str] {
    match level {
        1 => LEVEL_1,
        2 => LEVEL_2,
        3 => LEVEL_3,
        4 => LEVEL_4,
        _ => LEVEL_5,
    }
}

pub fn random_symptom<R: Rng + ?Sized>(level: i64, rng: &mut R) -> String {
    catalogue(level)
        .choose(rng)
        .copied()
        .unwrap_or("General advice")
        .to_string()
}

/// Map a uniform roll in `[0, 1)` to a triage level.
///
/// Roughly 10% critical, 20% emergent, 30% urgent, 25% less urgent, 15% non-urgent.
pub fn weighted_urgency_level(roll: f64) -> i64 {
    match roll {
        r if r < 0.10 => 1,
        r if r < 0.30 => 2,
        r if r < 0.60 => 3,
        r if r < 0.85 => 4,
        _ => 5,
    }
}
