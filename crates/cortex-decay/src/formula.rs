//! Retention scoring (spec.md §4.7): `effective = quality · recency_factor
//! · access_boost`.

use chrono::{DateTime, Utc};
use cortex_core::config::decay::RecencyShape;
use cortex_core::Memory;

/// `recency_factor`, chosen by `shape`: exponential half-life or hyperbolic
/// decay over age in hours/days respectively.
pub fn recency_factor(shape: &RecencyShape, age: chrono::Duration) -> f64 {
    match shape {
        RecencyShape::ExponentialHalfLife { half_life_hours } => {
            let age_hours = age.num_seconds() as f64 / 3600.0;
            2.0_f64.powf(-age_hours / half_life_hours)
        }
        RecencyShape::Hyperbolic { decay_rate } => {
            let age_days = age.num_seconds() as f64 / 86_400.0;
            1.0 / (1.0 + decay_rate * age_days)
        }
    }
}

/// `access_boost = min(1 + access_weight·log(1+access_count), max_access_boost)`.
pub fn access_boost(access_count: f64, access_weight: f64, max_access_boost: f64) -> f64 {
    (1.0 + access_weight * (1.0 + access_count).ln()).min(max_access_boost)
}

/// The full retention score for one memory at `now`. `quality_score`
/// defaults to 0.5 when unset, matching the "unknown quality" midpoint
/// used elsewhere for memories that predate quality scoring.
pub fn effective_score(
    memory: &Memory,
    shape: &RecencyShape,
    access_weight: f64,
    max_access_boost: f64,
    now: DateTime<Utc>,
) -> f64 {
    let quality = memory.quality_score.unwrap_or(0.5);
    let age = now - memory.created_at;
    let recency = recency_factor(shape, age);
    let boost = access_boost(memory.access_count, access_weight, max_access_boost);
    quality * recency * boost
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_half_life_halves_at_the_configured_horizon() {
        let shape = RecencyShape::ExponentialHalfLife { half_life_hours: 168.0 };
        let factor = recency_factor(&shape, chrono::Duration::hours(168));
        assert!((factor - 0.5).abs() < 1e-9);
    }

    #[test]
    fn hyperbolic_decays_toward_zero_but_never_reaches_it() {
        let shape = RecencyShape::Hyperbolic { decay_rate: 0.1 };
        let factor = recency_factor(&shape, chrono::Duration::days(1000));
        assert!(factor > 0.0 && factor < 0.02);
    }

    #[test]
    fn access_boost_is_capped_at_max() {
        let boost = access_boost(1_000_000.0, 0.3, 2.0);
        assert_eq!(boost, 2.0);
    }

    #[test]
    fn zero_access_count_gives_a_boost_of_one() {
        let boost = access_boost(0.0, 0.3, 2.0);
        assert!((boost - 1.0).abs() < 1e-9);
    }
}
