//! Multiplier transition table.
//!
//! The multiplier evolves run-over-run from the quantity trend of an item. The
//! branch order is load-bearing, so the table is an explicit ordered rule
//! slice evaluated first-match-wins rather than nested conditionals.

use crate::config::PricingConfig;
use crate::repricer::round2;

/// Quantity trend of one item between the previous and current snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Trend {
    /// Quantity recorded in the previous snapshot (0 when unmatched).
    pub old_qty: i64,
    /// Quantity in the current snapshot.
    pub new_qty: i64,
    /// Multiplier carried over from the previous run.
    pub old_multiplier: f64,
}

/// One row of the transition table.
pub struct Transition {
    pub name: &'static str,
    matches: fn(&Trend, &PricingConfig) -> bool,
    apply: fn(&Trend, &PricingConfig) -> f64,
}

/// Ordered transition rules. The final rule matches unconditionally.
pub const TRANSITIONS: &[Transition] = &[
    // No prior signal for this item.
    Transition {
        name: "reset-no-history",
        matches: |t, _| t.old_qty == 0,
        apply: |_, cfg| cfg.default_multiplier,
    },
    // Item sold out since the last run.
    Transition {
        name: "reset-sold-out",
        matches: |t, _| t.old_qty > 0 && t.new_qty == 0,
        apply: |_, cfg| cfg.default_multiplier,
    },
    // Stock grew: nudge the multiplier up one step.
    Transition {
        name: "nudge-up",
        matches: |t, _| t.old_qty < t.new_qty,
        apply: |t, cfg| round2(t.old_multiplier + cfg.step_up),
    },
    // Stock flat or shrank with headroom above 1.0: decay.
    Transition {
        name: "decay",
        matches: |t, cfg| t.old_multiplier - cfg.decay > 1.0,
        apply: |t, cfg| round2(t.old_multiplier - cfg.decay),
    },
    // Near the floor: decay gently.
    Transition {
        name: "decay-near-floor",
        matches: |_, _| true,
        apply: |t, cfg| round2(t.old_multiplier - cfg.floor_decay),
    },
];

/// Rule matching `trend`, always defined because the last rule is a catch-all.
pub fn select(trend: &Trend, cfg: &PricingConfig) -> &'static Transition {
    TRANSITIONS
        .iter()
        .find(|rule| (rule.matches)(trend, cfg))
        .unwrap_or(&TRANSITIONS[TRANSITIONS.len() - 1])
}

/// Next multiplier for `trend`.
pub fn next_multiplier(trend: &Trend, cfg: &PricingConfig) -> f64 {
    let rule = select(trend, cfg);
    (rule.apply)(trend, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> PricingConfig {
        PricingConfig::default()
    }

    fn trend(old_qty: i64, new_qty: i64, old_multiplier: f64) -> Trend {
        Trend {
            old_qty,
            new_qty,
            old_multiplier,
        }
    }

    #[test]
    fn test_no_history_resets() {
        let t = trend(0, 25, 1.5);
        assert_eq!(select(&t, &cfg()).name, "reset-no-history");
        assert_eq!(next_multiplier(&t, &cfg()), 1.2);
    }

    #[test]
    fn test_sold_out_resets() {
        let t = trend(10, 0, 1.5);
        assert_eq!(select(&t, &cfg()).name, "reset-sold-out");
        assert_eq!(next_multiplier(&t, &cfg()), 1.2);
    }

    #[test]
    fn test_quantity_growth_nudges_up() {
        let t = trend(10, 15, 1.30);
        assert_eq!(select(&t, &cfg()).name, "nudge-up");
        assert_eq!(next_multiplier(&t, &cfg()), 1.31);
    }

    #[test]
    fn test_flat_quantity_with_headroom_decays() {
        let t = trend(10, 10, 1.30);
        assert_eq!(select(&t, &cfg()).name, "decay");
        assert_eq!(next_multiplier(&t, &cfg()), 1.25);
    }

    #[test]
    fn test_near_floor_decays_gently() {
        // 1.04 - 0.05 is not above 1.0, so the gentle decay applies.
        let t = trend(10, 10, 1.04);
        assert_eq!(select(&t, &cfg()).name, "decay-near-floor");
        assert_eq!(next_multiplier(&t, &cfg()), 1.03);
    }

    #[test]
    fn test_branch_order_no_history_beats_growth() {
        // old_qty == 0 also satisfies old_qty < new_qty; the reset must win.
        let t = trend(0, 5, 1.30);
        assert_eq!(next_multiplier(&t, &cfg()), 1.2);
    }

    #[test]
    fn test_selection_is_deterministic() {
        let t = trend(7, 3, 1.12);
        let first = next_multiplier(&t, &cfg());
        for _ in 0..10 {
            assert_eq!(next_multiplier(&t, &cfg()), first);
        }
    }
}
