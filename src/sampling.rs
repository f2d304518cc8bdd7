// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::cell::RefCell;

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_entropy());
}

fn uniform_draw() -> f64 {
    RNG.with(|rng| rng.borrow_mut().gen::<f64>())
}

/// Draws the two independent per-session sampling decisions.
///
/// Returns `(log_trace_after_sampling, log_network_after_sampling)`. Each flag
/// comes from its own uniform draw in `[0, 1)` compared against the rate, so
/// the decisions are independent Bernoulli trials.
pub(crate) fn session_flags(traces_rate: f64, network_rate: f64) -> (bool, bool) {
    (
        sampled(uniform_draw(), traces_rate),
        sampled(uniform_draw(), network_rate),
    )
}

fn sampled(draw: f64, rate: f64) -> bool {
    draw < rate
}

#[cfg(test)]
mod tests {
    use super::{sampled, session_flags};

    #[test]
    fn test_sampled_boundaries() {
        // draws live in [0, 1), so a rate of 1.0 keeps everything and a rate
        // of 0.0 keeps nothing
        assert!(sampled(0.0, 1.0));
        assert!(sampled(0.999_999, 1.0));
        assert!(!sampled(0.0, 0.0));
        assert!(!sampled(0.5, 0.5));
        assert!(sampled(0.499, 0.5));
    }

    #[test]
    fn test_session_flags_degenerate_rates() {
        for _ in 0..100 {
            assert_eq!(session_flags(1.0, 0.0), (true, false));
            assert_eq!(session_flags(0.0, 1.0), (false, true));
        }
    }
}
