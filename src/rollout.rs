// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Deterministic traffic split between the legacy log endpoint and the
//! transport endpoint.
//!
//! An installation id hashes to a stable bucket in `[0, 99]`; installations
//! whose bucket falls below the server-provided rollout percent route to the
//! transport endpoint. The fold must stay bit-compatible across SDKs, so the
//! arithmetic is explicit 32-bit signed with wraparound and must not be
//! widened.

/// Maps a seed to a stable bucket in `[0, 99]`.
///
/// Folds code points left to right into a running `i32` as
/// `hash = (hash << 3) + hash - code`, truncating on every step the way
/// 32-bit signed arithmetic does. The empty seed hashes to 0.
pub fn hash_percent(seed: &str) -> i32 {
    let mut hash: i32 = 0;
    for c in seed.chars() {
        hash = hash
            .wrapping_shl(3)
            .wrapping_add(hash)
            .wrapping_sub(c as i32);
    }
    (hash % 100).abs()
}

/// Whether this installation routes to the transport endpoint at the given
/// rollout percent. Always false for an empty id.
pub fn is_dest_transport(installation_id: &str, rollout_percent: f64) -> bool {
    if installation_id.is_empty() {
        return false;
    }
    // a NaN percent (unparsable rollout field) compares false, keeping the
    // installation on the legacy endpoint
    (hash_percent(installation_id) as f64) < rollout_percent
}
