//! Budget-repair strategies.
//!
//! When a candidate drifts outside the budget band, restarts repair it by
//! scaling allocations toward the target. Each named strategy biases the
//! repair differently; the optimizer cycles through them across restart
//! attempts so the search does not keep re-entering the same basin.

use crate::config::LINKED_CHANNEL;
use crate::optimize::candidate::Candidate;

/// Named repair bias applied during a restart attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairStrategy {
    /// Scale every slot uniformly.
    Balanced,
    /// Keep the worker-voice channel closer to its current level; other
    /// slots absorb more of the adjustment.
    VoicePriority,
    /// Prefer spending on detection channels; response slots absorb more
    /// of the adjustment.
    EfficiencyFocused,
    /// Never touch the worker-voice channel at all.
    PreserveVoiceChannel,
}

impl RepairStrategy {
    /// Stable name for logs and progress reporting.
    pub fn name(&self) -> &'static str {
        match self {
            RepairStrategy::Balanced => "balanced",
            RepairStrategy::VoicePriority => "voice-priority",
            RepairStrategy::EfficiencyFocused => "efficiency-focused",
            RepairStrategy::PreserveVoiceChannel => "preserve-voice-channel",
        }
    }
}

/// Restart cycle order.
pub const STRATEGY_CYCLE: [RepairStrategy; 4] = [
    RepairStrategy::Balanced,
    RepairStrategy::VoicePriority,
    RepairStrategy::EfficiencyFocused,
    RepairStrategy::PreserveVoiceChannel,
];

/// Seed level used when a zero-cost candidate must be inflated into the
/// budget band before scaling has anything to work with.
const REPAIR_SEED_LEVEL: f64 = 25.0;

/// Scale a candidate's allocations toward the target budget.
///
/// `cost` is the candidate's current cost. The scale is the first-order
/// ratio `target / cost`; strategies shape how it lands on each slot.
/// Repair is a heuristic bias, not a guarantee; fitness still rejects
/// candidates that remain outside the band.
pub fn repair_toward_budget(
    candidate: &Candidate,
    cost: f64,
    target_budget: f64,
    strategy: RepairStrategy,
) -> Candidate {
    let mut repaired = *candidate;
    if target_budget <= 0.0 || !target_budget.is_finite() {
        return repaired;
    }
    if cost <= 0.0 || !cost.is_finite() {
        // Nothing allocated yet: seed every slot so scaling has traction.
        for slot in repaired.tools.0.iter_mut() {
            *slot = slot.max(REPAIR_SEED_LEVEL);
        }
        for slot in repaired.responses.0.iter_mut() {
            *slot = slot.max(REPAIR_SEED_LEVEL);
        }
        repaired.normalize();
        return repaired;
    }

    let scale = target_budget / cost;
    let voice = repaired.tools.0[LINKED_CHANNEL];
    match strategy {
        RepairStrategy::Balanced => {
            scale_slots(&mut repaired, scale, scale);
        }
        RepairStrategy::VoicePriority => {
            // Voice moves with a dampened scale; the rest compensate.
            scale_slots(&mut repaired, scale.powf(1.2), scale.powf(1.2));
            repaired.tools.0[LINKED_CHANNEL] = (voice * scale.powf(0.5)).clamp(0.0, 100.0);
        }
        RepairStrategy::EfficiencyFocused => {
            scale_slots(&mut repaired, scale.powf(0.75), scale.powf(1.5));
        }
        RepairStrategy::PreserveVoiceChannel => {
            scale_slots(&mut repaired, scale.powf(1.2), scale.powf(1.2));
            repaired.tools.0[LINKED_CHANNEL] = voice;
        }
    }
    repaired.normalize();
    repaired
}

fn scale_slots(candidate: &mut Candidate, tool_scale: f64, response_scale: f64) {
    for slot in candidate.tools.0.iter_mut() {
        *slot *= tool_scale;
    }
    for slot in candidate.responses.0.iter_mut() {
        *slot *= response_scale;
    }
}
