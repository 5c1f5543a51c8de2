//! Engine constants and validated control inputs.
//!
//! Every numeric bound used by the scoring, focus, and mitigation math is a
//! named constant here. Call sites never re-derive thresholds; the linked
//! worker-voice channel in particular is declared once as [`LINKED_CHANNEL`]
//! and referenced everywhere by name.

use std::fmt;

// ─── Dimensions ─────────────────────────────────────────────────────────

/// Number of risk indicators per region.
pub const NUM_INDICATORS: usize = 5;

/// Number of detection channels (and channel categories).
pub const NUM_TOOLS: usize = 6;

/// Number of response methods.
pub const NUM_RESPONSES: usize = 6;

/// Slot shared by the detection and response vectors: the worker-voice
/// channel appears in both, and a candidate allocation must keep the two
/// slots equal. Declared once; never re-derived at call sites.
pub const LINKED_CHANNEL: usize = 0;

// ─── Scoring bounds ─────────────────────────────────────────────────────

/// Upper bound for a single indicator weight.
pub const MAX_INDICATOR_WEIGHT: f64 = 50.0;

/// Risk scores live on a 0-100 scale.
pub const MAX_RISK_SCORE: f64 = 100.0;

/// Volume assigned to a selected region when the caller supplies none.
pub const DEFAULT_REGION_VOLUME: f64 = 10.0;

// ─── Focus bias bounds ──────────────────────────────────────────────────

/// Lower clamp for a region's risk ratio before biasing.
pub const MIN_RISK_RATIO: f64 = 0.08;

/// Upper clamp for a region's risk ratio before biasing.
pub const MAX_RISK_RATIO: f64 = 2.5;

/// Focus exponent at focus = 0.
pub const MIN_FOCUS_EXPONENT: f64 = 1.0;

/// Focus exponent cap at focus = 1.
pub const MAX_FOCUS_EXPONENT: f64 = 2.0;

/// Focus value where exponent growth slows. Below the knee the exponent
/// climbs to [`FOCUS_EXPONENT_AT_KNEE`]; above it the remaining headroom
/// is spread over the rest of the focus range.
pub const FOCUS_EXPONENT_KNEE: f64 = 0.5;

/// Exponent reached at the knee.
pub const FOCUS_EXPONENT_AT_KNEE: f64 = 1.7;

/// Clamped ratios below this value get the low-ratio compression pass.
pub const LOW_RATIO_KNEE: f64 = 0.8;

/// Maximum fraction of the distance to 1.0 restored by low-ratio
/// compression. Bounded so the biased ratio stays non-decreasing in the
/// risk ratio for every focus exponent up to [`MAX_FOCUS_EXPONENT`].
pub const LOW_RATIO_COMPRESSION: f64 = 0.10;

/// Biased values above this threshold are candidates for extreme-value
/// compression.
pub const EXTREME_BIAS_KNEE: f64 = 1.5;

/// Focus level above which extreme-value compression starts fading in.
pub const EXTREME_FOCUS_GATE: f64 = 0.7;

/// Maximum fraction of the excess over [`EXTREME_BIAS_KNEE`] removed by
/// extreme-value compression. Bounded so the biased ratio stays
/// non-decreasing in focus for ratios above 1.
pub const EXTREME_COMPRESSION: f64 = 0.10;

// ─── Coverage distribution bounds ───────────────────────────────────────

/// Risk score at which a region counts as high risk.
pub const HIGH_RISK_SCORE: f64 = 60.0;

/// Score span over which the high-risk boost ramps from 0 to full.
pub const HIGH_RISK_RAMP: f64 = 20.0;

/// Focus level where the high-risk boost starts phasing in.
pub const BOOST_FOCUS_GATE: f64 = 0.3;

/// Maximum high-risk coverage boost (+30%).
pub const MAX_HIGH_RISK_BOOST: f64 = 0.30;

/// Per-tool ceiling on total adjusted usage growth: adjusted usage may
/// exceed the original total by at most this fraction.
pub const EXPANSION_CAP: f64 = 0.30;

// ─── Mitigation bounds ──────────────────────────────────────────────────

/// Hard ceiling on detection effectiveness; some risk is never detectable.
pub const DETECTION_CEILING: f64 = 0.90;

/// Concentration sensitivity (γ) of the region focus multiplier blend.
pub const CONCENTRATION_SENSITIVITY: f64 = 0.5;

/// Focus level above which high-risk regions receive the focus bonus.
pub const HIGH_FOCUS_GATE: f64 = 0.6;

/// Bonus multiplier applied on top of the blend for high-risk regions
/// under high focus.
pub const HIGH_FOCUS_BONUS: f64 = 1.15;

/// Reduction cap for a near-zero-risk region.
pub const REDUCTION_CAP_AT_ZERO: f64 = 0.70;

/// Reduction cap for a maximum-risk region. The cap falls linearly from
/// [`REDUCTION_CAP_AT_ZERO`] as baseline risk rises, so higher-risk
/// regions can never be reduced below lower-risk ones by multiplier
/// stacking alone.
pub const REDUCTION_CAP_AT_MAX: f64 = 0.50;

/// Managed risk never falls below this fraction of baseline risk.
pub const MANAGED_FLOOR_RATIO: f64 = 0.25;

/// Gap forced between adjacent managed risks by the rank-preservation
/// pass.
pub const RANK_EPSILON: f64 = 0.5;

// ─── Detection catalog ──────────────────────────────────────────────────

/// One detection channel category: ordered members, a base-effectiveness
/// constant, and a category weight (≤ 1). Fixed system configuration,
/// not user input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionCategory {
    /// Stable category name.
    pub name: &'static str,
    /// Channel slots belonging to this category.
    pub members: &'static [usize],
    /// Assumed effectiveness of a member channel at full coverage.
    pub base_effectiveness: f64,
    /// Weight of this category's contribution (≤ 1).
    pub weight: f64,
}

/// The six detection channel categories, in slot order.
pub const DETECTION_CATALOG: [DetectionCategory; NUM_TOOLS] = [
    DetectionCategory {
        name: "continuous",
        members: &[0],
        base_effectiveness: 0.70,
        weight: 1.0,
    },
    DetectionCategory {
        name: "periodic",
        members: &[1],
        base_effectiveness: 0.55,
        weight: 0.90,
    },
    DetectionCategory {
        name: "unannounced-audit",
        members: &[2],
        base_effectiveness: 0.80,
        weight: 1.0,
    },
    DetectionCategory {
        name: "announced-audit",
        members: &[3],
        base_effectiveness: 0.60,
        weight: 0.85,
    },
    DetectionCategory {
        name: "self-report",
        members: &[4],
        base_effectiveness: 0.35,
        weight: 0.60,
    },
    DetectionCategory {
        name: "desk-review",
        members: &[5],
        base_effectiveness: 0.30,
        weight: 0.50,
    },
];

/// Response method names, in slot order. Slot [`LINKED_CHANNEL`] is the
/// response side of the worker-voice channel.
pub const RESPONSE_METHODS: [&str; NUM_RESPONSES] = [
    "continuous-engagement",
    "corrective-action-plan",
    "capability-training",
    "contract-enforcement",
    "third-party-escalation",
    "exit-divestment",
];

// ─── Validation ─────────────────────────────────────────────────────────

/// Rejection reasons for control-input validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// A value is NaN or infinite.
    NonFinite { field: &'static str, index: usize },
    /// A value is outside its documented range.
    OutOfRange {
        field: &'static str,
        index: usize,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonFinite { field, index } => {
                write!(f, "{field}[{index}] is non-finite")
            }
            ConfigError::OutOfRange {
                field,
                index,
                value,
                min,
                max,
            } => write!(
                f,
                "{field}[{index}] = {value} outside [{min}, {max}]"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

fn check_range(
    field: &'static str,
    values: &[f64],
    min: f64,
    max: f64,
) -> Result<(), ConfigError> {
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(ConfigError::NonFinite { field, index });
        }
        if value < min || value > max {
            return Err(ConfigError::OutOfRange {
                field,
                index,
                value,
                min,
                max,
            });
        }
    }
    Ok(())
}

/// Caller-supplied indicator weights, one per indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightVector(pub [f64; NUM_INDICATORS]);

impl WeightVector {
    /// Validate every weight: finite, within `[0, MAX_INDICATOR_WEIGHT]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("weight", &self.0, 0.0, MAX_INDICATOR_WEIGHT)
    }
}

/// Detection channel allocation: percent of regions reached per channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolAllocation(pub [f64; NUM_TOOLS]);

impl ToolAllocation {
    /// Validate every slot: finite, within `[0, 100]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("tool_allocation", &self.0, 0.0, 100.0)
    }
}

/// Response method allocation: percent weight per method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseAllocation(pub [f64; NUM_RESPONSES]);

impl ResponseAllocation {
    /// Validate every slot: finite, within `[0, 100]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("response_allocation", &self.0, 0.0, 100.0)
    }
}

/// Cost assumptions for the budget model. All values non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct CostAssumptions {
    /// Fixed annual cost per channel at full coverage.
    pub tool_fixed_cost: [f64; NUM_TOOLS],
    /// Variable cost per reached region, per channel.
    pub tool_cost_per_region: [f64; NUM_TOOLS],
    /// Internal hours per reached region, per channel.
    pub tool_hours_per_region: [f64; NUM_TOOLS],
    /// Internal hours per covered region, per response method.
    pub response_hours_per_region: [f64; NUM_RESPONSES],
}

impl CostAssumptions {
    /// Validate every assumption: finite and non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("tool_fixed_cost", &self.tool_fixed_cost, 0.0, f64::MAX)?;
        check_range(
            "tool_cost_per_region",
            &self.tool_cost_per_region,
            0.0,
            f64::MAX,
        )?;
        check_range(
            "tool_hours_per_region",
            &self.tool_hours_per_region,
            0.0,
            f64::MAX,
        )?;
        check_range(
            "response_hours_per_region",
            &self.response_hours_per_region,
            0.0,
            f64::MAX,
        )
    }
}
