//! Single-pass customer-fee correction toward a target annual profit.
//!
//! Not an iterative search: one linear delta is derived from the revenue gap
//! against the minimum-cost plan and applied to every fee, tier-weighted so
//! that increases land mostly on heavy-load hours and decreases mostly on
//! light-load hours. Fees only move revenue, never cost or volumes, so the
//! correction is exact up to rounding and clamping. The minimum-cost plan is
//! chosen before the edit and not re-validated afterwards.

use crate::catalog::TariffPlan;

use super::allocator;
use super::comparator;
use super::types::{
    DAYS_PER_MONTH, HOURS_PER_DAY, MONTHS_PER_YEAR, Season, SimulationSnapshot, TierRates,
    TierSchedule,
};

/// Revenue gaps smaller than this (absolute currency) are left alone.
pub const GAP_TOLERANCE: f64 = 1000.0;

/// Lower clamp for an adjusted fee (currency per kWh).
pub const FEE_MIN: f64 = 50.0;

/// Upper clamp for an adjusted fee (currency per kWh).
pub const FEE_MAX: f64 = 2000.0;

/// Adjusted fees snap to multiples of this step.
pub const FEE_STEP: f64 = 10.0;

/// Tier weighting when revenue must rise: heavy hours absorb more of it.
const RAISE_WEIGHTS: TierRates = TierRates {
    light: 0.6,
    mid: 1.0,
    heavy: 1.4,
};

/// Tier weighting when revenue must fall: light hours give up more of it.
const LOWER_WEIGHTS: TierRates = TierRates {
    light: 1.4,
    mid: 1.0,
    heavy: 0.6,
};

/// Outcome of one correction pass.
#[derive(Debug, Clone, PartialEq)]
pub enum FeeAdjustment {
    /// Revenue already within tolerance of the target, or no volume to
    /// price against; the fee table is untouched.
    Unchanged,
    /// New per-device fee schedules, in snapshot device order.
    Adjusted {
        fees: Vec<TierRates>,
        revenue_gap: f64,
    },
}

/// Derives an adjusted fee table that closes the gap between current annual
/// revenue and the revenue required for the target profit under the
/// minimum-cost plan.
pub fn optimize(snapshot: &SimulationSnapshot, plans: &[TariffPlan]) -> FeeAdjustment {
    let results = comparator::compare(snapshot, plans);
    let Some(min_idx) = comparator::min_cost_index(&results) else {
        return FeeAdjustment::Unchanged;
    };
    let annual = &results[min_idx].annual;

    let required_revenue = snapshot.target_monthly_profit * MONTHS_PER_YEAR + annual.total_cost;
    let revenue_gap = required_revenue - annual.total_revenue;
    if revenue_gap.abs() < GAP_TOLERANCE {
        return FeeAdjustment::Unchanged;
    }

    let weights = if revenue_gap > 0.0 {
        RAISE_WEIGHTS
    } else {
        LOWER_WEIGHTS
    };
    let weighted_volume = total_weighted_volume(snapshot, weights);
    if weighted_volume <= 0.0 {
        return FeeAdjustment::Unchanged;
    }

    let base_delta = revenue_gap / weighted_volume;
    let fees = snapshot
        .devices
        .iter()
        .map(|device| TierRates {
            light: adjusted_fee(device.fees.light, base_delta * weights.light),
            mid: adjusted_fee(device.fees.mid, base_delta * weights.mid),
            heavy: adjusted_fee(device.fees.heavy, base_delta * weights.heavy),
        })
        .collect();

    FeeAdjustment::Adjusted { fees, revenue_gap }
}

fn adjusted_fee(current: f64, delta: f64) -> f64 {
    let stepped = ((current + delta) / FEE_STEP).round() * FEE_STEP;
    stepped.clamp(FEE_MIN, FEE_MAX)
}

/// Annualized energy volume with each hour scaled by its tier weight:
/// Σ over seasons (by month count), devices, and hours of
/// `hourly kWh × 30 × months × weight(tier)`.
fn total_weighted_volume(snapshot: &SimulationSnapshot, weights: TierRates) -> f64 {
    let mut total = 0.0;
    for season in Season::ALL {
        let schedule = TierSchedule::for_season(season);
        let months = season.months();
        for device in &snapshot.devices {
            let hourly =
                allocator::device_hourly_kwh(device, allocator::daily_device_kwh(snapshot, device));
            for h in 0..HOURS_PER_DAY {
                let annual_kwh = hourly[h] * DAYS_PER_MONTH * months;
                total += annual_kwh * weights.get(schedule.tier_at(h));
            }
        }
    }
    total
}
