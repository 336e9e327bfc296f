//! Per-plan monthly and annual site economics.
//!
//! Revenue is what customers pay through the per-tier fee schedules; cost is
//! the site's electricity bill under a tariff plan plus the demand charge and
//! a twelfth of the annual fixed cost. Public devices bypass the plan and pay
//! the fixed external meter rate instead.

use crate::catalog::TariffPlan;

use super::allocator;
use super::types::{
    AnnualResult, DeviceRevenue, MONTHS_PER_YEAR, MonthlyResult, PUBLIC_METER_RATE, Season,
    SeasonResults, SimulationSnapshot,
};

/// Computes one month of economics under `plan` for `season`.
pub fn compute_monthly(
    snapshot: &SimulationSnapshot,
    season: Season,
    plan: &TariffPlan,
) -> MonthlyResult {
    let pattern = allocator::tier_pattern(snapshot, season);
    let plan_rate = plan.rates.for_season(season).blended(&pattern);

    let mut revenue = 0.0;
    let mut energy_cost = 0.0;
    let mut revenue_by_device = Vec::with_capacity(snapshot.devices.len());
    for device in &snapshot.devices {
        let volume_kwh = snapshot.device_volume_kwh(device);
        let device_revenue = volume_kwh * device.fees.blended(&pattern);
        revenue += device_revenue;
        revenue_by_device.push(DeviceRevenue {
            name: device.name.clone(),
            revenue: device_revenue,
        });

        let unit_cost = if device.public {
            PUBLIC_METER_RATE
        } else {
            plan_rate
        };
        energy_cost += volume_kwh * unit_cost;
    }

    let demand_charge = if snapshot.contract_power_kw > 0.0 {
        snapshot.contract_power_kw * plan.base_rate
    } else {
        0.0
    };
    let cost = energy_cost + demand_charge + snapshot.annual_fixed_cost / MONTHS_PER_YEAR;

    MonthlyResult {
        revenue,
        cost,
        profit: revenue - cost,
        pattern,
        revenue_by_device,
    }
}

/// Computes the three per-season monthly results under `plan`.
pub fn compute_seasons(snapshot: &SimulationSnapshot, plan: &TariffPlan) -> SeasonResults {
    SeasonResults {
        spring_fall: compute_monthly(snapshot, Season::SpringFall, plan),
        summer: compute_monthly(snapshot, Season::Summer, plan),
        winter: compute_monthly(snapshot, Season::Winter, plan),
    }
}

/// Season-weighted annual aggregate of already-computed monthly results.
///
/// Totals are exact weighted sums of the per-season figures, so
/// `total_profit == 5*spring_fall + 3*summer + 4*winter` holds bit-for-bit.
pub fn aggregate_annual(seasons: &SeasonResults) -> AnnualResult {
    let mut total_profit = 0.0;
    let mut total_revenue = 0.0;
    let mut total_cost = 0.0;
    for season in Season::ALL {
        let monthly = seasons.get(season);
        let months = season.months();
        total_profit += monthly.profit * months;
        total_revenue += monthly.revenue * months;
        total_cost += monthly.cost * months;
    }
    AnnualResult {
        total_profit,
        monthly_avg_profit: total_profit / MONTHS_PER_YEAR,
        total_revenue,
        total_cost,
    }
}

/// Computes the annual aggregate under `plan` directly from a snapshot.
pub fn compute_annual(snapshot: &SimulationSnapshot, plan: &TariffPlan) -> AnnualResult {
    aggregate_annual(&compute_seasons(snapshot, plan))
}
