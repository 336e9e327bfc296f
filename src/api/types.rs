//! API response and query types.
//!
//! Response types own plain fields and convert from core types via `From`,
//! keeping the wire contract independent of internal struct layout.

use serde::{Deserialize, Serialize};

use crate::sim::allocator::HourlyLoad;
use crate::sim::comparator::PlanResult;
use crate::sim::types::{LoadTier, Season, SimulationSnapshot, TierPattern};

/// Combined results response: site summary, per-plan results, best index.
#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    /// Summary of the committed input snapshot.
    pub site: SiteSummary,
    /// Index of the highest-profit plan in `plans`, if any.
    pub best_plan: Option<usize>,
    /// Annual summary per catalog plan, in catalog order.
    pub plans: Vec<PlanSummary>,
}

/// Summary of the committed input snapshot.
#[derive(Debug, Serialize)]
pub struct SiteSummary {
    /// Total energy delivered per month (kWh).
    pub total_usage_kwh: f64,
    /// Desired monthly profit (currency).
    pub target_monthly_profit: f64,
    /// Contracted power the demand charge applies to (kW).
    pub contract_power_kw: f64,
    /// Season shown in detail views.
    pub season: Season,
    /// Number of configured device classes.
    pub device_count: usize,
}

impl From<&SimulationSnapshot> for SiteSummary {
    fn from(snapshot: &SimulationSnapshot) -> Self {
        Self {
            total_usage_kwh: snapshot.total_usage_kwh,
            target_monthly_profit: snapshot.target_monthly_profit,
            contract_power_kw: snapshot.contract_power_kw,
            season: snapshot.season,
            device_count: snapshot.devices.len(),
        }
    }
}

/// Annual summary of one plan.
#[derive(Debug, Serialize)]
pub struct PlanSummary {
    /// Plan identifier from the catalog.
    pub id: u32,
    /// Plan display name.
    pub name: String,
    /// Demand charge per contracted kW per month.
    pub base_rate: f64,
    /// Annual revenue (currency).
    pub total_revenue: f64,
    /// Annual cost (currency).
    pub total_cost: f64,
    /// Annual profit (currency).
    pub total_profit: f64,
    /// Annual profit divided over twelve months.
    pub monthly_avg_profit: f64,
    /// Tier pattern of the summer month, as a representative shape.
    pub summer_pattern: TierPattern,
}

impl From<&PlanResult> for PlanSummary {
    fn from(result: &PlanResult) -> Self {
        Self {
            id: result.plan.id,
            name: result.plan.name.clone(),
            base_rate: result.plan.base_rate,
            total_revenue: result.annual.total_revenue,
            total_cost: result.annual.total_cost,
            total_profit: result.annual.total_profit,
            monthly_avg_profit: result.annual.monthly_avg_profit,
            summer_pattern: result.seasons.summer.pattern,
        }
    }
}

/// Optional season choice for the allocation endpoint.
#[derive(Debug, Deserialize)]
pub struct AllocationQuery {
    /// Season name (`spring_fall`, `summer`, `winter`); defaults to the
    /// snapshot's display season.
    pub season: Option<String>,
}

/// One hour of the allocation profile.
#[derive(Debug, Serialize)]
pub struct AllocationPoint {
    /// Hour of day (0..24).
    pub hour: usize,
    /// Summed daily volume across all device classes (kWh).
    pub volume_kwh: f64,
    /// Load tier of the hour.
    pub tier: LoadTier,
}

impl From<&HourlyLoad> for AllocationPoint {
    fn from(point: &HourlyLoad) -> Self {
        Self {
            hour: point.hour,
            volume_kwh: point.volume_kwh,
            tier: point.tier,
        }
    }
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
