//! Catalog-wide plan comparison and ranking.

use std::fmt;

use serde::Serialize;

use crate::catalog::TariffPlan;

use super::engine;
use super::types::{AnnualResult, SeasonResults, SimulationSnapshot};

/// One tariff plan paired with its annual aggregate and the three seasonal
/// monthly results it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanResult {
    pub plan: TariffPlan,
    pub annual: AnnualResult,
    pub seasons: SeasonResults,
}

impl fmt::Display for PlanResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<28} revenue={:>12.0}  cost={:>12.0}  profit={:>12.0}  (monthly avg {:.0})",
            self.plan.name,
            self.annual.total_revenue,
            self.annual.total_cost,
            self.annual.total_profit,
            self.annual.monthly_avg_profit,
        )
    }
}

/// Runs the engine across every catalog plan, in catalog order.
pub fn compare(snapshot: &SimulationSnapshot, plans: &[TariffPlan]) -> Vec<PlanResult> {
    plans
        .iter()
        .map(|plan| {
            let seasons = engine::compute_seasons(snapshot, plan);
            let annual = engine::aggregate_annual(&seasons);
            PlanResult {
                plan: plan.clone(),
                annual,
                seasons,
            }
        })
        .collect()
}

/// Index of the plan with the highest annual profit.
///
/// Ties resolve to the first occurrence in catalog order. `None` only for an
/// empty result list.
pub fn best_by_profit(results: &[PlanResult]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, result) in results.iter().enumerate() {
        match best {
            Some(b) if result.annual.total_profit <= results[b].annual.total_profit => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Index of the plan with the lowest annual cost, first occurrence winning.
///
/// Used by the fee optimizer as the revenue baseline; display ranking uses
/// [`best_by_profit`] instead.
pub fn min_cost_index(results: &[PlanResult]) -> Option<usize> {
    let mut min: Option<usize> = None;
    for (i, result) in results.iter().enumerate() {
        match min {
            Some(m) if result.annual.total_cost >= results[m].annual.total_cost => {}
            _ => min = Some(i),
        }
    }
    min
}
