//! Live input ownership, dirty tracking, and atomic result publication.
//!
//! The orchestrator is the only writer of the live input set and the
//! published result list. Inputs share the snapshot type; `run` clones them
//! into an immutable committed snapshot, so later edits to the live inputs
//! never reach already-published results.

use crate::catalog::TariffPlan;

use super::comparator::{self, PlanResult};
use super::optimizer::{self, FeeAdjustment};
use super::types::{HOURS_PER_DAY, Season, SimulationSnapshot, TierRates};

/// Whether the published results still match the live inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// At least one tracked input changed since the last run (or no run
    /// has happened yet).
    Dirty,
    /// The published results were computed from the current inputs.
    Clean,
}

/// Owns the live inputs, the dirty/clean state, and the last-published
/// result set.
#[derive(Debug)]
pub struct SimulationOrchestrator {
    inputs: SimulationSnapshot,
    auto_contract_power: bool,
    status: RunStatus,
    committed: Option<SimulationSnapshot>,
    results: Vec<PlanResult>,
    best: Option<usize>,
}

impl SimulationOrchestrator {
    /// Creates an orchestrator around an initial input set.
    ///
    /// With `auto_contract_power`, contracted power is immediately derived
    /// from the device mix and re-derived on every device-count or
    /// public-flag mutation; otherwise the supplied value is kept until
    /// [`set_contract_power_kw`](Self::set_contract_power_kw) changes it.
    pub fn new(mut inputs: SimulationSnapshot, auto_contract_power: bool) -> Self {
        if auto_contract_power {
            inputs.contract_power_kw = inputs.derived_contract_power_kw();
        }
        Self {
            inputs,
            auto_contract_power,
            status: RunStatus::Dirty,
            committed: None,
            results: Vec::new(),
            best: None,
        }
    }

    /// Current dirty/clean status.
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// The live (mutable-through-methods) input set.
    pub fn inputs(&self) -> &SimulationSnapshot {
        &self.inputs
    }

    /// The snapshot the published results were computed from, if any.
    pub fn committed(&self) -> Option<&SimulationSnapshot> {
        self.committed.as_ref()
    }

    /// The last-published per-plan results, in catalog order.
    pub fn results(&self) -> &[PlanResult] {
        &self.results
    }

    /// Index of the highest-profit plan in the published results.
    pub fn best_index(&self) -> Option<usize> {
        self.best
    }

    /// The highest-profit plan result, if results are published.
    pub fn best_plan(&self) -> Option<&PlanResult> {
        self.best.and_then(|i| self.results.get(i))
    }

    /// Contracted power currently in effect (kW).
    pub fn contract_power_kw(&self) -> f64 {
        self.inputs.contract_power_kw
    }

    pub fn set_total_usage_kwh(&mut self, kwh: f64) {
        self.inputs.total_usage_kwh = kwh;
        self.status = RunStatus::Dirty;
    }

    pub fn set_target_monthly_profit(&mut self, profit: f64) {
        self.inputs.target_monthly_profit = profit;
        self.status = RunStatus::Dirty;
    }

    pub fn set_annual_fixed_cost(&mut self, cost: f64) {
        self.inputs.annual_fixed_cost = cost;
        self.status = RunStatus::Dirty;
    }

    pub fn set_season(&mut self, season: Season) {
        self.inputs.season = season;
        self.status = RunStatus::Dirty;
    }

    pub fn set_use_tou(&mut self, use_tou: bool) {
        self.inputs.use_tou = use_tou;
        self.status = RunStatus::Dirty;
    }

    /// Fixes contracted power to an explicit value and stops deriving it.
    pub fn set_contract_power_kw(&mut self, kw: f64) {
        self.auto_contract_power = false;
        self.inputs.contract_power_kw = kw;
        self.status = RunStatus::Dirty;
    }

    /// Updates a device's unit count, re-deriving contracted power when in
    /// auto mode.
    ///
    /// # Panics
    ///
    /// Panics if `device` is out of range. Device indices follow the order
    /// the classes were configured in.
    pub fn set_device_count(&mut self, device: usize, count: u32) {
        self.inputs.devices[device].count = count;
        self.refresh_contract_power();
        self.status = RunStatus::Dirty;
    }

    /// Updates a device's public flag, re-deriving contracted power when in
    /// auto mode.
    ///
    /// # Panics
    ///
    /// Panics if `device` is out of range.
    pub fn set_device_public(&mut self, device: usize, public: bool) {
        self.inputs.devices[device].public = public;
        self.refresh_contract_power();
        self.status = RunStatus::Dirty;
    }

    /// Updates a device's share of total monthly energy (percent).
    ///
    /// # Panics
    ///
    /// Panics if `device` is out of range.
    pub fn set_device_share_pct(&mut self, device: usize, share_pct: f64) {
        self.inputs.devices[device].share_pct = share_pct;
        self.status = RunStatus::Dirty;
    }

    /// Replaces a device's fee schedule.
    ///
    /// # Panics
    ///
    /// Panics if `device` is out of range.
    pub fn set_device_fees(&mut self, device: usize, fees: TierRates) {
        self.inputs.devices[device].fees = fees;
        self.status = RunStatus::Dirty;
    }

    /// Replaces a device's hourly weight profile.
    ///
    /// # Panics
    ///
    /// Panics if `device` is out of range.
    pub fn set_device_hourly_weights(&mut self, device: usize, weights: [f64; HOURS_PER_DAY]) {
        self.inputs.devices[device].hourly_weights = weights;
        self.status = RunStatus::Dirty;
    }

    /// Runs the full plan comparison and publishes the result set.
    ///
    /// The live inputs are cloned into an immutable committed snapshot
    /// first; the result list is replaced wholesale, never partially, and
    /// the status transitions to [`RunStatus::Clean`].
    pub fn run(&mut self, plans: &[TariffPlan]) -> &[PlanResult] {
        let snapshot = self.inputs.clone();
        let results = comparator::compare(&snapshot, plans);
        self.best = comparator::best_by_profit(&results);
        self.results = results;
        self.committed = Some(snapshot);
        self.status = RunStatus::Clean;
        &self.results
    }

    /// Re-prices customer fees toward the target profit, then reruns.
    ///
    /// On a no-op (gap within tolerance, or nothing to price against) the
    /// inputs, results, and status are all left untouched.
    pub fn optimize_fees(&mut self, plans: &[TariffPlan]) -> FeeAdjustment {
        let adjustment = optimizer::optimize(&self.inputs, plans);
        if let FeeAdjustment::Adjusted { fees, .. } = &adjustment {
            for (device, new_fees) in self.inputs.devices.iter_mut().zip(fees) {
                device.fees = *new_fees;
            }
            self.status = RunStatus::Dirty;
            self.run(plans);
        }
        adjustment
    }

    fn refresh_contract_power(&mut self) {
        if self.auto_contract_power {
            self.inputs.contract_power_kw = self.inputs.derived_contract_power_kw();
        }
    }
}
