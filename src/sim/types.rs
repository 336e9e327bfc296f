//! Core tariff-simulation types: seasons, load tiers, device classes,
//! input snapshots, and result records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Hours in one simulated day.
pub const HOURS_PER_DAY: usize = 24;

/// Days in one representative billing month.
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Months in one billing year.
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Energy rate (currency per kWh) billed to public devices through the
/// shared external meter, independent of the site's own tariff plan.
pub const PUBLIC_METER_RATE: f64 = 167.0;

/// One of the three representative seasons a billing year is built from.
///
/// The year is modeled as 5 spring/fall months, 3 summer months, and
/// 4 winter months; [`Season::months`] returns the weight and the three
/// always sum to a full year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    SpringFall,
    Summer,
    Winter,
}

impl Season {
    /// All seasons in annual-aggregation order.
    pub const ALL: [Self; 3] = [Self::SpringFall, Self::Summer, Self::Winter];

    /// Number of representative months this season stands for.
    pub fn months(self) -> f64 {
        match self {
            Self::SpringFall => 5.0,
            Self::Summer => 3.0,
            Self::Winter => 4.0,
        }
    }

    /// Stable lowercase name, matching the serde/config spelling.
    pub fn name(self) -> &'static str {
        match self {
            Self::SpringFall => "spring_fall",
            Self::Summer => "summer",
            Self::Winter => "winter",
        }
    }

    /// Parses the config spelling produced by [`Season::name`].
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "spring_fall" => Some(Self::SpringFall),
            "summer" => Some(Self::Summer),
            "winter" => Some(Self::Winter),
            _ => None,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Grid demand level assigned to each hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadTier {
    Light,
    Mid,
    Heavy,
}

impl LoadTier {
    /// All tiers in ascending demand order.
    pub const ALL: [Self; 3] = [Self::Light, Self::Mid, Self::Heavy];

    /// Stable lowercase name, matching the serde/config spelling.
    pub fn name(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Mid => "mid",
            Self::Heavy => "heavy",
        }
    }
}

impl fmt::Display for LoadTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A per-tier value triple (currency per kWh).
///
/// Used both for customer fee schedules and for tariff-plan energy rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierRates {
    pub light: f64,
    pub mid: f64,
    pub heavy: f64,
}

impl TierRates {
    /// Same value in every tier (a non-TOU schedule).
    pub const fn flat(rate: f64) -> Self {
        Self {
            light: rate,
            mid: rate,
            heavy: rate,
        }
    }

    /// Value for one tier.
    pub fn get(self, tier: LoadTier) -> f64 {
        match tier {
            LoadTier::Light => self.light,
            LoadTier::Mid => self.mid,
            LoadTier::Heavy => self.heavy,
        }
    }

    /// Pattern-weighted average rate.
    ///
    /// `pattern` holds tier shares in percent; the blend is the effective
    /// per-kWh value of this schedule under that consumption pattern.
    pub fn blended(self, pattern: &TierPattern) -> f64 {
        (self.light * pattern.light + self.mid * pattern.mid + self.heavy * pattern.heavy) / 100.0
    }
}

/// Realized share of monthly energy per load tier, in percent.
///
/// Sums to 100 for any nonzero monthly usage; all zeros when usage is zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TierPattern {
    pub light: f64,
    pub mid: f64,
    pub heavy: f64,
}

impl TierPattern {
    /// Sum of the three shares.
    pub fn total(&self) -> f64 {
        self.light + self.mid + self.heavy
    }
}

impl fmt::Display for TierPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "light {:.1}% / mid {:.1}% / heavy {:.1}%",
            self.light, self.mid, self.heavy
        )
    }
}

/// Hour-of-day to load-tier assignment for one season.
///
/// Fixed utility data: the simulator never mutates these maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierSchedule {
    hours: [LoadTier; HOURS_PER_DAY],
}

const L: LoadTier = LoadTier::Light;
const M: LoadTier = LoadTier::Mid;
const H: LoadTier = LoadTier::Heavy;

static SPRING_FALL_SCHEDULE: TierSchedule = TierSchedule {
    hours: [
        L, L, L, L, L, L, L, L, L, M, H, H, M, H, H, H, H, M, M, M, M, M, M, L,
    ],
};

// Summer shares the spring/fall shape; only the plan rates differ.
static SUMMER_SCHEDULE: TierSchedule = TierSchedule {
    hours: [
        L, L, L, L, L, L, L, L, L, M, H, H, M, H, H, H, H, M, M, M, M, M, M, L,
    ],
};

static WINTER_SCHEDULE: TierSchedule = TierSchedule {
    hours: [
        L, L, L, L, L, L, L, L, L, M, H, H, M, M, M, M, M, H, H, H, M, M, H, L,
    ],
};

impl TierSchedule {
    /// The fixed hour→tier map for a season.
    pub fn for_season(season: Season) -> &'static Self {
        match season {
            Season::SpringFall => &SPRING_FALL_SCHEDULE,
            Season::Summer => &SUMMER_SCHEDULE,
            Season::Winter => &WINTER_SCHEDULE,
        }
    }

    /// Tier assigned to an hour of day (0..24).
    ///
    /// # Panics
    ///
    /// Panics if `hour >= 24`.
    pub fn tier_at(&self, hour: usize) -> LoadTier {
        self.hours[hour]
    }

    /// All 24 hourly assignments.
    pub fn hours(&self) -> &[LoadTier; HOURS_PER_DAY] {
        &self.hours
    }
}

/// One class of charging hardware at the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceClass {
    /// Identity, e.g. `"rapid"`, `"slow"`, `"outlet"`.
    pub name: String,
    /// Rated capacity per unit (kW).
    pub capacity_kw: f64,
    /// Installed unit count.
    pub count: u32,
    /// Billed through the shared external meter at [`PUBLIC_METER_RATE`]
    /// instead of the site's own contract; excluded from contracted power.
    pub public: bool,
    /// Share of total monthly energy (percent). Shares across all classes
    /// are expected to sum to 100; see `SiteConfig::validate`.
    pub share_pct: f64,
    /// Relative hourly demand weights (each 0..=10). An all-zero vector is
    /// treated as uniform.
    pub hourly_weights: [f64; HOURS_PER_DAY],
    /// Customer-facing fee per kWh, per load tier.
    pub fees: TierRates,
}

/// Immutable copy of every input feeding one simulation run.
///
/// Created by value-semantics cloning at the run boundary; mutating the live
/// inputs afterwards never affects a snapshot or any result produced from it.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSnapshot {
    /// Total energy delivered per month (kWh).
    pub total_usage_kwh: f64,
    /// Desired monthly profit (currency).
    pub target_monthly_profit: f64,
    /// Annual fixed cost such as insurance (currency).
    pub annual_fixed_cost: f64,
    /// Contracted power the demand charge applies to (kW).
    pub contract_power_kw: f64,
    /// Whether the site bills time-of-use fees. Carried for the caller;
    /// a non-TOU site is simply one whose fee schedules are flat.
    pub use_tou: bool,
    /// Season shown in detail views and exports.
    pub season: Season,
    /// Ordered device classes; order is preserved in all outputs.
    pub devices: Vec<DeviceClass>,
}

impl SimulationSnapshot {
    /// Contracted power derived from the device mix: Σ count × capacity over
    /// non-public classes. Public devices are provisioned externally.
    pub fn derived_contract_power_kw(&self) -> f64 {
        self.devices
            .iter()
            .filter(|d| !d.public)
            .map(|d| f64::from(d.count) * d.capacity_kw)
            .sum()
    }

    /// Monthly energy volume of one device class (kWh).
    pub fn device_volume_kwh(&self, device: &DeviceClass) -> f64 {
        self.total_usage_kwh * device.share_pct / 100.0
    }
}

/// Monthly revenue of one device class (currency).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceRevenue {
    pub name: String,
    pub revenue: f64,
}

/// Economics of one month under one plan and season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyResult {
    /// Customer fee income (currency).
    pub revenue: f64,
    /// Electricity + demand charge + fixed-cost twelfth (currency).
    pub cost: f64,
    /// `revenue - cost`.
    pub profit: f64,
    /// Realized tier consumption pattern for the season.
    pub pattern: TierPattern,
    /// Revenue contribution per device class, in device order.
    pub revenue_by_device: Vec<DeviceRevenue>,
}

impl fmt::Display for MonthlyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "revenue {:.0}, cost {:.0}, profit {:.0} ({})",
            self.revenue, self.cost, self.profit, self.pattern
        )
    }
}

/// Season-weighted annual aggregate of [`MonthlyResult`]s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnnualResult {
    pub total_profit: f64,
    pub monthly_avg_profit: f64,
    pub total_revenue: f64,
    pub total_cost: f64,
}

/// The three per-season monthly results behind one annual aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonResults {
    pub spring_fall: MonthlyResult,
    pub summer: MonthlyResult,
    pub winter: MonthlyResult,
}

impl SeasonResults {
    /// Monthly result for one season.
    pub fn get(&self, season: Season) -> &MonthlyResult {
        match season {
            Season::SpringFall => &self.spring_fall,
            Season::Summer => &self.summer,
            Season::Winter => &self.winter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_months_cover_a_full_year() {
        let total: f64 = Season::ALL.iter().map(|s| s.months()).sum();
        assert_eq!(total, MONTHS_PER_YEAR);
    }

    #[test]
    fn season_name_round_trips() {
        for season in Season::ALL {
            assert_eq!(Season::parse(season.name()), Some(season));
        }
        assert_eq!(Season::parse("monsoon"), None);
    }

    #[test]
    fn tier_schedules_have_fixed_hour_counts() {
        // Every seasonal map assigns 10 light, 8 mid, and 6 heavy hours.
        for season in Season::ALL {
            let schedule = TierSchedule::for_season(season);
            let count = |tier: LoadTier| {
                schedule.hours().iter().filter(|&&t| t == tier).count()
            };
            assert_eq!(count(LoadTier::Light), 10, "{season}");
            assert_eq!(count(LoadTier::Mid), 8, "{season}");
            assert_eq!(count(LoadTier::Heavy), 6, "{season}");
        }
    }

    #[test]
    fn winter_schedule_differs_from_spring_fall() {
        let sf = TierSchedule::for_season(Season::SpringFall);
        let wi = TierSchedule::for_season(Season::Winter);
        assert_ne!(sf.hours(), wi.hours());
        // Early-evening peak moves into winter hours 17..20.
        assert_eq!(wi.tier_at(17), LoadTier::Heavy);
        assert_eq!(sf.tier_at(17), LoadTier::Mid);
    }

    #[test]
    fn blended_rate_is_pattern_weighted_average() {
        let rates = TierRates {
            light: 100.0,
            mid: 200.0,
            heavy: 300.0,
        };
        let pattern = TierPattern {
            light: 50.0,
            mid: 30.0,
            heavy: 20.0,
        };
        let blended = rates.blended(&pattern);
        assert!((blended - 170.0).abs() < 1e-9);
    }

    #[test]
    fn flat_rates_blend_to_themselves() {
        let rates = TierRates::flat(250.0);
        let pattern = TierPattern {
            light: 41.0,
            mid: 34.0,
            heavy: 25.0,
        };
        assert!((rates.blended(&pattern) - 250.0).abs() < 1e-9);
    }

    #[test]
    fn derived_contract_power_skips_public_devices() {
        let snapshot = SimulationSnapshot {
            total_usage_kwh: 0.0,
            target_monthly_profit: 0.0,
            annual_fixed_cost: 0.0,
            contract_power_kw: 0.0,
            use_tou: true,
            season: Season::Summer,
            devices: vec![
                DeviceClass {
                    name: "rapid".to_string(),
                    capacity_kw: 50.0,
                    count: 2,
                    public: true,
                    share_pct: 10.0,
                    hourly_weights: [1.0; HOURS_PER_DAY],
                    fees: TierRates::flat(290.0),
                },
                DeviceClass {
                    name: "slow".to_string(),
                    capacity_kw: 7.0,
                    count: 8,
                    public: false,
                    share_pct: 90.0,
                    hourly_weights: [1.0; HOURS_PER_DAY],
                    fees: TierRates::flat(250.0),
                },
            ],
        };
        assert_eq!(snapshot.derived_contract_power_kw(), 56.0);
    }
}
