//! Shared test fixtures for integration tests.

use ev_tariff_sim::catalog::{PlanCatalog, SeasonRates, TariffPlan};
use ev_tariff_sim::config::SiteConfig;
use ev_tariff_sim::sim::types::{
    DeviceClass, HOURS_PER_DAY, Season, SimulationSnapshot, TierRates,
};

/// Baseline site inputs (the built-in preset, contracted power derived).
pub fn baseline_inputs() -> SimulationSnapshot {
    SiteConfig::baseline().to_inputs()
}

/// The builtin four-plan catalog.
pub fn builtin_catalog() -> PlanCatalog {
    PlanCatalog::builtin()
}

/// Hand-checkable scenario: one flat-weight device carrying all of a
/// 7200 kWh month, 10 kW contracted, 240 000 annual fixed cost.
pub fn worked_snapshot() -> SimulationSnapshot {
    SimulationSnapshot {
        total_usage_kwh: 7200.0,
        target_monthly_profit: 1_000_000.0,
        annual_fixed_cost: 240_000.0,
        contract_power_kw: 10.0,
        use_tou: true,
        season: Season::SpringFall,
        devices: vec![DeviceClass {
            name: "slow".to_string(),
            capacity_kw: 7.0,
            count: 2,
            public: false,
            share_pct: 100.0,
            hourly_weights: [1.0; HOURS_PER_DAY],
            fees: TierRates {
                light: 200.0,
                mid: 250.0,
                heavy: 300.0,
            },
        }],
    }
}

/// Single plan for the worked scenario (base rate 2390, the low-voltage
/// spring/fall rate table in every season).
pub fn worked_plan() -> TariffPlan {
    TariffPlan {
        id: 0,
        name: "Worked".to_string(),
        base_rate: 2390.0,
        rates: SeasonRates {
            spring_fall: TierRates {
                light: 60.2,
                mid: 85.3,
                heavy: 110.5,
            },
            summer: TierRates {
                light: 80.5,
                mid: 135.2,
                heavy: 170.8,
            },
            winter: TierRates {
                light: 90.1,
                mid: 125.4,
                heavy: 155.3,
            },
        },
    }
}

/// Asserts two currency amounts agree to within a milli-unit.
pub fn assert_close(actual: f64, expected: f64, label: &str) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "{label}: got {actual}, expected {expected}"
    );
}
