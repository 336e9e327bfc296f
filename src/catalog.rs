//! Tariff-plan catalog: schema, the builtin default, and TOML loading.
//!
//! The catalog is injected external data. The simulation core only ever
//! reads it; size and source are the caller's choice.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::sim::types::{Season, TierRates};

/// Per-season energy rate tables of one plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeasonRates {
    pub spring_fall: TierRates,
    pub summer: TierRates,
    pub winter: TierRates,
}

impl SeasonRates {
    /// Same flat rate in every tier of every season.
    pub const fn flat(rate: f64) -> Self {
        Self {
            spring_fall: TierRates::flat(rate),
            summer: TierRates::flat(rate),
            winter: TierRates::flat(rate),
        }
    }

    /// Rate table for one season.
    pub fn for_season(&self, season: Season) -> TierRates {
        match season {
            Season::SpringFall => self.spring_fall,
            Season::Summer => self.summer,
            Season::Winter => self.winter,
        }
    }
}

/// One utility tariff plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TariffPlan {
    /// Stable identifier, unique within a catalog.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Demand charge per contracted kW per month (currency).
    pub base_rate: f64,
    /// Per-season per-tier energy rates (currency per kWh).
    pub rates: SeasonRates,
}

/// Ordered list of candidate tariff plans.
///
/// Catalog order is meaningful: comparison ties resolve to the first
/// occurrence.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanCatalog {
    pub plans: Vec<TariffPlan>,
}

impl PlanCatalog {
    /// The builtin four-plan catalog: three TOU contract options and one
    /// flat-rate reference plan.
    pub fn builtin() -> Self {
        Self {
            plans: vec![
                TariffPlan {
                    id: 0,
                    name: "Choice I (Low Voltage)".to_string(),
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
                },
                TariffPlan {
                    id: 1,
                    name: "Choice II (High Voltage A)".to_string(),
                    base_rate: 2580.0,
                    rates: SeasonRates {
                        spring_fall: TierRates {
                            light: 66.8,
                            mid: 88.3,
                            heavy: 109.1,
                        },
                        summer: TierRates {
                            light: 83.9,
                            mid: 145.3,
                            heavy: 181.5,
                        },
                        winter: TierRates {
                            light: 93.6,
                            mid: 133.5,
                            heavy: 161.9,
                        },
                    },
                },
                TariffPlan {
                    id: 2,
                    name: "Choice III (High Voltage B)".to_string(),
                    base_rate: 2230.0,
                    rates: SeasonRates {
                        spring_fall: TierRates {
                            light: 64.1,
                            mid: 85.4,
                            heavy: 105.7,
                        },
                        summer: TierRates {
                            light: 81.2,
                            mid: 140.2,
                            heavy: 175.8,
                        },
                        winter: TierRates {
                            light: 90.5,
                            mid: 128.7,
                            heavy: 156.3,
                        },
                    },
                },
                TariffPlan {
                    id: 3,
                    name: "Flat Rate".to_string(),
                    base_rate: 2400.0,
                    rates: SeasonRates::flat(100.0),
                },
            ],
        }
    }

    /// Parses a catalog from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "catalog".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a catalog from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates catalog shape and returns a list of errors.
    ///
    /// Returns an empty vector if the catalog is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.plans.is_empty() {
            errors.push(ConfigError {
                field: "plans".into(),
                message: "must contain at least one plan".into(),
            });
        }
        for (i, plan) in self.plans.iter().enumerate() {
            if plan.base_rate < 0.0 {
                errors.push(ConfigError {
                    field: format!("plans[{i}].base_rate"),
                    message: "must be >= 0".into(),
                });
            }
            for season in Season::ALL {
                let rates = plan.rates.for_season(season);
                if rates.light < 0.0 || rates.mid < 0.0 || rates.heavy < 0.0 {
                    errors.push(ConfigError {
                        field: format!("plans[{i}].rates.{season}"),
                        message: "rates must be >= 0".into(),
                    });
                }
            }
            if self.plans[..i].iter().any(|p| p.id == plan.id) {
                errors.push(ConfigError {
                    field: format!("plans[{i}].id"),
                    message: format!("duplicate plan id {}", plan.id),
                });
            }
        }
        errors
    }
}
