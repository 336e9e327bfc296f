//! TOML site configuration, presets, and the caller-side validation contract.
//!
//! The numeric core takes its inputs as given (shares summing to 100,
//! weights in range, nonnegative scalars). `SiteConfig::validate` is the
//! documented contract the caller must satisfy before building a snapshot;
//! violating it is a caller error, not a core fault.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::sim::types::{DeviceClass, HOURS_PER_DAY, Season, SimulationSnapshot, TierRates};

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"devices[1].share_pct"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

/// Top-level site configuration parsed from TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Site-wide scalars.
    #[serde(default)]
    pub site: SiteSection,
    /// Ordered device classes.
    #[serde(default = "default_devices")]
    pub devices: Vec<DeviceClass>,
}

/// Site-wide scalar inputs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Total energy delivered per month (kWh).
    pub total_usage_kwh: f64,
    /// Desired monthly profit (currency).
    pub target_monthly_profit: f64,
    /// Annual fixed cost such as insurance (currency).
    pub annual_fixed_cost: f64,
    /// Season shown in detail views and exports.
    pub season: Season,
    /// Whether the site bills time-of-use fees.
    pub use_tou: bool,
    /// Contracted power override (kW). Derived from the device mix when
    /// omitted.
    pub contract_power_kw: Option<f64>,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            total_usage_kwh: 15_000.0,
            target_monthly_profit: 1_250_000.0,
            annual_fixed_cost: 2_250_000.0,
            season: Season::Summer,
            use_tou: true,
            contract_power_kw: None,
        }
    }
}

const DEFAULT_WEIGHTS_RAPID: [f64; HOURS_PER_DAY] = [
    1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 4.0, 6.0, 8.0, 9.0, 9.0, 9.0, 8.0, 8.0, 8.0, 9.0, 9.0, 8.0,
    6.0, 4.0, 3.0, 2.0, 1.0, 1.0,
];

const DEFAULT_WEIGHTS_SLOW: [f64; HOURS_PER_DAY] = [
    9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 3.0, 4.0, 6.0,
    8.0, 9.0, 9.0, 9.0, 9.0, 9.0,
];

const DEFAULT_WEIGHTS_OUTLET: [f64; HOURS_PER_DAY] = [
    9.0, 9.0, 8.0, 8.0, 8.0, 7.0, 7.0, 3.0, 2.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 4.0, 6.0,
    8.0, 9.0, 9.0, 9.0, 9.0, 9.0,
];

fn default_devices() -> Vec<DeviceClass> {
    vec![
        DeviceClass {
            name: "rapid".to_string(),
            capacity_kw: 50.0,
            count: 2,
            public: true,
            share_pct: 10.0,
            hourly_weights: DEFAULT_WEIGHTS_RAPID,
            fees: TierRates::flat(290.0),
        },
        DeviceClass {
            name: "slow".to_string(),
            capacity_kw: 7.0,
            count: 8,
            public: false,
            share_pct: 50.0,
            hourly_weights: DEFAULT_WEIGHTS_SLOW,
            fees: TierRates {
                light: 200.0,
                mid: 250.0,
                heavy: 300.0,
            },
        },
        DeviceClass {
            name: "outlet".to_string(),
            capacity_kw: 3.0,
            count: 36,
            public: false,
            share_pct: 40.0,
            hourly_weights: DEFAULT_WEIGHTS_OUTLET,
            fees: TierRates {
                light: 180.0,
                mid: 230.0,
                heavy: 280.0,
            },
        },
    ]
}

impl SiteConfig {
    /// Returns the baseline site: two public rapid chargers, eight slow
    /// chargers, thirty-six outlets.
    pub fn baseline() -> Self {
        Self {
            site: SiteSection::default(),
            devices: default_devices(),
        }
    }

    /// Returns the flat-load preset: the baseline device mix with uniform
    /// hourly weights, for sites without demand-shape data.
    pub fn flat_load() -> Self {
        let mut config = Self::baseline();
        for device in &mut config.devices {
            device.hourly_weights = [1.0; HOURS_PER_DAY];
        }
        config
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "flat_load"];

    /// Loads a site from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "flat_load" => Ok(Self::flat_load()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a site from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "site".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a site from a TOML string.
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

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.site;

        if s.total_usage_kwh < 0.0 {
            errors.push(ConfigError {
                field: "site.total_usage_kwh".into(),
                message: "must be >= 0".into(),
            });
        }
        if s.annual_fixed_cost < 0.0 {
            errors.push(ConfigError {
                field: "site.annual_fixed_cost".into(),
                message: "must be >= 0".into(),
            });
        }
        if let Some(kw) = s.contract_power_kw
            && kw < 0.0
        {
            errors.push(ConfigError {
                field: "site.contract_power_kw".into(),
                message: "must be >= 0".into(),
            });
        }

        if self.devices.is_empty() {
            errors.push(ConfigError {
                field: "devices".into(),
                message: "must contain at least one device class".into(),
            });
            return errors;
        }

        let mut share_sum = 0.0;
        for (i, device) in self.devices.iter().enumerate() {
            share_sum += device.share_pct;
            if device.capacity_kw <= 0.0 {
                errors.push(ConfigError {
                    field: format!("devices[{i}].capacity_kw"),
                    message: "must be > 0".into(),
                });
            }
            if !(0.0..=100.0).contains(&device.share_pct) {
                errors.push(ConfigError {
                    field: format!("devices[{i}].share_pct"),
                    message: "must be in [0, 100]".into(),
                });
            }
            if device
                .hourly_weights
                .iter()
                .any(|w| !(0.0..=10.0).contains(w))
            {
                errors.push(ConfigError {
                    field: format!("devices[{i}].hourly_weights"),
                    message: "each weight must be in [0, 10]".into(),
                });
            }
            if device.fees.light < 0.0 || device.fees.mid < 0.0 || device.fees.heavy < 0.0 {
                errors.push(ConfigError {
                    field: format!("devices[{i}].fees"),
                    message: "fees must be >= 0".into(),
                });
            }
            if self.devices[..i].iter().any(|d| d.name == device.name) {
                errors.push(ConfigError {
                    field: format!("devices[{i}].name"),
                    message: format!("duplicate device name \"{}\"", device.name),
                });
            }
        }
        if (share_sum - 100.0).abs() > 1e-6 {
            errors.push(ConfigError {
                field: "devices".into(),
                message: format!("shares must sum to 100, got {share_sum}"),
            });
        }

        errors
    }

    /// Builds the live input snapshot.
    ///
    /// Contracted power comes from the explicit override when present,
    /// otherwise it is derived from the device mix.
    pub fn to_inputs(&self) -> SimulationSnapshot {
        let mut snapshot = SimulationSnapshot {
            total_usage_kwh: self.site.total_usage_kwh,
            target_monthly_profit: self.site.target_monthly_profit,
            annual_fixed_cost: self.site.annual_fixed_cost,
            contract_power_kw: 0.0,
            use_tou: self.site.use_tou,
            season: self.site.season,
            devices: self.devices.clone(),
        };
        snapshot.contract_power_kw = match self.site.contract_power_kw {
            Some(kw) => kw,
            None => snapshot.derived_contract_power_kw(),
        };
        snapshot
    }

    /// Whether contracted power should stay derived from the device mix.
    pub fn derives_contract_power(&self) -> bool {
        self.site.contract_power_kw.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let config = SiteConfig::baseline();
        let errors = config.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn all_presets_are_valid() {
        for name in SiteConfig::PRESETS {
            let config = SiteConfig::from_preset(name);
            assert!(config.is_ok(), "preset \"{name}\" should load");
            let errors = config.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn from_preset_unknown() {
        let err = SiteConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn baseline_contract_power_derives_to_164() {
        let config = SiteConfig::baseline();
        assert!(config.derives_contract_power());
        let inputs = config.to_inputs();
        // rapid is public: 8 slow * 7 kW + 36 outlets * 3 kW.
        assert_eq!(inputs.contract_power_kw, 164.0);
    }

    #[test]
    fn explicit_contract_power_wins() {
        let mut config = SiteConfig::baseline();
        config.site.contract_power_kw = Some(80.0);
        assert!(!config.derives_contract_power());
        assert_eq!(config.to_inputs().contract_power_kw, 80.0);
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[site]
total_usage_kwh = 9000.0
target_monthly_profit = 800000.0
annual_fixed_cost = 1200000.0
season = "winter"
use_tou = false

[[devices]]
name = "slow"
capacity_kw = 7.0
count = 4
public = false
share_pct = 100.0
hourly_weights = [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]
fees = { light = 250.0, mid = 250.0, heavy = 250.0 }
"#;
        let config = SiteConfig::from_toml_str(toml);
        assert!(config.is_ok(), "valid TOML should parse: {:?}", config.err());
        let config = config.ok();
        assert_eq!(config.as_ref().map(|c| c.site.season), Some(Season::Winter));
        assert_eq!(config.as_ref().map(|c| c.devices.len()), Some(1));
        assert_eq!(
            config.as_ref().map(|c| c.devices[0].fees.mid),
            Some(250.0)
        );
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[site]
total_usage_kwh = 20000.0
"#;
        let config = SiteConfig::from_toml_str(toml);
        assert!(config.is_ok());
        let config = config.ok();
        // usage overridden
        assert_eq!(config.as_ref().map(|c| c.site.total_usage_kwh), Some(20_000.0));
        // season kept default
        assert_eq!(config.as_ref().map(|c| c.site.season), Some(Season::Summer));
        // devices kept default
        assert_eq!(config.as_ref().map(|c| c.devices.len()), Some(3));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[site]
total_usage_kwh = 9000.0
bogus_field = true
"#;
        assert!(SiteConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn wrong_weight_vector_length_is_rejected() {
        let toml = r#"
[[devices]]
name = "slow"
capacity_kw = 7.0
count = 4
public = false
share_pct = 100.0
hourly_weights = [1, 2, 3]
fees = { light = 250.0, mid = 250.0, heavy = 250.0 }
"#;
        assert!(SiteConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_catches_share_sum() {
        let mut config = SiteConfig::baseline();
        config.devices[1].share_pct = 70.0;
        let errors = config.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "devices" && e.message.contains("sum to 100"))
        );
    }

    #[test]
    fn validation_catches_out_of_range_weight() {
        let mut config = SiteConfig::baseline();
        config.devices[0].hourly_weights[5] = 11.0;
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.field == "devices[0].hourly_weights"));
    }

    #[test]
    fn validation_catches_negative_usage() {
        let mut config = SiteConfig::baseline();
        config.site.total_usage_kwh = -1.0;
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.field == "site.total_usage_kwh"));
    }

    #[test]
    fn validation_catches_empty_devices() {
        let mut config = SiteConfig::baseline();
        config.devices.clear();
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.field == "devices"));
    }

    #[test]
    fn validation_catches_duplicate_names() {
        let mut config = SiteConfig::baseline();
        config.devices[2].name = "slow".to_string();
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.field == "devices[2].name"));
    }

    #[test]
    fn flat_load_differs_only_in_weights() {
        let base = SiteConfig::baseline();
        let flat = SiteConfig::flat_load();
        assert_eq!(base.devices.len(), flat.devices.len());
        for (b, f) in base.devices.iter().zip(&flat.devices) {
            assert_eq!(b.fees, f.fees);
            assert_eq!(f.hourly_weights, [1.0; HOURS_PER_DAY]);
        }
    }
}
