//! Hourly load allocation and tier classification.
//!
//! Spreads a month of energy across 24 hours by per-device weight profiles,
//! sums the site-wide hourly volumes, and classifies them into load tiers
//! using the seasonal hour→tier map.

use serde::Serialize;

use super::types::{
    DAYS_PER_MONTH, DeviceClass, HOURS_PER_DAY, LoadTier, Season, SimulationSnapshot, TierPattern,
    TierSchedule,
};

/// One hour of the site-wide allocation profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourlyLoad {
    /// Hour of day (0..24).
    pub hour: usize,
    /// Summed daily volume across all device classes (kWh).
    pub volume_kwh: f64,
    /// Load tier the hour falls in for the chosen season.
    pub tier: LoadTier,
}

/// Monthly energy per load tier (kWh).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TierVolumes {
    pub light: f64,
    pub mid: f64,
    pub heavy: f64,
}

impl TierVolumes {
    fn add(&mut self, tier: LoadTier, kwh: f64) {
        match tier {
            LoadTier::Light => self.light += kwh,
            LoadTier::Mid => self.mid += kwh,
            LoadTier::Heavy => self.heavy += kwh,
        }
    }

    /// Sum across all tiers.
    pub fn total(self) -> f64 {
        self.light + self.mid + self.heavy
    }
}

/// Daily energy volume of one device class (kWh): monthly total / 30,
/// scaled by the class share.
pub fn daily_device_kwh(snapshot: &SimulationSnapshot, device: &DeviceClass) -> f64 {
    snapshot.total_usage_kwh / DAYS_PER_MONTH * device.share_pct / 100.0
}

/// Spreads one device's daily volume across 24 hours by its weight profile.
///
/// An all-zero weight vector behaves as all-ones: the volume spreads evenly
/// rather than vanishing, so the class keeps its share of the site total.
pub fn device_hourly_kwh(device: &DeviceClass, daily_kwh: f64) -> [f64; HOURS_PER_DAY] {
    let sum: f64 = device.hourly_weights.iter().sum();
    if sum > 0.0 {
        let mut out = [0.0; HOURS_PER_DAY];
        for (h, volume) in out.iter_mut().enumerate() {
            *volume = daily_kwh * device.hourly_weights[h] / sum;
        }
        out
    } else {
        [daily_kwh / HOURS_PER_DAY as f64; HOURS_PER_DAY]
    }
}

/// The 24-entry site-wide daily profile for one season.
///
/// Each entry sums the hourly volumes of every device class and carries the
/// hour's tier assignment; this is the chart/export payload.
pub fn hourly_profile(snapshot: &SimulationSnapshot, season: Season) -> Vec<HourlyLoad> {
    let schedule = TierSchedule::for_season(season);
    let mut volumes = [0.0_f64; HOURS_PER_DAY];
    for device in &snapshot.devices {
        let hourly = device_hourly_kwh(device, daily_device_kwh(snapshot, device));
        for (total, kwh) in volumes.iter_mut().zip(hourly) {
            *total += kwh;
        }
    }
    volumes
        .iter()
        .enumerate()
        .map(|(hour, &volume_kwh)| HourlyLoad {
            hour,
            volume_kwh,
            tier: schedule.tier_at(hour),
        })
        .collect()
}

/// Monthly energy per tier (kWh): the daily profile classified by tier,
/// scaled back to a 30-day month.
pub fn monthly_tier_volumes(snapshot: &SimulationSnapshot, season: Season) -> TierVolumes {
    let mut volumes = TierVolumes::default();
    for point in hourly_profile(snapshot, season) {
        volumes.add(point.tier, point.volume_kwh * DAYS_PER_MONTH);
    }
    volumes
}

/// Tier consumption pattern in percent of total monthly usage.
///
/// All zeros when total usage is zero, never an indeterminate division.
pub fn tier_pattern(snapshot: &SimulationSnapshot, season: Season) -> TierPattern {
    let total = snapshot.total_usage_kwh;
    if total <= 0.0 {
        return TierPattern::default();
    }
    let volumes = monthly_tier_volumes(snapshot, season);
    TierPattern {
        light: volumes.light / total * 100.0,
        mid: volumes.mid / total * 100.0,
        heavy: volumes.heavy / total * 100.0,
    }
}
