//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the cycle-ring.toml file.
//! It describes the ring's proportions and the cycle being drawn: its length, phases,
//! current day (explicit, or derived from a start date) and ovulation day.

use crate::layout::LayoutError;
use crate::phases::PhaseTable;
use crate::ring::{day_of_cycle, CycleSnapshot, RingGeometry, RingStyle};
use crate::{Phase, PhaseId};
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "cycle-ring.toml";

/// Application configuration loaded from cycle-ring.toml
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Ring proportions
    #[serde(default)]
    pub ring: RingStyle,
    /// The cycle to draw
    pub cycle: CycleConfig,
}

/// Cycle description
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CycleConfig {
    /// Days in one full revolution of the ring
    pub length_in_days: u32,
    /// Explicit current day; wins over `start_date`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_day: Option<u32>,
    /// First day of the running cycle (YYYY-MM-DD)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Day of ovulation, may lie outside the cycle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ovulation_day: Option<i64>,
    /// Contiguous phases covering the whole cycle
    pub phases: Vec<Phase>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ring: RingStyle::default(),
            cycle: CycleConfig {
                length_in_days: 28,
                current_day: Some(0),
                start_date: None,
                ovulation_day: Some(14),
                phases: vec![
                    Phase::new(PhaseId::Menstrual, 0, 8, "#e5484d"),
                    Phase::new(PhaseId::Follicular, 8, 9, "#f5a524"),
                    Phase::new(PhaseId::Ovulatory, 17, 5, "#30a46c"),
                    Phase::new(PhaseId::Luteal, 22, 6, "#6e56cf"),
                ],
            },
        }
    }
}

impl Config {
    /// Load configuration from cycle-ring.toml file
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(config) => {
                    log::info!(
                        "Loaded {}-day cycle with {} phases from {}",
                        config.cycle.length_in_days,
                        config.cycle.phases.len(),
                        path.display()
                    );
                    config
                }
                Err(e) => {
                    log::warn!("Invalid config file format in {}: {}", path.display(), e);
                    log::warn!("Using default configuration (28-day cycle)");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!(
                    "No config file at {}, using default configuration (28-day cycle)",
                    path.display()
                );
                Self::default()
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Save current configuration to cycle-ring.toml
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to_path(DEFAULT_CONFIG_PATH)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self).context("serialize configuration")?;
        fs::write(path, contents).with_context(|| format!("write {}", path.display()))?;
        log::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    pub fn geometry(&self) -> RingGeometry {
        RingGeometry::from_style(&self.ring)
    }
}

impl CycleConfig {
    /// Resolve the configured cycle into a snapshot for `today`.
    ///
    /// Phases are checked to tile the cycle here, where data enters the program.
    /// Without `current_day` or `start_date` the ring shows day 0.
    pub fn snapshot(&self, today: NaiveDate) -> Result<CycleSnapshot, LayoutError> {
        PhaseTable::new(self.length_in_days, self.phases.clone()).validate()?;

        let current_day = match (self.current_day, self.start_date) {
            (Some(day), _) => day,
            (None, Some(start)) => day_of_cycle(start, today, self.length_in_days)?,
            (None, None) => {
                log::warn!("Neither current_day nor start_date configured, showing day 0");
                0
            }
        };

        Ok(CycleSnapshot {
            length_in_days: self.length_in_days,
            phases: self.phases.clone(),
            current_day,
            ovulation_day: self.ovulation_day,
        })
    }
}
