//! Voyage metadata and input-collector validation rules.
//!
//! Apart from distance, cargo and the regulatory parameters, nothing here
//! takes part in the arithmetic; the fields label reports and exports.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::compliance::RegulatoryParameters;
use crate::constants::{DEFAULT_GWP_CH4, DEFAULT_GWP_N2O, DEFAULT_REGULATORY_YEAR};
use crate::fuel::FuelType;

/// Date format used by voyage schedules (UTC).
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Time format used by voyage schedules (UTC).
pub const TIME_FORMAT: &str = "%H:%M";

/// Voyage-type shares accepted for EU ETS and FuelEU scope.
pub const VOYAGE_SHARES: [f64; 3] = [0.0, 50.0, 100.0];

/// Loading condition of the vessel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    #[default]
    #[serde(alias = "laden")]
    Laden,
    #[serde(alias = "ballast")]
    Ballast,
}

/// Activity at the arrival port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortActivity {
    #[serde(alias = "loading")]
    Loading,
    #[serde(alias = "discharging")]
    Discharging,
    #[default]
    #[serde(alias = "other")]
    Other,
}

/// Whether a port lies inside the EU ETS / FuelEU perimeter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Jurisdiction {
    #[serde(rename = "EU", alias = "eu")]
    Eu,
    #[default]
    #[serde(rename = "Non-EU", alias = "non_eu", alias = "non-eu")]
    NonEu,
}

/// Where the vessel stayed during the port call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortLimits {
    #[default]
    #[serde(rename = "Within port limits", alias = "within")]
    Within,
    #[serde(rename = "Outside port limits", alias = "outside")]
    Outside,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Route {
    pub from_port: String,
    pub from_unlocode: Option<String>,
    pub from_jurisdiction: Jurisdiction,
    pub to_port: String,
    pub to_unlocode: Option<String>,
    pub to_jurisdiction: Jurisdiction,
}

/// Departure from last berth and arrival at first berth, as entered (UTC).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schedule {
    pub departure_date: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_date: Option<String>,
    pub arrival_time: Option<String>,
}

impl Schedule {
    pub fn departure(&self) -> Option<NaiveDateTime> {
        combine(self.departure_date.as_deref(), self.departure_time.as_deref())
    }

    pub fn arrival(&self) -> Option<NaiveDateTime> {
        combine(self.arrival_date.as_deref(), self.arrival_time.as_deref())
    }

    /// Elapsed hours between departure and arrival when both are complete.
    pub fn sailing_hours(&self) -> Option<f64> {
        let elapsed = self.arrival()? - self.departure()?;
        Some(elapsed.num_minutes() as f64 / 60.0)
    }

    fn validate(&self, problems: &mut Vec<String>) {
        check_date_formats(
            &[
                ("Departure date", &self.departure_date),
                ("Arrival date", &self.arrival_date),
            ],
            problems,
        );
        check_time_formats(
            &[
                ("Departure time", &self.departure_time),
                ("Arrival time", &self.arrival_time),
            ],
            problems,
        );

        if let (Some(departure), Some(arrival)) = (self.departure(), self.arrival()) {
            if arrival < departure {
                problems.push("Arrival must not precede departure".to_string());
            }
        }
    }
}

/// The call at the arrival port: first berth (or STS anchorage) to last berth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortCall {
    pub arrival_port: String,
    pub arrival_jurisdiction: Jurisdiction,
    pub arrival_date: Option<String>,
    pub arrival_time: Option<String>,
    pub departure_date: Option<String>,
    pub departure_time: Option<String>,
    pub port_limits: PortLimits,
    /// Declared stay in hours, used when the berth times are incomplete.
    pub total_stay_hours: f64,
}

impl PortCall {
    pub fn arrival(&self) -> Option<NaiveDateTime> {
        combine(self.arrival_date.as_deref(), self.arrival_time.as_deref())
    }

    pub fn departure(&self) -> Option<NaiveDateTime> {
        combine(self.departure_date.as_deref(), self.departure_time.as_deref())
    }

    /// Elapsed berth time when complete, otherwise the declared stay if positive.
    pub fn stay_hours(&self) -> Option<f64> {
        match (self.arrival(), self.departure()) {
            (Some(arrival), Some(departure)) => {
                Some((departure - arrival).num_minutes() as f64 / 60.0)
            }
            _ if self.total_stay_hours > 0.0 => Some(self.total_stay_hours),
            _ => None,
        }
    }

    fn validate(&self, problems: &mut Vec<String>) {
        check_date_formats(
            &[
                ("Port arrival date", &self.arrival_date),
                ("Port departure date", &self.departure_date),
            ],
            problems,
        );
        check_time_formats(
            &[
                ("Port arrival time", &self.arrival_time),
                ("Port departure time", &self.departure_time),
            ],
            problems,
        );

        if let (Some(arrival), Some(departure)) = (self.arrival(), self.departure()) {
            if departure < arrival {
                problems.push("Port departure must not precede port arrival".to_string());
            }
        }
        if !self.total_stay_hours.is_finite() || self.total_stay_hours < 0.0 {
            problems.push(format!(
                "total_stay_hours must be a finite non-negative number, got {}",
                self.total_stay_hours
            ));
        }
    }
}

/// Descriptive and regulatory metadata for one voyage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoyageContext {
    pub vessel_name: String,
    pub imo_number: String,
    pub dual_fuel: bool,
    pub voyage_number: String,
    pub emission_statement_number: Option<String>,
    pub route: Route,
    pub schedule: Schedule,
    pub port_call: PortCall,
    /// Fuel the main engine is set up to burn.
    pub main_engine_fuel: Option<FuelType>,
    /// Fuel the auxiliary engines are set up to burn.
    pub auxiliary_engine_fuel: Option<FuelType>,
    pub distance_nm: f64,
    pub cargo_tonnes: f64,
    pub condition: Condition,
    pub port_activity: PortActivity,
    /// Share of the voyage in EU ETS scope (0, 50 or 100 percent).
    pub eu_ets_voyage_pct: f64,
    /// Share of the voyage in FuelEU Maritime scope (0, 50 or 100 percent).
    pub fueleu_voyage_pct: f64,
    pub regulatory_year: u16,
    /// Declared for completeness; not used by the current formulas.
    pub gwp_ch4: f64,
    /// Declared for completeness; not used by the current formulas.
    pub gwp_n2o: f64,
    pub regulatory: RegulatoryParameters,
}

impl Default for VoyageContext {
    fn default() -> Self {
        Self {
            vessel_name: String::new(),
            imo_number: String::new(),
            dual_fuel: false,
            voyage_number: String::new(),
            emission_statement_number: None,
            route: Route::default(),
            schedule: Schedule::default(),
            port_call: PortCall::default(),
            main_engine_fuel: None,
            auxiliary_engine_fuel: None,
            distance_nm: 0.0,
            cargo_tonnes: 0.0,
            condition: Condition::default(),
            port_activity: PortActivity::default(),
            eu_ets_voyage_pct: 100.0,
            fueleu_voyage_pct: 100.0,
            regulatory_year: DEFAULT_REGULATORY_YEAR,
            gwp_ch4: DEFAULT_GWP_CH4,
            gwp_n2o: DEFAULT_GWP_N2O,
            regulatory: RegulatoryParameters::default(),
        }
    }
}

impl VoyageContext {
    /// Collect every input problem in the voyage metadata.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if !is_valid_imo_number(&self.imo_number) {
            problems.push(format!(
                "IMO number must be exactly 7 digits, got '{}'",
                self.imo_number
            ));
        }

        self.schedule.validate(&mut problems);
        self.port_call.validate(&mut problems);

        let quantities = [
            (self.distance_nm, "distance_nm"),
            (self.cargo_tonnes, "cargo_tonnes"),
        ];
        for (value, field) in quantities {
            if !value.is_finite() || value < 0.0 {
                problems.push(format!(
                    "{field} must be a finite non-negative number, got {value}"
                ));
            }
        }

        let shares = [
            (self.eu_ets_voyage_pct, "EU ETS voyage share"),
            (self.fueleu_voyage_pct, "FuelEU voyage share"),
        ];
        for (value, label) in shares {
            if !is_valid_voyage_share(value) {
                problems.push(format!("{label} must be 0, 50 or 100, got {value}"));
            }
        }

        problems
    }

    pub fn sailing_hours(&self) -> Option<f64> {
        self.schedule.sailing_hours()
    }
}

/// True for exactly seven ASCII digits.
pub fn is_valid_imo_number(imo: &str) -> bool {
    imo.len() == 7 && imo.bytes().all(|b| b.is_ascii_digit())
}

pub fn is_valid_voyage_share(pct: f64) -> bool {
    VOYAGE_SHARES.contains(&pct)
}

/// Parse a `dd/mm/yyyy` date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Parse an `hh:mm` time.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT).ok()
}

fn check_date_formats(fields: &[(&str, &Option<String>)], problems: &mut Vec<String>) {
    for (label, value) in fields {
        if let Some(raw) = non_blank(value.as_deref()) {
            if parse_date(raw).is_none() {
                problems.push(format!("{label} format must be dd/mm/yyyy, got '{raw}'"));
            }
        }
    }
}

fn check_time_formats(fields: &[(&str, &Option<String>)], problems: &mut Vec<String>) {
    for (label, value) in fields {
        if let Some(raw) = non_blank(value.as_deref()) {
            if parse_time(raw).is_none() {
                problems.push(format!("{label} format must be hh:mm, got '{raw}'"));
            }
        }
    }
}

fn combine(date: Option<&str>, time: Option<&str>) -> Option<NaiveDateTime> {
    let date = parse_date(non_blank(date)?)?;
    let time = parse_time(non_blank(time)?)?;
    Some(date.and_time(time))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}
