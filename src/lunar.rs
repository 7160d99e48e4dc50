//! Earth–Moon distance models.
//!
//! Two stateless models are available, both mapping a civil UTC timestamp to the
//! geocentric distance of the Moon in kilometers:
//!
//! - **Meeus** (default): the distance terms of the truncated ELP-2000/82 series from
//!   J. Meeus, *Astronomical Algorithms* (2nd ed.), chapter 47, table 47.A.
//!   Accuracy: a few km; dynamical time is taken equal to UT (ΔT ignored, which shifts
//!   event times by about a minute for modern dates).
//! - **Schaefer**: the low-precision anomalistic-cycle distance from Sky & Telescope
//!   "MOONFX.BAS" (Apr 1994). Accuracy: ~6 % for Δ, but cheap and smooth.
//!
//! Timestamps outside years 1..=9999 are rejected with [`EphemerisError::OutOfRange`].

use chrono::{Datelike, NaiveDateTime, Timelike};
use core::f64::consts::PI;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use thiserror::Error;

/// Years the built-in models accept.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1..=9999;

/// Equatorial Earth radius (km), used to convert Schaefer's Earth-radii output.
pub const EARTH_RADIUS_KM: f64 = 6378.137;

/// Julian Day of the Unix epoch (1970-01-01 00:00 UTC).
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Julian Day of J2000.0 (2000-01-01 12:00 TT).
const J2000_JD: f64 = 2_451_545.0;

/// Errors raised by a distance lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EphemerisError {
    /// The requested instant lies outside the model's supported range
    #[error("year {year} is outside the supported ephemeris range")]
    OutOfRange { year: i32 },
}

/// Built-in distance model selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EphemerisModel {
    /// Truncated ELP-2000/82 series (Meeus ch. 47)
    #[default]
    Meeus,
    /// Schaefer 1994 low-precision cycle model
    Schaefer,
}

impl EphemerisModel {
    /// Geocentric Moon distance in km at `at` (civil UTC).
    pub fn distance_km(&self, at: NaiveDateTime) -> Result<f64, EphemerisError> {
        if !SUPPORTED_YEARS.contains(&at.year()) {
            return Err(EphemerisError::OutOfRange { year: at.year() });
        }
        let km = match self {
            EphemerisModel::Meeus => meeus_distance_km(julian_day(at)),
            EphemerisModel::Schaefer => {
                let day = at.day() as f64
                    + (at.hour() as f64 + at.minute() as f64 / 60.0 + at.second() as f64 / 3600.0)
                        / 24.0;
                schaefer_distance_er(at.year(), at.month(), day) * EARTH_RADIUS_KM
            }
        };
        Ok(km)
    }
}

impl fmt::Display for EphemerisModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EphemerisModel::Meeus => write!(f, "meeus"),
            EphemerisModel::Schaefer => write!(f, "schaefer"),
        }
    }
}

impl FromStr for EphemerisModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "meeus" => Ok(EphemerisModel::Meeus),
            "schaefer" => Ok(EphemerisModel::Schaefer),
            other => Err(format!(
                "unknown ephemeris model '{other}' (expected 'meeus' or 'schaefer')"
            )),
        }
    }
}

/// Julian Day for a civil UTC timestamp.
pub fn julian_day(at: NaiveDateTime) -> f64 {
    let utc = at.and_utc();
    let seconds = utc.timestamp() as f64 + utc.timestamp_subsec_nanos() as f64 * 1e-9;
    UNIX_EPOCH_JD + seconds / 86_400.0
}

/// Multipliers of (D, M, M', F) and the distance coefficient in units of 0.001 km.
/// Rows with a zero distance coefficient in table 47.A are omitted.
const DISTANCE_TERMS: [(i8, i8, i8, i8, f64); 45] = [
    (0, 0, 1, 0, -20_905_355.0),
    (2, 0, -1, 0, -3_699_111.0),
    (2, 0, 0, 0, -2_955_968.0),
    (0, 0, 2, 0, -569_925.0),
    (0, 1, 0, 0, 48_888.0),
    (0, 0, 0, 2, -3_149.0),
    (2, 0, -2, 0, 246_158.0),
    (2, -1, -1, 0, -152_138.0),
    (2, 0, 1, 0, -170_733.0),
    (2, -1, 0, 0, -204_586.0),
    (0, 1, -1, 0, -129_620.0),
    (1, 0, 0, 0, 108_743.0),
    (0, 1, 1, 0, 104_755.0),
    (2, 0, 0, -2, 10_321.0),
    (0, 0, 1, -2, 79_661.0),
    (4, 0, -1, 0, -34_782.0),
    (0, 0, 3, 0, -23_210.0),
    (4, 0, -2, 0, -21_636.0),
    (2, 1, -1, 0, 24_208.0),
    (2, 1, 0, 0, 30_824.0),
    (1, 0, -1, 0, -8_379.0),
    (1, 1, 0, 0, -16_675.0),
    (2, -1, 1, 0, -12_831.0),
    (2, 0, 2, 0, -10_445.0),
    (4, 0, 0, 0, -11_650.0),
    (2, 0, -3, 0, 14_403.0),
    (0, 1, -2, 0, -7_003.0),
    (2, -1, -2, 0, 10_056.0),
    (1, 0, 1, 0, 6_322.0),
    (2, -2, 0, 0, -9_884.0),
    (0, 1, 2, 0, 5_751.0),
    (2, -2, -1, 0, -4_950.0),
    (2, 0, 1, -2, 4_130.0),
    (4, -1, -1, 0, -3_958.0),
    (3, 0, -1, 0, 3_258.0),
    (2, 1, 1, 0, 2_616.0),
    (4, -1, -2, 0, -1_897.0),
    (0, 2, -1, 0, -2_117.0),
    (2, 2, -1, 0, 2_354.0),
    (4, 0, 1, 0, -1_423.0),
    (0, 0, 4, 0, -1_117.0),
    (4, -1, 0, 0, -1_571.0),
    (1, 0, -2, 0, -1_739.0),
    (0, 0, 2, -2, -4_421.0),
    (2, 0, -1, -2, 8_752.0),
];

/// Geocentric Moon distance (km) at Julian Day `jd`, truncated ELP-2000/82.
pub fn meeus_distance_km(jd: f64) -> f64 {
    let t = (jd - J2000_JD) / 36_525.0;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    // Mean elongation, solar anomaly, lunar anomaly, argument of latitude (degrees)
    let d = 297.850_192_1 + 445_267.111_403_4 * t - 0.001_881_9 * t2 + t3 / 545_868.0
        - t4 / 113_065_000.0;
    let m = 357.529_109_2 + 35_999.050_290_9 * t - 0.000_153_6 * t2 + t3 / 24_490_000.0;
    let mp = 134.963_396_4 + 477_198.867_505_5 * t + 0.008_741_4 * t2 + t3 / 69_699.0
        - t4 / 14_712_000.0;
    let f = 93.272_095_0 + 483_202.017_523_3 * t - 0.003_653_9 * t2 - t3 / 3_526_000.0
        + t4 / 863_310_000.0;

    // Eccentricity of Earth's orbit scales every term involving M
    let e = 1.0 - 0.002_516 * t - 0.000_007_4 * t2;

    let (d, m, mp, f) = (
        d.to_radians(),
        m.to_radians(),
        mp.to_radians(),
        f.to_radians(),
    );

    let sigma_r: f64 = DISTANCE_TERMS
        .iter()
        .map(|&(cd, cm, cmp, cf, coeff)| {
            let arg = cd as f64 * d + cm as f64 * m + cmp as f64 * mp + cf as f64 * f;
            let scale = match cm.abs() {
                0 => 1.0,
                1 => e,
                _ => e * e,
            };
            coeff * scale * arg.cos()
        })
        .sum();

    385_000.56 + sigma_r / 1000.0
}

/// Schaefer's low-precision geocentric distance in Earth radii for a
/// proleptic-Gregorian Y-M-D.
///
/// `year` is astronomer's year (e.g. 2000).
/// `month` is 1 = Jan … 12 = Dec.
/// `day` can be fractional (UTC noon = 0.5).
pub fn schaefer_distance_er(year: i32, month: u32, day: f64) -> f64 {
    // Jan/Feb treated as months 13/14 of the previous year
    let (mut y, mut m) = (year, month as i32);
    if m < 3 {
        y -= 1;
        m += 12;
    }
    m += 1;

    // Days from the 1900-01-00 12 UT new moon epoch (S&T 1985)
    let days = (365.25 * y as f64).floor() + (30.6 * m as f64).floor() + day - 694_039.09;

    // Fraction of the current synodic month
    let synodic = frac(days / 29.530_588_2);

    // Fraction of the current anomalistic month, as an angle
    let dp = frac((days + 2_451_550.1 - 2_451_562.2) / 27.554_549_88) * 2.0 * PI;
    let two_elong = 2.0 * synodic * 2.0 * PI;

    60.4 - 3.3 * dp.cos() - 0.6 * (two_elong - dp).cos() - 0.5 * two_elong.cos()
}

fn frac(v: f64) -> f64 {
    let r = v - v.floor();
    if r < 0.0 {
        r + 1.0
    } else {
        r
    }
}
