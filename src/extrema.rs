//! # Perigee and Apogee Search
//!
//! Two-phase local-extremum search over one calendar year:
//!
//! 1. **Coarse scan**: sample the distance function every `coarse_step_hours`
//!    (6 h by default) from Jan 1 00:00 through Dec 31 00:00 inclusive.
//! 2. **Candidate detection**: an interior sample strictly below both neighbours is a
//!    perigee candidate, strictly above both an apogee candidate. Plateaus produce nothing.
//! 3. **Refinement**: sample every `refine_step_minutes` (5 min) across
//!    ±`refine_half_window_hours` (12 h) around each candidate, clamped to the scan range,
//!    and keep the first sample reaching the window's minimum or maximum.
//! 4. **Sort**: partition by kind and order each list by timestamp.
//!
//! Every candidate yields exactly one refined event. Two candidates whose windows
//! overlap may refine to the same instant; both are kept.
//!
//! The distance function is any `Fn(NaiveDateTime) -> Result<f64, EphemerisError>`. The
//! first lookup failure aborts the whole search; no partial result is returned.

use crate::config::{Config, SearchConfig};
use crate::lunar::EphemerisError;
use crate::{DistanceSample, ExtremumCandidate, ExtremumKind, RefinedExtremum, YearResult};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use log::debug;
use thiserror::Error;

/// Errors that can occur during the extrema search.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtremaError {
    /// The distance function rejected a timestamp derived from the requested year
    #[error("invalid input: {0}")]
    InvalidInput(#[from] EphemerisError),

    /// The year has no calendar representation
    #[error("invalid input: year {year} cannot be represented as a calendar date")]
    DateOutOfRange { year: i32 },

    /// Sampling steps or windows that would not advance
    #[error("invalid search parameters: {0}")]
    InvalidParameters(&'static str),
}

impl ExtremaError {
    /// True for every variant caused by the requested year rather than the configuration.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ExtremaError::InvalidInput(_) | ExtremaError::DateOutOfRange { .. }
        )
    }
}

/// Find the perigees and apogees of `year` with the default sampling steps.
///
/// # Example
/// ```
/// use lunar_distance_lib::extrema::find_extremes;
/// use lunar_distance_lib::lunar::EphemerisModel;
///
/// let result = find_extremes(2024, |t| EphemerisModel::Meeus.distance_km(t)).unwrap();
/// assert!((12..=14).contains(&result.perigees.len()));
/// assert!((12..=14).contains(&result.apogees.len()));
/// ```
pub fn find_extremes<F>(year: i32, distance_at: F) -> Result<YearResult, ExtremaError>
where
    F: Fn(NaiveDateTime) -> Result<f64, EphemerisError>,
{
    find_extremes_with(year, &SearchConfig::default(), distance_at)
}

/// Run the search with the built-in ephemeris model selected in `config`.
pub fn find_lunar_extremes(year: i32, config: &Config) -> Result<YearResult, ExtremaError> {
    let model = config.ephemeris.model;
    debug!("Searching {} with the {} ephemeris", year, model);
    find_extremes_with(year, &config.search, |t| model.distance_km(t))
}

/// Find the perigees and apogees of `year` with explicit sampling steps.
pub fn find_extremes_with<F>(
    year: i32,
    search: &SearchConfig,
    distance_at: F,
) -> Result<YearResult, ExtremaError>
where
    F: Fn(NaiveDateTime) -> Result<f64, EphemerisError>,
{
    let (coarse_step, half_window, fine_step) = validate(search)?;
    let (scan_start, scan_end) = scan_bounds(year)?;

    let samples = coarse_scan(scan_start, scan_end, coarse_step, &distance_at)?;
    let candidates = detect_candidates(&samples);
    debug!(
        "Coarse scan of {}: {} samples, {} candidates",
        year,
        samples.len(),
        candidates.len()
    );

    let mut perigees = Vec::new();
    let mut apogees = Vec::new();
    for candidate in &candidates {
        let t = candidate.approximate_timestamp;
        let window_start = t
            .checked_sub_signed(half_window)
            .map_or(scan_start, |s| s.max(scan_start));
        let window_end = t
            .checked_add_signed(half_window)
            .map_or(scan_end, |e| e.min(scan_end));
        let refined = refine_candidate(
            candidate,
            window_start,
            window_end,
            fine_step,
            &distance_at,
        )?;
        match refined.kind {
            ExtremumKind::Perigee => perigees.push(refined),
            ExtremumKind::Apogee => apogees.push(refined),
        }
    }

    // Stable sort keeps candidate order for equal timestamps
    perigees.sort_by_key(|e| e.timestamp);
    apogees.sort_by_key(|e| e.timestamp);

    debug!(
        "Refined {}: {} perigees, {} apogees",
        year,
        perigees.len(),
        apogees.len()
    );

    Ok(YearResult {
        year,
        perigees,
        apogees,
    })
}

/// Sample `distance_at` from `start` through `end` inclusive at `step` spacing.
pub fn coarse_scan<F>(
    start: NaiveDateTime,
    end: NaiveDateTime,
    step: Duration,
    distance_at: &F,
) -> Result<Vec<DistanceSample>, ExtremaError>
where
    F: Fn(NaiveDateTime) -> Result<f64, EphemerisError>,
{
    let mut samples = Vec::new();
    let mut current = Some(start);
    // A step past chrono's last representable instant ends the scan
    while let Some(t) = current.filter(|t| *t <= end) {
        samples.push(DistanceSample {
            timestamp: t,
            distance_km: distance_at(t)?,
        });
        current = t.checked_add_signed(step);
    }
    Ok(samples)
}

/// Strict local minima and maxima among the interior samples, in scan order.
pub fn detect_candidates(samples: &[DistanceSample]) -> Vec<ExtremumCandidate> {
    samples
        .windows(3)
        .filter_map(|w| {
            let (prev, here, next) = (w[0].distance_km, w[1].distance_km, w[2].distance_km);
            let kind = if here < prev && here < next {
                ExtremumKind::Perigee
            } else if here > prev && here > next {
                ExtremumKind::Apogee
            } else {
                return None;
            };
            Some(ExtremumCandidate {
                approximate_timestamp: w[1].timestamp,
                kind,
            })
        })
        .collect()
}

/// Densely sample `[window_start, window_end]` and return the first sample reaching
/// the window's minimum (perigee) or maximum (apogee).
pub fn refine_candidate<F>(
    candidate: &ExtremumCandidate,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
    step: Duration,
    distance_at: &F,
) -> Result<RefinedExtremum, ExtremaError>
where
    F: Fn(NaiveDateTime) -> Result<f64, EphemerisError>,
{
    let mut best = DistanceSample {
        timestamp: window_start,
        distance_km: distance_at(window_start)?,
    };

    let mut current = window_start.checked_add_signed(step);
    while let Some(t) = current.filter(|t| *t <= window_end) {
        let distance_km = distance_at(t)?;
        let better = match candidate.kind {
            ExtremumKind::Perigee => distance_km < best.distance_km,
            ExtremumKind::Apogee => distance_km > best.distance_km,
        };
        if better {
            best = DistanceSample {
                timestamp: t,
                distance_km,
            };
        }
        current = t.checked_add_signed(step);
    }

    Ok(RefinedExtremum {
        timestamp: best.timestamp,
        distance_km: best.distance_km,
        kind: candidate.kind,
    })
}

/// First and last instants of the coarse scan: Jan 1 00:00 and Dec 31 00:00.
pub fn scan_bounds(year: i32) -> Result<(NaiveDateTime, NaiveDateTime), ExtremaError> {
    let midnight = |month, day| {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or(ExtremaError::DateOutOfRange { year })
    };
    Ok((midnight(1, 1)?, midnight(12, 31)?))
}

fn validate(search: &SearchConfig) -> Result<(Duration, Duration, Duration), ExtremaError> {
    if search.coarse_step_hours <= 0 {
        return Err(ExtremaError::InvalidParameters(
            "coarse_step_hours must be positive",
        ));
    }
    if search.refine_half_window_hours < 0 {
        return Err(ExtremaError::InvalidParameters(
            "refine_half_window_hours must not be negative",
        ));
    }
    if search.refine_step_minutes <= 0 {
        return Err(ExtremaError::InvalidParameters(
            "refine_step_minutes must be positive",
        ));
    }
    // Guard against Duration overflow on absurd values
    let hours = |h: i64| {
        Duration::try_hours(h).ok_or(ExtremaError::InvalidParameters("step too large"))
    };
    let minutes = Duration::try_minutes(search.refine_step_minutes)
        .ok_or(ExtremaError::InvalidParameters("step too large"))?;
    Ok((
        hours(search.coarse_step_hours)?,
        hours(search.refine_half_window_hours)?,
        minutes,
    ))
}
