//! # Lunar Distance Core Library
//!
//! This library finds the Moon's perigees (closest approaches) and apogees (farthest
//! approaches) for a calendar year and provides the plain data types that carry the
//! results to the presentation layer.
//!
//! ## Design Philosophy
//!
//! ### Compute first, render later
//! The search produces a complete [`YearResult`] before anything is printed. Rendering
//! lives in [`renderer`] and never feeds back into the computation, so the search can be
//! tested with synthetic distance functions and no terminal at all.
//!
//! ### Stateless ephemeris
//! Distance lookups are pure functions of a civil UTC timestamp
//! (`Fn(NaiveDateTime) -> Result<f64, EphemerisError>`). The built-in models in [`lunar`]
//! hold no "current date"; tests substitute closures freely.
//!
//! ### Temporal Resolution
//! The search runs in two phases:
//! - **Coarse scan**: every 6 hours from Jan 1 00:00 to Dec 31 00:00 (1457 or 1461 samples)
//! - **Refinement**: every 5 minutes across ±12 hours around each coarse candidate
//!   (289 samples per candidate)
//!
//! ### Data Flow
//! 1. **Scan**: sample the distance function over the year
//! 2. **Detect**: strict local minima become perigee candidates, strict maxima apogee candidates
//! 3. **Refine**: densely sample a window around each candidate
//! 4. **Sort**: partition by kind, order by time, hand off to [`renderer`]
//!
//! ## Core Types
//! - [`DistanceSample`]: one distance evaluation
//! - [`ExtremumCandidate`]: a coarse local extremum awaiting refinement
//! - [`RefinedExtremum`]: a final dated perigee or apogee
//! - [`YearResult`]: both sorted event lists for one year

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// Module declarations
pub mod config;
pub mod extrema;
pub mod lunar;
pub mod renderer;

/// Which end of the orbit an event marks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtremumKind {
    /// Closest approach (local distance minimum).
    Perigee,
    /// Farthest point (local distance maximum).
    Apogee,
}

/// A single Earth–Moon distance evaluation.
///
/// Samples only live for the duration of the scan that produced them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceSample {
    /// Civil UTC instant of the evaluation
    pub timestamp: NaiveDateTime,
    /// Center-to-center distance in kilometers
    pub distance_km: f64,
}

/// An approximate extremum found by comparing a coarse sample with its neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtremumCandidate {
    pub approximate_timestamp: NaiveDateTime,
    pub kind: ExtremumKind,
}

/// A refined perigee or apogee.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use lunar_distance_lib::{ExtremumKind, RefinedExtremum};
///
/// let perigee = RefinedExtremum {
///     timestamp: NaiveDate::from_ymd_opt(2024, 1, 13)
///         .unwrap()
///         .and_hms_opt(10, 35, 0)
///         .unwrap(),
///     distance_km: 362_267.0,
///     kind: ExtremumKind::Perigee,
/// };
///
/// assert_eq!(perigee.kind, ExtremumKind::Perigee);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RefinedExtremum {
    /// Instant of the extremum at refinement resolution
    pub timestamp: NaiveDateTime,
    /// Distance at that instant in kilometers
    pub distance_km: f64,
    pub kind: ExtremumKind,
}

/// Perigees and apogees of one calendar year, each sorted by timestamp.
///
/// The two lists are independent: a year usually has 12 to 14 of each, and the counts
/// need not match.
///
/// # Example
/// ```
/// use lunar_distance_lib::YearResult;
///
/// let empty = YearResult { year: 2024, perigees: vec![], apogees: vec![] };
/// assert!(empty.is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YearResult {
    pub year: i32,
    /// Refined perigees, ascending by timestamp
    pub perigees: Vec<RefinedExtremum>,
    /// Refined apogees, ascending by timestamp
    pub apogees: Vec<RefinedExtremum>,
}

impl YearResult {
    /// True when the scan found no strict local extremum of either kind.
    pub fn is_empty(&self) -> bool {
        self.perigees.is_empty() && self.apogees.is_empty()
    }

    /// Number of table rows needed to show both lists side by side.
    pub fn row_count(&self) -> usize {
        self.perigees.len().max(self.apogees.len())
    }
}
