//! # Constants and type definitions for Neoplan
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! definitions** used throughout the `neoplan` library.
//!
//! ## Overview
//!
//! - Angular unit conversions (degrees ↔ radians ↔ arcseconds)
//! - Time anchors for sidereal-time computation (J2000 epoch in MJD)
//! - Core type aliases shared across the crate
//! - Default thresholds for cross-source matching and observability sampling
//!
//! These definitions are used by the geometry kernel ([`crate::astro`]), the
//! deduplicator and the observability engine.

/// 2π, useful for trigonometric normalization
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648_000.0;

/// Arcseconds per degree
pub const ARCSEC_PER_DEG: f64 = 3600.0;

/// Default cone-search radius for cross-source matching (arcseconds)
pub const DEFAULT_MATCH_RADIUS_ARCSEC: f64 = 2.0;

/// Default epoch window for cross-source matching (seconds)
pub const DEFAULT_EPOCH_WINDOW_S: f64 = 3600.0;

/// Default sun-altitude sampling step for the dark-window scan (seconds)
pub const DEFAULT_DARK_STEP_S: f64 = 15.0 * 60.0;

/// Default target-altitude sampling step inside the dark window (seconds)
pub const DEFAULT_ALTITUDE_STEP_S: f64 = 10.0 * 60.0;

/// Horizon over which the dark window is searched (seconds)
pub const DARK_SCAN_HORIZON_S: f64 = 24.0 * 3600.0;

/// Floor applied to `arc_days` in the orbit-uncertainty score term (days).
/// Brand-new detections report arcs of a few minutes; without a floor the
/// reciprocal term would dominate every other factor.
pub const ARC_DAYS_FLOOR: f64 = 1.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in meters
pub type Meter = f64;
/// Apparent or absolute magnitude
pub type Magnitude = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
