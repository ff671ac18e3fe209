//! # Astronomical geometry kernel
//!
//! Pure, stateless geometry used by the observability engine:
//!
//! - [`horizon`] — sidereal time, equatorial → topocentric altitude,
//!   great-circle separation, and the Pickering (2002) airmass formula.
//! - [`sun`] — low-precision solar RA/Dec (Meeus, *Astronomical Algorithms*,
//!   ch. 25 truncation, good to ~0.01°).
//! - [`moon`] — low-precision lunar RA/Dec (Meeus ch. 47 principal terms,
//!   good to ~0.3°, ample for a Moon-separation gate expressed in tens of
//!   degrees).
//!
//! The pipeline is a ranking/filtering layer, not an ephemeris authority:
//! these analytic models trade arcminute-level precision for zero external
//! state, which keeps the engine a pure function that is safe to fan out
//! per target.

pub mod horizon;
pub mod moon;
pub mod sun;

use crate::constants::Radian;

/// Equatorial position at one instant, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaDec {
    pub ra: Radian,
    pub dec: Radian,
}
