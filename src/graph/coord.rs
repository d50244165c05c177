use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{Error, Result};

/// A latitude/longitude pair used as a vertex key
///
/// Equality and hashing use the exact bit pattern of both components.
/// `-0.0` is normalised to `0.0` on construction so that value-equal
/// coordinates always hash alike. Non-finite components are rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "RawCoord")]
pub struct Coord {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawCoord {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoord> for Coord {
    type Error = Error;

    fn try_from(raw: RawCoord) -> Result<Self> {
        Coord::new(raw.lat, raw.lng)
    }
}

impl Coord {
    /// Creates a coordinate, failing if either component is NaN or infinite
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(Error::NonFiniteCoordinate { lat, lng });
        }
        // `+ 0.0` turns -0.0 into 0.0 and leaves every other value unchanged
        Ok(Coord {
            lat: lat + 0.0,
            lng: lng + 0.0,
        })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    fn bits(&self) -> (u64, u64) {
        (self.lat.to_bits(), self.lng.to_bits())
    }
}

impl PartialEq for Coord {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for Coord {}

impl Hash for Coord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

impl From<Coord> for (f64, f64) {
    fn from(c: Coord) -> Self {
        (c.lat, c.lng)
    }
}
