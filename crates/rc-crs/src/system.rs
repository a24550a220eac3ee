//! Supported coordinate systems and their conversion to and from WGS84.
//!
//! WGS84 geographic coordinates are the hub: every other system knows how to
//! reach it and how to come back.  Geographic coordinates are always in
//! longitude/latitude order (`x = lon`, `y = lat`).
//!
//! | System        | EPSG          | Model                                  |
//! |---------------|---------------|----------------------------------------|
//! | WGS84         | 4326          | identity                               |
//! | Web Mercator  | 3857 (900913) | spherical Mercator, R = 6 378 137 m    |
//! | UTM north     | 32601..=32660 | transverse Mercator on the ellipsoid   |
//! | UTM south     | 32701..=32760 | as north, false northing 10 000 000 m  |

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use std::fmt;
use std::str::FromStr;

use rc_core::Coord;

use crate::{CrsError, CrsResult};

/// WGS84 semi-major axis, also the Web Mercator sphere radius.
const SEMI_MAJOR_M: f64 = 6_378_137.0;
const INV_FLATTENING: f64 = 298.257_223_563;

const UTM_SCALE: f64 = 0.9996;
const UTM_FALSE_EASTING: f64 = 500_000.0;
const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// A coordinate reference system this crate can transform.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CoordinateSystem {
    Wgs84,
    WebMercator,
    Utm { zone: u8, north: bool },
}

impl CoordinateSystem {
    /// Resolve an identifier such as `"EPSG:32630"`, `"epsg:4326"` or
    /// `"3857"`.
    ///
    /// # Errors
    ///
    /// [`CrsError::UnknownSystem`] for anything that is not a supported
    /// EPSG code.
    pub fn from_id(id: &str) -> CrsResult<Self> {
        let trimmed = id.trim();
        let code = match trimmed.split_once(':') {
            Some((authority, code)) if authority.trim().eq_ignore_ascii_case("epsg") => code.trim(),
            Some(_) => return Err(CrsError::UnknownSystem(id.to_owned())),
            None => trimmed,
        };
        let code: u32 = code.parse().map_err(|_| CrsError::UnknownSystem(id.to_owned()))?;
        Self::from_epsg(code).ok_or_else(|| CrsError::UnknownSystem(id.to_owned()))
    }

    pub fn from_epsg(code: u32) -> Option<Self> {
        match code {
            4326 => Some(CoordinateSystem::Wgs84),
            3857 | 900913 => Some(CoordinateSystem::WebMercator),
            32601..=32660 => Some(CoordinateSystem::Utm { zone: (code - 32600) as u8, north: true }),
            32701..=32760 => Some(CoordinateSystem::Utm { zone: (code - 32700) as u8, north: false }),
            _ => None,
        }
    }

    pub fn epsg(&self) -> u32 {
        match *self {
            CoordinateSystem::Wgs84 => 4326,
            CoordinateSystem::WebMercator => 3857,
            CoordinateSystem::Utm { zone, north: true } => 32600 + u32::from(zone),
            CoordinateSystem::Utm { zone, north: false } => 32700 + u32::from(zone),
        }
    }

    pub fn is_geographic(&self) -> bool {
        matches!(self, CoordinateSystem::Wgs84)
    }

    /// Convert a coordinate in this system to WGS84 longitude/latitude.
    pub fn to_wgs84(&self, c: Coord) -> Coord {
        match *self {
            CoordinateSystem::Wgs84 => c,
            CoordinateSystem::WebMercator => from_mercator(c),
            CoordinateSystem::Utm { zone, north } => utm_inverse(c, zone, north),
        }
    }

    /// Convert a WGS84 longitude/latitude into this system.
    pub fn from_wgs84(&self, c: Coord) -> Coord {
        match *self {
            CoordinateSystem::Wgs84 => c,
            CoordinateSystem::WebMercator => to_mercator(c),
            CoordinateSystem::Utm { zone, north } => utm_forward(c, zone, north),
        }
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

impl FromStr for CoordinateSystem {
    type Err = CrsError;

    fn from_str(s: &str) -> CrsResult<Self> {
        Self::from_id(s)
    }
}

// ── Web Mercator ──────────────────────────────────────────────────────────────

fn to_mercator(c: Coord) -> Coord {
    let x = c.x.to_radians() * SEMI_MAJOR_M;
    let y = (FRAC_PI_4 + c.y.to_radians() / 2.0).tan().ln() * SEMI_MAJOR_M;
    Coord { x, y }
}

fn from_mercator(c: Coord) -> Coord {
    let lon = (c.x / SEMI_MAJOR_M).to_degrees();
    let lat = (2.0 * (c.y / SEMI_MAJOR_M).exp().atan() - FRAC_PI_2).to_degrees();
    Coord { x: lon, y: lat }
}

// ── Transverse Mercator (UTM) ─────────────────────────────────────────────────

struct Ellipsoid {
    e2:  f64,
    ep2: f64,
}

impl Ellipsoid {
    fn wgs84() -> Self {
        let f = 1.0 / INV_FLATTENING;
        let e2 = f * (2.0 - f);
        Self { e2, ep2: e2 / (1.0 - e2) }
    }

    /// Meridian arc length from the equator to `phi`.
    fn meridian_arc(&self, phi: f64) -> f64 {
        let e2 = self.e2;
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        SEMI_MAJOR_M
            * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
                - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
    }
}

fn central_meridian(zone: u8) -> f64 {
    (f64::from(zone) - 1.0) * 6.0 - 180.0 + 3.0
}

fn utm_forward(c: Coord, zone: u8, north: bool) -> Coord {
    let ell = Ellipsoid::wgs84();
    let phi = c.y.to_radians();
    let dlon = (c.x - central_meridian(zone)).to_radians();

    let (sin_phi, cos_phi) = phi.sin_cos();
    let tan_phi = phi.tan();
    let n = SEMI_MAJOR_M / (1.0 - ell.e2 * sin_phi * sin_phi).sqrt();
    let t = tan_phi * tan_phi;
    let cc = ell.ep2 * cos_phi * cos_phi;
    let a = dlon * cos_phi;
    let m = ell.meridian_arc(phi);

    let a2 = a * a;
    let a3 = a2 * a;
    let a4 = a3 * a;
    let a5 = a4 * a;
    let a6 = a5 * a;

    let x = UTM_SCALE
        * n
        * (a + (1.0 - t + cc) * a3 / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * cc - 58.0 * ell.ep2) * a5 / 120.0)
        + UTM_FALSE_EASTING;
    let mut y = UTM_SCALE
        * (m + n
            * tan_phi
            * (a2 / 2.0
                + (5.0 - t + 9.0 * cc + 4.0 * cc * cc) * a4 / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * cc - 330.0 * ell.ep2) * a6 / 720.0));
    if !north {
        y += UTM_FALSE_NORTHING_SOUTH;
    }
    Coord { x, y }
}

fn utm_inverse(c: Coord, zone: u8, north: bool) -> Coord {
    let ell = Ellipsoid::wgs84();
    let e2 = ell.e2;
    let x = c.x - UTM_FALSE_EASTING;
    let y = if north { c.y } else { c.y - UTM_FALSE_NORTHING_SOUTH };

    let m = y / UTM_SCALE;
    let mu = m
        / (SEMI_MAJOR_M
            * (1.0 - e2 / 4.0 - 3.0 * e2 * e2 / 64.0 - 5.0 * e2 * e2 * e2 / 256.0));
    let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let (sin1, cos1) = phi1.sin_cos();
    let tan1 = phi1.tan();
    let denom = 1.0 - e2 * sin1 * sin1;
    let n1 = SEMI_MAJOR_M / denom.sqrt();
    let t1 = tan1 * tan1;
    let c1 = ell.ep2 * cos1 * cos1;
    let r1 = SEMI_MAJOR_M * (1.0 - e2) / denom.powf(1.5);
    let d = x / (n1 * UTM_SCALE);

    let d2 = d * d;
    let d3 = d2 * d;
    let d4 = d3 * d;
    let d5 = d4 * d;
    let d6 = d5 * d;

    let phi = phi1
        - (n1 * tan1 / r1)
            * (d2 / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ell.ep2) * d4 / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ell.ep2
                    - 3.0 * c1 * c1)
                    * d6
                    / 720.0);
    let dlon = (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
        + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ell.ep2 + 24.0 * t1 * t1) * d5
            / 120.0)
        / cos1;

    Coord { x: central_meridian(zone) + dlon.to_degrees(), y: phi.to_degrees() }
}
