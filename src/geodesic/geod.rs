use super::*;
use crate::ellipsoid::constants::{Shape, ELLIPSOID_LIST};
use crate::Error;
use log::debug;
use std::collections::BTreeMap;
use std::fmt;

/// Options for the forward and inverse solutions of [`Geod`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeodOptions {
    /// Angles (input and output) are in radians rather than degrees
    pub radians: bool,
    /// Report the azimuth at the terminus as a back azimuth, i.e. the
    /// direction from the terminus towards the initial point
    pub return_back_azimuth: bool,
}

impl Default for GeodOptions {
    fn default() -> GeodOptions {
        GeodOptions {
            radians: false,
            return_back_azimuth: true,
        }
    }
}

/// How to derive the number of intermediate points from a target spacing
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum NptsRounding {
    #[default]
    Round,
    Ceil,
    Trunc,
}

impl NptsRounding {
    fn apply(self, x: f64) -> f64 {
        match self {
            NptsRounding::Round => x.round(),
            NptsRounding::Ceil => x.ceil(),
            NptsRounding::Trunc => x.trunc(),
        }
    }
}

/// The spacing of intermediate points: either a number of points, or a
/// target distance between them, in meters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Spacing {
    Count(usize),
    Distance(f64),
}

/// Flags for the intermediate point computations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntermediateFlags {
    /// Rounding of the point count derived from a target spacing
    pub rounding: NptsRounding,
    /// With a target spacing: adjust it, so the points are evenly
    /// distributed along the full line
    pub recalculate_del_s: bool,
    /// Report the forward azimuth at each point
    pub keep_azimuths: bool,
    /// Angles (input and output) are in radians rather than degrees
    pub radians: bool,
}

impl Default for IntermediateFlags {
    fn default() -> IntermediateFlags {
        IntermediateFlags {
            rounding: NptsRounding::Round,
            recalculate_del_s: true,
            keep_azimuths: false,
            radians: false,
        }
    }
}

/// Intermediate points along a geodesic
#[derive(Debug, Clone, PartialEq)]
pub struct Intermediate {
    /// Number of points
    pub npts: usize,
    /// Distance between consecutive points
    pub del_s: f64,
    /// Length of the line
    pub dist: f64,
    pub lons: Vec<f64>,
    pub lats: Vec<f64>,
    /// Forward azimuths at the points, if requested
    pub azis: Option<Vec<f64>>,
}

/// Geodesic computations on a specific ellipsoid, in bulk and with the
/// conventions of the traditional `geod` program: longitude before
/// latitude, azimuths clockwise from north, back azimuths reported at
/// the terminus, distances in meters.
///
/// ```
/// # use geotrans::prelude::*;
/// # fn main() -> anyhow::Result<()> {
/// let geod = Geod::named("clrk66")?;
/// let (boston_lon, boston_lat) = (-71. - 7. / 60., 42. + 15. / 60.);
/// let (portland_lon, portland_lat) = (-123. - 41. / 60., 45. + 31. / 60.);
/// let (az12, az21, dist) = geod.inv(boston_lon, boston_lat, portland_lon, portland_lat);
/// assert_eq!(format!("{az12:.3} {az21:.3} {dist:.3}"), "-66.531 75.654 4164192.708");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Geod {
    a: f64,
    b: f64,
    f: f64,
    es: f64,
    sphere: bool,
    geodesic: Geodesic,
}

impl Default for Geod {
    fn default() -> Geod {
        Geod::build(6_378_137., 1. / 298.257_223_563, false)
    }
}

impl Geod {
    fn build(a: f64, f: f64, sphere: bool) -> Geod {
        let b = a * (1. - f);
        Geod {
            a,
            b,
            f,
            es: 1. - (b * b) / (a * a),
            sphere: sphere || f.abs() < 1e-8,
            geodesic: Geodesic::new(a, f),
        }
    }

    /// From the semimajor axis and the flattening
    #[must_use]
    pub fn new(a: f64, f: f64) -> Geod {
        Geod::build(a, f, false)
    }

    /// From the semimajor and semiminor axes
    #[must_use]
    pub fn from_axes(a: f64, b: f64) -> Geod {
        let mut geod = Geod::build(a, (a - b) / a, false);
        geod.b = b;
        geod.es = 1. - (b * b) / (a * a);
        geod
    }

    /// From the semimajor axis and the squared eccentricity
    #[must_use]
    pub fn from_eccentricity_squared(a: f64, es: f64) -> Geod {
        let b = (a * a - es * a * a).sqrt();
        let mut geod = Geod::build(a, (a - b) / a, false);
        geod.b = b;
        geod.es = es;
        geod
    }

    /// From one of the named ellipsoids, e.g. "WGS84", "GRS80", "clrk66"
    pub fn named(name: &str) -> Result<Geod, Error> {
        let Some((_, a, shape, description)) = Ellipsoid::definition(name) else {
            return Err(Error::NotFound(name.to_string(), ": unknown ellipsoid".to_string()));
        };
        let sphere = description.starts_with("Normal Sphere");
        let geod = match *shape {
            Shape::B(b) => {
                let mut geod = Geod::build(*a, (a - b) / a, sphere);
                geod.b = b;
                geod.es = 1. - (b * b) / (a * a);
                geod
            }
            Shape::Rf(rf) => Geod::build(*a, 1. / rf, sphere),
        };
        Ok(geod)
    }

    /// From a PROJ style definition, e.g. `+ellps=clrk66`, or
    /// `+a=6378137 +rf=298.257223563`. The shape is given by one of `b`,
    /// `rf`, `f`, `es` or `e` (in that order of precedence). Without any
    /// of them, the result is a sphere of radius `a`.
    /// Elements without a value, and unknown keys, are ignored
    pub fn from_definition(definition: &str) -> Result<Geod, Error> {
        let mut ellps = None;
        let mut numbers = BTreeMap::new();
        for element in definition.split_whitespace() {
            let Some((key, value)) = element.split_once('=') else {
                continue;
            };
            let key = key.trim_start_matches('+');
            match key {
                "ellps" => ellps = Some(value),
                "a" | "b" | "rf" | "f" | "es" | "e" => {
                    let Ok(number) = value.parse::<f64>() else {
                        return Err(Error::BadParam(key.to_string(), value.to_string()));
                    };
                    numbers.insert(key, number);
                }
                _ => debug!("Geod: ignoring parameter {key}"),
            }
        }

        if let Some(name) = ellps {
            return Geod::named(name);
        }

        let Some(&a) = numbers.get("a") else {
            return Err(Error::MissingParam("a".to_string()));
        };
        if let Some(&b) = numbers.get("b") {
            return Ok(Geod::from_axes(a, b));
        }
        if let Some(&rf) = numbers.get("rf") {
            return Ok(Geod::new(a, 1. / rf));
        }
        if let Some(&f) = numbers.get("f") {
            return Ok(Geod::new(a, f));
        }
        if let Some(&es) = numbers.get("es") {
            return Ok(Geod::from_eccentricity_squared(a, es));
        }
        if let Some(&e) = numbers.get("e") {
            return Ok(Geod::from_eccentricity_squared(a, e * e));
        }
        Ok(Geod::build(a, 0., true))
    }

    #[must_use]
    pub fn semimajor_axis(&self) -> f64 {
        self.a
    }

    #[must_use]
    pub fn semiminor_axis(&self) -> f64 {
        self.b
    }

    #[must_use]
    pub fn flattening(&self) -> f64 {
        self.f
    }

    #[must_use]
    pub fn eccentricity_squared(&self) -> f64 {
        self.es
    }

    #[must_use]
    pub fn is_sphere(&self) -> bool {
        self.sphere
    }

    #[must_use]
    pub fn geodesic(&self) -> &Geodesic {
        &self.geodesic
    }

    /// The forward solution with default options: the longitude,
    /// latitude and back azimuth of the point reached by travelling `dist`
    /// meters from (`lon`, `lat`) in the direction `az`
    #[must_use]
    pub fn fwd(&self, lon: f64, lat: f64, az: f64, dist: f64) -> (f64, f64, f64) {
        self.fwd_with(lon, lat, az, dist, &GeodOptions::default())
    }

    #[must_use]
    pub fn fwd_with(
        &self,
        lon: f64,
        lat: f64,
        az: f64,
        dist: f64,
        options: &GeodOptions,
    ) -> (f64, f64, f64) {
        let (lon, lat, az) = to_degrees(options.radians, (lon, lat, az));
        let sol = self.geodesic.direct(lat, lon, az, dist);
        let az2 = if options.return_back_azimuth {
            back_azimuth(sol.azi2)
        } else {
            sol.azi2
        };
        to_radians(options.radians, (sol.lon2, sol.lat2, az2))
    }

    /// The inverse solution with default options: the forward azimuth,
    /// the back azimuth, and the distance from (`lon1`, `lat1`) to
    /// (`lon2`, `lat2`)
    #[must_use]
    pub fn inv(&self, lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> (f64, f64, f64) {
        self.inv_with(lon1, lat1, lon2, lat2, &GeodOptions::default())
    }

    #[must_use]
    pub fn inv_with(
        &self,
        lon1: f64,
        lat1: f64,
        lon2: f64,
        lat2: f64,
        options: &GeodOptions,
    ) -> (f64, f64, f64) {
        let (lon1, lat1, lon2) = to_degrees(options.radians, (lon1, lat1, lon2));
        let lat2 = if options.radians { lat2.to_degrees() } else { lat2 };
        let sol = self.geodesic.inverse(lat1, lon1, lat2, lon2);
        let az21 = if options.return_back_azimuth {
            back_azimuth(sol.azi2)
        } else {
            sol.azi2
        };
        let (az12, az21, _) = to_radians(options.radians, (sol.azi1, az21, 0.));
        (az12, az21, sol.s12)
    }

    /// The forward solution in bulk, in place: On return, `lons`, `lats`
    /// and `azs` hold the longitudes, latitudes and back azimuths of the
    /// terminus points
    pub fn fwd_buffers(
        &self,
        lons: &mut [f64],
        lats: &mut [f64],
        azs: &mut [f64],
        dists: &[f64],
        options: &GeodOptions,
    ) -> Result<(), Error> {
        check_lengths(lons.len(), &[lats.len(), azs.len(), dists.len()])?;
        for i in 0..lons.len() {
            (lons[i], lats[i], azs[i]) = self.fwd_with(lons[i], lats[i], azs[i], dists[i], options);
        }
        Ok(())
    }

    /// The inverse solution in bulk, in place: On return, `lons1`,
    /// `lats1` and `lons2` hold the forward azimuths, the back azimuths,
    /// and the distances
    pub fn inv_buffers(
        &self,
        lons1: &mut [f64],
        lats1: &mut [f64],
        lons2: &mut [f64],
        lats2: &[f64],
        options: &GeodOptions,
    ) -> Result<(), Error> {
        check_lengths(lons1.len(), &[lats1.len(), lons2.len(), lats2.len()])?;
        for i in 0..lons1.len() {
            (lons1[i], lats1[i], lons2[i]) =
                self.inv_with(lons1[i], lats1[i], lons2[i], lats2[i], options);
        }
        Ok(())
    }

    /// `n` equally spaced points between (`lon1`, `lat1`) and (`lon2`,
    /// `lat2`), end points excluded, as (longitude, latitude) pairs
    #[must_use]
    pub fn npts(
        &self,
        lon1: f64,
        lat1: f64,
        lon2: f64,
        lat2: f64,
        n: usize,
        radians: bool,
    ) -> Vec<(f64, f64)> {
        let flags = IntermediateFlags {
            radians,
            ..Default::default()
        };
        let (lon1, lat1, lon2) = to_degrees(radians, (lon1, lat1, lon2));
        let lat2 = if radians { lat2.to_degrees() } else { lat2 };
        let line = self.geodesic.inverse_line(lat1, lon1, lat2, lon2);
        let del_s = line.distance() / (n + 1) as f64;
        let points = points_along(&line, n, del_s, line.distance(), 1, &flags);
        points.lons.into_iter().zip(points.lats).collect()
    }

    /// Points along the geodesic from (`lon1`, `lat1`) to (`lon2`,
    /// `lat2`), spaced by count or by distance.
    ///
    /// The points are at distances `(i + initial_idx) * del_s` from the
    /// initial point, so `initial_idx = 0` includes the initial point,
    /// and `terminus_idx = 0` includes the terminus. With a spacing by
    /// count, `del_s = dist / (npts + initial_idx + terminus_idx - 1)`.
    /// With a spacing by distance, the point count is derived using the
    /// rounding policy of `flags`
    #[allow(clippy::too_many_arguments)]
    pub fn inv_intermediate(
        &self,
        lon1: f64,
        lat1: f64,
        lon2: f64,
        lat2: f64,
        spacing: Spacing,
        initial_idx: usize,
        terminus_idx: usize,
        flags: &IntermediateFlags,
    ) -> Result<Intermediate, Error> {
        let (lon1, lat1, lon2) = to_degrees(flags.radians, (lon1, lat1, lon2));
        let lat2 = if flags.radians { lat2.to_degrees() } else { lat2 };
        let line = self.geodesic.inverse_line(lat1, lon1, lat2, lon2);
        let dist = line.distance();
        let ends = initial_idx + terminus_idx;

        let (npts, del_s) = match spacing {
            Spacing::Count(npts) => (npts, even_spacing(dist, npts + ends).unwrap_or(0.)),
            Spacing::Distance(del_s) => {
                if !(del_s > 0.) {
                    return Err(Error::BadParam("del_s".to_string(), del_s.to_string()));
                }
                let count = flags.rounding.apply(dist / del_s) + 1. - ends as f64;
                let npts = if count > 0. { count as usize } else { 0 };
                let del_s = if flags.recalculate_del_s {
                    even_spacing(dist, npts + ends).unwrap_or(del_s)
                } else {
                    del_s
                };
                (npts, del_s)
            }
        };

        Ok(points_along(&line, npts, del_s, dist, initial_idx, flags))
    }

    /// `npts` points along the geodesic leaving (`lon1`, `lat1`) in the
    /// direction `azi1`, spaced `del_s` meters apart. The line length is
    /// `del_s * (npts + initial_idx + terminus_idx - 1)`
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn fwd_intermediate(
        &self,
        lon1: f64,
        lat1: f64,
        azi1: f64,
        npts: usize,
        del_s: f64,
        initial_idx: usize,
        terminus_idx: usize,
        flags: &IntermediateFlags,
    ) -> Intermediate {
        let (lon1, lat1, azi1) = to_degrees(flags.radians, (lon1, lat1, azi1));
        let line = self.geodesic.line(lat1, lon1, azi1);
        let intervals = (npts + initial_idx + terminus_idx).saturating_sub(1);
        let dist = del_s * intervals as f64;
        points_along(&line, npts, del_s, dist, initial_idx, flags)
    }

    /// The total length of the line through the given points, in meters
    pub fn line_length(&self, lons: &[f64], lats: &[f64], radians: bool) -> Result<f64, Error> {
        Ok(self.line_lengths(lons, lats, radians)?.iter().sum())
    }

    /// The length of each segment of the line through the given points
    pub fn line_lengths(
        &self,
        lons: &[f64],
        lats: &[f64],
        radians: bool,
    ) -> Result<Vec<f64>, Error> {
        check_lengths(lons.len(), &[lats.len()])?;
        let options = GeodOptions {
            radians,
            ..Default::default()
        };
        let lengths = (1..lons.len())
            .map(|i| self.inv_with(lons[i - 1], lats[i - 1], lons[i], lats[i], &options).2)
            .collect();
        Ok(lengths)
    }

    /// The area (counter clockwise positive) and perimeter of the
    /// polygon with the given vertices. The polygon is closed implicitly,
    /// so the first vertex should not be repeated
    pub fn polygon_area_perimeter(
        &self,
        lons: &[f64],
        lats: &[f64],
        radians: bool,
    ) -> Result<(f64, f64), Error> {
        check_lengths(lons.len(), &[lats.len()])?;
        let mut polygon = self.geodesic.polygon(false);
        for (&lon, &lat) in lons.iter().zip(lats) {
            if radians {
                polygon.add_point(lat.to_degrees(), lon.to_degrees());
            } else {
                polygon.add_point(lat, lon);
            }
        }
        let (_, perimeter, area) = polygon.compute(false, true);
        Ok((area, perimeter))
    }
}

// Reports a named ellipsoid when one matches, otherwise the parameters
impl fmt::Display for Geod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, a, shape, _) in ELLIPSOID_LIST.iter() {
            if self.a != *a {
                continue;
            }
            let matches = match *shape {
                Shape::B(b) => self.b == b,
                Shape::Rf(rf) => !self.sphere && (1. / self.f - rf).abs() <= 1e-12 * rf,
            };
            if matches {
                return write!(f, "Geod(ellps='{name}')");
            }
        }
        write!(f, "Geod(a={:?}, f={:?})", self.a, self.f)
    }
}

// Two Geods are equal when they describe the same ellipsoid, so
// equal-parameter named ellipsoids (WGS66 and NWL9D, e.g.) compare equal
impl PartialEq for Geod {
    fn eq(&self, other: &Geod) -> bool {
        self.to_string() == other.to_string()
    }
}

// The back azimuth: the forward azimuth at the terminus, turned around
fn back_azimuth(az: f64) -> f64 {
    if az > 0. {
        az - 180.
    } else {
        az + 180.
    }
}

fn to_degrees(radians: bool, v: (f64, f64, f64)) -> (f64, f64, f64) {
    if !radians {
        return v;
    }
    (v.0.to_degrees(), v.1.to_degrees(), v.2.to_degrees())
}

fn to_radians(radians: bool, v: (f64, f64, f64)) -> (f64, f64, f64) {
    if !radians {
        return v;
    }
    (v.0.to_radians(), v.1.to_radians(), v.2.to_radians())
}

fn check_lengths(expected: usize, others: &[usize]) -> Result<(), Error> {
    for &found in others {
        if found != expected {
            return Err(Error::BufferLengthMismatch { expected, found });
        }
    }
    Ok(())
}

// The spacing dividing `dist` into `points - 1` equal intervals
fn even_spacing(dist: f64, points: usize) -> Option<f64> {
    if points < 2 {
        return None;
    }
    Some(dist / (points - 1) as f64)
}

fn points_along(
    line: &GeodesicLine,
    npts: usize,
    del_s: f64,
    dist: f64,
    initial_idx: usize,
    flags: &IntermediateFlags,
) -> Intermediate {
    let mut lons = Vec::with_capacity(npts);
    let mut lats = Vec::with_capacity(npts);
    let mut azis = Vec::with_capacity(if flags.keep_azimuths { npts } else { 0 });

    for i in 0..npts {
        let pos = line.position((i + initial_idx) as f64 * del_s);
        let (lon, lat, azi) = to_radians(flags.radians, (pos.lon2, pos.lat2, pos.azi2));
        lons.push(lon);
        lats.push(lat);
        if flags.keep_azimuths {
            azis.push(azi);
        }
    }

    Intermediate {
        npts,
        del_s,
        dist,
        lons,
        lats,
        azis: flags.keep_azimuths.then_some(azis),
    }
}

// ----- T E S T S ---------------------------------------------------------------------
