//! Geodesics on an ellipsoid of revolution.
//!
//! [`Geodesic`] implements the algorithms of Karney
//! ([2013](crate::Bibliography::Kar13)), which are accurate to round-off
//! and converge everywhere, including for nearly antipodal points.
//! [`GeodesicLine`] represents a single geodesic, for computing points
//! along it, and [`PolygonArea`] accumulates the area and perimeter of
//! geodesic polygons.
//!
//! [`Geod`] is the high level facade: forward and inverse solutions in
//! bulk, intermediate points, line lengths, and polygon area.

use crate::ellipsoid::Ellipsoid;
use crate::math::ancillary::norm;
use crate::math::angular::{ang_diff, ang_normalize, ang_round, atan2d, lat_fix, sincosd, sincosde};
use crate::math::sin_cos_series;
use std::f64::consts::PI;

mod accumulator;
mod coefficients;
mod geod;
mod line;
mod polygon;

pub use accumulator::Accumulator;
pub use geod::{Geod, GeodOptions, Intermediate, IntermediateFlags, NptsRounding, Spacing};
pub use line::GeodesicLine;
pub use polygon::PolygonArea;

use coefficients::*;

const DIGITS: usize = f64::MANTISSA_DIGITS as usize;
const TINY: f64 = 1.4916681462400413e-154; // sqrt(f64::MIN_POSITIVE)
const TOL0: f64 = f64::EPSILON;
const TOL1: f64 = 200. * TOL0;
const TOLB: f64 = TOL0;
const MAXIT1: usize = 20;
const MAXIT2: usize = MAXIT1 + DIGITS + 10;

fn tol2() -> f64 {
    TOL0.sqrt()
}

fn xthresh() -> f64 {
    1000. * tol2()
}

/// The full set of quantities describing a geodesic between two points.
///
/// Angles in degrees, distances in meters, and area in square meters.
/// `scale12` and `scale21` are the geodesic scales, usually written
/// M₁₂ and M₂₁, and `m12` is the reduced length. `area` is the area
/// between the geodesic and the equator, counter clockwise positive.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct GeodesicSolution {
    pub lat1: f64,
    pub lon1: f64,
    pub azi1: f64,
    pub lat2: f64,
    pub lon2: f64,
    pub azi2: f64,
    pub s12: f64,
    pub a12: f64,
    pub m12: f64,
    pub scale12: f64,
    pub scale21: f64,
    pub area: f64,
}

/// The geodesic machinery for a specific ellipsoid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodesic {
    pub(super) a: f64,
    pub(super) f: f64,
    pub(super) f1: f64,
    pub(super) e2: f64,
    pub(super) ep2: f64,
    pub(super) n: f64,
    pub(super) b: f64,
    pub(super) c2: f64,
    etol2: f64,
    a3x: [f64; N_A3X],
    c3x: [f64; N_C3X],
    c4x: [f64; N_C4X],
}

impl Default for Geodesic {
    fn default() -> Geodesic {
        Geodesic::from(Ellipsoid::default())
    }
}

impl From<Ellipsoid> for Geodesic {
    fn from(ellps: Ellipsoid) -> Geodesic {
        Geodesic::new(ellps.semimajor_axis(), ellps.flattening())
    }
}

// Intermediate results of the inverse solution
struct InverseParts {
    a12: f64,
    s12: f64,
    salp1: f64,
    calp1: f64,
    salp2: f64,
    calp2: f64,
    m12: f64,
    scale12: f64,
    scale21: f64,
    area: f64,
}

// Output of `lengths()`: all distances in units of the semiminor axis
struct Lengths {
    s12b: f64,
    m12b: f64,
    m0: f64,
    scale12: f64,
    scale21: f64,
}

// Output of `inverse_start()`
struct Start {
    sig12: f64,
    salp1: f64,
    calp1: f64,
    salp2: f64,
    calp2: f64,
    dnm: f64,
}

// Output of `lambda12()`
struct Lambda {
    lam12: f64,
    salp2: f64,
    calp2: f64,
    sig12: f64,
    ssig1: f64,
    csig1: f64,
    ssig2: f64,
    csig2: f64,
    eps: f64,
    domg12: f64,
    dlam12: f64,
}

impl Geodesic {
    /// The geodesic machinery for the ellipsoid with semimajor axis `a`
    /// and flattening `f`. Negative `f` gives a prolate ellipsoid
    #[must_use]
    pub fn new(a: f64, f: f64) -> Geodesic {
        let f1 = 1. - f;
        let e2 = f * (2. - f);
        let ep2 = e2 / (f1 * f1);
        let n = f / (2. - f);
        let b = a * f1;

        // The authalic radius squared
        let c2 = (a * a
            + b * b
                * if e2 == 0. {
                    1.
                } else {
                    let e = e2.abs().sqrt();
                    (if e2 > 0. { e.atanh() } else { (-e2).sqrt().atan() }) / e
                })
            / 2.;

        // The tolerance of the really short line case. The sqrt(|f|)
        // dependence reflects the sensitivity of the reduced length to
        // the flattening
        let etol2 = 0.1 * tol2() / ((0.001_f64.max(f.abs()) * 1_f64.min(1. - f / 2.)) / 2.).sqrt();

        Geodesic {
            a,
            f,
            f1,
            e2,
            ep2,
            n,
            b,
            c2,
            etol2,
            a3x: a3coeff(n),
            c3x: c3coeff(n),
            c4x: c4coeff(ep2),
        }
    }

    /// The WGS84 ellipsoid
    #[must_use]
    pub fn wgs84() -> Geodesic {
        Geodesic::new(6_378_137., 1. / 298.257_223_563)
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

    /// The total area of the ellipsoid
    #[must_use]
    pub fn ellipsoid_area(&self) -> f64 {
        4. * PI * self.c2
    }

    /// Solve the direct geodesic problem: Travel a distance of `s12`
    /// meters from (`lat1`, `lon1`), in the direction `azi1`. Angles in
    /// degrees. The longitude of the result is reduced to [-180, 180]
    #[must_use]
    pub fn direct(&self, lat1: f64, lon1: f64, azi1: f64, s12: f64) -> GeodesicSolution {
        self.line(lat1, lon1, azi1).position(s12)
    }

    /// Solve the inverse geodesic problem: Find the shortest path between
    /// (`lat1`, `lon1`) and (`lat2`, `lon2`). Angles in degrees.
    ///
    /// Latitudes outside [-90, 90] yield NaN results
    #[must_use]
    pub fn inverse(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> GeodesicSolution {
        let parts = self.gen_inverse(lat1, lon1, lat2, lon2);
        GeodesicSolution {
            lat1: lat_fix(lat1),
            lon1: ang_normalize(lon1),
            azi1: atan2d(parts.salp1, parts.calp1),
            lat2: lat_fix(lat2),
            lon2: ang_normalize(lon2),
            azi2: atan2d(parts.salp2, parts.calp2),
            s12: parts.s12,
            a12: parts.a12,
            m12: parts.m12,
            scale12: parts.scale12,
            scale21: parts.scale21,
            area: parts.area,
        }
    }

    /// The geodesic starting at (`lat1`, `lon1`) in the direction `azi1`
    #[must_use]
    pub fn line(&self, lat1: f64, lon1: f64, azi1: f64) -> GeodesicLine {
        GeodesicLine::new(self, lat1, lon1, azi1, None)
    }

    /// The geodesic from (`lat1`, `lon1`) to (`lat2`, `lon2`). The
    /// distance between the points is available as
    /// [`GeodesicLine::distance()`]
    #[must_use]
    pub fn inverse_line(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> GeodesicLine {
        let parts = self.gen_inverse(lat1, lon1, lat2, lon2);
        let azi1 = atan2d(parts.salp1, parts.calp1);
        let mut line = GeodesicLine::new(self, lat1, lon1, azi1, Some((parts.salp1, parts.calp1)));
        line.set_distance(parts.s12, parts.a12);
        line
    }

    /// An empty polygon (or polyline, if `polyline` is true) on this
    /// ellipsoid
    #[must_use]
    pub fn polygon(&self, polyline: bool) -> PolygonArea {
        PolygonArea::new(*self, polyline)
    }

    pub(super) fn a3f(&self, eps: f64) -> f64 {
        a3f(&self.a3x, eps)
    }

    pub(super) fn c3f(&self, eps: f64, c: &mut [f64; N_C3]) {
        c3f(&self.c3x, eps, c)
    }

    pub(super) fn c4f(&self, k2: f64, c: &mut [f64; N_C4]) {
        c4f(&self.c4x, k2, c)
    }

    // Distance, reduced length, and geodesic scales, for a geodesic
    // with parameter `eps`, between the points with spherical arc
    // lengths sig1 and sig2 (given by sine and cosine), sig12 apart
    #[allow(clippy::too_many_arguments)]
    fn lengths(
        &self,
        eps: f64,
        sig12: f64,
        ssig1: f64,
        csig1: f64,
        dn1: f64,
        ssig2: f64,
        csig2: f64,
        dn2: f64,
        cbet1: f64,
        cbet2: f64,
    ) -> Lengths {
        let mut c1a = [0.; N_C1 + 1];
        let mut c2a = [0.; N_C2 + 1];
        let a1 = a1m1f(eps);
        c1f(eps, &mut c1a);
        let a2 = a2m1f(eps);
        c2f(eps, &mut c2a);
        let m0x = a1 - a2;
        let a1 = 1. + a1;
        let a2 = 1. + a2;

        let b1 = sin_cos_series(true, ssig2, csig2, &c1a) - sin_cos_series(true, ssig1, csig1, &c1a);
        let s12b = a1 * (sig12 + b1);
        let b2 = sin_cos_series(true, ssig2, csig2, &c2a) - sin_cos_series(true, ssig1, csig1, &c2a);
        let j12 = m0x * sig12 + (a1 * b1 - a2 * b2);

        // The parentheses ensure accurate cancellation for coincident points
        let m12b = dn2 * (csig1 * ssig2) - dn1 * (ssig1 * csig2) - csig1 * csig2 * j12;

        let csig12 = csig1 * csig2 + ssig1 * ssig2;
        let t = self.ep2 * (cbet1 - cbet2) * (cbet1 + cbet2) / (dn1 + dn2);
        let scale12 = csig12 + (t * ssig2 - csig2 * j12) * ssig1 / dn1;
        let scale21 = csig12 - (t * ssig1 - csig1 * j12) * ssig2 / dn2;

        Lengths {
            s12b,
            m12b,
            m0: m0x,
            scale12,
            scale21,
        }
    }

    // A starting guess for the azimuth at point 1. For short lines, the
    // solution is returned directly, with a non-negative sig12
    #[allow(clippy::too_many_arguments)]
    fn inverse_start(
        &self,
        sbet1: f64,
        cbet1: f64,
        dn1: f64,
        sbet2: f64,
        cbet2: f64,
        dn2: f64,
        lam12: f64,
        slam12: f64,
        clam12: f64,
    ) -> Start {
        let mut sig12 = -1.;
        let mut salp2 = f64::NAN;
        let mut calp2 = f64::NAN;
        let mut dnm = f64::NAN;

        // bet12 = bet2 - bet1 in [0, pi), bet12a = bet2 + bet1 in (-pi, 0]
        let sbet12 = sbet2 * cbet1 - cbet2 * sbet1;
        let cbet12 = cbet2 * cbet1 + sbet2 * sbet1;
        let sbet12a = sbet2 * cbet1 + cbet2 * sbet1;

        let shortline = cbet12 >= 0. && sbet12 < 0.5 && cbet2 * lam12 < 0.5;
        let (mut somg12, mut comg12) = (slam12, clam12);
        if shortline {
            // sin((bet1 + bet2)/2)²
            let mut sbetm2 = (sbet1 + sbet2) * (sbet1 + sbet2);
            sbetm2 /= sbetm2 + (cbet1 + cbet2) * (cbet1 + cbet2);
            dnm = (1. + self.ep2 * sbetm2).sqrt();
            let omg12 = lam12 / (self.f1 * dnm);
            (somg12, comg12) = omg12.sin_cos();
        }

        let mut salp1 = cbet2 * somg12;
        let mut calp1 = if comg12 >= 0. {
            sbet12 + cbet2 * sbet1 * somg12 * somg12 / (1. + comg12)
        } else {
            sbet12a - cbet2 * sbet1 * somg12 * somg12 / (1. - comg12)
        };

        let ssig12 = salp1.hypot(calp1);
        let csig12 = sbet1 * sbet2 + cbet1 * cbet2 * comg12;

        if shortline && ssig12 < self.etol2 {
            // Really short lines
            salp2 = cbet1 * somg12;
            calp2 = sbet12
                - cbet1
                    * sbet2
                    * if comg12 >= 0. {
                        somg12 * somg12 / (1. + comg12)
                    } else {
                        1. - comg12
                    };
            (salp2, calp2) = norm(salp2, calp2);
            sig12 = ssig12.atan2(csig12);
        } else if self.n.abs() >= 0.1
            || csig12 >= 0.
            || ssig12 >= 6. * self.n.abs() * PI * cbet1 * cbet1
        {
            // The zeroth order spherical approximation is OK
        } else {
            // Scale lam12 and bet2 to an (x, y) coordinate system where the
            // antipodal point is at the origin, and the singular point is at
            // y = 0, x = -1
            let lam12x = (-slam12).atan2(-clam12);
            let (x, y, lamscale);
            if self.f >= 0. {
                // x = dlong, y = dlat
                let k2 = sbet1 * sbet1 * self.ep2;
                let eps = k2 / (2. * (1. + (1. + k2).sqrt()) + k2);
                lamscale = self.f * cbet1 * self.a3f(eps) * PI;
                let betscale = lamscale * cbet1;
                x = lam12x / lamscale;
                y = sbet12a / betscale;
            } else {
                // x = dlat, y = dlong
                let cbet12a = cbet2 * cbet1 - sbet2 * sbet1;
                let bet12a = sbet12a.atan2(cbet12a);
                let l = self.lengths(
                    self.n,
                    PI + bet12a,
                    sbet1,
                    -cbet1,
                    dn1,
                    sbet2,
                    cbet2,
                    dn2,
                    cbet1,
                    cbet2,
                );
                x = -1. + l.m12b / (cbet1 * cbet2 * l.m0 * PI);
                let betscale = if x < -0.01 {
                    x * cbet1
                } else {
                    -self.f * cbet1 * cbet1 * PI
                };
                lamscale = betscale / cbet1;
                y = lam12x / lamscale;
            }

            if y > -TOL1 && x > -1. - xthresh() {
                // Strip near the cut
                if self.f >= 0. {
                    salp1 = 1_f64.min(-x);
                    calp1 = -(1. - salp1 * salp1).sqrt();
                } else {
                    calp1 = x.max(if x > -TOL1 { 0. } else { -1. });
                    salp1 = (1. - calp1 * calp1).sqrt();
                }
            } else {
                // Estimate alp1 by solving the astroid problem
                let k = astroid(x, y);
                // omg12a = pi - omg12
                let omg12a = lamscale
                    * if self.f >= 0. {
                        -x * k / (1. + k)
                    } else {
                        -y * (1. + k) / k
                    };
                let (s, c) = omg12a.sin_cos();
                somg12 = s;
                comg12 = -c;
                // Update the spherical estimate of alp1, using omg12 instead of lam12
                salp1 = cbet2 * somg12;
                calp1 = sbet12a - cbet2 * sbet1 * somg12 * somg12 / (1. - comg12);
            }
        }

        // Backwards check, letting NaNs through
        if !(salp1 <= 0.) {
            (salp1, calp1) = norm(salp1, calp1);
        } else {
            salp1 = 1.;
            calp1 = 0.;
        }

        Start {
            sig12,
            salp1,
            calp1,
            salp2,
            calp2,
            dnm,
        }
    }

    // The longitude difference, relative to lam120, for a geodesic
    // leaving point 1 with azimuth alp1, and its derivative wrt. alp1
    #[allow(clippy::too_many_arguments)]
    fn lambda12(
        &self,
        sbet1: f64,
        cbet1: f64,
        dn1: f64,
        sbet2: f64,
        cbet2: f64,
        dn2: f64,
        salp1: f64,
        calp1: f64,
        slam120: f64,
        clam120: f64,
        diffp: bool,
    ) -> Lambda {
        // Break the degeneracy of the equatorial line
        let calp1 = if sbet1 == 0. && calp1 == 0. {
            -TINY
        } else {
            calp1
        };

        // sin(alp1) * cos(bet1) = sin(alp0)
        let salp0 = salp1 * cbet1;
        let calp0 = calp1.hypot(salp1 * sbet1);

        // tan(bet1) = tan(sig1) * cos(alp1)
        // tan(omg1) = sin(alp0) * tan(sig1)
        let somg1 = salp0 * sbet1;
        let comg1 = calp1 * cbet1;
        let (ssig1, csig1) = norm(sbet1, comg1);

        // Enforce symmetries in the case |bet2| = -bet1
        let salp2 = if cbet2 != cbet1 { salp0 / cbet2 } else { salp1 };
        let calp2 = if cbet2 != cbet1 || sbet2.abs() != -sbet1 {
            ((calp1 * cbet1).powi(2)
                + if cbet1 < -sbet1 {
                    (cbet2 - cbet1) * (cbet1 + cbet2)
                } else {
                    (sbet1 - sbet2) * (sbet1 + sbet2)
                })
            .sqrt()
                / cbet2
        } else {
            calp1.abs()
        };

        // tan(bet2) = tan(sig2) * cos(alp2)
        // tan(omg2) = sin(alp0) * tan(sig2)
        let somg2 = salp0 * sbet2;
        let comg2 = calp2 * cbet2;
        let (ssig2, csig2) = norm(sbet2, comg2);

        // sig12 = sig2 - sig1, limited to [0, pi]
        let sig12 = (csig1 * ssig2 - ssig1 * csig2)
            .max(0.)
            .atan2(csig1 * csig2 + ssig1 * ssig2);

        // omg12 = omg2 - omg1, limited to [0, pi]
        let somg12 = (comg1 * somg2 - somg1 * comg2).max(0.);
        let comg12 = comg1 * comg2 + somg1 * somg2;
        // eta = omg12 - lam120
        let eta = (somg12 * clam120 - comg12 * slam120).atan2(comg12 * clam120 + somg12 * slam120);

        let k2 = calp0 * calp0 * self.ep2;
        let eps = k2 / (2. * (1. + (1. + k2).sqrt()) + k2);
        let mut c3a = [0.; N_C3];
        self.c3f(eps, &mut c3a);
        let b312 = sin_cos_series(true, ssig2, csig2, &c3a) - sin_cos_series(true, ssig1, csig1, &c3a);
        let domg12 = -self.f * self.a3f(eps) * salp0 * (sig12 + b312);
        let lam12 = eta + domg12;

        let dlam12 = if !diffp {
            f64::NAN
        } else if calp2 == 0. {
            -2. * self.f1 * dn1 / sbet1
        } else {
            let l = self.lengths(eps, sig12, ssig1, csig1, dn1, ssig2, csig2, dn2, cbet1, cbet2);
            l.m12b * self.f1 / (calp2 * cbet2)
        };

        Lambda {
            lam12,
            salp2,
            calp2,
            sig12,
            ssig1,
            csig1,
            ssig2,
            csig2,
            eps,
            domg12,
            dlam12,
        }
    }

    // The inverse problem, with azimuths given as sine/cosine pairs
    fn gen_inverse(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> InverseParts {
        // The longitude difference, with its rounding error
        let (lon12, lon12s) = ang_diff(lon1, lon2);
        // Make the longitude difference positive
        let mut lonsign = 1_f64.copysign(lon12);
        let lon12 = lonsign * lon12;
        let lon12s = lonsign * lon12s;
        let lam12 = lon12.to_radians();
        let (slam12, clam12) = sincosde(lon12, lon12s);
        // The supplementary longitude difference
        let lon12s = (180. - lon12) - lon12s;

        // If really close to the equator, treat as on equator
        let mut lat1 = ang_round(lat_fix(lat1));
        let mut lat2 = ang_round(lat_fix(lat2));

        // Swap points so that the point with the higher (abs) latitude is
        // point 1. If one latitude is NaN, it becomes lat1
        let swapp = if lat1.abs() < lat2.abs() || lat2.is_nan() {
            -1.
        } else {
            1.
        };
        if swapp < 0. {
            lonsign *= -1.;
            std::mem::swap(&mut lat1, &mut lat2);
        }

        // Make lat1 <= -0
        let latsign = 1_f64.copysign(-lat1);
        lat1 *= latsign;
        lat2 *= latsign;

        // Now 0 <= lon12 <= 180, -90 <= lat1 <= -0, and lat1 <= lat2 <= -lat1

        let (sbet1, cbet1) = sincosd(lat1);
        let (sbet1, cbet1) = norm(sbet1 * self.f1, cbet1);
        // Ensure cbet1 = +epsilon at poles
        let cbet1 = cbet1.max(TINY);

        let (sbet2, cbet2) = sincosd(lat2);
        let (mut sbet2, cbet2) = norm(sbet2 * self.f1, cbet2);
        let mut cbet2 = cbet2.max(TINY);

        // If cbet1 < -sbet1, then cbet2 - cbet1 is a sensitive measure of
        // |bet1| - |bet2|. Otherwise |sbet2| + sbet1 is a better measure.
        // When these quantities vanish, force bet2 = ±bet1 exactly
        if cbet1 < -sbet1 {
            if cbet2 == cbet1 {
                sbet2 = sbet1.copysign(sbet2);
            }
        } else if sbet2.abs() == -sbet1 {
            cbet2 = cbet1;
        }

        let dn1 = (1. + self.ep2 * sbet1 * sbet1).sqrt();
        let dn2 = (1. + self.ep2 * sbet2 * sbet2).sqrt();

        let mut a12 = f64::NAN;
        let mut sig12 = f64::NAN;
        let (mut salp1, mut calp1) = (f64::NAN, f64::NAN);
        let (mut salp2, mut calp2) = (f64::NAN, f64::NAN);
        let (mut s12x, mut m12x) = (f64::NAN, f64::NAN);
        let (mut scale12, mut scale21) = (f64::NAN, f64::NAN);

        let mut meridian = lat1 == -90. || slam12 == 0.;

        if meridian {
            // The end points are on a single full meridian, so the
            // geodesic might lie on a meridian

            // Head to the target longitude
            calp1 = clam12;
            salp1 = slam12;
            // At the target we're heading north
            calp2 = 1.;
            salp2 = 0.;

            // tan(bet) = tan(sig) * cos(alp)
            let (ssig1, csig1) = (sbet1, calp1 * cbet1);
            let (ssig2, csig2) = (sbet2, calp2 * cbet2);

            // sig12 = sig2 - sig1
            sig12 = (csig1 * ssig2 - ssig1 * csig2)
                .max(0.)
                .atan2(csig1 * csig2 + ssig1 * ssig2);

            let l = self.lengths(self.n, sig12, ssig1, csig1, dn1, ssig2, csig2, dn2, cbet1, cbet2);
            s12x = l.s12b;
            m12x = l.m12b;
            scale12 = l.scale12;
            scale21 = l.scale21;

            // Zero length geodesics might yield m12 < 0. And sig12 > pi/2
            // for a meridional geodesic which is not a shortest path
            if sig12 < 1. || m12x >= 0. {
                // Prevent negative s12 or m12 for short lines
                if sig12 < 3. * TINY || (sig12 < TOL0 && (s12x < 0. || m12x < 0.)) {
                    sig12 = 0.;
                    m12x = 0.;
                    s12x = 0.;
                }
                m12x *= self.b;
                s12x *= self.b;
                a12 = sig12.to_degrees();
            } else {
                // m12 < 0, i.e. prolate and too close to anti-podal
                meridian = false;
            }
        }

        // somg12 == 2 marks that it still needs to be calculated
        let mut somg12 = 2.;
        let mut comg12 = 0.;
        let mut omg12 = 0.;

        if !meridian && sbet1 == 0. && (self.f <= 0. || lon12s >= self.f * 180.) {
            // The geodesic runs along the equator
            calp1 = 0.;
            calp2 = 0.;
            salp1 = 1.;
            salp2 = 1.;
            s12x = self.a * lam12;
            sig12 = lam12 / self.f1;
            omg12 = sig12;
            m12x = self.b * sig12.sin();
            scale12 = sig12.cos();
            scale21 = scale12;
            a12 = lon12 / self.f1;
        } else if !meridian {
            // The points are within a hemisphere bounded by a meridian, and
            // the geodesic is neither meridional nor equatorial

            let start = self.inverse_start(sbet1, cbet1, dn1, sbet2, cbet2, dn2, lam12, slam12, clam12);
            sig12 = start.sig12;
            salp1 = start.salp1;
            calp1 = start.calp1;

            if sig12 >= 0. {
                // Short lines: the start values are the solution
                let dnm = start.dnm;
                salp2 = start.salp2;
                calp2 = start.calp2;
                s12x = sig12 * self.b * dnm;
                m12x = dnm * dnm * self.b * (sig12 / dnm).sin();
                scale12 = (sig12 / dnm).cos();
                scale21 = scale12;
                a12 = sig12.to_degrees();
                omg12 = lam12 / (self.f1 * dnm);
            } else {
                // Newton's method for lambda12(alp1) - lam12 = 0. The root
                // is bracketed by (alp1a, alp1b), shrinking with each
                // evaluation. When the Newton step is not usable, the
                // midpoint of the bracket is taken as the next estimate
                let mut numit = 0;
                let mut tripn = false;
                let mut tripb = false;
                let (mut salp1a, mut calp1a) = (TINY, 1.);
                let (mut salp1b, mut calp1b) = (TINY, -1.);

                let mut lam;
                loop {
                    lam = self.lambda12(
                        sbet1,
                        cbet1,
                        dn1,
                        sbet2,
                        cbet2,
                        dn2,
                        salp1,
                        calp1,
                        slam12,
                        clam12,
                        numit < MAXIT1,
                    );
                    let v = lam.lam12;

                    // Reversed test, to allow escape with NaNs
                    let tolerance = (if tripn { 8. } else { 1. }) * TOL0;
                    if tripb || !(v.abs() >= tolerance) || numit >= MAXIT2 {
                        break;
                    }

                    // Update the bracketing values
                    if v > 0. && (numit > MAXIT1 || calp1 / salp1 > calp1b / salp1b) {
                        salp1b = salp1;
                        calp1b = calp1;
                    } else if v < 0. && (numit > MAXIT1 || calp1 / salp1 < calp1a / salp1a) {
                        salp1a = salp1;
                        calp1a = calp1;
                    }

                    numit += 1;
                    if numit < MAXIT1 && lam.dlam12 > 0. {
                        let dalp1 = -v / lam.dlam12;
                        if dalp1.abs() < PI {
                            let (sdalp1, cdalp1) = dalp1.sin_cos();
                            let nsalp1 = salp1 * cdalp1 + calp1 * sdalp1;
                            if nsalp1 > 0. {
                                calp1 = calp1 * cdalp1 - salp1 * sdalp1;
                                salp1 = nsalp1;
                                (salp1, calp1) = norm(salp1, calp1);
                                // Quadratic convergence may fail as the slope
                                // goes to 0, so use an epsilon based criterion
                                tripn = v.abs() <= 16. * TOL0;
                                continue;
                            }
                        }
                    }

                    // Bisection
                    salp1 = (salp1a + salp1b) / 2.;
                    calp1 = (calp1a + calp1b) / 2.;
                    (salp1, calp1) = norm(salp1, calp1);
                    tripn = false;
                    tripb = (salp1a - salp1).abs() + (calp1a - calp1) < TOLB
                        || (salp1 - salp1b).abs() + (calp1 - calp1b) < TOLB;
                }

                salp2 = lam.salp2;
                calp2 = lam.calp2;
                sig12 = lam.sig12;
                let l = self.lengths(
                    lam.eps, sig12, lam.ssig1, lam.csig1, dn1, lam.ssig2, lam.csig2, dn2, cbet1,
                    cbet2,
                );
                s12x = l.s12b * self.b;
                m12x = l.m12b * self.b;
                scale12 = l.scale12;
                scale21 = l.scale21;
                a12 = sig12.to_degrees();

                // omg12 = lam12 - domg12
                let (sdomg12, cdomg12) = lam.domg12.sin_cos();
                somg12 = slam12 * cdomg12 - clam12 * sdomg12;
                comg12 = clam12 * cdomg12 + slam12 * sdomg12;
            }
        }

        // Convert -0 to 0
        let s12 = 0. + s12x;
        let m12 = 0. + m12x;

        // The area between the geodesic and the equator
        // From lambda12: sin(alp1) * cos(bet1) = sin(alp0)
        let salp0 = salp1 * cbet1;
        let calp0 = calp1.hypot(salp1 * sbet1);
        let mut area = if calp0 != 0. && salp0 != 0. {
            // tan(bet) = tan(sig) * cos(alp)
            let (ssig1, csig1) = norm(sbet1, calp1 * cbet1);
            let (ssig2, csig2) = norm(sbet2, calp2 * cbet2);
            let k2 = calp0 * calp0 * self.ep2;
            // a² e² cos(alp0) sin(alp0)
            let a4 = self.a * self.a * calp0 * salp0 * self.e2;
            let mut c4a = [0.; N_C4];
            self.c4f(k2, &mut c4a);
            let b41 = sin_cos_series(false, ssig1, csig1, &c4a);
            let b42 = sin_cos_series(false, ssig2, csig2, &c4a);
            a4 * (b42 - b41)
        } else {
            // Avoid problems with indeterminate sig1, sig2 on the equator
            0.
        };

        if !meridian && somg12 == 2. {
            (somg12, comg12) = omg12.sin_cos();
        }

        let alp12 = if !meridian && comg12 > -0.7071 && sbet2 - sbet1 < 1.75 {
            // The longitude and latitude differences are not too big, so use
            // tan(Gamma/2) = tan(omg12/2)
            //   * (tan(bet1/2) + tan(bet2/2)) / (1 + tan(bet1/2) * tan(bet2/2))
            // with tan(x/2) = sin(x) / (1 + cos(x))
            let domg12 = 1. + comg12;
            let dbet1 = 1. + cbet1;
            let dbet2 = 1. + cbet2;
            2. * (somg12 * (sbet1 * dbet2 + sbet2 * dbet1))
                .atan2(domg12 * (sbet1 * sbet2 + dbet1 * dbet2))
        } else {
            // alp12 = alp2 - alp1, used in atan2, so no need to normalize
            let mut salp12 = salp2 * calp1 - calp2 * salp1;
            let mut calp12 = calp2 * calp1 + salp2 * salp1;
            // Attach the correct sign to zero for alp1 = ±180 and alp2 = 0
            if salp12 == 0. && calp12 < 0. {
                salp12 = TINY * calp1;
                calp12 = -1.;
            }
            salp12.atan2(calp12)
        };
        area += self.c2 * alp12;
        area *= swapp * lonsign * latsign;
        area += 0.;

        // Undo the normalizing transformations
        if swapp < 0. {
            std::mem::swap(&mut salp1, &mut salp2);
            std::mem::swap(&mut calp1, &mut calp2);
            std::mem::swap(&mut scale12, &mut scale21);
        }
        salp1 *= swapp * lonsign;
        calp1 *= swapp * latsign;
        salp2 *= swapp * lonsign;
        calp2 *= swapp * latsign;

        InverseParts {
            a12,
            s12,
            salp1,
            calp1,
            salp2,
            calp2,
            m12,
            scale12,
            scale21,
            area,
        }
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn inverse() {
        let wgs84 = Geodesic::wgs84();

        // The classic GeographicLib example: JFK to LHR
        let sol = wgs84.inverse(40.64, -73.78, 51.47, -0.45);
        assert_float_eq!(sol.s12, 5555408.658207161, abs <= 1e-6);
        assert_float_eq!(sol.azi1, 51.37923282084674, abs <= 1e-10);
        assert_float_eq!(sol.azi2, 107.98534814074004, abs <= 1e-10);

        // Same point
        let sol = wgs84.inverse(55., 12., 55., 12.);
        assert_eq!(sol.s12, 0.);
        assert_eq!(sol.area, 0.);

        // Along the equator and along a meridian
        let sol = wgs84.inverse(0., 0., 0., 1.);
        assert_float_eq!(sol.s12, 111319.49079327357, abs <= 1e-6);
        assert_eq!(sol.azi1, 90.);
        let sol = wgs84.inverse(0., 0., 1., 0.);
        assert_float_eq!(sol.s12, 110574.38855779878, abs <= 1e-6);
        assert_eq!(sol.azi1, 0.);

        // Nearly antipodal
        let sol = wgs84.inverse(0., 0., 0.5, 179.5);
        assert!(sol.s12 > 19_900_000. && sol.s12 < 20_010_000.);
        let back = wgs84.direct(0., 0., sol.azi1, sol.s12);
        assert_float_eq!(back.lat2, 0.5, abs <= 1e-9);
        assert_float_eq!(back.lon2, 179.5, abs <= 1e-9);

        // Latitudes out of range give NaN
        assert!(wgs84.inverse(91., 0., 0., 0.).s12.is_nan());
    }

    #[test]
    fn direct() {
        let wgs84 = Geodesic::wgs84();
        let sol = wgs84.direct(40.64, -73.78, 51.37923282084674, 5555408.658207161);
        assert_float_eq!(sol.lat2, 51.47, abs <= 1e-10);
        assert_float_eq!(sol.lon2, -0.45, abs <= 1e-10);
        assert_float_eq!(sol.azi2, 107.98534814074004, abs <= 1e-9);

        // Across the antimeridian, the longitude is normalized
        let sol = wgs84.direct(0., 179.5, 90., 111319.49079327357);
        assert_float_eq!(sol.lon2, -179.5, abs <= 1e-9);
    }

    #[test]
    fn roundtrip_on_several_ellipsoids() {
        for (a, f) in [(6378137., 1. / 298.257223563), (6370997., 0.), (6378137., -1. / 150.), (1., 0.1)] {
            let geod = Geodesic::new(a, f);
            for (lat1, lon1, lat2, lon2) in [(10., 20., -30., 140.), (-80., 0., 80., 90.), (0., 0., 1., 170.)] {
                let inv = geod.inverse(lat1, lon1, lat2, lon2);
                let fwd = geod.direct(lat1, lon1, inv.azi1, inv.s12);
                assert_float_eq!(fwd.lat2, lat2, abs <= 1e-8);
                assert_float_eq!(fwd.lon2, lon2, abs <= 1e-8);
            }
        }
    }

    #[test]
    fn ellipsoid_area() {
        let sphere = Geodesic::new(1., 0.);
        assert_float_eq!(sphere.ellipsoid_area(), 4. * PI, abs <= 1e-14);
        let wgs84 = Geodesic::wgs84();
        assert_float_eq!(wgs84.ellipsoid_area(), 510065621724088.44, rmax <= 1e-12);
    }
}
