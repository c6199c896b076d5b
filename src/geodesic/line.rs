use super::*;

/// A single geodesic, given by its starting point and azimuth. Points
/// along the geodesic are found by distance ([`GeodesicLine::position()`])
/// or by spherical arc length ([`GeodesicLine::arc_position()`]).
///
/// Lines constructed by [`Geodesic::inverse_line()`] also know their
/// length, available as [`GeodesicLine::distance()`].
#[derive(Debug, Clone, Copy)]
pub struct GeodesicLine {
    lat1: f64,
    lon1: f64,
    azi1: f64,
    salp1: f64,
    calp1: f64,

    f: f64,
    b: f64,
    c2: f64,
    f1: f64,

    dn1: f64,
    salp0: f64,
    calp0: f64,
    ssig1: f64,
    csig1: f64,
    somg1: f64,
    comg1: f64,
    k2: f64,

    a1m1: f64,
    c1a: [f64; N_C1 + 1],
    c1pa: [f64; N_C1 + 1],
    b11: f64,
    stau1: f64,
    ctau1: f64,

    a2m1: f64,
    c2a: [f64; N_C2 + 1],
    b21: f64,

    c3a: [f64; N_C3],
    a3c: f64,
    b31: f64,

    c4a: [f64; N_C4],
    a4: f64,
    b41: f64,

    s13: f64,
    a13: f64,
}

impl GeodesicLine {
    /// The azimuth may be given as a sine/cosine pair, to avoid the
    /// loss of accuracy in a round trip through degrees
    pub(super) fn new(
        geod: &Geodesic,
        lat1: f64,
        lon1: f64,
        azi1: f64,
        alp1: Option<(f64, f64)>,
    ) -> GeodesicLine {
        let lat1 = lat_fix(lat1);
        let (azi1, salp1, calp1) = match alp1 {
            Some((salp1, calp1)) => (azi1, salp1, calp1),
            None => {
                let (s, c) = sincosd(ang_round(azi1));
                (ang_normalize(azi1), s, c)
            }
        };

        let (sbet1, cbet1) = sincosd(ang_round(lat1));
        let (sbet1, cbet1) = norm(sbet1 * geod.f1, cbet1);
        // Ensure cbet1 = +epsilon at poles
        let cbet1 = cbet1.max(TINY);
        let dn1 = (1. + geod.ep2 * sbet1 * sbet1).sqrt();

        // sin(alp1) * cos(bet1) = sin(alp0), with alp0 in [0, pi/2 - |bet1|]
        let salp0 = salp1 * cbet1;
        let calp0 = calp1.hypot(salp1 * sbet1);

        // tan(bet1) = tan(sig1) * cos(alp1), with sig = 0 at the nearest
        // northward crossing of the equator.
        // tan(omg1) = sin(alp0) * tan(sig1), with omg in the quadrant of sig
        let somg1 = salp0 * sbet1;
        let comg1 = if sbet1 != 0. || calp1 != 0. {
            cbet1 * calp1
        } else {
            1.
        };
        let (ssig1, csig1) = norm(sbet1, comg1);

        let k2 = calp0 * calp0 * geod.ep2;
        let eps = k2 / (2. * (1. + (1. + k2).sqrt()) + k2);

        let a1m1 = a1m1f(eps);
        let mut c1a = [0.; N_C1 + 1];
        c1f(eps, &mut c1a);
        let b11 = sin_cos_series(true, ssig1, csig1, &c1a);
        let (s, c) = b11.sin_cos();
        // tau1 = sig1 + B11
        let stau1 = ssig1 * c + csig1 * s;
        let ctau1 = csig1 * c - ssig1 * s;

        let mut c1pa = [0.; N_C1 + 1];
        c1pf(eps, &mut c1pa);

        let a2m1 = a2m1f(eps);
        let mut c2a = [0.; N_C2 + 1];
        c2f(eps, &mut c2a);
        let b21 = sin_cos_series(true, ssig1, csig1, &c2a);

        let mut c3a = [0.; N_C3];
        geod.c3f(eps, &mut c3a);
        let a3c = -geod.f * salp0 * geod.a3f(eps);
        let b31 = sin_cos_series(true, ssig1, csig1, &c3a);

        let mut c4a = [0.; N_C4];
        geod.c4f(k2, &mut c4a);
        // a² e² cos(alp0) sin(alp0)
        let a4 = geod.a * geod.a * calp0 * salp0 * geod.e2;
        let b41 = sin_cos_series(false, ssig1, csig1, &c4a);

        GeodesicLine {
            lat1,
            lon1,
            azi1,
            salp1,
            calp1,
            f: geod.f,
            b: geod.b,
            c2: geod.c2,
            f1: geod.f1,
            dn1,
            salp0,
            calp0,
            ssig1,
            csig1,
            somg1,
            comg1,
            k2,
            a1m1,
            c1a,
            c1pa,
            b11,
            stau1,
            ctau1,
            a2m1,
            c2a,
            b21,
            c3a,
            a3c,
            b31,
            c4a,
            a4,
            b41,
            s13: f64::NAN,
            a13: f64::NAN,
        }
    }

    pub(super) fn set_distance(&mut self, s13: f64, a13: f64) {
        self.s13 = s13;
        self.a13 = a13;
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.lat1
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.lon1
    }

    #[must_use]
    pub fn azimuth(&self) -> f64 {
        self.azi1
    }

    /// The distance to the reference end point, for lines constructed
    /// by [`Geodesic::inverse_line()`]. NaN otherwise
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.s13
    }

    /// The arc length to the reference end point, in degrees
    #[must_use]
    pub fn arc_distance(&self) -> f64 {
        self.a13
    }

    /// The point at distance `s12` meters along the line
    #[must_use]
    pub fn position(&self, s12: f64) -> GeodesicSolution {
        self.gen_position(false, s12, false)
    }

    /// The point at spherical arc length `a12` degrees along the line
    #[must_use]
    pub fn arc_position(&self, a12: f64) -> GeodesicSolution {
        self.gen_position(true, a12, false)
    }

    /// As `position()`, but with the longitude of the result unrolled,
    /// i.e. `lon2 - lon1` reflects the number of times the line has
    /// encircled the ellipsoid
    #[must_use]
    pub fn unrolled_position(&self, s12: f64) -> GeodesicSolution {
        self.gen_position(false, s12, true)
    }

    fn gen_position(&self, arcmode: bool, s12_a12: f64, unroll: bool) -> GeodesicSolution {
        let mut b12 = 0.;
        let (mut sig12, mut ssig12, mut csig12);

        if arcmode {
            sig12 = s12_a12.to_radians();
            (ssig12, csig12) = sincosd(s12_a12);
        } else {
            let tau12 = s12_a12 / (self.b * (1. + self.a1m1));
            let tau12 = if tau12.is_finite() { tau12 } else { f64::NAN };
            let (s, c) = tau12.sin_cos();
            // tau2 = tau1 + tau12
            b12 = -sin_cos_series(
                true,
                self.stau1 * c + self.ctau1 * s,
                self.ctau1 * c - self.stau1 * s,
                &self.c1pa,
            );
            sig12 = tau12 - (b12 - self.b11);
            (ssig12, csig12) = sig12.sin_cos();

            if self.f.abs() > 0.01 {
                // The reverted distance series is inaccurate for |f| > 1/100,
                // so correct sig12 by one Newton iteration
                let ssig2 = self.ssig1 * csig12 + self.csig1 * ssig12;
                let csig2 = self.csig1 * csig12 - self.ssig1 * ssig12;
                b12 = sin_cos_series(true, ssig2, csig2, &self.c1a);
                let serr = (1. + self.a1m1) * (sig12 + (b12 - self.b11)) - s12_a12 / self.b;
                sig12 -= serr / (1. + self.k2 * ssig2 * ssig2).sqrt();
                (ssig12, csig12) = sig12.sin_cos();
            }
        }

        // sig2 = sig1 + sig12
        let ssig2 = self.ssig1 * csig12 + self.csig1 * ssig12;
        let mut csig2 = self.csig1 * csig12 - self.ssig1 * ssig12;
        let dn2 = (1. + self.k2 * ssig2 * ssig2).sqrt();
        if arcmode || self.f.abs() > 0.01 {
            b12 = sin_cos_series(true, ssig2, csig2, &self.c1a);
        }
        let ab1 = (1. + self.a1m1) * (b12 - self.b11);

        // sin(bet2) = cos(alp0) * sin(sig2)
        let sbet2 = self.calp0 * ssig2;
        let mut cbet2 = self.salp0.hypot(self.calp0 * csig2);
        if cbet2 == 0. {
            // salp0 = 0 and csig2 = 0: break the degeneracy
            cbet2 = TINY;
            csig2 = TINY;
        }
        // tan(alp0) = cos(sig2) * tan(alp2)
        let salp2 = self.salp0;
        let calp2 = self.calp0 * csig2;

        let s12 = if arcmode {
            self.b * ((1. + self.a1m1) * sig12 + ab1)
        } else {
            s12_a12
        };

        // tan(omg2) = sin(alp0) * tan(sig2)
        let somg2 = self.salp0 * ssig2;
        let comg2 = csig2;
        let omg12 = if unroll {
            // East or west going?
            let e = 1_f64.copysign(self.salp0);
            e * (sig12 - (ssig2.atan2(csig2) - self.ssig1.atan2(self.csig1))
                + ((e * somg2).atan2(comg2) - (e * self.somg1).atan2(self.comg1)))
        } else {
            (somg2 * self.comg1 - comg2 * self.somg1).atan2(comg2 * self.comg1 + somg2 * self.somg1)
        };
        let lam12 = omg12
            + self.a3c * (sig12 + (sin_cos_series(true, ssig2, csig2, &self.c3a) - self.b31));
        let lon12 = lam12.to_degrees();
        let lon2 = if unroll {
            self.lon1 + lon12
        } else {
            ang_normalize(ang_normalize(self.lon1) + ang_normalize(lon12))
        };

        let lat2 = atan2d(sbet2, self.f1 * cbet2);
        let azi2 = atan2d(salp2, calp2);

        // Reduced length and geodesic scales
        let b22 = sin_cos_series(true, ssig2, csig2, &self.c2a);
        let ab2 = (1. + self.a2m1) * (b22 - self.b21);
        let j12 = (self.a1m1 - self.a2m1) * sig12 + (ab1 - ab2);
        let m12 = self.b
            * ((dn2 * (self.csig1 * ssig2) - self.dn1 * (self.ssig1 * csig2))
                - self.csig1 * csig2 * j12);
        let t = self.k2 * (ssig2 - self.ssig1) * (ssig2 + self.ssig1) / (self.dn1 + dn2);
        let scale12 = csig12 + (t * ssig2 - csig2 * j12) * self.ssig1 / self.dn1;
        let scale21 = csig12 - (t * self.ssig1 - self.csig1 * j12) * ssig2 / dn2;

        // Area
        let b42 = sin_cos_series(false, ssig2, csig2, &self.c4a);
        let (salp12, calp12) = if self.calp0 == 0. || self.salp0 == 0. {
            // alp12 = alp2 - alp1, used in atan2, so no need to normalize
            (
                salp2 * self.calp1 - calp2 * self.salp1,
                calp2 * self.calp1 + salp2 * self.salp1,
            )
        } else {
            // tan(alp) = tan(alp0) * sec(sig), so
            // tan(alp2 - alp1) = (tan(alp2) - tan(alp1)) / (tan(alp2) * tan(alp1) + 1)
            //   = calp0 * salp0 * (csig1 - csig2) / (salp0² + calp0² * csig1 * csig2)
            // with csig1 - csig2 written to avoid cancellation
            let salp12 = self.calp0
                * self.salp0
                * if csig12 <= 0. {
                    self.csig1 * (1. - csig12) + ssig12 * self.ssig1
                } else {
                    ssig12 * (self.csig1 * ssig12 / (1. + csig12) + self.ssig1)
                };
            let calp12 = self.salp0 * self.salp0 + self.calp0 * self.calp0 * self.csig1 * csig2;
            (salp12, calp12)
        };
        let area = self.c2 * salp12.atan2(calp12) + self.a4 * (b42 - self.b41);

        let a12 = if arcmode { s12_a12 } else { sig12.to_degrees() };

        GeodesicSolution {
            lat1: self.lat1,
            lon1: self.lon1,
            azi1: self.azi1,
            lat2,
            lon2,
            azi2,
            s12,
            a12,
            m12,
            scale12,
            scale21,
            area,
        }
    }
}

// ----- T E S T S ---------------------------------------------------------------------
