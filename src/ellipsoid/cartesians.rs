use super::*;
use crate::coordinate::coor4d::Coor4D;
use std::f64::consts::FRAC_PI_2;

impl Ellipsoid {
    // ----- Cartesian <--> Geographic conversion ----------------------------------

    /// Geographic to cartesian conversion. The input is longitude and
    /// latitude in radians, and ellipsoidal height. The fourth coordinate
    /// is passed through untouched.
    ///
    /// Follows the the derivation given by
    /// Bowring ([1976](crate::Bibliography::Bow76) and
    /// [1985](crate::Bibliography::Bow85))
    #[must_use]
    #[allow(non_snake_case)]
    pub fn cartesian(&self, geographic: &Coor4D) -> Coor4D {
        let (lam, phi, h, t) = geographic.xyzt();

        let N = self.prime_vertical_radius_of_curvature(phi);
        let (sinphi, cosphi) = phi.sin_cos();
        let (sinlam, coslam) = lam.sin_cos();

        let X = (N + h) * cosphi * coslam;
        let Y = (N + h) * cosphi * sinlam;
        let Z = (N * (1.0 - self.eccentricity_squared()) + h) * sinphi;

        Coor4D::raw(X, Y, Z, t)
    }

    /// Cartesian to geographic conversion, using the closed form
    /// solution by Bowring ([1976](crate::Bibliography::Bow76)), with
    /// the trigonometric shortcuts of Fukushima
    /// ([1999](crate::Bibliography::Fuk99), appendix B).
    #[must_use]
    #[allow(non_snake_case)]
    pub fn geographic(&self, cartesian: &Coor4D) -> Coor4D {
        let (X, Y, Z, t) = cartesian.xyzt();

        let b = self.semiminor_axis();
        let eps = self.second_eccentricity_squared();
        let es = self.eccentricity_squared();

        let lam = Y.atan2(X);

        // Distance from the Z-axis
        let p = X.hypot(Y);

        // Less than a picometer from the axis: We're at one of the poles
        if p < 1.0e-12 {
            let phi = FRAC_PI_2.copysign(Z);
            let h = Z.abs() - b;
            return Coor4D::raw(lam, phi, h, t);
        }

        // The parametric latitude, by its tangent
        let T = (Z * self.a) / (p * b);
        let c = 1.0 / (1.0 + T * T).sqrt();
        let s = c * T;

        let phi_num = Z + eps * b * s.powi(3);
        let phi_denom = p - es * self.a * c.powi(3);
        let phi = phi_num.atan2(phi_denom);

        let lenphi = phi_num.hypot(phi_denom);
        let sinphi = phi_num / lenphi;
        let cosphi = phi_denom / lenphi;

        let N = self.a / (1.0 - sinphi.powi(2) * es).sqrt();

        // Bowring (1985): more accurate than the common h = p / cosphi - N
        let h = p * cosphi + Z * sinphi - self.a * self.a / N;

        Coor4D::raw(lam, phi, h, t)
    }
}

// ----- Tests ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn geo_to_cart() -> Result<(), Error> {
        let ellps = Ellipsoid::named("GRS80")?;

        // Roundtrip geographic <-> cartesian
        let geo = Coor4D::geo(55., 12., 100., 0.);
        let cart = ellps.cartesian(&geo);
        let geo2 = ellps.geographic(&cart);
        assert_float_eq!(geo.0, geo2.0, abs <= [1e-12, 1e-12, 1e-9, 0.]);

        // At the equator, on the prime meridian, X is a + h
        let cart = ellps.cartesian(&Coor4D::geo(0., 0., 10., 0.));
        assert_float_eq!(cart.xyz().0, 6378147., abs <= 1e-9);

        // The poles
        let b = ellps.semiminor_axis();
        let north = ellps.geographic(&Coor4D::raw(0., 0., b + 100., 0.));
        assert_float_eq!(north[1], FRAC_PI_2, abs <= 1e-15);
        assert_float_eq!(north[2], 100., abs <= 1e-9);
        let south = ellps.geographic(&Coor4D::raw(0., 0., -b, 0.));
        assert_float_eq!(south[1], -FRAC_PI_2, abs <= 1e-15);
        Ok(())
    }
}
