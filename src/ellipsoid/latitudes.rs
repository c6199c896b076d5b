use super::*;
use crate::math::ancillary::sinhpsi_to_tanphi;

// ----- Latitudes -------------------------------------------------------------
impl Ellipsoid {
    /// Geographic latitude, 𝜙 to geocentric latitude, 𝜃.
    #[must_use]
    pub fn latitude_geographic_to_geocentric(&self, geographic: f64) -> f64 {
        ((1.0 - self.eccentricity_squared()) * geographic.tan()).atan()
    }

    /// Geocentric latitude, 𝜃 to geographic latitude, 𝜙.
    #[must_use]
    pub fn latitude_geocentric_to_geographic(&self, geocentric: f64) -> f64 {
        (geocentric.tan() / (1.0 - self.eccentricity_squared())).atan()
    }

    /// Geographic latitude, 𝜙 to reduced (parametric) latitude, 𝛽
    #[must_use]
    pub fn latitude_geographic_to_reduced(&self, geographic: f64) -> f64 {
        ((1. - self.f) * geographic.tan()).atan()
    }

    /// Geographic latitude, 𝜙 to isometric latitude, 𝜓
    #[must_use]
    pub fn latitude_geographic_to_isometric(&self, geographic: f64) -> f64 {
        let e = self.eccentricity();
        geographic.tan().asinh() - (e * geographic.sin()).atanh() * e
    }

    /// Isometric latitude, 𝜓 to geographic latitude, 𝜙
    #[must_use]
    pub fn latitude_isometric_to_geographic(&self, isometric: f64) -> f64 {
        let e = self.eccentricity();
        sinhpsi_to_tanphi(isometric.sinh(), e).atan()
    }
}

// ----- Tests ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn latitudes() -> Result<(), Error> {
        let ellps = Ellipsoid::named("GRS80")?;
        let phi = 55_f64.to_radians();

        let theta = ellps.latitude_geographic_to_geocentric(phi);
        assert!(theta < phi);
        assert_float_eq!(
            ellps.latitude_geocentric_to_geographic(theta),
            phi,
            abs <= 1e-14
        );

        let beta = ellps.latitude_geographic_to_reduced(phi);
        assert!(theta < beta && beta < phi);

        // The isometric latitude: Mercator's "meridional parts"
        let psi = ellps.latitude_geographic_to_isometric(phi);
        assert_float_eq!(psi, 1.1487426054, abs <= 1e-9);
        assert_float_eq!(
            ellps.latitude_isometric_to_geographic(psi),
            phi,
            abs <= 1e-14
        );
        Ok(())
    }
}
