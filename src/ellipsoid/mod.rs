//! The biaxial ellipsoid of revolution, as given by its semimajor axis
//! and flattening, with a table of traditionally named ellipsoids
use crate::Error;

mod cartesians;
pub mod constants;
mod latitudes;

use constants::{EllipsoidDefinition, Shape, ELLIPSOID_LIST};

/// Representation of a biaxial ellipsoid of revolution
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    a: f64,
    f: f64,
}

/// GRS80 is the default ellipsoid.
impl Default for Ellipsoid {
    fn default() -> Ellipsoid {
        Ellipsoid::new(6_378_137.0, 1. / 298.257_222_101)
    }
}

impl Ellipsoid {
    /// User defined ellipsoid
    #[must_use]
    pub fn new(semimajor_axis: f64, flattening: f64) -> Ellipsoid {
        Ellipsoid {
            a: semimajor_axis,
            f: flattening,
        }
    }

    /// Ellipsoid given by its semimajor and semiminor axes
    #[must_use]
    pub fn from_axes(semimajor_axis: f64, semiminor_axis: f64) -> Ellipsoid {
        Ellipsoid::new(
            semimajor_axis,
            (semimajor_axis - semiminor_axis) / semimajor_axis,
        )
    }

    /// Predefined ellipsoid, from the [`ELLIPSOID_LIST`], or given
    /// on the form `a, rf` (semimajor axis, reciprocal flattening).
    /// A reciprocal flattening of 0 indicates a sphere
    pub fn named(name: &str) -> Result<Ellipsoid, Error> {
        if let Some(definition) = Ellipsoid::definition(name) {
            return Ok(Ellipsoid::from_definition(definition));
        }

        // Not one of the builtins - is it on the form "a, rf"?
        let parts: Vec<&str> = name.split(',').map(str::trim).collect();
        if parts.len() == 2 {
            if let (Ok(a), Ok(rf)) = (parts[0].parse::<f64>(), parts[1].parse::<f64>()) {
                let f = if rf == 0. { 0. } else { 1. / rf };
                return Ok(Ellipsoid::new(a, f));
            }
        }

        Err(Error::NotFound(
            String::from(name),
            String::from(": unknown ellipsoid"),
        ))
    }

    /// The entry of the [`ELLIPSOID_LIST`] named `name`
    pub fn definition(name: &str) -> Option<&'static EllipsoidDefinition> {
        ELLIPSOID_LIST.iter().find(|e| e.0 == name)
    }

    fn from_definition(definition: &EllipsoidDefinition) -> Ellipsoid {
        match definition.2 {
            Shape::Rf(rf) => Ellipsoid::new(definition.1, 1. / rf),
            Shape::B(b) => Ellipsoid::from_axes(definition.1, b),
        }
    }

    // ----- Eccentricities --------------------------------------------------------

    /// The squared eccentricity *e² = (a² - b²) / a²*.
    #[must_use]
    pub fn eccentricity_squared(&self) -> f64 {
        self.f * (2_f64 - self.f)
    }

    /// The eccentricity *e*
    #[must_use]
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity_squared().sqrt()
    }

    /// The squared second eccentricity *e'² = (a² - b²) / b² = e² / (1 - e²)*
    #[must_use]
    pub fn second_eccentricity_squared(&self) -> f64 {
        let es = self.eccentricity_squared();
        es / (1.0 - es)
    }

    // ----- Axes and flattenings ----------------------------------------------------

    /// The semimajor axis, *a*
    #[must_use]
    pub fn semimajor_axis(&self) -> f64 {
        self.a
    }

    /// The semiminor axis, *b*
    #[must_use]
    pub fn semiminor_axis(&self) -> f64 {
        self.a * (1.0 - self.f)
    }

    /// The flattening, *f = (a - b)/a*
    #[must_use]
    pub fn flattening(&self) -> f64 {
        self.f
    }

    /// The third flattening, *n = (a - b) / (a + b) = f / (2 - f)*
    #[must_use]
    pub fn third_flattening(&self) -> f64 {
        self.f / (2.0 - self.f)
    }

    /// True for a sphere, or an ellipsoid indistinguishable from one
    #[must_use]
    pub fn is_sphere(&self) -> bool {
        self.f.abs() < 1e-8
    }

    // ----- Curvatures ------------------------------------------------------------

    /// The radius of curvature in the prime vertical, *N*
    #[must_use]
    pub fn prime_vertical_radius_of_curvature(&self, latitude: f64) -> f64 {
        if self.f == 0.0 {
            return self.a;
        }
        self.a / (1.0 - latitude.sin().powi(2) * self.eccentricity_squared()).sqrt()
    }

    /// The meridian radius of curvature, *M*
    #[must_use]
    pub fn meridian_radius_of_curvature(&self, latitude: f64) -> f64 {
        if self.f == 0.0 {
            return self.a;
        }
        let num = self.a * (1.0 - self.eccentricity_squared());
        let denom = (1.0 - latitude.sin().powi(2) * self.eccentricity_squared()).powf(1.5);
        num / denom
    }
}

// ----- Tests ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn constructors() -> Result<(), Error> {
        let ellps = Ellipsoid::named("intl")?;
        assert_eq!(ellps.flattening(), 1. / 297.);

        let ellps = Ellipsoid::named("APL4.9")?;
        assert_eq!(ellps.flattening(), 1. / 298.25);

        let ellps = Ellipsoid::named("clrk66")?;
        assert_float_eq!(ellps.semiminor_axis(), 6356583.8, abs <= 1e-8);

        let ellps = Ellipsoid::named("6400000, 300")?;
        assert_eq!(ellps.semimajor_axis(), 6400000.);
        assert_eq!(ellps.flattening(), 1. / 300.);
        assert!(Ellipsoid::named("6400000, 0")?.is_sphere());
        assert!(Ellipsoid::named("sphere")?.is_sphere());

        assert!(matches!(
            Ellipsoid::named("potato"),
            Err(Error::NotFound(_, _))
        ));
        assert_eq!(Ellipsoid::default(), Ellipsoid::named("GRS80")?);
        Ok(())
    }

    #[test]
    fn shape_and_size() -> Result<(), Error> {
        let ellps = Ellipsoid::named("GRS80")?;
        assert_eq!(ellps.semimajor_axis(), 6378137.0);
        assert_float_eq!(ellps.eccentricity(), 0.081819191, abs <= 1e-9);
        assert_float_eq!(ellps.eccentricity_squared(), 0.006694380023, abs <= 1e-12);
        assert_float_eq!(ellps.semiminor_axis(), 6_356_752.314_140, abs <= 1e-6);
        assert_float_eq!(ellps.third_flattening(), 0.001679220395, abs <= 1e-12);
        assert_float_eq!(
            ellps.second_eccentricity_squared(),
            0.006739496775,
            abs <= 1e-12
        );
        Ok(())
    }

    #[test]
    fn curvatures() -> Result<(), Error> {
        let ellps = Ellipsoid::named("GRS80")?;
        let pole = 90_f64.to_radians();
        // The curvatures at the North Pole
        assert_float_eq!(
            ellps.meridian_radius_of_curvature(pole),
            6_399_593.6259,
            abs <= 1e-4
        );
        assert_float_eq!(
            ellps.prime_vertical_radius_of_curvature(pole),
            ellps.meridian_radius_of_curvature(pole),
            abs <= 1e-5
        );

        // The curvatures at the Equator
        assert_float_eq!(
            ellps.meridian_radius_of_curvature(0.0),
            6_335_439.3271,
            abs <= 1e-4
        );
        assert_eq!(
            ellps.prime_vertical_radius_of_curvature(0.0),
            ellps.semimajor_axis()
        );
        Ok(())
    }
}
