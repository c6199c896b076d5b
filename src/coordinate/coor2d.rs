use super::*;
use std::ops::{Index, IndexMut};

/// Generic 2D coordinate tuple, with no fixed interpretation of the elements
#[derive(Debug, Default, PartialEq, Copy, Clone)]
pub struct Coor2D(pub [f64; 2]);

impl Index<usize> for Coor2D {
    type Output = f64;
    fn index(&self, i: usize) -> &Self::Output {
        &self.0[i]
    }
}

impl IndexMut<usize> for Coor2D {
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        &mut self.0[i]
    }
}

impl AngularUnits for Coor2D {
    #[must_use]
    fn to_radians(self) -> Self {
        Coor2D([self[0].to_radians(), self[1].to_radians()])
    }

    #[must_use]
    fn to_degrees(self) -> Self {
        Coor2D([self[0].to_degrees(), self[1].to_degrees()])
    }

    #[must_use]
    fn to_arcsec(self) -> Self {
        Coor2D([self[0].to_degrees() * 3600., self[1].to_degrees() * 3600.])
    }

    #[must_use]
    fn to_geo(self) -> Self {
        Coor2D([self[1].to_degrees(), self[0].to_degrees()])
    }
}

// ----- C O N S T R U C T O R S -------------------------------------------------------

impl Coor2D {
    /// A `Coor2D` from latitude/longitude, with the angular input in degrees.
    /// The result is in the internal lon/lat-in-radians order
    #[must_use]
    pub fn geo(latitude: f64, longitude: f64) -> Coor2D {
        Coor2D([longitude.to_radians(), latitude.to_radians()])
    }

    /// A `Coor2D` from longitude/latitude, with the angular input in degrees
    #[must_use]
    pub fn gis(longitude: f64, latitude: f64) -> Coor2D {
        Coor2D([longitude.to_radians(), latitude.to_radians()])
    }

    /// A `Coor2D` from its elements, taken at face value
    #[must_use]
    pub fn raw(first: f64, second: f64) -> Coor2D {
        Coor2D([first, second])
    }

    #[must_use]
    pub fn nan() -> Coor2D {
        Coor2D([f64::NAN, f64::NAN])
    }

    #[must_use]
    pub fn origin() -> Coor2D {
        Coor2D([0., 0.])
    }

    pub fn xy(&self) -> (f64, f64) {
        (self[0], self[1])
    }

    pub fn set_xy(&mut self, x: f64, y: f64) {
        self[0] = x;
        self[1] = y;
    }

    /// Euclidean distance between two points in the plane
    #[must_use]
    pub fn hypot2(&self, other: &Self) -> f64 {
        (self[0] - other[0]).hypot(self[1] - other[1])
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coor2d() {
        let c = Coor2D::raw(12., 55.).to_radians();
        let d = Coor2D::gis(12., 55.);
        assert_eq!(c, d);
        assert_eq!(Coor2D::geo(55., 12.), d);
        assert_eq!(d.xy().0, 12f64.to_radians());

        let mut e = Coor2D::origin();
        e.set_xy(3., 4.);
        assert_eq!(e.hypot2(&Coor2D::origin()), 5.);
        assert!(Coor2D::nan()[1].is_nan());
    }
}
