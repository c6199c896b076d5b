use super::*;
use std::ops::{Add, Index, IndexMut, Sub};

/// Generic 4D coordinate tuple, with no fixed interpretation of the elements
#[derive(Debug, Default, PartialEq, Copy, Clone)]
pub struct Coor4D(pub [f64; 4]);

// ----- O P E R A T O R   T R A I T S -------------------------------------------------

impl Index<usize> for Coor4D {
    type Output = f64;
    fn index(&self, i: usize) -> &Self::Output {
        &self.0[i]
    }
}

impl IndexMut<usize> for Coor4D {
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        &mut self.0[i]
    }
}

impl Add for Coor4D {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        let mut result = self;
        for i in 0..4 {
            result[i] += other[i];
        }
        result
    }
}

impl Sub for Coor4D {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        let mut result = self;
        for i in 0..4 {
            result[i] -= other[i];
        }
        result
    }
}

// ----- A N G U L A R   U N I T S -----------------------------------------------------

impl AngularUnits for Coor4D {
    #[must_use]
    fn to_radians(self) -> Self {
        Coor4D([self[0].to_radians(), self[1].to_radians(), self[2], self[3]])
    }

    #[must_use]
    fn to_degrees(self) -> Self {
        Coor4D([self[0].to_degrees(), self[1].to_degrees(), self[2], self[3]])
    }

    #[must_use]
    fn to_arcsec(self) -> Self {
        let (x, y) = (self[0].to_degrees() * 3600., self[1].to_degrees() * 3600.);
        Coor4D([x, y, self[2], self[3]])
    }

    #[must_use]
    fn to_geo(self) -> Self {
        Coor4D([self[1].to_degrees(), self[0].to_degrees(), self[2], self[3]])
    }
}

// ----- C O N S T R U C T O R S -------------------------------------------------------

impl Coor4D {
    /// A `Coor4D` from latitude/longitude/height/time, with the angular input in degrees.
    /// The result is in the internal lon/lat-in-radians order
    #[must_use]
    pub fn geo(latitude: f64, longitude: f64, height: f64, time: f64) -> Coor4D {
        Coor4D([longitude.to_radians(), latitude.to_radians(), height, time])
    }

    /// A `Coor4D` from longitude/latitude/height/time, with the angular input in degrees
    #[must_use]
    pub fn gis(longitude: f64, latitude: f64, height: f64, time: f64) -> Coor4D {
        Coor4D([longitude.to_radians(), latitude.to_radians(), height, time])
    }

    /// A `Coor4D` from its elements, taken at face value
    #[must_use]
    pub fn raw(first: f64, second: f64, third: f64, fourth: f64) -> Coor4D {
        Coor4D([first, second, third, fourth])
    }

    /// A `Coor4D` consisting of 4 `NaN`s
    #[must_use]
    pub fn nan() -> Coor4D {
        Coor4D([f64::NAN; 4])
    }

    /// A `Coor4D` consisting of 4 `0`s
    #[must_use]
    pub fn origin() -> Coor4D {
        Coor4D([0.; 4])
    }
}

// ----- A C C E S S O R S -------------------------------------------------------------

impl Coor4D {
    pub fn xy(&self) -> (f64, f64) {
        (self[0], self[1])
    }

    pub fn xyz(&self) -> (f64, f64, f64) {
        (self[0], self[1], self[2])
    }

    pub fn xyzt(&self) -> (f64, f64, f64, f64) {
        (self[0], self[1], self[2], self[3])
    }

    pub fn set_xy(&mut self, x: f64, y: f64) {
        self[0] = x;
        self[1] = y;
    }

    pub fn set_xyz(&mut self, x: f64, y: f64, z: f64) {
        self.set_xy(x, y);
        self[2] = z;
    }

    /// True if any of the elements is `NaN`
    pub fn is_nan(&self) -> bool {
        self.0.iter().any(|c| c.is_nan())
    }
}

// ----- D I S T A N C E S -------------------------------------------------------------

impl Coor4D {
    /// Euclidean distance between two points in the plane spanned by
    /// the first two coordinate elements
    #[must_use]
    pub fn hypot2(&self, other: &Self) -> f64 {
        (self[0] - other[0]).hypot(self[1] - other[1])
    }

    /// Euclidean distance between two points in the space spanned by
    /// the first three coordinate elements. Typically used for cartesian
    /// coordinates, where it reflects the actual distance in the real world
    #[must_use]
    pub fn hypot3(&self, other: &Self) -> f64 {
        (self[0] - other[0])
            .hypot(self[1] - other[1])
            .hypot(self[2] - other[2])
    }
}

// ----- T E S T S ---------------------------------------------------------------------
