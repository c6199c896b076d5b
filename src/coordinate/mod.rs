//! Coordinate tuples, and the [`CoordinateSet`](set::CoordinateSet) access
//! interface through which operators read and write collections of them.
use crate::prelude::*;

pub mod buffer;
pub mod coor2d;
pub mod coor4d;
pub mod set;

/// Methods for changing the coordinate representation of angles.
/// Dimensionality untold, the methods operate on the first two
/// dimensions only.
pub trait AngularUnits {
    /// Transform the first two elements of a coordinate tuple from degrees to radians
    fn to_radians(self) -> Self;

    /// Transform the first two elements of a coordinate tuple from radians to degrees
    fn to_degrees(self) -> Self;

    /// Transform the first two elements of a coordinate tuple from radians to seconds
    /// of arc.
    fn to_arcsec(self) -> Self;

    /// Transform the internal lon/lat-in-radians to lat/lon-in-degrees
    fn to_geo(self) -> Self;
}

// ----- T E S T S ---------------------------------------------------------------------
