use crate::inner_op::units::{angular_unit, linear_unit};
use crate::Error;
use std::fmt;

/// The direction of a coordinate system axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisDirection {
    North,
    South,
    East,
    West,
    Up,
    Down,
    GeocentricX,
    GeocentricY,
    GeocentricZ,
    Future,
    Other,
}

impl fmt::Display for AxisDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AxisDirection::North => "north",
            AxisDirection::South => "south",
            AxisDirection::East => "east",
            AxisDirection::West => "west",
            AxisDirection::Up => "up",
            AxisDirection::Down => "down",
            AxisDirection::GeocentricX => "geocentricX",
            AxisDirection::GeocentricY => "geocentricY",
            AxisDirection::GeocentricZ => "geocentricZ",
            AxisDirection::Future => "future",
            AxisDirection::Other => "unspecified",
        };
        write!(f, "{name}")
    }
}

/// One axis of a coordinate system: its name, abbreviation, direction,
/// and unit. The unit conversion factor converts to the SI base unit:
/// metres for linear units, radians for angular
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub name: String,
    pub abbreviation: String,
    pub direction: AxisDirection,
    pub unit_name: String,
    pub unit_conversion_factor: f64,
    angular: bool,
}

impl Axis {
    /// An axis with the unit given by its short name, e.g. `deg`, `m`,
    /// `us-ft`. Time axes use the unit `year`
    pub fn new(
        name: &str,
        abbreviation: &str,
        direction: AxisDirection,
        unit: &str,
    ) -> Result<Axis, Error> {
        let (unit_name, unit_conversion_factor, angular) = if let Some(u) = angular_unit(unit) {
            (u.description, u.multiplier, true)
        } else if let Some(u) = linear_unit(unit) {
            (u.description, u.multiplier, false)
        } else if unit == "year" {
            ("Year", 1., false)
        } else {
            return Err(Error::BadParam("unit".to_string(), unit.to_string()));
        };
        Ok(Axis {
            name: name.to_string(),
            abbreviation: abbreviation.to_string(),
            direction,
            unit_name: unit_name.to_lowercase(),
            unit_conversion_factor,
            angular,
        })
    }

    // The axes of the built in coordinate systems. The units are known
    // to exist, so construction cannot fail
    fn builtin(name: &str, abbreviation: &str, direction: AxisDirection, angular: bool) -> Axis {
        let (unit_name, unit_conversion_factor) = if angular {
            ("degree", std::f64::consts::PI / 180.)
        } else {
            ("metre", 1.)
        };
        Axis {
            name: name.to_string(),
            abbreviation: abbreviation.to_string(),
            direction,
            unit_name: unit_name.to_string(),
            unit_conversion_factor,
            angular,
        }
    }

    #[must_use]
    pub fn latitude() -> Axis {
        Axis::builtin("Geodetic latitude", "Lat", AxisDirection::North, true)
    }

    #[must_use]
    pub fn longitude() -> Axis {
        Axis::builtin("Geodetic longitude", "Lon", AxisDirection::East, true)
    }

    #[must_use]
    pub fn easting() -> Axis {
        Axis::builtin("Easting", "E", AxisDirection::East, false)
    }

    #[must_use]
    pub fn northing() -> Axis {
        Axis::builtin("Northing", "N", AxisDirection::North, false)
    }

    #[must_use]
    pub fn height() -> Axis {
        Axis::builtin("Gravity-related height", "H", AxisDirection::Up, false)
    }

    #[must_use]
    pub fn ellipsoidal_height() -> Axis {
        Axis::builtin("Ellipsoidal height", "h", AxisDirection::Up, false)
    }

    /// The three axes of an earth centered, earth fixed system
    #[must_use]
    pub fn geocentric() -> [Axis; 3] {
        [
            Axis::builtin("Geocentric X", "X", AxisDirection::GeocentricX, false),
            Axis::builtin("Geocentric Y", "Y", AxisDirection::GeocentricY, false),
            Axis::builtin("Geocentric Z", "Z", AxisDirection::GeocentricZ, false),
        ]
    }

    #[must_use]
    pub fn is_angular(&self) -> bool {
        self.angular
    }

    /// Same direction and unit, disregarding the naming
    #[must_use]
    pub fn same_meaning(&self, other: &Axis) -> bool {
        self.direction == other.direction
            && self.angular == other.angular
            && self.unit_conversion_factor == other.unit_conversion_factor
    }

    pub(super) fn to_wkt(&self) -> String {
        let unit = if self.angular { "ANGLEUNIT" } else { "LENGTHUNIT" };
        format!(
            "AXIS[\"{} ({})\",{},{}[\"{}\",{}]]",
            self.name.to_lowercase(),
            self.abbreviation,
            self.direction,
            unit,
            self.unit_name,
            self.unit_conversion_factor
        )
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units() -> Result<(), Error> {
        let axis = Axis::new("Easting", "X", AxisDirection::East, "us-ft")?;
        assert_eq!(axis.unit_name, "u.s. surveyor's foot");
        assert_eq!(axis.unit_conversion_factor, 1200. / 3937.);
        assert!(!axis.is_angular());

        let lat = Axis::new("Latitude", "phi", AxisDirection::North, "deg")?;
        assert!(lat.is_angular());
        assert!(lat.same_meaning(&Axis::latitude()));
        assert!(!lat.same_meaning(&Axis::longitude()));

        assert!(Axis::new("Bad", "B", AxisDirection::Up, "furlong").is_err());
        Ok(())
    }

    #[test]
    fn wkt() {
        assert_eq!(
            Axis::easting().to_wkt(),
            "AXIS[\"easting (E)\",east,LENGTHUNIT[\"metre\",1]]"
        );
        assert!(Axis::latitude().to_wkt().starts_with("AXIS[\"geodetic latitude (Lat)\",north,ANGLEUNIT[\"degree\",0.0174"));
    }
}
