use std::fmt;

/// A geographic bounding box, in degrees. A box crossing the antimeridian
/// has `west > east`.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaOfUse {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
    pub name: Option<String>,
}

/// The area a caller intends to transform coordinates within, used for
/// ranking candidate operations. Same conventions as [`AreaOfUse`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaOfInterest {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl AreaOfInterest {
    #[must_use]
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> AreaOfInterest {
        AreaOfInterest {
            west,
            south,
            east,
            north,
        }
    }
}

impl From<AreaOfInterest> for AreaOfUse {
    fn from(aoi: AreaOfInterest) -> AreaOfUse {
        AreaOfUse::new(aoi.west, aoi.south, aoi.east, aoi.north, None)
    }
}

impl AreaOfUse {
    #[must_use]
    pub fn new(west: f64, south: f64, east: f64, north: f64, name: Option<&str>) -> AreaOfUse {
        AreaOfUse {
            west,
            south,
            east,
            north,
            name: name.map(String::from),
        }
    }

    /// The whole world
    #[must_use]
    pub fn world() -> AreaOfUse {
        AreaOfUse::new(-180., -90., 180., 90., Some("World"))
    }

    #[must_use]
    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    // The longitude extent as one or two non-wrapping intervals
    fn longitude_intervals(&self) -> Vec<(f64, f64)> {
        if self.crosses_antimeridian() {
            vec![(self.west, 180.), (-180., self.east)]
        } else {
            vec![(self.west, self.east)]
        }
    }

    /// The extent of the box, in square degrees
    #[must_use]
    pub fn extent(&self) -> f64 {
        let width: f64 = self
            .longitude_intervals()
            .iter()
            .map(|(w, e)| (e - w).max(0.))
            .sum();
        width * (self.north - self.south).max(0.)
    }

    /// The extent of the intersection with `other`, in square degrees.
    /// Zero for disjoint boxes
    #[must_use]
    pub fn intersection_extent(&self, other: &AreaOfUse) -> f64 {
        let height = self.north.min(other.north) - self.south.max(other.south);
        if height <= 0. {
            return 0.;
        }
        let mut width = 0.;
        for (w1, e1) in self.longitude_intervals() {
            for (w2, e2) in other.longitude_intervals() {
                width += (e1.min(e2) - w1.max(w2)).max(0.);
            }
        }
        width * height
    }

    #[must_use]
    pub fn intersects(&self, other: &AreaOfUse) -> bool {
        self.intersection_extent(other) > 0.
    }

    /// The smallest box containing both `self` and `other`. If either
    /// crosses the antimeridian, the longitude extent becomes global
    #[must_use]
    pub fn union(&self, other: &AreaOfUse) -> AreaOfUse {
        let (west, east) = if self.crosses_antimeridian() || other.crosses_antimeridian() {
            (-180., 180.)
        } else {
            (self.west.min(other.west), self.east.max(other.east))
        };
        AreaOfUse::new(
            west,
            self.south.min(other.south),
            east,
            self.north.max(other.north),
            None,
        )
    }
}

impl fmt::Display for AreaOfUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BBOX[{},{},{},{}]",
            self.south, self.west, self.north, self.east
        )
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extents() {
        let world = AreaOfUse::world();
        assert_eq!(world.extent(), 360. * 180.);

        let denmark = AreaOfUse::new(8., 54., 16., 58., Some("Denmark"));
        assert_eq!(denmark.intersection_extent(&world), denmark.extent());
        assert_eq!(denmark.to_string(), "BBOX[54,8,58,16]");

        let fiji = AreaOfUse::new(176., -20., -178., -12., Some("Fiji"));
        assert!(fiji.crosses_antimeridian());
        assert_eq!(fiji.extent(), 6. * 8.);
        let east_of_antimeridian = AreaOfUse::new(-179., -15., -170., -10., None);
        assert_eq!(fiji.intersection_extent(&east_of_antimeridian), 1. * 3.);
        assert!(!fiji.intersects(&denmark));
    }

    #[test]
    fn union() {
        let a = AreaOfUse::new(0., 0., 10., 10., None);
        let b = AreaOfUse::new(5., -5., 20., 5., None);
        let u = a.union(&b);
        assert_eq!((u.west, u.south, u.east, u.north), (0., -5., 20., 10.));

        let fiji = AreaOfUse::new(176., -20., -178., -12., None);
        let u = a.union(&fiji);
        assert_eq!((u.west, u.east), (-180., 180.));

        let aoi: AreaOfUse = AreaOfInterest::new(1., 2., 3., 4.).into();
        assert_eq!(aoi.extent(), 4.);
    }
}
