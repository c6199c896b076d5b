use super::*;

/// The area and perimeter of a geodesic polygon, or the length of a
/// geodesic polyline, built up point by point.
///
/// The edges are geodesics, so the polygon may encircle a pole, and the
/// vertices may be given in any longitude convention. The area is
/// counter clockwise positive, unless computed with `reverse`
#[derive(Debug, Clone)]
pub struct PolygonArea {
    geodesic: Geodesic,
    polyline: bool,
    area0: f64,
    num: usize,
    crossings: i64,
    areasum: Accumulator,
    perimetersum: Accumulator,
    lat0: f64,
    lon0: f64,
    lat1: f64,
    lon1: f64,
}

// +1 or -1 if the edge from lon1 to lon2 crosses the prime meridian going
// east or west, respectively. 0 otherwise
fn transit(lon1: f64, lon2: f64) -> i64 {
    // Treat a difference of -180 as an eastward edge
    let (lon12, _) = ang_diff(lon1, lon2);
    let lon1 = ang_normalize(lon1);
    let lon2 = ang_normalize(lon2);
    if lon12 > 0. && ((lon1 < 0. && lon2 >= 0.) || (lon1 > 0. && lon2 == 0.)) {
        1
    } else if lon12 < 0. && lon1 >= 0. && lon2 < 0. {
        -1
    } else {
        0
    }
}

// As `transit()`, for unrolled longitudes
fn transit_direct(lon1: f64, lon2: f64) -> i64 {
    let lon1 = lon1 % 720.;
    let lon2 = lon2 % 720.;
    let side = |lon: f64| i64::from((lon <= 0. && lon > -360.) || lon > 360.);
    side(lon2) - side(lon1)
}

impl PolygonArea {
    #[must_use]
    pub fn new(geodesic: Geodesic, polyline: bool) -> PolygonArea {
        PolygonArea {
            geodesic,
            polyline,
            area0: geodesic.ellipsoid_area(),
            num: 0,
            crossings: 0,
            areasum: Accumulator::new(),
            perimetersum: Accumulator::new(),
            lat0: f64::NAN,
            lon0: f64::NAN,
            lat1: f64::NAN,
            lon1: f64::NAN,
        }
    }

    /// Reset to an empty polygon
    pub fn clear(&mut self) {
        *self = PolygonArea::new(self.geodesic, self.polyline);
    }

    /// Number of vertices added so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.num
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num == 0
    }

    /// Add a vertex, in degrees
    pub fn add_point(&mut self, lat: f64, lon: f64) {
        if self.num == 0 {
            self.lat0 = lat;
            self.lat1 = lat;
            self.lon0 = lon;
            self.lon1 = lon;
        } else {
            let edge = self.geodesic.gen_inverse(self.lat1, self.lon1, lat, lon);
            self.perimetersum.add(edge.s12);
            if !self.polyline {
                self.areasum.add(edge.area);
                self.crossings += transit(self.lon1, lon);
            }
            self.lat1 = lat;
            self.lon1 = lon;
        }
        self.num += 1;
    }

    /// Add an edge of length `s` meters, leaving the most recent vertex
    /// in the direction `azi` degrees. Ignored for an empty polygon
    pub fn add_edge(&mut self, azi: f64, s: f64) {
        if self.num == 0 {
            return;
        }
        let end = self
            .geodesic
            .line(self.lat1, self.lon1, azi)
            .unrolled_position(s);
        self.perimetersum.add(s);
        if !self.polyline {
            self.areasum.add(end.area);
            self.crossings += transit_direct(self.lon1, end.lon2);
        }
        self.lat1 = end.lat2;
        self.lon1 = end.lon2;
        self.num += 1;
    }

    /// The number of vertices, the perimeter, and the area of the
    /// polygon. For polylines, the perimeter is the length, and the
    /// area is NaN.
    ///
    /// The area is counter clockwise positive, unless `reverse` is true.
    /// With `sign`, the area is reduced to (-A/2, A/2], where A is the
    /// area of the ellipsoid, otherwise to [0, A)
    #[must_use]
    pub fn compute(&self, reverse: bool, sign: bool) -> (usize, f64, f64) {
        if self.num < 2 {
            let area = if self.polyline { f64::NAN } else { 0. };
            return (self.num, 0., area);
        }
        if self.polyline {
            return (self.num, self.perimetersum.sum(0.), f64::NAN);
        }

        // Close the ring
        let edge = self
            .geodesic
            .gen_inverse(self.lat1, self.lon1, self.lat0, self.lon0);
        let perimeter = self.perimetersum.sum(edge.s12);
        let mut tempsum = self.areasum;
        tempsum.add(edge.area);
        let crossings = self.crossings + transit(self.lon1, self.lon0);
        let area = self.reduce_area(tempsum, crossings, reverse, sign);
        (self.num, perimeter, area)
    }

    /// As `compute()`, but as if a vertex at (`lat`, `lon`) had been
    /// added. The polygon itself is not modified
    #[must_use]
    pub fn test_point(&self, lat: f64, lon: f64, reverse: bool, sign: bool) -> (usize, f64, f64) {
        if self.num == 0 {
            let area = if self.polyline { f64::NAN } else { 0. };
            return (1, 0., area);
        }

        let mut perimeter = self.perimetersum.sum(0.);
        let mut tempsum = self.areasum;
        let mut crossings = self.crossings;
        let num = self.num + 1;

        // For polygons, the ring is closed by a second leg
        let legs = [
            (self.lat1, self.lon1, lat, lon),
            (lat, lon, self.lat0, self.lon0),
        ];
        let count = if self.polyline { 1 } else { 2 };
        for &(lat1, lon1, lat2, lon2) in &legs[..count] {
            let edge = self.geodesic.gen_inverse(lat1, lon1, lat2, lon2);
            perimeter += edge.s12;
            if !self.polyline {
                tempsum.add(edge.area);
                crossings += transit(lon1, lon2);
            }
        }

        if self.polyline {
            return (num, perimeter, f64::NAN);
        }
        let area = self.reduce_area(tempsum, crossings, reverse, sign);
        (num, perimeter, area)
    }

    // The accumulated area is clockwise positive. Correct for the number
    // of prime meridian crossings, and reduce to the requested range
    fn reduce_area(&self, mut area: Accumulator, crossings: i64, reverse: bool, sign: bool) -> f64 {
        area.remainder(self.area0);
        if crossings & 1 != 0 {
            let half = self.area0 / 2.;
            area.add(if area.sum(0.) < 0. { half } else { -half });
        }
        if !reverse {
            area.negate();
        }

        let value = area.sum(0.);
        if sign {
            if value > self.area0 / 2. {
                area.add(-self.area0);
            } else if value <= -self.area0 / 2. {
                area.add(self.area0);
            }
        } else if value >= self.area0 {
            area.add(-self.area0);
        } else if value < 0. {
            area.add(self.area0);
        }
        0. + area.sum(0.)
    }
}

// ----- T E S T S ---------------------------------------------------------------------
