//! Reference system handles.
//!
//! A [`Crs`] is an immutable description of a coordinate reference
//! system: its classification, its axes, its datum, and for compound and
//! bound systems, its components. Operation resolution only reads these
//! properties.
use crate::ellipsoid::Ellipsoid;
use crate::geodesic::Geod;
use crate::Error;

mod area;
mod axis;

pub use area::{AreaOfInterest, AreaOfUse};
pub use axis::{Axis, AxisDirection};

/// The classification of a reference system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrsKind {
    Geographic,
    Projected,
    Geocentric,
    Vertical,
    Compound,
    Bound,
    Engineering,
    Derived,
}

/// The relation between two reference systems
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Equivalence {
    /// Identical in every respect, including names and identifiers
    Identical,
    /// Describing the same system, but differently named or identified
    Equivalent,
    Unrelated,
}

/// A geodetic datum: a named ellipsoid, and the longitude of the prime
/// meridian, in degrees east of Greenwich
#[derive(Debug, Clone, PartialEq)]
pub struct Datum {
    pub name: String,
    pub ellipsoid_name: String,
    pub ellipsoid: Ellipsoid,
    pub prime_meridian: f64,
}

impl Datum {
    /// A datum on one of the named ellipsoids, with a Greenwich prime meridian
    pub fn new(name: &str, ellipsoid_name: &str) -> Result<Datum, Error> {
        Ok(Datum {
            name: name.to_string(),
            ellipsoid_name: ellipsoid_name.to_string(),
            ellipsoid: Ellipsoid::named(ellipsoid_name)?,
            prime_meridian: 0.,
        })
    }

    #[must_use]
    pub fn with_prime_meridian(mut self, longitude: f64) -> Datum {
        self.prime_meridian = longitude;
        self
    }

    fn same_meaning(&self, other: &Datum) -> bool {
        self.ellipsoid == other.ellipsoid && self.prime_meridian == other.prime_meridian
    }

    fn to_wkt(&self) -> String {
        let a = self.ellipsoid.semimajor_axis();
        let f = self.ellipsoid.flattening();
        let rf = if f == 0. { 0. } else { 1. / f };
        format!(
            "DATUM[\"{}\",ELLIPSOID[\"{}\",{a},{rf}]],PRIMEM[\"Greenwich\",{}]",
            self.name, self.ellipsoid_name, self.prime_meridian
        )
    }
}

/// An immutable reference system description.
///
/// ```
/// # use geotrans::prelude::*;
/// # fn main() -> anyhow::Result<()> {
/// let wgs84 = Crs::wgs84();
/// assert!(wgs84.is_geographic() && wgs84.is_north_first());
/// assert_eq!(wgs84.id(), Some("EPSG:4326"));
///
/// let alias = wgs84.clone().with_name("WGS 84 (alias)");
/// assert_eq!(wgs84.equivalence(&alias), Equivalence::Equivalent);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Crs {
    name: String,
    id: Option<String>,
    kind: CrsKind,
    axes: Vec<Axis>,
    datum: Option<Datum>,
    area_of_use: Option<AreaOfUse>,
    // Compound: the components. Bound: source and hub. Projected and
    // derived: the base system
    components: Vec<Crs>,
    // Projected and derived: the conversion from the base system.
    // Bound: the transformation to the hub
    conversion: Option<String>,
}

impl Crs {
    fn build(name: &str, kind: CrsKind, axes: Vec<Axis>) -> Crs {
        Crs {
            name: name.to_string(),
            id: None,
            kind,
            axes,
            datum: None,
            area_of_use: None,
            components: Vec::new(),
            conversion: None,
        }
    }

    /// A geographic system with latitude, longitude axes in degrees
    #[must_use]
    pub fn geographic(name: &str, datum: Datum) -> Crs {
        let mut crs = Crs::build(
            name,
            CrsKind::Geographic,
            vec![Axis::latitude(), Axis::longitude()],
        );
        crs.datum = Some(datum);
        crs
    }

    /// A projected system with easting, northing axes in metres. The
    /// `conversion` is the operator definition taking coordinates of the
    /// base system (in radians, longitude first) to the projected
    pub fn projected(name: &str, base: Crs, conversion: &str) -> Result<Crs, Error> {
        if base.kind != CrsKind::Geographic {
            return Err(Error::Unsupported(format!(
                "projected system based on {:?} system",
                base.kind
            )));
        }
        let mut crs = Crs::build(
            name,
            CrsKind::Projected,
            vec![Axis::easting(), Axis::northing()],
        );
        crs.datum = base.datum.clone();
        crs.components = vec![base];
        crs.conversion = Some(conversion.to_string());
        Ok(crs)
    }

    #[must_use]
    pub fn geocentric(name: &str, datum: Datum) -> Crs {
        let mut crs = Crs::build(name, CrsKind::Geocentric, Axis::geocentric().to_vec());
        crs.datum = Some(datum);
        crs
    }

    #[must_use]
    pub fn vertical(name: &str) -> Crs {
        Crs::build(name, CrsKind::Vertical, vec![Axis::height()])
    }

    #[must_use]
    pub fn engineering(name: &str, axes: Vec<Axis>) -> Crs {
        Crs::build(name, CrsKind::Engineering, axes)
    }

    /// A system derived from `base` through `conversion`, with the given axes
    #[must_use]
    pub fn derived(name: &str, base: Crs, conversion: &str, axes: Vec<Axis>) -> Crs {
        let mut crs = Crs::build(name, CrsKind::Derived, axes);
        crs.datum = base.datum.clone();
        crs.components = vec![base];
        crs.conversion = Some(conversion.to_string());
        crs
    }

    /// A compound system, typically horizontal plus vertical
    pub fn compound(name: &str, components: Vec<Crs>) -> Result<Crs, Error> {
        if components.len() < 2 {
            return Err(Error::Unsupported(
                "compound system with fewer than two components".to_string(),
            ));
        }
        let axes = components.iter().flat_map(|c| c.axes.clone()).collect();
        let mut crs = Crs::build(name, CrsKind::Compound, axes);
        crs.components = components;
        Ok(crs)
    }

    /// `source`, bound to the `hub` system by `transformation`
    #[must_use]
    pub fn bound(source: Crs, hub: Crs, transformation: &str) -> Crs {
        let name = source.name.clone();
        let mut crs = Crs::build(&name, CrsKind::Bound, source.axes.clone());
        crs.datum = source.datum.clone();
        crs.area_of_use = source.area_of_use.clone();
        crs.components = vec![source, hub];
        crs.conversion = Some(transformation.to_string());
        crs
    }

    /// WGS 84, EPSG:4326
    #[must_use]
    pub fn wgs84() -> Crs {
        let datum = Datum {
            name: "World Geodetic System 1984".to_string(),
            ellipsoid_name: "WGS 84".to_string(),
            ellipsoid: Ellipsoid::new(6378137., 1. / 298.257223563),
            prime_meridian: 0.,
        };
        Crs::geographic("WGS 84", datum)
            .with_id("EPSG:4326")
            .with_area_of_use(AreaOfUse::world())
    }

    #[must_use]
    pub fn with_name(mut self, name: &str) -> Crs {
        self.name = name.to_string();
        self
    }

    /// Set the identifier, on the form `AUTHORITY:CODE`
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Crs {
        self.id = Some(id.to_string());
        self
    }

    #[must_use]
    pub fn with_area_of_use(mut self, area: AreaOfUse) -> Crs {
        self.area_of_use = Some(area);
        self
    }

    /// Replace the axes. Fails unless the count matches the original
    pub fn with_axes(mut self, axes: Vec<Axis>) -> Result<Crs, Error> {
        if axes.len() != self.axes.len() {
            return Err(Error::BadParam(
                "axes".to_string(),
                format!("expected {}, found {}", self.axes.len(), axes.len()),
            ));
        }
        self.axes = axes;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn kind(&self) -> CrsKind {
        self.kind
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn datum(&self) -> Option<&Datum> {
        self.datum.as_ref()
    }

    pub fn area_of_use(&self) -> Option<&AreaOfUse> {
        self.area_of_use.as_ref()
    }

    /// The operator definition of the conversion (projected, derived)
    /// or transformation (bound) defining the system
    pub fn conversion(&self) -> Option<&str> {
        self.conversion.as_deref()
    }

    /// The components of a compound system. Empty for other kinds
    pub fn sub_crs_list(&self) -> &[Crs] {
        if self.kind == CrsKind::Compound {
            return &self.components;
        }
        &[]
    }

    /// The base system of a projected or derived system, or the
    /// source of a bound system
    pub fn source_crs(&self) -> Option<&Crs> {
        match self.kind {
            CrsKind::Projected | CrsKind::Derived | CrsKind::Bound => self.components.first(),
            _ => None,
        }
    }

    /// The hub of a bound system
    pub fn target_crs(&self) -> Option<&Crs> {
        if self.kind == CrsKind::Bound {
            return self.components.get(1);
        }
        None
    }

    /// The horizontal component: for compound systems, the first
    /// component that is neither vertical nor temporal; for bound
    /// systems, that of the source. Otherwise the system itself
    pub fn horizontal_component(&self) -> &Crs {
        match self.kind {
            CrsKind::Compound => self
                .components
                .iter()
                .find(|c| c.kind != CrsKind::Vertical && !c.is_temporal())
                .map_or(self, Crs::horizontal_component),
            CrsKind::Bound => self.components.first().map_or(self, Crs::horizontal_component),
            _ => self,
        }
    }

    fn is_temporal(&self) -> bool {
        self.axes.len() == 1 && self.axes[0].direction == AxisDirection::Future
    }

    pub fn is_geographic(&self) -> bool {
        match self.kind {
            CrsKind::Geographic => true,
            CrsKind::Compound | CrsKind::Bound => {
                let horizontal = self.horizontal_component();
                !std::ptr::eq(horizontal, self) && horizontal.is_geographic()
            }
            _ => false,
        }
    }

    pub fn is_projected(&self) -> bool {
        self.horizontal_component().kind == CrsKind::Projected
    }

    /// True if the first axis points north or south
    pub fn is_north_first(&self) -> bool {
        self.horizontal_component()
            .axes
            .first()
            .map_or(false, |a| matches!(a.direction, AxisDirection::North | AxisDirection::South))
    }

    /// True if the horizontal axes are angular
    pub fn is_angular(&self) -> bool {
        self.horizontal_component()
            .axes
            .first()
            .map_or(false, Axis::is_angular)
    }

    /// A [`Geod`] on the ellipsoid of the datum, if any
    pub fn geod(&self) -> Option<Geod> {
        let ellps = &self.horizontal_component().datum.as_ref()?.ellipsoid;
        Some(Geod::new(ellps.semimajor_axis(), ellps.flattening()))
    }

    /// Compare with `other`. Systems differing only in names,
    /// identifiers and areas of use are equivalent
    pub fn equivalence(&self, other: &Crs) -> Equivalence {
        if self == other {
            return Equivalence::Identical;
        }
        if self.same_meaning(other) {
            return Equivalence::Equivalent;
        }
        Equivalence::Unrelated
    }

    fn same_meaning(&self, other: &Crs) -> bool {
        let datums = match (&self.datum, &other.datum) {
            (Some(a), Some(b)) => a.same_meaning(b),
            (None, None) => true,
            _ => false,
        };
        self.kind == other.kind
            && datums
            && self.conversion == other.conversion
            && self.axes.len() == other.axes.len()
            && self.axes.iter().zip(&other.axes).all(|(a, b)| a.same_meaning(b))
            && self.components.len() == other.components.len()
            && self
                .components
                .iter()
                .zip(&other.components)
                .all(|(a, b)| a.same_meaning(b))
    }

    /// A WKT2 style description, for diagnostics
    pub fn to_wkt(&self) -> String {
        let keyword = match self.kind {
            CrsKind::Geographic => "GEOGCRS",
            CrsKind::Projected => "PROJCRS",
            CrsKind::Geocentric => "GEODCRS",
            CrsKind::Vertical => "VERTCRS",
            CrsKind::Compound => "COMPOUNDCRS",
            CrsKind::Bound => "BOUNDCRS",
            CrsKind::Engineering => "ENGCRS",
            CrsKind::Derived => "DERIVEDCRS",
        };

        let mut elements = Vec::new();
        if self.kind != CrsKind::Bound {
            elements.push(format!("\"{}\"", self.name));
        }
        match self.kind {
            CrsKind::Compound => {
                elements.extend(self.components.iter().map(Crs::to_wkt));
            }
            CrsKind::Bound => {
                if let (Some(source), Some(hub)) = (self.components.first(), self.components.get(1)) {
                    elements.push(format!("SOURCECRS[{}]", source.to_wkt()));
                    elements.push(format!("TARGETCRS[{}]", hub.to_wkt()));
                }
                let transformation = self.conversion.as_deref().unwrap_or_default();
                elements.push(format!("ABRIDGEDTRANSFORMATION[\"{transformation}\"]"));
            }
            _ => {
                if let Some(base) = self.components.first() {
                    elements.push(format!("BASECRS[{}]", base.to_wkt()));
                    let conversion = self.conversion.as_deref().unwrap_or_default();
                    elements.push(format!("CONVERSION[\"{conversion}\"]"));
                } else if let Some(datum) = &self.datum {
                    elements.push(datum.to_wkt());
                }
                let cs = match self.kind {
                    CrsKind::Geographic => "ellipsoidal",
                    CrsKind::Geocentric | CrsKind::Projected => "Cartesian",
                    CrsKind::Vertical => "vertical",
                    _ => "unspecified",
                };
                elements.push(format!("CS[{cs},{}]", self.axes.len()));
                elements.extend(self.axes.iter().map(Axis::to_wkt));
            }
        }
        if let Some(area) = &self.area_of_use {
            elements.push(area.to_string());
        }
        if let Some((authority, code)) = self.id.as_deref().and_then(|id| id.split_once(':')) {
            elements.push(format!("ID[\"{authority}\",{code}]"));
        }
        format!("{keyword}[{}]", elements.join(","))
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn etrs89() -> Result<Crs, Error> {
        let datum = Datum::new("European Terrestrial Reference System 1989", "GRS80")?;
        Ok(Crs::geographic("ETRS89", datum).with_id("EPSG:4258"))
    }

    #[test]
    fn classification() -> Result<(), Error> {
        let wgs84 = Crs::wgs84();
        assert!(wgs84.is_geographic());
        assert!(wgs84.is_angular());
        assert_eq!(wgs84.kind(), CrsKind::Geographic);

        let utm32 = Crs::projected("ETRS89 / UTM zone 32N", etrs89()?, "utm zone=32")?;
        assert!(!utm32.is_geographic());
        assert!(utm32.is_projected());
        assert!(!utm32.is_north_first());
        assert_eq!(utm32.source_crs().map(Crs::name), Some("ETRS89"));
        assert!(Crs::projected("bad", utm32.clone(), "merc").is_err());

        let geocentric = Crs::geocentric("ETRS89 geocentric", etrs89()?.datum().cloned().ok_or(Error::Unknown)?);
        assert_eq!(geocentric.axes().len(), 3);
        assert!(!geocentric.is_north_first());
        Ok(())
    }

    #[test]
    fn components() -> Result<(), Error> {
        let height = Crs::vertical("DVR90 height");
        let compound = Crs::compound("ETRS89 + DVR90", vec![height.clone(), etrs89()?])?;
        assert_eq!(compound.sub_crs_list().len(), 2);
        assert_eq!(compound.axes().len(), 3);
        assert_eq!(compound.horizontal_component().name(), "ETRS89");
        assert!(compound.is_geographic());
        assert!(compound.is_north_first());
        assert!(Crs::compound("alone", vec![height.clone()]).is_err());

        let bound = Crs::bound(etrs89()?, Crs::wgs84(), "noop");
        assert_eq!(bound.kind(), CrsKind::Bound);
        assert_eq!(bound.target_crs().map(Crs::name), Some("WGS 84"));
        assert_eq!(bound.horizontal_component().kind(), CrsKind::Geographic);
        assert!(bound.is_geographic());

        // Nothing horizontal
        assert!(!height.is_geographic());
        assert!(!height.is_north_first());
        Ok(())
    }

    #[test]
    fn equivalence() -> Result<(), Error> {
        let wgs84 = Crs::wgs84();
        assert_eq!(wgs84.equivalence(&Crs::wgs84()), Equivalence::Identical);

        let renamed = Crs::wgs84().with_name("WGS84").with_id("OGC:CRS84");
        assert_eq!(wgs84.equivalence(&renamed), Equivalence::Equivalent);

        // Swapped axes make a different system
        let lonlat = Crs::wgs84().with_axes(vec![Axis::longitude(), Axis::latitude()])?;
        assert_eq!(wgs84.equivalence(&lonlat), Equivalence::Unrelated);
        assert!(!lonlat.is_north_first());

        // WGS84 and GRS80 ellipsoids differ
        assert_eq!(wgs84.equivalence(&etrs89()?), Equivalence::Unrelated);
        assert!(Crs::wgs84().with_axes(vec![Axis::latitude()]).is_err());
        Ok(())
    }

    #[test]
    fn wkt() -> Result<(), Error> {
        let wkt = Crs::wgs84().to_wkt();
        assert!(wkt.starts_with("GEOGCRS[\"WGS 84\",DATUM[\"World Geodetic System 1984\""));
        assert!(wkt.contains("CS[ellipsoidal,2]"));
        assert!(wkt.ends_with("BBOX[-90,-180,90,180],ID[\"EPSG\",4326]]"));

        let utm32 = Crs::projected("ETRS89 / UTM zone 32N", etrs89()?, "utm zone=32")?;
        let wkt = utm32.to_wkt();
        assert!(wkt.starts_with("PROJCRS[\"ETRS89 / UTM zone 32N\",BASECRS[GEOGCRS[\"ETRS89\""));
        assert!(wkt.contains("CONVERSION[\"utm zone=32\"]"));

        let bound = Crs::bound(etrs89()?, Crs::wgs84(), "noop");
        assert!(bound.to_wkt().starts_with("BOUNDCRS[SOURCECRS[GEOGCRS[\"ETRS89\""));
        Ok(())
    }

    #[test]
    fn geod() -> Result<(), Error> {
        let geod = Crs::wgs84().geod().ok_or(Error::Unknown)?;
        assert_eq!(geod.to_string(), "Geod(ellps='WGS84')");
        assert!(Crs::vertical("height").geod().is_none());
        Ok(())
    }
}
