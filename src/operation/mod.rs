//! Coordinate operation metadata, as delivered by an [`OperationCatalog`](crate::catalog::OperationCatalog).
use crate::crs::{AreaOfUse, Crs};
use crate::Error;

/// The kind of a coordinate operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Exact change of coordinates within a datum (e.g. a projection)
    Conversion,
    /// Change of datum, based on empirical parameters
    Transformation,
    /// A sequence of operations
    Concatenated,
    Other,
}

/// An external grid required by an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridInfo {
    pub short_name: String,
    pub full_name: String,
    pub package_name: String,
    pub url: String,
    pub direct_download: bool,
    pub open_license: bool,
    pub available: bool,
}

impl GridInfo {
    #[must_use]
    pub fn new(short_name: &str, available: bool) -> GridInfo {
        GridInfo {
            short_name: short_name.to_string(),
            full_name: String::new(),
            package_name: String::new(),
            url: String::new(),
            direct_download: false,
            open_license: false,
            available,
        }
    }

    /// Where the grid may be downloaded from
    #[must_use]
    pub fn with_url(mut self, url: &str, direct_download: bool, open_license: bool) -> GridInfo {
        self.url = url.to_string();
        self.direct_download = direct_download;
        self.open_license = open_license;
        self
    }
}

/// A coordinate operation between two reference systems.
///
/// The `definition` is the operator pipeline executing the operation,
/// taking coordinates in the axis order and units of the source system to
/// those of the target system.
///
/// ```
/// # use geotrans::prelude::*;
/// let op = CoordinateOperation::new("WGS 84 to Web Mercator", OperationKind::Conversion, "geo:in | webmerc")
///     .with_accuracy(0.);
/// let inverse = op.reversed();
/// assert_eq!(inverse.definition(), "webmerc inv | geo:in inv");
/// assert_eq!(inverse.name(), "Inverse of WGS 84 to Web Mercator");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateOperation {
    name: String,
    id: Option<String>,
    kind: OperationKind,
    definition: String,
    steps: Vec<CoordinateOperation>,
    source_crs: Option<Crs>,
    target_crs: Option<Crs>,
    area_of_use: Option<AreaOfUse>,
    accuracy: Option<f64>,
    grids: Vec<GridInfo>,
    ballpark: bool,
    superseded: bool,
    has_inverse: bool,
    complete: bool,
    remarks: String,
    scope: String,
}

impl CoordinateOperation {
    #[must_use]
    pub fn new(name: &str, kind: OperationKind, definition: &str) -> CoordinateOperation {
        CoordinateOperation {
            name: name.to_string(),
            id: None,
            kind,
            definition: definition.to_string(),
            steps: Vec::new(),
            source_crs: None,
            target_crs: None,
            area_of_use: None,
            accuracy: None,
            grids: Vec::new(),
            ballpark: false,
            superseded: false,
            has_inverse: true,
            complete: true,
            remarks: String::new(),
            scope: String::new(),
        }
    }

    /// The concatenation of `steps`, in order. The accuracy is the sum of
    /// the step accuracies (unknown if any is), the area of use the
    /// intersection of the step areas, and the grids those of all steps
    pub fn concatenated(name: &str, steps: Vec<CoordinateOperation>) -> Result<CoordinateOperation, Error> {
        if steps.is_empty() {
            return Err(Error::General("Concatenated operation without steps"));
        }
        let definition = steps
            .iter()
            .map(|s| s.definition.as_str())
            .collect::<Vec<_>>()
            .join(" | ");
        let mut op = CoordinateOperation::new(name, OperationKind::Concatenated, &definition);
        op.accuracy = steps.iter().map(|s| s.accuracy).sum();
        op.grids = steps.iter().flat_map(|s| s.grids.clone()).collect();
        op.ballpark = steps.iter().any(|s| s.ballpark);
        op.has_inverse = steps.iter().all(|s| s.has_inverse);
        op.complete = steps.iter().all(|s| s.complete);
        op.area_of_use = steps
            .iter()
            .filter_map(|s| s.area_of_use.clone())
            .reduce(|a, b| intersection(&a, &b));
        op.source_crs = steps.first().and_then(|s| s.source_crs.clone());
        op.target_crs = steps.last().and_then(|s| s.target_crs.clone());
        op.steps = steps;
        Ok(op)
    }

    /// The null operation between two equivalent systems
    #[must_use]
    pub fn null(source: &Crs, target: &Crs) -> CoordinateOperation {
        let name = format!("Null operation from {} to {}", source.name(), target.name());
        CoordinateOperation::new(&name, OperationKind::Conversion, "noop")
            .with_accuracy(0.)
            .between(source, target)
    }

    /// Set the source and target systems
    #[must_use]
    pub fn between(mut self, source: &Crs, target: &Crs) -> CoordinateOperation {
        self.source_crs = Some(source.clone());
        self.target_crs = Some(target.clone());
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: &str) -> CoordinateOperation {
        self.id = Some(id.to_string());
        self
    }

    #[must_use]
    pub fn with_area_of_use(mut self, area: AreaOfUse) -> CoordinateOperation {
        self.area_of_use = Some(area);
        self
    }

    /// Declared accuracy, in metres
    #[must_use]
    pub fn with_accuracy(mut self, accuracy: f64) -> CoordinateOperation {
        self.accuracy = Some(accuracy);
        self
    }

    #[must_use]
    pub fn with_grid(mut self, grid: GridInfo) -> CoordinateOperation {
        self.grids.push(grid);
        self
    }

    #[must_use]
    pub fn with_ballpark(mut self, ballpark: bool) -> CoordinateOperation {
        self.ballpark = ballpark;
        self
    }

    #[must_use]
    pub fn with_superseded(mut self, superseded: bool) -> CoordinateOperation {
        self.superseded = superseded;
        self
    }

    #[must_use]
    pub fn with_inverse(mut self, has_inverse: bool) -> CoordinateOperation {
        self.has_inverse = has_inverse;
        self
    }

    /// Mark whether the catalog holds everything needed to instantiate
    /// the operation, grids aside
    #[must_use]
    pub fn with_complete(mut self, complete: bool) -> CoordinateOperation {
        self.complete = complete;
        self
    }

    #[must_use]
    pub fn with_remarks(mut self, remarks: &str, scope: &str) -> CoordinateOperation {
        self.remarks = remarks.to_string();
        self.scope = scope.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The authority part of the identifier
    pub fn authority(&self) -> Option<&str> {
        self.id.as_deref().and_then(|id| id.split_once(':')).map(|(auth, _)| auth)
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn steps(&self) -> &[CoordinateOperation] {
        &self.steps
    }

    pub fn source_crs(&self) -> Option<&Crs> {
        self.source_crs.as_ref()
    }

    pub fn target_crs(&self) -> Option<&Crs> {
        self.target_crs.as_ref()
    }

    pub fn area_of_use(&self) -> Option<&AreaOfUse> {
        self.area_of_use.as_ref()
    }

    /// Declared accuracy, in metres. `None` if unknown
    pub fn accuracy(&self) -> Option<f64> {
        self.accuracy
    }

    pub fn grids(&self) -> &[GridInfo] {
        &self.grids
    }

    pub fn is_ballpark(&self) -> bool {
        self.ballpark
    }

    pub fn is_superseded(&self) -> bool {
        self.superseded
    }

    pub fn has_inverse(&self) -> bool {
        self.has_inverse
    }

    pub fn remarks(&self) -> &str {
        &self.remarks
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// The grids required, but not available
    pub fn missing_grids(&self) -> impl Iterator<Item = &GridInfo> {
        self.grids.iter().filter(|g| !g.available)
    }

    /// Whether the operation can be bound into a transformer: the
    /// catalog entry is complete, and all required grids are available
    pub fn is_instantiable(&self) -> bool {
        self.complete && self.missing_grids().next().is_none()
    }

    /// The inverse operation: source and target swapped, the steps of
    /// the definition reversed and inverted
    #[must_use]
    pub fn reversed(&self) -> CoordinateOperation {
        let mut op = self.clone();
        op.name = match self.name.strip_prefix("Inverse of ") {
            Some(name) => name.to_string(),
            None => format!("Inverse of {}", self.name),
        };
        op.definition = crate::token::invert_definition(&self.definition);
        op.steps = self.steps.iter().rev().map(CoordinateOperation::reversed).collect();
        std::mem::swap(&mut op.source_crs, &mut op.target_crs);
        op
    }
}

fn intersection(a: &AreaOfUse, b: &AreaOfUse) -> AreaOfUse {
    if a.crosses_antimeridian() || b.crosses_antimeridian() {
        // Approximate by the smaller of the two
        return if a.extent() <= b.extent() { a.clone() } else { b.clone() };
    }
    AreaOfUse::new(
        a.west.max(b.west),
        a.south.max(b.south),
        a.east.min(b.east),
        a.north.min(b.north),
        None,
    )
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instantiability() {
        let op = CoordinateOperation::new("ED50 to WGS 84", OperationKind::Transformation, "noop");
        assert!(op.is_instantiable());
        assert_eq!(op.accuracy(), None);

        let op = op.with_grid(GridInfo::new("dk_sdfe_ed50.tif", false));
        assert!(!op.is_instantiable());
        assert_eq!(op.missing_grids().count(), 1);

        let op = CoordinateOperation::new("x", OperationKind::Other, "noop").with_complete(false);
        assert!(!op.is_instantiable());
    }

    #[test]
    fn reversal() {
        let wgs84 = Crs::wgs84();
        let other = Crs::wgs84().with_name("other");
        let op = CoordinateOperation::new("A", OperationKind::Transformation, "geo:in | cart | helmert x=1 | cart inv | geo:out")
            .between(&wgs84, &other)
            .with_id("TEST:1");
        let inv = op.reversed();
        assert_eq!(inv.name(), "Inverse of A");
        assert_eq!(inv.source_crs().map(Crs::name), Some("other"));
        assert_eq!(inv.definition(), "geo:out inv | cart | helmert x=1 inv | cart inv | geo:in inv");
        assert_eq!(inv.reversed().name(), "A");
        assert_eq!(op.authority(), Some("TEST"));
    }

    #[test]
    fn concatenation() -> Result<(), Error> {
        let a = CoordinateOperation::new("a", OperationKind::Transformation, "addone")
            .with_accuracy(1.)
            .with_area_of_use(AreaOfUse::new(0., 0., 10., 10., None));
        let b = CoordinateOperation::new("b", OperationKind::Conversion, "addone inv")
            .with_accuracy(0.5)
            .with_area_of_use(AreaOfUse::new(5., 5., 20., 20., None));
        let ab = CoordinateOperation::concatenated("a+b", vec![a.clone(), b.clone()])?;
        assert_eq!(ab.kind(), OperationKind::Concatenated);
        assert_eq!(ab.definition(), "addone | addone inv");
        assert_eq!(ab.accuracy(), Some(1.5));
        let area = ab.area_of_use().ok_or(Error::Unknown)?;
        assert_eq!((area.west, area.south, area.east, area.north), (5., 5., 10., 10.));
        assert_eq!(ab.steps().len(), 2);

        // Unknown accuracy propagates
        let c = CoordinateOperation::new("c", OperationKind::Other, "noop");
        assert_eq!(CoordinateOperation::concatenated("a+c", vec![a, c])?.accuracy(), None);
        assert!(CoordinateOperation::concatenated("none", vec![]).is_err());
        Ok(())
    }
}
