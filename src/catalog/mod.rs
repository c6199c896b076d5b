//! Discovery of candidate operations between reference systems, and the
//! filtering and ranking policy applied to them.
//!
//! An [`OperationCatalog`] delivers the raw candidates. [`resolve`]
//! filters them according to a [`CatalogQuery`], and ranks them by
//! relevance to the area of interest and by accuracy.
use crate::crs::{AreaOfInterest, AreaOfUse, Crs, Equivalence};
use crate::operation::CoordinateOperation;
use crate::Error;
use log::{debug, trace};
use std::cmp::Ordering;

mod memory;

pub use memory::MemoryCatalog;

/// Filters for operation discovery
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogQuery {
    /// Rank by relevance to this area, rather than to the union of the
    /// areas of use of the two systems
    pub area_of_interest: Option<AreaOfInterest>,
    /// Only operations identified by this authority. `"any"` disables the filter
    pub authority: Option<String>,
    /// Only operations with a known accuracy no worse than this, in metres
    pub accuracy: Option<f64>,
    pub allow_ballpark: bool,
    pub allow_superseded: bool,
}

impl Default for CatalogQuery {
    fn default() -> CatalogQuery {
        CatalogQuery {
            area_of_interest: None,
            authority: None,
            accuracy: None,
            allow_ballpark: true,
            allow_superseded: false,
        }
    }
}

impl CatalogQuery {
    /// Whether `op` passes the filters
    pub fn admits(&self, op: &CoordinateOperation) -> bool {
        if op.is_ballpark() && !self.allow_ballpark {
            return false;
        }
        if op.is_superseded() && !self.allow_superseded {
            return false;
        }
        if let Some(ceiling) = self.accuracy {
            match op.accuracy() {
                Some(accuracy) if accuracy <= ceiling => (),
                _ => return false,
            }
        }
        match self.authority.as_deref() {
            None | Some("any") => true,
            Some(authority) => op.authority() == Some(authority),
        }
    }
}

/// The source of candidate operations, typically backed by an
/// authority database. The candidates are delivered unranked.
#[cfg_attr(test, mockall::automock)]
pub trait OperationCatalog {
    /// All operations known to convert coordinates from `source` to `target`
    fn operations(&self, source: &Crs, target: &Crs) -> Result<Vec<CoordinateOperation>, Error>;
}

/// The candidate operations from `source` to `target`, filtered by
/// `query`, and ranked best first.
///
/// Compound and bound systems are resolved through their horizontal
/// components. When no candidate survives, and the two systems are
/// identical or equivalent, a null operation is synthesized.
pub fn resolve(
    catalog: &dyn OperationCatalog,
    source: &Crs,
    target: &Crs,
    query: &CatalogQuery,
) -> Result<Vec<CoordinateOperation>, Error> {
    let horizontal_source = source.horizontal_component();
    let horizontal_target = target.horizontal_component();

    let raw = catalog.operations(horizontal_source, horizontal_target)?;
    let found = raw.len();
    let mut candidates: Vec<CoordinateOperation> =
        raw.into_iter().filter(|op| query.admits(op)).collect();
    debug!(
        "{} -> {}: {found} candidates, {} after filtering",
        source.name(),
        target.name(),
        candidates.len()
    );

    if candidates.is_empty() && horizontal_source.equivalence(horizontal_target) != Equivalence::Unrelated {
        trace!("Synthesizing null operation");
        candidates.push(CoordinateOperation::null(source, target));
    }

    let area = reference_area(source, target, query);
    rank(&mut candidates, area.as_ref());
    Ok(candidates)
}

// The area the candidates are ranked against
fn reference_area(source: &Crs, target: &Crs, query: &CatalogQuery) -> Option<AreaOfUse> {
    if let Some(aoi) = query.area_of_interest {
        return Some(aoi.into());
    }
    match (source.area_of_use(), target.area_of_use()) {
        (Some(a), Some(b)) => Some(a.union(b)),
        (Some(a), None) | (None, Some(a)) => Some(a.clone()),
        (None, None) => None,
    }
}

// Relevance classes: known, relevant area first, then unrestricted,
// then known but irrelevant
fn relevance(op: &CoordinateOperation, area: Option<&AreaOfUse>) -> (u8, f64) {
    let Some(area) = area else {
        return (0, 0.);
    };
    match op.area_of_use() {
        Some(own) => {
            let overlap = own.intersection_extent(area);
            if overlap > 0. {
                (0, overlap)
            } else {
                (2, 0.)
            }
        }
        None => (1, 0.),
    }
}

/// Sort `candidates` best first: Operations of unknown accuracy last.
/// Otherwise by descending relevance to `area`, then by ascending
/// accuracy. The sort is stable, so ties keep the catalog order
pub fn rank(candidates: &mut [CoordinateOperation], area: Option<&AreaOfUse>) {
    candidates.sort_by(|a, b| {
        let (class_a, overlap_a) = relevance(a, area);
        let (class_b, overlap_b) = relevance(b, area);
        a.accuracy()
            .is_none()
            .cmp(&b.accuracy().is_none())
            .then(class_a.cmp(&class_b))
            .then(overlap_b.total_cmp(&overlap_a))
            .then_with(|| match (a.accuracy(), b.accuracy()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => Ordering::Equal,
            })
    });
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{GridInfo, OperationKind};
    use mockall::predicate::always;

    fn op(name: &str, accuracy: Option<f64>, area: Option<(f64, f64, f64, f64)>) -> CoordinateOperation {
        let mut op = CoordinateOperation::new(name, OperationKind::Transformation, "noop")
            .with_id(&format!("TEST:{name}"));
        if let Some(accuracy) = accuracy {
            op = op.with_accuracy(accuracy);
        }
        if let Some((w, s, e, n)) = area {
            op = op.with_area_of_use(AreaOfUse::new(w, s, e, n, None));
        }
        op
    }

    fn names(ops: &[CoordinateOperation]) -> Vec<&str> {
        ops.iter().map(CoordinateOperation::name).collect()
    }

    #[test]
    fn ranking() {
        let denmark = AreaOfUse::new(8., 54., 16., 58., None);
        let mut ops = vec![
            op("unknown", None, Some((8., 54., 16., 58.))),
            op("global", Some(2.), None),
            op("elsewhere", Some(0.1), Some((100., 0., 110., 10.))),
            op("coarse", Some(1.), Some((0., 50., 20., 60.))),
            op("fine", Some(0.01), Some((0., 50., 20., 60.))),
            op("partial", Some(0.01), Some((15., 50., 20., 60.))),
        ];
        rank(&mut ops, Some(&denmark));
        assert_eq!(
            names(&ops),
            ["fine", "coarse", "partial", "global", "elsewhere", "unknown"]
        );

        // Without an area, accuracy decides
        rank(&mut ops, None);
        assert_eq!(
            names(&ops),
            ["fine", "partial", "elsewhere", "coarse", "global", "unknown"]
        );
    }

    #[test]
    fn filtering() {
        let query = CatalogQuery::default();
        assert!(query.admits(&op("a", None, None)));
        assert!(query.admits(&op("a", None, None).with_ballpark(true)));
        assert!(!query.admits(&op("a", None, None).with_superseded(true)));

        let query = CatalogQuery {
            allow_ballpark: false,
            accuracy: Some(1.),
            ..Default::default()
        };
        assert!(!query.admits(&op("a", Some(0.5), None).with_ballpark(true)));
        assert!(query.admits(&op("a", Some(0.5), None)));
        assert!(!query.admits(&op("a", Some(1.5), None)));
        assert!(!query.admits(&op("a", None, None)));

        let query = CatalogQuery {
            authority: Some("EPSG".into()),
            ..Default::default()
        };
        assert!(!query.admits(&op("a", None, None)));
        assert!(query.admits(&op("a", None, None).with_id("EPSG:1612")));
        let query = CatalogQuery {
            authority: Some("any".into()),
            ..Default::default()
        };
        assert!(query.admits(&op("a", None, None)));
    }

    #[test]
    fn resolution() -> Result<(), Error> {
        let mut catalog = MockOperationCatalog::new();
        catalog.expect_operations().with(always(), always()).times(1).returning(|_, _| {
            Ok(vec![
                op("superseded", Some(0.), None).with_superseded(true),
                op("b", Some(5.), None),
                op("a", Some(1.), None).with_grid(GridInfo::new("missing.tif", false)),
            ])
        });
        let source = Crs::wgs84();
        let target = Crs::wgs84().with_name("target");
        let ops = resolve(&catalog, &source, &target, &CatalogQuery::default())?;
        // Unavailable operations are ranked, not discarded
        assert_eq!(names(&ops), ["a", "b"]);
        Ok(())
    }

    #[test]
    fn null_operation() -> Result<(), Error> {
        let mut catalog = MockOperationCatalog::new();
        catalog.expect_operations().returning(|_, _| Ok(Vec::new()));

        let source = Crs::wgs84();
        let ops = resolve(&catalog, &source, &Crs::wgs84().with_id("OGC:X"), &CatalogQuery::default())?;
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].definition(), "noop");
        assert_eq!(ops[0].accuracy(), Some(0.));

        let geocentric = Crs::geocentric("geocentric", source.datum().cloned().ok_or(Error::Unknown)?);
        let ops = resolve(&catalog, &source, &geocentric, &CatalogQuery::default())?;
        assert!(ops.is_empty());
        Ok(())
    }

    #[test]
    fn horizontal_components() -> Result<(), Error> {
        let mut catalog = MockOperationCatalog::new();
        catalog
            .expect_operations()
            .withf(|source, target| source.name() == "WGS 84" && target.name() == "WGS 84")
            .times(1)
            .returning(|_, _| Ok(vec![op("h", Some(1.), None)]));

        let compound = Crs::compound("WGS 84 + height", vec![Crs::wgs84(), Crs::vertical("height")])?;
        let ops = resolve(&catalog, &compound, &Crs::wgs84(), &CatalogQuery::default())?;
        assert_eq!(names(&ops), ["h"]);
        Ok(())
    }
}
