use float_eq::assert_float_eq;
use geotrans::authoring::*;
use std::cell::Cell;
use std::rc::Rc;

// ----- U S E R   P R O V I D E D   C O N T E X T ----------------------------------

/// A context delegating everything to `Minimal`, while counting the
/// number of times operators are applied.
///
/// Integration tests are built as independent crates, so this also shows
/// that contexts may be provided from outside the library.
#[derive(Debug, Default)]
pub struct Counting {
    inner: Minimal,
    applied: Rc<Cell<usize>>,
}

impl Counting {
    fn with_counter(applied: Rc<Cell<usize>>) -> Counting {
        Counting {
            inner: Minimal::new(),
            applied,
        }
    }
}

impl Context for Counting {
    fn new() -> Counting {
        Counting::with_counter(Rc::default())
    }

    fn op(&mut self, definition: &str) -> Result<OpHandle, Error> {
        self.inner.op(definition)
    }

    fn apply(
        &self,
        op: OpHandle,
        direction: Direction,
        operands: &mut dyn CoordinateSet,
    ) -> Result<usize, Error> {
        self.applied.set(self.applied.get() + 1);
        self.inner.apply(op, direction, operands)
    }

    fn release(&mut self, op: OpHandle) -> bool {
        self.inner.release(op)
    }

    fn descriptor(&self, op: OpHandle) -> Result<&OpDescriptor, Error> {
        self.inner.descriptor(op)
    }

    fn params(&self, op: OpHandle, index: usize) -> Result<&ParsedParameters, Error> {
        self.inner.params(op, index)
    }

    fn globals(&self) -> BTreeMap<String, String> {
        self.inner.globals()
    }

    fn register_op(&mut self, name: &str, constructor: OpConstructor) {
        self.inner.register_op(name, constructor)
    }

    fn register_resource(&mut self, name: &str, definition: &str) {
        self.inner.register_resource(name, definition)
    }

    fn get_op(&self, name: &str) -> Result<OpConstructor, Error> {
        self.inner.get_op(name)
    }

    fn get_resource(&self, name: &str) -> Result<String, Error> {
        self.inner.get_resource(name)
    }

    fn config(&self) -> &ContextConfig {
        self.inner.config()
    }

    fn configure(&mut self, config: ContextConfig) -> Result<(), Error> {
        self.inner.configure(config)
    }
}

// ----- T E S T S ------------------------------------------------------------------

fn counting_context() -> (ContextHandle, Rc<Cell<usize>>) {
    let applied = Rc::new(Cell::new(0));
    let ctx = ContextHandle::new(Counting::with_counter(applied.clone()));
    (ctx, applied)
}

fn mercator() -> Result<Crs, Error> {
    Ok(Crs::projected("WGS 84 / Pseudo-Mercator", Crs::wgs84(), "webmerc")?.with_id("EPSG:3857"))
}

fn catalog() -> Result<MemoryCatalog, Error> {
    let mut catalog = MemoryCatalog::new();
    let op = CoordinateOperation::new("Popular Visualisation Pseudo-Mercator", OperationKind::Conversion, "geo:in | webmerc")
        .with_id("EPSG:3856")
        .with_accuracy(0.);
    catalog.register(op.between(&Crs::wgs84(), &mercator()?))?;
    Ok(catalog)
}

#[test]
fn round_trip() -> Result<(), Error> {
    let (ctx, applied) = counting_context();
    let catalog = catalog()?;
    let options = TransformerOptions::default();
    let fwd = Transformer::from_crs(&ctx, &catalog, &Crs::wgs84(), &mercator()?, &options)?;
    let inv = Transformer::from_crs(&ctx, &catalog, &mercator()?, &Crs::wgs84(), &options)?;
    assert_eq!(fwd.accuracy(), 0.);
    assert_eq!(inv.description(), "Inverse of Popular Visualisation Pseudo-Mercator");

    let opts = TransformOptions::default();
    let mut lat = [55., 59., -33.9];
    let mut lon = [12., 18., 18.4];
    let mut h = [0., 100., 1000.];
    assert_eq!(fwd.transform_buffer(&mut lat, &mut lon, Some(&mut h), None, &opts)?, 3);
    assert_float_eq!(lat[0], 1335833.8895192828, abs <= 1e-6);
    assert_float_eq!(lon[0], 7361866.113051185, abs <= 1e-6);
    assert_eq!(h, [0., 100., 1000.]);

    inv.transform_buffer(&mut lat, &mut lon, Some(&mut h), None, &opts)?;
    assert_float_eq!(lat[1], 59., abs <= 1e-10);
    assert_float_eq!(lon[1], 18., abs <= 1e-10);
    assert_float_eq!(lat[2], -33.9, abs <= 1e-10);
    assert_float_eq!(lon[2], 18.4, abs <= 1e-10);

    // The inverse direction of the forward transformer does the same
    let (x, y, ..) = fwd.transform_point(55., 12., None, None, &opts)?;
    let (lat, lon, ..) = fwd.transform_point(x, y, None, None, &TransformOptions::inverse())?;
    assert_float_eq!(lat, 55., abs <= 1e-10);
    assert_float_eq!(lon, 12., abs <= 1e-10);
    assert_eq!(applied.get(), 4);
    Ok(())
}

#[test]
fn interleaved() -> Result<(), Error> {
    let (ctx, _) = counting_context();
    let catalog = catalog()?;
    let options = TransformerOptions {
        always_xy: true,
        ..Default::default()
    };
    let transformer = Transformer::from_crs(&ctx, &catalog, &Crs::wgs84(), &mercator()?, &options)?;

    // Longitude first, height, time
    let mut data = [12., 55., 10., 2020., 18., 59., 20., 2021.];
    let opts = TransformOptions::default();
    assert_eq!(transformer.transform_interleaved(&mut data, 4, false, false, &opts)?, 2);
    assert_float_eq!(data[0], 1335833.8895192828, abs <= 1e-6);
    assert_float_eq!(data[1], 7361866.113051185, abs <= 1e-6);
    assert_eq!((data[2], data[3], data[6], data[7]), (10., 2020., 20., 2021.));

    // Switched order in storage cancels the axis normalization
    let mut data = [55., 12., 2020.];
    transformer.transform_interleaved(&mut data, 3, true, true, &opts)?;
    assert_float_eq!(data[1], 1335833.8895192828, abs <= 1e-6);
    assert_float_eq!(data[0], 7361866.113051185, abs <= 1e-6);
    assert_eq!(data[2], 2020.);

    let mut ragged = [1., 2., 3.];
    assert!(matches!(
        transformer.transform_interleaved(&mut ragged, 2, false, false, &opts),
        Err(Error::BufferLengthMismatch { .. })
    ));
    Ok(())
}

#[test]
fn mismatched_buffers_never_reach_the_operator() -> Result<(), Error> {
    let (ctx, applied) = counting_context();
    let catalog = catalog()?;
    let transformer = Transformer::from_crs(&ctx, &catalog, &Crs::wgs84(), &mercator()?, &TransformerOptions::default())?;

    let mut x = [55., 56., 57., 58., 59.];
    let mut y = [12., 13., 14.];
    let result = transformer.transform_buffer(&mut x, &mut y, None, None, &TransformOptions::default());
    assert!(matches!(
        result,
        Err(Error::BufferLengthMismatch {
            expected: 5,
            found: 3
        })
    ));
    assert_eq!(x, [55., 56., 57., 58., 59.]);
    assert_eq!(applied.get(), 0);
    Ok(())
}

#[test]
fn identity_is_bit_exact() -> Result<(), Error> {
    let (ctx, applied) = counting_context();
    let catalog = MemoryCatalog::new();
    let wgs84 = Crs::wgs84();
    let transformer = Transformer::from_crs(&ctx, &catalog, &wgs84, &wgs84, &TransformerOptions::default())?;
    assert!(transformer.is_exact_same());
    assert_eq!(transformer.name(), "noop");

    let mut x = [0.1 + 0.2, f64::MIN_POSITIVE, -0.];
    let mut y = [1. / 3., f64::MAX, f64::NAN];
    let before = (x.map(f64::to_bits), y.map(f64::to_bits));
    transformer.transform_buffer(&mut x, &mut y, None, None, &TransformOptions::default())?;
    assert_eq!((x.map(f64::to_bits), y.map(f64::to_bits)), before);
    assert_eq!(applied.get(), 0);

    // Equivalent systems are transformed, unless asked to skip
    let alias = Crs::wgs84().with_name("WGS84 alias");
    let transformer = Transformer::from_crs(&ctx, &catalog, &wgs84, &alias, &TransformerOptions::default())?;
    assert!(transformer.is_equivalent() && !transformer.is_exact_same());
    transformer.transform_point(1., 2., None, None, &TransformOptions::default())?;
    assert_eq!(applied.get(), 1);

    let options = TransformerOptions {
        skip_equivalent: true,
        ..Default::default()
    };
    let transformer = Transformer::from_crs(&ctx, &catalog, &wgs84, &alias, &options)?;
    transformer.transform_point(1., 2., None, None, &TransformOptions::default())?;
    assert_eq!(applied.get(), 1);
    Ok(())
}

#[test]
fn not_found() -> Result<(), Error> {
    let (ctx, _) = counting_context();
    let catalog = catalog()?;
    let wgs84 = Crs::wgs84();
    let geocentric = Crs::geocentric("WGS 84 geocentric", wgs84.datum().cloned().ok_or(Error::Unknown)?);
    let result = Transformer::from_crs(&ctx, &catalog, &wgs84, &geocentric, &TransformerOptions::default());
    assert!(matches!(result, Err(Error::OperationNotFound(_, _))));

    // Filtered away
    let options = TransformerOptions {
        authority: Some("ESRI".to_string()),
        ..Default::default()
    };
    let result = Transformer::from_crs(&ctx, &catalog, &wgs84, &mercator()?, &options);
    assert!(matches!(result, Err(Error::OperationNotFound(_, _))));
    Ok(())
}

#[test]
fn area_of_interest() -> Result<(), Error> {
    let (ctx, _) = counting_context();
    let wgs84 = Crs::wgs84();
    let local = Crs::wgs84().with_name("local").with_id("TEST:1");

    let mut catalog = MemoryCatalog::new();
    let regional = |name: &str, area: AreaOfUse| {
        CoordinateOperation::new(name, OperationKind::Transformation, "helmert x=1")
            .with_accuracy(1.)
            .with_area_of_use(area)
            .between(&wgs84, &local)
    };
    catalog.register(regional("denmark", AreaOfUse::new(8., 54.5, 15.5, 58., Some("Denmark"))))?;
    catalog.register(regional("sweden", AreaOfUse::new(10.5, 55., 24.2, 69.1, Some("Sweden"))))?;

    let pick = |aoi: AreaOfInterest| -> Result<String, Error> {
        let options = TransformerOptions {
            area_of_interest: Some(aoi),
            ..Default::default()
        };
        let transformer = Transformer::from_crs(&ctx, &catalog, &wgs84, &local, &options)?;
        Ok(transformer.description().to_string())
    };
    assert_eq!(pick(AreaOfInterest::new(9., 55., 11., 57.))?, "denmark");
    assert_eq!(pick(AreaOfInterest::new(15., 60., 20., 65.))?, "sweden");

    // Without an area of interest, the largest overlap with the systems wins
    let options = TransformerOptions::default();
    let transformer = Transformer::from_crs(&ctx, &catalog, &wgs84, &local, &options)?;
    assert_eq!(transformer.area_of_use().and_then(|a| a.name.as_deref()), Some("Sweden"));
    Ok(())
}

#[test]
fn group() -> Result<(), Error> {
    let (ctx, _) = counting_context();
    let wgs84 = Crs::wgs84();
    let local = Crs::wgs84().with_name("local").with_id("TEST:1");
    let op = |name: &str, accuracy: f64| {
        CoordinateOperation::new(name, OperationKind::Transformation, "helmert x=1")
            .with_id(&format!("TEST:{name}"))
            .with_accuracy(accuracy)
            .between(&wgs84, &local)
    };

    let mut catalog = MemoryCatalog::new();
    catalog.register(op("b", 2.))?;
    catalog.register(op("a", 1.).with_grid(GridInfo::new("dk_grid.tif", false)))?;
    catalog.register(op("c", 2.))?;
    catalog.register(op("d", 0.5).with_inverse(false))?;

    let names = |group: &TransformerGroup| -> Vec<String> {
        group
            .transformers()
            .iter()
            .map(|t| t.description().to_string())
            .collect()
    };

    let options = TransformerOptions::default();
    let group = TransformerGroup::new(&ctx, &catalog, &wgs84, &local, &options)?;
    assert_eq!(names(&group), ["d", "b", "c"]);
    assert!(group.best_available());
    assert_eq!(group.unavailable_operations().len(), 1);
    assert_eq!(group.missing_grids().count(), 0);

    // Deterministic
    let again = TransformerGroup::new(&ctx, &catalog, &wgs84, &local, &options)?;
    assert_eq!(names(&again), names(&group));

    // In the reverse direction, the one way operation is out of the
    // picture, and the gridded one is the best
    let group = TransformerGroup::new(&ctx, &catalog, &local, &wgs84, &options)?;
    assert_eq!(names(&group), ["Inverse of b", "Inverse of c"]);
    assert!(!group.best_available());
    let missing: Vec<&str> = group.missing_grids().map(|g| g.short_name.as_str()).collect();
    assert_eq!(missing, ["dk_grid.tif"]);

    let (x, ..) = group.transformers()[0].transform_point(11., 56., None, None, &TransformOptions::default())?;
    assert_float_eq!(x, 10., abs <= 1e-12);

    // A single transformer between the equivalent systems runs the same way
    let back = Transformer::from_crs(&ctx, &catalog, &local, &wgs84, &options)?;
    assert_eq!(back.description(), "Inverse of b");
    let (x, ..) = back.transform_point(11., 56., None, None, &TransformOptions::default())?;
    assert_float_eq!(x, 10., abs <= 1e-12);
    Ok(())
}

#[test]
fn errcheck() -> Result<(), Error> {
    let (ctx, _) = counting_context();
    let transformer = Transformer::from_pipeline(&ctx, "geo:in | merc")?;
    let strict = TransformOptions {
        errcheck: true,
        ..Default::default()
    };

    // Pipelines are run as is: geo:in takes degrees, latitude first
    let (x, y, ..) = transformer.transform_point(0., 10., None, None, &TransformOptions::default())?;
    assert_float_eq!(x, 1113194.9079327357, abs <= 1e-6);
    assert_eq!(y, 0.);

    let (x, y, ..) = transformer.transform_point(95., 0., None, None, &TransformOptions::default())?;
    assert_eq!((x, y), (1e30, 1e30));
    assert!(matches!(
        transformer.transform_point(95., 0., None, None, &strict),
        Err(Error::UndefinedTransform(_))
    ));
    Ok(())
}
