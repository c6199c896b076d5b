//! Execution of coordinate operations between reference systems.
//!
//! A [`Transformer`] binds one [`CoordinateOperation`] to an execution
//! context, and runs it over single points, caller owned buffers, or any
//! [`CoordinateSet`]. A [`TransformerGroup`] binds all usable candidate
//! operations between two systems.
use crate::authoring::*;
use crate::catalog::resolve;
use crate::crs::Equivalence;
use once_cell::unsync::OnceCell;

mod group;
mod options;

pub use group::TransformerGroup;
pub use options::{TransformDirection, TransformOptions, TransformerOptions};

/// Substituted for the coordinates of points failing to transform, and
/// for infinite results, unless error checking is requested
pub const HUGE: f64 = 1e30;

const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.;
const RAD_TO_DEG: f64 = 180. / std::f64::consts::PI;

/// A coordinate operation, instantiated and ready to run.
///
/// ```
/// # use geotrans::prelude::*;
/// # fn main() -> anyhow::Result<()> {
/// let ctx = ContextHandle::new(Minimal::new());
/// let wgs84 = Crs::wgs84();
/// let mercator = Crs::projected("WGS 84 / Pseudo-Mercator", Crs::wgs84(), "webmerc")?;
///
/// let mut catalog = MemoryCatalog::new();
/// let op = CoordinateOperation::new("Pseudo-Mercator", OperationKind::Conversion, "geo:in | webmerc");
/// catalog.register(op.with_accuracy(0.).between(&wgs84, &mercator))?;
///
/// let options = TransformerOptions::default();
/// let transformer = Transformer::from_crs(&ctx, &catalog, &wgs84, &mercator, &options)?;
/// let (x, y, _, _) = transformer.transform_point(55., 12., None, None, &TransformOptions::default())?;
/// assert!((x - 1335833.8895).abs() < 1e-3 && (y - 7361866.1131).abs() < 1e-3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Transformer {
    ctx: ContextHandle,
    op: OpHandle,
    operation: CoordinateOperation,
    definition: String,
    is_pipeline: bool,
    exact_same: bool,
    equivalent: bool,
    skip_equivalent: bool,
    source_geographic: bool,
    target_geographic: bool,
    has_inverse: bool,
    // Input and output units of the forward, then the inverse, direction
    units: [[CoordUnit; 2]; 2],
    area_of_use: OnceCell<Option<AreaOfUse>>,
}

impl Transformer {
    /// Bind `operation`. Fails with `Error::NotInstantiable` if the
    /// operation lacks grids or catalog entries, and with
    /// `Error::Transform` if its definition cannot be instantiated
    pub fn from_operation(
        ctx: &ContextHandle,
        operation: CoordinateOperation,
        options: &TransformerOptions,
    ) -> Result<Transformer, Error> {
        if !operation.is_instantiable() {
            let missing: Vec<&str> = operation
                .missing_grids()
                .map(|grid| grid.short_name.as_str())
                .collect();
            warn!("{}: missing grids: {}", operation.name(), missing.join(", "));
            return Err(Error::NotInstantiable(operation.name().to_string()));
        }

        let definition = if options.always_xy {
            xy_definition(&operation)
        } else {
            operation.definition().to_string()
        };
        Transformer::bind(ctx, operation, definition, false, options.skip_equivalent)
    }

    /// Bind a raw operator pipeline. The pipeline is run as is: no unit
    /// or axis order normalization, no equivalence short-circuiting
    pub fn from_pipeline(ctx: &ContextHandle, definition: &str) -> Result<Transformer, Error> {
        let operation = CoordinateOperation::new(definition, OperationKind::Other, definition);
        Transformer::bind(ctx, operation, definition.to_string(), true, false)
    }

    /// Bind the best instantiable operation from `source` to `target`.
    /// Fails with `Error::OperationNotFound` if there is no candidate, and
    /// with `Error::NotInstantiable` if none of the candidates is usable
    pub fn from_crs(
        ctx: &ContextHandle,
        catalog: &dyn OperationCatalog,
        source: &Crs,
        target: &Crs,
        options: &TransformerOptions,
    ) -> Result<Transformer, Error> {
        let candidates = resolve(catalog, source, target, &options.query())?;
        let Some(first) = candidates.first() else {
            return Err(Error::OperationNotFound(
                source.name().to_string(),
                target.name().to_string(),
            ));
        };
        let first_name = first.name().to_string();

        let Some(best) = candidates.into_iter().find(CoordinateOperation::is_instantiable) else {
            warn!("No instantiable operation from {} to {}", source.name(), target.name());
            return Err(Error::NotInstantiable(first_name));
        };
        if best.name() != first_name {
            info!("{first_name} unavailable, using {}", best.name());
        }
        // Normalization follows the caller's systems, not the catalog's copies
        Transformer::from_operation(ctx, best.between(source, target), options)
    }

    fn bind(
        ctx: &ContextHandle,
        operation: CoordinateOperation,
        definition: String,
        is_pipeline: bool,
        skip_equivalent: bool,
    ) -> Result<Transformer, Error> {
        let op = ctx
            .borrow_mut()?
            .op(&definition)
            .map_err(|e| Error::Transform(format!("{definition}: {e}")))?;
        trace!("Transformer: bound {definition}");

        let (exact_same, equivalent) = match (operation.source_crs(), operation.target_crs()) {
            (Some(source), Some(target)) => match source.equivalence(target) {
                Equivalence::Identical => (true, true),
                Equivalence::Equivalent => (false, true),
                Equivalence::Unrelated => (false, false),
            },
            _ => (false, false),
        };
        let source_geographic = operation.source_crs().map_or(false, Crs::is_geographic);
        let target_geographic = operation.target_crs().map_or(false, Crs::is_geographic);

        let mut transformer = Transformer {
            ctx: ctx.clone(),
            op,
            operation,
            definition,
            is_pipeline,
            exact_same,
            equivalent,
            skip_equivalent,
            source_geographic,
            target_geographic,
            has_inverse: false,
            units: [[CoordUnit::Any; 2]; 2],
            area_of_use: OnceCell::new(),
        };

        // From here on, the operator is released on drop, even on failure
        let context = ctx.borrow()?;
        let descriptor = context.descriptor(op)?;
        transformer.units = [
            [descriptor.input_unit(Fwd), descriptor.output_unit(Fwd)],
            [descriptor.input_unit(Inv), descriptor.output_unit(Inv)],
        ];
        transformer.has_inverse = descriptor.invertible && transformer.operation.has_inverse();
        drop(context);
        Ok(transformer)
    }

    // ----- Introspection -----

    /// The short name of the operator: `pipeline` for multi step
    /// operations, otherwise the name of the single operator
    pub fn name(&self) -> String {
        let (steps, _) = self.definition.split_into_steps();
        if steps.len() > 1 {
            return "pipeline".to_string();
        }
        steps
            .first()
            .and_then(|step| step.split_whitespace().next())
            .unwrap_or("noop")
            .to_string()
    }

    /// The name of the bound operation
    pub fn description(&self) -> &str {
        self.operation.name()
    }

    /// The operator definition actually instantiated
    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn id(&self) -> Option<&str> {
        self.operation.id()
    }

    pub fn operation(&self) -> &CoordinateOperation {
        &self.operation
    }

    pub fn source_crs(&self) -> Option<&Crs> {
        self.operation.source_crs()
    }

    pub fn target_crs(&self) -> Option<&Crs> {
        self.operation.target_crs()
    }

    pub fn has_inverse(&self) -> bool {
        self.has_inverse
    }

    /// Declared accuracy in metres, or -1 if unknown
    pub fn accuracy(&self) -> f64 {
        self.operation.accuracy().unwrap_or(-1.)
    }

    /// The area of use of the operation, or if not declared, that of the
    /// source system, or of the target system
    pub fn area_of_use(&self) -> Option<&AreaOfUse> {
        self.area_of_use
            .get_or_init(|| {
                self.operation
                    .area_of_use()
                    .or_else(|| self.source_crs().and_then(Crs::area_of_use))
                    .or_else(|| self.target_crs().and_then(Crs::area_of_use))
                    .cloned()
            })
            .as_ref()
    }

    pub fn is_pipeline(&self) -> bool {
        self.is_pipeline
    }

    /// True if source and target systems are identical
    pub fn is_exact_same(&self) -> bool {
        self.exact_same
    }

    /// True if source and target systems are identical or equivalent
    pub fn is_equivalent(&self) -> bool {
        self.equivalent
    }

    pub fn is_network_enabled(&self) -> bool {
        self.ctx
            .borrow()
            .map_or(false, |ctx| ctx.config().network_enabled)
    }

    // ----- Transformation -----

    /// Transform a single coordinate tuple
    pub fn transform_point(
        &self,
        x: f64,
        y: f64,
        z: Option<f64>,
        t: Option<f64>,
        options: &TransformOptions,
    ) -> Result<(f64, f64, Option<f64>, Option<f64>), Error> {
        let mut operands = [Coor4D([x, y, z.unwrap_or(0.), t.unwrap_or(f64::NAN)])];
        self.transform_coords(&mut operands, options)?;
        let c = operands[0];
        Ok((c[0], c[1], z.map(|_| c[2]), t.map(|_| c[3])))
    }

    /// Transform coordinates held in separate, equally long, component
    /// buffers, in place. Returns the number of points transformed
    pub fn transform_buffer(
        &self,
        x: &mut [f64],
        y: &mut [f64],
        z: Option<&mut [f64]>,
        t: Option<&mut [f64]>,
        options: &TransformOptions,
    ) -> Result<usize, Error> {
        let mut buffers = ComponentBuffers::new(x, y, z, t)?;
        self.transform_coords(&mut buffers, options)
    }

    /// Transform coordinates interleaved in a single buffer, in place.
    /// See [`InterleavedBuffer`] for the layout parameters
    pub fn transform_interleaved(
        &self,
        data: &mut [f64],
        stride: usize,
        switch_xy: bool,
        time_3rd: bool,
        options: &TransformOptions,
    ) -> Result<usize, Error> {
        let mut buffer = InterleavedBuffer::new(data, stride, switch_xy, time_3rd)?;
        self.transform_coords(&mut buffer, options)
    }

    /// Transform `operands` in place. Returns the number of points.
    ///
    /// Points with NaN input stay NaN. Points failing to transform, and
    /// infinite results, are set to [`HUGE`], unless `options.errcheck`
    /// is set, in which case the call fails with
    /// `Error::UndefinedTransform`
    pub fn transform_coords(
        &self,
        operands: &mut dyn CoordinateSet,
        options: &TransformOptions,
    ) -> Result<usize, Error> {
        let n = operands.len();
        let Some(direction) = options.direction.direction() else {
            return Ok(n);
        };
        if self.exact_same || (self.equivalent && self.skip_equivalent) {
            trace!("Transformer: source and target equivalent. Skipping");
            return Ok(n);
        }
        if direction == Inv && !self.has_inverse {
            return Err(Error::NonInvertible(self.operation.name().to_string()));
        }

        let undefined: Vec<usize> = (0..n)
            .filter(|&i| {
                let (x, y) = operands.xy(i);
                x.is_nan() || y.is_nan()
            })
            .collect();
        if options.errcheck && !undefined.is_empty() {
            return Err(Error::UndefinedTransform(format!(
                "{} of {n} points with undefined input",
                undefined.len()
            )));
        }

        let [input, output] = self.units[usize::from(direction == Inv)];
        let (input_geographic, output_geographic) = match direction {
            Fwd => (self.source_geographic, self.target_geographic),
            Inv => (self.target_geographic, self.source_geographic),
        };
        if !self.is_pipeline {
            let factor = match (input, options.radians) {
                (CoordUnit::Radians, false) => Some(DEG_TO_RAD),
                (CoordUnit::Degrees, true) if input_geographic => Some(RAD_TO_DEG),
                _ => None,
            };
            scale_angles(operands, factor);
        }

        self.ctx
            .borrow()?
            .apply(self.op, direction, operands)
            .map_err(|e| Error::Transform(e.to_string()))?;

        if !self.is_pipeline {
            let factor = match (output, options.radians) {
                (CoordUnit::Radians, false) => Some(RAD_TO_DEG),
                (CoordUnit::Degrees, true) if output_geographic => Some(DEG_TO_RAD),
                _ => None,
            };
            scale_angles(operands, factor);
        }

        let failed = substitute_failures(operands, &undefined, !options.errcheck);
        if options.errcheck && failed > 0 {
            return Err(Error::UndefinedTransform(format!(
                "{failed} of {n} points failed to transform"
            )));
        }
        Ok(n)
    }
}

impl Drop for Transformer {
    fn drop(&mut self) {
        if let Ok(mut ctx) = self.ctx.borrow_mut() {
            ctx.release(self.op);
        }
    }
}

// Wrap the definition of `operation` in axis swaps, so it takes and
// delivers coordinates easting/longitude first
fn xy_definition(operation: &CoordinateOperation) -> String {
    let swap = "axisswap order=2,1";
    let mut steps = Vec::new();
    if operation.source_crs().map_or(false, Crs::is_north_first) {
        steps.push(swap);
    }
    steps.push(operation.definition());
    if operation.target_crs().map_or(false, Crs::is_north_first) {
        steps.push(swap);
    }
    steps.join(" | ")
}

fn scale_angles(operands: &mut dyn CoordinateSet, factor: Option<f64>) {
    let Some(factor) = factor else {
        return;
    };
    for i in 0..operands.len() {
        let (x, y) = operands.xy(i);
        operands.set_xy(i, x * factor, y * factor);
    }
}

// Count the points failing to transform, i.e. turning undefined from
// defined input. With `substitute`, replace their coordinates, and any
// infinite results, by HUGE. `undefined` must be sorted
fn substitute_failures(operands: &mut dyn CoordinateSet, undefined: &[usize], substitute: bool) -> usize {
    let dim = operands.dim().min(4);
    let mut failed = 0;
    for i in 0..operands.len() {
        if undefined.binary_search(&i).is_ok() {
            continue;
        }
        let mut coord = operands.get_coord(i);
        let point_failed = coord[0].is_nan() || coord[1].is_nan();
        if point_failed {
            failed += 1;
        }
        if !substitute {
            continue;
        }
        let mut changed = false;
        for j in 0..dim {
            let value = coord[j];
            if value.is_infinite() {
                coord[j] = HUGE.copysign(value);
                changed = true;
            } else if point_failed && value.is_nan() {
                coord[j] = HUGE;
                changed = true;
            }
        }
        if changed {
            operands.set_coord(i, &coord);
        }
    }
    failed
}

// ----- T E S T S ---------------------------------------------------------------------
