use crate::authoring::*;

// ----- T H E   M I N I M A L   C O N T E X T -----------------------------------------

/// A minimalistic context, supporting only built in and run-time defined
/// operators and resources. No file system access. Sufficient for running
/// operations handed over in full by a catalog, and for internal test authoring.
#[derive(Debug, Default)]
pub struct Minimal {
    /// Constructors for user defined operators
    constructors: BTreeMap<String, OpConstructor>,
    /// User defined resources (macros)
    resources: BTreeMap<String, String>,
    /// Instantiations of operators
    operators: BTreeMap<OpHandle, Op>,
    config: ContextConfig,
}

const BAD_ID_MESSAGE: Error = Error::General("Minimal: Unknown operator id");

impl Minimal {
    /// A `Minimal` context using `config`. The search paths are recorded,
    /// but never consulted
    pub fn with_config(config: ContextConfig) -> Minimal {
        let mut ctx = Minimal::new();
        ctx.config = config;
        ctx
    }
}

impl Context for Minimal {
    fn new() -> Minimal {
        let mut ctx = Minimal::default();
        for item in BUILTIN_ADAPTORS {
            ctx.register_resource(item.0, item.1);
        }
        ctx
    }

    fn op(&mut self, definition: &str) -> Result<OpHandle, Error> {
        let op = Op::new(definition, self).map_err(|e| {
            self.config
                .report(log::Level::Debug, &format!("Minimal: {definition}: {e}"));
            e
        })?;
        let id = op.id;
        self.operators.insert(id, op);
        Ok(id)
    }

    fn apply(
        &self,
        op: OpHandle,
        direction: Direction,
        operands: &mut dyn CoordinateSet,
    ) -> Result<usize, Error> {
        let op = self.operators.get(&op).ok_or(BAD_ID_MESSAGE)?;
        Ok(op.apply(self, operands, direction))
    }

    fn release(&mut self, op: OpHandle) -> bool {
        self.operators.remove(&op).is_some()
    }

    fn descriptor(&self, op: OpHandle) -> Result<&OpDescriptor, Error> {
        let op = self.operators.get(&op).ok_or(BAD_ID_MESSAGE)?;
        Ok(&op.descriptor)
    }

    fn params(&self, op: OpHandle, index: usize) -> Result<&ParsedParameters, Error> {
        let op = self.operators.get(&op).ok_or(BAD_ID_MESSAGE)?;
        super::step_params(op, index)
    }

    fn globals(&self) -> BTreeMap<String, String> {
        BTreeMap::from([("ellps".to_string(), "GRS80".to_string())])
    }

    fn register_op(&mut self, name: &str, constructor: OpConstructor) {
        self.constructors.insert(String::from(name), constructor);
    }

    fn get_op(&self, name: &str) -> Result<OpConstructor, Error> {
        if let Some(result) = self.constructors.get(name) {
            return Ok(OpConstructor(result.0));
        }

        Err(Error::NotFound(
            name.to_string(),
            ": User defined constructor".to_string(),
        ))
    }

    fn register_resource(&mut self, name: &str, definition: &str) {
        self.resources
            .insert(String::from(name), String::from(definition));
    }

    fn get_resource(&self, name: &str) -> Result<String, Error> {
        if let Some(result) = self.resources.get(name) {
            return Ok(result.to_string());
        }

        Err(Error::NotFound(
            name.to_string(),
            ": User defined resource".to_string(),
        ))
    }

    fn config(&self) -> &ContextConfig {
        &self.config
    }

    fn configure(&mut self, config: ContextConfig) -> Result<(), Error> {
        self.config = config;
        Ok(())
    }
}

// ----- T E S T S ------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn basic() -> Result<(), Error> {
        let mut ctx = Minimal::new();

        // The "stupid way of adding 1" macro
        ctx.register_resource("stupid:way", "addone | addone | addone inv");
        let op = ctx.op("stupid:way")?;

        let mut data = some_basic_coor2dinates();
        assert_eq!(data[0][0], 55.);
        assert_eq!(data[1][0], 59.);

        ctx.apply(op, Fwd, &mut data)?;
        assert_eq!(data[0][0], 56.);
        assert_eq!(data[1][0], 60.);

        ctx.apply(op, Inv, &mut data)?;
        assert_eq!(data[0][0], 55.);
        assert_eq!(data[1][0], 59.);

        let steps = &ctx.descriptor(op)?.steps;
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0], "addone");
        assert_eq!(steps[2], "addone inv");

        let ellps = ctx.params(op, 1)?.ellps(0);
        assert_eq!(ellps.semimajor_axis(), 6378137.);

        // Released operators are gone for good
        assert!(ctx.release(op));
        assert!(!ctx.release(op));
        assert!(ctx.apply(op, Fwd, &mut data).is_err());
        Ok(())
    }

    #[test]
    fn introspection() -> Result<(), Error> {
        let mut ctx = Minimal::new();

        let op = ctx.op("geo:in | cart ellps=intl | helmert x=-87 y=-96 z=-120 | cart inv | geo:out")?;

        // Behind the curtains, the two i/o-macros are just calls to the 'adapt' operator
        assert_eq!("adapt", ctx.params(op, 0)?.name);
        assert_eq!("adapt", ctx.params(op, 4)?.name);
        assert_eq!("helmert", ctx.params(op, 2)?.name);
        assert!(ctx.params(op, 5).is_err());

        let ellps = ctx.params(op, 1)?.ellps(0);
        assert_eq!(ellps.semimajor_axis(), 6378388.);
        assert_eq!(ctx.params(op, 2)?.real("x")?, -87.);

        // Degrees in, degrees out
        let descriptor = ctx.descriptor(op)?;
        assert_eq!(descriptor.input_unit(Fwd), CoordUnit::Degrees);
        assert_eq!(descriptor.output_unit(Fwd), CoordUnit::Degrees);

        // ED50 to WGS84, roughly
        let mut data = [Coor4D::raw(55., 12., 0., 0.)];
        ctx.apply(op, Fwd, &mut data)?;
        assert_float_eq!(data[0][0], 54.999, abs <= 0.002);
        assert_float_eq!(data[0][1], 11.998, abs <= 0.002);
        Ok(())
    }
}
