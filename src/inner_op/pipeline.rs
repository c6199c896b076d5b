use crate::authoring::*;

// ----- F O R W A R D -----------------------------------------------------------------

fn pipeline_fwd(op: &Op, ctx: &dyn Context, operands: &mut dyn CoordinateSet) -> usize {
    let mut n = usize::MAX;
    for step in &op.steps {
        n = n.min(step.apply(ctx, operands, Direction::Fwd));
    }
    // An empty pipeline is a noop
    n.min(operands.len())
}

// ----- I N V E R S E -----------------------------------------------------------------

fn pipeline_inv(op: &Op, ctx: &dyn Context, operands: &mut dyn CoordinateSet) -> usize {
    let mut n = usize::MAX;
    for step in op.steps.iter().rev() {
        n = n.min(step.apply(ctx, operands, Direction::Inv));
    }
    n.min(operands.len())
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

#[rustfmt::skip]
pub const GAMUT: [OpParameter; 1] = [
    OpParameter::Flag { key: "inv" },
];

pub fn new(parameters: &RawParameters, ctx: &dyn Context) -> Result<Op, Error> {
    let definition = &parameters.definition;
    let thesteps = definition.split_into_steps().0;
    let mut steps = Vec::new();

    for step in thesteps {
        let step_parameters = parameters.next(&step);
        steps.push(Op::op(step_parameters, ctx)?);
    }

    // The pipeline is invertible only if all its steps are
    let invertible = steps.iter().all(|step| step.descriptor.invertible);
    let inv = if invertible {
        Some(InnerOp(pipeline_inv))
    } else {
        None
    };

    // Units in: those of the first step caring about units. Units out: those
    // of the last step caring
    let input = steps
        .iter()
        .map(|step| step.descriptor.input_unit(Fwd))
        .find(|unit| *unit != CoordUnit::Any)
        .unwrap_or_default();
    let output = steps
        .iter()
        .rev()
        .map(|step| step.descriptor.output_unit(Fwd))
        .find(|unit| *unit != CoordUnit::Any)
        .unwrap_or_default();

    // The pipeline gamut only knows `inv`, which is handled as a step-wise prefix
    // modifier, so the pipeline parameters are parsed from an empty definition
    let own = RawParameters::new("pipeline", &parameters.globals);
    let params = ParsedParameters::new(&own, &GAMUT)?;
    let mut descriptor = OpDescriptor::new(definition, InnerOp(pipeline_fwd), inv);
    descriptor.units = [input, output];
    let id = OpHandle::new();

    Ok(Op {
        descriptor,
        params,
        steps,
        id,
    })
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline() -> Result<(), Error> {
        let mut ctx = Minimal::default();
        let op = ctx.op("addone|addone|addone")?;
        let mut data = some_basic_coor2dinates();
        assert_eq!(ctx.apply(op, Fwd, &mut data)?, 2);
        assert_eq!(data[0][0], 58.);
        assert_eq!(data[1][0], 62.);
        ctx.apply(op, Inv, &mut data)?;
        assert_eq!(data[0][0], 55.);
        assert_eq!(data[1][0], 59.);

        let op = ctx.op("addone|addone inv|addone")?;
        let mut data = some_basic_coor2dinates();
        ctx.apply(op, Fwd, &mut data)?;
        assert_eq!(data[0][0], 56.);
        assert_eq!(data[1][0], 60.);
        ctx.apply(op, Inv, &mut data)?;
        assert_eq!(data[0][0], 55.);
        assert_eq!(data[1][0], 59.);
        assert_eq!(ctx.descriptor(op)?.steps.len(), 3);

        // Try to invoke garbage as a pipeline step
        assert!(matches!(
            ctx.op("addone|addone|_garbage"),
            Err(Error::NotFound(_, _))
        ));

        Ok(())
    }

    #[test]
    fn units() -> Result<(), Error> {
        let mut ctx = Minimal::new();
        let op = ctx.op("addone | gis:in | merc | addone")?;
        let descriptor = ctx.descriptor(op)?;
        assert_eq!(descriptor.input_unit(Fwd), CoordUnit::Degrees);
        assert_eq!(descriptor.output_unit(Fwd), CoordUnit::Linear);

        let op = ctx.op("addone | addone")?;
        assert_eq!(ctx.descriptor(op)?.input_unit(Fwd), CoordUnit::Any);
        Ok(())
    }
}
