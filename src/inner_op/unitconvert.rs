//! Conversion between linear units, or between angular units.
//!
//! The horizontal and vertical components are scaled separately, by
//! pivoting through the SI base unit: `xy_in -> (m | rad) -> xy_out`,
//! and `z_in -> m -> z_out`. Time is left untouched.
use super::units::{angular_unit, linear_unit, Unit};
use crate::authoring::*;

// ----- F O R W A R D -----------------------------------------------------------------

fn fwd(op: &Op, _ctx: &dyn Context, operands: &mut dyn CoordinateSet) -> usize {
    let (Ok(xy), Ok(z)) = (op.params.real("xy_factor"), op.params.real("z_factor")) else {
        return 0;
    };
    scale(operands, xy, z)
}

// ----- I N V E R S E -----------------------------------------------------------------

fn inv(op: &Op, _ctx: &dyn Context, operands: &mut dyn CoordinateSet) -> usize {
    let (Ok(xy), Ok(z)) = (op.params.real("xy_factor"), op.params.real("z_factor")) else {
        return 0;
    };
    scale(operands, 1. / xy, 1. / z)
}

fn scale(operands: &mut dyn CoordinateSet, xy: f64, z: f64) -> usize {
    let n = operands.len();
    for i in 0..n {
        let (x, y, h) = operands.xyz(i);
        operands.set_xyz(i, x * xy, y * xy, h * z);
    }
    n
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

#[rustfmt::skip]
pub const GAMUT: [OpParameter; 5] = [
    OpParameter::Flag { key: "inv" },
    OpParameter::Text { key: "xy_in",  default: Some("m") },
    OpParameter::Text { key: "xy_out", default: Some("m") },
    OpParameter::Text { key: "z_in",   default: Some("m") },
    OpParameter::Text { key: "z_out",  default: Some("m") },
];

fn lookup(key: &str, name: &str) -> Result<(&'static Unit, bool), Error> {
    if let Some(unit) = linear_unit(name) {
        return Ok((unit, false));
    }
    if let Some(unit) = angular_unit(name) {
        return Ok((unit, true));
    }
    warn!("unitconvert: unknown unit {key}={name}");
    Err(Error::BadParam(key.to_string(), name.to_string()))
}

fn coord_unit(unit: &Unit, angular: bool) -> CoordUnit {
    match (angular, unit.name) {
        (false, _) => CoordUnit::Linear,
        (true, "deg") => CoordUnit::Degrees,
        (true, "rad") => CoordUnit::Radians,
        (true, _) => CoordUnit::Any,
    }
}

pub fn new(parameters: &RawParameters, ctx: &dyn Context) -> Result<Op, Error> {
    let mut op = Op::plain(parameters, InnerOp(fwd), Some(InnerOp(inv)), &GAMUT, ctx)?;

    let (xy_in, xy_in_angular) = lookup("xy_in", &op.params.text("xy_in")?)?;
    let (xy_out, xy_out_angular) = lookup("xy_out", &op.params.text("xy_out")?)?;
    if xy_in_angular != xy_out_angular {
        return Err(Error::BadParam(
            "xy_out".to_string(),
            format!("cannot convert {} to {}", xy_in.name, xy_out.name),
        ));
    }

    let (z_in, z_in_angular) = lookup("z_in", &op.params.text("z_in")?)?;
    let (z_out, z_out_angular) = lookup("z_out", &op.params.text("z_out")?)?;
    if z_in_angular || z_out_angular {
        return Err(Error::BadParam(
            "z_in".to_string(),
            "vertical units must be linear".to_string(),
        ));
    }

    let xy_factor = xy_in.multiplier / xy_out.multiplier;
    let z_factor = z_in.multiplier / z_out.multiplier;
    op.params.real.insert("xy_factor", xy_factor);
    op.params.real.insert("z_factor", z_factor);

    let input = coord_unit(xy_in, xy_in_angular);
    let output = coord_unit(xy_out, xy_out_angular);
    Ok(op.with_units(input, output))
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn us_survey_feet() -> Result<(), Error> {
        let mut ctx = Minimal::default();
        let op = ctx.op("unitconvert xy_in=us-ft z_in=us-ft")?;

        let mut operands = [Coor4D::raw(5., 5., 5., 1.)];
        assert_eq!(ctx.apply(op, Fwd, &mut operands)?, 1);
        assert_float_eq!(operands[0].0, [1.524003048, 1.524003048, 1.524003048, 1.], abs_all <= 1e-9);

        ctx.apply(op, Inv, &mut operands)?;
        assert_float_eq!(operands[0].0, [5., 5., 5., 1.], abs_all <= 1e-9);

        let descriptor = ctx.descriptor(op)?;
        assert_eq!(descriptor.input_unit(Fwd), CoordUnit::Linear);
        Ok(())
    }

    #[test]
    fn yards_leave_z_alone() -> Result<(), Error> {
        let mut ctx = Minimal::default();
        let op = ctx.op("unitconvert xy_in=us-yd xy_out=m")?;

        let mut operands = [Coor4D::raw(1000., 1000., 500., 1.)];
        ctx.apply(op, Fwd, &mut operands)?;
        assert_float_eq!(operands[0][0], 914.4018288, abs <= 1e-6);
        assert_float_eq!(operands[0][2], 500., abs <= 1e-12);
        Ok(())
    }

    #[test]
    fn angular() -> Result<(), Error> {
        let mut ctx = Minimal::default();
        let op = ctx.op("unitconvert xy_in=grad xy_out=deg")?;

        let mut operands = [Coor2D::raw(135.0, 40.)];
        ctx.apply(op, Fwd, &mut operands)?;
        assert_float_eq!(operands[0].0, [121.5, 36.0], abs_all <= 1e-12);
        ctx.apply(op, Inv, &mut operands)?;
        assert_float_eq!(operands[0].0, [135.0, 40.0], abs_all <= 1e-12);

        let descriptor = ctx.descriptor(op)?;
        assert_eq!(descriptor.input_unit(Fwd), CoordUnit::Any);
        assert_eq!(descriptor.output_unit(Fwd), CoordUnit::Degrees);

        let op = ctx.op("unitconvert xy_in=deg xy_out=rad")?;
        let descriptor = ctx.descriptor(op)?;
        assert_eq!(descriptor.input_unit(Inv), CoordUnit::Radians);
        Ok(())
    }

    #[test]
    fn bad_units() {
        let mut ctx = Minimal::default();
        assert!(matches!(
            ctx.op("unitconvert xy_in=furlong"),
            Err(Error::BadParam(_, _))
        ));
        assert!(matches!(
            ctx.op("unitconvert xy_in=m xy_out=deg"),
            Err(Error::BadParam(_, _))
        ));
        assert!(matches!(
            ctx.op("unitconvert z_out=rad"),
            Err(Error::BadParam(_, _))
        ));
    }
}
