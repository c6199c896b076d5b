/// Geographical to cartesian (and v.v.) conversion
use crate::authoring::*;

// ----- F O R W A R D --------------------------------------------------------------

fn cart_fwd(op: &Op, _ctx: &dyn Context, operands: &mut dyn CoordinateSet) -> usize {
    let ellps = op.params.ellps(0);
    let mut successes = 0;
    for i in 0..operands.len() {
        let coord = ellps.cartesian(&operands.get_coord(i));
        if !coord.0[0..3].iter().any(|c| c.is_nan()) {
            successes += 1;
        }
        operands.set_coord(i, &coord);
    }
    successes
}

// ----- I N V E R S E --------------------------------------------------------------

fn cart_inv(op: &Op, _ctx: &dyn Context, operands: &mut dyn CoordinateSet) -> usize {
    let ellps = op.params.ellps(0);
    let mut successes = 0;
    for i in 0..operands.len() {
        let coord = ellps.geographic(&operands.get_coord(i));
        if !coord.0[0..3].iter().any(|c| c.is_nan()) {
            successes += 1;
        }
        operands.set_coord(i, &coord);
    }
    successes
}

// ----- C O N S T R U C T O R ------------------------------------------------------

#[rustfmt::skip]
pub const GAMUT: [OpParameter; 2] = [
    OpParameter::Flag { key: "inv" },
    OpParameter::Text { key: "ellps", default: Some("GRS80") },
];

pub fn new(parameters: &RawParameters, ctx: &dyn Context) -> Result<Op, Error> {
    let op = Op::plain(parameters, InnerOp(cart_fwd), Some(InnerOp(cart_inv)), &GAMUT, ctx)?;
    Ok(op.with_units(CoordUnit::Radians, CoordUnit::Linear))
}

// ----- T E S T S ------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() -> Result<(), Error> {
        let mut ctx = Minimal::default();
        let op = ctx.op("cart")?;

        let geo = [
            Coor4D::geo(85., 0., 100000., 0.),
            Coor4D::geo(55., 10., -100000., 0.),
            Coor4D::geo(25., 20., 0., 0.),
            Coor4D::geo(0., -20., 0., 0.),
            Coor4D::geo(-25., 20., 10., 0.),
        ];

        let cart = [
            Coor4D::raw(566_462.633_537_476_8, 0.0, 6_432_020.333_690_127, 0.0),
            Coor4D::raw(3_554_403.475_871_930_4, 626_737.233_120_170_7, 5_119_468.318_659_256, 0.),
            Coor4D::raw(5_435_195.382_145_216, 1_978_249.336_521_975_5, 2_679_074.462_877_277_8, 0.),
            Coor4D::raw(5_993_488.273_261_571, -2_181_451.330_890_750_5, 0., 0.),
            Coor4D::raw(5_435_203.898_652_612, 1_978_252.436_277_167_4, -2_679_078.689_059_895, 0.),
        ];

        // Forward
        let mut operands = geo;
        assert_eq!(ctx.apply(op, Fwd, &mut operands)?, 5);
        for i in 0..5 {
            assert!(operands[i].hypot3(&cart[i]) < 20e-9);
        }

        // Inverse
        ctx.apply(op, Inv, &mut operands)?;
        for i in 0..5 {
            // 1e-10 rad is less than a millimetre on the surface
            assert!((operands[i][0] - geo[i][0]).abs() < 1e-10);
            assert!((operands[i][1] - geo[i][1]).abs() < 1e-10);
            assert!((operands[i][2] - geo[i][2]).abs() < 1e-6);
        }
        Ok(())
    }

    #[test]
    fn poles() -> Result<(), Error> {
        let mut ctx = Minimal::default();
        let op = ctx.op("cart ellps=WGS84")?;
        let b = Ellipsoid::named("WGS84")?.semiminor_axis();
        let mut operands = [Coor4D::raw(0., 0., b + 10., 0.)];
        ctx.apply(op, Inv, &mut operands)?;
        assert!((operands[0][1] - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
        assert!((operands[0][2] - 10.).abs() < 1e-8);
        Ok(())
    }
}
