/// Add one to the first coordinate of each tuple. Mostly for testing the
/// plumbing of the operator engine
use crate::authoring::*;

// ----- F O R W A R D -----------------------------------------------------------------

fn addone_fwd(_op: &Op, _ctx: &dyn Context, operands: &mut dyn CoordinateSet) -> usize {
    let n = operands.len();
    for i in 0..n {
        let (x, y) = operands.xy(i);
        operands.set_xy(i, x + 1., y);
    }
    n
}

// ----- I N V E R S E -----------------------------------------------------------------

fn addone_inv(_op: &Op, _ctx: &dyn Context, operands: &mut dyn CoordinateSet) -> usize {
    let n = operands.len();
    for i in 0..n {
        let (x, y) = operands.xy(i);
        operands.set_xy(i, x - 1., y);
    }
    n
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

#[rustfmt::skip]
pub const GAMUT: [OpParameter; 1] = [
    OpParameter::Flag { key: "inv" },
];

pub fn new(parameters: &RawParameters, ctx: &dyn Context) -> Result<Op, Error> {
    Op::plain(parameters, InnerOp(addone_fwd), Some(InnerOp(addone_inv)), &GAMUT, ctx)
}

// ----- T E S T S ---------------------------------------------------------------------
