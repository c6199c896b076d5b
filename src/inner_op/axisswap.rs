/// Swap and/or negate axes. Same gamut as the PROJ operator of the same name
use crate::authoring::*;

// Decode the `order` series into positions and signs
fn permutation(op: &Op) -> Option<([usize; 4], [f64; 4], usize)> {
    let order = op.params.series("order").ok()?;
    let mut pos = [0_usize, 1, 2, 3];
    let mut sgn = [1., 1., 1., 1.];
    for (index, value) in order.iter().enumerate() {
        pos[index] = (value.abs() - 1.) as usize;
        sgn[index] = 1_f64.copysign(*value);
    }
    Some((pos, sgn, order.len()))
}

// ----- F O R W A R D -----------------------------------------------------------------

fn axisswap_fwd(op: &Op, _ctx: &dyn Context, operands: &mut dyn CoordinateSet) -> usize {
    let n = operands.len();
    let Some((pos, sgn, dimensionality)) = permutation(op) else {
        return n;
    };

    for i in 0..n {
        let inp = operands.get_coord(i);
        let mut out = inp;
        for index in 0..dimensionality {
            out[index] = inp[pos[index]] * sgn[index];
        }
        operands.set_coord(i, &out);
    }
    n
}

// ----- I N V E R S E -----------------------------------------------------------------

fn axisswap_inv(op: &Op, _ctx: &dyn Context, operands: &mut dyn CoordinateSet) -> usize {
    let n = operands.len();
    let Some((pos, sgn, dimensionality)) = permutation(op) else {
        return n;
    };

    for i in 0..n {
        let inp = operands.get_coord(i);
        let mut out = inp;
        for index in 0..dimensionality {
            out[pos[index]] = inp[index] * sgn[index];
        }
        operands.set_coord(i, &out);
    }
    n
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

#[rustfmt::skip]
pub const GAMUT: [OpParameter; 2] = [
    OpParameter::Flag { key: "inv" },
    OpParameter::Series { key: "order", default: Some("1,2,3,4") },
];

pub fn new(parameters: &RawParameters, ctx: &dyn Context) -> Result<Op, Error> {
    let op = Op::plain(
        parameters,
        InnerOp(axisswap_fwd),
        Some(InnerOp(axisswap_inv)),
        &GAMUT,
        ctx,
    )?;

    let order = op.params.series("order")?;
    if order.len() > 4 {
        return Err(Error::BadParam(
            "order".to_string(),
            "More than 4 indices given".to_string(),
        ));
    }

    // The elements must be nonzero integers, usable as (1 based) indices
    for &o in order {
        let i = o as i64;
        if (i as f64) != o || i == 0 || (i.unsigned_abs() as usize) > order.len() {
            return Err(Error::BadParam("order".to_string(), o.to_string()));
        }
    }

    // No duplicate axes
    for o in 1_u64..5 {
        if order.iter().filter(|x| (x.abs() as u64) == o).count() > 1 {
            return Err(Error::BadParam(
                "order".to_string(),
                "duplicate axis specified".to_string(),
            ));
        }
    }

    Ok(op)
}

// ----- T E S T S ---------------------------------------------------------------------
