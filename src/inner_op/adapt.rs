/*! Declarative approach to adapting input data in one format to output data in another.

Example:

```sh
adapt from=neut_deg  to=enut_rad
```

The designations *eastish, northish, upish, timish* (`e, n, u, t`), and their
axis-reverted counterparts *westish, southish, downish, reversed-timeish*
(`w, s, d, r`), describe the order and orientation of the four coordinate
dimensions. An optional suffix gives the angular unit of the first two:
`_deg`, `_gon`, `_rad`, or `_any`.

The internal representation is `enut_rad`, so the example above reads
latitude, longitude in degrees, and hands over longitude, latitude in radians.
`adapt to=...` and `adapt inv from=...` are equivalent.

The built in macros `geo:in`, `geo:out`, `gis:in`, `gis:out` etc. are all
defined in terms of `adapt`.
!*/

use crate::authoring::*;

const POST_DEFAULT: [f64; 4] = [0., 1., 2., 3.];
const MULT_DEFAULT: [f64; 4] = [1., 1., 1., 1.];

// ----- F O R W A R D --------------------------------------------------------------

fn adapt_fwd(op: &Op, _ctx: &dyn Context, operands: &mut dyn CoordinateSet) -> usize {
    let n = operands.len();
    if op.params.boolean("noop") {
        return n;
    }

    let post = op.params.series("post").unwrap_or(&POST_DEFAULT);
    let post = [
        post[0] as usize,
        post[1] as usize,
        post[2] as usize,
        post[3] as usize,
    ];
    let mult = op.params.series("mult").unwrap_or(&MULT_DEFAULT);

    for i in 0..n {
        let o = operands.get_coord(i);
        let c = Coor4D([
            o[post[0]] * mult[0],
            o[post[1]] * mult[1],
            o[post[2]] * mult[2],
            o[post[3]] * mult[3],
        ]);
        operands.set_coord(i, &c);
    }
    n
}

// ----- I N V E R S E --------------------------------------------------------------

fn adapt_inv(op: &Op, _ctx: &dyn Context, operands: &mut dyn CoordinateSet) -> usize {
    let n = operands.len();
    if op.params.boolean("noop") {
        return n;
    }

    let post = op.params.series("post").unwrap_or(&POST_DEFAULT);
    let post = [
        post[0] as usize,
        post[1] as usize,
        post[2] as usize,
        post[3] as usize,
    ];
    let mult = op.params.series("mult").unwrap_or(&MULT_DEFAULT);

    for i in 0..n {
        let o = operands.get_coord(i);
        let mut c = Coor4D::default();
        for j in 0..4_usize {
            c[post[j]] = o[j] / mult[j];
        }
        operands.set_coord(i, &c);
    }
    n
}

// ----- C O N S T R U C T O R ------------------------------------------------------

#[rustfmt::skip]
pub const GAMUT: [OpParameter; 3] = [
    OpParameter::Flag { key: "inv" },
    OpParameter::Text { key: "from", default: Some("enut") },
    OpParameter::Text { key: "to",   default: Some("enut") },
];

pub fn new(parameters: &RawParameters, ctx: &dyn Context) -> Result<Op, Error> {
    let mut op = Op::plain(
        parameters,
        InnerOp(adapt_fwd),
        Some(InnerOp(adapt_inv)),
        &GAMUT,
        ctx,
    )?;

    // What we go `from` and what we go `to` both defaults to the internal
    // representation - i.e. "do nothing", neither on in- nor output.
    let from_text = op.params.text("from")?;
    let to_text = op.params.text("to")?;

    let Some(from) = coordinate_order_descriptor(&from_text) else {
        return Err(Error::Operator("Adapt", "Bad value for 'from'"));
    };
    let Some(to) = coordinate_order_descriptor(&to_text) else {
        return Err(Error::Operator("Adapt", "Bad value for 'to'"));
    };

    // Eliminate redundancy for over-specified cases.
    let give = combine_descriptors(&from, &to);
    if give.noop {
        op.params.boolean.insert("noop");
    }
    let post = give.post.map(|p| p as f64);
    op.params.series.insert("post", Vec::from(post));
    op.params.series.insert("mult", Vec::from(give.mult));

    // An angular unit given on one side implies radians on the other
    let angular = from.unit != CoordUnit::Any || to.unit != CoordUnit::Any;
    let internal = |unit: CoordUnit, suffixed: bool| match (unit, suffixed) {
        (CoordUnit::Any, _) if angular && !suffixed => CoordUnit::Radians,
        _ => unit,
    };
    let input = internal(from.unit, has_unit_suffix(&from_text));
    let output = internal(to.unit, has_unit_suffix(&to_text));
    Ok(op.with_units(input, output))
}

// ----- A N C I L L A R Y   F U N C T I O N S -----------------------------------------

#[derive(Debug, Default, Clone)]
struct CoordinateOrderDescriptor {
    post: [usize; 4],
    mult: [f64; 4],
    noop: bool,
    unit: CoordUnit,
}

fn has_unit_suffix(desc: &str) -> bool {
    desc.len() == 8
}

#[allow(clippy::float_cmp)]
fn coordinate_order_descriptor(desc: &str) -> Option<CoordinateOrderDescriptor> {
    let mut post = [0_usize, 1, 2, 3];
    let mut mult = [1_f64, 1., 1., 1.];
    if desc == "pass" {
        return Some(CoordinateOrderDescriptor {
            post,
            mult,
            noop: true,
            unit: CoordUnit::Any,
        });
    }

    if desc.len() != 4 && desc.len() != 8 {
        return None;
    }

    let mut torad = 1_f64;
    let mut unit = CoordUnit::Any;
    if desc.len() == 8 {
        match &desc[4..] {
            "_deg" => {
                torad = std::f64::consts::PI / 180.;
                unit = CoordUnit::Degrees;
            }
            "_gon" => torad = std::f64::consts::PI / 200.,
            "_rad" => unit = CoordUnit::Radians,
            "_any" => {}
            _ => return None,
        }
    }

    // Now figure out what goes (resp. comes from) where
    let mut indices = [1i32, 2, 3, 4];
    for (i, d) in desc[0..4].chars().enumerate() {
        // Sign and position in the internal representation
        indices[i] = match d {
            'w' => -1,
            's' => -2,
            'd' => -3,
            'r' => -4,
            'e' => 1,
            'n' => 2,
            'u' => 3,
            't' => 4,
            _ => return None,
        };
    }

    // Check that the descriptor describes a true permutation:
    // all inputs go to a unique output
    let mut count = [0_usize, 0, 0, 0];
    for index in indices {
        count[(index.abs() - 1) as usize] += 1;
    }
    if count != [1, 1, 1, 1] {
        return None;
    }

    // Now untangle the sign and position parts of 'indices'
    for i in 0..4 {
        let d = indices[i];
        post[i] = (d.abs() - 1) as usize;
        mult[i] = d.signum() as f64 * if i > 1 { 1.0 } else { torad };
    }
    let noop = mult == [1.0; 4] && post == [0_usize, 1, 2, 3];

    Some(CoordinateOrderDescriptor {
        post,
        mult,
        noop,
        unit,
    })
}

#[allow(clippy::float_cmp)]
fn combine_descriptors(
    from: &CoordinateOrderDescriptor,
    to: &CoordinateOrderDescriptor,
) -> CoordinateOrderDescriptor {
    let mut give = CoordinateOrderDescriptor::default();
    for i in 0..4 {
        // Both are permutations of 0..4, so the position is always found
        let position = from
            .post
            .iter()
            .position(|&p| p == to.post[i])
            .unwrap_or(i);
        give.post[i] = position;
        give.mult[i] = from.mult[position] / to.mult[i];
    }
    give.noop = give.mult == [1.0; 4] && give.post == [0_usize, 1, 2, 3];
    give
}

// ----- T E S T S ------------------------------------------------------------------
