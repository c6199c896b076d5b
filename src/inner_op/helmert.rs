//! The static 7 parameter Helmert transformation, shifting 3D cartesian
//! coordinates between reference frames:
//!
//! ```txt
//! X' = T + (1 + s) * R * X
//! ```
//!
//! Translations in metres, rotations in arc seconds, scale in ppm. The
//! rotation convention must be given as `position_vector` or
//! `coordinate_frame` whenever a rotation is present.
use crate::authoring::*;

type Matrix = [[f64; 3]; 3];

fn parts(op: &Op) -> Option<([f64; 3], Matrix, f64)> {
    let t = op.params.series("translation").ok()?;
    let r = op.params.series("rotation").ok()?;
    let scale = op.params.real("scale").ok()?;
    if t.len() != 3 || r.len() != 9 {
        return None;
    }
    let rot = [[r[0], r[1], r[2]], [r[3], r[4], r[5]], [r[6], r[7], r[8]]];
    Some(([t[0], t[1], t[2]], rot, scale))
}

// ----- F O R W A R D -----------------------------------------------------------------

fn fwd(op: &Op, _ctx: &dyn Context, operands: &mut dyn CoordinateSet) -> usize {
    let Some((t, r, scale)) = parts(op) else {
        return 0;
    };
    let n = operands.len();
    for i in 0..n {
        let (x, y, z) = operands.xyz(i);
        let xx = r[0][0] * x + r[0][1] * y + r[0][2] * z;
        let yy = r[1][0] * x + r[1][1] * y + r[1][2] * z;
        let zz = r[2][0] * x + r[2][1] * y + r[2][2] * z;
        operands.set_xyz(i, t[0] + scale * xx, t[1] + scale * yy, t[2] + scale * zz);
    }
    n
}

// ----- I N V E R S E -----------------------------------------------------------------

// The rotation matrix is orthogonal (or very nearly so, for the small
// angle approximation), so its inverse is its transpose
fn inv(op: &Op, _ctx: &dyn Context, operands: &mut dyn CoordinateSet) -> usize {
    let Some((t, r, scale)) = parts(op) else {
        return 0;
    };
    let n = operands.len();
    for i in 0..n {
        let (x, y, z) = operands.xyz(i);
        let (x, y, z) = ((x - t[0]) / scale, (y - t[1]) / scale, (z - t[2]) / scale);
        let xx = r[0][0] * x + r[1][0] * y + r[2][0] * z;
        let yy = r[0][1] * x + r[1][1] * y + r[2][1] * z;
        let zz = r[0][2] * x + r[1][2] * y + r[2][2] * z;
        operands.set_xyz(i, xx, yy, zz);
    }
    n
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

#[rustfmt::skip]
pub const GAMUT: [OpParameter; 10] = [
    OpParameter::Flag { key: "inv" },
    OpParameter::Flag { key: "exact" },
    OpParameter::Real { key: "x",  default: Some(0f64) },
    OpParameter::Real { key: "y",  default: Some(0f64) },
    OpParameter::Real { key: "z",  default: Some(0f64) },
    OpParameter::Real { key: "rx", default: Some(0f64) },
    OpParameter::Real { key: "ry", default: Some(0f64) },
    OpParameter::Real { key: "rz", default: Some(0f64) },
    OpParameter::Real { key: "s",  default: Some(0f64) },
    OpParameter::Text { key: "convention", default: Some("") },
];

pub fn new(parameters: &RawParameters, ctx: &dyn Context) -> Result<Op, Error> {
    let mut op = Op::plain(parameters, InnerOp(fwd), Some(InnerOp(inv)), &GAMUT, ctx)?;
    let params = &mut op.params;

    let translation = vec![params.real("x")?, params.real("y")?, params.real("z")?];
    let angles = [
        (params.real("rx")? / 3600.).to_radians(),
        (params.real("ry")? / 3600.).to_radians(),
        (params.real("rz")? / 3600.).to_radians(),
    ];

    let convention = params.text("convention")?;
    let rotated = angles != [0., 0., 0.];
    let position_vector = match convention.as_str() {
        "position_vector" => true,
        "coordinate_frame" => false,
        "" if !rotated => true,
        _ => {
            warn!("helmert: rotation needs convention=position_vector|coordinate_frame");
            return Err(Error::BadParam("convention".to_string(), convention));
        }
    };

    let exact = params.boolean("exact");
    let rotation = rotation_matrix(&angles, exact, position_vector);
    params.series.insert("translation", translation);
    params.series.insert("rotation", rotation.concat());
    params.real.insert("scale", 1.0 + params.real("s")? * 1e-6);

    Ok(op.with_units(CoordUnit::Linear, CoordUnit::Linear))
}

// ----- R O T A T I O N   M A T R I X -------------------------------------------------

// The coordinate frame rotation is R = Rx(rx) * Ry(ry) * Rz(rz), with
//
//          | 1   0  0 |           | cy 0 -sy |           | cz sz 0 |
// Rx(rx) = | 0  cx sx |, Ry(ry) = | 0  1   0 |, Rz(rz) = |-sz cz 0 |
//          | 0 -sx cx |           | sy 0  cy |           | 0  0  1 |
//
// and the position vector rotation is its transpose. Unless `exact`, the
// small angle approximation (sin r = r, cos r = 1, no second order terms)
// is used.
fn rotation_matrix(angles: &[f64; 3], exact: bool, position_vector: bool) -> Matrix {
    let [rx, ry, rz] = *angles;

    let r = if exact {
        let (sx, cx) = rx.sin_cos();
        let (sy, cy) = ry.sin_cos();
        let (sz, cz) = rz.sin_cos();
        [
            [cy * cz, cy * sz, -sy],
            [sx * sy * cz - cx * sz, sx * sy * sz + cx * cz, sx * cy],
            [cx * sy * cz + sx * sz, cx * sy * sz - sx * cz, cx * cy],
        ]
    } else {
        [[1., rz, -ry], [-rz, 1., rx], [ry, -rx, 1.]]
    };

    if !position_vector {
        return r;
    }
    [
        [r[0][0], r[1][0], r[2][0]],
        [r[0][1], r[1][1], r[2][1]],
        [r[0][2], r[1][2], r[2][2]],
    ]
}

// ----- T E S T S ---------------------------------------------------------------------
