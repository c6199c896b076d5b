//! Mercator, ellipsoidal and (web) spherical
use crate::authoring::*;
use std::f64::consts::FRAC_PI_2;
use std::f64::consts::FRAC_PI_4;

// ----- F O R W A R D -----------------------------------------------------------------

fn merc_fwd(op: &Op, _ctx: &dyn Context, operands: &mut dyn CoordinateSet) -> usize {
    let ellps = op.params.ellps(0);
    let a = ellps.semimajor_axis();
    let k_0 = op.params.k(0);
    let x_0 = op.params.x(0);
    let y_0 = op.params.y(0);
    let lon_0 = op.params.lon(0);

    let mut successes = 0_usize;
    for i in 0..operands.len() {
        let (lon, lat) = operands.xy(i);
        if lat.abs() >= FRAC_PI_2 {
            operands.set_xy(i, f64::NAN, f64::NAN);
            continue;
        }

        let easting = x_0 + (lon - lon_0) * k_0 * a;
        let isometric = ellps.latitude_geographic_to_isometric(lat);
        let northing = y_0 + a * k_0 * isometric;

        operands.set_xy(i, easting, northing);
        successes += 1;
    }

    successes
}

// ----- I N V E R S E -----------------------------------------------------------------

fn merc_inv(op: &Op, _ctx: &dyn Context, operands: &mut dyn CoordinateSet) -> usize {
    let ellps = op.params.ellps(0);
    let a = ellps.semimajor_axis();
    let k_0 = op.params.k(0);
    let x_0 = op.params.x(0);
    let y_0 = op.params.y(0);
    let lon_0 = op.params.lon(0);

    let mut successes = 0_usize;
    for i in 0..operands.len() {
        let (x, y) = operands.xy(i);

        // Easting -> Longitude
        let lon = (x - x_0) / (a * k_0) + lon_0;

        // Northing -> Latitude
        let psi = (y - y_0) / (a * k_0);
        let lat = ellps.latitude_isometric_to_geographic(psi);
        operands.set_xy(i, lon, lat);
        if !lat.is_nan() {
            successes += 1;
        }
    }

    successes
}

// ----- W E B   M E R C A T O R -------------------------------------------------------

// The spherical formulas, applied to ellipsoidal coordinates

fn webmerc_fwd(op: &Op, _ctx: &dyn Context, operands: &mut dyn CoordinateSet) -> usize {
    let a = op.params.ellps(0).semimajor_axis();

    let mut successes = 0_usize;
    for i in 0..operands.len() {
        let (lon, lat) = operands.xy(i);
        if lat.abs() >= FRAC_PI_2 {
            operands.set_xy(i, f64::NAN, f64::NAN);
            continue;
        }
        let easting = lon * a;
        let northing = a * (FRAC_PI_4 + lat / 2.0).tan().ln();
        operands.set_xy(i, easting, northing);
        successes += 1;
    }

    successes
}

fn webmerc_inv(op: &Op, _ctx: &dyn Context, operands: &mut dyn CoordinateSet) -> usize {
    let a = op.params.ellps(0).semimajor_axis();

    let mut successes = 0_usize;
    for i in 0..operands.len() {
        let (easting, northing) = operands.xy(i);
        let longitude = easting / a;
        let latitude = FRAC_PI_2 - 2.0 * (-northing / a).exp().atan();
        operands.set_xy(i, longitude, latitude);
        successes += 1;
    }

    successes
}

// ----- C O N S T R U C T O R S -------------------------------------------------------

#[rustfmt::skip]
pub const GAMUT: [OpParameter; 7] = [
    OpParameter::Flag { key: "inv" },
    OpParameter::Text { key: "ellps",  default: Some("GRS80") },

    OpParameter::Real { key: "lon_0",  default: Some(0_f64) },
    OpParameter::Real { key: "x_0",    default: Some(0_f64) },
    OpParameter::Real { key: "y_0",    default: Some(0_f64) },

    OpParameter::Real { key: "k_0",    default: Some(1_f64) },
    OpParameter::Real { key: "lat_ts", default: Some(0_f64) },
];

pub fn new(parameters: &RawParameters, ctx: &dyn Context) -> Result<Op, Error> {
    let mut op = Op::plain(
        parameters,
        InnerOp(merc_fwd),
        Some(InnerOp(merc_inv)),
        &GAMUT,
        ctx,
    )?;

    let lat_ts = op.params.real("lat_ts")?;
    if lat_ts.abs() > 90. {
        return Err(Error::BadParam("lat_ts".to_string(), lat_ts.to_string()));
    }

    // lat_ts trumps k_0
    if lat_ts != 0.0 {
        let (s, c) = lat_ts.to_radians().sin_cos();
        let es = op.params.ellps(0).eccentricity_squared();
        op.params.k[0] = c / (1. - es * s * s).sqrt();
    }

    Ok(op.with_units(CoordUnit::Radians, CoordUnit::Linear))
}

#[rustfmt::skip]
pub const WEBMERC_GAMUT: [OpParameter; 2] = [
    OpParameter::Flag { key: "inv" },
    OpParameter::Text { key: "ellps",  default: Some("WGS84") },
];

pub fn webmerc(parameters: &RawParameters, ctx: &dyn Context) -> Result<Op, Error> {
    let op = Op::plain(
        parameters,
        InnerOp(webmerc_fwd),
        Some(InnerOp(webmerc_inv)),
        &WEBMERC_GAMUT,
        ctx,
    )?;
    Ok(op.with_units(CoordUnit::Radians, CoordUnit::Linear))
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn merc() -> Result<(), Error> {
        let mut ctx = Minimal::default();
        let op = ctx.op("merc")?;

        // Validation value from PROJ: echo 12 55 0 0 | cct -d18 +proj=merc
        // followed by quadrant tests from PROJ builtins.gie
        let geo = [
            Coor4D::geo(55., 12., 0., 0.),
            Coor4D::geo(1., 2., 0., 0.),
            Coor4D::geo(-1., 2., 0., 0.),
            Coor4D::geo(1., -2., 0., 0.),
            Coor4D::geo(-1., -2., 0., 0.),
        ];

        let projected = [
            Coor4D::raw(1_335_833.889_519_282_8, 7_326_837.714_873_877, 0., 0.),
            Coor4D::raw(222_638.981_586_547, 110_579.965_218_249, 0., 0.),
            Coor4D::raw(222_638.981_586_547, -110_579.965_218_249, 0., 0.),
            Coor4D::raw(-222_638.981_586_547, 110_579.965_218_249, 0., 0.),
            Coor4D::raw(-222_638.981_586_547, -110_579.965_218_249, 0., 0.),
        ];

        let mut operands = geo;
        assert_eq!(ctx.apply(op, Fwd, &mut operands)?, 5);
        for i in 0..operands.len() {
            assert!(operands[i].hypot2(&projected[i]) < 20e-9);
        }

        ctx.apply(op, Inv, &mut operands)?;
        for i in 0..operands.len() {
            assert!(operands[i].hypot2(&geo[i]) < 20e-9);
        }

        // The poles are out of reach
        let mut operands = [Coor4D::geo(90., 0., 0., 0.)];
        assert_eq!(ctx.apply(op, Fwd, &mut operands)?, 0);
        assert!(operands[0][0].is_nan());

        let descriptor = ctx.descriptor(op)?;
        assert_eq!(descriptor.input_unit(Fwd), CoordUnit::Radians);
        assert_eq!(descriptor.output_unit(Fwd), CoordUnit::Linear);
        Ok(())
    }

    #[test]
    fn merc_lat_ts() -> Result<(), Error> {
        let mut ctx = Minimal::default();
        let op = ctx.op("merc lat_ts=56")?;

        // Validation value from PROJ: echo 12 55 0 0 | cct -d18 +proj=merc +lat_ts=56
        let geo = [Coor4D::geo(55., 12., 0., 0.)];
        let projected = [Coor4D::raw(748_713.257_925_886_8, 4_106_573.862_841_270_4, 0., 0.)];

        let mut operands = geo;
        ctx.apply(op, Fwd, &mut operands)?;
        assert!(operands[0].hypot2(&projected[0]) < 20e-9);
        ctx.apply(op, Inv, &mut operands)?;
        assert!(operands[0].hypot2(&geo[0]) < 20e-9);

        assert!(matches!(ctx.op("merc lat_ts=91"), Err(Error::BadParam(_, _))));
        Ok(())
    }

    #[test]
    fn webmerc() -> Result<(), Error> {
        let mut ctx = Minimal::default();
        let op = ctx.op("webmerc")?;

        // Validation value from PROJ: echo 12 55 0 0 | cct -d18 +proj=webmerc
        let geo = [Coor4D::geo(55., 12., 0., 0.)];
        let projected = [Coor4D::raw(1_335_833.889_519_282_8, 7_361_866.113_051_188, 0., 0.)];

        let mut operands = geo;
        ctx.apply(op, Fwd, &mut operands)?;
        assert_float_eq!(operands[0].0, projected[0].0, abs_all <= 1e-8);

        ctx.apply(op, Inv, &mut operands)?;
        assert_float_eq!(operands[0].0, geo[0].0, abs_all <= 2e-9);
        Ok(())
    }
}
