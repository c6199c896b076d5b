use float_eq::assert_float_eq;
use geotrans::geodesic::GeodOptions;
use geotrans::prelude::*;

const BOSTON: (f64, f64) = (-71. - 7. / 60., 42. + 15. / 60.);
const PORTLAND: (f64, f64) = (-123. - 41. / 60., 45. + 31. / 60.);

// The Antarctic coast
const ANTARCTICA_LATS: [f64; 17] = [
    -72.9, -71.9, -74.9, -74.3, -77.5, -77.4, -71.7, -65.9, -65.7, -66.6, -66.9, -69.8, -70.0,
    -71.0, -77.3, -77.9, -74.7,
];
const ANTARCTICA_LONS: [f64; 17] = [
    -74., -102., -102., -131., -163., 163., 172., 140., 113., 88., 59., 25., -4., -14., -33., -46.,
    -61.,
];

#[test]
fn inverse_and_forward() -> Result<(), Error> {
    let clrk66 = Geod::named("clrk66")?;
    let (az12, az21, dist) = clrk66.inv(BOSTON.0, BOSTON.1, PORTLAND.0, PORTLAND.1);
    assert_float_eq!(az12, -66.5305947876623, abs <= 1e-9);
    assert_float_eq!(az21, 75.65363415556968, abs <= 1e-9);
    assert_float_eq!(dist, 4164192.708, abs <= 1e-3);

    let wgs84 = Geod::named("WGS84")?;
    let (az12, az21, dist) = wgs84.inv(BOSTON.0, BOSTON.1, PORTLAND.0, PORTLAND.1);
    assert_eq!(format!("{az12:.3} {az21:.3} {dist:.3}"), "-66.530 75.654 4164074.239");

    // ... and back again
    let (lon, lat, back) = wgs84.fwd(BOSTON.0, BOSTON.1, az12, dist);
    assert_float_eq!(lon, PORTLAND.0, abs <= 1e-9);
    assert_float_eq!(lat, PORTLAND.1, abs <= 1e-9);
    assert_float_eq!(back, az21, abs <= 1e-9);

    // Forward azimuth at the terminus, rather than back azimuth
    let options = GeodOptions {
        return_back_azimuth: false,
        ..Default::default()
    };
    let (azi1, azi2, s12) = wgs84.inv_with(-153., 66., -150., 67., &options);
    assert_float_eq!(s12, 173948.09307386656, abs <= 1e-6);
    assert_float_eq!(azi1, 48.76743028491582, abs <= 1e-10);
    assert_float_eq!(azi2, 51.51881534547291, abs <= 1e-10);

    // Radians in, radians out
    let options = GeodOptions {
        radians: true,
        return_back_azimuth: false,
    };
    let (azi1, azi2, s12) = wgs84.inv_with(
        -153f64.to_radians(),
        66f64.to_radians(),
        -150f64.to_radians(),
        67f64.to_radians(),
        &options,
    );
    assert_float_eq!(s12, 173948.09307386656, abs <= 1e-6);
    assert_float_eq!(azi1, 48.76743028491582f64.to_radians(), abs <= 1e-12);
    assert_float_eq!(azi2, 51.51881534547291f64.to_radians(), abs <= 1e-12);
    Ok(())
}

#[test]
fn bulk() -> Result<(), Error> {
    let geod = Geod::named("WGS84")?;
    let mut lons = [BOSTON.0, PORTLAND.0];
    let mut lats = [BOSTON.1, PORTLAND.1];
    let mut lons2 = [PORTLAND.0, BOSTON.0];
    let lats2 = [PORTLAND.1, BOSTON.1];
    geod.inv_buffers(&mut lons, &mut lats, &mut lons2, &lats2, &GeodOptions::default())?;

    // Azimuths, back azimuths and distances, in place of the input
    assert_float_eq!(lons[0], -66.530, abs <= 1e-3);
    assert_float_eq!(lons2[0], 4164074.239, abs <= 1e-3);
    assert_float_eq!(lons2[1], 4164074.239, abs <= 1e-3);
    // The reverse leg swaps the roles of the azimuths
    assert_float_eq!(lons[1], lats[0], abs <= 1e-9);
    assert_float_eq!(lats[1], lons[0], abs <= 1e-9);

    let (az12, _, dist) = geod.inv(BOSTON.0, BOSTON.1, PORTLAND.0, PORTLAND.1);
    let mut lons = [BOSTON.0; 3];
    let mut lats = [BOSTON.1; 3];
    let mut azs = [0., 90., az12];
    let dists = [1000., 1000., dist];
    geod.fwd_buffers(&mut lons, &mut lats, &mut azs, &dists, &GeodOptions::default())?;
    assert!(lats[0] > BOSTON.1);
    assert!(lons[1] > BOSTON.0);
    assert_float_eq!(lons[2], PORTLAND.0, abs <= 1e-9);
    assert_float_eq!(lats[2], PORTLAND.1, abs <= 1e-9);
    Ok(())
}

#[test]
fn equidistant_points() -> Result<(), Error> {
    let geod = Geod::named("clrk66")?;
    let points = geod.npts(BOSTON.0, BOSTON.1, PORTLAND.0, PORTLAND.1, 10, false);
    let expected = [
        (-75.414, 43.528),
        (-79.883, 44.637),
        (-84.512, 45.565),
        (-89.279, 46.299),
        (-94.156, 46.830),
        (-99.112, 47.149),
        (-104.106, 47.251),
        (-109.100, 47.136),
        (-114.051, 46.805),
        (-118.924, 46.262),
    ];
    assert_eq!(points.len(), 10);
    for ((lon, lat), (expected_lon, expected_lat)) in points.into_iter().zip(expected) {
        assert_float_eq!(lon, expected_lon, abs <= 1e-3);
        assert_float_eq!(lat, expected_lat, abs <= 1e-3);
    }
    assert!(geod.npts(0., 0., 10., 0., 0, false).is_empty());
    Ok(())
}

#[test]
fn intermediate() -> Result<(), Error> {
    let geod = Geod::named("WGS84")?;
    let flags = IntermediateFlags::default();
    let (b, p) = (BOSTON, PORTLAND);

    // Both end points included
    let points = geod.inv_intermediate(b.0, b.1, p.0, p.1, Spacing::Count(6), 0, 0, &flags)?;
    assert_eq!(points.npts, 6);
    assert_float_eq!(points.dist, 4164074.239, abs <= 1e-3);
    assert_float_eq!(points.del_s, points.dist / 5., abs <= 1e-6);
    assert_float_eq!(points.lons[0], b.0, abs <= 1e-9);
    assert_float_eq!(points.lats[0], b.1, abs <= 1e-9);
    assert_float_eq!(points.lons[5], p.0, abs <= 1e-9);
    assert_float_eq!(points.lats[5], p.1, abs <= 1e-9);

    // Spaced by distance: 4.16 intervals of 1000 km
    let spacing = Spacing::Distance(1_000_000.);
    let points = geod.inv_intermediate(b.0, b.1, p.0, p.1, spacing, 0, 0, &flags)?;
    assert_eq!(points.npts, 5);
    assert_float_eq!(points.del_s, points.dist / 4., abs <= 1e-6);

    let ceil = IntermediateFlags {
        rounding: NptsRounding::Ceil,
        ..Default::default()
    };
    let points = geod.inv_intermediate(b.0, b.1, p.0, p.1, spacing, 0, 0, &ceil)?;
    assert_eq!(points.npts, 6);
    assert_float_eq!(points.del_s, points.dist / 5., abs <= 1e-6);

    let trunc = IntermediateFlags {
        rounding: NptsRounding::Trunc,
        recalculate_del_s: false,
        ..Default::default()
    };
    let points = geod.inv_intermediate(b.0, b.1, p.0, p.1, spacing, 1, 1, &trunc)?;
    assert_eq!(points.npts, 3);
    assert_eq!(points.del_s, 1_000_000.);

    // The forward variant reaches the terminus along the initial azimuth
    let (az12, _, dist) = geod.inv(b.0, b.1, p.0, p.1);
    let flags = IntermediateFlags {
        keep_azimuths: true,
        ..Default::default()
    };
    let points = geod.fwd_intermediate(b.0, b.1, az12, 5, dist / 4., 0, 0, &flags);
    assert_eq!(points.npts, 5);
    assert_float_eq!(points.dist, dist, abs <= 1e-6);
    assert_float_eq!(points.lons[4], p.0, abs <= 1e-8);
    assert_float_eq!(points.lats[4], p.1, abs <= 1e-8);
    let azis = points.azis.unwrap_or_default();
    assert_float_eq!(azis[0], az12, abs <= 1e-9);
    Ok(())
}

#[test]
fn lengths_and_areas() -> Result<(), Error> {
    let geod = Geod::named("WGS84")?;
    let length = geod.line_length(&[1., 2.], &[0.5, 1.], true)?;
    assert_float_eq!(length, 5426061.32197463, abs <= 1e-6);

    let total = geod.line_length(&ANTARCTICA_LONS, &ANTARCTICA_LATS, false)?;
    assert_float_eq!(total, 14259605.611, abs <= 1e-2);
    let segments = geod.line_lengths(&ANTARCTICA_LONS, &ANTARCTICA_LATS, false)?;
    assert_eq!(segments.len(), 16);
    assert_float_eq!(segments.iter().sum::<f64>(), total, abs <= 1e-6);

    // Counter clockwise around the pole: positive area
    let (area, perimeter) = geod.polygon_area_perimeter(&ANTARCTICA_LONS, &ANTARCTICA_LATS, false)?;
    assert_float_eq!(area, 13376856682207.4, rmax <= 1e-10);
    assert_float_eq!(perimeter, 14710425.4, abs <= 0.1);

    // Roughly a square kilometre at the equator, counter clockwise
    let lons = [0., 0.009, 0.009, 0.];
    let lats = [0., 0., 0.009, 0.009];
    let (area, perimeter) = geod.polygon_area_perimeter(&lons, &lats, false)?;
    assert!((area - 1e6).abs() < 2e4);
    assert!((perimeter - 4e3).abs() < 2e1);

    assert!(matches!(
        geod.polygon_area_perimeter(&lons, &lats[..3], false),
        Err(Error::BufferLengthMismatch { expected: 4, found: 3 })
    ));
    Ok(())
}
