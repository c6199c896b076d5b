use super::ancillary::sum;
use std::f64::consts::PI;

/// The IEEE style remainder: `x - n·y`, with `n` the integer nearest
/// to `x/y`, ties to even. The result is in [-|y|/2, |y|/2].
pub fn remainder(x: f64, y: f64) -> f64 {
    let y = y.abs();
    let mut z = x % y;
    if 2. * z.abs() == y {
        z -= (x % (2. * y)) - z;
    } else if 2. * z.abs() > y {
        z += if z < 0. { y } else { -y };
    }
    z
}

/// Reduce an angle in degrees to the range [-180, 180]. The sign of ±180
/// follows the sign of the input
pub fn ang_normalize(x: f64) -> f64 {
    let y = remainder(x, 360.);
    if y.abs() == 180. {
        180_f64.copysign(x)
    } else {
        y
    }
}

/// Round an angle in degrees, such that tiny values snap to a
/// coarser grid. The smallest gap is 1/2⁵⁷ of a degree, i.e. 0.7 pm on
/// the Earth, removing near singular cases for non-zero tiny angles
pub fn ang_round(x: f64) -> f64 {
    const Z: f64 = 1. / 16.;
    let mut y = x.abs();
    let w = Z - y;
    if w > 0. {
        y = Z - w;
    }
    y.copysign(x)
}

/// The exact difference `y - x` of two angles in degrees, reduced to
/// [-180, 180], as an unevaluated sum `(d, e)`
pub fn ang_diff(x: f64, y: f64) -> (f64, f64) {
    let (d, t) = sum(remainder(-x, 360.), remainder(y, 360.));
    let (d, t) = sum(remainder(d, 360.), t);
    if d == 0. || d.abs() == 180. {
        let sign = if t == 0. { y - x } else { -t };
        return (d.copysign(sign), t);
    }
    (d, t)
}

/// Latitudes outside [-90, 90] are replaced by NaN
pub fn lat_fix(x: f64) -> f64 {
    if x.abs() > 90. {
        f64::NAN
    } else {
        x
    }
}

/// Sine and cosine of an angle in degrees, exact for multiples of 90°
pub fn sincosd(x: f64) -> (f64, f64) {
    let r = x % 360.;
    let q = if r.is_nan() { 0 } else { (r / 90.).round() as i64 };
    let r = (r - 90. * q as f64).to_radians();
    let (s, c) = r.sin_cos();
    let (s, c) = match q.rem_euclid(4) {
        1 => (c, -s),
        2 => (-s, -c),
        3 => (-c, s),
        _ => (s, c),
    };
    // No negative zeros for the cosine, and a correctly signed sine
    let c = c + 0.;
    let s = if s == 0. { s.copysign(x) } else { s };
    (s, c)
}

/// Sine and cosine of `x + t`, for an angle `x` in degrees, with an
/// error term `t`. The error term is added after the exact reduction of
/// `x` to [-45, 45]
pub fn sincosde(x: f64, t: f64) -> (f64, f64) {
    let q = if x.is_finite() { (x / 90.).round() } else { f64::NAN };
    let r = ang_round(x - 90. * q + t).to_radians();
    let (s, c) = r.sin_cos();
    let quadrant = if q.is_nan() { 0 } else { (q as i64).rem_euclid(4) };
    let (s, c) = match quadrant {
        1 => (c, -s),
        2 => (-s, -c),
        3 => (-c, s),
        _ => (s, c),
    };
    let c = c + 0.;
    let s = if s == 0. { s.copysign(x) } else { s };
    (s, c)
}

/// `atan2(y, x)` in degrees, with the quadrant reduction done exactly.
/// The result is in [-180, 180]
pub fn atan2d(y: f64, x: f64) -> f64 {
    let (mut x, mut y) = (x, y);
    let mut q = 0;
    if y.abs() > x.abs() {
        std::mem::swap(&mut x, &mut y);
        q = 2;
    }
    if x < 0. {
        q += 1;
        x = -x;
    }
    let ang = y.atan2(x).to_degrees();
    match q {
        1 => 180_f64.copysign(y) - ang,
        2 => 90. - ang,
        3 => -90. + ang,
        _ => ang,
    }
}

/// normalize arbitrary angles to [-π, π):
pub fn normalize_symmetric(angle: f64) -> f64 {
    let angle = (angle + PI) % (2.0 * PI);
    angle - PI * angle.signum()
}

/// normalize arbitrary angles to [0, 2π):
pub fn normalize_positive(angle: f64) -> f64 {
    let angle = angle % (2.0 * PI);
    if angle < 0. {
        return angle + 2.0 * PI;
    }
    angle
}

// ----- Tests ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization() {
        assert_eq!(ang_normalize(190.), -170.);
        assert_eq!(ang_normalize(-190.), 170.);
        assert_eq!(ang_normalize(540.), 180.);
        assert_eq!(ang_normalize(-540.), -180.);
        assert_eq!(ang_normalize(720.), 0.);
        assert_eq!(remainder(5., 4.), 1.);
        assert_eq!(remainder(7., 4.), -1.);

        assert!((normalize_symmetric(3. * PI / 2.) + PI / 2.).abs() < 1e-15);
        assert!((normalize_positive(-PI / 2.) - 3. * PI / 2.).abs() < 1e-15);
    }

    #[test]
    fn differences_and_rounding() {
        assert_eq!(ang_diff(10., 30.).0, 20.);
        assert_eq!(ang_diff(170., -170.).0, 20.);
        assert_eq!(ang_diff(-170., 170.).0, -20.);
        assert_eq!(ang_diff(0., 180.).0, 180.);
        assert_eq!(ang_round(1e-20), 0.);
        assert_eq!(ang_round(-1e-20), -0.);
        assert_eq!(ang_round(45.), 45.);
        assert!(lat_fix(91.).is_nan());
        assert_eq!(lat_fix(-90.), -90.);
    }

    #[test]
    fn exact_trigonometry() {
        assert_eq!(sincosd(90.), (1., 0.));
        assert_eq!(sincosd(180.), (0., -1.));
        assert_eq!(sincosd(-90.), (-1., 0.));
        assert_eq!(sincosd(270.), (-1., 0.));
        assert_eq!(sincosde(90., 0.), (1., 0.));
        let (s, _) = sincosde(29., 1.);
        assert!((s - 0.5).abs() < 1e-15);
        let (s, c) = sincosd(30.);
        assert!((s - 0.5).abs() < 1e-15);
        assert!((c - 3f64.sqrt() / 2.).abs() < 1e-15);

        assert_eq!(atan2d(1., 0.), 90.);
        assert_eq!(atan2d(0., -1.), 180.);
        assert_eq!(atan2d(-0., -1.), -180.);
        assert_eq!(atan2d(-1., 0.), -90.);
        assert!((atan2d(1., 1.) - 45.).abs() < 1e-14);
    }
}
