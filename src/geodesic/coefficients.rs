//! The series expansions of Karney's geodesic algorithms, truncated
//! at sixth order in the small quantities `eps` and `n`. See
//! [Kar13](crate::Bibliography::Kar13), eqs. (15), (17), (24), (25),
//! (42) and (43).

/// The expansion order
pub(super) const ORDER: usize = 6;
pub(super) const N_C1: usize = ORDER;
pub(super) const N_C2: usize = ORDER;
pub(super) const N_C3: usize = ORDER;
pub(super) const N_C4: usize = ORDER;
pub(super) const N_A3X: usize = ORDER;
pub(super) const N_C3X: usize = (N_C3 * (N_C3 - 1)) / 2;
pub(super) const N_C4X: usize = (N_C4 * (N_C4 + 1)) / 2;

/// A₁ - 1, the scale factor of the distance integral, eq. (17)
pub(super) fn a1m1f(eps: f64) -> f64 {
    let eps2 = eps * eps;
    let t = eps2 * (eps2 * (eps2 + 4.) + 64.) / 256.;
    (t + eps) / (1. - eps)
}

/// C₁ₗ, the Fourier coefficients of the distance integral, eq. (18).
/// Elements 1 through `N_C1` are set
pub(super) fn c1f(eps: f64, c: &mut [f64; N_C1 + 1]) {
    let eps2 = eps * eps;
    let mut d = eps;
    c[1] = d * ((6. - eps2) * eps2 - 16.) / 32.;
    d *= eps;
    c[2] = d * ((64. - 9. * eps2) * eps2 - 128.) / 2048.;
    d *= eps;
    c[3] = d * (9. * eps2 - 16.) / 768.;
    d *= eps;
    c[4] = d * (3. * eps2 - 5.) / 512.;
    d *= eps;
    c[5] = -7. * d / 1280.;
    d *= eps;
    c[6] = -7. * d / 2048.;
}

/// C'₁ₗ, the coefficients of the reverted distance series, eq. (21)
pub(super) fn c1pf(eps: f64, c: &mut [f64; N_C1 + 1]) {
    let eps2 = eps * eps;
    let mut d = eps;
    c[1] = d * (eps2 * (205. * eps2 - 432.) + 768.) / 1536.;
    d *= eps;
    c[2] = d * (eps2 * (4005. * eps2 - 4736.) + 3840.) / 12288.;
    d *= eps;
    c[3] = d * (116. - 225. * eps2) / 384.;
    d *= eps;
    c[4] = d * (2695. - 7173. * eps2) / 7680.;
    d *= eps;
    c[5] = 3467. * d / 7680.;
    d *= eps;
    c[6] = 38081. * d / 61440.;
}

/// A₂ - 1, the scale factor of the reduced length integral, eq. (42)
pub(super) fn a2m1f(eps: f64) -> f64 {
    let eps2 = eps * eps;
    let t = eps2 * (eps2 * (25. * eps2 + 36.) + 64.) / 256.;
    t * (1. - eps) - eps
}

/// C₂ₗ, eq. (43)
pub(super) fn c2f(eps: f64, c: &mut [f64; N_C2 + 1]) {
    let eps2 = eps * eps;
    let mut d = eps;
    c[1] = d * (eps2 * (eps2 + 2.) + 16.) / 32.;
    d *= eps;
    c[2] = d * (eps2 * (35. * eps2 + 64.) + 384.) / 2048.;
    d *= eps;
    c[3] = d * (15. * eps2 + 80.) / 768.;
    d *= eps;
    c[4] = d * (7. * eps2 + 35.) / 512.;
    d *= eps;
    c[5] = 63. * d / 1280.;
    d *= eps;
    c[6] = 77. * d / 2048.;
}

/// The polynomials in `n` giving the coefficients of A₃ as a series in `eps`
pub(super) fn a3coeff(n: f64) -> [f64; N_A3X] {
    [
        1.,
        (n - 1.) / 2.,
        (n * (3. * n - 1.) - 2.) / 8.,
        ((-n - 3.) * n - 1.) / 16.,
        (-2. * n - 3.) / 64.,
        -3. / 128.,
    ]
}

/// The polynomials in `n` giving the coefficients of C₃ₗ as series in `eps`.
/// Grouped by l, in increasing powers of `eps`
pub(super) fn c3coeff(n: f64) -> [f64; N_C3X] {
    [
        (1. - n) / 4.,
        (1. - n * n) / 8.,
        ((3. - n) * n + 3.) / 64.,
        (2. * n + 5.) / 128.,
        3. / 128.,
        ((n - 3.) * n + 2.) / 32.,
        ((-3. * n - 2.) * n + 3.) / 64.,
        (n + 3.) / 128.,
        5. / 256.,
        (n * (5. * n - 9.) + 5.) / 192.,
        (9. - 10. * n) / 384.,
        7. / 512.,
        (7. - 14. * n) / 512.,
        7. / 512.,
        21. / 2560.,
    ]
}

/// The polynomials in the second eccentricity squared, giving the
/// coefficients of the area series C₄ₗ in powers of k².
/// Grouped by l, in increasing powers of k²
#[rustfmt::skip]
pub(super) fn c4coeff(ep2: f64) -> [f64; N_C4X] {
    [
        (ep2 * (ep2 * (ep2 * ((832. - 640. * ep2) * ep2 - 1144.) + 1716.) - 3003.) + 30030.) / 45045.,
        (ep2 * (ep2 * ((832. - 640. * ep2) * ep2 - 1144.) + 1716.) - 3003.) / 60060.,
        (ep2 * ((208. - 160. * ep2) * ep2 - 286.) + 429.) / 18018.,
        ((104. - 80. * ep2) * ep2 - 143.) / 10296.,
        (13. - 10. * ep2) / 1430.,
        -1. / 156.,
        (ep2 * (ep2 * (ep2 * (640. * ep2 - 832.) + 1144.) - 1716.) + 3003.) / 540540.,
        (ep2 * (ep2 * (160. * ep2 - 208.) + 286.) - 429.) / 108108.,
        (ep2 * (80. * ep2 - 104.) + 143.) / 51480.,
        (10. * ep2 - 13.) / 6435.,
        5. / 3276.,
        (ep2 * ((208. - 160. * ep2) * ep2 - 286.) + 429.) / 900900.,
        ((104. - 80. * ep2) * ep2 - 143.) / 257400.,
        (13. - 10. * ep2) / 25025.,
        -1. / 2184.,
        (ep2 * (80. * ep2 - 104.) + 143.) / 2522520.,
        (10. * ep2 - 13.) / 140140.,
        5. / 45864.,
        (13. - 10. * ep2) / 1621620.,
        -1. / 58968.,
        1. / 792792.,
    ]
}

/// Evaluate A₃ from its coefficients, for the given `eps`
pub(super) fn a3f(a3x: &[f64; N_A3X], eps: f64) -> f64 {
    a3x.iter().rev().fold(0., |v, c| eps * v + c)
}

/// Evaluate C₃ₗ, l ∈ {1, ..., N_C3 - 1}, from their coefficients
pub(super) fn c3f(c3x: &[f64; N_C3X], eps: f64, c: &mut [f64; N_C3]) {
    let mut j = N_C3X;
    for k in (1..N_C3).rev() {
        let mut t = 0.;
        for _ in 0..N_C3 - k {
            j -= 1;
            t = eps * t + c3x[j];
        }
        c[k] = t;
    }

    let mut mult = 1.;
    for ck in c.iter_mut().skip(1) {
        mult *= eps;
        *ck *= mult;
    }
}

/// Evaluate C₄ₗ, l ∈ {0, ..., N_C4 - 1}, from their coefficients
pub(super) fn c4f(c4x: &[f64; N_C4X], k2: f64, c: &mut [f64; N_C4]) {
    let mut j = N_C4X;
    for k in (0..N_C4).rev() {
        let mut t = 0.;
        for _ in 0..N_C4 - k {
            j -= 1;
            t = k2 * t + c4x[j];
        }
        c[k] = t;
    }

    let mut mult = 1.;
    for ck in c.iter_mut().skip(1) {
        mult *= k2;
        *ck *= mult;
    }
}

/// Solve k⁴ + 2k³ - (x² + y² - 1)k² - 2y²k - y² = 0 for the positive root k
pub(super) fn astroid(x: f64, y: f64) -> f64 {
    let p = x * x;
    let q = y * y;
    let r = (p + q - 1.) / 6.;

    // y = 0 with |x| <= 1
    if q == 0. && r <= 0. {
        return 0.;
    }

    // Avoid possible division by zero when r = 0 by multiplying the
    // equations for s and t by r³ and r, respectively
    let s = p * q / 4.;
    let r2 = r * r;
    let r3 = r * r2;

    // The discriminant of the quadratic equation for T³. Zero on the
    // evolute curve p^(1/3) + q^(1/3) = 1
    let disc = s * (s + 2. * r3);
    let mut u = r;
    if disc >= 0. {
        let mut t3 = s + r3;
        // Pick the sign of the sqrt maximizing |T³|, minimizing cancellation
        t3 += if t3 < 0. { -disc.sqrt() } else { disc.sqrt() };
        let t = t3.cbrt();
        u += t + if t != 0. { r2 / t } else { 0. };
    } else {
        // T is complex, but u is real
        let ang = (-disc).sqrt().atan2(-(s + r3));
        u += 2. * r * (ang / 3.).cos();
    }

    let v = (u * u + q).sqrt();
    // u + v, avoiding loss of accuracy when u < 0
    let uv = if u < 0. { q / (v - u) } else { u + v };
    let w = (uv - q) / (2. * v);
    uv / ((uv + w * w).sqrt() + w)
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coefficient_evaluation() {
        // The evaluation order of c3f: C₃ₗ[5] is the last coefficient alone
        let c3x = c3coeff(0.);
        let mut c = [0.; N_C3];
        c3f(&c3x, 1., &mut c);
        assert_eq!(c[5], 21. / 2560.);
        assert_eq!(c[4], 7. / 512. + 7. / 512.);
        assert_eq!(c[0], 0.);

        let c4x = c4coeff(0.);
        let mut c = [0.; N_C4];
        c4f(&c4x, 0., &mut c);
        assert_eq!(c[0], 30030. / 45045.);
        assert_eq!(c[1], 0.);

        assert_eq!(a3f(&a3coeff(0.), 0.), 1.);
        assert_eq!(a1m1f(0.), 0.);
        assert_eq!(a2m1f(0.), 0.);
    }

    #[test]
    fn astroid_roots() {
        for (x, y) in [(0.5, 0.5), (-2., 0.1), (-0.3, 0.02)] {
            let k = astroid(x, y);
            let residual =
                k.powi(4) + 2. * k.powi(3) - (x * x + y * y - 1.) * k * k - 2. * y * y * k - y * y;
            assert!(k > 0.);
            assert!(residual.abs() < 1e-12);
        }
        assert_eq!(astroid(0.5, 0.), 0.);
    }
}
