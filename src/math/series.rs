/// Evaluate the polynomial Σ pᵢ · xⁿ⁻ⁱ, i ∈ {0, ..., n}, using Horner's
/// scheme. The coefficients are given highest order first, so
/// `polyval(&[1., 2., 3.], x)` is `x² + 2x + 3`.
pub fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().fold(0., |value, c| value * x + c)
}

/// Evaluate one of the trigonometric series of the geodesic algorithms,
/// using Clenshaw summation:
///
/// - if `sinp`: Σ cᵢ · sin(2i · x), i ∈ {1, ..., n}
/// - else:      Σ cᵢ · cos((2i + 1) · x), i ∈ {0, ..., n-1}
///
/// with `n = c.len() - 1` in the sine case (c₀ is unused), and
/// `n = c.len()` in the cosine case. The angle is given by its sine
/// and cosine.
pub fn sin_cos_series(sinp: bool, sinx: f64, cosx: f64, c: &[f64]) -> f64 {
    // The number of terms
    let mut n = if sinp { c.len() - 1 } else { c.len() };
    // Points one beyond the last element
    let mut k = c.len();

    // 2 cos(2x)
    let ar = 2. * (cosx - sinx) * (cosx + sinx);
    let mut y0 = 0.;
    let mut y1 = 0.;
    if n % 2 == 1 {
        k -= 1;
        y0 = c[k];
    }

    // Unrolled x 2, so the accumulators return to their original roles
    n /= 2;
    while n > 0 {
        n -= 1;
        k -= 1;
        y1 = ar * y0 - y1 + c[k];
        k -= 1;
        y0 = ar * y1 - y0 + c[k];
    }

    if sinp {
        // sin(2x) * y0
        2. * sinx * cosx * y0
    } else {
        // cos(x) * (y0 - y1)
        cosx * (y0 - y1)
    }
}

// ----- Tests ---------------------------------------------------------------------
