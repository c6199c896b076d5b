use crate::math::ancillary::sum;
use crate::math::angular::remainder;

/// A running sum with twice the precision of `f64`, as an unevaluated
/// sum of a value `s` and its rounding error `t`. Used to add up the
/// edge contributions to polygon areas and perimeters, where cancellation
/// would otherwise eat the significant digits.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Accumulator {
    s: f64,
    t: f64,
}

impl From<f64> for Accumulator {
    fn from(value: f64) -> Accumulator {
        Accumulator { s: value, t: 0. }
    }
}

impl Accumulator {
    #[must_use]
    pub fn new() -> Accumulator {
        Accumulator::default()
    }

    pub fn set(&mut self, value: f64) {
        *self = Accumulator::from(value);
    }

    /// Add `y`, accumulating from the least significant end
    pub fn add(&mut self, y: f64) {
        let (y, u) = sum(y, self.t);
        let (s, t) = sum(y, self.s);
        self.s = s;
        self.t = t;
        // s == 0 implies t == 0, so the result is u
        if self.s == 0. {
            self.s = u;
        } else {
            self.t += u;
        }
    }

    /// The value of the sum plus `y`, without modifying the accumulator
    #[must_use]
    pub fn sum(&self, y: f64) -> f64 {
        if y == 0. {
            return self.s;
        }
        let mut b = *self;
        b.add(y);
        b.s
    }

    pub fn negate(&mut self) {
        self.s = -self.s;
        self.t = -self.t;
    }

    /// Reduce the sum to [-y/2, y/2]
    pub fn remainder(&mut self, y: f64) {
        self.s = remainder(self.s, y);
        self.add(0.);
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_precision() {
        let mut acc = Accumulator::new();
        acc.add(1.);
        acc.add(1e-20);
        acc.add(-1.);
        assert_eq!(acc.sum(0.), 1e-20);

        let plain = 1. + 1e-20 - 1.;
        assert_eq!(plain, 0.);

        acc.negate();
        assert_eq!(acc.sum(0.), -1e-20);
        assert_eq!(acc.sum(1.), 1.);

        acc.set(7.);
        acc.remainder(4.);
        assert_eq!(acc.sum(0.), -1.);
        assert_eq!(Accumulator::from(3.).sum(0.), 3.);
    }
}
