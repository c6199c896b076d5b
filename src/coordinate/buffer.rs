//! Views over caller owned numeric buffers, making them available as
//! [`CoordinateSet`]s for in-place transformation without intermediate
//! allocation. The buffer geometry is validated once, at construction.
use super::*;

/// One buffer per coordinate component. The `x` and `y` buffers are
/// mandatory, the `z` and `t` buffers optional. All buffers must have
/// the same length.
///
/// When absent, the third coordinate reads as 0 and the fourth as NaN
#[derive(Debug)]
pub struct ComponentBuffers<'a> {
    x: &'a mut [f64],
    y: &'a mut [f64],
    z: Option<&'a mut [f64]>,
    t: Option<&'a mut [f64]>,
}

impl<'a> ComponentBuffers<'a> {
    pub fn new(
        x: &'a mut [f64],
        y: &'a mut [f64],
        z: Option<&'a mut [f64]>,
        t: Option<&'a mut [f64]>,
    ) -> Result<ComponentBuffers<'a>, Error> {
        let expected = x.len();
        let others = [
            Some(y.len()),
            z.as_ref().map(|z| z.len()),
            t.as_ref().map(|t| t.len()),
        ];
        for found in others.into_iter().flatten() {
            if found != expected {
                return Err(Error::BufferLengthMismatch { expected, found });
            }
        }
        Ok(ComponentBuffers { x, y, z, t })
    }

    pub fn has_z(&self) -> bool {
        self.z.is_some()
    }

    pub fn has_t(&self) -> bool {
        self.t.is_some()
    }
}

impl CoordinateSet for ComponentBuffers<'_> {
    fn len(&self) -> usize {
        self.x.len()
    }

    fn dim(&self) -> usize {
        2 + usize::from(self.z.is_some()) + usize::from(self.t.is_some())
    }

    fn get_coord(&self, index: usize) -> Coor4D {
        let z = self.z.as_ref().map_or(0., |z| z[index]);
        let t = self.t.as_ref().map_or(f64::NAN, |t| t[index]);
        Coor4D([self.x[index], self.y[index], z, t])
    }

    fn set_coord(&mut self, index: usize, value: &Coor4D) {
        self.x[index] = value[0];
        self.y[index] = value[1];
        if let Some(z) = self.z.as_mut() {
            z[index] = value[2];
        }
        if let Some(t) = self.t.as_mut() {
            t[index] = value[3];
        }
    }

    fn xy(&self, index: usize) -> (f64, f64) {
        (self.x[index], self.y[index])
    }

    fn set_xy(&mut self, index: usize, x: f64, y: f64) {
        self.x[index] = x;
        self.y[index] = y;
    }
}

/// A single buffer of interleaved coordinate tuples, `stride` elements
/// each (2, 3 or 4).
///
/// With `switch_xy`, the first two elements of each tuple are stored in
/// swapped order. With `time_3rd` and a stride of 3, the third element is
/// the time coordinate, rather than the height.
#[derive(Debug)]
pub struct InterleavedBuffer<'a> {
    data: &'a mut [f64],
    stride: usize,
    switch_xy: bool,
    time_3rd: bool,
}

impl<'a> InterleavedBuffer<'a> {
    pub fn new(
        data: &'a mut [f64],
        stride: usize,
        switch_xy: bool,
        time_3rd: bool,
    ) -> Result<InterleavedBuffer<'a>, Error> {
        if !(2..=4).contains(&stride) {
            return Err(Error::BadParam(
                "stride".to_string(),
                format!("{stride} (must be 2, 3 or 4)"),
            ));
        }
        let found = data.len();
        if found % stride != 0 {
            let expected = (found / stride + 1) * stride;
            return Err(Error::BufferLengthMismatch { expected, found });
        }
        Ok(InterleavedBuffer {
            data,
            stride,
            switch_xy,
            time_3rd,
        })
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    // Offsets of x, y, z, t within a tuple. None for missing elements
    fn offsets(&self) -> [Option<usize>; 4] {
        let (x, y) = if self.switch_xy { (1, 0) } else { (0, 1) };
        match (self.stride, self.time_3rd) {
            (2, _) => [Some(x), Some(y), None, None],
            (3, false) => [Some(x), Some(y), Some(2), None],
            (3, true) => [Some(x), Some(y), None, Some(2)],
            _ => [Some(x), Some(y), Some(2), Some(3)],
        }
    }
}

impl CoordinateSet for InterleavedBuffer<'_> {
    fn len(&self) -> usize {
        self.data.len() / self.stride
    }

    fn dim(&self) -> usize {
        self.stride
    }

    fn get_coord(&self, index: usize) -> Coor4D {
        let base = index * self.stride;
        let mut coord = Coor4D([0., 0., 0., f64::NAN]);
        for (i, offset) in self.offsets().into_iter().enumerate() {
            if let Some(offset) = offset {
                coord[i] = self.data[base + offset];
            }
        }
        coord
    }

    fn set_coord(&mut self, index: usize, value: &Coor4D) {
        let base = index * self.stride;
        for (i, offset) in self.offsets().into_iter().enumerate() {
            if let Some(offset) = offset {
                self.data[base + offset] = value[i];
            }
        }
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components() -> Result<(), Error> {
        let mut x = [1., 2., 3.];
        let mut y = [4., 5., 6.];
        let mut z = [7., 8., 9.];
        let mut buffers = ComponentBuffers::new(&mut x, &mut y, Some(&mut z), None)?;
        assert_eq!(buffers.len(), 3);
        assert_eq!(buffers.dim(), 3);
        assert!(buffers.has_z() && !buffers.has_t());

        let c = buffers.get_coord(1);
        assert_eq!(c.xyz(), (2., 5., 8.));
        assert!(c[3].is_nan());

        buffers.set_coord(2, &Coor4D::raw(10., 20., 30., 40.));
        assert_eq!(buffers.xy(2), (10., 20.));
        assert_eq!((x[2], y[2], z[2]), (10., 20., 30.));
        Ok(())
    }

    #[test]
    fn mismatch() {
        let mut x = [0.; 5];
        let mut y = [0.; 3];
        let result = ComponentBuffers::new(&mut x, &mut y, None, None);
        assert!(matches!(
            result,
            Err(Error::BufferLengthMismatch {
                expected: 5,
                found: 3
            })
        ));

        let mut data = [0.; 7];
        assert!(matches!(
            InterleavedBuffer::new(&mut data, 3, false, false),
            Err(Error::BufferLengthMismatch {
                expected: 9,
                found: 7
            })
        ));
        assert!(matches!(
            InterleavedBuffer::new(&mut data, 5, false, false),
            Err(Error::BadParam(_, _))
        ));
    }

    #[test]
    fn interleaved() -> Result<(), Error> {
        // lat, lon pairs
        let mut data = [55., 12., 59., 18.];
        let mut buffer = InterleavedBuffer::new(&mut data, 2, true, false)?;
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.xy(1), (18., 59.));
        buffer.set_xy(0, 1., 2.);
        assert_eq!(data[..2], [2., 1.]);

        // x, y, t triplets
        let mut data = [1., 2., 2020., 3., 4., 2021.];
        let buffer = InterleavedBuffer::new(&mut data, 3, false, true)?;
        assert_eq!(buffer.get_coord(1).0, [3., 4., 0., 2021.]);
        assert_eq!(buffer.stride(), 3);
        Ok(())
    }
}
