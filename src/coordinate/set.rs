use super::*;

/// `CoordinateSet` is the fundamental coordinate access interface of the
/// operator engine. Strictly speaking, it is not a set, but rather an
/// indexed list of coordinate tuples, each accessible as a `Coor4D`.
///
/// Implemented for arrays, slices and vectors of [`Coor2D`] and [`Coor4D`],
/// and for the caller owned bulk buffers of the [`buffer`](super::buffer)
/// module.
pub trait CoordinateSet {
    /// Number of coordinate tuples in the set
    fn len(&self) -> usize;

    /// Native dimension of the underlying coordinates (they will always be
    /// returned by [`Self::get_coord()`] as converted to [`Coor4D`])
    fn dim(&self) -> usize;

    /// Access the `index`th coordinate tuple
    fn get_coord(&self, index: usize) -> Coor4D;

    /// Overwrite the `index`th coordinate tuple. Elements beyond the
    /// native dimension are ignored
    fn set_coord(&mut self, index: usize, value: &Coor4D);

    /// Companion to `len()`
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Access the two first elements of the `index`th coordinate tuple.
    /// The default version goes through `get_coord()`: consider a type
    /// specific version when implementing the trait for a concrete type
    fn xy(&self, index: usize) -> (f64, f64) {
        self.get_coord(index).xy()
    }

    /// Replace the two first elements of the `index`th coordinate tuple
    fn set_xy(&mut self, index: usize, x: f64, y: f64) {
        let mut coord = self.get_coord(index);
        coord.set_xy(x, y);
        self.set_coord(index, &coord);
    }

    /// Access the three first elements of the `index`th coordinate tuple
    fn xyz(&self, index: usize) -> (f64, f64, f64) {
        self.get_coord(index).xyz()
    }

    /// Replace the three first elements of the `index`th coordinate tuple
    fn set_xyz(&mut self, index: usize, x: f64, y: f64, z: f64) {
        let mut coord = self.get_coord(index);
        coord.set_xyz(x, y, z);
        self.set_coord(index, &coord);
    }

    /// Syntactic sugar for [`Self::get_coord`]
    fn xyzt(&self, index: usize) -> (f64, f64, f64, f64) {
        self.get_coord(index).xyzt()
    }

    /// Syntactic sugar for [`Self::set_coord`]
    fn set_xyzt(&mut self, index: usize, x: f64, y: f64, z: f64, t: f64) {
        self.set_coord(index, &Coor4D([x, y, z, t]));
    }

    /// Set all coordinate tuples in the set to NaN
    fn stomp(&mut self) {
        let nanny = Coor4D::nan();
        for i in 0..self.len() {
            self.set_coord(i, &nanny);
        }
    }
}

// Produce the correct len() method for arrays, slices, and vecs
macro_rules! length {
    (array) => {
        fn len(&self) -> usize {
            N
        }
    };

    (slice) => {
        fn len(&self) -> usize {
            (**self).len()
        }
    };

    (vec) => {
        fn len(&self) -> usize {
            Vec::len(self)
        }
    };
}

// ----- Coor2D containers -------------------------------------------------------------

// The third coordinate of a 2D tuple reads as 0 (i.e. on the ellipsoid),
// and the fourth as NaN, so a missing epoch makes itself noticed in
// time dependent operations
macro_rules! coordinate_set_impl_for_coor2d {
    ($kind:ident) => {
        length!($kind);

        fn dim(&self) -> usize {
            2
        }

        fn get_coord(&self, index: usize) -> Coor4D {
            Coor4D([self[index][0], self[index][1], 0., f64::NAN])
        }

        fn set_coord(&mut self, index: usize, value: &Coor4D) {
            self[index] = Coor2D([value[0], value[1]]);
        }

        fn xy(&self, index: usize) -> (f64, f64) {
            self[index].xy()
        }

        fn set_xy(&mut self, index: usize, x: f64, y: f64) {
            self[index].set_xy(x, y);
        }
    };
}

impl<const N: usize> CoordinateSet for [Coor2D; N] {
    coordinate_set_impl_for_coor2d!(array);
}

impl CoordinateSet for &mut [Coor2D] {
    coordinate_set_impl_for_coor2d!(slice);
}

impl CoordinateSet for Vec<Coor2D> {
    coordinate_set_impl_for_coor2d!(vec);
}

// ----- Coor4D containers -------------------------------------------------------------

macro_rules! coordinate_set_impl_for_coor4d {
    ($kind:ident) => {
        length!($kind);

        fn dim(&self) -> usize {
            4
        }

        fn get_coord(&self, index: usize) -> Coor4D {
            self[index]
        }

        fn set_coord(&mut self, index: usize, value: &Coor4D) {
            self[index] = *value;
        }

        fn xy(&self, index: usize) -> (f64, f64) {
            self[index].xy()
        }

        fn set_xy(&mut self, index: usize, x: f64, y: f64) {
            self[index].set_xy(x, y);
        }

        fn xyz(&self, index: usize) -> (f64, f64, f64) {
            self[index].xyz()
        }

        fn set_xyz(&mut self, index: usize, x: f64, y: f64, z: f64) {
            self[index].set_xyz(x, y, z);
        }
    };
}

impl<const N: usize> CoordinateSet for [Coor4D; N] {
    coordinate_set_impl_for_coor4d!(array);
}

impl CoordinateSet for &mut [Coor4D] {
    coordinate_set_impl_for_coor4d!(slice);
}

impl CoordinateSet for Vec<Coor4D> {
    coordinate_set_impl_for_coor4d!(vec);
}

// ----- T E S T S ---------------------------------------------------------------------
