#![allow(dead_code)]

/// Literature the algorithms of this library are built on.
pub enum Bibliography {
    /// B.R. Bowring, 1976: *Transformation from spatial to geographical coordinates*.
    /// Survey Review 23(181), pp. 323–327.
    Bow76,

    /// B.R. Bowring, 1985: *The accuracy of geodetic latitude and height equations*.
    /// Survey Review, 28(218), pp.202-206,
    /// [DOI](https://doi.org/10.1179/sre.1985.28.218.202).
    Bow85,

    /// S.J. Claessens, 2019: *Efficient transformation from Cartesian to geodetic coordinates*.
    /// Computers and Geosciences, Vol. 133, article 104307
    /// [DOI](https://doi.org/10.1016/j.cageo.2019.104307)
    Cla19,

    /// Toshio Fukushima, 1999: *Fast transform from geocentric to geodetic coordinates*.
    /// Journal of Geodesy, 73(11), pp.603–610
    /// [DOI](https://doi.org/10.1007/s001900050271)
    Fuk99,

    /// IOGP, 2019: *Geomatics Guidance Note 7, part 2: Coordinate Conversions & Transformations
    /// including Formulas*. IOGP Publication 373-7-2.
    Iogp19,

    /// Charles F.F. Karney, 2011: *Geodesics on an ellipsoid of revolution*.
    /// [arXiv](https://arxiv.org/abs/1102.1215)
    Kar11,

    /// Charles F.F. Karney, 2013: *Algorithms for geodesics*.
    /// Journal of Geodesy 87, 43–55.
    /// [DOI](https://doi.org/10.1007/s00190-012-0578-z).
    Kar13,

    /// Jonathan Richard Shewchuk, 1997: *Adaptive Precision Floating-Point Arithmetic
    /// and Fast Robust Geometric Predicates*.
    /// Discrete & Computational Geometry 18(3), pp. 305–363.
    /// [DOI](https://doi.org/10.1007/PL00009321)
    She97,

    /// T. Vincenty, 1975: *Direct and Inverse Solutions of Geodesics on the Ellipsoid
    /// with application of nested equations*.
    /// Survey Review, 23(176): 88-93.
    Vin75,
}
