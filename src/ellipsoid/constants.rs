/// The shape of a named ellipsoid is given either by its reciprocal
/// flattening or by its semiminor axis
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Rf(f64),
    B(f64),
}

/// A named ellipsoid: id, semimajor axis, shape, and description
pub type EllipsoidDefinition = (&'static str, f64, Shape, &'static str);

use Shape::{Rf, B};

// The ellipsoids traditionally known by PROJ. Lookup is by linear search,
// and the list order decides which name is reported when more than one
// entry describes the same ellipsoid (NWL9D and WGS66, e.g.)
#[rustfmt::skip]
pub const ELLIPSOID_LIST: [EllipsoidDefinition; 42] = [
    ("MERIT",    6378137.0,   Rf(298.257),           "MERIT 1983"),
    ("SGS85",    6378136.0,   Rf(298.257),           "Soviet Geodetic System 85"),
    ("GRS80",    6378137.0,   Rf(298.257222101),     "GRS 1980(IUGG, 1980)"),
    ("IAU76",    6378140.0,   Rf(298.257),           "IAU 1976"),
    ("airy",     6377563.396, B(6356256.910),        "Airy 1830"),
    ("APL4.9",   6378137.0,   Rf(298.25),            "Appl. Physics. 1965"),
    ("NWL9D",    6378145.0,   Rf(298.25),            "Naval Weapons Lab., 1965"),
    ("mod_airy", 6377340.189, B(6356034.446),        "Modified Airy"),
    ("andrae",   6377104.43,  Rf(300.0),             "Andrae 1876 (Den., Iclnd.)"),
    ("aust_SA",  6378160.0,   Rf(298.25),            "Australian Natl & S. Amer. 1969"),
    ("GRS67",    6378160.0,   Rf(298.247167427),     "GRS 67(IUGG 1967)"),
    ("bessel",   6377397.155, Rf(299.1528128),       "Bessel 1841"),
    ("bess_nam", 6377483.865, Rf(299.1528128),       "Bessel 1841 (Namibia)"),
    ("clrk66",   6378206.4,   B(6356583.8),          "Clarke 1866"),
    ("clrk80",   6378249.145, Rf(293.4663),          "Clarke 1880 mod."),
    ("CPM",      6375738.7,   Rf(334.29),            "Comm. des Poids et Mesures 1799"),
    ("delmbr",   6376428.0,   Rf(311.5),             "Delambre 1810 (Belgium)"),
    ("engelis",  6378136.05,  Rf(298.2566),          "Engelis 1985"),
    ("evrst30",  6377276.345, Rf(300.8017),          "Everest 1830"),
    ("evrst48",  6377304.063, Rf(300.8017),          "Everest 1948"),
    ("evrst56",  6377301.243, Rf(300.8017),          "Everest 1956"),
    ("evrst69",  6377295.664, Rf(300.8017),          "Everest 1969"),
    ("evrstSS",  6377298.556, Rf(300.8017),          "Everest (Sabah & Sarawak)"),
    ("fschr60",  6378166.0,   Rf(298.3),             "Fischer (Mercury Datum) 1960"),
    ("fschr60m", 6378155.0,   Rf(298.3),             "Modified Fischer 1960"),
    ("fschr68",  6378150.0,   Rf(298.3),             "Fischer 1968"),
    ("helmert",  6378200.0,   Rf(298.3),             "Helmert 1906"),
    ("hough",    6378270.0,   Rf(297.0),             "Hough"),
    ("intl",     6378388.0,   Rf(297.0),             "International 1909 (Hayford)"),
    ("krass",    6378245.0,   Rf(298.3),             "Krassovsky, 1942"),
    ("kaula",    6378163.0,   Rf(298.24),            "Kaula 1961"),
    ("lerch",    6378139.0,   Rf(298.257),           "Lerch 1979"),
    ("mprts",    6397300.0,   Rf(191.0),             "Maupertius 1738"),
    ("new_intl", 6378157.5,   B(6356772.2),          "New International 1967"),
    ("plessis",  6376523.0,   B(6355863.0),          "Plessis 1817 (France)"),
    ("SEasia",   6378155.0,   B(6356773.3205),       "Southeast Asia"),
    ("walbeck",  6376896.0,   B(6355834.8467),       "Walbeck"),
    ("WGS60",    6378165.0,   Rf(298.3),             "WGS 60"),
    ("WGS66",    6378145.0,   Rf(298.25),            "WGS 66"),
    ("WGS72",    6378135.0,   Rf(298.26),            "WGS 72"),
    ("WGS84",    6378137.0,   Rf(298.257223563),     "WGS 84"),
    ("sphere",   6370997.0,   B(6370997.0),          "Normal Sphere (r=6370997)"),
];
