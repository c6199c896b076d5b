/// A named unit and its multiplier to the SI base unit (metre or radian)
#[derive(Debug, Clone, Copy)]
pub struct Unit {
    pub name: &'static str,
    pub description: &'static str,
    pub multiplier: f64,
}

const fn unit(name: &'static str, description: &'static str, multiplier: f64) -> Unit {
    Unit {
        name,
        description,
        multiplier,
    }
}

// Linear units, from PROJ's units.c
#[rustfmt::skip]
pub const LINEAR_UNITS: [Unit; 21] = [
    unit("km",     "Kilometer",                    1000.0),
    unit("m",      "Meter",                        1.0),
    unit("dm",     "Decimeter",                    0.1),
    unit("cm",     "Centimeter",                   0.01),
    unit("mm",     "Millimeter",                   0.001),
    unit("kmi",    "International Nautical Mile",  1852.0),
    unit("in",     "International Inch",           0.0254),
    unit("ft",     "International Foot",           0.3048),
    unit("yd",     "International Yard",           0.9144),
    unit("mi",     "International Statute Mile",   1609.344),
    unit("fath",   "International Fathom",         1.8288),
    unit("ch",     "International Chain",          20.1168),
    unit("link",   "International Link",           0.201168),
    unit("us-in",  "U.S. Surveyor's Inch",         100.0 / 3937.0),
    unit("us-ft",  "U.S. Surveyor's Foot",         1200.0 / 3937.0),
    unit("us-yd",  "U.S. Surveyor's Yard",         3600.0 / 3937.0),
    unit("us-ch",  "U.S. Surveyor's Chain",        79200.0 / 3937.0),
    unit("us-mi",  "U.S. Surveyor's Statute Mile", 6336000.0 / 3937.0),
    unit("ind-yd", "Indian Yard",                  0.91439523),
    unit("ind-ft", "Indian Foot",                  0.30479841),
    unit("ind-ch", "Indian Chain",                 20.11669506),
];

#[rustfmt::skip]
pub const ANGULAR_UNITS: [Unit; 4] = [
    unit("rad",  "Radian", 1.0),
    unit("deg",  "Degree", std::f64::consts::PI / 180.0),
    unit("grad", "Grad",   std::f64::consts::PI / 200.0),
    unit("gon",  "Gon",    std::f64::consts::PI / 200.0),
];

/// Look up a linear unit by name
pub fn linear_unit(name: &str) -> Option<&'static Unit> {
    LINEAR_UNITS.iter().find(|u| u.name == name)
}

/// Look up an angular unit by name
pub fn angular_unit(name: &str) -> Option<&'static Unit> {
    ANGULAR_UNITS.iter().find(|u| u.name == name)
}

/// Look up a unit by name, linear units first. Also accepts the
/// long form descriptions ("Meter", "Degree"), and common spellings
/// thereof, case insensitively
pub fn unit_by_name(name: &str) -> Option<&'static Unit> {
    if let Some(u) = linear_unit(name).or_else(|| angular_unit(name)) {
        return Some(u);
    }
    let lower = name.to_lowercase().replace("metre", "meter");
    let singular = lower.strip_suffix('s').unwrap_or(&lower);
    LINEAR_UNITS
        .iter()
        .chain(ANGULAR_UNITS.iter())
        .find(|u| u.description.to_lowercase() == singular)
}

// ----- T E S T S ---------------------------------------------------------------------
