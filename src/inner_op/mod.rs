use crate::authoring::*;

// ----- B U I L T I N   O P E R A T O R S ---------------------------------------------

// The operators available in every context. Operators needed by catalog
// supplied definitions beyond these are registered at run time, through
// `Context::register_op`

mod adapt;
mod addone;
mod axisswap;
mod cart;
mod helmert;
mod merc;
mod noop;
pub(crate) mod pipeline; // Needed by Op for instantiation
mod unitconvert;
pub(crate) mod units; // Also used for axis unit lookup in `crs`

#[rustfmt::skip]
const BUILTIN_OPERATORS: [(&str, OpConstructor); 15] = [
    ("adapt",        OpConstructor(adapt::new)),
    ("addone",       OpConstructor(addone::new)),
    ("axisswap",     OpConstructor(axisswap::new)),
    ("cart",         OpConstructor(cart::new)),
    ("helmert",      OpConstructor(helmert::new)),
    ("merc",         OpConstructor(merc::new)),
    ("webmerc",      OpConstructor(merc::webmerc)),
    ("unitconvert",  OpConstructor(unitconvert::new)),

    // Pipeline handler
    ("pipeline",     OpConstructor(pipeline::new)),

    // Some commonly used noop-aliases
    ("noop",         OpConstructor(noop::new)),
    ("null",         OpConstructor(noop::new)),
    ("longlat",      OpConstructor(noop::new)),
    ("latlon",       OpConstructor(noop::new)),
    ("latlong",      OpConstructor(noop::new)),
    ("lonlat",       OpConstructor(noop::new)),
];

/// The constructor of the built in operator `name`
pub(crate) fn builtin(name: &str) -> Result<OpConstructor, Error> {
    BUILTIN_OPERATORS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, constructor)| *constructor)
        .ok_or_else(|| Error::NotFound(name.to_string(), String::default()))
}

// ----- S T R U C T   O P C O N S T R U C T O R ---------------------------------------

/// Instantiates an operator from its raw parameters, using `ctx` for
/// macro and ellipsoid look-ups
#[derive(Clone, Copy)]
pub struct OpConstructor(pub fn(args: &RawParameters, ctx: &dyn Context) -> Result<Op, Error>);

impl core::fmt::Debug for OpConstructor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "OpConstructor")
    }
}

// ----- S T R U C T   I N N E R O P ---------------------------------------------------

/// The numerical kernel of one direction of an operator, transforming
/// `operands` in place. Returns the number of tuples transformed. The
/// tuples failing are set to NaN
#[derive(Clone, Copy)]
pub struct InnerOp(pub fn(op: &Op, ctx: &dyn Context, operands: &mut dyn CoordinateSet) -> usize);

impl core::fmt::Debug for InnerOp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "InnerOp")
    }
}

impl Default for InnerOp {
    fn default() -> InnerOp {
        InnerOp(noop_placeholder)
    }
}

// Stands in for the inverse of non-invertible operators, which are never
// called in that direction: `Op::op` rejects inverted instantiations
fn noop_placeholder(_op: &Op, _ctx: &dyn Context, _operands: &mut dyn CoordinateSet) -> usize {
    0
}
