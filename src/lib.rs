//! Resolution and execution of coordinate operations between reference
//! systems, and solutions of the direct and inverse geodesic problems on
//! the ellipsoid.
//!
//! Two subsystems form the core:
//!
//! - The [`transformer`] module binds a resolved [`CoordinateOperation`]
//!   between two reference systems ([`Crs`]) and runs it over single
//!   points or caller owned buffers, handling unit normalization,
//!   equivalence short-circuiting and error reporting.
//!   [`TransformerGroup`] exposes the complete ranked set of candidate
//!   operations between two systems.
//! - The [`geodesic`] module provides Karney's algorithms for geodesics
//!   ([Kar13](crate::Bibliography::Kar13)) behind the [`Geod`] facade:
//!   forward and inverse solutions, intermediate points, line lengths,
//!   and polygon area and perimeter.
//!
//! Operations are executed by an operator engine living in an
//! execution [`Context`]: an operation is a pipeline of steps,
//! written as `name key=value ... | name key=value ...`.

pub mod catalog;
pub mod context;
pub mod coordinate;
pub mod crs;
pub mod ellipsoid;
pub mod geodesic;
pub mod math;
pub mod op;
pub mod operation;
pub mod transformer;

mod bibliography;
mod inner_op;
mod token;

pub use bibliography::Bibliography;

pub use crate::catalog::CatalogQuery;
pub use crate::catalog::MemoryCatalog;
pub use crate::catalog::OperationCatalog;
pub use crate::context::acquire_context;
pub use crate::context::Context;
pub use crate::context::ContextConfig;
pub use crate::context::ContextHandle;
pub use crate::context::Minimal;
#[cfg(feature = "with_plain")]
pub use crate::context::Plain;
pub use crate::coordinate::coor2d::Coor2D;
pub use crate::coordinate::coor4d::Coor4D;
pub use crate::coordinate::set::CoordinateSet;
pub use crate::coordinate::AngularUnits;
pub use crate::crs::AreaOfUse;
pub use crate::crs::Crs;
pub use crate::ellipsoid::Ellipsoid;
pub use crate::geodesic::Geod;
pub use crate::geodesic::Geodesic;
pub use crate::operation::CoordinateOperation;
pub use crate::transformer::Transformer;
pub use crate::transformer::TransformerGroup;

/// The bread-and-butter, shrink-wrapped and ready to use
pub mod prelude {
    pub use crate::catalog::{CatalogQuery, MemoryCatalog, OperationCatalog};
    pub use crate::context::{acquire_context, Context, ContextConfig, ContextHandle, Minimal};
    #[cfg(feature = "with_plain")]
    pub use crate::context::Plain;
    pub use crate::coordinate::buffer::{ComponentBuffers, InterleavedBuffer};
    pub use crate::coordinate::{coor2d::Coor2D, coor4d::Coor4D, set::CoordinateSet, AngularUnits};
    pub use crate::crs::{AreaOfInterest, AreaOfUse, Axis, AxisDirection, Crs, CrsKind, Equivalence};
    pub use crate::ellipsoid::Ellipsoid;
    pub use crate::geodesic::{
        Geod, Geodesic, GeodesicLine, IntermediateFlags, NptsRounding, PolygonArea, Spacing,
    };
    pub use crate::op::{CoordUnit, OpHandle};
    pub use crate::operation::{CoordinateOperation, GridInfo, OperationKind};
    pub use crate::transformer::{
        TransformDirection, TransformOptions, Transformer, TransformerGroup, TransformerOptions,
    };
    pub use crate::Direction;
    pub use crate::Direction::Fwd;
    pub use crate::Direction::Inv;
    pub use crate::Error;

    #[cfg(test)]
    pub fn some_basic_coor4dinates() -> [Coor4D; 2] {
        let copenhagen = Coor4D::raw(55., 12., 0., 0.);
        let stockholm = Coor4D::raw(59., 18., 0., 0.);
        [copenhagen, stockholm]
    }

    #[cfg(test)]
    pub fn some_basic_coor2dinates() -> [Coor2D; 2] {
        let copenhagen = Coor2D::raw(55., 12.);
        let stockholm = Coor2D::raw(59., 18.);
        [copenhagen, stockholm]
    }
}

/// Preludium for implementation of user defined operators and contexts
pub mod authoring {
    pub use crate::prelude::*;

    pub use crate::context::BUILTIN_ADAPTORS;
    pub use crate::inner_op::{InnerOp, OpConstructor};
    pub use crate::op::{Op, OpDescriptor, OpParameter, ParsedParameters, RawParameters};
    pub use crate::token::Tokenize;

    pub use log::{debug, error, info, trace, warn};
    pub use std::collections::BTreeMap;
}

/// The error type of all fallible operations in the crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("i/o error")]
    Io(#[from] std::io::Error),

    #[error("error: {0}")]
    General(&'static str),

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("{0}: {1}")]
    Operator(&'static str, &'static str),

    #[error("operator {0} not found{1}")]
    NotFound(String, String),

    #[error("recursion too deep for {0}, at {1}")]
    Recursion(String, String),

    #[error("missing required parameter {0}")]
    MissingParam(String),

    #[error("malformed value for parameter {0}: {1}")]
    BadParam(String, String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("operator {0} is not invertible")]
    NonInvertible(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("no coordinate operation found from {0} to {1}")]
    OperationNotFound(String, String),

    #[error("buffer length mismatch (expected {expected}, found {found})")]
    BufferLengthMismatch { expected: usize, found: usize },

    #[error("undefined transform: {0}")]
    UndefinedTransform(String),

    #[error("transform error: {0}")]
    Transform(String),

    #[error("operation {0} cannot be instantiated")]
    NotInstantiable(String),

    #[error("unknown error")]
    Unknown,
}

/// `Fwd`: Indicate that a two-way operator, function, or method,
/// should run in the *forward* direction.
/// `Inv`: Indicate that a two-way operator, function, or method,
/// should run in the *inverse* direction.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Direction {
    Fwd,
    Inv,
}

impl Direction {
    /// The opposite direction
    #[must_use]
    pub fn flip(self) -> Direction {
        match self {
            Direction::Fwd => Direction::Inv,
            Direction::Inv => Direction::Fwd,
        }
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let e = Error::BufferLengthMismatch {
            expected: 5,
            found: 3,
        };
        assert_eq!(e.to_string(), "buffer length mismatch (expected 5, found 3)");
        let e = Error::OperationNotFound("EPSG:4326".into(), "EPSG:3034".into());
        assert!(e.to_string().contains("EPSG:3034"));
        assert_eq!(Direction::Fwd.flip(), Direction::Inv);
    }
}
