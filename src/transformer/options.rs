use crate::catalog::CatalogQuery;
use crate::crs::AreaOfInterest;
use crate::{Direction, Error};
use std::str::FromStr;

/// The direction of a transformation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TransformDirection {
    #[default]
    Forward,
    Inverse,
    /// Leave the coordinates untouched
    Identity,
}

impl TransformDirection {
    /// The operator direction. `None` for `Identity`
    pub fn direction(self) -> Option<Direction> {
        match self {
            TransformDirection::Forward => Some(Direction::Fwd),
            TransformDirection::Inverse => Some(Direction::Inv),
            TransformDirection::Identity => None,
        }
    }
}

impl FromStr for TransformDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<TransformDirection, Error> {
        match s.to_lowercase().as_str() {
            "forward" | "fwd" => Ok(TransformDirection::Forward),
            "inverse" | "inv" => Ok(TransformDirection::Inverse),
            "identity" => Ok(TransformDirection::Identity),
            _ => Err(Error::BadParam("direction".to_string(), s.to_string())),
        }
    }
}

/// Per call options for the `transform_*` methods of a
/// [`Transformer`](super::Transformer)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransformOptions {
    pub direction: TransformDirection,
    /// Angular coordinates are given (and returned) in radians rather
    /// than degrees
    pub radians: bool,
    /// Fail the call if any point fails to transform, rather than
    /// substituting a large sentinel value for the failed point
    pub errcheck: bool,
}

impl TransformOptions {
    #[must_use]
    pub fn inverse() -> TransformOptions {
        TransformOptions {
            direction: TransformDirection::Inverse,
            ..Default::default()
        }
    }
}

/// Construction options for [`Transformer`](super::Transformer) and
/// [`TransformerGroup`](super::TransformerGroup)
#[derive(Debug, Clone, PartialEq)]
pub struct TransformerOptions {
    /// Always take and deliver coordinates in the order easting (or
    /// longitude), northing (or latitude), whatever the axis order of
    /// the reference systems
    pub always_xy: bool,
    /// Skip transformations between equivalent (not only identical)
    /// reference systems
    pub skip_equivalent: bool,
    pub area_of_interest: Option<AreaOfInterest>,
    pub authority: Option<String>,
    /// Maximum acceptable accuracy, in metres
    pub accuracy: Option<f64>,
    pub allow_ballpark: bool,
    pub allow_superseded: bool,
}

impl Default for TransformerOptions {
    fn default() -> TransformerOptions {
        TransformerOptions {
            always_xy: false,
            skip_equivalent: false,
            area_of_interest: None,
            authority: None,
            accuracy: None,
            allow_ballpark: true,
            allow_superseded: false,
        }
    }
}

impl TransformerOptions {
    /// The catalog filters implied by the options
    pub fn query(&self) -> CatalogQuery {
        CatalogQuery {
            area_of_interest: self.area_of_interest,
            authority: self.authority.clone(),
            accuracy: self.accuracy,
            allow_ballpark: self.allow_ballpark,
            allow_superseded: self.allow_superseded,
        }
    }
}

// ----- T E S T S ---------------------------------------------------------------------
