/// One entry in the parameter table (the *gamut*) of an operator.
///
/// Entries with a `default` of `None` are required, all others optional.
/// A `Flag` is set by its mere presence in the definition, so it carries
/// no default.
#[derive(Debug)]
pub enum OpParameter {
    Flag { key: &'static str },
    /// Non-negative integers
    Natural {
        key: &'static str,
        default: Option<usize>,
    },
    Integer {
        key: &'static str,
        default: Option<i64>,
    },
    Real {
        key: &'static str,
        default: Option<f64>,
    },
    /// Comma separated list of reals
    Series {
        key: &'static str,
        default: Option<&'static str>,
    },
    Text {
        key: &'static str,
        default: Option<&'static str>,
    },
}

impl OpParameter {
    /// The parameter name, as written in operator definitions
    pub fn key(&self) -> &'static str {
        match *self {
            OpParameter::Flag { key }
            | OpParameter::Natural { key, .. }
            | OpParameter::Integer { key, .. }
            | OpParameter::Real { key, .. }
            | OpParameter::Series { key, .. }
            | OpParameter::Text { key, .. } => key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys() {
        let gamut = [
            OpParameter::Flag { key: "inv" },
            OpParameter::Real { key: "x", default: Some(0.) },
            OpParameter::Text { key: "order", default: None },
        ];
        let keys: Vec<&str> = gamut.iter().map(OpParameter::key).collect();
        assert_eq!(keys, ["inv", "x", "order"]);
    }
}
