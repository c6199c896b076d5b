use crate::authoring::*;

/// The fundamental elements of an operator (i.e. everything but steps and args)
#[derive(Debug, Default, Clone)]
pub struct OpDescriptor {
    pub definition: String,
    pub steps: Vec<String>,
    pub invertible: bool,
    pub inverted: bool,
    /// Units of the forward operation: input, output
    pub units: [CoordUnit; 2],
    pub fwd: InnerOp,
    pub inv: InnerOp,
}

impl OpDescriptor {
    pub fn new(definition: &str, fwd: InnerOp, inv: Option<InnerOp>) -> OpDescriptor {
        let definition = definition.to_string();
        let steps = definition.split_into_steps().0;
        let invertible = inv.is_some();
        let inverted = false; // Handled higher up in the call hierarchy
        let inv = inv.unwrap_or_default();
        OpDescriptor {
            definition,
            steps,
            invertible,
            inverted,
            units: [CoordUnit::Any, CoordUnit::Any],
            fwd,
            inv,
        }
    }

    /// The unit expected in the first two coordinate dimensions, when the
    /// operator is applied in `direction`
    pub fn input_unit(&self, direction: Direction) -> CoordUnit {
        if (direction == Direction::Fwd) != self.inverted {
            return self.units[0];
        }
        self.units[1]
    }

    /// The unit delivered in the first two coordinate dimensions, when the
    /// operator is applied in `direction`
    pub fn output_unit(&self, direction: Direction) -> CoordUnit {
        if (direction == Direction::Fwd) != self.inverted {
            return self.units[1];
        }
        self.units[0]
    }
}

// ----- T E S T S ---------------------------------------------------------------------
