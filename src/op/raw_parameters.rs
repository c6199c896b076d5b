use crate::authoring::*;

// Mutually recursive macros are stopped at this depth
const MAX_RECURSION: usize = 100;

/// Interface between the high level [Op::op()](crate::op::Op) and the low level
/// functionality in the [InnerOp](crate::inner_op::InnerOp)s
///
/// `RawParameters` is the vehicle used by the `Op`erator factory in `Op::op(...)`,
/// to ferry args around from the invocator into the constructor of the individual
/// `InnerOp`s.
///
/// The `InnerOp`constructor typically interprets the contents of
/// `RawParameters`, and converts it into a more runtime friendly instance of
/// `ParsedParameters`.
#[derive(Debug, Default, Clone)]
pub struct RawParameters {
    pub invocation: String,
    pub definition: String,
    pub globals: BTreeMap<String, String>,
    pub recursion_level: usize,
}

impl RawParameters {
    pub fn new(invocation: &str, globals: &BTreeMap<String, String>) -> RawParameters {
        // Remove comments and non-significant whitespace, and rotate prefix
        // modifiers to the end of each step
        let invocation = invocation.split_into_steps().0.join("|");
        let definition = invocation.clone();
        RawParameters {
            invocation,
            definition,
            globals: globals.clone(),
            recursion_level: 0,
        }
    }

    /// Parameters for instantiating a nested definition: a pipeline step, or the
    /// body of a macro. The arguments given to a (non-pipeline) invocation are
    /// handed down as globals, so they can override defaults given in a macro
    /// body, while its name and inversion flag are not.
    pub fn next(&self, definition: &str) -> RawParameters {
        let mut globals = self.globals.clone();
        if !self.definition.is_pipeline() {
            let mut locals = self.definition.split_into_parameters();
            locals.remove("name");
            locals.remove("inv");
            globals.append(&mut locals);
        }

        RawParameters {
            invocation: self.invocation.clone(),
            definition: definition.split_into_steps().0.join("|"),
            globals,
            recursion_level: self.recursion_level + 1,
        }
    }

    pub fn nesting_too_deep(&self) -> bool {
        self.recursion_level > MAX_RECURSION
    }
}

// ----- T E S T S ---------------------------------------------------------------------
