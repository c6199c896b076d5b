use crate::authoring::*;

mod config;
mod minimal;
#[cfg(feature = "with_plain")]
mod plain;
mod pool;

pub use config::ContextConfig;
pub use config::Diagnostics;
pub use minimal::Minimal;
#[cfg(feature = "with_plain")]
pub use plain::Plain;
pub use pool::acquire_context;
pub use pool::replace_pool;
pub use pool::set_ca_bundle_path;
pub use pool::set_network_enabled;
pub use pool::set_search_paths;
pub use pool::ContextFactory;
pub use pool::ContextHandle;
pub use pool::ContextPool;

// ----- T H E   C O N T E X T   T R A I T ---------------------------------------------

/// The `Context` trait defines the mode of communication between the operator
/// engine and its surroundings: configuration, resources (macros), user defined
/// operators, and the instantiated operators themselves.
///
/// A context is confined to the thread that created it. See
/// [`acquire_context`] for the per-thread cached instance.
pub trait Context {
    /// In general, implementations should make sure that `new` differs from `default`
    /// only by adding access to the builtin adaptors (`geo:in`, `gis:out` etc.)
    fn new() -> Self
    where
        Self: Sized;

    /// Instantiate the operation given by `definition`
    fn op(&mut self, definition: &str) -> Result<OpHandle, Error>;

    /// Apply operation `op` to `operands`. Returns the number of successfully
    /// transformed coordinate tuples. Failed tuples are set to NaN.
    fn apply(
        &self,
        op: OpHandle,
        direction: Direction,
        operands: &mut dyn CoordinateSet,
    ) -> Result<usize, Error>;

    /// Release the resources held by the instantiation of `op`.
    /// Returns `false` if `op` was not known by the context.
    fn release(&mut self, op: OpHandle) -> bool;

    /// The descriptive elements of an instantiated operator: definition,
    /// steps, invertibility, and angular unit conventions
    fn descriptor(&self, op: OpHandle) -> Result<&OpDescriptor, Error>;

    /// The parsed parameters of step `index` of an instantiated operator
    fn params(&self, op: OpHandle, index: usize) -> Result<&ParsedParameters, Error>;

    /// Globally defined default values (typically just `ellps=GRS80`)
    fn globals(&self) -> BTreeMap<String, String>;

    /// Register a new user-defined operator
    fn register_op(&mut self, name: &str, constructor: OpConstructor);
    /// Register a new user-defined resource (macro, ellipsoid parameter set...)
    fn register_resource(&mut self, name: &str, definition: &str);

    /// Helper for the `Op` instantiation logic in `Op::op(...)`
    fn get_op(&self, name: &str) -> Result<OpConstructor, Error>;
    /// Helper for the `Op` instantiation logic in `Op::op(...)`
    fn get_resource(&self, name: &str) -> Result<String, Error>;

    /// The current configuration
    fn config(&self) -> &ContextConfig;
    /// Replace the configuration. Fails if the new configuration refers to
    /// resources that cannot be located
    fn configure(&mut self, config: ContextConfig) -> Result<(), Error>;
}

// Help context providers provide canonically named, built in coordinate adaptors
#[rustfmt::skip]
pub const BUILTIN_ADAPTORS: [(&str, &str); 8] = [
    ("geo:in",  "adapt from=neut_deg"),
    ("geo:out", "adapt to=neut_deg"  ),
    ("gis:in",  "adapt from=enut_deg"),
    ("gis:out", "adapt to=enut_deg"  ),
    ("neu:in",  "adapt from=neut"    ),
    ("neu:out", "adapt to=neut"      ),
    ("enu:in",  "adapt from=enut"    ),
    ("enu:out", "adapt to=enut"      ),
];

// Shared by the step-introspection implementations of the built in contexts
pub(crate) fn step_params(op: &Op, index: usize) -> Result<&ParsedParameters, Error> {
    // Leaf level?
    if op.steps.is_empty() {
        if index > 0 {
            return Err(Error::General("Bad step index"));
        }
        return Ok(&op.params);
    }

    // Not leaf level
    op.steps
        .get(index)
        .map(|step| &step.params)
        .ok_or(Error::General("Bad step index"))
}
