use std::path::PathBuf;
use std::rc::Rc;

/// Environment variable holding a list of resource directories,
/// separated by `;` (or `:` on non-Windows platforms)
pub const DATA_ENV: &str = "GEOTRANS_DATA";
/// Environment variable enabling network access when set to `ON`, `1` or `true`
pub const NETWORK_ENV: &str = "GEOTRANS_NETWORK";
/// Environment variable naming a certificate authority bundle
pub const CA_BUNDLE_ENV: &str = "GEOTRANS_CA_BUNDLE";

/// The configurable elements of an execution context.
///
/// A freshly acquired context inherits the configuration cached by the
/// thread's [`ContextPool`](super::ContextPool).
#[derive(Debug, Clone, Default)]
pub struct ContextConfig {
    /// Directories searched for resources, in order
    pub search_paths: Vec<PathBuf>,
    /// Whether resources may be fetched over the network
    pub network_enabled: bool,
    /// Certificate authority bundle used for network access
    pub ca_bundle_path: Option<PathBuf>,
    /// Receiver of diagnostic messages, in addition to the `log` facade
    pub diagnostics: Option<Diagnostics>,
}

impl ContextConfig {
    /// Configuration as given by the `GEOTRANS_*` environment variables
    pub fn from_env() -> ContextConfig {
        let mut config = ContextConfig::default();
        if let Ok(paths) = std::env::var(DATA_ENV) {
            config.search_paths = split_path_list(&paths);
        }
        if let Ok(network) = std::env::var(NETWORK_ENV) {
            config.network_enabled = matches!(
                network.trim().to_lowercase().as_str(),
                "on" | "1" | "true" | "yes"
            );
        }
        if let Ok(bundle) = std::env::var(CA_BUNDLE_ENV) {
            if !bundle.trim().is_empty() {
                config.ca_bundle_path = Some(PathBuf::from(bundle.trim()));
            }
        }
        config
    }

    #[must_use]
    pub fn with_search_paths(mut self, paths: &[PathBuf]) -> ContextConfig {
        self.search_paths = paths.to_vec();
        self
    }

    #[must_use]
    pub fn with_network(mut self, enabled: bool) -> ContextConfig {
        self.network_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> ContextConfig {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Emit `message` through the `log` facade, and to the installed
    /// diagnostic callback, if any
    pub fn report(&self, level: log::Level, message: &str) {
        log::log!(level, "{message}");
        if let Some(diagnostics) = &self.diagnostics {
            (diagnostics.0)(level, message);
        }
    }
}

fn split_path_list(paths: &str) -> Vec<PathBuf> {
    let separators: &[char] = if cfg!(windows) { &[';'] } else { &[';', ':'] };
    paths
        .split(separators)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// A diagnostic callback.
///
/// The reference counted closure makes any context holding one
/// impossible to send to another thread.
#[derive(Clone)]
pub struct Diagnostics(Rc<dyn Fn(log::Level, &str)>);

impl Diagnostics {
    pub fn new(callback: impl Fn(log::Level, &str) + 'static) -> Diagnostics {
        Diagnostics(Rc::new(callback))
    }
}

// Cannot autoderive the Debug trait
impl core::fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Diagnostics")
    }
}

// ----- T E S T S ------------------------------------------------------------------
