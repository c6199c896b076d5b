use crate::authoring::*;
use std::path::PathBuf;

// ----- T H E   P L A I N   C O N T E X T ---------------------------------------------

/// A context supporting built in and run-time defined operators, and macros
/// read from resource files in a list of search paths.
///
/// The search paths are the ones explicitly configured (through
/// [`ContextConfig`] or the `GEOTRANS_DATA` environment variable), followed by
/// `./geotrans` and the platform's local data directory, e.g.
/// `$HOME/.local/share/geotrans` on Linux. Explicitly configured paths must
/// exist, the default ones need not.
#[derive(Debug)]
pub struct Plain {
    constructors: BTreeMap<String, OpConstructor>,
    resources: BTreeMap<String, String>,
    operators: BTreeMap<OpHandle, Op>,
    paths: Vec<PathBuf>,
    config: ContextConfig,
}

const BAD_ID_MESSAGE: Error = Error::General("Plain: Unknown operator id");

impl Default for Plain {
    fn default() -> Plain {
        Plain {
            constructors: BTreeMap::new(),
            resources: BTreeMap::new(),
            operators: BTreeMap::new(),
            paths: default_paths(),
            config: ContextConfig::default(),
        }
    }
}

fn default_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let localpath: PathBuf = [".", "geotrans"].iter().collect();
    paths.push(localpath);

    if let Some(mut userpath) = dirs::data_local_dir() {
        userpath.push("geotrans");
        paths.push(userpath);
    }
    paths
}

fn search_paths(config: &ContextConfig) -> Result<Vec<PathBuf>, Error> {
    let mut paths = Vec::new();
    for path in &config.search_paths {
        if !path.is_dir() {
            return Err(Error::Configuration(format!(
                "resource directory {} cannot be located",
                path.display()
            )));
        }
        paths.push(path.clone());
    }
    paths.extend(default_paths());
    Ok(paths)
}

impl Plain {
    /// A `Plain` context using `config`. Fails with `Error::Configuration`
    /// if any of the configured search paths is not an existing directory.
    pub fn with_config(config: ContextConfig) -> Result<Plain, Error> {
        let mut ctx = Plain::new();
        ctx.configure(config)?;
        Ok(ctx)
    }

    /// The directories searched for resources, in order
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl Context for Plain {
    fn new() -> Plain {
        let mut ctx = Plain::default();
        for item in BUILTIN_ADAPTORS {
            ctx.register_resource(item.0, item.1);
        }
        ctx
    }

    fn op(&mut self, definition: &str) -> Result<OpHandle, Error> {
        let op = Op::new(definition, self).map_err(|e| {
            self.config
                .report(log::Level::Debug, &format!("Plain: {definition}: {e}"));
            e
        })?;
        let id = op.id;
        self.operators.insert(id, op);
        Ok(id)
    }

    fn apply(
        &self,
        op: OpHandle,
        direction: Direction,
        operands: &mut dyn CoordinateSet,
    ) -> Result<usize, Error> {
        let op = self.operators.get(&op).ok_or(BAD_ID_MESSAGE)?;
        Ok(op.apply(self, operands, direction))
    }

    fn release(&mut self, op: OpHandle) -> bool {
        self.operators.remove(&op).is_some()
    }

    fn descriptor(&self, op: OpHandle) -> Result<&OpDescriptor, Error> {
        let op = self.operators.get(&op).ok_or(BAD_ID_MESSAGE)?;
        Ok(&op.descriptor)
    }

    fn params(&self, op: OpHandle, index: usize) -> Result<&ParsedParameters, Error> {
        let op = self.operators.get(&op).ok_or(BAD_ID_MESSAGE)?;
        super::step_params(op, index)
    }

    fn globals(&self) -> BTreeMap<String, String> {
        BTreeMap::from([("ellps".to_string(), "GRS80".to_string())])
    }

    fn register_op(&mut self, name: &str, constructor: OpConstructor) {
        self.constructors.insert(String::from(name), constructor);
    }

    fn get_op(&self, name: &str) -> Result<OpConstructor, Error> {
        if let Some(result) = self.constructors.get(name) {
            return Ok(OpConstructor(result.0));
        }

        Err(Error::NotFound(
            name.to_string(),
            ": User defined constructor".to_string(),
        ))
    }

    fn register_resource(&mut self, name: &str, definition: &str) {
        self.resources
            .insert(String::from(name), String::from(definition));
    }

    fn get_resource(&self, name: &str) -> Result<String, Error> {
        // Run-time defined resources need not carry the ':'-sigil,
        // so look there before checking the syntax
        if let Some(result) = self.resources.get(name) {
            return Ok(result.to_string());
        }

        let Some((prefix, suffix)) = name.split_once(':') else {
            return Err(Error::BadParam(
                "needing prefix:suffix format".to_string(),
                name.to_string(),
            ));
        };
        if suffix.contains(':') {
            return Err(Error::BadParam(
                "needing prefix:suffix format".to_string(),
                name.to_string(),
            ));
        }

        let resource = format!("{prefix}_{suffix}.resource");
        for path in &self.paths {
            let mut full_path = path.clone();
            full_path.push("resources");
            full_path.push(&resource);
            if let Ok(result) = std::fs::read_to_string(&full_path) {
                trace!("Plain: found {name} in {}", full_path.display());
                return Ok(result.trim().to_string());
            }
        }

        Err(Error::NotFound(
            name.to_string(),
            ": User defined resource".to_string(),
        ))
    }

    fn config(&self) -> &ContextConfig {
        &self.config
    }

    fn configure(&mut self, config: ContextConfig) -> Result<(), Error> {
        let paths = search_paths(&config).map_err(|e| {
            config.report(log::Level::Error, &e.to_string());
            e
        })?;
        self.paths = paths;
        self.config = config;
        Ok(())
    }
}

// ----- T E S T S ------------------------------------------------------------------
