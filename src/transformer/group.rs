use super::Transformer;
use crate::authoring::*;
use crate::catalog::resolve;

/// All usable candidate operations between two reference systems, bound
/// and ranked best first, along with the candidates that could not be
/// instantiated.
#[derive(Debug)]
pub struct TransformerGroup {
    transformers: Vec<Transformer>,
    unavailable_operations: Vec<CoordinateOperation>,
    best_available: bool,
    // The number of unavailable operations ranked above the best available one
    blocking: usize,
}

impl TransformerGroup {
    /// Fails with `Error::OperationNotFound` if the catalog has no
    /// candidate passing the filters of `options`. Candidates failing to
    /// instantiate are reported as unavailable, not as errors
    pub fn new(
        ctx: &ContextHandle,
        catalog: &dyn OperationCatalog,
        source: &Crs,
        target: &Crs,
        options: &TransformerOptions,
    ) -> Result<TransformerGroup, Error> {
        let candidates = resolve(catalog, source, target, &options.query())?;
        if candidates.is_empty() {
            return Err(Error::OperationNotFound(
                source.name().to_string(),
                target.name().to_string(),
            ));
        }

        let mut transformers = Vec::new();
        let mut unavailable_operations = Vec::new();
        let mut best_available = false;
        let mut blocking = 0;

        for (rank, candidate) in candidates.into_iter().enumerate() {
            if !candidate.is_instantiable() {
                if transformers.is_empty() {
                    blocking += 1;
                }
                unavailable_operations.push(candidate);
                continue;
            }
            match Transformer::from_operation(ctx, candidate.clone().between(source, target), options) {
                Ok(transformer) => {
                    best_available |= rank == 0;
                    transformers.push(transformer);
                }
                Err(e) => {
                    debug!("{}: {e}", candidate.name());
                    if transformers.is_empty() {
                        blocking += 1;
                    }
                    unavailable_operations.push(candidate);
                }
            }
        }

        debug!(
            "{} -> {}: {} transformers, {} unavailable",
            source.name(),
            target.name(),
            transformers.len(),
            unavailable_operations.len()
        );
        let group = TransformerGroup {
            transformers,
            unavailable_operations,
            best_available,
            blocking,
        };
        if !group.best_available {
            let missing: Vec<&str> = group.missing_grids().map(|grid| grid.short_name.as_str()).collect();
            warn!(
                "Best operation from {} to {} unavailable. Missing grids: {}",
                source.name(),
                target.name(),
                missing.join(", ")
            );
        }
        Ok(group)
    }

    /// The instantiated operations, best first
    pub fn transformers(&self) -> &[Transformer] {
        &self.transformers
    }

    /// The operations which could not be instantiated, best first
    pub fn unavailable_operations(&self) -> &[CoordinateOperation] {
        &self.unavailable_operations
    }

    /// True if the best ranked candidate operation could be instantiated
    pub fn best_available(&self) -> bool {
        self.best_available
    }

    /// The grids missing for instantiating the operations ranked above
    /// the best available one. Each grid is listed once
    pub fn missing_grids(&self) -> impl Iterator<Item = &GridInfo> {
        let mut seen = Vec::new();
        self.unavailable_operations
            .iter()
            .take(self.blocking)
            .flat_map(CoordinateOperation::missing_grids)
            .filter(move |grid| {
                if seen.contains(&grid.short_name) {
                    return false;
                }
                seen.push(grid.short_name.clone());
                true
            })
    }
}

// ----- T E S T S ---------------------------------------------------------------------
