use super::*;

/// An in-memory catalog of registered operations.
///
/// Operations are registered in their forward sense. A query in the
/// reverse sense is answered with the reversed operation, provided it has
/// an inverse. Identical systems are preferred when deciding the sense of
/// an operation. Failing that, systems are matched by equivalence, so
/// renamed or re-identified systems find the same operations.
#[derive(Debug, Default, Clone)]
pub struct MemoryCatalog {
    operations: Vec<CoordinateOperation>,
}

impl MemoryCatalog {
    #[must_use]
    pub fn new() -> MemoryCatalog {
        MemoryCatalog::default()
    }

    /// Register `op`. Fails unless its source and target systems are set
    pub fn register(&mut self, op: CoordinateOperation) -> Result<(), Error> {
        if op.source_crs().is_none() || op.target_crs().is_none() {
            return Err(Error::MissingParam(format!(
                "source and target systems of {}",
                op.name()
            )));
        }
        trace!("MemoryCatalog: registering {}", op.name());
        self.operations.push(op);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

fn relation(a: Option<&Crs>, b: &Crs) -> Equivalence {
    a.map_or(Equivalence::Unrelated, |a| a.equivalence(b))
}

impl OperationCatalog for MemoryCatalog {
    fn operations(&self, source: &Crs, target: &Crs) -> Result<Vec<CoordinateOperation>, Error> {
        use Equivalence::*;
        let mut found = Vec::new();
        for op in &self.operations {
            let forward = (relation(op.source_crs(), source), relation(op.target_crs(), target));
            let reverse = (relation(op.source_crs(), target), relation(op.target_crs(), source));

            // Identical systems settle the direction. Equivalence only
            // decides when neither direction is an identical match, and
            // never in the sense contradicting an identical end point.
            let (use_forward, use_reverse) = match (forward, reverse) {
                ((Identical, Identical), _) => (true, false),
                (_, (Identical, Identical)) => (false, true),
                _ => {
                    let related = |(a, b): (Equivalence, Equivalence)| a != Unrelated && b != Unrelated;
                    (
                        related(forward) && reverse.1 != Identical && reverse.0 != Identical,
                        related(reverse) && forward.0 != Identical && forward.1 != Identical,
                    )
                }
            };

            if use_forward {
                found.push(op.clone());
            } else if use_reverse && op.has_inverse() {
                found.push(op.reversed());
            }
        }
        Ok(found)
    }
}

// ----- T E S T S ---------------------------------------------------------------------
