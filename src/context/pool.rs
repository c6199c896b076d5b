use crate::authoring::*;
use std::cell::{Ref, RefCell, RefMut};
use std::path::PathBuf;
use std::rc::Rc;

// ----- T H E   C O N T E X T   H A N D L E -------------------------------------------

/// A shared reference to an execution context.
///
/// The handle is reference counted without atomics, so neither the
/// handle, nor anything holding one, can be sent to another thread.
#[derive(Clone)]
pub struct ContextHandle(Rc<RefCell<Box<dyn Context>>>);

impl ContextHandle {
    pub fn new(ctx: impl Context + 'static) -> ContextHandle {
        ContextHandle::from_boxed(Box::new(ctx))
    }

    pub fn from_boxed(ctx: Box<dyn Context>) -> ContextHandle {
        ContextHandle(Rc::new(RefCell::new(ctx)))
    }

    /// Shared access to the context. Fails while the context is
    /// mutably borrowed
    pub fn borrow(&self) -> Result<Ref<'_, Box<dyn Context>>, Error> {
        self.0
            .try_borrow()
            .map_err(|_| Error::General("Context is in use"))
    }

    /// Exclusive access to the context. Fails while the context is borrowed
    pub fn borrow_mut(&self) -> Result<RefMut<'_, Box<dyn Context>>, Error> {
        self.0
            .try_borrow_mut()
            .map_err(|_| Error::General("Context is in use"))
    }

    /// True if both handles refer to the same context
    pub fn same_context(&self, other: &ContextHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

// Cannot autoderive the Debug trait
impl core::fmt::Debug for ContextHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ContextHandle")
    }
}

// ----- T H E   C O N T E X T   P O O L -----------------------------------------------

/// Blueprint for the creation of execution contexts
#[derive(Clone, Copy)]
pub struct ContextFactory(pub fn(config: ContextConfig) -> Result<Box<dyn Context>, Error>);

// Cannot autoderive the Debug trait
impl core::fmt::Debug for ContextFactory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ContextFactory")
    }
}

#[cfg(feature = "with_plain")]
fn default_factory(config: ContextConfig) -> Result<Box<dyn Context>, Error> {
    Ok(Box::new(Plain::with_config(config)?))
}

#[cfg(not(feature = "with_plain"))]
fn default_factory(config: ContextConfig) -> Result<Box<dyn Context>, Error> {
    Ok(Box::new(Minimal::with_config(config)))
}

/// Lazily creates, then caches, one context. Configuration changes are
/// cached, and applied to the live context, if any.
///
/// Each thread owns a pool, accessed through [`acquire_context`] and the
/// free standing configuration mutators. The pool of the current thread
/// may be replaced using [`replace_pool`], e.g. for injecting a context
/// factory in tests
#[derive(Debug)]
pub struct ContextPool {
    factory: ContextFactory,
    config: ContextConfig,
    context: Option<ContextHandle>,
}

impl Default for ContextPool {
    fn default() -> ContextPool {
        ContextPool::with_factory(ContextFactory(default_factory), ContextConfig::from_env())
    }
}

impl ContextPool {
    /// A pool creating `Plain` contexts (or `Minimal`, without the
    /// `with_plain` feature), configured from the environment
    pub fn new() -> ContextPool {
        ContextPool::default()
    }

    pub fn with_factory(factory: ContextFactory, config: ContextConfig) -> ContextPool {
        ContextPool {
            factory,
            config,
            context: None,
        }
    }

    /// The cached context, created on first call. Creation failure is
    /// not cached: the next call retries
    pub fn acquire(&mut self) -> Result<ContextHandle, Error> {
        if let Some(ctx) = &self.context {
            return Ok(ctx.clone());
        }
        let ctx = (self.factory.0)(self.config.clone()).map_err(|e| {
            self.config
                .report(log::Level::Error, &format!("Context creation failed: {e}"));
            e
        })?;
        debug!("ContextPool: created context");
        let handle = ContextHandle::from_boxed(ctx);
        self.context = Some(handle.clone());
        Ok(handle)
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// True once a context has been created
    pub fn is_active(&self) -> bool {
        self.context.is_some()
    }

    fn update(&mut self, change: impl FnOnce(&mut ContextConfig)) -> Result<(), Error> {
        let mut config = self.config.clone();
        change(&mut config);
        if let Some(ctx) = &self.context {
            ctx.borrow_mut()?.configure(config.clone())?;
        }
        self.config = config;
        Ok(())
    }

    pub fn set_network_enabled(&mut self, enabled: bool) -> Result<(), Error> {
        self.update(|config| config.network_enabled = enabled)
    }

    pub fn set_ca_bundle_path(&mut self, path: Option<PathBuf>) -> Result<(), Error> {
        self.update(|config| config.ca_bundle_path = path)
    }

    /// Fails with `Error::Configuration` (leaving the configuration
    /// unchanged) if the live context cannot locate the directories
    pub fn set_search_paths(&mut self, paths: &[PathBuf]) -> Result<(), Error> {
        self.update(|config| config.search_paths = paths.to_vec())
    }
}

thread_local! {
    static POOL: RefCell<ContextPool> = RefCell::new(ContextPool::new());
}

/// The context of the calling thread, created on first call
pub fn acquire_context() -> Result<ContextHandle, Error> {
    POOL.with(|pool| pool.borrow_mut().acquire())
}

/// Enable or disable network access for the context of the calling thread
pub fn set_network_enabled(enabled: bool) -> Result<(), Error> {
    POOL.with(|pool| pool.borrow_mut().set_network_enabled(enabled))
}

/// Set the certificate authority bundle for the context of the calling thread
pub fn set_ca_bundle_path(path: Option<PathBuf>) -> Result<(), Error> {
    POOL.with(|pool| pool.borrow_mut().set_ca_bundle_path(path))
}

/// Set the resource search paths for the context of the calling thread
pub fn set_search_paths(paths: &[PathBuf]) -> Result<(), Error> {
    POOL.with(|pool| pool.borrow_mut().set_search_paths(paths))
}

/// Replace the context pool of the calling thread, returning the old one
pub fn replace_pool(pool: ContextPool) -> ContextPool {
    POOL.with(|current| current.replace(pool))
}

// ----- T E S T S ------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    thread_local! {
        static CREATED: Cell<usize> = Cell::new(0);
    }

    fn counting_factory(config: ContextConfig) -> Result<Box<dyn Context>, Error> {
        CREATED.with(|c| c.set(c.get() + 1));
        Ok(Box::new(Minimal::with_config(config)))
    }

    fn failing_factory(_config: ContextConfig) -> Result<Box<dyn Context>, Error> {
        Err(Error::Configuration("no resources".to_string()))
    }

    #[test]
    fn lazy_and_cached() -> Result<(), Error> {
        let mut pool = ContextPool::with_factory(ContextFactory(counting_factory), ContextConfig::default());
        assert!(!pool.is_active());
        assert_eq!(CREATED.with(Cell::get), 0);

        let a = pool.acquire()?;
        let b = pool.acquire()?;
        assert!(a.same_context(&b));
        assert_eq!(CREATED.with(Cell::get), 1);
        assert!(pool.is_active());
        Ok(())
    }

    #[test]
    fn configuration_is_inherited() -> Result<(), Error> {
        let mut pool = ContextPool::with_factory(ContextFactory(counting_factory), ContextConfig::default());

        // Before creation: cached only
        pool.set_network_enabled(true)?;
        let ctx = pool.acquire()?;
        assert!(ctx.borrow()?.config().network_enabled);

        // After creation: the live context follows
        pool.set_ca_bundle_path(Some(PathBuf::from("/etc/ssl/certs.pem")))?;
        pool.set_network_enabled(false)?;
        let config = ctx.borrow()?.config().clone();
        assert!(!config.network_enabled);
        assert_eq!(config.ca_bundle_path, Some(PathBuf::from("/etc/ssl/certs.pem")));

        // A busy context cannot be reconfigured
        let busy = ctx.borrow()?;
        assert!(pool.set_network_enabled(true).is_err());
        drop(busy);
        assert!(!pool.config().network_enabled);
        Ok(())
    }

    #[test]
    fn creation_failure() {
        let mut pool = ContextPool::with_factory(ContextFactory(failing_factory), ContextConfig::default());
        assert!(matches!(pool.acquire(), Err(Error::Configuration(_))));
        assert!(!pool.is_active());
    }

    #[test]
    fn thread_confinement() -> Result<(), Error> {
        let previous = replace_pool(ContextPool::with_factory(
            ContextFactory(counting_factory),
            ContextConfig::default(),
        ));
        let here = acquire_context()?;
        assert!(here.same_context(&acquire_context()?));
        set_network_enabled(true)?;
        assert!(here.borrow()?.config().network_enabled);

        // Another thread gets its own pool, and its own context
        let elsewhere = std::thread::spawn(|| {
            replace_pool(ContextPool::with_factory(
                ContextFactory(counting_factory),
                ContextConfig::default(),
            ));
            acquire_context().map(|ctx| ctx.borrow().map(|c| c.config().network_enabled))
        })
        .join()
        .map_err(|_| Error::Unknown)?;
        assert!(matches!(elsewhere, Ok(Ok(false))));

        replace_pool(previous);
        Ok(())
    }
}
