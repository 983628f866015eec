#![forbid(unsafe_code)]

//! Document-wide registry.
//!
//! Pages that attach pickers from many places share one registry installed
//! here. The registry holds closures and a boxed host, so it lives in a
//! thread-local: the picker is single-threaded and the UI thread is the
//! document.
//!
//! Listeners run while the registry is borrowed; [`with_registry`] called
//! from inside a listener returns `None` instead of panicking.

use std::cell::RefCell;

use crate::error::PickerError;
use crate::host::Host;
use crate::options::OptionsPatch;
use crate::registry::PickerRegistry;

/// Registry type stored by [`install`].
pub type GlobalRegistry = PickerRegistry<Box<dyn Host>>;

thread_local! {
    static REGISTRY: RefCell<Option<GlobalRegistry>> = const { RefCell::new(None) };
}

/// Install a registry for `host`, returning the one it replaces.
pub fn install(host: impl Host + 'static) -> Option<GlobalRegistry> {
    let host: Box<dyn Host> = Box::new(host);
    install_registry(PickerRegistry::new(host))
}

/// Install a preconfigured registry, returning the one it replaces.
pub fn install_registry(registry: GlobalRegistry) -> Option<GlobalRegistry> {
    REGISTRY.with(|slot| slot.borrow_mut().replace(registry))
}

/// Remove the installed registry.
pub fn uninstall() -> Option<GlobalRegistry> {
    REGISTRY.with(|slot| slot.borrow_mut().take())
}

#[must_use]
pub fn is_installed() -> bool {
    REGISTRY.with(|slot| slot.try_borrow().is_ok_and(|guard| guard.is_some()))
}

/// Run `f` on the installed registry.
///
/// Returns `None` if nothing is installed or the registry is already
/// borrowed further up the stack.
pub fn with_registry<R>(f: impl FnOnce(&mut GlobalRegistry) -> R) -> Option<R> {
    REGISTRY.with(|slot| {
        let mut guard = slot.try_borrow_mut().ok()?;
        guard.as_mut().map(f)
    })
}

/// Merge `patch` into the defaults of the installed registry.
pub fn set_defaults(patch: OptionsPatch) -> Option<Vec<PickerError>> {
    with_registry(|registry| registry.set_defaults(patch))
}
