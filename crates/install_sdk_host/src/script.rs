//! Script injection contract used to load the vendor JS-SDK.

use std::{future::Future, pin::Pin};

/// Object-safe boxed future used by [`ScriptLoader`].
pub type ScriptLoadFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service that injects an external script and waits for it to load.
pub trait ScriptLoader {
    /// Resolves when the script's `load` event fires; errors on the `error` event.
    fn load_script<'a>(&'a self, url: &'a str) -> ScriptLoadFuture<'a, Result<(), String>>;
}
