//! The three entry points a secrets backend exposes, and the owned handle
//! that pairs `init` with exactly one `release`.

pub mod handle;
pub mod memory;
pub(crate) mod password;

pub use handle::BackendHandle;
pub use memory::MemoryBackend;

use std::future::Future;
use std::sync::Arc;

/// A secrets backend speaking the JSON envelope protocol.
///
/// `invoke` answers every command with a response envelope, including failures;
/// the backend never signals an application error any other way.
pub trait Backend: Send + Sync + 'static {
    type Handle: Send + Sync + 'static;

    /// Acquire a handle from a settings envelope. The error is the backend's own message.
    fn init(&self, settings_envelope: &str) -> Result<Self::Handle, String>;

    fn invoke(
        &self,
        handle: &Self::Handle,
        command_envelope: &str,
    ) -> impl Future<Output = String> + Send;

    /// Must be called at most once per handle.
    fn release(&self, handle: Self::Handle);
}

impl<T: Backend> Backend for Arc<T> {
    type Handle = T::Handle;

    fn init(&self, settings_envelope: &str) -> Result<Self::Handle, String> {
        (**self).init(settings_envelope)
    }

    fn invoke(
        &self,
        handle: &Self::Handle,
        command_envelope: &str,
    ) -> impl Future<Output = String> + Send {
        (**self).invoke(handle, command_envelope)
    }

    fn release(&self, handle: Self::Handle) {
        (**self).release(handle)
    }
}
