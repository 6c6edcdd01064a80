use super::Backend;
use crate::error::{ClosedError, ConstructionError};

use log::{debug, info};

/// Sole owner of one backend handle.
///
/// The handle is released exactly once: by [`BackendHandle::release`], or on drop
/// if that never happened.
pub struct BackendHandle<B: Backend> {
    backend: B,
    handle: Option<B::Handle>,
}

impl<B: Backend> BackendHandle<B> {
    /// Call the backend's `init`. Nothing is held if it fails.
    #[track_caller]
    pub fn acquire(backend: B, settings_envelope: &str) -> Result<Self, ConstructionError> {
        let handle = backend
            .init(settings_envelope)
            .map_err(ConstructionError::backend_init)?;

        debug!("Backend handle acquired");
        Ok(Self {
            backend,
            handle: Some(handle),
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn invoke(
        &self,
        operation: &'static str,
        command_envelope: &str,
    ) -> Result<String, ClosedError> {
        let handle = self
            .handle
            .as_ref()
            .ok_or_else(|| ClosedError::closed(operation))?;

        Ok(self.backend.invoke(handle, command_envelope).await)
    }

    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.backend.release(handle);
            info!("Backend handle released");
        }
    }
}

impl<B: Backend> Drop for BackendHandle<B> {
    fn drop(&mut self) {
        self.release_inner();
    }
}

impl<B: Backend> std::fmt::Debug for BackendHandle<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendHandle")
            .field("held", &self.handle.is_some())
            .finish()
    }
}
