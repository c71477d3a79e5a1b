//! Port interfaces for backend access
//!
//! These traits define the boundaries between the request-execution core
//! and infrastructure implementations.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use certgate_domain::{Channel, RawOutcome, RequestDescriptor, TransportError};

/// One way of delivering a request to the backend.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Channel tag reported on outcomes and errors
    fn channel(&self) -> Channel;

    /// Whether an attempt can be made at all (credentials present)
    fn is_available(&self) -> bool;

    /// Execute a request within `timeout`.
    ///
    /// A backend answer of any status is `Ok`; `Err` means no answer was
    /// obtained on this channel.
    async fn execute(
        &self,
        request: &RequestDescriptor,
        timeout: Duration,
    ) -> Result<RawOutcome, TransportError>;
}

/// Static credential-file checks used by diagnostics.
pub trait CredentialInspector: Send + Sync {
    fn file_exists(&self, path: &Path) -> bool;
}

/// Checks the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsCredentialInspector;

impl CredentialInspector for FsCredentialInspector {
    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}
