//! Test helpers for client integration tests.
//!
//! - `ScriptedBackend`: answers with canned envelopes and records what it received
//! - Fixtures: a well-formed access token, organizations, ready-made clients

use sm_client_core::SecretsManagerClient;
use sm_client_core::backend::{Backend, MemoryBackend};
use sm_client_core::config::ClientConfig;
use sm_models::OrganizationId;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use uuid::Uuid;

/// Well-formed machine-account token (version 0).
pub const TEST_ACCESS_TOKEN: &str = "0.ec2c1d46-6a4b-4751-a310-af9601317f2d.C2IgxjjLF7qSshsbwe8JGcbM075YXw:X8vbvA0bduihIDe/qrzIQQ==";

/// A second token, for a different service account.
pub const OTHER_ACCESS_TOKEN: &str = "0.5a7f1c2e-9b3d-4e8f-a1b2-c3d4e5f60718.Zm9vYmFyYmF6cXV4:c2Vjb25kLWtleQ==";

const SCRIPT_EXHAUSTED: &str =
    r#"{"success":false,"error_message":"script exhausted","error_code":"internal"}"#;

pub const LOGIN_OK: &str = r#"{"success":true,"data":{"authenticated":true}}"#;

pub fn org_a() -> OrganizationId {
    OrganizationId::from_uuid(Uuid::from_u128(0xA))
}

pub fn org_b() -> OrganizationId {
    OrganizationId::from_uuid(Uuid::from_u128(0xB))
}

/// Memory backend where TEST_ACCESS_TOKEN may use org A and OTHER_ACCESS_TOKEN org B.
pub fn memory_backend() -> Arc<MemoryBackend> {
    Arc::new(
        MemoryBackend::new()
            .with_access_token(TEST_ACCESS_TOKEN, [org_a()])
            .with_access_token(OTHER_ACCESS_TOKEN, [org_b()]),
    )
}

pub fn client<B: Backend>(backend: B) -> SecretsManagerClient<B> {
    SecretsManagerClient::new(backend, &ClientConfig::default()).expect("client construction")
}

pub async fn logged_in_client(
    backend: &Arc<MemoryBackend>,
) -> SecretsManagerClient<Arc<MemoryBackend>> {
    let mut client = client(Arc::clone(backend));
    client.login(TEST_ACCESS_TOKEN).await.expect("login");
    client
}

/// Backend that answers from a script, in order, and records every envelope it receives.
///
/// When the script runs out it answers with an `internal` failure.
#[derive(Default)]
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<String>>,
    received: Mutex<Vec<String>>,
    released: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedBackend {
    pub fn new<S: Into<String>>(responses: impl IntoIterator<Item = S>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl Backend for ScriptedBackend {
    type Handle = ();

    fn init(&self, _settings_envelope: &str) -> Result<Self::Handle, String> {
        Ok(())
    }

    async fn invoke(&self, _handle: &Self::Handle, command_envelope: &str) -> String {
        self.received
            .lock()
            .unwrap()
            .push(command_envelope.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| String::from(SCRIPT_EXHAUSTED))
    }

    fn release(&self, _handle: Self::Handle) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}
