use crate::backend::{BackendHandle, MemoryBackend};
use crate::codec::encode_settings;
use crate::config::ClientSettings;
use crate::error::ConstructionError;

use std::sync::Arc;

fn settings_envelope() -> String {
    encode_settings(&ClientSettings::default()).unwrap()
}

/// **VALUE**: Verifies dropping a held handle releases it exactly once.
///
/// **WHY THIS MATTERS**: Early returns and `?` exits never call release explicitly.
/// Drop is the only thing standing between them and a leaked backend handle.
///
/// **BUG THIS CATCHES**: Would catch a missing Drop impl (leak) or one that releases
/// without clearing the slot (double release).
#[test]
fn given_acquired_handle_when_dropped_then_released_once() {
    // GIVEN: A held handle
    let backend = Arc::new(MemoryBackend::new());
    let handle = BackendHandle::acquire(Arc::clone(&backend), &settings_envelope()).unwrap();
    assert_eq!(backend.live_handles(), 1);

    // WHEN: Dropping it
    drop(handle);

    // THEN: One release, nothing live
    assert_eq!(backend.released_handles(), 1);
    assert_eq!(backend.live_handles(), 0);
}

/// **VALUE**: Verifies explicit release is not followed by a second release on drop.
///
/// **BUG THIS CATCHES**: Would catch release() forgetting to take the handle out of the slot.
#[test]
fn given_acquired_handle_when_released_explicitly_then_not_released_again() {
    let backend = Arc::new(MemoryBackend::new());
    let handle = BackendHandle::acquire(Arc::clone(&backend), &settings_envelope()).unwrap();

    handle.release();

    assert_eq!(backend.released_handles(), 1);
    assert_eq!(backend.live_handles(), 0);
}

/// **VALUE**: Verifies a failed init reports the backend's message and holds nothing.
///
/// **WHY THIS MATTERS**: There is no handle to release after a failed init. Releasing
/// anyway would hand the backend a handle it never issued.
///
/// **BUG THIS CATCHES**: Would catch acquire() losing the backend message or calling release.
#[test]
fn given_refusing_backend_when_acquired_then_backend_init_error_and_no_release() {
    // GIVEN: A backend whose init fails
    let backend = Arc::new(MemoryBackend::refusing_init("identity server unreachable"));

    // WHEN: Acquiring a handle
    let result = BackendHandle::acquire(Arc::clone(&backend), &settings_envelope());

    // THEN: BackendInit error with the message, no release call
    match result {
        Err(ConstructionError::BackendInit { message, .. }) => {
            assert_eq!(message, "identity server unreachable");
        }
        other => panic!("Expected BackendInit, got {other:?}"),
    }
    assert_eq!(backend.released_handles(), 0);
}

#[tokio::test]
async fn given_held_handle_when_invoked_then_backend_answers() {
    let backend = Arc::new(MemoryBackend::new());
    let handle = BackendHandle::acquire(Arc::clone(&backend), &settings_envelope()).unwrap();

    let raw = handle.invoke("project_list", "not a command").await.unwrap();

    assert!(raw.contains(r#""success":false"#));
    assert!(raw.contains("invalid_request"));
    assert_eq!(backend.invocation_count(), 1);
}
