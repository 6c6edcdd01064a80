//! Single path from a typed command to a typed payload.
//!
//! Every operation, login included, goes through [`Dispatcher::dispatch`]:
//!
//! 1. closed client → `ClosedError`
//! 2. command needs a session and there is none → `AuthError`
//! 3. encode, invoke (optionally under a timeout), decode
//! 4. backend failure → `DispatchError::Backend`; undecodable answer → `DispatchError::Malformed`
//!
//! Nothing is retried unless a retry policy is configured, and then only
//! read-only commands that timed out.

use crate::auth::AccessToken;
use crate::backend::{Backend, BackendHandle};
use crate::codec::command::AccessTokenLoginRequest;
use crate::codec::{
    Command, CommandKind, ResponseOutcome, ResponsePayload, decode_response, encode_command,
};
use crate::config::{DispatchConfig, RetryConfig};
use crate::error::{AuthError, ClientError, ClosedError, DispatchError};
use crate::session::{Session, SessionState};

use backoff::{ExponentialBackoff, backoff::Backoff};
use log::{debug, info, warn};
use tokio::time::{sleep as TokioSleep, timeout as TokioTimeout};

pub struct Dispatcher<B: Backend> {
    handle: Option<BackendHandle<B>>,
    session: Session,
    config: DispatchConfig,
}

impl<B: Backend> Dispatcher<B> {
    pub fn new(handle: BackendHandle<B>, config: DispatchConfig) -> Self {
        Self {
            handle: Some(handle),
            session: Session::new(),
            config,
        }
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    /// The backend, while the handle is held.
    pub fn backend(&self) -> Option<&B> {
        self.handle.as_ref().map(BackendHandle::backend)
    }

    /// Release the backend handle and end the session. Later calls do nothing.
    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.session.logout();
            handle.release();
            info!("Dispatcher closed");
        }
    }

    /// Gate checks for `kind`, without dispatching anything.
    ///
    /// Resource clients call this before validating input, so a closed client
    /// or a missing session is reported ahead of bad arguments.
    #[track_caller]
    pub fn ensure_ready(&self, kind: CommandKind) -> Result<(), ClientError> {
        if self.handle.is_none() {
            return Err(ClosedError::closed(kind.as_str()).into());
        }

        if kind.requires_session() {
            self.session.require_authenticated(kind.as_str())?;
        }

        Ok(())
    }

    pub async fn login(&mut self, token: AccessToken) -> Result<(), ClientError> {
        self.ensure_ready(CommandKind::AccessTokenLogin)?;
        self.session.begin_login()?;

        let command = Command::AccessTokenLogin(AccessTokenLoginRequest::new(&token));
        let outcome = self
            .dispatch_expect(command, ResponsePayload::into_login)
            .await?;

        if !outcome.authenticated {
            warn!(
                "Login rejected for service account {}",
                token.service_account_id()
            );
            return Err(AuthError::login_rejected().into());
        }

        self.session.complete_login(token);
        Ok(())
    }

    /// End the session locally. The backend handle stays held until close.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        if self.handle.is_none() {
            return Err(ClosedError::closed("logout").into());
        }

        self.session.logout();
        Ok(())
    }

    pub async fn dispatch(&mut self, command: Command) -> Result<ResponsePayload, ClientError> {
        let kind = command.kind();
        let operation = kind.as_str();

        self.ensure_ready(kind)?;

        let envelope = encode_command(&command)?;
        debug!("Dispatching {operation}");

        let raw = self.invoke(kind, &envelope).await?;

        let outcome = decode_response(kind, &raw).map_err(|e| {
            warn!("Malformed response to {operation}: {e}");
            DispatchError::malformed(operation, e.to_string())
        })?;

        match outcome {
            ResponseOutcome::Success(payload) if payload.kind_matches(kind) => {
                debug!("{operation} succeeded");
                Ok(payload)
            }
            ResponseOutcome::Success(payload) => Err(DispatchError::malformed(
                operation,
                format!("unexpected {} payload", payload.variant_name()),
            )
            .into()),
            ResponseOutcome::Failure { code, message } => {
                debug!("{operation} failed: {code}");
                if code.is_auth_failure() && kind.requires_session() {
                    self.session.expire();
                }
                Err(DispatchError::backend(operation, code, message).into())
            }
        }
    }

    /// Dispatch and take the payload variant `extract` accepts.
    pub async fn dispatch_expect<T>(
        &mut self,
        command: Command,
        extract: fn(ResponsePayload) -> Option<T>,
    ) -> Result<T, ClientError> {
        let operation = command.kind().as_str();
        let payload = self.dispatch(command).await?;
        let variant = payload.variant_name();

        extract(payload).ok_or_else(|| {
            DispatchError::malformed(operation, format!("unexpected {variant} payload")).into()
        })
    }

    async fn invoke(&self, kind: CommandKind, envelope: &str) -> Result<String, ClientError> {
        match (&self.config.retry, kind.is_read_only()) {
            (Some(retry), true) => self.invoke_with_retry(kind, envelope, retry).await,
            _ => self.invoke_once(kind, envelope).await,
        }
    }

    async fn invoke_with_retry(
        &self,
        kind: CommandKind,
        envelope: &str,
        retry: &RetryConfig,
    ) -> Result<String, ClientError> {
        let mut backoff = ExponentialBackoff {
            initial_interval: retry.initial_interval(),
            max_elapsed_time: Some(retry.max_elapsed()),
            ..Default::default()
        };
        backoff.reset();

        loop {
            match self.invoke_once(kind, envelope).await {
                Err(ClientError::Dispatch(error)) if error.is_retryable() => {
                    match backoff.next_backoff() {
                        Some(duration) => {
                            debug!("{kind} timed out, retrying after {duration:?}");
                            TokioSleep(duration).await;
                        }
                        None => {
                            warn!("{kind} still timing out after {:?}", retry.max_elapsed());
                            return Err(error.into());
                        }
                    }
                }
                other => return other,
            }
        }
    }

    async fn invoke_once(&self, kind: CommandKind, envelope: &str) -> Result<String, ClientError> {
        let operation = kind.as_str();
        let handle = self
            .handle
            .as_ref()
            .ok_or_else(|| ClosedError::closed(operation))?;

        let raw = match self.config.invoke_timeout() {
            Some(timeout) => TokioTimeout(timeout, handle.invoke(operation, envelope))
                .await
                .map_err(|_| DispatchError::timeout(operation, timeout))??,
            None => handle.invoke(operation, envelope).await?,
        };

        Ok(raw)
    }
}

impl<B: Backend> std::fmt::Debug for Dispatcher<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handle", &self.handle)
            .field("session", &self.session.state())
            .field("config", &self.config)
            .finish()
    }
}
