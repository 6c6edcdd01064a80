use crate::backend::Backend;
use crate::codec::command::PasswordGenerateRequest;
use crate::codec::{Command, CommandKind, ResponsePayload};
use crate::dispatcher::Dispatcher;
use crate::error::ClientError;

use sm_models::{GeneratedPassword, PasswordPolicy};

/// Password generation. Works with or without a session.
pub struct GeneratorsClient<'a, B: Backend> {
    dispatcher: &'a mut Dispatcher<B>,
}

impl<'a, B: Backend> GeneratorsClient<'a, B> {
    pub fn new(dispatcher: &'a mut Dispatcher<B>) -> Self {
        Self { dispatcher }
    }

    pub async fn password(
        &mut self,
        policy: &PasswordPolicy,
    ) -> Result<GeneratedPassword, ClientError> {
        self.dispatcher.ensure_ready(CommandKind::PasswordGenerate)?;

        let command = Command::PasswordGenerate(PasswordGenerateRequest::new(policy));
        self.dispatcher
            .dispatch_expect(command, ResponsePayload::into_generated_password)
            .await
    }
}
