//! Password generation policy and its result.
//!
//! Generation needs no session: the policy is checked here and the password is
//! produced by the backend.

use crate::ModelError;

use std::fmt;

use serde::{Deserialize, Serialize};

pub const PASSWORD_MIN_LENGTH: u8 = 4;
pub const PASSWORD_DEFAULT_LENGTH: u8 = 24;

/// Validated password policy.
///
/// Construct through [`PasswordPolicyBuilder`]; the defaults are 24 characters
/// from every character set with ambiguous characters avoided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    length: u8,
    avoid_ambiguous: bool,
    lowercase: bool,
    uppercase: bool,
    numbers: bool,
    special: bool,
    min_lowercase: Option<u8>,
    min_uppercase: Option<u8>,
    min_number: Option<u8>,
    min_special: Option<u8>,
}

impl PasswordPolicy {
    pub fn builder() -> PasswordPolicyBuilder {
        PasswordPolicyBuilder::default()
    }

    pub fn length(&self) -> u8 {
        self.length
    }

    pub fn avoid_ambiguous(&self) -> bool {
        self.avoid_ambiguous
    }

    pub fn lowercase(&self) -> bool {
        self.lowercase
    }

    pub fn uppercase(&self) -> bool {
        self.uppercase
    }

    pub fn numbers(&self) -> bool {
        self.numbers
    }

    pub fn special(&self) -> bool {
        self.special
    }

    pub fn min_lowercase(&self) -> Option<u8> {
        self.min_lowercase
    }

    pub fn min_uppercase(&self) -> Option<u8> {
        self.min_uppercase
    }

    pub fn min_number(&self) -> Option<u8> {
        self.min_number
    }

    pub fn min_special(&self) -> Option<u8> {
        self.min_special
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            length: PASSWORD_DEFAULT_LENGTH,
            avoid_ambiguous: true,
            lowercase: true,
            uppercase: true,
            numbers: true,
            special: true,
            min_lowercase: None,
            min_uppercase: None,
            min_number: None,
            min_special: None,
        }
    }
}

/// Builder for [`PasswordPolicy`]. Starts from the default policy.
#[derive(Debug, Clone, Default)]
pub struct PasswordPolicyBuilder {
    policy: PasswordPolicy,
}

impl PasswordPolicyBuilder {
    pub fn with_length(mut self, length: u8) -> Self {
        self.policy.length = length;
        self
    }

    /// Leave out look-alike characters such as `0`/`O` and `1`/`l`/`I`.
    pub fn with_avoid_ambiguous(mut self, avoid_ambiguous: bool) -> Self {
        self.policy.avoid_ambiguous = avoid_ambiguous;
        self
    }

    pub fn with_lowercase(mut self, enabled: bool) -> Self {
        self.policy.lowercase = enabled;
        self
    }

    pub fn with_uppercase(mut self, enabled: bool) -> Self {
        self.policy.uppercase = enabled;
        self
    }

    pub fn with_numbers(mut self, enabled: bool) -> Self {
        self.policy.numbers = enabled;
        self
    }

    pub fn with_special(mut self, enabled: bool) -> Self {
        self.policy.special = enabled;
        self
    }

    pub fn with_min_lowercase(mut self, minimum: u8) -> Self {
        self.policy.min_lowercase = Some(minimum);
        self
    }

    pub fn with_min_uppercase(mut self, minimum: u8) -> Self {
        self.policy.min_uppercase = Some(minimum);
        self
    }

    pub fn with_min_number(mut self, minimum: u8) -> Self {
        self.policy.min_number = Some(minimum);
        self
    }

    pub fn with_min_special(mut self, minimum: u8) -> Self {
        self.policy.min_special = Some(minimum);
        self
    }

    /// Build the policy with validation.
    #[track_caller]
    pub fn build(self) -> Result<PasswordPolicy, ModelError> {
        let policy = self.policy;

        if policy.length < PASSWORD_MIN_LENGTH {
            return Err(ModelError::validation(
                "length",
                format!("length must be between {PASSWORD_MIN_LENGTH} and 255 (inclusive)"),
            ));
        }

        if !(policy.lowercase || policy.uppercase || policy.numbers || policy.special) {
            return Err(ModelError::validation(
                "character_sets",
                "At least one of lowercase, uppercase, numbers, or special must be enabled",
            ));
        }

        let minimums = [
            ("min_lowercase", policy.min_lowercase, policy.lowercase),
            ("min_uppercase", policy.min_uppercase, policy.uppercase),
            ("min_number", policy.min_number, policy.numbers),
            ("min_special", policy.min_special, policy.special),
        ];

        let mut required: u32 = 0;
        for (field, minimum, enabled) in minimums {
            let minimum = minimum.unwrap_or(0);
            if minimum > 0 && !enabled {
                return Err(ModelError::validation(
                    field,
                    format!("{field} > 0 but its character set is disabled"),
                ));
            }
            required += u32::from(minimum);
        }

        if required > u32::from(policy.length) {
            return Err(ModelError::validation(
                "length",
                "Sum of minimum requirements exceeds requested length",
            ));
        }

        Ok(policy)
    }
}

/// A password produced by the backend. `Debug` never prints it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratedPassword(String);

impl GeneratedPassword {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for GeneratedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GeneratedPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}
