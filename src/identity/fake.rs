//! In-process identity provider for tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::provider::{
    IdentityProvider, ProviderError, ProviderIdentity, ProviderTokens, SignInOutcome,
};

pub const VALID_CODE: &str = "123456";

#[derive(Debug, Clone)]
struct Account {
    external_id: String,
    password: String,
    name: Option<String>,
    confirmed: bool,
}

#[derive(Debug, Default)]
struct FakeState {
    accounts: HashMap<String, Account>,
    next_sub: usize,
}

/// Mimics a user pool: sign-up creates an unconfirmed account, the fixed
/// code `123456` confirms it, and access tokens are `access-<sub>`.
#[derive(Debug, Default)]
pub struct FakeIdentityProvider {
    state: Mutex<FakeState>,
    /// Answer sign-in without an authentication result
    pub withhold_auth_result: bool,
    /// Leave the `email` attribute out of introspection
    pub omit_email_attribute: bool,
    /// Fail every call as if the provider were unreachable
    pub outage: bool,
}

impl FakeIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an account that can log in straight away
    pub fn with_confirmed_account(self, email: &str, password: &str, name: Option<&str>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.next_sub += 1;
            let external_id = format!("sub-{}", state.next_sub);
            state.accounts.insert(
                email.to_string(),
                Account {
                    external_id,
                    password: password.to_string(),
                    name: name.map(str::to_string),
                    confirmed: true,
                },
            );
        }
        self
    }

    pub fn external_id_of(&self, email: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.accounts.get(email).map(|a| a.external_id.clone())
    }

    fn check_outage(&self) -> Result<(), ProviderError> {
        if self.outage {
            Err(ProviderError::RequestFailed(
                "Service unavailable".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<String, ProviderError> {
        self.check_outage()?;
        if password.len() < 5 {
            return Err(ProviderError::RequestFailed(
                "Password did not conform with policy: Password not long enough".to_string(),
            ));
        }

        let mut state = self.state.lock().unwrap();
        if state.accounts.contains_key(email) {
            return Err(ProviderError::RequestFailed(
                "User already exists".to_string(),
            ));
        }

        state.next_sub += 1;
        let external_id = format!("sub-{}", state.next_sub);
        state.accounts.insert(
            email.to_string(),
            Account {
                external_id: external_id.clone(),
                password: password.to_string(),
                name: name.map(str::to_string),
                confirmed: false,
            },
        );
        Ok(external_id)
    }

    async fn confirm_sign_up(&self, email: &str, code: &str) -> Result<(), ProviderError> {
        self.check_outage()?;
        let mut state = self.state.lock().unwrap();
        let account = state.accounts.get_mut(email).ok_or_else(|| {
            ProviderError::RequestFailed("Username/client id combination not found.".to_string())
        })?;

        if code != VALID_CODE {
            return Err(ProviderError::RequestFailed(
                "Invalid verification code provided, please try again.".to_string(),
            ));
        }

        account.confirmed = true;
        Ok(())
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInOutcome, ProviderError> {
        self.check_outage()?;
        let state = self.state.lock().unwrap();
        let account = match state.accounts.get(email) {
            Some(a) if a.password == password => a,
            _ => {
                return Err(ProviderError::RequestFailed(
                    "Incorrect username or password.".to_string(),
                ))
            }
        };

        if !account.confirmed {
            return Ok(SignInOutcome::Unconfirmed);
        }
        if self.withhold_auth_result {
            return Ok(SignInOutcome::NoAuthResult);
        }

        Ok(SignInOutcome::Authenticated(ProviderTokens {
            access_token: format!("access-{}", account.external_id),
            refresh_token: Some(format!("refresh-{}", account.external_id)),
        }))
    }

    async fn introspect(&self, access_token: &str) -> Result<ProviderIdentity, ProviderError> {
        self.check_outage()?;
        let state = self.state.lock().unwrap();
        let (email, account) = state
            .accounts
            .iter()
            .find(|(_, a)| access_token == format!("access-{}", a.external_id))
            .ok_or_else(|| ProviderError::RequestFailed("Invalid Access Token".to_string()))?;

        let mut attributes = HashMap::new();
        if !self.omit_email_attribute {
            attributes.insert("email".to_string(), email.clone());
        }
        if let Some(name) = &account.name {
            attributes.insert("name".to_string(), name.clone());
        }

        Ok(ProviderIdentity {
            external_id: account.external_id.clone(),
            attributes,
        })
    }
}
