// src/identity/cognito.rs
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_cognitoidentityprovider::config::Region;
use aws_sdk_cognitoidentityprovider::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cognitoidentityprovider::operation::initiate_auth::InitiateAuthError;
use aws_sdk_cognitoidentityprovider::types::{AttributeType, AuthFlowType};
use aws_sdk_cognitoidentityprovider::Client as CognitoClient;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, warn};

use super::provider::{
    IdentityProvider, ProviderError, ProviderIdentity, ProviderTokens, SignInOutcome,
};
use crate::common::safe_email_log;

/// Deployment coordinates of the Cognito user pool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CognitoConfig {
    pub region: String,
    pub user_pool_id: String,
    pub client_id: String,
}

/// Cognito user pool adapter
pub struct CognitoIdentityProvider {
    client: CognitoClient,
    config: CognitoConfig,
}

impl fmt::Debug for CognitoIdentityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CognitoIdentityProvider")
            .field("config", &self.config)
            .finish()
    }
}

impl CognitoIdentityProvider {
    /// Loads AWS defaults for the configured region and builds the client
    pub async fn from_config(config: CognitoConfig) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        info!(
            region = %config.region,
            user_pool_id = %config.user_pool_id,
            "Cognito identity provider initialized"
        );

        Self {
            client: CognitoClient::new(&sdk_config),
            config,
        }
    }
}

#[async_trait]
impl IdentityProvider for CognitoIdentityProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<String, ProviderError> {
        debug!(email = %safe_email_log(email), "Cognito SignUp");

        let mut request = self
            .client
            .sign_up()
            .client_id(&self.config.client_id)
            .username(email)
            .password(password)
            .user_attributes(attribute("email", email)?);

        if let Some(name) = name {
            request = request.user_attributes(attribute("name", name)?);
        }

        let output = request
            .send()
            .await
            .map_err(|e| request_failed("SignUp", &e))?;

        Ok(output.user_sub().to_string())
    }

    async fn confirm_sign_up(&self, email: &str, code: &str) -> Result<(), ProviderError> {
        debug!(email = %safe_email_log(email), "Cognito ConfirmSignUp");

        self.client
            .confirm_sign_up()
            .client_id(&self.config.client_id)
            .username(email)
            .confirmation_code(code)
            .send()
            .await
            .map_err(|e| request_failed("ConfirmSignUp", &e))?;

        Ok(())
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInOutcome, ProviderError> {
        debug!(email = %safe_email_log(email), "Cognito InitiateAuth");

        let result = self
            .client
            .initiate_auth()
            .auth_flow(AuthFlowType::UserPasswordAuth)
            .client_id(&self.config.client_id)
            .auth_parameters("USERNAME", email)
            .auth_parameters("PASSWORD", password)
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(err)
                if err
                    .as_service_error()
                    .map_or(false, InitiateAuthError::is_user_not_confirmed_exception) =>
            {
                info!(email = %safe_email_log(email), "Cognito reports account is not confirmed");
                return Ok(SignInOutcome::Unconfirmed);
            }
            Err(err) => return Err(request_failed("InitiateAuth", &err)),
        };

        let tokens = output.authentication_result().and_then(|auth| {
            auth.access_token().map(|access_token| ProviderTokens {
                access_token: access_token.to_string(),
                refresh_token: auth.refresh_token().map(str::to_string),
            })
        });

        match tokens {
            Some(tokens) => Ok(SignInOutcome::Authenticated(tokens)),
            None => {
                warn!(
                    challenge = ?output.challenge_name(),
                    "Cognito InitiateAuth returned no authentication result"
                );
                Ok(SignInOutcome::NoAuthResult)
            }
        }
    }

    async fn introspect(&self, access_token: &str) -> Result<ProviderIdentity, ProviderError> {
        let output = self
            .client
            .get_user()
            .access_token(access_token)
            .send()
            .await
            .map_err(|e| request_failed("GetUser", &e))?;

        Ok(ProviderIdentity {
            external_id: output.username().to_string(),
            attributes: attribute_map(output.user_attributes()),
        })
    }
}

fn attribute(name: &str, value: &str) -> Result<AttributeType, ProviderError> {
    AttributeType::builder()
        .name(name)
        .value(value)
        .build()
        .map_err(|e| ProviderError::RequestFailed(e.to_string()))
}

fn attribute_map(attributes: &[AttributeType]) -> HashMap<String, String> {
    attributes
        .iter()
        .filter_map(|attr| {
            attr.value()
                .map(|value| (attr.name().to_string(), value.to_string()))
        })
        .collect()
}

/// Prefers the service's own message (e.g. "User already exists") and falls
/// back to the full error chain for transport failures.
fn request_failed<E, R>(operation: &'static str, err: &SdkError<E, R>) -> ProviderError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: fmt::Debug,
{
    warn!(operation, error = %DisplayErrorContext(err), "Cognito request failed");

    let reason = err
        .as_service_error()
        .and_then(|e| e.message())
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(err).to_string());

    ProviderError::RequestFailed(reason)
}
