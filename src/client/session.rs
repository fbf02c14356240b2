use std::io;
use std::sync::{Arc, RwLock};

use thiserror::Error;
use tracing::{info, warn};

use super::{AuthApi, ClientError, TokenStore};
use crate::models::{LoginRequest, SignupRequest, User};
use crate::navigation::Route;

/// Login/signup failures, phrased for display.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Unable to reach the server. Check your connection.")]
    Network,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(String),

    #[error("An account with this email already exists")]
    AccountExists,

    #[error("Server error. Please try again later.")]
    Server,

    #[error("Login failed. Please try again.")]
    ProfileUnavailable,

    #[error("Unexpected response from server: {0}")]
    Unexpected(String),

    #[error("Could not store the session token: {0}")]
    Storage(#[from] io::Error),
}

impl From<ClientError> for SessionError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Network(_) => SessionError::Network,
            ClientError::Unauthorized => SessionError::InvalidCredentials,
            ClientError::Unprocessable(msg) if msg.is_empty() => {
                SessionError::Validation("Please check the form fields".to_string())
            }
            ClientError::Unprocessable(msg) => SessionError::Validation(msg),
            ClientError::Invalid(errors) => SessionError::Validation(errors.to_string()),
            ClientError::Conflict(_) => SessionError::AccountExists,
            ClientError::Server(_) => SessionError::Server,
            ClientError::Storage(e) => SessionError::Storage(e),
            other => SessionError::Unexpected(other.to_string()),
        }
    }
}

/// Process-wide sign-in state, passed explicitly to whoever needs it.
pub struct Session {
    api: Arc<dyn AuthApi>,
    tokens: Arc<dyn TokenStore>,
    user: RwLock<Option<User>>,
}

impl Session {
    pub fn new(api: Arc<dyn AuthApi>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            tokens,
            user: RwLock::new(None),
        }
    }

    /// Restores a stored session on startup. A token the backend no longer accepts is dropped.
    pub async fn init(&self) -> Option<User> {
        self.tokens.load()?;

        match self.api.me().await {
            Ok(user) => {
                self.set_user(Some(user.clone()));
                Some(user)
            }
            Err(e) => {
                warn!("stored session is no longer valid: {}", e);
                self.drop_token();
                None
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Route, SessionError> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let token = self.api.login(&request).await?;
        self.tokens.save(&token.token)?;
        self.load_profile().await
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<Route, SessionError> {
        let token = self.api.signup(request).await?;
        self.tokens.save(&token.token)?;
        self.load_profile().await
    }

    pub fn logout(&self) -> Route {
        self.drop_token();
        self.set_user(None);
        info!("signed out");
        Route::SignIn
    }

    pub fn get_token(&self) -> Option<String> {
        self.tokens.load()
    }

    pub fn is_authenticated(&self) -> bool {
        self.get_token().is_some()
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.read().ok().and_then(|u| u.clone())
    }

    async fn load_profile(&self) -> Result<Route, SessionError> {
        match self.api.me().await {
            Ok(user) => {
                info!("signed in as {}", user.email);
                let route = Route::dashboard_for(user.role);
                self.set_user(Some(user));
                Ok(route)
            }
            Err(e) => {
                warn!("profile fetch after sign-in failed: {}", e);
                self.drop_token();
                Err(SessionError::ProfileUnavailable)
            }
        }
    }

    fn set_user(&self, user: Option<User>) {
        if let Ok(mut slot) = self.user.write() {
            *slot = user;
        }
    }

    fn drop_token(&self) {
        if let Err(e) = self.tokens.clear() {
            warn!("could not clear stored token: {}", e);
        }
    }
}
