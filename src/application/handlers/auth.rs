//! Auth handlers - login and registration.

use std::sync::Arc;

use crate::domain::foundation::RemoteResult;
use crate::ports::AuthGateway;

/// Command to log in with email and password.
#[derive(Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCommand")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

pub struct LoginHandler {
    gateway: Arc<dyn AuthGateway>,
}

impl LoginHandler {
    pub fn new(gateway: Arc<dyn AuthGateway>) -> Self {
        Self { gateway }
    }

    pub async fn handle(&self, cmd: LoginCommand) -> RemoteResult<String> {
        let email = cmd.email.trim();
        if email.is_empty() || cmd.password.is_empty() {
            return RemoteResult::error("Email and password are required");
        }
        self.gateway.login(email, &cmd.password).await
    }
}

/// Command to register a new account.
#[derive(Clone)]
pub struct RegisterCommand {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for RegisterCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterCommand")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

pub struct RegisterHandler {
    gateway: Arc<dyn AuthGateway>,
}

impl RegisterHandler {
    pub fn new(gateway: Arc<dyn AuthGateway>) -> Self {
        Self { gateway }
    }

    pub async fn handle(&self, cmd: RegisterCommand) -> RemoteResult<String> {
        let username = cmd.username.trim();
        let email = cmd.email.trim();
        if username.is_empty() || email.is_empty() || cmd.password.is_empty() {
            return RemoteResult::error("Username, email and password are required");
        }
        self.gateway.register(username, email, &cmd.password).await
    }
}
