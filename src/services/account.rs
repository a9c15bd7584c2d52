// Account service: registration, login, and approval transitions.
//
// All validation is explicit, in order, in this layer; the model has no
// lifecycle hooks. The approval gate is evaluated at login time only, never
// per-request.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::db::DieselPool;
use crate::models::account::{Account, AccountError, AccountUpdate, NewAccount, Role};
use crate::services::token::TokenService;
use crate::utils::audit_logger::{AuditAction, AuditLogger};
use crate::utils::auth_errors::{log_auth_failure, AuthError};
use crate::utils::password::{dummy_verify, hash_password, verify_password};
use crate::utils::validation::normalize_email;

impl From<AccountError> for AuthError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotFound => AuthError::NotFound,
            AccountError::DuplicateEmail => AuthError::DuplicateEmail,
            AccountError::Database(e) => AuthError::Database(e.to_string()),
            AccountError::Pool(e) => AuthError::Database(e),
        }
    }
}

/// Outcome of a successful registration. Roles behind the approval gate get
/// no token, only the pending marker.
#[derive(Debug)]
pub struct RegisteredAccount {
    pub account: Account,
    pub token: Option<String>,
}

/// Outcome of a successful login
#[derive(Debug)]
pub struct LoggedInAccount {
    pub account: Account,
    pub token: String,
    pub expires_in: u64,
}

pub struct AccountService {
    pool: DieselPool,
    tokens: Arc<TokenService>,
}

impl AccountService {
    pub fn new(pool: DieselPool, tokens: Arc<TokenService>) -> Self {
        Self { pool, tokens }
    }

    async fn conn(
        &self,
    ) -> Result<
        bb8::PooledConnection<
            '_,
            diesel_async::pooled_connection::AsyncDieselConnectionManager<
                diesel_async::AsyncPgConnection,
            >,
        >,
        AuthError,
    > {
        self.pool
            .get()
            .await
            .map_err(|e| AuthError::Database(e.to_string()))
    }

    /// Register a new account.
    ///
    /// Steps, in order: normalize email, hash password, explicit duplicate
    /// lookup, insert. The unique index on lower(email) is the backstop for
    /// two registrations racing past the lookup; the loser maps to the same
    /// duplicate error.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: String,
        role: Role,
    ) -> Result<RegisteredAccount, AuthError> {
        let email = normalize_email(email);
        let password_hash = hash_password(password)?;

        let mut conn = self.conn().await?;

        match Account::find_by_email(&mut conn, &email).await {
            Ok(_) => return Err(AuthError::DuplicateEmail),
            Err(AccountError::NotFound) => {},
            Err(e) => return Err(e.into()),
        }

        let account = Account::create(
            &mut conn,
            NewAccount {
                email: email.clone(),
                password_hash,
                role,
                is_approved: role.default_approval(),
                full_name,
            },
        )
        .await?;

        AuditLogger::log(
            AuditAction::AccountRegistered,
            Some(account.id),
            &email,
            Some(format!("role={}", role.as_str())),
        );

        // No token for an account the approval gate would block at login
        let token = if account.is_pending_approval() {
            None
        } else {
            Some(self.tokens.issue_session_token(&account)?)
        };

        Ok(RegisteredAccount { account, token })
    }

    /// Authenticate credentials and issue a session token.
    ///
    /// Unknown email and wrong password return the identical error; the
    /// unknown-email path burns a dummy verification so the two are also
    /// timing-comparable.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoggedInAccount, AuthError> {
        let email = normalize_email(email);

        let mut conn = self.conn().await?;

        let account = match Account::find_by_email(&mut conn, &email).await {
            Ok(account) => account,
            Err(AccountError::NotFound) => {
                dummy_verify(password);
                let err = AuthError::InvalidCredentials;
                log_auth_failure(&email, &err);
                AuditLogger::log(AuditAction::LoginFailed, None, &email, None);
                return Err(err);
            },
            Err(e) => return Err(e.into()),
        };

        if !verify_password(password, &account.password_hash)? {
            let err = AuthError::InvalidCredentials;
            log_auth_failure(&email, &err);
            AuditLogger::log(AuditAction::LoginFailed, Some(account.id), &email, None);
            return Err(err);
        }

        // Rejected accounts are deactivated; treat them as bad credentials
        // rather than confirming the account exists.
        if !account.is_active {
            let err = AuthError::InvalidCredentials;
            log_auth_failure(&email, &err);
            AuditLogger::log(AuditAction::LoginFailed, Some(account.id), &email, None);
            return Err(err);
        }

        // Approval gate: valid credentials, but the role needs sign-off
        if account.is_pending_approval() {
            let err = AuthError::PendingApproval;
            log_auth_failure(&email, &err);
            AuditLogger::log(
                AuditAction::LoginBlockedPendingApproval,
                Some(account.id),
                &email,
                None,
            );
            return Err(err);
        }

        let token = self.tokens.issue_session_token(&account)?;

        AuditLogger::log(AuditAction::LoginSucceeded, Some(account.id), &email, None);

        Ok(LoggedInAccount {
            account,
            token,
            expires_in: self.tokens.expiry_seconds(),
        })
    }

    /// Administrator action: approve an account.
    ///
    /// Idempotent — approving an already-approved account succeeds without
    /// change.
    pub async fn approve(&self, account_id: Uuid) -> Result<Account, AuthError> {
        let mut conn = self.conn().await?;

        let account = Account::find_by_id(&mut conn, account_id).await?;
        if account.is_approved && account.is_active {
            return Ok(account);
        }

        let updated = Account::update(
            &mut conn,
            account_id,
            AccountUpdate {
                is_approved: Some(true),
                is_active: Some(true),
                updated_at: Some(Utc::now()),
            },
        )
        .await?;

        AuditLogger::log(
            AuditAction::AccountApproved,
            Some(updated.id),
            &updated.email,
            None,
        );

        Ok(updated)
    }

    /// Administrator action: reject an account. Clears the approval flag and
    /// deactivates the record. Also idempotent.
    pub async fn reject(&self, account_id: Uuid) -> Result<Account, AuthError> {
        let mut conn = self.conn().await?;

        let account = Account::find_by_id(&mut conn, account_id).await?;
        if !account.is_approved && !account.is_active {
            return Ok(account);
        }

        let updated = Account::update(
            &mut conn,
            account_id,
            AccountUpdate {
                is_approved: Some(false),
                is_active: Some(false),
                updated_at: Some(Utc::now()),
            },
        )
        .await?;

        AuditLogger::log(
            AuditAction::AccountRejected,
            Some(updated.id),
            &updated.email,
            None,
        );

        Ok(updated)
    }

    /// Fetch a single account by id
    pub async fn find(&self, account_id: Uuid) -> Result<Account, AuthError> {
        let mut conn = self.conn().await?;
        Ok(Account::find_by_id(&mut conn, account_id).await?)
    }

    /// List all accounts (admin-only surface)
    pub async fn list(&self) -> Result<Vec<Account>, AuthError> {
        let mut conn = self.conn().await?;
        Ok(Account::list(&mut conn).await?)
    }
}
