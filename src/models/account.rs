// Account database model: the credential store record behind every login.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::schema::accounts;

/// Closed role enumeration.
///
/// Authorization decisions match exhaustively on this type; there is no
/// string comparison anywhere in the gate path, so a typo cannot widen
/// access. No hierarchy: a role is either in a route's allow-list or it
/// is not.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    diesel::expression::AsExpression,
    diesel::deserialize::FromSqlRow,
)]
#[diesel(sql_type = diesel::sql_types::Text)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access, including approval decisions.
    Admin,
    /// Default role for self-registered accounts.
    Standard,
    /// Elevated role requiring administrator sign-off before first login.
    Partner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Standard => "standard",
            Role::Partner => "partner",
        }
    }

    /// Whether accounts with this role must be approved by an administrator
    /// before a session token may be issued to them.
    pub fn requires_approval(&self) -> bool {
        match self {
            Role::Partner => true,
            Role::Admin | Role::Standard => false,
        }
    }

    /// Approval flag a freshly created account starts with.
    pub fn default_approval(&self) -> bool {
        !self.requires_approval()
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "standard" => Ok(Role::Standard),
            "partner" => Ok(Role::Partner),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl<DB> diesel::deserialize::FromSql<diesel::sql_types::Text, DB> for Role
where
    DB: diesel::backend::Backend,
    String: diesel::deserialize::FromSql<diesel::sql_types::Text, DB>,
{
    fn from_sql(bytes: DB::RawValue<'_>) -> diesel::deserialize::Result<Self> {
        let value = String::from_sql(bytes)?;
        Self::from_str(&value).map_err(|e| e.into())
    }
}

impl<DB> diesel::serialize::ToSql<diesel::sql_types::Text, DB> for Role
where
    DB: diesel::backend::Backend,
    str: diesel::serialize::ToSql<diesel::sql_types::Text, DB>,
{
    fn to_sql<'b>(
        &'b self,
        out: &mut diesel::serialize::Output<'b, '_, DB>,
    ) -> diesel::serialize::Result {
        self.as_str().to_sql(out)
    }
}

/// Account database model - queryable from database
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_approved: bool,
    pub is_active: bool,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New account for insertion
#[derive(Debug, Insertable)]
#[diesel(table_name = accounts)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_approved: bool,
    pub full_name: String,
}

/// Account update struct
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = accounts)]
pub struct AccountUpdate {
    pub is_approved: Option<bool>,
    pub is_active: Option<bool>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Errors for account operations
#[derive(thiserror::Error, Debug)]
pub enum AccountError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Account not found")]
    NotFound,

    #[error("Duplicate email")]
    DuplicateEmail,

    #[error("Connection pool error: {0}")]
    Pool(String),
}

impl Account {
    /// Find account by ID
    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        account_id: Uuid,
    ) -> Result<Self, AccountError> {
        use crate::schema::accounts::dsl::*;

        accounts
            .filter(id.eq(account_id))
            .first::<Account>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => AccountError::NotFound,
                _ => AccountError::Database(e),
            })
    }

    /// Find account by email.
    ///
    /// Exact match only: emails are normalized to lowercase before storage
    /// and lookup, so no pattern matching is needed — and a pattern operator
    /// here would let `_`/`%` in a submitted address match other accounts.
    pub async fn find_by_email(
        conn: &mut AsyncPgConnection,
        email_str: &str,
    ) -> Result<Self, AccountError> {
        use crate::schema::accounts::dsl::*;

        accounts
            .filter(email.eq(email_str))
            .first::<Account>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => AccountError::NotFound,
                _ => AccountError::Database(e),
            })
    }

    /// Insert a new account. A unique-violation from the lower(email) index
    /// maps to `DuplicateEmail` so concurrent registrations of the same
    /// address lose cleanly.
    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_account: NewAccount,
    ) -> Result<Self, AccountError> {
        use crate::schema::accounts::dsl::*;

        diesel::insert_into(accounts)
            .values(&new_account)
            .get_result::<Account>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _,
                ) => AccountError::DuplicateEmail,
                _ => AccountError::Database(e),
            })
    }

    /// Apply an update to an account by id
    pub async fn update(
        conn: &mut AsyncPgConnection,
        account_id: Uuid,
        update: AccountUpdate,
    ) -> Result<Self, AccountError> {
        use crate::schema::accounts::dsl::*;

        diesel::update(accounts.filter(id.eq(account_id)))
            .set(&update)
            .get_result::<Account>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => AccountError::NotFound,
                _ => AccountError::Database(e),
            })
    }

    /// List all accounts, newest first
    pub async fn list(conn: &mut AsyncPgConnection) -> Result<Vec<Self>, AccountError> {
        use crate::schema::accounts::dsl::*;

        accounts
            .order(created_at.desc())
            .load::<Account>(conn)
            .await
            .map_err(AccountError::Database)
    }

    /// Whether the approval gate blocks a login for this account right now.
    pub fn is_pending_approval(&self) -> bool {
        self.role.requires_approval() && !self.is_approved
    }
}
