//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.
//!
//! Registration, activation and re-invitation each run as one transaction.
//! Activation consumes the invitation with a conditional `DELETE ...
//! RETURNING`, so the row lock taken by the first caller makes concurrent
//! activations with the same token see nothing to consume.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{AccountRepository, AccountRepositoryError, NewAccount, StoredCredentials};
use crate::domain::{
    AccountStatus, Email, InvitationGrant, PasswordHash, TokenDigest, User, UserId,
};

use super::models::{
    CredentialsRow, NewInvitationRow, NewUserRow, UserAttributesRow, UserWeightRow,
};
use super::pool::DbPool;
use super::schema::{invitations, user_attributes, user_weights, users};
use super::storage_failure::{StorageFailure, with_deadline};

const EMAIL_CONSTRAINT: &str = "users_email_key";
const USERNAME_CONSTRAINT: &str = "users_username_key";

/// Diesel-backed implementation of the [`AccountRepository`] port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: StorageFailure) -> AccountRepositoryError {
    if failure.is_unique_violation_of(EMAIL_CONSTRAINT) {
        return AccountRepositoryError::duplicate_email();
    }
    if failure.is_unique_violation_of(USERNAME_CONSTRAINT) {
        return AccountRepositoryError::duplicate_username();
    }
    match failure {
        StorageFailure::Unavailable { message } => AccountRepositoryError::connection(message),
        other => AccountRepositoryError::query(other.message()),
    }
}

fn invitation_row<'a>(invitation: &'a InvitationGrant, user_id: Uuid) -> NewInvitationRow<'a> {
    NewInvitationRow {
        token_digest: invitation.digest().as_ref(),
        user_id,
        expires_at: invitation.expires_at(),
    }
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn create_pending_account(
        &self,
        account: &NewAccount,
        invitation: &InvitationGrant,
    ) -> Result<User, AccountRepositoryError> {
        let user_id = *account.id.as_uuid();
        let user_row = NewUserRow {
            id: user_id,
            email: account.email.as_ref(),
            username: account.username.as_ref(),
            password_hash: account.password_hash.as_ref(),
            is_active: false,
            created_at: account.created_at,
        };
        let attributes_row = UserAttributesRow {
            user_id,
            is_male: account.attributes.is_male,
            height_cm: account.attributes.height.get(),
            goal: account.attributes.goal.as_str().to_owned(),
            weight_goal_kg: account.attributes.weight_goal.get(),
            age: account.attributes.age.get(),
        };
        let weight_row = UserWeightRow {
            user_id,
            recorded_on: account.initial_weight.date,
            weight_kg: account.initial_weight.weight.get(),
        };
        let invitation_row = invitation_row(invitation, user_id);

        with_deadline(&self.pool, async {
            let mut conn = self.pool.get().await?;
            conn.transaction::<_, StorageFailure, _>(|conn| {
                async move {
                    diesel::insert_into(users::table)
                        .values(&user_row)
                        .execute(conn)
                        .await?;
                    diesel::insert_into(user_attributes::table)
                        .values(&attributes_row)
                        .execute(conn)
                        .await?;
                    diesel::insert_into(user_weights::table)
                        .values(&weight_row)
                        .execute(conn)
                        .await?;
                    diesel::insert_into(invitations::table)
                        .values(&invitation_row)
                        .execute(conn)
                        .await?;
                    Ok(())
                }
                .scope_boxed()
            })
            .await
        })
        .await
        .map_err(map_failure)?;

        Ok(User::new(
            account.id.clone(),
            account.email.clone(),
            account.username.clone(),
            AccountStatus::Pending,
            account.created_at,
        ))
    }

    async fn activate(
        &self,
        digest: &TokenDigest,
        now: DateTime<Utc>,
    ) -> Result<Option<UserId>, AccountRepositoryError> {
        let digest = digest.as_ref();

        let activated = with_deadline(&self.pool, async {
            let mut conn = self.pool.get().await?;
            conn.transaction::<_, StorageFailure, _>(|conn| {
                async move {
                    let consumed: Option<Uuid> = diesel::delete(
                        invitations::table.filter(
                            invitations::token_digest
                                .eq(digest)
                                .and(invitations::expires_at.gt(now)),
                        ),
                    )
                    .returning(invitations::user_id)
                    .get_result(conn)
                    .await
                    .optional()?;

                    let Some(user_id) = consumed else {
                        return Ok(None);
                    };

                    diesel::update(users::table.find(user_id))
                        .set(users::is_active.eq(true))
                        .execute(conn)
                        .await?;
                    Ok(Some(user_id))
                }
                .scope_boxed()
            })
            .await
        })
        .await
        .map_err(map_failure)?;

        Ok(activated.map(UserId::from_uuid))
    }

    async fn reissue_invitation(
        &self,
        email: &Email,
        invitation: &InvitationGrant,
    ) -> Result<Option<UserId>, AccountRepositoryError> {
        let email = email.as_ref();

        let reissued = with_deadline(&self.pool, async {
            let mut conn = self.pool.get().await?;
            conn.transaction::<_, StorageFailure, _>(|conn| {
                async move {
                    let pending: Option<Uuid> = users::table
                        .filter(users::email.eq(email).and(users::is_active.eq(false)))
                        .select(users::id)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;

                    let Some(user_id) = pending else {
                        return Ok(None);
                    };

                    diesel::insert_into(invitations::table)
                        .values(&invitation_row(invitation, user_id))
                        .on_conflict(invitations::user_id)
                        .do_update()
                        .set((
                            invitations::token_digest.eq(excluded(invitations::token_digest)),
                            invitations::expires_at.eq(excluded(invitations::expires_at)),
                        ))
                        .execute(conn)
                        .await?;
                    Ok(Some(user_id))
                }
                .scope_boxed()
            })
            .await
        })
        .await
        .map_err(map_failure)?;

        Ok(reissued.map(UserId::from_uuid))
    }

    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError> {
        let row: Option<CredentialsRow> = with_deadline(&self.pool, async {
            let mut conn = self.pool.get().await?;
            let row = users::table
                .filter(users::email.eq(email.as_ref()))
                .select(CredentialsRow::as_select())
                .first(&mut conn)
                .await
                .optional()?;
            Ok(row)
        })
        .await
        .map_err(map_failure)?;

        Ok(row.map(stored_credentials))
    }
}

fn stored_credentials(row: CredentialsRow) -> StoredCredentials {
    StoredCredentials {
        user_id: UserId::from_uuid(row.id),
        password_hash: PasswordHash::new(row.password_hash),
        status: AccountStatus::from_active_flag(row.is_active),
    }
}
