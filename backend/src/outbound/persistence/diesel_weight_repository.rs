//! PostgreSQL-backed `WeightRepository` implementation using Diesel ORM.
//!
//! Logging a weight is a single upsert keyed by `(user_id, recorded_on)`;
//! `xmax = 0` on the returned row tells a fresh insert from an overwrite.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Bool, Date, Double, Uuid as SqlUuid};
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use pagination::{Page, PageRequest};

use crate::domain::ports::{WeightRepository, WeightRepositoryError};
use crate::domain::{
    Age, CurrentAttributes, HeightCm, ProfileAttributes, UserId, WeightKg, WeightLogOutcome,
    WeightSample,
};

use super::diesel_helpers::{corrupt_row, count_from_sql, warn_unmapped_foreign_key};
use super::models::{UserAttributesRow, UserWeightRow};
use super::pool::DbPool;
use super::schema::{user_attributes, user_weights};
use super::storage_failure::{StorageFailure, with_deadline};

const USER_FOREIGN_KEY: &str = "user_weights_user_id_fkey";

const UPSERT_WEIGHT_SQL: &str = r#"
INSERT INTO user_weights (user_id, recorded_on, weight_kg)
VALUES ($1, $2, $3)
ON CONFLICT (user_id, recorded_on)
DO UPDATE SET weight_kg = EXCLUDED.weight_kg
RETURNING (xmax = 0) AS inserted
"#;

#[derive(QueryableByName)]
struct UpsertOutcomeRow {
    #[diesel(sql_type = Bool)]
    inserted: bool,
}

/// Diesel-backed implementation of the [`WeightRepository`] port.
#[derive(Clone)]
pub struct DieselWeightRepository {
    pool: DbPool,
}

impl DieselWeightRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: StorageFailure) -> WeightRepositoryError {
    if failure.is_foreign_key_violation_of(USER_FOREIGN_KEY) {
        return WeightRepositoryError::user_not_found();
    }
    warn_unmapped_foreign_key(&failure);
    match failure {
        StorageFailure::Unavailable { message } => WeightRepositoryError::connection(message),
        other => WeightRepositoryError::query(other.message()),
    }
}

fn attributes_from_row(row: &UserAttributesRow) -> Result<ProfileAttributes, StorageFailure> {
    let table = "user_attributes";
    Ok(ProfileAttributes {
        is_male: row.is_male,
        height: HeightCm::new(row.height_cm).map_err(|err| corrupt_row(table, err))?,
        goal: row.goal.parse().map_err(|err| corrupt_row(table, err))?,
        weight_goal: WeightKg::new(row.weight_goal_kg).map_err(|err| corrupt_row(table, err))?,
        age: Age::new(row.age).map_err(|err| corrupt_row(table, err))?,
    })
}

fn sample_from_row(row: UserWeightRow) -> Result<WeightSample, StorageFailure> {
    let weight = WeightKg::new(row.weight_kg).map_err(|err| corrupt_row("user_weights", err))?;
    Ok(WeightSample::new(row.recorded_on, weight))
}

#[async_trait]
impl WeightRepository for DieselWeightRepository {
    async fn record(
        &self,
        user_id: &UserId,
        sample: &WeightSample,
    ) -> Result<WeightLogOutcome, WeightRepositoryError> {
        let outcome: UpsertOutcomeRow = with_deadline(&self.pool, async {
            let mut conn = self.pool.get().await?;
            let row = sql_query(UPSERT_WEIGHT_SQL)
                .bind::<SqlUuid, _>(*user_id.as_uuid())
                .bind::<Date, _>(sample.date)
                .bind::<Double, _>(sample.weight.get())
                .get_result(&mut conn)
                .await?;
            Ok(row)
        })
        .await
        .map_err(map_failure)?;

        Ok(if outcome.inserted {
            WeightLogOutcome::Created
        } else {
            WeightLogOutcome::Updated
        })
    }

    async fn current_attributes(
        &self,
        user_id: &UserId,
    ) -> Result<Option<CurrentAttributes>, WeightRepositoryError> {
        let id = *user_id.as_uuid();

        // REPEATABLE READ pins one snapshot for both reads; READ COMMITTED
        // would take a fresh one per statement.
        let rows = with_deadline(&self.pool, async {
            let mut conn = self.pool.get().await?;
            conn.build_transaction()
                .repeatable_read()
                .read_only()
                .run::<_, StorageFailure, _>(|conn| {
                    async move {
                        let attributes: Option<UserAttributesRow> = user_attributes::table
                            .find(id)
                            .select(UserAttributesRow::as_select())
                            .first(conn)
                            .await
                            .optional()?;
                        let Some(attributes) = attributes else {
                            return Ok(None);
                        };
                        let latest: Option<f64> = user_weights::table
                            .filter(user_weights::user_id.eq(id))
                            .order(user_weights::recorded_on.desc())
                            .select(user_weights::weight_kg)
                            .first(conn)
                            .await
                            .optional()?;
                        Ok(latest.map(|weight| (attributes, weight)))
                    }
                    .scope_boxed()
                })
                .await
        })
        .await
        .map_err(map_failure)?;

        let Some((attributes, weight)) = rows else {
            return Ok(None);
        };
        let current = attributes_from_row(&attributes)
            .and_then(|attributes| {
                let current_weight =
                    WeightKg::new(weight).map_err(|err| corrupt_row("user_weights", err))?;
                Ok(CurrentAttributes {
                    user_id: user_id.clone(),
                    attributes,
                    current_weight,
                })
            })
            .map_err(map_failure)?;
        Ok(Some(current))
    }

    async fn history(
        &self,
        user_id: &UserId,
        page: &PageRequest,
    ) -> Result<Page<WeightSample>, WeightRepositoryError> {
        let id = *user_id.as_uuid();
        let (limit, offset) = (page.sql_limit(), page.sql_offset());

        let (total, rows) = with_deadline(&self.pool, async {
            let mut conn = self.pool.get().await?;
            conn.transaction::<_, StorageFailure, _>(|conn| {
                async move {
                    let total: i64 = user_weights::table
                        .filter(user_weights::user_id.eq(id))
                        .count()
                        .get_result(conn)
                        .await?;
                    let rows: Vec<UserWeightRow> = user_weights::table
                        .filter(user_weights::user_id.eq(id))
                        .order(user_weights::recorded_on.desc())
                        .limit(limit)
                        .offset(offset)
                        .select(UserWeightRow::as_select())
                        .load(conn)
                        .await?;
                    Ok((total, rows))
                }
                .scope_boxed()
            })
            .await
        })
        .await
        .map_err(map_failure)?;

        let samples = rows
            .into_iter()
            .map(sample_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_failure)?;
        Ok(Page::new(samples, count_from_sql(total), *page))
    }
}
