//! PostgreSQL-backed `ListingRepository` implementation.
//!
//! Each listing is one statement. The `matching` CTE applies the filters,
//! aggregates are grouped per item before they are joined (so an item with
//! many likes or linked exercises is never counted twice), the window is
//! cut from the grouped rows, and the filtered total is selected from the
//! same snapshot. The total row is left-joined to the window so a page past
//! the end still reports the total.

use async_trait::async_trait;
use diesel::sql_query;
use diesel::sql_types::{Array, BigInt, Nullable, Text, Uuid as SqlUuid};
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest, SortDirection};
use uuid::Uuid;

use crate::domain::ports::{ListingRepository, ListingRepositoryError};
use crate::domain::{
    ExerciseSummary, LikeSummary, ListingQuery, Rating, Review, ReviewId,
    ReviewSummary, ReviewWithAuthor, UserId, Username, WorkoutId, WorkoutSummary,
};

use super::diesel_catalogue_repository::{exercise_from_row, workout_from_row};
use super::diesel_helpers::{corrupt_row, count_from_sql};
use super::models::{
    ExerciseListingRow, ExerciseRow, ReviewListingRow, WorkoutListingRow, WorkoutRow,
};
use super::pool::DbPool;
use super::storage_failure::{StorageFailure, with_deadline};

/// Diesel-backed implementation of the [`ListingRepository`] port.
#[derive(Clone)]
pub struct DieselListingRepository {
    pool: DbPool,
}

impl DieselListingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: StorageFailure) -> ListingRepositoryError {
    match failure {
        StorageFailure::Unavailable { message } => ListingRepositoryError::connection(message),
        other => ListingRepositoryError::query(other.message()),
    }
}

// Bind order for both item listings:
// $1 escaped search term ('' matches all), $2 owner, $3 required tags,
// $4 viewer, $5 limit, $6 offset. The sort keyword is spliced in from a
// closed set.

fn exercise_listing_sql(direction: SortDirection) -> String {
    let dir = direction.as_sql();
    format!(
        r#"
WITH matching AS (
    SELECT e.*
    FROM exercises e
    WHERE ($2::uuid IS NULL OR e.user_id = $2::uuid)
      AND ($1::text = ''
           OR e.name ILIKE '%' || $1::text || '%' ESCAPE '\'
           OR e.description ILIKE '%' || $1::text || '%' ESCAPE '\')
      AND (cardinality($3::text[]) = 0 OR e.muscles @> $3::text[])
),
like_counts AS (
    SELECT l.exercise_id, COUNT(DISTINCT l.user_id) AS like_count
    FROM exercise_likes l
    JOIN matching m ON m.id = l.exercise_id
    GROUP BY l.exercise_id
),
page AS (
    SELECT m.id, m.user_id, m.name::text AS name, m.description, m.is_duration,
           m.duration_secs, m.tutorial_link, m.muscles, m.created_at,
           COALESCE(lc.like_count, 0)::bigint AS like_count,
           ($4::uuid IS NOT NULL AND EXISTS (
               SELECT 1 FROM exercise_likes v
               WHERE v.exercise_id = m.id AND v.user_id = $4::uuid
           )) AS viewer_liked
    FROM matching m
    LEFT JOIN like_counts lc ON lc.exercise_id = m.id
    ORDER BY like_count {dir}, m.id ASC
    LIMIT $5 OFFSET $6
)
SELECT totals.total_count, page.*
FROM (SELECT COUNT(*)::bigint AS total_count FROM matching) totals
LEFT JOIN page ON TRUE
ORDER BY page.like_count {dir}, page.id ASC
"#
    )
}

fn workout_listing_sql(direction: SortDirection) -> String {
    let dir = direction.as_sql();
    format!(
        r#"
WITH matching AS (
    SELECT w.*
    FROM workouts w
    WHERE ($2::uuid IS NULL OR w.user_id = $2::uuid)
      AND ($1::text = ''
           OR w.name ILIKE '%' || $1::text || '%' ESCAPE '\'
           OR w.description ILIKE '%' || $1::text || '%' ESCAPE '\'
           OR EXISTS (
               SELECT 1
               FROM workout_exercises we
               JOIN exercises e ON e.id = we.exercise_id
               WHERE we.workout_id = w.id
                 AND (e.name ILIKE '%' || $1::text || '%' ESCAPE '\'
                      OR e.description ILIKE '%' || $1::text || '%' ESCAPE '\')
           ))
      AND (cardinality($3::text[]) = 0 OR EXISTS (
               SELECT 1
               FROM workout_exercises we
               JOIN exercises e ON e.id = we.exercise_id
               WHERE we.workout_id = w.id AND e.muscles @> $3::text[]
           ))
),
like_counts AS (
    SELECT l.workout_id, COUNT(DISTINCT l.user_id) AS like_count
    FROM workout_likes l
    JOIN matching m ON m.id = l.workout_id
    GROUP BY l.workout_id
),
review_stats AS (
    SELECT r.workout_id,
           COUNT(DISTINCT r.user_id) AS review_count,
           AVG(r.rating)::float8 AS average_rating
    FROM workout_reviews r
    JOIN matching m ON m.id = r.workout_id
    GROUP BY r.workout_id
),
page AS (
    SELECT m.id, m.user_id, m.name::text AS name, m.description, m.tutorial_link,
           m.created_at,
           COALESCE(lc.like_count, 0)::bigint AS like_count,
           ($4::uuid IS NOT NULL AND EXISTS (
               SELECT 1 FROM workout_likes v
               WHERE v.workout_id = m.id AND v.user_id = $4::uuid
           )) AS viewer_liked,
           COALESCE(rs.review_count, 0)::bigint AS review_count,
           COALESCE(rs.average_rating, 0)::float8 AS average_rating
    FROM matching m
    LEFT JOIN like_counts lc ON lc.workout_id = m.id
    LEFT JOIN review_stats rs ON rs.workout_id = m.id
    ORDER BY like_count {dir}, m.id ASC
    LIMIT $5 OFFSET $6
)
SELECT totals.total_count, page.*
FROM (SELECT COUNT(*)::bigint AS total_count FROM matching) totals
LEFT JOIN page ON TRUE
ORDER BY page.like_count {dir}, page.id ASC
"#
    )
}

const REVIEW_LISTING_SQL: &str = r#"
WITH matching AS (
    SELECT r.*
    FROM workout_reviews r
    WHERE r.workout_id = $1
),
page AS (
    SELECT m.id, m.workout_id, m.user_id, m.rating, m.title::text AS title,
           m.content, m.created_at, u.username::text AS username
    FROM matching m
    JOIN users u ON u.id = m.user_id
    ORDER BY m.created_at DESC, m.id ASC
    LIMIT $2 OFFSET $3
)
SELECT totals.total_count, page.*
FROM (SELECT COUNT(*)::bigint AS total_count FROM matching) totals
LEFT JOIN page ON TRUE
ORDER BY page.created_at DESC, page.id ASC
"#;

fn required<T>(value: Option<T>, table: &str, column: &str) -> Result<T, StorageFailure> {
    value.ok_or_else(|| corrupt_row(table, format!("missing {column}")))
}

fn likes(like_count: Option<i64>, viewer_liked: Option<bool>) -> LikeSummary {
    LikeSummary {
        like_count: like_count.map(count_from_sql).unwrap_or_default(),
        viewer_liked: viewer_liked.unwrap_or(false),
    }
}

/// Split listing rows into the filtered total and the window's items.
///
/// Rows without an item id carry only the total.
fn collect_page<R, T>(
    rows: Vec<R>,
    page: PageRequest,
    total_of: impl Fn(&R) -> i64,
    mut convert: impl FnMut(R) -> Result<Option<T>, StorageFailure>,
) -> Result<Page<T>, StorageFailure> {
    let total = rows.as_slice().first().map(&total_of).map(count_from_sql).unwrap_or(0);
    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(item) = convert(row)? {
            items.push(item);
        }
    }
    Ok(Page::new(items, total, page))
}

fn exercise_summary(row: ExerciseListingRow) -> Result<Option<ExerciseSummary>, StorageFailure> {
    let Some(id) = row.id else {
        return Ok(None);
    };
    let table = "exercises";
    let exercise = exercise_from_row(ExerciseRow {
        id,
        user_id: required(row.user_id, table, "user_id")?,
        name: required(row.name, table, "name")?,
        description: required(row.description, table, "description")?,
        is_duration: required(row.is_duration, table, "is_duration")?,
        duration_secs: required(row.duration_secs, table, "duration_secs")?,
        tutorial_link: row.tutorial_link,
        muscles: required(row.muscles, table, "muscles")?,
        created_at: required(row.created_at, table, "created_at")?,
    })?;
    Ok(Some(ExerciseSummary {
        exercise,
        likes: likes(row.like_count, row.viewer_liked),
    }))
}

fn workout_summary(row: WorkoutListingRow) -> Result<Option<WorkoutSummary>, StorageFailure> {
    let Some(id) = row.id else {
        return Ok(None);
    };
    let table = "workouts";
    let workout = workout_from_row(WorkoutRow {
        id,
        user_id: required(row.user_id, table, "user_id")?,
        name: required(row.name, table, "name")?,
        description: required(row.description, table, "description")?,
        tutorial_link: row.tutorial_link,
        created_at: required(row.created_at, table, "created_at")?,
    });
    Ok(Some(WorkoutSummary {
        workout,
        likes: likes(row.like_count, row.viewer_liked),
        reviews: ReviewSummary {
            review_count: row.review_count.map(count_from_sql).unwrap_or_default(),
            average_rating: row.average_rating.unwrap_or(0.0),
        },
    }))
}

fn review_with_author(row: ReviewListingRow) -> Result<Option<ReviewWithAuthor>, StorageFailure> {
    let Some(id) = row.id else {
        return Ok(None);
    };
    let table = "workout_reviews";
    let rating = required(row.rating, table, "rating")?;
    let username = required(row.username, table, "username")?;
    let review = Review {
        id: ReviewId::from_uuid(id),
        workout_id: WorkoutId::from_uuid(required(row.workout_id, table, "workout_id")?),
        author: UserId::from_uuid(required(row.user_id, table, "user_id")?),
        rating: Rating::new(i64::from(rating)).map_err(|err| corrupt_row(table, err))?,
        title: required(row.title, table, "title")?,
        content: required(row.content, table, "content")?,
        created_at: required(row.created_at, table, "created_at")?,
    };
    Ok(Some(ReviewWithAuthor {
        review,
        author_username: Username::new(username).map_err(|err| corrupt_row("users", err))?,
    }))
}

fn optional_uuid(user: Option<&UserId>) -> Option<Uuid> {
    user.map(|id| *id.as_uuid())
}

#[async_trait]
impl ListingRepository for DieselListingRepository {
    async fn list_exercises(
        &self,
        query: &ListingQuery,
    ) -> Result<Page<ExerciseSummary>, ListingRepositoryError> {
        let sql = exercise_listing_sql(query.sort);

        let rows: Vec<ExerciseListingRow> = with_deadline(&self.pool, async {
            let mut conn = self.pool.get().await?;
            let rows = sql_query(sql)
                .bind::<Text, _>(query.search.escaped_for_like())
                .bind::<Nullable<SqlUuid>, _>(optional_uuid(query.owner.as_ref()))
                .bind::<Array<Text>, _>(query.tags.to_vec())
                .bind::<Nullable<SqlUuid>, _>(optional_uuid(query.viewer.as_ref()))
                .bind::<BigInt, _>(query.page.sql_limit())
                .bind::<BigInt, _>(query.page.sql_offset())
                .load(&mut conn)
                .await?;
            Ok(rows)
        })
        .await
        .map_err(map_failure)?;

        collect_page(rows, query.page, |row| row.total_count, exercise_summary)
            .map_err(map_failure)
    }

    async fn list_workouts(
        &self,
        query: &ListingQuery,
    ) -> Result<Page<WorkoutSummary>, ListingRepositoryError> {
        let sql = workout_listing_sql(query.sort);

        let rows: Vec<WorkoutListingRow> = with_deadline(&self.pool, async {
            let mut conn = self.pool.get().await?;
            let rows = sql_query(sql)
                .bind::<Text, _>(query.search.escaped_for_like())
                .bind::<Nullable<SqlUuid>, _>(optional_uuid(query.owner.as_ref()))
                .bind::<Array<Text>, _>(query.tags.to_vec())
                .bind::<Nullable<SqlUuid>, _>(optional_uuid(query.viewer.as_ref()))
                .bind::<BigInt, _>(query.page.sql_limit())
                .bind::<BigInt, _>(query.page.sql_offset())
                .load(&mut conn)
                .await?;
            Ok(rows)
        })
        .await
        .map_err(map_failure)?;

        collect_page(rows, query.page, |row| row.total_count, workout_summary)
            .map_err(map_failure)
    }

    async fn reviews_for_workout(
        &self,
        workout_id: &WorkoutId,
        page: &PageRequest,
    ) -> Result<Page<ReviewWithAuthor>, ListingRepositoryError> {
        let rows: Vec<ReviewListingRow> = with_deadline(&self.pool, async {
            let mut conn = self.pool.get().await?;
            let rows = sql_query(REVIEW_LISTING_SQL)
                .bind::<SqlUuid, _>(*workout_id.as_uuid())
                .bind::<BigInt, _>(page.sql_limit())
                .bind::<BigInt, _>(page.sql_offset())
                .load(&mut conn)
                .await?;
            Ok(rows)
        })
        .await
        .map_err(map_failure)?;

        collect_page(rows, *page, |row| row.total_count, review_with_author).map_err(map_failure)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::NewReview;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn total_only_exercise_row(total: i64) -> ExerciseListingRow {
        ExerciseListingRow {
            total_count: total,
            id: None,
            user_id: None,
            name: None,
            description: None,
            is_duration: None,
            duration_secs: None,
            tutorial_link: None,
            muscles: None,
            created_at: None,
            like_count: None,
            viewer_liked: None,
        }
    }

    fn exercise_row(total: i64, likes: i64) -> ExerciseListingRow {
        ExerciseListingRow {
            id: Some(Uuid::new_v4()),
            user_id: Some(Uuid::new_v4()),
            name: Some("Push-up".to_owned()),
            description: Some("Chest to floor".to_owned()),
            is_duration: Some(false),
            duration_secs: Some(0),
            muscles: Some(vec!["chest".to_owned(), "triceps".to_owned()]),
            created_at: Some(Utc::now()),
            like_count: Some(likes),
            viewer_liked: Some(true),
            ..total_only_exercise_row(total)
        }
    }

    fn review_listing_row(review: &NewReview, username: &str, total: i64) -> ReviewListingRow {
        ReviewListingRow {
            total_count: total,
            id: Some(*review.id.as_uuid()),
            workout_id: Some(*review.workout_id.as_uuid()),
            user_id: Some(*review.author.as_uuid()),
            rating: Some(i16::from(review.rating.get())),
            title: Some(review.title.clone()),
            content: Some(review.content.clone()),
            created_at: Some(review.created_at),
            username: Some(username.to_owned()),
        }
    }

    #[rstest]
    #[case(SortDirection::Desc, "ORDER BY like_count DESC, m.id ASC")]
    #[case(SortDirection::Asc, "ORDER BY like_count ASC, m.id ASC")]
    fn sort_direction_is_spliced_into_both_orderings(
        #[case] direction: SortDirection,
        #[case] expected: &str,
    ) {
        for sql in [exercise_listing_sql(direction), workout_listing_sql(direction)] {
            assert!(sql.contains(expected), "missing ordering in {sql}");
            assert!(sql.contains(&format!("page.like_count {}", direction.as_sql())));
        }
    }

    #[rstest]
    fn workout_listing_filters_through_linked_exercises() {
        let sql = workout_listing_sql(SortDirection::Desc);

        assert!(sql.contains("e.muscles @> $3::text[]"));
        assert!(sql.contains("COUNT(DISTINCT r.user_id)"));
        assert!(sql.contains("COALESCE(rs.average_rating, 0)"));
    }

    #[rstest]
    fn page_past_the_end_keeps_the_total() {
        let request = PageRequest::first(10).expect("valid window").next();

        let page = collect_page(
            vec![total_only_exercise_row(7)],
            request,
            |row| row.total_count,
            exercise_summary,
        )
        .expect("page");

        assert!(page.items().is_empty());
        assert_eq!(page.total_count(), 7);
    }

    #[rstest]
    fn listing_rows_carry_aggregates() {
        let request = PageRequest::first(2).expect("valid window");

        let page = collect_page(
            vec![exercise_row(5, 3), exercise_row(5, 1)],
            request,
            |row| row.total_count,
            exercise_summary,
        )
        .expect("page");

        let counts: Vec<u64> = page
            .items()
            .iter()
            .map(|item| item.likes.like_count)
            .collect();
        assert_eq!(counts, vec![3, 1]);
        assert_eq!(page.total_count(), 5);
        assert!(page.items().iter().all(|item| item.likes.viewer_liked));
    }

    #[rstest]
    fn half_populated_rows_are_corrupt() {
        let mut row = exercise_row(1, 0);
        row.name = None;

        assert!(exercise_summary(row).is_err());
    }

    #[rstest]
    fn review_rows_carry_the_author_username() {
        let created_at = Utc
            .with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
            .single()
            .expect("valid time");
        let review = NewReview::new(
            WorkoutId::random(),
            UserId::random(),
            Rating::new(4).expect("valid rating"),
            "Solid",
            "Good pacing",
            created_at,
        )
        .expect("valid review");

        let item = review_with_author(review_listing_row(&review, "ada_l", 1))
            .expect("valid row")
            .expect("item present");

        assert_eq!(item.author_username.as_ref(), "ada_l");
        assert_eq!(item.review.rating.get(), 4);
        assert_eq!(item.review.created_at, created_at);
    }
}
