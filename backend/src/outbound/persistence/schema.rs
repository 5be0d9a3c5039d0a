//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. When
//! migrations change the schema, regenerate with `diesel print-schema` or
//! update by hand.

diesel::table! {
    /// Registered accounts. `email` and `username` are unique.
    users (id) {
        id -> Uuid,
        #[max_length = 255]
        email -> Varchar,
        #[max_length = 20]
        username -> Varchar,
        /// PHC-encoded password hash.
        password_hash -> Text,
        /// False until the invitation is consumed.
        is_active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Profile attributes, one row per user.
    user_attributes (user_id) {
        user_id -> Uuid,
        is_male -> Bool,
        height_cm -> Int4,
        #[max_length = 16]
        goal -> Varchar,
        weight_goal_kg -> Float8,
        age -> Int4,
    }
}

diesel::table! {
    /// Daily weight samples keyed by `(user_id, recorded_on)`.
    user_weights (user_id, recorded_on) {
        user_id -> Uuid,
        recorded_on -> Date,
        weight_kg -> Float8,
    }
}

diesel::table! {
    /// Outstanding invitations; at most one per user.
    invitations (token_digest) {
        /// Hex SHA-256 of the plaintext token.
        #[max_length = 64]
        token_digest -> Varchar,
        user_id -> Uuid,
        expires_at -> Timestamptz,
    }
}

diesel::table! {
    exercises (id) {
        id -> Uuid,
        user_id -> Uuid,
        #[max_length = 255]
        name -> Varchar,
        description -> Text,
        is_duration -> Bool,
        duration_secs -> Int4,
        tutorial_link -> Nullable<Text>,
        muscles -> Array<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    workouts (id) {
        id -> Uuid,
        user_id -> Uuid,
        #[max_length = 255]
        name -> Varchar,
        description -> Text,
        tutorial_link -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ordered exercise links; an exercise appears once per workout.
    workout_exercises (workout_id, exercise_id) {
        workout_id -> Uuid,
        exercise_id -> Uuid,
        position -> Int4,
        duration_secs -> Int4,
    }
}

diesel::table! {
    exercise_likes (user_id, exercise_id) {
        user_id -> Uuid,
        exercise_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    workout_likes (user_id, workout_id) {
        user_id -> Uuid,
        workout_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only reviews; several per user and workout are allowed.
    workout_reviews (id) {
        id -> Uuid,
        workout_id -> Uuid,
        user_id -> Uuid,
        rating -> Int2,
        #[max_length = 255]
        title -> Varchar,
        content -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(user_attributes -> users (user_id));
diesel::joinable!(user_weights -> users (user_id));
diesel::joinable!(invitations -> users (user_id));
diesel::joinable!(exercises -> users (user_id));
diesel::joinable!(workouts -> users (user_id));
diesel::joinable!(workout_exercises -> workouts (workout_id));
diesel::joinable!(workout_exercises -> exercises (exercise_id));
diesel::joinable!(workout_reviews -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    user_attributes,
    user_weights,
    invitations,
    exercises,
    workouts,
    workout_exercises,
    exercise_likes,
    workout_likes,
    workout_reviews,
);
