//! Canonical sample values shared across service tests.

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{
    AccountStatus, Age, CurrentAttributes, Email, Goal, HeightCm, ProfileAttributes,
    RegistrationRequest, User, UserId, Username, WeightKg,
};

pub fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub fn registration_request() -> RegistrationRequest {
    RegistrationRequest {
        email: "ada@example.com".into(),
        username: "ada_l".into(),
        password: "correct horse battery".into(),
        is_male: false,
        height_cm: 168,
        goal: "lose".into(),
        weight_goal_kg: 60.0,
        age: 36,
        weight_kg: 66.0,
    }
}

pub fn sample_user(id: UserId, status: AccountStatus) -> User {
    User::new(
        id,
        Email::new("ada@example.com").expect("valid email"),
        Username::new("ada_l").expect("valid username"),
        status,
        fixture_now(),
    )
}

pub fn sample_attributes(user_id: UserId, current_weight: f64) -> CurrentAttributes {
    CurrentAttributes {
        user_id,
        attributes: ProfileAttributes {
            is_male: true,
            height: HeightCm::new(180).expect("valid height"),
            goal: Goal::Maintain,
            weight_goal: WeightKg::new(78.0).expect("valid weight goal"),
            age: Age::new(30).expect("valid age"),
        },
        current_weight: WeightKg::new(current_weight).expect("valid weight"),
    }
}
