//! Shared test doubles for domain service tests.

mod clock;
mod fixtures;

pub use clock::MutableClock;
pub use fixtures::{fixture_now, registration_request, sample_attributes, sample_user};
