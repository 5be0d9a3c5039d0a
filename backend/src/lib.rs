//! Account onboarding, weight ledger and catalogue listings.
//!
//! The crate is arranged hexagonally: [`domain`] holds the entities,
//! validation and services; [`outbound`] provides the PostgreSQL, Argon2 and
//! mail adapters behind the domain's ports; [`config`] and [`telemetry`]
//! wire the process together.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;
