//! Shared helpers for the cluster-backed integration suites.
//!
//! Each suite compiles this module separately and uses a subset of it.
#![allow(dead_code, reason = "each suite uses a subset of the helpers")]

mod cluster_skip;
mod pg_embed;

use std::sync::Mutex;

use atomfit::domain::RegistrationRequest;
use atomfit::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use tokio::runtime::Runtime;
use uuid::Uuid;

pub use cluster_skip::handle_cluster_setup_failure;

/// Render a `postgres` error with its SQLSTATE, detail and hint.
///
/// The `Display` impl collapses server errors to `db error`.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    if let Some(hint) = db_error.hint() {
        summary.push_str("; hint: ");
        summary.push_str(hint);
    }
    summary
}

/// Drop and recreate `name` so each suite starts from an empty database.
///
/// Uses `postgres` rather than Diesel because `DROP DATABASE` cannot run
/// inside a transaction.
pub fn reset_database(cluster: &TestCluster, name: &str) -> Result<(), String> {
    let admin_url = cluster.connection().database_url("postgres");
    let mut client =
        Client::connect(&admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!(
            "DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE); CREATE DATABASE \"{name}\";"
        ))
        .map_err(|err| format_postgres_error(&err))
}

/// Apply the embedded migrations to `url`.
pub fn migrate_schema(url: &str) -> Result<(), String> {
    run_migrations(url).map(|_| ()).map_err(|err| err.to_string())
}

/// Run a scalar `COUNT(*)`-style query.
pub fn count_rows(url: &str, sql: &str) -> Result<i64, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .query_one(sql, &[])
        .map(|row| row.get::<_, i64>(0))
        .map_err(|err| format_postgres_error(&err))
}

/// Cluster, runtime and pool for one suite.
pub struct Harness {
    pub runtime: Runtime,
    pub cluster: TestCluster,
    pub pool: DbPool,
    pub database_url: String,
}

/// Start the cluster, create a fresh database named after `prefix` and open
/// a small pool on it.
///
/// Names are unique per call so parallel tests in one suite never reset each
/// other's database.
pub fn provision(prefix: &str, max_size: u32) -> Result<Harness, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = pg_embed::test_cluster()?;
    let database = format!("{prefix}_{}", Uuid::new_v4().simple());
    reset_database(&cluster, &database)?;
    let database_url = cluster.connection().database_url(&database);
    migrate_schema(&database_url)?;

    let config = PoolConfig::new(database_url.clone())
        .with_max_size(max_size)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(Harness {
        runtime,
        cluster,
        pool,
        database_url,
    })
}

/// Clock that only moves when told to.
pub struct SteppingClock(Mutex<DateTime<Utc>>);

impl SteppingClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self(Mutex::new(start))
    }

    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.0.lock().unwrap_or_else(|err| err.into_inner());
        *now += delta;
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap_or_else(|err| err.into_inner())
    }
}

/// Fixed midday start so day arithmetic never straddles midnight.
pub fn suite_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0)
        .single()
        .expect("valid start timestamp")
}

/// Valid registration for `handle`: `{handle}@example.com`, username
/// `{handle}_fit`.
pub fn registration(handle: &str) -> RegistrationRequest {
    RegistrationRequest {
        email: format!("{handle}@example.com"),
        username: format!("{handle}_fit"),
        password: "correct horse battery".to_owned(),
        is_male: true,
        height_cm: 180,
        goal: "maintain".to_owned(),
        weight_goal_kg: 78.0,
        age: 30,
        weight_kg: 82.5,
    }
}
