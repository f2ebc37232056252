//! Schema migrations and optional demo seeding.
//!
//! Migrations are embedded in the binary and applied on startup, so a fresh
//! database file becomes usable without any out-of-band tooling. Seeding is
//! insert-or-ignore keyed on the unique email, which makes repeated startups
//! idempotent.

use chrono::Utc;
use diesel::prelude::*;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;
use uuid::Uuid;

use super::models::NewUserRow;
use super::pool::{DbPool, RunError};
use super::schema::users;
use crate::domain::{Role, User};

/// All migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Apply any pending migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), RunError> {
    pool.run(|conn| {
        let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|err| {
            diesel::result::Error::QueryBuilderError(
                format!("migration failed: {err}").into(),
            )
        })?;
        if !applied.is_empty() {
            info!(count = applied.len(), "applied pending migrations");
        }
        Ok(())
    })
    .await
}

fn demo_account(first_name: &str, last_name: &str, email: &str, role: Role) -> User {
    User {
        id: Uuid::new_v4(),
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        email: email.to_owned(),
        phone: None,
        role,
        created_at: Utc::now(),
    }
}

/// Insert the demo moderator and demo user accounts if they are absent.
pub async fn seed_demo_accounts(pool: &DbPool) -> Result<(), RunError> {
    let rows = vec![
        NewUserRow::from_domain(
            &demo_account("Site", "Moderator", "moderator@kerbside.dev", Role::Moderator),
            "changeme",
        ),
        NewUserRow::from_domain(
            &demo_account("Demo", "User", "demo@kerbside.dev", Role::Standard),
            "demo",
        ),
    ];

    pool.run(move |conn| {
        diesel::insert_or_ignore_into(users::table)
            .values(&rows)
            .execute(conn)
            .map(|_| ())
    })
    .await?;
    info!("demo accounts present");
    Ok(())
}
