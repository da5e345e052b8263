use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};

use crate::config::Config;

pub mod donations;
pub mod fields;
pub mod money;
pub mod requests;
pub mod users;

/// Table name and the bundled SQL that creates it. Each file also creates the
/// enum types its table uses.
const SCHEMAS: [(&str, &str); 4] = [
    ("users", include_str!("../../databases/users/schema.sql")),
    ("requests", include_str!("../../databases/requests/schema.sql")),
    ("donations", include_str!("../../databases/donations/schema.sql")),
    ("money_donations", include_str!("../../databases/money_donations/schema.sql")),
];

fn absent<'a>(required: &[&'a str], present: &[String]) -> Vec<&'a str> {
    required
        .iter()
        .copied()
        .filter(|table| !present.iter().any(|found| found == table))
        .collect()
}

async fn missing_tables(pool: &PgPool) -> Result<Vec<&'static str>> {
    let required: Vec<&'static str> = SCHEMAS.iter().map(|(table, _)| *table).collect();

    let present: Vec<String> = sqlx::query_scalar(
        "SELECT table_name::TEXT FROM information_schema.tables
         WHERE table_schema = 'public' AND table_name = ANY($1::TEXT[])",
    )
    .bind(&required[..])
    .fetch_all(pool)
    .await
    .context("Failed to inspect existing tables")?;

    Ok(absent(&required, &present))
}

/// Connects to Postgres and creates any missing tables. The caller owns the
/// returned pool and closes it on shutdown.
pub async fn setup_backend(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    ensure_schema(&pool).await?;
    Ok(pool)
}

pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    let missing = missing_tables(pool).await?;
    if missing.is_empty() {
        log::info!("All required tables exist.");
        return Ok(());
    }

    log::info!("Creating missing tables: {}", missing.join(", "));
    for (table, sql) in SCHEMAS.iter().filter(|(table, _)| missing.contains(table)) {
        pool.execute(*sql)
            .await
            .with_context(|| format!("Failed to create table {}", table))?;
    }
    log::info!("Schema ready.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_bundled_schema_creates_its_table() {
        for (table, sql) in SCHEMAS {
            assert!(
                sql.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", table)),
                "missing schema for {}",
                table
            );
        }
    }

    #[test]
    fn donation_request_link_has_no_foreign_key() {
        let (_, sql) = SCHEMAS[2];
        assert!(sql.contains("related_request_id UUID,"));
        assert!(!sql.contains("REFERENCES"));
    }

    #[test]
    fn only_unlisted_tables_are_reported_missing() {
        let present = vec!["donations".to_string(), "users".to_string()];
        assert_eq!(
            absent(&["users", "requests", "donations", "money_donations"], &present),
            vec!["requests", "money_donations"]
        );
        assert!(absent(&["users"], &["users".to_string()]).is_empty());
    }
}
