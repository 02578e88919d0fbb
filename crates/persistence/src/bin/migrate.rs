#![deny(warnings)]

//! Create the on-device scenario database and apply migrations.
//!
//! Usage: `migrate [SQLITE_URL]`. Falls back to `PLANNER_DB_URL`, then to the
//! default saves location.

use persistence::{default_sqlite_url, init_db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("PLANNER_DB_URL").ok())
        .unwrap_or_else(|| default_sqlite_url().to_string());
    let pool = init_db(&url).await?;
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM scenarios")
        .fetch_one(&pool)
        .await?;
    println!("DB migrated at {url} ({count} scenarios)");
    Ok(())
}
