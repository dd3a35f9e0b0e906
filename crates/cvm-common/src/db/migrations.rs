use deadpool_postgres::PoolError;
use thiserror::Error;
use tokio_postgres::Error as PgError;
use tracing::{info, instrument};

use crate::db::PgPool;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("failed to run migration: {0}")]
    Postgres(#[from] PgError),
}

struct Migration {
    id: i32,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        id: 1,
        description: "job requirements and candidate profiles",
        sql: r#"
CREATE TABLE IF NOT EXISTS cvm.job_requirements (
    id UUID PRIMARY KEY,
    job_title TEXT NOT NULL,
    industry TEXT NOT NULL,
    detailed_description TEXT NOT NULL,
    experience_level TEXT NOT NULL
        CHECK (experience_level IN ('junior', 'mid', 'senior')),
    skills JSONB NOT NULL,
    skill_names TEXT[] NOT NULL DEFAULT '{}',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS cvm.candidate_profiles (
    id UUID PRIMARY KEY,
    full_content TEXT NOT NULL,
    industries TEXT[] NOT NULL DEFAULT '{}',
    skills TEXT[] NOT NULL DEFAULT '{}',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
"#,
    },
    Migration {
        id: 2,
        description: "lowercased skill arrays for overlap queries",
        sql: r#"
ALTER TABLE cvm.job_requirements
    ADD COLUMN IF NOT EXISTS skill_keys TEXT[] NOT NULL DEFAULT '{}';
ALTER TABLE cvm.candidate_profiles
    ADD COLUMN IF NOT EXISTS skill_keys TEXT[] NOT NULL DEFAULT '{}';

UPDATE cvm.job_requirements
    SET skill_keys = ARRAY(SELECT lower(s) FROM unnest(skill_names) AS s);
UPDATE cvm.candidate_profiles
    SET skill_keys = ARRAY(SELECT lower(s) FROM unnest(skills) AS s);

CREATE INDEX IF NOT EXISTS idx_job_requirements_skill_keys
    ON cvm.job_requirements USING GIN (skill_keys);
CREATE INDEX IF NOT EXISTS idx_candidate_profiles_skill_keys
    ON cvm.candidate_profiles USING GIN (skill_keys);
CREATE INDEX IF NOT EXISTS idx_candidate_profiles_created
    ON cvm.candidate_profiles (created_at, id);
"#,
    },
];

#[instrument(skip(pool))]
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrationError> {
    let mut client = pool.get().await?;
    client
        .batch_execute(
            "CREATE SCHEMA IF NOT EXISTS cvm;
             CREATE TABLE IF NOT EXISTS cvm.schema_migrations (
                id INTEGER PRIMARY KEY,
                description TEXT NOT NULL,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
             );",
        )
        .await?;

    for migration in MIGRATIONS {
        let already_applied: bool = client
            .query_one(
                "SELECT EXISTS (SELECT 1 FROM cvm.schema_migrations WHERE id = $1)",
                &[&migration.id],
            )
            .await?
            .get(0);

        if already_applied {
            continue;
        }

        let tx = client.transaction().await?;
        tx.batch_execute(migration.sql).await?;
        tx.execute(
            "INSERT INTO cvm.schema_migrations (id, description) VALUES ($1, $2)",
            &[&migration.id, &migration.description],
        )
        .await?;
        tx.commit().await?;

        info!(
            id = migration.id,
            description = migration.description,
            "applied migration"
        );
    }

    Ok(())
}
