use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio_postgres::Row;
use tracing::instrument;
use uuid::Uuid;

use crate::db::PgPool;
use crate::store::{StoreError, overlap_keys};
use crate::{
    CandidateProfile, ExperienceLevel, JobRequirement, SkillWeightMap, StoredJobRequirement,
};

fn limit_param(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[instrument(skip(pool, requirement), fields(title = %requirement.title))]
pub async fn insert_job_requirement(
    pool: &PgPool,
    requirement: &JobRequirement,
    experience_level: ExperienceLevel,
) -> Result<StoredJobRequirement, StoreError> {
    let client = pool.get().await?;

    let id = Uuid::new_v4();
    let skills = serde_json::to_value(&requirement.skills)
        .map_err(|e| StoreError::Mapping(e.to_string()))?;
    let skill_names: Vec<String> = requirement.skills.keys().cloned().collect();
    let skill_keys = overlap_keys(requirement.skills.keys());

    let row = client
        .query_one(
            r#"
            INSERT INTO cvm.job_requirements (
                id, job_title, industry, detailed_description, experience_level,
                skills, skill_names, skill_keys
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING created_at
            "#,
            &[
                &id,
                &requirement.title,
                &requirement.industry,
                &requirement.description,
                &experience_level.as_str(),
                &skills,
                &skill_names,
                &skill_keys,
            ],
        )
        .await?;

    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(StoredJobRequirement {
        id,
        requirement: requirement.clone(),
        experience_level,
        created_at,
    })
}

#[instrument(skip(pool, profile), fields(id = %profile.id))]
pub async fn insert_candidate_profile(
    pool: &PgPool,
    profile: &CandidateProfile,
) -> Result<(), StoreError> {
    let client = pool.get().await?;

    let industries: Vec<String> = profile.industries.iter().cloned().collect();
    let skills: Vec<String> = profile.skills.iter().cloned().collect();
    let skill_keys = overlap_keys(&profile.skills);

    client
        .execute(
            r#"
            INSERT INTO cvm.candidate_profiles (
                id, full_content, industries, skills, skill_keys, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
            &[
                &profile.id,
                &profile.full_content,
                &industries,
                &skills,
                &skill_keys,
                &profile.created_at,
            ],
        )
        .await?;

    Ok(())
}

fn candidate_from_row(row: &Row) -> Result<CandidateProfile, StoreError> {
    let industries: Vec<String> = row.try_get("industries")?;
    let skills: Vec<String> = row.try_get("skills")?;

    Ok(CandidateProfile {
        id: row.try_get("id")?,
        full_content: row.try_get("full_content")?,
        industries: industries.into_iter().collect(),
        skills: skills.into_iter().collect(),
        created_at: row.try_get("created_at")?,
    })
}

fn job_from_row(row: &Row) -> Result<StoredJobRequirement, StoreError> {
    let level: String = row.try_get("experience_level")?;
    let experience_level = ExperienceLevel::parse(&level)
        .ok_or_else(|| StoreError::Mapping(format!("unknown experience level: {level}")))?;
    let skills: Value = row.try_get("skills")?;
    let skills: SkillWeightMap =
        serde_json::from_value(skills).map_err(|e| StoreError::Mapping(e.to_string()))?;

    Ok(StoredJobRequirement {
        id: row.try_get("id")?,
        requirement: JobRequirement {
            title: row.try_get("job_title")?,
            industry: row.try_get("industry")?,
            description: row.try_get("detailed_description")?,
            skills,
        },
        experience_level,
        created_at: row.try_get("created_at")?,
    })
}

#[instrument(skip(pool, skills), fields(skills = skills.len()))]
pub async fn query_candidates_by_skill_overlap(
    pool: &PgPool,
    skills: &BTreeSet<String>,
    limit: usize,
) -> Result<Vec<CandidateProfile>, StoreError> {
    let client = pool.get().await?;
    let keys = overlap_keys(skills);

    let rows = client
        .query(
            r#"
            SELECT id, full_content, industries, skills, created_at
            FROM cvm.candidate_profiles
            WHERE skill_keys && $1::text[]
            ORDER BY created_at, id
            LIMIT $2
            "#,
            &[&keys, &limit_param(limit)],
        )
        .await?;

    rows.iter().map(candidate_from_row).collect()
}

#[instrument(skip(pool, skills), fields(skills = skills.len()))]
pub async fn query_jobs_by_skill_overlap(
    pool: &PgPool,
    skills: &BTreeSet<String>,
    limit: usize,
) -> Result<Vec<StoredJobRequirement>, StoreError> {
    let client = pool.get().await?;
    let keys = overlap_keys(skills);

    let rows = client
        .query(
            r#"
            SELECT id, job_title, industry, detailed_description, experience_level,
                   skills, created_at
            FROM cvm.job_requirements
            WHERE skill_keys && $1::text[]
            ORDER BY created_at, id
            LIMIT $2
            "#,
            &[&keys, &limit_param(limit)],
        )
        .await?;

    rows.iter().map(job_from_row).collect()
}
