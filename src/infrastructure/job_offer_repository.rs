//! SQLite implementation of [`JobOfferRepository`]
//!
//! Timestamps are stored as fixed-width RFC3339 UTC text so lexical
//! comparison in SQL matches chronological order.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::domain::constants::UNKNOWN_FIELD;
use crate::domain::job_offer::{GroupCount, JobOffer, NewJobOffer};
use crate::domain::repositories::JobOfferRepository;

const SELECT_COLUMNS: &str =
    "SELECT id, title, company, location, description, url, source, ingested_at FROM job_offers";

pub struct SqliteJobOfferRepository {
    pool: SqlitePool,
}

impl SqliteJobOfferRepository {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Helper method to convert database row to JobOffer entity
    fn row_to_job_offer(row: &sqlx::sqlite::SqliteRow) -> Result<JobOffer> {
        let ingested_at: String = row.try_get("ingested_at")?;
        let ingested_at = DateTime::parse_from_rfc3339(&ingested_at)
            .map_err(|e| anyhow!("Failed to parse ingested_at: {}", e))?
            .with_timezone(&Utc);

        Ok(JobOffer {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            company: row.try_get("company")?,
            location: row.try_get("location")?,
            description: row.try_get("description")?,
            url: row.try_get("url")?,
            source: row.try_get("source")?,
            ingested_at,
        })
    }

    fn row_to_group_count(row: &sqlx::sqlite::SqliteRow) -> Result<GroupCount> {
        let offer_count: i64 = row.try_get("offer_count")?;
        Ok(GroupCount {
            name: row.try_get("name")?,
            offer_count: u32::try_from(offer_count)?,
        })
    }

    async fn breakdown(&self, column: &'static str, limit: u32) -> Result<Vec<GroupCount>> {
        let sql = format!(
            "SELECT {column} AS name, COUNT(*) AS offer_count FROM job_offers \
             WHERE {column} != $1 \
             GROUP BY {column} \
             ORDER BY offer_count DESC, name ASC \
             LIMIT $2"
        );

        let rows = sqlx::query(&sql)
            .bind(UNKNOWN_FIELD)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_group_count).collect()
    }
}

pub(crate) fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn to_u64(value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|e| anyhow!("Negative count from database: {}", e))
}

#[async_trait]
impl JobOfferRepository for SqliteJobOfferRepository {
    async fn find_by_url(&self, url: &str) -> Result<Option<JobOffer>> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE url = $1"))
            .bind(url)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_job_offer(&row)?)),
            None => Ok(None),
        }
    }

    async fn exists_by_url(&self, url: &str) -> Result<bool> {
        let exists: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM job_offers WHERE url = $1)")
                .bind(url)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists != 0)
    }

    async fn insert_page(&self, offers: &[NewJobOffer]) -> Result<Vec<i64>> {
        if offers.is_empty() {
            return Ok(Vec::new());
        }

        // Dropping the transaction without commit rolls it back
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(offers.len());

        for offer in offers {
            let result = sqlx::query(
                r"
                INSERT INTO job_offers
                    (title, company, location, description, url, source, ingested_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ",
            )
            .bind(offer.title())
            .bind(offer.company())
            .bind(offer.location())
            .bind(offer.description())
            .bind(offer.url())
            .bind(offer.source())
            .bind(format_timestamp(offer.ingested_at()))
            .execute(&mut *tx)
            .await?;

            ids.push(result.last_insert_rowid());
        }

        tx.commit().await?;
        debug!("Committed {} job offers", ids.len());

        Ok(ids)
    }

    async fn all_descriptions(&self) -> Result<Vec<String>> {
        let descriptions: Vec<String> =
            sqlx::query_scalar("SELECT description FROM job_offers ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(descriptions)
    }

    async fn count_all(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_offers")
            .fetch_one(&self.pool)
            .await?;
        to_u64(count)
    }

    async fn count_since(&self, since: DateTime<Utc>) -> Result<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM job_offers WHERE ingested_at >= $1")
                .bind(format_timestamp(since))
                .fetch_one(&self.pool)
                .await?;
        to_u64(count)
    }

    async fn count_distinct_companies(&self) -> Result<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(DISTINCT company) FROM job_offers WHERE company != $1")
                .bind(UNKNOWN_FIELD)
                .fetch_one(&self.pool)
                .await?;
        to_u64(count)
    }

    async fn company_breakdown(&self, limit: u32) -> Result<Vec<GroupCount>> {
        self.breakdown("company", limit).await
    }

    async fn location_breakdown(&self, limit: u32) -> Result<Vec<GroupCount>> {
        self.breakdown("location", limit).await
    }

    async fn recent(&self, limit: u32) -> Result<Vec<JobOffer>> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} ORDER BY ingested_at DESC, id DESC LIMIT $1"
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_job_offer).collect()
    }

    async fn delete_ingested_before(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM job_offers WHERE ingested_at < $1")
            .bind(format_timestamp(cutoff))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
