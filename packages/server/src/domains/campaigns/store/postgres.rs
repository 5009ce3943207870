//! PostgreSQL-backed campaign store.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::CampaignStore;
use crate::domains::campaigns::models::{Campaign, CampaignStatus, NewAutoLead};

/// Row shape as stored; converted into the domain model on read.
#[derive(sqlx::FromRow)]
struct CampaignRow {
    id: Uuid,
    name: String,
    keywords: Json<Vec<String>>,
    region: String,
    status: String,
    scheduled_at: Option<DateTime<Utc>>,
    recurrence: Option<String>,
    leads_generated: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CampaignRow> for Campaign {
    type Error = anyhow::Error;

    fn try_from(row: CampaignRow) -> Result<Self> {
        let status = CampaignStatus::parse(&row.status)
            .ok_or_else(|| anyhow!("unknown campaign status: {}", row.status))?;
        Ok(Campaign {
            id: row.id,
            name: row.name,
            keywords: row.keywords.0,
            region: row.region,
            status,
            scheduled_at: row.scheduled_at,
            recurrence: row.recurrence,
            leads_generated: row.leads_generated,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Campaign store backed by Postgres via sqlx.
pub struct PostgresCampaignStore {
    pool: PgPool,
}

impl PostgresCampaignStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CampaignStore for PostgresCampaignStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Campaign>> {
        let row = sqlx::query_as::<_, CampaignRow>("SELECT * FROM campaigns WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Campaign::try_from).transpose()
    }

    async fn find_due_scheduled(&self, now: DateTime<Utc>) -> Result<Vec<Campaign>> {
        let rows = sqlx::query_as::<_, CampaignRow>(
            r#"
            SELECT * FROM campaigns
            WHERE status = 'scheduled'
              AND scheduled_at IS NOT NULL
              AND scheduled_at <= $1
            ORDER BY scheduled_at
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Campaign::try_from).collect()
    }

    async fn set_status(&self, id: Uuid, status: CampaignStatus) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE campaigns
            SET status = $1,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(status.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn commit_run(&self, id: Uuid, leads: &[NewAutoLead]) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        for lead in leads {
            sqlx::query(
                r#"
                INSERT INTO auto_leads (
                    id, campaign_id, company_name, website, linkedin_url, email,
                    phone, address, industry, keywords_matched, relevance_score,
                    source, raw_data, created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, NOW())
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(lead.campaign_id)
            .bind(&lead.company_name)
            .bind(&lead.website)
            .bind(&lead.linkedin_url)
            .bind(&lead.email)
            .bind(&lead.phone)
            .bind(&lead.address)
            .bind(&lead.industry)
            .bind(Json(&lead.keywords_matched))
            .bind(lead.relevance_score)
            .bind(&lead.source)
            .bind(&lead.raw_data)
            .execute(&mut *tx)
            .await?;
        }

        let committed = leads.len() as i64;

        sqlx::query(
            r#"
            UPDATE campaigns
            SET status = 'completed',
                leads_generated = $1,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(committed as i32)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(committed)
    }

    async fn reschedule(&self, id: Uuid, next_at: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE campaigns
            SET status = 'scheduled',
                scheduled_at = $1,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(next_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn count_leads(&self, id: Uuid) -> Result<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM auto_leads WHERE campaign_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count.0)
    }
}
