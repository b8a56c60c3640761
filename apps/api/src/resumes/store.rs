//! Résumé persistence. Insert-only; list and detail reads.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::resume::{ResumeRow, ResumeSummaryRow};

/// Everything needed to record one processed upload.
#[derive(Debug, Clone)]
pub struct NewResume {
    pub filename: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub structured: Value,
    pub critique: Value,
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn save(&self, resume: NewResume) -> Result<Uuid, sqlx::Error>;

    /// Summaries, most recent upload first.
    async fn list_all(&self) -> Result<Vec<ResumeSummaryRow>, sqlx::Error>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<ResumeRow>, sqlx::Error>;
}

pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn save(&self, resume: NewResume) -> Result<Uuid, sqlx::Error> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO resumes
                (id, filename, name, email, phone, structured, critique)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(id)
        .bind(&resume.filename)
        .bind(&resume.name)
        .bind(&resume.email)
        .bind(&resume.phone)
        .bind(&resume.structured)
        .bind(&resume.critique)
        .execute(&self.pool)
        .await?;

        info!("Stored resume {id} ({})", resume.filename);
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<ResumeSummaryRow>, sqlx::Error> {
        sqlx::query_as::<_, ResumeSummaryRow>(
            r#"
            SELECT id, filename, uploaded_at, name, email, phone
            FROM resumes
            ORDER BY uploaded_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<ResumeRow>, sqlx::Error> {
        sqlx::query_as::<_, ResumeRow>(
            r#"
            SELECT id, filename, uploaded_at, name, email, phone, structured, critique
            FROM resumes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use uuid::Uuid;

    use super::{NewResume, ResumeStore};
    use crate::models::resume::{ResumeRow, ResumeSummaryRow};

    /// In-process store for handler and pipeline tests.
    #[derive(Default)]
    pub struct InMemoryResumeStore {
        rows: Mutex<Vec<ResumeRow>>,
        fail_writes: AtomicBool,
    }

    impl InMemoryResumeStore {
        pub fn failing() -> Self {
            let store = Self::default();
            store.fail_writes.store(true, Ordering::SeqCst);
            store
        }

        pub fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ResumeStore for InMemoryResumeStore {
        async fn save(&self, resume: NewResume) -> Result<Uuid, sqlx::Error> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(sqlx::Error::PoolTimedOut);
            }
            let id = Uuid::new_v4();
            self.rows.lock().unwrap().push(ResumeRow {
                id,
                filename: resume.filename,
                uploaded_at: Utc::now(),
                name: resume.name,
                email: resume.email,
                phone: resume.phone,
                structured: resume.structured,
                critique: resume.critique,
            });
            Ok(id)
        }

        async fn list_all(&self) -> Result<Vec<ResumeSummaryRow>, sqlx::Error> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .rev()
                .map(|r| ResumeSummaryRow {
                    id: r.id,
                    filename: r.filename.clone(),
                    uploaded_at: r.uploaded_at,
                    name: r.name.clone(),
                    email: r.email.clone(),
                    phone: r.phone.clone(),
                })
                .collect())
        }

        async fn get_by_id(&self, id: Uuid) -> Result<Option<ResumeRow>, sqlx::Error> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id)
                .cloned())
        }
    }
}
