use crate::error::Result;
use crate::models::candidature::{Candidature, NewCandidature};
use chrono::Utc;
use sqlx::SqlitePool;

const CANDIDATURE_COLUMNS: &str = "id, full_name, email, spi_number, phone, motivation, \
     document_front, document_back, residence_proof, data_processing_consent, \
     documents_validity_confirmed, submitted_at, source_ip";

/// Storage access for candidature records. Records are write-once: the only
/// mutation is the initial INSERT.
#[derive(Clone)]
pub struct CandidatureService {
    pool: SqlitePool,
}

impl CandidatureService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts the record in its own transaction and returns the stored row
    /// with its assigned id and timestamp.
    pub async fn create(&self, new: NewCandidature) -> Result<Candidature> {
        let mut tx = self.pool.begin().await?;
        let sql = format!(
            "INSERT INTO candidatures (full_name, email, spi_number, phone, motivation, \
             document_front, document_back, residence_proof, data_processing_consent, \
             documents_validity_confirmed, submitted_at, source_ip) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12) \
             RETURNING {}",
            CANDIDATURE_COLUMNS
        );
        let candidature = sqlx::query_as::<_, Candidature>(&sql)
            .bind(&new.full_name)
            .bind(&new.email)
            .bind(&new.spi_number)
            .bind(&new.phone)
            .bind(&new.motivation)
            .bind(&new.document_front)
            .bind(&new.document_back)
            .bind(&new.residence_proof)
            .bind(true)
            .bind(true)
            .bind(Utc::now())
            .bind(&new.source_ip)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(candidature)
    }

    /// Every record, newest first. No pagination; the intake volume is small
    /// enough to materialize in one page.
    pub async fn list(&self) -> Result<Vec<Candidature>> {
        let sql = format!(
            "SELECT {} FROM candidatures ORDER BY submitted_at DESC, id DESC",
            CANDIDATURE_COLUMNS
        );
        let candidatures = sqlx::query_as::<_, Candidature>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(candidatures)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Candidature>> {
        let sql = format!(
            "SELECT {} FROM candidatures WHERE id = ?1",
            CANDIDATURE_COLUMNS
        );
        let candidature = sqlx::query_as::<_, Candidature>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(candidature)
    }
}
