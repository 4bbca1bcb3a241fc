// SQLite SubmissionRepository Implementation

use async_trait::async_trait;
use runner_core::domain::{NewSubmission, ProblemId, Score, SubmissionId};
use runner_core::error::{AppError, Result};
use runner_core::port::{BestScores, SubmissionRepository};
use sqlx::SqlitePool;

// Helper to convert sqlx::Error to AppError with structured information
fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => match db_err.code() {
            // SQLite error codes: https://www.sqlite.org/rescode.html
            Some(code) if code.as_ref() == "5" => {
                AppError::Database(format!("Database locked (SQLITE_BUSY): {}", db_err.message()))
            }
            Some(code) if code.as_ref() == "13" => {
                AppError::Database(format!("Database full: {}", db_err.message()))
            }
            Some(code) => AppError::Database(format!(
                "Database error [{}]: {}",
                code.as_ref(),
                db_err.message()
            )),
            None => AppError::Database(format!("Database error: {}", db_err.message())),
        },
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        _ => AppError::Database(err.to_string()),
    }
}

pub struct SqliteSubmissionRepository {
    pool: SqlitePool,
}

impl SqliteSubmissionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn min_score(&self, sql: &str, problem_id: ProblemId, bonuses_hash: Option<&str>) -> Result<Option<Score>> {
        let mut query = sqlx::query_scalar::<_, Option<Score>>(sql).bind(problem_id);
        if let Some(hash) = bonuses_hash {
            query = query.bind(hash);
        }
        query
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl SubmissionRepository for SqliteSubmissionRepository {
    async fn best_scores(&self, problem_id: ProblemId, bonuses_hash: &str) -> Result<BestScores> {
        let official = self
            .min_score(
                r#"
                SELECT MIN(submission_score) FROM submissions
                WHERE problem_id = ? AND submission_bonuses_hash = ? AND submission_score >= 0
                "#,
                problem_id,
                Some(bonuses_hash),
            )
            .await?;

        let estimated = self
            .min_score(
                r#"
                SELECT MIN(submission_estimated_score) FROM submissions
                WHERE problem_id = ? AND submission_bonuses_hash = ?
                  AND submission_estimated_score >= 0
                "#,
                problem_id,
                Some(bonuses_hash),
            )
            .await?;

        let overall_estimated = self
            .min_score(
                r#"
                SELECT MIN(submission_estimated_score) FROM submissions
                WHERE problem_id = ? AND submission_estimated_score >= 0
                "#,
                problem_id,
                None,
            )
            .await?;

        Ok(BestScores {
            official,
            estimated,
            overall_estimated,
        })
    }

    async fn insert(&self, submission: &NewSubmission) -> Result<SubmissionId> {
        let result = sqlx::query(
            r#"
            INSERT INTO submissions (
                problem_id, submission_data, submission_bonuses,
                submission_obtained_bonuses, submission_bonuses_hash,
                submission_estimated_score, submission_uuid, submission_submitted
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(submission.problem_id)
        .bind(&submission.data)
        .bind(&submission.bonuses)
        .bind(&submission.obtained_bonuses)
        .bind(&submission.bonuses_hash)
        .bind(submission.estimated_score)
        .bind(submission.pose_id.as_deref())
        .bind(submission.submitted_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.last_insert_rowid())
    }

    async fn set_official_score(&self, id: SubmissionId, score: Score) -> Result<()> {
        let result = sqlx::query(
            "UPDATE submissions SET submission_score = ? WHERE submission_id = ?",
        )
        .bind(score)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::Database(format!("Submission {} not found", id)));
        }
        Ok(())
    }
}
