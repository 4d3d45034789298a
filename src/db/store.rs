use async_trait::async_trait;
use sqlx::SqlitePool;
use thiserror::Error;

use super::queries::{categories, questions};
use super::{Category, NewQuestion, Question};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Question not found: {0}")]
    QuestionNotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Everything the HTTP handlers need from the relational store.
#[async_trait]
pub trait TriviaStore: Send + Sync {
    /// All categories ordered by id
    async fn categories(&self) -> StoreResult<Vec<Category>>;

    /// All questions ordered by id
    async fn questions(&self) -> StoreResult<Vec<Question>>;

    async fn count_questions(&self) -> StoreResult<i64>;

    async fn question(&self, id: i64) -> StoreResult<Option<Question>>;

    async fn questions_in_category(&self, category: i64) -> StoreResult<Vec<Question>>;

    /// Case-insensitive substring match on the question text
    async fn search_questions(&self, term: &str) -> StoreResult<Vec<Question>>;

    /// Questions not in `excluded`, restricted to `category` when given
    async fn quiz_candidates(
        &self,
        category: Option<i64>,
        excluded: &[i64],
    ) -> StoreResult<Vec<Question>>;

    /// Insert a question and return its id
    async fn insert_question(&self, question: NewQuestion) -> StoreResult<i64>;

    /// Delete a question, failing with `QuestionNotFound` if no row was removed
    async fn delete_question(&self, id: i64) -> StoreResult<()>;
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TriviaStore for SqliteStore {
    async fn categories(&self) -> StoreResult<Vec<Category>> {
        Ok(categories::get_all_categories(&self.pool).await?)
    }

    async fn questions(&self) -> StoreResult<Vec<Question>> {
        Ok(questions::get_all_questions(&self.pool).await?)
    }

    async fn count_questions(&self) -> StoreResult<i64> {
        Ok(questions::count_questions(&self.pool).await?)
    }

    async fn question(&self, id: i64) -> StoreResult<Option<Question>> {
        Ok(questions::get_question_by_id(&self.pool, id).await?)
    }

    async fn questions_in_category(&self, category: i64) -> StoreResult<Vec<Question>> {
        Ok(questions::get_questions_for_category(&self.pool, category).await?)
    }

    async fn search_questions(&self, term: &str) -> StoreResult<Vec<Question>> {
        Ok(questions::search_questions(&self.pool, term).await?)
    }

    async fn quiz_candidates(
        &self,
        category: Option<i64>,
        excluded: &[i64],
    ) -> StoreResult<Vec<Question>> {
        Ok(questions::get_quiz_candidates(&self.pool, category, excluded).await?)
    }

    async fn insert_question(&self, question: NewQuestion) -> StoreResult<i64> {
        let id = questions::create_question(&self.pool, &question).await?;
        tracing::debug!(id, "Inserted question");
        Ok(id)
    }

    async fn delete_question(&self, id: i64) -> StoreResult<()> {
        match questions::delete_question(&self.pool, id).await? {
            0 => Err(StoreError::QuestionNotFound(id)),
            _ => {
                tracing::debug!(id, "Deleted question");
                Ok(())
            }
        }
    }
}
