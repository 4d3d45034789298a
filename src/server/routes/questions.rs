use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::State,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;

use crate::{
    db::{NewQuestion, Question, TriviaStore},
    server::{
        app::AppState,
        errors::{ApiError, ApiResponse},
        extract::{IdPath, JsonBody, Page},
        pagination::paginate,
    },
    telemetry::QUESTION_CHANGES_CNTR,
};

use super::categories::category_map;

#[derive(Deserialize)]
struct NewQuestionBody {
    question: Option<String>,
    answer: Option<String>,
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
}

impl From<NewQuestionBody> for NewQuestion {
    fn from(body: NewQuestionBody) -> Self {
        NewQuestion {
            question: body.question,
            answer: body.answer,
            category: body.category,
            difficulty: body.difficulty,
        }
    }
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct QuestionDeleted {
    success: bool,
    deleted: i64,
    questions: Vec<Question>,
    total_questions: i64,
}

#[derive(Serialize)]
struct QuestionCreated {
    success: bool,
    created: i64,
    questions: Vec<Question>,
    total_questions: i64,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
}

async fn get_questions(
    State(store): State<Arc<dyn TriviaStore>>,
    Page(page): Page,
) -> ApiResponse<QuestionsPage> {
    let questions = paginate(page, store.questions().await?);
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }

    let categories = store.categories().await?;
    Ok(Json(QuestionsPage {
        success: true,
        questions,
        total_questions: store.count_questions().await?,
        categories: category_map(categories),
    }))
}

async fn delete_question(
    State(store): State<Arc<dyn TriviaStore>>,
    IdPath(question_id): IdPath,
    Page(page): Page,
) -> ApiResponse<QuestionDeleted> {
    let question = store
        .question(question_id)
        .await
        .map_err(ApiError::from_compound)?
        .ok_or(ApiError::NotFound)?;

    store
        .delete_question(question.id)
        .await
        .map_err(ApiError::from_compound)?;
    QUESTION_CHANGES_CNTR.with_label_values(&["deleted"]).inc();
    tracing::info!(id = question.id, "Question deleted");

    let (questions, total_questions) = current_page(store.as_ref(), page)
        .await
        .map_err(ApiError::from_compound)?;
    Ok(Json(QuestionDeleted {
        success: true,
        deleted: question.id,
        questions,
        total_questions,
    }))
}

async fn create_question(
    State(store): State<Arc<dyn TriviaStore>>,
    Page(page): Page,
    JsonBody(body): JsonBody<NewQuestionBody>,
) -> ApiResponse<QuestionCreated> {
    let id = store
        .insert_question(body.into())
        .await
        .map_err(ApiError::from_compound)?;
    QUESTION_CHANGES_CNTR.with_label_values(&["created"]).inc();
    tracing::info!(id, "Question created");

    let (questions, total_questions) = current_page(store.as_ref(), page)
        .await
        .map_err(ApiError::from_compound)?;
    Ok(Json(QuestionCreated {
        success: true,
        created: id,
        questions,
        total_questions,
    }))
}

// total_questions is the size of the returned page, not of the whole match set
async fn search_questions(
    State(store): State<Arc<dyn TriviaStore>>,
    Page(page): Page,
    JsonBody(body): JsonBody<SearchBody>,
) -> ApiResponse<SearchResults> {
    let term = match body.search_term.as_deref() {
        Some(term) if !term.is_empty() => term,
        _ => return Err(ApiError::NotFound),
    };

    let selection = store
        .search_questions(term)
        .await
        .map_err(ApiError::from_compound)?;
    let questions = paginate(page, selection);
    tracing::debug!(term, found = questions.len(), "Searched questions");

    Ok(Json(SearchResults {
        success: true,
        total_questions: questions.len(),
        questions,
    }))
}

async fn current_page(
    store: &dyn TriviaStore,
    page: i64,
) -> crate::db::StoreResult<(Vec<Question>, i64)> {
    let questions = paginate(page, store.questions().await?);
    let total = store.count_questions().await?;
    Ok((questions, total))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(get_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{question_id}", delete(delete_question))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_question_body_accepts_numeric_strings() {
        let body: NewQuestionBody = serde_json::from_str(
            r#"{"question": "Q", "answer": "A", "category": "4", "difficulty": 2}"#,
        )
        .unwrap();

        assert_eq!(body.category, Some(4));
        assert_eq!(body.difficulty, Some(2));
    }

    #[test]
    fn new_question_body_defaults_missing_fields() {
        let body: NewQuestionBody = serde_json::from_str("{}").unwrap();
        let question = NewQuestion::from(body);

        assert!(question.question.is_none());
        assert!(question.answer.is_none());
        assert!(question.category.is_none());
        assert!(question.difficulty.is_none());
    }

    #[test]
    fn search_body_reads_camel_case_term() {
        let body: SearchBody = serde_json::from_str(r#"{"searchTerm": "Africa"}"#).unwrap();
        assert_eq!(body.search_term.as_deref(), Some("Africa"));

        let empty: SearchBody = serde_json::from_str("{}").unwrap();
        assert!(empty.search_term.is_none());
    }
}
