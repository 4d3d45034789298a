use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::{
    db::{Question, TriviaStore},
    server::{
        app::AppState,
        errors::{ApiError, ApiResponse},
        extract::JsonBody,
    },
    telemetry::QUIZ_QUESTIONS_CNTR,
};

/// Category id that stands for every category.
const ALL_CATEGORIES: i64 = 0;

#[derive(Deserialize)]
struct QuizRequest {
    previous_questions: Vec<i64>,
    quiz_category: QuizCategory,
}

#[derive(Deserialize)]
struct QuizCategory {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

impl QuizCategory {
    fn filter(&self) -> Option<i64> {
        (self.id != ALL_CATEGORIES).then_some(self.id)
    }
}

#[derive(Serialize)]
struct QuizQuestion {
    success: bool,
    question: Option<Question>,
}

fn pick(candidates: &[Question]) -> Option<Question> {
    candidates.choose(&mut rand::thread_rng()).cloned()
}

async fn next_question(
    State(store): State<Arc<dyn TriviaStore>>,
    JsonBody(request): JsonBody<QuizRequest>,
) -> ApiResponse<QuizQuestion> {
    let category = request.quiz_category.filter();
    let candidates = store
        .quiz_candidates(category, &request.previous_questions)
        .await
        .map_err(ApiError::from_compound)?;

    let question = pick(&candidates);
    let label = category.map_or_else(|| "all".to_owned(), |id| id.to_string());
    match &question {
        Some(question) => {
            QUIZ_QUESTIONS_CNTR.with_label_values(&[label.as_str()]).inc();
            tracing::debug!(id = question.id, category = %label, "Quiz question picked");
        }
        None => tracing::debug!(category = %label, "Quiz exhausted"),
    }

    Ok(Json(QuizQuestion {
        success: true,
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}
