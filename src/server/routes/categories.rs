use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::{
    db::{Category, Question, TriviaStore},
    server::{
        app::AppState,
        errors::{ApiError, ApiResponse},
        extract::{IdPath, Page},
        pagination::paginate,
    },
};

#[derive(Serialize)]
struct CategoriesList {
    success: bool,
    categories: BTreeMap<i64, String>,
    total_categories: usize,
}

#[derive(Serialize)]
struct CategoryQuestions {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: i64,
}

/// `{id: type}` view of the categories, keyed in id order.
pub(super) fn category_map(categories: Vec<Category>) -> BTreeMap<i64, String> {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

async fn get_categories(State(store): State<Arc<dyn TriviaStore>>) -> ApiResponse<CategoriesList> {
    let categories = store.categories().await?;
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(CategoriesList {
        success: true,
        total_categories: categories.len(),
        categories: category_map(categories),
    }))
}

async fn get_category_questions(
    State(store): State<Arc<dyn TriviaStore>>,
    IdPath(category_id): IdPath,
    Page(page): Page,
) -> ApiResponse<CategoryQuestions> {
    let selection = store
        .questions_in_category(category_id)
        .await
        .map_err(ApiError::from_compound)?;
    let total_questions = selection.len();

    let questions = paginate(page, selection);
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(CategoryQuestions {
        success: true,
        questions,
        total_questions,
        current_category: category_id,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{category_id}/questions", get(get_category_questions))
        .with_state(state)
}
