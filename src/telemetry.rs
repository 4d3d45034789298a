use prometheus::register_counter_vec;
use prometheus::CounterVec;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref QUIZ_QUESTIONS_CNTR: CounterVec = register_counter_vec!(
        "quiz_questions_served_total",
        "Number of questions handed out to quiz players",
        &["category"]
    )
    .expect("quiz counter registers once");
    pub static ref QUESTION_CHANGES_CNTR: CounterVec = register_counter_vec!(
        "questions_changed_total",
        "Number of questions created or deleted",
        &["operation"]
    )
    .expect("question counter registers once");
}

/// Loads `.env` before reading `LOG_LEVEL` and `INCLUDE_SPAN_EVENTS`, so both can
/// be set there.
pub fn init_tracing() {
    dotenv::dotenv().ok();
    let mut fmt_layer = fmt::layer();
    if include_span_events() {
        fmt_layer = fmt_layer.with_span_events(FmtSpan::ENTER | FmtSpan::EXIT);
    }
    let filter_layer =
        EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

fn include_span_events() -> bool {
    std::env::var("INCLUDE_SPAN_EVENTS").is_ok_and(|value| value.eq_ignore_ascii_case("true"))
}
