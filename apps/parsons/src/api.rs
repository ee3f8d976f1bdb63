//! # HTTP API
//!
//! JSON surface over one immutable exercise bank.
//!
//! The bank is validated at startup and never changes afterwards, and
//! grading is a pure function, so handlers share the bank behind an `Arc`
//! with no locking. Grading requests are stateless: malformed submissions
//! still grade (the engine classifies them), only an unknown slug is a
//! 404.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use parsons_core::{Block, ExerciseBank, Feedback, Indent, Submission, grade, present};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::cli::{CliError, load_bank};

// =============================================================================
// STATE
// =============================================================================

/// Shared, immutable application state.
#[derive(Clone)]
pub struct AppState {
    bank: Arc<ExerciseBank>,
}

impl AppState {
    /// Wrap a validated bank for sharing across handlers.
    #[must_use]
    pub fn new(bank: ExerciseBank) -> Self {
        Self {
            bank: Arc::new(bank),
        }
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Learner-facing view of a presented block.
///
/// The distractor flag stays server-side; revealing it would solve the
/// exercise for free.
#[derive(Debug, Serialize)]
pub struct PresentedBlock {
    /// Block id, echoed back in submissions.
    pub id: String,

    /// The code line to render.
    pub text: String,

    /// Authored presentation indent, if any.
    pub indent: Option<u16>,
}

impl From<&Block> for PresentedBlock {
    fn from(block: &Block) -> Self {
        Self {
            id: block.id.as_str().to_string(),
            text: block.text.clone(),
            indent: block.indent.map(Indent::level),
        }
    }
}

/// One row of the exercise listing.
#[derive(Debug, Serialize)]
pub struct ExerciseSummary {
    /// Slug the other endpoints address the exercise by.
    pub slug: String,

    /// Display title, if authored.
    pub title: Option<String>,

    /// Number of presented blocks (distractors included, uncounted).
    pub blocks: usize,
}

/// Query parameters of the presentation endpoint.
#[derive(Debug, Deserialize)]
pub struct PresentationParams {
    /// Shuffle seed; defaults to 0 so unseeded requests are reproducible.
    #[serde(default)]
    pub seed: u64,
}

/// Response of the presentation endpoint.
#[derive(Debug, Serialize)]
pub struct PresentationResponse {
    /// The requested exercise.
    pub slug: String,

    /// The seed that produced this ordering.
    pub seed: u64,

    /// Shuffled blocks in presentation order.
    pub blocks: Vec<PresentedBlock>,
}

// =============================================================================
// ROUTER
// =============================================================================

/// Build the router over a validated bank.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/exercises", get(list_exercises))
        .route("/exercises/{slug}/presentation", get(get_presentation))
        .route("/exercises/{slug}/grade", post(post_grade))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn list_exercises(State(state): State<AppState>) -> Json<Vec<ExerciseSummary>> {
    let summaries = state
        .bank
        .iter()
        .map(|(slug, exercise)| ExerciseSummary {
            slug: slug.to_string(),
            title: exercise.title().map(ToString::to_string),
            blocks: exercise.block_count(),
        })
        .collect();

    Json(summaries)
}

async fn get_presentation(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<PresentationParams>,
) -> Result<Json<PresentationResponse>, StatusCode> {
    let exercise = state.bank.get(&slug).ok_or(StatusCode::NOT_FOUND)?;

    let blocks = present(exercise, params.seed)
        .iter()
        .map(PresentedBlock::from)
        .collect();

    Ok(Json(PresentationResponse {
        slug,
        seed: params.seed,
        blocks,
    }))
}

async fn post_grade(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(submission): Json<Submission>,
) -> Result<Json<Feedback>, StatusCode> {
    let exercise = state.bank.get(&slug).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(grade(exercise, &submission)))
}

// =============================================================================
// SERVER
// =============================================================================

/// Load a bank and serve the API until interrupted.
pub async fn serve(bank_path: &std::path::Path, addr: &str) -> Result<(), CliError> {
    let bank = load_bank(bank_path)?;
    info!(exercises = bank.len(), %addr, "serving exercise bank");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(AppState::new(bank)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    // The bank is immutable; there is nothing to flush on shutdown.
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down");
}

// =============================================================================
// TESTS
// =============================================================================
