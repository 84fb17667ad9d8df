use axum::{
    extract::{Form, Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashSet;

use metadata_client::Listing;
use pipeline::CategoryKind;

use crate::error::{AppError, AppResult};
use crate::history::{SearchEntry, UserId};
use crate::orchestrator::{MovieCard, RecommendationPage};

use super::AppState;

/// Header carrying the caller's numeric user id
pub const USER_ID_HEADER: &str = "x-user-id";

const PROFILE_RECENT_SEARCHES: usize = 10;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendParams {
    pub movie_name: Option<String>,
    pub page: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct GenreParams {
    pub genre: Option<String>,
    pub page: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct EmotionParams {
    pub emotion: Option<String>,
    pub page: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct AgeParams {
    pub age_group: Option<String>,
    pub page: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct LetterForm {
    pub letter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: UserId,
    pub recent_searches: Vec<SearchEntry>,
    pub suggestions: Vec<MovieCard>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub user_id: UserId,
    pub searches: Vec<MovieCard>,
    pub suggestions: Vec<MovieCard>,
    pub genres: Vec<String>,
}

/// Trimmed, non-empty value of a required parameter
fn required(value: Option<String>, name: &str) -> AppResult<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::InvalidInput(format!("'{}' is required", name))),
    }
}

/// User id from the request headers, if present
fn user_id(headers: &HeaderMap) -> AppResult<Option<UserId>> {
    let Some(value) = headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .map(Some)
        .ok_or_else(|| AppError::InvalidInput(format!("invalid {} header", USER_ID_HEADER)))
}

fn require_user(headers: &HeaderMap) -> AppResult<UserId> {
    user_id(headers)?.ok_or_else(|| AppError::Unauthorized("login required".to_string()))
}

/// Terms of the given searches, first occurrence kept
fn distinct_recent_terms(entries: &[SearchEntry]) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|e| seen.insert(e.term.as_str()))
        .map(|e| e.term.clone())
        .collect()
}

// Handlers

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Recommendations for a title (query string)
pub async fn recommend(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<RecommendParams>,
) -> AppResult<Json<RecommendationPage>> {
    recommend_for(state, &headers, params).await
}

/// Recommendations for a title (submitted form)
pub async fn recommend_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(params): Form<RecommendParams>,
) -> AppResult<Json<RecommendationPage>> {
    recommend_for(state, &headers, params).await
}

async fn recommend_for(
    state: AppState,
    headers: &HeaderMap,
    params: RecommendParams,
) -> AppResult<Json<RecommendationPage>> {
    let title = required(params.movie_name, "movie_name")?;
    if let Some(user) = user_id(headers)? {
        state.history.record(user, &title).await;
    }

    let page = state
        .orchestrator
        .recommend_page(&title, params.page.unwrap_or(1))
        .await?;
    Ok(Json(page))
}

pub async fn search_by_genre(
    State(state): State<AppState>,
    Query(params): Query<GenreParams>,
) -> AppResult<Json<RecommendationPage>> {
    let genre = required(params.genre, "genre")?;
    let page = state
        .orchestrator
        .genre_page(&genre, params.page.unwrap_or(1))
        .await?;
    Ok(Json(page))
}

pub async fn recommend_by_emotion(
    State(state): State<AppState>,
    Query(params): Query<EmotionParams>,
) -> AppResult<Json<RecommendationPage>> {
    emotion_page(state, params).await
}

pub async fn recommend_by_emotion_form(
    State(state): State<AppState>,
    Form(params): Form<EmotionParams>,
) -> AppResult<Json<RecommendationPage>> {
    emotion_page(state, params).await
}

async fn emotion_page(state: AppState, params: EmotionParams) -> AppResult<Json<RecommendationPage>> {
    let emotion = required(params.emotion, "emotion")?;
    let page = state
        .orchestrator
        .category_page(CategoryKind::Emotion, &emotion, params.page.unwrap_or(1))
        .await?;
    Ok(Json(page))
}

pub async fn search_by_age(
    State(state): State<AppState>,
    Query(params): Query<AgeParams>,
) -> AppResult<Json<RecommendationPage>> {
    let age_group = required(params.age_group, "age_group")?;
    let page = state
        .orchestrator
        .category_page(CategoryKind::AgeGroup, &age_group, params.page.unwrap_or(1))
        .await?;
    Ok(Json(page))
}

pub async fn movies_by_letter(
    State(state): State<AppState>,
    Form(form): Form<LetterForm>,
) -> AppResult<Json<Value>> {
    let letter = required(form.letter, "letter")?;
    let movies = state.orchestrator.titles_by_letter(&letter)?;
    Ok(Json(json!({ "movies": movies })))
}

pub async fn genres(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "genres": state.orchestrator.genres() }))
}

pub async fn trending(State(state): State<AppState>) -> Json<RecommendationPage> {
    Json(state.orchestrator.listing(Listing::Trending).await)
}

pub async fn top_rated(State(state): State<AppState>) -> Json<RecommendationPage> {
    Json(state.orchestrator.listing(Listing::TopRated).await)
}

/// Recent searches and suggestions derived from them
pub async fn profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<ProfileResponse>> {
    let user = require_user(&headers)?;

    let recent_searches = state.history.recent(user, PROFILE_RECENT_SEARCHES).await;
    let terms = distinct_recent_terms(&recent_searches);
    let suggestions = state.orchestrator.history_suggestions(&terms).await?;

    Ok(Json(ProfileResponse {
        user_id: user,
        recent_searches,
        suggestions,
    }))
}

/// Every distinct past search with its poster, plus suggestions and genres
pub async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<DashboardResponse>> {
    let user = require_user(&headers)?;

    let terms = state.history.distinct_terms(user).await;
    let (searches, suggestions) = tokio::join!(
        state.orchestrator.cards_for_titles(&terms),
        state.orchestrator.history_suggestions(&terms),
    );

    Ok(Json(DashboardResponse {
        user_id: user,
        searches,
        suggestions: suggestions?,
        genres: state.orchestrator.genres(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_required_trims_and_rejects_blank() {
        assert_eq!(required(Some(" Up ".to_string()), "x").unwrap(), "Up");
        assert!(matches!(
            required(Some("   ".to_string()), "x"),
            Err(AppError::InvalidInput(_))
        ));
        assert!(required(None, "x").is_err());
    }

    #[test]
    fn test_distinct_recent_terms_keeps_newest_first() {
        let entries: Vec<SearchEntry> = ["Up", "Saw", "Up", "Heat"]
            .into_iter()
            .map(|term| SearchEntry {
                user_id: 1,
                term: term.to_string(),
                searched_at: chrono::Utc::now(),
            })
            .collect();
        assert_eq!(distinct_recent_terms(&entries), vec!["Up", "Saw", "Heat"]);
    }

    #[test]
    fn test_user_id_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(user_id(&headers).unwrap(), None);
        assert!(matches!(require_user(&headers), Err(AppError::Unauthorized(_))));

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("42"));
        assert_eq!(user_id(&headers).unwrap(), Some(42));

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("bob"));
        assert!(matches!(user_id(&headers), Err(AppError::InvalidInput(_))));
    }
}
