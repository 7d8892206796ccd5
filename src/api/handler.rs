use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::api::ApiError;
use crate::listing::submit::ListedItem;
use crate::listing::{Category, DraftListing, DraftUpdate, CATEGORIES};
use crate::registry::SessionEntry;
use crate::server::{AppState, MOCK_SELLER_ID};
use crate::workflow::{Notification, SessionSnapshot};

/// What the front-end renders for a session. Notifications are delivered once.
#[derive(Debug, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub snapshot: SessionSnapshot,
    pub notifications: Vec<Notification>,
}

impl SessionView {
    fn of(entry: &SessionEntry) -> Self {
        Self {
            snapshot: entry.session.snapshot(),
            notifications: entry.notifications.drain(),
        }
    }
}

async fn find_session(state: &AppState, id: u64) -> Result<SessionEntry, ApiError> {
    state
        .sessions
        .read()
        .await
        .get(id)
        .ok_or(ApiError::SessionNotFound(id))
}

pub async fn list_categories() -> Json<&'static [Category]> {
    Json(CATEGORIES)
}

/// Open a session. An empty body starts from a blank draft.
pub async fn open_session(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let draft = if body.iter().all(u8::is_ascii_whitespace) {
        DraftListing::default()
    } else {
        serde_json::from_slice::<DraftListing>(&body).map_err(|e| {
            tracing::warn!(error = %e, "Rejected malformed draft");
            ApiError::InvalidBody(e.to_string())
        })?
    };

    let entry = state.sessions.write().await.open(
        draft,
        Arc::clone(&state.generator),
        state.enhancement_timeout(),
    );

    Ok((StatusCode::CREATED, Json(SessionView::of(&entry))))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<SessionView>, ApiError> {
    let entry = find_session(&state, id).await?;
    Ok(Json(SessionView::of(&entry)))
}

pub async fn update_draft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(update): Json<DraftUpdate>,
) -> Result<Json<SessionView>, ApiError> {
    let entry = find_session(&state, id).await?;
    entry.session.update_draft(update);
    Ok(Json(SessionView::of(&entry)))
}

pub async fn request_enhancement(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let entry = find_session(&state, id).await?;
    // The outcome is observed through later reads of the session.
    let _handle = entry.session.request_enhancement()?;
    Ok((StatusCode::ACCEPTED, Json(SessionView::of(&entry))))
}

pub async fn apply_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<SessionView>, ApiError> {
    let entry = find_session(&state, id).await?;
    entry.session.apply_result()?;
    Ok(Json(SessionView::of(&entry)))
}

pub async fn dismiss(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<SessionView>, ApiError> {
    let entry = find_session(&state, id).await?;
    entry.session.dismiss();
    Ok(Json(SessionView::of(&entry)))
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<ListedItem>, ApiError> {
    let entry = find_session(&state, id).await?;

    let item = {
        let sessions = state.sessions.read().await;
        entry
            .session
            .submit(MOCK_SELLER_ID, || sessions.allocate_item_id())
            .map_err(ApiError::InvalidDraft)?
    };

    state.sessions.write().await.remove(id);
    Ok(Json(item))
}

pub async fn close_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    state
        .sessions
        .write()
        .await
        .close(id)
        .ok_or(ApiError::SessionNotFound(id))?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::response::IntoResponse;

    use crate::config::{AppConfig, ClaudeConfig, EnhancementConfig, ServerConfig};
    use crate::error::Result;
    use crate::generator::DescriptionGenerator;
    use crate::listing::{EnhancementRequest, EnhancementResult};
    use crate::workflow::WorkflowState;

    /// Answers every request with the same suggestion.
    struct FixedGenerator;

    #[async_trait]
    impl DescriptionGenerator for FixedGenerator {
        async fn enhance(&self, request: &EnhancementRequest) -> Result<EnhancementResult> {
            Ok(EnhancementResult {
                enhanced_description: format!("{} (enhanced)", request.description),
                suggested_tags: vec!["vintage".to_string(), "leather".to_string()],
            })
        }
    }

    fn test_state() -> Arc<AppState> {
        let config = AppConfig {
            server: ServerConfig::default(),
            claude: ClaudeConfig {
                api_key: "sk-test".to_string(),
                model: "test-model".to_string(),
                max_tokens: 256,
                api_url: "http://127.0.0.1:9/v1/messages".to_string(),
            },
            enhancement: EnhancementConfig::default(),
        };
        Arc::new(AppState::with_generator(config, Arc::new(FixedGenerator)))
    }

    fn draft() -> DraftListing {
        DraftListing {
            title: "Vintage Leather Jacket".to_string(),
            description: "Brown leather jacket, size M".to_string(),
            price: 45.0,
            category: "fashion".to_string(),
            ..Default::default()
        }
    }

    async fn open(state: &Arc<AppState>, draft: Option<DraftListing>) -> u64 {
        let body = match draft {
            Some(draft) => Bytes::from(serde_json::to_vec(&draft).unwrap()),
            None => Bytes::new(),
        };
        let (status, Json(view)) = open_session(State(state.clone()), body).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        view.snapshot.id
    }

    #[tokio::test]
    async fn test_open_keeps_posted_draft() {
        let state = test_state();
        let id = open(&state, Some(draft())).await;

        let Json(view) = get_session(State(state.clone()), Path(id)).await.unwrap();
        assert_eq!(view.snapshot.draft, draft());
    }

    #[tokio::test]
    async fn test_open_rejects_malformed_draft() {
        let state = test_state();
        let body = Bytes::from_static(br#"{"title":"Vintage Leather Jacket","price":"forty"}"#);

        let err = open_session(State(state.clone()), body).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidBody(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        // No session was opened for the rejected body.
        let err = get_session(State(state.clone()), Path(1)).await.unwrap_err();
        assert!(matches!(err, ApiError::SessionNotFound(1)));
    }

    #[tokio::test]
    async fn test_enhance_then_apply() {
        let state = test_state();
        let id = open(&state, Some(draft())).await;
        let entry = find_session(&state, id).await.unwrap();
        let mut rx = entry.session.subscribe();

        let (status, Json(view)) = request_enhancement(State(state.clone()), Path(id))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(view.snapshot.state, WorkflowState::Pending);

        rx.wait_for(|s| matches!(s, WorkflowState::Succeeded(_)))
            .await
            .unwrap();

        let Json(view) = apply_result(State(state.clone()), Path(id)).await.unwrap();
        assert_eq!(view.snapshot.state, WorkflowState::Idle);
        assert_eq!(
            view.snapshot.draft.description,
            "Brown leather jacket, size M (enhanced)"
        );
        assert_eq!(view.snapshot.draft.tags, vec!["vintage", "leather"]);
        let titles: Vec<_> = view.notifications.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Suggestions Ready", "AI Suggestions Applied"]);
    }

    #[tokio::test]
    async fn test_enhance_empty_draft_is_unprocessable() {
        let state = test_state();
        let id = open(&state, None).await;

        let err = request_enhancement(State(state.clone()), Path(id))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);

        let Json(view) = get_session(State(state.clone()), Path(id)).await.unwrap();
        assert_eq!(view.snapshot.state, WorkflowState::Idle);
        assert_eq!(view.notifications[0].title, "Missing Information");
    }

    #[tokio::test]
    async fn test_apply_without_result_conflicts() {
        let state = test_state();
        let id = open(&state, Some(draft())).await;

        let err = apply_result(State(state.clone()), Path(id)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_update_draft_then_dismiss() {
        let state = test_state();
        let id = open(&state, None).await;

        let update = DraftUpdate {
            title: Some("Desk lamp".to_string()),
            ..Default::default()
        };
        let Json(view) = update_draft(State(state.clone()), Path(id), Json(update))
            .await
            .unwrap();
        assert_eq!(view.snapshot.draft.title, "Desk lamp");

        let Json(view) = dismiss(State(state.clone()), Path(id)).await.unwrap();
        assert_eq!(view.snapshot.state, WorkflowState::Idle);
    }

    #[tokio::test]
    async fn test_submit_lists_and_forgets_session() {
        let state = test_state();
        let id = open(&state, Some(draft())).await;

        let Json(item) = submit(State(state.clone()), Path(id)).await.unwrap();
        assert_eq!(item.seller_id, MOCK_SELLER_ID);
        assert_eq!(item.listing.title, "Vintage Leather Jacket");

        let err = get_session(State(state.clone()), Path(id)).await.unwrap_err();
        assert!(matches!(err, ApiError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn test_submit_invalid_draft_keeps_session() {
        let state = test_state();
        let id = open(&state, None).await;

        let err = submit(State(state.clone()), Path(id)).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidDraft(ref fields) if fields.len() == 4));
        assert!(get_session(State(state.clone()), Path(id)).await.is_ok());
    }

    #[tokio::test]
    async fn test_rejected_submit_does_not_consume_item_id() {
        let state = test_state();
        let id = open(&state, None).await;
        assert!(submit(State(state.clone()), Path(id)).await.is_err());

        let update = DraftUpdate {
            title: Some(draft().title),
            description: Some(draft().description),
            price: Some(draft().price),
            category: Some(draft().category),
            ..Default::default()
        };
        update_draft(State(state.clone()), Path(id), Json(update))
            .await
            .unwrap();

        let Json(item) = submit(State(state.clone()), Path(id)).await.unwrap();
        assert_eq!(item.id, "item-1");
    }

    #[tokio::test]
    async fn test_close_unknown_session_is_not_found() {
        let state = test_state();
        let id = open(&state, None).await;

        assert_eq!(
            close_session(State(state.clone()), Path(id)).await.unwrap(),
            StatusCode::NO_CONTENT
        );
        let err = close_session(State(state.clone()), Path(id)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
