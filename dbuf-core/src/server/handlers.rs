//! HTTP request handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::AppState;
use crate::config::DEFAULT_RESOURCE;

/// Parameters of `GET /q`
#[derive(Debug, Default, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub query: String,
}

/// Parameters of `GET /admin/reload`
#[derive(Debug, Default, Deserialize)]
pub struct ReloadParams {
    /// Resource to reload; defaults to the blocklist.
    pub name: Option<String>,
    /// Where to load from; defaults to the last path that loaded.
    pub path: Option<String>,
}

/// GET /q
pub async fn query(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Response {
    let Some(slot) = state.registry.get(DEFAULT_RESOURCE) else {
        error!(name = DEFAULT_RESOURCE, "Blocklist is not registered");
        return (StatusCode::SERVICE_UNAVAILABLE, "ERROR").into_response();
    };

    let blocked = slot
        .with(|list| list.contains(&params.id))
        .unwrap_or(false);
    if blocked {
        return (StatusCode::FORBIDDEN, "ERROR").into_response();
    }

    let result = format!("hello, {}", params.id);
    info!(id = %params.id, query = %params.query, result = %result, "Query served");
    (StatusCode::OK, result).into_response()
}

/// GET /admin/reload
pub async fn reload(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReloadParams>,
) -> Response {
    let name = params.name.unwrap_or_else(|| DEFAULT_RESOURCE.to_owned());
    let Some(path) = params.path.or_else(|| state.path_of(&name)) else {
        warn!(name = %name, "Reload requested without a path for unknown resource");
        return (StatusCode::NOT_FOUND, "FAILED").into_response();
    };

    // Parsing may be slow; keep it off the async workers.
    let task_state = state.clone();
    let (task_name, task_path) = (name.clone(), path.clone());
    let outcome = tokio::task::spawn_blocking(move || {
        task_state.registry.reload(&task_name, &task_path)
    })
    .await;

    match outcome {
        Ok(Ok(_)) => (StatusCode::OK, "OK").into_response(),
        Ok(Err(err)) if err.is_not_found() => (StatusCode::NOT_FOUND, "FAILED").into_response(),
        Ok(Err(err)) => {
            let reason = format!("{:#}", anyhow::Error::from(err));
            warn!(name = %name, path = %path, error = %reason, "Admin reload failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "FAILED").into_response()
        }
        Err(join_err) => {
            error!(name = %name, error = %join_err, "Reload task panicked");
            (StatusCode::INTERNAL_SERVER_ERROR, "FAILED").into_response()
        }
    }
}

/// GET /admin/status
pub async fn status(State(state): State<Arc<AppState>>) -> Response {
    Json(state.registry.status()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ResourceSpec, ServerConfig};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn blocklist_file(ids: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for id in ids {
            writeln!(file, "{id}").unwrap();
        }
        file
    }

    fn state_for(file: &NamedTempFile) -> Arc<AppState> {
        let config = ServerConfig {
            resources: vec![ResourceSpec::new(
                DEFAULT_RESOURCE,
                file.path().to_str().unwrap(),
            )],
            ..ServerConfig::default()
        };
        Arc::new(AppState::from_config(&config).unwrap())
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn q(id: &str) -> Query<QueryParams> {
        Query(QueryParams {
            id: id.to_owned(),
            query: "q".to_owned(),
        })
    }

    #[tokio::test]
    async fn test_query_allowed() {
        let file = blocklist_file(&["13"]);
        let state = state_for(&file);

        let response = query(State(state), q("7")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "hello, 7");
    }

    #[tokio::test]
    async fn test_query_blocked() {
        let file = blocklist_file(&["13"]);
        let state = state_for(&file);

        let response = query(State(state), q("13")).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_text(response).await, "ERROR");
    }

    #[tokio::test]
    async fn test_query_without_blocklist() {
        let state = Arc::new(AppState::from_config(&ServerConfig::default()).unwrap());
        let response = query(State(state), q("1")).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_reload_picks_up_new_content() {
        let file = blocklist_file(&["13"]);
        let state = state_for(&file);

        let replacement = blocklist_file(&["99"]);
        let response = reload(
            State(state.clone()),
            Query(ReloadParams {
                name: None,
                path: Some(replacement.path().to_str().unwrap().to_owned()),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");

        let response = query(State(state.clone()), q("13")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let response = query(State(state.clone()), q("99")).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // Later reloads without a path reuse the last one that loaded.
        assert_eq!(
            state.path_of(DEFAULT_RESOURCE).as_deref(),
            replacement.path().to_str()
        );
    }

    #[tokio::test]
    async fn test_reload_default_path() {
        let file = blocklist_file(&["1"]);
        let state = state_for(&file);

        let response = reload(State(state.clone()), Query(ReloadParams::default())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let slot = state.registry().get(DEFAULT_RESOURCE).unwrap();
        assert_eq!(slot.generation(), 2);
    }

    #[tokio::test]
    async fn test_reload_default_path_follows_current_instance() {
        let first = blocklist_file(&["13"]);
        let state = state_for(&first);

        // A reload that bypasses the handler still moves the default path.
        let second = blocklist_file(&["42"]);
        let second_path = second.path().to_str().unwrap().to_owned();
        state
            .registry()
            .reload(DEFAULT_RESOURCE, &second_path)
            .unwrap();
        assert_eq!(state.path_of(DEFAULT_RESOURCE), Some(second_path.clone()));

        let response = reload(State(state.clone()), Query(ReloadParams::default())).await;
        assert_eq!(response.status(), StatusCode::OK);

        let slot = state.registry().get(DEFAULT_RESOURCE).unwrap();
        assert_eq!(slot.generation(), 3);
        assert_eq!(slot.last_conf(), Some(second_path));
        let response = query(State(state.clone()), q("42")).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let response = query(State(state), q("13")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_reload_failure_keeps_current() {
        let file = blocklist_file(&["13"]);
        let state = state_for(&file);

        let response = reload(
            State(state.clone()),
            Query(ReloadParams {
                name: None,
                path: Some("/no/such/blocklist.txt".to_owned()),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "FAILED");

        let response = query(State(state.clone()), q("13")).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            state.path_of(DEFAULT_RESOURCE).as_deref(),
            file.path().to_str()
        );
    }

    #[tokio::test]
    async fn test_reload_unknown_name() {
        let file = blocklist_file(&["13"]);
        let state = state_for(&file);

        let response = reload(
            State(state.clone()),
            Query(ReloadParams {
                name: Some("nope".to_owned()),
                path: Some(file.path().to_str().unwrap().to_owned()),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = reload(
            State(state),
            Query(ReloadParams {
                name: Some("nope".to_owned()),
                path: None,
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_status_json() {
        let file = blocklist_file(&["13"]);
        let state = state_for(&file);

        let response = status(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body[0]["name"], DEFAULT_RESOURCE);
        assert_eq!(body[0]["generation"], 1);
        assert_eq!(body[0]["ref_count"], 1);
    }
}
