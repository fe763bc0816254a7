// src/handlers/live.rs
//! Live list/show/form sessions over WebSocket. One connection drives one
//! view instance; client actions and bus events are multiplexed in a single
//! loop and every step pushes a fresh state snapshot.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Extension,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::{sink::SinkExt, stream::SplitSink, stream::StreamExt};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::error::CatalogError;
use crate::models::{Asset, Domain};
use crate::services::CatalogEvent;
use crate::views::{CatalogResource, ResourceView};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
enum ClientAction<I> {
    New,
    Edit { id: i64 },
    Show { id: i64 },
    Cancel,
    Change { input: I },
    Submit,
    Delete { id: i64 },
}

enum Input<I> {
    Client(ClientAction<I>),
    Unreadable(String),
    Event(CatalogEvent),
    Closed,
}

pub fn live_routes() -> Router {
    Router::new()
        .route("/ws/domains", get(domains_session))
        .route("/ws/assets", get(assets_session))
}

async fn domains_session(
    ws: WebSocketUpgrade,
    Extension(state): Extension<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| live_session::<Domain>(socket, state))
}

async fn assets_session(
    ws: WebSocketUpgrade,
    Extension(state): Extension<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| live_session::<Asset>(socket, state))
}

async fn live_session<R: CatalogResource>(stream: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = stream.split();

    let mut view = match ResourceView::<R>::mount(state.catalog.clone()).await {
        Ok(view) => view,
        Err(err) => {
            tracing::error!("failed to mount {} session: {}", R::NAME, err);
            let _ = sender
                .send(Message::Text(error_frame(&err.to_string())))
                .await;
            return;
        }
    };
    tracing::info!("🔌 started live {} session", R::NAME);

    if send_state(&mut sender, &view).await.is_err() {
        return;
    }

    loop {
        // The arms only classify what arrived; the view is touched below,
        // after the borrow taken by next_event() is gone.
        let input = tokio::select! {
            message = receiver.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ClientAction<R::Input>>(&text) {
                        Ok(action) => Input::Client(action),
                        Err(err) => Input::Unreadable(err.to_string()),
                    }
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => Input::Closed,
                Some(Ok(_)) => continue,
            },
            event = view.next_event() => match event {
                Some(event) => Input::Event(event),
                None => Input::Closed,
            },
        };

        match input {
            Input::Closed => break,
            Input::Unreadable(reason) => {
                tracing::debug!("unreadable {} action: {}", R::NAME, reason);
                if sender
                    .send(Message::Text(error_frame("unreadable action")))
                    .await
                    .is_err()
                {
                    break;
                }
            }
            Input::Event(event) => {
                view.apply_event(&event);
                let frame = json!({ "type": "event", "event": event }).to_string();
                if sender.send(Message::Text(frame)).await.is_err() {
                    break;
                }
                if send_state(&mut sender, &view).await.is_err() {
                    break;
                }
            }
            Input::Client(action) => {
                if let Err(err) = handle_action(&mut view, action).await {
                    if sender
                        .send(Message::Text(error_frame(&err.to_string())))
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
                if send_state(&mut sender, &view).await.is_err() {
                    break;
                }
            }
        }
    }

    tracing::info!("🔌 live {} session closed", R::NAME);
}

async fn handle_action<R: CatalogResource>(
    view: &mut ResourceView<R>,
    action: ClientAction<R::Input>,
) -> Result<(), CatalogError> {
    match action {
        ClientAction::New => {
            view.open_new();
            Ok(())
        }
        ClientAction::Edit { id } => view.open_edit(id).await,
        ClientAction::Show { id } => view.open_show(id).await,
        ClientAction::Cancel => {
            view.back_to_listing();
            Ok(())
        }
        ClientAction::Change { input } => {
            view.change(input);
            Ok(())
        }
        ClientAction::Submit => view.submit().await.map(|_| ()),
        ClientAction::Delete { id } => view.delete(id).await,
    }
}

async fn send_state<R: CatalogResource>(
    sender: &mut SplitSink<WebSocket, Message>,
    view: &ResourceView<R>,
) -> Result<(), axum::Error> {
    sender.send(Message::Text(state_frame(view))).await
}

fn state_frame<R: CatalogResource>(view: &ResourceView<R>) -> String {
    json!({
        "type": "state",
        "action": view.action(),
        "rows": view.rows(),
        "form": view.form(),
        "errors": view.errors(),
        "current": view.current(),
    })
    .to_string()
}

fn error_frame(message: &str) -> String {
    json!({ "type": "error", "message": message }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{AssetInput, DomainInput};
    use crate::repo::CatalogRepo;
    use crate::services::CatalogService;
    use serde_json::Value;
    use sqlx::sqlite::SqlitePoolOptions;

    #[test]
    fn actions_parse_from_tagged_json() {
        let action: ClientAction<DomainInput> =
            serde_json::from_str(r#"{ "action": "new" }"#).unwrap();
        assert!(matches!(action, ClientAction::New));

        let action: ClientAction<DomainInput> =
            serde_json::from_str(r#"{ "action": "edit", "id": 7 }"#).unwrap();
        assert!(matches!(action, ClientAction::Edit { id: 7 }));

        let action: ClientAction<DomainInput> =
            serde_json::from_str(r#"{ "action": "change", "input": { "name": "Hydrology" } }"#)
                .unwrap();
        match action {
            ClientAction::Change { input } => assert_eq!(input, DomainInput::new("Hydrology")),
            other => panic!("expected change, got {other:?}"),
        }
    }

    #[test]
    fn asset_change_actions_carry_the_optional_reference() {
        let action: ClientAction<AssetInput> = serde_json::from_str(
            r#"{ "action": "change", "input": { "title": "Streamflow 2023", "domain_id": 3 } }"#,
        )
        .unwrap();
        match action {
            ClientAction::Change { input } => {
                assert_eq!(input, AssetInput::new("Streamflow 2023", Some(3)));
            }
            other => panic!("expected change, got {other:?}"),
        }

        let action: ClientAction<AssetInput> = serde_json::from_str(
            r#"{ "action": "change", "input": { "title": "Streamflow 2023" } }"#,
        )
        .unwrap();
        match action {
            ClientAction::Change { input } => assert_eq!(input.domain_id, None),
            other => panic!("expected change, got {other:?}"),
        }
    }

    #[test]
    fn unknown_actions_are_rejected() {
        let parsed = serde_json::from_str::<ClientAction<DomainInput>>(r#"{ "action": "zap" }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn error_frames_are_typed() {
        let frame: serde_json::Value =
            serde_json::from_str(&error_frame("unreadable action")).unwrap();
        assert_eq!(frame["type"], "error");
        assert_eq!(frame["message"], "unreadable action");
    }

    #[tokio::test]
    async fn state_frames_snapshot_the_whole_view() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::init_schema(&pool).await.unwrap();
        let service = Arc::new(CatalogService::new(CatalogRepo::new(pool)));
        service
            .create_domain(&DomainInput::new("Hydrology"))
            .await
            .unwrap();

        let mut view = ResourceView::<Domain>::mount(service).await.unwrap();
        let frame: Value = serde_json::from_str(&state_frame(&view)).unwrap();
        assert_eq!(frame["type"], "state");
        assert_eq!(frame["action"], "listing");
        assert_eq!(frame["rows"][0]["name"], "Hydrology");
        assert_eq!(frame["current"], Value::Null);
        assert_eq!(frame["errors"], json!({}));

        view.open_new();
        view.change(DomainInput::new(" "));
        let frame: Value = serde_json::from_str(&state_frame(&view)).unwrap();
        assert_eq!(frame["action"], "new");
        assert_eq!(frame["form"]["name"], " ");
        assert_eq!(frame["errors"]["name"], json!(["can't be blank"]));
    }
}
