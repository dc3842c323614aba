//! Local control page served on the loopback interface.
//!
//! Stands in for the command dialog (opened from the tray) and for the whole
//! window when no tray is available. Handlers never touch the queue
//! themselves: they forward an [`AppCommand`] to the application loop and
//! wait for its reply, so all writes stay serialized in one place.
//!
//! Every request must name the loopback listener in `Host`. POSTs must also
//! carry the per-launch token embedded in the page's forms, and a present
//! `Origin` must be the page itself, so other sites cannot submit commands.

use crate::{
    AppCommand, AppError, AppResult, DispatchOutcome, MenuAction,
    app_command::Reply,
    control_page::{self, PageStatus},
};

use std::{net::Ipv4Addr, panic::Location, sync::Arc};

use axum::{
    Form, Router,
    extract::{Path, Query, Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use error_location::ErrorLocation;
use serde::Deserialize;
use tokio::{
    net::TcpListener,
    sync::{mpsc, oneshot, watch},
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Shared state of the control page handlers.
#[derive(Clone)]
pub struct ControlState {
    command_tx: mpsc::Sender<AppCommand>,
    deep_work_minutes: u32,
    reschedule_prompt: Arc<str>,
    port: u16,
    token: Arc<str>,
}

impl ControlState {
    /// State forwarding to `command_tx` for a page served on `port`.
    ///
    /// A fresh form token is generated for every state.
    pub fn new(
        command_tx: mpsc::Sender<AppCommand>,
        deep_work_minutes: u32,
        reschedule_prompt: &str,
        port: u16,
    ) -> Self {
        Self {
            command_tx,
            deep_work_minutes,
            reschedule_prompt: Arc::from(reschedule_prompt),
            port,
            token: Arc::from(Uuid::new_v4().simple().to_string()),
        }
    }

    /// Token every POST must carry as `?token=`.
    pub fn token(&self) -> &str {
        &self.token
    }

    fn is_local_authority(&self, authority: &str) -> bool {
        authority == format!("{}:{}", Ipv4Addr::LOCALHOST, self.port)
            || authority == format!("localhost:{}", self.port)
    }

    /// Reason to reject `request`, if any.
    fn rejection(&self, request: &Request) -> Option<&'static str> {
        let host = request
            .headers()
            .get(header::HOST)
            .and_then(|h| h.to_str().ok());
        if !host.is_some_and(|h| self.is_local_authority(h)) {
            return Some("Unexpected Host header");
        }

        if request.method().is_safe() {
            return None;
        }

        if let Some(origin) = request.headers().get(header::ORIGIN) {
            let same_origin = origin
                .to_str()
                .ok()
                .and_then(|o| o.strip_prefix("http://"))
                .is_some_and(|authority| self.is_local_authority(authority));
            if !same_origin {
                return Some("Cross-origin request");
            }
        }

        let token = Query::<TokenQuery>::try_from_uri(request.uri())
            .ok()
            .and_then(|Query(q)| q.token);
        if token.as_deref() != Some(self.token()) {
            return Some("Missing or invalid token");
        }

        None
    }
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommandForm {
    #[serde(default)]
    text: String,
}

/// Routes of the control page.
pub fn router(state: ControlState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/reschedule", get(reschedule))
        .route("/actions/{slug}", post(trigger))
        .route("/command", post(command))
        .route("/quit", post(quit))
        .layer(middleware::from_fn_with_state(state.clone(), guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the control page to `127.0.0.1:port`.
pub async fn bind(port: u16) -> AppResult<TcpListener> {
    let location = ErrorLocation::from(Location::caller());
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, port))
        .await
        .map_err(|e| AppError::ServerError {
            reason: format!("Failed to bind 127.0.0.1:{}: {}", port, e),
            location,
        })?;

    info!(port, "Control page listening");

    Ok(listener)
}

/// Serve until `shutdown_rx` turns `true` or its sender is dropped.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    mut shutdown_rx: watch::Receiver<bool>,
) -> AppResult<()> {
    let location = ErrorLocation::from(Location::caller());

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.wait_for(|stop| *stop).await;
        })
        .await
        .map_err(|e| AppError::ServerError {
            reason: format!("Control page stopped: {}", e),
            location,
        })?;

    info!("Control page stopped");

    Ok(())
}

/// Reject requests that did not come from the page itself.
async fn guard(State(state): State<ControlState>, request: Request, next: Next) -> Response {
    if let Some(reason) = state.rejection(&request) {
        warn!(
            method = %request.method(),
            path = request.uri().path(),
            reason,
            "Rejected control page request"
        );
        return (StatusCode::FORBIDDEN, reason).into_response();
    }

    next.run(request).await
}

#[instrument(skip_all)]
async fn index(State(state): State<ControlState>, Query(query): Query<PageQuery>) -> Html<String> {
    let status = query.status.as_deref().and_then(PageStatus::from_query);
    Html(control_page::render(
        state.deep_work_minutes,
        state.token(),
        "",
        status,
    ))
}

#[instrument(skip_all)]
async fn reschedule(State(state): State<ControlState>) -> Html<String> {
    Html(control_page::render(
        state.deep_work_minutes,
        state.token(),
        &state.reschedule_prompt,
        None,
    ))
}

#[instrument(skip_all)]
async fn trigger(State(state): State<ControlState>, Path(slug): Path<String>) -> Response {
    let Some(action) = MenuAction::from_slug(&slug) else {
        return (StatusCode::NOT_FOUND, format!("Unknown action: {}", slug)).into_response();
    };

    forward(&state, |reply| AppCommand::Trigger { action, reply }).await
}

#[instrument(skip_all)]
async fn command(State(state): State<ControlState>, Form(form): Form<CommandForm>) -> Response {
    let text = form.text;
    forward(&state, |reply| AppCommand::SubmitText { text, reply }).await
}

#[instrument(skip_all)]
async fn quit(State(state): State<ControlState>) -> Response {
    if state.command_tx.send(AppCommand::Shutdown).await.is_err() {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    Html("<!doctype html><p>Restly controller stopped.</p>").into_response()
}

/// Send a command to the app loop and turn its reply into a response.
async fn forward(state: &ControlState, build: impl FnOnce(Reply) -> AppCommand) -> Response {
    let (reply, reply_rx) = oneshot::channel();

    if state.command_tx.send(build(reply)).await.is_err() {
        error!("Application loop is gone, command dropped");
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    match reply_rx.await {
        Ok(Ok(DispatchOutcome::Skipped)) => {
            Redirect::to(&format!("/?status={}", PageStatus::Empty.as_query())).into_response()
        }
        Ok(Ok(_)) => {
            Redirect::to(&format!("/?status={}", PageStatus::Sent.as_query())).into_response()
        }
        Ok(Err(e)) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
        Err(_) => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}
