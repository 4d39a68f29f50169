use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use axum::{
    extract::{Form, FromRequest, Multipart, Path, Request, State},
    http::header,
    response::{Html, Redirect},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use crate::core::{service, NewTodo, TodoError};
use crate::storage::{Session, Storage};
use crate::views::TodoListView;

#[cfg(feature = "tracing")]
use tower_http::trace::TraceLayer;
#[cfg(feature = "tracing")]
use tracing::{info, instrument};

pub struct AppState<S: Storage + 'static> {
    pub storage: Arc<S>,
    pub view: Arc<TodoListView>,
}

impl<S: Storage + 'static> AppState<S> {
    pub fn new(storage: S, view: TodoListView) -> Self {
        Self {
            storage: Arc::new(storage),
            view: Arc::new(view),
        }
    }
}

impl<S: Storage + 'static> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            view: self.view.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateTodoForm {
    #[serde(default)]
    title: Option<String>,
}

/// The `title` field of a create request, read from either urlencoded or
/// multipart form data. Any body that cannot be read as a form counts as a
/// missing title.
#[derive(Debug)]
pub struct TitleField(pub Option<String>);

impl<S: Send + Sync> FromRequest<S> for TitleField {
    type Rejection = TodoError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if !multipart {
            return match Form::<CreateTodoForm>::from_request(req, state).await {
                Ok(Form(form)) => Ok(Self(form.title)),
                Err(rejection) => Err(TodoError::Validation(rejection.body_text())),
            };
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| TodoError::Validation(rejection.body_text()))?;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| TodoError::Validation(e.body_text()))?
        {
            if field.name() == Some("title") {
                let title = field
                    .text()
                    .await
                    .map_err(|e| TodoError::Validation(e.body_text()))?;
                return Ok(Self(Some(title)));
            }
        }
        Ok(Self(None))
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
}

/// Builds the full route table for the application.
pub fn router<S: Storage + 'static>(state: AppState<S>) -> Router {
    let router = Router::new()
        .route("/", get(list_page::<S>))
        .route("/todos", post(create_todo::<S>))
        .route("/todos/{id}/toggle", post(toggle_todo::<S>))
        .route("/todos/{id}/delete", post(delete_todo::<S>))
        .route("/health", get(health_route))
        .with_state(state);

    #[cfg(feature = "tracing")]
    let router = router.layer(TraceLayer::new_for_http().make_span_with(
        |request: &axum::extract::Request<_>| {
            let uri = request.uri().to_string();
            tracing::info_span!("http_request", method = ?request.method(), uri)
        },
    ));

    router
}

#[cfg_attr(feature = "tracing", instrument(skip(state)))]
async fn list_page<S: Storage + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Html<String>, TodoError> {
    let mut session = state.storage.open_session().await?;
    let todos = service::list_todos(&mut session).await?;
    session.commit().await?;
    Ok(Html(state.view.render(&todos)?))
}

#[cfg_attr(feature = "tracing", instrument(skip(state)))]
async fn create_todo<S: Storage + 'static>(
    State(state): State<AppState<S>>,
    TitleField(title): TitleField,
) -> Result<Redirect, TodoError> {
    let new_todo = NewTodo::new(title.as_deref().unwrap_or_default())?;
    let mut session = state.storage.open_session().await?;
    service::create_todo(&mut session, new_todo).await?;
    session.commit().await?;
    Ok(Redirect::to("/"))
}

#[cfg_attr(feature = "tracing", instrument(skip(state)))]
async fn toggle_todo<S: Storage + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Redirect, TodoError> {
    let mut session = state.storage.open_session().await?;
    service::toggle_todo(&mut session, id).await?;
    session.commit().await?;
    Ok(Redirect::to("/"))
}

#[cfg_attr(feature = "tracing", instrument(skip(state)))]
async fn delete_todo<S: Storage + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Redirect, TodoError> {
    let mut session = state.storage.open_session().await?;
    service::delete_todo(&mut session, id).await?;
    session.commit().await?;
    Ok(Redirect::to("/"))
}

/// Liveness only. Storage is not consulted.
async fn health_route() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
    })
}

pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    pub async fn new(router: Router, addr: SocketAddr) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to listen on {addr}"))?;
        Ok(Self { router, listener })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("listener has no local address")
    }

    pub async fn run(self) -> anyhow::Result<()> {
        #[cfg(feature = "tracing")]
        {
            if let Ok(addr) = self.listener.local_addr() {
                info!(addr = %addr, "Todo server started");
            }
        }
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("received error from running server")?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    #[cfg(feature = "tracing")]
    info!("Shutdown signal received");
}
