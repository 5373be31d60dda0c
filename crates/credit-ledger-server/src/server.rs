// crates/credit-ledger-server/src/server.rs
// ============================================================================
// Module: Ledger Server
// Description: Internal HTTP surface for the per-client credit ledger.
// Purpose: Authenticate callers, validate input, and route to client actors.
// Dependencies: credit-ledger-core, credit-ledger-config, axum, tokio
// ============================================================================

//! ## Overview
//! The server exposes `POST /consume`, `POST /refund`, `GET /status`, and
//! `GET /history`. Every request must carry the shared secret in
//! `X-Internal-Secret` unless the config explicitly sets `dev_permissive`.
//! Validated commands are dispatched through a [`LedgerRouter`], which
//! serializes them per client. Error bodies are `{ok:false, error:{code,
//! message}}` for every failure, including unknown routes.
//!
//! When the config was loaded from a file, a background task polls its
//! modification time and swaps in a new policy snapshot on change. Server,
//! store, and audit sections only take effect on restart.
//!
//! Security posture: all inputs are untrusted and must be validated.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::extract::Query;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::HeaderMap;
use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use credit_ledger_config::AuditSinkType;
use credit_ledger_config::CreditLedgerConfig;
use credit_ledger_config::StoreType;
use credit_ledger_config::modified_at;
use credit_ledger_core::Clock;
use credit_ledger_core::FileAuditSink;
use credit_ledger_core::InMemoryLedgerStore;
use credit_ledger_core::LedgerAuditSink;
use credit_ledger_core::LedgerErrorCode;
use credit_ledger_core::LedgerResponse;
use credit_ledger_core::LedgerRouter;
use credit_ledger_core::LedgerStore;
use credit_ledger_core::NoopAuditSink;
use credit_ledger_core::SecurityAuditEvent;
use credit_ledger_core::StderrAuditSink;
use credit_ledger_core::SystemClock;
use credit_ledger_store_sqlite::SqliteLedgerStore;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::rpc::MutationKind;
use crate::rpc::Parsed;
use crate::rpc::parse_history;
use crate::rpc::parse_operation;
use crate::rpc::parse_status;
use crate::security::constant_time_eq_str;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header carrying the shared secret.
pub const SECRET_HEADER: &str = "x-internal-secret";
/// Poll interval for config file changes.
const RELOAD_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Version assigned to the policy built at startup.
const INITIAL_POLICY_VERSION: u64 = 1;

// ============================================================================
// SECTION: Server
// ============================================================================

/// Internal ledger server instance.
pub struct LedgerServer {
    /// Validated configuration.
    config: CreditLedgerConfig,
    /// Shared handler state.
    state: Arc<ServerState>,
}

impl LedgerServer {
    /// Builds a server from configuration using the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when configuration or initialization fails.
    pub fn from_config(config: CreditLedgerConfig) -> Result<Self, ServerError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Builds a server from configuration with an explicit clock.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when configuration or initialization fails.
    pub fn with_clock(
        config: CreditLedgerConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let secret =
            config.server.resolve_secret().map_err(|err| ServerError::Config(err.to_string()))?;
        let store = build_store(&config)?;
        let audit = build_audit_sink(&config)?;
        if secret.is_none() {
            audit.record_security(&SecurityAuditEvent::new(
                "dev_permissive",
                Some("internal secret disabled; any caller is accepted".to_string()),
                true,
            ));
        }
        let router = Arc::new(LedgerRouter::new(
            store,
            clock,
            config.to_policy(INITIAL_POLICY_VERSION),
            config.actors.settings(),
            Arc::clone(&audit),
        ));
        let state = Arc::new(ServerState {
            router,
            audit,
            secret,
            max_body_bytes: config.server.max_body_bytes,
        });
        Ok(Self {
            config,
            state,
        })
    }

    /// Returns the ledger router backing this server.
    #[must_use]
    pub fn router(&self) -> Arc<LedgerRouter> {
        Arc::clone(&self.state.router)
    }

    /// Returns the axum application for this server.
    #[must_use]
    pub fn app(&self) -> Router {
        build_app(Arc::clone(&self.state))
    }

    /// Binds the configured address and serves requests.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let addr: SocketAddr =
            self.config.server.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|err| ServerError::Transport(format!("bind {addr} failed: {err}")))?;
        self.serve_listener(listener).await
    }

    /// Serves requests on an already bound listener.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the server fails.
    pub async fn serve_listener(self, listener: TcpListener) -> Result<(), ServerError> {
        if let Some(path) = self.config.source_path.clone() {
            tokio::spawn(watch_policy(
                path,
                self.config.source_modified_at,
                Arc::clone(&self.state.router),
                Arc::clone(&self.state.audit),
            ));
        }
        let app = self.app();
        axum::serve(listener, app)
            .await
            .map_err(|err| ServerError::Transport(format!("http server failed: {err}")))
    }
}

/// Builds the ledger store selected by configuration.
fn build_store(config: &CreditLedgerConfig) -> Result<Arc<dyn LedgerStore>, ServerError> {
    match config.store.store_type {
        StoreType::Memory => Ok(Arc::new(InMemoryLedgerStore::new())),
        StoreType::Sqlite => {
            let sqlite = config.store.sqlite_config().ok_or_else(|| {
                ServerError::Config("sqlite store requires path".to_string())
            })?;
            let store = SqliteLedgerStore::new(&sqlite)
                .map_err(|err| ServerError::Init(err.to_string()))?;
            Ok(Arc::new(store))
        }
    }
}

/// Builds the audit sink selected by configuration.
fn build_audit_sink(config: &CreditLedgerConfig) -> Result<Arc<dyn LedgerAuditSink>, ServerError> {
    match config.audit.sink {
        AuditSinkType::Stderr => Ok(Arc::new(StderrAuditSink)),
        AuditSinkType::None => Ok(Arc::new(NoopAuditSink)),
        AuditSinkType::File => {
            let path = config.audit.path.as_ref().ok_or_else(|| {
                ServerError::Config("file audit sink requires path".to_string())
            })?;
            let sink = FileAuditSink::new(path)
                .map_err(|err| ServerError::Init(format!("audit log open failed: {err}")))?;
            Ok(Arc::new(sink))
        }
    }
}

// ============================================================================
// SECTION: HTTP Handlers
// ============================================================================

/// Shared state for HTTP handlers.
struct ServerState {
    /// Per-client actor router.
    router: Arc<LedgerRouter>,
    /// Audit sink for security events.
    audit: Arc<dyn LedgerAuditSink>,
    /// Expected shared secret; `None` accepts any caller.
    secret: Option<String>,
    /// Maximum request body size.
    max_body_bytes: usize,
}

/// Builds the route table.
fn build_app(state: Arc<ServerState>) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_body_bytes);
    Router::new()
        .route("/consume", post(handle_consume))
        .route("/refund", post(handle_refund))
        .route("/status", get(handle_status))
        .route("/history", get(handle_history))
        .fallback(handle_not_found)
        .method_not_allowed_fallback(handle_not_found)
        .layer(body_limit)
        .with_state(state)
}

/// Handles `POST /consume`.
async fn handle_consume(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    handle_body(&state, &headers, MutationKind::Charge, body).await
}

/// Handles `POST /refund`.
async fn handle_refund(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    handle_body(&state, &headers, MutationKind::Refund, body).await
}

/// Handles `GET /status`.
async fn handle_status(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(denied) = authorize(&state, &headers, "/status") {
        return denied;
    }
    dispatch(&state, parse_status(&query)).await
}

/// Handles `GET /history`.
async fn handle_history(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(denied) = authorize(&state, &headers, "/history") {
        return denied;
    }
    dispatch(&state, parse_history(&query)).await
}

/// Handles unknown routes and methods.
async fn handle_not_found(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> Response {
    if let Some(denied) = authorize(&state, &headers, "fallback") {
        return denied;
    }
    into_http(LedgerResponse::error(LedgerErrorCode::NotFound, "Not found"))
}

/// Shared path for the JSON-body routes.
async fn handle_body(
    state: &ServerState,
    headers: &HeaderMap,
    kind: MutationKind,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let route = match kind {
        MutationKind::Charge => "/consume",
        MutationKind::Refund => "/refund",
    };
    if let Some(denied) = authorize(state, headers, route) {
        return denied;
    }
    let bytes = match body {
        Ok(bytes) => bytes,
        Err(rejection) => {
            return into_http(LedgerResponse::error(
                LedgerErrorCode::BadRequest,
                format!("request body rejected: {}", rejection.body_text()),
            ));
        }
    };
    let policy = state.router.policy();
    dispatch(state, parse_operation(kind, &policy, &bytes)).await
}

/// Sends a parsed command to its client actor.
async fn dispatch(state: &ServerState, parsed: Parsed) -> Response {
    match parsed {
        Ok((client_id, request)) => into_http(state.router.dispatch(&client_id, request).await),
        Err(rejected) => into_http(rejected),
    }
}

/// Checks the shared secret; returns the 403 response on mismatch.
fn authorize(state: &ServerState, headers: &HeaderMap, route: &str) -> Option<Response> {
    let expected = state.secret.as_deref()?;
    let provided = headers.get(SECRET_HEADER).and_then(|value| value.to_str().ok());
    if provided.is_some_and(|provided| constant_time_eq_str(provided, expected)) {
        return None;
    }
    let reason = if provided.is_some() { "secret mismatch" } else { "secret missing" };
    state.audit.record_security(&SecurityAuditEvent::new(
        "auth_failure",
        Some(format!("{reason} on {route}")),
        false,
    ));
    Some(into_http(LedgerResponse::error(LedgerErrorCode::Forbidden, "Forbidden")))
}

/// Converts a ledger response into an HTTP response.
fn into_http(response: LedgerResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut http = (status, Json(response.body)).into_response();
    if let Some(rate_limit) = response.rate_limit {
        let headers = http.headers_mut();
        for (name, value) in rate_limit.pairs() {
            if let (Ok(name), Ok(value)) =
                (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(&value))
            {
                headers.insert(name, value);
            }
        }
    }
    http
}

// ============================================================================
// SECTION: Policy Reload
// ============================================================================

/// Polls the config file and reloads the policy snapshot on change.
async fn watch_policy(
    path: PathBuf,
    mut last_modified: Option<std::time::SystemTime>,
    router: Arc<LedgerRouter>,
    audit: Arc<dyn LedgerAuditSink>,
) {
    let mut version = INITIAL_POLICY_VERSION;
    let mut ticker = tokio::time::interval(RELOAD_POLL_INTERVAL);
    loop {
        ticker.tick().await;
        let stat_path = path.clone();
        let Ok(modified) = tokio::task::spawn_blocking(move || modified_at(&stat_path)).await
        else {
            continue;
        };
        if modified.is_none() || modified == last_modified {
            continue;
        }
        last_modified = modified;
        let load_path = path.clone();
        let loaded =
            tokio::task::spawn_blocking(move || CreditLedgerConfig::load(Some(&load_path))).await;
        let loaded = match loaded {
            Ok(loaded) => loaded.map_err(|err| err.to_string()),
            Err(err) => Err(format!("config reload join failed: {err}")),
        };
        match loaded {
            Ok(config) => {
                version += 1;
                router.reload_policy(config.to_policy(version), Some(path.display().to_string()));
            }
            Err(err) => {
                audit.record_security(&SecurityAuditEvent::new(
                    "config_reload_rejected",
                    Some(err),
                    false,
                ));
            }
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Ledger server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization failures.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}
