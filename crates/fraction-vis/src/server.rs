//! Axum control surface with WebSocket push for the presentation layer.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use tokio::time::MissedTickBehavior;
use tower_http::cors::CorsLayer;

use crate::config::VisConfig;
use crate::driver::{PlaybackDriver, SharedSimulator};
use crate::error::Error;
use crate::events::LoggedEvent;
use crate::phase::{AnimationPhase, LearningMode, OperationType};
use crate::simulator::{Simulator, ViewState};

/// Shared application state.
pub struct AppState {
    driver: PlaybackDriver,
}

impl AppState {
    fn simulator(&self) -> &SharedSimulator {
        self.driver.simulator()
    }
}

/// Visualization control server.
pub struct VisServer {
    state: Arc<AppState>,
}

impl VisServer {
    /// Create a server around a simulator.
    pub fn new(simulator: Simulator, config: &VisConfig) -> Self {
        let simulator = Arc::new(RwLock::new(simulator));
        Self {
            state: Arc::new(AppState {
                driver: PlaybackDriver::new(simulator, config.tick_interval),
            }),
        }
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/state", get(state_handler))
            .route("/api/events", get(events_handler))
            .route("/api/play", post(play_handler))
            .route("/api/pause", post(pause_handler))
            .route("/api/reset", post(reset_handler))
            .route("/api/step", post(step_handler))
            .route("/api/phase", post(phase_handler))
            .route("/api/randomize", post(randomize_handler))
            .route("/api/fractions", post(fractions_handler))
            .route("/api/operation", post(operation_handler))
            .route("/api/mode", post(mode_handler))
            .route("/api/speed", post(speed_handler))
            // WebSocket for real-time updates
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the server on the given address.
    pub async fn serve(self, addr: std::net::SocketAddr) -> crate::error::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Fraction visualizer listening on http://{}", listener.local_addr()?);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

/// Error body returned to clients.
#[derive(Debug, Serialize, Deserialize)]
struct ErrorBody {
    error: String,
}

struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            Error::Io(_) | Error::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        tracing::warn!(error = %self.0, "Request rejected");
        (status, Json(ErrorBody { error: self.0.to_string() })).into_response()
    }
}

type ApiResult = Result<Json<ViewState>, ApiError>;

/// Numerator and denominator as typed by the user, before clamping.
#[derive(Debug, Clone, Copy, Deserialize)]
struct FractionInput {
    numerator: u64,
    denominator: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum StepDirection {
    Forward,
    Backward,
}

/// Commands accepted over HTTP and WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Command {
    GetState,
    Play,
    Pause,
    Reset,
    Step { direction: StepDirection },
    SetPhase { phase: AnimationPhase },
    Randomize,
    SetFractions {
        fraction1: Option<FractionInput>,
        fraction2: Option<FractionInput>,
    },
    SetOperation { operation: OperationType },
    SetMode { mode: LearningMode },
    SetSpeed { speed: f64 },
}

/// Apply a command and return the resulting view.
///
/// Commands that rewind the sequencer without going through the driver leave
/// the tick task holding a stale token; it stops on its next tick.
async fn apply(state: &AppState, command: Command) -> Result<ViewState, Error> {
    tracing::debug!(?command, "Applying command");
    match command {
        Command::GetState => {}
        Command::Play => state.driver.play().await,
        Command::Pause => state.driver.pause().await,
        Command::Reset => state.driver.reset().await,
        Command::Step { direction } => {
            let mut sim = state.simulator().write().await;
            match direction {
                StepDirection::Forward => sim.step_forward(),
                StepDirection::Backward => sim.step_back(),
            };
        }
        Command::SetPhase { phase } => {
            state.simulator().write().await.set_phase(phase)?;
        }
        Command::Randomize => {
            state.simulator().write().await.generate_random_problem()?;
        }
        Command::SetFractions { fraction1, fraction2 } => {
            let mut sim = state.simulator().write().await;
            if let Some(input) = fraction1 {
                let fraction = sim.config().clamp_fraction(input.numerator, input.denominator);
                sim.set_fraction1(fraction)?;
            }
            if let Some(input) = fraction2 {
                let fraction = sim.config().clamp_fraction(input.numerator, input.denominator);
                sim.set_fraction2(fraction)?;
            }
        }
        Command::SetOperation { operation } => {
            state.simulator().write().await.set_operation(operation);
        }
        Command::SetMode { mode } => {
            state.simulator().write().await.set_mode(mode);
        }
        Command::SetSpeed { speed } => {
            let mut sim = state.simulator().write().await;
            let speed = sim.config().clamp_speed(speed);
            sim.set_speed(speed)?;
        }
    }
    Ok(state.simulator().read().await.view())
}

async fn run(state: &AppState, command: Command) -> ApiResult {
    Ok(Json(apply(state, command).await?))
}

async fn state_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    run(&state, Command::GetState).await
}

#[derive(Deserialize)]
struct EventsQuery {
    since: Option<u64>,
}

async fn events_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventsQuery>,
) -> Json<Vec<LoggedEvent>> {
    let sim = state.simulator().read().await;
    Json(sim.events_since(query.since.unwrap_or(0)))
}

async fn play_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    run(&state, Command::Play).await
}

async fn pause_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    run(&state, Command::Pause).await
}

async fn reset_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    run(&state, Command::Reset).await
}

#[derive(Deserialize)]
struct StepRequest {
    direction: StepDirection,
}

async fn step_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StepRequest>,
) -> ApiResult {
    run(&state, Command::Step { direction: req.direction }).await
}

#[derive(Deserialize)]
struct PhaseRequest {
    phase: AnimationPhase,
}

async fn phase_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PhaseRequest>,
) -> ApiResult {
    run(&state, Command::SetPhase { phase: req.phase }).await
}

async fn randomize_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    run(&state, Command::Randomize).await
}

#[derive(Deserialize)]
struct FractionsRequest {
    fraction1: Option<FractionInput>,
    fraction2: Option<FractionInput>,
}

async fn fractions_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FractionsRequest>,
) -> ApiResult {
    run(
        &state,
        Command::SetFractions {
            fraction1: req.fraction1,
            fraction2: req.fraction2,
        },
    )
    .await
}

#[derive(Deserialize)]
struct OperationRequest {
    operation: OperationType,
}

async fn operation_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OperationRequest>,
) -> ApiResult {
    run(&state, Command::SetOperation { operation: req.operation }).await
}

#[derive(Deserialize)]
struct ModeRequest {
    mode: LearningMode,
}

async fn mode_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ModeRequest>,
) -> ApiResult {
    run(&state, Command::SetMode { mode: req.mode }).await
}

#[derive(Deserialize)]
struct SpeedRequest {
    speed: f64,
}

async fn speed_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeedRequest>,
) -> ApiResult {
    run(&state, Command::SetSpeed { speed: req.speed }).await
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// How often a playing walkthrough pushes phase progress to WebSocket clients.
const PROGRESS_PUSH_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsResponse {
    State(ViewState),
    Error(ErrorBody),
}

fn encode(response: &WsResponse) -> Result<Message, Error> {
    Ok(Message::Text(serde_json::to_string(response)?.into()))
}

/// Send a response. False once the client is gone.
async fn send(socket: &mut WebSocket, response: &WsResponse) -> bool {
    match encode(response) {
        Ok(msg) => socket.send(msg).await.is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to encode WebSocket response");
            true
        }
    }
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let (mut events, view) = {
        let sim = state.simulator().read().await;
        (sim.subscribe(), sim.view())
    };

    if !send(&mut socket, &WsResponse::State(view)).await {
        return;
    }

    let mut progress = tokio::time::interval(PROGRESS_PUSH_INTERVAL);
    progress.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let text = match msg {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    Some(Ok(_)) => continue,
                };
                let response = match serde_json::from_str::<Command>(text.as_str()) {
                    Ok(command) => match apply(&state, command).await {
                        Ok(view) => WsResponse::State(view),
                        Err(e) => WsResponse::Error(ErrorBody { error: e.to_string() }),
                    },
                    Err(e) => WsResponse::Error(ErrorBody { error: e.to_string() }),
                };
                if !send(&mut socket, &response).await {
                    break;
                }
            }
            event = events.recv() => {
                match event {
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {
                        let view = state.simulator().read().await.view();
                        if !send(&mut socket, &WsResponse::State(view)).await {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            _ = progress.tick() => {
                // Phase progress moves between events; only worth sending while playing.
                let view = {
                    let sim = state.simulator().read().await;
                    sim.is_playing().then(|| sim.view())
                };
                if let Some(view) = view {
                    if !send(&mut socket, &WsResponse::State(view)).await {
                        break;
                    }
                }
            }
        }
    }
    tracing::debug!("WebSocket closed");
}
