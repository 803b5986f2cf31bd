//! Fraction Visualizer
//!
//! Narrated, steppable walkthrough of fraction multiplication and division.
//!
//! # Architecture
//!
//! - **Sequencer**: Ordered animation phases per operation, timed or stepped
//! - **Simulator**: The problem, its answer, narration and display models
//! - **Driver**: Tokio task ticking the simulator during playback
//! - **REST API / WebSocket**: Controls and live state for a frontend
//!
//! # Usage
//!
//! ```ignore
//! let config = VisConfig::from_env()?;
//! let sim = Simulator::new(config.simulator.clone())?;
//!
//! let server = VisServer::new(sim, &config);
//! server.serve(config.addr).await?;
//! ```

mod area;
mod config;
mod driver;
mod error;
mod events;
mod narration;
mod phase;
mod sequencer;
mod server;
mod simulator;

pub use area::{AreaModel, Block, CellState, ReductionGroups};
pub use config::VisConfig;
pub use driver::{PlaybackDriver, SharedSimulator, DEFAULT_TICK_INTERVAL};
pub use error::{Error, Result};
pub use events::{EventLog, FractionSlot, LoggedEvent, SimulationEvent};
pub use narration::{base_message, narrate, NarrationContext};
pub use phase::{
    AnimationPhase, DivisionStep, LearningMode, NarrationTone, OperationType, ReductionStep,
};
pub use sequencer::{AnimationProgress, PhaseChange, PhaseSequencer, TickOutcome, TickToken};
pub use server::VisServer;
pub use simulator::{ProblemOutcome, SimulationState, Simulator, SimulatorConfig, ViewState};
