//! `engine` crate: workflow graph model, validation, and the simulation engine.
//!
//! Everything here is synchronous and pure over a graph snapshot. Pacing the
//! resulting log for display lives in the `player` crate.

pub mod models;
pub mod error;
pub mod graph;
pub mod store;
pub mod validator;
pub mod simulation;

pub use models::{Edge, Graph, Node, NodeAttributes, NodeKind, Position, Priority};
pub use error::EngineError;
pub use store::GraphStore;
pub use validator::{validate, ValidationProblem, ValidationReport};
pub use simulation::{simulate, SimulationEvent, SimulationLog, SimulationResult, SimulationStatus};
