//! Fluent builders for constructing seed scenarios.

mod scenario;

pub use scenario::{ScenarioBuilder, ScenarioError, ScenarioResult};
