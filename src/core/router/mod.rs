//! Complexity analysis and route selection
//!
//! - `complexity` - word count / keyword heuristic producing a tier
//! - `routing_table` - tier × cost priority table with validation
//! - `route` - resolved provider/model pair
//! - `router` - selection with forced, table and default routes

pub mod complexity;
pub mod route;
pub mod router;
pub mod routing_table;

#[cfg(test)]
mod tests;

pub use complexity::{COMPLEXITY_INDICATORS, ComplexityAnalyzer, ComplexitySignals, ComplexityTier};
pub use route::{Route, RouteSource};
pub use router::{RouteOptions, Router};
pub use routing_table::{CostPriority, RoutingTable};
