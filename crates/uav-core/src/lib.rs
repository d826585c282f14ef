pub mod classic;
pub mod engine;
pub mod enhance;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod models;
pub mod pheromone;
pub mod reachability;
pub mod segment;
pub mod smoothed;
pub mod validation;

pub use engine::{build_routes, AntColonyParams, AntColonyPlanner};
pub use error::{InfeasibleUav, PlannerError};
pub use generator::{GeneratorConfig, ScenarioGenerator, UavProfile};
pub use models::{
    Point, PointRole, Route, RoutePlan, RouteSegment, RouteSegmentPoint, Scenario, SegmentKind,
    Uav,
};
pub use segment::select_segment;
pub use validation::validate_scenario;
