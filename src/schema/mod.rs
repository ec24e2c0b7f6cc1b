mod build;
mod error;
mod plan;

pub use build::{Planner, PlannerOptions};
pub use error::SchemaError;
pub use plan::{ArrayPlan, Plan, Strategy};
