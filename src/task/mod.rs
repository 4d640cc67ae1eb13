//! Task model and record generation.

pub mod generator;
pub mod model;
pub mod validation;

pub use generator::{Clock, FixedClock, SystemClock, TaskGenerator};
pub use model::{JobCategory, JobTypeOption, TaskRecord};
pub use validation::ValidationError;
