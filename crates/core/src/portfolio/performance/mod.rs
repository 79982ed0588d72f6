pub mod performance_calculator;
pub mod performance_model;
pub mod performance_service;


pub use performance_calculator::{compare_totals, daily_changes};
pub use performance_model::*;
pub use performance_service::*;
