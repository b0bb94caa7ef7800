pub mod calendar;
pub mod filters;
pub mod validation;
