pub mod calendar;
pub mod catalog;
