pub mod activity;
pub mod calendar;
pub mod health;
pub mod teacher;
pub mod time_slot;
