pub mod activity;
pub mod calendar;
pub mod class;
pub mod teacher;
pub mod time_slot;
