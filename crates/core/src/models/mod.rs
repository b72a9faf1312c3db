pub mod activity;
pub mod calendar;
pub mod class;
pub mod payload;
pub mod time_slot;
pub mod weekday;
