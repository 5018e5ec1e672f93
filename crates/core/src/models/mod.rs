pub mod calendar;
pub mod event;
pub mod forecast;
pub mod frequency;
pub mod holding;
pub mod profile;
pub mod record;
pub mod report;
pub mod settings;
