pub mod analytics_service;
pub mod calendar_service;
pub mod dividend_service;
pub mod forecast_service;
pub mod frequency_service;
pub mod income_service;
pub mod normalization_service;
pub mod prediction_service;
pub mod reconciliation_service;
