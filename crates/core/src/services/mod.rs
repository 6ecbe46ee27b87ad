pub mod analytics_service;
pub mod chart_service;
pub mod grouping_service;
pub mod ledger_service;
