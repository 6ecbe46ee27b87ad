pub mod chart;
pub mod grouping;
pub mod ledger;
pub mod observation;
pub mod settings;
