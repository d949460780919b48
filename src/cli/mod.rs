pub mod commission;
pub mod dashboard;
pub mod salary;
pub mod session;
pub mod settings;
pub mod setup;
pub mod transactions;
pub mod ui;
