pub mod budget;
pub mod calculate;
pub mod setup;
pub mod summary;
pub mod ui;
