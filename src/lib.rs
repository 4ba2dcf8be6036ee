pub mod backup;
pub mod client;
pub mod config;
pub mod delivery;
pub mod endpoints;
pub mod errors;
pub mod run;
pub mod wizard;
