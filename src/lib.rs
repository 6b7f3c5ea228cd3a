pub mod capture;
pub mod config;
pub mod error;
pub mod espn;
pub mod kasa;
pub mod light;
pub mod model;
pub mod provider;
pub mod scheduler;
pub mod supervisor;
pub mod timing;
pub mod watcher;
