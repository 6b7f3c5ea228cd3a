pub mod bulb;
pub mod espn;
pub mod game;
pub mod kasa;
pub mod team;
