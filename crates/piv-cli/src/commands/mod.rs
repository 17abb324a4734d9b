pub mod config;
pub mod grid;
pub mod info;
pub mod run;
