pub mod config;
pub mod network;
pub mod platform;
pub mod process;
pub mod storage;
