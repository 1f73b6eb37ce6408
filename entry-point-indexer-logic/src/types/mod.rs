pub mod activity;
pub mod common;
pub mod entry_point;
pub mod event;
pub mod network;
pub mod transaction;
