//! HTTP route handlers

pub mod admin;
pub mod categories;
pub mod channels;
pub mod epg;
pub mod favorites;
pub mod health;
pub mod stream;
pub mod vod;
pub mod watch_history;
