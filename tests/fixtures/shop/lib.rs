pub mod events;
pub mod kafka;
pub mod web;
