pub mod ai;
pub mod backend;
pub mod conversation;
pub mod operations;
