pub mod accounts;
pub mod members;
pub mod voting;
