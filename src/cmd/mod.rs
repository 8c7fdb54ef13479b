pub mod auth;
pub mod evaluate;
pub mod score;
