pub mod article;
pub mod like;
pub mod user;
