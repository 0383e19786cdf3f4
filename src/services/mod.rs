pub mod catalog;
pub mod favorites;
pub mod fetch;
pub mod search;
pub mod trending;
