pub mod input;
pub mod view;
pub mod workout;
