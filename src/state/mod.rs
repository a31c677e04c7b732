pub mod edit;
pub mod filters;
pub mod list;
pub mod matrix;
