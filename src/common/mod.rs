pub mod constants;
pub mod utils;
