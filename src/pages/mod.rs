pub mod login;
pub mod popups;
pub mod registers;
pub mod summary;
pub mod vehicles;
