pub mod app_error;
pub mod clock;
pub mod jwt;
pub mod password;
pub mod use_cases;
pub mod validators;
