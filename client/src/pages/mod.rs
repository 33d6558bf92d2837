pub mod admin;
pub mod dashboard;
pub mod forgot_password;
pub mod home;
pub mod login;
pub mod not_found;
pub mod register;
