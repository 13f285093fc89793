pub mod auth_usecase;
