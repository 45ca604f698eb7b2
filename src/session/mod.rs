pub mod auth;

pub mod interface;

pub mod web_app_data;
