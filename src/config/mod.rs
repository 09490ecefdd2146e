// Application configuration (environment + optional policy file).

pub mod app_config;

pub use app_config::AppConfig;
