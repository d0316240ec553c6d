pub mod analytics;
pub mod api;
pub mod app;
pub mod data;
pub mod embed;
pub mod model;
pub mod session;
pub mod storage;
pub mod timer;
pub mod ui;
pub mod view_models;

pub use app::QuizApp;
