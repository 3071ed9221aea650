pub mod app;
pub mod state_file;
