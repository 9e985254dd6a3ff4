pub mod api;
pub mod categories;
pub mod cli;
pub mod config;
pub mod error;
pub mod forms;
pub mod model;
pub mod route;
pub mod session;
pub mod shell;
pub mod validation;

pub use error::{ClientError, ClientResult};
pub use shell::App;
