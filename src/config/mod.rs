pub mod settings;

pub use settings::{ClientConfig, ClientOptions, ResponseMapping};
