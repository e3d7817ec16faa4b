pub mod settings;

pub use settings::{Effective, Overrides, Settings};
