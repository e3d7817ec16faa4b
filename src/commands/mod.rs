pub mod apply;
pub mod completions;
pub mod helpers;
pub mod settings;
