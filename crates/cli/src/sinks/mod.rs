mod stdout;

pub use stdout::{format_text, spawn_stdout_sink};
