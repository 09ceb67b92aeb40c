mod console;
mod export;

pub use console::ConsoleReporter;
pub use export::{write_text, HtmlExporter, JsonExporter};
