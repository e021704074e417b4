pub mod command;
pub mod subprocess;

pub use command::{build_argv, render_template, split_command, Placeholders};
pub use subprocess::{run_command, LocalTranslator};
