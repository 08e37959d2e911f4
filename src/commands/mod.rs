//! Commands
//!
//! CLI command implementations, one submodule per subcommand.

pub mod init;
pub mod list;
pub mod menu;
pub mod print;
pub mod run;

pub use init::{execute_init, InitOptions};
pub use list::{execute_list, ListOptions};
pub use menu::{execute_menu, MenuOptions};
pub use print::{execute_print, PrintOptions};
pub use run::{execute_run, RunOptions};
