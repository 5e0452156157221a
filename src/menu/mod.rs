mod handlers;
mod main_menu;

pub use handlers::run_path;
pub use main_menu::{run_menu_loop, show_main_menu};
