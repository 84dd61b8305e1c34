/// Command, message and callback handlers
pub mod handlers;
/// Media extraction and download
pub mod media;
/// Dispatcher wiring
pub mod runner;
/// Surface to inline keyboard conversion
pub mod views;

pub use runner::{run_bot, setup_handler};
