pub mod commands;

pub use commands::CommandHandler;
