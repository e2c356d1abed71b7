pub mod logic;
pub mod settings;
