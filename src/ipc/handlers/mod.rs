pub mod backup;
pub mod core;
pub mod editor;
pub mod export;
pub mod lessons;
pub mod resources;
pub mod setup;
