pub mod blur;
pub mod config;
pub mod stack;
pub mod translate;
