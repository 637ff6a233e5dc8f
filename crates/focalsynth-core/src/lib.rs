pub mod config;
pub mod consts;
pub mod error;
pub mod fft;
pub mod filter;
pub mod focal_stack;
pub mod image;
pub mod layers;
pub mod pipeline;
pub mod psf;
