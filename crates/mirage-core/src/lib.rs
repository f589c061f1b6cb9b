//! Domain types and boundaries of the Mirage photo booth kiosk.
//!
//! This crate performs no I/O. Persistence lives in `mirage-infrastructure`,
//! HTTP gateways in `mirage-interaction`, and the session state machine with
//! its event loop in `mirage-application`.

pub mod camera;
pub mod config;
pub mod credential;
pub mod error;
pub mod export;
pub mod gallery;
pub mod generation;
pub mod image;
pub mod prompt;
pub mod publish;
pub mod secret;
pub mod session;
pub mod style;

pub use error::MirageError;
pub use image::EncodedImage;
