//! Persistence and local collaborators for the Mirage kiosk.

pub mod config_service;
pub mod credential_selector;
pub mod dir_gallery_repository;
pub mod dto;
pub mod exporter;
pub mod paths;
pub mod secret_service;
pub mod still_camera;
pub mod storage;
pub mod usage_counter;

pub use crate::config_service::ConfigService;
pub use crate::credential_selector::SecretFileCredentialSelector;
pub use crate::dir_gallery_repository::DirGalleryRepository;
pub use crate::exporter::DirectoryExporter;
pub use crate::paths::MiragePaths;
pub use crate::secret_service::SecretServiceImpl;
pub use crate::still_camera::DirectoryStillCamera;
pub use crate::usage_counter::TomlUsageCounter;
