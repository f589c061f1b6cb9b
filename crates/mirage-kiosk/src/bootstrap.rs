//! Wires the controller's collaborators from configuration.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use mirage_application::{ControllerSettings, KioskServices};
use mirage_core::config::KioskConfig;
use mirage_core::secret::SecretService;
use mirage_infrastructure::{
    DirGalleryRepository, DirectoryExporter, DirectoryStillCamera, MiragePaths,
    SecretFileCredentialSelector, SecretServiceImpl, TomlUsageCounter,
};
use mirage_interaction::{GeminiImageGateway, ImgbbPublishGateway};

pub struct Kiosk {
    pub services: KioskServices,
    pub settings: ControllerSettings,
    pub secret_path: PathBuf,
    /// True when this run wrote an empty `secret.json`.
    pub secret_template_created: bool,
}

pub async fn build(paths: &MiragePaths, config: &KioskConfig) -> Result<Kiosk> {
    let secret_service = SecretServiceImpl::from_paths(paths)?;
    let secret_path = secret_service.path().to_path_buf();
    let secret_template_created = secret_service.ensure_template()?;
    let secrets: Arc<dyn SecretService> = Arc::new(secret_service);

    let generation = GeminiImageGateway::new(secrets.clone(), &config.generation)
        .context("Failed to build generation client")?;
    let publish = ImgbbPublishGateway::new(secrets.clone(), &config.publish)
        .context("Failed to build upload client")?;

    let gallery = DirGalleryRepository::from_paths(paths).await?;
    let usage = TomlUsageCounter::from_paths(paths)?;
    let exporter = DirectoryExporter::from_paths(paths)?;

    let still_dir = match &config.camera.still_dir {
        Some(dir) => dir.clone(),
        None => paths.data_dir()?.join("frames"),
    };

    tracing::info!(
        model = generation.model(),
        gallery = %gallery.dir().display(),
        camera = %still_dir.display(),
        "Kiosk services ready"
    );

    Ok(Kiosk {
        services: KioskServices {
            generation: Arc::new(generation),
            publish: Arc::new(publish),
            gallery: Arc::new(gallery),
            usage: Arc::new(usage),
            exporter: Arc::new(exporter),
            credentials: Arc::new(SecretFileCredentialSelector::new(secrets)),
            camera: Arc::new(DirectoryStillCamera::new(still_dir)),
        },
        settings: ControllerSettings {
            idle_timeout: config.idle_timeout(),
            default_facing: config.camera.default_facing,
        },
        secret_path,
        secret_template_created,
    })
}
