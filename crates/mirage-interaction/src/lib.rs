//! Outbound HTTP gateways: image generation and image hosting.

pub mod gemini_image_gateway;
pub mod imgbb_publish_gateway;

pub use gemini_image_gateway::GeminiImageGateway;
pub use imgbb_publish_gateway::ImgbbPublishGateway;
