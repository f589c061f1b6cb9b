//! Scoped ownership of the live camera stream.

use mirage_core::camera::{Camera, CameraError, CameraStream, Facing};
use mirage_core::image::EncodedImage;

/// Holds the single live camera stream; dropping the guard closes it.
///
/// The controller keeps a guard exactly while the session is in `Capture`,
/// so every way out of that mode releases the hardware.
pub struct CaptureGuard {
    stream: Option<Box<dyn CameraStream>>,
}

impl CaptureGuard {
    pub async fn acquire(camera: &dyn Camera, facing: Facing) -> Result<Self, CameraError> {
        let stream = camera.open_stream(facing).await?;
        Ok(Self {
            stream: Some(stream),
        })
    }

    pub fn facing(&self) -> Option<Facing> {
        self.stream.as_ref().map(|stream| stream.facing())
    }

    pub async fn snapshot(&mut self) -> Result<EncodedImage, CameraError> {
        match self.stream.as_mut() {
            Some(stream) => stream.snapshot().await,
            None => Err(CameraError::Closed),
        }
    }

    /// Closes the stream now rather than at drop.
    pub fn release(mut self) {
        self.close();
    }

    fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.close();
        }
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counters {
        opened: AtomicUsize,
        closed: AtomicUsize,
    }

    struct CountingCamera(Arc<Counters>);

    struct CountingStream {
        facing: Facing,
        counters: Arc<Counters>,
    }

    #[async_trait]
    impl Camera for CountingCamera {
        async fn open_stream(&self, facing: Facing) -> Result<Box<dyn CameraStream>, CameraError> {
            self.0.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(CountingStream {
                facing,
                counters: self.0.clone(),
            }))
        }
    }

    #[async_trait]
    impl CameraStream for CountingStream {
        fn facing(&self) -> Facing {
            self.facing
        }

        async fn snapshot(&mut self) -> Result<EncodedImage, CameraError> {
            Ok(EncodedImage::new("image/jpeg", vec![1]))
        }

        fn close(&mut self) {
            self.counters.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_drop_closes_stream_once() {
        let counters = Arc::new(Counters::default());
        let camera = CountingCamera(counters.clone());

        let mut guard = CaptureGuard::acquire(&camera, Facing::Environment).await.unwrap();
        assert_eq!(guard.facing(), Some(Facing::Environment));
        assert!(guard.snapshot().await.is_ok());
        drop(guard);

        assert_eq!(counters.opened.load(Ordering::SeqCst), 1);
        assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_release_closes_stream_once() {
        let counters = Arc::new(Counters::default());
        let camera = CountingCamera(counters.clone());

        CaptureGuard::acquire(&camera, Facing::User).await.unwrap().release();

        assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
    }
}
