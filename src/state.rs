use std::sync::Arc;

use crate::backend::BackendClient;
use crate::config::MediaUploadConfig;
use crate::storage::UploadSigner;

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn BackendClient>,
    pub uploads: Option<Arc<dyn UploadSigner>>,
    pub media: Option<MediaUploadConfig>,
}

impl AppState {
    pub fn new(backend: Arc<dyn BackendClient>) -> Self {
        Self {
            backend,
            uploads: None,
            media: None,
        }
    }

    pub fn with_uploads(mut self, uploads: Arc<dyn UploadSigner>) -> Self {
        self.uploads = Some(uploads);
        self
    }

    pub fn with_media(mut self, media: MediaUploadConfig) -> Self {
        self.media = Some(media);
        self
    }
}
