//! A single verification request.

use crate::error::InputError;
use crate::image::{Image, ImageRole};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Opaque request identifier, echoed on the decision.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random (v4) identifier.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Document image and selfie submitted together. Lives for one evaluation.
///
/// Images sit behind `Arc` so the concurrent signal tasks can share them
/// without copying pixel buffers.
#[derive(Clone, Debug)]
pub struct VerificationRequest {
    pub request_id: RequestId,
    pub received_at: Timestamp,
    pub document: Arc<Image>,
    pub selfie: Arc<Image>,
}

impl VerificationRequest {
    /// A request with a random id stamped now.
    pub fn new(document: Image, selfie: Image) -> Self {
        Self {
            request_id: RequestId::random(),
            received_at: Timestamp::now(),
            document: Arc::new(document),
            selfie: Arc::new(selfie),
        }
    }

    pub fn builder() -> VerificationRequestBuilder {
        VerificationRequestBuilder::default()
    }

    /// The image submitted in `role`.
    pub fn image(&self, role: ImageRole) -> &Image {
        match role {
            ImageRole::Document => &self.document,
            ImageRole::Selfie => &self.selfie,
        }
    }
}

/// Assembles a request from parts that may be missing, e.g. multipart uploads.
#[derive(Default)]
pub struct VerificationRequestBuilder {
    request_id: Option<RequestId>,
    received_at: Option<Timestamp>,
    document: Option<Arc<Image>>,
    selfie: Option<Arc<Image>>,
}

impl VerificationRequestBuilder {
    pub fn request_id(mut self, id: RequestId) -> Self {
        self.request_id = Some(id);
        self
    }

    pub fn received_at(mut self, at: Timestamp) -> Self {
        self.received_at = Some(at);
        self
    }

    pub fn document(mut self, image: impl Into<Arc<Image>>) -> Self {
        self.document = Some(image.into());
        self
    }

    pub fn selfie(mut self, image: impl Into<Arc<Image>>) -> Self {
        self.selfie = Some(image.into());
        self
    }

    /// Fails with [`InputError::MissingImage`] if either image was not supplied.
    pub fn build(self) -> Result<VerificationRequest, InputError> {
        let document = self
            .document
            .ok_or(InputError::MissingImage(ImageRole::Document))?;
        let selfie = self
            .selfie
            .ok_or(InputError::MissingImage(ImageRole::Selfie))?;
        Ok(VerificationRequest {
            request_id: self.request_id.unwrap_or_else(RequestId::random),
            received_at: self.received_at.unwrap_or_else(Timestamp::now),
            document,
            selfie,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_both_images() {
        let err = VerificationRequest::builder()
            .selfie(Image::solid(10, 10, [0, 0, 0]))
            .build()
            .unwrap_err();
        assert_eq!(err, InputError::MissingImage(ImageRole::Document));

        let err = VerificationRequest::builder()
            .document(Image::solid(10, 10, [0, 0, 0]))
            .build()
            .unwrap_err();
        assert_eq!(err, InputError::MissingImage(ImageRole::Selfie));
    }

    #[test]
    fn builder_keeps_supplied_id_and_time() {
        let req = VerificationRequest::builder()
            .request_id(RequestId::new("req-1"))
            .received_at(Timestamp::new(1_700_000_000))
            .document(Image::solid(10, 10, [1, 1, 1]))
            .selfie(Image::solid(10, 10, [2, 2, 2]))
            .build()
            .unwrap();
        assert_eq!(req.request_id.as_str(), "req-1");
        assert_eq!(req.received_at.as_secs(), 1_700_000_000);
        assert_eq!(req.image(ImageRole::Selfie).rgb_at(0, 0), [2, 2, 2]);
    }

    #[test]
    fn random_ids_differ() {
        assert_ne!(RequestId::random(), RequestId::random());
    }
}
