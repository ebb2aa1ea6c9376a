//! Binary attachments (product images) and the transient upload state that
//! goes with an open form.

use stockroom_core::Validator;

/// Largest image accepted client-side (2 MiB).
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

const IMAGE_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/webp", "image/gif"];

/// A file picked by the user, held in memory until submit.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl core::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Attachment {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_image(&self) -> bool {
        let ct = self.content_type.to_ascii_lowercase();
        IMAGE_TYPES.contains(&ct.as_str())
    }

    /// Record size/type problems on `field`.
    pub fn validate_image(&self, v: &mut Validator, field: &str) {
        v.check(!self.is_empty(), field, "file is empty");
        v.check(
            self.len() <= MAX_IMAGE_BYTES,
            field,
            "image must be 2MB or smaller",
        );
        v.check(self.is_image(), field, "must be a PNG, JPEG, WebP or GIF image");
    }
}

/// Upload/preview state attached to an open create or edit dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadState {
    pending: Option<Attachment>,
}

impl UploadState {
    pub fn select(&mut self, attachment: Attachment) {
        self.pending = Some(attachment);
    }

    pub fn pending(&self) -> Option<&Attachment> {
        self.pending.as_ref()
    }

    pub fn take(&mut self) -> Option<Attachment> {
        self.pending.take()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }

    pub fn has_preview(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(len: usize) -> Attachment {
        Attachment::new("photo.png", "image/png", vec![0u8; len])
    }

    #[test]
    fn accepts_small_png() {
        let mut v = Validator::new();
        image(1024).validate_image(&mut v, "image");
        assert!(!v.has_errors());
    }

    #[test]
    fn rejects_two_and_a_half_megabytes() {
        let mut v = Validator::new();
        image(2_500_000).validate_image(&mut v, "image");
        let errors = v.finish(()).unwrap_err();
        assert_eq!(
            errors.for_field("image").collect::<Vec<_>>(),
            vec!["image must be 2MB or smaller"]
        );
    }

    #[test]
    fn rejects_non_images() {
        let mut v = Validator::new();
        Attachment::new("notes.pdf", "application/pdf", vec![1]).validate_image(&mut v, "image");
        assert!(v.has_errors());
    }

    #[test]
    fn debug_omits_bytes() {
        let rendered = format!("{:?}", image(3));
        assert!(rendered.contains("len: 3"));
    }
}
