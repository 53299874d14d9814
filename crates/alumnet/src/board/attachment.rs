use mime::Mime;

/// Error raised when an uploaded reference carries an unusable content type.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("unrecognized content type '{0}'")]
    Unparseable(String),
    #[error("expected an image, got '{0}'")]
    NotAnImage(String),
    #[error("expected a document, got '{0}'")]
    NotADocument(String),
}

/// Parse and require an `image/*` content type (profile pictures).
pub fn image_content_type(raw: &str) -> Result<Mime, AttachmentError> {
    let mime = parse(raw)?;
    if mime.type_() != mime::IMAGE {
        return Err(AttachmentError::NotAnImage(raw.to_string()));
    }
    Ok(mime)
}

/// Parse and require a document content type (CV uploads). PDFs and
/// word-processor exports arrive as `application/*`; plain text is accepted
/// for pasted resumes.
pub fn document_content_type(raw: &str) -> Result<Mime, AttachmentError> {
    let mime = parse(raw)?;
    if mime.type_() != mime::APPLICATION && mime.type_() != mime::TEXT {
        return Err(AttachmentError::NotADocument(raw.to_string()));
    }
    Ok(mime)
}

fn parse(raw: &str) -> Result<Mime, AttachmentError> {
    raw.parse::<Mime>()
        .map_err(|_| AttachmentError::Unparseable(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_picture_and_cv_types() {
        assert!(image_content_type("image/png").is_ok());
        assert!(image_content_type("image/jpeg").is_ok());
        assert!(document_content_type("application/pdf").is_ok());
        assert!(document_content_type("text/plain").is_ok());
    }

    #[test]
    fn rejects_mismatched_types() {
        assert_eq!(
            image_content_type("application/pdf"),
            Err(AttachmentError::NotAnImage("application/pdf".to_string()))
        );
        assert_eq!(
            document_content_type("image/png"),
            Err(AttachmentError::NotADocument("image/png".to_string()))
        );
        assert!(matches!(
            image_content_type("not a mime"),
            Err(AttachmentError::Unparseable(_))
        ));
    }
}
