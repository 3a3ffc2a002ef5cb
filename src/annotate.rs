use crate::backend::{AnnotatedComment, BackendError, RawComment};
use crate::data::SentimentService;

/// Sends the whole batch in one request. The backend is supposed to return
/// one annotation per comment in input order; the count is checked here, the
/// order is taken on trust.
pub fn annotate(
    service: &dyn SentimentService,
    comments: &[RawComment],
) -> Result<Vec<AnnotatedComment>, BackendError> {
    let annotated = service.predict(comments)?;
    if annotated.len() != comments.len() {
        return Err(BackendError::Misaligned {
            want: comments.len(),
            got: annotated.len(),
        });
    }
    Ok(annotated)
}
