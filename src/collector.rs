use crate::backend::{BackendError, RawComment};
use crate::data::CommentSource;

pub const MAX_COMMENTS_TO_FETCH: usize = 5000;

/// Walks the comment pages for a video until the backend stops handing out
/// continuation tokens or the cap is reached. `on_progress` runs before each
/// request with the count collected so far and the 1-based page number.
///
/// Any page failure discards the partial batch; a run either yields the full
/// collected set or an error.
pub fn collect(
    source: &dyn CommentSource,
    video_id: &str,
    max_comments: usize,
    mut on_progress: impl FnMut(usize, usize),
) -> Result<Vec<RawComment>, BackendError> {
    let mut comments: Vec<RawComment> = Vec::new();
    let mut page_token = String::new();
    let mut page_count = 0usize;

    while comments.len() < max_comments {
        page_count += 1;
        on_progress(comments.len(), page_count);

        let page = source.fetch_page(video_id, &page_token)?;
        comments.extend(page.comments);

        if comments.len() >= max_comments {
            comments.truncate(max_comments);
            break;
        }

        // A missing or empty token both mean the backend is done.
        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = token,
            _ => break,
        }
    }

    Ok(comments)
}
