use crate::backend::AnnotatedComment;
use crate::filter::{self, Filter, Selection};

/// Everything one analysis run keeps around for follow-up filter toggles.
/// Toggles re-derive the display subset from the stored annotations; nothing
/// is re-fetched.
pub struct Session {
    comments: Vec<AnnotatedComment>,
    filter: Filter,
}

impl Session {
    pub fn new(comments: Vec<AnnotatedComment>) -> Self {
        Self {
            comments,
            filter: Filter::default(),
        }
    }

    pub fn toggle(&mut self, requested: Filter) -> Selection {
        let (next, selection) = filter::apply_filter(self.filter, requested, &self.comments);
        self.filter = next;
        selection
    }

    pub fn active_filter(&self) -> Filter {
        self.filter
    }

    pub fn comments(&self) -> &[AnnotatedComment] {
        &self.comments
    }
}
