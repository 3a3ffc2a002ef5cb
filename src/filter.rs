use rand::seq::SliceRandom;

use crate::backend::{AnnotatedComment, Sentiment};

pub const ALL_DISPLAY_LIMIT: usize = 30;
pub const CLASS_SAMPLE_LIMIT: usize = 15;
pub const EMPTY_FILTER_PLACEHOLDER: &str = "No comments found in this category.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Class(Sentiment),
}

impl Filter {
    /// Requesting the class that is already active deselects it.
    pub fn toggled(self, requested: Filter) -> Filter {
        if requested == self {
            Filter::All
        } else {
            requested
        }
    }

    pub fn is_active(self, class: Sentiment) -> bool {
        self == Filter::Class(class)
    }
}

#[derive(Debug, Clone)]
pub struct Selection {
    pub title: String,
    pub items: Vec<AnnotatedComment>,
}

/// Resolves a toggle request against the current filter and derives the
/// display subset from the full annotated set. Pure: the caller owns the
/// returned state.
///
/// Under `All` the first 30 comments are shown in collection order. Under a
/// class, every comment of that class is a candidate; past 15 candidates a
/// uniform sample of exactly 15 is drawn without replacement. The title
/// reports the candidate count before trimming.
pub fn apply_filter(
    current: Filter,
    requested: Filter,
    comments: &[AnnotatedComment],
) -> (Filter, Selection) {
    let next = current.toggled(requested);
    let selection = match next {
        Filter::All => Selection {
            title: "Showing Top 30 Overall Comments".to_string(),
            items: comments.iter().take(ALL_DISPLAY_LIMIT).cloned().collect(),
        },
        Filter::Class(class) => {
            let candidates: Vec<AnnotatedComment> = comments
                .iter()
                .filter(|item| item.sentiment == class)
                .cloned()
                .collect();
            let total = candidates.len();
            let items = if total > CLASS_SAMPLE_LIMIT {
                candidates
                    .choose_multiple(&mut rand::thread_rng(), CLASS_SAMPLE_LIMIT)
                    .cloned()
                    .collect()
            } else {
                candidates
            };
            Selection {
                title: format!(
                    "Showing {CLASS_SAMPLE_LIMIT} Random {} Comments ({total} total)",
                    class.display_name()
                ),
                items,
            }
        }
    };
    (next, selection)
}
