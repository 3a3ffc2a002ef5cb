use std::io;

use crate::backend::{Sentiment, Topic};
use crate::charts::SavedChart;
use crate::filter::{Filter, Selection, EMPTY_FILTER_PLACEHOLDER};
use crate::metrics::MetricsSummary;

const WRAP_WIDTH: usize = 80;

pub fn render_section_title(w: &mut impl io::Write, title: &str) -> io::Result<()> {
    writeln!(w)?;
    writeln!(w, "{title}")?;
    writeln!(w, "{}", "-".repeat(title.len()))
}

pub fn render_header(w: &mut impl io::Write, video_id: &str) -> io::Result<()> {
    render_section_title(w, "YouTube Video ID")?;
    writeln!(w, "{video_id}")
}

pub fn render_line(w: &mut impl io::Write, message: &str) -> io::Result<()> {
    writeln!(w, "{message}")
}

pub fn render_no_comments(w: &mut impl io::Write) -> io::Result<()> {
    writeln!(w, "No comments found for this video.")
}

pub fn render_summary(w: &mut impl io::Write, summary: &MetricsSummary) -> io::Result<()> {
    render_section_title(w, "Comment Analysis Summary")?;
    writeln!(w, "  Total Comments: {}", summary.total_comments)?;
    writeln!(w, "  Unique Commenters: {}", summary.unique_commenters)?;
    writeln!(w, "  Avg Comment Length: {:.2} words", summary.avg_word_length)?;
    writeln!(
        w,
        "  Avg Sentiment Score: {:.2}/10",
        summary.normalized_sentiment_score
    )
}

pub fn render_themes(w: &mut impl io::Write, topics: &[Topic]) -> io::Result<()> {
    render_section_title(w, "Key Themes & Top Keywords")?;
    if topics.is_empty() {
        return writeln!(w, "No significant themes found.");
    }
    for topic in topics {
        writeln!(w, "  {} ({})", topic.theme, topic.count)?;
    }
    Ok(())
}

pub fn render_distribution_note(w: &mut impl io::Write, total_comments: usize) -> io::Result<()> {
    writeln!(
        w,
        "Sentiment distribution based on {total_comments} comments."
    )
}

pub fn render_saved_chart(w: &mut impl io::Write, saved: &SavedChart) -> io::Result<()> {
    writeln!(
        w,
        "Saved {}x{} image to {}",
        saved.width,
        saved.height,
        saved.path.display()
    )
}

pub fn render_filter_bar(w: &mut impl io::Write, active: Filter) -> io::Result<()> {
    let buttons: Vec<String> = Sentiment::ALL
        .iter()
        .map(|&class| {
            if active.is_active(class) {
                format!("[*{}*]", class.display_name())
            } else {
                format!("[ {} ]", class.display_name())
            }
        })
        .collect();
    writeln!(w, "{}", buttons.join(" "))
}

pub fn render_selection(w: &mut impl io::Write, selection: &Selection) -> io::Result<()> {
    writeln!(w)?;
    writeln!(w, "{}", selection.title)?;
    if selection.items.is_empty() {
        return writeln!(w, "{EMPTY_FILTER_PLACEHOLDER}");
    }
    for (index, item) in selection.items.iter().enumerate() {
        let prefix = format!("{}. ", index + 1);
        let hang = " ".repeat(prefix.len());
        let options = textwrap::Options::new(WRAP_WIDTH)
            .initial_indent(&prefix)
            .subsequent_indent(&hang);
        writeln!(w, "{}", textwrap::fill(&item.comment, options))?;
        writeln!(w, "{hang}Sentiment: {}", item.sentiment.as_str())?;
    }
    Ok(())
}
