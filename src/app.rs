use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use crate::backend::{self, BackendError, Sentiment};
use crate::charts::{self, ChartInputs, ChartKind};
use crate::cli::Cli;
use crate::collector;
use crate::config::{self, Config, LoadOptions};
use crate::data::{
    BackendChartService, BackendCommentSource, BackendSentimentService, BackendThemeService,
    ChartService, CommentSource, SentimentService, ThemeService,
};
use crate::filter::Filter;
use crate::metrics;
use crate::report;
use crate::session::Session;
use crate::video::VideoId;

pub struct Services<'a> {
    pub comments: &'a dyn CommentSource,
    pub sentiment: &'a dyn SentimentService,
    pub themes: &'a dyn ThemeService,
    pub charts: &'a dyn ChartService,
}

pub fn run(cli: Cli) -> Result<()> {
    let mut cfg = config::load(LoadOptions {
        config_file: cli.config.clone(),
        env_prefix: None,
    })
    .context("load config")?;
    if let Some(base_url) = cli.backend {
        cfg.backend.base_url = base_url;
    }
    if let Some(max_comments) = cli.max_comments {
        cfg.fetch.max_comments = max_comments;
    }
    if let Some(out_dir) = cli.out_dir {
        cfg.output.chart_dir = Some(out_dir);
    }

    // The URL gate runs before any network call.
    let video_id = VideoId::from_watch_url(&cli.url)?;

    let client = Arc::new(
        backend::Client::new(backend::ClientConfig {
            base_url: Some(cfg.backend.base_url.clone()),
            user_agent: cfg.backend.user_agent.clone(),
            request_timeout: cfg.backend.request_timeout,
            http_client: None,
        })
        .context("build backend client")?,
    );
    info!(backend = client.base_url(), video_id = %video_id, "starting analysis");

    let comment_source = BackendCommentSource::new(Arc::clone(&client));
    let sentiment_service = BackendSentimentService::new(Arc::clone(&client));
    let theme_service = BackendThemeService::new(Arc::clone(&client));
    let chart_service = BackendChartService::new(Arc::clone(&client));
    let services = Services {
        comments: &comment_source,
        sentiment: &sentiment_service,
        themes: &theme_service,
        charts: &chart_service,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let session = analyze(&mut out, &video_id, &cfg, &services)?;
    drop(out);

    if let Some(mut session) = session {
        toggle_loop(&mut session)?;
    }

    Ok(())
}

/// Runs the analysis pipeline once: collect, annotate, aggregate, themes,
/// charts, initial comment view. Returns the session backing further filter
/// toggles, or `None` when the run ended in a terminal state.
pub fn analyze(
    out: &mut impl Write,
    video_id: &VideoId,
    cfg: &Config,
    services: &Services<'_>,
) -> Result<Option<Session>> {
    let started = Instant::now();
    let progress = spinner("Fetching comments (this may take a moment for popular videos)...");

    let collected = collector::collect(
        services.comments,
        video_id.as_str(),
        cfg.fetch.max_comments,
        |so_far, page| {
            debug!(comments = so_far, page, "requesting comment page");
            progress.set_message(format!(
                "Fetching comments: {so_far} so far (Page {page})..."
            ));
        },
    );

    let raw = match collected {
        Ok(raw) => raw,
        Err(err) => {
            progress.finish_and_clear();
            warn!(error = %err, "comment collection failed");
            report::render_header(out, video_id.as_str())?;
            report::render_line(
                out,
                "Error fetching comments. Check backend server connection and YouTube API quota.",
            )?;
            report::render_no_comments(out)?;
            return Ok(None);
        }
    };

    progress.set_message(format!(
        "Fetched {} comments. Analyzing sentiment...",
        raw.len()
    ));

    if raw.is_empty() {
        progress.finish_and_clear();
        info!("no comments collected");
        report::render_header(out, video_id.as_str())?;
        report::render_no_comments(out)?;
        return Ok(None);
    }
    info!(comments = raw.len(), "collection complete");

    progress.set_message(format!(
        "Analyzing {} comments. This can take a while...",
        raw.len()
    ));
    let annotated = match crate::annotate::annotate(services.sentiment, &raw) {
        Ok(annotated) => annotated,
        Err(err) => {
            progress.finish_and_clear();
            warn!(error = %err, "sentiment annotation failed");
            report::render_line(
                out,
                "Error fetching sentiment predictions. Check Flask API server connection.",
            )?;
            report::render_line(out, "Could not analyze sentiment. Check server connection.")?;
            return Ok(None);
        }
    };
    info!(annotations = annotated.len(), "annotation complete");

    let summary = metrics::aggregate(&raw, &annotated);
    report::render_header(out, video_id.as_str())?;
    report::render_summary(out, &summary)?;

    let texts: Vec<String> = raw.iter().map(|comment| comment.text.clone()).collect();

    progress.set_message("Extracting key themes...");
    match services.themes.extract_topics(&texts) {
        Ok(topics) => report::render_themes(out, &topics)?,
        // The backend answering with a failure status drops the section; only
        // an unreachable or garbled backend earns the error line.
        Err(err @ (BackendError::Api(_) | BackendError::Status { .. })) => {
            warn!(error = %err, "theme extraction skipped");
        }
        Err(err) => {
            warn!(error = %err, "theme extraction failed");
            report::render_line(out, "Error fetching key themes.")?;
        }
    }

    progress.set_message("Rendering charts...");
    let chart_dir = cfg
        .output
        .chart_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let points = metrics::trend_points(&annotated);
    let inputs = ChartInputs {
        counts: &summary.sentiment_counts,
        points: &points,
        texts: &texts,
    };
    for kind in ChartKind::ALL {
        report::render_section_title(out, kind.section_title())?;
        if kind == ChartKind::Distribution {
            report::render_distribution_note(out, summary.total_comments)?;
        }
        let saved = charts::fetch(services.charts, kind, &inputs)
            .map_err(charts::ChartError::from)
            .and_then(|bytes| charts::save(kind, video_id.as_str(), &bytes, &chart_dir));
        match saved {
            Ok(saved) => {
                info!(chart = kind.slug(), path = %saved.path.display(), "chart saved");
                report::render_saved_chart(out, &saved)?;
            }
            Err(err) => {
                warn!(error = %err, chart = kind.slug(), "chart failed");
                report::render_line(out, kind.error_message())?;
            }
        }
    }

    progress.finish_and_clear();

    report::render_section_title(out, "View Comments by Sentiment")?;
    let mut session = Session::new(annotated);
    let selection = session.toggle(Filter::All);
    report::render_filter_bar(out, session.active_filter())?;
    report::render_selection(out, &selection)?;

    info!(
        comments = summary.total_comments,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "all tasks completed"
    );
    Ok(Some(session))
}

enum ToggleCommand {
    Apply(Filter),
    Quit,
}

fn parse_toggle(input: &str) -> Option<ToggleCommand> {
    let normalized = input.trim().to_ascii_lowercase();
    let command = match normalized.as_str() {
        "positive" | "p" | "1" => ToggleCommand::Apply(Filter::Class(Sentiment::Positive)),
        "neutral" | "0" => ToggleCommand::Apply(Filter::Class(Sentiment::Neutral)),
        "negative" | "-1" => ToggleCommand::Apply(Filter::Class(Sentiment::Negative)),
        "all" | "a" => ToggleCommand::Apply(Filter::All),
        "quit" | "q" | "exit" => ToggleCommand::Quit,
        _ => return None,
    };
    Some(command)
}

/// Reads toggle commands from stdin until quit or EOF, re-rendering the
/// comment view from the session on each one.
fn toggle_loop(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();

    loop {
        eprint!("filter [positive/neutral/negative/all, q to quit]> ");
        io::stderr().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        match parse_toggle(&line) {
            Some(ToggleCommand::Apply(requested)) => {
                let selection = session.toggle(requested);
                let mut out = stdout.lock();
                report::render_filter_bar(&mut out, session.active_filter())?;
                report::render_selection(&mut out, &selection)?;
            }
            Some(ToggleCommand::Quit) => return Ok(()),
            None => {
                if !line.trim().is_empty() {
                    eprintln!("unknown filter: {}", line.trim());
                }
            }
        }
    }
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.enable_steady_tick(Duration::from_millis(120));
    bar.set_message(message.to_string());
    bar
}
