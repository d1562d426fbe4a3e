//! Parallel rendering of many articles.
//!
//! Input is a JSON array of [`LayoutInput`]. Items are rendered in parallel
//! using [rayon](https://docs.rs/rayon) with one shared [`Thumbnailer`], so
//! fonts are parsed once for the whole run.
//!
//! A failing item is reported and skipped; it never aborts the batch.
//! Progress is streamed over an optional channel as [`BatchEvent`]s so the
//! CLI can print while workers are still running.

use crate::render::Thumbnailer;
use crate::types::{LayoutInput, RenderedThumbnail};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Progress for one item. `index` is the position in the input file.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchEvent {
    Rendered {
        index: usize,
        title: String,
        thumbnail: RenderedThumbnail,
    },
    Failed {
        index: usize,
        title: String,
        error: String,
    },
}

/// Outcome of a whole batch, in input order.
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub rendered: Vec<(usize, RenderedThumbnail)>,
    pub failed: Vec<(usize, String)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.rendered.len() + self.failed.len()
    }
}

/// Read a JSON array of inputs.
pub fn load_inputs(path: &Path) -> Result<Vec<LayoutInput>, BatchError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn render_batch(
    thumbnailer: &Thumbnailer,
    inputs: &[LayoutInput],
    events: Option<Sender<BatchEvent>>,
) -> BatchReport {
    log::info!("rendering {} thumbnail(s)", inputs.len());

    let results: Vec<_> = inputs
        .par_iter()
        .enumerate()
        .map(|(index, input)| {
            let result = thumbnailer.render(input).map_err(|e| e.to_string());
            let event = match &result {
                Ok(thumbnail) => BatchEvent::Rendered {
                    index,
                    title: input.title.clone(),
                    thumbnail: thumbnail.clone(),
                },
                Err(error) => {
                    log::warn!("item {index} ({:?}) failed: {error}", input.title);
                    BatchEvent::Failed {
                        index,
                        title: input.title.clone(),
                        error: error.clone(),
                    }
                }
            };
            if let Some(tx) = &events {
                // receiver gone means nobody is printing; keep rendering
                let _ = tx.send(event);
            }
            (index, result)
        })
        .collect();

    let mut report = BatchReport::default();
    for (index, result) in results {
        match result {
            Ok(thumbnail) => report.rendered.push((index, thumbnail)),
            Err(error) => report.failed.push((index, error)),
        }
    }
    report
}
