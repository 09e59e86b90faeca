// src/scrape/mod.rs
// Batch fetching and the scrape flow: resolve property URLs, fan the
// fetches out over a small worker pool, sanitize each fetched fragment,
// persist the canonical record. One item's failure never aborts the batch.

use std::{
    error::Error,
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc, Arc,
    },
    thread,
    time::Duration,
};

use crate::config::consts::{JITTER_MS, REQUEST_PAUSE_MS, WORKERS};
use crate::config::options::PropSelector;
use crate::core::{net, policy::AllowPolicy, sanitize};
use crate::progress::Progress;
use crate::{props, store};

/// One batch item: a property name plus the summary URL to fetch.
#[derive(Clone, Debug)]
pub struct FetchItem {
    pub name: String,
    pub url: String,
}

/// Body or error message, joined back in input order.
pub type FetchOutcome = (FetchItem, Result<String, String>);

/// Fan fetches out over a worker pool; collect per-item results.
pub fn fetch_many(
    items: Vec<FetchItem>,
    mut progress: Option<&mut dyn Progress>,
) -> Vec<FetchOutcome> {
    if items.is_empty() {
        return Vec::new();
    }
    if let Some(p) = progress.as_deref_mut() {
        p.begin(items.len());
    }

    let items_arc = Arc::new(items);
    let counter = Arc::new(AtomicUsize::new(0));
    let (res_tx, res_rx) = mpsc::channel::<(usize, Result<String, String>)>();

    let workers = WORKERS.min(items_arc.len()).max(1);

    for _ in 0..workers {
        let items = Arc::clone(&items_arc);
        let idx = Arc::clone(&counter);
        let tx = res_tx.clone();

        thread::spawn(move || loop {
            let i = idx.fetch_add(1, Ordering::Relaxed);
            if i >= items.len() {
                break;
            }
            let result = net::http_get_url(&items[i].url).map_err(|e| e.to_string());
            let _ = tx.send((i, result));
            let jitter = (i as u64) % JITTER_MS.max(1);
            thread::sleep(Duration::from_millis(REQUEST_PAUSE_MS + jitter)); // be polite
        });
    }
    drop(res_tx); // main thread is sole receiver now

    let mut slots: Vec<Option<Result<String, String>>> = vec![None; items_arc.len()];
    for _ in 0..items_arc.len() {
        match res_rx.recv() {
            Ok((i, result)) => {
                let name = &items_arc[i].name;
                match (&result, progress.as_deref_mut()) {
                    (Ok(_), Some(p)) => p.item_done(name),
                    (Err(msg), p) => {
                        if let Some(p) = p {
                            p.item_failed(name);
                        }
                        loge!("{name}: {msg}");
                    }
                    _ => {}
                }
                slots[i] = Some(result);
            }
            Err(_) => break, // workers ended early; bail gracefully
        }
    }
    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }

    items_arc
        .iter()
        .cloned()
        .zip(slots)
        .map(|(item, slot)| (item, slot.unwrap_or_else(|| Err(s!("fetch worker terminated")))))
        .collect()
}

/// Summary of a scrape run.
pub struct ScrapeSummary {
    pub written: Vec<PathBuf>,
    pub failed: Vec<String>,
    pub skipped: Vec<String>,
}

/// Resolve the selection to fetch items. `All` warns and skips properties
/// without a wiki URL; an explicitly named property without one is an error.
fn resolve_items(
    selector: &PropSelector,
    progress: &mut Option<&mut dyn Progress>,
) -> Result<(Vec<FetchItem>, Vec<String>), Box<dyn Error>> {
    let mut items = Vec::new();
    let mut skipped = Vec::new();

    match selector {
        PropSelector::All => {
            for meta in props::all() {
                match meta.wiki_url {
                    Some(url) => items.push(FetchItem {
                        name: s!(meta.name),
                        url: props::summary_url(url),
                    }),
                    None => {
                        if let Some(p) = progress.as_deref_mut() {
                            p.log(&format!("WARNING: {} has no wiki URL. Skipping.", meta.name));
                        }
                        skipped.push(s!(meta.name));
                    }
                }
            }
        }
        PropSelector::Named(names) => {
            for name in names {
                let url = props::wiki_url(name)?;
                items.push(FetchItem {
                    name: name.clone(),
                    url: props::summary_url(url),
                });
            }
        }
    }
    Ok((items, skipped))
}

/// Fetch, sanitize and persist the selected properties.
pub fn scrape_properties(
    selector: &PropSelector,
    policy: &AllowPolicy,
    mut progress: Option<&mut dyn Progress>,
) -> Result<ScrapeSummary, Box<dyn Error>> {
    let (items, skipped) = resolve_items(selector, &mut progress)?;
    let outcomes = fetch_many(items, progress);

    let mut written = Vec::new();
    let mut failed = Vec::new();

    for (item, result) in outcomes {
        match result {
            Ok(body) => {
                let html = sanitize::sanitize_description(&body, &item.url, policy);
                match store::write_description(&item.name, &html) {
                    Ok(path) => written.push(path),
                    Err(e) => {
                        loge!("{}: {e}", item.name);
                        failed.push(item.name);
                    }
                }
            }
            Err(_) => failed.push(item.name), // already logged during fetch
        }
    }

    logf!(
        "Scrape: wrote {}, failed {}, skipped {}",
        written.len(),
        failed.len(),
        skipped.len()
    );
    Ok(ScrapeSummary { written, failed, skipped })
}
