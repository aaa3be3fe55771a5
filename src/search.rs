//! Background search over folder scopes.
//!
//! A `Search` gathers every entry under its scopes that matches the query predicate and
//! hands the complete result set to a callback, exactly once. The gather runs on rayon
//! (the global pool, or a caller-supplied one); scopes are walked in parallel and their
//! results concatenated in scope order.
//!
//! Once `stop()` has returned the callback will not begin. If it is already running on
//! another thread, `stop()` waits for it to finish.

use rayon::prelude::*;
use rayon::ThreadPool;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, ThreadId};
use tracing::{debug, info, warn};

use crate::enumerate::EnumerationOptions;
use crate::errors::{LocationError, Result};
use crate::location::{Folder, Item, Location};

type Predicate = Arc<dyn Fn(&Item) -> bool + Send + Sync>;
type Job = Box<dyn FnOnce() + Send + 'static>;

/// What to look for and where.
#[derive(Clone)]
pub struct SearchQuery {
    scopes: Vec<Folder>,
    options: EnumerationOptions,
    predicate: Predicate,
}

impl fmt::Debug for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchQuery")
            .field("scopes", &self.scopes)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl SearchQuery {
    /// Entries for which `predicate` holds. Walks recursively, hidden entries excluded.
    pub fn matching<P>(predicate: P) -> Self
    where
        P: Fn(&Item) -> bool + Send + Sync + 'static,
    {
        Self {
            scopes: Vec::new(),
            options: EnumerationOptions::recursive(),
            predicate: Arc::new(predicate),
        }
    }

    /// Entries whose name contains `needle`, ignoring case.
    pub fn name_contains(needle: &str) -> Self {
        let needle = needle.to_lowercase();
        Self::matching(move |item| item.name().to_lowercase().contains(&needle))
    }

    /// Files with the given extension (leading dot optional), ignoring case.
    pub fn extension(ext: &str) -> Self {
        let ext = ext.trim_start_matches('.').to_lowercase();
        Self::matching(move |item| {
            item.is_file()
                && item
                    .path()
                    .extension()
                    .is_some_and(|e| e.to_string_lossy().to_lowercase() == ext)
        })
    }

    /// Add a scope folder. With no scopes the search covers the home folder.
    pub fn in_folder(mut self, folder: Folder) -> Self {
        self.scopes.push(folder);
        self
    }

    pub fn in_folders(mut self, folders: impl IntoIterator<Item = Folder>) -> Self {
        self.scopes.extend(folders);
        self
    }

    pub fn with_options(mut self, options: EnumerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn scopes(&self) -> &[Folder] {
        &self.scopes
    }

    pub fn options(&self) -> EnumerationOptions {
        self.options
    }

    /// Apply the predicate to one entry.
    pub fn matches(&self, item: &Item) -> bool {
        (self.predicate)(item)
    }

    fn gather(&self, scopes: &[Folder], cancelled: &AtomicBool) -> Vec<Item> {
        let per_scope: Vec<Vec<Item>> = scopes
            .par_iter()
            .map(|scope| {
                let mut found = Vec::new();
                let walked = scope.enumerate(self.options, |item| {
                    if cancelled.load(Ordering::Relaxed) {
                        return ControlFlow::Break(());
                    }
                    if self.matches(&item) {
                        found.push(item);
                    }
                    ControlFlow::Continue(())
                });
                if let Err(e) = walked {
                    warn!(scope = %scope.path().display(), error = %e, "search scope skipped");
                }
                found
            })
            .collect();
        per_scope.into_iter().flatten().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Gathering,
    /// Callback running on the recorded thread.
    Delivering(ThreadId),
    Finished,
    Stopped,
}

#[derive(Debug)]
struct Shared {
    phase: Mutex<Phase>,
    delivered: Condvar,
    cancelled: AtomicBool,
}

impl Shared {
    fn phase(&self) -> MutexGuard<'_, Phase> {
        // Phase transitions are single assignments, so a poisoned lock still holds a valid value.
        self.phase.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A one-shot search. Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct Search {
    query: Arc<SearchQuery>,
    shared: Arc<Shared>,
}

impl Search {
    pub fn new(query: SearchQuery) -> Self {
        Self {
            query: Arc::new(query),
            shared: Arc::new(Shared {
                phase: Mutex::new(Phase::Idle),
                delivered: Condvar::new(),
                cancelled: AtomicBool::new(false),
            }),
        }
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    /// Gather on rayon's global pool and call `callback` with the results.
    pub fn start<F>(&self, callback: F) -> Result<()>
    where
        F: FnOnce(Vec<Item>) + Send + 'static,
    {
        let job = self.prepare(callback)?;
        rayon::spawn(job);
        Ok(())
    }

    /// Same as [`Search::start`] on a caller-supplied pool.
    pub fn start_on<F>(&self, pool: &ThreadPool, callback: F) -> Result<()>
    where
        F: FnOnce(Vec<Item>) + Send + 'static,
    {
        let job = self.prepare(callback)?;
        pool.spawn(job);
        Ok(())
    }

    /// Cancel. After this returns the callback will not begin.
    pub fn stop(&self) {
        let mut phase = self.shared.phase();
        self.shared.cancelled.store(true, Ordering::Relaxed);
        loop {
            let current = *phase;
            match current {
                Phase::Idle | Phase::Gathering => {
                    *phase = Phase::Stopped;
                    debug!("search stopped");
                    return;
                }
                // Stopping from inside the callback: it is already running, nothing to wait for.
                Phase::Delivering(tid) if tid == thread::current().id() => return,
                Phase::Delivering(_) => {
                    phase = self
                        .shared
                        .delivered
                        .wait(phase)
                        .unwrap_or_else(|e| e.into_inner());
                }
                Phase::Finished | Phase::Stopped => return,
            }
        }
    }

    /// Started and the callback has not yet returned.
    pub fn is_running(&self) -> bool {
        matches!(*self.shared.phase(), Phase::Gathering | Phase::Delivering(_))
    }

    /// The callback has run to completion.
    pub fn is_finished(&self) -> bool {
        *self.shared.phase() == Phase::Finished
    }

    pub fn is_stopped(&self) -> bool {
        *self.shared.phase() == Phase::Stopped
    }

    fn prepare<F>(&self, callback: F) -> Result<Job>
    where
        F: FnOnce(Vec<Item>) + Send + 'static,
    {
        let scopes = if self.query.scopes.is_empty() {
            vec![Folder::home()?]
        } else {
            self.query.scopes.clone()
        };
        {
            let mut phase = self.shared.phase();
            if *phase != Phase::Idle {
                return Err(LocationError::SearchAlreadyStarted);
            }
            *phase = Phase::Gathering;
        }
        debug!(scopes = scopes.len(), "search started");

        let query = Arc::clone(&self.query);
        let shared = Arc::clone(&self.shared);
        Ok(Box::new(move || {
            let results = query.gather(&scopes, &shared.cancelled);
            {
                let mut phase = shared.phase();
                if *phase != Phase::Gathering {
                    return;
                }
                *phase = Phase::Delivering(thread::current().id());
            }
            info!(results = results.len(), "search finished");
            callback(results);
            let mut phase = shared.phase();
            *phase = Phase::Finished;
            shared.delivered.notify_all();
        }))
    }
}
