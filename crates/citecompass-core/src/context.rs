//! Scoped citation contexts.
//!
//! A [`ContextStack`] holds named frames that each capture the citations used
//! while they are open. Frames nest strictly LIFO; closing anything but the
//! innermost frame is a [`CiteError::ContextMismatch`]. A frame's captured
//! entries live in the [`CitationContext`] handle, not in the stack, so they
//! stay readable after the frame is closed.
//!
//! Stacks are single-threaded (`!Send`). The process-wide API in
//! [`crate::global`] keeps one stack per thread.

use std::cell::RefCell;
use std::ops::Deref;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{error, trace};

use crate::entry::CitationEntry;
use crate::error::CiteError;

/// Handle to one context frame and the citations it captured.
///
/// Clones share the same frame.
#[derive(Debug, Clone)]
pub struct CitationContext {
    id: u64,
    name: String,
    used: Rc<RefCell<IndexMap<String, CitationEntry>>>,
}

impl CitationContext {
    /// The name the frame was opened with. Names need not be unique.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Formatted `identity: citation` strings for the citations used inside
    /// this frame, in order of first use.
    pub fn get_citations(&self) -> Vec<String> {
        self.used.borrow().values().map(ToString::to_string).collect()
    }

    /// Snapshot of the captured entries.
    pub fn entries(&self) -> Vec<CitationEntry> {
        self.used.borrow().values().cloned().collect()
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.used.borrow().contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.used.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.borrow().is_empty()
    }

    /// Print the captured citations to stdout.
    pub fn print_citations(&self) {
        println!("Citations used in context {:?}:", self.name);
        for line in self.get_citations() {
            println!("  {line}");
        }
    }

    fn record(&self, entry: &CitationEntry) {
        self.used
            .borrow_mut()
            .entry(entry.identity.clone())
            .or_insert_with(|| entry.clone());
    }
}

#[derive(Debug, Default)]
struct StackInner {
    frames: Vec<CitationContext>,
    next_id: u64,
}

/// A LIFO stack of open citation contexts.
///
/// Cheap to clone; clones refer to the same stack.
#[derive(Debug, Clone, Default)]
pub struct ContextStack {
    inner: Rc<RefCell<StackInner>>,
}

impl ContextStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new, empty frame.
    pub fn open(&self, name: impl Into<String>) -> CitationContext {
        let mut inner = self.inner.borrow_mut();
        let context = CitationContext {
            id: inner.next_id,
            name: name.into(),
            used: Rc::default(),
        };
        inner.next_id += 1;
        inner.frames.push(context.clone());
        trace!(name = %context.name, depth = inner.frames.len(), "opened citation context");
        context
    }

    /// Pop `context`, which must be the innermost open frame.
    pub fn close(&self, context: &CitationContext) -> Result<(), CiteError> {
        let mut inner = self.inner.borrow_mut();
        if inner.frames.last().map(|top| top.id) != Some(context.id) {
            return Err(CiteError::ContextMismatch {
                expected: inner.frames.last().map(|top| top.name.clone()),
                found: context.name.clone(),
            });
        }
        inner.frames.pop();
        trace!(name = %context.name, depth = inner.frames.len(), "closed citation context");
        Ok(())
    }

    /// Open a frame that is closed again when the returned guard drops.
    pub fn scope(&self, name: impl Into<String>) -> ContextGuard {
        ContextGuard {
            context: self.open(name),
            stack: self.clone(),
            closed: false,
        }
    }

    /// Run `f` inside a new frame. The frame is closed on every exit path,
    /// including panics.
    pub fn with_context<R>(
        &self,
        name: impl Into<String>,
        f: impl FnOnce(&CitationContext) -> R,
    ) -> R {
        let guard = self.scope(name);
        f(&guard)
    }

    /// Record `entry` in every open frame.
    pub fn broadcast(&self, entry: &CitationEntry) {
        for frame in &self.inner.borrow().frames {
            frame.record(entry);
        }
    }

    /// Number of open frames.
    pub fn depth(&self) -> usize {
        self.inner.borrow().frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depth() == 0
    }

    /// Remove `context` wherever it sits in the stack. Returns whether it
    /// was still open.
    fn discard(&self, context: &CitationContext) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.frames.len();
        inner.frames.retain(|f| f.id != context.id);
        inner.frames.len() != before
    }
}

/// Closes its frame when dropped.
///
/// Dereferences to the [`CitationContext`] it guards.
#[derive(Debug)]
pub struct ContextGuard {
    context: CitationContext,
    stack: ContextStack,
    closed: bool,
}

impl ContextGuard {
    /// The guarded frame. Clone it to keep reading after the guard is gone.
    pub fn context(&self) -> &CitationContext {
        &self.context
    }

    /// Close the frame now, surfacing a mismatch instead of logging it.
    ///
    /// The frame is removed from the stack either way.
    pub fn close(mut self) -> Result<CitationContext, CiteError> {
        self.closed = true;
        match self.stack.close(&self.context) {
            Ok(()) => Ok(self.context.clone()),
            Err(err) => {
                self.stack.discard(&self.context);
                Err(err)
            }
        }
    }
}

impl Deref for ContextGuard {
    type Target = CitationContext;

    fn deref(&self) -> &CitationContext {
        &self.context
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(err) = self.stack.close(&self.context) {
            error!(%err, "citation context closed out of order");
            self.stack.discard(&self.context);
        }
    }
}
