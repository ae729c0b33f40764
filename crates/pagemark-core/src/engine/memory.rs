//! In-memory raster engine.
//!
//! Documents are lists of page sizes. Render tasks settle only when told to
//! through the shared [`RenderLog`] (or immediately in auto-complete mode).

use super::{
    EngineError, EngineResult, RasterDocument, RasterEngine, RasterPage, RasterTask, RenderOutcome,
};
use crate::surface::{PageViewport, SurfaceSize};
use crate::transform::Rotation;
use kurbo::Size;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A simulated page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryPage {
    /// Unrotated size in document units.
    pub size: Size,
    pub rotation: Rotation,
    /// Loading this page fails.
    pub broken: bool,
}

impl MemoryPage {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            rotation: Rotation::Deg0,
            broken: false,
        }
    }

    /// US Letter, portrait.
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    pub fn rotated(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }
}

/// One call to [`RasterPage::render`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRecord {
    pub page: u32,
    pub viewport: PageViewport,
    pub target: SurfaceSize,
    pub cancel_requested: bool,
    /// `None` while the task is still running.
    pub outcome: Option<RenderOutcome>,
    reported: bool,
}

/// Shared log of every render task started by a [`MemoryEngine`].
#[derive(Debug, Clone, Default)]
pub struct RenderLog {
    records: Rc<RefCell<Vec<RenderRecord>>>,
}

impl RenderLog {
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    pub fn records(&self) -> Vec<RenderRecord> {
        self.records.borrow().clone()
    }

    /// Pages in the order their tasks were started.
    pub fn pages(&self) -> Vec<u32> {
        self.records.borrow().iter().map(|r| r.page).collect()
    }

    /// Number of tasks that were asked to cancel.
    pub fn cancel_count(&self) -> usize {
        self.records.borrow().iter().filter(|r| r.cancel_requested).count()
    }

    /// Finish task `index` successfully. Returns false if it had already
    /// settled.
    pub fn complete(&self, index: usize) -> bool {
        self.settle(index, RenderOutcome::Success)
    }

    /// Fail task `index`.
    pub fn fail(&self, index: usize, reason: impl Into<String>) -> bool {
        self.settle(index, RenderOutcome::Failed(reason.into()))
    }

    /// Finish the most recently started task.
    pub fn complete_latest(&self) -> bool {
        match self.len() {
            0 => false,
            n => self.complete(n - 1),
        }
    }

    fn settle(&self, index: usize, outcome: RenderOutcome) -> bool {
        let mut records = self.records.borrow_mut();
        match records.get_mut(index) {
            Some(record) if record.outcome.is_none() => {
                record.outcome = Some(outcome);
                true
            }
            _ => false,
        }
    }

    fn push(&self, record: RenderRecord) -> usize {
        let mut records = self.records.borrow_mut();
        records.push(record);
        records.len() - 1
    }
}

/// Raster engine backed by in-memory page lists.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    documents: HashMap<String, Vec<MemoryPage>>,
    log: RenderLog,
    auto_complete: bool,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document under `url`.
    pub fn with_document(mut self, url: impl Into<String>, pages: Vec<MemoryPage>) -> Self {
        self.documents.insert(url.into(), pages);
        self
    }

    /// Settle every task successfully as soon as it is polled.
    pub fn auto_complete(mut self, enabled: bool) -> Self {
        self.auto_complete = enabled;
        self
    }

    /// Handle to the log of started tasks.
    pub fn render_log(&self) -> RenderLog {
        self.log.clone()
    }
}

impl RasterEngine for MemoryEngine {
    fn open(&mut self, url: &str) -> EngineResult<Box<dyn RasterDocument>> {
        let pages = self.documents.get(url).cloned().ok_or_else(|| EngineError::Open {
            url: url.to_string(),
            reason: "no such document".to_string(),
        })?;
        log::debug!("Opened {url} ({} pages)", pages.len());
        Ok(Box::new(MemoryDocument {
            pages,
            log: self.log.clone(),
            auto_complete: self.auto_complete,
        }))
    }
}

struct MemoryDocument {
    pages: Vec<MemoryPage>,
    log: RenderLog,
    auto_complete: bool,
}

impl RasterDocument for MemoryDocument {
    fn page_count(&self) -> u32 {
        u32::try_from(self.pages.len()).unwrap_or(u32::MAX)
    }

    fn page(&mut self, page: u32) -> EngineResult<Box<dyn RasterPage>> {
        let template = page
            .checked_sub(1)
            .and_then(|index| self.pages.get(index as usize))
            .copied()
            .ok_or(EngineError::PageOutOfRange {
                page,
                page_count: self.page_count(),
            })?;
        if template.broken {
            return Err(EngineError::PageLoad {
                page,
                reason: "corrupt page stream".to_string(),
            });
        }
        Ok(Box::new(MemoryPageHandle {
            number: page,
            template,
            log: self.log.clone(),
            auto_complete: self.auto_complete,
        }))
    }
}

struct MemoryPageHandle {
    number: u32,
    template: MemoryPage,
    log: RenderLog,
    auto_complete: bool,
}

impl RasterPage for MemoryPageHandle {
    fn rotation(&self) -> Rotation {
        self.template.rotation
    }

    fn viewport(&self, scale: f64, rotation: Rotation) -> PageViewport {
        let Size { width, height } = self.template.size * scale;
        if rotation.swaps_axes() {
            PageViewport::new(height, width)
        } else {
            PageViewport::new(width, height)
        }
    }

    fn render(&mut self, viewport: PageViewport, target: SurfaceSize) -> Box<dyn RasterTask> {
        let index = self.log.push(RenderRecord {
            page: self.number,
            viewport,
            target,
            cancel_requested: false,
            outcome: None,
            reported: false,
        });
        Box::new(MemoryTask {
            index,
            log: self.log.clone(),
            auto_complete: self.auto_complete,
        })
    }
}

struct MemoryTask {
    index: usize,
    log: RenderLog,
    auto_complete: bool,
}

impl RasterTask for MemoryTask {
    fn cancel(&mut self) {
        let mut records = self.log.records.borrow_mut();
        if let Some(record) = records.get_mut(self.index) {
            record.cancel_requested = true;
            if record.outcome.is_none() {
                record.outcome = Some(RenderOutcome::Cancelled);
            }
        }
    }

    fn poll_outcome(&mut self) -> Option<RenderOutcome> {
        let mut records = self.log.records.borrow_mut();
        let record = records.get_mut(self.index)?;
        if record.reported {
            return None;
        }
        if record.outcome.is_none() && self.auto_complete {
            record.outcome = Some(RenderOutcome::Success);
        }
        let outcome = record.outcome.clone()?;
        record.reported = true;
        Some(outcome)
    }
}
