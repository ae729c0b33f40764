//! Render scheduling for the main surface.
//!
//! At most one raster task is in flight. A request that arrives while a task
//! is running cancels that task and is remembered as the pending page; only
//! the newest pending page survives.

use crate::engine::{RasterDocument, RasterTask, RenderOutcome};
use crate::surface::{Surface, SurfaceSize};
use crate::transform::{Rotation, ViewportTransform};
use crate::viewport::ViewportState;

/// A running raster task.
pub struct InFlight {
    pub page: u32,
    task: Box<dyn RasterTask>,
    cancel_requested: bool,
}

impl InFlight {
    fn cancel(&mut self) {
        if !self.cancel_requested {
            self.cancel_requested = true;
            self.task.cancel();
        }
    }
}

impl std::fmt::Debug for InFlight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InFlight")
            .field("page", &self.page)
            .field("cancel_requested", &self.cancel_requested)
            .finish()
    }
}

/// Scheduler state.
#[derive(Debug, Default)]
pub enum RenderState {
    #[default]
    Idle,
    Rendering(InFlight),
    RenderingWithPending(InFlight, u32),
}

/// Everything a render needs from the session, borrowed for one call.
pub struct RenderTarget<'a> {
    pub document: &'a mut dyn RasterDocument,
    pub viewport: &'a ViewportState,
    pub raster: &'a mut dyn Surface,
    pub overlay: &'a mut dyn Surface,
}

/// Something the session has to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    /// The page finished rendering; redraw its overlay.
    Rendered { page: u32 },
    /// Loading or rendering failed.
    Failed { page: u32, reason: String },
}

/// Geometry of the page the surfaces are currently sized for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page: u32,
    pub transform: ViewportTransform,
}

/// Owns the single raster task of a viewer.
#[derive(Debug, Default)]
pub struct RenderScheduler {
    state: RenderState,
    geometry: Option<PageGeometry>,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, RenderState::Idle)
    }

    /// Page of the task currently in flight.
    pub fn in_flight_page(&self) -> Option<u32> {
        match &self.state {
            RenderState::Idle => None,
            RenderState::Rendering(task) | RenderState::RenderingWithPending(task, _) => {
                Some(task.page)
            }
        }
    }

    pub fn pending_page(&self) -> Option<u32> {
        match self.state {
            RenderState::RenderingWithPending(_, page) => Some(page),
            _ => None,
        }
    }

    /// Geometry of the last page that was started.
    pub fn geometry(&self) -> Option<PageGeometry> {
        self.geometry
    }

    /// Ask for `page` to be rendered.
    ///
    /// Returns an event only when starting the task failed immediately.
    pub fn request_page(&mut self, page: u32, target: RenderTarget<'_>) -> Option<RenderEvent> {
        match std::mem::take(&mut self.state) {
            RenderState::Idle => self.start(page, target),
            RenderState::Rendering(mut task) => {
                log::debug!("Page {page} requested while page {} renders; cancelling", task.page);
                task.cancel();
                self.state = RenderState::RenderingWithPending(task, page);
                None
            }
            RenderState::RenderingWithPending(task, replaced) => {
                log::debug!("Pending page {replaced} replaced by {page}");
                self.state = RenderState::RenderingWithPending(task, page);
                None
            }
        }
    }

    /// Check the in-flight task. Settled tasks are reported and the pending
    /// page, if any, is started.
    pub fn poll(&mut self, target: RenderTarget<'_>) -> Vec<RenderEvent> {
        let mut events = Vec::new();
        let (mut task, pending) = match std::mem::take(&mut self.state) {
            RenderState::Idle => return events,
            RenderState::Rendering(task) => (task, None),
            RenderState::RenderingWithPending(task, page) => (task, Some(page)),
        };

        let Some(outcome) = task.task.poll_outcome() else {
            self.state = match pending {
                Some(page) => RenderState::RenderingWithPending(task, page),
                None => RenderState::Rendering(task),
            };
            return events;
        };

        match outcome {
            RenderOutcome::Success => {
                log::debug!("Rendered page {}", task.page);
                events.push(RenderEvent::Rendered { page: task.page });
            }
            RenderOutcome::Cancelled => {
                log::debug!("Render of page {} cancelled", task.page);
            }
            RenderOutcome::Failed(reason) => {
                log::warn!("Render of page {} failed: {reason}", task.page);
                events.push(RenderEvent::Failed {
                    page: task.page,
                    reason,
                });
            }
        }

        if let Some(page) = pending {
            events.extend(self.start(page, target));
        }
        events
    }

    /// Drop any in-flight task and pending request, e.g. when a new document
    /// replaces the current one.
    pub fn reset(&mut self) {
        match std::mem::take(&mut self.state) {
            RenderState::Idle => {}
            RenderState::Rendering(mut task) | RenderState::RenderingWithPending(mut task, _) => {
                task.cancel();
            }
        }
        self.geometry = None;
    }

    fn start(&mut self, page: u32, target: RenderTarget<'_>) -> Option<RenderEvent> {
        let RenderTarget {
            document,
            viewport,
            raster,
            overlay,
        } = target;

        let mut loaded = match document.page(page) {
            Ok(loaded) => loaded,
            Err(err) => {
                log::warn!("{err}");
                self.state = RenderState::Idle;
                return Some(RenderEvent::Failed {
                    page,
                    reason: err.to_string(),
                });
            }
        };

        let page_size = loaded.viewport(1.0, Rotation::Deg0).size();
        let page_rotation = loaded.rotation();
        let transform = viewport.transform_for(page_size, page_rotation);
        let page_viewport = loaded.viewport(viewport.scale, transform.rotation);
        let size = SurfaceSize::for_viewport(page_viewport, viewport.device_pixel_ratio);

        raster.resize(size);
        overlay.resize(size);
        self.geometry = Some(PageGeometry { page, transform });

        let task = loaded.render(page_viewport, size);
        self.state = RenderState::Rendering(InFlight {
            page,
            task,
            cancel_requested: false,
        });
        None
    }
}
