//! The viewer session.
//!
//! A [`ViewerSession`] owns everything a single viewer needs: the loaded
//! document, the viewport, the mode, the render scheduler, the drag
//! interaction, the annotation cache and both surfaces. Hosts feed it
//! [`InputEvent`]s and call [`ViewerSession::tick`] from their event loop.

use crate::config::AppConfig;
use crate::notification::NotificationCenter;
use crate::prompt::{AnnotationPrompt, PromptResponse};
use kurbo::Rect;
use pagemark_core::annotation::{Annotation, AnnotationId};
use pagemark_core::debounce::Debouncer;
use pagemark_core::document::DocumentDescriptor;
use pagemark_core::engine::{RasterDocument, RasterEngine};
use pagemark_core::input::{InputEvent, NavigationCommand, PointerEvent, ZoomCommand};
use pagemark_core::interaction::{InteractionController, InteractionOutcome};
use pagemark_core::mode::ViewerMode;
use pagemark_core::scheduler::{PageGeometry, RenderEvent, RenderScheduler, RenderTarget};
use pagemark_core::store::{AnnotationBackend, AnnotationStore};
use pagemark_core::surface::{SizedSurface, Surface};
use pagemark_core::viewport::ViewportState;
use pagemark_render::{AnnotationOverlay, OverlayContext, OverlaySurface};
use std::sync::Arc;
use std::time::Instant;

/// A document opened in the raster engine.
struct LoadedDocument {
    descriptor: DocumentDescriptor,
    raster: Box<dyn RasterDocument>,
}

/// State of one viewer.
pub struct ViewerSession<B: AnnotationBackend, S: OverlaySurface> {
    config: AppConfig,
    engine: Box<dyn RasterEngine>,
    document: Option<LoadedDocument>,
    viewport: ViewportState,
    mode: ViewerMode,
    scheduler: RenderScheduler,
    interaction: InteractionController,
    resize: Debouncer<f64>,
    store: AnnotationStore<B>,
    overlay: AnnotationOverlay,
    raster_surface: Box<dyn Surface>,
    overlay_surface: S,
    prompt: Box<dyn AnnotationPrompt>,
    notifications: NotificationCenter,
    highlighted: Option<AnnotationId>,
    label_choices: Vec<String>,
}

impl<B: AnnotationBackend, S: OverlaySurface> ViewerSession<B, S> {
    pub fn new(
        config: AppConfig,
        backend: Arc<B>,
        engine: Box<dyn RasterEngine>,
        overlay_surface: S,
        prompt: Box<dyn AnnotationPrompt>,
    ) -> Self {
        Self {
            viewport: config.viewport_state(1),
            interaction: InteractionController::new(config.min_annotation_size),
            resize: Debouncer::new(config.resize_debounce()),
            notifications: NotificationCenter::new(config.notification_duration()),
            config,
            engine,
            document: None,
            mode: ViewerMode::default(),
            scheduler: RenderScheduler::new(),
            store: AnnotationStore::new(backend),
            overlay: AnnotationOverlay::default(),
            raster_surface: Box::new(SizedSurface::new()),
            overlay_surface,
            prompt,
            highlighted: None,
            label_choices: Vec::new(),
        }
    }

    /// Use a host-provided raster surface instead of a size-only one.
    pub fn with_raster_surface(mut self, surface: Box<dyn Surface>) -> Self {
        self.raster_surface = surface;
        self
    }

    pub fn with_overlay(mut self, overlay: AnnotationOverlay) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn mode(&self) -> ViewerMode {
        self.mode
    }

    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    pub fn store(&self) -> &AnnotationStore<B> {
        &self.store
    }

    pub fn annotations(&self) -> &[Annotation] {
        self.store.annotations()
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationCenter {
        &mut self.notifications
    }

    pub fn overlay_surface(&self) -> &S {
        &self.overlay_surface
    }

    pub fn raster_surface(&self) -> &dyn Surface {
        self.raster_surface.as_ref()
    }

    /// Descriptor of the loaded document.
    pub fn document(&self) -> Option<&DocumentDescriptor> {
        self.document.as_ref().map(|d| &d.descriptor)
    }

    /// Labels offered by the prompt for the loaded document.
    pub fn label_choices(&self) -> &[String] {
        &self.label_choices
    }

    pub fn highlighted(&self) -> Option<AnnotationId> {
        self.highlighted
    }

    pub fn is_drawing(&self) -> bool {
        self.interaction.is_drawing()
    }

    /// Replace the current document with the one described by `descriptor`.
    ///
    /// Returns false (after notifying) if the document could not be opened.
    pub async fn load_document(&mut self, descriptor: DocumentDescriptor) -> bool {
        self.scheduler.reset();
        self.interaction.cancel();
        self.resize.cancel();
        self.store.clear();
        self.document = None;
        self.highlighted = None;
        self.label_choices.clear();
        self.overlay_surface.clear();

        let url = match self.config.document_url(&descriptor.file_path) {
            Ok(url) => url,
            Err(err) => {
                self.notifications.error(format!("Failed to load document: {err}"));
                return false;
            }
        };
        let raster = match self.engine.open(url.as_str()) {
            Ok(raster) => raster,
            Err(err) => {
                self.notifications.error(format!("Failed to load document: {err}"));
                return false;
            }
        };
        log::info!("Loaded {} ({} pages)", descriptor.file_path, raster.page_count());

        let device_pixel_ratio = self.viewport.device_pixel_ratio;
        self.viewport = self.config.viewport_state(raster.page_count());
        self.viewport.set_device_pixel_ratio(device_pixel_ratio);

        if let Err(err) = self.store.load(descriptor.id).await {
            self.notifications.error(format!("Failed to load annotations: {err}"));
        }
        if let Some(type_id) = descriptor.document_type_id {
            match self.store.data_elements(type_id).await {
                Ok(elements) => self.label_choices = elements.into_iter().map(|e| e.name).collect(),
                Err(err) => self.notifications.warn(format!("Failed to load labels: {err}")),
            }
        }

        self.document = Some(LoadedDocument { descriptor, raster });
        self.request_current_page();
        true
    }

    /// React to one input event. `now` feeds the resize debouncer.
    pub async fn handle_input(&mut self, event: InputEvent, now: Instant) {
        match event {
            InputEvent::Pointer(pointer) => self.handle_pointer(pointer).await,
            InputEvent::Navigate(command) => {
                let changed = match command {
                    NavigationCommand::Next => self.viewport.next_page(),
                    NavigationCommand::Previous => self.viewport.previous_page(),
                    NavigationCommand::First => self.viewport.first_page(),
                    NavigationCommand::Last => self.viewport.last_page(),
                    NavigationCommand::GoTo(page) => self.viewport.go_to_page(page),
                };
                if changed {
                    self.viewport_changed();
                }
            }
            InputEvent::Zoom(command) => {
                let changed = match command {
                    ZoomCommand::In => self.viewport.zoom_in(),
                    ZoomCommand::Out => self.viewport.zoom_out(),
                    ZoomCommand::Set(scale) => self.viewport.set_scale(scale),
                };
                if changed {
                    self.viewport_changed();
                }
            }
            InputEvent::Rotate => {
                self.viewport.rotate_clockwise();
                self.viewport_changed();
            }
            InputEvent::Resize { device_pixel_ratio } => {
                self.resize.push(device_pixel_ratio, now);
            }
            InputEvent::ToggleAnnotationMode => {
                if self.mode.is_annotating() {
                    self.mode.exit_annotating();
                    self.interaction.cancel();
                } else {
                    self.mode.enter_annotating();
                }
                self.redraw_overlay();
            }
            InputEvent::ToggleAnnotationsVisible => {
                if self.mode.toggle_annotations_visible() {
                    self.redraw_overlay();
                }
            }
            InputEvent::Highlight(id) => {
                self.highlighted = id;
                self.redraw_overlay();
            }
        }
    }

    /// Advance time: fire a debounced resize, collect finished renders and
    /// expire notifications.
    pub fn tick(&mut self, now: Instant) {
        if let Some(device_pixel_ratio) = self.resize.poll(now) {
            self.viewport.set_device_pixel_ratio(device_pixel_ratio);
            self.interaction.cancel();
            self.request_current_page();
        }

        let geometry_before = self.scheduler.geometry();
        let events = match self.document.as_mut() {
            Some(document) => {
                let target = RenderTarget {
                    document: document.raster.as_mut(),
                    viewport: &self.viewport,
                    raster: self.raster_surface.as_mut(),
                    overlay: &mut self.overlay_surface,
                };
                self.scheduler.poll(target)
            }
            None => Vec::new(),
        };
        // A pending page just started: the drag's start point belongs to the
        // old transform. Starting the task already cleared the overlay.
        if self.scheduler.geometry() != geometry_before && self.interaction.cancel() {
            log::debug!("Drag cancelled by a page switch");
        }
        for event in events {
            self.handle_render_event(event);
        }

        self.notifications.expire(now);
    }

    /// Redraw the overlay for the page the surfaces are sized for.
    /// Returns the number of persisted annotations drawn.
    pub fn redraw_overlay(&mut self) -> usize {
        let Some(geometry) = self.scheduler.geometry() else {
            return 0;
        };
        let proposal = self.interaction.proposal().map(|p| p.rect());
        let ctx = OverlayContext::new(self.store.annotations(), geometry.page, geometry.transform)
            .with_visibility(self.mode.annotations_visible())
            .with_highlight(self.highlighted)
            .with_proposal(proposal);
        self.overlay.redraw(&mut self.overlay_surface, &ctx)
    }

    /// Prompt for details of a drawn rectangle and store the annotation.
    ///
    /// Returns the stored annotation, or `None` if it was discarded or
    /// could not be saved.
    pub async fn submit_proposal(&mut self, page: u32, rect: Rect) -> Option<Annotation> {
        let document_id = self.document.as_ref().map(|d| d.descriptor.id)?;
        let (value, annotation_value) = match self.prompt.request_details(&self.label_choices) {
            PromptResponse::Confirm {
                value,
                annotation_value,
            } => (value, annotation_value),
            PromptResponse::Discard => {
                log::debug!("Annotation discarded");
                self.redraw_overlay();
                return None;
            }
        };

        let annotation = Annotation::proposal(document_id, page, rect, value.trim(), annotation_value);
        if let Err(err) = annotation.validate() {
            self.notifications.warn(err.to_string());
            self.redraw_overlay();
            return None;
        }

        let result = self.store.save(&annotation).await;
        let saved = match result {
            Ok(stored) => {
                self.notifications.info(format!("Saved annotation \"{}\"", stored.value));
                Some(stored)
            }
            Err(err) => {
                self.notifications.error(format!("Failed to save annotation: {err}"));
                None
            }
        };
        self.redraw_overlay();
        saved
    }

    async fn handle_pointer(&mut self, event: PointerEvent) {
        let Some(PageGeometry { page, transform }) = self.scheduler.geometry() else {
            return;
        };
        match self.interaction.handle_pointer(&event, &self.mode, &transform) {
            InteractionOutcome::Ignored | InteractionOutcome::Started => {}
            InteractionOutcome::Preview(_) | InteractionOutcome::Cancelled => {
                self.redraw_overlay();
            }
            InteractionOutcome::TooSmall(rect) => {
                log::debug!("Ignoring {rect:?}: below {} px", self.config.min_annotation_size);
                self.redraw_overlay();
            }
            InteractionOutcome::Proposal(rect) => {
                self.submit_proposal(page, rect).await;
            }
        }
    }

    /// Page, zoom or rotation changed: abandon any drag and re-render.
    fn viewport_changed(&mut self) {
        self.interaction.cancel();
        self.request_current_page();
    }

    fn request_current_page(&mut self) {
        let Some(document) = self.document.as_mut() else {
            return;
        };
        let target = RenderTarget {
            document: document.raster.as_mut(),
            viewport: &self.viewport,
            raster: self.raster_surface.as_mut(),
            overlay: &mut self.overlay_surface,
        };
        if let Some(event) = self.scheduler.request_page(self.viewport.current_page, target) {
            self.handle_render_event(event);
        }
    }

    fn handle_render_event(&mut self, event: RenderEvent) {
        match event {
            RenderEvent::Rendered { page } => {
                if self.scheduler.geometry().is_some_and(|g| g.page == page) {
                    self.redraw_overlay();
                }
            }
            RenderEvent::Failed { page, reason } => {
                self.notifications.error(format!("Failed to render page {page}: {reason}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationLevel;
    use kurbo::Point;
    use pagemark_core::document::{DataElement, DocumentType, DocumentUpload};
    use pagemark_core::engine::{MemoryEngine, MemoryPage, RenderLog};
    use pagemark_core::input::MouseButton;
    use pagemark_core::store::MemoryBackend;
    use pagemark_render::RecordingSurface;
    use pollster::block_on;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::time::Duration;

    type Session = ViewerSession<MemoryBackend, RecordingSurface>;

    /// Answers prompts from a script and records the offered choices.
    #[derive(Clone, Default)]
    struct ScriptedPrompt {
        responses: Rc<RefCell<VecDeque<PromptResponse>>>,
        requests: Rc<RefCell<Vec<Vec<String>>>>,
    }

    impl ScriptedPrompt {
        fn answer(&self, response: PromptResponse) {
            self.responses.borrow_mut().push_back(response);
        }

        fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl AnnotationPrompt for ScriptedPrompt {
        fn request_details(&mut self, choices: &[String]) -> PromptResponse {
            self.requests.borrow_mut().push(choices.to_vec());
            self.responses.borrow_mut().pop_front().unwrap_or(PromptResponse::Discard)
        }
    }

    fn confirm(label: &str) -> PromptResponse {
        PromptResponse::Confirm {
            value: label.to_string(),
            annotation_value: Some("ACME Corp".to_string()),
        }
    }

    struct Fixture {
        session: Session,
        backend: Arc<MemoryBackend>,
        log: RenderLog,
        prompt: ScriptedPrompt,
        descriptor: DocumentDescriptor,
        now: Instant,
    }

    impl Fixture {
        fn new(pages: usize) -> Self {
            let backend = Arc::new(MemoryBackend::new());
            backend
                .insert_document_type(
                    DocumentType {
                        id: 1,
                        name: "Credit Agreement".to_string(),
                        description: None,
                    },
                    vec![
                        DataElement {
                            id: 1,
                            name: "Borrower Name".to_string(),
                            description: None,
                        },
                        DataElement {
                            id: 2,
                            name: "Lender Name".to_string(),
                            description: None,
                        },
                    ],
                )
                .unwrap();
            let descriptor = block_on(backend.upload_document(DocumentUpload {
                file_name: "agreement.pdf".to_string(),
                bytes: Vec::new(),
                document_type_id: Some(1),
            }))
            .unwrap();

            let engine = MemoryEngine::new().with_document(
                "http://localhost:8000/uploaded_files/agreement.pdf",
                vec![MemoryPage::letter(); pages],
            );
            let log = engine.render_log();
            let prompt = ScriptedPrompt::default();
            let session = ViewerSession::new(
                AppConfig::default(),
                backend.clone(),
                Box::new(engine),
                RecordingSurface::new(),
                Box::new(prompt.clone()),
            );
            Self {
                session,
                backend,
                log,
                prompt,
                descriptor,
                now: Instant::now(),
            }
        }

        /// Load the document and let page 1 finish rendering.
        fn loaded(pages: usize) -> Self {
            let mut fx = Self::new(pages);
            assert!(block_on(fx.session.load_document(fx.descriptor.clone())));
            fx.finish_latest();
            fx
        }

        fn finish_latest(&mut self) {
            self.log.complete_latest();
            self.session.tick(self.now);
        }

        fn input(&mut self, event: InputEvent) {
            block_on(self.session.handle_input(event, self.now));
        }

        fn drag(&mut self, from: (f64, f64), to: (f64, f64)) {
            self.input(InputEvent::Pointer(PointerEvent::Down {
                position: Point::new(from.0, from.1),
                button: MouseButton::Left,
            }));
            self.input(InputEvent::Pointer(PointerEvent::Move {
                position: Point::new(to.0, to.1),
            }));
            self.input(InputEvent::Pointer(PointerEvent::Up {
                position: Point::new(to.0, to.1),
                button: MouseButton::Left,
            }));
        }
    }

    #[test]
    fn test_load_renders_first_page_and_offers_labels() {
        let fx = Fixture::loaded(3);
        assert_eq!(fx.log.pages(), vec![1]);
        assert!(fx.session.scheduler().is_idle());
        assert_eq!(fx.session.viewport().page_count, 3);
        assert_eq!(fx.session.label_choices(), ["Borrower Name", "Lender Name"]);
        assert_eq!(fx.session.overlay_surface().size(), fx.session.raster_surface().size());
    }

    #[test]
    fn test_load_unknown_document_notifies() {
        let mut fx = Fixture::new(1);
        let missing = DocumentDescriptor {
            file_path: "missing.pdf".to_string(),
            ..fx.descriptor.clone()
        };
        assert!(!block_on(fx.session.load_document(missing)));
        assert!(fx.session.document().is_none());
        assert_eq!(fx.session.notifications().count(NotificationLevel::Error), 1);
    }

    #[test]
    fn test_rapid_navigation_coalesces() {
        let mut fx = Fixture::loaded(5);
        fx.input(InputEvent::Navigate(NavigationCommand::Next));
        fx.input(InputEvent::Navigate(NavigationCommand::Next));
        fx.input(InputEvent::Navigate(NavigationCommand::Next));
        assert_eq!(fx.log.pages(), vec![1, 2]);
        assert_eq!(fx.session.scheduler().pending_page(), Some(4));

        // The cancelled page 2 settles silently and page 4 starts.
        fx.session.tick(fx.now);
        assert_eq!(fx.log.pages(), vec![1, 2, 4]);
        assert!(fx.session.notifications().is_empty());

        fx.finish_latest();
        assert!(fx.session.scheduler().is_idle());
        assert_eq!(fx.session.viewport().current_page, 4);
    }

    #[test]
    fn test_render_failure_notifies() {
        let mut fx = Fixture::loaded(2);
        fx.input(InputEvent::Navigate(NavigationCommand::Next));
        fx.log.fail(1, "engine crashed");
        fx.session.tick(fx.now);
        assert!(fx.session.scheduler().is_idle());
        assert_eq!(fx.session.notifications().count(NotificationLevel::Error), 1);
    }

    #[test]
    fn test_small_drag_makes_no_request() {
        let mut fx = Fixture::loaded(1);
        fx.input(InputEvent::ToggleAnnotationMode);
        fx.drag((100.0, 100.0), (105.0, 140.0));
        assert_eq!(fx.prompt.request_count(), 0);
        assert_eq!(fx.backend.create_calls(), 0);
        assert!(!fx.session.is_drawing());
    }

    #[test]
    fn test_drag_saves_annotation() {
        let mut fx = Fixture::loaded(1);
        fx.prompt.answer(confirm("Borrower Name"));
        fx.input(InputEvent::ToggleAnnotationMode);
        fx.drag((100.0, 100.0), (200.0, 150.0));

        assert_eq!(fx.prompt.requests.borrow()[0], ["Borrower Name", "Lender Name"]);
        assert_eq!(fx.backend.create_calls(), 1);
        let annotations = fx.session.annotations();
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].rect(), Rect::new(100.0, 100.0, 200.0, 150.0));
        assert_eq!(annotations[0].page, 1);
        assert_eq!(fx.session.overlay_surface().labels(), vec!["Borrower Name"]);
        assert_eq!(fx.session.notifications().count(NotificationLevel::Info), 1);
    }

    #[test]
    fn test_drag_at_zoom_is_stored_in_document_space() {
        let mut fx = Fixture::loaded(1);
        fx.input(InputEvent::Zoom(ZoomCommand::Set(2.0)));
        fx.finish_latest();
        fx.prompt.answer(confirm("Loan Amount"));
        fx.input(InputEvent::ToggleAnnotationMode);
        fx.drag((100.0, 100.0), (200.0, 150.0));
        assert_eq!(fx.session.annotations()[0].rect(), Rect::new(50.0, 50.0, 100.0, 75.0));
        // Drawn back where the user dragged.
        assert_eq!(
            fx.session.overlay_surface().stroked_rects()[0].0,
            Rect::new(100.0, 100.0, 200.0, 150.0)
        );
    }

    #[test]
    fn test_save_failure_notifies_and_clears_proposal() {
        let mut fx = Fixture::loaded(1);
        fx.prompt.answer(confirm("Borrower Name"));
        fx.backend.set_offline(true);
        fx.input(InputEvent::ToggleAnnotationMode);
        fx.drag((100.0, 100.0), (200.0, 150.0));

        assert_eq!(fx.backend.create_calls(), 1);
        assert!(fx.session.annotations().is_empty());
        assert!(fx.session.overlay_surface().commands().is_empty());
        assert_eq!(fx.session.notifications().count(NotificationLevel::Error), 1);
    }

    #[test]
    fn test_empty_label_is_blocked_locally() {
        let mut fx = Fixture::loaded(1);
        fx.prompt.answer(confirm("   "));
        fx.input(InputEvent::ToggleAnnotationMode);
        fx.drag((100.0, 100.0), (200.0, 150.0));
        assert_eq!(fx.backend.create_calls(), 0);
        assert_eq!(fx.session.notifications().count(NotificationLevel::Warning), 1);
    }

    #[test]
    fn test_discard_redraws_without_request() {
        let mut fx = Fixture::loaded(1);
        fx.prompt.answer(PromptResponse::Discard);
        fx.input(InputEvent::ToggleAnnotationMode);
        fx.drag((100.0, 100.0), (200.0, 150.0));
        assert_eq!(fx.prompt.request_count(), 1);
        assert_eq!(fx.backend.create_calls(), 0);
        assert!(fx.session.overlay_surface().commands().is_empty());
    }

    #[test]
    fn test_preview_is_drawn_mid_drag() {
        let mut fx = Fixture::loaded(1);
        fx.input(InputEvent::ToggleAnnotationMode);
        fx.input(InputEvent::Pointer(PointerEvent::Down {
            position: Point::new(10.0, 10.0),
            button: MouseButton::Left,
        }));
        fx.input(InputEvent::Pointer(PointerEvent::Move {
            position: Point::new(60.0, 50.0),
        }));
        assert!(fx.session.is_drawing());
        assert_eq!(
            fx.session.overlay_surface().stroked_rects()[0].0,
            Rect::new(10.0, 10.0, 60.0, 50.0)
        );

        fx.input(InputEvent::Pointer(PointerEvent::Leave));
        assert!(!fx.session.is_drawing());
        assert!(fx.session.overlay_surface().commands().is_empty());
    }

    #[test]
    fn test_leaving_annotation_mode_cancels_drag() {
        let mut fx = Fixture::loaded(1);
        fx.input(InputEvent::ToggleAnnotationMode);
        fx.input(InputEvent::Pointer(PointerEvent::Down {
            position: Point::new(10.0, 10.0),
            button: MouseButton::Left,
        }));
        fx.input(InputEvent::ToggleAnnotationMode);
        assert!(!fx.session.is_drawing());
        fx.input(InputEvent::Pointer(PointerEvent::Up {
            position: Point::new(200.0, 200.0),
            button: MouseButton::Left,
        }));
        assert_eq!(fx.prompt.request_count(), 0);
    }

    #[test]
    fn test_visibility_toggle_locked_while_annotating() {
        let mut fx = Fixture::loaded(1);
        fx.prompt.answer(confirm("Lender Name"));
        fx.input(InputEvent::ToggleAnnotationMode);
        fx.drag((100.0, 100.0), (200.0, 150.0));

        fx.input(InputEvent::ToggleAnnotationsVisible);
        assert!(fx.session.mode().annotations_visible());
        assert_eq!(fx.session.overlay_surface().labels().len(), 1);

        fx.input(InputEvent::ToggleAnnotationMode);
        assert!(fx.session.mode().annotations_visible());
        fx.input(InputEvent::ToggleAnnotationsVisible);
        assert!(fx.session.overlay_surface().commands().is_empty());
        fx.input(InputEvent::ToggleAnnotationsVisible);
        assert_eq!(fx.session.overlay_surface().labels().len(), 1);
    }

    #[test]
    fn test_highlight_redraws() {
        let mut fx = Fixture::loaded(1);
        fx.prompt.answer(confirm("Lender Name"));
        fx.input(InputEvent::ToggleAnnotationMode);
        fx.drag((100.0, 100.0), (200.0, 150.0));
        let id = fx.session.annotations()[0].id;
        fx.input(InputEvent::Highlight(id));
        assert_eq!(fx.session.highlighted(), id);
        assert_eq!(fx.session.overlay_surface().stroked_rects()[0].2, 3.0);
    }

    #[test]
    fn test_resize_is_debounced() {
        let mut fx = Fixture::loaded(1);
        let start = fx.now;
        block_on(fx.session.handle_input(InputEvent::Resize { device_pixel_ratio: 1.5 }, start));
        block_on(fx.session.handle_input(
            InputEvent::Resize { device_pixel_ratio: 2.0 },
            start + Duration::from_millis(100),
        ));
        fx.session.tick(start + Duration::from_millis(200));
        assert_eq!(fx.log.len(), 1);

        fx.session.tick(start + Duration::from_millis(250));
        assert_eq!(fx.log.len(), 2);
        assert_eq!(fx.session.viewport().device_pixel_ratio, 2.0);
        assert_eq!(fx.log.records()[1].target.pixel_width, 1224);
    }

    #[test]
    fn test_stale_completion_does_not_redraw() {
        let mut fx = Fixture::new(3);
        let on_page_two = Annotation::proposal(
            fx.descriptor.id,
            2,
            Rect::new(10.0, 10.0, 60.0, 40.0),
            "Lender Name",
            None,
        );
        block_on(fx.backend.create_annotation(&on_page_two)).unwrap();
        assert!(block_on(fx.session.load_document(fx.descriptor.clone())));
        fx.finish_latest();

        // Page 2 finishes just as page 3 is requested; page 3's surfaces
        // must not receive page 2's annotations.
        fx.input(InputEvent::Navigate(NavigationCommand::Next));
        fx.log.complete(1);
        fx.input(InputEvent::Navigate(NavigationCommand::Next));
        fx.session.tick(fx.now);
        assert_eq!(fx.session.scheduler().in_flight_page(), Some(3));
        assert!(fx.session.overlay_surface().commands().is_empty());
    }

    #[test]
    fn test_pending_page_start_cancels_drag() {
        let mut fx = Fixture::loaded(3);
        fx.prompt.answer(confirm("Borrower Name"));
        fx.input(InputEvent::ToggleAnnotationMode);
        fx.input(InputEvent::Navigate(NavigationCommand::Next));
        fx.input(InputEvent::Navigate(NavigationCommand::Next));
        assert_eq!(fx.session.scheduler().pending_page(), Some(3));

        // The drag begins against page 2's transform.
        fx.input(InputEvent::Pointer(PointerEvent::Down {
            position: Point::new(100.0, 100.0),
            button: MouseButton::Left,
        }));
        assert!(fx.session.is_drawing());

        // Cancelled page 2 settles and page 3 starts.
        fx.session.tick(fx.now);
        assert_eq!(fx.session.scheduler().in_flight_page(), Some(3));
        assert!(!fx.session.is_drawing());

        fx.input(InputEvent::Pointer(PointerEvent::Up {
            position: Point::new(200.0, 150.0),
            button: MouseButton::Left,
        }));
        assert_eq!(fx.prompt.request_count(), 0);
        assert_eq!(fx.backend.create_calls(), 0);
        assert!(fx.session.annotations().is_empty());
    }

    #[test]
    fn test_drag_survives_completion_without_page_switch() {
        let mut fx = Fixture::loaded(2);
        fx.prompt.answer(confirm("Lender Name"));
        fx.input(InputEvent::ToggleAnnotationMode);
        fx.input(InputEvent::Navigate(NavigationCommand::Next));
        fx.input(InputEvent::Pointer(PointerEvent::Down {
            position: Point::new(100.0, 100.0),
            button: MouseButton::Left,
        }));
        fx.finish_latest();
        assert!(fx.session.is_drawing());

        fx.input(InputEvent::Pointer(PointerEvent::Up {
            position: Point::new(200.0, 150.0),
            button: MouseButton::Left,
        }));
        assert_eq!(fx.session.annotations().len(), 1);
        assert_eq!(fx.session.annotations()[0].page, 2);
    }
}
