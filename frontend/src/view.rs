//! Browser implementation of [`UploadView`].
//!
//! State the components render lives in `RwSignal`s; image handles are
//! object URLs and delays run on `gloo-timers`.

use std::time::Duration;

use gloo_timers::callback::Timeout;
use leptos::*;
use web_sys::{Blob, BlobPropertyBag, File, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Url};

use crate::orchestrator::{Notice, UploadView};
use crate::types::{FileSummary, ProcessingOutcome, ScrollTarget, SegmentedImage};
use crate::SCROLL_DELAY_MS;

/// Signals and element refs shared by the page components.
#[derive(Clone, Copy)]
pub struct LeptosView {
    pub selection: RwSignal<Vec<FileSummary>>,
    pub results: RwSignal<Vec<ProcessingOutcome>>,
    pub busy: RwSignal<bool>,
    pub notice: RwSignal<Option<Notice>>,
    pub upload_zone: NodeRef<html::Div>,
    pub selection_anchor: NodeRef<html::Div>,
    pub results_anchor: NodeRef<html::Div>,
}

impl LeptosView {
    /// Create the signals in the current reactive owner.
    pub fn new() -> Self {
        Self {
            selection: create_rw_signal(Vec::new()),
            results: create_rw_signal(Vec::new()),
            busy: create_rw_signal(false),
            notice: create_rw_signal(None),
            upload_zone: create_node_ref::<html::Div>(),
            selection_anchor: create_node_ref::<html::Div>(),
            results_anchor: create_node_ref::<html::Div>(),
        }
    }
}

impl Default for LeptosView {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadView<File> for LeptosView {
    fn file_handle(&self, file: &File) -> Result<String, String> {
        Url::create_object_url_with_blob(file).map_err(|e| format!("Failed to create preview URL: {:?}", e))
    }

    fn image_handle(&self, image: &SegmentedImage) -> Result<String, String> {
        let bytes = js_sys::Uint8Array::from(image.bytes.as_slice());
        let parts = js_sys::Array::of1(&bytes);
        let options = BlobPropertyBag::new();
        options.set_type(&image.content_type);

        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|e| format!("Failed to create image blob: {:?}", e))?;
        Url::create_object_url_with_blob(&blob).map_err(|e| format!("Failed to create image URL: {:?}", e))
    }

    fn release_handle(&self, handle: &str) {
        if let Err(e) = Url::revoke_object_url(handle) {
            log::warn!("Could not revoke {}: {:?}", handle, e);
        }
    }

    fn show_selection(&self, files: Vec<FileSummary>) {
        self.selection.set(files);
    }

    fn show_results(&self, outcomes: Vec<ProcessingOutcome>) {
        self.results.set(outcomes);
    }

    fn set_busy(&self, busy: bool) {
        self.busy.set(busy);
    }

    fn show_notice(&self, notice: Option<Notice>) {
        self.notice.set(notice);
    }

    fn scroll_to(&self, target: ScrollTarget) {
        let (node, block) = match target {
            ScrollTarget::UploadZone => (self.upload_zone, ScrollLogicalPosition::Center),
            ScrollTarget::Selection => (self.selection_anchor, ScrollLogicalPosition::Nearest),
            ScrollTarget::Results => (self.results_anchor, ScrollLogicalPosition::Nearest),
        };

        // Wait for the target to render before scrolling
        Timeout::new(SCROLL_DELAY_MS, move || {
            if let Some(element) = node.get_untracked() {
                let options = ScrollIntoViewOptions::new();
                options.set_behavior(ScrollBehavior::Smooth);
                options.set_block(block);
                element.scroll_into_view_with_scroll_into_view_options(&options);
            }
        })
        .forget();
    }

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, task).forget();
    }
}
