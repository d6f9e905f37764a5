//! Water Segmentation - Frontend Rust/Leptos Application
//!
//! A WebAssembly upload widget: pick or drop images, validate them,
//! send each to the segmentation endpoint and show the result next to
//! the original.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  SegmentationPage                                            │
//! │  ├── Hero                                                    │
//! │  ├── UploadZone ──select──┐                                  │
//! │  ├── NoticeBar            │                                  │
//! │  ├── FileList             ▼                                  │
//! │  ├── Controls ──submit/reset──▶ Orchestrator ──▶ SegmentClient│
//! │  └── ResultsGallery ◀──────── LeptosView ◀──┘                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`] - Common types (FileSummary, ProcessingOutcome, UploadError)
//! - [`orchestrator`] - Validation, selection state, sequential submission
//! - [`services`] - Backend communication
//! - [`view`] - Signal-backed [`orchestrator::UploadView`]
//! - [`components`] - UI components

use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use web_sys::File;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod types;
pub mod orchestrator;
pub mod services;
pub mod view;
pub mod components;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // Files
    FileSummary, SegmentedImage, UploadFile,
    // Outcomes
    ProcessingOutcome, SelectionReport, SubmitReport,
    // Session
    FailurePolicy, ScrollTarget, SessionState,
    // Errors
    RejectReason, Rejection, UploadError, UploadResult,
};

pub use orchestrator::{Notice, NoticeKind, Orchestrator, UploadView};

// Components
pub use components::*;

// Services
pub use services::*;

pub use view::LeptosView;

/// Orchestrator wired to the browser.
pub type BrowserOrchestrator = Orchestrator<File, HttpSegmentClient, LeptosView>;

// =============================================================================
// Application Entry Point
// =============================================================================

/// Install panic hook and logger, then mount the app.
pub fn mount() {
    // Setup panic hook for better error messages
    console_error_panic_hook::set_once();

    // Setup console logging
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🦀 Water Segmentation - Starting Leptos App");

    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text=APP_NAME/>
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=SegmentationPage/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn SegmentationPage() -> impl IntoView {
    let page = LeptosView::new();
    let orchestrator: BrowserOrchestrator =
        Orchestrator::with_policy(HttpSegmentClient::new(SEGMENT_ENDPOINT), page, FAILURE_POLICY);

    let on_select = {
        let orchestrator = orchestrator.clone();
        Callback::new(move |files: Vec<File>| {
            orchestrator.select(files);
        })
    };

    let on_submit = {
        let orchestrator = orchestrator.clone();
        Callback::new(move |_: ()| {
            let orchestrator = orchestrator.clone();
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = orchestrator.submit().await {
                    log::warn!("Submit refused: {}", e);
                }
            });
        })
    };

    let on_reset = Callback::new(move |_: ()| orchestrator.reset());

    let has_selection = Signal::derive(move || page.selection.with(|s| !s.is_empty()));

    view! {
        <div class="container">
            <Hero/>

            <UploadZone on_select=on_select busy=page.busy zone_ref=page.upload_zone/>

            <NoticeBar notice=page.notice/>

            <FileList files=page.selection anchor=page.selection_anchor/>

            <Controls
                busy=page.busy
                visible=has_selection
                on_submit=on_submit
                on_reset=on_reset
            />

            <ResultsGallery results=page.results anchor=page.results_anchor/>
        </div>

        <Footer/>
    }
}
