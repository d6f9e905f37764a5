//! Upload orchestration.
//!
//! The [`Orchestrator`] owns the session: the current selection, the
//! notice channel and the outcomes of the last submission. It talks to
//! the page only through an injected [`UploadView`] and to the network
//! only through a [`SegmentClient`], so the whole flow runs natively in
//! tests.
//!
//! # Session
//!
//! ```text
//! Idle ──select──▶ Selected ──submit──▶ Submitting ──▶ Completed | Failed
//!  ▲                                                          │
//!  └───────────────────────────reset──────────────────────────┘
//! ```
//!
//! Files are submitted one at a time, in selection order. With
//! [`FailurePolicy::AbortBatch`] the first failure stops the batch.

pub mod notice;
pub mod validation;

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::services::SegmentClient;
use crate::types::{
    FailurePolicy, FileSummary, ProcessingOutcome, ScrollTarget, SegmentedImage, SelectionReport,
    SessionState, SubmitReport, UploadError, UploadFile, UploadResult,
};
use crate::NOTICE_AUTO_HIDE_MS;

pub use notice::{Notice, NoticeChannel, NoticeKind};
pub use validation::{check_file, validate, Validated};

/// Page handles the orchestrator drives.
///
/// Injected at construction; the browser implementation lives in
/// [`crate::view`].
pub trait UploadView<F> {
    /// Displayable handle (object URL) for a selected file.
    fn file_handle(&self, file: &F) -> Result<String, String>;
    /// Displayable handle for a segmented image.
    fn image_handle(&self, image: &SegmentedImage) -> Result<String, String>;
    /// Release a handle created by this view.
    fn release_handle(&self, handle: &str);
    /// Render the selected files list; an empty list hides it.
    fn show_selection(&self, files: Vec<FileSummary>);
    /// Render result cards; an empty list hides the results area.
    fn show_results(&self, outcomes: Vec<ProcessingOutcome>);
    /// Disable the submit control and show the busy indicator.
    fn set_busy(&self, busy: bool);
    /// Render the notice channel.
    fn show_notice(&self, notice: Option<Notice>);
    fn scroll_to(&self, target: ScrollTarget);
    /// Run `task` once after `delay`.
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>);
}

struct SelectedFile<F> {
    file: F,
    summary: FileSummary,
}

struct Session<F> {
    state: SessionState,
    selection: Vec<SelectedFile<F>>,
    outcomes: Vec<ProcessingOutcome>,
    notices: NoticeChannel,
    /// Object URLs of segmented images, released on the next run or reset
    result_handles: Vec<String>,
    /// A batch is running (survives a reset)
    in_flight: bool,
    /// Bumped by every reset; a batch started under an older generation
    /// stops sending and renders nothing
    generation: u64,
}

impl<F> Session<F> {
    fn new() -> Self {
        Self {
            state: SessionState::Idle,
            selection: Vec::new(),
            outcomes: Vec::new(),
            notices: NoticeChannel::new(),
            result_handles: Vec::new(),
            in_flight: false,
            generation: 0,
        }
    }
}

struct Inner<F, C, V> {
    client: C,
    view: V,
    policy: FailurePolicy,
    session: RefCell<Session<F>>,
}

/// Drives validation, sequential submission and reset for one page.
///
/// Cloning is cheap and shares the session.
pub struct Orchestrator<F, C, V> {
    inner: Rc<Inner<F, C, V>>,
}

impl<F, C, V> Clone for Orchestrator<F, C, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<F, C, V> Orchestrator<F, C, V>
where
    F: UploadFile,
    C: SegmentClient<F> + 'static,
    V: UploadView<F> + 'static,
{
    pub fn new(client: C, view: V) -> Self {
        Self::with_policy(client, view, FailurePolicy::default())
    }

    pub fn with_policy(client: C, view: V, policy: FailurePolicy) -> Self {
        Self {
            inner: Rc::new(Inner {
                client,
                view,
                policy,
                session: RefCell::new(Session::new()),
            }),
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.inner.policy
    }

    pub fn state(&self) -> SessionState {
        self.inner.session.borrow().state
    }

    /// Summaries of the current selection, in order.
    pub fn selection(&self) -> Vec<FileSummary> {
        self.inner
            .session
            .borrow()
            .selection
            .iter()
            .map(|s| s.summary.clone())
            .collect()
    }

    pub fn notice(&self) -> Option<Notice> {
        self.inner.session.borrow().notices.active().cloned()
    }

    /// Outcomes collected by the last submission, rendered or not.
    pub fn outcomes(&self) -> Vec<ProcessingOutcome> {
        self.inner.session.borrow().outcomes.clone()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Validate candidates from the picker or a drop event.
    ///
    /// Each rejection posts an error notice. When nothing is accepted the
    /// previous selection stays untouched; otherwise it is replaced by the
    /// accepted files.
    pub fn select(&self, candidates: Vec<F>) -> SelectionReport {
        if self.state() == SessionState::Submitting {
            log::warn!("⚠️ Selection ignored while a submission is running");
            return SelectionReport::default();
        }

        let Validated { accepted, rejected } = validate(candidates);

        for rejection in &rejected {
            log::warn!("🚫 Rejected {}: {:?}", rejection.file_name, rejection.reason);
            self.post_notice(NoticeKind::Error, UploadError::Validation(rejection.clone()).to_string());
        }

        if accepted.is_empty() {
            return SelectionReport {
                accepted: 0,
                rejected,
            };
        }

        let view = &self.inner.view;
        let selection: Vec<SelectedFile<F>> = accepted
            .into_iter()
            .map(|file| {
                let preview_url = match view.file_handle(&file) {
                    Ok(url) => Some(url),
                    Err(e) => {
                        log::warn!("Could not create preview for {}: {}", file.name(), e);
                        None
                    }
                };
                let summary = FileSummary {
                    name: file.name(),
                    mime_type: file.mime_type(),
                    size: file.size(),
                    preview_url,
                };
                SelectedFile { file, summary }
            })
            .collect();

        let summaries: Vec<FileSummary> = selection.iter().map(|s| s.summary.clone()).collect();
        let stale = {
            let mut session = self.inner.session.borrow_mut();
            let old = std::mem::replace(&mut session.selection, selection);
            session.outcomes.clear();
            session.state = SessionState::Selected;
            let mut stale: Vec<String> = old.into_iter().filter_map(|s| s.summary.preview_url).collect();
            stale.append(&mut session.result_handles);
            stale
        };
        self.release(&stale);

        let accepted = summaries.len();
        log::info!("📁 {} file(s) selected", accepted);

        let mut message = if accepted == 1 {
            format!("File \"{}\" selected successfully!", summaries[0].name)
        } else {
            format!("{} files selected successfully!", accepted)
        };
        if !rejected.is_empty() {
            message.push_str(&format!(" ({} skipped)", rejected.len()));
        }

        view.show_results(Vec::new());
        view.show_selection(summaries);
        self.post_notice(NoticeKind::Success, message);
        view.scroll_to(ScrollTarget::Selection);

        SelectionReport { accepted, rejected }
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Submit every selected file, one request at a time.
    ///
    /// Returns `EmptySelection` or `Busy` without touching the network,
    /// after posting the matching error notice; per-file failures are
    /// reported inside the [`SubmitReport`].
    pub async fn submit(&self) -> UploadResult<SubmitReport> {
        let (files, stale, generation) = {
            let mut session = self.inner.session.borrow_mut();
            if session.in_flight {
                drop(session);
                log::warn!("⚠️ Submit refused, a batch is still running");
                self.post_notice(NoticeKind::Error, UploadError::Busy.to_string());
                return Err(UploadError::Busy);
            }
            if session.selection.is_empty() {
                drop(session);
                self.post_notice(NoticeKind::Error, UploadError::EmptySelection.to_string());
                return Err(UploadError::EmptySelection);
            }

            session.state = SessionState::Submitting;
            session.in_flight = true;
            session.notices.clear();
            session.outcomes.clear();
            let stale = std::mem::take(&mut session.result_handles);
            let files: Vec<(F, Option<String>)> = session
                .selection
                .iter()
                .map(|s| (s.file.clone(), s.summary.preview_url.clone()))
                .collect();
            (files, stale, session.generation)
        };

        let view = &self.inner.view;
        self.release(&stale);
        view.show_notice(None);
        view.show_results(Vec::new());
        view.set_busy(true);

        let total = files.len();
        let mut outcomes = Vec::with_capacity(total);
        let mut handles = Vec::new();
        let mut last_error: Option<UploadError> = None;

        for (index, (file, original_url)) in files.iter().enumerate() {
            if self.generation() != generation {
                break;
            }

            let file_name = file.name();
            log::info!("📤 Uploading {} ({}/{})", file_name, index + 1, total);

            match self.segment_one(file, &file_name).await {
                Ok(segmented_url) => {
                    log::info!("✅ Segmented {}", file_name);
                    handles.push(segmented_url.clone());
                    outcomes.push(ProcessingOutcome::Success {
                        file_name,
                        original_url: original_url.clone(),
                        segmented_url,
                    });
                }
                Err(err) => {
                    log::error!("❌ {} failed: {}", file_name, err);
                    outcomes.push(ProcessingOutcome::Failure {
                        file_name,
                        message: err.to_string(),
                    });
                    last_error = Some(err);
                    if self.inner.policy == FailurePolicy::AbortBatch {
                        break;
                    }
                }
            }

            if self.inner.policy == FailurePolicy::ContinueOnError && self.generation() == generation {
                view.show_results(outcomes.clone());
            }
        }

        let report = SubmitReport {
            skipped: total - outcomes.len(),
            outcomes,
        };

        let superseded = {
            let mut session = self.inner.session.borrow_mut();
            session.in_flight = false;
            if session.generation != generation {
                true
            } else {
                session.outcomes = report.outcomes.clone();
                session.result_handles = handles.clone();
                session.state = if report.is_complete() {
                    SessionState::Completed
                } else {
                    SessionState::Failed
                };
                false
            }
        };

        view.set_busy(false);

        if superseded {
            log::info!("🔄 Reset during submission, discarding {} outcome(s)", report.outcomes.len());
            self.release(&handles);
            return Ok(report);
        }

        match last_error {
            None => {
                log::info!("🎉 Batch completed: {} image(s)", report.succeeded());
                view.show_results(report.outcomes.clone());
                self.post_notice(
                    NoticeKind::Success,
                    format!(
                        "Water body segmentation completed for {} image(s)!",
                        report.succeeded()
                    ),
                );
                view.scroll_to(ScrollTarget::Results);
            }
            Some(err) if self.inner.policy == FailurePolicy::AbortBatch => {
                if report.skipped > 0 {
                    log::warn!("⏹️ Batch aborted, {} file(s) not sent", report.skipped);
                }
                self.post_notice(NoticeKind::Error, format!("Error: {}", err));
            }
            Some(err) => {
                view.show_results(report.outcomes.clone());
                self.post_notice(
                    NoticeKind::Error,
                    format!(
                        "{} of {} image(s) failed. Last error: {}",
                        report.failed(),
                        total,
                        err
                    ),
                );
                view.scroll_to(ScrollTarget::Results);
            }
        }

        Ok(report)
    }

    fn generation(&self) -> u64 {
        self.inner.session.borrow().generation
    }

    async fn segment_one(&self, file: &F, file_name: &str) -> UploadResult<String> {
        let image = self.inner.client.segment(file).await?;
        self.inner
            .view
            .image_handle(&image)
            .map_err(|message| UploadError::Transport {
                file_name: file_name.to_string(),
                message,
            })
    }

    // =========================================================================
    // Reset
    // =========================================================================

    /// Return the page to its initial empty state.
    ///
    /// A reset during a submission lets the request in flight settle but
    /// sends no further files and renders nothing from that batch.
    pub fn reset(&self) {
        let stale = {
            let mut session = self.inner.session.borrow_mut();
            let mut stale: Vec<String> = std::mem::take(&mut session.selection)
                .into_iter()
                .filter_map(|s| s.summary.preview_url)
                .collect();
            stale.append(&mut session.result_handles);
            session.outcomes.clear();
            session.notices.clear();
            session.state = SessionState::Idle;
            session.generation += 1;
            stale
        };
        self.release(&stale);

        let view = &self.inner.view;
        view.show_selection(Vec::new());
        view.show_results(Vec::new());
        view.show_notice(None);
        view.scroll_to(ScrollTarget::UploadZone);
        log::info!("🔄 Session reset");
    }

    // =========================================================================
    // Notices
    // =========================================================================

    /// Hide success notice `id` if nothing replaced it meanwhile.
    pub fn expire_notice(&self, id: u64) {
        let expired = self.inner.session.borrow_mut().notices.expire(id);
        if expired {
            self.inner.view.show_notice(None);
        }
    }

    fn post_notice(&self, kind: NoticeKind, message: String) {
        let notice = self.inner.session.borrow_mut().notices.post(kind, message);
        let id = notice.id;
        self.inner.view.show_notice(Some(notice));

        if kind.auto_hides() {
            let weak: Weak<Inner<F, C, V>> = Rc::downgrade(&self.inner);
            self.inner.view.schedule(
                Duration::from_millis(u64::from(NOTICE_AUTO_HIDE_MS)),
                Box::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        Orchestrator { inner }.expire_notice(id);
                    }
                }),
            );
        }
    }

    fn release(&self, handles: &[String]) {
        for handle in handles {
            self.inner.view.release_handle(handle);
        }
    }
}
