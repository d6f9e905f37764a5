//! Image picker with drag & drop support.
//!
//! Hands every picked or dropped file to `on_select`; validation happens
//! in the orchestrator.

use leptos::*;
use web_sys::{DragEvent, Event, File, FileList, HtmlInputElement};

use crate::ACCEPTED_MIME_TYPES;

/// Collect the files of a `FileList`, in order.
fn files_from(list: Option<FileList>) -> Vec<File> {
    list.map(|list| (0..list.length()).filter_map(|i| list.get(i)).collect())
        .unwrap_or_default()
}

#[component]
pub fn UploadZone(
    /// Receives the picked or dropped files
    on_select: Callback<Vec<File>>,
    /// Ignore input while a submission runs
    busy: RwSignal<bool>,
    /// Scroll target for resets
    zone_ref: NodeRef<html::Div>,
) -> impl IntoView {
    let (is_dragover, set_is_dragover) = create_signal(false);
    let input_ref = create_node_ref::<html::Input>();

    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        let files = files_from(input.files());
        // Allow picking the same file again after a reset
        input.set_value("");
        if !files.is_empty() {
            on_select.call(files);
        }
    };

    let trigger_file_input = move |_| {
        if busy.get_untracked() {
            return;
        }
        if let Some(input) = input_ref.get_untracked() {
            input.click();
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(true);
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(false);
        if busy.get_untracked() {
            return;
        }
        let files = files_from(ev.data_transfer().and_then(|dt| dt.files()));
        if !files.is_empty() {
            on_select.call(files);
        }
    };

    view! {
        <div
            class="upload-area"
            class:dragover=move || is_dragover.get()
            id="uploadArea"
            node_ref=zone_ref
            on:click=trigger_file_input
            on:dragover=on_dragover
            on:dragleave=on_dragleave
            on:drop=on_drop
        >
            <div class="upload-icon">"📤"</div>
            <div class="upload-text">"Drag & drop images here"</div>
            <div class="upload-hint">"or click to browse"</div>
            <div class="upload-hint">"Supported formats: JPG, PNG, TIFF (max 500MB each)"</div>

            <input
                type="file"
                id="fileInput"
                accept=ACCEPTED_MIME_TYPES.join(",")
                multiple=true
                style="display:none"
                node_ref=input_ref
                on:change=on_file_change
                on:click=|ev| ev.stop_propagation()
            />
        </div>
    }
}
