//! Selected images awaiting submission.

use leptos::*;

use crate::FileSummary;

#[component]
pub fn FileList(
    files: RwSignal<Vec<FileSummary>>,
    anchor: NodeRef<html::Div>,
) -> impl IntoView {
    view! {
        <div class="file-list" class:hidden=move || files.with(|f| f.is_empty()) node_ref=anchor>
            <div class="file-list-header">
                {move || format!("📁 Selected images ({})", files.with(|f| f.len()))}
            </div>
            <For
                each=move || files.get().into_iter().enumerate()
                key=|(i, file)| (*i, file.name.clone(), file.preview_url.clone())
                children=move |(_, file)| {
                    let size = file.formatted_size();
                    view! {
                        <div class="file-item">
                            {file.preview_url.clone().map(|url| view! {
                                <img class="file-thumb" src=url alt=file.name.clone()/>
                            })}
                            <span class="file-name">{file.name.clone()}</span>
                            <span class="file-size">{size}</span>
                        </div>
                    }
                }
            />
        </div>
    }
}
