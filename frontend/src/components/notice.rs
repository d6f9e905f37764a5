//! Success and error notices.

use leptos::*;

use crate::orchestrator::{Notice, NoticeKind};

#[component]
pub fn NoticeBar(notice: RwSignal<Option<Notice>>) -> impl IntoView {
    let text_for = move |kind: NoticeKind| {
        notice.with(|n| match n {
            Some(n) if n.kind == kind => n.text(),
            _ => String::new(),
        })
    };
    let is_active = move |kind: NoticeKind| notice.with(|n| n.as_ref().is_some_and(|n| n.kind == kind));

    view! {
        <div
            class=NoticeKind::Error.css_class()
            class:active=move || is_active(NoticeKind::Error)
            id="errorMsg"
        >
            {move || text_for(NoticeKind::Error)}
        </div>
        <div
            class=NoticeKind::Success.css_class()
            class:active=move || is_active(NoticeKind::Success)
            id="successMsg"
        >
            {move || text_for(NoticeKind::Success)}
        </div>
    }
}
