//! Result cards: original next to segmented image, or the failure.

use leptos::*;

use crate::ProcessingOutcome;

#[component]
pub fn ResultsGallery(
    results: RwSignal<Vec<ProcessingOutcome>>,
    anchor: NodeRef<html::Div>,
) -> impl IntoView {
    view! {
        <div class="images-container" class:hidden=move || results.with(|r| r.is_empty()) node_ref=anchor>
            <For
                each=move || results.get().into_iter().enumerate()
                key=|(i, outcome)| (*i, outcome.render_key())
                children=move |(_, outcome)| view! { <ResultCard outcome=outcome/> }
            />
        </div>
    }
}

#[component]
fn ResultCard(outcome: ProcessingOutcome) -> impl IntoView {
    match outcome {
        ProcessingOutcome::Success {
            file_name,
            original_url,
            segmented_url,
        } => view! {
            <div class="result-card">
                <div class="result-title">{file_name.clone()}</div>
                <div class="image-pair">
                    <div class="image-box">
                        <h3>"📷 Original"</h3>
                        {match original_url {
                            Some(url) => view! { <img src=url alt=format!("{} original", file_name)/> }.into_view(),
                            None => view! { <div class="image-missing">"Preview unavailable"</div> }.into_view(),
                        }}
                    </div>
                    <div class="image-box">
                        <h3>"🌊 Segmented"</h3>
                        <img src=segmented_url alt=format!("{} segmented", file_name)/>
                    </div>
                </div>
            </div>
        }
        .into_view(),
        ProcessingOutcome::Failure { file_name, message } => view! {
            <div class="result-card failed">
                <div class="result-title">{file_name}</div>
                <div class="error-message active">{format!("❌ {}", message)}</div>
            </div>
        }
        .into_view(),
    }
}
