//! Submit / reset buttons with the busy indicator.

use leptos::*;

#[component]
pub fn Controls(
    busy: RwSignal<bool>,
    /// Controls show once something is selected
    #[prop(into)]
    visible: Signal<bool>,
    on_submit: Callback<()>,
    on_reset: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="buttons-container" class:hidden=move || !visible.get()>
            <button
                class="process-btn"
                id="processBtn"
                disabled=move || busy.get()
                on:click=move |_| on_submit.call(())
            >
                "🔍 Segment Water Bodies"
            </button>
            <button class="reset-btn" id="resetBtn" on:click=move |_| on_reset.call(())>
                "🔄 Reset"
            </button>
        </div>

        <div class="loading" class:active=move || busy.get()>
            <div class="spinner"></div>
            <p>"Processing images... This may take a moment."</p>
        </div>
    }
}
