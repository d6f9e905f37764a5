//! Hero section component

use leptos::*;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>"🌊 Water Body Segmentation"</h1>
            <p class="subtitle">
                "Upload satellite or aerial images to detect and highlight water bodies. "
                "Each image is processed separately and shown next to its segmentation."
            </p>
        </div>
    }
}
