//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"PII Detection & Mask App"</h1>
            <p class="text-muted">
                "Upload an image to detect and mask personally identifiable information using AI."
            </p>
        </header>
    }
}
