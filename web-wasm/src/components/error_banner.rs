//! エラーバナー
//!
//! バリデーションエラーと通信エラーを同じ見た目で表示する。

use leptos::prelude::*;
use crate::app::ControllerSignal;

#[component]
pub fn ErrorBanner(controller: ControllerSignal) -> impl IntoView {
    let error = move || controller.with(|c| c.state().error_message.clone());

    view! {
        <Show when=move || error().is_some()>
            <div class="error-banner" role="alert">
                <span class="error-icon">"⚠"</span>
                {move || error().unwrap_or_default()}
            </div>
        </Show>
    }
}
