//! アクションボタンコンポーネント

use leptos::prelude::*;
use crate::app::ControllerSignal;

#[component]
pub fn ActionButtons<FU, FR>(
    controller: ControllerSignal,
    on_upload: FU,
    on_reset: FR,
) -> impl IntoView
where
    FU: Fn(()) + 'static + Clone + Send + Sync,
    FR: Fn(()) + 'static + Clone + Send + Sync,
{
    let is_uploading = move || controller.with(|c| c.state().is_uploading);
    let has_file = move || controller.with(|c| c.state().selected_file.is_some());

    view! {
        <div class="action-buttons">
            <button
                class="btn btn-primary"
                disabled=move || !controller.with(|c| c.can_upload())
                on:click={
                    let on_upload = on_upload.clone();
                    move |_| on_upload(())
                }
            >
                {move || if is_uploading() { "Uploading..." } else { "Detect PII" }}
            </button>

            <Show when=has_file>
                <button
                    class="btn btn-secondary"
                    on:click={
                        let on_reset = on_reset.clone();
                        move |_| on_reset(())
                    }
                >
                    "Reset"
                </button>
            </Show>
        </div>
    }
}
