//! マスク済み画像の表示とダウンロード

use leptos::prelude::*;
use pii_mask_common::DOWNLOAD_FILE_NAME;
use crate::app::ControllerSignal;

#[component]
pub fn ResultPanel(controller: ControllerSignal) -> impl IntoView {
    let result = move || controller.with(|c| c.state().result_uri.clone());

    view! {
        <Show when=move || result().is_some()>
            <div class="result-panel">
                <h2 class="result-title">"Masked Image"</h2>
                <img class="result-image" src=result alt="Masked" />
                <a class="btn btn-success" href=result download=DOWNLOAD_FILE_NAME>
                    "Download Masked Image"
                </a>
            </div>
        </Show>
    }
}
