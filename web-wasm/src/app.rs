//! メインアプリケーションコンポーネント

use leptos::html::Input;
use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;
use leptos::task::spawn_local;
use pii_mask_common::{DragState, FileMeta, UploadController, DEFAULT_ENDPOINT};
use web_sys::File;

use crate::api::detect;
use crate::components::{
    action_buttons::ActionButtons,
    error_banner::ErrorBanner,
    header::Header,
    result_panel::ResultPanel,
    upload_area::UploadArea,
};
use crate::reader::read_preview;

/// アップロード状態（`web_sys::File` を持つのでスレッドローカル）
pub type ControllerSignal = RwSignal<UploadController<File>, LocalStorage>;

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let controller: ControllerSignal = RwSignal::new_local(UploadController::new());
    let drag = RwSignal::new(DragState::default());
    let input_ref = NodeRef::<Input>::new();

    // ファイル選択/ドロップ
    let on_file_selected = move |file: File| select_file(controller, file);

    // アップロード
    let on_upload = move |_: ()| start_upload(controller);

    // リセット
    let on_reset = move |_: ()| {
        controller.update(|c| c.reset());
        release_results(controller);
        // 同じファイルを再選択できるように
        if let Some(input) = input_ref.get_untracked() {
            input.set_value("");
        }
    };

    view! {
        <div class="container">
            <Header />

            <UploadArea
                controller=controller
                drag=drag
                input_ref=input_ref
                on_file_selected=on_file_selected
            />

            <ErrorBanner controller=controller />

            <ActionButtons
                controller=controller
                on_upload=on_upload
                on_reset=on_reset
            />

            <ResultPanel controller=controller />
        </div>
    }
}

/// 同期バリデーション → プレビュー読み込み → 選択確定
fn select_file(controller: ControllerSignal, file: File) {
    let meta = FileMeta::new(file.name(), file.type_(), file.size() as u64);
    let Some(Ok(ticket)) = controller.try_update(|c| c.begin_select(&meta)) else {
        return;
    };

    read_preview(file, move |outcome| {
        controller.update(|c| {
            match outcome {
                Ok((file, data_uri)) => c.finish_select(ticket, file, data_uri),
                Err(message) => c.fail_select(ticket, message),
            };
        });
        release_results(controller);
    });
}

/// 送信中でなければ1回だけPOSTする。完了時に世代が古ければ結果は捨てられる
fn start_upload(controller: ControllerSignal) {
    let Some(ticket) = controller.try_update(|c| c.begin_upload()).flatten() else {
        return;
    };

    spawn_local(async move {
        let outcome = detect::upload_image(DEFAULT_ENDPOINT, &ticket.file).await;
        if let Err(e) = &outcome {
            gloo::console::warn!(e.to_string());
        }
        controller.update(|c| {
            c.finish_upload(ticket.generation, outcome);
        });
        release_results(controller);
    });
}

/// 表示されなくなったObject URLを解放
fn release_results(controller: ControllerSignal) {
    let released = controller
        .try_update_untracked(|c| c.drain_released())
        .unwrap_or_default();
    for uri in released {
        detect::revoke(&uri);
    }
}
