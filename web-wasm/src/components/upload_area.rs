//! アップロードエリアコンポーネント
//!
//! クリックでファイル選択、またはドラッグ&ドロップ。選択済みならプレビューを表示。

use leptos::html::Input;
use leptos::prelude::*;
use pii_mask_common::DragState;
use web_sys::{DragEvent, File};
use crate::app::ControllerSignal;

#[component]
pub fn UploadArea<F>(
    controller: ControllerSignal,
    drag: RwSignal<DragState>,
    input_ref: NodeRef<Input>,
    on_file_selected: F,
) -> impl IntoView
where
    F: Fn(File) + 'static + Clone + Send + Sync,
{
    let preview = move || controller.with(|c| c.state().preview_data_uri.clone());

    let on_drop = {
        let on_file_selected = on_file_selected.clone();
        move |ev: DragEvent| {
            ev.prevent_default();
            drag.update(|d| d.dropped());

            // 先頭の1枚だけ
            if let Some(file) = ev
                .data_transfer()
                .and_then(|dt| dt.files())
                .and_then(|files| files.get(0))
            {
                on_file_selected(file);
            }
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        drag.update(|d| d.over());
    };

    let on_dragenter = move |ev: DragEvent| {
        ev.prevent_default();
        drag.update(|d| d.over());
    };

    let on_dragleave = move |ev: DragEvent| {
        ev.prevent_default();
        drag.update(|d| d.leave());
    };

    // ファイル選択ダイアログを開く
    let on_click = move |_| {
        if let Some(input) = input_ref.get_untracked() {
            input.click();
        }
    };

    let on_change = {
        let on_file_selected = on_file_selected.clone();
        move |_| {
            if let Some(file) = input_ref
                .get_untracked()
                .and_then(|input| input.files())
                .and_then(|files| files.get(0))
            {
                on_file_selected(file);
            }
        }
    };

    view! {
        <div
            class=move || {
                if drag.with(|d| d.is_over()) {
                    "upload-area dragover"
                } else {
                    "upload-area"
                }
            }
            on:drop=on_drop
            on:dragover=on_dragover
            on:dragenter=on_dragenter
            on:dragleave=on_dragleave
            on:click=on_click
        >
            <input
                node_ref=input_ref
                type="file"
                accept="image/*"
                class="hidden"
                on:click=|ev| ev.stop_propagation()
                on:change=on_change
            />
            <Show
                when=move || preview().is_some()
                fallback=|| view! {
                    <div class="upload-icon">"📷"</div>
                    <p>"Drag & drop an image here, or click to select"</p>
                    <p class="text-muted">"JPG, PNG, WEBP (max 10MB)"</p>
                }
            >
                <img class="preview" src=preview alt="Preview" />
            </Show>
        </div>
    }
}
