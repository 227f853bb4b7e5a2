//! FileReaderによるプレビュー生成

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{File, FileReader, ProgressEvent};

pub const READ_FAILED_MESSAGE: &str = "Could not read the selected file.";

/// `readAsDataURL` でData URIを読み、完了時に一度だけ `on_done` を呼ぶ
pub fn read_preview<F>(file: File, on_done: F)
where
    F: FnOnce(Result<(File, String), String>) + 'static,
{
    let reader = match FileReader::new() {
        Ok(reader) => reader,
        Err(_) => {
            on_done(Err(READ_FAILED_MESSAGE.to_string()));
            return;
        }
    };

    let on_done = Rc::new(RefCell::new(Some(on_done)));

    let onload = {
        let on_done = on_done.clone();
        let reader = reader.clone();
        let file = file.clone();
        Closure::wrap(Box::new(move |_: ProgressEvent| {
            let callback = on_done.borrow_mut().take();
            let Some(callback) = callback else {
                return;
            };
            match reader.result().ok().and_then(|r| r.as_string()) {
                Some(data_uri) => callback(Ok((file.clone(), data_uri))),
                None => callback(Err(READ_FAILED_MESSAGE.to_string())),
            }
        }) as Box<dyn FnMut(_)>)
    };

    let onerror = {
        let on_done = on_done.clone();
        Closure::wrap(Box::new(move |_: ProgressEvent| {
            let callback = on_done.borrow_mut().take();
            if let Some(callback) = callback {
                callback(Err(READ_FAILED_MESSAGE.to_string()));
            }
        }) as Box<dyn FnMut(_)>)
    };

    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onload.forget();
    onerror.forget();

    if reader.read_as_data_url(&file).is_err() {
        let callback = on_done.borrow_mut().take();
        if let Some(callback) = callback {
            callback(Err(READ_FAILED_MESSAGE.to_string()));
        }
    }
}
