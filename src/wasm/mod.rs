//! WASM/Browser support for packsmith
//!
//! This module provides WebAssembly bindings so a web page can build
//! archives entirely in the browser.
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import { WasmArchiveBuilder, preloadEncryption } from 'packsmith';
//!
//! const engine = await preloadEncryption();
//!
//! const builder = new WasmArchiveBuilder('zip', 'photos');
//! builder.level = 6;
//! builder.password = 'secret';
//! builder.setEncryptionEngine(engine);
//! builder.addFile('a.txt', new TextEncoder().encode('hello'));
//!
//! const output = builder.create((index, path, status, progress) => {
//!     console.log(index, path, status, progress);
//! });
//! downloadBlob(output.bytes, output.fileName, output.mimeType);
//! ```
//!
//! Errors are thrown as JavaScript `Error` objects with a `code` property
//! (`invalid_input`, `processing_failed`, `engine_not_ready`, `cancelled`).

mod builder;

pub use builder::{WasmArchiveBuilder, WasmArchiveOutput, WasmEncryptionEngine};

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::{ArchiveFormat, EncryptionEngine, Error};

/// Get the library version
#[wasm_bindgen(js_name = "getVersion")]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// List the supported formats with their capabilities.
///
/// @returns Array of `{ name, extension, compression, encryption }`
#[wasm_bindgen(js_name = "supportedFormats")]
pub fn supported_formats() -> js_sys::Array {
    let list = js_sys::Array::new();
    for format in ArchiveFormat::ALL {
        let caps = format.capabilities();
        let obj = js_sys::Object::new();
        let _ = js_sys::Reflect::set(&obj, &"name".into(), &format.name().into());
        let _ = js_sys::Reflect::set(&obj, &"extension".into(), &format.extension().into());
        let _ = js_sys::Reflect::set(&obj, &"compression".into(), &caps.compression.into());
        let _ = js_sys::Reflect::set(&obj, &"encryption".into(), &caps.encryption.into());
        list.push(&obj);
    }
    list
}

/// Run the encryption self-check and resolve to an engine.
///
/// Call this early (e.g. when the password field is shown) and hand the
/// engine to `WasmArchiveBuilder.setEncryptionEngine`.
///
/// @returns A Promise that resolves to a WasmEncryptionEngine
#[wasm_bindgen(js_name = "preloadEncryption")]
pub fn preload_encryption() -> Promise {
    future_to_promise(async move {
        EncryptionEngine::initialize()
            .map(|engine| JsValue::from(WasmEncryptionEngine::from(engine)))
            .map_err(|e| to_js_error(&e))
    })
}

/// Converts an error into a JS `Error` carrying its code.
pub(crate) fn to_js_error(error: &Error) -> JsValue {
    let js_error = js_sys::Error::new(&error.to_string());
    let _ = js_sys::Reflect::set(
        &js_error,
        &JsValue::from_str("code"),
        &JsValue::from_str(error.code().as_str()),
    );
    js_error.into()
}
