//! JavaScript-exposed archive builder.

use js_sys::{Function, Uint8Array};
use wasm_bindgen::prelude::*;

use super::to_js_error;
use crate::progress::StatusEvent;
use crate::{
    ArchiveEntry, ArchiveFormat, ArchiveOptions, ArchiveOutput, ArchivePath, ArchiveRequest,
    EncryptionEngine, StatusLog, create_archive,
};

/// An initialized encryption engine held by JavaScript.
#[wasm_bindgen]
#[derive(Clone)]
pub struct WasmEncryptionEngine {
    inner: EncryptionEngine,
}

impl From<EncryptionEngine> for WasmEncryptionEngine {
    fn from(inner: EncryptionEngine) -> Self {
        Self { inner }
    }
}

/// The finished archive.
#[wasm_bindgen]
pub struct WasmArchiveOutput {
    output: ArchiveOutput,
}

#[wasm_bindgen]
impl WasmArchiveOutput {
    /// Archive content.
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Uint8Array {
        Uint8Array::from(self.output.bytes.as_slice())
    }

    /// Suggested download name, e.g. `photos.zip`.
    #[wasm_bindgen(getter, js_name = "fileName")]
    pub fn file_name(&self) -> String {
        self.output.suggested_file_name.clone()
    }

    /// MIME type for the download.
    #[wasm_bindgen(getter, js_name = "mimeType")]
    pub fn mime_type(&self) -> String {
        self.output.mime_type().to_string()
    }

    /// Number of entries written.
    #[wasm_bindgen(getter, js_name = "entriesWritten")]
    pub fn entries_written(&self) -> usize {
        self.output.entries_written
    }
}

/// Collects files and options, then builds the archive.
///
/// # JavaScript Example
///
/// ```javascript
/// const builder = new WasmArchiveBuilder('tar.gz', 'backup');
/// builder.level = 9;
/// builder.addFile('notes/a.txt', bytesA);
/// builder.addFile('b.txt', bytesB);
/// builder.renameEntry(1, 'notes/b.txt');
///
/// try {
///     const output = builder.create();
/// } catch (e) {
///     if (e.code === 'processing_failed') { showFailedEntry(builder.entryStatuses()); }
/// }
/// ```
#[wasm_bindgen]
pub struct WasmArchiveBuilder {
    request: ArchiveRequest,
    password: Option<String>,
    level: u8,
    engine: Option<EncryptionEngine>,
}

#[wasm_bindgen]
impl WasmArchiveBuilder {
    /// Create a builder.
    ///
    /// @param format - "zip", "tar" or "tar.gz"
    /// @param outputName - File name without extension
    /// @throws Error with code `invalid_input` for an unknown format
    #[wasm_bindgen(constructor)]
    pub fn new(format: &str, output_name: &str) -> Result<WasmArchiveBuilder, JsValue> {
        let format: ArchiveFormat = format.parse().map_err(|e| to_js_error(&e))?;
        Ok(Self {
            request: ArchiveRequest::new(format, output_name),
            password: None,
            level: 6,
            engine: None,
        })
    }

    /// Add a file from a Uint8Array.
    ///
    /// @param path - Path within the archive, `/` separated
    /// @param data - File content
    /// @throws Error with code `invalid_input` for an invalid path
    #[wasm_bindgen(js_name = "addFile")]
    pub fn add_file(&mut self, path: &str, data: Uint8Array) -> Result<(), JsValue> {
        let entry = ArchiveEntry::from_bytes(path, data.to_vec()).map_err(|e| to_js_error(&e))?;
        self.request.push(entry);
        Ok(())
    }

    /// Change the archive path of entry `index`.
    #[wasm_bindgen(js_name = "renameEntry")]
    pub fn rename_entry(&mut self, index: usize, path: &str) -> Result<(), JsValue> {
        let path = ArchivePath::new(path).map_err(|e| to_js_error(&e))?;
        let entry = self
            .request
            .entries_mut()
            .get_mut(index)
            .ok_or_else(|| JsValue::from_str("entry index out of range"))?;
        entry.set_path(path);
        Ok(())
    }

    /// Remove entry `index`.
    #[wasm_bindgen(js_name = "removeEntry")]
    pub fn remove_entry(&mut self, index: usize) -> bool {
        let entries = self.request.entries_mut();
        if index < entries.len() {
            entries.remove(index);
            true
        } else {
            false
        }
    }

    /// Get the number of entries.
    #[wasm_bindgen(getter, js_name = "entryCount")]
    pub fn entry_count(&self) -> usize {
        self.request.entries().len()
    }

    /// Current status of every entry, as strings.
    #[wasm_bindgen(js_name = "entryStatuses")]
    pub fn entry_statuses(&self) -> js_sys::Array {
        self.request
            .entries()
            .iter()
            .map(|e| JsValue::from_str(e.status().as_str()))
            .collect()
    }

    /// Change the format ("zip", "tar", "tar.gz").
    ///
    /// @throws Error with code `invalid_input` for an unknown format
    #[wasm_bindgen(js_name = "setFormat")]
    pub fn set_format(&mut self, format: &str) -> Result<(), JsValue> {
        let format: ArchiveFormat = format.parse().map_err(|e| to_js_error(&e))?;
        self.request.set_format(format);
        Ok(())
    }

    /// Get the format.
    #[wasm_bindgen(getter)]
    pub fn format(&self) -> String {
        self.request.format().to_string()
    }

    /// Set compression level (0-9, higher values are clamped).
    #[wasm_bindgen(setter)]
    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(9);
    }

    /// Get compression level.
    #[wasm_bindgen(getter)]
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Set password for ZIP encryption.
    #[wasm_bindgen(setter)]
    pub fn set_password(&mut self, password: Option<String>) {
        self.password = password;
    }

    /// Set the output name (without extension).
    #[wasm_bindgen(setter, js_name = "outputName")]
    pub fn set_output_name(&mut self, name: String) {
        self.request.set_output_name(name);
    }

    /// Get the output name.
    #[wasm_bindgen(getter, js_name = "outputName")]
    pub fn output_name(&self) -> String {
        self.request.output_name().to_string()
    }

    /// Provide the engine resolved by `preloadEncryption()`.
    #[wasm_bindgen(js_name = "setEncryptionEngine")]
    pub fn set_encryption_engine(&mut self, engine: &WasmEncryptionEngine) {
        self.engine = Some(engine.inner.clone());
    }

    /// Build the archive.
    ///
    /// `onStatus(index, path, status, progress)` receives every status
    /// transition in order. The call is synchronous, so the transitions are
    /// delivered as soon as the run ends, before the result is returned or
    /// the error thrown. If the callback throws, the remaining transitions
    /// are skipped and the archive result is still returned.
    ///
    /// @throws Error with a `code` property
    #[wasm_bindgen]
    pub fn create(&mut self, on_status: Option<Function>) -> Result<WasmArchiveOutput, JsValue> {
        let mut options = ArchiveOptions::new().level_clamped(u32::from(self.level));
        if let Some(password) = &self.password {
            options = options.password(password.as_str());
        }
        let mut request = self.request.clone().options(options);

        let mut log = StatusLog::new();
        let result = create_archive(&mut request, &mut log, self.engine.as_ref());
        self.request = request;

        if let Some(callback) = on_status {
            if let Err(thrown) = replay(&log, &callback) {
                log::warn!("onStatus callback threw: {:?}", thrown);
            }
        }

        result
            .map(|output| WasmArchiveOutput { output })
            .map_err(|e| to_js_error(&e))
    }
}

fn replay(log: &StatusLog, callback: &Function) -> Result<(), JsValue> {
    for event in log.events() {
        if let StatusEvent::Status {
            index,
            path,
            status,
            progress,
        } = event
        {
            let args = js_sys::Array::of4(
                &JsValue::from(*index as u32),
                &JsValue::from_str(path.as_str()),
                &JsValue::from_str(status.as_str()),
                &JsValue::from(*progress),
            );
            callback.apply(&JsValue::NULL, &args)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    fn builder(format: &str) -> WasmArchiveBuilder {
        let mut builder = WasmArchiveBuilder::new(format, "t").unwrap();
        builder
            .add_file("a.txt", Uint8Array::from(b"hello".as_slice()))
            .unwrap();
        builder
    }

    #[wasm_bindgen_test]
    fn test_throwing_callback_keeps_result() {
        let callback = Function::new_with_args(
            "index, path, status, progress",
            "throw new Error('boom')",
        );
        let output = builder("tar").create(Some(callback)).unwrap();
        assert_eq!(output.file_name(), "t.tar");
        assert_eq!(output.entries_written(), 1);
    }
}
