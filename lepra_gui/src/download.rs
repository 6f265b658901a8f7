//! Report delivery.
//!
//! Native builds write the PDF straight into the configured report folder,
//! or ask for a location with a save dialog. WASM builds hand the bytes to
//! the browser as a download.
//!
//! Every path resolves to `Ok(Some(location))` when saved, `Ok(None)` when
//! the user cancelled, and `Err(message)` on failure.

use std::path::PathBuf;

use lepra_core::report::{render_report_pdf, ReportData};

/// Render the report and deliver it
pub async fn export_report(
    report: ReportData,
    report_dir: Option<PathBuf>,
) -> Result<Option<String>, String> {
    let filename = report.filename();
    let bytes = render_report_pdf(&report).map_err(|e| {
        tracing::error!(code = e.error_code(), %e, "report generation failed");
        e.user_message()
    })?;

    deliver(&filename, bytes, report_dir).await
}

#[cfg(not(target_arch = "wasm32"))]
async fn deliver(
    filename: &str,
    bytes: Vec<u8>,
    report_dir: Option<PathBuf>,
) -> Result<Option<String>, String> {
    let path = match report_dir {
        Some(dir) => dir.join(filename),
        None => {
            let picked = rfd::AsyncFileDialog::new()
                .set_title("Save Report")
                .set_file_name(filename)
                .add_filter("PDF", &["pdf"])
                .save_file()
                .await;
            match picked {
                Some(handle) => handle.path().to_path_buf(),
                None => return Ok(None),
            }
        }
    };

    let dir = path.parent().map(PathBuf::from).unwrap_or_default();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| filename.to_string());

    lepra_core::file_io::write_report(&dir, &name, &bytes)
        .map(|written| Some(written.display().to_string()))
        .map_err(|e| e.user_message())
}

#[cfg(target_arch = "wasm32")]
async fn deliver(
    filename: &str,
    bytes: Vec<u8>,
    _report_dir: Option<PathBuf>,
) -> Result<Option<String>, String> {
    use wasm_bindgen::JsCast;
    use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

    let array = js_sys::Uint8Array::from(bytes.as_slice());
    let parts = js_sys::Array::new();
    parts.push(&array.buffer());

    let opts = BlobPropertyBag::new();
    opts.set_type("application/pdf");
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
        .map_err(|_| "Failed to create blob".to_string())?;
    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|_| "Unable to create download".to_string())?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("Document unavailable")?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|_| "Unable to create anchor")?
        .dyn_into()
        .map_err(|_| "Anchor cast failed")?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.style().set_property("display", "none").ok();

    let body = document.body().ok_or("Missing body")?;
    body.append_child(&anchor).map_err(|_| "Unable to attach anchor")?;
    anchor.click();
    body.remove_child(&anchor).ok();
    Url::revoke_object_url(&url).ok();

    Ok(Some(filename.to_string()))
}
