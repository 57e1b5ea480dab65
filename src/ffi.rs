//! FFI interface for C/C++ callers
//!
//! Requests and results cross the boundary as JSON strings.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use serde::{Deserialize, Serialize};

use crate::client::{
    AppPageRequest, AppRequest, AppStore, DeveloperRequest, ReviewsRequest, SearchRequest,
    SuggestRequest,
};
use crate::config::ClientConfig;
use crate::extractors::{
    extract_privacy, extract_ratings, extract_screenshots, extract_version_history, MarkupVersion,
};
use crate::transport::{Transport, UreqTransport};

/// One operation, tagged by its name.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum Operation {
    App(AppRequest),
    Search(SearchRequest),
    Ratings(AppPageRequest),
    VersionHistory(AppPageRequest),
    Privacy(AppPageRequest),
    Suggest(SuggestRequest),
    Developer(DeveloperRequest),
    Reviews(ReviewsRequest),
}

/// Top-level request accepted by [`appstore_call`].
#[derive(Debug, Clone, Deserialize)]
pub struct CallRequest {
    #[serde(default)]
    pub config: ClientConfig,
    pub call: Operation,
}

/// Result struct returned to C
/// Both pointers are owned by Rust and must be freed via appstore_free_result
#[repr(C)]
pub struct AppStoreResultFFI {
    /// JSON-serialized result (null-terminated)
    pub json_ptr: *mut c_char,
    /// Error message if the call failed (null-terminated), or null on success
    pub error_ptr: *mut c_char,
}

fn to_json<S: Serialize>(result: crate::Result<S>) -> Result<String, String> {
    let value = result.map_err(|e| e.to_string())?;
    serde_json::to_string(&value).map_err(|e| format!("Failed to serialize result: {}", e))
}

/// Run one operation against `store` and serialize its result.
pub fn dispatch<T: Transport>(
    store: &AppStore<T>,
    operation: &Operation,
) -> Result<String, String> {
    match operation {
        Operation::App(req) => to_json(store.app(req)),
        Operation::Search(req) => to_json(store.search(req)),
        Operation::Ratings(req) => to_json(store.ratings(req)),
        Operation::VersionHistory(req) => to_json(store.version_history(req)),
        Operation::Privacy(req) => to_json(store.privacy(req)),
        Operation::Suggest(req) => to_json(store.suggest(req)),
        Operation::Developer(req) => to_json(store.developer(req)),
        Operation::Reviews(req) => to_json(store.reviews(req)),
    }
}

/// Run one offline extractor over an HTML document.
pub fn extract(html: &str, target: &str, version: MarkupVersion) -> Result<String, String> {
    let json = match target {
        "ratings" => serde_json::to_string(&extract_ratings(html, version)),
        "screenshots" => serde_json::to_string(&extract_screenshots(html, version)),
        "versionHistory" => serde_json::to_string(&extract_version_history(html, version)),
        "privacy" => serde_json::to_string(&extract_privacy(html, version)),
        other => return Err(format!("Unknown extraction target: {}", other)),
    };
    json.map_err(|e| format!("Failed to serialize result: {}", e))
}

/// Execute a catalog operation described by a JSON [`CallRequest`].
///
/// # Safety
/// - `request_json` must be a valid null-terminated C string
/// - Caller must free the result via `appstore_free_result`
#[no_mangle]
pub unsafe extern "C" fn appstore_call(request_json: *const c_char) -> AppStoreResultFFI {
    let request_str = if request_json.is_null() {
        return make_error_result("Request JSON is null");
    } else {
        match CStr::from_ptr(request_json).to_str() {
            Ok(s) => s,
            Err(_) => return make_error_result("Invalid UTF-8 in request JSON"),
        }
    };

    let request: CallRequest = match serde_json::from_str(request_str) {
        Ok(r) => r,
        Err(e) => {
            return make_error_result(&format!("Failed to parse request JSON: {}", e));
        }
    };

    let store: AppStore<UreqTransport> = AppStore::with_config(request.config);
    make_result(dispatch(&store, &request.call))
}

/// Extract one target ("ratings", "screenshots", "versionHistory", "privacy")
/// from HTML without any network access.
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes
/// - `target` must be a valid null-terminated C string
/// - `markup` may be null (current markup) or a null-terminated "current"/"legacy"
#[no_mangle]
pub unsafe extern "C" fn appstore_extract(
    html_ptr: *const c_char,
    html_len: usize,
    target: *const c_char,
    markup: *const c_char,
) -> AppStoreResultFFI {
    let html = if html_ptr.is_null() || html_len == 0 {
        String::new()
    } else {
        let slice = std::slice::from_raw_parts(html_ptr as *const u8, html_len);
        match std::str::from_utf8(slice) {
            Ok(s) => s.to_string(),
            Err(_) => return make_error_result("Invalid UTF-8 in HTML"),
        }
    };

    let target = if target.is_null() {
        return make_error_result("Target is null");
    } else {
        match CStr::from_ptr(target).to_str() {
            Ok(s) => s,
            Err(_) => return make_error_result("Invalid UTF-8 in target"),
        }
    };

    let version = if markup.is_null() {
        MarkupVersion::default()
    } else {
        let name = match CStr::from_ptr(markup).to_str() {
            Ok(s) => s,
            Err(_) => return make_error_result("Invalid UTF-8 in markup"),
        };
        match serde_json::from_value(serde_json::Value::String(name.to_string())) {
            Ok(v) => v,
            Err(_) => return make_error_result(&format!("Unknown markup version: {}", name)),
        }
    };

    make_result(extract(&html, target, version))
}

/// Free an AppStoreResultFFI returned by this library
///
/// # Safety
/// - `result` must have been returned by `appstore_call` or `appstore_extract`
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn appstore_free_result(result: AppStoreResultFFI) {
    if !result.json_ptr.is_null() {
        drop(CString::from_raw(result.json_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

fn make_result(result: Result<String, String>) -> AppStoreResultFFI {
    match result {
        Ok(json) => match CString::new(json) {
            Ok(cstr) => AppStoreResultFFI {
                json_ptr: cstr.into_raw(),
                error_ptr: ptr::null_mut(),
            },
            Err(_) => make_error_result("Result JSON contains null bytes"),
        },
        Err(msg) => make_error_result(&msg),
    }
}

// Helper to create error result
fn make_error_result(msg: &str) -> AppStoreResultFFI {
    let error_cstr = CString::new(msg.replace('\0', " ")).unwrap_or_default();
    AppStoreResultFFI {
        json_ptr: ptr::null_mut(),
        error_ptr: error_cstr.into_raw(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::fake::FakeTransport;

    #[test]
    fn test_operation_from_json() {
        let request: CallRequest = serde_json::from_str(
            r#"{"config": {"defaultCountry": "fr"}, "call": {"operation": "search", "term": "chess", "num": 5, "idsOnly": true}}"#,
        )
        .unwrap();

        assert_eq!(request.config.default_country, "fr");
        match request.call {
            Operation::Search(req) => {
                assert_eq!(req.term, "chess");
                assert_eq!(req.num, Some(5));
                assert!(req.ids_only);
            }
            other => panic!("unexpected operation {:?}", other),
        }

        let request: CallRequest =
            serde_json::from_str(r#"{"call": {"operation": "versionHistory", "id": 12}}"#).unwrap();
        assert!(matches!(
            request.call,
            Operation::VersionHistory(AppPageRequest { id: Some(12), .. })
        ));
    }

    #[test]
    fn test_dispatch_reports_errors_as_messages() {
        let store = AppStore::with_transport(FakeTransport::new(), ClientConfig::default());
        let err = dispatch(&store, &Operation::App(AppRequest::default())).unwrap_err();
        assert!(err.contains("either id or appId is required"));
    }

    #[test]
    fn test_dispatch_serializes_result() {
        let transport = FakeTransport::new().route(
            "https://search.itunes.apple.com/",
            "<plist><dict><array><dict><string>chess</string></dict></array></dict></plist>",
        );
        let store = AppStore::with_transport(transport, ClientConfig::default());

        let op = Operation::Suggest(SuggestRequest {
            term: "che".to_string(),
            ..Default::default()
        });
        assert_eq!(dispatch(&store, &op).unwrap(), r#"[{"term":"chess"}]"#);
    }

    #[test]
    fn test_extract_targets() {
        let html = r#"<div class="rating-count">2</div>"#;
        let json = extract(html, "ratings", MarkupVersion::Current).unwrap();
        assert_eq!(json, r#"{"ratings":2,"histogram":{"1":0,"2":0,"3":0,"4":0,"5":0}}"#);

        assert_eq!(extract("", "privacy", MarkupVersion::Current).unwrap(), "{}");
        assert!(extract("", "reviews", MarkupVersion::Current).is_err());
    }

    #[test]
    fn test_ffi_extract_roundtrip() {
        let html = "<dialog><article><h4>3.0</h4></article></dialog>";
        let target = CString::new("versionHistory").unwrap();

        unsafe {
            let result = appstore_extract(
                html.as_ptr() as *const c_char,
                html.len(),
                target.as_ptr(),
                ptr::null(),
            );
            assert!(result.error_ptr.is_null());
            let json = CStr::from_ptr(result.json_ptr).to_str().unwrap().to_string();
            appstore_free_result(result);
            assert_eq!(json, r#"[{"versionDisplay":"3.0","releaseDate":""}]"#);
        }
    }

    #[test]
    fn test_ffi_call_rejects_bad_json() {
        let request = CString::new("{not json").unwrap();
        unsafe {
            let result = appstore_call(request.as_ptr());
            assert!(result.json_ptr.is_null());
            let msg = CStr::from_ptr(result.error_ptr).to_str().unwrap().to_string();
            appstore_free_result(result);
            assert!(msg.starts_with("Failed to parse request JSON"));
        }
    }

    #[test]
    fn test_ffi_call_validates_before_network() {
        let request = CString::new(r#"{"call": {"operation": "ratings"}}"#).unwrap();
        unsafe {
            let result = appstore_call(request.as_ptr());
            let msg = CStr::from_ptr(result.error_ptr).to_str().unwrap().to_string();
            appstore_free_result(result);
            assert_eq!(msg, "invalid input: id is required");
        }
    }
}
