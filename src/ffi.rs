//! FFI bindings for Deskcore
//!
//! C-compatible functions for calling the engine from the host app. All
//! functions use C strings (null-terminated) and return allocated memory that
//! must be freed by the caller using `deskcore_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use chrono::NaiveDate;

use crate::analysis::generate_report;
use crate::daily::generate_insights;
use crate::types::{PlanInfo, ProfileSnapshot, ProgressSummary};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Generate an analysis report from a profile JSON.
///
/// # Safety
/// - `profile_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with
///   `deskcore_free_string`.
/// - Returns NULL on error; call `deskcore_last_error` for the message.
#[no_mangle]
pub unsafe extern "C" fn deskcore_analyze_profile(profile_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json = match cstr_to_string(profile_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid profile JSON pointer");
            return ptr::null_mut();
        }
    };

    let profile: ProfileSnapshot = match serde_json::from_str(&json) {
        Ok(p) => p,
        Err(e) => {
            set_last_error(&format!("Failed to parse profile: {e}"));
            return ptr::null_mut();
        }
    };

    let report = generate_report(&profile);
    match serde_json::to_string(&report) {
        Ok(out) => string_to_cstr(&out),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Generate today's daily insights.
///
/// `profile_json`, `summary_json`, and `plan_json` may be NULL to omit that
/// input. `date` is the calendar day in `YYYY-MM-DD` form.
///
/// # Safety
/// - Non-NULL pointers must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with
///   `deskcore_free_string`.
/// - Returns NULL on error; call `deskcore_last_error` for the message.
#[no_mangle]
pub unsafe extern "C" fn deskcore_daily_insights(
    profile_json: *const c_char,
    summary_json: *const c_char,
    plan_json: *const c_char,
    date: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let date_str = match cstr_to_string(date) {
        Some(s) => s,
        None => {
            set_last_error("Invalid date pointer");
            return ptr::null_mut();
        }
    };
    let date = match NaiveDate::parse_from_str(&date_str, "%Y-%m-%d") {
        Ok(d) => d,
        Err(e) => {
            set_last_error(&format!("Date parse error: {e}"));
            return ptr::null_mut();
        }
    };

    let profile: Option<ProfileSnapshot> = match cstr_to_string(profile_json) {
        Some(json) => match serde_json::from_str(&json) {
            Ok(p) => Some(p),
            Err(e) => {
                set_last_error(&format!("Failed to parse profile: {e}"));
                return ptr::null_mut();
            }
        },
        None => None,
    };

    let summary: Option<ProgressSummary> = match cstr_to_string(summary_json) {
        Some(json) => match serde_json::from_str(&json) {
            Ok(s) => Some(s),
            Err(e) => {
                set_last_error(&format!("Failed to parse summary: {e}"));
                return ptr::null_mut();
            }
        },
        None => None,
    };

    let plan: Option<PlanInfo> = match cstr_to_string(plan_json) {
        Some(json) => match serde_json::from_str(&json) {
            Ok(p) => Some(p),
            Err(e) => {
                set_last_error(&format!("Failed to parse plan: {e}"));
                return ptr::null_mut();
            }
        },
        None => None,
    };

    let insights = generate_insights(profile.as_ref(), summary.as_ref(), plan.as_ref(), date);
    match serde_json::to_string(&insights) {
        Ok(out) => string_to_cstr(&out),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a string returned by Deskcore functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Deskcore function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn deskcore_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Deskcore call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn deskcore_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the Deskcore library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn deskcore_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
