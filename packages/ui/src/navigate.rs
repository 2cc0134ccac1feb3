//! Full-page navigation, used when control leaves the app (OAuth) or after a sign-in.

/// Navigate the whole page to `url`.
///
/// In the browser this replaces the current page. On native targets absolute URLs open
/// in the system browser; app-relative paths are left to the router.
pub fn navigate_to(url: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(url) {
                tracing::error!("Failed to navigate to {}: {:?}", url, e);
            }
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        if url.starts_with("http://") || url.starts_with("https://") {
            if let Err(e) = open::that(url) {
                tracing::error!("Failed to open browser: {}", e);
            }
        } else {
            tracing::debug!("in-app navigation to {} left to the router", url);
        }
    }
}

/// Query string of the current page, including the leading `?`.
pub fn current_query() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        String::new()
    }
}
