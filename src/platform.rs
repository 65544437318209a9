//! Browser implementations of the component collaborators.

use leptos::logging::warn;
use punto_inicio_core::capability::{Confirmer, Navigator};
use punto_inicio_core::route::Route;
use punto_inicio_core::rpc::OdooClient;
use url::Url;

/// Full page navigation through `window.location`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate_to(&self, target: &Route) {
        let href = target.to_url();
        match web_sys::window() {
            Some(window) => {
                if let Err(e) = window.location().set_href(&href) {
                    warn!("Failed to navigate to {}: {:?}", href, e);
                }
            }
            None => warn!("No window to navigate to {}", href),
        }
    }
}

/// `window.confirm()`. Anything other than an explicit OK is a no.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserConfirmer;

impl Confirmer for BrowserConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        web_sys::window()
            .and_then(|window| window.confirm_with_message(prompt).ok())
            .unwrap_or(false)
    }
}

/// Raw query string of the current page, including the leading `?`.
pub fn location_search() -> String {
    web_sys::window()
        .and_then(|window| window.location().search().ok())
        .unwrap_or_default()
}

/// Client for the server that served this page, authenticated by its cookie.
pub fn connect() -> Result<OdooClient, String> {
    let window = web_sys::window().ok_or_else(|| "No browser window".to_string())?;
    let origin = window
        .location()
        .origin()
        .map_err(|e| format!("Failed to read page origin: {:?}", e))?;
    let base_url = Url::parse(&origin).map_err(|e| format!("Invalid page origin {}: {}", origin, e))?;
    Ok(OdooClient::browser_session(base_url))
}
