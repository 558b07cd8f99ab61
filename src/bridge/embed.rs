//! Embedding URLs - how a tab's page is loaded into its sandboxed document
//!
//! Same-origin pages get the identity query `_iframe=true&_panelId=..&_tabId=..`
//! so the child bridge inside can tell the host who it is. Pages on another
//! origin are embedded as-is: they take part in the tab lifecycle but never in
//! the bridge.

use serde::Serialize;
use url::{Position, Url};

use crate::model::{PanelId, TabId};

pub const PARAM_IFRAME: &str = "_iframe";
pub const PARAM_PANEL_ID: &str = "_panelId";
pub const PARAM_TAB_ID: &str = "_tabId";

/// How a tab's content is embedded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EmbedTarget {
    /// Same-origin page speaking the bridge protocol
    SameOrigin { src: String },
    /// Foreign site in a plain sandbox, no message channel
    External { src: String },
}

impl EmbedTarget {
    pub fn src(&self) -> &str {
        match self {
            EmbedTarget::SameOrigin { src } | EmbedTarget::External { src } => src,
        }
    }

    pub fn uses_bridge(&self) -> bool {
        matches!(self, EmbedTarget::SameOrigin { .. })
    }
}

/// Whether an href, resolved against the host, lands on another origin.
/// Protocol-relative (`//other/x`) and non-http schemes count as external.
pub fn is_external(href: &str, host: &Url) -> bool {
    host.join(href)
        .map_or(true, |target| target.origin() != host.origin())
}

/// Build the document URL for a tab
pub fn embed_target(
    href: &str,
    host_origin: &str,
    panel_id: &PanelId,
    tab_id: &TabId,
) -> EmbedTarget {
    let external = || EmbedTarget::External {
        src: href.to_string(),
    };
    let Ok(host) = Url::parse(host_origin) else {
        return external();
    };
    if is_external(href, &host) {
        return external();
    }
    let params = [
        (PARAM_IFRAME, "true"),
        (PARAM_PANEL_ID, panel_id.as_str()),
        (PARAM_TAB_ID, tab_id.as_str()),
    ];
    match with_query(href, &host, &params) {
        Some(src) => EmbedTarget::SameOrigin { src },
        None => external(),
    }
}

/// Set query parameters on a same-origin href, replacing existing values for
/// the same keys and keeping the fragment. A relative href stays relative.
pub fn with_query(href: &str, host: &Url, params: &[(&str, &str)]) -> Option<String> {
    let mut url = host.join(href).ok()?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !params.iter().any(|(name, _)| name == key))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .extend_pairs(params);

    if Url::parse(href).is_ok() {
        Some(url.into())
    } else {
        Some(url[Position::BeforePath..].to_string())
    }
}

/// First value of a query parameter, decoded
pub fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "https://admin.example.com";

    #[test]
    fn test_same_origin_gets_identity_query() {
        let target = embed_target(
            "/admin/customers?page=2#list",
            HOST,
            &PanelId::new("panel-1"),
            &TabId::new("customers"),
        );
        assert_eq!(
            target,
            EmbedTarget::SameOrigin {
                src: "/admin/customers?page=2&_iframe=true&_panelId=panel-1&_tabId=customers#list"
                    .into()
            }
        );
    }

    #[test]
    fn test_absolute_same_origin_is_not_external() {
        let target = embed_target(
            "https://admin.example.com/admin/files",
            HOST,
            &PanelId::new("panel-2"),
            &TabId::new("files"),
        );
        assert!(target.uses_bridge());
    }

    #[test]
    fn test_external_site_embedded_as_is() {
        let target = embed_target(
            "https://docs.vendor.io/help",
            HOST,
            &PanelId::new("panel-1"),
            &TabId::new("help"),
        );
        assert_eq!(
            target,
            EmbedTarget::External {
                src: "https://docs.vendor.io/help".into()
            }
        );
    }

    #[test]
    fn test_protocol_relative_href_is_external() {
        let target = embed_target(
            "//docs.vendor.io/help",
            HOST,
            &PanelId::new("panel-1"),
            &TabId::new("help"),
        );
        assert!(!target.uses_bridge());
        assert_eq!(target.src(), "//docs.vendor.io/help");
    }

    #[test]
    fn test_protocol_relative_to_own_host_uses_bridge() {
        let target = embed_target(
            "//admin.example.com/admin/files",
            HOST,
            &PanelId::new("panel-1"),
            &TabId::new("files"),
        );
        assert_eq!(
            target,
            EmbedTarget::SameOrigin {
                src: "/admin/files?_iframe=true&_panelId=panel-1&_tabId=files".into()
            }
        );
    }

    #[test]
    fn test_non_http_schemes_are_external() {
        let host = Url::parse(HOST).unwrap();
        assert!(is_external("javascript:alert(1)", &host));
        assert!(is_external("data:text/html,hi", &host));
        assert!(is_external("http://admin.example.com/x", &host));
        assert!(!is_external("../files", &host));
    }

    #[test]
    fn test_invalid_host_origin_embeds_without_bridge() {
        let target = embed_target(
            "/admin/files",
            "not an origin",
            &PanelId::new("panel-1"),
            &TabId::new("files"),
        );
        assert!(!target.uses_bridge());
    }

    #[test]
    fn test_with_query_replaces_stale_identity() {
        let host = Url::parse(HOST).unwrap();
        let url = with_query("/a?_tabId=old&x=1", &host, &[(PARAM_TAB_ID, "new id")]);
        assert_eq!(url.as_deref(), Some("/a?x=1&_tabId=new+id"));
    }

    #[test]
    fn test_query_param_decodes() {
        let url = Url::parse("https://admin.example.com/a?x=1&_tabId=new%20id#frag").unwrap();
        assert_eq!(query_param(&url, PARAM_TAB_ID).as_deref(), Some("new id"));
        assert_eq!(query_param(&url, "missing"), None);

        let bare = Url::parse("https://admin.example.com/a").unwrap();
        assert_eq!(query_param(&bare, "x"), None);
    }
}
