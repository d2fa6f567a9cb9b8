//! HTML attribute → React prop mapping.
//!
//! Static rename table applied to every attribute key before tag handlers run.
//! Unmapped attributes pass through unchanged.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};

// ═══════════════════════════════════════════════════════════════════════════════
// STATIC TABLES
// ═══════════════════════════════════════════════════════════════════════════════

lazy_static! {
    static ref BUILTIN_PROPS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("class", "className");
        m.insert("for", "htmlFor");
        m.insert("charset", "charSet");
        m.insert("tabindex", "tabIndex");
        m.insert("readonly", "readOnly");
        m.insert("maxlength", "maxLength");
        m.insert("minlength", "minLength");
        m.insert("colspan", "colSpan");
        m.insert("rowspan", "rowSpan");
        m.insert("cellpadding", "cellPadding");
        m.insert("cellspacing", "cellSpacing");
        m.insert("contenteditable", "contentEditable");
        m.insert("contextmenu", "contextMenu");
        m.insert("crossorigin", "crossOrigin");
        m.insert("datetime", "dateTime");
        m.insert("enctype", "encType");
        m.insert("formaction", "formAction");
        m.insert("formenctype", "formEncType");
        m.insert("formmethod", "formMethod");
        m.insert("formnovalidate", "formNoValidate");
        m.insert("formtarget", "formTarget");
        m.insert("frameborder", "frameBorder");
        m.insert("hreflang", "hrefLang");
        m.insert("http-equiv", "httpEquiv");
        m.insert("accept-charset", "acceptCharset");
        m.insert("accesskey", "accessKey");
        m.insert("autocomplete", "autoComplete");
        m.insert("autofocus", "autoFocus");
        m.insert("autoplay", "autoPlay");
        m.insert("allowfullscreen", "allowFullScreen");
        m.insert("inputmode", "inputMode");
        m.insert("itemprop", "itemProp");
        m.insert("itemscope", "itemScope");
        m.insert("itemtype", "itemType");
        m.insert("marginheight", "marginHeight");
        m.insert("marginwidth", "marginWidth");
        m.insert("mediagroup", "mediaGroup");
        m.insert("nomodule", "noModule");
        m.insert("novalidate", "noValidate");
        m.insert("playsinline", "playsInline");
        m.insert("referrerpolicy", "referrerPolicy");
        m.insert("spellcheck", "spellCheck");
        m.insert("srcdoc", "srcDoc");
        m.insert("srclang", "srcLang");
        m.insert("srcset", "srcSet");
        m.insert("usemap", "useMap");
        // Namespaced attributes (html5ever reports them as prefix:local)
        m.insert("xlink:href", "xlinkHref");
        m.insert("xlink:title", "xlinkTitle");
        m.insert("xml:lang", "xmlLang");
        m.insert("xml:space", "xmlSpace");
        m.insert("xmlns:xlink", "xmlnsXlink");
        // SVG presentation attributes
        m.insert("clip-path", "clipPath");
        m.insert("clip-rule", "clipRule");
        m.insert("color-interpolation-filters", "colorInterpolationFilters");
        m.insert("dominant-baseline", "dominantBaseline");
        m.insert("fill-opacity", "fillOpacity");
        m.insert("fill-rule", "fillRule");
        m.insert("flood-color", "floodColor");
        m.insert("flood-opacity", "floodOpacity");
        m.insert("font-family", "fontFamily");
        m.insert("font-size", "fontSize");
        m.insert("font-weight", "fontWeight");
        m.insert("letter-spacing", "letterSpacing");
        m.insert("marker-end", "markerEnd");
        m.insert("marker-mid", "markerMid");
        m.insert("marker-start", "markerStart");
        m.insert("shape-rendering", "shapeRendering");
        m.insert("stop-color", "stopColor");
        m.insert("stop-opacity", "stopOpacity");
        m.insert("stroke-dasharray", "strokeDasharray");
        m.insert("stroke-dashoffset", "strokeDashoffset");
        m.insert("stroke-linecap", "strokeLinecap");
        m.insert("stroke-linejoin", "strokeLinejoin");
        m.insert("stroke-miterlimit", "strokeMiterlimit");
        m.insert("stroke-opacity", "strokeOpacity");
        m.insert("stroke-width", "strokeWidth");
        m.insert("text-anchor", "textAnchor");
        m.insert("text-rendering", "textRendering");
        m.insert("vector-effect", "vectorEffect");
        m
    };

    /// Attributes React treats as booleans; an empty HTML value means "present".
    static ref BOOLEAN_PROPS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert("allowFullScreen");
        s.insert("async");
        s.insert("autoFocus");
        s.insert("autoPlay");
        s.insert("checked");
        s.insert("controls");
        s.insert("default");
        s.insert("defer");
        s.insert("disabled");
        s.insert("formNoValidate");
        s.insert("hidden");
        s.insert("itemScope");
        s.insert("loop");
        s.insert("multiple");
        s.insert("muted");
        s.insert("noModule");
        s.insert("noValidate");
        s.insert("open");
        s.insert("playsInline");
        s.insert("readOnly");
        s.insert("required");
        s.insert("reversed");
        s.insert("selected");
        s
    };

    /// JSX attribute names: identifier characters and `-`, optionally namespaced.
    static ref JSX_ATTR_NAME_RE: Regex =
        Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$\-]*(:[A-Za-z_$][A-Za-z0-9_$\-]*)?$").unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROPS MAP
// ═══════════════════════════════════════════════════════════════════════════════

/// Attribute rename table: the built-in mapping plus project overrides.
#[derive(Debug, Clone, Default)]
pub struct PropsMap {
    overrides: HashMap<String, String>,
}

impl PropsMap {
    pub fn builtin() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        Self {
            overrides: overrides
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Framework prop name for an HTML attribute name.
    pub fn rename<'a>(&'a self, attr: &'a str) -> &'a str {
        if let Some(renamed) = self.overrides.get(attr) {
            return renamed;
        }
        BUILTIN_PROPS.get(attr).copied().unwrap_or(attr)
    }
}

/// True for props whose empty value should be emitted as a bare attribute.
pub fn is_boolean_prop(prop: &str) -> bool {
    BOOLEAN_PROPS.contains(prop)
}

/// True if `name` can appear as an attribute name in JSX.
pub fn is_valid_jsx_attr_name(name: &str) -> bool {
    JSX_ATTR_NAME_RE.is_match(name)
}

/// Inline handlers (`onclick`, `onload`, ...) are not portable to the component tree.
pub fn is_event_handler(attr: &str) -> bool {
    match attr.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("on") => {
            attr.len() > 2 && attr[2..].chars().all(|c| c.is_ascii_alphabetic())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_renames() {
        let props = PropsMap::builtin();
        assert_eq!(props.rename("class"), "className");
        assert_eq!(props.rename("for"), "htmlFor");
        assert_eq!(props.rename("charset"), "charSet");
        assert_eq!(props.rename("stroke-width"), "strokeWidth");
        assert_eq!(props.rename("xlink:href"), "xlinkHref");
        assert_eq!(props.rename("href"), "href"); // Unmapped
        assert_eq!(props.rename("data-id"), "data-id");
    }

    #[test]
    fn test_overrides_win() {
        let mut overrides = BTreeMap::new();
        overrides.insert("class".to_string(), "class".to_string());
        overrides.insert("itemid".to_string(), "itemID".to_string());
        let props = PropsMap::with_overrides(&overrides);
        assert_eq!(props.rename("class"), "class");
        assert_eq!(props.rename("itemid"), "itemID");
        assert_eq!(props.rename("for"), "htmlFor");
    }

    #[test]
    fn test_event_handlers() {
        assert!(is_event_handler("onclick"));
        assert!(is_event_handler("onLoad"));
        assert!(!is_event_handler("on"));
        assert!(!is_event_handler("one-time"));
        assert!(!is_event_handler("class"));
    }

    #[test]
    fn test_jsx_attr_names() {
        assert!(is_valid_jsx_attr_name("className"));
        assert!(is_valid_jsx_attr_name("data-id"));
        assert!(is_valid_jsx_attr_name("aria-label"));
        assert!(!is_valid_jsx_attr_name("@click"));
        assert!(!is_valid_jsx_attr_name("[value]"));
        assert!(!is_valid_jsx_attr_name("x.y"));
    }

    #[test]
    fn test_boolean_props() {
        assert!(is_boolean_prop("disabled"));
        assert!(is_boolean_prop("readOnly"));
        assert!(!is_boolean_prop("className"));
    }
}
