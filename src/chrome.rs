// chrome renderer: settings values -> style patches for the shell document

use crate::settings::BorderPx;

const BORDER_COLOR: &str = "rgba(110,110,130,.5)";
const CONTROLS_HEIGHT_PX: u32 = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleTarget {
    /// document body
    Root,
    /// the toolbar/address region, `#controls`
    Controls,
}

impl StyleTarget {
    fn selector_script(self) -> &'static str {
        match self {
            StyleTarget::Root => "document.body",
            StyleTarget::Controls => "document.getElementById(\"controls\")",
        }
    }
}

/// Ordered css declarations for one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylePatch {
    pub target: StyleTarget,
    pub declarations: Vec<(&'static str, String)>,
}

impl StylePatch {
    fn new(target: StyleTarget) -> Self {
        Self {
            target,
            declarations: Vec::new(),
        }
    }

    fn set(mut self, property: &'static str, value: impl Into<String>) -> Self {
        self.declarations.push((property, value.into()));
        self
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    /// js snippet assigning every declaration, a no-op if the element is missing
    pub fn to_script(&self) -> String {
        let mut script = format!(
            "(function(){{var el={};if(!el)return;",
            self.target.selector_script()
        );
        for (property, value) in &self.declarations {
            // serde_json quoting keeps arbitrary values inside the string literal
            let property = serde_json::Value::from(*property).to_string();
            let value = serde_json::Value::from(value.as_str()).to_string();
            script.push_str(&format!("el.style.setProperty({property},{value});"));
        }
        script.push_str("})();");
        script
    }
}

pub fn render_border(px: BorderPx) -> StylePatch {
    let outline = match px.px() {
        0 => "none".to_string(),
        n => format!("{n}px solid {BORDER_COLOR}"),
    };
    StylePatch::new(StyleTarget::Root).set("outline", outline)
}

pub fn render_controls_collapsed(collapsed: bool) -> StylePatch {
    let patch = StylePatch::new(StyleTarget::Controls);
    let patch = if collapsed {
        patch
            .set("height", "0px")
            .set("padding", "0 8px")
            .set("border-bottom-width", "0px")
    } else {
        patch
            .set("height", format!("{CONTROLS_HEIGHT_PX}px"))
            .set("padding", "6px 8px")
            .set("border-bottom-width", "1px")
    };
    patch.set("overflow", "hidden")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_none() {
        let patch = render_border(BorderPx::None);
        assert_eq!(patch.target, StyleTarget::Root);
        assert_eq!(patch.get("outline"), Some("none"));
    }

    #[test]
    fn test_border_thickness() {
        assert_eq!(
            render_border(BorderPx::Two).get("outline"),
            Some("2px solid rgba(110,110,130,.5)")
        );
        assert_eq!(
            render_border(BorderPx::Three).get("outline"),
            Some("3px solid rgba(110,110,130,.5)")
        );
    }

    #[test]
    fn test_render_is_idempotent() {
        for px in BorderPx::ALL {
            assert_eq!(render_border(px), render_border(px));
        }
        assert_eq!(render_controls_collapsed(true), render_controls_collapsed(true));
        assert_eq!(render_border(BorderPx::One).declarations.len(), 1);
    }

    #[test]
    fn test_controls_collapsed() {
        let patch = render_controls_collapsed(true);
        assert_eq!(patch.target, StyleTarget::Controls);
        assert_eq!(patch.get("height"), Some("0px"));
        assert_eq!(patch.get("padding"), Some("0 8px"));
        assert_eq!(patch.get("border-bottom-width"), Some("0px"));
        assert_eq!(patch.get("overflow"), Some("hidden"));
    }

    #[test]
    fn test_controls_expanded() {
        let patch = render_controls_collapsed(false);
        assert_eq!(patch.get("height"), Some("42px"));
        assert_eq!(patch.get("padding"), Some("6px 8px"));
        assert_eq!(patch.get("border-bottom-width"), Some("1px"));
        assert_eq!(patch.get("overflow"), Some("hidden"));
    }

    #[test]
    fn test_script_targets_element_and_quotes_values() {
        let script = render_border(BorderPx::One).to_script();
        assert!(script.starts_with("(function(){var el=document.body;"));
        assert!(script.contains(r#"el.style.setProperty("outline","1px solid rgba(110,110,130,.5)");"#));

        let script = render_controls_collapsed(true).to_script();
        assert!(script.contains(r#"document.getElementById("controls")"#));
        assert!(script.contains(r#"el.style.setProperty("border-bottom-width","0px");"#));
    }
}
