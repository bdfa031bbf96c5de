use serde::Deserialize;
use wasm_bindgen::prelude::*;
use xidoc_core::page::{self, ClickTarget, NavLink, PageConfig, SectionBox};
use xidoc_core::{Highlighter, Palette, SpanStyle};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HighlightOptions {
    class_prefix: Option<String>,
    colors: Option<JsPalette>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsPalette {
    string: Option<String>,
    number: Option<String>,
    keyword: Option<String>,
    #[serde(rename = "type")]
    ty: Option<String>,
    function: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct PageOptions {
    #[serde(default)]
    sections: Vec<JsSection>,
    #[serde(default)]
    links: Vec<JsNavLink>,
    viewport_width: Option<f64>,
    anchor_offset: Option<f64>,
    section_offset: Option<f64>,
    scroll_to_top_threshold: Option<f64>,
    mobile_breakpoint: Option<f64>,
    copy_feedback_ms: Option<f64>,
}

#[derive(Deserialize)]
struct JsSection {
    id: String,
    top: f64,
}

#[derive(Deserialize)]
struct JsNavLink {
    href: String,
    parent: Option<usize>,
}

/// Highlights one code block with inline One Dark colors.
#[wasm_bindgen]
pub fn highlight(code: &str, language: &str) -> String {
    xidoc_core::highlight(code, language)
}

#[wasm_bindgen]
pub fn highlight_with_options(code: &str, language: &str, options: JsValue) -> Result<String, JsValue> {
    let highlighter = highlighter_from_js(options)?;
    Ok(highlighter.highlight(code, language))
}

/// Language class (`language-cpp`, …) for a block written without one.
#[wasm_bindgen]
pub fn classify(code: &str) -> String {
    xidoc_core::classify(code).class_name().to_string()
}

/// Page behaviors, created by [`init_page`]. Calling `free()` on the JS
/// side disposes all of them.
#[wasm_bindgen]
pub struct Page {
    inner: page::Page,
}

#[wasm_bindgen]
pub fn init_page(options: JsValue) -> Result<Page, JsValue> {
    let options: PageOptions = if options.is_null() || options.is_undefined() {
        PageOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|err| JsValue::from_str(&err.to_string()))?
    };

    let defaults = PageConfig::default();
    let config = PageConfig {
        anchor_offset: options.anchor_offset.unwrap_or(defaults.anchor_offset),
        section_offset: options.section_offset.unwrap_or(defaults.section_offset),
        scroll_to_top_threshold: options
            .scroll_to_top_threshold
            .unwrap_or(defaults.scroll_to_top_threshold),
        mobile_breakpoint: options.mobile_breakpoint.unwrap_or(defaults.mobile_breakpoint),
        copy_feedback_ms: options.copy_feedback_ms.unwrap_or(defaults.copy_feedback_ms),
    };
    let sections = options
        .sections
        .into_iter()
        .map(|section| SectionBox {
            id: section.id,
            top: section.top,
        })
        .collect();
    let links = options
        .links
        .into_iter()
        .map(|link| NavLink {
            href: link.href,
            parent: link.parent,
        })
        .collect();
    let viewport_width = options.viewport_width.unwrap_or(f64::INFINITY);

    Ok(Page {
        inner: page::Page::init(config, sections, links, viewport_width),
    })
}

#[wasm_bindgen]
impl Page {
    /// Returns `{ activeSection, activeLinks, progress, showScrollToTop }`.
    pub fn on_scroll(
        &mut self,
        scroll_y: f64,
        scroll_height: f64,
        client_height: f64,
    ) -> Result<JsValue, JsValue> {
        let state = self.inner.on_scroll(scroll_y, scroll_height, client_height);
        serde_wasm_bindgen::to_value(&state).map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// `undefined` leaves the click to the browser; otherwise
    /// `{ kind: "ignore" }` or `{ kind: "scrollTo", top, pushUrl }`.
    pub fn anchor(
        &self,
        href: &str,
        target_top: Option<f64>,
        page_offset: f64,
    ) -> Result<JsValue, JsValue> {
        match self.inner.anchor(href, target_top, page_offset) {
            Some(action) => serde_wasm_bindgen::to_value(&action)
                .map_err(|err| JsValue::from_str(&err.to_string())),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    pub fn menu_enabled(&mut self) -> bool {
        self.inner.menu().is_enabled()
    }

    /// `target` is one of `button`, `sidebar`, `link`, `outside`. Returns
    /// whether the sidebar is open afterwards.
    pub fn menu_click(&mut self, target: &str, viewport_width: f64) -> Result<bool, JsValue> {
        let target = match target {
            "button" => ClickTarget::MenuButton,
            "sidebar" => ClickTarget::Sidebar,
            "link" => ClickTarget::SidebarLink,
            "outside" => ClickTarget::Outside,
            other => {
                return Err(JsValue::from_str(&format!(
                    "unknown click target: {}",
                    other
                )));
            }
        };
        Ok(self.inner.menu().on_click(target, viewport_width))
    }

    /// Registers the copy button of a block; `source` is the block's plain
    /// text, kept apart from the highlighted markup.
    pub fn add_copy_button(&mut self, source: String) -> u32 {
        self.inner.add_copy_button(source) as u32
    }

    pub fn copy_text(&mut self, handle: u32) -> Option<String> {
        self.inner
            .copy_button(handle as usize)
            .map(|button| button.text().to_string())
    }

    pub fn copy_label(&mut self, handle: u32) -> Option<String> {
        self.inner
            .copy_button(handle as usize)
            .map(|button| button.label().to_string())
    }

    /// Call after the clipboard write resolved.
    pub fn copied(&mut self, handle: u32, now_ms: f64) -> bool {
        match self.inner.copy_button(handle as usize) {
            Some(button) => {
                button.copied(now_ms);
                true
            }
            None => false,
        }
    }

    /// Handles of the copy buttons whose label reverted.
    pub fn tick(&mut self, now_ms: f64) -> Vec<u32> {
        self.inner
            .tick(now_ms)
            .into_iter()
            .map(|handle| handle as u32)
            .collect()
    }
}

fn highlighter_from_js(value: JsValue) -> Result<Highlighter, JsValue> {
    if value.is_null() || value.is_undefined() {
        return Ok(Highlighter::default());
    }
    let parsed: HighlightOptions =
        serde_wasm_bindgen::from_value(value).map_err(|err| JsValue::from_str(&err.to_string()))?;
    if let Some(prefix) = parsed.class_prefix {
        return Ok(Highlighter::with_class_prefix(prefix));
    }
    let mut palette = Palette::one_dark();
    if let Some(colors) = parsed.colors {
        if let Some(string) = colors.string {
            palette.string = string;
        }
        if let Some(number) = colors.number {
            palette.number = number;
        }
        if let Some(keyword) = colors.keyword {
            palette.keyword = keyword;
        }
        if let Some(ty) = colors.ty {
            palette.ty = ty;
        }
        if let Some(function) = colors.function {
            palette.function = function;
        }
    }
    Ok(Highlighter::new(SpanStyle::Inline(palette)))
}
