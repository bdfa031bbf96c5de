//! Models of the documentation page behaviors.
//!
//! Each behavior is a plain value that the browser host feeds with
//! measurements (scroll offsets, element tops, viewport width, clock) and
//! asks what to render. Nothing here touches a DOM; the host owns the
//! elements and applies the returned state.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageConfig {
    /// Space left above an anchor target for the fixed header.
    pub anchor_offset: f64,
    /// A section becomes current this far before its top reaches the viewport.
    pub section_offset: f64,
    pub scroll_to_top_threshold: f64,
    pub mobile_breakpoint: f64,
    pub copy_feedback_ms: f64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            anchor_offset: 80.0,
            section_offset: 150.0,
            scroll_to_top_threshold: 300.0,
            mobile_breakpoint: 768.0,
            copy_feedback_ms: 2000.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AnchorAction {
    /// A bare `#`: suppress navigation, do not scroll.
    Ignore,
    ScrollTo {
        top: f64,
        #[serde(rename = "pushUrl")]
        push_url: String,
    },
}

/// Decides what a click on an in-page link does. `target_top` is the
/// target's viewport-relative top, or `None` when the id does not exist,
/// in which case the browser default is left alone.
pub fn anchor_scroll(
    config: &PageConfig,
    href: &str,
    target_top: Option<f64>,
    page_offset: f64,
) -> Option<AnchorAction> {
    if href == "#" {
        return Some(AnchorAction::Ignore);
    }
    if !href.starts_with('#') {
        return None;
    }
    let top = target_top?;
    Some(AnchorAction::ScrollTo {
        top: top + page_offset - config.anchor_offset,
        push_url: href.to_string(),
    })
}

#[derive(Clone, Debug, PartialEq)]
pub struct SectionBox {
    pub id: String,
    pub top: f64,
}

/// The id of the last section whose top, less the offset, has been
/// scrolled past. Sections are taken in document order.
pub fn active_section<'a>(
    config: &PageConfig,
    sections: &'a [SectionBox],
    scroll_y: f64,
) -> Option<&'a str> {
    let mut current = None;
    for section in sections {
        if scroll_y >= section.top - config.section_offset {
            current = Some(section.id.as_str());
        }
    }
    current
}

#[derive(Clone, Debug, PartialEq)]
pub struct NavLink {
    pub href: String,
    /// Index of the top-level link of the sidebar group this link sits in.
    pub parent: Option<usize>,
}

/// Indices of the nav links to mark active: every link pointing at the
/// current section plus the parent link of its group.
pub fn active_links(links: &[NavLink], current: Option<&str>) -> Vec<usize> {
    let Some(current) = current else {
        return Vec::new();
    };
    let target = format!("#{}", current);
    let mut active = Vec::new();
    for (idx, link) in links.iter().enumerate() {
        if link.href != target {
            continue;
        }
        active.push(idx);
        if let Some(parent) = link.parent {
            if parent < links.len() && !active.contains(&parent) {
                active.push(parent);
            }
        }
    }
    active.sort_unstable();
    active
}

/// Reading progress in percent. A page that cannot scroll reports 0.
pub fn scroll_progress(scroll_top: f64, scroll_height: f64, client_height: f64) -> f64 {
    let height = scroll_height - client_height;
    if !height.is_finite() || height <= 0.0 || !scroll_top.is_finite() {
        return 0.0;
    }
    (scroll_top / height * 100.0).clamp(0.0, 100.0)
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScrollToTop {
    threshold: f64,
    visible: bool,
}

impl ScrollToTop {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            threshold: config.scroll_to_top_threshold,
            visible: false,
        }
    }

    pub fn on_scroll(&mut self, scroll_y: f64) -> bool {
        self.visible = scroll_y > self.threshold;
        self.visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Sidebar toggle for narrow viewports.
#[derive(Clone, Debug, PartialEq)]
pub struct MobileMenu {
    breakpoint: f64,
    enabled: bool,
    open: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClickTarget {
    MenuButton,
    Sidebar,
    SidebarLink,
    Outside,
}

impl MobileMenu {
    /// Only viewports at or below the breakpoint at load time get a menu.
    pub fn new(config: &PageConfig, viewport_width: f64) -> Self {
        Self {
            breakpoint: config.mobile_breakpoint,
            enabled: viewport_width <= config.mobile_breakpoint,
            open: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Applies a click and returns whether the sidebar is open afterwards.
    pub fn on_click(&mut self, target: ClickTarget, viewport_width: f64) -> bool {
        if !self.enabled {
            return self.open;
        }
        let narrow = viewport_width <= self.breakpoint;
        match target {
            ClickTarget::MenuButton => self.open = !self.open,
            ClickTarget::Sidebar => {}
            ClickTarget::SidebarLink | ClickTarget::Outside => {
                if narrow {
                    self.open = false;
                }
            }
        }
        self.open
    }
}

pub const COPY_LABEL: &str = "Copy";
pub const COPIED_LABEL: &str = "Copied!";

/// The copy button of one code block. The text to copy is the block's
/// unhighlighted source.
#[derive(Clone, Debug, PartialEq)]
pub struct CopyButton {
    source: String,
    feedback_ms: f64,
    copied_until: Option<f64>,
}

impl CopyButton {
    pub fn new(config: &PageConfig, source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            feedback_ms: config.copy_feedback_ms,
            copied_until: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.source
    }

    pub fn label(&self) -> &'static str {
        if self.copied_until.is_some() {
            COPIED_LABEL
        } else {
            COPY_LABEL
        }
    }

    /// Called once the clipboard write succeeded.
    pub fn copied(&mut self, now_ms: f64) {
        self.copied_until = Some(now_ms + self.feedback_ms);
    }

    /// Advances the clock; returns true when the label reverted.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        match self.copied_until {
            Some(until) if now_ms >= until => {
                self.copied_until = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollState {
    pub active_section: Option<String>,
    pub active_links: Vec<usize>,
    pub progress: f64,
    pub show_scroll_to_top: bool,
}

/// All behaviors of one page, created by an explicit init call instead of
/// load-time side effects. Dropping it disposes every behavior.
#[derive(Clone, Debug)]
pub struct Page {
    config: PageConfig,
    sections: Vec<SectionBox>,
    links: Vec<NavLink>,
    scroll_to_top: ScrollToTop,
    menu: MobileMenu,
    copy_buttons: Vec<CopyButton>,
}

impl Page {
    pub fn init(
        config: PageConfig,
        sections: Vec<SectionBox>,
        links: Vec<NavLink>,
        viewport_width: f64,
    ) -> Self {
        Self {
            scroll_to_top: ScrollToTop::new(&config),
            menu: MobileMenu::new(&config, viewport_width),
            config,
            sections,
            links,
            copy_buttons: Vec::new(),
        }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn on_scroll(&mut self, scroll_y: f64, scroll_height: f64, client_height: f64) -> ScrollState {
        let current = active_section(&self.config, &self.sections, scroll_y).map(str::to_string);
        ScrollState {
            active_links: active_links(&self.links, current.as_deref()),
            active_section: current,
            progress: scroll_progress(scroll_y, scroll_height, client_height),
            show_scroll_to_top: self.scroll_to_top.on_scroll(scroll_y),
        }
    }

    pub fn anchor(&self, href: &str, target_top: Option<f64>, page_offset: f64) -> Option<AnchorAction> {
        anchor_scroll(&self.config, href, target_top, page_offset)
    }

    pub fn menu(&mut self) -> &mut MobileMenu {
        &mut self.menu
    }

    /// Registers a copy button and returns its handle.
    pub fn add_copy_button(&mut self, source: impl Into<String>) -> usize {
        self.copy_buttons.push(CopyButton::new(&self.config, source));
        self.copy_buttons.len() - 1
    }

    pub fn copy_button(&mut self, handle: usize) -> Option<&mut CopyButton> {
        self.copy_buttons.get_mut(handle)
    }

    /// Reverts expired copy feedback; returns the handles that changed.
    pub fn tick(&mut self, now_ms: f64) -> Vec<usize> {
        self.copy_buttons
            .iter_mut()
            .enumerate()
            .filter_map(|(idx, button)| button.tick(now_ms).then_some(idx))
            .collect()
    }
}
