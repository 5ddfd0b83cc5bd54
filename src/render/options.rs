//! Rendering options and configuration.

use std::ops::RangeInclusive;

/// Options for rendering a conversion as text.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Page selection
    pub page_selection: PageSelection,

    /// Text placed between pages
    pub page_separator: String,

    /// Wrap linked spans as `[text](uri)`
    pub wrap_links: bool,

    /// Emit `![alt](url)` references for image spans
    pub include_images: bool,

    /// Alt text of image references
    pub image_alt: String,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.page_selection = selection;
        self
    }

    /// Set specific page range.
    pub fn with_page_range(mut self, range: RangeInclusive<usize>) -> Self {
        self.page_selection = PageSelection::Range(range);
        self
    }

    pub fn with_page_separator(mut self, separator: impl Into<String>) -> Self {
        self.page_separator = separator.into();
        self
    }

    /// Enable or disable link wrapping.
    pub fn with_links(mut self, wrap: bool) -> Self {
        self.wrap_links = wrap;
        self
    }

    /// Enable or disable image references.
    pub fn with_images(mut self, include: bool) -> Self {
        self.include_images = include;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_selection: PageSelection::All,
            page_separator: "\n\n".to_string(),
            wrap_links: true,
            include_images: true,
            image_alt: "image".to_string(),
        }
    }
}

/// Page selection for rendering (0-indexed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Render all pages
    #[default]
    All,
    /// Render a range of pages (inclusive)
    Range(RangeInclusive<usize>),
    /// Render specific pages
    Pages(Vec<usize>),
}

impl PageSelection {
    /// Check if a page index should be included.
    pub fn includes(&self, page: usize) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "0-9", "0,2,4-6").
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start: usize = start.trim().parse().map_err(|_| "Invalid start page")?;
                let end: usize = end.trim().parse().map_err(|_| "Invalid end page")?;
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let start: usize = start.trim().parse().map_err(|_| "Invalid page number")?;
                let end: usize = end.trim().parse().map_err(|_| "Invalid page number")?;
                pages.extend(start..=end);
            } else {
                let p: usize = part.parse().map_err(|_| "Invalid page number")?;
                pages.push(p);
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}
