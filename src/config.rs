//! Display configuration snapshot.
//!
//! A [`Configuration`] is passed by reference into every layout, draw and
//! export call. Setters that change how cells measure themselves bump an
//! epoch counter; cells remember the epochs they were measured under and
//! re-measure when they differ.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::render::colors::Rgb;
use crate::render::Font;
use crate::types::TextStyle;

/// Font attributes of one style kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FontStyle {
    /// CSS hex colour, `#RRGGBB`.
    pub color: String,
    pub bold: bool,
    pub italic: bool,
    pub underlined: bool,
    /// Fixed point size. Only honoured for headings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<i32>,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            color: "#000000".to_string(),
            bold: false,
            italic: false,
            underlined: false,
            font_size: None,
        }
    }
}

impl FontStyle {
    fn colored(color: &str) -> Self {
        Self {
            color: color.to_string(),
            ..Self::default()
        }
    }

    fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn sized(mut self, size: i32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Parsed colour, black if the string is malformed.
    pub fn rgb(&self) -> Rgb {
        Rgb::from_hex(&self.color).unwrap_or_default()
    }
}

/// Per-style fonts plus the style used for folded labels and prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Styles {
    pub font_name: String,
    pub by_style: BTreeMap<TextStyle, FontStyle>,
    /// Folded labels and prompts.
    pub hidden: FontStyle,
}

impl Default for Styles {
    fn default() -> Self {
        let mut by_style = BTreeMap::new();
        by_style.insert(TextStyle::Default, FontStyle::default());
        by_style.insert(TextStyle::Variable, FontStyle::default().italic());
        by_style.insert(TextStyle::Number, FontStyle::default());
        by_style.insert(TextStyle::Function, FontStyle::default());
        by_style.insert(TextStyle::SpecialConstant, FontStyle::default());
        by_style.insert(TextStyle::GreekConstant, FontStyle::default());
        by_style.insert(TextStyle::String, FontStyle::default().italic());
        by_style.insert(TextStyle::Input, FontStyle::colored("#0000FF"));
        by_style.insert(TextStyle::MainPrompt, FontStyle::colored("#FF8080"));
        by_style.insert(TextStyle::OtherPrompt, FontStyle::colored("#FF0000").italic());
        by_style.insert(TextStyle::Label, FontStyle::colored("#FF8080"));
        by_style.insert(TextStyle::UserLabel, FontStyle::colored("#FF8080"));
        by_style.insert(TextStyle::Highlight, FontStyle::colored("#FF0000"));
        by_style.insert(TextStyle::Warning, FontStyle::colored("#FFA500"));
        by_style.insert(TextStyle::Error, FontStyle::colored("#FF0000"));
        by_style.insert(TextStyle::Text, FontStyle::default());
        by_style.insert(TextStyle::Heading6, FontStyle::default().bold().sized(12));
        by_style.insert(TextStyle::Heading5, FontStyle::default().bold().sized(13));
        by_style.insert(TextStyle::Subsubsection, FontStyle::default().bold().sized(14));
        by_style.insert(TextStyle::Subsection, FontStyle::default().bold().sized(16));
        by_style.insert(TextStyle::Section, FontStyle::default().bold().sized(18));
        by_style.insert(TextStyle::Title, FontStyle::default().bold().sized(24));
        by_style.insert(TextStyle::Outdated, FontStyle::colored("#999999"));
        Self {
            font_name: "monospace".to_string(),
            by_style,
            hidden: FontStyle {
                underlined: true,
                ..FontStyle::colored("#FF8080")
            },
        }
    }
}

impl Styles {
    /// Style for `style`, falling back to the default style.
    pub fn get(&self, style: TextStyle) -> FontStyle {
        self.by_style
            .get(&style)
            .or_else(|| self.by_style.get(&TextStyle::Default))
            .cloned()
            .unwrap_or_default()
    }
}

/// Snapshot of every setting the worksheet view reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Configuration {
    font_size: i32,
    min_font_size: i32,
    default_font_size: i32,
    displayed_digits: usize,
    use_user_labels: bool,
    show_labels: bool,
    show_automatic_labels: bool,
    hide_multiplication_sign: bool,
    change_asterisk: bool,
    use_partial_for_diff: bool,
    keep_percent: bool,
    latin_to_greek: bool,
    /// Width of the label column, in multiples of the default font size.
    label_width: i32,
    styles: Styles,
    background_color: String,
    #[serde(skip)]
    digits_epoch: u32,
    #[serde(skip)]
    labels_epoch: u32,
    #[serde(skip)]
    display_epoch: u32,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            font_size: 12,
            min_font_size: 4,
            default_font_size: 12,
            displayed_digits: 100,
            use_user_labels: false,
            show_labels: true,
            show_automatic_labels: true,
            hide_multiplication_sign: true,
            change_asterisk: true,
            use_partial_for_diff: false,
            keep_percent: false,
            latin_to_greek: false,
            label_width: 4,
            styles: Styles::default(),
            background_color: "#FFFFFF".to_string(),
            digits_epoch: 0,
            labels_epoch: 0,
            display_epoch: 0,
        }
    }
}

/// The epochs a cell was last measured under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Epochs {
    pub digits: u32,
    pub labels: u32,
    pub display: u32,
}

impl Configuration {
    /// Parse a JSON configuration. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a JSON configuration, substituting the defaults when it is malformed.
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("unreadable configuration, using defaults: {e}");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn epochs(&self) -> Epochs {
        Epochs {
            digits: self.digits_epoch,
            labels: self.labels_epoch,
            display: self.display_epoch,
        }
    }

    /// Continue the epochs of `old`, the configuration this one replaces.
    /// Each epoch whose governing settings differ moves forward, so cells
    /// measured under `old` are re-measured exactly where it matters.
    pub fn adopt_epochs(&mut self, old: &Configuration) {
        let next = |epoch: u32, changed: bool| {
            if changed {
                epoch.wrapping_add(1)
            } else {
                epoch
            }
        };
        self.digits_epoch = next(old.digits_epoch, self.displayed_digits != old.displayed_digits);
        self.labels_epoch = next(old.labels_epoch, self.use_user_labels != old.use_user_labels);
        self.display_epoch = next(old.display_epoch, !self.same_display(old));
    }

    /// True if cells measure the same under both configurations, font size
    /// aside (cells remember the size they were measured at).
    fn same_display(&self, other: &Configuration) -> bool {
        self.min_font_size == other.min_font_size
            && self.default_font_size == other.default_font_size
            && self.hide_multiplication_sign == other.hide_multiplication_sign
            && self.keep_percent == other.keep_percent
            && self.latin_to_greek == other.latin_to_greek
            && self.label_width == other.label_width
            && self.styles == other.styles
    }

    pub fn font_size(&self) -> i32 {
        self.font_size
    }

    pub fn set_font_size(&mut self, size: i32) {
        self.font_size = size;
    }

    pub fn min_font_size(&self) -> i32 {
        self.min_font_size
    }

    pub fn default_font_size(&self) -> i32 {
        self.default_font_size
    }

    pub fn set_default_font_size(&mut self, size: i32) {
        self.default_font_size = size;
        self.display_epoch = self.display_epoch.wrapping_add(1);
    }

    pub fn displayed_digits(&self) -> usize {
        self.displayed_digits
    }

    pub fn set_displayed_digits(&mut self, digits: usize) {
        if digits != self.displayed_digits {
            self.displayed_digits = digits;
            self.digits_epoch = self.digits_epoch.wrapping_add(1);
        }
    }

    pub fn use_user_labels(&self) -> bool {
        self.use_user_labels
    }

    pub fn set_use_user_labels(&mut self, on: bool) {
        if on != self.use_user_labels {
            self.use_user_labels = on;
            self.labels_epoch = self.labels_epoch.wrapping_add(1);
        }
    }

    pub fn show_labels(&self) -> bool {
        self.show_labels
    }

    pub fn set_show_labels(&mut self, on: bool) {
        self.show_labels = on;
    }

    pub fn show_automatic_labels(&self) -> bool {
        self.show_automatic_labels
    }

    pub fn set_show_automatic_labels(&mut self, on: bool) {
        self.show_automatic_labels = on;
    }

    pub fn hide_multiplication_sign(&self) -> bool {
        self.hide_multiplication_sign
    }

    pub fn set_hide_multiplication_sign(&mut self, on: bool) {
        if on != self.hide_multiplication_sign {
            self.hide_multiplication_sign = on;
            self.display_epoch = self.display_epoch.wrapping_add(1);
        }
    }

    pub fn change_asterisk(&self) -> bool {
        self.change_asterisk
    }

    pub fn set_change_asterisk(&mut self, on: bool) {
        self.change_asterisk = on;
    }

    pub fn use_partial_for_diff(&self) -> bool {
        self.use_partial_for_diff
    }

    pub fn set_use_partial_for_diff(&mut self, on: bool) {
        self.use_partial_for_diff = on;
    }

    pub fn keep_percent(&self) -> bool {
        self.keep_percent
    }

    pub fn set_keep_percent(&mut self, on: bool) {
        if on != self.keep_percent {
            self.keep_percent = on;
            self.display_epoch = self.display_epoch.wrapping_add(1);
        }
    }

    pub fn latin_to_greek(&self) -> bool {
        self.latin_to_greek
    }

    pub fn set_latin_to_greek(&mut self, on: bool) {
        if on != self.latin_to_greek {
            self.latin_to_greek = on;
            self.display_epoch = self.display_epoch.wrapping_add(1);
        }
    }

    /// Width of the label column in pixels.
    pub fn label_width(&self) -> i32 {
        self.label_width * self.default_font_size
    }

    pub fn set_label_width(&mut self, em: i32) {
        self.label_width = em;
        self.display_epoch = self.display_epoch.wrapping_add(1);
    }

    pub fn styles(&self) -> &Styles {
        &self.styles
    }

    pub fn set_styles(&mut self, styles: Styles) {
        self.styles = styles;
        self.display_epoch = self.display_epoch.wrapping_add(1);
    }

    pub fn background_color(&self) -> Rgb {
        Rgb::from_hex(&self.background_color).unwrap_or(Rgb::new(255, 255, 255))
    }

    pub fn background_hex(&self) -> &str {
        &self.background_color
    }

    /// Heading styles carry a fixed size, everything else uses `size`.
    pub fn style_font_size(&self, style: TextStyle, size: i32) -> i32 {
        if style.is_heading() {
            self.styles.get(style).font_size.unwrap_or(size)
        } else {
            size
        }
    }

    /// Font for drawing `style` at `size`.
    pub fn font(&self, style: TextStyle, size: i32) -> Font {
        let fs = self.styles.get(style);
        Font {
            family: self.styles.font_name.clone(),
            size: size.max(self.min_font_size),
            bold: fs.bold,
            italic: fs.italic,
            underlined: fs.underlined,
        }
    }

    /// Font for folded labels and prompts.
    pub fn hidden_font(&self, size: i32) -> Font {
        let fs = &self.styles.hidden;
        Font {
            family: self.styles.font_name.clone(),
            size: size.max(self.min_font_size),
            bold: fs.bold,
            italic: fs.italic,
            underlined: fs.underlined,
        }
    }

    pub fn color(&self, style: TextStyle) -> Rgb {
        self.styles.get(style).rgb()
    }
}
