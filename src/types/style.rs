use serde::{Deserialize, Serialize};

/// Display style of a text cell.
///
/// Discriminants are stable: they double as the RTF colour-table index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextStyle {
    #[default]
    Default = 0,
    Variable = 1,
    Number = 2,
    Function = 3,
    SpecialConstant = 4,
    GreekConstant = 5,
    String = 6,
    Input = 7,
    MainPrompt = 8,
    OtherPrompt = 9,
    Label = 10,
    UserLabel = 11,
    Highlight = 12,
    Warning = 13,
    Error = 14,
    Text = 15,
    Heading6 = 16,
    Heading5 = 17,
    Subsubsection = 18,
    Subsection = 19,
    Section = 20,
    Title = 21,
    Outdated = 22,
}

impl TextStyle {
    /// Every style, in discriminant order.
    pub const ALL: [TextStyle; 23] = [
        TextStyle::Default,
        TextStyle::Variable,
        TextStyle::Number,
        TextStyle::Function,
        TextStyle::SpecialConstant,
        TextStyle::GreekConstant,
        TextStyle::String,
        TextStyle::Input,
        TextStyle::MainPrompt,
        TextStyle::OtherPrompt,
        TextStyle::Label,
        TextStyle::UserLabel,
        TextStyle::Highlight,
        TextStyle::Warning,
        TextStyle::Error,
        TextStyle::Text,
        TextStyle::Heading6,
        TextStyle::Heading5,
        TextStyle::Subsubsection,
        TextStyle::Subsection,
        TextStyle::Section,
        TextStyle::Title,
        TextStyle::Outdated,
    ];

    /// Index into the RTF colour table.
    pub fn rtf_index(self) -> u8 {
        self as u8
    }

    /// The structural type derived from this style.
    pub fn cell_type(self) -> CellType {
        match self {
            TextStyle::Input => CellType::Input,
            TextStyle::MainPrompt => CellType::MainPrompt,
            TextStyle::OtherPrompt => CellType::Prompt,
            TextStyle::Label | TextStyle::UserLabel => CellType::Label,
            TextStyle::Warning => CellType::Warning,
            TextStyle::Error => CellType::Error,
            TextStyle::Text => CellType::Text,
            TextStyle::Heading6 => CellType::Heading6,
            TextStyle::Heading5 => CellType::Heading5,
            TextStyle::Subsubsection => CellType::Subsubsection,
            TextStyle::Subsection => CellType::Subsection,
            TextStyle::Section => CellType::Section,
            TextStyle::Title => CellType::Title,
            TextStyle::Default
            | TextStyle::Variable
            | TextStyle::Number
            | TextStyle::Function
            | TextStyle::SpecialConstant
            | TextStyle::GreekConstant
            | TextStyle::String
            | TextStyle::Highlight
            | TextStyle::Outdated => CellType::Default,
        }
    }

    /// Labels and prompts always start a new line.
    pub fn forces_line_break(self) -> bool {
        matches!(
            self,
            TextStyle::Label | TextStyle::UserLabel | TextStyle::MainPrompt | TextStyle::OtherPrompt
        )
    }

    /// Labels and the main prompt are drawn in a fixed-width column.
    pub fn is_fixed_width(self) -> bool {
        matches!(
            self,
            TextStyle::Label | TextStyle::UserLabel | TextStyle::MainPrompt
        )
    }

    pub fn is_label(self) -> bool {
        matches!(self, TextStyle::Label | TextStyle::UserLabel)
    }

    /// Headings carry their own font size instead of the maths font size.
    pub fn is_heading(self) -> bool {
        matches!(
            self,
            TextStyle::Title
                | TextStyle::Section
                | TextStyle::Subsection
                | TextStyle::Subsubsection
                | TextStyle::Heading5
                | TextStyle::Heading6
        )
    }

    /// Styles whose font size does not follow the surrounding maths.
    pub fn keeps_own_font_size(self) -> bool {
        matches!(
            self,
            TextStyle::MainPrompt | TextStyle::OtherPrompt | TextStyle::Error | TextStyle::Warning
        )
    }

    /// Styles whose TeX output is not implicitly in math mode.
    pub fn needs_math_mode_guard(self) -> bool {
        matches!(
            self,
            TextStyle::Error
                | TextStyle::Warning
                | TextStyle::Label
                | TextStyle::UserLabel
                | TextStyle::MainPrompt
                | TextStyle::OtherPrompt
        )
    }

    /// Value of the `type` attribute in worksheet XML, if the tag alone
    /// does not identify the style.
    pub fn xml_type(self) -> Option<&'static str> {
        match self {
            TextStyle::Error => Some("error"),
            TextStyle::Warning => Some("warning"),
            TextStyle::MainPrompt => Some("mainprompt"),
            TextStyle::OtherPrompt => Some("prompt"),
            TextStyle::Input => Some("input"),
            TextStyle::Text => Some("text"),
            TextStyle::Highlight => Some("highlight"),
            TextStyle::Heading6 => Some("heading6"),
            TextStyle::Heading5 => Some("heading5"),
            TextStyle::Subsubsection => Some("subsubsection"),
            TextStyle::Subsection => Some("subsection"),
            TextStyle::Section => Some("section"),
            TextStyle::Title => Some("title"),
            _ => None,
        }
    }

    pub fn from_xml_type(value: &str) -> Option<Self> {
        TextStyle::ALL
            .iter()
            .copied()
            .find(|style| style.xml_type() == Some(value))
    }
}

/// Structural type used by selection, folding and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellType {
    /// Ordinary maths output.
    #[default]
    Default,
    Input,
    MainPrompt,
    Prompt,
    Label,
    Warning,
    Error,
    Text,
    Heading6,
    Heading5,
    Subsubsection,
    Subsection,
    Section,
    Title,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_rtf_index_matches_discriminant() {
        for (i, style) in TextStyle::ALL.iter().enumerate() {
            assert_eq!(usize::from(style.rtf_index()), i);
        }
        assert_eq!(TextStyle::Label.rtf_index(), 10);
    }

    #[test]
    fn test_cell_type_mapping() {
        assert_eq!(TextStyle::Variable.cell_type(), CellType::Default);
        assert_eq!(TextStyle::UserLabel.cell_type(), CellType::Label);
        assert_eq!(TextStyle::OtherPrompt.cell_type(), CellType::Prompt);
        assert_eq!(TextStyle::Outdated.cell_type(), CellType::Default);
    }

    #[test]
    fn test_xml_type_round_trip() {
        for style in TextStyle::ALL {
            if let Some(t) = style.xml_type() {
                assert_eq!(TextStyle::from_xml_type(t), Some(style));
            }
        }
        assert_eq!(TextStyle::from_xml_type("bogus"), None);
    }
}
