use std::fmt::{Display, Formatter};

use log::warn;
use serde::Deserialize;

/// DYMO label stocks a check-in label can be rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(from = "String")]
pub enum LabelSizeId {
    /// 1 in x 2-1/8 in multipurpose label.
    #[default]
    Small30336,
    Address30252,
    Shipping30323,
    ReturnAddress30330,
    ReturnAddressInt11352,
    Medium30334,
}

impl LabelSizeId {
    pub const ALL: [LabelSizeId; 6] = [
        LabelSizeId::Small30336,
        LabelSizeId::Address30252,
        LabelSizeId::Shipping30323,
        LabelSizeId::ReturnAddress30330,
        LabelSizeId::ReturnAddressInt11352,
        LabelSizeId::Medium30334,
    ];

    /// Resolves a stored `label_size` setting. Unknown values fall back to the default size.
    pub fn from_setting(value: &str) -> LabelSizeId {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("default") {
            return LabelSizeId::default();
        }

        LabelSizeId::ALL
            .into_iter()
            .find(|id| id.setting() == value || id.name().eq_ignore_ascii_case(value))
            .unwrap_or_else(|| {
                warn!("Unknown label size '{}', falling back to {}", value, LabelSizeId::default());
                LabelSizeId::default()
            })
    }

    /// The value stored in the check-in settings (the DYMO stock number).
    pub fn setting(self) -> &'static str {
        match self {
            LabelSizeId::Small30336 => "30336",
            LabelSizeId::Address30252 => "30252",
            LabelSizeId::Shipping30323 => "30323",
            LabelSizeId::ReturnAddress30330 => "30330",
            LabelSizeId::ReturnAddressInt11352 => "11352",
            LabelSizeId::Medium30334 => "30334",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LabelSizeId::Small30336 => "Small30336",
            LabelSizeId::Address30252 => "Address30252",
            LabelSizeId::Shipping30323 => "Shipping30323",
            LabelSizeId::ReturnAddress30330 => "ReturnAddress30330",
            LabelSizeId::ReturnAddressInt11352 => "ReturnAddressInt11352",
            LabelSizeId::Medium30334 => "Medium30334",
        }
    }
}

impl From<String> for LabelSizeId {
    fn from(value: String) -> Self {
        LabelSizeId::from_setting(&value)
    }
}

impl From<&str> for LabelSizeId {
    fn from(value: &str) -> Self {
        LabelSizeId::from_setting(value)
    }
}

impl Display for LabelSizeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperOrientation {
    Portrait,
    Landscape,
}

impl PaperOrientation {
    pub fn as_str(self) -> &'static str {
        match self {
            PaperOrientation::Portrait => "Portrait",
            PaperOrientation::Landscape => "Landscape",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlignment {
    Left,
    Center,
    Right,
}

impl HorizontalAlignment {
    pub fn as_str(self) -> &'static str {
        match self {
            HorizontalAlignment::Left => "Left",
            HorizontalAlignment::Center => "Center",
            HorizontalAlignment::Right => "Right",
        }
    }
}

/// How the checkout code is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeStyle {
    /// `7492`
    Compact,
    /// `7 4 9 2`, for wide stock.
    Spaced,
}

/// A rectangle in twips (1/1440 in), relative to the label's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSpec {
    pub family: &'static str,
    pub size: u16,
    pub bold: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextField {
    pub bounds: Bounds,
    pub alignment: HorizontalAlignment,
    pub font: FontSpec,
}

/// The five text objects every check-in label carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelField {
    SubjectName,
    EventName,
    DateTime,
    CodeLabel,
    CheckoutCode,
}

impl LabelField {
    /// Object name inside the label document.
    pub fn object_name(self) -> &'static str {
        match self {
            LabelField::SubjectName => "KidName",
            LabelField::EventName => "EventInfo",
            LabelField::DateTime => "DateTime",
            LabelField::CodeLabel => "CodeLabel",
            LabelField::CheckoutCode => "CheckoutCode",
        }
    }
}

/// Geometry and typography of one label stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSpec {
    pub size: LabelSizeId,
    pub description: &'static str,
    pub orientation: PaperOrientation,
    pub paper_id: &'static str,
    pub paper_name: &'static str,
    /// Printable area in twips, in the orientation of the field bounds.
    pub paper_width: u32,
    pub paper_height: u32,
    pub subject_name: TextField,
    pub event_name: TextField,
    pub date_time: TextField,
    pub code_label: TextField,
    pub checkout_code: TextField,
    pub event_name_max_chars: usize,
    pub date_time_separator: &'static str,
    pub code_label_text: &'static str,
    pub checkout_code_style: CodeStyle,
}

impl LayoutSpec {
    /// Text objects in document order.
    pub fn fields(&self) -> [(LabelField, &TextField); 5] {
        [
            (LabelField::SubjectName, &self.subject_name),
            (LabelField::EventName, &self.event_name),
            (LabelField::DateTime, &self.date_time),
            (LabelField::CodeLabel, &self.code_label),
            (LabelField::CheckoutCode, &self.checkout_code),
        ]
    }
}

pub fn select_layout(size: LabelSizeId) -> &'static LayoutSpec {
    match size {
        LabelSizeId::Small30336 => &SMALL_30336,
        LabelSizeId::Address30252 => &ADDRESS_30252,
        LabelSizeId::Shipping30323 => &SHIPPING_30323,
        LabelSizeId::ReturnAddress30330 => &RETURN_ADDRESS_30330,
        LabelSizeId::ReturnAddressInt11352 => &RETURN_ADDRESS_INT_11352,
        LabelSizeId::Medium30334 => &MEDIUM_30334,
    }
}

// ////////////// //
// Layout table   //
// ////////////// //

const fn text(x: u32, y: u32, width: u32, height: u32, alignment: HorizontalAlignment, size: u16, bold: bool) -> TextField {
    TextField {
        bounds: Bounds { x, y, width, height },
        alignment,
        font: FontSpec { family: "Arial", size, bold },
    }
}

use HorizontalAlignment::{Center, Left, Right};

static SMALL_30336: LayoutSpec = LayoutSpec {
    size: LabelSizeId::Small30336,
    description: "1 in x 2-1/8 in",
    orientation: PaperOrientation::Portrait,
    paper_id: "Small30336",
    paper_name: "30336 1 in x 2-1/8 in",
    paper_width: 1440,
    paper_height: 3060,
    subject_name: text(60, 90, 1320, 520, Left, 14, true),
    event_name: text(60, 650, 1320, 360, Left, 8, false),
    date_time: text(60, 1050, 1320, 320, Left, 8, false),
    code_label: text(60, 1420, 1320, 300, Left, 9, false),
    checkout_code: text(60, 1760, 1320, 900, Left, 20, true),
    event_name_max_chars: 20,
    date_time_separator: " • ",
    code_label_text: "Code:",
    checkout_code_style: CodeStyle::Compact,
};

static ADDRESS_30252: LayoutSpec = LayoutSpec {
    size: LabelSizeId::Address30252,
    description: "1-1/8 in x 3-1/2 in",
    orientation: PaperOrientation::Landscape,
    paper_id: "Address",
    paper_name: "30252 Address",
    paper_width: 5040,
    paper_height: 1620,
    subject_name: text(50, 50, 2000, 350, Left, 18, true),
    event_name: text(50, 380, 2000, 200, Left, 10, false),
    date_time: text(50, 560, 2000, 200, Left, 10, false),
    code_label: text(50, 740, 2000, 220, Left, 12, false),
    checkout_code: text(50, 940, 2000, 400, Left, 24, true),
    event_name_max_chars: 30,
    date_time_separator: " • ",
    code_label_text: "Checkout Code:",
    checkout_code_style: CodeStyle::Spaced,
};

static SHIPPING_30323: LayoutSpec = LayoutSpec {
    size: LabelSizeId::Shipping30323,
    description: "2-1/8 in x 4 in",
    orientation: PaperOrientation::Landscape,
    paper_id: "Shipping",
    paper_name: "30323 Shipping",
    paper_width: 5760,
    paper_height: 3060,
    subject_name: text(150, 150, 5460, 640, Left, 24, true),
    event_name: text(150, 840, 5460, 400, Left, 14, false),
    date_time: text(150, 1260, 5460, 400, Left, 12, false),
    code_label: text(150, 1740, 5460, 360, Left, 14, false),
    checkout_code: text(150, 2120, 5460, 800, Left, 36, true),
    event_name_max_chars: 35,
    date_time_separator: " • ",
    code_label_text: "Checkout Code:",
    checkout_code_style: CodeStyle::Compact,
};

static RETURN_ADDRESS_30330: LayoutSpec = LayoutSpec {
    size: LabelSizeId::ReturnAddress30330,
    description: "3/4 in x 2 in",
    orientation: PaperOrientation::Landscape,
    paper_id: "ReturnAddress",
    paper_name: "30330 Return Address",
    paper_width: 2880,
    paper_height: 1080,
    subject_name: text(60, 40, 2760, 300, Left, 12, true),
    event_name: text(60, 340, 2760, 180, Left, 7, false),
    date_time: text(60, 520, 2760, 180, Left, 7, false),
    code_label: text(60, 700, 1100, 320, Left, 8, false),
    checkout_code: text(1200, 700, 1620, 320, Right, 14, true),
    event_name_max_chars: 15,
    date_time_separator: " ",
    code_label_text: "Code:",
    checkout_code_style: CodeStyle::Compact,
};

static RETURN_ADDRESS_INT_11352: LayoutSpec = LayoutSpec {
    size: LabelSizeId::ReturnAddressInt11352,
    description: "54 mm x 25 mm",
    orientation: PaperOrientation::Landscape,
    paper_id: "ReturnAddressInt",
    paper_name: "11352 Return Address Int",
    paper_width: 3061,
    paper_height: 1417,
    subject_name: text(80, 60, 2900, 380, Left, 14, true),
    event_name: text(80, 450, 2900, 220, Left, 8, false),
    date_time: text(80, 670, 2900, 220, Left, 8, false),
    code_label: text(80, 920, 1200, 420, Left, 9, false),
    checkout_code: text(1300, 900, 1680, 460, Right, 18, true),
    event_name_max_chars: 18,
    date_time_separator: " * ",
    code_label_text: "Code:",
    checkout_code_style: CodeStyle::Compact,
};

static MEDIUM_30334: LayoutSpec = LayoutSpec {
    size: LabelSizeId::Medium30334,
    description: "2-1/4 in x 1-1/4 in",
    orientation: PaperOrientation::Landscape,
    paper_id: "Medium30334",
    paper_name: "30334 2-1/4 in x 1-1/4 in",
    paper_width: 3240,
    paper_height: 1800,
    subject_name: text(100, 80, 3040, 440, Center, 16, true),
    event_name: text(100, 540, 3040, 260, Center, 9, false),
    date_time: text(100, 800, 3040, 240, Center, 9, false),
    code_label: text(100, 1060, 3040, 220, Center, 10, false),
    checkout_code: text(100, 1280, 3040, 440, Center, 22, true),
    event_name_max_chars: 25,
    date_time_separator: " * ",
    code_label_text: "Checkout Code:",
    checkout_code_style: CodeStyle::Compact,
};
