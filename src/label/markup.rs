//! DYMO `DieCutLabel` document rendering.

use quick_xml::escape::escape;

use super::layout::{CodeStyle, LabelField, LayoutSpec, TextField};
use super::request::LabelRequest;

const DOCUMENT_HEADER: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<DieCutLabel Version="8.0" Units="twips">
"#;

/// Renders `request` into a label document for `layout`.
pub fn render_markup(request: &LabelRequest, layout: &LayoutSpec) -> String {
    let mut out = String::with_capacity(8 * 1024);
    out.push_str(DOCUMENT_HEADER);
    out.push_str(&format!("    <PaperOrientation>{}</PaperOrientation>\n", layout.orientation.as_str()));
    out.push_str(&format!("    <Id>{}</Id>\n", layout.paper_id));
    out.push_str("    <IsOutlined>false</IsOutlined>\n");
    out.push_str(&format!("    <PaperName>{}</PaperName>\n", escape(layout.paper_name)));
    out.push_str("    <DrawCommands/>\n");

    for (field, text) in layout.fields() {
        let value = field_text(request, layout, field);
        write_text_object(&mut out, field, text, &value);
    }

    out.push_str("</DieCutLabel>\n");
    out
}

/// The unescaped text a field shows on the label.
pub fn field_text(request: &LabelRequest, layout: &LayoutSpec, field: LabelField) -> String {
    match field {
        LabelField::SubjectName => request.subject_name().to_string(),
        LabelField::EventName => truncate_chars(request.event_name(), layout.event_name_max_chars).to_string(),
        LabelField::DateTime => format!("{}{}{}", request.event_date(), layout.date_time_separator, request.checkin_time()),
        LabelField::CodeLabel => layout.code_label_text.to_string(),
        LabelField::CheckoutCode => match layout.checkout_code_style {
            CodeStyle::Compact => request.checkout_code().to_string(),
            CodeStyle::Spaced => spaced(request.checkout_code()),
        },
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

fn spaced(value: &str) -> String {
    let chars: Vec<String> = value.chars().map(String::from).collect();
    chars.join(" ")
}

fn bool_attr(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

fn write_text_object(out: &mut String, field: LabelField, text: &TextField, value: &str) {
    let b = text.bounds;
    out.push_str(&format!(
        r#"    <ObjectInfo>
        <TextObject>
            <Name>{name}</Name>
            <ForeColor Alpha="255" Red="0" Green="0" Blue="0" />
            <BackColor Alpha="0" Red="255" Green="255" Blue="255" />
            <LinkedObjectName/>
            <Rotation>Rotation0</Rotation>
            <IsMirrored>False</IsMirrored>
            <IsVariable>True</IsVariable>
            <HorizontalAlignment>{align}</HorizontalAlignment>
            <VerticalAlignment>Middle</VerticalAlignment>
            <TextFitMode>ShrinkToFit</TextFitMode>
            <UseFullFontHeight>True</UseFullFontHeight>
            <Verticalized>False</Verticalized>
            <StyledText>
                <Element>
                    <String>{value}</String>
                    <Attributes>
                        <Font Family="{family}" Size="{size}" Bold="{bold}" Italic="False" Underline="False" Strikeout="False" />
                        <ForeColor Alpha="255" Red="0" Green="0" Blue="0" />
                    </Attributes>
                </Element>
            </StyledText>
        </TextObject>
        <Bounds X="{x}" Y="{y}" Width="{width}" Height="{height}" />
    </ObjectInfo>
"#,
        name = field.object_name(),
        align = text.alignment.as_str(),
        value = escape(value),
        family = escape(text.font.family),
        size = text.font.size,
        bold = bool_attr(text.font.bold),
        x = b.x,
        y = b.y,
        width = b.width,
        height = b.height,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::layout::{select_layout, LabelSizeId};

    fn request(name: &str, event: &str, code: &str, size: LabelSizeId) -> LabelRequest {
        LabelRequest::new(name, event, "2024-10-01", "09:00", code, size).unwrap()
    }

    /// Text of the `<String>` inside the named text object.
    fn object_text(xml: &str, object: &str) -> String {
        let doc = roxmltree::Document::parse(xml).unwrap();
        let text_object = doc
            .descendants()
            .find(|n| n.has_tag_name("TextObject") && n.children().any(|c| c.has_tag_name("Name") && c.text() == Some(object)))
            .unwrap();
        let string = text_object.descendants().find(|n| n.has_tag_name("String")).unwrap();
        string.text().unwrap_or_default().to_string()
    }

    #[test]
    fn address_layout_truncates_event_to_thirty() {
        let layout = select_layout(LabelSizeId::Address30252);
        let long = "A".repeat(50);
        let xml = render_markup(&request("Ada", &long, "7492", LabelSizeId::Address30252), layout);
        assert_eq!(object_text(&xml, "EventInfo"), "A".repeat(30));
    }

    #[test]
    fn every_layout_truncates_to_its_limit() {
        let long = "x".repeat(100);
        for id in LabelSizeId::ALL {
            let layout = select_layout(id);
            let xml = render_markup(&request("Ada", &long, "7492", id), layout);
            assert_eq!(object_text(&xml, "EventInfo").chars().count(), layout.event_name_max_chars, "{id}");
        }
    }

    #[test]
    fn short_event_is_kept() {
        let layout = select_layout(LabelSizeId::ReturnAddress30330);
        let xml = render_markup(&request("Ada", "Camp", "1", LabelSizeId::ReturnAddress30330), layout);
        assert_eq!(object_text(&xml, "EventInfo"), "Camp");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let layout = select_layout(LabelSizeId::ReturnAddress30330);
        let event = "é".repeat(20);
        let xml = render_markup(&request("Ada", &event, "1", LabelSizeId::ReturnAddress30330), layout);
        assert_eq!(object_text(&xml, "EventInfo"), "é".repeat(15));
    }

    #[test]
    fn escapes_reserved_characters() {
        let id = LabelSizeId::Shipping30323;
        let req = request(r#"Bobby "Tables" <O'Neil>"#, "Cookies & Milk", "<&>", id);
        let xml = render_markup(&req, select_layout(id));

        assert!(xml.contains("Bobby &quot;Tables&quot; &lt;O&apos;Neil&gt;"));
        assert!(xml.contains("Cookies &amp; Milk"));
        assert_eq!(object_text(&xml, "KidName"), r#"Bobby "Tables" <O'Neil>"#);
        assert_eq!(object_text(&xml, "EventInfo"), "Cookies & Milk");
        assert_eq!(object_text(&xml, "CheckoutCode"), "<&>");
    }

    #[test]
    fn truncation_never_splits_an_entity() {
        let id = LabelSizeId::ReturnAddress30330;
        let event = format!("{}&more", "a".repeat(14));
        let xml = render_markup(&request("Ada", &event, "1", id), select_layout(id));
        assert_eq!(object_text(&xml, "EventInfo"), format!("{}&", "a".repeat(14)));
    }

    #[test]
    fn checkout_code_style_follows_layout() {
        let spaced = render_markup(&request("Ada", "Fall Festival", "7492", LabelSizeId::Address30252), select_layout(LabelSizeId::Address30252));
        assert_eq!(object_text(&spaced, "CheckoutCode"), "7 4 9 2");

        let compact = render_markup(&request("Ada", "Fall Festival", "7492", LabelSizeId::Small30336), select_layout(LabelSizeId::Small30336));
        assert_eq!(object_text(&compact, "CheckoutCode"), "7492");
    }

    #[test]
    fn date_time_uses_layout_separator() {
        let expected = [
            (LabelSizeId::Address30252, "2024-10-01 • 09:00"),
            (LabelSizeId::ReturnAddress30330, "2024-10-01 09:00"),
            (LabelSizeId::Medium30334, "2024-10-01 * 09:00"),
        ];
        for (id, line) in expected {
            let xml = render_markup(&request("Ada", "Fall Festival", "7492", id), select_layout(id));
            assert_eq!(object_text(&xml, "DateTime"), line);
        }
    }

    #[test]
    fn document_structure_matches_layout() {
        let layout = select_layout(LabelSizeId::Address30252);
        let xml = render_markup(&request("Ada", "Fall Festival", "7492", LabelSizeId::Address30252), layout);
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let root = doc.root_element();

        assert!(root.has_tag_name("DieCutLabel"));
        assert_eq!(root.attribute("Units"), Some("twips"));
        let count = |tag: &str| root.descendants().filter(|n| n.has_tag_name(tag)).count();
        assert_eq!(count("PaperOrientation"), 1);
        assert_eq!(count("Id"), 1);
        assert_eq!(count("PaperName"), 1);
        assert_eq!(count("ObjectInfo"), 5);

        let draw_commands = root.children().find(|n| n.has_tag_name("DrawCommands")).unwrap();
        assert!(!draw_commands.has_children());

        let child_text = |tag: &str| root.children().find(|n| n.has_tag_name(tag)).and_then(|n| n.text()).map(str::to_string);
        assert_eq!(child_text("PaperOrientation").as_deref(), Some("Landscape"));
        assert_eq!(child_text("PaperName").as_deref(), Some("30252 Address"));

        let name_bounds = root
            .descendants()
            .find(|n| n.has_tag_name("ObjectInfo") && n.descendants().any(|d| d.has_tag_name("Name") && d.text() == Some("KidName")))
            .and_then(|n| n.children().find(|c| c.has_tag_name("Bounds")))
            .unwrap();
        assert_eq!(name_bounds.attribute("X"), Some("50"));
        assert_eq!(name_bounds.attribute("Height"), Some("350"));

        let name_font = root.descendants().find(|n| n.has_tag_name("Font")).unwrap();
        assert_eq!(name_font.attribute("Size"), Some("18"));
        assert_eq!(name_font.attribute("Bold"), Some("True"));
    }

    #[test]
    fn every_layout_renders_well_formed_document() {
        for id in LabelSizeId::ALL {
            let xml = render_markup(&request("A & B", "<Event>", "'1'", id), select_layout(id));
            assert!(roxmltree::Document::parse(&xml).is_ok(), "{id} produced malformed markup");
            assert_eq!(object_text(&xml, "CodeLabel"), select_layout(id).code_label_text);
        }
    }
}
