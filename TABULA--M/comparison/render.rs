//! Self-contained HTML fragments with inline styles.
//!
//! Every string interpolated here is a [`SafeText`] or a fixed palette
//! constant, so the renderer itself does no escaping.

use std::fmt::Write as _;

use crate::{
    safe_text::SafeText,
    table::{ComparisonTable, ProsConsTable},
};

const BORDER: &str = "#E8E4D4";
const TEXT: &str = "#2a2a2a";
const PLACEHOLDER: &str = "-";

const HEADER_CELL: &str =
    "padding: 1rem; text-align: left; font-weight: 700; border-bottom: 2px solid #E8E4D4;";
const LABEL_CELL: &str =
    "padding: 1rem; font-weight: 600; color: #2a2a2a; border-bottom: 1px solid #E8E4D4;";
const VALUE_CELL: &str = "padding: 1rem; color: #2a2a2a; border-bottom: 1px solid #E8E4D4;";
const ITEM_HEADER_CELL: &str =
    "padding: 1rem; font-weight: 700; border-bottom: 2px solid #E8E4D4; text-align: center;";
const SUB_HEADER_CELL: &str =
    "padding: 0.75rem; font-weight: 600; border-bottom: 1px solid #E8E4D4; width: 25%;";
const LIST_CELL: &str = "padding: 0.75rem; border-bottom: 1px solid #E8E4D4; color: #2a2a2a;";
const EMPTY_CELL: &str = "padding: 0.75rem; border-bottom: 1px solid #E8E4D4;";

/// Renders an item-by-attribute matrix with a leading "Feature" column.
///
/// Missing cells show `-`; rows stripe by attribute index.
#[must_use]
pub fn render_comparison_table(table: &ComparisonTable) -> String {
    let palette = table.theme().palette();

    let mut header = format!(r#"<th style="{HEADER_CELL}">Feature</th>"#);
    for item in table.items() {
        let _ = write!(header, r#"<th style="{HEADER_CELL}">{item}</th>"#);
    }

    let mut rows = String::new();
    for (idx, attribute) in table.attributes().iter().enumerate() {
        let _ = write!(
            rows,
            r#"<tr style="background: {bg};"><td style="{LABEL_CELL}">{attribute}</td>"#,
            bg = palette.row(idx),
        );
        for item in table.items() {
            let value = table
                .value(item.raw(), attribute.raw())
                .map_or(PLACEHOLDER, SafeText::as_html);
            let _ = write!(rows, r#"<td style="{VALUE_CELL}">{value}</td>"#);
        }
        rows.push_str("</tr>");
    }

    format!(
        r#"<div style="margin: 1.5rem 0; overflow-x: auto;">
<h3 style="color: {TEXT}; font-size: 1.2rem; margin-bottom: 1rem;">📊 {title}</h3>
<table style="width: 100%; border-collapse: collapse; border: 1px solid {BORDER}; border-radius: 8px; overflow: hidden; background: white; box-shadow: 0 2px 8px rgba(0, 0, 0, 0.08); font-family: 'Poppins', sans-serif;">
<thead><tr style="background: {head}; color: #1a1a1a;">{header}</tr></thead>
<tbody>{rows}</tbody>
</table>
</div>"#,
        title = table.title(),
        head = palette.header,
    )
}

/// Renders two items side by side with a pros and a cons column each.
///
/// Row count is the longest list; shorter lists leave empty cells.
#[must_use]
pub fn render_pros_cons_table(table: &ProsConsTable) -> String {
    let palette = table.theme.palette();
    let columns = [&table.pros_a, &table.cons_a, &table.pros_b, &table.cons_b];

    let mut rows = String::new();
    for idx in 0..table.row_count() {
        let _ = write!(rows, r#"<tr style="background: {};">"#, palette.row(idx));
        for column in columns {
            match column.get(idx) {
                Some(entry) => {
                    let _ = write!(rows, r#"<td style="{LIST_CELL}">• {entry}</td>"#);
                }
                None => {
                    let _ = write!(rows, r#"<td style="{EMPTY_CELL}"></td>"#);
                }
            }
        }
        rows.push_str("</tr>");
    }

    format!(
        r#"<div style="margin: 1.5rem 0;">
<h3 style="color: {TEXT}; font-size: 1.2rem; margin-bottom: 1rem;">⚖️ Pros &amp; Cons Comparison</h3>
<table style="width: 100%; border-collapse: collapse; border: 1px solid {BORDER}; background: white; box-shadow: 0 2px 8px rgba(0, 0, 0, 0.08); font-family: 'Poppins', sans-serif;">
<thead>
<tr style="background: {head}; color: #1a1a1a;"><th colspan="2" style="{ITEM_HEADER_CELL}">{item_a}</th><th colspan="2" style="{ITEM_HEADER_CELL}">{item_b}</th></tr>
<tr style="background: {sub};">{labels}</tr>
</thead>
<tbody>{rows}</tbody>
</table>
</div>"#,
        head = palette.header,
        sub = palette.row_odd,
        item_a = table.item_a,
        item_b = table.item_b,
        labels = sub_header_labels(),
    )
}

fn sub_header_labels() -> String {
    ["✅ Pros", "❌ Cons", "✅ Pros", "❌ Cons"]
        .iter()
        .map(|label| format!(r#"<th style="{SUB_HEADER_CELL}">{label}</th>"#))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Theme;

    fn python_vs_js(theme: Theme) -> ComparisonTable {
        ComparisonTable::builder("Python vs JavaScript")
            .items(["Python", "JavaScript"])
            .attributes(["Type", "Speed"])
            .value("Python", "Type", "Interpreted")
            .theme(theme)
            .build()
            .unwrap()
    }

    fn data_cells(html: &str) -> Vec<String> {
        html.split(&format!(r#"<td style="{VALUE_CELL}">"#))
            .skip(1)
            .map(|chunk| chunk.split("</td>").next().unwrap().to_string())
            .collect()
    }

    #[test]
    fn comparison_table_contains_headers_values_and_placeholders() {
        let html = render_comparison_table(&python_vs_js(Theme::Beige));
        assert!(html.contains("Python vs JavaScript"));
        assert!(html.contains(&format!(r#"<th style="{HEADER_CELL}">Python</th>"#)));
        assert!(html.contains(&format!(r#"<th style="{HEADER_CELL}">JavaScript</th>"#)));
        assert!(html.contains(&format!(r#"<th style="{HEADER_CELL}">Feature</th>"#)));
        // Type row: Python, JavaScript; Speed row: Python, JavaScript
        assert_eq!(data_cells(&html), vec!["Interpreted", "-", "-", "-"]);
    }

    #[test]
    fn empty_values_render_every_cell_as_placeholder() {
        let table = ComparisonTable::builder("Empty")
            .items(["A", "B", "C"])
            .attributes(["x", "y"])
            .build()
            .unwrap();
        let cells = data_cells(&render_comparison_table(&table));
        assert_eq!(cells.len(), 6);
        assert!(cells.iter().all(|cell| cell == "-"));
    }

    #[test]
    fn rows_stripe_by_attribute_index() {
        let html = render_comparison_table(&python_vs_js(Theme::Blue));
        let even = html.find("background: #E3F2FD;").unwrap();
        let odd = html.find("background: #BBDEFB;").unwrap();
        assert!(even < odd);
        assert!(html.contains("background: #64B5F6;"));
    }

    #[test]
    fn unknown_theme_renders_like_beige() {
        let fallback = python_vs_js(Theme::from_name("neon"));
        assert_eq!(
            render_comparison_table(&fallback),
            render_comparison_table(&python_vs_js(Theme::Beige))
        );
    }

    #[test]
    fn caller_markup_is_escaped() {
        let table = ComparisonTable::builder("<b>t</b>")
            .item("<script>alert(1)</script>")
            .attribute("a")
            .value("<script>alert(1)</script>", "a", "x & y")
            .build()
            .unwrap();
        let html = render_comparison_table(&table);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("&lt;b&gt;t&lt;/b&gt;"));
        assert_eq!(data_cells(&html), vec!["x &amp; y"]);
    }

    #[test]
    fn rendering_is_deterministic() {
        let table = python_vs_js(Theme::Green);
        assert_eq!(render_comparison_table(&table), render_comparison_table(&table));
    }

    #[test]
    fn pros_cons_pads_short_columns_with_empty_cells() {
        let table = ProsConsTable::new("Remote", "Office")
            .side_a(["P1"], Vec::<String>::new())
            .side_b(Vec::<String>::new(), ["C1"]);
        let html = render_pros_cons_table(&table);

        let body = html.split("<tbody>").nth(1).unwrap();
        assert_eq!(body.matches("<tr").count(), 1);

        let row = body.split("</tr>").next().unwrap();
        let cells: Vec<&str> = row.split("<td").skip(1).collect();
        assert_eq!(cells.len(), 4);
        assert!(cells[0].contains("• P1"));
        assert!(cells[1].ends_with("></td>"));
        assert!(cells[2].ends_with("></td>"));
        assert!(cells[3].contains("• C1"));
    }

    #[test]
    fn pros_cons_header_spans_two_columns_per_item() {
        let table = ProsConsTable::new("Remote", "Office").side_a(["a", "b"], ["c"]);
        let html = render_pros_cons_table(&table);
        assert!(html.contains(r#"colspan="2""#));
        assert!(html.contains(">Remote</th>"));
        assert!(html.contains(">Office</th>"));
        assert_eq!(html.matches("✅ Pros").count(), 2);
        assert_eq!(html.matches("❌ Cons").count(), 2);
        let body = html.split("<tbody>").nth(1).unwrap();
        assert_eq!(body.matches("<tr").count(), 2);
        assert!(body.contains("background: #F5F3ED;"));
        assert!(body.contains("background: #EDE9DC;"));
    }

    #[test]
    fn pros_cons_never_truncates_longer_lists() {
        let pros: Vec<String> = (0..5).map(|i| format!("pro {i}")).collect();
        let table = ProsConsTable::new("A", "B").side_b(pros, ["only con"]);
        let html = render_pros_cons_table(&table);
        for i in 0..5 {
            assert!(html.contains(&format!("• pro {i}")));
        }
        let body = html.split("<tbody>").nth(1).unwrap();
        assert_eq!(body.matches("<tr").count(), 5);
    }
}
