//! Sheet rendering: SVG assembly, rasterization, PNG encoding.
//!
//! The sheet is built as an SVG string from the cached layout plan,
//! then rasterized with an injected font database. Rendering is a
//! pure function of its inputs: the same groups, date label, theme
//! and fonts produce byte-identical SVG and pixel-identical output.

use crate::error::{Result, SheetError};
use crate::layout::{Column, SheetLayout, measure};
use crate::price;
use crate::record::ItemGroup;
use crate::theme::Theme;
use png::{BitDepth, ColorType, Encoder};
use std::sync::Arc;

/// A laid-out sheet: the SVG document and its pixel dimensions.
#[derive(Clone, Debug)]
pub struct SheetSvg {
    pub svg: String,
    pub width: u32,
    pub height: u32,
}

fn svg_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// Rough advance-width estimate: ASCII glyphs at ~0.55em, CJK at 1em.
// Only used to decide whether a guide line fits between spec and
// price, so it just has to err on the generous side.
fn text_width_est(text: &str, font_px: f64) -> f64 {
    text.chars()
        .map(|c| if c.is_ascii() { font_px * 0.55 } else { font_px })
        .sum()
}

/// Price text as drawn: prefixed with `$` unless it already carries
/// one or has no numeric token (out-of-stock statuses stay as typed).
fn display_price(raw: &str) -> String {
    let t = raw.trim();
    if t.contains('$') || !price::has_amount(t) {
        t.to_string()
    } else {
        format!("${t}")
    }
}

fn validate(groups: &[ItemGroup]) -> Result<()> {
    for g in groups {
        if g.item_name.trim().is_empty() {
            return Err(SheetError::InvalidRecord {
                item_name: g.item_name.clone(),
                reason: "empty item name".to_string(),
            });
        }
        for r in &g.records {
            if !r.has_price() {
                return Err(SheetError::InvalidRecord {
                    item_name: g.item_name.clone(),
                    reason: format!(
                        "blank price field for spec {:?}; filter unpriced records before rendering",
                        r.spec
                    ),
                });
            }
        }
    }
    Ok(())
}

/// Build the sheet SVG for pre-filtered, grouped records.
///
/// Groups with zero records are skipped without a title band; a
/// record with a blank price reaching this function is a contract
/// violation and is reported as [`SheetError::InvalidRecord`].
pub fn build_sheet_svg(groups: &[ItemGroup], date_label: &str, theme: &Theme) -> Result<SheetSvg> {
    validate(groups)?;
    let visible: Vec<&ItemGroup> = groups.iter().filter(|g| !g.records.is_empty()).collect();
    let layout: SheetLayout = measure(visible.iter().copied(), theme);
    tracing::debug!(
        groups = visible.len(),
        height = layout.canvas_height,
        "building sheet svg"
    );

    let width = theme.width;
    let height = layout.canvas_height;
    let colw = theme.column_width();

    let mut s = String::new();
    s.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    s.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" font-family=\"sans-serif\">\n",
        width, height, width, height
    ));
    s.push_str(&format!(
        "<rect x=\"0\" y=\"0\" width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
        theme.background
    ));

    // Header band: title, date label, advisory line.
    s.push_str(&format!(
        "<rect x=\"0\" y=\"0\" width=\"100%\" height=\"{}\" fill=\"{}\"/>\n",
        theme.header_band, theme.header_fill
    ));
    s.push_str(&format!(
        "<text x=\"{}\" y=\"{:.1}\" fill=\"{}\" font-size=\"{}\" font-weight=\"bold\">{}</text>\n",
        theme.margin,
        theme.header_band * 0.45,
        theme.header_text,
        theme.fonts.header,
        svg_escape(&theme.sheet_title)
    ));
    s.push_str(&format!(
        "<text x=\"{}\" y=\"{:.1}\" fill=\"{}\" font-size=\"{}\">日期：{}</text>\n",
        theme.margin,
        theme.header_band * 0.68,
        theme.date_text,
        theme.fonts.date,
        svg_escape(date_label)
    ));
    s.push_str(&format!(
        "<text x=\"{}\" y=\"{:.1}\" fill=\"{}\" font-size=\"{}\">{}</text>\n",
        theme.margin,
        theme.header_band * 0.88,
        theme.date_text,
        theme.fonts.note,
        svg_escape(&theme.advisory)
    ));

    // Content pass: same order, cached column assignment.
    for (group, slot) in visible.iter().zip(layout.slots.iter()) {
        let x0 = theme.column_x(slot.column == Column::Right);
        let mut y = slot.y;

        s.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"{}\" font-weight=\"bold\">● {}</text>\n",
            x0,
            y + theme.fonts.title + 4.0,
            theme.title_color,
            theme.fonts.title,
            svg_escape(&group.item_name)
        ));
        y += theme.title_height;

        for record in &group.records {
            let baseline = y + theme.row_height * 0.68;
            let spec_x = x0 + 8.0;
            s.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"{}\">{}</text>\n",
                spec_x,
                baseline,
                theme.spec_color,
                theme.fonts.spec,
                svg_escape(&record.spec)
            ));
            let shown = display_price(&record.price_text);
            s.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" fill=\"{}\" font-size=\"{}\">{}</text>\n",
                x0 + colw,
                baseline,
                theme.price_color,
                theme.fonts.price,
                svg_escape(&shown)
            ));
            // Thin guide line between spec and price when there is room.
            let guide_x0 = spec_x + text_width_est(&record.spec, theme.fonts.spec) + 12.0;
            let guide_x1 = x0 + colw - text_width_est(&shown, theme.fonts.price) - 12.0;
            if guide_x0 < guide_x1 {
                s.push_str(&format!(
                    "<path d=\"M {:.1} {:.1} L {:.1} {:.1}\" stroke=\"{}\" stroke-width=\"1\"/>\n",
                    guide_x0,
                    baseline - theme.fonts.spec * 0.3,
                    guide_x1,
                    baseline - theme.fonts.spec * 0.3,
                    theme.guide_color
                ));
            }
            y += theme.row_height;
        }

        if let Some(note) = group.note() {
            s.push_str(&format!(
                "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"/>\n",
                x0,
                y + 2.0,
                colw,
                theme.note_height - 6.0,
                theme.note_fill
            ));
            s.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"{}\">{}</text>\n",
                x0 + 8.0,
                y + theme.note_height * 0.62,
                theme.note_color,
                theme.fonts.note,
                svg_escape(note)
            ));
        }
    }

    // Footer: separator at the bottom of the taller column, then the
    // attribution string centered beneath it.
    let sep_y = layout.left_total.max(layout.right_total) + 10.0;
    s.push_str(&format!(
        "<path d=\"M {:.1} {:.1} L {:.1} {:.1}\" stroke=\"{}\" stroke-width=\"1\"/>\n",
        theme.margin,
        sep_y,
        width as f64 - theme.margin,
        sep_y,
        theme.guide_color
    ));
    s.push_str(&format!(
        "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"{}\" font-size=\"{}\">{}</text>\n",
        width as f64 / 2.0,
        sep_y + theme.fonts.footer + 16.0,
        theme.footer_color,
        theme.fonts.footer,
        svg_escape(&theme.attribution)
    ));
    s.push_str("</svg>\n");

    Ok(SheetSvg {
        svg: s,
        width,
        height,
    })
}

/// Rasterize a built sheet with the supplied font database. An empty
/// database is valid input: text is simply not drawn, the structure
/// (bands, rules, shading) still is.
pub fn rasterize(
    sheet: &SheetSvg,
    fontdb: Arc<usvg::fontdb::Database>,
) -> Result<tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    opt.fontdb = fontdb;
    let tree = usvg::Tree::from_str(&sheet.svg, &opt)
        .map_err(|e| SheetError::Svg(format!("{e:?}")))?;
    let mut pixmap =
        tiny_skia::Pixmap::new(sheet.width, sheet.height).ok_or(SheetError::PixmapAlloc {
            width: sheet.width,
            height: sheet.height,
        })?;
    let mut pm = pixmap.as_mut();
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pm);
    Ok(pixmap)
}

/// Build and rasterize in one call.
pub fn render(
    groups: &[ItemGroup],
    date_label: &str,
    theme: &Theme,
    fontdb: Arc<usvg::fontdb::Database>,
) -> Result<tiny_skia::Pixmap> {
    let sheet = build_sheet_svg(groups, date_label, theme)?;
    rasterize(&sheet, fontdb)
}

// Shared PNG encoder: RGBA -> PNG bytes (deterministic for same input)
pub fn encode_rgba_to_png_bytes(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut enc = Encoder::new(&mut buf, width, height);
        enc.set_color(ColorType::Rgba);
        enc.set_depth(BitDepth::Eight);
        {
            let mut writer = enc.write_header()?;
            writer.write_image_data(rgba)?;
        }
        // enc drops here, releasing the &mut buf borrow
    }
    Ok(buf)
}

/// Encode a rendered sheet to PNG bytes.
pub fn encode_png(pixmap: &tiny_skia::Pixmap) -> Result<Vec<u8>> {
    encode_rgba_to_png_bytes(pixmap.width(), pixmap.height(), pixmap.data())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PriceRecord;

    fn rec(item: &str, spec: &str, price: &str, note: Option<&str>) -> PriceRecord {
        PriceRecord {
            item_name: item.to_string(),
            spec: spec.to_string(),
            note: note.map(str::to_string),
            price_text: price.to_string(),
        }
    }

    fn sample_groups() -> Vec<ItemGroup> {
        vec![
            ItemGroup {
                item_name: "白蝦".to_string(),
                records: vec![
                    rec("白蝦", "大 (20/25)", "600", None),
                    rec("白蝦", "小 (30/35)", "450", Some("可代工去殼")),
                ],
            },
            ItemGroup {
                item_name: "蛤蜊".to_string(),
                records: vec![rec("蛤蜊", "一袋", "售完", None)],
            },
        ]
    }

    #[test]
    fn same_input_builds_identical_svg() {
        let theme = Theme::default();
        let a = build_sheet_svg(&sample_groups(), "2026/08/29", &theme).unwrap();
        let b = build_sheet_svg(&sample_groups(), "2026/08/29", &theme).unwrap();
        assert_eq!(a.svg, b.svg);
        assert_eq!(a.height, b.height);
    }

    #[test]
    fn prices_get_currency_prefix_unless_marked_or_sold_out() {
        let theme = Theme::default();
        let sheet = build_sheet_svg(&sample_groups(), "2026/08/29", &theme).unwrap();
        assert!(sheet.svg.contains(">$600<"));
        assert!(sheet.svg.contains(">售完<"));
        assert_eq!(display_price("$600"), "$600");
        assert_eq!(display_price(" 450 "), "$450");
    }

    #[test]
    fn blank_price_reaching_render_is_a_contract_violation() {
        let theme = Theme::default();
        let groups = vec![ItemGroup {
            item_name: "白蝦".to_string(),
            records: vec![rec("白蝦", "大", "", None)],
        }];
        let err = build_sheet_svg(&groups, "2026/08/29", &theme).unwrap_err();
        match err {
            SheetError::InvalidRecord { item_name, .. } => assert_eq!(item_name, "白蝦"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_item_name_is_rejected() {
        let theme = Theme::default();
        let groups = vec![ItemGroup {
            item_name: "  ".to_string(),
            records: vec![rec("", "大", "600", None)],
        }];
        assert!(build_sheet_svg(&groups, "2026/08/29", &theme).is_err());
    }

    #[test]
    fn emptied_group_gets_no_title_band() {
        let theme = Theme::default();
        let mut groups = sample_groups();
        groups.push(ItemGroup {
            item_name: "透抽".to_string(),
            records: Vec::new(),
        });
        let sheet = build_sheet_svg(&groups, "2026/08/29", &theme).unwrap();
        assert!(!sheet.svg.contains("透抽"));
    }

    #[test]
    fn groups_appear_in_first_seen_order() {
        let theme = Theme::default();
        let sheet = build_sheet_svg(&sample_groups(), "2026/08/29", &theme).unwrap();
        let first = sheet.svg.find("白蝦").unwrap();
        let second = sheet.svg.find("蛤蜊").unwrap();
        assert!(first < second);
    }

    #[test]
    fn note_draws_a_shaded_sub_band() {
        let theme = Theme::default();
        let sheet = build_sheet_svg(&sample_groups(), "2026/08/29", &theme).unwrap();
        assert!(sheet.svg.contains(&theme.note_fill));
        assert!(sheet.svg.contains("可代工去殼"));
    }

    #[test]
    fn canvas_height_exceeds_header_and_footer() {
        let theme = Theme::default();
        let sheet = build_sheet_svg(&sample_groups(), "2026/08/29", &theme).unwrap();
        assert!(sheet.height as f64 > theme.header_band + theme.footer_allowance);
    }

    #[test]
    fn rasterizes_without_fonts_and_is_pixel_identical() {
        let theme = Theme::default();
        let sheet = build_sheet_svg(&sample_groups(), "2026/08/29", &theme).unwrap();
        let fontdb = Arc::new(usvg::fontdb::Database::new());
        let a = rasterize(&sheet, fontdb.clone()).unwrap();
        let b = rasterize(&sheet, fontdb).unwrap();
        assert_eq!(a.width(), theme.width);
        assert_eq!(a.height(), sheet.height);
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn png_bytes_are_deterministic() {
        let theme = Theme::default();
        let sheet = build_sheet_svg(&sample_groups(), "2026/08/29", &theme).unwrap();
        let pixmap = rasterize(&sheet, Arc::new(usvg::fontdb::Database::new())).unwrap();
        let a = encode_png(&pixmap).unwrap();
        let b = encode_png(&pixmap).unwrap();
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }
}
