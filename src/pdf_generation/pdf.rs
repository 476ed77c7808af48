use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use tracing::debug;

use super::context::PosterContext;
use super::paper::mm_to_pt;
use super::text::{to_win_ansi, wrap_text};
use crate::db::enums::{SectionType, TemplateCode};
use crate::version::VERSION;

const REGULAR: Name<'static> = Name(b"F1");
const BOLD: Name<'static> = Name(b"F2");

const HEADER_BLUE: &str = "#006699";
const PANEL_GREY: &str = "#f8f8f8";
const TEXT_GREY: &str = "#333333";
const WHITE: &str = "#ffffff";

// Average Helvetica glyph width in ems, used for wrapping.
const GLYPH_WIDTH: f32 = 0.55;

type Rgb = (f32, f32, f32);

fn rgb(hex: &str) -> Rgb {
    let hex = hex.trim_start_matches('#');
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .map_or(0.0, |v| v as f32 / 255.0)
    };
    (channel(0), channel(2), channel(4))
}

fn status_colour(status_class: &str) -> &'static str {
    match status_class {
        "excellent" => "#28a745",
        "good" => "#17a2b8",
        "sufficient" => "#ffc107",
        "poor" => "#dc3545",
        _ => TEXT_GREY,
    }
}

fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v} cfu/100ml"))
}

/// Page in points with a cursor moving down from the top margin.
struct Canvas {
    content: Content,
    width: f32,
    height: f32,
    margin: f32,
    cursor: f32,
    floor: f32,
    scale: f32,
}

impl Canvas {
    fn new(width_mm: f32, height_mm: f32, scale: f32) -> Self {
        let width = mm_to_pt(width_mm);
        let height = mm_to_pt(height_mm);
        let margin = mm_to_pt(10.0);
        Self {
            content: Content::new(),
            width,
            height,
            margin,
            cursor: height - margin,
            floor: margin,
            scale,
        }
    }

    fn title_size(&self) -> f32 {
        72.0 * self.scale
    }
    fn subtitle_size(&self) -> f32 {
        48.0 * self.scale
    }
    fn body_size(&self) -> f32 {
        24.0 * self.scale
    }
    fn small_size(&self) -> f32 {
        18.0 * self.scale
    }
    fn padding(&self) -> f32 {
        mm_to_pt(20.0 * self.scale)
    }
    fn gap(&self) -> f32 {
        mm_to_pt(10.0 * self.scale)
    }
    fn inner_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    fn has_room(&self, height: f32) -> bool {
        self.cursor - height >= self.floor
    }

    fn max_chars(&self, size: f32, width: f32) -> usize {
        (width / (size * GLYPH_WIDTH)).floor() as usize
    }

    fn wrapped(&self, text: &str, size: f32, width: f32) -> Vec<String> {
        wrap_text(text, self.max_chars(size, width))
    }

    fn line_height(size: f32) -> f32 {
        size * 1.3
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, colour: &str) {
        let (r, g, b) = rgb(colour);
        self.content
            .save_state()
            .set_fill_rgb(r, g, b)
            .rect(x, y, w, h)
            .fill_nonzero()
            .restore_state();
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, colour: &str, line_width: f32) {
        let (r, g, b) = rgb(colour);
        self.content
            .save_state()
            .set_stroke_rgb(r, g, b)
            .set_line_width(line_width)
            .rect(x, y, w, h)
            .stroke()
            .restore_state();
    }

    fn text_at(&mut self, x: f32, baseline: f32, size: f32, bold: bool, colour: &str, text: &str) {
        let (r, g, b) = rgb(colour);
        let encoded = to_win_ansi(text);
        self.content
            .save_state()
            .set_fill_rgb(r, g, b)
            .begin_text()
            .set_font(if bold { BOLD } else { REGULAR }, size)
            .next_line(x, baseline)
            .show(Str(&encoded))
            .end_text()
            .restore_state();
    }

    /// Writes wrapped lines at `x` from the cursor down and advances it.
    fn paragraph(&mut self, x: f32, width: f32, size: f32, bold: bool, colour: &str, text: &str) {
        for line in self.wrapped(text, size, width) {
            let baseline = self.cursor - size;
            self.text_at(x, baseline, size, bold, colour, &line);
            self.cursor -= Self::line_height(size);
        }
    }

    fn paragraph_height(&self, size: f32, width: f32, text: &str) -> f32 {
        self.wrapped(text, size, width).len() as f32 * Self::line_height(size)
    }
}

fn draw_debug_banner(canvas: &mut Canvas, ctx: &PosterContext) {
    let size = canvas.small_size();
    let height = size * 2.0;
    let (x, w) = (canvas.margin, canvas.inner_width());
    canvas.fill_rect(x, canvas.cursor - height, w, height, "#dc3545");
    canvas.text_at(x + size, canvas.cursor - size * 1.4, size, true, WHITE, ctx.label("mock_data"));
    canvas.cursor -= height + canvas.gap();
}

fn draw_header(canvas: &mut Canvas, ctx: &PosterContext) {
    let pad = canvas.padding();
    let (x, w) = (canvas.margin, canvas.inner_width());
    let text_width = w - 2.0 * pad;
    let (title, subtitle, small) = (canvas.title_size(), canvas.subtitle_size(), canvas.small_size());

    let second_name = (ctx.language.as_str() == "bilingual"
        && !ctx.beach_name_ga.is_empty()
        && ctx.beach_name_ga != ctx.beach_name_en)
        .then(|| ctx.beach_name_ga.clone());

    let mut height = 2.0 * pad
        + canvas.paragraph_height(title, text_width, &ctx.beach_name)
        + canvas.paragraph_height(subtitle, text_width, ctx.label("headline"))
        + Canvas::line_height(small);
    if let Some(name) = &second_name {
        height += canvas.paragraph_height(subtitle, text_width, name);
    }

    canvas.fill_rect(x, canvas.cursor - height, w, height, HEADER_BLUE);
    let bottom = canvas.cursor - height;
    canvas.cursor -= pad;
    canvas.paragraph(x + pad, text_width, title, true, WHITE, &ctx.beach_name);
    if let Some(name) = &second_name {
        canvas.paragraph(x + pad, text_width, subtitle, false, WHITE, name);
    }
    let headline = ctx.label("headline").to_string();
    canvas.paragraph(x + pad, text_width, subtitle, false, WHITE, &headline);
    canvas.paragraph(x + pad, text_width, small, false, WHITE, ctx.classification_label);
    canvas.cursor = bottom - canvas.gap();
}

fn draw_notification(canvas: &mut Canvas, ctx: &PosterContext) {
    if ctx.custom_notification.is_empty() {
        return;
    }
    let body = canvas.body_size();
    let gap = canvas.gap();
    let bar = 4.0 * canvas.scale.max(0.25);
    let text = format!("{}: {}", ctx.label("notice"), ctx.custom_notification);
    let width = canvas.inner_width() - gap - bar;
    let height = canvas.paragraph_height(body, width, &text) + gap;
    if !canvas.has_room(height) {
        debug!("no room for custom notification");
        return;
    }

    canvas.fill_rect(canvas.margin, canvas.cursor - height, bar, height, HEADER_BLUE);
    canvas.cursor -= gap / 2.0;
    canvas.paragraph(canvas.margin + bar + gap, width, body, false, TEXT_GREY, &text);
    canvas.cursor -= gap / 2.0 + gap;
}

fn draw_guidance(canvas: &mut Canvas, ctx: &PosterContext) {
    let body = canvas.body_size();
    let guidance = ctx.label("guidance").to_string();
    let width = canvas.inner_width();
    if !canvas.has_room(canvas.paragraph_height(body, width, &guidance)) {
        return;
    }
    canvas.paragraph(canvas.margin, width, body, false, TEXT_GREY, &guidance);
    canvas.cursor -= canvas.gap();
}

fn draw_water_quality(canvas: &mut Canvas, ctx: &PosterContext) {
    let (subtitle, body, small) = (canvas.subtitle_size(), canvas.body_size(), canvas.small_size());
    let pad = canvas.padding() / 2.0;
    let (x, w) = (canvas.margin, canvas.inner_width());

    let status = if ctx.water_quality_status.is_empty() {
        ctx.label("no_data").to_string()
    } else {
        ctx.water_quality_status.clone()
    };
    let rows = [
        (ctx.label("classification").to_string(), status, status_colour(ctx.status_class())),
        (
            ctx.label("last_sample").to_string(),
            ctx.last_sample_date.clone().unwrap_or_else(|| ctx.label("no_data").to_string()),
            TEXT_GREY,
        ),
        (ctx.label("ecoli").to_string(), format_value(ctx.ecoli_value), TEXT_GREY),
        (ctx.label("enterococci").to_string(), format_value(ctx.enterococci_value), TEXT_GREY),
    ];
    let recent = &ctx.recent_measurements;

    let mut height = 2.0 * pad + Canvas::line_height(subtitle) + rows.len() as f32 * Canvas::line_height(body);
    if !recent.is_empty() {
        height += (recent.len() + 2) as f32 * Canvas::line_height(small);
    }
    if !canvas.has_room(height) {
        debug!("no room for water quality panel");
        return;
    }

    canvas.fill_rect(x, canvas.cursor - height, w, height, PANEL_GREY);
    let bottom = canvas.cursor - height;
    canvas.cursor -= pad;
    let heading = ctx.label("water_quality").to_string();
    canvas.paragraph(x + pad, w - 2.0 * pad, subtitle, true, HEADER_BLUE, &heading);

    let value_x = x + pad + (w - 2.0 * pad) * 0.45;
    for (label, value, colour) in rows {
        let baseline = canvas.cursor - body;
        canvas.text_at(x + pad, baseline, body, true, TEXT_GREY, &label);
        canvas.text_at(value_x, baseline, body, false, colour, &value);
        canvas.cursor -= Canvas::line_height(body);
    }

    if !recent.is_empty() {
        canvas.cursor -= Canvas::line_height(small);
        let column = (w - 2.0 * pad) / 4.0;
        let headings = [
            ctx.label("sample_date").to_string(),
            ctx.label("ecoli").to_string(),
            ctx.label("enterococci").to_string(),
            ctx.label("result").to_string(),
        ];
        let mut table = vec![headings];
        for m in recent {
            table.push([
                m.date.clone(),
                m.ecoli.map_or_else(|| "-".to_string(), |v| v.to_string()),
                m.enterococci.map_or_else(|| "-".to_string(), |v| v.to_string()),
                m.quality.clone(),
            ]);
        }
        for (i, row) in table.iter().enumerate() {
            let baseline = canvas.cursor - small;
            for (c, cell) in row.iter().enumerate() {
                let x = x + pad + c as f32 * column;
                canvas.text_at(x, baseline, small, i == 0, TEXT_GREY, cell);
            }
            canvas.cursor -= Canvas::line_height(small);
        }
    }
    canvas.cursor = bottom - canvas.gap();
}

fn draw_alert(canvas: &mut Canvas, ctx: &PosterContext) {
    if !ctx.shows_alert() {
        return;
    }
    let (subtitle, body) = (canvas.subtitle_size(), canvas.body_size());
    let pad = canvas.padding() / 2.0;
    let (x, w) = (canvas.margin, canvas.inner_width());
    let text_width = w - 2.0 * pad;
    let (fill, border) = if ctx.template_type == TemplateCode::T1B {
        ("#fff3cd", "#ffc107")
    } else {
        ("#f8d7da", "#dc3545")
    };

    let mut lines: Vec<(String, bool)> = Vec::new();
    match &ctx.alert_details {
        Some(alert) => {
            if !alert.title.is_empty() {
                lines.push((alert.title.clone(), true));
            }
            if !alert.message.is_empty() {
                lines.push((alert.message.clone(), false));
            }
            if let Some(start) = &alert.start_date {
                let period = match &alert.end_date {
                    Some(end) => format!("{start} - {end}"),
                    None => start.clone(),
                };
                lines.push((period, false));
            }
        }
        None => lines.push((ctx.label("guidance").to_string(), false)),
    }

    let height = 2.0 * pad
        + Canvas::line_height(subtitle)
        + lines
            .iter()
            .map(|(text, _)| canvas.paragraph_height(body, text_width, text))
            .sum::<f32>();
    if !canvas.has_room(height) {
        debug!("no room for alert box");
        return;
    }

    canvas.fill_rect(x, canvas.cursor - height, w, height, fill);
    canvas.stroke_rect(x, canvas.cursor - height, w, height, border, 2.0 * canvas.scale.max(0.5));
    let bottom = canvas.cursor - height;
    canvas.cursor -= pad;
    let heading = ctx.label("alert").to_string();
    canvas.paragraph(x + pad, text_width, subtitle, true, TEXT_GREY, &heading);
    for (text, bold) in &lines {
        canvas.paragraph(x + pad, text_width, body, *bold, TEXT_GREY, text);
    }
    canvas.cursor = bottom - canvas.gap();
}

fn draw_facilities(canvas: &mut Canvas, ctx: &PosterContext) {
    let (subtitle, body) = (canvas.subtitle_size(), canvas.body_size());
    let mut entries: Vec<String> = ["toilets", "parking", "lifeguard", "disability_access", "blue_flag"]
        .iter()
        .map(|key| {
            let available = ctx.facilities.get(key).copied().unwrap_or(false);
            let answer = if available { ctx.label("available") } else { ctx.label("not_available") };
            format!("{}: {}", ctx.label(key), answer)
        })
        .collect();
    entries.push(
        if ctx.dogs_allowed { ctx.label("dogs_allowed") } else { ctx.label("dogs_not_allowed") }
            .to_string(),
    );

    // Two columns
    let rows = entries.len().div_ceil(2);
    let height = Canvas::line_height(subtitle) + rows as f32 * Canvas::line_height(body);
    if !canvas.has_room(height) {
        debug!("no room for facilities");
        return;
    }
    let heading = ctx.label("facilities").to_string();
    canvas.paragraph(canvas.margin, canvas.inner_width(), subtitle, true, HEADER_BLUE, &heading);
    let column = canvas.inner_width() / 2.0;
    for pair in entries.chunks(2) {
        let baseline = canvas.cursor - body;
        for (i, entry) in pair.iter().enumerate() {
            let x = canvas.margin + i as f32 * column;
            canvas.text_at(x, baseline, body, false, TEXT_GREY, entry);
        }
        canvas.cursor -= Canvas::line_height(body);
    }
    canvas.cursor -= canvas.gap();
}

fn draw_qr_codes(canvas: &mut Canvas, ctx: &PosterContext) {
    let codes: Vec<_> = ctx.qr_codes.values().filter(|c| !c.is_empty()).collect();
    if codes.is_empty() {
        return;
    }
    let small = canvas.small_size();
    let count = codes.len() as f32;
    let slot = canvas.inner_width() / count;
    let size = mm_to_pt(60.0 * canvas.scale).min(slot * 0.85);
    let height = Canvas::line_height(small) * 2.0 + size;
    if !canvas.has_room(height) {
        debug!("no room for QR codes");
        return;
    }

    let heading = ctx.label("more_information").to_string();
    canvas.paragraph(canvas.margin, canvas.inner_width(), small, true, TEXT_GREY, &heading);
    let top = canvas.cursor;
    for (i, code) in codes.iter().enumerate() {
        let x = canvas.margin + i as f32 * slot + (slot - size) / 2.0;
        // 4-module quiet zone on each side
        let modules = code.matrix.width + 8;
        let module = size / modules as f32;
        let (r, g, b) = rgb("#000000");
        canvas.content.save_state().set_fill_rgb(r, g, b);
        for row in 0..code.matrix.width {
            for col in 0..code.matrix.width {
                if code.matrix.is_dark(col, row) {
                    let mx = x + (col + 4) as f32 * module;
                    let my = top - (row + 5) as f32 * module;
                    canvas.content.rect(mx, my, module, module);
                }
            }
        }
        canvas.content.fill_nonzero().restore_state();

        let label_width = code.label.chars().count() as f32 * small * GLYPH_WIDTH;
        let label_x = canvas.margin + i as f32 * slot + (slot - label_width).max(0.0) / 2.0;
        canvas.text_at(label_x, top - size - small, small, false, TEXT_GREY, &code.label);
    }
    canvas.cursor = top - size - Canvas::line_height(small) - canvas.gap();
}

/// Footer pinned to the bottom margin; reserves its height from the floor.
fn draw_footer(canvas: &mut Canvas, ctx: &PosterContext) {
    let small = canvas.small_size();
    let y = canvas.margin + small * 0.5;
    let text = format!("{} {}", ctx.label("produced_by"), ctx.local_authority_name);
    let (r, g, b) = rgb("#cccccc");
    let line_y = y + Canvas::line_height(small);
    canvas
        .content
        .save_state()
        .set_stroke_rgb(r, g, b)
        .set_line_width(1.0)
        .move_to(canvas.margin, line_y)
        .line_to(canvas.width - canvas.margin, line_y)
        .stroke()
        .restore_state();
    canvas.text_at(canvas.margin, y, small, false, TEXT_GREY, &text);
    canvas.floor = line_y + canvas.gap();
}

fn draw_poster(canvas: &mut Canvas, ctx: &PosterContext) {
    draw_footer(canvas, ctx);
    if ctx.debug_mode {
        draw_debug_banner(canvas, ctx);
    }
    draw_header(canvas, ctx);
    draw_notification(canvas, ctx);
    draw_guidance(canvas, ctx);
    if ctx.is_identified {
        draw_water_quality(canvas, ctx);
    }
    draw_alert(canvas, ctx);
    draw_facilities(canvas, ctx);
    draw_qr_codes(canvas, ctx);
}

fn draw_section(canvas: &mut Canvas, ctx: &PosterContext, section: SectionType) {
    match section {
        SectionType::Header => draw_header(canvas, ctx),
        SectionType::WaterQuality => draw_water_quality(canvas, ctx),
        SectionType::Alerts => {
            let shown = ctx.shows_alert();
            draw_alert(canvas, ctx);
            if !shown {
                draw_guidance(canvas, ctx);
            }
        }
        SectionType::QrCode => draw_qr_codes(canvas, ctx),
        SectionType::Footer => draw_footer(canvas, ctx),
    }
}

fn write_document(canvas: Canvas, title: &str) -> Vec<u8> {
    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let page_id = Ref::new(3);
    let regular_id = Ref::new(4);
    let bold_id = Ref::new(5);
    let content_id = Ref::new(6);
    let info_id = Ref::new(7);

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);

    let mut page = pdf.page(page_id);
    page.media_box(Rect::new(0.0, 0.0, canvas.width, canvas.height));
    page.parent(page_tree_id);
    page.contents(content_id);
    let mut resources = page.resources();
    let mut fonts = resources.fonts();
    fonts.pair(REGULAR, regular_id);
    fonts.pair(BOLD, bold_id);
    fonts.finish();
    resources.finish();
    page.finish();

    pdf.type1_font(regular_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(bold_id)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    let producer = format!("BWIP {VERSION}");
    pdf.document_info(info_id)
        .title(TextStr(title))
        .producer(TextStr(&producer));

    pdf.stream(content_id, &canvas.content.finish());
    pdf.finish()
}

fn document_title(ctx: &PosterContext) -> String {
    format!("{} - {} ({})", ctx.beach_name, ctx.template_type, ctx.size)
}

/// Full poster on a page of the requested paper size.
pub fn render_poster(ctx: &PosterContext) -> Vec<u8> {
    let mut canvas = Canvas::new(ctx.width_mm as f32, ctx.height_mm as f32, ctx.scale_factor);
    draw_poster(&mut canvas, ctx);
    write_document(canvas, &document_title(ctx))
}

/// One section on a strip the poster's width and a quarter of its height.
pub fn render_section(ctx: &PosterContext, section: SectionType) -> Vec<u8> {
    let mut canvas = Canvas::new(ctx.width_mm as f32, ctx.height_mm as f32 / 4.0, ctx.scale_factor);
    draw_section(&mut canvas, ctx, section);
    write_document(canvas, &format!("{} - {section:?}", document_title(ctx)))
}

/// Page size in points for the context's paper and orientation.
pub fn page_size_pt(ctx: &PosterContext) -> (f32, f32) {
    (mm_to_pt(ctx.width_mm as f32), mm_to_pt(ctx.height_mm as f32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beaches_api::{AlertDetails, RecentMeasurement};
    use crate::db::enums::{Orientation, PosterLanguage, PosterSize};
    use crate::pdf_generation::context::tests::{sample_input, sample_location, sample_summary};

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn parses_hex_colours() {
        assert_eq!(rgb("#ffffff"), (1.0, 1.0, 1.0));
        assert_eq!(rgb("#000000"), (0.0, 0.0, 0.0));
        let (r, g, b) = rgb("#006699");
        assert_eq!(r, 0.0);
        assert!((g - 0.4).abs() < 1e-6);
        assert!((b - 0.6).abs() < 1e-6);
        assert_eq!(rgb("bad"), (0.0, 0.0, 0.0));
    }

    #[test]
    fn renders_poster_pdf() {
        let location = sample_location();
        let mut epa = sample_summary();
        epa.recent_measurements = vec![RecentMeasurement {
            date: "2024-07-01".to_string(),
            ecoli: Some(10.0),
            enterococci: Some(5.0),
            quality: "Excellent".to_string(),
        }];
        let ctx = PosterContext::build(&sample_input(&location, &epa, PosterSize::A4, PosterLanguage::En));
        let bytes = render_poster(&ctx);

        assert!(bytes.starts_with(b"%PDF"));
        assert!(contains(&bytes, b"/MediaBox"));
        assert!(contains(&bytes, b"Helvetica-Bold"));
        assert!(contains(&bytes, b"Dollymount Strand"));
        assert!(contains(&bytes, b"Dublin City Council"));
    }

    #[test]
    fn landscape_page_is_wider_than_tall() {
        let location = sample_location();
        let epa = sample_summary();
        let mut input = sample_input(&location, &epa, PosterSize::A3, PosterLanguage::En);
        input.orientation = Orientation::Landscape;
        let ctx = PosterContext::build(&input);
        let (w, h) = page_size_pt(&ctx);
        assert!(w > h);
        assert!((w - 1190.55).abs() < 0.1);
        assert!(render_poster(&ctx).starts_with(b"%PDF"));
    }

    #[test]
    fn alert_text_is_laid_out() {
        let location = sample_location();
        let mut epa = sample_summary();
        epa.has_active_alerts = true;
        epa.alert_details = Some(AlertDetails {
            alert_type: "RESTRICTION".to_string(),
            title: "Do not swim".to_string(),
            message: "Sewage overflow after heavy rain".to_string(),
            start_date: Some("2024-07-10".to_string()),
            end_date: None,
            is_season_long: false,
        });
        let mut input = sample_input(&location, &epa, PosterSize::A1, PosterLanguage::En);
        input.template = TemplateCode::T1B;
        let bytes = render_poster(&PosterContext::build(&input));
        assert!(contains(&bytes, b"Do not swim"));
    }

    #[test]
    fn sections_render_on_quarter_height_strip() {
        let location = sample_location();
        let epa = sample_summary();
        let ctx = PosterContext::build(&sample_input(&location, &epa, PosterSize::A4, PosterLanguage::En));
        for section in [
            SectionType::Header,
            SectionType::WaterQuality,
            SectionType::Alerts,
            SectionType::QrCode,
            SectionType::Footer,
        ] {
            let bytes = render_section(&ctx, section);
            assert!(bytes.starts_with(b"%PDF"), "{section:?}");
        }
        let footer = render_section(&ctx, SectionType::Footer);
        assert!(contains(&footer, b"Produced by Dublin City Council"));
    }

    #[test]
    fn irish_labels_are_used() {
        let location = sample_location();
        let mut epa = sample_summary();
        epa.recent_measurements = vec![RecentMeasurement {
            date: "2024-07-01".to_string(),
            ecoli: None,
            enterococci: None,
            quality: "Excellent".to_string(),
        }];
        let ctx = PosterContext::build(&sample_input(&location, &epa, PosterSize::A1, PosterLanguage::Ga));
        let bytes = render_poster(&ctx);
        assert!(contains(&bytes, b"Toradh"));
    }
}
