use tera::{Context, Tera};

use super::PdfError;
use super::context::PosterContext;
use crate::db::enums::TemplateCode;

const TEMPLATES: [(&str, &str); 6] = [
    ("base.html", include_str!("../../templates/pdf/base.html")),
    ("1a.html", include_str!("../../templates/pdf/1a.html")),
    ("1b.html", include_str!("../../templates/pdf/1b.html")),
    ("1c.html", include_str!("../../templates/pdf/1c.html")),
    ("2a.html", include_str!("../../templates/pdf/2a.html")),
    ("2b.html", include_str!("../../templates/pdf/2b.html")),
];

pub fn template_name(code: TemplateCode) -> String {
    format!("{}.html", code.as_str().to_ascii_lowercase())
}

/// Print stylesheet for the page size, fonts scaled from the A1 base.
pub fn print_css(width_mm: u32, height_mm: u32, scale: f32, dpi: u32) -> String {
    let pt = |base: f32| format!("{:.1}pt", base * scale);
    let mm = |base: f32| format!("{:.1}mm", base * scale);
    format!(
        r#"@page {{ size: {width_mm}mm {height_mm}mm; margin: 10mm; }}
body {{ font-family: Arial, Helvetica, sans-serif; font-size: {body}; line-height: 1.4; color: #333; margin: 0; image-resolution: {dpi}dpi; }}
.title {{ font-size: {title}; font-weight: bold; margin-bottom: {gap}; }}
.subtitle {{ font-size: {subtitle}; margin-bottom: {gap}; }}
.small {{ font-size: {small}; }}
.header {{ background: #006699; color: white; padding: {pad}; text-align: center; }}
.water-quality {{ background: #f8f8f8; padding: {pad}; margin: {gap} 0; }}
.alert-box {{ background: #fff3cd; border: 2px solid #ffc107; padding: {pad}; margin: {gap} 0; }}
.alert-box.danger {{ background: #f8d7da; border-color: #dc3545; }}
.notification {{ border-left: 4px solid #006699; padding: {gap}; margin: {gap} 0; }}
.qr-codes {{ display: flex; justify-content: space-around; margin: {gap} 0; }}
.qr-code {{ text-align: center; }}
.qr-code svg {{ width: {qr}; height: {qr}; }}
.status-excellent {{ color: #28a745; }}
.status-good {{ color: #17a2b8; }}
.status-sufficient {{ color: #ffc107; }}
.status-poor {{ color: #dc3545; }}
table {{ width: 100%; border-collapse: collapse; }}
th, td {{ border: 1px solid #ddd; padding: {cell}; text-align: left; }}
th {{ background: #006699; color: white; }}
.footer {{ border-top: 1px solid #ccc; padding-top: {gap}; font-size: {small}; }}
.debug-banner {{ background: #dc3545; color: white; text-align: center; font-weight: bold; }}
"#,
        body = pt(24.0),
        title = pt(72.0),
        subtitle = pt(48.0),
        small = pt(18.0),
        pad = mm(20.0),
        gap = mm(10.0),
        cell = mm(5.0),
        qr = mm(60.0),
    )
}

/// Renders the HTML rendition of a poster from the embedded templates.
pub struct HtmlRenderer {
    tera: Tera,
}

impl HtmlRenderer {
    pub fn new() -> Result<Self, PdfError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.to_vec())
            .map_err(|e| PdfError::Rendering(e.to_string()))?;
        Ok(Self { tera })
    }

    pub fn render(&self, ctx: &PosterContext) -> Result<String, PdfError> {
        let name = template_name(ctx.template_type);
        let mut context =
            Context::from_serialize(ctx).map_err(|e| PdfError::Rendering(e.to_string()))?;
        context.insert(
            "css",
            &print_css(ctx.width_mm, ctx.height_mm, ctx.scale_factor, ctx.dpi),
        );
        context.insert("status_class", ctx.status_class());
        context.insert("shows_alert", &ctx.shows_alert());

        self.tera.render(&name, &context).map_err(|e| match e.kind {
            tera::ErrorKind::TemplateNotFound(name) => PdfError::TemplateNotFound(name),
            _ => PdfError::Rendering(format!("{e:?}")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::enums::{PosterLanguage, PosterSize};
    use crate::pdf_generation::context::tests::{sample_input, sample_location, sample_summary};

    #[test]
    fn css_scales_fonts_and_page() {
        let css = print_css(297, 420, 0.5, 300);
        assert!(css.contains("size: 297mm 420mm"));
        assert!(css.contains("font-size: 36.0pt"));
        assert!(css.contains("font-size: 12.0pt"));
        assert!(css.contains("width: 30.0mm"));
    }

    #[test]
    fn renders_every_template() {
        let renderer = HtmlRenderer::new().unwrap();
        let location = sample_location();
        let mut epa = sample_summary();
        epa.custom_notification = "Lifeguards on duty from 11am".to_string();

        for code in [
            TemplateCode::T1A,
            TemplateCode::T1B,
            TemplateCode::T1C,
            TemplateCode::T2A,
            TemplateCode::T2B,
        ] {
            let mut input = sample_input(&location, &epa, PosterSize::A4, PosterLanguage::En);
            input.template = code;
            let html = renderer.render(&PosterContext::build(&input)).unwrap();
            assert!(html.contains("Dollymount Strand"), "{code}");
            assert!(html.contains("@page"), "{code}");
            assert!(html.contains("Lifeguards on duty from 11am"), "{code}");
            assert!(html.contains("<svg"), "{code}");
        }
    }

    #[test]
    fn mock_data_is_flagged() {
        let renderer = HtmlRenderer::new().unwrap();
        let location = sample_location();
        let epa = sample_summary();
        let input = sample_input(&location, &epa, PosterSize::A4, PosterLanguage::En);
        let html = renderer.render(&PosterContext::build(&input)).unwrap();
        assert!(html.contains("debug-banner"));
    }
}
