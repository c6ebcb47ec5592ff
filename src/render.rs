//! Renders the content document as a self-contained RTL HTML page.
//!
//! Every image is an inline data URL, so the exported file needs no network
//! access and the visible region can be rasterized by any external capture
//! tool at the fixed content width.

use crate::content::{LandingPage, VariantKind};

/// Fixed content width in pixels, independent of any on-screen zoom.
pub const CAPTURE_WIDTH: u32 = 800;

fn esc(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn image_block(out: &mut String, url: &str, alt: &str) {
    if url.is_empty() {
        return;
    }
    out.push_str(&format!(
        "<div class=\"visual\"><img src=\"{url}\" alt=\"{}\"></div>\n",
        esc(alt)
    ));
}

/// Renders the document to a complete HTML page.
pub fn render_html(page: &LandingPage) -> String {
    let primary = esc(&page.atmosphere.primary_color);
    let mut out = String::with_capacity(16 * 1024);

    out.push_str(&format!(
        r#"<!DOCTYPE html>
<html lang="ar" dir="rtl">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
  body {{ margin: 0; background: #000; font-family: 'Cairo', Arial, sans-serif; }}
  #capture-area {{ width: {width}px; margin: 0 auto; background: #fff; color: #0f172a; }}
  section, header, footer {{ padding: 48px 40px; text-align: center; }}
  .visual {{ padding: 8px; }}
  .visual img {{ width: 100%; aspect-ratio: 1 / 1; object-fit: cover; border-radius: 40px; display: block; }}
  .dark {{ background: #0c111d; color: #fff; }}
  .muted {{ background: #fafafa; }}
  .cta {{ display: block; padding: 28px 36px; border-radius: 999px; color: #fff; font-size: 32px; font-weight: 900; background: {primary}; }}
  .pain {{ color: rgba(255,255,255,.5); font-size: 22px; border-bottom: 1px solid rgba(255,255,255,.06); padding-bottom: 24px; margin: 24px 0; }}
  .review {{ background: #fff; border: 1px solid #e2e8f0; border-radius: 32px; padding: 32px; margin: 24px 0; text-align: right; }}
  .review img {{ width: 56px; height: 56px; border-radius: 50%; vertical-align: middle; }}
  .stars {{ color: #facc15; font-size: 22px; }}
  .swatch {{ display: inline-block; width: 28px; height: 28px; border-radius: 50%; border: 2px solid #e2e8f0; vertical-align: middle; margin-inline-start: 8px; }}
  h1 {{ font-size: 44px; font-weight: 900; line-height: 1.4; }}
  h2 {{ font-size: 34px; font-weight: 900; line-height: 1.4; }}
  .sub {{ color: #94a3b8; font-size: 22px; line-height: 2; }}
</style>
</head>
<body>
<div id="capture-area">
"#,
        title = esc(&page.hero.headline),
        width = CAPTURE_WIDTH,
    ));

    // Hero
    out.push_str("<header>\n");
    out.push_str(&format!("<h1>{}</h1>\n", esc(&page.hero.headline)));
    out.push_str(&format!("<p class=\"sub\">{}</p>\n", esc(&page.hero.subheadline)));
    image_block(&mut out, &page.hero.image, "Hero");
    out.push_str(&format!("<a class=\"cta\">{}</a>\n", esc(&page.hero.cta)));
    out.push_str("</header>\n");

    // Problem
    out.push_str("<section class=\"dark\">\n");
    out.push_str(&format!("<h2>{}</h2>\n", esc(&page.problem.title)));
    image_block(&mut out, &page.problem.image, "Problem");
    for pain in &page.problem.pains {
        out.push_str(&format!("<div class=\"pain\">{}</div>\n", esc(pain)));
    }
    out.push_str("</section>\n");

    // Solution
    out.push_str("<section>\n");
    out.push_str(&format!("<h2>{}</h2>\n", esc(&page.solution.title)));
    out.push_str(&format!(
        "<p class=\"sub\">{}</p>\n",
        esc(&page.solution.explanation)
    ));
    image_block(&mut out, &page.solution.image, "Solution");
    out.push_str("</section>\n");

    // Variants
    if !page.variants.items.is_empty() {
        out.push_str("<section class=\"muted\">\n");
        out.push_str(&format!("<h2>{}</h2>\n", esc(&page.variants.title)));
        for variant in &page.variants.items {
            out.push_str("<p>");
            out.push_str(&esc(&variant.label));
            if variant.kind == VariantKind::Color {
                out.push_str(&format!(
                    "<span class=\"swatch\" style=\"background:{}\"></span>",
                    esc(&variant.value)
                ));
            }
            out.push_str("</p>\n");
        }
        out.push_str("</section>\n");
    }

    // Notes
    if let Some(ref notes) = page.notes {
        out.push_str("<section>\n");
        out.push_str(&format!("<h2>{}</h2>\n", esc(&notes.title)));
        out.push_str(&format!("<p class=\"sub\">{}</p>\n", esc(&notes.content)));
        out.push_str("</section>\n");
    }

    // Benefits
    out.push_str("<section>\n");
    out.push_str(&format!("<h2>{}</h2>\n", esc(&page.benefits.title)));
    for benefit in &page.benefits.items {
        image_block(&mut out, &benefit.image, &benefit.title);
        out.push_str(&format!("<h2>{}</h2>\n", esc(&benefit.title)));
        out.push_str(&format!(
            "<p class=\"sub\">{}</p>\n",
            esc(&benefit.description)
        ));
    }
    out.push_str("</section>\n");

    // Social proof
    out.push_str("<section class=\"muted\">\n");
    out.push_str(&format!("<h2>{}</h2>\n", esc(&page.social_proof.title)));
    for review in &page.social_proof.reviews {
        out.push_str("<div class=\"review\">\n");
        out.push_str(&format!(
            "<p><img src=\"{}\" alt=\"\"> <strong>{}</strong> <span class=\"stars\">{}</span></p>\n",
            review.avatar,
            esc(&review.name),
            "★".repeat(review.rating.min(5) as usize),
        ));
        out.push_str(&format!("<p class=\"sub\">{}</p>\n", esc(&review.comment)));
        out.push_str("</div>\n");
    }
    out.push_str(&format!(
        "<p class=\"sub\">{}</p>\n",
        esc(&page.social_proof.verification)
    ));
    out.push_str("</section>\n");

    // FAQ
    out.push_str("<section>\n");
    out.push_str(&format!("<h2>{}</h2>\n", esc(&page.faqs.title)));
    for item in &page.faqs.items {
        out.push_str(&format!("<h2>{}</h2>\n", esc(&item.question)));
        out.push_str(&format!("<p class=\"sub\">{}</p>\n", esc(&item.answer)));
    }
    out.push_str("</section>\n");

    // Footer CTA
    out.push_str("<footer class=\"dark\">\n");
    out.push_str(&format!("<a class=\"cta\">{}</a>\n", esc(&page.hero.cta)));
    out.push_str("</footer>\n");

    out.push_str("</div>\n</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::testutil::sample_page;

    #[test]
    fn test_render_is_rtl_arabic() {
        let html = render_html(&sample_page());
        assert!(html.contains("lang=\"ar\" dir=\"rtl\""));
        assert!(html.contains("Cairo"));
    }

    #[test]
    fn test_render_has_fixed_width() {
        let html = render_html(&sample_page());
        assert!(html.contains(&format!("width: {CAPTURE_WIDTH}px")));
    }

    #[test]
    fn test_render_inlines_every_image() {
        let page = sample_page();
        let html = render_html(&page);
        assert!(html.contains(&page.hero.image));
        assert!(html.contains(&page.problem.image));
        assert!(html.contains(&page.benefits.items[0].image));
        assert!(html.contains(&page.social_proof.reviews[0].avatar));
        assert!(!html.contains("src=\"http"));
    }

    #[test]
    fn test_render_escapes_copy() {
        let mut page = sample_page();
        page.hero.headline = "<script>alert(1)</script>".into();
        let html = render_html(&page);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_uses_primary_color_on_cta() {
        let mut page = sample_page();
        page.atmosphere.primary_color = "#123456".into();
        let html = render_html(&page);
        assert!(html.contains("background: #123456"));
    }

    #[test]
    fn test_render_skips_empty_optional_sections() {
        let mut page = sample_page();
        page.notes = None;
        page.variants.items.clear();
        let html = render_html(&page);
        assert!(!html.contains("ملاحظات"));
        assert!(!html.contains("class=\"swatch\""));
    }

    #[test]
    fn test_star_count_follows_rating() {
        let mut page = sample_page();
        page.social_proof.reviews[0].rating = 3;
        let html = render_html(&page);
        assert!(html.contains("★★★"));
        assert!(!html.contains("★★★★"));
    }
}
