//! HTML rendering for the four views and the shared page chrome.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use glaucolens_adapters::HOME_BANNER;
use glaucolens_core::domain::{MAX_AGE, MIN_AGE};
use glaucolens_core::modules::MAX_SEVERITY;
use glaucolens_core::{
    stage_for_severity, DetectionOutcome, Page, RiskAssessment, RiskInputs, RiskTier, Verdict,
};

/// Application title.
pub const TITLE: &str = "GLAUCOLens";
/// Tagline under the title.
pub const TAGLINE: &str = "See the World Clearly, Detect Glaucoma Early";
/// Footer line.
pub const FOOTER: &str = "© 2024 GLAUCOLens. All Rights Reserved.";
/// Prompt shown on the detection view before anything is uploaded.
pub const UPLOAD_PROMPT: &str = "Please upload an image to proceed.";
/// Confirmation shown above a verdict.
pub const UPLOAD_SUCCESS: &str =
    "Image uploaded successfully! Analysis results will be displayed below.";
/// Caption under the echoed upload.
pub const PREVIEW_CAPTION: &str = "Uploaded Fundus Image";

const STYLE: &str = "\
body { background: #f0f4f8; font-family: 'Arial', sans-serif; margin: 0; }
.layout { display: flex; min-height: 100vh; }
nav { width: 220px; padding: 20px; background: #e2e8f0; }
main { flex: 1; padding: 20px 40px; }
.main-header { font-size: 3rem; font-weight: bold; color: #1f4e79; text-align: center; margin-bottom: 20px; }
.subheader { font-size: 1.2rem; color: #495057; text-align: center; margin-bottom: 30px; }
.footer { text-align: center; font-size: 0.8rem; color: #6c757d; margin-top: 50px; }
button { background: #1f4e79; color: white; font-size: 1rem; border-radius: 8px; padding: 10px 20px; border: none; }
button:hover { background: #145374; }
figure { margin: 0; text-align: center; }
figure img { max-width: 100%; }
.info { background: #e7f1fb; padding: 12px; border-radius: 6px; }
.success { background: #e6f4ea; padding: 12px; border-radius: 6px; }
.warning { background: #fff4e5; padding: 12px; border-radius: 6px; }
.error { background: #fdecea; padding: 12px; border-radius: 6px; }
.cta { background: #1f4e79; color: white; padding: 15px; text-align: center; border-radius: 10px; }
";

/// Escapes text for use in HTML content and attribute values.
#[must_use]
pub fn escape(text: &str) -> String {
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

/// Wraps a view body in the header, sidebar and footer.
#[must_use]
pub fn layout(current: Page, body: &str) -> String {
    let options: String = Page::ALL
        .iter()
        .map(|page| {
            let selected = if *page == current { " selected" } else { "" };
            format!(
                "<option value=\"{}\"{selected}>{}</option>",
                page.slug(),
                page.label()
            )
        })
        .collect();

    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>{TITLE} - {label}</title><style>{STYLE}</style></head><body>\
<div class=\"layout\">\
<nav><form method=\"get\" action=\"/\">\
<label for=\"page\">Navigation</label>\
<select id=\"page\" name=\"page\" onchange=\"this.form.submit()\">{options}</select>\
<noscript><button type=\"submit\">Go</button></noscript>\
</form></nav>\
<main>\
<div class=\"main-header\">{TITLE}</div>\
<div class=\"subheader\">{TAGLINE}</div>\
{body}\
<div class=\"footer\">{FOOTER}</div>\
</main></div></body></html>",
        label = current.label(),
    )
}

/// Landing page.
#[must_use]
pub fn home() -> String {
    format!(
        "<h2>👁👁 About GLAUCOLens</h2>\
<p>Welcome to <em>GLAUCOLens</em>, a platform dedicated to raising awareness about glaucoma \
and helping users detect the disease early through image-based analysis.</p>\
<p>Why it matters:</p><ul>\
<li>Glaucoma is a leading cause of irreversible blindness.</li>\
<li>Early detection can slow down or prevent vision loss.</li></ul>\
<p>Explore our features:</p><ul>\
<li>Vision Simulator: Visualize the impact of glaucoma on vision.</li>\
<li>Detection: Upload retina images to analyze glaucoma risks.</li></ul>\
<figure><img src=\"/assets/{HOME_BANNER}\" alt=\"GLAUCOLens banner\">\
<figcaption>Join us in preventing glaucoma blindness.</figcaption></figure>"
    )
}

/// Severity slider and the stage image for `severity`.
#[must_use]
pub fn simulator(severity: u32) -> String {
    let stage = stage_for_severity(severity);
    format!(
        "<h2>🔍 Vision Simulator</h2>\
<p>Adjust the slider to simulate how glaucoma affects vision.</p>\
<form method=\"get\" action=\"/\">\
<input type=\"hidden\" name=\"page\" value=\"{slug}\">\
<label for=\"severity\">Select Glaucoma Severity Level</label> \
<input type=\"range\" id=\"severity\" name=\"severity\" min=\"0\" max=\"{MAX_SEVERITY}\" \
value=\"{severity}\" onchange=\"this.form.submit()\"> <output>{severity}</output> \
<noscript><button type=\"submit\">Show</button></noscript>\
</form>\
<figure><img src=\"/assets/{asset}\" alt=\"{caption}\">\
<figcaption>{caption}</figcaption></figure>",
        slug = Page::VisionSimulator.slug(),
        asset = stage.asset_name(),
        caption = stage.caption(),
    )
}

/// Upload form plus whatever the last interaction produced.
#[must_use]
pub fn detection(outcome: &DetectionOutcome, preview_png: Option<&[u8]>) -> String {
    let result = match outcome {
        DetectionOutcome::NoUploadYet => format!("<div class=\"info\">{UPLOAD_PROMPT}</div>"),
        DetectionOutcome::Rejected { message } => {
            format!("<div class=\"error\">{}</div>", escape(message))
        }
        DetectionOutcome::Classified { verdict, .. } => {
            let class = match verdict {
                Verdict::Healthy => "success",
                Verdict::GlaucomaSuspected => "error",
            };
            let figure = preview_png.map_or_else(String::new, |png| {
                format!(
                    "<figure><img src=\"data:image/png;base64,{}\" alt=\"{PREVIEW_CAPTION}\">\
<figcaption>{PREVIEW_CAPTION}</figcaption></figure>",
                    STANDARD.encode(png)
                )
            });
            format!(
                "<div class=\"success\">{UPLOAD_SUCCESS}</div>{figure}\
<h2 class=\"{class}\" data-verdict=\"{verdict}\">{}</h2>",
                verdict.message()
            )
        }
    };

    format!(
        "<div class=\"main-header\">Glaucoma Detection</div>\
<div class=\"subheader\">Could you upload a picture of the inside of your eye (fundus)? \
It's the photo that shows the retina and blood vessels.</div>\
<form method=\"post\" action=\"/detection\" enctype=\"multipart/form-data\">\
<label for=\"file\">Upload Fundus Image</label> \
<input type=\"file\" id=\"file\" name=\"file\" accept=\".jpg,.jpeg,.png\"> \
<button type=\"submit\">Upload</button>\
</form>\
{result}"
    )
}

/// Educational content with the risk questionnaire.
#[must_use]
pub fn learn(inputs: &RiskInputs, assessment: Option<&RiskAssessment>) -> String {
    let result = assessment.map_or_else(String::new, |a| {
        let class = match a.tier {
            RiskTier::High => "error",
            RiskTier::Moderate => "warning",
            RiskTier::Low => "success",
        };
        format!(
            "<div class=\"{class}\" data-risk-tier=\"{}\" data-risk-score=\"{}\">{}</div>",
            a.tier,
            a.score,
            a.tier.message()
        )
    });

    format!(
        "<div class=\"main-header\">Learn About Glaucoma</div>\
<p>Glaucoma is a group of eye diseases that damage the optic nerve, often caused by abnormally \
high pressure in the eye. Left untreated, glaucoma can lead to irreversible blindness. \
Here's what you need to know:</p>\
<h2>👁️ Fast Facts About Glaucoma</h2><ul>\
<li><em>Silent Thief of Sight</em>: Glaucoma often has no symptoms until significant vision loss occurs.</li>\
<li><em>Global Impact</em>: Over 70 million people worldwide are affected by glaucoma.</li>\
<li><em>Prevention</em>: Early detection is key to preventing vision loss.</li>\
<li><em>At Risk</em>: People over 60, those with a family history of glaucoma, and individuals \
with diabetes or high blood pressure.</li></ul>\
<h2>🧐 Are You at Risk?</h2>\
<p>Answer these quick questions to learn about your glaucoma risk:</p>\
<form method=\"get\" action=\"/\">\
<input type=\"hidden\" name=\"page\" value=\"{slug}\">\
<input type=\"hidden\" name=\"check\" value=\"1\">\
<p><label for=\"age\">Your Age</label> \
<input type=\"range\" id=\"age\" name=\"age\" min=\"{MIN_AGE}\" max=\"{MAX_AGE}\" value=\"{age}\"> \
<output>{age}</output></p>\
{family}{diabetes}{high_bp}\
<button type=\"submit\">Check My Risk</button>\
</form>\
{result}\
<h2>📚 How to Protect Your Vision</h2><ul>\
<li><em>Routine Eye Exams</em>: Early detection through regular check-ups is crucial.</li>\
<li><em>Healthy Lifestyle</em>: Maintain a balanced diet, exercise regularly, and manage systemic \
health conditions like diabetes.</li>\
<li><em>Medication Adherence</em>: If diagnosed, follow prescribed treatments to control eye pressure.</li>\
<li><em>Awareness</em>: Share knowledge with friends and family about the importance of eye health.</li></ul>\
<h2>🔬 Cutting-Edge Innovations in Glaucoma Care</h2><ul>\
<li><em>Laser Therapy</em>: Advanced laser treatments like SLT (Selective Laser Trabeculoplasty) \
are minimally invasive and effective.</li>\
<li><em>Smart Contact Lenses</em>: Emerging technology enables real-time monitoring of eye pressure.</li>\
<li><em>AI Diagnosis</em>: Artificial intelligence assists in early detection by analyzing retinal \
images with high accuracy.</li>\
<li><em>Gene Therapy</em>: Research is underway to develop gene-based solutions for hereditary glaucoma.</li></ul>\
<h2>💡 Inspiring Stories</h2><ul>\
<li>\"I was diagnosed early, and it saved my vision.\" - Maria, 45, a teacher who advocates for \
regular eye exams.</li>\
<li>\"Technology gave me hope.\" - James, 60, uses smart lenses to monitor his glaucoma daily.</li></ul>\
<div class=\"cta\"><h3>Protect Your Vision Today!</h3>\
<p>Schedule a comprehensive eye exam and spread the word about glaucoma prevention.</p></div>",
        slug = Page::Learn.slug(),
        age = inputs.age,
        family = yes_no_select(
            "family_history",
            "Do you have a family history of glaucoma?",
            inputs.family_history
        ),
        diabetes = yes_no_select("diabetes", "Do you have diabetes?", inputs.diabetes),
        high_bp = yes_no_select(
            "high_bp",
            "Do you have high blood pressure?",
            inputs.high_bp
        ),
    )
}

fn yes_no_select(name: &str, question: &str, yes: bool) -> String {
    let (no_sel, yes_sel) = if yes {
        ("", " selected")
    } else {
        (" selected", "")
    };
    format!(
        "<p><label for=\"{name}\">{question}</label> <select id=\"{name}\" name=\"{name}\">\
<option value=\"no\"{no_sel}>No</option><option value=\"yes\"{yes_sel}>Yes</option>\
</select></p>"
    )
}
