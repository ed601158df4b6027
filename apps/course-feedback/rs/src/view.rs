use feedback_dom::html::PageOptions;
use feedback_dom::DomNode;

use crate::display;
use crate::entry::FeedbackEntry;
use crate::form::FeedbackForm;

pub const TITLE: &str = "Course Feedback System";

const STYLE: &str = "\
body{margin:0;font-family:system-ui,sans-serif;background:#f5f6fa;color:#1f2330}\
.page{max-width:46rem;margin:0 auto;padding:3rem 1rem;display:flex;flex-direction:column;gap:2rem}\
.hero{text-align:center}.hero p{color:#667}\
.card{background:#fff;border-radius:.75rem;box-shadow:0 1px 4px rgba(0,0,0,.08);padding:1.5rem}\
.card.placeholder{border:2px dashed #ccd;box-shadow:none}\
.card-header{display:flex;justify-content:space-between;align-items:baseline;flex-wrap:wrap}\
.field{display:flex;flex-direction:column;gap:.35rem;margin-bottom:1.1rem}\
.field label,.label{font-size:.85rem;font-weight:600;color:#556}\
input,select,textarea{font:inherit;padding:.55rem .7rem;border:1px solid #ccd;border-radius:.45rem}\
textarea{resize:none}\
.submit-btn{width:100%;padding:.9rem;font-size:1.05rem;font-weight:600;border:0;border-radius:.5rem;background:#e8893a;color:#fff;cursor:pointer}\
.grid{display:grid;grid-template-columns:1fr 1fr;gap:1rem}\
.badge{background:#eef;border-radius:1rem;padding:.2rem .7rem;font-size:.8rem}\
.star{color:#ccd;font-size:1.25rem}.star.filled{color:#e8893a}\
.rating{display:flex;align-items:center;gap:.75rem}.rating-value{font-weight:700}\
.message{background:#f3f4f8;border-radius:.5rem;padding:1rem}\
.muted{color:#889}\
.toast{position:fixed;right:1rem;bottom:1rem;max-width:22rem;background:#fff;border-left:4px solid #3a9;\
border-radius:.5rem;box-shadow:0 4px 14px rgba(0,0,0,.15);padding:.8rem 2.2rem .8rem 1rem}\
.toast.destructive{border-left-color:#d33}.toast p{margin:.25rem 0 0}\
.toast button{position:absolute;top:.3rem;right:.5rem;border:0;background:none;font-size:1.2rem;cursor:pointer}";

/// Whole-page tree: hero, form card, latest-feedback card, toast.
pub fn render(form: &FeedbackForm, latest: Option<&FeedbackEntry>, toast: Option<DomNode>) -> DomNode {
    let hero = DomNode::new("header")
        .keyed("hero")
        .class("hero")
        .child(DomNode::text("h1", TITLE))
        .child(DomNode::text("p", "Help us improve by sharing your experience"));

    let mut page = DomNode::new("main")
        .keyed("page")
        .class("page")
        .child(hero)
        .child(form.render())
        .child(display::render(latest));
    if let Some(toast) = toast {
        page = page.child(toast);
    }
    page
}

pub fn page_options(root: DomNode) -> PageOptions {
    let mut opts = PageOptions::new(root, TITLE);
    opts.description = Some("Share feedback about your course".into());
    opts.inline_css = Some(STYLE.into());
    opts.scripts.push("/feedback.js".into());
    opts.sse_url = Some("/sse".into());
    opts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NoticeKind, Notify, Toasts};

    #[test]
    fn test_layout_order() {
        let root = render(&FeedbackForm::new(), None, None);
        let keys: Vec<_> = root.children.iter().map(|c| c.key.as_deref().unwrap_or("")).collect();
        assert_eq!(keys, vec!["hero", "form-card", "latest"]);
    }

    #[test]
    fn test_toast_appended_when_present() {
        let mut toasts = Toasts::default();
        toasts.notify(NoticeKind::Success, "Feedback Submitted!", "Thank you for your valuable feedback.");
        let root = render(&FeedbackForm::new(), None, toasts.render());
        assert_eq!(root.children.last().unwrap().key.as_deref(), Some("toast"));
    }

    #[test]
    fn test_ssr_page() {
        let root = render(&FeedbackForm::new(), None, None);
        let html = feedback_dom::html::render_page(&page_options(root));
        assert!(html.contains("<title>Course Feedback System</title>"));
        assert!(html.contains("No Feedback Yet"));
        assert!(html.contains("data-a_submit=\"on_submit\""));
        assert!(html.contains("<script src=\"/feedback.js\"></script>"));
    }
}
