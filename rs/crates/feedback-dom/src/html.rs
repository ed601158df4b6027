//! Render DomNode trees to HTML strings.
//!
//! Output carries `data-key` and `data-a_<event>` attributes so the browser
//! client can hydrate the server-rendered markup.

use std::fmt::Write;

use crate::DomNode;

/// Void elements that must not have closing tags
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];

pub fn render_to_html(node: &DomNode) -> String {
    let mut buf = String::with_capacity(4096);
    write_node(node, &mut buf);
    buf
}

/// Options for rendering a full HTML page.
#[derive(Debug, Clone)]
pub struct PageOptions {
    pub root: DomNode,
    pub title: String,
    pub description: Option<String>,
    pub inline_css: Option<String>,
    pub styles: Vec<String>,
    pub scripts: Vec<String>,
    /// Element id the client mounts into.
    pub mount_id: String,
    /// When set, the page bootstraps a live connection to this SSE endpoint.
    pub sse_url: Option<String>,
}

impl PageOptions {
    pub fn new(root: DomNode, title: &str) -> Self {
        Self {
            root,
            title: title.to_string(),
            description: None,
            inline_css: None,
            styles: Vec::new(),
            scripts: Vec::new(),
            mount_id: "app".into(),
            sse_url: None,
        }
    }
}

pub fn render_page(opts: &PageOptions) -> String {
    let body = render_to_html(&opts.root);

    let mut html = String::with_capacity(body.len() + 2048);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\" />\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");
    let _ = writeln!(html, "<title>{}</title>", escape_html(&opts.title));
    if let Some(desc) = &opts.description {
        let _ = writeln!(html, "<meta name=\"description\" content=\"{}\" />", escape_attr(desc));
    }
    if let Some(css) = &opts.inline_css {
        let _ = writeln!(html, "<style>{}</style>", css);
    }
    for href in &opts.styles {
        let _ = writeln!(html, "<link rel=\"stylesheet\" href=\"{}\" />", escape_attr(href));
    }
    html.push_str("</head>\n<body>\n");

    let _ = writeln!(html, "<div id=\"{}\">{}</div>", escape_attr(&opts.mount_id), body);

    for src in &opts.scripts {
        let _ = writeln!(html, "<script src=\"{}\"></script>", escape_attr(src));
    }
    if let Some(sse_url) = &opts.sse_url {
        let _ = writeln!(
            html,
            "<script>FeedbackClient.connect(\"{}\", \"#{}\");</script>",
            escape_attr(sse_url),
            escape_attr(&opts.mount_id)
        );
    }

    html.push_str("</body>\n</html>");
    html
}

fn write_node(node: &DomNode, buf: &mut String) {
    let is_void = VOID_ELEMENTS.contains(&node.tag.as_str());

    buf.push('<');
    buf.push_str(&node.tag);

    if let Some(key) = &node.key {
        let _ = write!(buf, " data-key=\"{}\"", escape_attr(key));
    }
    // BTreeMap iteration keeps attribute order stable
    for (k, v) in &node.attrs {
        let _ = write!(buf, " {}=\"{}\"", k, escape_attr(v));
    }
    for (event, action) in &node.events {
        let _ = write!(buf, " data-a_{}=\"{}\"", event, escape_attr(action));
    }
    buf.push('>');

    if is_void {
        return;
    }

    if let Some(text) = &node.text {
        buf.push_str(&escape_html(text));
    }
    for child in &node.children {
        write_node(child, buf);
    }

    buf.push_str("</");
    buf.push_str(&node.tag);
    buf.push('>');
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
