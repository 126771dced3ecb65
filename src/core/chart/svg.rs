//! Minimal SVG writer
//!
//! Elements are appended to a string buffer one per line. Attribute values
//! and text content are escaped; numbers go through [`num`] so coordinates
//! stay short.

use std::fmt::{Display, Write};

/// Attribute name/value pair
pub type Attr<'a> = (&'a str, String);

/// Build an attribute from any displayable value
pub fn attr(name: &str, value: impl Display) -> Attr<'_> {
    (name, value.to_string())
}

/// Format a coordinate with at most two decimals and no trailing zeros
#[must_use]
pub fn num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    let mut s = format!("{rounded:.2}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

/// Escape text for use in element content or attribute values
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\n' => out.push_str("&#10;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Streaming SVG document builder
#[derive(Debug)]
pub struct SvgWriter {
    buf: String,
    open: Vec<String>,
}

impl SvgWriter {
    /// Start a document with a `viewBox` of `width` x `height`
    #[must_use]
    pub fn new(width: f64, height: f64, class: &str) -> Self {
        let mut writer = Self {
            buf: String::new(),
            open: Vec::new(),
        };
        writer.open(
            "svg",
            &[
                attr("xmlns", "http://www.w3.org/2000/svg"),
                attr("viewBox", format!("0 0 {} {}", num(width), num(height))),
                attr("width", num(width)),
                attr("height", num(height)),
                attr("class", class),
                attr("font-family", "sans-serif"),
                attr("font-size", 11),
            ],
        );
        writer
    }

    fn start_tag(&mut self, tag: &str, attrs: &[Attr]) {
        self.buf.push('<');
        self.buf.push_str(tag);
        for (name, value) in attrs {
            let _ = write!(self.buf, " {name}=\"{}\"", escape(value));
        }
    }

    /// Open a container element; must be matched by [`close`](Self::close)
    pub fn open(&mut self, tag: &str, attrs: &[Attr]) {
        self.start_tag(tag, attrs);
        self.buf.push_str(">\n");
        self.open.push(tag.to_string());
    }

    /// Close the most recently opened element
    pub fn close(&mut self) {
        if let Some(tag) = self.open.pop() {
            let _ = writeln!(self.buf, "</{tag}>");
        }
    }

    /// Write a self-closing element
    pub fn leaf(&mut self, tag: &str, attrs: &[Attr]) {
        self.start_tag(tag, attrs);
        self.buf.push_str("/>\n");
    }

    /// Write an element with escaped text content
    pub fn text(&mut self, tag: &str, attrs: &[Attr], content: &str) {
        self.start_tag(tag, attrs);
        let _ = writeln!(self.buf, ">{}</{tag}>", escape(content));
    }

    /// Close every open element and return the markup
    #[must_use]
    pub fn finish(mut self) -> String {
        while !self.open.is_empty() {
            self.close();
        }
        self.buf
    }
}
