//! Thin event writer over quick-xml
//!
//! Metadata payload writers and the document serializer share this writer so
//! that indentation and escaping are handled in one place.

use crate::core::error::MetsResult;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

/// Empty attribute list
pub const NO_ATTRS: [(&str, &str); 0] = [];

/// Streaming XML writer backed by an in-memory buffer
pub struct XmlWriter {
    inner: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    /// Create a writer, indenting nested elements by `indent` spaces when given
    pub fn new(indent: Option<usize>) -> Self {
        let buffer = Cursor::new(Vec::new());
        let inner = match indent {
            Some(size) => Writer::new_with_indent(buffer, b' ', size),
            None => Writer::new(buffer),
        };
        Self { inner }
    }

    /// Write the `<?xml version="1.0" encoding="UTF-8"?>` declaration
    pub fn declaration(&mut self) -> MetsResult<()> {
        self.inner
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    /// Open an element
    pub fn start<'a, I>(&mut self, name: &str, attrs: I) -> MetsResult<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut elem = BytesStart::new(name);
        for attr in attrs {
            elem.push_attribute(attr);
        }
        self.inner.write_event(Event::Start(elem))?;
        Ok(())
    }

    /// Close an element
    pub fn end(&mut self, name: &str) -> MetsResult<()> {
        self.inner.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Write a self-closing element
    pub fn empty<'a, I>(&mut self, name: &str, attrs: I) -> MetsResult<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut elem = BytesStart::new(name);
        for attr in attrs {
            elem.push_attribute(attr);
        }
        self.inner.write_event(Event::Empty(elem))?;
        Ok(())
    }

    /// Write `<name>text</name>` with the text escaped
    pub fn text_element(&mut self, name: &str, text: &str) -> MetsResult<()> {
        self.text_element_with(name, NO_ATTRS, text)
    }

    /// Write `<name attrs>text</name>` with the text escaped
    pub fn text_element_with<'a, I>(&mut self, name: &str, attrs: I, text: &str) -> MetsResult<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.start(name, attrs)?;
        self.inner.write_event(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    /// Write a text element only when a value is present
    pub fn opt_text_element(&mut self, name: &str, text: Option<&str>) -> MetsResult<()> {
        match text {
            Some(text) => self.text_element(name, text),
            None => Ok(()),
        }
    }

    /// Write an already well-formed fragment verbatim
    pub fn raw(&mut self, fragment: &str) -> MetsResult<()> {
        self.inner
            .write_event(Event::Text(BytesText::from_escaped(fragment)))?;
        Ok(())
    }

    /// Consume the writer and return the rendered bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.inner.into_inner().into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(f: impl FnOnce(&mut XmlWriter) -> MetsResult<()>) -> String {
        let mut writer = XmlWriter::new(None);
        f(&mut writer).unwrap();
        String::from_utf8(writer.into_bytes()).unwrap()
    }

    #[test]
    fn test_text_is_escaped() {
        let out = render(|w| w.text_element("a", "x < y & z"));
        assert_eq!(out, "<a>x &lt; y &amp; z</a>");
    }

    #[test]
    fn test_attributes_in_order() {
        let out = render(|w| w.empty("a", [("ID", "x"), ("TYPE", "y")]));
        assert_eq!(out, r#"<a ID="x" TYPE="y"/>"#);
    }

    #[test]
    fn test_raw_fragment_is_not_escaped() {
        let out = render(|w| {
            w.start("wrap", NO_ATTRS)?;
            w.raw("<ex:foo>1</ex:foo>")?;
            w.end("wrap")
        });
        assert_eq!(out, "<wrap><ex:foo>1</ex:foo></wrap>");
    }

    #[test]
    fn test_optional_element_skipped() {
        let out = render(|w| w.opt_text_element("a", None));
        assert_eq!(out, "");
    }

    #[test]
    fn test_declaration() {
        let out = render(|w| w.declaration());
        assert_eq!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    }
}
