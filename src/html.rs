//! A small HTML element tree.
//!
//! Card markup is assembled as [`Element`] values rather than format
//! strings. Text nodes and attribute values are escaped when the tree is
//! written out, so nothing taken from the data can reach the output
//! unescaped. The only literal markup is tag names, attribute names and the
//! fixed [`Entity`] set.
//!
//! ```text
//! Element::new("p").class("text-xs").text("Tom & Jerry")
//!     → <p class="text-xs">Tom &amp; Jerry</p>
//! ```

use std::fmt::{self, Write};

/// Escapes `&`, `<`, `>` and `"`.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    // Writing into a String cannot fail.
    let _ = write_escaped(&mut out, s);
    out
}

fn write_escaped<W: Write>(out: &mut W, s: &str) -> fmt::Result {
    for ch in s.chars() {
        match ch {
            '&' => out.write_str("&amp;")?,
            '<' => out.write_str("&lt;")?,
            '>' => out.write_str("&gt;")?,
            '"' => out.write_str("&quot;")?,
            c => out.write_char(c)?,
        }
    }
    Ok(())
}

/// Named character references the cards use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Hellip,
    Lsaquo,
    Rsaquo,
    NorthEastArrow,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Hellip => "&hellip;",
            Entity::Lsaquo => "&lsaquo;",
            Entity::Rsaquo => "&rsaquo;",
            Entity::NorthEastArrow => "&#8599;",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Entity(Entity),
    Element(Element),
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Text(text) => write_escaped(f, text),
            Node::Entity(entity) => f.write_str(entity.as_str()),
            Node::Element(el) => fmt::Display::fmt(el, f),
        }
    }
}

/// An element with ordered attributes and child nodes.
///
/// Attributes are written in insertion order. A `None` value is a bare
/// boolean attribute such as `disabled`.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, Option<String>)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, Some(value.into())));
        self
    }

    pub fn flag(mut self, name: &'static str) -> Self {
        self.attrs.push((name, None));
        self
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    pub fn style(self, value: impl Into<String>) -> Self {
        self.attr("style", value)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn entity(mut self, entity: Entity) -> Self {
        self.children.push(Node::Entity(entity));
        self
    }

    pub fn child(mut self, el: Element) -> Self {
        self.children.push(Node::Element(el));
        self
    }

    pub fn child_opt(self, el: Option<Element>) -> Self {
        match el {
            Some(el) => self.child(el),
            None => self,
        }
    }

    pub fn children(mut self, els: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(els.into_iter().map(Node::Element));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.attrs {
            match value {
                Some(value) => {
                    write!(f, " {}=\"", name)?;
                    write_escaped(f, value)?;
                    f.write_char('"')?;
                }
                None => write!(f, " {}", name)?,
            }
        }
        f.write_char('>')?;
        for child in &self.children {
            fmt::Display::fmt(child, f)?;
        }
        write!(f, "</{}>", self.tag)
    }
}

/// Writes sibling elements one after another.
pub fn render_all<'a>(els: impl IntoIterator<Item = &'a Element>) -> String {
    let mut out = String::new();
    for el in els {
        // Writing into a String cannot fail.
        let _ = write!(out, "{}", el);
    }
    out
}
