//! Minimal HTML tag model for rendering form elements.
//!
//! Attributes are kept in a sorted map, so markup is deterministic:
//! `<input class="one" id="form-age" name="age" type="text" />`.
//! Attribute values and text are HTML-escaped.

use std::collections::BTreeMap;
use std::fmt;

/// A set of HTML attributes, rendered in key order.
///
/// A bare string converts into a `class` attribute:
///
/// ```
/// use formwork_forms::tag::Attrs;
///
/// let attrs = Attrs::from("one");
/// assert_eq!(attrs.get("class"), Some("one"));
///
/// let attrs = Attrs::from([("id", "custom"), ("rows", "3")]);
/// assert_eq!(attrs.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs(BTreeMap<String, String>);

impl Attrs {
    /// Creates an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Returns an attribute value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Copies every attribute of `other` over this set.
    pub fn merge(&mut self, other: &Self) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates attributes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<&str> for Attrs {
    fn from(class: &str) -> Self {
        Self::new().with("class", class)
    }
}

impl From<String> for Attrs {
    fn from(class: String) -> Self {
        Self::new().with("class", class)
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Attrs {
    fn from(pairs: [(K, V); N]) -> Self {
        Self(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A piece of tag content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A nested tag.
    Tag(Tag),
    /// Escaped text.
    Text(String),
    /// A line break between sibling tags.
    Newline,
}

/// An HTML tag, or a nameless group of sibling nodes.
///
/// # Examples
///
/// ```
/// use formwork_forms::tag::{Attrs, Tag};
///
/// let tag = Tag::void("input", Attrs::from([("type", "text"), ("name", "age")]));
/// assert_eq!(tag.to_html(), r#"<input name="age" type="text" />"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    name: Option<String>,
    attrs: Attrs,
    children: Vec<Node>,
    void: bool,
}

impl Tag {
    /// Creates a self-closing tag such as `<input />`.
    pub fn void(name: &str, attrs: Attrs) -> Self {
        Self {
            name: Some(name.to_string()),
            attrs,
            children: Vec::new(),
            void: true,
        }
    }

    /// Creates a tag with content.
    pub fn new(name: &str, attrs: Attrs, children: Vec<Node>) -> Self {
        Self {
            name: Some(name.to_string()),
            attrs,
            children,
            void: false,
        }
    }

    /// Creates a nameless group of tags, each followed by a line break.
    pub fn listing(items: Vec<Self>) -> Self {
        Self {
            name: None,
            attrs: Attrs::new(),
            children: lines(items),
            void: false,
        }
    }

    /// Returns the tag name, or `None` for a listing.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the tag's attributes.
    pub const fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    /// Returns the tag's content.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Renders the tag as an HTML string.
    pub fn to_html(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "<{name}")?;
            for (k, v) in self.attrs.iter() {
                write!(f, r#" {k}="{}""#, escape_html(v))?;
            }
            if self.void {
                return write!(f, " />");
            }
            write!(f, ">")?;
        }

        for child in &self.children {
            match child {
                Node::Tag(tag) => write!(f, "{tag}")?,
                Node::Text(text) => write!(f, "{}", escape_html(text))?,
                Node::Newline => writeln!(f)?,
            }
        }

        if let Some(name) = &self.name {
            write!(f, "</{name}>")?;
        }
        Ok(())
    }
}

/// Interleaves tags with trailing line breaks.
pub(crate) fn lines(tags: Vec<Tag>) -> Vec<Node> {
    tags.into_iter()
        .flat_map(|tag| [Node::Tag(tag), Node::Newline])
        .collect()
}

/// Escapes HTML special characters in a string.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
