//! Markup codec
//!
//! Parses XHTML-flavored markup into the node arena and serializes subtrees
//! back out. Replacement markup handed to the range replacer travels as a
//! string; this is where it becomes nodes. Text is kept verbatim, including
//! whitespace-only nodes, because flattened text is the basis of selector
//! matching.

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

use crate::tree::{DocTree, ElementData, NodeId, NodeKind};

/// Markup parsing errors
#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    #[error("mismatched closing tag </{0}>")]
    MismatchedTag(String),

    #[error("missing document root element")]
    MissingRoot,

    #[error("content outside the document root")]
    TrailingContent,
}

/// Parse a complete document. The single top-level element becomes the tree
/// root; non-whitespace text outside it is an error.
pub fn parse_document(markup: &str) -> Result<DocTree, MarkupError> {
    let mut reader = Reader::from_str(markup);
    let mut tree: Option<DocTree> = None;
    let mut stack: Vec<NodeId> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let data = element_data(&start)?;
                match (&mut tree, stack.last().copied()) {
                    (None, _) => {
                        let t = DocTree::with_root(data);
                        stack.push(t.root());
                        tree = Some(t);
                    }
                    (Some(t), Some(parent)) => {
                        let id = t.create_element(data);
                        t.append(parent, id);
                        stack.push(id);
                    }
                    (Some(_), None) => return Err(MarkupError::TrailingContent),
                }
            }
            Event::Empty(start) => {
                let data = element_data(&start)?;
                match (&mut tree, stack.last().copied()) {
                    (None, _) => {
                        tree = Some(DocTree::with_root(data));
                        // an empty root: nothing left to parse below it
                    }
                    (Some(t), Some(parent)) => {
                        let id = t.create_element(data);
                        t.append(parent, id);
                    }
                    (Some(_), None) => return Err(MarkupError::TrailingContent),
                }
            }
            Event::Text(text) => {
                let value = text.unescape()?.into_owned();
                match (&mut tree, stack.last().copied()) {
                    (Some(t), Some(parent)) => {
                        let id = t.create_text(value);
                        t.append(parent, id);
                    }
                    _ => {
                        if !value.trim().is_empty() {
                            return Err(MarkupError::TrailingContent);
                        }
                    }
                }
            }
            Event::CData(cdata) => {
                let value = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                match (&mut tree, stack.last().copied()) {
                    (Some(t), Some(parent)) => {
                        let id = t.create_text(value);
                        t.append(parent, id);
                    }
                    _ => return Err(MarkupError::TrailingContent),
                }
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                let top = stack.pop().ok_or_else(|| MarkupError::MismatchedTag(name.clone()))?;
                let tree_ref = tree.as_ref().ok_or(MarkupError::MissingRoot)?;
                if tree_ref.tag(top) != Some(name.as_str()) {
                    return Err(MarkupError::MismatchedTag(name));
                }
            }
            Event::Eof => break,
            // prolog, comments and processing instructions carry no content
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    tree.ok_or(MarkupError::MissingRoot)
}

/// Parse a fragment into detached nodes of an existing arena, returning the
/// top-level nodes in document order. Empty input yields an empty list.
pub fn parse_fragment(tree: &mut DocTree, markup: &str) -> Result<Vec<NodeId>, MarkupError> {
    fn place(tree: &mut DocTree, stack: &[NodeId], top_level: &mut Vec<NodeId>, id: NodeId) {
        match stack.last() {
            Some(&parent) => tree.append(parent, id),
            None => top_level.push(id),
        }
    }

    let mut reader = Reader::from_str(markup);
    let mut stack: Vec<NodeId> = Vec::new();
    let mut top_level: Vec<NodeId> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let id = tree.create_element(element_data(&start)?);
                place(tree, &stack, &mut top_level, id);
                stack.push(id);
            }
            Event::Empty(start) => {
                let id = tree.create_element(element_data(&start)?);
                place(tree, &stack, &mut top_level, id);
            }
            Event::Text(text) => {
                let id = tree.create_text(text.unescape()?.into_owned());
                place(tree, &stack, &mut top_level, id);
            }
            Event::CData(cdata) => {
                let value = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                let id = tree.create_text(value);
                place(tree, &stack, &mut top_level, id);
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                let top = stack.pop().ok_or_else(|| MarkupError::MismatchedTag(name.clone()))?;
                if tree.tag(top) != Some(name.as_str()) {
                    return Err(MarkupError::MismatchedTag(name));
                }
            }
            Event::Eof => break,
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    Ok(top_level)
}

/// Serialize a subtree back to markup, escaping text and attribute values.
pub fn serialize(tree: &DocTree, id: NodeId) -> String {
    let mut out = String::new();
    serialize_into(tree, id, &mut out);
    out
}

fn serialize_into(tree: &DocTree, id: NodeId, out: &mut String) {
    match tree.node(id).kind() {
        NodeKind::Text(t) => out.push_str(&html_escape::encode_text(t)),
        NodeKind::Element(e) => {
            out.push('<');
            out.push_str(&e.tag);
            for (name, value) in &e.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(value));
                out.push('"');
            }
            let children = tree.node(id).children();
            if children.is_empty() {
                out.push_str("/>");
            } else {
                out.push('>');
                for &child in children {
                    serialize_into(tree, child, out);
                }
                out.push_str("</");
                out.push_str(&e.tag);
                out.push('>');
            }
        }
    }
}

fn element_data(start: &quick_xml::events::BytesStart<'_>) -> Result<ElementData, MarkupError> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut data = ElementData::new(tag);
    for attr in start.attributes() {
        let attr = attr?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        data.attrs.push((name, value));
    }
    Ok(data)
}
