//! Parser for the XML documents served by the tree backend.
//!
//! Two documents share one shape. `@@children.xml` lists the direct
//! children of a container:
//!
//! ```xml
//! <children>
//!   <collection name="folder" length="3" icon_url="http://host/@@/folder.gif"/>
//!   <item name="page" icon_url=""/>
//! </children>
//! ```
//!
//! `@@singleBranchTree.xml` nests collections from the root down to the
//! current object. Its root element carries `title_tpl` and `loading_msg`.
//! The top collection carries `isroot` and `baseURL`. The collection for
//! the current object has the text content `selected`.
//!
//! Only `collection` elements become descriptors. Everything else is skipped
//! together with its content.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io;

const COLLECTION: &[u8] = b"collection";
const SELECTED_MARKER: &str = "selected";

/// Parsed children document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChildrenDocument {
    /// Tooltip template override (`title_tpl`)
    pub title_template: Option<String>,
    /// Loading placeholder text override (`loading_msg`)
    pub loading_message: Option<String>,
    /// Top-level collections, in document order
    pub collections: Vec<CollectionDescriptor>,
}

impl ChildrenDocument {
    fn from_root(element: &BytesStart<'_>) -> io::Result<Self> {
        let mut document = Self::default();
        for (key, value) in read_attributes(element)? {
            match key.as_str() {
                "title_tpl" => document.title_template = Some(value),
                "loading_msg" => document.loading_message = Some(value),
                _ => {}
            }
        }
        Ok(document)
    }

    /// The collection marked `isroot`, if any
    pub fn root_collection(&self) -> Option<&CollectionDescriptor> {
        self.collections.iter().find(|c| c.is_root)
    }
}

/// One `<collection>` element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionDescriptor {
    pub name: String,
    /// Icon URL, empty when the server has none
    pub icon_url: String,
    /// Number of items in the collection, if the server reported it
    pub length: Option<u64>,
    /// Marks the collection of the object currently being viewed
    pub selected: bool,
    pub is_root: bool,
    /// Base URL of the site, only present on the root collection
    pub base_url: Option<String>,
    /// Nested collections (single-branch documents only)
    pub children: Vec<CollectionDescriptor>,
}

impl CollectionDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    fn from_element(element: &BytesStart<'_>) -> io::Result<Self> {
        let mut descriptor = Self::default();
        let mut has_name = false;

        for (key, value) in read_attributes(element)? {
            match key.as_str() {
                "name" => {
                    descriptor.name = value;
                    has_name = true;
                }
                "icon_url" => descriptor.icon_url = value,
                "length" => descriptor.length = value.trim().parse().ok(),
                "isroot" => descriptor.is_root = true,
                "baseURL" => descriptor.base_url = Some(value),
                _ => {}
            }
        }

        if !has_name {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "collection element without a name",
            ));
        }

        Ok(descriptor)
    }
}

/// Parse a children or single-branch document
///
/// # Errors
///
/// Returns `InvalidData` for malformed XML, a document without a root
/// element, or a collection without a name.
pub fn parse_children_document(xml: &str) -> io::Result<ChildrenDocument> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut document: Option<ChildrenDocument> = None;
    // Collections whose end tag has not been seen yet
    let mut open: Vec<CollectionDescriptor> = Vec::new();
    // Depth inside an element we do not care about
    let mut skip_depth = 0usize;

    loop {
        match reader.read_event().map_err(invalid_data)? {
            Event::Start(element) => {
                if skip_depth > 0 {
                    skip_depth += 1;
                } else if document.is_none() {
                    document = Some(ChildrenDocument::from_root(&element)?);
                } else if element.local_name().as_ref() == COLLECTION {
                    open.push(CollectionDescriptor::from_element(&element)?);
                } else {
                    skip_depth = 1;
                }
            }
            Event::Empty(element) => {
                if skip_depth > 0 {
                    continue;
                }
                if document.is_none() {
                    document = Some(ChildrenDocument::from_root(&element)?);
                } else if element.local_name().as_ref() == COLLECTION {
                    let descriptor = CollectionDescriptor::from_element(&element)?;
                    attach(&mut document, &mut open, descriptor);
                }
            }
            Event::Text(text) => {
                if skip_depth > 0 {
                    continue;
                }
                // Only the first child of a collection can be the marker
                if let Some(current) = open.last_mut() {
                    if current.children.is_empty()
                        && text.unescape().map_err(invalid_data)?.trim() == SELECTED_MARKER
                    {
                        current.selected = true;
                    }
                }
            }
            Event::End(_) => {
                if skip_depth > 0 {
                    skip_depth -= 1;
                } else if let Some(descriptor) = open.pop() {
                    attach(&mut document, &mut open, descriptor);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !open.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "unterminated collection element",
        ));
    }

    document.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "document has no root element"))
}

fn attach(
    document: &mut Option<ChildrenDocument>,
    open: &mut [CollectionDescriptor],
    descriptor: CollectionDescriptor,
) {
    if let Some(parent) = open.last_mut() {
        parent.children.push(descriptor);
    } else if let Some(document) = document.as_mut() {
        document.collections.push(descriptor);
    }
}

fn read_attributes(element: &BytesStart<'_>) -> io::Result<Vec<(String, String)>> {
    let mut result = Vec::new();
    for attribute in element.attributes() {
        let attribute = attribute.map_err(invalid_data)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value().map_err(invalid_data)?.into_owned();
        result.push((key, value));
    }
    Ok(result)
}

fn invalid_data<E>(error: E) -> io::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    io::Error::new(io::ErrorKind::InvalidData, error)
}
