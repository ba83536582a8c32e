// Data model for documents served by the tree backend

pub mod children_xml;

pub use children_xml::{parse_children_document, ChildrenDocument, CollectionDescriptor};
