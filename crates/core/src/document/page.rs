//! PDF page - page tree traversal and content extraction.

use super::catalog::PdfDocument;
use crate::error::{GoyaError, Result};
use crate::model::objects::PdfObject;
use std::collections::{HashMap, HashSet};

/// A page node from the document's page tree, with its content
/// streams decoded.
#[derive(Debug)]
pub struct PdfPage {
    /// Object ID of the page node (0 when the node was inlined).
    pub objid: u32,
    /// Page attributes dictionary.
    pub attrs: HashMap<String, PdfObject>,
    /// Decoded content streams, in document order.
    pub contents: Vec<Vec<u8>>,
}

impl PdfPage {
    /// Walk the catalog's page tree and collect every `/Type /Page`
    /// leaf, depth first.
    pub fn create_pages(doc: &PdfDocument) -> Result<Vec<PdfPage>> {
        let pages_ref = doc
            .catalog()
            .get("Pages")
            .ok_or_else(|| GoyaError::Syntax("catalog has no Pages entry".into()))?;

        let mut pages = Vec::new();
        let mut visited = HashSet::new();
        Self::walk(doc, pages_ref, &mut pages, &mut visited)?;
        Ok(pages)
    }

    /// Recurse into one page-tree node: a `/Type /Pages` node
    /// contributes its kids, a `/Type /Page` node becomes a page.
    ///
    /// The visited set keeps a reference cycle in a malformed file
    /// from recursing forever.
    fn walk(
        doc: &PdfDocument,
        node: &PdfObject,
        pages: &mut Vec<PdfPage>,
        visited: &mut HashSet<u32>,
    ) -> Result<()> {
        let objid = match node {
            PdfObject::Ref(r) => {
                if !visited.insert(r.objid) {
                    return Ok(());
                }
                r.objid
            }
            _ => 0,
        };

        let resolved = doc.resolve(node)?;
        let dict = resolved.as_dict()?;

        match dict.get("Type").map(|t| t.as_name()).transpose()? {
            Some("Pages") => {
                let kids = dict
                    .get("Kids")
                    .ok_or_else(|| GoyaError::Syntax("Pages node has no Kids".into()))?;
                let kids = doc.resolve(kids)?;
                for kid in kids.as_array()? {
                    Self::walk(doc, kid, pages, visited)?;
                }
                Ok(())
            }
            Some("Page") => {
                let contents = Self::parse_contents(dict, doc);
                pages.push(PdfPage {
                    objid,
                    attrs: dict.clone(),
                    contents,
                });
                Ok(())
            }
            other => Err(GoyaError::Syntax(format!(
                "unexpected page tree node type: {other:?}"
            ))),
        }
    }

    /// Decode a page's content streams.
    ///
    /// Contents may be one stream or an array of streams; array
    /// entries that do not resolve to streams are skipped.
    pub fn parse_contents(
        attrs: &HashMap<String, PdfObject>,
        doc: &PdfDocument,
    ) -> Vec<Vec<u8>> {
        let contents = match attrs.get("Contents") {
            Some(obj) => obj,
            None => return Vec::new(),
        };

        let resolved = match doc.resolve(contents) {
            Ok(obj) => obj,
            Err(_) => return Vec::new(),
        };

        match resolved {
            PdfObject::Stream(stream) => match doc.decode_stream(&stream) {
                Ok(data) => vec![data],
                Err(_) => Vec::new(),
            },
            PdfObject::Array(items) => items
                .iter()
                .filter_map(|item| {
                    doc.resolve(item)
                        .ok()
                        .and_then(|obj| match obj {
                            PdfObject::Stream(stream) => doc.decode_stream(&stream).ok(),
                            _ => None,
                        })
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}
