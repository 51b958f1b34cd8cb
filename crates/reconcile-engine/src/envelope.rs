//! Serialization (C14): detects which of the four input forms §6 promises
//! (package, `w:document/w:body`, bare `w:p`, bare `w:tbl`) the caller
//! handed in, and reconstructs the same shape on the way out.
//!
//! `XmlDocument::parse` only ever keeps a single top-level root (see its
//! module docs), which would silently drop every paragraph after the first
//! in a bare multi-paragraph fragment. To give every input form a home, the
//! whole string is always parsed inside one synthetic wrapper element first;
//! classification then looks at the wrapper's children rather than at
//! `doc.root()` directly.

use reconcile_xml::error::XmlError;
use reconcile_xml::namespaces::{DOCUMENT_CONTENT_TYPE, PKG, W};
use reconcile_xml::{NodeId, XmlDocument};

enum EnvelopeForm {
    /// A `pkg:package` (the `insertOoxml` convention): relationship parts
    /// are preserved untouched, only the document part's content changes.
    Package { package_node: NodeId },
    Document { document_node: NodeId },
    Body { body_node: NodeId },
    /// A bare `w:p`, a bare `w:tbl`, or several of either at the top level
    /// with no wrapping `w:body` — the common case when a host adapter
    /// hands the engine just the paragraphs it cares about.
    Fragment { wrapper: NodeId },
}

/// Parsed input plus enough context to serialize the result back into the
/// same external shape it arrived in.
pub struct Envelope {
    pub doc: XmlDocument,
    /// The node whose direct children are the paragraphs/tables in scope.
    pub container: NodeId,
    form: EnvelopeForm,
}

impl Envelope {
    pub fn parse(oxml: &str) -> Result<Envelope, XmlError> {
        let wrapped = format!("<redline:envelope>{oxml}</redline:envelope>");
        let doc = XmlDocument::parse(&wrapped)?;
        let wrapper = doc.root();
        let children: Vec<NodeId> = doc.children(wrapper).collect();
        let first = *children.first().ok_or(XmlError::NoRoot)?;

        if children.len() == 1 && doc.get(first).is_element_named(&PKG::package()) {
            let document_node = locate_package_document(&doc, first)?;
            let body = doc.first_child_named(document_node, &W::body()).ok_or(XmlError::NoRoot)?;
            return Ok(Envelope {
                doc,
                container: body,
                form: EnvelopeForm::Package { package_node: first },
            });
        }
        if children.len() == 1 && doc.get(first).is_element_named(&W::document()) {
            let body = doc.first_child_named(first, &W::body()).ok_or(XmlError::NoRoot)?;
            return Ok(Envelope {
                doc,
                container: body,
                form: EnvelopeForm::Document { document_node: first },
            });
        }
        if children.len() == 1 && doc.get(first).is_element_named(&W::body()) {
            return Ok(Envelope {
                doc,
                container: first,
                form: EnvelopeForm::Body { body_node: first },
            });
        }
        Ok(Envelope {
            doc,
            container: wrapper,
            form: EnvelopeForm::Fragment { wrapper },
        })
    }

    /// Reserializes into the same external shape the input arrived in.
    pub fn finish(self) -> String {
        match self.form {
            EnvelopeForm::Package { package_node } => self.doc.serialize_subtree(package_node),
            EnvelopeForm::Document { document_node } => self.doc.serialize_subtree(document_node),
            EnvelopeForm::Body { body_node } => self.doc.serialize_subtree(body_node),
            EnvelopeForm::Fragment { wrapper } => self
                .doc
                .children(wrapper)
                .map(|child| self.doc.serialize_subtree(child))
                .collect(),
        }
    }
}

/// Finds the `pkg:part` carrying the main document (by content type, falling
/// back to its `pkg:name` ending in `document.xml`), then the `w:document`
/// nested inside its `pkg:xmlData`.
fn locate_package_document(doc: &XmlDocument, package: NodeId) -> Result<NodeId, XmlError> {
    let document_part = doc
        .children_named(package, &PKG::part())
        .find(|&part| {
            doc.get(part).attr("contentType") == Some(DOCUMENT_CONTENT_TYPE)
                || doc
                    .get(part)
                    .attr("name")
                    .map(|name| name.ends_with("document.xml"))
                    .unwrap_or(false)
        })
        .ok_or(XmlError::NoRoot)?;
    let xml_data = doc.first_child_named(document_part, &PKG::xmlData()).ok_or(XmlError::NoRoot)?;
    doc.first_child_named(xml_data, &W::document()).ok_or(XmlError::NoRoot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_paragraph_becomes_a_fragment_scoped_to_the_wrapper() {
        let env = Envelope::parse(r#"<w:p><w:r><w:t>Hello</w:t></w:r></w:p>"#).unwrap();
        assert_eq!(env.doc.children(env.container).count(), 1);
        let out = env.finish();
        assert!(out.starts_with("<w:p>"));
    }

    #[test]
    fn multiple_top_level_paragraphs_all_survive_as_one_fragment() {
        let env = Envelope::parse(
            r#"<w:p><w:r><w:t>A</w:t></w:r></w:p><w:p><w:r><w:t>B</w:t></w:r></w:p>"#,
        )
        .unwrap();
        assert_eq!(env.doc.children(env.container).count(), 2);
        let out = env.finish();
        assert!(out.contains('A') && out.contains('B'));
    }

    #[test]
    fn body_wrapper_round_trips_with_its_own_tag() {
        let env = Envelope::parse(r#"<w:body><w:p><w:r><w:t>Hi</w:t></w:r></w:p></w:body>"#).unwrap();
        let out = env.finish();
        assert!(out.starts_with("<w:body>") && out.ends_with("</w:body>"));
    }

    #[test]
    fn document_wrapper_round_trips_with_its_own_tag() {
        let env = Envelope::parse(
            r#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:t>Hi</w:t></w:r></w:p></w:body></w:document>"#,
        )
        .unwrap();
        let out = env.finish();
        assert!(out.starts_with("<w:document"));
        assert!(out.contains("<w:body>"));
    }

    #[test]
    fn package_wrapper_locates_the_document_part_and_round_trips_it() {
        let xml = format!(
            r#"<pkg:package xmlns:pkg="{ns}">
                <pkg:part pkg:name="/_rels/.rels" pkg:contentType="application/vnd.openxmlformats-package.relationships+xml">
                    <pkg:xmlData><Relationships/></pkg:xmlData>
                </pkg:part>
                <pkg:part pkg:name="/word/document.xml" pkg:contentType="{ct}">
                    <pkg:xmlData><w:document><w:body><w:p><w:r><w:t>Hi</w:t></w:r></w:p></w:body></w:document></pkg:xmlData>
                </pkg:part>
            </pkg:package>"#,
            ns = PKG::NS,
            ct = DOCUMENT_CONTENT_TYPE,
        );
        let env = Envelope::parse(&xml).unwrap();
        assert_eq!(env.doc.text_content(env.container), "Hi");
        let out = env.finish();
        assert!(out.starts_with("<pkg:package"));
        assert!(out.contains("/_rels/.rels"));
        assert!(out.contains("Hi"));
    }
}
