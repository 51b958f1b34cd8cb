use std::fmt;

/// A namespace-qualified element or attribute name.
///
/// Lookups in this crate accept either a fully namespace-qualified `XName`
/// or the literal `w:`-prefixed form some serializers hand back when a
/// document was produced without namespace awareness; see
/// [`crate::document::XmlDocument::children_named`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct XName {
    pub namespace: &'static str,
    pub local_name: &'static str,
}

impl XName {
    pub const fn new(namespace: &'static str, local_name: &'static str) -> Self {
        XName {
            namespace,
            local_name,
        }
    }

    /// True if `prefixed` (e.g. `"w:r"`) names the same element as this
    /// namespace-qualified name, ignoring whatever prefix the document used.
    pub fn matches_prefixed(&self, prefixed: &str) -> bool {
        match prefixed.rsplit_once(':') {
            Some((_, local)) => local == self.local_name,
            None => prefixed == self.local_name,
        }
    }
}

impl fmt::Debug for XName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}{}", self.namespace, self.local_name)
    }
}

impl fmt::Display for XName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.local_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_prefixed_ignores_prefix() {
        let name = XName::new("urn:example", "r");
        assert!(name.matches_prefixed("w:r"));
        assert!(name.matches_prefixed("r"));
        assert!(!name.matches_prefixed("w:rPr"));
    }

    #[test]
    fn display_shows_local_name() {
        let name = XName::new("urn:example", "t");
        assert_eq!(format!("{name}"), "t");
    }
}
