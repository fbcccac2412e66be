//! Route schema decoding.
//!
//! Some routes are described by an embedded XML document instead of an
//! explicit endpoint list. The decoder flattens that document into
//! dotted-path/value pairs and derives the route's output endpoints from
//! them. Decoding never fails loudly: a malformed document simply yields
//! an empty result, and the route ends up with no derived outputs.

use tracing::debug;

/// Flattened view of a route schema document.
///
/// Every element attribute and text leaf becomes one `(path, value)`
/// pair in document order, with dotted paths like `route.to._uri`
/// (attributes carry a `_`-prefixed final segment). Paths are not
/// unique: repeated elements produce repeated paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaPaths {
    paths: Vec<(String, String)>,
}

impl SchemaPaths {
    /// All flattened `(path, value)` pairs, in document order.
    pub fn paths(&self) -> &[(String, String)] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Output endpoints implied by the schema: values of every `._uri`
    /// path that is not the route's own `from` clause, deduplicated in
    /// document order. The declared input list is never derived here.
    pub fn output_endpoints(&self) -> Vec<String> {
        let mut outputs: Vec<String> = Vec::new();
        for (path, value) in &self.paths {
            if path.ends_with("._uri") && !path.ends_with("from._uri") {
                if !outputs.iter().any(|o| o == value) {
                    outputs.push(value.clone());
                }
            }
        }
        outputs
    }
}

/// Decode an XML route schema into its flattened path map.
///
/// A document that fails to parse yields an empty [`SchemaPaths`];
/// the failure is the route's problem, not the caller's.
pub fn decode_schema(xml: &str) -> SchemaPaths {
    match roxmltree::Document::parse(xml) {
        Ok(doc) => {
            let mut paths = Vec::new();
            flatten(doc.root_element(), "", &mut paths);
            SchemaPaths { paths }
        }
        Err(e) => {
            debug!(error = %e, "route schema failed to parse");
            SchemaPaths::default()
        }
    }
}

fn flatten(node: roxmltree::Node<'_, '_>, prefix: &str, out: &mut Vec<(String, String)>) {
    let path = if prefix.is_empty() {
        node.tag_name().name().to_string()
    } else {
        format!("{}.{}", prefix, node.tag_name().name())
    };

    for attr in node.attributes() {
        out.push((format!("{}._{}", path, attr.name()), attr.value().to_string()));
    }

    let mut has_child_element = false;
    for child in node.children() {
        if child.is_element() {
            has_child_element = true;
            flatten(child, &path, out);
        }
    }

    // Leaf elements contribute their trimmed text content
    if !has_child_element {
        if let Some(text) = node.text() {
            let text = text.trim();
            if !text.is_empty() {
                out.push((path, text.to_string()));
            }
        }
    }
}
