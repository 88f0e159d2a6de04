// Turning fetched bodies into the sub-tree each endpoint returns
use crate::transport::Fetched;
use crate::xml_node::{self, XmlNode};

/// Parses the response envelope. A 404 and a body that is not XML both come
/// back as `None`.
pub fn envelope(fetched: Fetched) -> Option<XmlNode> {
    match fetched {
        Fetched::NotFound => None,
        Fetched::Body(body) => match xml_node::parse(&body) {
            Ok(root) => Some(root),
            Err(e) => {
                tracing::warn!(error = %e, "discarding malformed goodreads response");
                None
            }
        },
    }
}

pub fn unwrap_child(envelope: Option<XmlNode>, name: &str) -> Option<XmlNode> {
    envelope.and_then(|root| root.take_child(name))
}

// `<books-count>` is also reachable as `books_count`. Only direct children
// of the search node are aliased.
pub fn expand_search_aliases(mut search: XmlNode) -> XmlNode {
    let aliases: Vec<(String, usize)> = search
        .children()
        .enumerate()
        .filter(|(_, (name, _))| name.contains('-'))
        .map(|(index, (name, _))| (name.replace('-', "_"), index))
        .collect();

    for (alias, index) in aliases {
        search.add_alias(alias, index);
    }

    search
}
