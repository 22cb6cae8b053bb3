//! SDL fragment merging

/// Merge per-resource fragments into a single SDL document
///
/// Type definitions are joined verbatim, then every query signature is placed
/// inside one `type Query` block and every mutation signature inside one
/// `type Mutation` block. No validation happens here; a malformed fragment
/// surfaces when the document is parsed.
pub fn merge_schemas<T, Q, M>(type_defs: &[T], queries: &[Q], mutations: &[M]) -> String
where
    T: AsRef<str>,
    Q: AsRef<str>,
    M: AsRef<str>,
{
    format!(
        "{}\n    type Query {{ {} }}\n    type Mutation {{ {} }}",
        join(type_defs),
        join(queries),
        join(mutations)
    )
}

fn join<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n")
}
