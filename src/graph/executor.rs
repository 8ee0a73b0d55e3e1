// Runs a parsed document against the query or mutation root
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::graph::node::resolve_selection;
use crate::graph::nodes::{MutationRoot, QueryRoot};
use crate::graph::{parse_document, Document, Operation};
use crate::operations::Proxy;

/// Resolve every top-level field of the document. The first failing field
/// aborts the whole document.
pub async fn execute(proxy: &Proxy, document: &Document) -> Result<Value> {
    debug!(
        operation = ?document.operation,
        fields = ?document.selection.field_names().collect::<Vec<_>>(),
        "executing document"
    );
    match document.operation {
        Operation::Query => resolve_selection(&QueryRoot, proxy, &document.selection).await,
        Operation::Mutation => resolve_selection(&MutationRoot, proxy, &document.selection).await,
    }
}

/// Parse and execute in one step
pub async fn execute_str(proxy: &Proxy, source: &str) -> Result<Value> {
    let document = parse_document(source)?;
    execute(proxy, &document).await
}
