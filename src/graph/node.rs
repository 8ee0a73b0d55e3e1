// Node trait plus the helpers that turn a field selection into JSON

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::future::Future;
use tokio::sync::OnceCell;

use crate::error::{ProxyError, Result};
use crate::graph::{needs_fetch, Field, PageRequest, Selection};
use crate::operations::Proxy;

pub const TYPENAME_FIELD: &str = "__typename";

/// A graph node resolves one field at a time; the caller assembles the object.
#[async_trait]
pub trait GraphNode: Send + Sync {
    fn type_name(&self) -> &'static str;

    async fn resolve_field(&self, proxy: &Proxy, field: &Field) -> Result<Value>;
}

#[async_trait]
impl GraphNode for Box<dyn GraphNode> {
    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    async fn resolve_field(&self, proxy: &Proxy, field: &Field) -> Result<Value> {
        (**self).resolve_field(proxy, field).await
    }
}

/// Resolve every field of `selection` on `node`, in order.
pub async fn resolve_selection(node: &dyn GraphNode, proxy: &Proxy, selection: &Selection) -> Result<Value> {
    let mut out = Map::new();
    for field in &selection.fields {
        let value = if field.name == TYPENAME_FIELD {
            Value::String(node.type_name().to_string())
        } else {
            node.resolve_field(proxy, field).await?
        };
        out.insert(field.response_key().to_string(), value);
    }
    Ok(Value::Object(out))
}

/// Resolve a child node against the field's sub-selection
pub async fn resolve_node(node: &dyn GraphNode, proxy: &Proxy, field: &Field) -> Result<Value> {
    if field.selection.is_empty() {
        return Err(ProxyError::invalid(format!(
            "Field '{}' of type {} needs a sub-selection",
            field.name,
            node.type_name()
        )));
    }
    resolve_selection(node, proxy, &field.selection).await
}

pub async fn resolve_optional(node: Option<&dyn GraphNode>, proxy: &Proxy, field: &Field) -> Result<Value> {
    match node {
        Some(node) => resolve_node(node, proxy, field).await,
        None => Ok(Value::Null),
    }
}

pub async fn resolve_list<N: GraphNode>(nodes: &[N], proxy: &Proxy, field: &Field) -> Result<Value> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        out.push(resolve_node(node, proxy, field).await?);
    }
    Ok(Value::Array(out))
}

/// Shape a plain JSON value by a selection. Arrays are shaped element-wise,
/// missing keys become null and an empty selection returns the value whole.
pub fn project(value: &Value, selection: &Selection) -> Value {
    if selection.is_empty() {
        return value.clone();
    }
    match value {
        Value::Array(items) => Value::Array(items.iter().map(|item| project(item, selection)).collect()),
        Value::Object(map) => {
            let mut out = Map::new();
            for field in &selection.fields {
                let inner = map.get(&field.name).unwrap_or(&Value::Null);
                out.insert(field.response_key().to_string(), project(inner, &field.selection));
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

pub fn project_field(value: &Value, field: &Field) -> Value {
    project(value, &field.selection)
}

/// Page arguments read from a field's `page` / `limit` arguments
pub fn page_request(field: &Field) -> Result<PageRequest> {
    Ok(PageRequest::new(field.arg_u32("page")?, field.arg_u32("limit")?))
}

/// `{ items, next }` over a list of nodes. `next` is the `{page, limit}` to
/// pass back for the following page, or null on the last one.
pub struct PageNode<N> {
    pub items: Vec<N>,
    pub next: Option<PageRequest>,
}

#[async_trait]
impl<N: GraphNode> GraphNode for PageNode<N> {
    fn type_name(&self) -> &'static str {
        "Page"
    }

    async fn resolve_field(&self, proxy: &Proxy, field: &Field) -> Result<Value> {
        match field.name.as_str() {
            "items" => resolve_list(&self.items, proxy, field).await,
            "next" => {
                let next = self.next.map(|n| json!({ "page": n.page, "limit": n.limit }));
                Ok(project_field(&next.unwrap_or(Value::Null), field))
            }
            other => Err(unknown_field(self.type_name(), other)),
        }
    }
}

pub fn unknown_field(type_name: &str, field: &str) -> ProxyError {
    ProxyError::invalid(format!("Type {} has no field '{}'", type_name, field))
}

/// An entity known partly up front (its identity, or a list entry) and
/// fetched in full at most once, only when a field outside the known set is
/// asked for.
#[derive(Debug)]
pub struct Lazy {
    known: Value,
    full: OnceCell<Value>,
}

impl Lazy {
    pub fn known(known: Value) -> Self {
        Self {
            known,
            full: OnceCell::new(),
        }
    }

    pub fn loaded(full: Value) -> Self {
        Self {
            known: full.clone(),
            full: OnceCell::new_with(Some(full)),
        }
    }

    /// Best data available without a fetch
    pub fn current(&self) -> &Value {
        self.full.get().unwrap_or(&self.known)
    }

    pub fn is_loaded(&self) -> bool {
        self.full.initialized()
    }

    fn known_keys(&self) -> Vec<&str> {
        self.known
            .as_object()
            .map(|map| map.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub async fn full<F, Fut>(&self, load: F) -> Result<&Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        self.full.get_or_try_init(load).await
    }

    /// One field, fetching the full entity only if the field is not known yet
    pub async fn get<F, Fut>(&self, name: &str, load: F) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        if !needs_fetch([name], &self.known_keys()) {
            return Ok(self.known[name].clone());
        }
        let full = self.full(load).await?;
        Ok(full.get(name).cloned().unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::parse_selection;

    #[test]
    fn projection_follows_the_selection() {
        let value = json!({
            "symbol": "X1-A-B",
            "traits": [{"symbol": "MARKETPLACE", "name": "Marketplace"}],
            "extra": 1
        });
        let selection = parse_selection("{ symbol traits { symbol } missing }").unwrap();
        assert_eq!(
            project(&value, &selection),
            json!({
                "symbol": "X1-A-B",
                "traits": [{"symbol": "MARKETPLACE"}],
                "missing": null
            })
        );
    }

    #[test]
    fn projection_honours_aliases() {
        let selection = parse_selection("{ name: symbol }").unwrap();
        assert_eq!(project(&json!({"symbol": "S"}), &selection), json!({"name": "S"}));
    }

    #[tokio::test]
    async fn lazy_serves_known_fields_without_loading() {
        let lazy = Lazy::known(json!({"symbol": "X1-A"}));
        let value = lazy
            .get("symbol", || async { Err(ProxyError::invalid("should not load")) })
            .await
            .unwrap();
        assert_eq!(value, json!("X1-A"));
        assert!(!lazy.is_loaded());

        let value = lazy
            .get("type", || async { Ok(json!({"symbol": "X1-A", "type": "RED_STAR"})) })
            .await
            .unwrap();
        assert_eq!(value, json!("RED_STAR"));
        assert!(lazy.is_loaded());

        // second unknown field reuses the loaded copy
        let value = lazy
            .get("sectorSymbol", || async { Err(ProxyError::invalid("loaded twice")) })
            .await
            .unwrap();
        assert_eq!(value, Value::Null);
    }
}
