//! JSON renderer: the view model as a serde_json value.
//!
//! Top-level key order is fixed (title → kpis → bars → rules → roi → doc →
//! cta → provenance) by building the root map by hand; section bodies come
//! from the serde derives.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::structure::ReportModel;
use crate::ReportError;

pub fn render_json(m: &ReportModel) -> Result<Value, ReportError> {
    let mut root = Map::new();
    root.insert("title".into(), Value::String(m.title.clone()));
    root.insert("kpis".into(), to_value(&m.kpis)?);
    root.insert("bars".into(), to_value(&m.bars)?);
    root.insert("rules".into(), to_value(&m.rules)?);
    root.insert("roi".into(), to_value(&m.roi)?);
    root.insert("doc".into(), to_value(&m.doc)?);
    root.insert("cta".into(), to_value(&m.cta)?);
    root.insert("provenance".into(), to_value(&m.provenance)?);
    Ok(Value::Object(root))
}

pub fn render_json_string(m: &ReportModel) -> Result<String, ReportError> {
    let v = render_json(m)?;
    serde_json::to_string_pretty(&v).map_err(|e| ReportError::Serialize(e.to_string()))
}

fn to_value<T: Serialize>(v: &T) -> Result<Value, ReportError> {
    serde_json::to_value(v).map_err(|e| ReportError::Serialize(e.to_string()))
}
