use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One record of an exported level, e.g. a `StaticMeshComponent` and its properties.
/// Every field is optional, exports regularly omit them.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Entity {
    #[serde(rename = "Type", default)]
    pub entity_type: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Outer", default)]
    pub outer: Option<String>,
    #[serde(rename = "Properties", default)]
    pub properties: Option<Value>,
}

impl Entity {
    pub fn entity_type(&self) -> &str {
        self.entity_type.as_deref().unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn outer(&self) -> &str {
        self.outer.as_deref().unwrap_or_default()
    }

    pub fn properties(&self) -> PropertyMap<'_> {
        PropertyMap::from_value(self.properties.as_ref())
    }
}

/// Both strings of a typed reference such as `"StaticMesh": { "ObjectName": ..., "ObjectPath": ... }`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ObjectReference<'a> {
    pub object_name: Option<&'a str>,
    pub object_path: Option<&'a str>,
}

impl<'a> ObjectReference<'a> {
    /// The object path, with an empty path being treated like a missing one.
    pub fn path(&self) -> Option<&'a str> {
        self.object_path.filter(|path| !path.is_empty())
    }

    pub fn name(&self) -> &'a str {
        self.object_name.unwrap_or_default()
    }
}

/// Read only view onto a JSON object, where every accessor returns a default instead of failing.
/// Empty objects are handled like missing ones, that's how the exports encode "not set".
#[derive(Debug, Copy, Clone, Default)]
pub struct PropertyMap<'a> {
    inner: Option<&'a Map<String, Value>>,
}

impl<'a> PropertyMap<'a> {
    pub fn from_value(value: Option<&'a Value>) -> Self {
        Self {
            inner: value.and_then(Value::as_object).filter(|map| !map.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.inner.and_then(|map| map.get(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn object(&self, key: &str) -> PropertyMap<'a> {
        PropertyMap::from_value(self.get(key))
    }

    pub fn f32(&self, key: &str) -> Option<f32> {
        self.get(key).and_then(Value::as_f64).map(|value| value as f32)
    }

    pub fn f32_or(&self, key: &str, default: f32) -> f32 {
        self.f32(key).unwrap_or(default)
    }

    pub fn str(&self, key: &str) -> Option<&'a str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn str_or_empty(&self, key: &str) -> &'a str {
        self.str(key).unwrap_or_default()
    }

    pub fn array(&self, key: &str) -> &'a [Value] {
        self.get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn reference(&self, key: &str) -> ObjectReference<'a> {
        let reference = self.object(key);
        ObjectReference {
            object_name: reference.str("ObjectName"),
            object_path: reference.str("ObjectPath"),
        }
    }

    /// Reads a nested vector (e.g. `RelativeLocation` with `X`, `Y`, `Z`).
    /// Returns `None` when the vector is absent, missing components fall back to `default`.
    pub fn vector3(&self, key: &str, components: [&str; 3], default: f32) -> Option<[f32; 3]> {
        let vector = self.object(key);
        if vector.is_empty() {
            return None;
        }

        Some(components.map(|component| vector.f32_or(component, default)))
    }
}

/// Calls `visitor` for every JSON object nested somewhere in `value` (including `value` itself),
/// depth first, in document order.
pub fn visit_objects<'a, F>(value: &'a Value, visitor: &mut F)
where
    F: FnMut(&'a Map<String, Value>),
{
    match value {
        Value::Object(map) => {
            visitor(map);
            for child in map.values() {
                visit_objects(child, visitor);
            }
        }
        Value::Array(items) => {
            for item in items {
                visit_objects(item, visitor);
            }
        }
        _ => {}
    }
}
