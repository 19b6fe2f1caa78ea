//! Sinks: where a compiled dataset goes.
//!
//! A sink receives named, typed arrays one at a time and renders them into some artifact once finished.  It knows
//! nothing about HRTFs; see [crate::hrtf_data::HrtfData::write_to] for which arrays a dataset produces.
use itertools::Itertools;
use serde::Serialize;

use crate::error::SinkError;

/// The primitive type of an array's elements.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ElementType {
    #[display(fmt = "unsigned int")]
    UnsignedInt,
    #[display(fmt = "int")]
    Int,
    #[display(fmt = "float")]
    Float,
}

impl ElementType {
    /// Name of the matching Rust primitive.
    pub fn rust_type(&self) -> &'static str {
        match self {
            ElementType::UnsignedInt => "u32",
            ElementType::Int => "i32",
            ElementType::Float => "f32",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArrayValues {
    UnsignedInt(Vec<u32>),
    Int(Vec<i32>),
    Float(Vec<f32>),
}

impl ArrayValues {
    pub fn element_type(&self) -> ElementType {
        match self {
            ArrayValues::UnsignedInt(_) => ElementType::UnsignedInt,
            ArrayValues::Int(_) => ElementType::Int,
            ArrayValues::Float(_) => ElementType::Float,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ArrayValues::UnsignedInt(x) => x.len(),
            ArrayValues::Int(x) => x.len(),
            ArrayValues::Float(x) => x.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The values as Rust literals.
    ///
    /// Floats use their shortest round-tripping form and always carry a decimal point or exponent.
    fn literals(&self) -> Vec<String> {
        match self {
            ArrayValues::UnsignedInt(x) => x.iter().map(|v| v.to_string()).collect(),
            ArrayValues::Int(x) => x.iter().map(|v| v.to_string()).collect(),
            ArrayValues::Float(x) => x.iter().map(|v| format!("{v:?}")).collect(),
        }
    }
}

pub trait ArraySink {
    type Output;

    /// Add one array.  Names must be unique within a sink.
    fn add_array(&mut self, name: &str, values: ArrayValues) -> Result<(), SinkError>;

    /// Render everything added so far.
    fn finish(self) -> Result<Self::Output, SinkError>;
}

/// Holds arrays in the order they were added.
///
/// Useful by itself in tests, and the other sinks build on it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemorySink {
    arrays: Vec<(String, ArrayValues)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn get(&self, name: &str) -> Option<&ArrayValues> {
        self.arrays.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.arrays.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArrayValues)> {
        self.arrays.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl ArraySink for MemorySink {
    type Output = MemorySink;

    fn add_array(&mut self, name: &str, values: ArrayValues) -> Result<(), SinkError> {
        if self.get(name).is_some() {
            return Err(SinkError::DuplicateArray(name.to_string()));
        }

        log::debug!(
            "Adding array {name}: {} {} values",
            values.len(),
            values.element_type()
        );
        self.arrays.push((name.to_string(), values));
        Ok(())
    }

    fn finish(self) -> Result<MemorySink, SinkError> {
        Ok(self)
    }
}

/// Renders a Rust source file with one `pub static` array per input array, named in upper case.
#[derive(Clone, Debug, Default)]
pub struct RustArrayWriter {
    arrays: MemorySink,
}

impl RustArrayWriter {
    pub fn new() -> Self {
        Default::default()
    }
}

impl ArraySink for RustArrayWriter {
    type Output = String;

    fn add_array(&mut self, name: &str, values: ArrayValues) -> Result<(), SinkError> {
        self.arrays.add_array(name, values)
    }

    fn finish(self) -> Result<String, SinkError> {
        let defs = self
            .arrays
            .iter()
            .map(|(name, values)| {
                let upper = name.to_uppercase();
                let ty = values.element_type().rust_type();
                let len = values.len();
                let literal = values.literals().into_iter().join(",\n    ");
                format!("pub static {upper}: [{ty}; {len}] = [\n    {literal}\n];\n")
            })
            .join("\n");

        Ok(format!(
            "// Generated by hrtf_compiler. Do not edit.\n\n{defs}"
        ))
    }
}

#[derive(Serialize)]
struct JsonArray<'a> {
    element_type: String,
    values: &'a ArrayValues,
}

/// Renders one JSON object mapping each array's name to its element type and values.
#[derive(Clone, Debug, Default)]
pub struct JsonArrayWriter {
    arrays: MemorySink,
}

impl JsonArrayWriter {
    pub fn new() -> Self {
        Default::default()
    }
}

impl ArraySink for JsonArrayWriter {
    type Output = String;

    fn add_array(&mut self, name: &str, values: ArrayValues) -> Result<(), SinkError> {
        self.arrays.add_array(name, values)
    }

    fn finish(self) -> Result<String, SinkError> {
        let mut object = serde_json::Map::new();
        for (name, values) in self.arrays.iter() {
            let array = JsonArray {
                element_type: values.element_type().to_string(),
                values,
            };
            object.insert(name.to_string(), serde_json::to_value(array)?);
        }

        let mut rendered = serde_json::to_string(&object)?;
        rendered.push('\n');
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn fill<S: ArraySink>(sink: &mut S) {
        sink.add_array("counts", ArrayValues::UnsignedInt(vec![1, 2]))
            .unwrap();
        sink.add_array("offset", ArrayValues::Int(vec![-40])).unwrap();
        sink.add_array("data", ArrayValues::Float(vec![1.0, -0.25]))
            .unwrap();
    }

    #[test]
    fn test_element_type_names() {
        assert_eq!(ElementType::UnsignedInt.to_string(), "unsigned int");
        assert_eq!(ElementType::Int.to_string(), "int");
        assert_eq!(ElementType::Float.to_string(), "float");
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::new();
        fill(&mut sink);
        let sink = sink.finish().unwrap();
        assert_eq!(sink.names().collect::<Vec<_>>(), vec!["counts", "offset", "data"]);
        assert_eq!(sink.get("offset"), Some(&ArrayValues::Int(vec![-40])));
        assert_eq!(sink.get("missing"), None);
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut sink = RustArrayWriter::new();
        sink.add_array("x", ArrayValues::Int(vec![1])).unwrap();
        assert!(matches!(
            sink.add_array("x", ArrayValues::Int(vec![2])),
            Err(SinkError::DuplicateArray(n)) if n == "x"
        ));
    }

    #[test]
    fn test_rust_output() {
        let mut sink = RustArrayWriter::new();
        fill(&mut sink);
        assert_eq!(
            sink.finish().unwrap(),
            "// Generated by hrtf_compiler. Do not edit.

pub static COUNTS: [u32; 2] = [
    1,
    2
];

pub static OFFSET: [i32; 1] = [
    -40
];

pub static DATA: [f32; 2] = [
    1.0,
    -0.25
];
"
        );
    }

    #[test]
    fn test_json_output() {
        let mut sink = JsonArrayWriter::new();
        fill(&mut sink);
        let parsed: serde_json::Value = serde_json::from_str(&sink.finish().unwrap()).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!({
                "counts": {"element_type": "unsigned int", "values": [1, 2]},
                "offset": {"element_type": "int", "values": [-40]},
                "data": {"element_type": "float", "values": [1.0, -0.25]},
            })
        );
    }
}
