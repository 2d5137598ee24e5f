//! JSON canónico: claves de objeto ordenadas y sin espacios, de modo que dos
//! valores iguales siempre producen el mismo texto (y el mismo hash).

use serde_json::Value;
use std::collections::BTreeMap;

pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, String> =
                map.iter().map(|(k, v)| (k, to_canonical_json(v))).collect();
            let items: Vec<String> = sorted.into_iter()
                                           .map(|(k, v)| format!("{}:{}", Value::String(k.clone()), v))
                                           .collect();
            format!("{{{}}}", items.join(","))
        }
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(to_canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        // Display de serde_json ya es compacto y escapa strings.
        scalar => scalar.to_string(),
    }
}
