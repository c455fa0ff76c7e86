use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn to_payload<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    serde_json::to_value(value).context("failed converting report to JSON")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::grades::Grade;

    #[test]
    fn grades_render_as_symbols() {
        let payload = to_payload(&json!({"mean": Grade::BPlus})).expect("payload");
        assert_eq!(payload["mean"], "B+");
        assert!(render_json(&payload).expect("json").contains("\"B+\""));
    }
}
