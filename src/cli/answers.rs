use crate::{
    constants::STDIN_INDICATOR,
    error::{Error, Result},
};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::path::Path;

/// Answers collected by a flow, in step order.
pub type AnswerMap = IndexMap<String, Value>;

/// Read content from a reader into a string.
fn read_from(mut reader: impl std::io::Read) -> Result<String> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    Ok(buf)
}

/// Resolve the `--answers` argument to preset answers.
pub fn preset_answers(answers_arg: Option<String>) -> Result<Map<String, Value>> {
    match answers_arg {
        None => Ok(Map::new()),
        Some(arg) if arg == STDIN_INDICATOR => parse_string_to_json(read_from(std::io::stdin())?),
        Some(arg) => parse_string_to_json(arg),
    }
}

/// Parse a string into a JSON object.
fn parse_string_to_json(buf: String) -> Result<Map<String, Value>> {
    let as_object = |value: Value| match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::ValidationError(format!(
            "preset answers must be a JSON object, got {other}"
        ))),
    };
    match serde_json::from_str::<Value>(&buf) {
        Ok(value) => as_object(value),
        Err(initial_err) => {
            // Over-escaped shell invocations pass \" instead of ".
            if buf.contains("\\\"") {
                let cleaned = buf.replace("\\\"", "\"");
                match serde_json::from_str::<Value>(&cleaned) {
                    Ok(value) => as_object(value),
                    Err(_) => Err(Error::JsonError(initial_err)),
                }
            } else {
                Err(Error::JsonError(initial_err))
            }
        }
    }
}

/// Print the answers as pretty JSON, or write them to `output`.
pub fn write_answers(answers: &AnswerMap, output: Option<&Path>) -> Result<()> {
    let rendered = serde_json::to_string_pretty(answers)?;
    match output {
        Some(path) => {
            std::fs::write(path, format!("{rendered}\n"))?;
            log::info!("Answers written to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
