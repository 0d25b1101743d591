use serde::Serialize;
use serde_json::Value;

use ideate_core::DomainSchema;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => Ok(render_value_table(&serde_json::to_value(value)?)),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Render a list response. Tables show `id` plus the schema's list columns,
/// or every visible field when none is marked for lists.
pub fn render_list(
    schema: &DomainSchema,
    list: &Value,
    format: OutputFormat,
) -> anyhow::Result<String> {
    if format != OutputFormat::Table {
        return render(list, format);
    }

    let items = list
        .get("items")
        .and_then(Value::as_array)
        .map_or(&[][..], Vec::as_slice);
    if items.is_empty() {
        return Ok(format!("(no {})", schema.label_plural.to_lowercase()));
    }

    let mut headers = vec!["id"];
    headers.extend(schema.list_fields().map(|field| field.key.as_str()));
    if headers.len() == 1 {
        headers.extend(
            schema
                .fields
                .iter()
                .filter(|field| !field.hidden)
                .map(|field| field.key.as_str()),
        );
    }
    headers.push("archived");

    let rows = items
        .iter()
        .map(|item| {
            headers
                .iter()
                .map(|key| item.get(*key).map_or_else(|| "-".to_string(), value_to_cell))
                .collect()
        })
        .collect::<Vec<Vec<String>>>();

    Ok(table::render_table(&headers, &rows, table_options()))
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_value_table(value: &Value) -> String {
    match value {
        Value::Array(items) => render_array_table(items),
        Value::Object(map) => {
            let rows = map
                .iter()
                .map(|(key, value)| vec![key.clone(), value_to_cell(value)])
                .collect::<Vec<_>>();
            table::render_table(&["key", "value"], &rows, table_options())
        }
        scalar => table::render_table(&["value"], &[vec![value_to_cell(scalar)]], table_options()),
    }
}

fn render_array_table(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    if !items.iter().all(Value::is_object) {
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return table::render_table(&["value"], &rows, table_options());
    }

    let mut headers = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = items
        .iter()
        .map(|item| {
            headers
                .iter()
                .map(|key| item.get(key).map_or_else(|| "-".to_string(), value_to_cell))
                .collect()
        })
        .collect::<Vec<Vec<String>>>();
    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    table::render_table(&header_refs, &rows, table_options())
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(text) => text.replace('\n', " "),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(_) | Value::Object(_) => {
            serde_json::to_string(value).unwrap_or_else(|_| "<invalid-json>".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn products() -> DomainSchema {
        ideate_schema::load(&json!({
            "domain": "products",
            "label": "Product",
            "labelPlural": "Products",
            "fields": [
                {"key": "name", "label": "Name", "type": "string", "required": true, "showInList": true},
                {"key": "notes", "label": "Notes", "type": "text"},
                {"key": "price", "label": "Price", "type": "number", "showInList": true}
            ]
        }))
        .expect("descriptor should load")
    }

    #[test]
    fn list_table_uses_list_columns() {
        let list = json!({
            "items": [
                {"id": "products-1", "archived": false, "name": "Mouse", "notes": "wireless", "price": 25}
            ],
            "count": 1
        });
        let rendered = render_list(&products(), &list, OutputFormat::Table).unwrap();
        let header = rendered.lines().next().unwrap();
        assert!(header.contains("name"));
        assert!(header.contains("price"));
        assert!(!header.contains("notes"));
        assert!(rendered.contains("Mouse"));
    }

    #[test]
    fn empty_list_table_names_the_domain() {
        let list = json!({"items": [], "count": 0});
        let rendered = render_list(&products(), &list, OutputFormat::Table).unwrap();
        assert_eq!(rendered, "(no products)");
    }

    #[test]
    fn list_json_is_passed_through() {
        let list = json!({"items": [], "count": 0});
        let rendered = render_list(&products(), &list, OutputFormat::Raw).unwrap();
        assert_eq!(rendered, r#"{"items":[],"count":0}"#);
    }

    #[test]
    fn object_renders_as_key_value_table() {
        let rendered = render(&json!({"success": true, "message": "ok"}), OutputFormat::Table)
            .unwrap();
        assert!(rendered.starts_with("key"));
        assert!(rendered.contains("message"));
    }

    #[test]
    fn cells_flatten_nested_values() {
        assert_eq!(value_to_cell(&json!(null)), "-");
        assert_eq!(value_to_cell(&json!("a\nb")), "a b");
        assert_eq!(value_to_cell(&json!([1, 2])), "[1,2]");
    }
}
