use serde_json::Value;

/// Outcome of resolving a free-text query against a record list.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Selected(Value),
    Ambiguous(Vec<Value>),
    None,
}

#[derive(Debug, Clone, Copy)]
pub struct PickOptions<'a> {
    pub name_key: &'a str,
    pub id_key: &'a str,
    pub allow_empty_query: bool,
}

impl Default for PickOptions<'static> {
    fn default() -> Self {
        PickOptions {
            name_key: "displayName",
            id_key: "id",
            allow_empty_query: false,
        }
    }
}

/// Four-tier resolution: case-insensitive exact name, case-insensitive
/// substring name, exact id (case-sensitive), then nothing. A single hit
/// within a tier selects; several exact or several substring hits report
/// the competing records as ambiguous. Records without a string name field
/// participate with an empty name.
pub fn pick_by_name_or_id(
    items: &[Value],
    query: Option<&str>,
    options: PickOptions<'_>,
) -> Selection {
    if items.is_empty() {
        return Selection::None;
    }
    let query = match query {
        Some(q) if !q.is_empty() => q,
        _ => {
            return if options.allow_empty_query {
                Selection::Selected(items[0].clone())
            } else {
                Selection::None
            };
        }
    };
    let normalized = query.to_lowercase();
    let name_of = |item: &Value| {
        item.get(options.name_key)
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_lowercase()
    };

    let exact: Vec<&Value> = items
        .iter()
        .filter(|item| name_of(item) == normalized)
        .collect();
    if exact.len() == 1 {
        return Selection::Selected(exact[0].clone());
    }
    if exact.len() > 1 {
        return Selection::Ambiguous(exact.into_iter().cloned().collect());
    }

    let partial: Vec<&Value> = items
        .iter()
        .filter(|item| name_of(item).contains(&normalized))
        .collect();
    if partial.len() == 1 {
        return Selection::Selected(partial[0].clone());
    }
    if partial.len() > 1 {
        return Selection::Ambiguous(partial.into_iter().cloned().collect());
    }

    if let Some(by_id) = items
        .iter()
        .find(|item| item.get(options.id_key).and_then(Value::as_str) == Some(query))
    {
        return Selection::Selected(by_id.clone());
    }

    Selection::None
}
