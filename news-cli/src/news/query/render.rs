//! SQL text for insert calls and the transaction script around them

use super::QuoteMode;
use super::request::InsertNewsCall;

/// Stored procedure that inserts one news item
pub const INSERT_PROCEDURE: &str = "fn_insert_news";

/// Turn a value into a single-quoted SQL literal under `mode`
///
/// `Strip` drops single quotes entirely, `Escape` doubles them.
pub fn literal(value: &str, mode: QuoteMode) -> String {
    match mode {
        QuoteMode::Strip => format!("'{}'", value.replace('\'', "")),
        QuoteMode::Escape => format!("'{}'", value.replace('\'', "''")),
    }
}

/// `ARRAY['a', 'b']` for a list of strings
pub fn array_literal<S: AsRef<str>>(items: &[S], mode: QuoteMode) -> String {
    let quoted: Vec<String> = items
        .iter()
        .map(|item| match mode {
            QuoteMode::Strip => literal(item.as_ref().replace('\'', "").trim(), mode),
            QuoteMode::Escape => literal(item.as_ref(), mode),
        })
        .collect();
    format!("ARRAY[{}]", quoted.join(", "))
}

/// Render one `SELECT * FROM fn_insert_news(...);` statement
///
/// Argument order: title, image, region, key points, content, tags,
/// thumbnail, links, status, published at.
pub fn render_call(call: &InsertNewsCall, mode: QuoteMode) -> String {
    // Links have always been embedded untouched when stripping
    let links = match mode {
        QuoteMode::Strip => format!("'{}'", call.links),
        QuoteMode::Escape => literal(&call.links, mode),
    };

    let args = [
        literal(&call.title, mode),
        "NULL".to_string(),
        array_literal(&call.region, mode),
        literal(&call.key_points, mode),
        "'null'".to_string(),
        array_literal(&call.tags, mode),
        "NULL".to_string(),
        links,
        literal(&call.status, mode),
        format!("'{}'", call.published_at_iso()),
    ];

    format!(
        "SELECT * FROM {}(\n  {}\n);",
        INSERT_PROCEDURE,
        args.join(",\n  ")
    )
}

/// Wrap rendered calls in a single transaction
pub fn render_script(calls: &[InsertNewsCall], mode: QuoteMode) -> String {
    let mut script = String::from("-- Start Transaction\nBEGIN;\n\n");
    for call in calls {
        script.push_str(&render_call(call, mode));
        script.push('\n');
    }
    script.push_str("\nCOMMIT;\n-- END Transaction\n");
    script
}
