//! HTML served to browsers.

use tinylink_core::SlimRecord;

pub const HOME_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Shorten URL</title>
</head>
<body>
  <h1>Shorten Your URL</h1>
  <form action="/shorten" method="post">
    <label for="url">URL:</label>
    <input type="url" id="url" name="url" placeholder="Enter your URL" required>
    <br><br>
    <label for="shortcode">Shortcode (optional):</label>
    <input type="text" id="shortcode" name="shortcode" placeholder="Enter a shortcode"
           pattern="[A-Za-z0-9]{1,6}" maxlength="6">
    <br><br>
    <button type="submit">Shorten</button>
  </form>
</body>
</html>
"#;

pub fn record_page(record: &SlimRecord) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>URL Record</title>
</head>
<body>
  <h1>URL Record</h1>
  <p><strong>ID:</strong> {id}</p>
  <p><strong>URL:</strong> <a href="{url}">{url}</a></p>
  <p><strong>Shortcode:</strong> <a href="/{shortcode}">{shortcode}</a></p>
  <p><strong>Created At:</strong> {created_at}</p>
  <p><strong>Updated At:</strong> {updated_at}</p>
</body>
</html>
"#,
        id = record.id,
        url = escape_html(record.url.as_str()),
        shortcode = escape_html(record.shortcode.as_str()),
        created_at = record.created_at,
        updated_at = record.updated_at,
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
