//! Server-rendered pages. Each builder returns a complete HTML document.

pub mod auth;
pub mod instructor;
pub mod student;

use axum::response::Html;

const STYLE: &str = r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; background: #f4f6fb; color: #1f2937; line-height: 1.5; }
header { background: #1e3a8a; color: #fff; padding: 14px 24px; display: flex; justify-content: space-between; align-items: center; }
header a { color: #dbeafe; margin-left: 16px; text-decoration: none; }
main { max-width: 1100px; margin: 24px auto; padding: 0 20px; }
h1 { font-size: 24px; margin-bottom: 12px; }
h2 { font-size: 18px; margin: 20px 0 10px; }
table { width: 100%; border-collapse: collapse; background: #fff; }
th, td { padding: 8px 10px; border-bottom: 1px solid #e5e7eb; text-align: left; }
.cards { display: flex; gap: 16px; flex-wrap: wrap; }
.card { background: #fff; border-radius: 8px; padding: 16px; min-width: 200px; box-shadow: 0 1px 3px rgba(0,0,0,.08); }
.stat { font-size: 28px; font-weight: 600; color: #1e3a8a; }
.present { color: #047857; font-weight: 600; }
.absent { color: #b91c1c; }
button, .button { background: #2563eb; color: #fff; border: 0; border-radius: 4px; padding: 6px 12px; cursor: pointer; text-decoration: none; display: inline-block; }
input { padding: 8px; border: 1px solid #cbd5e1; border-radius: 4px; width: 100%; margin-bottom: 10px; }
.muted { color: #6b7280; }
"#;

/// Escape text for interpolation into HTML element content or attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escaped optional text, `-` when absent.
pub fn opt(raw: Option<&str>) -> String {
    raw.map(escape).unwrap_or_else(|| "-".to_string())
}

pub fn confidence_cell(confidence: Option<f64>) -> String {
    confidence
        .map(|c| format!("{c:.1}%"))
        .unwrap_or_else(|| "-".to_string())
}

pub enum Nav<'a> {
    Anonymous,
    Instructor(&'a str),
    Student(&'a str),
}

fn nav_links(nav: &Nav<'_>) -> String {
    match nav {
        Nav::Anonymous => String::new(),
        Nav::Instructor(name) => format!(
            r#"<nav><span>{}</span>
<a href="/instructor/dashboard">Dashboard</a>
<a href="/instructor/courses">Courses</a>
<a href="/instructor/students">Students</a>
<a href="/instructor/reports">Reports</a>
<a href="/logout">Logout</a></nav>"#,
            escape(name)
        ),
        Nav::Student(name) => format!(
            r#"<nav><span>{}</span>
<a href="/student/dashboard">My courses</a>
<a href="/logout">Logout</a></nav>"#,
            escape(name)
        ),
    }
}

pub fn layout(title: &str, nav: Nav<'_>, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title} - Roll Call</title>
<style>{STYLE}</style>
</head>
<body>
<header><strong>Roll Call</strong>{nav}</header>
<main>
{body}
</main>
</body>
</html>"#,
        title = escape(title),
        nav = nav_links(&nav),
    ))
}
