//! HTTP façade over the organize, dry-run, and undo operations.
//!
//! A synchronous `tiny_http` loop serving four stateless endpoints. Every
//! request reloads the configuration and re-resolves the desktop path; the
//! server keeps no state between requests and owns no logic of its own.
//!
//! - `GET /` — status page with the loaded configuration
//! - `GET /dry-run` — planned actions as JSON, no filesystem mutation
//! - `POST /run` — execute the moves; optional `{"backup": true}` body
//! - `POST /undo` — flatten category folders back to the desktop root

use crate::config::Config;
use crate::desktop::DesktopLocator;
use crate::organizer::{perform_organize, plan_organize};
use crate::output::OutputFormatter;
use crate::undo::undo;
use serde::Deserialize;
use serde_json::json;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use tiny_http::{Header, Method, Response, Server, StatusCode};

/// Listener address and configuration location for the HTTP façade.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Interface to bind, e.g. `0.0.0.0`.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Path to the TOML configuration file, loaded fresh per request.
    pub config_path: PathBuf,
}

/// Body accepted by `POST /run`. A missing or malformed body is treated as
/// `backup = false`.
#[derive(Debug, Default, Deserialize)]
struct RunRequest {
    #[serde(default)]
    backup: bool,
}

/// Parses the optional `POST /run` body, tolerating garbage.
fn parse_backup_flag(body: &str) -> bool {
    serde_json::from_str::<RunRequest>(body)
        .map(|req| req.backup)
        .unwrap_or(false)
}

fn respond_json(status: StatusCode, body: &str) -> Response<Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(status)
        .with_header(Header::from_bytes("Content-Type", "application/json").unwrap())
}

fn respond_html(body: &str) -> Response<Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_header(Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap())
}

fn error_body(message: &str) -> String {
    json!({ "error": message }).to_string()
}

/// Resolves the desktop path from the environment, existence-checked.
fn resolve_desktop() -> Result<PathBuf, String> {
    let locator = DesktopLocator::from_env().map_err(|e| e.to_string())?;
    locator.locate().map_err(|e| e.to_string())
}

fn handle_status(config_path: &Path) -> Result<String, String> {
    let config = Config::load(config_path).map_err(|e| e.to_string())?;
    Ok(render_status_page(&config))
}

fn handle_dry_run(config_path: &Path) -> Result<String, String> {
    let rules = Config::load(config_path)
        .map_err(|e| e.to_string())?
        .compile();
    let desktop = resolve_desktop()?;
    let actions = plan_organize(&desktop, &rules).map_err(|e| e.to_string())?;
    Ok(json!({ "count": actions.len(), "actions": actions }).to_string())
}

fn handle_run(config_path: &Path, backup: bool, out: &OutputFormatter) -> Result<String, String> {
    let rules = Config::load(config_path)
        .map_err(|e| e.to_string())?
        .compile();
    let desktop = resolve_desktop()?;
    let actions = perform_organize(&desktop, &rules, backup, out).map_err(|e| e.to_string())?;
    Ok(json!({ "moved_count": actions.len(), "actions": actions }).to_string())
}

fn handle_undo(out: &OutputFormatter) -> Result<String, String> {
    let desktop = resolve_desktop()?;
    undo(&desktop, out).map_err(|e| e.to_string())?;
    Ok(json!({ "status": "ok" }).to_string())
}

/// Runs the request loop until the process exits.
///
/// Requests are served one at a time on the calling thread; concurrent
/// clients are not coordinated beyond socket-level queueing.
pub fn serve(options: &ServerOptions, out: &OutputFormatter) -> io::Result<()> {
    let server =
        Server::http((options.host.as_str(), options.port)).map_err(io::Error::other)?;
    out.info(&format!(
        "desktidy listening on http://{}:{}",
        options.host, options.port
    ));

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let mut body = String::new();
        let _ = request.as_reader().read_to_string(&mut body);

        let response = match (&method, url.as_str()) {
            (Method::Get, "/") => match handle_status(&options.config_path) {
                Ok(html) => respond_html(&html),
                Err(msg) => {
                    out.error(&msg);
                    respond_json(StatusCode(500), &error_body(&msg))
                }
            },
            (Method::Get, "/dry-run") => match handle_dry_run(&options.config_path) {
                Ok(payload) => respond_json(StatusCode(200), &payload),
                Err(msg) => {
                    out.error(&msg);
                    respond_json(StatusCode(500), &error_body(&msg))
                }
            },
            (Method::Post, "/run") => {
                let backup = parse_backup_flag(&body);
                match handle_run(&options.config_path, backup, out) {
                    Ok(payload) => respond_json(StatusCode(200), &payload),
                    Err(msg) => {
                        out.error(&msg);
                        respond_json(StatusCode(500), &error_body(&msg))
                    }
                }
            }
            (Method::Post, "/undo") => match handle_undo(out) {
                Ok(payload) => respond_json(StatusCode(200), &payload),
                Err(msg) => {
                    out.error(&msg);
                    respond_json(StatusCode(500), &error_body(&msg))
                }
            },
            _ => respond_json(StatusCode(404), &error_body("Not Found")),
        };

        let _ = request.respond(response);
    }

    Ok(())
}

/// Renders the status page from the loaded configuration.
fn render_status_page(config: &Config) -> String {
    let mut categories = String::new();
    for rule in &config.categories {
        categories.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            escape(&rule.name),
            escape(&rule.extensions.join(", "))
        ));
    }
    if categories.is_empty() {
        categories.push_str("<tr><td colspan=\"2\"><em>none configured</em></td></tr>\n");
    }

    let exclude = if config.exclude.is_empty() {
        "<em>none</em>".to_string()
    } else {
        escape(&config.exclude.join(", "))
    };

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>desktidy</title>
  <style>
    body{{font-family:system-ui,sans-serif;max-width:720px;margin:2rem auto;padding:0 1rem;color:#1f2937}}
    table{{border-collapse:collapse;width:100%;margin:1rem 0}}
    th,td{{border:1px solid #d1d5db;padding:6px 10px;text-align:left}}
    th{{background:#f3f4f6}}
    button{{padding:8px 14px;margin-right:8px;border:1px solid #d1d5db;border-radius:6px;background:#f9fafb;cursor:pointer}}
    button:hover{{background:#eef2ff}}
    pre{{background:#f3f4f6;padding:10px;border-radius:6px;overflow:auto;min-height:3rem}}
  </style>
</head>
<body>
  <h1>desktidy</h1>
  <p>Organizes your Desktop into category folders.</p>
  <table>
    <tr><th>Category</th><th>Extensions</th></tr>
    {categories}
  </table>
  <p><strong>Excluded names:</strong> {exclude}</p>
  <p><strong>Move hidden files:</strong> {move_hidden}</p>
  <p>
    <button onclick="call('GET','/dry-run')">Dry run</button>
    <button onclick="call('POST','/run')">Run</button>
    <button onclick="call('POST','/run',{{backup:true}})">Run with backup</button>
    <button onclick="call('POST','/undo')">Undo</button>
  </p>
  <pre id="result">Results appear here.</pre>
  <script>
    async function call(method, path, body) {{
      const opts = {{ method }};
      if (body) {{
        opts.headers = {{ 'Content-Type': 'application/json' }};
        opts.body = JSON.stringify(body);
      }}
      const res = await fetch(path, opts);
      const text = await res.text();
      try {{
        document.getElementById('result').textContent = JSON.stringify(JSON.parse(text), null, 2);
      }} catch {{
        document.getElementById('result').textContent = text;
      }}
    }}
  </script>
</body>
</html>
"#,
        categories = categories,
        exclude = exclude,
        move_hidden = config.move_hidden,
    )
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
