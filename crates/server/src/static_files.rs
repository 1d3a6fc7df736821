//! Embedded browser UI
//!
//! A dependency-free single page app. Every page renders plain indicator
//! elements (`.success`, `.error`, `.status-authenticated`, ...) that the
//! browser-driven acceptance backend keys off.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// Static file handler
pub struct StaticFiles {}

impl StaticFiles {
    pub fn new() -> Self {
        Self {}
    }

    /// Serve an embedded file
    pub async fn serve(&self, path: &str) -> Response {
        let content_type = guess_content_type(path);

        match path {
            "index.html" => serve_embedded(INDEX_HTML, content_type),
            "app.js" => serve_embedded(APP_JS, content_type),
            "app.css" => serve_embedded(APP_CSS, content_type),
            _ => (StatusCode::NOT_FOUND, "File not found").into_response(),
        }
    }
}

impl Default for StaticFiles {
    fn default() -> Self {
        Self::new()
    }
}

fn guess_content_type(path: &str) -> &'static str {
    if path.ends_with(".js") {
        "application/javascript"
    } else if path.ends_with(".css") {
        "text/css"
    } else if path.ends_with(".html") {
        "text/html; charset=utf-8"
    } else {
        "application/octet-stream"
    }
}

fn serve_embedded(content: &'static str, content_type: &'static str) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        content,
    )
        .into_response()
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Screenplay</title>
  <link rel="stylesheet" href="/static/app.css">
</head>
<body>
  <div class="container">
    <nav class="nav">
      <a href="/ui/signup">Sign Up</a>
      <a href="/ui/login">Login</a>
      <a href="/ui/admin/clear">Clear Data</a>
    </nav>
    <main id="app"></main>
  </div>
  <script src="/static/app.js"></script>
</body>
</html>
"#;

const APP_CSS: &str = r#"
body { font-family: sans-serif; margin: 0; }
.container { max-width: 640px; margin: 2em auto; }
.nav a { margin-right: 1em; }
.success { color: #1a7f37; }
.error { color: #cf222e; }
.project-item { padding: 0.25em 0; }
"#;

const APP_JS: &str = r#"
const app = document.getElementById('app');

function esc(s) {
  return String(s).replace(/[&<>"']/g, c => ({
    '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;'
  }[c]));
}

function render(html) { app.innerHTML = html; }

function go(path) {
  history.pushState({}, '', path);
  route();
}

async function errorText(response) {
  try {
    const body = await response.json();
    return body.error || response.statusText;
  } catch (_) {
    return response.statusText;
  }
}

function nameForm(title, button, onSubmit) {
  render(`
    <h2>${esc(title)}</h2>
    <div id="outcome"></div>
    <form class="form">
      <input type="text" name="name" placeholder="Enter your name" required>
      <button type="submit">${esc(button)}</button>
    </form>`);
  app.querySelector('form').addEventListener('submit', async e => {
    e.preventDefault();
    const name = app.querySelector("input[name='name']").value;
    const outcome = document.getElementById('outcome');
    outcome.innerHTML = '';
    try {
      outcome.innerHTML = await onSubmit(name);
    } catch (err) {
      outcome.innerHTML = `<div class="error">Network error: ${esc(err.message)}</div>`;
    }
  });
}

function signUp() {
  nameForm('Sign Up', 'Create Account', async name => {
    const response = await fetch('/accounts', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ name })
    });
    if (response.ok) {
      return `<div class="success message">Account created for ${esc(name)}</div>`;
    }
    return `<div class="error">${esc(await errorText(response))}</div>`;
  });
}

function login() {
  nameForm('Login', 'Login', async name => {
    const response = await fetch(`/accounts/${encodeURIComponent(name)}/authenticate`, { method: 'POST' });
    if (response.ok) {
      return `<div class="success">Successfully authenticated ${esc(name)}!</div>`;
    }
    return `<div class="error">${esc(await errorText(response))}</div>`;
  });
}

async function account(name) {
  render('<div>Loading...</div>');
  const response = await fetch(`/accounts/${encodeURIComponent(name)}`);
  if (!response.ok) {
    render(`<div class="error">${esc(await errorText(response))}</div>`);
    return;
  }
  const a = await response.json();
  render(`
    <h2>Account: ${esc(a.name)}</h2>
    <div class="account-info">
      <p><strong>Status:</strong>
        ${a.activated ? '<span class="status-activated">Activated</span>' : '<span>Not Activated</span>'}</p>
      <p><strong>Authentication:</strong>
        ${a.authenticated ? '<span class="status-authenticated">Authenticated</span>' : '<span>Not Authenticated</span>'}</p>
    </div>
    <div>
      ${a.activated ? '' : `<a href="/ui/activate/${encodeURIComponent(name)}"><button class="activate">Activate Account</button></a>`}
      <a href="/ui/account/${encodeURIComponent(name)}/projects"><button>View Projects</button></a>
    </div>`);
}

function activate(name) {
  render(`
    <h2>Activate Account</h2>
    <p>Activate account for: <strong>${esc(name)}</strong></p>
    <div id="outcome"></div>
    <button class="activate">Activate Account</button>`);
  app.querySelector('button.activate').addEventListener('click', async () => {
    const outcome = document.getElementById('outcome');
    const response = await fetch(`/accounts/${encodeURIComponent(name)}/activate`, { method: 'POST' });
    outcome.innerHTML = response.ok
      ? `<div class="success">Account ${esc(name)} activated successfully!</div>`
      : `<div class="error">${esc(await errorText(response))}</div>`;
  });
}

async function projects(name) {
  render('<div>Loading...</div>');
  const response = await fetch(`/accounts/${encodeURIComponent(name)}/projects`);
  if (!response.ok) {
    render(`<div class="error">${esc(await errorText(response))}</div>`);
    return;
  }
  const list = await response.json();
  const items = list.map((_, i) => `<li class="project-item">Project ${i + 1}</li>`).join('');
  render(`
    <h2>Projects for ${esc(name)}</h2>
    <div id="outcome"></div>
    <ul class="projects-list">${items}</ul>
    <button class="create-project">Create Project</button>`);
  app.querySelector('button.create-project').addEventListener('click', async () => {
    const created = await fetch(`/accounts/${encodeURIComponent(name)}/projects`, { method: 'POST' });
    if (created.ok) {
      await projects(name);
      document.getElementById('outcome').innerHTML = '<div class="success project-created">Project created</div>';
    } else {
      document.getElementById('outcome').innerHTML = `<div class="error">${esc(await errorText(created))}</div>`;
    }
  });
}

async function clearAll() {
  render('<h2>Clear Data</h2><div id="outcome"></div>');
  const response = await fetch('/clear', { method: 'DELETE' });
  document.getElementById('outcome').innerHTML = response.ok
    ? '<div class="success">All data cleared</div>'
    : `<div class="error">${esc(await errorText(response))}</div>`;
}

function route() {
  const path = location.pathname.replace(/^\/ui/, '') || '/';
  let m;
  if (path === '/' || path === '/signup') return signUp();
  if (path === '/login') return login();
  if (path === '/admin/clear') return clearAll();
  if ((m = path.match(/^\/account\/([^/]+)\/projects$/))) return projects(decodeURIComponent(m[1]));
  if ((m = path.match(/^\/account\/([^/]+)$/))) return account(decodeURIComponent(m[1]));
  if ((m = path.match(/^\/activate\/([^/]+)$/))) return activate(decodeURIComponent(m[1]));
  render('<div class="error">Page not found</div>');
}

document.addEventListener('click', e => {
  const link = e.target.closest('a');
  if (link && link.getAttribute('href').startsWith('/ui')) {
    e.preventDefault();
    go(link.getAttribute('href'));
  }
});
window.addEventListener('popstate', route);
route();
"#;
