use axum::response::Html;

use super::{Nav, layout};

pub fn login_page() -> Html<String> {
    let body = r#"
<div class="card" style="max-width:380px;margin:60px auto;">
  <h1>Sign in</h1>
  <form id="login-form">
    <input name="username" placeholder="Username" autocomplete="username" required>
    <input name="password" type="password" placeholder="Password" autocomplete="current-password" required>
    <button type="submit">Login</button>
  </form>
  <p id="login-error" class="absent"></p>
</div>
<script>
document.getElementById('login-form').addEventListener('submit', async (ev) => {
  ev.preventDefault();
  const form = new FormData(ev.target);
  const resp = await fetch('/login', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ username: form.get('username'), password: form.get('password') }),
  });
  const data = await resp.json();
  if (data.success) {
    window.location = data.redirect;
  } else {
    document.getElementById('login-error').textContent = data.message || 'Login failed';
  }
});
</script>
"#;
    layout("Login", Nav::Anonymous, body)
}
