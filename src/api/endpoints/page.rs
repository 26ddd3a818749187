//! Upload page (self-contained, no external resources).

use axum::response::Html;

/// `GET /`: file + prompt form, results rendered in-page.
pub async fn index() -> Html<&'static str> {
    Html(UPLOAD_PAGE_HTML)
}

const UPLOAD_PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>DocSift: Analyze a Document</title>
  <style>
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', system-ui, sans-serif;
      background: #fafaf9; color: #1c1917;
      min-height: 100vh; display: flex; flex-direction: column;
      align-items: center; padding: 48px 24px;
    }
    h1 { font-size: 24px; margin-bottom: 8px; }
    p.hint { color: #78716c; font-size: 14px; margin-bottom: 24px; text-align: center; }
    form { display: flex; flex-direction: column; gap: 12px; width: 100%; max-width: 560px; }
    input[type=file], textarea {
      width: 100%; padding: 12px; font-size: 15px;
      border: 2px solid #d6d3d1; border-radius: 12px; outline: none; background: #fff;
    }
    textarea { min-height: 96px; resize: vertical; font-family: inherit; }
    textarea:focus { border-color: #4a7c59; }
    button {
      height: 48px; border: none; border-radius: 12px; font-size: 16px; font-weight: 600;
      background: #4a7c59; color: #fff; cursor: pointer;
    }
    button:disabled { opacity: 0.5; cursor: default; }
    .error { color: #b91c1c; font-size: 14px; min-height: 20px; }
    .result {
      display: none; width: 100%; max-width: 560px; margin-top: 24px;
      background: #fff; border: 1px solid #e7e5e4; border-radius: 12px; padding: 16px;
    }
    .result h2 { font-size: 16px; margin-bottom: 4px; }
    .result .meta { color: #78716c; font-size: 13px; margin-bottom: 12px; }
    .result pre { white-space: pre-wrap; font-family: inherit; font-size: 14px; line-height: 1.5; }
  </style>
</head>
<body>
  <h1>Analyze a document</h1>
  <p class="hint">Allowed types: txt, pdf, docx, xlsx, csv (16 MB max). Everything stays on this machine.</p>

  <form id="upload-form">
    <input type="file" id="file" name="file" accept=".txt,.pdf,.docx,.xlsx,.csv">
    <textarea id="prompt" name="prompt" placeholder="What should the analysis focus on?"></textarea>
    <div class="error" id="error"></div>
    <button type="submit" id="submit">Analyze</button>
  </form>

  <div class="result" id="result">
    <h2 id="result-file"></h2>
    <div class="meta" id="result-meta"></div>
    <pre id="result-text"></pre>
  </div>

  <script>
    const form = document.getElementById('upload-form');
    const errorBox = document.getElementById('error');
    const submit = document.getElementById('submit');
    const result = document.getElementById('result');

    form.addEventListener('submit', async (event) => {
      event.preventDefault();
      errorBox.textContent = '';
      result.style.display = 'none';
      submit.disabled = true;
      submit.textContent = 'Analyzing…';

      try {
        const response = await fetch('/upload', { method: 'POST', body: new FormData(form) });
        const data = await response.json().catch(() => null);
        if (!response.ok) {
          errorBox.textContent = (data && data.error && data.error.message)
            || `Upload failed (${response.status})`;
          return;
        }
        document.getElementById('result-file').textContent = data.filename;
        document.getElementById('result-meta').textContent =
          `Prompt: ${data.prompt} · Model: ${data.model.name}`;
        document.getElementById('result-text').textContent = data.analysis;
        result.style.display = 'block';
      } catch (err) {
        errorBox.textContent = 'Could not reach the server.';
      } finally {
        submit.disabled = false;
        submit.textContent = 'Analyze';
      }
    });
  </script>
</body>
</html>
"#;
