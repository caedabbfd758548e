use s1s2_core::TablePage;
use serde::Serialize;

use super::{controls, escape, svg, table};
use crate::session::{Session, UploadOutcome};

pub const PAGE_TITLE: &str = "S1S2 Matrix";

/// A message shown above the data grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Warning,
    Error,
}

impl Notice {
    /// Notice for an upload, if the user needs to be told anything.
    pub fn for_upload(outcome: &UploadOutcome) -> Option<Self> {
        match outcome {
            UploadOutcome::Rejected { message } => Some(Self {
                level: NoticeLevel::Error,
                message: (*message).to_string(),
            }),
            UploadOutcome::Loaded {
                rows,
                unknown_labels,
            } if !unknown_labels.is_empty() => {
                let listed = unknown_labels
                    .iter()
                    .map(|unknown| {
                        format!(
                            "{} ({} = '{}')",
                            unknown.risk_name, unknown.column, unknown.label
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                Some(Self {
                    level: NoticeLevel::Warning,
                    message: format!(
                        "Loaded {rows} risks. Unrecognized impact labels were scored as low: {listed}"
                    ),
                })
            }
            UploadOutcome::Loaded { .. } => None,
        }
    }
}

/// Render the full dashboard page for a session.
pub fn render(session: &Session, debug: bool) -> String {
    let table_html = table::render(&TablePage::paginate(session.dataset().rows(), 0));
    let controls_html = controls::render(session.dataset(), session.controls());
    let chart_svg = svg::render(session.figure());
    let debug_panel = if debug {
        let figure_json = match serde_json::to_string_pretty(session.figure()) {
            Ok(json) => json,
            Err(error) => {
                tracing::warn!(%error, "failed to serialize figure for the debug panel");
                String::new()
            }
        };
        format!(
            r#"<details open class="debug"><summary>Figure JSON</summary><pre id="figure-json">{}</pre></details>"#,
            escape(&figure_json)
        )
    } else {
        String::new()
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body data-debug="{debug}">
    <h1>{title}</h1>
    <div id="upload" class="dropzone" tabindex="0">Drag and drop or <a href="#" id="choose">select a file</a> (.csv, .xls, .xlsx)
        <input type="file" id="file" accept=".csv,.xls,.xlsx,.xlsm,.xlsb" hidden>
    </div>
    <div id="notice"></div>
    <div id="table">{table_html}</div>
    <div id="chart">{chart_svg}</div>
    {debug_panel}
    <div id="controls">{controls_html}</div>
    <script>{js}</script>
</body>
</html>"##,
        title = PAGE_TITLE,
        css = INLINE_CSS,
        js = INLINE_JS,
    )
}

const INLINE_CSS: &str = r"
body { font-family: system-ui, sans-serif; margin: 24px; color: #222; }
.dropzone { width: 100%; height: 60px; line-height: 60px; border: 1px dashed #888;
  border-radius: 5px; text-align: center; margin: 10px 0; box-sizing: border-box; }
.dropzone.over { background: #fffbe6; }
.grid { border-collapse: collapse; margin: 10px 0; }
.grid th, .grid td { border: 1px solid #ddd; padding: 4px 10px; text-align: left; }
.pager { display: flex; gap: 10px; align-items: center; }
.notice { padding: 8px 12px; margin: 8px 0; border-radius: 4px; }
.notice.error { background: #fdecea; color: #8a1c1c; }
.notice.warning { background: #fff4e5; color: #7a4b00; }
.control-row { display: flex; flex-wrap: wrap; gap: 8px; align-items: center; margin: 4px 0; }
.control-row label { min-width: 220px; }
";

const INLINE_JS: &str = r"
(function () {
  const debug = document.body.dataset.debug === 'true';

  function showNotice(notice) {
    const box = document.getElementById('notice');
    box.innerHTML = '';
    if (!notice) return;
    const div = document.createElement('div');
    div.className = 'notice ' + notice.level;
    div.textContent = notice.message;
    box.appendChild(div);
  }

  function showFigure(update) {
    document.getElementById('chart').innerHTML = update.chart_svg;
    const pre = document.getElementById('figure-json');
    if (debug && pre && update.figure) pre.textContent = JSON.stringify(update.figure, null, 2);
  }

  // 409: the server no longer holds this page's session.
  function expired(res) {
    if (res.status !== 409) return false;
    window.location.reload();
    return true;
  }

  async function upload(file) {
    const buffer = await file.arrayBuffer();
    const res = await fetch('/upload?filename=' + encodeURIComponent(file.name), {
      method: 'POST', body: buffer, credentials: 'same-origin'
    });
    if (expired(res)) return;
    if (!res.ok) { showNotice({ level: 'error', message: await res.text() }); return; }
    const update = await res.json();
    showNotice(update.notice);
    document.getElementById('table').innerHTML = update.table_html;
    document.getElementById('controls').innerHTML = update.controls_html;
    showFigure(update);
  }

  async function pushControls() {
    const batch = Array.from(document.querySelectorAll('#controls select')).map(function (el) {
      return { kind: el.dataset.kind, row: Number(el.dataset.row), score: Number(el.value) };
    });
    const res = await fetch('/controls', {
      method: 'POST', headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify(batch), credentials: 'same-origin'
    });
    if (expired(res)) return;
    if (!res.ok) { showNotice({ level: 'error', message: await res.text() }); return; }
    showFigure(await res.json());
  }

  async function showPage(page) {
    const res = await fetch('/table?page=' + page, { credentials: 'same-origin' });
    if (expired(res)) return;
    if (res.ok) document.getElementById('table').innerHTML = await res.text();
  }

  const zone = document.getElementById('upload');
  const input = document.getElementById('file');
  document.getElementById('choose').addEventListener('click', function (e) { e.preventDefault(); input.click(); });
  input.addEventListener('change', function () { if (input.files.length) upload(input.files[0]); input.value = ''; });
  zone.addEventListener('dragover', function (e) { e.preventDefault(); zone.classList.add('over'); });
  zone.addEventListener('dragleave', function () { zone.classList.remove('over'); });
  zone.addEventListener('drop', function (e) {
    e.preventDefault(); zone.classList.remove('over');
    if (e.dataTransfer.files.length) upload(e.dataTransfer.files[0]);
  });
  document.getElementById('controls').addEventListener('change', function (e) {
    if (e.target.tagName === 'SELECT') pushControls();
  });
  document.getElementById('table').addEventListener('click', function (e) {
    const button = e.target.closest('button[data-page]');
    if (button && !button.disabled) showPage(button.dataset.page);
  });
})();
";
