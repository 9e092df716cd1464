//! Server-side HTML rendering of the dashboard page.

use crate::render::{Board, Slot, SlotValue};
use std::fmt::Write;

/// Render the full dashboard page for `board`.
///
/// The page is complete on its own; the embedded script then keeps it live
/// from `/ws`, replacing slot contents by element id.
pub fn render_page(title: &str, board: &Board, endpoint: &str, with_assets: bool) -> String {
    let mut slots = String::new();
    for slot in Slot::ALL {
        let id = slot.name();
        match (slot, board.get(slot)) {
            (Slot::DistributionImage | Slot::CpuImage, value) => {
                let asset = match value {
                    Some(SlotValue::Icon(icon)) => icon.asset(),
                    _ => "",
                };
                let _ = writeln!(
                    slots,
                    r#"      <img class="icon" id="slot-{id}" data-asset="{asset}" src="{src}" alt="{alt}">"#,
                    src = asset_src(asset, with_assets),
                    alt = escape(asset.trim_end_matches(".svg")),
                );
            }
            (_, Some(SlotValue::Text(text))) => {
                let _ = writeln!(slots, r#"      <p id="slot-{id}">{}</p>"#, escape(text));
            }
            (_, _) => {
                let _ = writeln!(slots, r#"      <p id="slot-{id}"></p>"#);
            }
        }
    }

    let updated = board
        .updated_at()
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "waiting for data".to_string());

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #1e1f26; color: #e8e8e8; padding: 20px; }}
        .card {{ max-width: 520px; margin: 0 auto; background: #2a2c36; border-radius: 12px; padding: 24px; }}
        .icon {{ width: 64px; height: 64px; }}
        .muted {{ color: #8a8d99; font-size: 0.9rem; }}
    </style>
</head>
<body>
    <div class="card">
      <h1>{title}</h1>
      <p class="muted">Source: {endpoint}</p>
{slots}      <p class="muted" id="updated">Updated: {updated}</p>
    </div>
    <script>
        const withAssets = {with_assets};
        function apply(board) {{
            for (const [slot, content] of Object.entries(board.slots)) {{
                const el = document.getElementById('slot-' + slot);
                if (!el) continue;
                if (content.kind === 'icon') {{
                    const asset = ASSETS[content.value.family][content.value.category];
                    el.dataset.asset = asset;
                    el.alt = asset.replace('.svg', '');
                    if (withAssets) el.src = '/static/img/' + asset;
                }} else {{
                    el.textContent = content.value;
                }}
            }}
            if (board.updated_at) document.getElementById('updated').textContent = 'Updated: ' + board.updated_at;
        }}
        const ASSETS = {{
            distribution: {{ ubuntu: 'ubuntu.svg', debian: 'debian.svg', raspbian: 'raspberry.svg', default: 'linux.svg' }},
            cpu: {{ amd: 'amd.svg', intel: 'intel.svg', broadcom: 'broadcom.svg', default: 'cpu.svg' }}
        }};
        function connect() {{
            const protocol = window.location.protocol === 'https:' ? 'wss:' : 'ws:';
            const ws = new WebSocket(`${{protocol}}//${{window.location.host}}/ws`);
            ws.onmessage = (event) => apply(JSON.parse(event.data));
            ws.onclose = () => setTimeout(connect, 5000);
        }}
        connect();
    </script>
</body>
</html>
"#,
        title = escape(title),
        endpoint = escape(endpoint),
    )
}

fn asset_src(asset: &str, with_assets: bool) -> String {
    if with_assets && !asset.is_empty() {
        format!("/static/img/{}", asset)
    } else {
        String::new()
    }
}

/// Minimal HTML escaping for text and attribute content.
pub fn escape(raw: &str) -> String {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::{DistributionIcon, Icon};
    use crate::render::SlotUpdate;
    use chrono::DateTime;

    #[test]
    fn test_page_contains_slots() {
        let mut board = Board::new();
        board.apply(
            [
                SlotUpdate::text(Slot::Kernel, "Kernel: 6.1.0 <rt>"),
                SlotUpdate::icon(Slot::DistributionImage, Icon::Distribution(DistributionIcon::Ubuntu)),
            ],
            DateTime::from_timestamp(0, 0).unwrap(),
        );

        let page = render_page("Home Lab", &board, "api/system_info.json", true);
        assert!(page.contains("<h1>Home Lab</h1>"));
        assert!(page.contains(r#"<p id="slot-kernel">Kernel: 6.1.0 &lt;rt&gt;</p>"#));
        assert!(page.contains(r#"src="/static/img/ubuntu.svg""#));
        assert!(page.contains(r#"<p id="slot-uptime"></p>"#));
        assert!(page.contains("1970-01-01 00:00:00 UTC"));
    }

    #[test]
    fn test_page_without_assets_has_no_image_paths() {
        let page = render_page("t", &Board::new(), "x", false);
        assert!(!page.contains("/static/img/ubuntu.svg"));
        assert!(page.contains("waiting for data"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
