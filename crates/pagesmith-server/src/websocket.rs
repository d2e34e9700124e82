//! WebSocket-based live reload.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Path of the live-reload WebSocket endpoint.
pub const RELOAD_ENDPOINT: &str = "/__livereload";

/// Path of the client script injected into served pages.
pub const CLIENT_SCRIPT_PATH: &str = "/__livereload.js";

static BODY_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</body\s*>").expect("valid body end pattern"));

/// Messages sent to connected browsers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReloadMessage {
    /// Full page reload
    Reload,

    /// Re-fetch stylesheets without reloading the page
    InjectCss,

    /// Connection established
    Connected,
}

/// Hub for broadcasting reload messages to all connected clients.
#[derive(Debug, Clone)]
pub struct ReloadHub {
    sender: broadcast::Sender<ReloadMessage>,
}

impl ReloadHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send a message to all connected clients.
    pub fn send(&self, msg: ReloadMessage) {
        // No receivers just means no browser is open.
        let _ = self.sender.send(msg);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReloadMessage> {
        self.sender.subscribe()
    }
}

impl Default for ReloadHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Insert the client script tag before the last `</body>`, or append it when
/// the document has no body end tag.
pub fn inject_client_tag(html: &str) -> String {
    let tag = format!(r#"<script src="{}"></script>"#, CLIENT_SCRIPT_PATH);

    if html.contains(&tag) {
        return html.to_string();
    }

    match BODY_END.find_iter(html).last() {
        Some(m) => format!("{}{}\n{}", &html[..m.start()], tag, &html[m.start()..]),
        None => format!("{}\n{}", html, tag),
    }
}

/// Generate the browser-side live-reload script.
///
/// The socket URL is derived from the page's own host so the script works on
/// any port the server binds.
pub fn reload_client_script() -> String {
    format!(
        r#"
(function() {{
  'use strict';

  const protocol = location.protocol === 'https:' ? 'wss:' : 'ws:';
  const ws = new WebSocket(protocol + '//' + location.host + '{}');

  function refreshStyles() {{
    const stamp = Date.now();
    document.querySelectorAll('link[rel="stylesheet"]').forEach(function(link) {{
      const url = new URL(link.href, location.href);
      if (url.host !== location.host) return;
      url.searchParams.set('livereload', stamp);
      link.href = url.toString();
    }});
  }}

  ws.onmessage = function(event) {{
    const msg = JSON.parse(event.data);

    switch (msg.type) {{
      case 'reload':
        location.reload();
        break;

      case 'inject_css':
        refreshStyles();
        break;

      case 'connected':
        console.log('[livereload] connected');
        break;
    }}
  }};

  ws.onclose = function() {{
    console.log('[livereload] disconnected, retrying');
    setTimeout(function() {{ location.reload(); }}, 1000);
  }};
}})();
"#,
        RELOAD_ENDPOINT
    )
}
