//! JavaScript evaluation scripts
//!
//! This module contains the JavaScript evaluated inside a live page by
//! `BrowserSession`. Scripts that take parameters are built by functions
//! that embed the arguments as JSON literals, never by string splicing of
//! raw selector text.

use serde_json::json;

use super::{Probe, Source};

/// Text of every JSON-LD block, in document order
pub const JSON_LD_SCRIPT: &str = r#"
    (() => Array.from(document.querySelectorAll('script[type="application/ld+json"]'))
        .map(s => s.textContent || ''))()
"#;

/// `document.title`
pub const DOCUMENT_TITLE_SCRIPT: &str = "document.title";

/// Document state checked once navigation settles
pub const PAGE_STATE_SCRIPT: &str = r#"
    (() => ({
        contentType: document.contentType || ''
    }))()
"#;

/// Collect up to `limit` image candidates with natural dimensions
#[must_use]
pub fn image_candidates_script(limit: usize) -> String {
    format!(
        r#"
    (() => {{
        const usable = (value) => {{
            const v = (value || '').trim();
            return /^(data|javascript):/i.test(v) ? '' : v;
        }};
        return Array.from(document.querySelectorAll('img'))
        .slice(0, {limit})
        .map(img => ({{
            src: usable(img.getAttribute('src')) || usable(img.getAttribute('data-src')) || '',
            width: img.naturalWidth || 0,
            height: img.naturalHeight || 0
        }}));
    }})()
"#
    )
}

/// Incremental scroll to the bottom of the document
///
/// Resolves with the number of steps taken once the scrolled distance
/// exceeds `scrollHeight` or `max_steps` is reached.
#[must_use]
pub fn lazy_scroll_script(step_px: u32, interval_ms: u64, max_steps: u32) -> String {
    format!(
        r#"
    new Promise(resolve => {{
        let scrolled = 0;
        let steps = 0;
        const timer = setInterval(() => {{
            const height = document.body ? document.body.scrollHeight : 0;
            window.scrollBy(0, {step_px});
            scrolled += {step_px};
            steps += 1;
            if (scrolled >= height || steps >= {max_steps}) {{
                clearInterval(timer);
                resolve(steps);
            }}
        }}, {interval_ms});
    }})
"#
    )
}

/// Evaluate `probes` inside every element matching `container`
///
/// Returns `Array<Array<string|null>>`, one inner array per container.
#[must_use]
pub fn scoped_probe_script(container: &str, probes: &[Probe<'_>]) -> String {
    let probe_list: Vec<serde_json::Value> = probes
        .iter()
        .map(|probe| match probe.source {
            Source::Text => json!({ "selector": probe.selector, "attr": null }),
            Source::Attr(name) => json!({ "selector": probe.selector, "attr": name }),
        })
        .collect();
    let container = serde_json::Value::String(container.to_string());
    let probe_list = serde_json::Value::Array(probe_list);

    format!(
        r#"
    (() => {{
        const probes = {probe_list};
        const read = (root, probe) => {{
            let el = null;
            try {{ el = root.querySelector(probe.selector); }} catch (e) {{ return null; }}
            if (!el) return null;
            const value = probe.attr === null ? el.innerText : el.getAttribute(probe.attr);
            return value === undefined ? null : value;
        }};
        let roots = [];
        try {{ roots = Array.from(document.querySelectorAll({container})); }} catch (e) {{ return []; }}
        return roots.map(root => probes.map(probe => read(root, probe)));
    }})()
"#
    )
}
