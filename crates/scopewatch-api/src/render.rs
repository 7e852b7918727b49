//! Prometheus text exposition format.
//!
//! This is the only place where metric labels are turned into strings.
//! The match over [`Metric`] is exhaustive, so adding a variant forces
//! this renderer to handle it.

use scopewatch_model::{Metric, Snapshot};

/// Render a snapshot into the Prometheus text exposition format.
///
/// Emits the `socket_score` and `npm_download_count` gauge families,
/// each with its `# HELP`/`# TYPE` header even when empty.
pub fn render_prometheus(snapshot: &Snapshot) -> String {
    let mut out = String::new();

    out.push_str("# HELP socket_score Socket.dev package scores.\n");
    out.push_str("# TYPE socket_score gauge\n");
    for metric in &snapshot.metrics {
        match metric {
            Metric::Score {
                package,
                version,
                score,
                value,
            } => {
                out.push_str(&format!(
                    "socket_score{{package=\"{package}\",version=\"{version}\",score=\"{}\"}} {value}\n",
                    score.as_label()
                ));
            }
            Metric::Download { .. } => {}
        }
    }

    out.push_str("# HELP npm_download_count Last-day npm download counts.\n");
    out.push_str("# TYPE npm_download_count gauge\n");
    for metric in &snapshot.metrics {
        match metric {
            Metric::Download {
                package,
                date,
                value,
            } => {
                out.push_str(&format!(
                    "npm_download_count{{package=\"{package}\",date=\"{date}\"}} {value}\n"
                ));
            }
            Metric::Score { .. } => {}
        }
    }

    out
}
