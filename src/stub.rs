//! WSGI service stub exposing every transform key as an HTTP route.
//!
//! The stub is plain text handed to a bottle application; this module only
//! decides the route table and the module it imports.

use crate::config::Configuration;
use std::path::Path;

/// File the stub is written to when none is given.
pub const DEFAULT_STUB: &str = "TRX.wsgi";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Route path segment, the transform key.
    pub name: String,
    /// Callable bound to the route.
    pub call: String,
}

/// One route per transform key, in key order.
pub fn routes(cfg: &Configuration) -> Vec<Route> {
    cfg.transforms
        .iter()
        .map(|(key, spec)| Route {
            name: key.clone(),
            call: spec.call.clone(),
        })
        .collect()
}

/// Render the stub importing `cfg.script` as the transform module.
pub fn render_wsgi(cfg: &Configuration) -> String {
    let script = Path::new(&cfg.script);
    let module = script
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extra_path = match script.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            format!("sys.path.append(\"{}\")", dir.display())
        }
        _ => String::new(),
    };

    let mut lines: Vec<String> = [
        "import os,sys",
        "os.chdir(os.path.dirname(__file__))",
        "sys.path.append(os.path.dirname(__file__))",
        extra_path.as_str(),
        "",
        "from bottle import *",
        "from Maltego import *",
        format!("from {module} import *").as_str(),
        "",
        "def do_transform(trx_fnc):",
        "    body = request.body.read()",
        "    if len(body) > 0:",
        "        return(trx_fnc(MaltegoMsg(request.body.getvalue())))",
        "",
    ]
    .iter()
    .map(|l| l.to_string())
    .collect();

    for route in routes(cfg) {
        lines.push(format!("@route('/{}', method='ANY')", route.name));
        lines.push(format!("def {}():", route.name));
        lines.push(format!("    return do_transform({})", route.call));
        lines.push(String::new());
    }
    lines.push("application = default_app()".to_string());

    lines.join("\n")
}
