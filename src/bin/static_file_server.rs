//==============================================================================
// Static File Server - cached static files, uploads, downloads and listing
//==============================================================================

use std::fs;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use course_lab::logging::{init_logger, verbose_from_args};
use course_lab::web::serve_listener;
use course_lab::web::static_files::{self, StaticFiles};
use course_lab::CourseConfig;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger(verbose_from_args());
    let config = CourseConfig::load_validated().context("loading configuration")?;
    let settings = &config.static_files;
    for dir in [&settings.static_dir, &settings.upload_dir] {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let files = Arc::new(StaticFiles::new(settings));
    let router = static_files::router(files);

    println!("{}", "Static file server".bold().green());
    println!("Server starting on http://{}", config.server.address());
    println!("  static files from {}", settings.static_dir.display().to_string().cyan());
    println!("  uploads into {}", settings.upload_dir.display().to_string().cyan());

    let listener = TcpListener::bind(config.server.address())
        .await
        .with_context(|| format!("binding {}", config.server.address()))?;
    serve_listener(listener, router, settings.max_upload_bytes)
        .await
        .context("HTTP server stopped")
}
