//==============================================================================
// Template Server - layouts, loops, custom functions and inheritance
//==============================================================================

use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use course_lab::logging::{init_logger, verbose_from_args};
use course_lab::web::serve;
use course_lab::web::templates::{self, TemplateSet};
use course_lab::CourseConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger(verbose_from_args());
    let config = CourseConfig::load_validated().context("loading configuration")?;
    let set = Arc::new(TemplateSet::standard().context("parsing page templates")?);
    let router = templates::router(set);

    println!("{}", "Template server".bold().green());
    println!("Server starting on http://{}", config.server.address());
    for pattern in router.patterns() {
        println!("  {}", pattern.cyan());
    }

    serve(&config.server.address(), router)
        .await
        .context("HTTP server stopped")
}
