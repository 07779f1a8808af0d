//! Static exports for the site build.
//!
//! `spp export` writes every project as a [`ProjectView`] JSON array, the
//! payload the client-side filter script reads. `spp render` writes a
//! pre-rendered HTML fragment (cards plus pagination) for one programme or
//! focus list, so pages work before the script loads.

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::filter::FilterState;
use crate::models::ProjectView;
use crate::render::{render_listing, CardLayout, Focus};
use crate::search::{project_views, search_page};

/// Export all projects as JSON.
///
/// If `output` is `Some`, writes to that file path. Otherwise writes
/// to stdout for piping.
pub fn run_export(config: &Config, output: Option<&Path>) -> Result<()> {
    let catalog = Catalog::from_config(config)?;
    let views: Vec<ProjectView> = project_views(&catalog, None);
    let json = serde_json::to_string_pretty(&views)?;

    write_output(output, &json)?;
    if let Some(path) = output {
        eprintln!("Exported {} projects to {}", views.len(), path.display());
    }
    Ok(())
}

/// Render one page of project cards as HTML.
///
/// With `focus`, `key` is ignored and the focus list is rendered with focus
/// cards; otherwise `key` names a programme by slug or number.
pub fn run_render(
    config: &Config,
    key: Option<&str>,
    focus: Option<&str>,
    page: usize,
    output: Option<&Path>,
) -> Result<()> {
    let catalog = Catalog::from_config(config)?;
    let base_url = &config.site.base_url;

    let html = match focus {
        Some(f) => {
            let focus = match Focus::parse(f) {
                Some(focus) => focus,
                None => bail!("Unknown focus: {}. Use ai or wearables.", f),
            };
            let views = project_views(&catalog, Some(focus));
            let state = FilterState {
                page,
                ..Default::default()
            };
            let result = search_page(&views, &state);
            render_listing(
                &result.projects,
                result.total,
                result.page,
                CardLayout::Focus(focus),
                base_url,
            )
        }
        None => {
            let key = match key {
                Some(k) => k,
                None => bail!("render needs a programme slug or --focus"),
            };
            let program = match catalog.find_program(key) {
                Some(p) => p,
                None => bail!("programme not found: {}", key),
            };
            let views: Vec<ProjectView> =
                program.projects.iter().map(ProjectView::from).collect();
            let state = FilterState {
                page,
                ..Default::default()
            };
            let result = search_page(&views, &state);
            render_listing(
                &result.projects,
                result.total,
                result.page,
                CardLayout::List { show_spp: false },
                base_url,
            )
        }
    };

    write_output(output, &html)?;
    if let Some(path) = output {
        eprintln!("Rendered page {} to {}", page.max(1), path.display());
    }
    Ok(())
}

fn write_output(output: Option<&Path>, contents: &str) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            std::fs::write(path, contents)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        None => {
            println!("{}", contents);
        }
    }
    Ok(())
}
