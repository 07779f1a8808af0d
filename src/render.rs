//! HTML fragments for project lists.
//!
//! Cards are built as [`Element`] trees from [`crate::html`]. Text and
//! attribute values are escaped when a tree is written out, so scraped
//! titles and abstracts never reach the page as markup. The markup targets
//! the site's Tailwind classes and CSS variables.
//!
//! Two card layouts share the same building blocks:
//!
//! - [`render_project_card`]: compact list card, both scores as badges.
//! - [`render_focus_card`]: focus-page card with one primary score bar.

use crate::filter::{page_sequence, total_pages, PageItem};
use crate::html::{render_all, Element, Entity};
use crate::models::ProjectView;

pub use crate::html::escape_html;

/// Characters of abstract shown in the details block.
pub const ABSTRACT_LIMIT: usize = 600;
/// Characters of abstract shown as the focus-card teaser.
pub const TEASER_LIMIT: usize = 300;
/// Keyword tags shown before collapsing into `+N more`.
pub const KEYWORD_TAG_LIMIT: usize = 5;

const AI_COLOR: &str = "#3b82f6";
const WEARABLES_COLOR: &str = "#f59e0b";
const LINK_COLOR: &str = "#14b8a6";

const MUTED: &str = "color: var(--text-muted);";

/// Prefix of `text` of at most `limit` characters, and whether anything
/// was cut.
pub fn truncate_chars(text: &str, limit: usize) -> (&str, bool) {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => (&text[..cut], true),
        None => (text, false),
    }
}

/// `el` with `text` appended, cut at `limit` characters and followed by
/// `&hellip;` when cut.
fn truncated(el: Element, text: &str, limit: usize) -> Element {
    let (prefix, cut) = truncate_chars(text, limit);
    let el = el.text(prefix);
    if cut {
        el.entity(Entity::Hellip)
    } else {
        el
    }
}

/// Which score a focus card leads with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Ai,
    Wearables,
}

impl Focus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ai" => Some(Focus::Ai),
            "wearables" => Some(Focus::Wearables),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Focus::Ai => "ai",
            Focus::Wearables => "wearables",
        }
    }

    fn color(&self) -> &'static str {
        match self {
            Focus::Ai => AI_COLOR,
            Focus::Wearables => WEARABLES_COLOR,
        }
    }

    fn other(&self) -> Focus {
        match self {
            Focus::Ai => Focus::Wearables,
            Focus::Wearables => Focus::Ai,
        }
    }

    fn score(&self, p: &ProjectView) -> f64 {
        match self {
            Focus::Ai => p.ai,
            Focus::Wearables => p.wear,
        }
    }

    fn matched_keywords<'a>(&self, p: &'a ProjectView) -> &'a str {
        match self {
            Focus::Ai => &p.ai_kw,
            Focus::Wearables => &p.wear_kw,
        }
    }
}

/// Options for [`render_project_card`].
#[derive(Debug, Clone, Default)]
pub struct CardOptions {
    /// Link to the owning programme (used on cross-programme lists).
    pub show_spp: bool,
    /// Site prefix for programme links; must end with `/`.
    pub base_url: String,
}

fn program_href(base_url: &str, slug: &str) -> String {
    format!("{}programs/{}/", base_url, slug)
}

fn tag_row(class: &str, tags: Vec<Element>) -> Option<Element> {
    if tags.is_empty() {
        return None;
    }
    Some(Element::new("div").class(class).children(tags))
}

/// Matched-keyword tags, split on `,`.
fn matched_tags(keywords: &str, focus: Focus) -> Vec<Element> {
    if keywords.is_empty() {
        return Vec::new();
    }
    let class = format!(
        "inline-block px-2 py-0.5 rounded text-xs font-mono bg-[{c}20] text-[{c}] border border-[{c}]/20",
        c = focus.color()
    );
    keywords
        .split(',')
        .map(|kw| Element::new("span").class(class.as_str()).text(kw.trim()))
        .collect()
}

/// General keyword tags, split on `,` or `;`; at most `limit` are shown.
fn keyword_tags(keywords: &str, limit: usize) -> Vec<Element> {
    let kws: Vec<&str> = keywords
        .split([',', ';'])
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .collect();

    let mut tags: Vec<Element> = kws
        .iter()
        .take(limit)
        .map(|kw| {
            Element::new("span")
                .class("inline-block px-2 py-0.5 rounded text-xs font-mono bg-[var(--surface-2)] text-[var(--text-secondary)]")
                .text(*kw)
        })
        .collect();

    if kws.len() > limit {
        tags.push(
            Element::new("span")
                .class("text-xs")
                .style(MUTED)
                .text(format!("+{} more", kws.len() - limit)),
        );
    }
    tags
}

fn labelled(class: &str, label: &str, value: &str) -> Element {
    Element::new("p")
        .class(class)
        .style(MUTED)
        .child(Element::new("strong").text(label))
        .text(format!(" {}", value))
}

/// The collapsible "Show details" block, or `None` when there is nothing
/// to show.
fn details(p: &ProjectView) -> Option<Element> {
    let mut content = Element::new("div").class("mt-2");
    if !p.abstract_text.is_empty() {
        content = content.child(truncated(
            Element::new("p")
                .class("text-sm mt-2 leading-relaxed")
                .style(MUTED),
            &p.abstract_text,
            ABSTRACT_LIMIT,
        ));
    }
    if !p.subject_area.is_empty() {
        content = content.child(labelled("text-xs mt-2", "Subject area:", &p.subject_area));
    }
    if !p.dfg_class.is_empty() {
        content = content.child(labelled(
            "text-xs mt-1",
            "DFG classification:",
            &p.dfg_class,
        ));
    }
    if !p.keywords.is_empty() {
        content = content.child(
            Element::new("div")
                .class("flex flex-wrap gap-1 mt-2")
                .child(
                    Element::new("span")
                        .class("text-xs font-medium")
                        .style(MUTED)
                        .text("Keywords:"),
                )
                .text(" ")
                .children(keyword_tags(&p.keywords, usize::MAX)),
        );
    }

    if content.is_empty() {
        return None;
    }
    Some(
        Element::new("details")
            .class("mt-2")
            .child(
                Element::new("summary")
                    .class("text-xs cursor-pointer select-none")
                    .style(MUTED)
                    .text("Show details"),
            )
            .child(content),
    )
}

fn gepris_link(p: &ProjectView) -> Option<Element> {
    if p.url.is_empty() {
        return None;
    }
    Some(
        Element::new("a")
            .attr("href", p.url.as_str())
            .attr("target", "_blank")
            .attr("rel", "noopener")
            .class("inline-flex items-center gap-1 text-xs mt-2 hover:underline")
            .style(format!("color: {};", LINK_COLOR))
            .text("GEPRIS ")
            .entity(Entity::NorthEastArrow),
    )
}

/// External title link; `size` is the Tailwind text size and extra classes.
fn title_link(p: &ProjectView, size: &str) -> Element {
    Element::new("a")
        .attr("href", p.url.as_str())
        .attr("target", "_blank")
        .attr("rel", "noopener")
        .class(format!(
            "{} font-semibold hover:text-[{}] transition-colors",
            size, LINK_COLOR
        ))
        .style("color: var(--text-primary);")
        .text(p.title.as_str())
}

fn score_badge(label: &str, score: f64, color: &str) -> Option<Element> {
    if score <= 0.0 {
        return None;
    }
    Some(
        Element::new("span")
            .class("text-xs font-mono px-1.5 py-0.5 rounded")
            .style(format!("background: {c}20; color: {c};", c = color))
            .text(format!("{} {:.1}", label, score)),
    )
}

fn card_shell(padding: &str, row_class: &str, body: Element, side: Option<Element>) -> Element {
    Element::new("div")
        .class(format!(
            "block rounded-xl border {} transition-all duration-200",
            padding
        ))
        .style("background: var(--surface-1); border-color: var(--border);")
        .child(
            Element::new("div")
                .class(row_class)
                .child(body)
                .child_opt(side),
        )
}

/// Compact card for programme pages and search results.
pub fn render_project_card(p: &ProjectView, opts: &CardOptions) -> String {
    project_card(p, opts).to_string()
}

fn project_card(p: &ProjectView, opts: &CardOptions) -> Element {
    let badges: Vec<Element> = [
        score_badge("AI", p.ai, AI_COLOR),
        score_badge("W", p.wear, WEARABLES_COLOR),
    ]
    .into_iter()
    .flatten()
    .collect();
    let scores = tag_row("flex gap-2 shrink-0", badges);

    let spp_link = (opts.show_spp && !p.spp_slug.is_empty()).then(|| {
        Element::new("p").class("mt-1").child(
            Element::new("a")
                .attr("href", program_href(&opts.base_url, &p.spp_slug))
                .class(format!("text-xs text-[{}] hover:underline", LINK_COLOR))
                .text(p.spp.as_str()),
        )
    });

    let mut tags = matched_tags(&p.ai_kw, Focus::Ai);
    tags.extend(matched_tags(&p.wear_kw, Focus::Wearables));
    tags.extend(keyword_tags(&p.keywords, KEYWORD_TAG_LIMIT));

    let muted_line = |class: &str, text: &str| {
        (!text.is_empty()).then(|| {
            Element::new("p")
                .class(class)
                .style(MUTED)
                .text(text)
        })
    };

    let body = Element::new("div")
        .class("flex-1 min-w-0")
        .child(title_link(p, "text-sm line-clamp-2"))
        .child_opt(muted_line("text-xs mt-1", &p.pi))
        .child_opt(muted_line("text-xs mt-0.5", &p.funding))
        .child_opt(spp_link)
        .child_opt(tag_row("flex flex-wrap gap-1 mt-2", tags))
        .child_opt(details(p))
        .child_opt(gepris_link(p));

    card_shell(
        "p-4",
        "flex items-start justify-between gap-3",
        body,
        scores,
    )
}

fn score_bar(score: f64, color: &str, label: &str) -> Element {
    // Scores run 0..10; the bar saturates at 10.
    let pct = (score * 10.0).min(100.0);
    Element::new("div")
        .class("flex items-center gap-3")
        .child(
            Element::new("span")
                .class("text-xs font-medium shrink-0 w-20")
                .style("color: var(--text-secondary);")
                .text(label),
        )
        .child(
            Element::new("div")
                .class("flex-1 h-2 rounded-full overflow-hidden")
                .style("background: var(--surface-2);")
                .child(
                    Element::new("div")
                        .class("h-full rounded-full")
                        .style(format!("width: {}%; background: {};", pct, color)),
                ),
        )
        .child(
            Element::new("span")
                .class("text-xs font-mono tabular-nums shrink-0 w-8 text-right")
                .style(MUTED)
                .text(format!("{:.1}", score)),
        )
}

/// Focus-page card: the `focus` score leads, the other is shown as a
/// secondary bar when non-zero. `spp_slug` adds a programme link.
pub fn render_focus_card(
    p: &ProjectView,
    focus: Focus,
    spp_slug: Option<&str>,
    base_url: &str,
) -> String {
    focus_card(p, focus, spp_slug, base_url).to_string()
}

fn focus_card(p: &ProjectView, focus: Focus, spp_slug: Option<&str>, base_url: &str) -> Element {
    let main_score = focus.score(p);
    let alt_score = focus.other().score(p);
    let (main_label, alt_label) = match focus {
        Focus::Ai => ("AI", "Wear."),
        Focus::Wearables => ("Wearables", "AI"),
    };
    let main_color = focus.color();

    let header = Element::new("div")
        .class("flex flex-wrap items-center gap-2 mb-2")
        .child(
            Element::new("span")
                .class("inline-flex items-center rounded-full font-medium px-2 py-0.5 text-xs")
                .style(format!("background: {c}20; color: {c};", c = main_color))
                .text(format!("{} Score: {:.1}", main_label, main_score)),
        )
        .child_opt(spp_slug.filter(|s| !s.is_empty()).map(|slug| {
            Element::new("a")
                .attr("href", program_href(base_url, slug))
                .class("text-xs hover:underline")
                .style(format!("color: {};", LINK_COLOR))
                .text(p.spp.as_str())
        }))
        .child_opt((!p.funding.is_empty()).then(|| {
            Element::new("span")
                .class("text-xs")
                .style(MUTED)
                .text(p.funding.as_str())
        }));

    let body = Element::new("div")
        .class("flex-1 min-w-0")
        .child(header)
        .child(title_link(p, "text-base"))
        .child_opt((!p.pi.is_empty()).then(|| {
            Element::new("p")
                .class("text-sm mt-1")
                .style("color: var(--text-secondary);")
                .text(p.pi.as_str())
        }))
        .child_opt((!p.abstract_text.is_empty()).then(|| {
            truncated(
                Element::new("p")
                    .class("text-sm mt-2 line-clamp-3")
                    .style(MUTED),
                &p.abstract_text,
                TEASER_LIMIT,
            )
        }))
        .child_opt(tag_row(
            "flex flex-wrap gap-1 mt-3",
            matched_tags(focus.matched_keywords(p), focus),
        ))
        .child_opt(tag_row(
            "flex flex-wrap gap-1 mt-2",
            keyword_tags(&p.keywords, KEYWORD_TAG_LIMIT),
        ))
        .child_opt(details(p))
        .child_opt(gepris_link(p));

    let bars = Element::new("div")
        .class("shrink-0 w-32")
        .child(score_bar(main_score, main_color, main_label))
        .child_opt((alt_score > 0.0).then(|| {
            Element::new("div")
                .class("mt-2")
                .child(score_bar(alt_score, focus.other().color(), alt_label))
        }));

    card_shell("p-6", "flex flex-col sm:flex-row gap-4", body, Some(bars))
}

/// Pagination control for `total` items; `""` when one page suffices.
pub fn render_pagination(total: usize, current: usize) -> String {
    pagination(total, current)
        .map(|nav| nav.to_string())
        .unwrap_or_default()
}

fn pagination(total: usize, current: usize) -> Option<Element> {
    let pages = total_pages(total);
    if pages <= 1 {
        return None;
    }

    const BASE: &str = "px-3 py-1.5 text-sm rounded-lg border transition-colors";
    const ACTIVE: &str = "border-[var(--color-primary-500)] bg-[var(--color-primary-500)]/10 text-[var(--color-primary-500)] font-medium";
    const INACTIVE: &str = "border-[var(--border)] text-[var(--text-secondary)] hover:border-[var(--color-primary-500)]/50";
    const DISABLED: &str = "border-transparent text-[var(--text-muted)] cursor-default";

    let nav_button = |target: usize, disabled: bool, label: &str, glyph: Entity| {
        let button = Element::new("button")
            .class(format!(
                "{} {}",
                BASE,
                if disabled { DISABLED } else { INACTIVE }
            ))
            .attr("data-page", target.to_string());
        let button = if disabled {
            button.flag("disabled")
        } else {
            button
        };
        button.attr("aria-label", label).entity(glyph)
    };

    // A page past the end steps back to the last page.
    let prev = current.saturating_sub(1).min(pages);

    let mut nav = Element::new("nav")
        .class("flex flex-wrap items-center justify-center gap-1.5 mt-8")
        .attr("aria-label", "Pagination")
        .child(nav_button(prev, current <= 1, "Previous", Entity::Lsaquo));
    for item in page_sequence(total, current) {
        nav = nav.child(match item {
            PageItem::Ellipsis => Element::new("span")
                .class("px-2 text-sm")
                .style(MUTED)
                .entity(Entity::Hellip),
            PageItem::Page(n) if n == current => Element::new("button")
                .class(format!("{} {}", BASE, ACTIVE))
                .attr("data-page", n.to_string())
                .attr("aria-current", "page")
                .text(n.to_string()),
            PageItem::Page(n) => Element::new("button")
                .class(format!("{} {}", BASE, INACTIVE))
                .attr("data-page", n.to_string())
                .text(n.to_string()),
        });
    }
    Some(nav.child(nav_button(
        current + 1,
        current >= pages,
        "Next",
        Entity::Rsaquo,
    )))
}

/// Which card a listing uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardLayout {
    /// Compact cards; `show_spp` adds programme links.
    List { show_spp: bool },
    /// Focus cards led by one score, always linking the programme.
    Focus(Focus),
}

/// One page of cards followed by the pagination control.
///
/// `total` is the number of matches before pagination and `current` the
/// 1-indexed page that `projects` holds. The "no matches" notice is only
/// shown when nothing matched at all; a page past the end says so and keeps
/// its pagination.
pub fn render_listing(
    projects: &[ProjectView],
    total: usize,
    current: usize,
    layout: CardLayout,
    base_url: &str,
) -> String {
    if total == 0 {
        return Element::new("p")
            .class("text-sm py-8 text-center")
            .style(MUTED)
            .text("No projects match the current filters.")
            .to_string();
    }

    let cards: Vec<Element> = match layout {
        CardLayout::List { show_spp } => {
            let opts = CardOptions {
                show_spp,
                base_url: base_url.to_string(),
            };
            projects.iter().map(|p| project_card(p, &opts)).collect()
        }
        CardLayout::Focus(focus) => projects
            .iter()
            .map(|p| focus_card(p, focus, Some(&p.spp_slug), base_url))
            .collect(),
    };

    let mut out = vec![Element::new("div").class("space-y-3").children(cards)];
    if projects.is_empty() {
        out.push(
            Element::new("p")
                .class("text-sm py-8 text-center")
                .style(MUTED)
                .text(format!(
                    "Page {} is past the last page of {} matching projects.",
                    current, total
                )),
        );
    }
    out.extend(pagination(total, current));
    render_all(&out)
}
