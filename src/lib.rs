//! # SPP Catalogue
//!
//! A browsable catalogue of DFG priority programmes (Schwerpunktprogramme)
//! and the projects funded under them.
//!
//! The scraping and scoring happen upstream; this crate joins their outputs
//! into one immutable [`catalog::Catalog`], recovers investigator names from
//! unstructured GEPRIS descriptions, and serves filtered, sorted and
//! paginated project lists as JSON or escaped HTML cards.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ DataSource   │──▶│   Catalog    │──▶│ filter/sort/ │
//! │ JSON + CSV   │   │ join+extract │   │   paginate   │
//! └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                              │
//!                      ┌───────────────────────┤
//!                      ▼                       ▼
//!                 ┌──────────┐           ┌──────────┐
//!                 │   CLI    │           │   HTTP   │
//!                 │  (spp)   │           │ preview  │
//!                 └──────────┘           └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! spp sources                     # check the input files
//! spp stats                       # catalogue counts
//! spp search "sensor" --focus wearables
//! spp export --output projects.json
//! spp serve                       # preview server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`error`] | Library error type |
//! | [`models`] | Raw input records and the unified model |
//! | [`traits`] | [`DataSource`](traits::DataSource) abstraction |
//! | [`sources`] | Filesystem data source |
//! | [`extract`] | Investigator extraction and description cleaning |
//! | [`catalog`] | Programme/project join |
//! | [`filter`] | Filtering, sorting, pagination |
//! | [`url_state`] | Filter state in URL query strings |
//! | [`html`] | Escaping element tree for markup |
//! | [`render`] | HTML cards and pagination |
//! | [`search`] | Shared search entry points |
//! | [`get`] | Programme lookup |
//! | [`stats`] | Statistics command |
//! | [`export`] | JSON and HTML export |
//! | [`server`] | Preview HTTP server |

pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod filter;
pub mod get;
pub mod html;
pub mod models;
pub mod render;
pub mod search;
pub mod server;
pub mod sources;
pub mod stats;
pub mod traits;
pub mod url_state;
