//! 编排层
//!
//! ```text
//! app        (持有浏览器，读写文件)
//!   ↓
//! harvester  (遍历 BibDatabase，节流，统计)
//!   ↓
//! workflow::EntryFlow (处理单条记录)
//!   ↓
//! services::ScholarSearch
//!   ↓
//! browser::BrowserDriver
//! ```

pub mod app;
pub mod harvester;
pub mod pacing;

pub use app::App;
pub use harvester::{HarvestReport, HarvestStats, Harvester};
pub use pacing::Pacer;
