pub mod adapter;
pub mod error;
pub mod loader;
pub mod navigation;
pub mod scrape;
pub mod text;
pub mod types;

pub use adapter::{CompiledSelectors, PageAdapter, PageSelectors, SelectorAdapter};
pub use error::{PageError, PageResult};
pub use loader::PageLoader;
pub use navigation::{LoadStatus, NavigationEvent, NavigationScope, PageWatcher, DEFAULT_SCOPE};
pub use scrape::{scrape, scrape_html};
pub use types::*;
