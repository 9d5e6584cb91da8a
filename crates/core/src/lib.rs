pub mod derive;
pub mod overview;
pub mod partition;
pub mod presentation;
pub mod sort_key;
pub mod sortable;
pub mod workspace;

pub use derive::{derive, EnrichedMarketRow, PriceHistoryIndex};
pub use overview::MarketOverview;
pub use partition::partition;
pub use sort_key::SortKey;
pub use sortable::{SortDirection, SortState, SortableCollection};
pub use workspace::init_workspace;
